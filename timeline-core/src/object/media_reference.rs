//! A description of external media and its available range. Closed sum type
//! over the handful of reference kinds a Clip can point at (spec.md
//! GLOSSARY: "MediaReference").

use super::base::SerializableObjectBase;
use crate::value::AnyDictionary;
use crate::TimeRange;

#[derive(Clone, Debug)]
pub struct ExternalReference {
    pub base: SerializableObjectBase,
    pub name: String,
    pub target_url: String,
    pub available_range: Option<TimeRange>,
}

#[derive(Clone, Debug)]
pub struct MissingReference {
    pub base: SerializableObjectBase,
    pub name: String,
    pub available_range: Option<TimeRange>,
}

#[derive(Clone, Debug)]
pub struct GeneratorReference {
    pub base: SerializableObjectBase,
    pub name: String,
    pub generator_kind: String,
    pub parameters: AnyDictionary,
    pub available_range: Option<TimeRange>,
}

/// A numbered sequence of frame images on disk, e.g. `shot_0001.exr`,
/// `shot_0002.exr`, ... Carried over from `original_source/` — the
/// distillation's `MediaReference` variant list dropped it, but it is one of
/// the original's four concrete reference kinds (alongside External,
/// Missing, Generator) and costs nothing extra to keep lossless.
#[derive(Clone, Debug)]
pub struct ImageSequenceReference {
    pub base: SerializableObjectBase,
    pub name: String,
    pub target_url_base: String,
    pub name_prefix: String,
    pub name_suffix: String,
    pub start_frame: i64,
    pub frame_step: i64,
    pub rate: f64,
    pub frame_zero_padding: i64,
    pub available_range: Option<TimeRange>,
}

#[derive(Clone, Debug)]
pub enum MediaReference {
    External(ExternalReference),
    Missing(MissingReference),
    Generator(GeneratorReference),
    ImageSequence(ImageSequenceReference),
}

impl MediaReference {
    pub fn schema_name(&self) -> &'static str {
        match self {
            MediaReference::External(_) => "ExternalReference",
            MediaReference::Missing(_) => "MissingReference",
            MediaReference::Generator(_) => "GeneratorReference",
            MediaReference::ImageSequence(_) => "ImageSequenceReference",
        }
    }

    pub fn schema_version(&self) -> i64 {
        1
    }

    pub fn name(&self) -> &str {
        match self {
            MediaReference::External(r) => &r.name,
            MediaReference::Missing(r) => &r.name,
            MediaReference::Generator(r) => &r.name,
            MediaReference::ImageSequence(r) => &r.name,
        }
    }

    pub fn available_range(&self) -> Option<TimeRange> {
        match self {
            MediaReference::External(r) => r.available_range,
            MediaReference::Missing(r) => r.available_range,
            MediaReference::Generator(r) => r.available_range,
            MediaReference::ImageSequence(r) => r.available_range,
        }
    }

    pub fn metadata(&self) -> &AnyDictionary {
        match self {
            MediaReference::External(r) => &r.base.metadata,
            MediaReference::Missing(r) => &r.base.metadata,
            MediaReference::Generator(r) => &r.base.metadata,
            MediaReference::ImageSequence(r) => &r.base.metadata,
        }
    }

    pub fn metadata_mut(&mut self) -> &mut AnyDictionary {
        match self {
            MediaReference::External(r) => &mut r.base.metadata,
            MediaReference::Missing(r) => &mut r.base.metadata,
            MediaReference::Generator(r) => &mut r.base.metadata,
            MediaReference::ImageSequence(r) => &mut r.base.metadata,
        }
    }
}
