//! `AnyObject`: the type-erased retained handle used wherever the crate
//! needs to hold "some schema-tagged entity" without committing to which
//! concrete kind — the Writer's pending-id map, the Reader's resolver, and
//! `AnyValue::Retained`. This is the idiomatic-Rust substitute for the
//! original's `SerializableObject::Retainer<>` (a retainer templated on the
//! common base class), per spec.md §9.

use super::composable::Composable;
use super::effect::Effect;
use super::marker::Marker;
use super::media_reference::MediaReference;
use super::retainer::{ObjectIdentity, Retainer};
use super::unknown_schema::UnknownSchema;
use crate::value::AnyDictionary;

#[derive(Clone, Debug)]
pub enum AnyObject {
    Composable(Retainer<Composable>),
    Effect(Retainer<Effect>),
    Marker(Retainer<Marker>),
    MediaReference(Retainer<MediaReference>),
    UnknownSchema(Retainer<UnknownSchema>),
}

impl AnyObject {
    pub fn identity(&self) -> ObjectIdentity {
        match self {
            AnyObject::Composable(r) => r.identity(),
            AnyObject::Effect(r) => r.identity(),
            AnyObject::Marker(r) => r.identity(),
            AnyObject::MediaReference(r) => r.identity(),
            AnyObject::UnknownSchema(r) => r.identity(),
        }
    }

    /// The name used for the `OTIO_SCHEMA` tag — for `UnknownSchema` this is
    /// the *preserved* original name, not a schema the registry knows about
    /// (spec.md §4.5 "if its an unknown schema...").
    pub fn schema_name_for_reference(&self) -> String {
        match self {
            AnyObject::Composable(r) => r.borrow().schema_name().to_string(),
            AnyObject::Effect(_) => "Effect".to_string(),
            AnyObject::Marker(_) => "Marker".to_string(),
            AnyObject::MediaReference(r) => r.borrow().schema_name().to_string(),
            AnyObject::UnknownSchema(r) => r.borrow().original_schema_name.clone(),
        }
    }

    pub fn schema_tag(&self) -> String {
        match self {
            AnyObject::UnknownSchema(r) => {
                let r = r.borrow();
                format!("{}.{}", r.original_schema_name, r.original_schema_version)
            }
            _ => format!("{}.{}", self.schema_name_for_reference(), self.schema_version()),
        }
    }

    pub fn schema_version(&self) -> i64 {
        match self {
            AnyObject::Composable(r) => r.borrow().schema_version(),
            AnyObject::Effect(_) => 1,
            AnyObject::Marker(_) => 1,
            AnyObject::MediaReference(r) => r.borrow().schema_version(),
            AnyObject::UnknownSchema(r) => r.borrow().original_schema_version,
        }
    }

    pub fn metadata(&self) -> AnyDictionary {
        match self {
            AnyObject::Composable(r) => r.borrow().metadata().clone(),
            AnyObject::Effect(r) => r.borrow().base.metadata.clone(),
            AnyObject::Marker(r) => r.borrow().base.metadata.clone(),
            AnyObject::MediaReference(r) => r.borrow().metadata().clone(),
            AnyObject::UnknownSchema(r) => r.borrow().data.clone(),
        }
    }

    pub fn as_composable(&self) -> Option<Retainer<Composable>> {
        match self {
            AnyObject::Composable(r) => Some(r.clone()),
            _ => None,
        }
    }

    pub fn as_effect(&self) -> Option<Retainer<Effect>> {
        match self {
            AnyObject::Effect(r) => Some(r.clone()),
            _ => None,
        }
    }

    pub fn as_marker(&self) -> Option<Retainer<Marker>> {
        match self {
            AnyObject::Marker(r) => Some(r.clone()),
            _ => None,
        }
    }

    pub fn as_media_reference(&self) -> Option<Retainer<MediaReference>> {
        match self {
            AnyObject::MediaReference(r) => Some(r.clone()),
            _ => None,
        }
    }
}
