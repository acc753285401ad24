//! The Writer: walks an object graph and a generic [`Sink`], assigning
//! per-schema-type reference ids, detecting cycles, and handling
//! downgrade-on-write by re-encoding through a staging
//! [`CloningEncoder`] (spec.md §4.5, grounded in
//! `examples/original_source/src/opentimelineio/serialization.cpp`'s
//! `Writer::write(SerializableObject*)`).

use std::collections::{BTreeMap, HashMap};

use base::tracing_debug;

use crate::error::{EntityRef, Error, Result};
use crate::object::{AnyObject, Composable, Effect, Marker, MediaReference, ObjectIdentity, UnknownSchema};
use crate::serialization::encoder::{CloningEncoder, CloningPolicy, Sink};
use crate::value::AnyValue;

pub struct Writer<'a, S: Sink> {
    sink: &'a mut S,
    downgrade_manifest: Option<&'a BTreeMap<String, i64>>,
    instancing: bool,
    pending: HashMap<ObjectIdentity, String>,
    next_id_for_type: HashMap<String, u64>,
}

impl<'a, S: Sink> Writer<'a, S> {
    pub fn new(sink: &'a mut S, downgrade_manifest: Option<&'a BTreeMap<String, i64>>, instancing: bool) -> Self {
        Self {
            sink,
            downgrade_manifest,
            instancing,
            pending: HashMap::new(),
            next_id_for_type: HashMap::new(),
        }
    }

    fn allocate_id(&mut self, schema_name: &str) -> String {
        let counter = self.next_id_for_type.entry(schema_name.to_string()).or_insert(0);
        *counter += 1;
        format!("{schema_name}-{counter}")
    }

    pub fn write_root(&mut self, value: &AnyValue) -> Result<()> {
        self.write_value(None, value)
    }

    pub fn write_value(&mut self, key: Option<&str>, value: &AnyValue) -> Result<()> {
        if let Some(k) = key {
            self.sink.write_key(k);
        }
        match value {
            AnyValue::Null => self.sink.write_null(),
            AnyValue::Bool(b) => self.sink.write_bool(*b),
            AnyValue::Int(i) => self.sink.write_i64(*i),
            AnyValue::Double(d) => self.sink.write_f64(*d),
            AnyValue::String(s) => self.sink.write_str(s),
            AnyValue::RationalTime(r) => self.sink.write_rational_time(*r),
            AnyValue::TimeRange(r) => self.sink.write_time_range(*r),
            AnyValue::TimeTransform(t) => self.sink.write_time_transform(*t),
            AnyValue::Point(p) => self.sink.write_point(*p),
            AnyValue::Box(b) => self.sink.write_box(*b),
            AnyValue::ObjectRef(id) => self.sink.write_object_ref(&id.id),
            AnyValue::Retained(obj) => self.write_object(obj.clone())?,
            AnyValue::Array(arr) => {
                self.sink.start_array();
                let mut cursor = arr.cursor();
                while let Some(item) = arr.next(&mut cursor) {
                    self.write_value(None, item?)?;
                }
                self.sink.end_array();
            }
            AnyValue::Dict(dict) => {
                self.sink.start_object();
                let mut cursor = dict.cursor();
                while let Some(entry) = dict.next(&mut cursor) {
                    let (k, v) = entry?;
                    self.write_value(Some(k), v)?;
                }
                self.sink.end_object()?;
            }
        }
        Ok(())
    }

    fn write_object(&mut self, obj: AnyObject) -> Result<()> {
        let identity = obj.identity();
        if let Some(existing_id) = self.pending.get(&identity).cloned() {
            if self.instancing {
                self.sink.write_object_ref(&existing_id);
                return Ok(());
            }
            return Err(Error::ObjectCycle(Some(EntityRef {
                schema_name: obj.schema_name_for_reference(),
                name: entity_name(&obj),
            })));
        }

        let schema_name = obj.schema_name_for_reference();
        let id = self.allocate_id(&schema_name);
        self.pending.insert(identity, id.clone());

        let needs_staging = !self.sink.wants_anydict_objects()
            && self
                .downgrade_manifest
                .and_then(|m| m.get(&schema_name))
                .map(|&target| obj.schema_version() > target)
                .unwrap_or(false);

        if needs_staging {
            let dict_value = self.stage_downgraded(&obj)?;
            self.write_value(None, &dict_value)?;
        } else {
            self.sink.start_object();
            self.sink.write_key("OTIO_SCHEMA");
            self.sink.write_str(&obj.schema_tag());
            self.write_object_fields(&obj)?;
            self.sink.end_schema_object(&id)?;
        }

        if !self.instancing {
            self.pending.remove(&identity);
        }
        Ok(())
    }

    /// Materializes `obj` as a plain `AnyDictionary` surrogate through a
    /// nested staging encoder, which downgrades every object frame it closes
    /// (including nested descendants) against the same manifest.
    fn stage_downgraded(&mut self, obj: &AnyObject) -> Result<AnyValue> {
        let mut nested = CloningEncoder::new(CloningPolicy::AnyDictionary, self.downgrade_manifest);
        {
            let mut nested_writer = Writer::new(&mut nested, self.downgrade_manifest, self.instancing);
            nested_writer.write_value(None, &AnyValue::Retained(obj.clone()))?;
        }
        nested.into_value()
    }

    fn write_object_fields(&mut self, obj: &AnyObject) -> Result<()> {
        match obj {
            AnyObject::Composable(r) => {
                let c = r.borrow().clone();
                self.write_composable_fields(&c)
            }
            AnyObject::Effect(r) => {
                let e = r.borrow().clone();
                self.write_effect_fields(&e)
            }
            AnyObject::Marker(r) => {
                let m = r.borrow().clone();
                self.write_marker_fields(&m)
            }
            AnyObject::MediaReference(r) => {
                let m = r.borrow().clone();
                self.write_media_reference_fields(&m)
            }
            AnyObject::UnknownSchema(r) => {
                let u = r.borrow().clone();
                self.write_unknown_schema_fields(&u)
            }
        }
    }

    fn write_item_common(&mut self, item: &crate::object::ItemBase) -> Result<()> {
        self.sink.write_key("name");
        self.sink.write_str(&item.composable.name);
        self.sink.write_key("source_range");
        match item.source_range {
            Some(r) => self.sink.write_time_range(r),
            None => self.sink.write_null(),
        }
        self.sink.write_key("effects");
        self.sink.start_array();
        for e in &item.effects {
            self.write_value(None, &AnyValue::Retained(AnyObject::Effect(e.clone())))?;
        }
        self.sink.end_array();
        self.sink.write_key("markers");
        self.sink.start_array();
        for m in &item.markers {
            self.write_value(None, &AnyValue::Retained(AnyObject::Marker(m.clone())))?;
        }
        self.sink.end_array();
        self.sink.write_key("metadata");
        self.write_value(None, &AnyValue::Dict(item.composable.serializable.metadata.clone()))?;
        Ok(())
    }

    fn write_children(&mut self, children: &[crate::object::Retainer<Composable>]) -> Result<()> {
        self.sink.write_key("children");
        self.sink.start_array();
        for c in children {
            self.write_value(None, &AnyValue::Retained(AnyObject::Composable(c.clone())))?;
        }
        self.sink.end_array();
        Ok(())
    }

    fn write_composable_fields(&mut self, c: &Composable) -> Result<()> {
        match c {
            Composable::Track(t) => {
                self.write_item_common(&t.item)?;
                self.sink.write_key("kind");
                self.sink.write_str(match t.kind {
                    crate::object::TrackKind::Video => "Video",
                    crate::object::TrackKind::Audio => "Audio",
                });
                self.write_children(&t.children)?;
            }
            Composable::Stack(s) => {
                self.write_item_common(&s.item)?;
                self.write_children(&s.children)?;
            }
            Composable::Clip(clip) => {
                self.write_item_common(&clip.item)?;
                self.sink.write_key("media_reference");
                match &clip.media_reference {
                    Some(m) => self.write_value(None, &AnyValue::Retained(AnyObject::MediaReference(m.clone())))?,
                    None => self.sink.write_null(),
                }
                self.sink.write_key("active_media_reference_key");
                match &clip.active_media_reference_key {
                    Some(k) => self.sink.write_str(k),
                    None => self.sink.write_null(),
                }
            }
            Composable::Gap(g) => {
                self.write_item_common(&g.item)?;
            }
            Composable::Transition(t) => {
                self.sink.write_key("name");
                self.sink.write_str(&t.base.name);
                self.sink.write_key("transition_type");
                self.sink.write_str(&t.transition_type);
                self.sink.write_key("in_offset");
                self.sink.write_rational_time(t.in_offset);
                self.sink.write_key("out_offset");
                self.sink.write_rational_time(t.out_offset);
                self.sink.write_key("metadata");
                self.write_value(None, &AnyValue::Dict(t.base.serializable.metadata.clone()))?;
            }
        }
        Ok(())
    }

    fn write_effect_fields(&mut self, e: &Effect) -> Result<()> {
        self.sink.write_key("name");
        self.sink.write_str(&e.name);
        self.sink.write_key("effect_name");
        self.sink.write_str(&e.effect_name);
        self.sink.write_key("metadata");
        self.write_value(None, &AnyValue::Dict(e.base.metadata.clone()))
    }

    fn write_marker_fields(&mut self, m: &Marker) -> Result<()> {
        self.sink.write_key("name");
        self.sink.write_str(&m.name);
        self.sink.write_key("marked_range");
        self.sink.write_time_range(m.marked_range);
        self.sink.write_key("color");
        self.sink.write_str(&m.color);
        self.sink.write_key("metadata");
        self.write_value(None, &AnyValue::Dict(m.base.metadata.clone()))
    }

    fn write_available_range(&mut self, range: Option<crate::TimeRange>) {
        self.sink.write_key("available_range");
        match range {
            Some(r) => self.sink.write_time_range(r),
            None => self.sink.write_null(),
        }
    }

    fn write_media_reference_fields(&mut self, m: &MediaReference) -> Result<()> {
        match m {
            MediaReference::External(r) => {
                self.sink.write_key("name");
                self.sink.write_str(&r.name);
                self.write_available_range(r.available_range);
                self.sink.write_key("target_url");
                self.sink.write_str(&r.target_url);
                self.sink.write_key("metadata");
                self.write_value(None, &AnyValue::Dict(r.base.metadata.clone()))?;
            }
            MediaReference::Missing(r) => {
                self.sink.write_key("name");
                self.sink.write_str(&r.name);
                self.write_available_range(r.available_range);
                self.sink.write_key("metadata");
                self.write_value(None, &AnyValue::Dict(r.base.metadata.clone()))?;
            }
            MediaReference::Generator(r) => {
                self.sink.write_key("name");
                self.sink.write_str(&r.name);
                self.write_available_range(r.available_range);
                self.sink.write_key("generator_kind");
                self.sink.write_str(&r.generator_kind);
                self.sink.write_key("parameters");
                self.write_value(None, &AnyValue::Dict(r.parameters.clone()))?;
                self.sink.write_key("metadata");
                self.write_value(None, &AnyValue::Dict(r.base.metadata.clone()))?;
            }
            MediaReference::ImageSequence(r) => {
                self.sink.write_key("name");
                self.sink.write_str(&r.name);
                self.write_available_range(r.available_range);
                self.sink.write_key("target_url_base");
                self.sink.write_str(&r.target_url_base);
                self.sink.write_key("name_prefix");
                self.sink.write_str(&r.name_prefix);
                self.sink.write_key("name_suffix");
                self.sink.write_str(&r.name_suffix);
                self.sink.write_key("start_frame");
                self.sink.write_i64(r.start_frame);
                self.sink.write_key("frame_step");
                self.sink.write_i64(r.frame_step);
                self.sink.write_key("rate");
                self.sink.write_f64(r.rate);
                self.sink.write_key("frame_zero_padding");
                self.sink.write_i64(r.frame_zero_padding);
                self.sink.write_key("metadata");
                self.write_value(None, &AnyValue::Dict(r.base.metadata.clone()))?;
            }
        }
        Ok(())
    }

    fn write_unknown_schema_fields(&mut self, u: &UnknownSchema) -> Result<()> {
        let mut cursor = u.data.cursor();
        while let Some(entry) = u.data.next(&mut cursor) {
            let (k, v) = entry?;
            self.write_value(Some(k), v)?;
        }
        Ok(())
    }
}

fn entity_name(obj: &AnyObject) -> Option<String> {
    match obj {
        AnyObject::Composable(r) => Some(r.borrow().name().to_string()),
        AnyObject::Effect(r) => Some(r.borrow().name.clone()),
        AnyObject::Marker(r) => Some(r.borrow().name.clone()),
        AnyObject::MediaReference(r) => Some(r.borrow().name().to_string()),
        AnyObject::UnknownSchema(_) => None,
    }
}

/// Top-level entry point: serializes `root` (typically a `Stack` wrapped as
/// `AnyValue::Retained`) to a JSON string indented with four spaces, the
/// default pretty-printing width (spec.md §6).
pub fn serialize_json_to_string(
    root: &AnyValue,
    downgrade_manifest: Option<&BTreeMap<String, i64>>,
    instancing: bool,
) -> Result<String> {
    serialize_json_to_string_indented(root, downgrade_manifest, instancing, Some(4))
}

/// Like [`serialize_json_to_string`], but with configurable indentation
/// (spec.md §6: "Indentation is configurable; default four spaces, pretty").
/// `indent: None` emits compact (no whitespace) JSON.
pub fn serialize_json_to_string_indented(
    root: &AnyValue,
    downgrade_manifest: Option<&BTreeMap<String, i64>>,
    instancing: bool,
    indent: Option<usize>,
) -> Result<String> {
    tracing_debug!(instancing, downgrading = downgrade_manifest.is_some(), indent, "writing root value");
    use crate::serialization::encoder::JsonEncoder;
    let mut encoder = JsonEncoder::new();
    {
        let mut writer = Writer::new(&mut encoder, downgrade_manifest, instancing);
        writer.write_root(root)?;
    }
    let value = encoder.into_value();
    match indent {
        Some(width) => {
            let indent_bytes = " ".repeat(width);
            let formatter = serde_json::ser::PrettyFormatter::with_indent(indent_bytes.as_bytes());
            let mut buf = Vec::new();
            let mut ser = serde_json::Serializer::with_formatter(&mut buf, formatter);
            serde::Serialize::serialize(&value, &mut ser).map_err(|e| Error::JsonParseError(e.to_string()))?;
            String::from_utf8(buf).map_err(|e| Error::JsonParseError(e.to_string()))
        }
        None => serde_json::to_string(&value).map_err(|e| Error::JsonParseError(e.to_string())),
    }
}

pub fn serialize_json_to_file(
    root: &AnyValue,
    path: &std::path::Path,
    downgrade_manifest: Option<&BTreeMap<String, i64>>,
    instancing: bool,
) -> Result<()> {
    let text = serialize_json_to_string(root, downgrade_manifest, instancing)?;
    std::fs::write(path, text).map_err(|e| Error::FileWriteFailed {
        path: path.display().to_string(),
        detail: e.to_string(),
    })
}
