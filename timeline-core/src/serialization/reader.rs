//! The Reader: parses JSON text into the dynamic value tree, dispatches
//! `OTIO_SCHEMA`-tagged objects through the type registry, and rebuilds the
//! composition graph's parent pointers by re-inserting decoded children
//! through the same composition functions a caller would use (spec.md §4.6).

use std::path::Path;

use base::tracing_debug;
use serde_json::{Map, Value};

use crate::error::{Error, Result};
use crate::object::{
    self, AnyObject, Clip, ComposableBase, Composable, Effect, ExternalReference, Gap,
    GeneratorReference, ImageSequenceReference, ItemBase, Marker, MediaReference,
    MissingReference, Retainer, SerializableObjectBase, Stack, Track, TrackKind, Transition,
    UnknownSchema, WeakRetainer,
};
use crate::registry::TypeRegistry;
use crate::serialization::resolver::Resolver;
use crate::value::{AnyDictionary, AnyValue, Box2d, V2d};
use crate::{RationalTime, TimeRange, TimeTransform};

pub fn deserialize_json_from_string(text: &str) -> Result<AnyObject> {
    tracing_debug!(bytes = text.len(), "reading root document");
    let value: Value = serde_json::from_str(text).map_err(|e| Error::JsonParseError(e.to_string()))?;
    let mut resolver = Resolver::new();
    let decoded = decode_json_value(&value, &mut resolver)?;
    resolver.finalize()?;
    decoded.as_retained().cloned().ok_or_else(|| Error::MalformedSchema {
        schema: "<root>".to_string(),
        detail: "top-level document is not a schema-tagged object".to_string(),
    })
}

pub fn deserialize_json_from_file(path: &Path) -> Result<AnyObject> {
    let text = std::fs::read_to_string(path).map_err(|e| Error::FileOpenFailed {
        path: path.display().to_string(),
        detail: e.to_string(),
    })?;
    deserialize_json_from_string(&text)
}

fn decode_json_value(value: &Value, resolver: &mut Resolver) -> Result<AnyValue> {
    match value {
        Value::Null => Ok(AnyValue::Null),
        Value::Bool(b) => Ok(AnyValue::Bool(*b)),
        Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                Ok(AnyValue::Int(i))
            } else {
                Ok(AnyValue::Double(n.as_f64().unwrap_or(0.0)))
            }
        }
        Value::String(s) => Ok(AnyValue::String(s.clone())),
        Value::Array(items) => {
            let mut arr = crate::value::AnyArray::new();
            for item in items {
                arr.push(decode_json_value(item, resolver)?);
            }
            Ok(AnyValue::Array(arr))
        }
        Value::Object(map) => decode_object_value(map, resolver),
    }
}

fn f64_field(map: &Map<String, Value>, key: &str) -> Result<f64> {
    map.get(key)
        .and_then(Value::as_f64)
        .ok_or_else(|| Error::MalformedSchema {
            schema: "RationalTime.1".to_string(),
            detail: format!("missing or non-numeric field \"{key}\""),
        })
}

fn decode_rational_time(map: &Map<String, Value>) -> Result<RationalTime> {
    Ok(RationalTime::new(f64_field(map, "value")?, f64_field(map, "rate")?))
}

fn nested_object<'a>(map: &'a Map<String, Value>, key: &str, schema: &str) -> Result<&'a Map<String, Value>> {
    map.get(key)
        .and_then(Value::as_object)
        .ok_or_else(|| Error::MalformedSchema {
            schema: schema.to_string(),
            detail: format!("missing object field \"{key}\""),
        })
}

fn decode_v2d(map: &Map<String, Value>) -> Result<V2d> {
    Ok(V2d::new(f64_field(map, "x")?, f64_field(map, "y")?))
}

fn decode_box2d(map: &Map<String, Value>) -> Result<Box2d> {
    Ok(Box2d::new(
        decode_v2d(nested_object(map, "min", "Box2d.1")?)?,
        decode_v2d(nested_object(map, "max", "Box2d.1")?)?,
    ))
}

fn decode_time_range(map: &Map<String, Value>) -> Result<TimeRange> {
    Ok(TimeRange::new(
        decode_rational_time(nested_object(map, "start_time", "TimeRange.1")?)?,
        decode_rational_time(nested_object(map, "duration", "TimeRange.1")?)?,
    ))
}

fn decode_time_transform(map: &Map<String, Value>) -> Result<TimeTransform> {
    Ok(TimeTransform::new(
        decode_rational_time(nested_object(map, "offset", "TimeTransform.1")?)?,
        f64_field(map, "scale")?,
        f64_field(map, "rate")?,
    ))
}

fn decode_object_value(map: &Map<String, Value>, resolver: &mut Resolver) -> Result<AnyValue> {
    let Some(tag) = map.get("OTIO_SCHEMA").and_then(Value::as_str) else {
        let mut dict = AnyDictionary::new();
        for (k, v) in map {
            dict.insert(k.clone(), decode_json_value(v, resolver)?);
        }
        return Ok(AnyValue::Dict(dict));
    };

    match tag {
        "RationalTime.1" => Ok(AnyValue::RationalTime(decode_rational_time(map)?)),
        "TimeRange.1" => Ok(AnyValue::TimeRange(decode_time_range(map)?)),
        "TimeTransform.1" => Ok(AnyValue::TimeTransform(decode_time_transform(map)?)),
        "V2d.1" => Ok(AnyValue::Point(decode_v2d(map)?)),
        "Box2d.1" => Ok(AnyValue::Box(decode_box2d(map)?)),
        "SerializableObjectRef.1" => {
            let id = map.get("id").and_then(Value::as_str).ok_or_else(|| Error::MalformedSchema {
                schema: tag.to_string(),
                detail: "missing \"id\" field".to_string(),
            })?;
            resolver
                .get(id)
                .map(AnyValue::Retained)
                .ok_or_else(|| Error::UnresolvedObjectReference(id.to_string()))
        }
        tag => {
            let (schema_name, version_str) = tag.rsplit_once('.').ok_or_else(|| Error::MalformedSchema {
                schema: tag.to_string(),
                detail: "missing version suffix".to_string(),
            })?;
            let version: i64 = version_str.parse().map_err(|_| Error::MalformedSchema {
                schema: tag.to_string(),
                detail: "non-numeric version".to_string(),
            })?;
            let schema_name = schema_name.to_string();
            let id = resolver.allocate_id(&schema_name);

            let mut dict = AnyDictionary::new();
            for (k, v) in map {
                if k == "OTIO_SCHEMA" {
                    continue;
                }
                dict.insert(k.clone(), decode_json_value(v, resolver)?);
            }

            let object = TypeRegistry::global().instance_from_schema(&schema_name, version, dict, resolver)?;
            resolver.register(id, object.clone())?;
            Ok(AnyValue::Retained(object))
        }
    }
}

// ---------------------------------------------------------------------
// Per-schema builders, dispatched from `TypeRegistry::instance_from_schema`.
// ---------------------------------------------------------------------

pub fn decode_unknown_schema(schema_name: &str, version: i64, dict: AnyDictionary) -> Result<AnyObject> {
    Ok(AnyObject::UnknownSchema(Retainer::new(UnknownSchema::new(schema_name, version, dict))))
}

pub fn decode_known_schema(schema_name: &str, dict: AnyDictionary, _resolver: &mut Resolver) -> Result<AnyObject> {
    match schema_name {
        "Track" => build_track(dict),
        "Stack" => build_stack(dict),
        "Clip" => build_clip(dict),
        "Gap" => build_gap(dict),
        "Transition" => build_transition(dict),
        "Effect" => build_effect(dict),
        "Marker" => build_marker(dict),
        "ExternalReference" => build_external_reference(dict),
        "MissingReference" => build_missing_reference(dict),
        "GeneratorReference" => build_generator_reference(dict),
        "ImageSequenceReference" => build_image_sequence_reference(dict),
        other => Err(Error::internal(format!("registry named an unimplemented builtin builder: {other}"))),
    }
}

fn string_field(dict: &AnyDictionary, key: &str) -> String {
    dict.get(key).and_then(AnyValue::as_str).unwrap_or("").to_string()
}

fn metadata_field(dict: &AnyDictionary) -> AnyDictionary {
    match dict.get("metadata") {
        Some(AnyValue::Dict(d)) => d.clone(),
        _ => AnyDictionary::new(),
    }
}

fn time_range_field(dict: &AnyDictionary, key: &str) -> Option<TimeRange> {
    match dict.get(key) {
        Some(AnyValue::TimeRange(r)) => Some(*r),
        _ => None,
    }
}

fn rational_time_field(dict: &AnyDictionary, key: &str) -> RationalTime {
    dict.get(key).and_then(AnyValue::as_rational_time).unwrap_or(RationalTime::new(0.0, 1.0))
}

fn i64_field(dict: &AnyDictionary, key: &str) -> i64 {
    dict.get(key).and_then(AnyValue::as_i64).unwrap_or(0)
}

fn f64_dict_field(dict: &AnyDictionary, key: &str) -> f64 {
    dict.get(key).and_then(AnyValue::as_f64).unwrap_or(0.0)
}

fn decode_effects(dict: &AnyDictionary) -> Result<Vec<Retainer<Effect>>> {
    let Some(AnyValue::Array(arr)) = dict.get("effects") else {
        return Ok(Vec::new());
    };
    let mut out = Vec::new();
    let mut cursor = arr.cursor();
    while let Some(item) = arr.next(&mut cursor) {
        if let AnyValue::Retained(AnyObject::Effect(e)) = item? {
            out.push(e.clone());
        }
    }
    Ok(out)
}

fn decode_markers(dict: &AnyDictionary) -> Result<Vec<Retainer<Marker>>> {
    let Some(AnyValue::Array(arr)) = dict.get("markers") else {
        return Ok(Vec::new());
    };
    let mut out = Vec::new();
    let mut cursor = arr.cursor();
    while let Some(item) = arr.next(&mut cursor) {
        if let AnyValue::Retained(AnyObject::Marker(m)) = item? {
            out.push(m.clone());
        }
    }
    Ok(out)
}

fn decode_children(dict: &AnyDictionary) -> Result<Vec<Retainer<Composable>>> {
    let Some(AnyValue::Array(arr)) = dict.get("children") else {
        return Ok(Vec::new());
    };
    let mut out = Vec::new();
    let mut cursor = arr.cursor();
    while let Some(item) = arr.next(&mut cursor) {
        if let AnyValue::Retained(AnyObject::Composable(c)) = item? {
            out.push(c.clone());
        }
    }
    Ok(out)
}

fn item_base(dict: &AnyDictionary) -> Result<ItemBase> {
    Ok(ItemBase {
        composable: ComposableBase {
            serializable: SerializableObjectBase { metadata: metadata_field(dict) },
            name: string_field(dict, "name"),
            parent: WeakRetainer::new(),
        },
        source_range: time_range_field(dict, "source_range"),
        effects: decode_effects(dict)?,
        markers: decode_markers(dict)?,
    })
}

fn attach_children(parent: &Retainer<Composable>, children: Vec<Retainer<Composable>>) -> Result<()> {
    for child in children {
        object::append_child(parent, child)?;
    }
    Ok(())
}

fn build_track(dict: AnyDictionary) -> Result<AnyObject> {
    let item = item_base(&dict)?;
    let kind = match dict.get("kind").and_then(AnyValue::as_str) {
        Some("Audio") => TrackKind::Audio,
        _ => TrackKind::Video,
    };
    let children = decode_children(&dict)?;
    let retainer = Retainer::new(Composable::Track(Track {
        item,
        children: Vec::new(),
        kind,
    }));
    attach_children(&retainer, children)?;
    Ok(AnyObject::Composable(retainer))
}

fn build_stack(dict: AnyDictionary) -> Result<AnyObject> {
    let item = item_base(&dict)?;
    let children = decode_children(&dict)?;
    let retainer = Retainer::new(Composable::Stack(Stack { item, children: Vec::new() }));
    attach_children(&retainer, children)?;
    Ok(AnyObject::Composable(retainer))
}

fn build_clip(dict: AnyDictionary) -> Result<AnyObject> {
    let item = item_base(&dict)?;
    let media_reference = match dict.get("media_reference") {
        Some(AnyValue::Retained(AnyObject::MediaReference(m))) => Some(m.clone()),
        _ => None,
    };
    let active_media_reference_key = match dict.get("active_media_reference_key") {
        Some(AnyValue::String(s)) => Some(s.clone()),
        _ => None,
    };
    Ok(AnyObject::Composable(Retainer::new(Composable::Clip(Clip {
        item,
        media_reference,
        active_media_reference_key,
    }))))
}

fn build_gap(dict: AnyDictionary) -> Result<AnyObject> {
    let item = item_base(&dict)?;
    Ok(AnyObject::Composable(Retainer::new(Composable::Gap(Gap { item }))))
}

fn build_transition(dict: AnyDictionary) -> Result<AnyObject> {
    Ok(AnyObject::Composable(Retainer::new(Composable::Transition(Transition {
        base: ComposableBase {
            serializable: SerializableObjectBase { metadata: metadata_field(&dict) },
            name: string_field(&dict, "name"),
            parent: WeakRetainer::new(),
        },
        in_offset: rational_time_field(&dict, "in_offset"),
        out_offset: rational_time_field(&dict, "out_offset"),
        transition_type: string_field(&dict, "transition_type"),
    }))))
}

fn build_effect(dict: AnyDictionary) -> Result<AnyObject> {
    Ok(AnyObject::Effect(Retainer::new(Effect {
        base: SerializableObjectBase { metadata: metadata_field(&dict) },
        name: string_field(&dict, "name"),
        effect_name: string_field(&dict, "effect_name"),
    })))
}

fn build_marker(dict: AnyDictionary) -> Result<AnyObject> {
    Ok(AnyObject::Marker(Retainer::new(Marker {
        base: SerializableObjectBase { metadata: metadata_field(&dict) },
        name: string_field(&dict, "name"),
        marked_range: time_range_field(&dict, "marked_range").unwrap_or(TimeRange::new(
            RationalTime::new(0.0, 1.0),
            RationalTime::new(0.0, 1.0),
        )),
        color: string_field(&dict, "color"),
    })))
}

fn build_external_reference(dict: AnyDictionary) -> Result<AnyObject> {
    Ok(AnyObject::MediaReference(Retainer::new(MediaReference::External(ExternalReference {
        base: SerializableObjectBase { metadata: metadata_field(&dict) },
        name: string_field(&dict, "name"),
        target_url: string_field(&dict, "target_url"),
        available_range: time_range_field(&dict, "available_range"),
    }))))
}

fn build_missing_reference(dict: AnyDictionary) -> Result<AnyObject> {
    Ok(AnyObject::MediaReference(Retainer::new(MediaReference::Missing(MissingReference {
        base: SerializableObjectBase { metadata: metadata_field(&dict) },
        name: string_field(&dict, "name"),
        available_range: time_range_field(&dict, "available_range"),
    }))))
}

fn build_generator_reference(dict: AnyDictionary) -> Result<AnyObject> {
    let parameters = match dict.get("parameters") {
        Some(AnyValue::Dict(d)) => d.clone(),
        _ => AnyDictionary::new(),
    };
    Ok(AnyObject::MediaReference(Retainer::new(MediaReference::Generator(GeneratorReference {
        base: SerializableObjectBase { metadata: metadata_field(&dict) },
        name: string_field(&dict, "name"),
        generator_kind: string_field(&dict, "generator_kind"),
        parameters,
        available_range: time_range_field(&dict, "available_range"),
    }))))
}

fn build_image_sequence_reference(dict: AnyDictionary) -> Result<AnyObject> {
    Ok(AnyObject::MediaReference(Retainer::new(MediaReference::ImageSequence(ImageSequenceReference {
        base: SerializableObjectBase { metadata: metadata_field(&dict) },
        name: string_field(&dict, "name"),
        target_url_base: string_field(&dict, "target_url_base"),
        name_prefix: string_field(&dict, "name_prefix"),
        name_suffix: string_field(&dict, "name_suffix"),
        start_frame: i64_field(&dict, "start_frame"),
        frame_step: i64_field(&dict, "frame_step"),
        rate: f64_dict_field(&dict, "rate"),
        frame_zero_padding: i64_field(&dict, "frame_zero_padding"),
        available_range: time_range_field(&dict, "available_range"),
    }))))
}
