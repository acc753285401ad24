//! The two encoder "sinks" from spec.md §4.5: a JSON sink that emits tokens
//! to a streaming writer, and a cloning sink that builds a dynamic
//! dictionary tree (used for deep clone, structural equality, and downgrade
//! staging). Both implement [`Sink`]; [`crate::serialization::writer::Writer`]
//! is generic over it and doesn't care which one it's talking to.

use std::collections::{BTreeMap, HashMap};

use serde_json::{Map, Number, Value};

use crate::error::{Error, Result};
use crate::object::AnyObject;
use crate::registry::TypeRegistry;
use crate::serialization::resolver::Resolver;
use crate::value::{AnyDictionary, AnyValue, Box2d, V2d};
use crate::{RationalTime, TimeRange, TimeTransform};

pub trait Sink {
    /// True for the staging sink used to materialize an object purely as a
    /// nested `AnyDictionary` (downgrade staging); such a sink also applies
    /// downgrade functions to every object frame it closes. Everywhere else
    /// this is false.
    fn wants_anydict_objects(&self) -> bool {
        false
    }

    fn start_object(&mut self);
    fn end_object(&mut self) -> Result<()>;

    /// Like [`Sink::end_object`], but for a frame the Writer has assigned a
    /// reference id to (every schema-tagged object, as opposed to a plain
    /// nested dictionary value). The default just ignores the id; the
    /// cloning sink's `Clone` policy overrides this to remember which
    /// already-built clone `id` names, so a later [`Sink::write_object_ref`]
    /// for the same id resolves to that clone instead of a dangling marker.
    fn end_schema_object(&mut self, _id: &str) -> Result<()> {
        self.end_object()
    }

    fn start_array(&mut self);
    fn end_array(&mut self);
    fn write_key(&mut self, key: &str);
    fn write_null(&mut self);
    fn write_bool(&mut self, value: bool);
    fn write_i64(&mut self, value: i64);
    fn write_f64(&mut self, value: f64);
    fn write_str(&mut self, value: &str);
    fn write_rational_time(&mut self, value: RationalTime);
    fn write_time_range(&mut self, value: TimeRange);
    fn write_time_transform(&mut self, value: TimeTransform);
    fn write_point(&mut self, value: V2d);
    fn write_box(&mut self, value: Box2d);
    fn write_object_ref(&mut self, id: &str);
}

// ---------------------------------------------------------------------
// JSON sink
// ---------------------------------------------------------------------

enum JsonFrame {
    Object(Map<String, Value>, Option<String>),
    Array(Vec<Value>),
}

/// Emits JSON tokens by building a `serde_json::Value` tree (with
/// `preserve_order` so `"OTIO_SCHEMA"` stays the first member, per spec.md
/// §6). The tree is handed to a configurable pretty-printer at the end.
pub struct JsonEncoder {
    stack: Vec<JsonFrame>,
    root: Option<Value>,
}

impl JsonEncoder {
    pub fn new() -> Self {
        Self { stack: Vec::new(), root: None }
    }

    pub fn into_value(mut self) -> Value {
        self.root.take().unwrap_or(Value::Null)
    }

    fn store(&mut self, value: Value) {
        match self.stack.last_mut() {
            None => self.root = Some(value),
            Some(JsonFrame::Array(items)) => items.push(value),
            Some(JsonFrame::Object(map, key)) => {
                let key = key.take().expect("write_key before a value inside an object");
                map.insert(key, value);
            }
        }
    }
}

impl Default for JsonEncoder {
    fn default() -> Self {
        Self::new()
    }
}

fn rational_time_value(v: RationalTime) -> Value {
    let mut m = Map::new();
    m.insert("OTIO_SCHEMA".into(), Value::String("RationalTime.1".into()));
    m.insert("rate".into(), number(v.rate));
    m.insert("value".into(), number(v.value));
    Value::Object(m)
}

fn number(f: f64) -> Value {
    Number::from_f64(f).map(Value::Number).unwrap_or(Value::Null)
}

impl Sink for JsonEncoder {
    fn start_object(&mut self) {
        self.stack.push(JsonFrame::Object(Map::new(), None));
    }

    fn end_object(&mut self) -> Result<()> {
        match self.stack.pop() {
            Some(JsonFrame::Object(map, _)) => {
                self.store(Value::Object(map));
                Ok(())
            }
            _ => Err(Error::internal("end_object without matching start_object")),
        }
    }

    fn start_array(&mut self) {
        self.stack.push(JsonFrame::Array(Vec::new()));
    }

    fn end_array(&mut self) {
        if let Some(JsonFrame::Array(items)) = self.stack.pop() {
            self.store(Value::Array(items));
        }
    }

    fn write_key(&mut self, key: &str) {
        if let Some(JsonFrame::Object(_, cur_key)) = self.stack.last_mut() {
            *cur_key = Some(key.to_string());
        }
    }

    fn write_null(&mut self) {
        self.store(Value::Null);
    }

    fn write_bool(&mut self, value: bool) {
        self.store(Value::Bool(value));
    }

    fn write_i64(&mut self, value: i64) {
        self.store(Value::Number(Number::from(value)));
    }

    fn write_f64(&mut self, value: f64) {
        self.store(number(value));
    }

    fn write_str(&mut self, value: &str) {
        self.store(Value::String(value.to_string()));
    }

    fn write_rational_time(&mut self, value: RationalTime) {
        self.store(rational_time_value(value));
    }

    fn write_time_range(&mut self, value: TimeRange) {
        let mut m = Map::new();
        m.insert("OTIO_SCHEMA".into(), Value::String("TimeRange.1".into()));
        m.insert("duration".into(), rational_time_value(value.duration));
        m.insert("start_time".into(), rational_time_value(value.start_time));
        self.store(Value::Object(m));
    }

    fn write_time_transform(&mut self, value: TimeTransform) {
        let mut m = Map::new();
        m.insert("OTIO_SCHEMA".into(), Value::String("TimeTransform.1".into()));
        m.insert("offset".into(), rational_time_value(value.offset));
        m.insert("rate".into(), number(value.rate));
        m.insert("scale".into(), number(value.scale));
        self.store(Value::Object(m));
    }

    fn write_point(&mut self, value: V2d) {
        let mut m = Map::new();
        m.insert("OTIO_SCHEMA".into(), Value::String("V2d.1".into()));
        m.insert("x".into(), number(value.x));
        m.insert("y".into(), number(value.y));
        self.store(Value::Object(m));
    }

    fn write_box(&mut self, value: Box2d) {
        let mut m = Map::new();
        m.insert("OTIO_SCHEMA".into(), Value::String("Box2d.1".into()));
        let mut min = Map::new();
        min.insert("OTIO_SCHEMA".into(), Value::String("V2d.1".into()));
        min.insert("x".into(), number(value.min.x));
        min.insert("y".into(), number(value.min.y));
        let mut max = Map::new();
        max.insert("OTIO_SCHEMA".into(), Value::String("V2d.1".into()));
        max.insert("x".into(), number(value.max.x));
        max.insert("y".into(), number(value.max.y));
        m.insert("min".into(), Value::Object(min));
        m.insert("max".into(), Value::Object(max));
        self.store(Value::Object(m));
    }

    fn write_object_ref(&mut self, id: &str) {
        let mut m = Map::new();
        m.insert("OTIO_SCHEMA".into(), Value::String("SerializableObjectRef.1".into()));
        m.insert("id".into(), Value::String(id.to_string()));
        self.store(Value::Object(m));
    }
}

// ---------------------------------------------------------------------
// Cloning sink
// ---------------------------------------------------------------------

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum CloningPolicy {
    /// Keep math/time types concrete; object frames become plain
    /// `AnyValue::Dict`s (used by structural equality).
    Equality,
    /// Keep math/time types concrete; object frames are immediately handed
    /// to the type registry and become `AnyValue::Retained` (used by clone).
    Clone,
    /// Convert everything — including math/time types — into its
    /// `OTIO_SCHEMA`-tagged dictionary surrogate (used for downgrade
    /// staging; every object frame this sink closes is also downgraded in
    /// place if the manifest names its schema).
    AnyDictionary,
}

enum CloningFrame {
    Object(AnyDictionary, Option<String>),
    Array(Vec<AnyValue>),
}

pub struct CloningEncoder<'a> {
    policy: CloningPolicy,
    manifest: Option<&'a BTreeMap<String, i64>>,
    stack: Vec<CloningFrame>,
    root: Option<AnyValue>,
    resolver: Resolver,
    /// `Clone` policy only: reference id -> the clone already built for it,
    /// so a same-pass instancing reference resolves to that same clone
    /// rather than an inert `ObjectRef` marker.
    clone_ids: HashMap<String, AnyObject>,
}

impl<'a> CloningEncoder<'a> {
    pub fn new(policy: CloningPolicy, manifest: Option<&'a BTreeMap<String, i64>>) -> Self {
        Self {
            policy,
            manifest,
            stack: Vec::new(),
            root: None,
            resolver: Resolver::new(),
            clone_ids: HashMap::new(),
        }
    }

    pub fn into_value(mut self) -> Result<AnyValue> {
        self.resolver.finalize()?;
        Ok(self.root.take().unwrap_or(AnyValue::Null))
    }

    fn rational_time_surrogate(v: RationalTime) -> AnyValue {
        let mut d = AnyDictionary::new();
        d.insert("OTIO_SCHEMA", AnyValue::String("RationalTime.1".to_string()));
        d.insert("rate", AnyValue::Double(v.rate));
        d.insert("value", AnyValue::Double(v.value));
        AnyValue::Dict(d)
    }

    fn point_surrogate(v: V2d) -> AnyValue {
        let mut d = AnyDictionary::new();
        d.insert("OTIO_SCHEMA", AnyValue::String("V2d.1".to_string()));
        d.insert("x", AnyValue::Double(v.x));
        d.insert("y", AnyValue::Double(v.y));
        AnyValue::Dict(d)
    }

    fn box_surrogate(v: Box2d) -> AnyValue {
        let mut d = AnyDictionary::new();
        d.insert("OTIO_SCHEMA", AnyValue::String("Box2d.1".to_string()));
        d.insert("min", Self::point_surrogate(v.min));
        d.insert("max", Self::point_surrogate(v.max));
        AnyValue::Dict(d)
    }

    fn store(&mut self, value: AnyValue) {
        match self.stack.last_mut() {
            None => self.root = Some(value),
            Some(CloningFrame::Array(items)) => items.push(value),
            Some(CloningFrame::Object(dict, key)) => {
                let key = key.take().expect("write_key before a value inside an object");
                dict.insert(key, value);
            }
        }
    }

    fn finish_object_frame(&mut self) -> Result<AnyValue> {
        let Some(CloningFrame::Object(mut dict, _)) = self.stack.pop() else {
            return Err(Error::internal("end_object without matching start_object"));
        };

        if self.policy == CloningPolicy::AnyDictionary {
            if let Some(manifest) = self.manifest {
                TypeRegistry::global().downgrade_tagged_dict(&mut dict, manifest)?;
            }
            return Ok(AnyValue::Dict(dict));
        }

        if self.policy == CloningPolicy::Clone {
            let object = TypeRegistry::global().rehydrate(dict, &mut self.resolver)?;
            return Ok(AnyValue::Retained(object));
        }

        Ok(AnyValue::Dict(dict))
    }
}

impl<'a> Sink for CloningEncoder<'a> {
    fn wants_anydict_objects(&self) -> bool {
        self.policy == CloningPolicy::AnyDictionary
    }

    fn start_object(&mut self) {
        self.stack.push(CloningFrame::Object(AnyDictionary::new(), None));
    }

    fn end_object(&mut self) -> Result<()> {
        let value = self.finish_object_frame()?;
        self.store(value);
        Ok(())
    }

    fn end_schema_object(&mut self, id: &str) -> Result<()> {
        let value = self.finish_object_frame()?;
        if self.policy == CloningPolicy::Clone {
            if let AnyValue::Retained(object) = &value {
                self.clone_ids.insert(id.to_string(), object.clone());
            }
        }
        self.store(value);
        Ok(())
    }

    fn start_array(&mut self) {
        self.stack.push(CloningFrame::Array(Vec::new()));
    }

    fn end_array(&mut self) {
        if let Some(CloningFrame::Array(items)) = self.stack.pop() {
            self.store(AnyValue::Array(items.into_iter().collect()));
        }
    }

    fn write_key(&mut self, key: &str) {
        if let Some(CloningFrame::Object(_, cur_key)) = self.stack.last_mut() {
            *cur_key = Some(key.to_string());
        }
    }

    fn write_null(&mut self) {
        self.store(AnyValue::Null);
    }

    fn write_bool(&mut self, value: bool) {
        self.store(AnyValue::Bool(value));
    }

    fn write_i64(&mut self, value: i64) {
        self.store(AnyValue::Int(value));
    }

    fn write_f64(&mut self, value: f64) {
        self.store(AnyValue::Double(value));
    }

    fn write_str(&mut self, value: &str) {
        self.store(AnyValue::String(value.to_string()));
    }

    fn write_rational_time(&mut self, value: RationalTime) {
        if self.policy == CloningPolicy::AnyDictionary {
            self.store(Self::rational_time_surrogate(value));
        } else {
            self.store(AnyValue::RationalTime(value));
        }
    }

    fn write_time_range(&mut self, value: TimeRange) {
        if self.policy == CloningPolicy::AnyDictionary {
            let mut d = AnyDictionary::new();
            d.insert("OTIO_SCHEMA", AnyValue::String("TimeRange.1".to_string()));
            d.insert("duration", Self::rational_time_surrogate(value.duration));
            d.insert("start_time", Self::rational_time_surrogate(value.start_time));
            self.store(AnyValue::Dict(d));
        } else {
            self.store(AnyValue::TimeRange(value));
        }
    }

    fn write_time_transform(&mut self, value: TimeTransform) {
        if self.policy == CloningPolicy::AnyDictionary {
            let mut d = AnyDictionary::new();
            d.insert("OTIO_SCHEMA", AnyValue::String("TimeTransform.1".to_string()));
            d.insert("offset", Self::rational_time_surrogate(value.offset));
            d.insert("rate", AnyValue::Double(value.rate));
            d.insert("scale", AnyValue::Double(value.scale));
            self.store(AnyValue::Dict(d));
        } else {
            self.store(AnyValue::TimeTransform(value));
        }
    }

    fn write_point(&mut self, value: V2d) {
        if self.policy == CloningPolicy::AnyDictionary {
            self.store(Self::point_surrogate(value));
        } else {
            self.store(AnyValue::Point(value));
        }
    }

    fn write_box(&mut self, value: Box2d) {
        if self.policy == CloningPolicy::AnyDictionary {
            self.store(Self::box_surrogate(value));
        } else {
            self.store(AnyValue::Box(value));
        }
    }

    fn write_object_ref(&mut self, id: &str) {
        if self.policy == CloningPolicy::Clone {
            if let Some(object) = self.clone_ids.get(id) {
                self.store(AnyValue::Retained(object.clone()));
                return;
            }
        }
        self.store(AnyValue::ObjectRef(crate::value::ObjectRefId::new(id)));
    }
}
