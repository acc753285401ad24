//! The dynamic value (spec.md §3 "Dynamic value" / §4.2): a tagged sum that
//! everything the Writer/Reader handles ultimately reduces to.

use super::any_array::AnyArray;
use super::any_dictionary::AnyDictionary;
use super::geometry::{Box2d, V2d};
use super::object_ref::ObjectRefId;
use crate::object::AnyObject;
use crate::{RationalTime, TimeRange, TimeTransform};

#[derive(Clone, Debug)]
pub enum AnyValue {
    Null,
    Bool(bool),
    Int(i64),
    Double(f64),
    String(String),
    RationalTime(RationalTime),
    TimeRange(TimeRange),
    TimeTransform(TimeTransform),
    Point(V2d),
    Box(Box2d),
    ObjectRef(ObjectRefId),
    Retained(AnyObject),
    Array(AnyArray),
    Dict(AnyDictionary),
}

impl AnyValue {
    pub fn type_name(&self) -> &'static str {
        match self {
            AnyValue::Null => "null",
            AnyValue::Bool(_) => "bool",
            AnyValue::Int(_) => "int",
            AnyValue::Double(_) => "double",
            AnyValue::String(_) => "string",
            AnyValue::RationalTime(_) => "RationalTime",
            AnyValue::TimeRange(_) => "TimeRange",
            AnyValue::TimeTransform(_) => "TimeTransform",
            AnyValue::Point(_) => "V2d",
            AnyValue::Box(_) => "Box2d",
            AnyValue::ObjectRef(_) => "SerializableObjectRef",
            AnyValue::Retained(_) => "SerializableObject",
            AnyValue::Array(_) => "array",
            AnyValue::Dict(_) => "dict",
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            AnyValue::String(s) => Some(s.as_str()),
            _ => None,
        }
    }

    pub fn as_dict(&self) -> Option<&AnyDictionary> {
        match self {
            AnyValue::Dict(d) => Some(d),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            AnyValue::Int(i) => Some(*i),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            AnyValue::Double(d) => Some(*d),
            AnyValue::Int(i) => Some(*i as f64),
            _ => None,
        }
    }

    pub fn as_rational_time(&self) -> Option<RationalTime> {
        match self {
            AnyValue::RationalTime(r) => Some(*r),
            _ => None,
        }
    }

    pub fn as_time_range(&self) -> Option<TimeRange> {
        match self {
            AnyValue::TimeRange(r) => Some(*r),
            _ => None,
        }
    }

    pub fn as_retained(&self) -> Option<&AnyObject> {
        match self {
            AnyValue::Retained(o) => Some(o),
            _ => None,
        }
    }
}

impl From<&str> for AnyValue {
    fn from(value: &str) -> Self {
        AnyValue::String(value.to_string())
    }
}

impl From<String> for AnyValue {
    fn from(value: String) -> Self {
        AnyValue::String(value)
    }
}

impl From<i64> for AnyValue {
    fn from(value: i64) -> Self {
        AnyValue::Int(value)
    }
}

impl From<f64> for AnyValue {
    fn from(value: f64) -> Self {
        AnyValue::Double(value)
    }
}

impl From<bool> for AnyValue {
    fn from(value: bool) -> Self {
        AnyValue::Bool(value)
    }
}

impl From<RationalTime> for AnyValue {
    fn from(value: RationalTime) -> Self {
        AnyValue::RationalTime(value)
    }
}

impl From<TimeRange> for AnyValue {
    fn from(value: TimeRange) -> Self {
        AnyValue::TimeRange(value)
    }
}

/// Content equality. `Retained` compares by pointer identity (two distinct
/// in-memory entities are never "equal" as `AnyValue`s even if structurally
/// identical — use [`crate::equality`] for structural equality across
/// separate object graphs).
impl PartialEq for AnyValue {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (AnyValue::Null, AnyValue::Null) => true,
            (AnyValue::Bool(a), AnyValue::Bool(b)) => a == b,
            (AnyValue::Int(a), AnyValue::Int(b)) => a == b,
            (AnyValue::Double(a), AnyValue::Double(b)) => a == b,
            (AnyValue::String(a), AnyValue::String(b)) => a == b,
            (AnyValue::RationalTime(a), AnyValue::RationalTime(b)) => a == b,
            (AnyValue::TimeRange(a), AnyValue::TimeRange(b)) => a == b,
            (AnyValue::TimeTransform(a), AnyValue::TimeTransform(b)) => a == b,
            (AnyValue::Point(a), AnyValue::Point(b)) => a == b,
            (AnyValue::Box(a), AnyValue::Box(b)) => a == b,
            (AnyValue::ObjectRef(a), AnyValue::ObjectRef(b)) => a == b,
            (AnyValue::Retained(a), AnyValue::Retained(b)) => a.identity() == b.identity(),
            (AnyValue::Array(a), AnyValue::Array(b)) => a == b,
            (AnyValue::Dict(a), AnyValue::Dict(b)) => a == b,
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn primitive_conversions() {
        assert_eq!(AnyValue::from(1i64), AnyValue::Int(1));
        assert_eq!(AnyValue::from("x"), AnyValue::String("x".to_string()));
        assert_eq!(AnyValue::from(true), AnyValue::Bool(true));
    }

    #[test]
    fn different_variants_are_never_equal() {
        assert_ne!(AnyValue::Int(1), AnyValue::Double(1.0));
    }
}
