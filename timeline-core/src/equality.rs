//! Deep clone and structural equality, both built on the Cloning sink
//! (spec.md §4.7, §8): clone re-materializes a whole new graph, preserving
//! shared-instance structure within the copy; `is_equivalent_to` compares
//! two graphs by shape and value rather than by identity. Doubles compare
//! by IEEE-754 `==`, so `NaN` is unequal to everything including itself
//! (spec.md §4.7) — §8's round-trip property excludes `NaN`-valued members
//! for exactly that reason.

use crate::error::Result;
use crate::object::AnyObject;
use crate::serialization::encoder::{CloningEncoder, CloningPolicy};
use crate::serialization::writer::Writer;
use crate::value::AnyValue;
use crate::Error;

/// Deep-copies `obj` and everything it retains into a fresh, independent
/// object graph. An object referenced more than once within `obj`'s graph
/// is referenced (not duplicated) the same number of times in the copy.
pub fn clone(obj: &AnyObject) -> Result<AnyObject> {
    let mut encoder = CloningEncoder::new(CloningPolicy::Clone, None);
    {
        let mut writer = Writer::new(&mut encoder, None, true);
        writer.write_value(None, &AnyValue::Retained(obj.clone()))?;
    }
    let value = encoder.into_value()?;
    value
        .as_retained()
        .cloned()
        .ok_or_else(|| Error::internal("clone did not produce a schema-tagged object"))
}

/// Structural equality: `true` if `a` and `b` have the same schema shape and
/// field values at every depth, regardless of whether they're the same
/// in-memory instance. `NaN` doubles are never equal to anything, including
/// another `NaN` (spec.md §4.7).
pub fn is_equivalent_to(a: &AnyObject, b: &AnyObject) -> Result<bool> {
    if a.identity() == b.identity() {
        return Ok(true);
    }
    let da = as_dict_value(a)?;
    let db = as_dict_value(b)?;
    Ok(values_equivalent(&da, &db))
}

fn as_dict_value(obj: &AnyObject) -> Result<AnyValue> {
    let mut encoder = CloningEncoder::new(CloningPolicy::Equality, None);
    {
        // No instancing: equality doesn't need to tell a shared sub-object
        // apart from an independently-equal duplicate, and disabling it
        // avoids `ObjectCycle` bookkeeping that clone/write need but
        // equality doesn't.
        let mut writer = Writer::new(&mut encoder, None, false);
        writer.write_value(None, &AnyValue::Retained(obj.clone()))?;
    }
    encoder.into_value()
}

fn values_equivalent(a: &AnyValue, b: &AnyValue) -> bool {
    match (a, b) {
        (AnyValue::Double(x), AnyValue::Double(y)) => x == y,
        (AnyValue::RationalTime(x), AnyValue::RationalTime(y)) => {
            rational_time_equivalent(*x, *y)
        }
        (AnyValue::TimeRange(x), AnyValue::TimeRange(y)) => {
            rational_time_equivalent(x.start_time, y.start_time) && rational_time_equivalent(x.duration, y.duration)
        }
        (AnyValue::TimeTransform(x), AnyValue::TimeTransform(y)) => {
            rational_time_equivalent(x.offset, y.offset)
                && float_equivalent(x.scale, y.scale)
                && float_equivalent(x.rate, y.rate)
        }
        (AnyValue::Array(x), AnyValue::Array(y)) => {
            if x.len() != y.len() {
                return false;
            }
            let (mut xc, mut yc) = (x.cursor(), y.cursor());
            loop {
                match (x.next(&mut xc), y.next(&mut yc)) {
                    (Some(Ok(xi)), Some(Ok(yi))) => {
                        if !values_equivalent(xi, yi) {
                            return false;
                        }
                    }
                    (None, None) => return true,
                    _ => return false,
                }
            }
        }
        (AnyValue::Dict(x), AnyValue::Dict(y)) => {
            if x.len() != y.len() {
                return false;
            }
            let mut cursor = x.cursor();
            while let Some(entry) = x.next(&mut cursor) {
                let Ok((k, xv)) = entry else { return false };
                match y.get(k) {
                    Some(yv) => {
                        if !values_equivalent(xv, yv) {
                            return false;
                        }
                    }
                    None => return false,
                }
            }
            true
        }
        _ => a == b,
    }
}

fn float_equivalent(x: f64, y: f64) -> bool {
    x == y
}

fn rational_time_equivalent(x: crate::RationalTime, y: crate::RationalTime) -> bool {
    float_equivalent(x.value, y.value) && float_equivalent(x.rate, y.rate)
}
