//! Preserves an entity whose `OTIO_SCHEMA` the running process's type
//! registry has no constructor for, so that reading and re-writing a
//! document that mentions a newer or third-party schema round-trips
//! losslessly (spec.md §4.6).

use crate::value::AnyDictionary;

#[derive(Clone, Debug)]
pub struct UnknownSchema {
    pub original_schema_name: String,
    pub original_schema_version: i64,
    pub data: AnyDictionary,
}

impl UnknownSchema {
    pub fn new(original_schema_name: impl Into<String>, original_schema_version: i64, data: AnyDictionary) -> Self {
        Self {
            original_schema_name: original_schema_name.into(),
            original_schema_version,
            data,
        }
    }
}
