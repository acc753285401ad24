//! Error kinds surfaced by the core. Every fallible operation returns this
//! type (or a value); the core never panics or aborts on a caller mistake —
//! see the per-variant docs below for which ones are reachable only through
//! malformed input versus which ones guard invariants a well-typed caller
//! can't violate (those are `debug_assert!`s instead, see `object::graph`).

use std::fmt;

pub type Result<T> = std::result::Result<T, Error>;

/// An entity's schema name, used to annotate errors with "offending entity"
/// context without the error type itself owning a strong reference (which
/// would keep the entity alive for as long as the error is in flight).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EntityRef {
    pub schema_name: String,
    pub name: Option<String>,
}

impl fmt::Display for EntityRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.name {
            Some(name) => write!(f, "{} \"{name}\"", self.schema_name),
            None => write!(f, "{}", self.schema_name),
        }
    }
}

#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum Error {
    #[error("not implemented: {0}")]
    NotImplemented(String),

    #[error("illegal index {index} (len {len})")]
    IllegalIndex { index: usize, len: usize },

    #[error("key not found: {0}")]
    KeyNotFound(String),

    #[error("internal error: {0}")]
    InternalError(String),

    #[error("unresolved object reference: {0}")]
    UnresolvedObjectReference(String),

    #[error("duplicate object reference id: {0}")]
    DuplicateObjectReference(String),

    #[error("malformed schema {schema}: {detail}")]
    MalformedSchema { schema: String, detail: String },

    #[error("JSON parse error: {0}")]
    JsonParseError(String),

    #[error("failed to open file {path}: {detail}")]
    FileOpenFailed { path: String, detail: String },

    #[error("failed to write file {path}: {detail}")]
    FileWriteFailed { path: String, detail: String },

    #[error("schema version unsupported: {schema_name}.{incoming_version} (current {current_version})")]
    SchemaVersionUnsupported {
        schema_name: String,
        incoming_version: i64,
        current_version: i64,
    },

    #[error("object is not a child of the given composition")]
    NotAChildOf,

    #[error("object is not a child")]
    NotAChild,

    #[error("object is not descended from the given composition")]
    NotDescendedFrom,

    #[error("invalid timecode rate: {0}")]
    InvalidTimecodeRate(f64),

    #[error("dropframe is only valid at 29.97 or 59.94, got {0}")]
    NonDropframeRate(f64),

    #[error("invalid timecode string: {0}")]
    InvalidTimecodeString(String),

    #[error("timecode frame field {frame} >= rate {rate}")]
    TimecodeRateMismatch { frame: i64, rate: f64 },

    #[error("invalid time string: {0}")]
    InvalidTimeString(String),

    #[error("negative value not allowed: {0}")]
    NegativeValue(String),

    #[error("object cycle detected{}", entity_suffix(.0))]
    ObjectCycle(Option<EntityRef>),

    #[error("type mismatch: expected {expected}, found {found}")]
    TypeMismatch { expected: String, found: String },

    // --- supplemented, per SPEC_FULL.md §7 ---
    #[error("rate must be > 0, got {0}")]
    InvalidRate(f64),

    #[error("{fps} is not a standard frame rate and 600*{fps} is not an integer")]
    NonStandardFps(f64),

    #[error("iterator invalidated by a structural mutation")]
    IteratorInvalidated,

    #[error("schema {schema_name} already registered at version {version} with a different factory")]
    SchemaConflict { schema_name: String, version: i64 },

    #[error("no downgrade path for {schema_name} from {from_version} to {to_version}")]
    NoDowngradePath {
        schema_name: String,
        from_version: i64,
        to_version: i64,
    },
}

fn entity_suffix(entity: &Option<EntityRef>) -> String {
    match entity {
        Some(e) => format!(" (schema {e})"),
        None => String::new(),
    }
}

impl Error {
    pub fn internal(detail: impl Into<String>) -> Self {
        Error::InternalError(detail.into())
    }
}
