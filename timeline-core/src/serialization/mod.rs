//! The versioned JSON serialization engine: two encoder sinks, a Writer
//! that walks the object graph into either sink, a Reader that parses JSON
//! back into the graph, a Resolver bridging forward references, and a
//! downgrade manifest resolving named compatibility targets (spec.md §4.5,
//! §4.4).

pub mod downgrade_manifest;
pub mod encoder;
pub mod reader;
pub mod resolver;
pub mod writer;

pub use reader::{deserialize_json_from_file, deserialize_json_from_string};
pub use resolver::Resolver;
pub use writer::{serialize_json_to_file, serialize_json_to_string, serialize_json_to_string_indented};
