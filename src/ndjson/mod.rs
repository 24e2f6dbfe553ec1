//! NDJSON / JSON Lines input
//!
//! Finds and reads multi-line JSON files so the schema core can stay pure:
//! everything here produces already-decoded `serde_json::Value`s.

mod reader;

pub use reader::{
    list_multiline_json_in_dir, read_multiline_json, read_multiline_json_from_dir,
    read_multiline_json_with_details, JsonLine, JsonLines,
};
