//! Storage abstractions for service layer
//!
//! Contains the file-backed map store that domain stores build on so that
//! every entity persisted as a JSON object shares one load/save path.

pub mod json_map_store;
