//! Service layer for the garden map.
//! - Owns persistence of marker records and the rules around them
//!   (id assignment, validation, merge on update).
//! - Keeps HTTP concerns out: callers map `ServiceError` to responses.

pub mod errors;
pub mod storage;
pub mod markers;
pub mod runtime;
