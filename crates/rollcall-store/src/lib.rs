//! rollcall-store — flat-file persistence for the attendance workflow.
//!
//! Owns the student roster (`students.csv`) and the append-only
//! attendance log (`attendance.csv`).

pub mod store;

pub use store::{resolve_name, RecordStore, StoreError, Student, UNKNOWN_NAME};
