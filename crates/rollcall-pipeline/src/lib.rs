//! rollcall-pipeline — boundary to the external biometric tools.
//!
//! The actual face work (sample capture, feature encoding, matching) lives
//! in external scripts. This crate runs them as blocking subprocesses and
//! reads back the status file the recognizer leaves behind.

pub mod gateway;
pub mod result;

pub use gateway::{Gateway, GatewayError};
pub use result::{read_result, RecognitionResult, ResultError};
