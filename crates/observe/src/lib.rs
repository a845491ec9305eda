//! Logging initialization shared between the binaries of this
//! workspace.
pub mod tracing;
