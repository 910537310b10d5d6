//! Cross-cutting runtime services shared by the gateway binary.

pub mod telemetry;
