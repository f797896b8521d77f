//! Create-or-duplicate listing workflow: modal controller, persistence
//! gateway seam, notifications, and the HTTP surface around them.

pub mod config;
pub mod error;
pub mod telemetry;
pub mod workflows;
