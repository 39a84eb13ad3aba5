//! Test helpers shared across crates.
//!
//! [`env`] serialises process-environment mutation behind RAII guards and
//! [`logs`] captures the events a closure emits through `tracing`.

pub mod env;
pub mod logs;
