//! State module for tracking check progress
//!
//! # Components
//!
//! - `HostState`: per-host request counts and pacing, owned by one host worker

mod host_state;

// Re-export main types
pub use host_state::HostState;
