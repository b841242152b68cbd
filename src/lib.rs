// ABOUTME: Library root for stackpilot - exposes the deployment engine and its collaborators.
// ABOUTME: The main binary is in main.rs.

pub mod config;
pub mod deploy;
pub mod diagnostics;
pub mod error;
pub mod hooks;
pub mod output;
pub mod parameters;
pub mod pipeline;
pub mod remote;
pub mod status;
pub mod template;
pub mod types;
