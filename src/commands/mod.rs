// ABOUTME: Command module aggregator for the stackpilot CLI.
// ABOUTME: Re-exports deploy, status, and events command handlers.

mod connection;
mod deploy;
mod events;
mod status;

pub use deploy::{DeployArgs, deploy};
pub use events::events;
pub use status::status;
