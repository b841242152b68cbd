// ABOUTME: Status polling configuration.
// ABOUTME: Initial delay, backoff cap, and an optional overall bound per wait.

use serde::Deserialize;
use std::time::Duration;

use super::deserialize::deserialize_nonzero_delay;

#[derive(Debug, Clone, Deserialize)]
pub struct PollConfig {
    #[serde(default = "default_initial_delay", deserialize_with = "deserialize_nonzero_delay")]
    pub initial_delay: Duration,

    #[serde(default = "default_max_delay", deserialize_with = "deserialize_nonzero_delay")]
    pub max_delay: Duration,

    /// Give up waiting after this long. Unbounded when absent.
    #[serde(default, with = "humantime_serde")]
    pub timeout: Option<Duration>,
}

fn default_initial_delay() -> Duration {
    Duration::from_secs(2)
}

fn default_max_delay() -> Duration {
    Duration::from_secs(15)
}

impl Default for PollConfig {
    fn default() -> Self {
        PollConfig {
            initial_delay: default_initial_delay(),
            max_delay: default_max_delay(),
            timeout: None,
        }
    }
}
