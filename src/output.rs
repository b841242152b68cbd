// ABOUTME: Progress reporting and CLI output formatting.
// ABOUTME: Supports normal, quiet (CI), and JSON output modes plus an in-memory sink.

use parking_lot::Mutex;
use serde::Serialize;
use std::fmt;
use std::io::Write;
use std::time::{Duration, Instant};

use crate::deploy::{OutputMap, ResourceAction};

/// One line of deployment progress.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum ProgressEvent {
    /// Stack status observed on a poll tick.
    Status {
        stack: String,
        status: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        reason: Option<String>,
        #[serde(with = "humantime_serde", skip_serializing_if = "Option::is_none")]
        next_check: Option<Duration>,
    },
    /// First sighting of a resource in the current operation.
    Resource {
        action: ResourceAction,
        logical_id: String,
        resource_type: String,
    },
    /// A resource that failed during the current operation.
    ResourceFailed {
        logical_id: String,
        resource_type: String,
        status: String,
        reason: String,
    },
    /// Where to look for the full failure detail.
    ConsoleLink { url: String },
    Notice { message: String },
}

impl fmt::Display for ProgressEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProgressEvent::Status {
                stack,
                status,
                reason,
                next_check,
            } => {
                write!(f, "{stack}: {status}")?;
                if let Some(reason) = reason {
                    write!(f, " ({reason})")?;
                }
                if let Some(delay) = next_check {
                    write!(f, " - next check in {}", format_delay(*delay))?;
                }
                Ok(())
            }
            ProgressEvent::Resource {
                action,
                logical_id,
                resource_type,
            } => write!(f, "  {action} {logical_id} ({resource_type})"),
            ProgressEvent::ResourceFailed {
                logical_id,
                resource_type,
                status,
                reason,
            } => write!(f, "  ✗ {logical_id} ({resource_type}) {status}: {reason}"),
            ProgressEvent::ConsoleLink { url } => write!(f, "  → details: {url}"),
            ProgressEvent::Notice { message } => f.write_str(message),
        }
    }
}

fn format_delay(delay: Duration) -> String {
    if delay.subsec_millis() == 0 {
        format!("{}s", delay.as_secs())
    } else {
        format!("{}ms", delay.as_millis())
    }
}

/// Receives progress from the deployment engine.
pub trait ProgressSink: Send + Sync {
    fn emit(&self, event: ProgressEvent);
}

/// Output mode for CLI feedback.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputMode {
    /// Human-friendly output with progress messages
    Normal,
    /// Minimal output for CI (failures and final result)
    Quiet,
    /// JSON lines for scripting
    Json,
}

/// Handles CLI output based on the configured mode.
pub struct Output {
    mode: OutputMode,
    start_time: Option<Instant>,
}

impl Output {
    pub fn new(mode: OutputMode) -> Self {
        Self {
            mode,
            start_time: None,
        }
    }

    pub fn mode(&self) -> OutputMode {
        self.mode
    }

    /// Start timing an operation.
    pub fn start_timer(&mut self) {
        self.start_time = Some(Instant::now());
    }

    /// Get elapsed time since timer started.
    pub fn elapsed_secs(&self) -> f64 {
        self.start_time
            .map(|t| t.elapsed().as_secs_f64())
            .unwrap_or(0.0)
    }

    /// Print a progress message (suppressed in quiet/json mode).
    pub fn progress(&self, message: &str) {
        if self.mode == OutputMode::Normal {
            println!("{message}");
        }
    }

    /// Print a warning.
    pub fn warning(&self, message: &str) {
        match self.mode {
            OutputMode::Normal | OutputMode::Quiet => eprintln!("Warning: {message}"),
            OutputMode::Json => self.print_json("warning", message, &mut std::io::stderr()),
        }
    }

    /// Print a success message with optional timing.
    pub fn success(&self, message: &str) {
        match self.mode {
            OutputMode::Normal => {
                let elapsed = self.elapsed_secs();
                if elapsed > 0.0 {
                    println!("{message} ({:.1}s)", elapsed);
                } else {
                    println!("{message}");
                }
            }
            OutputMode::Quiet => println!("{message}"),
            OutputMode::Json => self.print_json("success", message, &mut std::io::stdout()),
        }
    }

    /// Print an error message.
    pub fn error(&self, message: &str) {
        match self.mode {
            OutputMode::Normal | OutputMode::Quiet => eprintln!("Error: {message}"),
            OutputMode::Json => self.print_json("error", message, &mut std::io::stderr()),
        }
    }

    /// Print stack outputs as `key = value` lines, or one JSON object.
    pub fn outputs(&self, outputs: &OutputMap) {
        match self.mode {
            OutputMode::Normal => {
                if outputs.is_empty() {
                    return;
                }
                println!("Outputs:");
                for (key, value) in outputs.iter() {
                    println!("  {key} = {value}");
                }
            }
            OutputMode::Quiet => {}
            OutputMode::Json => {
                let event = JsonOutputs {
                    event: "outputs",
                    outputs,
                };
                if let Ok(json) = serde_json::to_string(&event) {
                    println!("{json}");
                }
            }
        }
    }

    fn print_json(&self, event: &str, message: &str, out: &mut dyn Write) {
        let event = JsonEvent {
            event,
            message,
            duration_secs: self.start_time.map(|_| self.elapsed_secs()),
        };
        if let Ok(json) = serde_json::to_string(&event) {
            let _ = writeln!(out, "{json}");
        }
    }
}

impl ProgressSink for Output {
    fn emit(&self, event: ProgressEvent) {
        match self.mode {
            OutputMode::Normal => println!("{event}"),
            OutputMode::Quiet => {
                if matches!(
                    event,
                    ProgressEvent::ResourceFailed { .. } | ProgressEvent::ConsoleLink { .. }
                ) {
                    eprintln!("{event}");
                }
            }
            OutputMode::Json => {
                if let Ok(json) = serde_json::to_string(&event) {
                    println!("{json}");
                }
            }
        }
    }
}

#[derive(Serialize)]
struct JsonEvent<'a> {
    event: &'a str,
    message: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    duration_secs: Option<f64>,
}

#[derive(Serialize)]
struct JsonOutputs<'a> {
    event: &'a str,
    outputs: &'a OutputMap,
}

/// Sink that keeps every event in memory, for embedding and tests.
#[derive(Debug, Default)]
pub struct MemorySink {
    events: Mutex<Vec<ProgressEvent>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<ProgressEvent> {
        self.events.lock().clone()
    }

    /// Events rendered the way the normal CLI output prints them.
    pub fn lines(&self) -> Vec<String> {
        self.events.lock().iter().map(ToString::to_string).collect()
    }
}

impl ProgressSink for MemorySink {
    fn emit(&self, event: ProgressEvent) {
        self.events.lock().push(event);
    }
}
