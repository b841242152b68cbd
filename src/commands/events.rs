// ABOUTME: Events command implementation.
// ABOUTME: Prints the most recent operation's events in chronological order.

use super::connection::connect_service;
use stackpilot::config::Config;
use stackpilot::deploy::retrieve_stack_events;
use stackpilot::error::Result;
use stackpilot::output::{Output, OutputMode};
use stackpilot::remote::{StackEvent, StackService};

pub async fn events(config: Config, output: Output) -> Result<()> {
    let stack_name = config.stack_name()?;
    let service = connect_service(&config)?;

    let state = service.describe_stack(stack_name.as_str()).await?;
    let events = retrieve_stack_events(&service, &state.stack_id).await?;

    for event in &events {
        match output.mode() {
            OutputMode::Json => {
                if let Ok(json) = serde_json::to_string(event) {
                    println!("{json}");
                }
            }
            _ => println!("{}", format_event(event)),
        }
    }
    Ok(())
}

fn format_event(event: &StackEvent) -> String {
    let timestamp = event
        .timestamp
        .map(|t| t.format("%Y-%m-%d %H:%M:%S").to_string())
        .unwrap_or_else(|| "-".to_string());
    let mut line = format!(
        "{timestamp}  {:<24} {:<32} {}",
        event.logical_resource_id, event.resource_type, event.resource_status
    );
    if let Some(reason) = &event.resource_status_reason {
        line.push_str(&format!("  {reason}"));
    }
    line
}
