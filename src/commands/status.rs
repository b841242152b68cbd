// ABOUTME: Status command implementation.
// ABOUTME: Describes the configured stack and prints its status and outputs.

use super::connection::connect_service;
use stackpilot::config::Config;
use stackpilot::deploy::simplify_outputs;
use stackpilot::error::Result;
use stackpilot::output::{Output, OutputMode};
use stackpilot::remote::StackService;

pub async fn status(config: Config, output: Output) -> Result<()> {
    let stack_name = config.stack_name()?;
    let service = connect_service(&config)?;

    let state = match service.describe_stack(stack_name.as_str()).await {
        Ok(state) => state,
        Err(e) if e.is_stack_missing() => {
            output.success(&format!("Stack {stack_name} does not exist"));
            return Ok(());
        }
        Err(e) => return Err(e.into()),
    };

    if output.mode() == OutputMode::Json {
        println!("{}", serde_json::to_string(&state).unwrap_or_default());
        return Ok(());
    }

    println!("Stack:  {}", state.stack_name);
    println!("Id:     {}", state.stack_id);
    match &state.stack_status_reason {
        Some(reason) => println!("Status: {} ({})", state.stack_status, reason),
        None => println!("Status: {}", state.stack_status),
    }
    if state.stack_status.indicates_failure() {
        println!("Details: {}", config.service.console_link(&state.stack_id));
    }
    output.outputs(&simplify_outputs(&state.outputs));
    Ok(())
}
