// ABOUTME: Shared helper for reaching the stack service.
// ABOUTME: Builds the HTTP adapter from the service section of the config.

use stackpilot::config::Config;
use stackpilot::error::Result;
use stackpilot::remote::HttpStackService;

pub fn connect_service(config: &Config) -> Result<HttpStackService> {
    let endpoint = config.endpoint()?;
    let service = HttpStackService::new(endpoint, config.service.region.clone())?;
    tracing::debug!(endpoint, region = %config.service.region, "using stack service");
    Ok(service)
}
