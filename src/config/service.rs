// ABOUTME: Connection settings for the remote orchestration service.
// ABOUTME: Region, endpoint, and the console link template used in failure reports.

use serde::Deserialize;

use crate::types::StackId;

pub const DEFAULT_CONSOLE_URL: &str =
    "https://console.aws.amazon.com/cloudformation/home?region={region}#/stack/detail?stackId={stack_id}";

#[derive(Debug, Clone, Deserialize)]
pub struct ServiceConfig {
    #[serde(default = "default_region")]
    pub region: String,

    #[serde(default)]
    pub endpoint: Option<String>,

    #[serde(default = "default_console_url")]
    pub console_url: String,
}

fn default_region() -> String {
    "us-east-1".to_string()
}

fn default_console_url() -> String {
    DEFAULT_CONSOLE_URL.to_string()
}

impl Default for ServiceConfig {
    fn default() -> Self {
        ServiceConfig {
            region: default_region(),
            endpoint: None,
            console_url: default_console_url(),
        }
    }
}

impl ServiceConfig {
    /// Console page for a stack, with the identifier percent-encoded.
    pub fn console_link(&self, stack_id: &StackId) -> String {
        self.console_url
            .replace("{region}", &self.region)
            .replace("{stack_id}", &urlencoding::encode(stack_id.as_str()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn console_link_encodes_stack_id() {
        let config = ServiceConfig {
            region: "eu-west-1".to_string(),
            ..Default::default()
        };
        let id = StackId::new("arn:aws:cloudformation:eu-west-1:123:stack/web/abc");
        let link = config.console_link(&id);
        assert!(link.contains("region=eu-west-1"));
        assert!(link.ends_with("stackId=arn%3Aaws%3Acloudformation%3Aeu-west-1%3A123%3Astack%2Fweb%2Fabc"));
    }

    #[test]
    fn custom_template() {
        let config = ServiceConfig {
            region: "local".to_string(),
            endpoint: None,
            console_url: "http://ui/{region}/{stack_id}".to_string(),
        };
        assert_eq!(config.console_link(&StackId::new("s-1")), "http://ui/local/s-1");
    }
}
