// ABOUTME: JSON-over-HTTP adapter for the orchestration service.
// ABOUTME: One HTTP/1.1 connection per call using hyper over a tokio TCP stream.

use async_trait::async_trait;
use bytes::Bytes;
use http_body_util::{BodyExt, Full};
use hyper::{Request, StatusCode, Uri};
use hyper_util::rt::TokioIo;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tokio::net::TcpStream;

use super::{RemoteError, StackEvent, StackService, StackState};
use crate::deploy::DeployRequest;
use crate::types::StackId;

// =============================================================================
// Wire Types
// =============================================================================

#[derive(Serialize)]
#[serde(rename_all = "PascalCase")]
struct StackNameInput<'a> {
    stack_name: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    next_token: Option<&'a str>,
}

#[derive(Deserialize)]
#[serde(rename_all = "PascalCase")]
struct DescribeStacksOutput {
    #[serde(default)]
    stacks: Vec<StackState>,
}

#[derive(Deserialize)]
#[serde(rename_all = "PascalCase")]
struct StackIdOutput {
    stack_id: StackId,
}

#[derive(Deserialize)]
#[serde(rename_all = "PascalCase")]
struct DescribeStackEventsOutput {
    #[serde(default)]
    stack_events: Vec<StackEvent>,
    #[serde(default)]
    next_token: Option<String>,
}

#[derive(Deserialize)]
#[serde(rename_all = "PascalCase")]
struct ErrorBody {
    #[serde(alias = "code")]
    code: String,
    #[serde(default, alias = "message")]
    message: String,
}

/// Map a non-success response into a remote error.
fn decode_error(status: StatusCode, body: &[u8]) -> RemoteError {
    match serde_json::from_slice::<ErrorBody>(body) {
        Ok(err) => RemoteError::from_code(err.code, err.message),
        Err(_) => RemoteError::other(
            format!("Http{}", status.as_u16()),
            String::from_utf8_lossy(body).into_owned(),
        ),
    }
}

fn transport(action: &str, what: &str, e: impl std::fmt::Display) -> RemoteError {
    RemoteError::transport(format!("{action}: {what}: {e}"))
}

// =============================================================================
// Client
// =============================================================================

/// Stack service reached through a plain HTTP endpoint.
///
/// Each action is `POST {endpoint}/{Action}` with a PascalCase JSON body.
/// Request signing and TLS belong to whatever fronts the endpoint.
#[derive(Debug, Clone)]
pub struct HttpStackService {
    host: String,
    port: u16,
    base_path: String,
    region: String,
}

impl HttpStackService {
    pub fn new(endpoint: &str, region: impl Into<String>) -> Result<Self, RemoteError> {
        let invalid = |reason: String| RemoteError::other("InvalidEndpoint", reason);

        let uri: Uri = endpoint
            .parse()
            .map_err(|e| invalid(format!("{endpoint}: {e}")))?;

        match uri.scheme_str() {
            Some("http") => {}
            Some(scheme) => {
                return Err(invalid(format!(
                    "unsupported scheme '{scheme}' in {endpoint}; use a local proxy for TLS"
                )));
            }
            None => return Err(invalid(format!("{endpoint}: missing scheme"))),
        }

        let host = uri
            .host()
            .ok_or_else(|| invalid(format!("{endpoint}: missing host")))?
            .to_string();

        Ok(Self {
            host,
            port: uri.port_u16().unwrap_or(80),
            base_path: uri.path().trim_end_matches('/').to_string(),
            region: region.into(),
        })
    }

    fn action_path(&self, action: &str) -> String {
        format!("{}/{}", self.base_path, action)
    }

    async fn call<B, R>(&self, action: &str, body: &B) -> Result<R, RemoteError>
    where
        B: Serialize + Sync,
        R: DeserializeOwned,
    {
        let payload = serde_json::to_vec(body).map_err(|e| transport(action, "encode", e))?;

        let stream = TcpStream::connect((self.host.as_str(), self.port))
            .await
            .map_err(|e| transport(action, "connect", e))?;
        let io = TokioIo::new(stream);

        let (mut sender, conn) = hyper::client::conn::http1::handshake(io)
            .await
            .map_err(|e| transport(action, "handshake", e))?;

        tokio::spawn(async move {
            if let Err(e) = conn.await {
                tracing::warn!("stack service connection error: {}", e);
            }
        });

        let req = Request::builder()
            .method("POST")
            .uri(self.action_path(action))
            .header("Host", format!("{}:{}", self.host, self.port))
            .header("Content-Type", "application/json")
            .header("X-Stack-Region", &self.region)
            .body(Full::new(Bytes::from(payload)))
            .map_err(|e| transport(action, "build request", e))?;

        tracing::debug!(action, host = %self.host, "calling stack service");

        let resp = sender
            .send_request(req)
            .await
            .map_err(|e| transport(action, "request", e))?;

        let status = resp.status();
        let body = resp
            .into_body()
            .collect()
            .await
            .map_err(|e| transport(action, "read response", e))?
            .to_bytes();

        if !status.is_success() {
            return Err(decode_error(status, &body));
        }

        serde_json::from_slice(&body).map_err(|e| transport(action, "decode response", e))
    }
}

#[async_trait]
impl StackService for HttpStackService {
    async fn describe_stack(&self, name_or_id: &str) -> Result<StackState, RemoteError> {
        let input = StackNameInput {
            stack_name: name_or_id,
            next_token: None,
        };
        let output: DescribeStacksOutput = self.call("DescribeStacks", &input).await?;
        output.stacks.into_iter().next().ok_or_else(|| {
            RemoteError::validation(format!("Stack with id {name_or_id} does not exist"))
        })
    }

    async fn create_stack(&self, request: &DeployRequest) -> Result<StackId, RemoteError> {
        let output: StackIdOutput = self.call("CreateStack", request).await?;
        Ok(output.stack_id)
    }

    async fn update_stack(&self, request: &DeployRequest) -> Result<StackId, RemoteError> {
        let output: StackIdOutput = self.call("UpdateStack", request).await?;
        Ok(output.stack_id)
    }

    async fn list_stack_events(&self, stack_id: &StackId) -> Result<Vec<StackEvent>, RemoteError> {
        let mut events = Vec::new();
        let mut next_token: Option<String> = None;

        loop {
            let input = StackNameInput {
                stack_name: stack_id.as_str(),
                next_token: next_token.as_deref(),
            };
            let page: DescribeStackEventsOutput = self.call("DescribeStackEvents", &input).await?;
            events.extend(page.stack_events);

            match page.next_token {
                Some(token) if !token.is_empty() => next_token = Some(token),
                _ => return Ok(events),
            }
        }
    }
}
