use crate::core::error::ChatError;
use crate::providers::base_client::{HttpClient, HttpReply, Transport};
use crate::providers::{Message, ProviderConfig, ShapeRequest};
use serde::Deserialize;
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

/// Lifecycle of a single dispatch. Both end states are terminal; a failed
/// call is never resumed or retried.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DispatchPhase {
    Idle,
    Building,
    InFlight,
    Succeeded,
    Failed,
}

impl DispatchPhase {
    pub fn is_terminal(self) -> bool {
        matches!(self, DispatchPhase::Succeeded | DispatchPhase::Failed)
    }

    pub fn can_advance_to(self, next: DispatchPhase) -> bool {
        use DispatchPhase::*;
        matches!(
            (self, next),
            (Idle, Building)
                | (Building, InFlight)
                | (Building, Failed)
                | (InFlight, Succeeded)
                | (InFlight, Failed)
        )
    }
}

struct PhaseTracker {
    phase: DispatchPhase,
}

impl PhaseTracker {
    fn new() -> Self {
        Self {
            phase: DispatchPhase::Idle,
        }
    }

    fn advance(&mut self, next: DispatchPhase) {
        debug_assert!(
            self.phase.can_advance_to(next),
            "illegal dispatch transition {:?} -> {:?}",
            self.phase,
            next
        );
        debug!(from = ?self.phase, to = ?next, "dispatch phase");
        self.phase = next;
    }

    fn finish<T>(&mut self, result: Result<T, ChatError>) -> Result<T, ChatError> {
        match &result {
            Ok(_) => self.advance(DispatchPhase::Succeeded),
            Err(e) => {
                debug!(error = %e, "dispatch failed");
                self.advance(DispatchPhase::Failed);
            }
        }
        result
    }
}

#[derive(Deserialize)]
struct ErrorEnvelope {
    error: ErrorBody,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum ErrorBody {
    Detailed { message: String },
    Text(String),
}

/// Best-effort human readable message for a non-2xx reply.
pub fn error_message(reply: &HttpReply) -> String {
    match serde_json::from_str::<ErrorEnvelope>(&reply.body) {
        Ok(ErrorEnvelope {
            error: ErrorBody::Detailed { message } | ErrorBody::Text(message),
        }) if !message.trim().is_empty() => message,
        _ => format!("API request failed: {}", reply.status),
    }
}

/// Turns a transcript into one provider request and its reply.
#[derive(Clone)]
pub struct Dispatcher {
    transport: Arc<dyn Transport>,
}

impl Dispatcher {
    pub fn new(transport: Arc<dyn Transport>) -> Self {
        Self { transport }
    }

    pub fn with_http(timeout: Option<Duration>) -> Result<Self, ChatError> {
        Ok(Self::new(Arc::new(HttpClient::new(timeout)?)))
    }

    pub async fn dispatch(
        &self,
        config: &ProviderConfig,
        system_prompt: &str,
        transcript: &[Message],
    ) -> Result<String, ChatError> {
        let mut tracker = PhaseTracker::new();
        let profile = config.provider.profile();
        let strategy = profile.shape.strategy();

        tracker.advance(DispatchPhase::Building);
        let built = config.ensure_credential().and_then(|_| {
            strategy.build_request(&ShapeRequest {
                model: &config.model,
                system_prompt,
                transcript,
            })
        });
        let payload = match built {
            Ok(payload) => payload,
            Err(e) => return tracker.finish(Err(e)),
        };

        let mut headers = vec![(
            "Authorization".to_string(),
            format!("Bearer {}", config.credential),
        )];
        headers.extend(
            profile
                .extra_headers
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string())),
        );

        tracker.advance(DispatchPhase::InFlight);
        debug!(
            provider = %config.provider,
            model = %config.model,
            endpoint = %config.endpoint,
            messages = transcript.len(),
            "dispatching request"
        );
        let result = match self
            .transport
            .post_json(&config.endpoint, &headers, &payload)
            .await
        {
            Ok(reply) if reply.is_success() => strategy.parse_response(&reply.body),
            Ok(reply) => Err(ChatError::transport(
                Some(reply.status),
                error_message(&reply),
            )),
            Err(e) => Err(e),
        };

        tracker.finish(result)
    }
}
