use std::time::Duration;

use async_trait::async_trait;
use futures_util::StreamExt;
use reqwest_eventsource::{retry, Error as EventSourceError, Event, EventSource};
use serde::Deserialize;
use tracing::{debug, warn};

use crate::application::{ChatStreamClient, CompletionRequest, FragmentStream};
use crate::domain::DomainError;


pub const DEFAULT_BASE_URL: &str = "https://api.anthropic.com";
const MESSAGES_PATH: &str = "/v1/messages";
const ANTHROPIC_API_VERSION: &str = "2023-06-01";
const PROVIDER: &str = "anthropic";

#[derive(serde::Serialize)]
struct ApiRequest<'a> {
    model: &'a str,
    max_tokens: u32,
    system: &'a str,
    messages: Vec<ApiMessage<'a>>,
    stream: bool,
}

#[derive(serde::Serialize)]
struct ApiMessage<'a> {
    role: &'a str,
    content: &'a str,
}

/// The subset of Messages API stream events that affect the reply text.
#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum StreamEvent {
    ContentBlockDelta { delta: Delta },
    MessageStop,
    Error { error: ApiError },
    #[serde(other)]
    Other,
}

#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum Delta {
    TextDelta { text: String },
    #[serde(other)]
    Other,
}

#[derive(Debug, Deserialize)]
struct ApiError {
    #[serde(rename = "type")]
    kind: String,
    message: String,
}

/// What one SSE message means for the fragment stream.
#[derive(Debug, PartialEq, Eq)]
enum Step {
    Fragment(String),
    Skip,
    Stop,
}

fn interpret(event: &str, data: &str) -> Result<Step, DomainError> {
    if data.is_empty() {
        return Ok(Step::Skip);
    }

    let parsed: StreamEvent = serde_json::from_str(data).map_err(|e| {
        DomainError::streaming(format!(
            "AnthropicStreamClient: malformed {event} event: {e}"
        ))
    })?;

    match parsed {
        StreamEvent::ContentBlockDelta {
            delta: Delta::TextDelta { text },
        } => Ok(Step::Fragment(text)),
        StreamEvent::MessageStop => Ok(Step::Stop),
        StreamEvent::Error { error } => Err(DomainError::streaming(format!(
            "AnthropicStreamClient: provider error {}: {}",
            error.kind, error.message
        ))),
        StreamEvent::ContentBlockDelta { .. } | StreamEvent::Other => Ok(Step::Skip),
    }
}

/// Streaming HTTP client for the Anthropic Messages API.
///
/// Implements [`ChatStreamClient`]: the request is sent with `stream: true`
/// and the `text/event-stream` body is read through an [`EventSource`],
/// yielding each `text_delta` as one fragment. The stream ends on
/// `message_stop`. A non-2xx status fails [`ChatStreamClient::stream`] itself;
/// an `error` event, a transport error or an early EOF surface as a
/// [`DomainError::StreamingFailure`] item.
///
/// Configuration is taken from the environment:
///
/// ```text
/// ANTHROPIC_API_KEY=sk-ant-...                  (required)
/// ANTHROPIC_BASE_URL=https://api.anthropic.com  (optional)
/// ```
///
/// Only a connect timeout is set. A reply may legitimately stream for minutes,
/// so there is no overall request timeout.
pub struct AnthropicStreamClient {
    client: reqwest::Client,
    api_key: String,
    /// Full endpoint URL (base + MESSAGES_PATH).
    url: String,
}

impl AnthropicStreamClient {
    pub fn new(api_key: impl Into<String>, base_url: impl Into<String>) -> Self {
        let base: String = base_url.into();
        let url = format!("{}{}", base.trim_end_matches('/'), MESSAGES_PATH);
        Self {
            client: reqwest::Client::builder()
                .connect_timeout(Duration::from_secs(10))
                .build()
                .unwrap_or_default(),
            api_key: api_key.into(),
            url,
        }
    }

    /// Construct from environment variables:
    ///
    /// | Variable             | Default                     |
    /// |----------------------|-----------------------------|
    /// | `ANTHROPIC_API_KEY`  | none; absence is an error   |
    /// | `ANTHROPIC_BASE_URL` | `https://api.anthropic.com` |
    pub fn from_env() -> Result<Self, DomainError> {
        let key = std::env::var("ANTHROPIC_API_KEY")
            .ok()
            .filter(|k| !k.trim().is_empty())
            .ok_or_else(|| {
                DomainError::authentication_missing("ANTHROPIC_API_KEY is not set")
            })?;
        let base = std::env::var("ANTHROPIC_BASE_URL")
            .unwrap_or_else(|_| DEFAULT_BASE_URL.to_string());
        Ok(Self::new(key, base))
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

/// Turn an event-source failure into a [`DomainError::StreamingFailure`].
async fn stream_error(error: EventSourceError) -> DomainError {
    match error {
        EventSourceError::InvalidStatusCode(status, response) => {
            let body = response.text().await.unwrap_or_default();
            warn!("AnthropicStreamClient: API returned {status}: {body}");
            DomainError::streaming(format!("AnthropicStreamClient: API returned {status}"))
        }
        EventSourceError::InvalidContentType(content_type, _) => DomainError::streaming(format!(
            "AnthropicStreamClient: unexpected content type {content_type:?}"
        )),
        EventSourceError::StreamEnded => {
            DomainError::streaming("AnthropicStreamClient: stream ended before message_stop")
        }
        other => {
            DomainError::streaming(format!("AnthropicStreamClient: stream interrupted: {other}"))
        }
    }
}

#[async_trait]
impl ChatStreamClient for AnthropicStreamClient {
    fn provider(&self) -> &str {
        PROVIDER
    }

    async fn stream(&self, request: CompletionRequest<'_>) -> Result<FragmentStream, DomainError> {
        let body = ApiRequest {
            model: request.settings.model(),
            max_tokens: request.settings.max_tokens(),
            system: request.system_prompt.as_str(),
            messages: request
                .messages
                .iter()
                .map(|m| ApiMessage {
                    role: m.role().as_str(),
                    content: m.content(),
                })
                .collect(),
            stream: true,
        };

        debug!(
            "AnthropicStreamClient: POST {} ({} messages)",
            self.url,
            body.messages.len()
        );

        // EventSource adds `accept: text/event-stream` itself.
        let builder = self
            .client
            .post(&self.url)
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", ANTHROPIC_API_VERSION)
            .json(&body);
        let mut events = EventSource::new(builder).map_err(|e| {
            DomainError::streaming(format!("AnthropicStreamClient: cannot build request: {e}"))
        })?;
        // A reply cannot be resumed, so a dropped connection ends the turn.
        events.set_retry_policy(Box::new(retry::Never));

        // The first item is `Open` once a 200 with the right content type arrived.
        match events.next().await {
            Some(Ok(_)) => {}
            Some(Err(e)) => {
                events.close();
                return Err(stream_error(e).await);
            }
            None => {
                return Err(DomainError::streaming(
                    "AnthropicStreamClient: connection closed before opening",
                ))
            }
        }

        let fragments = async_stream::stream! {
            let mut finished = false;

            while let Some(event) = events.next().await {
                let step = match event {
                    Ok(Event::Open) => continue,
                    Ok(Event::Message(message)) => interpret(&message.event, &message.data),
                    Err(e) => Err(stream_error(e).await),
                };

                match step {
                    Ok(Step::Fragment(text)) => yield Ok(text),
                    Ok(Step::Skip) => {}
                    Ok(Step::Stop) => {
                        finished = true;
                        break;
                    }
                    Err(e) => {
                        finished = true;
                        yield Err(e);
                        break;
                    }
                }
            }

            events.close();
            if !finished {
                yield Err(DomainError::streaming(
                    "AnthropicStreamClient: stream ended before message_stop",
                ));
            }
        };

        Ok(Box::pin(fragments))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn text_delta_becomes_fragment() {
        let step = interpret(
            "content_block_delta",
            r#"{"type":"content_block_delta","index":0,"delta":{"type":"text_delta","text":"Hel"}}"#,
        )
        .unwrap();
        assert_eq!(step, Step::Fragment("Hel".to_string()));
    }

    #[test]
    fn bookkeeping_events_are_skipped() {
        for (name, data) in [
            ("ping", r#"{"type":"ping"}"#),
            (
                "message_start",
                r#"{"type":"message_start","message":{"id":"msg_1","role":"assistant","content":[]}}"#,
            ),
            (
                "content_block_start",
                r#"{"type":"content_block_start","index":0,"content_block":{"type":"text","text":""}}"#,
            ),
            (
                "content_block_delta",
                r#"{"type":"content_block_delta","index":1,"delta":{"type":"input_json_delta","partial_json":"{"}}"#,
            ),
            (
                "message_delta",
                r#"{"type":"message_delta","delta":{"stop_reason":"end_turn"},"usage":{"output_tokens":3}}"#,
            ),
        ] {
            assert_eq!(interpret(name, data).unwrap(), Step::Skip, "{name}");
        }
    }

    #[test]
    fn message_stop_ends_stream() {
        let step = interpret("message_stop", r#"{"type":"message_stop"}"#).unwrap();
        assert_eq!(step, Step::Stop);
    }

    #[test]
    fn error_event_is_streaming_failure() {
        let err = interpret(
            "error",
            r#"{"type":"error","error":{"type":"overloaded_error","message":"Overloaded"}}"#,
        )
        .unwrap_err();
        assert!(err.is_streaming_failure());
        assert!(err.to_string().contains("overloaded_error"));
    }

    #[test]
    fn malformed_json_is_streaming_failure() {
        let err = interpret("content_block_delta", "{not json").unwrap_err();
        assert!(err.is_streaming_failure());
    }

    #[test]
    fn base_url_trailing_slash_is_trimmed() {
        let client = AnthropicStreamClient::new("key", "http://localhost:1234/");
        assert_eq!(client.url(), "http://localhost:1234/v1/messages");
    }
}
