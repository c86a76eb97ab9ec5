//! ChatGPT adapter.
//!
//! Implements the `cgr-core` model port over the conversational backend
//! endpoint: one POST per turn, server-sent events streaming cumulative
//! reply snapshots until a `[DONE]` marker.

use async_trait::async_trait;

use serde_json::json;
use uuid::Uuid;

use cgr_core::{
    config::Config,
    errors::Error,
    model::{
        client::ChatModel,
        types::{Completion, CompletionChunk, CompletionRequest},
    },
    Result,
};

use tracing::warn;

#[derive(Clone, Debug)]
pub struct ChatGptClient {
    api_base: String,
    access_token: String,
    model: String,
    http: reqwest::Client,
}

impl ChatGptClient {
    pub fn new(cfg: &Config) -> Result<Self> {
        // No request timeout: a slow turn stalls only its own relay
        // operation, and cutting the stream mid-reply loses the tail.
        let http = reqwest::Client::builder()
            .build()
            .map_err(|e| Error::Backend(format!("http client build failed: {e}")))?;

        Ok(Self {
            api_base: cfg.chatgpt_api_base.trim_end_matches('/').to_string(),
            access_token: cfg.openai_api_key.clone(),
            model: cfg.chatgpt_model.clone(),
            http,
        })
    }
}

#[async_trait]
impl ChatModel for ChatGptClient {
    async fn send_message(
        &self,
        req: CompletionRequest,
        on_progress: &mut (dyn FnMut(CompletionChunk) -> Result<()> + Send),
    ) -> Result<Completion> {
        let body = build_request_body(&req, &self.model);

        let resp = self
            .http
            .post(format!("{}/conversation", self.api_base))
            .bearer_auth(&self.access_token)
            .header(reqwest::header::ACCEPT, "text/event-stream")
            .json(&body)
            .send()
            .await
            .map_err(|e| Error::Backend(format!("conversation request error: {e}")))?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            if status == reqwest::StatusCode::UNAUTHORIZED
                || status == reqwest::StatusCode::FORBIDDEN
            {
                return Err(Error::Backend(format!(
                    "{status}: session token may have expired"
                )));
            }
            return Err(Error::Backend(format!(
                "conversation request failed: {status} {}",
                snippet(&body)
            )));
        }

        // SSE framing: accumulate bytes, process complete lines. Events are
        // `data: {json}` with cumulative text; `data: [DONE]` terminates.
        let mut resp = resp;
        let mut buf = String::new();
        let mut last: Option<ConversationEvent> = None;
        let mut done = false;

        while let Some(chunk) = resp
            .chunk()
            .await
            .map_err(|e| Error::Backend(format!("conversation stream error: {e}")))?
        {
            buf.push_str(&String::from_utf8_lossy(&chunk));
            while let Some(pos) = buf.find('\n') {
                let line = buf[..pos].trim().to_string();
                buf.drain(..=pos);

                match parse_sse_line(&line) {
                    Some(SseLine::Done) => {
                        done = true;
                    }
                    Some(SseLine::Event(ev)) => {
                        on_progress(CompletionChunk {
                            text: ev.text.clone(),
                        })?;
                        last = Some(ev);
                    }
                    None => {}
                }
            }
            if done {
                break;
            }
        }

        let last = last.ok_or_else(|| {
            Error::Backend("conversation stream ended without a completion".to_string())
        })?;

        Ok(Completion {
            text: last.text,
            conversation_id: last.conversation_id,
            id: last.message_id,
        })
    }
}

fn build_request_body(req: &CompletionRequest, model: &str) -> serde_json::Value {
    // The backend requires a parent id even on the first turn.
    let parent = req
        .parent_message_id
        .clone()
        .unwrap_or_else(|| Uuid::new_v4().to_string());

    let mut body = json!({
        "action": "next",
        "messages": [{
            "id": Uuid::new_v4().to_string(),
            "role": "user",
            "content": {
                "content_type": "text",
                "parts": [req.text],
            },
        }],
        "model": model,
        "parent_message_id": parent,
    });

    if let Some(cid) = &req.conversation_id {
        body["conversation_id"] = json!(cid);
    }

    body
}

#[derive(Clone, Debug, PartialEq, Eq)]
struct ConversationEvent {
    text: String,
    conversation_id: Option<String>,
    message_id: String,
}

#[derive(Clone, Debug, PartialEq, Eq)]
enum SseLine {
    Event(ConversationEvent),
    Done,
}

/// Decode one SSE line. Non-data lines and malformed payloads yield `None`;
/// the stream is tolerated rather than failed for them.
fn parse_sse_line(line: &str) -> Option<SseLine> {
    let data = line.strip_prefix("data:")?.trim_start();
    if data == "[DONE]" {
        return Some(SseLine::Done);
    }

    let v: serde_json::Value = match serde_json::from_str(data) {
        Ok(v) => v,
        Err(e) => {
            warn!("skipping malformed conversation event: {e}");
            return None;
        }
    };

    let message = v.get("message")?;
    let message_id = message.get("id")?.as_str()?.to_string();
    let text = message
        .get("content")
        .and_then(|c| c.get("parts"))
        .and_then(|p| p.as_array())
        .and_then(|p| p.first())
        .and_then(|p| p.as_str())
        .unwrap_or_default()
        .to_string();
    let conversation_id = v
        .get("conversation_id")
        .and_then(|c| c.as_str())
        .map(|s| s.to_string());

    Some(SseLine::Event(ConversationEvent {
        text,
        conversation_id,
        message_id,
    }))
}

fn snippet(s: &str) -> String {
    s.chars().take(200).collect()
}
