//! OpenAI-compatible chat-completions scoring engine.

use std::fmt::Write as _;

use serde::{Deserialize, Serialize};

use podium_config::ScoringConfig;
use podium_core::rubric::{Dimension, SUB_SCORE_MAX, SUB_SCORE_MIN};

use crate::engine::ScoringEngine;
use crate::error::EngineError;
use crate::http::check_response;
use crate::verdict::{RawVerdict, parse_verdict};

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    temperature: f32,
    messages: [ChatMessage<'a>; 2],
    response_format: ResponseFormat,
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Serialize)]
struct ResponseFormat {
    #[serde(rename = "type")]
    kind: &'static str,
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: ReplyMessage,
}

#[derive(Deserialize)]
struct ReplyMessage {
    content: Option<String>,
}

/// Scores submissions through a `/chat/completions` endpoint.
pub struct ChatEngine {
    http: reqwest::Client,
    url: String,
    api_key: String,
    model: String,
    temperature: f32,
    system_prompt: String,
}

impl ChatEngine {
    /// Build a client from the `[scoring]` section.
    ///
    /// # Errors
    ///
    /// Returns `EngineError::Http` if the underlying `reqwest::Client` fails to build.
    pub fn from_config(config: &ScoringConfig) -> Result<Self, EngineError> {
        let http = reqwest::Client::builder()
            .user_agent("podium/0.1")
            .timeout(config.timeout())
            .build()?;
        Ok(Self {
            http,
            url: config.completions_url(),
            api_key: config.api_key.clone(),
            model: config.model.clone(),
            temperature: config.temperature,
            system_prompt: rubric_instructions(),
        })
    }

    fn request_body<'a>(&'a self, prompt: &'a str) -> ChatRequest<'a> {
        ChatRequest {
            model: &self.model,
            temperature: self.temperature,
            messages: [
                ChatMessage {
                    role: "system",
                    content: &self.system_prompt,
                },
                ChatMessage {
                    role: "user",
                    content: prompt,
                },
            ],
            response_format: ResponseFormat {
                kind: "json_object",
            },
        }
    }
}

impl ScoringEngine for ChatEngine {
    fn name(&self) -> &str {
        &self.model
    }

    async fn score(&self, prompt: &str) -> Result<RawVerdict, EngineError> {
        let mut request = self.http.post(&self.url).json(&self.request_body(prompt));
        if !self.api_key.is_empty() {
            request = request.bearer_auth(&self.api_key);
        }
        let resp = check_response(request.send().await?).await?;
        let data: ChatResponse = resp.json().await?;

        let reply = data
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .ok_or_else(|| EngineError::Malformed("reply has no message content".into()))?;

        tracing::debug!(model = %self.model, reply_chars = reply.len(), "engine replied");
        parse_verdict(&reply)
    }
}

/// System prompt describing the rubric and the expected reply shape.
#[must_use]
pub fn rubric_instructions() -> String {
    let mut out = String::from(
        "You are a hackathon judge. Score the latest submission of a project, using the \
         earlier submissions only as context.\n\nScore each dimension from ",
    );
    let _ = writeln!(out, "{SUB_SCORE_MIN} to {SUB_SCORE_MAX}:");
    for dimension in Dimension::ALL {
        let _ = writeln!(out, "- {} (weight {:.2})", dimension.as_str(), dimension.weight());
    }
    out.push_str(
        "\nReply with a single JSON object and nothing else:\n\
         {\"scores\": {<dimension>: <number>, ...}, \
         \"evidence\": [<short strengths grounded in the submission>], \
         \"gaps\": [<short missing pieces>]}",
    );
    out
}
