//! OpenAI-compatible chat-completions client.

use async_trait::async_trait;
use serde::Deserialize;
use std::time::Duration;
use tracing::debug;

use super::{ModelError, ModelRequest, ReasoningModel};
use crate::config::ModelSettings;

/// Resolved connection settings for one model.
#[derive(Debug, Clone)]
pub struct ModelConfig {
    pub api_endpoint: String,
    pub api_key: String,
    pub model: String,
}

impl ModelConfig {
    /// Text model from config file settings, with env vars as fallback.
    /// Returns None if no API key is available from either source.
    pub fn from_settings(settings: &ModelSettings) -> Option<Self> {
        let settings = settings.clone().with_env_overrides();
        let api_key = settings.api_key.filter(|k| !k.trim().is_empty())?;
        Some(Self {
            api_endpoint: settings.api_endpoint,
            api_key,
            model: settings.model,
        })
    }

    /// Vision model from config file settings, with env vars as fallback.
    pub fn vision_from_settings(settings: &ModelSettings) -> Option<Self> {
        let vision_model = settings.clone().with_env_overrides().vision_model;
        Self::from_settings(settings).map(|cfg| Self {
            model: vision_model,
            ..cfg
        })
    }
}

pub struct OpenAiClient {
    config: ModelConfig,
    client: reqwest::Client,
}

impl OpenAiClient {
    pub fn new(config: ModelConfig, http_timeout: Duration) -> Result<Self, ModelError> {
        let client = reqwest::Client::builder()
            .timeout(http_timeout)
            .build()
            .map_err(|e| ModelError::transport(e.to_string()))?;
        Ok(Self { config, client })
    }

    fn build_payload(&self, request: &ModelRequest) -> serde_json::Value {
        let mut messages = Vec::new();
        if let Some(system) = &request.system {
            messages.push(serde_json::json!({ "role": "system", "content": system }));
        }

        let content = match &request.image {
            Some(image) => serde_json::json!([
                { "type": "text", "text": request.prompt },
                {
                    "type": "image_url",
                    "image_url": { "url": image.url, "detail": "high" }
                }
            ]),
            None => serde_json::Value::String(request.prompt.clone()),
        };
        messages.push(serde_json::json!({ "role": "user", "content": content }));

        serde_json::json!({
            "model": self.config.model,
            "messages": messages,
            "max_tokens": request.max_tokens,
            "temperature": 0.1,
            "response_format": { "type": "json_object" }
        })
    }
}

#[async_trait]
impl ReasoningModel for OpenAiClient {
    async fn complete(&self, request: ModelRequest) -> Result<String, ModelError> {
        let payload = self.build_payload(&request);
        debug!(model = %self.config.model, vision = request.image.is_some(), "sending model request");

        let response = self
            .client
            .post(&self.config.api_endpoint)
            .header("Authorization", format!("Bearer {}", self.config.api_key))
            .header("Content-Type", "application/json")
            .json(&payload)
            .send()
            .await
            .map_err(|e| ModelError::transport(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(ModelError::Transport {
                status: Some(status.as_u16()),
                message: body,
            });
        }

        let resp: ChatResponse = response
            .json()
            .await
            .map_err(|e| ModelError::Parse(format!("unexpected completion envelope: {}", e)))?;

        let content = resp
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .filter(|c| !c.trim().is_empty())
            .ok_or_else(|| ModelError::Parse("empty model response".to_string()))?;

        debug!(chars = content.len(), "model response received");
        Ok(content)
    }

    fn name(&self) -> &str {
        &self.config.model
    }
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatMessage,
}

#[derive(Debug, Deserialize)]
struct ChatMessage {
    content: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::ImagePayload;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    async fn serve_once(response: String) -> String {
        let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
        let addr = listener.local_addr().expect("addr");
        tokio::spawn(async move {
            if let Ok((mut socket, _)) = listener.accept().await {
                let mut buf = vec![0u8; 64 * 1024];
                let _ = socket.read(&mut buf).await;
                let _ = socket.write_all(response.as_bytes()).await;
                let _ = socket.shutdown().await;
            }
        });
        format!("http://{}/v1/chat/completions", addr)
    }

    fn http_response(status: &str, body: &str) -> String {
        format!(
            "HTTP/1.1 {status}\r\ncontent-type: application/json\r\ncontent-length: {}\r\nconnection: close\r\n\r\n{body}",
            body.len()
        )
    }

    fn client(endpoint: String) -> OpenAiClient {
        OpenAiClient::new(
            ModelConfig {
                api_endpoint: endpoint,
                api_key: "test-key".into(),
                model: "test-model".into(),
            },
            Duration::from_secs(5),
        )
        .expect("client")
    }

    #[test]
    fn payload_includes_image_part_when_present() {
        let c = client("http://127.0.0.1:1".into());
        let request = ModelRequest::new("describe").with_image(ImagePayload {
            url: "https://example.com/a.png".into(),
        });
        let payload = c.build_payload(&request);
        let content = &payload["messages"][0]["content"];
        assert_eq!(content[1]["image_url"]["url"], "https://example.com/a.png");
        assert_eq!(payload["response_format"]["type"], "json_object");
    }

    #[tokio::test]
    async fn returns_message_content_on_success() {
        let body = r#"{"choices":[{"message":{"content":"{\"groups\":[]}"}}]}"#;
        let endpoint = serve_once(http_response("200 OK", body)).await;
        let text = client(endpoint)
            .complete(ModelRequest::new("group these"))
            .await
            .expect("completion");
        assert_eq!(text, r#"{"groups":[]}"#);
    }

    #[tokio::test]
    async fn non_success_status_is_transport_error() {
        let endpoint = serve_once(http_response("500 Internal Server Error", "{}")).await;
        let err = client(endpoint)
            .complete(ModelRequest::new("group these"))
            .await
            .expect_err("should fail");
        assert!(matches!(
            err,
            ModelError::Transport {
                status: Some(500),
                ..
            }
        ));
    }

    #[tokio::test]
    async fn empty_choices_is_parse_error() {
        let endpoint = serve_once(http_response("200 OK", r#"{"choices":[]}"#)).await;
        let err = client(endpoint)
            .complete(ModelRequest::new("group these"))
            .await
            .expect_err("should fail");
        assert!(matches!(err, ModelError::Parse(_)));
    }
}
