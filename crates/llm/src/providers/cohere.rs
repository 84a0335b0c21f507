use async_trait::async_trait;
use serde_json::json;
use tracing::debug;

use crate::provider::{LlmError, LlmProvider, Message, Role};

/// Cohere `/v1/chat`. The last user message is sent as `message`, system
/// messages become the `preamble`, everything else goes to `chat_history`.
pub struct CohereProvider {
    client: reqwest::Client,
    api_key: String,
    model: String,
    base_url: String,
}

impl CohereProvider {
    pub fn new(api_key: String, model: String, base_url: String) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_key,
            model,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }
}

#[async_trait]
impl LlmProvider for CohereProvider {
    async fn complete(
        &self,
        messages: Vec<Message>,
        temperature: f32,
        max_tokens: u32,
    ) -> Result<String, LlmError> {
        let url = format!("{}/v1/chat", self.base_url);

        let last_user = messages
            .iter()
            .rposition(|m| m.role == Role::User)
            .ok_or_else(|| LlmError::ParseError("Cohere chat needs a user message".into()))?;

        let preamble = messages
            .iter()
            .filter(|m| m.role == Role::System)
            .map(|m| m.content.as_str())
            .collect::<Vec<_>>()
            .join("\n");

        let chat_history: Vec<serde_json::Value> = messages[..last_user]
            .iter()
            .filter(|m| m.role != Role::System)
            .map(|m| {
                json!({
                    "role": if m.role == Role::User { "USER" } else { "CHATBOT" },
                    "message": m.content,
                })
            })
            .collect();

        let mut body = json!({
            "model": self.model,
            "message": messages[last_user].content,
            "temperature": temperature,
            "max_tokens": max_tokens,
        });
        if !preamble.is_empty() {
            body["preamble"] = json!(preamble);
        }
        if !chat_history.is_empty() {
            body["chat_history"] = json!(chat_history);
        }

        debug!("Cohere request to {}", url);

        let response = self
            .client
            .post(&url)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .header("Content-Type", "application/json")
            .json(&body)
            .send()
            .await?;

        let status = response.status().as_u16();
        if status != 200 {
            let body = response.text().await.unwrap_or_default();
            return Err(LlmError::ApiError { status, body });
        }

        let resp: serde_json::Value = response.json().await?;
        let content = resp["text"]
            .as_str()
            .ok_or_else(|| LlmError::ParseError("missing text".into()))?
            .to_string();

        Ok(content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{body_partial_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn maps_roles_onto_cohere_fields() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/chat"))
            .and(header("authorization", "Bearer co-key"))
            .and(body_partial_json(json!({
                "model": "command-r",
                "message": "and now?",
                "preamble": "be brief",
                "chat_history": [
                    { "role": "USER", "message": "hi" },
                    { "role": "CHATBOT", "message": "hello" }
                ]
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "text": "Now." })))
            .expect(1)
            .mount(&server)
            .await;

        let provider = CohereProvider::new("co-key".into(), "command-r".into(), server.uri());
        let messages = vec![
            Message { role: Role::System, content: "be brief".into() },
            Message::user("hi"),
            Message { role: Role::Assistant, content: "hello".into() },
            Message::user("and now?"),
        ];
        assert_eq!(provider.complete(messages, 0.3, 100).await.unwrap(), "Now.");
    }

    #[tokio::test]
    async fn rejected_key_surfaces_status() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(401).set_body_string("invalid api token"))
            .mount(&server)
            .await;

        let provider = CohereProvider::new("bad".into(), "command-r".into(), server.uri());
        let err = provider
            .complete(vec![Message::user("q")], 0.3, 10)
            .await
            .unwrap_err();
        assert!(matches!(err, LlmError::ApiError { status: 401, .. }));
    }

    #[tokio::test]
    async fn requires_a_user_message() {
        let provider = CohereProvider::new("k".into(), "m".into(), "http://127.0.0.1:9".into());
        let err = provider
            .complete(vec![Message { role: Role::System, content: "x".into() }], 0.0, 1)
            .await
            .unwrap_err();
        assert!(matches!(err, LlmError::ParseError(_)));
    }
}
