use reqwest::header::{HeaderMap, HeaderValue, CONTENT_TYPE};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use spendcat_ingest::ImagePayload;

use crate::CategorizeError;

pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com";
pub const DEFAULT_MODEL: &str = "gemini-2.5-flash";
/// Checked when the configured variable is unset
pub const FALLBACK_API_KEY_ENV: &str = "GEMINI_API_KEY";

#[derive(Debug, Clone)]
pub struct GeminiClient {
    http: reqwest::Client,
    base_url: String,
    model: String,
    api_key: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateRequest {
    pub contents: Vec<Content>,
    pub generation_config: GenerationConfig,
}

#[derive(Debug, Clone, Serialize)]
pub struct Content {
    pub parts: Vec<Part>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Part {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub inline_data: Option<InlineData>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InlineData {
    pub mime_type: String,
    pub data: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationConfig {
    pub response_mime_type: String,
    pub response_schema: Value,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<ContentOut>,
}

#[derive(Debug, Deserialize)]
struct ContentOut {
    #[serde(default)]
    parts: Vec<PartOut>,
}

#[derive(Debug, Deserialize)]
struct PartOut {
    text: Option<String>,
}

/// Array of transaction objects; description, amount and category required.
pub fn transaction_schema() -> Value {
    json!({
        "type": "ARRAY",
        "items": {
            "type": "OBJECT",
            "properties": {
                "description": { "type": "STRING" },
                "amount": { "type": "NUMBER" },
                "category": { "type": "STRING" },
                "date": { "type": "STRING", "description": "YYYY-MM-DD format if available, else empty" },
                "originalSource": { "type": "STRING" }
            },
            "required": ["description", "amount", "category"]
        }
    })
}

/// Images first, then the instruction text, in one user turn.
pub fn build_request(prompt: &str, images: &[ImagePayload]) -> GenerateRequest {
    let mut parts: Vec<Part> = images
        .iter()
        .map(|img| Part {
            inline_data: Some(InlineData {
                mime_type: img.mime_type.clone(),
                data: img.data.clone(),
            }),
            text: None,
        })
        .collect();
    parts.push(Part {
        inline_data: None,
        text: Some(prompt.to_string()),
    });

    GenerateRequest {
        contents: vec![Content { parts }],
        generation_config: GenerationConfig {
            response_mime_type: "application/json".to_string(),
            response_schema: transaction_schema(),
        },
    }
}

/// Concatenate the text parts of the first candidate.
pub fn extract_text(body: &str) -> Result<String, CategorizeError> {
    let resp: GenerateResponse = serde_json::from_str(body)?;
    let text: String = resp
        .candidates
        .into_iter()
        .next()
        .and_then(|c| c.content)
        .map(|c| c.parts.into_iter().filter_map(|p| p.text).collect::<String>())
        .unwrap_or_default();

    if text.trim().is_empty() {
        return Err(CategorizeError::EmptyResponse);
    }
    Ok(text)
}

impl GeminiClient {
    pub fn new(base_url: impl Into<String>, model: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.into(),
            model: model.into(),
            api_key: api_key.into(),
        }
    }

    /// Read the key from `api_key_env`, falling back to `GEMINI_API_KEY`.
    pub fn from_env(base_url: &str, model: &str, api_key_env: &str) -> Result<Self, CategorizeError> {
        let key = [api_key_env, FALLBACK_API_KEY_ENV]
            .iter()
            .filter_map(|var| std::env::var(var).ok())
            .find(|v| !v.trim().is_empty())
            .ok_or_else(|| CategorizeError::MissingApiKey {
                var: api_key_env.to_string(),
            })?;
        Ok(Self::new(base_url, model, key))
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub fn endpoint(&self) -> String {
        format!(
            "{}/v1beta/models/{}:generateContent",
            self.base_url.trim_end_matches('/'),
            self.model
        )
    }

    /// Send one request and return the model's raw text answer.
    pub async fn generate(&self, request: &GenerateRequest) -> Result<String, CategorizeError> {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.insert(
            "x-goog-api-key",
            HeaderValue::from_str(&self.api_key).map_err(|_| CategorizeError::InvalidApiKey)?,
        );

        let parts: usize = request.contents.iter().map(|c| c.parts.len()).sum();
        tracing::info!(model = %self.model, parts, "calling gemini");

        let resp = self
            .http
            .post(self.endpoint())
            .headers(headers)
            .json(request)
            .send()
            .await?;

        let status = resp.status();
        let body = resp.text().await.unwrap_or_default();
        if !status.is_success() {
            return Err(CategorizeError::Http {
                status: status.as_u16(),
                body,
            });
        }

        extract_text(&body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_shape() {
        let images = vec![ImagePayload {
            mime_type: "image/png".to_string(),
            data: "iVBORw0K".to_string(),
        }];
        let req = build_request("categorize these", &images);
        let v = serde_json::to_value(&req).unwrap();

        let parts = v["contents"][0]["parts"].as_array().unwrap();
        assert_eq!(parts.len(), 2);
        assert_eq!(parts[0]["inlineData"]["mimeType"], "image/png");
        assert_eq!(parts[0]["inlineData"]["data"], "iVBORw0K");
        assert!(parts[0].get("text").is_none());
        assert_eq!(parts[1]["text"], "categorize these");

        let cfg = &v["generationConfig"];
        assert_eq!(cfg["responseMimeType"], "application/json");
        assert_eq!(cfg["responseSchema"]["type"], "ARRAY");
        assert_eq!(
            cfg["responseSchema"]["items"]["required"],
            json!(["description", "amount", "category"])
        );
    }

    #[test]
    fn test_extract_text_joins_parts() {
        let body = r#"{"candidates":[{"content":{"role":"model","parts":[{"text":"[{\"description\":"},{"text":"\"x\",\"amount\":1,\"category\":\"Utilities\"}]"}]}}]}"#;
        let text = extract_text(body).unwrap();
        assert_eq!(text, r#"[{"description":"x","amount":1,"category":"Utilities"}]"#);
    }

    #[test]
    fn test_extract_text_empty() {
        assert!(matches!(extract_text(r#"{"candidates":[]}"#), Err(CategorizeError::EmptyResponse)));
        assert!(matches!(
            extract_text(r#"{"candidates":[{"finishReason":"SAFETY"}]}"#),
            Err(CategorizeError::EmptyResponse)
        ));
        assert!(matches!(extract_text("not json"), Err(CategorizeError::MalformedJson(_))));
    }

    #[test]
    fn test_endpoint() {
        let c = GeminiClient::new("https://example.test/", "gemini-2.5-flash", "k");
        assert_eq!(
            c.endpoint(),
            "https://example.test/v1beta/models/gemini-2.5-flash:generateContent"
        );
    }
}
