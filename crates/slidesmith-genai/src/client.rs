//! HTTP client for the Gemini `generateContent` endpoint.
//!
//! One call per generation run: the prompt (plus an optional inlined
//! document) goes out with the `google_search` tool enabled so the model
//! can ground image URLs and factual content; the answer comes back as
//! text plus grounding citations. No retries and no state between calls.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{GenAiError, Result};

pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";
pub const DEFAULT_MODEL: &str = "gemini-2.5-flash";

const SAFETY_FINISH_REASON: &str = "SAFETY";

/// A document attached to the generation request, already encoded for
/// transmission (base64 payload plus declared MIME type).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InlineDocument {
    pub mime_type: String,
    pub data: String,
}

/// A citation the model grounded its answer on, passed through unmodified.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Source {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub web: Option<WebSource>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WebSource {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uri: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
}

impl Source {
    /// Whether both the locator and the display title are present.
    /// Incomplete sources are kept in the result; consumers that render
    /// citations filter on this.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.web
            .as_ref()
            .is_some_and(|w| w.uri.is_some() && w.title.is_some())
    }
}

/// Raw text and grounding citations extracted from one model invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModelReply {
    pub text: String,
    pub sources: Vec<Source>,
}

pub struct GeminiClient {
    client: reqwest::Client,
    api_key: String,
    model: String,
    base_url: String,
}

impl fmt::Debug for GeminiClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GeminiClient")
            .field("client", &"<reqwest::Client>")
            .field("api_key", &"<redacted>")
            .field("model", &self.model)
            .field("base_url", &self.base_url)
            .finish()
    }
}

impl GeminiClient {
    /// Create a client for the given model.
    ///
    /// # Errors
    ///
    /// Returns [`GenAiError::MissingCredential`] when `api_key` is empty or
    /// blank; the credential is required at construction so a misconfigured
    /// deployment fails before the first request.
    pub fn new(api_key: String, model: String) -> Result<Self> {
        if api_key.trim().is_empty() {
            return Err(GenAiError::MissingCredential);
        }
        Ok(Self {
            client: reqwest::Client::new(),
            api_key,
            model,
            base_url: DEFAULT_BASE_URL.to_owned(),
        })
    }

    /// Override the API base URL. Used for self-hosted proxies and tests.
    #[must_use]
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Use a preconfigured HTTP client (shared timeouts, user agent).
    #[must_use]
    pub fn with_client(mut self, client: reqwest::Client) -> Self {
        self.client = client;
        self
    }

    /// Send one generation request and extract the reply text and
    /// grounding sources.
    ///
    /// # Errors
    ///
    /// Returns [`GenAiError::Http`] on transport failure, `Api` on a
    /// non-success status, `SafetyBlocked` when the model refused on policy
    /// grounds, `EmptyResponse` when no text came back, and
    /// `MalformedOutput` when the response envelope cannot be decoded.
    pub async fn generate(
        &self,
        prompt: &str,
        document: Option<&InlineDocument>,
    ) -> Result<ModelReply> {
        let mut parts = vec![RequestPart::Text { text: prompt }];
        if let Some(doc) = document {
            parts.push(RequestPart::InlineData {
                inline_data: InlineData {
                    mime_type: &doc.mime_type,
                    data: &doc.data,
                },
            });
        }

        let body = GenerateContentRequest {
            contents: vec![Content {
                role: "user",
                parts,
            }],
            tools: vec![Tool {
                google_search: GoogleSearch {},
            }],
        };

        let url = format!("{}/models/{}:generateContent", self.base_url, self.model);
        let response = self
            .client
            .post(&url)
            .header("x-goog-api-key", &self.api_key)
            .header("content-type", "application/json")
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        let text = response.text().await.map_err(GenAiError::Http)?;

        if !status.is_success() {
            tracing::error!("Gemini API error {status}: {text}");
            return Err(GenAiError::Api { status });
        }

        let resp: GenerateContentResponse = serde_json::from_str(&text)?;
        let candidate = resp.candidates.into_iter().next();

        let reply_text = candidate
            .as_ref()
            .map(candidate_text)
            .unwrap_or_default();

        if reply_text.trim().is_empty() {
            let finish = candidate.as_ref().and_then(|c| c.finish_reason.as_deref());
            tracing::warn!(finish_reason = ?finish, "Gemini returned no text");
            if finish == Some(SAFETY_FINISH_REASON) {
                return Err(GenAiError::SafetyBlocked);
            }
            return Err(GenAiError::EmptyResponse);
        }

        let sources = candidate
            .map(|c| {
                c.grounding_metadata
                    .map(|g| g.grounding_chunks)
                    .unwrap_or_default()
            })
            .unwrap_or_default();

        tracing::debug!(
            chars = reply_text.len(),
            sources = sources.len(),
            "Gemini reply extracted"
        );

        Ok(ModelReply {
            text: reply_text,
            sources,
        })
    }
}

fn candidate_text(candidate: &Candidate) -> String {
    candidate
        .content
        .as_ref()
        .map(|content| {
            content
                .parts
                .iter()
                .filter_map(|p| p.text.as_deref())
                .collect::<Vec<_>>()
                .join("")
        })
        .unwrap_or_default()
}

#[derive(Serialize)]
struct GenerateContentRequest<'a> {
    contents: Vec<Content<'a>>,
    tools: Vec<Tool>,
}

#[derive(Serialize)]
struct Content<'a> {
    role: &'static str,
    parts: Vec<RequestPart<'a>>,
}

#[derive(Serialize)]
#[serde(untagged)]
enum RequestPart<'a> {
    Text {
        text: &'a str,
    },
    InlineData {
        #[serde(rename = "inlineData")]
        inline_data: InlineData<'a>,
    },
}

#[derive(Serialize)]
struct InlineData<'a> {
    #[serde(rename = "mimeType")]
    mime_type: &'a str,
    data: &'a str,
}

#[derive(Serialize)]
struct Tool {
    google_search: GoogleSearch,
}

#[derive(Serialize)]
struct GoogleSearch {}

#[derive(Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct Candidate {
    #[serde(default)]
    content: Option<CandidateContent>,
    #[serde(default)]
    finish_reason: Option<String>,
    #[serde(default)]
    grounding_metadata: Option<GroundingMetadata>,
}

#[derive(Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Deserialize)]
struct ResponsePart {
    #[serde(default)]
    text: Option<String>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct GroundingMetadata {
    #[serde(default)]
    grounding_chunks: Vec<Source>,
}
