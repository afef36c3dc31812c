//! The generation pipeline: prompt → model → validation → image
//! materialization, single attempt, no internal retry.

use futures::future::join_all;
use slidesmith_genai::{GeminiClient, RawSlide, build_prompt, parse_slides};

use crate::config::Config;
use crate::error::{PipelineError, Result};
use crate::http;
use crate::materialize::ImageMaterializer;
use crate::types::{DocumentInput, GenerationRequest, GenerationResult, Slide, SlideLayout};

#[derive(Debug)]
pub struct Pipeline {
    client: GeminiClient,
    images: ImageMaterializer,
}

impl Pipeline {
    /// Wire the generation client and image materializer from config,
    /// sharing one HTTP client.
    ///
    /// # Errors
    ///
    /// Returns a missing-credential error when the API key is absent.
    pub fn new(config: &Config) -> Result<Self> {
        let http = http::default_client();
        let client = GeminiClient::new(config.genai.api_key.clone(), config.genai.model.clone())?
            .with_base_url(config.genai.base_url.clone())
            .with_client(http.clone());
        let images = ImageMaterializer::new(http).with_proxy_url(config.images.proxy_url.clone());
        Ok(Self { client, images })
    }

    /// Run one generation request to completion.
    ///
    /// Slides come back in model order; every `image_url` is either a
    /// materialized `data:` URI or cleared. Zero slides is a valid result
    /// (check [`GenerationResult::is_empty`]), not an error.
    ///
    /// # Errors
    ///
    /// Fails on empty input, an unreadable document, or any generation or
    /// validation failure; image materialization never fails the run.
    pub async fn run(&self, request: GenerationRequest) -> Result<GenerationResult> {
        if !request.has_input() {
            return Err(PipelineError::EmptyInput);
        }

        let prompt = build_prompt(
            request.topic.as_deref(),
            request.document.is_some(),
            request.pattern,
        );

        // Document conversion must fail before any network call.
        let document = request
            .document
            .as_ref()
            .map(DocumentInput::to_inline)
            .transpose()?;

        let reply = self.client.generate(&prompt, document.as_ref()).await?;
        let raw = parse_slides(&reply.text)?;
        tracing::info!(slides = raw.len(), "model returned slide plan");

        // Fan out one materialization per slide; join_all keeps model order
        // regardless of per-image completion order.
        let slides = join_all(raw.into_iter().map(|slide| self.finish_slide(slide))).await;

        Ok(GenerationResult {
            slides,
            sources: reply.sources,
        })
    }

    async fn finish_slide(&self, raw: RawSlide) -> Slide {
        let image_url = match raw.image_url.as_deref() {
            Some(url) if !url.trim().is_empty() => self.images.materialize(url).await,
            _ => None,
        };
        Slide {
            title: raw.title,
            content: raw.content,
            speaker_notes: raw.speaker_notes,
            image_url,
            layout: SlideLayout::from_name(raw.layout.as_deref()),
        }
    }
}

#[cfg(test)]
mod tests {
    use slidesmith_genai::GenAiError;

    use super::*;
    use crate::config::{GenAiConfig, ImageConfig};

    fn test_config() -> Config {
        Config {
            genai: GenAiConfig {
                api_key: "test-key".into(),
                model: "gemini-2.5-flash".into(),
                // Unroutable: these tests must fail before any network call.
                base_url: "http://127.0.0.1:1/v1beta".into(),
            },
            images: ImageConfig {
                proxy_url: "http://127.0.0.1:1/".into(),
            },
        }
    }

    #[test]
    fn new_fails_without_api_key() {
        let mut config = test_config();
        config.genai.api_key = String::new();
        let err = Pipeline::new(&config).unwrap_err();
        assert!(matches!(
            err,
            PipelineError::GenAi(GenAiError::MissingCredential)
        ));
    }

    #[tokio::test]
    async fn run_rejects_empty_input_before_network() {
        let pipeline = Pipeline::new(&test_config()).unwrap();
        let err = pipeline.run(GenerationRequest::default()).await.unwrap_err();
        assert!(matches!(err, PipelineError::EmptyInput));
    }

    #[tokio::test]
    async fn run_rejects_blank_topic_without_document() {
        let pipeline = Pipeline::new(&test_config()).unwrap();
        let request = GenerationRequest {
            topic: Some("  ".into()),
            ..GenerationRequest::default()
        };
        let err = pipeline.run(request).await.unwrap_err();
        assert!(matches!(err, PipelineError::EmptyInput));
    }

    #[tokio::test]
    async fn corrupt_document_fails_before_network() {
        let pipeline = Pipeline::new(&test_config()).unwrap();
        let request = GenerationRequest {
            topic: None,
            document: Some(DocumentInput {
                data: Vec::new(),
                mime_type: "application/pdf".into(),
            }),
            pattern: slidesmith_genai::PresentationPattern::Visual,
        };
        let err = pipeline.run(request).await.unwrap_err();
        assert!(matches!(err, PipelineError::Document(_)));
    }
}
