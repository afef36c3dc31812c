//! Domain model for one generation run: slides, requests, and results.

use std::path::Path;

use base64::{Engine, engine::general_purpose::STANDARD};
use serde::{Deserialize, Serialize};
use slidesmith_genai::{InlineDocument, PresentationPattern, Source};

use crate::error::{PipelineError, Result};

/// Visual arrangement a consuming renderer applies to a slide.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SlideLayout {
    #[default]
    Default,
    ImageFull,
    TitleOnly,
}

impl SlideLayout {
    /// Map a layout name from the model to the enum, treating anything
    /// absent or unrecognized as `Default`.
    #[must_use]
    pub fn from_name(name: Option<&str>) -> Self {
        match name {
            Some("image_full") => Self::ImageFull,
            Some("title_only") => Self::TitleOnly,
            _ => Self::Default,
        }
    }
}

/// One unit of presentation content.
///
/// After a pipeline run `image_url` is either a self-contained `data:` URI
/// or `None`; bare web URLs never leave the pipeline.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Slide {
    pub title: String,
    #[serde(default)]
    pub content: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub speaker_notes: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    #[serde(default)]
    pub layout: SlideLayout,
}

/// An uploaded document: raw bytes plus the declared MIME type.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DocumentInput {
    pub data: Vec<u8>,
    pub mime_type: String,
}

impl DocumentInput {
    /// Read a document from disk, deriving the MIME type from the file
    /// extension.
    ///
    /// # Errors
    ///
    /// Returns [`PipelineError::Document`] when the file cannot be read or
    /// the extension is not a supported document type.
    pub fn from_path(path: &Path) -> Result<Self> {
        let mime_type = mime_for_path(path)
            .ok_or_else(|| {
                PipelineError::Document(format!("unsupported file type: {}", path.display()))
            })?
            .to_owned();
        let data = std::fs::read(path)
            .map_err(|e| PipelineError::Document(format!("{}: {e}", path.display())))?;
        Ok(Self { data, mime_type })
    }

    /// Convert to the transmittable inline form (base64 payload).
    ///
    /// # Errors
    ///
    /// Returns [`PipelineError::Document`] when the document is empty or
    /// carries no MIME type; an unreadable upload must fail the run before
    /// any network call.
    pub fn to_inline(&self) -> Result<InlineDocument> {
        if self.data.is_empty() {
            return Err(PipelineError::Document(
                "the file is empty or corrupt".into(),
            ));
        }
        if self.mime_type.trim().is_empty() {
            return Err(PipelineError::Document(
                "the file type could not be determined".into(),
            ));
        }
        Ok(InlineDocument {
            mime_type: self.mime_type.clone(),
            data: STANDARD.encode(&self.data),
        })
    }
}

fn mime_for_path(path: &Path) -> Option<&'static str> {
    let ext = path.extension()?.to_str()?.to_ascii_lowercase();
    match ext.as_str() {
        "pdf" => Some("application/pdf"),
        "docx" => {
            Some("application/vnd.openxmlformats-officedocument.wordprocessingml.document")
        }
        "pptx" => {
            Some("application/vnd.openxmlformats-officedocument.presentationml.presentation")
        }
        "xlsx" => Some("application/vnd.openxmlformats-officedocument.spreadsheetml.sheet"),
        "csv" => Some("text/csv"),
        "txt" => Some("text/plain"),
        "md" => Some("text/markdown"),
        _ => None,
    }
}

/// One user submission, consumed once by the pipeline.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct GenerationRequest {
    pub topic: Option<String>,
    pub document: Option<DocumentInput>,
    pub pattern: PresentationPattern,
}

impl GenerationRequest {
    /// Whether the request carries anything to generate from.
    #[must_use]
    pub fn has_input(&self) -> bool {
        self.topic.as_deref().is_some_and(|t| !t.trim().is_empty()) || self.document.is_some()
    }
}

/// The finished deck: slides in model order plus the grounding sources,
/// passed through unmodified.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerationResult {
    pub slides: Vec<Slide>,
    pub sources: Vec<Source>,
}

impl GenerationResult {
    /// A parse that yields zero slides is a valid outcome, not an error;
    /// callers treat it as "try a different topic".
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.slides.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    #[test]
    fn layout_from_name_maps_known_values() {
        assert_eq!(SlideLayout::from_name(Some("default")), SlideLayout::Default);
        assert_eq!(
            SlideLayout::from_name(Some("image_full")),
            SlideLayout::ImageFull
        );
        assert_eq!(
            SlideLayout::from_name(Some("title_only")),
            SlideLayout::TitleOnly
        );
    }

    #[test]
    fn layout_from_name_defaults_unknown_and_absent() {
        assert_eq!(SlideLayout::from_name(Some("widescreen")), SlideLayout::Default);
        assert_eq!(SlideLayout::from_name(None), SlideLayout::Default);
    }

    #[test]
    fn slide_serializes_camel_case_and_skips_absent_fields() {
        let slide = Slide {
            title: "Intro".into(),
            content: vec!["point".into()],
            speaker_notes: None,
            image_url: None,
            layout: SlideLayout::TitleOnly,
        };
        let json = serde_json::to_string(&slide).unwrap();
        assert!(json.contains("\"layout\":\"title_only\""));
        assert!(!json.contains("speakerNotes"));
        assert!(!json.contains("imageUrl"));
    }

    #[test]
    fn slide_deserializes_missing_layout_as_default() {
        let slide: Slide = serde_json::from_str(r#"{"title":"T"}"#).unwrap();
        assert_eq!(slide.layout, SlideLayout::Default);
        assert!(slide.content.is_empty());
    }

    #[test]
    fn document_to_inline_encodes_base64() {
        let doc = DocumentInput {
            data: b"hello".to_vec(),
            mime_type: "text/plain".into(),
        };
        let inline = doc.to_inline().unwrap();
        assert_eq!(inline.mime_type, "text/plain");
        assert_eq!(inline.data, "aGVsbG8=");
    }

    #[test]
    fn empty_document_fails_conversion() {
        let doc = DocumentInput {
            data: Vec::new(),
            mime_type: "application/pdf".into(),
        };
        let err = doc.to_inline().unwrap_err();
        assert!(matches!(err, PipelineError::Document(_)));
    }

    #[test]
    fn missing_mime_type_fails_conversion() {
        let doc = DocumentInput {
            data: b"x".to_vec(),
            mime_type: "  ".into(),
        };
        let err = doc.to_inline().unwrap_err();
        assert!(matches!(err, PipelineError::Document(_)));
    }

    #[test]
    fn from_path_reads_file_and_detects_mime() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("notes.txt");
        let mut f = std::fs::File::create(&path).unwrap();
        write!(f, "some notes").unwrap();

        let doc = DocumentInput::from_path(&path).unwrap();
        assert_eq!(doc.mime_type, "text/plain");
        assert_eq!(doc.data, b"some notes");
    }

    #[test]
    fn from_path_rejects_unknown_extension() {
        let err = DocumentInput::from_path(Path::new("deck.exe")).unwrap_err();
        assert!(matches!(err, PipelineError::Document(_)));
        assert!(err.to_string().contains("unsupported file type"));
    }

    #[test]
    fn from_path_rejects_missing_file() {
        let err = DocumentInput::from_path(Path::new("/nonexistent/report.pdf")).unwrap_err();
        assert!(matches!(err, PipelineError::Document(_)));
    }

    #[test]
    fn request_has_input_requires_topic_or_document() {
        let empty = GenerationRequest::default();
        assert!(!empty.has_input());

        let blank_topic = GenerationRequest {
            topic: Some("   ".into()),
            ..GenerationRequest::default()
        };
        assert!(!blank_topic.has_input());

        let with_topic = GenerationRequest {
            topic: Some("Renewable energy".into()),
            ..GenerationRequest::default()
        };
        assert!(with_topic.has_input());

        let with_document = GenerationRequest {
            document: Some(DocumentInput {
                data: b"x".to_vec(),
                mime_type: "text/plain".into(),
            }),
            ..GenerationRequest::default()
        };
        assert!(with_document.has_input());
    }

    #[test]
    fn result_is_empty_reflects_slide_count() {
        assert!(GenerationResult::default().is_empty());
        let result = GenerationResult {
            slides: vec![Slide {
                title: "T".into(),
                content: vec![],
                speaker_notes: None,
                image_url: None,
                layout: SlideLayout::Default,
            }],
            sources: vec![],
        };
        assert!(!result.is_empty());
    }
}
