//! Deterministic prompt assembly for the slide generation request.
//!
//! The prompt is the contract with the model: it fixes the output JSON
//! schema, the slide-count range, and the image-sourcing rules. Everything
//! here is pure string work; no I/O.

use std::convert::Infallible;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Named preset controlling the phrasing and structural bias of the prompt.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PresentationPattern {
    #[default]
    Standard,
    DataAnalysis,
    Visual,
    Anatomy,
    Process,
}

impl PresentationPattern {
    pub const ALL: [Self; 5] = [
        Self::Standard,
        Self::DataAnalysis,
        Self::Visual,
        Self::Anatomy,
        Self::Process,
    ];

    /// Parse a pattern name, falling back to `Standard` for anything
    /// unrecognized.
    #[must_use]
    pub fn from_name(name: &str) -> Self {
        match name.trim() {
            "data-analysis" => Self::DataAnalysis,
            "visual" => Self::Visual,
            "anatomy" => Self::Anatomy,
            "process" => Self::Process,
            _ => Self::Standard,
        }
    }

    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::Standard => "standard",
            Self::DataAnalysis => "data-analysis",
            Self::Visual => "visual",
            Self::Anatomy => "anatomy",
            Self::Process => "process",
        }
    }

    fn style_instructions(self) -> &'static str {
        match self {
            Self::Standard => STANDARD_STYLE,
            Self::DataAnalysis => DATA_ANALYSIS_STYLE,
            Self::Visual => VISUAL_STYLE,
            Self::Anatomy => ANATOMY_STYLE,
            Self::Process => PROCESS_STYLE,
        }
    }
}

impl FromStr for PresentationPattern {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::from_name(s))
    }
}

const STANDARD_STYLE: &str = "\
The presentation style must be \"Standard\".
- Structure: a balance between text and imagery. Follow a logical arc of introduction, development, and conclusion. Vary the layouts ('default', 'title_only') to keep the deck interesting.
- Content: the text must be informative and concise, using bullet points.
- Images: search for relevant, good-quality images that illustrate the point of each slide.";

const DATA_ANALYSIS_STYLE: &str = "\
The presentation style must be \"Data Analysis\".
- Structure: open with an executive summary slide, followed by methodology, key findings (use data points and metrics), and close with conclusions and recommendations.
- Content: be data-driven. Use precise language and focus on actionable insights.
- Images: prioritize searching for charts, infographics, and tables that represent data. If none are found, use conceptual business or technology images.
- Layouts: use predominantly the 'default' layout.";

const VISUAL_STYLE: &str = "\
The presentation style must be \"Visual\".
- Structure: every slide must have a striking title and at most 1-2 short sentences of content. The image is the main focus.
- Content: the text must be minimal and poetic or provocative, complementing the image.
- Images: search for high-resolution, artistic images with strong emotional impact (photographs, illustrations) that tell a story. The image is the protagonist of every slide.
- Layouts: use predominantly 'image_full' for content slides and 'title_only' for the introduction and section breaks.";

const ANATOMY_STYLE: &str = "\
The presentation style must be \"Anatomy and Histology\".
- Structure: organize the content logically for anatomical/histological study (e.g. macro to micro, system by system).
- Content: use precise medical and scientific terminology. Describe structures, functions, and spatial relationships.
- Images: the image search MUST prioritize detailed anatomical illustrations, body-system diagrams, and tissue photomicrographs (histology).
- Layouts: use the 'default' layout to show images next to detailed descriptions.";

const PROCESS_STYLE: &str = "\
The presentation style must be \"Processes and Flowcharts\".
- Structure: arrange the slides to show the step-by-step sequence of a process or a hierarchical system.
- Content: explain each stage or component of a physiological, pharmacological, or any other system's process.
- Images: the image search MUST prioritize flowcharts, process diagrams, concept maps, and organizational charts. If none are found, use icons or illustrations that represent each step.
- Layouts: use the 'default' layout, focusing on the clarity of the diagram or image.";

const LAYOUT_RULES: &str = "\
For every slide you MUST choose one of the following visual layouts: 'default' (image beside the text), 'image_full' (full-screen background image with overlaid text), or 'title_only' (title and subtitle only, no image). The layout choice must suit the slide's content and style.";

const IMAGE_RULES: &str = "\
**CRITICAL IMAGE RULES:**
Your most important task is to guarantee that EVERY image URL is valid. Follow these rules strictly:
1. **Use search:** to find an image, use your web search tool.
2. **Use exact URLs:** you may ONLY use image URLs that appear DIRECTLY in the search results.
3. **DO NOT MODIFY:** it is absolutely forbidden to modify, combine, guess, or invent any part of an image URL. Copy it exactly as you found it.
4. **Check the link:** the URL MUST point directly at an image file (`.jpg`, `.png`, `.webp`, etc.), not at a web page (HTML). URL validity and accessibility is your highest priority.
5. **Fallback:** if the search does not return a suitable, valid image for a slide that needs one, leave the `imageUrl` field as an empty string (\"\"). Having no image is far better than a broken link.";

const GENERAL_RULES: &str = "\
**GENERAL INSTRUCTIONS:**
If a document is provided, prioritize its content. If only a topic is given, generate the content from your own knowledge and web research. If both are provided, synthesize them.
If no topic is provided, build a presentation that summarizes the key points of the document.
The presentation must flow logically and the total number of slides must be between 5 and 10.";

const OUTPUT_CONTRACT: &str = r#"Your answer MUST be a single JSON code block, with no text or explanation before or after it. The JSON must follow exactly this structure:
```json
{
  "slides": [
    {
      "title": "string",
      "content": ["string"],
      "layout": "default | image_full | title_only",
      "speakerNotes": "string (optional)",
      "imageUrl": "string (optional, required for the 'default' and 'image_full' layouts)"
    }
  ]
}
```"#;

/// Build the full instruction payload for one generation request.
///
/// Pure function: selects the style block for `pattern` and embeds the
/// layout, image-sourcing, and output-schema rules verbatim.
#[must_use]
pub fn build_prompt(
    topic: Option<&str>,
    has_document: bool,
    pattern: PresentationPattern,
) -> String {
    let topic = topic.unwrap_or_default().trim();
    let topic_clause = if topic.is_empty() {
        String::new()
    } else {
        format!(" based on the following topic: \"{topic}\"")
    };
    let connector = if !topic.is_empty() && has_document {
        " and"
    } else {
        ""
    };
    let document_clause = if has_document {
        " using the content of the attached document as the primary source of information"
    } else {
        ""
    };

    format!(
        "You are an expert presentation author. Your task is to produce a professional, \
         informative slide deck{topic_clause}{connector}{document_clause}.\n\n\
         **STYLE AND LAYOUT INSTRUCTIONS:**\n{style}\n{LAYOUT_RULES}\n\n\
         {IMAGE_RULES}\n\n\
         {GENERAL_RULES}\n\n\
         {OUTPUT_CONTRACT}",
        style = pattern.style_instructions(),
    )
}
