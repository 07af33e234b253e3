//! Boundary to the external image-generation service.
//!
//! The service receives the confirmed crop plus a style prompt and answers with a new image.
//! Any failure is reported as [`HaloError::Generation`] with no partial result.

use std::time::Duration;

use base64::Engine;
use reqwest::blocking::Client;

use crate::foundation::error::{HaloError, HaloResult};

#[derive(Clone, Debug, PartialEq)]
pub struct GenerationRequest {
    pub bytes: Vec<u8>,
    pub mime: String,
    pub prompt: String,
}

#[derive(Clone, Debug, PartialEq)]
pub struct GeneratedImage {
    pub bytes: Vec<u8>,
    pub mime: String,
}

pub trait GenerationService: Send + Sync {
    fn generate(&self, request: &GenerationRequest) -> HaloResult<GeneratedImage>;
}

/// Returns the input image untouched. Used for offline runs.
#[derive(Clone, Copy, Debug, Default)]
pub struct PassthroughService;

impl GenerationService for PassthroughService {
    fn generate(&self, request: &GenerationRequest) -> HaloResult<GeneratedImage> {
        Ok(GeneratedImage {
            bytes: request.bytes.clone(),
            mime: request.mime.clone(),
        })
    }
}

#[derive(serde::Serialize)]
#[serde(rename_all = "camelCase")]
struct WireRequest<'a> {
    base64_image: String,
    mime_type: &'a str,
    prompt: &'a str,
}

#[derive(serde::Deserialize)]
#[serde(rename_all = "camelCase")]
struct WireResponse {
    base64_data: Option<String>,
    mime_type: Option<String>,
}

/// JSON-over-HTTP client: `POST {base64Image, mimeType, prompt}` answered by
/// `{base64Data, mimeType}`, or `{error}` with a non-success status.
#[derive(Clone, Debug)]
pub struct HttpGenerationService {
    client: Client,
    endpoint: String,
}

impl HttpGenerationService {
    pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(120);

    pub fn new(endpoint: impl Into<String>, timeout: Duration) -> HaloResult<Self> {
        let endpoint = endpoint.into();
        if endpoint.trim().is_empty() {
            return Err(HaloError::validation("generation endpoint must not be empty"));
        }
        let client = Client::builder()
            .user_agent(format!("haloframe/{}", env!("CARGO_PKG_VERSION")))
            .timeout(timeout)
            .build()
            .map_err(|e| HaloError::generation(format!("http client: {e}")))?;
        Ok(Self { client, endpoint })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

impl GenerationService for HttpGenerationService {
    #[tracing::instrument(skip(self, request), fields(endpoint = %self.endpoint, mime = %request.mime))]
    fn generate(&self, request: &GenerationRequest) -> HaloResult<GeneratedImage> {
        let body = WireRequest {
            base64_image: base64::engine::general_purpose::STANDARD.encode(&request.bytes),
            mime_type: &request.mime,
            prompt: &request.prompt,
        };
        let resp = self
            .client
            .post(&self.endpoint)
            .json(&body)
            .send()
            .map_err(|e| HaloError::generation(format!("request failed: {e}")))?;

        let status = resp.status();
        let text = resp
            .text()
            .map_err(|e| HaloError::generation(format!("read response: {e}")))?;
        if !status.is_success() {
            let msg = error_message(&text).unwrap_or_default();
            tracing::warn!(%status, error = %msg, "generation service rejected request");
            return Err(HaloError::generation(format!(
                "request failed with status {status}"
            )));
        }

        let image = decode_response(&text)?;
        tracing::info!(bytes = image.bytes.len(), mime = %image.mime, "generated image received");
        Ok(image)
    }
}

fn error_message(body: &str) -> Option<String> {
    serde_json::from_str::<serde_json::Value>(body)
        .ok()?
        .get("error")?
        .as_str()
        .map(String::from)
}

fn decode_response(body: &str) -> HaloResult<GeneratedImage> {
    let wire: WireResponse = serde_json::from_str(body)
        .map_err(|e| HaloError::generation(format!("invalid response: {e}")))?;
    let (Some(data), Some(mime)) = (wire.base64_data, wire.mime_type) else {
        return Err(HaloError::generation(
            "invalid response from server: missing image data",
        ));
    };
    if data.is_empty() || mime.is_empty() {
        return Err(HaloError::generation(
            "invalid response from server: missing image data",
        ));
    }
    let bytes = base64::engine::general_purpose::STANDARD
        .decode(data.trim())
        .map_err(|e| HaloError::generation(format!("invalid base64 image: {e}")))?;
    Ok(GeneratedImage { bytes, mime })
}

/// A named prompt offered in the style step. Disabled presets are listed but not selectable.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct StylePreset {
    pub id: &'static str,
    pub title: &'static str,
    pub description: &'static str,
    pub prompt: &'static str,
    pub disabled: bool,
}

impl StylePreset {
    pub fn is_selectable(&self) -> bool {
        !self.disabled
    }
}

pub const STYLE_PRESETS: &[StylePreset] = &[
    StylePreset {
        id: "classic",
        title: "Classic Portrait",
        description: "A timeless black and white portrait for a sharp, confident look.",
        prompt: "Restyle this portrait as a classic studio photograph: high-contrast black and \
                 white, soft lighting, a look of quiet authority and sophistication. Keep the \
                 person's face and identity unchanged.",
        disabled: false,
    },
    StylePreset {
        id: "modern",
        title: "Modern Look",
        description: "A clean, simple aesthetic for a contemporary feel.",
        prompt: "Restyle this portrait with a clean, crisp, contemporary look: bright soft \
                 lighting against a neutral background, conveying focus and clarity. Keep the \
                 person's face and identity unchanged.",
        disabled: false,
    },
    StylePreset {
        id: "realistic",
        title: "Studio Finish",
        description: "A high-contrast, hyper-realistic look for a bold and impactful photo.",
        prompt: "Restyle this portrait as a high-end magazine cover shoot: bold, dramatic \
                 cinematic lighting that sculpts the features, striking contrast and a \
                 flawless hyper-realistic finish. Keep the person's face and identity unchanged.",
        disabled: false,
    },
    StylePreset {
        id: "cinematic",
        title: "Cinematic Feel",
        description: "A moody, film-like portrait for a storytelling and impactful presence.",
        prompt: "Restyle this portrait as a film still: moody lighting and rich color grading \
                 with dramatic depth, an enigmatic and thoughtful mood. Keep the person's face \
                 and identity unchanged.",
        disabled: true,
    },
    StylePreset {
        id: "vintage",
        title: "Retro Film",
        description: "A warm, film-grain style that evokes timeless elegance and nostalgia.",
        prompt: "Restyle this portrait as classic film photography: delicate grain and warm \
                 tones for a nostalgic, elegant look that feels authentic. Keep the person's \
                 face and identity unchanged.",
        disabled: true,
    },
];

/// Looks up any preset, disabled ones included.
pub fn find_style(id: &str) -> Option<&'static StylePreset> {
    STYLE_PRESETS.iter().find(|s| s.id == id)
}

pub fn enabled_styles() -> impl Iterator<Item = &'static StylePreset> {
    STYLE_PRESETS.iter().filter(|s| s.is_selectable())
}

/// First selectable preset.
pub fn default_style() -> &'static StylePreset {
    enabled_styles().next().unwrap_or(&STYLE_PRESETS[0])
}

/// Selectable preset by id; unknown and disabled ids are validation errors.
pub fn selectable_style(id: &str) -> HaloResult<&'static StylePreset> {
    let style =
        find_style(id).ok_or_else(|| HaloError::validation(format!("unknown style '{id}'")))?;
    if style.disabled {
        return Err(HaloError::validation(format!("style '{id}' is not available yet")));
    }
    Ok(style)
}
