//! Render options, from defaults, JSON, or the environment.

use std::path::PathBuf;

use log::warn;
use serde::{Deserialize, Serialize};

use crate::pdf::PdfError;

pub const ENV_SCALE: &str = "PDF_SCROLL_SCALE";
pub const ENV_PARALLEL: &str = "PDF_SCROLL_PARALLEL";
pub const ENV_PDFIUM: &str = "PDF_SCROLL_PDFIUM";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderOptions {
    /// Uniform pixels-per-point multiplier (the display density).
    pub scale: f32,
    /// Rasterize pages concurrently when the backend allows it.
    pub parallel: bool,
    /// Opaque colour painted under every page.
    pub background: [u8; 3],
    /// Explicit PDFium library to bind before the default locations.
    pub pdfium_library: Option<PathBuf>,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            scale: 1.0,
            parallel: false,
            background: [255, 255, 255],
            pdfium_library: None,
        }
    }
}

impl RenderOptions {
    pub fn from_json_str(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Defaults overridden by `PDF_SCROLL_*` variables. Unparseable values are ignored.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut options = Self::default();

        if let Some(raw) = lookup(ENV_SCALE) {
            match raw.trim().parse::<f32>() {
                Ok(scale) => options.scale = scale,
                Err(e) => warn!("Ignoring {}={:?}: {}", ENV_SCALE, raw, e),
            }
        }

        if let Some(raw) = lookup(ENV_PARALLEL) {
            match raw.trim().to_ascii_lowercase().as_str() {
                "1" | "true" | "yes" | "on" => options.parallel = true,
                "0" | "false" | "no" | "off" | "" => options.parallel = false,
                other => warn!("Ignoring {}={:?}", ENV_PARALLEL, other),
            }
        }

        if let Some(path) = lookup(ENV_PDFIUM).filter(|p| !p.is_empty()) {
            options.pdfium_library = Some(PathBuf::from(path));
        }

        options
    }

    pub fn validate(&self) -> Result<(), PdfError> {
        if !self.scale.is_finite() || self.scale <= 0.0 {
            return Err(PdfError::InvalidScale(self.scale));
        }
        Ok(())
    }
}
