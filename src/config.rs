//! Runtime settings shared by the loader, editor, preview and exporter

use crate::error::{GridError, GridResult};
use serde::{Deserialize, Serialize};

/// Default number of rows projected into a preview
pub const DEFAULT_PREVIEW_ROWS: usize = 200;

/// Default success ratio a candidate type must exceed during inference
pub const DEFAULT_THRESHOLD: f64 = 0.6;

/// Which parse the type inferencer attempts first on a text column
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum InferenceOrder {
    #[default]
    DateTimeFirst,
    NumericFirst,
}

impl std::str::FromStr for InferenceOrder {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "datetime-first" | "datetime" => Ok(InferenceOrder::DateTimeFirst),
            "numeric-first" | "numeric" => Ok(InferenceOrder::NumericFirst),
            other => Err(format!(
                "unknown inference order '{}' (expected datetime-first or numeric-first)",
                other
            )),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    pub preview_rows: usize,
    pub threshold: f64,
    pub inference_order: InferenceOrder,
    /// Prefix CSV output with a UTF-8 byte-order mark
    pub csv_bom: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            preview_rows: DEFAULT_PREVIEW_ROWS,
            threshold: DEFAULT_THRESHOLD,
            inference_order: InferenceOrder::default(),
            csv_bom: true,
        }
    }
}

impl Settings {
    pub fn validate(&self) -> GridResult<()> {
        if self.preview_rows == 0 {
            return Err(GridError::Config(
                "preview rows must be at least 1".to_string(),
            ));
        }
        if !(self.threshold > 0.0 && self.threshold <= 1.0) {
            return Err(GridError::Config(format!(
                "threshold must be in (0, 1], got {}",
                self.threshold
            )));
        }
        Ok(())
    }
}
