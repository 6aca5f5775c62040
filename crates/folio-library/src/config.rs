//! Layout configuration.

use ecow::{EcoString, eco_format};
use serde::{Deserialize, Serialize};

use crate::diag::StrResult;
use crate::layout::{Abs, Ratio};

/// Settings that apply to a whole layout run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct Config {
    /// The font size of nodes that neither set nor inherit one.
    pub default_font_size: Abs,
    /// The line height as a multiple of the font size, unless a node sets a
    /// line height of its own.
    pub line_height_factor: f64,
    /// How far an inter-word space may grow, relative to its natural width.
    pub space_stretch: Ratio,
    /// How far an inter-word space may shrink, relative to its natural
    /// width.
    pub space_shrink: Ratio,
    /// Whether page sequences are laid out in parallel.
    pub parallel: bool,
    /// How lines and pages are broken.
    pub breaking: BreakConfig,
}

impl Config {
    /// Parse a configuration from TOML. Missing keys take their defaults.
    pub fn from_toml(raw: &str) -> StrResult<Self> {
        toml::from_str(raw).map_err(|err| format_toml_error(err, raw))
    }

    /// Serialize the configuration to TOML.
    pub fn to_toml(&self) -> StrResult<String> {
        toml::to_string(self)
            .map_err(|err| eco_format!("failed to encode configuration as TOML ({err})"))
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            default_font_size: Abs::pt(12.0),
            line_height_factor: 1.2,
            space_stretch: Ratio::new(0.5),
            space_shrink: Ratio::new(1.0 / 3.0),
            parallel: false,
            breaking: BreakConfig::default(),
        }
    }
}

/// Parameters of the breaking algorithm.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct BreakConfig {
    /// Which algorithm determines the breakpoints.
    pub linebreaks: Linebreaks,
    /// Lines and pages stretched beyond this adjustment ratio are
    /// infeasible.
    pub max_stretch_ratio: f64,
    /// Added to the badness of every line before squaring; higher values
    /// favor fewer lines.
    pub line_penalty: f64,
    /// Charged when two consecutive lines end at flagged breaks.
    pub flagged_demerits: f64,
    /// Charged when adjacent lines are set very differently tight.
    pub fitness_demerits: f64,
    /// The cost of breaking a word at a hyphenation point.
    pub hyphen_penalty: i32,
}

impl Default for BreakConfig {
    fn default() -> Self {
        Self {
            linebreaks: Linebreaks::Optimized,
            max_stretch_ratio: 10.0,
            line_penalty: 0.0,
            flagged_demerits: 3000.0,
            fitness_demerits: 1000.0,
            hyphen_penalty: 50,
        }
    }
}

/// How breakpoints are determined.
#[derive(Debug, Default, Copy, Clone, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Linebreaks {
    /// Take each break as soon as the next item would not fit anymore.
    Simple,
    /// Optimize the breakpoints of the whole sequence at once.
    #[default]
    Optimized,
}

/// Format the user-facing TOML error message.
fn format_toml_error(error: toml::de::Error, raw: &str) -> EcoString {
    if let Some(head) = error.span().and_then(|range| raw.get(..range.start)) {
        let line = head.lines().count().max(1);
        let column = 1 + head.chars().rev().take_while(|&c| c != '\n').count();
        eco_format!(
            "failed to parse configuration ({} at line {line} column {column})",
            error.message(),
        )
    } else {
        eco_format!("failed to parse configuration ({})", error.message())
    }
}
