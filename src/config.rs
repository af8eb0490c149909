//! Tree options as supplied by the host page
//!
//! Options arrive as YAML (JSON works too, being a YAML subset) and are
//! validated once into a `TreeConfig`, so bad values never reach a frame.

use serde::{Deserialize, Deserializer};

use crate::error::TreeError;
use crate::growth::random::LCG_MODULUS;
use crate::growth::FULL_DEPTH;
use crate::render::Palette;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColorMode {
    Solid,
    #[default]
    Gradient,
}

/// Raw, unvalidated options
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase", deny_unknown_fields)]
pub struct TreeOptions {
    /// Depth levels to animate (at most the generated depth)
    #[serde(alias = "depth")]
    pub visible_depth: usize,
    /// Progress frames added to each growing branch per tick
    pub growth_speed: f64,
    #[serde(alias = "treeScale")]
    pub scale: f64,
    #[serde(alias = "branchWidth")]
    pub branch_width_factor: f64,
    pub color_mode: ColorMode,
    pub color: String,
    pub gradient_start: String,
    pub gradient_end: String,
    /// Presence switches generation to the reproducible sequence
    pub seed: Option<i64>,
}

impl Default for TreeOptions {
    fn default() -> Self {
        Self {
            visible_depth: FULL_DEPTH,
            growth_speed: 1.0,
            scale: 1.0,
            branch_width_factor: 1.0,
            color_mode: ColorMode::Gradient,
            color: "#000".to_string(),
            gradient_start: "#8B4513".to_string(),
            gradient_end: "#228B22".to_string(),
            seed: None,
        }
    }
}

impl TreeOptions {
    /// Parse from a YAML or JSON string; missing keys take their defaults
    pub fn from_yaml(yaml: &str) -> Result<Self, TreeError> {
        if yaml.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_yaml::from_str(yaml).map_err(|e| TreeError::OptionsParse(e.to_string()))
    }

    /// These options with the keys present in `yaml` overwritten
    pub fn merged(&self, yaml: &str) -> Result<Self, TreeError> {
        if yaml.trim().is_empty() {
            return Ok(self.clone());
        }
        let patch: OptionsPatch =
            serde_yaml::from_str(yaml).map_err(|e| TreeError::OptionsParse(e.to_string()))?;
        Ok(self.clone().patched(patch))
    }

    fn patched(mut self, patch: OptionsPatch) -> Self {
        if let Some(visible_depth) = patch.visible_depth {
            self.visible_depth = visible_depth;
        }
        if let Some(growth_speed) = patch.growth_speed {
            self.growth_speed = growth_speed;
        }
        if let Some(scale) = patch.scale {
            self.scale = scale;
        }
        if let Some(branch_width_factor) = patch.branch_width_factor {
            self.branch_width_factor = branch_width_factor;
        }
        if let Some(color_mode) = patch.color_mode {
            self.color_mode = color_mode;
        }
        if let Some(color) = patch.color {
            self.color = color;
        }
        if let Some(gradient_start) = patch.gradient_start {
            self.gradient_start = gradient_start;
        }
        if let Some(gradient_end) = patch.gradient_end {
            self.gradient_end = gradient_end;
        }
        if let Some(seed) = patch.seed {
            self.seed = seed;
        }
        self
    }

    pub fn validate(&self) -> Result<TreeConfig, TreeError> {
        if !self.growth_speed.is_finite() || self.growth_speed <= 0.0 {
            return Err(TreeError::invalid("growthSpeed", "must be a positive number"));
        }
        if !self.scale.is_finite() || self.scale <= 0.0 {
            return Err(TreeError::invalid("scale", "must be a positive number"));
        }
        if !self.branch_width_factor.is_finite() || self.branch_width_factor < 0.0 {
            return Err(TreeError::invalid("branchWidthFactor", "must not be negative"));
        }

        let visible_depth = if self.visible_depth > FULL_DEPTH {
            log::warn!(
                "visibleDepth {} exceeds generated depth, clamped to {FULL_DEPTH}",
                self.visible_depth
            );
            FULL_DEPTH
        } else {
            self.visible_depth
        };

        let palette = match self.color_mode {
            ColorMode::Solid => Palette::Solid(non_empty("color", &self.color)?),
            ColorMode::Gradient => Palette::Gradient {
                start: non_empty("gradientStart", &self.gradient_start)?,
                end: non_empty("gradientEnd", &self.gradient_end)?,
            },
        };

        let seed = self.seed.map(normalize_seed).transpose()?;

        Ok(TreeConfig {
            visible_depth,
            growth_speed: self.growth_speed,
            scale: self.scale,
            branch_width: self.branch_width_factor,
            palette,
            seed,
        })
    }
}

/// Options passed to a later `configure`; absent keys keep their current value
#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase", deny_unknown_fields)]
struct OptionsPatch {
    #[serde(alias = "depth")]
    visible_depth: Option<usize>,
    growth_speed: Option<f64>,
    #[serde(alias = "treeScale")]
    scale: Option<f64>,
    #[serde(alias = "branchWidth")]
    branch_width_factor: Option<f64>,
    color_mode: Option<ColorMode>,
    color: Option<String>,
    gradient_start: Option<String>,
    gradient_end: Option<String>,
    /// `seed: null` switches back to unseeded generation
    #[serde(deserialize_with = "present")]
    seed: Option<Option<i64>>,
}

fn present<'de, D>(deserializer: D) -> Result<Option<Option<i64>>, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<i64>::deserialize(deserializer).map(Some)
}

fn non_empty(name: &'static str, color: &str) -> Result<String, TreeError> {
    let color = color.trim();
    if color.is_empty() {
        return Err(TreeError::invalid(name, "colour must not be empty"));
    }
    Ok(color.to_string())
}

/// Fold a seed into the generator's state space `[1, 2^31 - 2]`
fn normalize_seed(seed: i64) -> Result<i64, TreeError> {
    match seed.rem_euclid(LCG_MODULUS) {
        0 => Err(TreeError::invalid(
            "seed",
            format!("{seed} is a multiple of {LCG_MODULUS} and yields a constant sequence"),
        )),
        state => Ok(state),
    }
}

/// Validated options for one tree stage
#[derive(Debug, Clone, PartialEq)]
pub struct TreeConfig {
    pub visible_depth: usize,
    pub growth_speed: f64,
    /// Requested scale, before clamping to the surface height
    pub scale: f64,
    pub branch_width: f64,
    pub palette: Palette,
    pub seed: Option<i64>,
}

impl Default for TreeConfig {
    fn default() -> Self {
        Self {
            visible_depth: FULL_DEPTH,
            growth_speed: 1.0,
            scale: 1.0,
            branch_width: 1.0,
            palette: Palette::Gradient {
                start: "#8B4513".to_string(),
                end: "#228B22".to_string(),
            },
            seed: None,
        }
    }
}

impl TreeConfig {
    pub fn from_yaml(yaml: &str) -> Result<Self, TreeError> {
        TreeOptions::from_yaml(yaml)?.validate()
    }
}
