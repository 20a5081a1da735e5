use std::path::Path;

use anyhow::Context as _;

use crate::{
    ease::Ease,
    foundation::{
        core::{Rgb8, Theme},
        error::{CloudError, CloudResult},
    },
    layout::rotation::{DEFAULT_ROTATIONS, RandomSource, SplitMix64, UniformRotation},
    scene::palette::{DARK_PALETTE, LIGHT_PALETTE},
    sizing::{DEFAULT_MAX_FONT_SIZE, DEFAULT_MIN_FONT_SIZE, SizeScale},
};

pub const DEFAULT_FONT_FAMILY: &str = "Inter, system-ui, sans-serif";

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CloudConfig {
    pub min_font_size: f64,
    pub max_font_size: f64,
    pub padding: f64,
    pub font_family: String,
    pub rotations: Vec<f64>,
    pub theme: Theme,
    pub light_palette: Vec<Rgb8>,
    pub dark_palette: Vec<Rgb8>,
    pub opacity: f64,
    pub hover_scale: f64,
    pub hover_transition_ms: u32,
    pub reveal_duration_ms: u32,
    pub reveal_stagger_ms: u32,
    pub reveal_ease: Ease,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,
}

impl Default for CloudConfig {
    fn default() -> Self {
        Self {
            min_font_size: DEFAULT_MIN_FONT_SIZE,
            max_font_size: DEFAULT_MAX_FONT_SIZE,
            padding: 8.0,
            font_family: DEFAULT_FONT_FAMILY.to_string(),
            rotations: DEFAULT_ROTATIONS.to_vec(),
            theme: Theme::Light,
            light_palette: LIGHT_PALETTE.to_vec(),
            dark_palette: DARK_PALETTE.to_vec(),
            opacity: 0.9,
            hover_scale: 1.1,
            hover_transition_ms: 200,
            reveal_duration_ms: 800,
            reveal_stagger_ms: 50,
            reveal_ease: Ease::InOutCubic,
            seed: None,
        }
    }
}

impl CloudConfig {
    pub fn from_json_str(s: &str) -> CloudResult<Self> {
        let cfg: Self = serde_json::from_str(s)?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn load(path: &Path) -> CloudResult<Self> {
        let s = std::fs::read_to_string(path)
            .with_context(|| format!("read config '{}'", path.display()))?;
        Self::from_json_str(&s)
    }

    pub fn validate(&self) -> CloudResult<()> {
        self.size_scale().validate()?;
        if !self.padding.is_finite() || self.padding < 0.0 {
            return Err(CloudError::validation("padding must be finite and >= 0"));
        }
        if self.font_family.trim().is_empty() {
            return Err(CloudError::validation("font_family must be non-empty"));
        }
        if self.rotations.is_empty() {
            return Err(CloudError::validation("rotations must be non-empty"));
        }
        if self.rotations.iter().any(|r| !r.is_finite()) {
            return Err(CloudError::validation("rotations must be finite"));
        }
        if self.light_palette.is_empty() || self.dark_palette.is_empty() {
            return Err(CloudError::validation("palettes must be non-empty"));
        }
        if !(0.0..=1.0).contains(&self.opacity) {
            return Err(CloudError::validation("opacity must be within [0, 1]"));
        }
        if !self.hover_scale.is_finite() || self.hover_scale <= 0.0 {
            return Err(CloudError::validation("hover_scale must be finite and > 0"));
        }
        Ok(())
    }

    /// Name `family` first in the output font stack, so glyphs render with the face they
    /// were measured against.
    pub fn prefer_font_family(&mut self, family: &str) {
        self.font_family = format!("'{family}', sans-serif");
    }

    pub fn size_scale(&self) -> SizeScale {
        SizeScale {
            min: self.min_font_size,
            max: self.max_font_size,
        }
    }

    pub fn palette(&self, theme: Theme) -> &[Rgb8] {
        match theme {
            Theme::Light => &self.light_palette,
            Theme::Dark => &self.dark_palette,
        }
    }

    /// Rotation policy over `rotations`, seeded from `seed` or the clock.
    pub fn rotation_policy(&self) -> CloudResult<UniformRotation> {
        match self.seed {
            Some(seed) => self.rotation_policy_with(SplitMix64::new(seed)),
            None => self.rotation_policy_with(SplitMix64::from_clock()),
        }
    }

    pub fn rotation_policy_with(
        &self,
        source: impl RandomSource + Send + 'static,
    ) -> CloudResult<UniformRotation> {
        UniformRotation::new(self.rotations.clone(), source)
    }
}
