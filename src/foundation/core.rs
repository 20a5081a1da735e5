use crate::foundation::error::{CloudError, CloudResult};

pub use kurbo::{Affine, Point, Rect, Vec2};

/// Drawing surface size in CSS pixels, as supplied by the hosting surface.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct CanvasSize {
    pub width: f64,
    pub height: f64,
}

impl CanvasSize {
    pub fn new(width: f64, height: f64) -> CloudResult<Self> {
        let size = Self { width, height };
        size.validate()?;
        Ok(size)
    }

    pub fn validate(self) -> CloudResult<()> {
        if !self.width.is_finite() || !self.height.is_finite() {
            return Err(CloudError::validation("canvas width/height must be finite"));
        }
        if self.width <= 0.0 || self.height <= 0.0 {
            return Err(CloudError::validation("canvas width/height must be > 0"));
        }
        Ok(())
    }

    pub fn center(self) -> Vec2 {
        Vec2::new(self.width * 0.5, self.height * 0.5)
    }

    /// Canvas bounds in center-relative coordinates.
    pub fn centered_rect(self) -> Rect {
        let half = self.center();
        Rect::new(-half.x, -half.y, half.x, half.y)
    }

    /// Derive the cloud canvas from a viewport, leaving room for the surrounding page.
    pub fn for_viewport(viewport_width: f64, viewport_height: f64, fullscreen: bool) -> Self {
        if fullscreen {
            return Self {
                width: (viewport_width - 100.0).max(1.0),
                height: (viewport_height - 200.0).max(1.0),
            };
        }

        let container_w = (viewport_width - 64.0).min(1200.0);
        let container_h = (viewport_height * 0.6).min(600.0);
        Self {
            width: (container_w * 0.9).max(400.0),
            height: container_h.max(300.0),
        }
    }
}

impl Default for CanvasSize {
    fn default() -> Self {
        Self {
            width: 500.0,
            height: 300.0,
        }
    }
}

/// Binary display theme; selects the palette and background treatment.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

impl Theme {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Light => "light",
            Self::Dark => "dark",
        }
    }
}

/// Opaque sRGB color.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Rgb8 {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb8 {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Parse `#RRGGBB` (leading `#` optional, case-insensitive).
    pub fn from_hex(s: &str) -> CloudResult<Self> {
        let s = s.trim();
        let s = s.strip_prefix('#').unwrap_or(s);
        if s.len() != 6 || !s.is_ascii() {
            return Err(CloudError::validation(format!(
                "hex color must be #RRGGBB, got \"{s}\""
            )));
        }

        fn hex_byte(pair: &str) -> CloudResult<u8> {
            u8::from_str_radix(pair, 16)
                .map_err(|_| CloudError::validation(format!("invalid hex byte \"{pair}\"")))
        }

        Ok(Self {
            r: hex_byte(&s[0..2])?,
            g: hex_byte(&s[2..4])?,
            b: hex_byte(&s[4..6])?,
        })
    }

    pub fn to_hex(self) -> String {
        format!("#{:02X}{:02X}{:02X}", self.r, self.g, self.b)
    }
}

impl serde::Serialize for Rgb8 {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> serde::Deserialize<'de> for Rgb8 {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Self::from_hex(&s).map_err(serde::de::Error::custom)
    }
}
