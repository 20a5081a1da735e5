#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Ease {
    Linear,
    OutQuad,
    OutCubic,
    #[default]
    InOutCubic,
}

impl Ease {
    pub fn apply(self, t: f64) -> f64 {
        let t = t.clamp(0.0, 1.0);
        match self {
            Self::Linear => t,
            Self::OutQuad => 1.0 - (1.0 - t) * (1.0 - t),
            Self::OutCubic => 1.0 - (1.0 - t).powi(3),
            Self::InOutCubic => {
                if t < 0.5 {
                    4.0 * t * t * t
                } else {
                    1.0 - ((-2.0 * t + 2.0).powi(3) / 2.0)
                }
            }
        }
    }

    /// CSS `transition-timing-function` equivalent.
    pub fn css(self) -> &'static str {
        match self {
            Self::Linear => "linear",
            Self::OutQuad => "cubic-bezier(0.5, 1, 0.89, 1)",
            Self::OutCubic => "cubic-bezier(0.33, 1, 0.68, 1)",
            Self::InOutCubic => "cubic-bezier(0.65, 0, 0.35, 1)",
        }
    }
}
