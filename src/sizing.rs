use crate::{
    aggregate::WordFrequencies,
    foundation::error::{CloudError, CloudResult},
};

pub const DEFAULT_MIN_FONT_SIZE: f64 = 16.0;
pub const DEFAULT_MAX_FONT_SIZE: f64 = 72.0;

/// Two-valued weight class: words seen more than once are emphasized.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FontWeight {
    Normal,
    Emphasized,
}

impl FontWeight {
    pub fn for_count(count: u32) -> Self {
        if count > 1 {
            Self::Emphasized
        } else {
            Self::Normal
        }
    }

    /// Numeric CSS weight.
    pub fn css_weight(self) -> u16 {
        match self {
            Self::Normal => 600,
            Self::Emphasized => 700,
        }
    }
}

/// Linear count-to-size mapping relative to the current maximum count.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct SizeScale {
    pub min: f64,
    pub max: f64,
}

impl Default for SizeScale {
    fn default() -> Self {
        Self {
            min: DEFAULT_MIN_FONT_SIZE,
            max: DEFAULT_MAX_FONT_SIZE,
        }
    }
}

impl SizeScale {
    pub fn new(min: f64, max: f64) -> CloudResult<Self> {
        let scale = Self { min, max };
        scale.validate()?;
        Ok(scale)
    }

    pub fn validate(self) -> CloudResult<()> {
        if !self.min.is_finite() || !self.max.is_finite() {
            return Err(CloudError::validation("font sizes must be finite"));
        }
        if self.min <= 0.0 {
            return Err(CloudError::validation("min font size must be > 0"));
        }
        if self.min > self.max {
            return Err(CloudError::validation(
                "min font size must be <= max font size",
            ));
        }
        Ok(())
    }

    /// `min + (count / max_count) * (max - min)`, clamped to `[min, max]`.
    ///
    /// Every word whose count equals the maximum gets `max`, so a cloud of all-unique words
    /// renders uniformly at the largest size.
    pub fn size_for(self, count: u32, max_count: u32) -> f64 {
        let max_count = max_count.max(1);
        let ratio = f64::from(count) / f64::from(max_count);
        (self.min + ratio * (self.max - self.min)).clamp(self.min, self.max)
    }

    pub fn size_all(self, freqs: &WordFrequencies) -> Vec<SizedWord> {
        let Some(max_count) = freqs.max_count() else {
            return Vec::new();
        };
        freqs
            .iter()
            .map(|e| SizedWord {
                text: e.text.clone(),
                count: e.count,
                font_size: self.size_for(e.count, max_count),
                weight: FontWeight::for_count(e.count),
            })
            .collect()
    }
}

/// A unique word with its derived presentation size.
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub struct SizedWord {
    pub text: String,
    pub count: u32,
    pub font_size: f64,
    pub weight: FontWeight,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn reference_scenario_sizes() {
        let freqs = WordFrequencies::aggregate(&["red", "blue", "red", "red", "green"]);
        let sized = SizeScale::default().size_all(&freqs);
        let by_text = |t: &str| sized.iter().find(|w| w.text == t).unwrap().font_size;

        assert!(approx(by_text("red"), 72.0));
        assert!(approx(by_text("blue"), 16.0 + 56.0 / 3.0));
        assert!(approx(by_text("green"), 16.0 + 56.0 / 3.0));
    }

    #[test]
    fn equal_counts_all_get_max() {
        let freqs = WordFrequencies::aggregate(&["a", "b", "c"]);
        for w in SizeScale::default().size_all(&freqs) {
            assert!(approx(w.font_size, DEFAULT_MAX_FONT_SIZE));
            assert_eq!(w.weight, FontWeight::Normal);
        }
    }

    #[test]
    fn monotonic_in_count() {
        let scale = SizeScale::default();
        let mut prev = 0.0;
        for c in 1..=10 {
            let s = scale.size_for(c, 10);
            assert!(s >= prev);
            assert!((DEFAULT_MIN_FONT_SIZE..=DEFAULT_MAX_FONT_SIZE).contains(&s));
            prev = s;
        }
    }

    #[test]
    fn weight_class_follows_count() {
        assert_eq!(FontWeight::for_count(1), FontWeight::Normal);
        assert_eq!(FontWeight::for_count(2), FontWeight::Emphasized);
        assert_eq!(FontWeight::Emphasized.css_weight(), 700);
    }

    #[test]
    fn invalid_scales_are_rejected() {
        assert!(SizeScale::new(0.0, 10.0).is_err());
        assert!(SizeScale::new(20.0, 10.0).is_err());
        assert!(SizeScale::new(10.0, f64::INFINITY).is_err());
        assert!(SizeScale::new(12.0, 12.0).is_ok());
    }

    #[test]
    fn empty_mapping_sizes_nothing() {
        let freqs = WordFrequencies::aggregate::<&str>(&[]);
        assert!(SizeScale::default().size_all(&freqs).is_empty());
    }
}
