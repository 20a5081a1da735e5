use crate::{
    foundation::error::{CloudError, CloudResult},
    sizing::FontWeight,
};

/// Unrotated ink box of a single-line glyph run.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Extent {
    pub width: f64,
    pub height: f64,
}

pub trait TextMeasure {
    fn measure(&mut self, text: &str, font_size: f64, weight: FontWeight) -> Extent;
}

/// Font-free estimate from average advance widths.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct HeuristicMeasure {
    pub advance_em: f64,
    pub emphasized_advance_em: f64,
    pub line_height_em: f64,
}

impl Default for HeuristicMeasure {
    fn default() -> Self {
        Self {
            advance_em: 0.56,
            emphasized_advance_em: 0.6,
            line_height_em: 1.0,
        }
    }
}

impl TextMeasure for HeuristicMeasure {
    fn measure(&mut self, text: &str, font_size: f64, weight: FontWeight) -> Extent {
        let advance = match weight {
            FontWeight::Normal => self.advance_em,
            FontWeight::Emphasized => self.emphasized_advance_em,
        };
        Extent {
            width: text.chars().count() as f64 * advance * font_size,
            height: self.line_height_em * font_size,
        }
    }
}

// Emphasized glyphs are measured at regular weight and widened.
const EMPHASIS_WIDTH_FACTOR: f64 = 1.05;

/// Shapes text with Parley against a registered font.
pub struct ParleyMeasure {
    font_ctx: parley::FontContext,
    layout_ctx: parley::LayoutContext<()>,
    family_name: String,
}

impl ParleyMeasure {
    pub fn from_font_bytes(font_bytes: &[u8]) -> CloudResult<Self> {
        let mut font_ctx = parley::FontContext::default();
        let families = font_ctx
            .collection
            .register_fonts(parley::fontique::Blob::from(font_bytes.to_vec()), None);
        let family_id = families
            .first()
            .map(|(id, _)| *id)
            .ok_or_else(|| CloudError::validation("no font families registered from font bytes"))?;
        let family_name = font_ctx
            .collection
            .family_name(family_id)
            .ok_or_else(|| CloudError::validation("registered font family has no name"))?
            .to_string();

        Ok(Self {
            font_ctx,
            layout_ctx: parley::LayoutContext::new(),
            family_name,
        })
    }

    pub fn family_name(&self) -> &str {
        &self.family_name
    }
}

impl TextMeasure for ParleyMeasure {
    fn measure(&mut self, text: &str, font_size: f64, weight: FontWeight) -> Extent {
        let mut builder = self
            .layout_ctx
            .ranged_builder(&mut self.font_ctx, text, 1.0, true);
        builder.push_default(parley::style::StyleProperty::FontStack(
            parley::style::FontStack::Source(std::borrow::Cow::Owned(self.family_name.clone())),
        ));
        builder.push_default(parley::style::StyleProperty::FontSize(font_size as f32));

        let mut layout: parley::Layout<()> = builder.build(text);
        layout.break_all_lines(None);

        let mut w = 0.0f64;
        let mut h = 0.0f64;
        for line in layout.lines() {
            let m = line.metrics();
            w = w.max(f64::from(m.advance));
            h += f64::from(m.ascent + m.descent + m.leading);
        }
        if weight == FontWeight::Emphasized {
            w *= EMPHASIS_WIDTH_FACTOR;
        }

        Extent {
            width: w,
            height: h.max(font_size),
        }
    }
}
