//! Scene composition: placed words become styled, positioned glyph nodes.
//!
//! A [`Scene`] is rebuilt from scratch for every applied layout pass. Hover emphasis and the
//! staggered entrance are presentation state carried on the scene; they never feed back into
//! aggregation or layout.

pub mod palette;
pub mod svg;

use crate::{
    config::CloudConfig,
    ease::Ease,
    foundation::core::{CanvasSize, Rgb8, Theme, Vec2},
    layout::PlacedWord,
    sizing::FontWeight,
};

/// Entrance timing for one glyph.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize)]
pub struct Reveal {
    pub delay_ms: f64,
    pub duration_ms: f64,
}

#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub struct GlyphNode {
    pub text: String,
    /// Glyph center relative to the canvas center.
    pub offset: Vec2,
    pub rotation: f64,
    pub font_size: f64,
    pub hover_font_size: f64,
    pub weight: FontWeight,
    pub count: u32,
    pub color: Rgb8,
    pub reveal: Reveal,
}

#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub struct Scene {
    pub canvas: CanvasSize,
    pub theme: Theme,
    pub font_family: String,
    pub opacity: f64,
    pub hover_transition_ms: u32,
    pub reveal_ease: Ease,
    pub nodes: Vec<GlyphNode>,
    hovered: Option<usize>,
}

pub const HOVER_OPACITY: f64 = 1.0;

impl Scene {
    #[tracing::instrument(skip_all, fields(words = placed.len()))]
    pub fn compose(
        placed: &[PlacedWord],
        canvas: CanvasSize,
        theme: Theme,
        cfg: &CloudConfig,
    ) -> Self {
        let palette = cfg.palette(theme);
        let nodes = placed
            .iter()
            .enumerate()
            .map(|(i, p)| GlyphNode {
                text: p.text.clone(),
                offset: Vec2::new(p.x, p.y),
                rotation: p.rotation,
                font_size: p.font_size,
                hover_font_size: p.font_size * cfg.hover_scale,
                weight: p.weight,
                count: p.count,
                color: palette::color_at(palette, i),
                reveal: Reveal {
                    delay_ms: i as f64 * f64::from(cfg.reveal_stagger_ms),
                    duration_ms: f64::from(cfg.reveal_duration_ms),
                },
            })
            .collect();

        Self {
            canvas,
            theme,
            font_family: cfg.font_family.clone(),
            opacity: cfg.opacity,
            hover_transition_ms: cfg.hover_transition_ms,
            reveal_ease: cfg.reveal_ease,
            nodes,
            hovered: None,
        }
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn node(&self, text: &str) -> Option<&GlyphNode> {
        self.nodes.iter().find(|n| n.text == text)
    }

    pub fn hovered(&self) -> Option<usize> {
        self.hovered
    }

    /// Pointer entered glyph `index`. Returns `false` for an unknown index.
    pub fn pointer_enter(&mut self, index: usize) -> bool {
        if index >= self.nodes.len() {
            return false;
        }
        self.hovered = Some(index);
        true
    }

    /// Pointer left glyph `index`; emphasis reverts only if that glyph held it.
    pub fn pointer_leave(&mut self, index: usize) {
        if self.hovered == Some(index) {
            self.hovered = None;
        }
    }

    pub fn display_font_size(&self, index: usize) -> Option<f64> {
        let node = self.nodes.get(index)?;
        Some(if self.hovered == Some(index) {
            node.hover_font_size
        } else {
            node.font_size
        })
    }

    pub fn display_opacity(&self, index: usize) -> Option<f64> {
        self.nodes.get(index)?;
        Some(if self.hovered == Some(index) {
            HOVER_OPACITY
        } else {
            self.opacity
        })
    }

    /// Entrance opacity of glyph `index`, `elapsed_ms` after the scene was shown.
    pub fn opacity_at(&self, index: usize, elapsed_ms: f64) -> Option<f64> {
        let node = self.nodes.get(index)?;
        let local = elapsed_ms - node.reveal.delay_ms;
        if local <= 0.0 {
            return Some(0.0);
        }
        let t = if node.reveal.duration_ms > 0.0 {
            local / node.reveal.duration_ms
        } else {
            1.0
        };
        Some(self.reveal_ease.apply(t) * self.opacity)
    }

    /// Time until the last glyph finishes its entrance.
    pub fn reveal_end_ms(&self) -> f64 {
        self.nodes
            .iter()
            .map(|n| n.reveal.delay_ms + n.reveal.duration_ms)
            .fold(0.0, f64::max)
    }
}

/// What the display currently shows.
#[derive(Clone, Debug, Default, PartialEq)]
pub enum SceneState {
    /// No submissions for the active question.
    #[default]
    Waiting,
    Ready(Scene),
}

impl SceneState {
    pub fn scene(&self) -> Option<&Scene> {
        match self {
            Self::Waiting => None,
            Self::Ready(scene) => Some(scene),
        }
    }

    pub fn scene_mut(&mut self) -> Option<&mut Scene> {
        match self {
            Self::Waiting => None,
            Self::Ready(scene) => Some(scene),
        }
    }

    pub fn is_waiting(&self) -> bool {
        matches!(self, Self::Waiting)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn placed(text: &str, size: f64, count: u32) -> PlacedWord {
        PlacedWord {
            text: text.to_string(),
            x: 10.0,
            y: -5.0,
            rotation: 45.0,
            font_size: size,
            count,
            weight: FontWeight::for_count(count),
        }
    }

    fn scene_of(n: usize, theme: Theme) -> Scene {
        let words: Vec<PlacedWord> = (0..n).map(|i| placed(&format!("w{i}"), 20.0, 1)).collect();
        Scene::compose(&words, CanvasSize::default(), theme, &CloudConfig::default())
    }

    #[test]
    fn colors_follow_list_position() {
        let s = scene_of(12, Theme::Light);
        assert_eq!(s.nodes[0].color, palette::LIGHT_PALETTE[0]);
        assert_eq!(s.nodes[10].color, palette::LIGHT_PALETTE[0]);
        assert_eq!(s.nodes[11].color, palette::LIGHT_PALETTE[1]);

        let s = scene_of(3, Theme::Dark);
        assert_eq!(s.nodes[2].color, palette::DARK_PALETTE[2]);
    }

    #[test]
    fn nodes_inherit_placement_and_weight() {
        let s = Scene::compose(
            &[placed("red", 72.0, 3), placed("blue", 34.0, 1)],
            CanvasSize::default(),
            Theme::Light,
            &CloudConfig::default(),
        );
        let red = s.node("red").unwrap();
        assert_eq!(red.offset, Vec2::new(10.0, -5.0));
        assert_eq!(red.rotation, 45.0);
        assert_eq!(red.weight, FontWeight::Emphasized);
        assert_eq!(s.node("blue").unwrap().weight, FontWeight::Normal);
    }

    #[test]
    fn reveal_is_staggered_by_position() {
        let s = scene_of(3, Theme::Light);
        assert_eq!(s.nodes[0].reveal.delay_ms, 0.0);
        assert_eq!(s.nodes[1].reveal.delay_ms, 50.0);
        assert_eq!(s.nodes[2].reveal.delay_ms, 100.0);
        assert_eq!(s.reveal_end_ms(), 900.0);

        // At 50ms the first word is partly visible, the second not yet.
        assert!(s.opacity_at(0, 50.0).unwrap() > 0.0);
        assert_eq!(s.opacity_at(1, 50.0).unwrap(), 0.0);
        assert!((s.opacity_at(2, 10_000.0).unwrap() - 0.9).abs() < 1e-9);
        assert_eq!(s.opacity_at(3, 0.0), None);
    }

    #[test]
    fn hover_emphasis_reverts_on_exit() {
        let mut s = scene_of(2, Theme::Light);
        assert_eq!(s.display_font_size(0), Some(20.0));

        assert!(s.pointer_enter(0));
        assert!((s.display_font_size(0).unwrap() - 22.0).abs() < 1e-9);
        assert_eq!(s.display_opacity(0), Some(1.0));
        assert_eq!(s.display_font_size(1), Some(20.0));

        // Leaving a different glyph does not clear the emphasis.
        s.pointer_leave(1);
        assert_eq!(s.hovered(), Some(0));

        s.pointer_leave(0);
        assert_eq!(s.hovered(), None);
        assert_eq!(s.display_font_size(0), Some(20.0));
        assert_eq!(s.display_opacity(0), Some(0.9));

        assert!(!s.pointer_enter(99));
    }
}
