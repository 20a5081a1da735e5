//! Live audience word cloud.
//!
//! An admin publishes a question, respondents submit short answers, and a display turns the
//! answers into a frequency-sized, spiral-packed word cloud.
//!
//! # Pipeline
//!
//! 1. **Aggregate**: submissions for the active question -> [`WordFrequencies`]
//! 2. **Size**: count relative to the current maximum -> font size in `[min, max]`
//! 3. **Layout**: a [`LayoutEngine`] packs rotated glyphs without overlap, reporting once per
//!    pass through a generation-stamped [`Completion`]
//! 4. **Compose**: placed words -> [`Scene`] (palette color, weight, hover, staggered reveal)
//!    -> SVG, optionally rasterized to PNG
//!
//! Every change to the input rebuilds all derived state from scratch. A question change clears
//! the display immediately and makes any in-flight layout pass stale.
#![forbid(unsafe_code)]

pub mod aggregate;
pub mod channel;
pub mod config;
pub mod ease;
mod foundation;
pub mod layout;
pub mod raster;
pub mod renderer;
pub mod roles;
pub mod scene;
pub mod sizing;

pub use aggregate::{SubmissionBuffer, WordCount, WordFrequencies};
pub use channel::{ChannelClient, ChannelEvent, ClientId, LocalChannel};
pub use config::{CloudConfig, DEFAULT_FONT_FAMILY};
pub use ease::Ease;
pub use foundation::core::{Affine, CanvasSize, Point, Rect, Rgb8, Theme, Vec2};
pub use foundation::error::{CloudError, CloudResult};
pub use layout::measure::{Extent, HeuristicMeasure, ParleyMeasure, TextMeasure};
pub use layout::rotation::{
    DEFAULT_ROTATIONS, RandomSource, RotationPolicy, SequenceSource, SplitMix64, UniformRotation,
};
pub use layout::spiral::{Footprint, SpiralLayout};
pub use layout::{
    Completion, Generation, LayoutEngine, LayoutJob, LayoutOutcome, LayoutWord, PlacedWord,
    ThreadedLayout,
};
pub use raster::{RasterImage, parse_svg, rasterize_svg, write_png};
pub use renderer::CloudRenderer;
pub use roles::{
    AdminConsole, DisplaySession, MAX_RESPONSE_CHARS, Respondent, SentQuestion, handle_event,
    validate_response,
};
pub use scene::svg::{SvgOptions, waiting_svg};
pub use scene::{GlyphNode, Reveal, Scene, SceneState};
pub use sizing::{FontWeight, SizeScale, SizedWord};
