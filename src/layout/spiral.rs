//! Archimedean-spiral word packer.
//!
//! Words are placed largest-first. Each word walks outward from the canvas center along a
//! spiral stretched to the canvas aspect ratio until its padded, rotated footprint neither
//! overlaps an already placed word nor leaves the canvas. Words that run out of spiral are
//! dropped.

use crate::{
    foundation::core::{CanvasSize, Rect, Vec2},
    layout::{
        Completion, LayoutEngine, LayoutJob, PlacedWord,
        measure::{HeuristicMeasure, TextMeasure},
    },
};

/// Radians advanced per spiral step; the radius grows by the same amount in pixels.
const SPIRAL_STEP: f64 = 0.1;

/// Upper bound on candidate positions tried per word.
const MAX_SPIRAL_STEPS: usize = 200_000;

/// Oriented rectangle in center-relative canvas space.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Footprint {
    center: Vec2,
    axes: [Vec2; 2],
    half: [f64; 2],
}

impl Footprint {
    pub fn new(center: Vec2, width: f64, height: f64, rotation_deg: f64) -> Self {
        let (sin, cos) = rotation_deg.to_radians().sin_cos();
        Self {
            center,
            axes: [Vec2::new(cos, sin), Vec2::new(-sin, cos)],
            half: [width * 0.5, height * 0.5],
        }
    }

    pub fn corners(&self) -> [Vec2; 4] {
        let u = self.axes[0] * self.half[0];
        let v = self.axes[1] * self.half[1];
        [
            self.center - u - v,
            self.center + u - v,
            self.center + u + v,
            self.center - u + v,
        ]
    }

    pub fn bounding_box(&self) -> Rect {
        let c = self.corners();
        let (mut x0, mut y0, mut x1, mut y1) = (c[0].x, c[0].y, c[0].x, c[0].y);
        for p in &c[1..] {
            x0 = x0.min(p.x);
            y0 = y0.min(p.y);
            x1 = x1.max(p.x);
            y1 = y1.max(p.y);
        }
        Rect::new(x0, y0, x1, y1)
    }

    fn project(&self, axis: Vec2) -> (f64, f64) {
        let c = self.center.dot(axis);
        let r = self.half[0] * self.axes[0].dot(axis).abs()
            + self.half[1] * self.axes[1].dot(axis).abs();
        (c - r, c + r)
    }

    /// Separating-axis test; touching edges do not count as overlap.
    pub fn overlaps(&self, other: &Footprint) -> bool {
        for axis in self.axes.iter().chain(other.axes.iter()) {
            let (a0, a1) = self.project(*axis);
            let (b0, b1) = other.project(*axis);
            if a1 <= b0 + 1e-9 || b1 <= a0 + 1e-9 {
                return false;
            }
        }
        true
    }

    pub fn within(&self, bounds: Rect) -> bool {
        let bb = self.bounding_box();
        bb.x0 >= bounds.x0 && bb.y0 >= bounds.y0 && bb.x1 <= bounds.x1 && bb.y1 <= bounds.y1
    }
}

pub struct SpiralLayout<M = HeuristicMeasure> {
    measure: M,
}

impl Default for SpiralLayout<HeuristicMeasure> {
    fn default() -> Self {
        Self::new(HeuristicMeasure::default())
    }
}

impl<M: TextMeasure> SpiralLayout<M> {
    pub fn new(measure: M) -> Self {
        Self { measure }
    }

    /// Place as many words of `job` as fit. Output is in placement order (largest first).
    #[tracing::instrument(skip(self, job), fields(generation = job.generation.0, words = job.words.len()))]
    pub fn place(&mut self, job: &LayoutJob) -> Vec<PlacedWord> {
        let mut order: Vec<usize> = (0..job.words.len()).collect();
        order.sort_by(|&a, &b| {
            job.words[b]
                .font_size
                .total_cmp(&job.words[a].font_size)
        });

        let bounds = job.canvas.centered_rect();
        let spiral = Spiral::for_canvas(job.canvas);
        let mut occupied = Vec::<Footprint>::with_capacity(order.len());
        let mut placed = Vec::<PlacedWord>::with_capacity(order.len());

        for idx in order {
            let word = &job.words[idx];
            let ext = self.measure.measure(&word.text, word.font_size, word.weight);
            let w = ext.width + 2.0 * job.padding;
            let h = ext.height + 2.0 * job.padding;

            let found = spiral.points().find_map(|p| {
                let fp = Footprint::new(p, w, h, word.rotation);
                let free = fp.within(bounds) && !occupied.iter().any(|o| o.overlaps(&fp));
                free.then_some(fp)
            });

            match found {
                Some(fp) => {
                    placed.push(PlacedWord::at(word, fp.center.x, fp.center.y));
                    occupied.push(fp);
                }
                None => {
                    tracing::debug!(
                        text = %word.text,
                        font_size = word.font_size,
                        "word does not fit; dropped"
                    );
                }
            }
        }

        placed
    }
}

impl<M: TextMeasure> LayoutEngine for SpiralLayout<M> {
    fn start(&mut self, job: LayoutJob, done: Completion) {
        let placed = self.place(&job);
        done.complete(placed);
    }
}

#[derive(Clone, Copy, Debug)]
struct Spiral {
    aspect: f64,
    max_steps: usize,
}

impl Spiral {
    fn for_canvas(canvas: CanvasSize) -> Self {
        let aspect = canvas.width / canvas.height;
        let reach = canvas.width.hypot(canvas.height);
        Self {
            aspect,
            max_steps: ((reach / SPIRAL_STEP).ceil() as usize).min(MAX_SPIRAL_STEPS),
        }
    }

    fn points(self) -> impl Iterator<Item = Vec2> {
        (0..=self.max_steps).map(move |i| {
            let t = i as f64 * SPIRAL_STEP;
            Vec2::new(self.aspect * t * t.cos(), t * t.sin())
        })
    }
}
