//! Layout adapter: the contract between the renderer and a spatial packing engine.
//!
//! A layout pass is a [`LayoutJob`] stamped with the [`Generation`] that requested it. The
//! engine reports back exactly once through the consuming [`Completion`] handle; the renderer
//! applies the result only if its generation is still current. Engines are never cancelled.

pub mod measure;
pub mod rotation;
pub mod spiral;

use std::sync::{Arc, Mutex, mpsc};

use crate::{foundation::core::CanvasSize, sizing::FontWeight};

/// Monotonic render-pass counter.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize,
)]
pub struct Generation(pub u64);

impl Generation {
    pub fn next(self) -> Self {
        Self(self.0.wrapping_add(1))
    }
}

/// One unique word as handed to the engine.
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub struct LayoutWord {
    pub text: String,
    pub count: u32,
    pub font_size: f64,
    pub weight: FontWeight,
    /// Degrees, clockwise in canvas space.
    pub rotation: f64,
}

#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub struct LayoutJob {
    pub generation: Generation,
    pub canvas: CanvasSize,
    pub padding: f64,
    pub words: Vec<LayoutWord>,
}

/// Engine output for one word. `x`/`y` are offsets of the glyph center from the canvas center.
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub struct PlacedWord {
    pub text: String,
    pub x: f64,
    pub y: f64,
    pub rotation: f64,
    pub font_size: f64,
    pub count: u32,
    pub weight: FontWeight,
}

impl PlacedWord {
    pub fn at(word: &LayoutWord, x: f64, y: f64) -> Self {
        Self {
            text: word.text.clone(),
            x,
            y,
            rotation: word.rotation,
            font_size: word.font_size,
            count: word.count,
            weight: word.weight,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct LayoutOutcome {
    pub generation: Generation,
    pub placed: Vec<PlacedWord>,
}

/// Single-use completion signal for a layout pass.
#[derive(Debug)]
pub struct Completion {
    generation: Generation,
    tx: mpsc::Sender<LayoutOutcome>,
}

impl Completion {
    pub(crate) fn new(generation: Generation, tx: mpsc::Sender<LayoutOutcome>) -> Self {
        Self { generation, tx }
    }

    pub fn generation(&self) -> Generation {
        self.generation
    }

    pub fn complete(self, placed: Vec<PlacedWord>) {
        let outcome = LayoutOutcome {
            generation: self.generation,
            placed,
        };
        if self.tx.send(outcome).is_err() {
            tracing::trace!(
                generation = self.generation.0,
                "renderer dropped before layout completed"
            );
        }
    }
}

/// Best-effort packing engine. May omit words it cannot place.
pub trait LayoutEngine {
    fn start(&mut self, job: LayoutJob, done: Completion);
}

impl<E: LayoutEngine + ?Sized> LayoutEngine for Box<E> {
    fn start(&mut self, job: LayoutJob, done: Completion) {
        (**self).start(job, done);
    }
}

/// Runs each job of the wrapped engine on its own worker thread.
///
/// Jobs are serialized on the inner engine, but completions can still arrive after newer
/// jobs were started from the renderer's point of view.
pub struct ThreadedLayout<E> {
    engine: Arc<Mutex<E>>,
}

impl<E> ThreadedLayout<E> {
    pub fn new(engine: E) -> Self {
        Self {
            engine: Arc::new(Mutex::new(engine)),
        }
    }
}

impl<E: LayoutEngine + Send + 'static> LayoutEngine for ThreadedLayout<E> {
    fn start(&mut self, job: LayoutJob, done: Completion) {
        let engine = Arc::clone(&self.engine);
        std::thread::spawn(move || match engine.lock() {
            Ok(mut engine) => engine.start(job, done),
            Err(_) => tracing::warn!(
                generation = done.generation().0,
                "layout engine poisoned; dropping job"
            ),
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Echo;

    impl LayoutEngine for Echo {
        fn start(&mut self, job: LayoutJob, done: Completion) {
            let placed = job
                .words
                .iter()
                .map(|w| PlacedWord::at(w, 0.0, 0.0))
                .collect();
            done.complete(placed);
        }
    }

    fn job(generation: Generation) -> LayoutJob {
        LayoutJob {
            generation,
            canvas: CanvasSize::default(),
            padding: 8.0,
            words: vec![LayoutWord {
                text: "hello".to_string(),
                count: 2,
                font_size: 72.0,
                weight: FontWeight::Emphasized,
                rotation: 90.0,
            }],
        }
    }

    #[test]
    fn generation_is_monotonic() {
        let g = Generation::default();
        assert!(g.next() > g);
        assert_eq!(g.next().next(), Generation(2));
    }

    #[test]
    fn completion_carries_generation_and_inherited_fields() {
        let (tx, rx) = mpsc::channel();
        let g = Generation(7);
        Echo.start(job(g), Completion::new(g, tx));

        let outcome = rx.try_recv().unwrap();
        assert_eq!(outcome.generation, g);
        assert_eq!(outcome.placed.len(), 1);
        assert_eq!(outcome.placed[0].font_size, 72.0);
        assert_eq!(outcome.placed[0].rotation, 90.0);
        assert_eq!(outcome.placed[0].weight, FontWeight::Emphasized);
    }

    #[test]
    fn threaded_engine_reports_through_channel() {
        let (tx, rx) = mpsc::channel();
        let mut engine = ThreadedLayout::new(Echo);
        engine.start(job(Generation(3)), Completion::new(Generation(3), tx));

        let outcome = rx
            .recv_timeout(std::time::Duration::from_secs(5))
            .unwrap();
        assert_eq!(outcome.generation, Generation(3));
    }

    #[test]
    fn completing_after_receiver_drop_is_silent() {
        let (tx, rx) = mpsc::channel();
        drop(rx);
        Completion::new(Generation(1), tx).complete(Vec::new());
    }
}
