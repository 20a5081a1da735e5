//! The display-side pipeline: submissions in, scenes out.
//!
//! Everything runs on the caller's thread. The layout engine is the only asynchronous step;
//! its completions queue on a channel and are applied by [`CloudRenderer::poll`]. Each pass is
//! stamped with a [`Generation`] and only a completion for the latest generation may replace
//! the scene, so a slow earlier pass can never overwrite a newer one.

use std::{
    sync::mpsc,
    time::{Duration, Instant},
};

use crate::{
    aggregate::{SubmissionBuffer, WordFrequencies},
    config::CloudConfig,
    foundation::{
        core::{CanvasSize, Theme},
        error::CloudResult,
    },
    layout::{
        Completion, Generation, LayoutEngine, LayoutJob, LayoutOutcome, LayoutWord,
        rotation::RotationPolicy,
    },
    scene::{
        Scene, SceneState,
        svg::{SvgOptions, waiting_svg},
    },
};

pub struct CloudRenderer {
    cfg: CloudConfig,
    engine: Box<dyn LayoutEngine>,
    rotation: Box<dyn RotationPolicy>,
    canvas: CanvasSize,
    theme: Theme,
    question: Option<String>,
    buffer: SubmissionBuffer,
    generation: Generation,
    in_flight: Option<Generation>,
    state: SceneState,
    tx: mpsc::Sender<LayoutOutcome>,
    rx: mpsc::Receiver<LayoutOutcome>,
}

impl CloudRenderer {
    pub fn new(
        cfg: CloudConfig,
        canvas: CanvasSize,
        engine: impl LayoutEngine + 'static,
    ) -> CloudResult<Self> {
        let rotation = cfg.rotation_policy()?;
        Self::with_rotation(cfg, canvas, engine, rotation)
    }

    pub fn with_rotation(
        cfg: CloudConfig,
        canvas: CanvasSize,
        engine: impl LayoutEngine + 'static,
        rotation: impl RotationPolicy + 'static,
    ) -> CloudResult<Self> {
        cfg.validate()?;
        canvas.validate()?;
        let (tx, rx) = mpsc::channel();
        Ok(Self {
            theme: cfg.theme,
            cfg,
            engine: Box::new(engine),
            rotation: Box::new(rotation),
            canvas,
            question: None,
            buffer: SubmissionBuffer::new(),
            generation: Generation::default(),
            in_flight: None,
            state: SceneState::Waiting,
            tx,
            rx,
        })
    }

    pub fn config(&self) -> &CloudConfig {
        &self.cfg
    }

    pub fn canvas(&self) -> CanvasSize {
        self.canvas
    }

    pub fn theme(&self) -> Theme {
        self.theme
    }

    pub fn question(&self) -> Option<&str> {
        self.question.as_deref()
    }

    pub fn submissions(&self) -> &SubmissionBuffer {
        &self.buffer
    }

    pub fn frequencies(&self) -> WordFrequencies {
        self.buffer.frequencies()
    }

    pub fn generation(&self) -> Generation {
        self.generation
    }

    /// Generation of the layout pass still awaiting completion, if any.
    pub fn in_flight(&self) -> Option<Generation> {
        self.in_flight
    }

    pub fn state(&self) -> &SceneState {
        &self.state
    }

    pub fn state_mut(&mut self) -> &mut SceneState {
        &mut self.state
    }

    pub fn scene(&self) -> Option<&Scene> {
        self.state.scene()
    }

    /// New prompt: drop every submission and clear the scene immediately, even if the text
    /// is unchanged. Any pass still in flight becomes stale.
    pub fn question_changed(&mut self, question: impl Into<String>) {
        let question = question.into();
        tracing::debug!(%question, dropped = self.buffer.len(), "question changed");
        self.question = Some(question);
        self.buffer.clear();
        self.invalidate();
        self.state = SceneState::Waiting;
    }

    pub fn word_received(&mut self, word: impl Into<String>) {
        self.buffer.push(word);
        self.relayout();
    }

    /// Append a batch of words with a single layout pass.
    pub fn words_received<I, S>(&mut self, words: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        for w in words {
            self.buffer.push(w);
        }
        self.relayout();
    }

    /// Canvas resize: same data, fresh layout.
    pub fn resize(&mut self, canvas: CanvasSize) -> CloudResult<()> {
        canvas.validate()?;
        if canvas == self.canvas {
            return Ok(());
        }
        self.canvas = canvas;
        self.relayout();
        Ok(())
    }

    pub fn set_theme(&mut self, theme: Theme) {
        if theme == self.theme {
            return;
        }
        self.theme = theme;
        self.relayout();
    }

    /// Start a full layout pass for the current buffer. Empty input goes straight to the
    /// waiting state without touching the engine.
    pub fn relayout(&mut self) {
        let freqs = self.buffer.frequencies();
        if freqs.is_empty() {
            self.invalidate();
            self.state = SceneState::Waiting;
            return;
        }

        let generation = self.invalidate();
        let words = self
            .cfg
            .size_scale()
            .size_all(&freqs)
            .into_iter()
            .map(|w| LayoutWord {
                rotation: self.rotation.pick(&w.text),
                text: w.text,
                count: w.count,
                font_size: w.font_size,
                weight: w.weight,
            })
            .collect();

        let job = LayoutJob {
            generation,
            canvas: self.canvas,
            padding: self.cfg.padding,
            words,
        };
        tracing::debug!(
            generation = generation.0,
            unique = freqs.len(),
            total = freqs.total(),
            "starting layout pass"
        );
        self.in_flight = Some(generation);
        self.engine
            .start(job, Completion::new(generation, self.tx.clone()));
    }

    /// Drain finished layout passes. Returns `true` if the scene was replaced.
    pub fn poll(&mut self) -> bool {
        let mut applied = false;
        while let Ok(outcome) = self.rx.try_recv() {
            applied |= self.apply(outcome);
        }
        applied
    }

    /// Block until the in-flight pass completes or `timeout` elapses. A timeout too large to
    /// form a deadline waits without limit.
    pub fn wait(&mut self, timeout: Duration) -> bool {
        let deadline = Instant::now().checked_add(timeout);
        while self.in_flight.is_some() {
            let next = match deadline {
                Some(deadline) => self
                    .rx
                    .recv_timeout(deadline.saturating_duration_since(Instant::now()))
                    .ok(),
                None => self.rx.recv().ok(),
            };
            match next {
                Some(outcome) => {
                    if self.apply(outcome) {
                        return true;
                    }
                }
                None => return false,
            }
        }
        false
    }

    fn apply(&mut self, outcome: LayoutOutcome) -> bool {
        if outcome.generation != self.generation {
            tracing::debug!(
                stale = outcome.generation.0,
                current = self.generation.0,
                "discarding stale layout result"
            );
            return false;
        }
        self.in_flight = None;
        self.state = SceneState::Ready(Scene::compose(
            &outcome.placed,
            self.canvas,
            self.theme,
            &self.cfg,
        ));
        true
    }

    fn invalidate(&mut self) -> Generation {
        if let Some(prev) = self.in_flight.take() {
            tracing::trace!(superseded = prev.0, "layout pass superseded");
        }
        self.generation = self.generation.next();
        self.generation
    }

    /// Current display as SVG: the scene, or the waiting placeholder.
    pub fn to_svg(&self, opts: SvgOptions) -> String {
        match &self.state {
            SceneState::Ready(scene) => scene.to_svg(opts),
            SceneState::Waiting => waiting_svg(self.canvas, self.theme, &self.cfg.font_family),
        }
    }
}
