//! The three participants of a session: admin, respondent, display.
//!
//! Each role owns its own [`ChannelClient`], connected when the role is created and
//! disconnected by [`close`](DisplaySession::close) or on drop.

use crate::{
    channel::{ChannelClient, ChannelEvent, LocalChannel},
    foundation::error::{CloudError, CloudResult},
    renderer::CloudRenderer,
};

/// Longest accepted response, in characters.
pub const MAX_RESPONSE_CHARS: usize = 100;

#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize)]
pub struct SentQuestion {
    pub seq: u64,
    pub text: String,
}

pub struct AdminConsole {
    client: ChannelClient,
    sent: Vec<SentQuestion>,
}

impl AdminConsole {
    pub fn connect(channel: &LocalChannel) -> CloudResult<Self> {
        Ok(Self {
            client: channel.connect()?,
            sent: Vec::new(),
        })
    }

    pub fn publish_question(&mut self, text: &str) -> CloudResult<()> {
        if text.trim().is_empty() {
            return Err(CloudError::validation("question must be non-empty"));
        }
        self.client.emit(ChannelEvent::Question(text.to_string()))?;
        self.sent.push(SentQuestion {
            seq: self.sent.len() as u64,
            text: text.to_string(),
        });
        Ok(())
    }

    /// Questions published during this session, oldest first.
    pub fn sent(&self) -> &[SentQuestion] {
        &self.sent
    }

    pub fn close(mut self) {
        self.client.disconnect();
    }
}

pub struct Respondent {
    client: ChannelClient,
    question: Option<String>,
    submitted: bool,
}

impl Respondent {
    pub fn connect(channel: &LocalChannel) -> CloudResult<Self> {
        Ok(Self {
            client: channel.connect()?,
            question: None,
            submitted: false,
        })
    }

    /// Process pending channel traffic. A new question re-opens the form.
    pub fn sync(&mut self) {
        while let Some(event) = self.client.try_next() {
            if let ChannelEvent::Question(q) = event {
                self.question = Some(q);
                self.submitted = false;
            }
        }
    }

    pub fn question(&self) -> Option<&str> {
        self.question.as_deref()
    }

    pub fn can_submit(&self) -> bool {
        self.question.is_some() && !self.submitted
    }

    /// Send one response for the current question. The text is sent as typed; it only has
    /// to be non-blank and at most [`MAX_RESPONSE_CHARS`] long.
    pub fn submit(&mut self, text: &str) -> CloudResult<()> {
        self.sync();
        if self.question.is_none() {
            return Err(CloudError::validation("no active question"));
        }
        if self.submitted {
            return Err(CloudError::validation(
                "already responded to the current question",
            ));
        }
        validate_response(text)?;
        self.client.emit(ChannelEvent::Word(text.to_string()))?;
        self.submitted = true;
        Ok(())
    }

    pub fn close(mut self) {
        self.client.disconnect();
    }
}

pub fn validate_response(text: &str) -> CloudResult<()> {
    if text.trim().is_empty() {
        return Err(CloudError::validation("response must be non-empty"));
    }
    let n = text.chars().count();
    if n > MAX_RESPONSE_CHARS {
        return Err(CloudError::validation(format!(
            "response is {n} characters (max {MAX_RESPONSE_CHARS})"
        )));
    }
    Ok(())
}

/// Display role: feeds channel events into a [`CloudRenderer`].
pub struct DisplaySession {
    client: ChannelClient,
    renderer: CloudRenderer,
}

impl DisplaySession {
    pub fn connect(channel: &LocalChannel, renderer: CloudRenderer) -> CloudResult<Self> {
        Ok(Self {
            client: channel.connect()?,
            renderer,
        })
    }

    pub fn renderer(&self) -> &CloudRenderer {
        &self.renderer
    }

    pub fn renderer_mut(&mut self) -> &mut CloudRenderer {
        &mut self.renderer
    }

    /// Apply all pending channel events, then any finished layout passes.
    /// Returns the number of channel events handled.
    pub fn pump(&mut self) -> usize {
        let mut handled = 0;
        while let Some(event) = self.client.try_next() {
            handle_event(&mut self.renderer, event);
            handled += 1;
        }
        self.renderer.poll();
        handled
    }

    pub fn close(mut self) -> CloudRenderer {
        self.client.disconnect();
        self.renderer
    }
}

/// Route one inbound event to the renderer.
pub fn handle_event(renderer: &mut CloudRenderer, event: ChannelEvent) {
    match event {
        ChannelEvent::Question(q) => renderer.question_changed(q),
        ChannelEvent::Word(w) => renderer.word_received(w),
    }
}
