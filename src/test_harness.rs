//! Test harness for screen and probe tests.
//!
//! Provides a scripted rendering surface that records every load and unload
//! and never measures on its own, so tests decide exactly which messages
//! arrive and when.

use crate::model::{AnswerOption, Content, OptionId, Question, QuestionId, Quiz, RowInstanceId};
use crate::render::RenderedMarkup;
use crate::surface::{ChannelId, RenderSurface, SurfaceMessage};

/// A surface event recorded by [`ScriptedSurface`].
#[derive(Debug, Clone, PartialEq)]
pub enum SurfaceCall {
    /// `load(channel, markup)`
    Load(ChannelId, RenderedMarkup),
    /// `unload(channel)`
    Unload(ChannelId),
}

/// Rendering surface that only records calls.
#[derive(Debug, Default)]
pub struct ScriptedSurface {
    calls: Vec<SurfaceCall>,
}

impl ScriptedSurface {
    pub fn new() -> Self {
        Self::default()
    }

    /// All recorded calls in order.
    pub fn calls(&self) -> &[SurfaceCall] {
        &self.calls
    }

    /// Channels loaded so far, in order.
    pub fn loaded_channels(&self) -> Vec<ChannelId> {
        self.calls
            .iter()
            .filter_map(|c| match c {
                SurfaceCall::Load(channel, _) => Some(*channel),
                SurfaceCall::Unload(_) => None,
            })
            .collect()
    }

    /// Most recent channel loaded for a row instance.
    pub fn last_channel(&self, instance: RowInstanceId) -> Option<ChannelId> {
        self.loaded_channels()
            .into_iter()
            .rev()
            .find(|c| c.instance() == instance)
    }

    /// Build the measurement message the page would post for the most
    /// recent load of `instance`.
    pub fn measurement_for(&self, instance: RowInstanceId, height: f64) -> SurfaceMessage {
        let channel = self
            .last_channel(instance)
            .expect("instance has been loaded");
        SurfaceMessage::measurement(channel, height)
    }
}

impl RenderSurface for ScriptedSurface {
    fn load(&mut self, channel: ChannelId, markup: &RenderedMarkup) {
        self.calls.push(SurfaceCall::Load(channel, markup.clone()));
    }

    fn unload(&mut self, channel: ChannelId) {
        self.calls.push(SurfaceCall::Unload(channel));
    }
}

/// Option id helper.
pub fn opt(id: &str) -> OptionId {
    OptionId::new(id).expect("valid test option id")
}

/// Row instance helper.
pub fn row(n: u32) -> RowInstanceId {
    RowInstanceId::new(n)
}

/// Quiz with plain-text options `(id, text)`.
pub fn quiz(question: &str, options: &[(&str, &str)]) -> Quiz {
    Quiz::new(
        Question {
            id: QuestionId::new("q1").expect("valid test question id"),
            content: Content::text(question),
        },
        options
            .iter()
            .map(|(id, text)| AnswerOption {
                id: opt(id),
                content: Content::text(*text),
            })
            .collect(),
    )
    .expect("valid test quiz")
}

/// The capital-of-France quiz used across screen tests.
///
/// Options `a` and `d` share content, so they render to identical markup.
pub fn capital_quiz() -> Quiz {
    quiz(
        "What is the capital of France?",
        &[("a", "Paris"), ("b", "Lyon"), ("c", "Marseille"), ("d", "Paris")],
    )
}
