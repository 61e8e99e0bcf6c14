//! Embedded rendering surface boundary.
//!
//! Each list row displays its markup in an embedded rendering surface. The
//! surface lays the markup out off the screen's context and posts messages
//! back onto it. A measurement message has the shape
//! `{"scrollHeight": <number>}` and is posted to the
//! [`HEIGHT_HANDLER`](crate::render::html::HEIGHT_HANDLER) handler.
//!
//! Every message is stamped with the [`ChannelId`] it was loaded under.
//! Channels carry a generation, so a message produced for an earlier binding
//! of a recycled row can never be mistaken for one produced for the current
//! binding. [`MessageRouter`] is the only path from a message to a row.

pub mod router;
pub mod simulated;

pub use router::MessageRouter;
pub use simulated::{SimulatedSurface, SurfaceMetrics};

use crate::model::RowInstanceId;
use crate::render::html::HEIGHT_HANDLER;
use crate::render::RenderedMarkup;
use crate::view_state::types::{InvalidRenderHeight, RenderHeight};
use serde::Deserialize;
use std::fmt;

/// Identity of one render cycle of one row instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ChannelId {
    instance: RowInstanceId,
    generation: u64,
}

impl ChannelId {
    /// Create a channel id. Normally allocated by [`MessageRouter::open`].
    pub fn new(instance: RowInstanceId, generation: u64) -> Self {
        Self {
            instance,
            generation,
        }
    }

    /// Row instance the channel belongs to.
    pub fn instance(&self) -> RowInstanceId {
        self.instance
    }

    /// Render cycle generation.
    pub fn generation(&self) -> u64 {
        self.generation
    }
}

impl fmt::Display for ChannelId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/gen{}", self.instance, self.generation)
    }
}

/// A message posted by the rendering surface.
#[derive(Debug, Clone, PartialEq)]
pub struct SurfaceMessage {
    /// Channel the markup was loaded under.
    pub channel: ChannelId,
    /// Script message handler name.
    pub handler: String,
    /// Message body as posted by the page script.
    pub body: serde_json::Value,
}

impl SurfaceMessage {
    /// Build a height measurement message.
    pub fn measurement(channel: ChannelId, scroll_height: f64) -> Self {
        Self {
            channel,
            handler: HEIGHT_HANDLER.to_string(),
            body: serde_json::json!({ "scrollHeight": scroll_height }),
        }
    }

    /// True if the message was posted to the height handler.
    pub fn is_measurement(&self) -> bool {
        self.handler == HEIGHT_HANDLER
    }

    /// Decode the measured height from the body.
    pub fn measured_height(&self) -> Result<RenderHeight, MalformedMeasurement> {
        let payload: MeasurementPayload = serde_json::from_value(self.body.clone())
            .map_err(|e| MalformedMeasurement::MissingHeight(e.to_string()))?;
        Ok(RenderHeight::new(payload.scroll_height)?)
    }
}

#[derive(Debug, Deserialize)]
struct MeasurementPayload {
    #[serde(rename = "scrollHeight")]
    scroll_height: f64,
}

/// Why a height message body could not be decoded.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum MalformedMeasurement {
    /// `scrollHeight` absent or not a number.
    #[error("measurement body has no numeric scrollHeight: {0}")]
    MissingHeight(String),
    /// `scrollHeight` negative, non-finite or above [`RenderHeight::MAX`].
    #[error(transparent)]
    InvalidHeight(#[from] InvalidRenderHeight),
}

/// The embedded rendering surface as seen by the quiz screen.
///
/// Implementations render asynchronously and deliver results as
/// [`SurfaceMessage`]s onto the screen's context (see
/// [`QuizScreen::pump`](crate::view_state::screen::QuizScreen::pump)).
pub trait RenderSurface {
    /// Display markup in the row instance named by `channel`.
    ///
    /// Replaces whatever that instance was showing. Messages produced for this
    /// load MUST carry `channel`.
    fn load(&mut self, channel: ChannelId, markup: &RenderedMarkup);

    /// Stop displaying the markup loaded under `channel`.
    fn unload(&mut self, channel: ChannelId);
}

impl<S: RenderSurface + ?Sized> RenderSurface for &mut S {
    fn load(&mut self, channel: ChannelId, markup: &RenderedMarkup) {
        (**self).load(channel, markup)
    }

    fn unload(&mut self, channel: ChannelId) {
        (**self).unload(channel)
    }
}

impl<S: RenderSurface + ?Sized> RenderSurface for Box<S> {
    fn load(&mut self, channel: ChannelId, markup: &RenderedMarkup) {
        (**self).load(channel, markup)
    }

    fn unload(&mut self, channel: ChannelId) {
        (**self).unload(channel)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn channel() -> ChannelId {
        ChannelId::new(RowInstanceId::new(1), 7)
    }

    fn message(body: serde_json::Value) -> SurfaceMessage {
        SurfaceMessage {
            channel: channel(),
            handler: HEIGHT_HANDLER.to_string(),
            body,
        }
    }

    #[test]
    fn measured_height_decodes_float_and_integer() {
        assert_eq!(
            message(json!({"scrollHeight": 42.5})).measured_height(),
            Ok(RenderHeight::new(42.5).unwrap())
        );
        assert_eq!(
            message(json!({"scrollHeight": 42})).measured_height(),
            Ok(RenderHeight::new(42.0).unwrap())
        );
    }

    #[test]
    fn measured_height_ignores_extra_fields() {
        let msg = message(json!({"scrollHeight": 10, "width": 320}));
        assert_eq!(msg.measured_height(), Ok(RenderHeight::new(10.0).unwrap()));
    }

    #[test]
    fn oversized_height_is_malformed() {
        let result = message(json!({"scrollHeight": 1e20})).measured_height();
        assert_eq!(
            result,
            Err(MalformedMeasurement::InvalidHeight(InvalidRenderHeight(1e20)))
        );
    }

    #[test]
    fn missing_field_is_malformed() {
        let result = message(json!({"height": 42})).measured_height();
        assert!(matches!(result, Err(MalformedMeasurement::MissingHeight(_))));
    }

    #[test]
    fn string_height_is_malformed() {
        let result = message(json!({"scrollHeight": "42"})).measured_height();
        assert!(matches!(result, Err(MalformedMeasurement::MissingHeight(_))));
    }

    #[test]
    fn negative_height_is_malformed() {
        let result = message(json!({"scrollHeight": -3.0})).measured_height();
        assert!(matches!(result, Err(MalformedMeasurement::InvalidHeight(_))));
    }

    #[test]
    fn measurement_constructor_targets_height_handler() {
        let msg = SurfaceMessage::measurement(channel(), 12.0);
        assert!(msg.is_measurement());
        assert_eq!(msg.body, json!({"scrollHeight": 12.0}));
    }

    #[test]
    fn channel_display_includes_generation() {
        assert_eq!(channel().to_string(), "row#1/gen7");
    }
}
