//! Async render height probe - one per visible row instance.
//!
//! # State machine
//!
//! ```text
//!            bind (cache hit)
//!   Idle ─────────────────────────────► Resolved(h)
//!     │                                    ▲
//!     │ bind (cache miss)                  │ first valid message
//!     ▼                                    │
//!   Pending(channel) ──────────────────────┘
//!
//!   any state ── reset / rebind ──► Idle
//! ```
//!
//! - A cache hit resolves synchronously. The markup is still loaded into the
//!   surface for display, but no channel is registered, so its measurement is
//!   never listened for.
//! - A cache miss registers a one-shot channel and waits.
//! - The accepted height is written to the cache *before* it is reported, so
//!   rows sharing markup converge on one entry.
//! - Messages after resolution are rejected as duplicates.
//! - Reset unregisters the channel before anything else; a message from the
//!   previous binding cannot be routed to the next one.

use super::cache::RenderSizeCache;
use super::types::RenderHeight;
use crate::model::{RowInstanceId, RowKey};
use crate::render::RenderedMarkup;
use crate::surface::{ChannelId, MalformedMeasurement, MessageRouter, RenderSurface, SurfaceMessage};
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

/// Measurement state of the current binding.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ProbeState {
    /// Not bound to any content.
    Idle,
    /// Markup submitted, waiting for the surface's measurement.
    Pending {
        /// When the markup was submitted.
        since: Instant,
        /// Timeout elapsed; the row shows its estimate and stops loading.
        expired: bool,
    },
    /// A height was accepted for the current binding.
    Resolved {
        /// The accepted height.
        height: RenderHeight,
        /// True if the height came from the cache without a measurement.
        from_cache: bool,
    },
}

/// Result of binding a probe to content.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum BindOutcome {
    /// Height known from the cache; resolved synchronously.
    CacheHit(RenderHeight),
    /// Measurement started; a message is expected on this channel.
    Measuring(ChannelId),
}

/// A height accepted by a probe.
#[derive(Debug, Clone, PartialEq)]
pub struct Resolution {
    /// Row instance that measured.
    pub instance: RowInstanceId,
    /// Content the instance was showing.
    pub row: RowKey,
    /// Measured height.
    pub height: RenderHeight,
}

/// Why an inbound message did not transition the probe.
///
/// None of these are failures of the screen; they are reported so callers can
/// log or count them.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum MeasurementRejection {
    /// Message belongs to a render cycle that is no longer current.
    #[error("stale message for {channel}")]
    Stale {
        /// Channel the message was stamped with.
        channel: ChannelId,
    },
    /// The probe already resolved for this binding.
    #[error("duplicate measurement for {channel}")]
    Duplicate {
        /// Channel the message was stamped with.
        channel: ChannelId,
    },
    /// The body did not carry a usable height.
    #[error("malformed measurement for {channel}: {reason}")]
    Malformed {
        /// Channel the message was stamped with.
        channel: ChannelId,
        /// Decode failure.
        reason: MalformedMeasurement,
    },
    /// Posted to a handler other than the height handler.
    #[error("message for unrelated handler {handler:?}")]
    UnrelatedHandler {
        /// Handler name.
        handler: String,
    },
}

#[derive(Debug, Clone)]
struct Binding {
    row: RowKey,
    markup: RenderedMarkup,
    channel: ChannelId,
}

/// Per-row-instance height measurement controller.
#[derive(Debug)]
pub struct HeightProbe {
    instance: RowInstanceId,
    binding: Option<Binding>,
    state: ProbeState,
}

impl HeightProbe {
    /// Create an idle probe for a row instance.
    pub fn new(instance: RowInstanceId) -> Self {
        Self {
            instance,
            binding: None,
            state: ProbeState::Idle,
        }
    }

    /// Row instance this probe belongs to.
    pub fn instance(&self) -> RowInstanceId {
        self.instance
    }

    /// Current state.
    pub fn state(&self) -> ProbeState {
        self.state
    }

    /// Content currently bound.
    pub fn row(&self) -> Option<&RowKey> {
        self.binding.as_ref().map(|b| &b.row)
    }

    /// Markup currently bound.
    pub fn markup(&self) -> Option<&RenderedMarkup> {
        self.binding.as_ref().map(|b| &b.markup)
    }

    /// Channel of the current render cycle.
    pub fn channel(&self) -> Option<ChannelId> {
        self.binding.as_ref().map(|b| b.channel)
    }

    /// Accepted height, if resolved.
    pub fn height(&self) -> Option<RenderHeight> {
        match self.state {
            ProbeState::Resolved { height, .. } => Some(height),
            _ => None,
        }
    }

    /// Whether the row should show its loading indicator.
    ///
    /// On while idle or pending, off once resolved or expired.
    pub fn is_loading(&self) -> bool {
        match self.state {
            ProbeState::Idle => true,
            ProbeState::Pending { expired, .. } => !expired,
            ProbeState::Resolved { .. } => false,
        }
    }

    /// Bind to content, resetting any previous binding first.
    pub fn bind(
        &mut self,
        row: RowKey,
        markup: RenderedMarkup,
        cache: &RenderSizeCache,
        router: &mut MessageRouter,
        surface: &mut dyn RenderSurface,
        now: Instant,
    ) -> BindOutcome {
        self.reset(router, surface);

        let channel = router.open(self.instance);
        let cached = cache.get(&markup);

        let outcome = match cached {
            Some(height) => {
                debug!(instance = %self.instance, %row, %height, "render size cache hit");
                self.state = ProbeState::Resolved {
                    height,
                    from_cache: true,
                };
                BindOutcome::CacheHit(height)
            }
            None => {
                debug!(instance = %self.instance, %row, %channel, "render size cache miss, measuring");
                router.register(channel);
                self.state = ProbeState::Pending {
                    since: now,
                    expired: false,
                };
                BindOutcome::Measuring(channel)
            }
        };

        // displayed either way; only the measurement is skipped on a hit
        surface.load(channel, &markup);
        self.binding = Some(Binding {
            row,
            markup,
            channel,
        });

        outcome
    }

    /// Drop the current binding and return to idle.
    ///
    /// Unregisters the measurement channel before anything else.
    pub fn reset(&mut self, router: &mut MessageRouter, surface: &mut dyn RenderSurface) {
        if let Some(binding) = self.binding.take() {
            router.unregister(binding.channel);
            surface.unload(binding.channel);
            debug!(instance = %self.instance, row = %binding.row, "probe reset");
        }
        self.state = ProbeState::Idle;
    }

    /// Offer an inbound message to the probe.
    ///
    /// On success the height has already been stored in `cache`.
    pub fn receive(
        &mut self,
        message: &SurfaceMessage,
        cache: &mut RenderSizeCache,
    ) -> Result<Resolution, MeasurementRejection> {
        let channel = message.channel;

        let binding = match &self.binding {
            Some(b) if b.channel == channel => b,
            _ => return Err(MeasurementRejection::Stale { channel }),
        };

        if !message.is_measurement() {
            return Err(MeasurementRejection::UnrelatedHandler {
                handler: message.handler.clone(),
            });
        }

        if let ProbeState::Resolved { .. } = self.state {
            debug!(%channel, "ignoring duplicate measurement");
            return Err(MeasurementRejection::Duplicate { channel });
        }

        let height = match message.measured_height() {
            Ok(height) => height,
            Err(reason) => {
                warn!(%channel, row = %binding.row, %reason, body = %message.body, "malformed measurement message");
                return Err(MeasurementRejection::Malformed { channel, reason });
            }
        };

        cache.set(height, binding.markup.clone());
        self.state = ProbeState::Resolved {
            height,
            from_cache: false,
        };
        info!(instance = %self.instance, row = %binding.row, %height, "row height measured");

        Ok(Resolution {
            instance: self.instance,
            row: binding.row.clone(),
            height,
        })
    }

    /// Mark a pending measurement as timed out.
    ///
    /// Returns true if this call expired the probe. The channel stays
    /// registered: a late measurement still resolves the row.
    pub fn expire(&mut self, now: Instant, timeout: Duration) -> bool {
        match &mut self.state {
            ProbeState::Pending { since, expired } if !*expired => {
                if now.saturating_duration_since(*since) < timeout {
                    return false;
                }
                *expired = true;
                if let Some(binding) = &self.binding {
                    warn!(
                        instance = %self.instance,
                        row = %binding.row,
                        timeout_ms = timeout.as_millis() as u64,
                        "measurement timed out, keeping estimated height"
                    );
                }
                true
            }
            _ => false,
        }
    }
}

#[cfg(test)]
#[path = "probe_tests.rs"]
mod tests;
