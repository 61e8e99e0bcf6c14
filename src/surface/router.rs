//! Message routing from surface channels to row instances.
//!
//! # Invariant
//! At most one registered channel per row instance. Registering a new
//! channel for an instance requires the previous one to have been
//! unregistered first; a message carrying any other generation is unroutable.

use super::{ChannelId, SurfaceMessage};
use crate::model::RowInstanceId;
use std::collections::HashMap;

/// Registry of live one-shot measurement channels.
#[derive(Debug, Default)]
pub struct MessageRouter {
    next_generation: u64,
    registered: HashMap<RowInstanceId, u64>,
}

impl MessageRouter {
    /// Create an empty router.
    pub fn new() -> Self {
        Self::default()
    }

    /// Allocate a fresh channel id for a render cycle of `instance`.
    ///
    /// Generations are unique across all instances for the router's lifetime.
    /// The channel is not registered until [`register`](Self::register).
    pub fn open(&mut self, instance: RowInstanceId) -> ChannelId {
        self.next_generation += 1;
        ChannelId::new(instance, self.next_generation)
    }

    /// Start routing messages for `channel`.
    ///
    /// # Panics
    ///
    /// Panics if the instance still has a different registered channel.
    /// Rebinding a row without unregistering first would let a stale
    /// measurement reach the new binding.
    pub fn register(&mut self, channel: ChannelId) {
        if let Some(previous) = self.registered.get(&channel.instance()) {
            assert_eq!(
                *previous,
                channel.generation(),
                "{} registered while gen{} still live",
                channel,
                previous
            );
        }
        self.registered
            .insert(channel.instance(), channel.generation());
    }

    /// Stop routing messages for `channel`.
    ///
    /// Returns false if the channel was not the instance's registered one.
    pub fn unregister(&mut self, channel: ChannelId) -> bool {
        match self.registered.get(&channel.instance()) {
            Some(generation) if *generation == channel.generation() => {
                self.registered.remove(&channel.instance());
                true
            }
            _ => false,
        }
    }

    /// Whether `channel` is currently registered.
    pub fn is_registered(&self, channel: ChannelId) -> bool {
        self.registered.get(&channel.instance()) == Some(&channel.generation())
    }

    /// Row instance that should receive `message`, if any.
    pub fn route(&self, message: &SurfaceMessage) -> Option<RowInstanceId> {
        self.is_registered(message.channel)
            .then(|| message.channel.instance())
    }

    /// Number of registered channels.
    pub fn len(&self) -> usize {
        self.registered.len()
    }

    /// True if nothing is registered.
    pub fn is_empty(&self) -> bool {
        self.registered.is_empty()
    }

    /// Unregister every channel.
    pub fn clear(&mut self) {
        self.registered.clear();
    }
}
