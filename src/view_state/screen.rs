//! Quiz screen controller.
//!
//! Owns every piece of per-screen state (render size cache, message router,
//! one probe per row instance, the list height coordinator and the choice
//! state) and drives them from a single cooperative context. The list layer
//! binds row instances as they scroll into view; the rendering surface posts
//! measurements back, which are fed in through [`QuizScreen::deliver`] or
//! [`QuizScreen::pump`].
//!
//! Nothing here blocks. Observers learn about resolutions and visual changes
//! by draining [`ScreenEvent`]s.

use super::cache::RenderSizeCache;
use super::list_layer::ListLayer;
use super::option_order::OptionOrder;
use super::probe::{BindOutcome, HeightProbe, MeasurementRejection, ProbeState, Resolution};
use super::row_heights::ListHeightCoordinator;
use super::selection::{ChoiceChange, ChoiceGlyph, ChoiceState};
use super::types::{RenderHeight, VisibleIndex};
use crate::model::{Content, OptionId, Quiz, QuizError, RowInstanceId, RowKey};
use crate::render::{ContentRenderer, RenderedMarkup};
use crate::surface::{MessageRouter, RenderSurface, SurfaceMessage};
use serde::Serialize;
use std::collections::BTreeMap;
use std::sync::mpsc::Receiver;
use std::time::{Duration, Instant};
use tracing::{debug, info};

/// Layout knobs for a screen.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScreenSettings {
    /// Height reported for rows that have not been measured yet.
    pub estimated_row_height: RenderHeight,
    /// Fixed presentation offset added to every measured height.
    pub row_padding: RenderHeight,
    /// How long a measurement may stay pending. `None` waits forever.
    pub measurement_timeout: Option<Duration>,
}

impl Default for ScreenSettings {
    fn default() -> Self {
        Self {
            estimated_row_height: RenderHeight::new(200.0).unwrap_or(RenderHeight::ZERO),
            row_padding: RenderHeight::new(48.0).unwrap_or(RenderHeight::ZERO),
            measurement_timeout: Some(Duration::from_millis(3000)),
        }
    }
}

/// Something an observer of the screen may want to react to.
#[derive(Debug, Clone, PartialEq)]
pub enum ScreenEvent {
    /// A row instance knows the height of its content.
    HeightResolved {
        /// Row instance that resolved.
        instance: RowInstanceId,
        /// Content it is showing.
        row: RowKey,
        /// Content height, without padding.
        height: RenderHeight,
        /// True if no measurement was needed.
        from_cache: bool,
    },
    /// The row's loading indicator turned on or off.
    LoadingChanged {
        /// Row instance.
        instance: RowInstanceId,
        /// New indicator state.
        loading: bool,
    },
    /// A pending measurement ran past the timeout.
    MeasurementTimedOut {
        /// Row instance.
        instance: RowInstanceId,
        /// Content it is showing.
        row: RowKey,
    },
    /// Selection or mark changed.
    ChoiceChanged(ChoiceState),
    /// The toolbar's primary action was enabled or disabled.
    PrimaryActionChanged(bool),
    /// An option was eliminated or restored.
    EliminationChanged {
        /// Option.
        option: OptionId,
        /// New elimination state.
        eliminated: bool,
    },
}

/// Counters for one screen session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct ScreenStats {
    /// Binds answered from the render size cache.
    pub cache_hits: usize,
    /// Binds that started a measurement.
    pub cache_misses: usize,
    /// Measurements that resolved a row.
    pub measurements_accepted: usize,
    /// Duplicate, malformed or misaddressed messages for a live binding.
    pub messages_rejected: usize,
    /// Messages for channels that are not registered: earlier bindings of a
    /// reused row, and the measurement every cache-hit load still posts.
    pub stale_messages: usize,
}

/// What a bound row instance currently shows.
///
/// While a measurement is pending only the activity indicator is visible;
/// the content surface and the choice glyph stay hidden until it resolves.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RowVisuals {
    /// Activity indicator over the row.
    pub loading_indicator: bool,
    /// The rendering surface itself.
    pub content_visible: bool,
    /// Choice glyph; `None` for the question row and while loading.
    pub glyph: Option<ChoiceGlyph>,
}

/// Controller for one question and its options.
pub struct QuizScreen<R, S, L> {
    quiz: Quiz,
    renderer: R,
    surface: S,
    list: L,
    settings: ScreenSettings,
    cache: RenderSizeCache,
    router: MessageRouter,
    probes: BTreeMap<RowInstanceId, HeightProbe>,
    rows: ListHeightCoordinator,
    choice: ChoiceState,
    events: Vec<ScreenEvent>,
    stats: ScreenStats,
}

impl<R, S, L> QuizScreen<R, S, L>
where
    R: ContentRenderer,
    S: RenderSurface,
    L: ListLayer,
{
    /// Create a screen for `quiz`. Nothing is bound or measured yet.
    pub fn new(quiz: Quiz, renderer: R, surface: S, list: L, settings: ScreenSettings) -> Self {
        let order = OptionOrder::new(quiz.options().iter().map(|o| o.id.clone()));
        let rows = ListHeightCoordinator::new(
            order,
            settings.estimated_row_height,
            settings.row_padding,
        );
        Self {
            quiz,
            renderer,
            surface,
            list,
            settings,
            cache: RenderSizeCache::new(),
            router: MessageRouter::new(),
            probes: BTreeMap::new(),
            rows,
            choice: ChoiceState::default(),
            events: Vec::new(),
            stats: ScreenStats::default(),
        }
    }

    /// Bind a row instance to content.
    ///
    /// Any previous binding of the instance is torn down first. On a cache
    /// hit the height is reported immediately.
    pub fn bind_row(
        &mut self,
        instance: RowInstanceId,
        row: RowKey,
        now: Instant,
    ) -> Result<BindOutcome, QuizError> {
        let markup = self.markup_for(&row)?;
        let probe = self
            .probes
            .entry(instance)
            .or_insert_with(|| HeightProbe::new(instance));

        let outcome = probe.bind(
            row.clone(),
            markup,
            &self.cache,
            &mut self.router,
            &mut self.surface,
            now,
        );

        match outcome {
            BindOutcome::CacheHit(height) => {
                self.stats.cache_hits += 1;
                self.events.push(ScreenEvent::HeightResolved {
                    instance,
                    row: row.clone(),
                    height,
                    from_cache: true,
                });
                self.events.push(ScreenEvent::LoadingChanged {
                    instance,
                    loading: false,
                });
                self.rows.on_height_resolved(row, height, &mut self.list);
            }
            BindOutcome::Measuring(_) => {
                self.stats.cache_misses += 1;
                self.events.push(ScreenEvent::LoadingChanged {
                    instance,
                    loading: true,
                });
            }
        }

        Ok(outcome)
    }

    /// Tear down a row instance's binding. Late messages for it become stale.
    pub fn unbind_row(&mut self, instance: RowInstanceId) {
        if let Some(mut probe) = self.probes.remove(&instance) {
            probe.reset(&mut self.router, &mut self.surface);
        }
    }

    /// Feed one message from the rendering surface.
    pub fn deliver(&mut self, message: &SurfaceMessage) -> Result<Resolution, MeasurementRejection> {
        let result = self.accept(message);
        match &result {
            Ok(resolution) => {
                self.stats.measurements_accepted += 1;
                self.events.push(ScreenEvent::HeightResolved {
                    instance: resolution.instance,
                    row: resolution.row.clone(),
                    height: resolution.height,
                    from_cache: false,
                });
                self.events.push(ScreenEvent::LoadingChanged {
                    instance: resolution.instance,
                    loading: false,
                });
                self.rows
                    .on_height_resolved(resolution.row.clone(), resolution.height, &mut self.list);
            }
            Err(rejection @ MeasurementRejection::Stale { .. }) => {
                self.stats.stale_messages += 1;
                debug!(%rejection, "stale message dropped");
            }
            Err(rejection) => {
                self.stats.messages_rejected += 1;
                debug!(%rejection, "message rejected");
            }
        }
        result
    }

    fn accept(&mut self, message: &SurfaceMessage) -> Result<Resolution, MeasurementRejection> {
        let stale = MeasurementRejection::Stale {
            channel: message.channel,
        };
        let instance = self.router.route(message).ok_or_else(|| stale.clone())?;
        let probe = self.probes.get_mut(&instance).ok_or(stale)?;
        probe.receive(message, &mut self.cache)
    }

    /// Deliver every message already waiting on `inbox`.
    ///
    /// Returns how many messages were processed. Never blocks.
    pub fn pump(&mut self, inbox: &Receiver<SurfaceMessage>) -> usize {
        let mut processed = 0;
        while let Ok(message) = inbox.try_recv() {
            // rejections are counted and logged by deliver
            let _ = self.deliver(&message);
            processed += 1;
        }
        processed
    }

    /// Expire measurements pending longer than the configured timeout.
    ///
    /// Probes are visited in row instance order. Returns how many expired on
    /// this call.
    pub fn tick(&mut self, now: Instant) -> usize {
        let Some(timeout) = self.settings.measurement_timeout else {
            return 0;
        };

        let mut expired = 0;
        for probe in self.probes.values_mut() {
            if probe.expire(now, timeout) {
                expired += 1;
                let instance = probe.instance();
                if let Some(row) = probe.row() {
                    self.events.push(ScreenEvent::MeasurementTimedOut {
                        instance,
                        row: row.clone(),
                    });
                }
                self.events.push(ScreenEvent::LoadingChanged {
                    instance,
                    loading: false,
                });
            }
        }
        expired
    }

    /// Select an option as the answer, or deselect it if already selected.
    ///
    /// Eliminated options cannot be chosen; returns `Ok(false)` for them.
    pub fn select(&mut self, id: &OptionId) -> Result<bool, QuizError> {
        self.choose(id, ChoiceState::select)
    }

    /// Mark an option for review, or unmark it if already marked.
    ///
    /// Eliminated options cannot be chosen; returns `Ok(false)` for them.
    pub fn mark(&mut self, id: &OptionId) -> Result<bool, QuizError> {
        self.choose(id, ChoiceState::mark)
    }

    fn choose(
        &mut self,
        id: &OptionId,
        action: fn(&mut ChoiceState, &OptionId) -> ChoiceChange,
    ) -> Result<bool, QuizError> {
        self.require_option(id)?;
        if self.rows.order().is_eliminated(id) {
            debug!(option = %id, "ignoring choice of eliminated option");
            return Ok(false);
        }

        let was_enabled = self.choice.primary_action_enabled();
        let change = action(&mut self.choice, id);
        self.publish_choice_change(change, was_enabled);
        Ok(true)
    }

    /// Eliminate an option, or restore it if already eliminated.
    ///
    /// Returns the new elimination state. Eliminating the chosen option
    /// clears the choice; any other choice is re-published at its new
    /// position once the option rows have moved.
    pub fn toggle_elimination(&mut self, id: &OptionId) -> Result<bool, QuizError> {
        self.require_option(id)?;

        let eliminated = if self.rows.order().is_eliminated(id) {
            self.rows.restore(id, &mut self.list);
            false
        } else {
            self.rows.eliminate(id, &mut self.list);
            let was_enabled = self.choice.primary_action_enabled();
            let change = self.choice.clear_for(id);
            self.publish_choice_change(change, was_enabled);
            true
        };
        self.restore_choice_visual();

        info!(option = %id, eliminated, "option elimination toggled");
        self.events.push(ScreenEvent::EliminationChanged {
            option: id.clone(),
            eliminated,
        });
        Ok(eliminated)
    }

    fn restore_choice_visual(&mut self) {
        let Some(chosen) = self.choice.chosen() else {
            return;
        };
        if let Some(position) = self.rows.position_of(&RowKey::Option(chosen.clone())) {
            self.list.row_states_changed(&[position]);
        }
    }

    fn publish_choice_change(&mut self, change: ChoiceChange, was_enabled: bool) {
        if change.touched.is_empty() {
            return;
        }

        let positions: Vec<VisibleIndex> = change
            .touched
            .into_iter()
            .filter_map(|id| self.rows.position_of(&RowKey::Option(id)))
            .collect();
        if !positions.is_empty() {
            self.list.row_states_changed(&positions);
        }

        self.events.push(ScreenEvent::ChoiceChanged(self.choice.clone()));
        let enabled = self.choice.primary_action_enabled();
        if enabled != was_enabled {
            self.events.push(ScreenEvent::PrimaryActionChanged(enabled));
        }
    }

    /// Displayed height of a row: measured height plus padding, or the
    /// estimate while unknown.
    pub fn height_for_row(&self, row: &RowKey) -> RenderHeight {
        self.rows.height_for_row(row)
    }

    /// Displayed height of the row at a visible position.
    pub fn height_at(&self, position: VisibleIndex) -> Option<RenderHeight> {
        self.rows.height_at(position)
    }

    /// Tear the screen down: reset every probe, stop routing, flush the cache.
    pub fn dismiss(&mut self) {
        for probe in self.probes.values_mut() {
            probe.reset(&mut self.router, &mut self.surface);
        }
        self.probes.clear();
        self.router.clear();
        let flushed = self.cache.len();
        self.cache.flush();
        info!(flushed, "quiz screen dismissed");
    }

    /// Take all events produced since the last call.
    pub fn drain_events(&mut self) -> Vec<ScreenEvent> {
        std::mem::take(&mut self.events)
    }

    /// The quiz being shown.
    pub fn quiz(&self) -> &Quiz {
        &self.quiz
    }

    /// Current choice.
    pub fn choice(&self) -> &ChoiceState {
        &self.choice
    }

    /// Whether the toolbar's primary action is enabled.
    pub fn primary_action_enabled(&self) -> bool {
        self.choice.primary_action_enabled()
    }

    /// Row height bookkeeping.
    pub fn rows(&self) -> &ListHeightCoordinator {
        &self.rows
    }

    /// The render size cache.
    pub fn cache(&self) -> &RenderSizeCache {
        &self.cache
    }

    /// The message router.
    pub fn router(&self) -> &MessageRouter {
        &self.router
    }

    /// The rendering surface.
    pub fn surface(&self) -> &S {
        &self.surface
    }

    /// The list layer.
    pub fn list(&self) -> &L {
        &self.list
    }

    /// Mutable access to the list layer.
    pub fn list_mut(&mut self) -> &mut L {
        &mut self.list
    }

    /// Session counters.
    pub fn stats(&self) -> ScreenStats {
        self.stats
    }

    /// Probe state of a row instance, `None` if it is not bound.
    pub fn probe_state(&self, instance: RowInstanceId) -> Option<ProbeState> {
        self.probes.get(&instance).map(HeightProbe::state)
    }

    /// Whether a row instance shows its loading indicator.
    pub fn is_loading(&self, instance: RowInstanceId) -> bool {
        self.probes
            .get(&instance)
            .is_some_and(HeightProbe::is_loading)
    }

    /// Visuals of a bound row instance, `None` if it is not bound.
    pub fn row_visuals(&self, instance: RowInstanceId) -> Option<RowVisuals> {
        let probe = self.probes.get(&instance)?;
        let row = probe.row()?;
        let loading = probe.is_loading();
        let glyph = match row {
            RowKey::Option(id) if !loading => Some(self.choice.glyph_for(id)),
            _ => None,
        };
        Some(RowVisuals {
            loading_indicator: loading,
            content_visible: !loading,
            glyph,
        })
    }

    /// Markup a row renders to.
    pub fn markup_for(&self, row: &RowKey) -> Result<RenderedMarkup, QuizError> {
        Ok(self.renderer.render(self.content_for(row)?))
    }

    fn content_for(&self, row: &RowKey) -> Result<&Content, QuizError> {
        match row {
            RowKey::Question => Ok(&self.quiz.question().content),
            RowKey::Option(id) => self
                .quiz
                .option(id)
                .map(|o| &o.content)
                .ok_or_else(|| QuizError::UnknownOption(id.to_string())),
        }
    }

    fn require_option(&self, id: &OptionId) -> Result<(), QuizError> {
        if self.rows.order().contains(id) {
            Ok(())
        } else {
            Err(QuizError::UnknownOption(id.to_string()))
        }
    }
}

#[cfg(test)]
#[path = "screen_tests.rs"]
mod tests;
