//! Headless screen driver used by the command-line binary.
//!
//! Wires a [`QuizScreen`] to the [`SimulatedSurface`] and a
//! [`RecordingListLayer`], binds every visible row for a number of reuse
//! passes, and summarizes the resulting layout.

use crate::config::ResolvedConfig;
use crate::model::{AppError, Quiz, RowInstanceId};
use crate::render::HtmlRenderer;
use crate::surface::SimulatedSurface;
use crate::view_state::{
    ChoiceState, QuizScreen, RecordingListLayer, ScreenStats, VisibleIndex,
};
use serde::Serialize;
use std::fmt;
use std::time::Instant;
use tracing::info;

/// User actions applied before the rows are laid out.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunOptions {
    /// Option ids to eliminate.
    pub eliminate: Vec<String>,
    /// Option id to select.
    pub select: Option<String>,
    /// Option id to mark.
    pub mark: Option<String>,
    /// Number of bind passes. Every pass after the first rebinds each row
    /// instance to different content.
    pub passes: usize,
}

/// Final layout of one visible row.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RowReport {
    /// Visible position.
    pub position: usize,
    /// `question` or `option:<id>`.
    pub row: String,
    /// Top offset in whole points.
    pub offset: usize,
    /// Displayed height in points.
    pub height: f64,
    /// False if the row still shows the estimate.
    pub measured: bool,
}

/// Counters for one bind pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PassReport {
    /// 1-based pass number.
    pub pass: usize,
    /// Rows answered from the cache.
    pub cache_hits: usize,
    /// Rows that had to be measured.
    pub cache_misses: usize,
    /// Targeted height recomputations the list layer received.
    pub reflows: usize,
}

/// Everything the driver learned.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LayoutReport {
    /// Surface viewport width in points.
    pub viewport_width: u32,
    /// Visible rows in display order.
    pub rows: Vec<RowReport>,
    /// Eliminated option ids in authored order.
    pub eliminated: Vec<String>,
    /// `none`, `selected:<id>` or `marked:<id>`.
    pub choice: String,
    /// Whether the toolbar's primary action is enabled.
    pub primary_action_enabled: bool,
    /// Total height of the visible rows in whole points.
    pub content_height: usize,
    /// Per-pass counters.
    pub passes: Vec<PassReport>,
    /// Distinct markups measured before dismissal.
    pub cache_entries: usize,
    /// Session counters.
    pub stats: ScreenStats,
}

/// Lay out `quiz` headlessly and report the result.
///
/// # Errors
///
/// Fails on invalid settings or on option ids that are not part of the quiz.
pub fn run(quiz: Quiz, config: &ResolvedConfig, options: &RunOptions) -> Result<LayoutReport, AppError> {
    let settings = config.screen_settings()?;
    let (surface, inbox) = SimulatedSurface::new(config.surface_metrics());
    let mut screen = QuizScreen::new(
        quiz,
        HtmlRenderer::new(),
        surface,
        RecordingListLayer::new(),
        settings,
    );

    for raw in &options.eliminate {
        let id = screen.quiz().option_id(raw)?;
        if !screen.rows().order().is_eliminated(&id) {
            screen.toggle_elimination(&id)?;
        }
    }
    if let Some(raw) = &options.select {
        let id = screen.quiz().option_id(raw)?;
        screen.select(&id)?;
    }
    if let Some(raw) = &options.mark {
        let id = screen.quiz().option_id(raw)?;
        screen.mark(&id)?;
    }

    let mut passes = Vec::with_capacity(options.passes);
    for pass in 0..options.passes.max(1) {
        let before = screen.stats();
        let reflows_before = screen.list().height_pass_count();

        let rows = screen.rows().visible_rows();
        let now = Instant::now();
        for instance in 0..rows.len() {
            // rotate content across instances so later passes exercise reuse
            let row = rows[(instance + pass) % rows.len()].clone();
            screen.bind_row(RowInstanceId::new(instance as u32), row, now)?;
        }
        while screen.pump(&inbox) > 0 {}
        screen.tick(Instant::now());

        let after = screen.stats();
        passes.push(PassReport {
            pass: pass + 1,
            cache_hits: after.cache_hits - before.cache_hits,
            cache_misses: after.cache_misses - before.cache_misses,
            reflows: screen.list().height_pass_count() - reflows_before,
        });
    }

    let rows = screen
        .rows()
        .visible_rows()
        .into_iter()
        .enumerate()
        .map(|(position, row)| {
            let index = VisibleIndex::new(position);
            RowReport {
                position,
                offset: screen.rows().offset_of(index).unwrap_or_default(),
                height: screen.height_for_row(&row).get(),
                measured: screen.rows().recorded(&row).is_some(),
                row: row.to_string(),
            }
        })
        .collect();

    let report = LayoutReport {
        viewport_width: config.viewport_width,
        rows,
        eliminated: screen
            .rows()
            .order()
            .eliminated()
            .map(|id| id.to_string())
            .collect(),
        choice: describe_choice(screen.choice()),
        primary_action_enabled: screen.primary_action_enabled(),
        content_height: screen.rows().content_height(),
        passes,
        cache_entries: screen.cache().len(),
        stats: screen.stats(),
    };

    screen.dismiss();
    info!(
        rows = report.rows.len(),
        content_height = report.content_height,
        "layout complete"
    );
    Ok(report)
}

fn describe_choice(choice: &ChoiceState) -> String {
    match choice {
        ChoiceState::None => "none".to_string(),
        ChoiceState::Selected(id) => format!("selected:{id}"),
        ChoiceState::Marked(id) => format!("marked:{id}"),
    }
}

impl fmt::Display for LayoutReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "viewport width: {}pt", self.viewport_width)?;
        for row in &self.rows {
            writeln!(
                f,
                "{:>3}  {:<16} offset {:>5}  height {:>7.1}{}",
                row.position,
                row.row,
                row.offset,
                row.height,
                if row.measured { "" } else { "  (estimated)" }
            )?;
        }
        writeln!(f, "content height: {}pt", self.content_height)?;
        if !self.eliminated.is_empty() {
            writeln!(f, "eliminated: {}", self.eliminated.join(", "))?;
        }
        writeln!(
            f,
            "choice: {} (primary action {})",
            self.choice,
            if self.primary_action_enabled { "enabled" } else { "disabled" }
        )?;
        for pass in &self.passes {
            writeln!(
                f,
                "pass {}: {} cache hits, {} measured, {} reflows",
                pass.pass, pass.cache_hits, pass.cache_misses, pass.reflows
            )?;
        }
        write!(
            f,
            "cache: {} entries, {} rejected messages, {} stale",
            self.cache_entries, self.stats.messages_rejected, self.stats.stale_messages
        )
    }
}
