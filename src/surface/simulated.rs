//! Simulated rendering surface.
//!
//! Lays out markup produced by [`HtmlRenderer`](crate::render::HtmlRenderer)
//! with fixed typographic metrics and posts a measurement message per load,
//! the way a page's measurement script would. Used by the command-line
//! driver and by tests that need realistic heights without a browser engine.
//!
//! Messages are delivered through a `std::sync::mpsc` channel; the screen
//! drains the receiving end on its own context.

use super::{ChannelId, RenderSurface, SurfaceMessage};
use crate::model::RowInstanceId;
use crate::render::RenderedMarkup;
use html5ever::tendril::StrTendril;
use html5ever::tokenizer::{
    BufferQueue, Tag, TagKind, Token, TokenSink, TokenSinkResult, Tokenizer, TokenizerOpts,
};
use std::collections::HashMap;
use std::sync::mpsc::{self, Receiver, Sender};
use tracing::debug;
use unicode_width::UnicodeWidthStr;

/// Typographic metrics of the simulated surface, in layout points.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SurfaceMetrics {
    /// Viewport width of each row's surface.
    pub viewport_width: f64,
    /// Body padding applied on every side.
    pub padding: f64,
    /// Advance of one terminal-width column of text.
    pub column_width: f64,
    /// Height of one line of text.
    pub line_height: f64,
    /// Space below each paragraph or code block.
    pub block_spacing: f64,
    /// Height used for images without a height attribute.
    pub default_image_height: f64,
}

impl SurfaceMetrics {
    /// Metrics for a viewport of the given width with default typography.
    pub fn with_width(viewport_width: f64) -> Self {
        Self {
            viewport_width,
            ..Self::default()
        }
    }

    fn content_width(&self) -> f64 {
        (self.viewport_width - 2.0 * self.padding).max(self.column_width)
    }

    fn columns(&self) -> usize {
        ((self.content_width() / self.column_width).floor() as usize).max(1)
    }
}

impl Default for SurfaceMetrics {
    fn default() -> Self {
        Self {
            viewport_width: 320.0,
            padding: 8.0,
            column_width: 8.5,
            line_height: 22.0,
            block_spacing: 8.0,
            default_image_height: 100.0,
        }
    }
}

/// A [`RenderSurface`] that measures markup with fixed metrics.
#[derive(Debug)]
pub struct SimulatedSurface {
    metrics: SurfaceMetrics,
    outbox: Sender<SurfaceMessage>,
    displayed: HashMap<RowInstanceId, ChannelId>,
    load_count: usize,
    echo_resize: bool,
}

impl SimulatedSurface {
    /// Create a surface and the receiving end of its message queue.
    pub fn new(metrics: SurfaceMetrics) -> (Self, Receiver<SurfaceMessage>) {
        let (outbox, inbox) = mpsc::channel();
        let surface = Self {
            metrics,
            outbox,
            displayed: HashMap::new(),
            load_count: 0,
            echo_resize: false,
        };
        (surface, inbox)
    }

    /// Post every measurement twice, as a surface does when a late resize
    /// re-runs its measurement script.
    pub fn with_resize_echo(mut self) -> Self {
        self.echo_resize = true;
        self
    }

    /// Metrics in use.
    pub fn metrics(&self) -> SurfaceMetrics {
        self.metrics
    }

    /// Total number of loads, cache hits included.
    pub fn load_count(&self) -> usize {
        self.load_count
    }

    /// Channel currently displayed by a row instance.
    pub fn displayed(&self, instance: RowInstanceId) -> Option<ChannelId> {
        self.displayed.get(&instance).copied()
    }

    /// Natural content height of markup under these metrics.
    pub fn measure(&self, markup: &RenderedMarkup) -> f64 {
        measure_markup(&self.metrics, markup.as_str())
    }

    fn post(&self, message: SurfaceMessage) {
        if self.outbox.send(message).is_err() {
            debug!("surface inbox closed, dropping message");
        }
    }
}

impl RenderSurface for SimulatedSurface {
    fn load(&mut self, channel: ChannelId, markup: &RenderedMarkup) {
        self.load_count += 1;
        self.displayed.insert(channel.instance(), channel);

        let height = self.measure(markup);
        debug!(%channel, height, "simulated layout complete");

        self.post(SurfaceMessage::measurement(channel, height));
        if self.echo_resize {
            self.post(SurfaceMessage::measurement(channel, height));
        }
    }

    fn unload(&mut self, channel: ChannelId) {
        if self.displayed.get(&channel.instance()) == Some(&channel) {
            self.displayed.remove(&channel.instance());
        }
    }
}

/// Lay out markup and return the body's scroll height.
fn measure_markup(metrics: &SurfaceMetrics, markup: &str) -> f64 {
    let mut tokenizer = Tokenizer::new(LayoutSink::new(metrics), TokenizerOpts::default());
    let mut input = BufferQueue::default();
    input.push_back(StrTendril::from_slice(markup));
    // the sink never suspends tokenization
    let _ = tokenizer.feed(&mut input);
    tokenizer.end();
    tokenizer.sink.finish()
}

/// Token sink that stacks body lines as the tokenizer produces them.
///
/// Head content (style and script text) is ignored; only tokens between
/// `<body>` and `</body>` take up space.
struct LayoutSink<'a> {
    metrics: &'a SurfaceMetrics,
    columns: usize,
    height: f64,
    in_body: bool,
    segment: String,
    preformatted: Option<String>,
}

impl<'a> LayoutSink<'a> {
    fn new(metrics: &'a SurfaceMetrics) -> Self {
        Self {
            metrics,
            columns: metrics.columns(),
            height: 2.0 * metrics.padding,
            in_body: false,
            segment: String::new(),
            preformatted: None,
        }
    }

    fn flush_segment(&mut self) {
        let lines = wrapped_line_count(&self.segment, self.columns);
        self.height += lines as f64 * self.metrics.line_height;
        self.segment.clear();
    }

    fn tag(&mut self, tag: &Tag) {
        match (tag.kind, &*tag.name) {
            (TagKind::StartTag, "body") => self.in_body = true,
            (TagKind::EndTag, "body") => {
                self.flush_segment();
                self.in_body = false;
            }
            _ if !self.in_body => {}
            (TagKind::StartTag, "pre") => {
                self.flush_segment();
                self.preformatted = Some(String::new());
            }
            (TagKind::EndTag, "pre") => {
                if let Some(text) = self.preformatted.take() {
                    let lines = preformatted_line_count(&text, self.columns);
                    self.height += lines as f64 * self.metrics.line_height;
                }
                self.height += self.metrics.block_spacing;
            }
            (TagKind::StartTag, "br") => self.flush_segment(),
            (TagKind::StartTag, "img") => {
                self.flush_segment();
                self.height += image_height(self.metrics, tag);
            }
            (TagKind::EndTag, "p") => {
                self.flush_segment();
                self.height += self.metrics.block_spacing;
            }
            _ => {}
        }
    }

    fn finish(&mut self) -> f64 {
        self.flush_segment();
        self.height
    }
}

impl TokenSink for LayoutSink<'_> {
    type Handle = ();

    fn process_token(&mut self, token: Token, _line_number: u64) -> TokenSinkResult<()> {
        match token {
            Token::TagToken(tag) => self.tag(&tag),
            Token::CharacterTokens(text) if self.in_body => match &mut self.preformatted {
                Some(pre) => pre.push_str(&text),
                None => self.segment.push_str(&text),
            },
            _ => {}
        }
        TokenSinkResult::Continue
    }
}

fn image_height(metrics: &SurfaceMetrics, tag: &Tag) -> f64 {
    let parse = |key: &str| {
        tag.attrs
            .iter()
            .find(|attr| &*attr.name.local == key)
            .and_then(|attr| attr.value.parse::<f64>().ok())
    };
    let height = parse("height").unwrap_or(metrics.default_image_height);

    // images scale down to fit the content width, preserving aspect ratio
    match parse("width") {
        Some(width) if width > metrics.content_width() => {
            height * metrics.content_width() / width
        }
        _ => height,
    }
}

/// Lines of preformatted text; every source line takes at least one.
fn preformatted_line_count(text: &str, columns: usize) -> usize {
    text.split('\n')
        .map(|line| UnicodeWidthStr::width(line).div_ceil(columns).max(1))
        .sum()
}

/// Greedy word wrap; returns the number of lines `text` occupies.
fn wrapped_line_count(text: &str, columns: usize) -> usize {
    let mut lines = 0;
    let mut current = 0usize;

    for word in text.split_whitespace() {
        let width = UnicodeWidthStr::width(word);

        if width > columns {
            if current > 0 {
                lines += 1;
            }
            lines += width / columns;
            current = width % columns;
            continue;
        }

        let needed = if current == 0 { width } else { current + 1 + width };
        if needed > columns {
            lines += 1;
            current = width;
        } else {
            current = needed;
        }
    }

    if current > 0 {
        lines += 1;
    }
    lines
}
