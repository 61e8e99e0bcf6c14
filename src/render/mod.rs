//! Content rendering - rich content to markup.
//!
//! The renderer is a pure function of its input: identical content always
//! yields byte-identical markup. The height cache relies on this, keying
//! measurements by markup rather than by which question or option produced it.

pub mod html;

pub use html::HtmlRenderer;

use crate::model::Content;
use std::fmt;

/// Markup produced by a [`ContentRenderer`].
///
/// Opaque to everything but the rendering surface. Used as the key of the
/// render size cache, so two content values that render identically share one
/// measured height.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RenderedMarkup(String);

impl RenderedMarkup {
    /// Wrap a markup string.
    pub fn new(markup: impl Into<String>) -> Self {
        Self(markup.into())
    }

    /// Borrow the markup.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Length in bytes.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// True for empty markup.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for RenderedMarkup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for RenderedMarkup {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

/// Converts content into markup for the rendering surface.
///
/// # Contract
/// - MUST be deterministic (same content, same markup)
/// - MUST NOT depend on which row or option the content belongs to
pub trait ContentRenderer {
    /// Render content to markup.
    fn render(&self, content: &Content) -> RenderedMarkup;
}

impl<R: ContentRenderer + ?Sized> ContentRenderer for &R {
    fn render(&self, content: &Content) -> RenderedMarkup {
        (**self).render(content)
    }
}

impl<R: ContentRenderer + ?Sized> ContentRenderer for Box<R> {
    fn render(&self, content: &Content) -> RenderedMarkup {
        (**self).render(content)
    }
}
