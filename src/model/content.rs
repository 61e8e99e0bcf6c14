//! Rich content carried by questions and options.
//!
//! Content is an ordered list of blocks. The quiz file encodes each block as a
//! JSON object tagged by `"type"`:
//!
//! ```json
//! [
//!   {"type": "text", "text": "What is the capital of "},
//!   {"type": "emphasis", "text": "France"},
//!   {"type": "math", "tex": "x^2"},
//!   {"type": "image", "src": "map.png", "alt": "Map", "height": 120}
//! ]
//! ```

use serde::{Deserialize, Serialize};

/// One block of rich content.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ContentBlock {
    /// Plain running text.
    Text {
        /// The text.
        text: String,
    },
    /// Emphasized running text.
    Emphasis {
        /// The text.
        text: String,
    },
    /// Inline TeX math, typeset by the rendering surface.
    Math {
        /// TeX source.
        tex: String,
    },
    /// Preformatted code.
    Code {
        /// Code text, newlines preserved.
        code: String,
    },
    /// An image with optional intrinsic size in layout points.
    Image {
        /// Image source URL or path.
        src: String,
        /// Alternate text.
        #[serde(default)]
        alt: String,
        /// Intrinsic width.
        #[serde(default)]
        width: Option<u32>,
        /// Intrinsic height.
        #[serde(default)]
        height: Option<u32>,
    },
    /// Forced line break.
    LineBreak,
}

/// Ordered rich content of a question or option.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Content {
    blocks: Vec<ContentBlock>,
}

impl Content {
    /// Create content from blocks.
    pub fn new(blocks: Vec<ContentBlock>) -> Self {
        Self { blocks }
    }

    /// Single plain-text paragraph.
    pub fn text(text: impl Into<String>) -> Self {
        Self::new(vec![ContentBlock::Text { text: text.into() }])
    }

    /// The blocks in display order.
    pub fn blocks(&self) -> &[ContentBlock] {
        &self.blocks
    }

    /// True if there are no blocks.
    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }
}
