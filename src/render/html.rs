//! HTML rendering of quiz content.
//!
//! Produces a self-contained HTML document per content value. The document
//! head is identical for every row: a viewport meta tag, a base stylesheet
//! and a measurement script that posts the body's natural height to the
//! `contentResizingMessageHandler` message handler once layout completes.
//! Keeping the head constant is what lets identical content share a cache
//! entry.

use super::{ContentRenderer, RenderedMarkup};
use crate::model::{Content, ContentBlock};

/// Name of the message handler the measurement script posts to.
pub const HEIGHT_HANDLER: &str = "contentResizingMessageHandler";

const BASE_STYLE: &str = "body{margin:0;padding:8px;font:17px -apple-system,sans-serif;}\
p{margin:0 0 8px 0;}pre{margin:0 0 8px 0;white-space:pre-wrap;}img{max-width:100%;}";

const MEASURE_SCRIPT: &str = "window.addEventListener('load',function(){\
window.webkit.messageHandlers.contentResizingMessageHandler.postMessage(\
{scrollHeight:document.body.scrollHeight});});";

/// Renders [`Content`] into an HTML document.
#[derive(Debug, Clone, Copy, Default)]
pub struct HtmlRenderer;

impl HtmlRenderer {
    /// Create a renderer.
    pub fn new() -> Self {
        Self
    }

    /// Render only the `<body>` contents.
    ///
    /// Inline blocks are grouped into `<p>` paragraphs; code blocks break
    /// paragraphs and render as `<pre><code>`.
    pub fn render_body(&self, content: &Content) -> String {
        let mut out = String::new();
        let mut in_paragraph = false;

        for block in content.blocks() {
            if let ContentBlock::Code { code } = block {
                if in_paragraph {
                    out.push_str("</p>");
                    in_paragraph = false;
                }
                out.push_str("<pre><code>");
                escape_into(&mut out, code);
                out.push_str("</code></pre>");
                continue;
            }

            if !in_paragraph {
                out.push_str("<p>");
                in_paragraph = true;
            }
            render_inline(&mut out, block);
        }

        if in_paragraph {
            out.push_str("</p>");
        }
        out
    }
}

impl ContentRenderer for HtmlRenderer {
    fn render(&self, content: &Content) -> RenderedMarkup {
        let body = self.render_body(content);
        RenderedMarkup::new(format!(
            "<!DOCTYPE html><html><head>\
             <meta name=\"viewport\" content=\"width=device-width, initial-scale=1\">\
             <style>{BASE_STYLE}</style><script>{MEASURE_SCRIPT}</script>\
             </head><body>{body}</body></html>"
        ))
    }
}

fn render_inline(out: &mut String, block: &ContentBlock) {
    match block {
        ContentBlock::Text { text } => escape_into(out, text),
        ContentBlock::Emphasis { text } => {
            out.push_str("<em>");
            escape_into(out, text);
            out.push_str("</em>");
        }
        ContentBlock::Math { tex } => {
            out.push_str("<span class=\"math\">\\(");
            escape_into(out, tex);
            out.push_str("\\)</span>");
        }
        ContentBlock::Image {
            src,
            alt,
            width,
            height,
        } => {
            out.push_str("<img src=\"");
            escape_attr_into(out, src);
            out.push_str("\" alt=\"");
            escape_attr_into(out, alt);
            out.push('"');
            if let Some(w) = width {
                out.push_str(&format!(" width=\"{w}\""));
            }
            if let Some(h) = height {
                out.push_str(&format!(" height=\"{h}\""));
            }
            out.push('>');
        }
        ContentBlock::LineBreak => out.push_str("<br>"),
        // block-level; render_body never passes code here
        ContentBlock::Code { code } => escape_into(out, code),
    }
}

fn escape_into(out: &mut String, text: &str) {
    out.push_str(&html_escape::encode_text(text));
}

fn escape_attr_into(out: &mut String, value: &str) {
    out.push_str(&html_escape::encode_double_quoted_attribute(value));
}
