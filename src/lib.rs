//! Quiz Pane (quizpane)
//!
//! Height coordination for a quiz screen whose rows render rich content in an
//! embedded surface: one question row plus selectable, eliminable option rows.
//! Row heights are measured asynchronously from rendered markup, cached by
//! markup, and pushed to the list layer as targeted reflows.
//!
//! The core is pure and single-threaded; the rendering surface and the list
//! widget are collaborators behind the [`surface::RenderSurface`] and
//! [`view_state::ListLayer`] traits.

pub mod config;
pub mod driver;
pub mod logging;
pub mod model;
pub mod render;
pub mod surface;
pub mod view_state;

#[cfg(test)]
mod test_harness;
