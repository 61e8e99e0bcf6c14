//! View-state layer - row heights, measurement and choice state
//!
//! Everything the quiz screen knows about how its rows look: measured and
//! estimated heights, the probes that measure them, the visible option order
//! and the user's choice. Pure state plus the [`screen::QuizScreen`]
//! controller that drives it; rendering and the list widget sit behind traits.
//!
//! # Module Structure
//!
//! - `types`: Core newtypes (RenderHeight, VisibleIndex)
//! - `cache`: RenderSizeCache - markup-keyed height memo
//! - `probe`: HeightProbe - per row instance measurement state machine
//! - `option_order`: OptionOrder - stable backing order with elimination filter
//! - `selection`: ChoiceState - selected / marked option
//! - `height_index`: HeightIndex - O(log n) prefix sums via Fenwick tree
//! - `list_layer`: ListLayer - targeted update notifications
//! - `row_heights`: ListHeightCoordinator - synchronous height queries and reflow
//! - `screen`: QuizScreen - controller wiring it all together

pub mod cache;
pub mod height_index;
pub mod list_layer;
pub mod option_order;
pub mod probe;
pub mod row_heights;
pub mod screen;
pub mod selection;
pub mod types;

pub use cache::RenderSizeCache;
pub use list_layer::{ListLayer, ListUpdate, RecordingListLayer};
pub use probe::{BindOutcome, HeightProbe, MeasurementRejection, ProbeState, Resolution};
pub use row_heights::ListHeightCoordinator;
pub use screen::{QuizScreen, RowVisuals, ScreenEvent, ScreenSettings, ScreenStats};
pub use selection::{ChoiceGlyph, ChoiceState};
pub use types::{InvalidRenderHeight, RenderHeight, VisibleIndex};
