//! Editor Mode
//!
//! The interaction layer driven by the host editor:
//!
//! - [`EditorWorld`]: arena of owners and their bindings
//! - [`LiveIndex`]: identity to live binding lookup, rebuilt every tick
//! - [`ManipulatorMode`]: the [`EditorMode`] that draws widgets, handles
//!   clicks and drags, and keeps the timeline's track selection in sync
//! - [`ViewportCamera`]: projection used for zoom-compensated shapes
//! - [`PrimitiveDrawer`] / [`DrawList`]: the render capability
//!
//! # Frame order
//!
//! ```text
//! tick:   rebuild index -> forced select/deselect -> commit -> timeline push
//! render: draw every visible binding of every selected owner
//! events: handle_click / input_delta / on_track_selection_changed
//! ```

pub mod camera;
pub mod mode;
pub mod render;
pub mod settings;
pub mod world;

pub use camera::{ProjectionType, ViewportCamera};
pub use mode::{ClickOutcome, ClickTarget, EditorMode, ManipulatorMode};
pub use render::{DrawCommand, DrawList, DrawShape, PrimitiveDrawer};
pub use settings::ModeSettings;
pub use world::{EditorWorld, LiveIndex, ManipulatorRef, Owner, OwnerKey};
