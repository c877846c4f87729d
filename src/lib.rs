#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_sign_loss)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]

//! In-editor 3D manipulators.
//!
//! Exposes properties of arbitrary host objects (transforms, vectors, enums
//! and bools) as draggable viewport widgets:
//!
//! - [`property`]: path-based property access on host objects
//! - [`manipulator`]: binding configuration, constraints and offsets
//! - [`composer`]: widget pose assembly and the drag write path
//! - [`selection`]: multi-selection state and timeline synchronization
//! - [`editor`]: the editor mode, owner arena and render capability

pub mod composer;
pub mod editor;
pub mod errors;
pub mod manipulator;
pub mod math;
pub mod property;
pub mod selection;
pub mod utils;

pub use composer::{AxisList, InputDelta, WidgetPose};
pub use editor::{ClickOutcome, ClickTarget, EditorMode, EditorWorld, ManipulatorMode, ModeSettings, Owner, OwnerKey};
pub use errors::{ManipulatorError, Result};
pub use manipulator::{ManipulatorBinding, ManipulatorId};
pub use math::Transform;
pub use property::{PropertyAccess, PropertyBag, PropertyKind, PropertyPath, PropertyValue};
pub use selection::{ClickModifiers, SelectionRecord, SelectionRegistry, Timeline};
pub use utils::interner;
