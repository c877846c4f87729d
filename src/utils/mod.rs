//! Utility Module
//!
//! - [`interner`]: string interning for identity keys and field paths
//!
//! Interned strings ([`Symbol`]s) compare in O(1):
//!
//! ```rust,ignore
//! use manipulator_tools::utils::interner;
//!
//! let a = interner::intern("Crane_Arm_boom_0");
//! let b = interner::intern("Crane_Arm_boom_0");
//! assert_eq!(a, b);
//! ```

pub mod interner;

pub use interner::Symbol;
