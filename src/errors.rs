//! Error Types
//!
//! This module defines the error types used throughout the manipulator tools.
//!
//! # Overview
//!
//! The main error type [`ManipulatorError`] covers:
//! - Property path parsing and property access failures
//! - Binding configuration errors reported by validation
//!
//! Runtime interaction never surfaces these to the host as fatal conditions.
//! The typed property readers fall back to zero values, and a binding that
//! cannot be resolved is skipped for the frame.
//!
//! # Usage
//!
//! ```rust,ignore
//! use manipulator_tools::errors::{ManipulatorError, Result};
//!
//! fn check(binding: &ManipulatorBinding) -> Result<()> {
//!     binding.validate()
//! }
//! ```

use thiserror::Error;

use crate::property::PropertyKind;

/// The main error type for the manipulator tools.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ManipulatorError {
    // ========================================================================
    // Property Access Errors
    // ========================================================================
    /// The property path could not be parsed.
    #[error("Invalid property path '{path}': {reason}")]
    InvalidPropertyPath {
        /// The offending path string
        path: String,
        /// What was wrong with it
        reason: &'static str,
    },

    /// No property exists at the given path.
    #[error("Property not found: {0}")]
    PropertyNotFound(String),

    /// The property exists but holds a different type.
    #[error("Property '{path}' is not a {expected:?}")]
    PropertyTypeMismatch {
        /// Path of the property
        path: String,
        /// The kind the caller asked for
        expected: PropertyKind,
    },

    /// Array index out of bounds.
    #[error("Index {index} out of bounds for '{path}' (len: {len})")]
    IndexOutOfBounds {
        /// Path of the array property
        path: String,
        /// The invalid index
        index: usize,
        /// Current array length
        len: usize,
    },

    // ========================================================================
    // Configuration Errors
    // ========================================================================
    /// Enum step size must be a finite, positive number.
    #[error("Enum step size must be positive and finite, got {0}")]
    InvalidStepSize(f32),

    /// Enum size must allow at least one value.
    #[error("Enum size must be at least 1")]
    EmptyEnum,

    /// A constraint range has its minimum above its maximum.
    #[error("{constraint} constraint on {axis} axis is inverted ({min} > {max})")]
    InvertedConstraint {
        /// "location" or "scale"
        constraint: &'static str,
        /// Axis label
        axis: char,
        /// Configured minimum
        min: f32,
        /// Configured maximum
        max: f32,
    },

    /// Scale constraints must keep scale strictly positive.
    #[error("Scale constraint minimum on {axis} axis must be positive, got {min}")]
    NonPositiveScaleMinimum {
        /// Axis label
        axis: char,
        /// Configured minimum
        min: f32,
    },
}

/// Alias for `Result<T, ManipulatorError>`.
pub type Result<T> = std::result::Result<T, ManipulatorError>;
