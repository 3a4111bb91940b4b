//! Error Types
//!
//! This module defines the error types used throughout the crate.
//!
//! # Overview
//!
//! The main error type [`RigError`] covers:
//! - Profile lookup and display metadata parsing failures
//! - Host-side failures while cloning or placing proxies
//! - Invalid binding edits and configuration values
//!
//! None of these are fatal to a frame. The proxy manager and the animation
//! coordinator catch them per attachment point, log them and carry on with
//! the rest of the batch.
//!
//! # Usage
//!
//! ```rust,ignore
//! use locator_rig::errors::{RigError, Result};
//!
//! fn resolve_slot() -> Result<()> {
//!     Ok(())
//! }
//! ```

use thiserror::Error;

use crate::host::{AttachmentId, ModelId};

/// The main error type for the locator rig.
#[derive(Error, Debug)]
pub enum RigError {
    // ========================================================================
    // Profile Errors
    // ========================================================================
    /// The source model exports no display profile with the requested id,
    /// or its display metadata is unavailable.
    #[error("Display profile '{profile}' not found on model {model:?}")]
    ProfileNotFound {
        /// Source model that was queried
        model: ModelId,
        /// Requested profile (slot) id
        profile: String,
    },

    /// Display metadata could not be parsed.
    #[error("Display profile parse error: {0}")]
    ProfileParse(#[from] serde_json::Error),

    // ========================================================================
    // Host Errors
    // ========================================================================
    /// The source model's geometry could not be cloned (deleted externally,
    /// or never loaded).
    #[error("Source model {0:?} is unavailable")]
    SourceUnavailable(ModelId),

    /// The attachment point has no current world matrix (not laid out yet).
    #[error("Attachment point {0:?} has no world transform")]
    MissingAttachmentTransform(AttachmentId),

    /// The attachment point is not known to the registry.
    #[error("Unknown attachment point {0:?}")]
    UnknownAttachment(AttachmentId),

    // ========================================================================
    // Edit & Configuration Errors
    // ========================================================================
    /// A binding scale must be finite and strictly positive.
    #[error("Invalid binding scale: {0}")]
    InvalidScale(f32),

    /// Configuration value out of range.
    #[error("Invalid configuration: {0}")]
    Config(String),
}

/// Alias for `Result<T, RigError>`.
pub type Result<T> = std::result::Result<T, RigError>;
