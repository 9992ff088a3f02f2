//! Error Types
//!
//! This module defines the fatal error types of the crate.
//!
//! # Overview
//!
//! Recoverable API misuse (calls on a lost context, stale handles) is *not*
//! an error in the Rust sense: it is reported out-of-band through the
//! context's [`ErrorSink`](crate::context::ErrorSink) and the call returns a
//! neutral value. [`WebGlError`] only covers conditions the caller cannot
//! paper over:
//! - Device allocation failures
//! - Other fatal driver conditions
//! - Configuration parsing errors
//!
//! # Usage
//!
//! ```rust,ignore
//! use myth_webgl::errors::Result;
//!
//! fn make_vao(ext: &mut OesVertexArrayObject<'_, HeadlessDevice>) -> Result<()> {
//!     let vao = ext.create_vertex_array_oes()?;
//!     Ok(())
//! }
//! ```

use thiserror::Error;

use crate::device::DeviceError;

/// The main error type for the crate.
#[derive(Error, Debug)]
pub enum WebGlError {
    // ========================================================================
    // Device Errors
    // ========================================================================
    /// The device refused to allocate a new object.
    ///
    /// Never masked as an empty result, so capacity problems stay visible
    /// to upstream diagnostics.
    #[error("{operation}: device refused allocation: {source}")]
    ResourceExhausted {
        /// Name of the API entry point that attempted the allocation
        operation: &'static str,
        /// Underlying device failure
        #[source]
        source: DeviceError,
    },

    /// Any other fatal device condition.
    #[error("Device error: {0}")]
    Device(#[from] DeviceError),

    // ========================================================================
    // Configuration Errors
    // ========================================================================
    /// Context settings could not be parsed.
    #[error("Settings parse error: {0}")]
    Settings(#[from] serde_json::Error),

    /// An extension name that this crate does not know about.
    #[error("Unknown extension: {0}")]
    UnknownExtension(String),
}

/// Alias for `Result<T, WebGlError>`.
pub type Result<T> = std::result::Result<T, WebGlError>;
