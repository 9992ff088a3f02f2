//! Context Settings
//!
//! Configuration consumed once when a [`WebGlContext`](crate::WebGlContext)
//! is created.
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use myth_webgl::{ContextSettings, ExtensionSet};
//!
//! // Default: every extension supported, 32 logged warnings
//! let settings = ContextSettings::default();
//!
//! // Vertex arrays only, quiet log
//! let settings = ContextSettings::default()
//!     .with_label("minimap")
//!     .with_extensions(ExtensionSet::OES_VERTEX_ARRAY_OBJECT)
//!     .with_max_warnings(0);
//!
//! // From JSON
//! let settings = ContextSettings::from_json(r#"{ "label": "hud" }"#)?;
//! ```

use serde::{Deserialize, Serialize};

use crate::errors::Result;
use crate::extensions::{DeletePolicy, ExtensionSet};

// ---------------------------------------------------------------------------
// ErrorLogSettings
// ---------------------------------------------------------------------------

/// Behaviour of the default [`ErrorLog`](crate::context::ErrorLog) sink.
///
/// | Field          | Description                                   | Default |
/// |----------------|-----------------------------------------------|---------|
/// | `max_warnings` | Reports echoed to the `log` facade            | `32`    |
/// | `keep_history` | Keep recent reports for later inspection      | `true`  |
/// | `max_history`  | Reports kept; the oldest are dropped first    | `256`   |
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ErrorLogSettings {
    /// Number of reports logged as warnings before the log goes quiet.
    pub max_warnings: u32,

    /// Keep every report in memory.
    ///
    /// Useful for tests and debugging overlays; disable for long-running
    /// contexts that misbehave in a loop.
    pub keep_history: bool,

    /// Upper bound on kept reports.
    pub max_history: usize,
}

impl Default for ErrorLogSettings {
    fn default() -> Self {
        Self {
            max_warnings: 32,
            keep_history: true,
            max_history: 256,
        }
    }
}

// ---------------------------------------------------------------------------
// ContextSettings
// ---------------------------------------------------------------------------

/// Global configuration for context creation.
///
/// | Field                  | Description                          | Default          |
/// |------------------------|--------------------------------------|------------------|
/// | `label`                | Name used in log lines               | `None`           |
/// | `supported_extensions` | Extensions `get_extension` may enable | all              |
/// | `error_log`            | Default error sink behaviour          | see above        |
/// | `delete_policy`        | Handling of stale handles on delete   | `Idempotent`     |
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ContextSettings {
    /// Debug label for this context.
    pub label: Option<String>,

    /// Extensions this context is allowed to enable.
    ///
    /// Deciding *which* extensions a device can offer is the embedder's job;
    /// the context only honours the set it is given.
    pub supported_extensions: ExtensionSet,

    /// Default error sink configuration.
    pub error_log: ErrorLogSettings,

    /// Whether `deleteVertexArrayOES` reports handles that are not live.
    pub delete_policy: DeletePolicy,
}

impl Default for ContextSettings {
    fn default() -> Self {
        Self {
            label: None,
            supported_extensions: ExtensionSet::all(),
            error_log: ErrorLogSettings::default(),
            delete_policy: DeletePolicy::Idempotent,
        }
    }
}

impl ContextSettings {
    /// Parses settings from JSON; missing fields take their defaults.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    #[must_use]
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    #[must_use]
    pub fn with_extensions(mut self, extensions: ExtensionSet) -> Self {
        self.supported_extensions = extensions;
        self
    }

    #[must_use]
    pub fn with_max_warnings(mut self, max_warnings: u32) -> Self {
        self.error_log.max_warnings = max_warnings;
        self
    }

    #[must_use]
    pub fn with_history(mut self, keep_history: bool) -> Self {
        self.error_log.keep_history = keep_history;
        self
    }

    #[must_use]
    pub fn with_delete_policy(mut self, delete_policy: DeletePolicy) -> Self {
        self.delete_policy = delete_policy;
        self
    }

    #[must_use]
    pub fn with_max_history(mut self, max_history: usize) -> Self {
        self.error_log.max_history = max_history;
        self
    }

    /// Label for log lines; falls back to `"unnamed"`.
    #[inline]
    #[must_use]
    pub fn display_label(&self) -> &str {
        self.label.as_deref().unwrap_or("unnamed")
    }
}
