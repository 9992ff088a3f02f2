//! WebGL Extensions
//!
//! Optional features layered on top of a [`WebGlContext`](crate::WebGlContext).
//!
//! Every facade in this module follows the same contract:
//! 1. Take one gate snapshot at the top of the call.
//! 2. If the context is lost, report `INVALID_OPERATION` tagged with the
//!    entry point name and return a neutral value without touching any
//!    registry or the device.
//! 3. Otherwise validate arguments, then delegate.
//!
//! Facades are borrowed views: they own no GPU objects and cannot outlive
//! the context that produced them.

mod lose_context;
mod vertex_array;

pub use lose_context::WebGlLoseContext;
pub use vertex_array::OesVertexArrayObject;

use std::fmt;
use std::str::FromStr;

use bitflags::bitflags;
use serde::{Deserialize, Serialize};

use crate::errors::WebGlError;

bitflags! {
    /// A set of extensions, used for both the supported and the enabled set.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
    #[serde(transparent)]
    pub struct ExtensionSet: u32 {
        const OES_VERTEX_ARRAY_OBJECT = 1 << 0;
        const WEBGL_LOSE_CONTEXT      = 1 << 1;
    }
}

impl Default for ExtensionSet {
    fn default() -> Self {
        Self::empty()
    }
}

/// Extensions known to this crate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ExtensionName {
    #[serde(rename = "OES_vertex_array_object")]
    OesVertexArrayObject,
    #[serde(rename = "WEBGL_lose_context")]
    WebGlLoseContext,
}

impl ExtensionName {
    pub const ALL: [Self; 2] = [Self::OesVertexArrayObject, Self::WebGlLoseContext];

    /// Canonical registry name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::OesVertexArrayObject => "OES_vertex_array_object",
            Self::WebGlLoseContext => "WEBGL_lose_context",
        }
    }

    #[must_use]
    pub const fn flag(self) -> ExtensionSet {
        match self {
            Self::OesVertexArrayObject => ExtensionSet::OES_VERTEX_ARRAY_OBJECT,
            Self::WebGlLoseContext => ExtensionSet::WEBGL_LOSE_CONTEXT,
        }
    }
}

impl fmt::Display for ExtensionName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ExtensionName {
    type Err = WebGlError;

    /// Extension names are matched case-insensitively, as `getExtension` does.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|name| name.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| WebGlError::UnknownExtension(s.to_string()))
    }
}

/// How a delete entry point treats a handle that is not live.
///
/// Deletion is the one permissive operation in the family: bind and query
/// entry points always treat a stale handle strictly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum DeletePolicy {
    /// Unknown, foreign or already deleted handles are ignored silently.
    #[default]
    Idempotent,
    /// Unknown, foreign or already deleted handles are reported.
    Strict,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_name_round_trip_is_case_insensitive() {
        for name in ExtensionName::ALL {
            assert_eq!(name.as_str().parse::<ExtensionName>().unwrap(), name);
        }
        assert_eq!(
            "oes_VERTEX_array_OBJECT".parse::<ExtensionName>().unwrap(),
            ExtensionName::OesVertexArrayObject
        );
    }

    #[test]
    fn test_unknown_name() {
        let err = "WEBGL_draw_buffers".parse::<ExtensionName>().unwrap_err();
        assert!(matches!(err, WebGlError::UnknownExtension(name) if name == "WEBGL_draw_buffers"));
    }

    #[test]
    fn test_flags_are_distinct() {
        let all = ExtensionName::ALL
            .into_iter()
            .fold(ExtensionSet::empty(), |acc, name| acc | name.flag());
        assert_eq!(all, ExtensionSet::all());
    }
}
