//! # Myth WebGL
//!
//! Context-loss gated WebGL extension objects.
//!
//! A [`WebGlContext`] owns a monotonic validity gate, a device and the
//! per-context resource registries. Optional features are exposed as
//! borrowed facades ([`OesVertexArrayObject`], [`WebGlLoseContext`]) that
//! check the gate before doing anything else: once the context is lost,
//! every entry point reports `INVALID_OPERATION` and returns a neutral
//! value without touching the device.
//!
//! ```rust,ignore
//! use myth_webgl::{ContextSettings, ExtensionName, HeadlessDevice, WebGlContext};
//!
//! let mut ctx = WebGlContext::new(HeadlessDevice::new(), ContextSettings::default());
//! ctx.get_extension(ExtensionName::OesVertexArrayObject);
//!
//! let mut ext = ctx.oes_vertex_array_object().unwrap();
//! let vao = ext.create_vertex_array_oes()?;
//! ext.bind_vertex_array_oes(vao);
//! ```

#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]

pub mod context;
pub mod device;
pub mod errors;
pub mod extensions;
pub mod resources;
pub mod settings;

pub use context::{
    ContextId, ErrorCode, ErrorLog, ErrorReason, ErrorReport, ErrorSink, LossNotifier, LossReason,
    WebGlContext,
};
pub use device::{DeviceError, GlDevice, HeadlessDevice};
pub use errors::{Result, WebGlError};
pub use extensions::{DeletePolicy, ExtensionName, ExtensionSet, OesVertexArrayObject, WebGlLoseContext};
pub use resources::VertexArray;
pub use settings::{ContextSettings, ErrorLogSettings};
