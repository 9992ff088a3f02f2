//! Device Primitives
//!
//! The thin driver seam the registry talks to. A [`GlDevice`] issues exactly
//! one native call per registry operation and is assumed to fail only on
//! fatal device conditions; all argument validation happens before it is
//! reached.
//!
//! Implementations:
//! - [`HeadlessDevice`]: software device that records every call (tests, demos)
//! - `GlowDevice` (feature `glow`): any `glow::HasContext`
//! - `watch_device_loss` (feature `wgpu`): forwards wgpu device loss into the gate

mod headless;

#[cfg(feature = "glow")]
mod glow_device;
#[cfg(feature = "wgpu")]
mod wgpu_loss;

pub use headless::{DeviceCall, HeadlessDevice, HeadlessVertexArray};

#[cfg(feature = "glow")]
pub use glow_device::GlowDevice;
#[cfg(feature = "wgpu")]
pub use wgpu_loss::watch_device_loss;

use std::fmt::Debug;

use thiserror::Error;

/// Fatal failure reported by a device.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DeviceError {
    /// The device has no room for another object.
    #[error("out of memory")]
    OutOfMemory,

    /// The driver rejected the request.
    #[error("driver error: {0}")]
    Driver(String),
}

/// Native vertex array primitives of an underlying graphics API.
pub trait GlDevice {
    /// Native object name of a vertex array.
    type VertexArray: Copy + Debug;

    /// Allocates a new array-binding-state object.
    fn create_vertex_array(&mut self) -> Result<Self::VertexArray, DeviceError>;

    /// Releases an object previously returned by [`create_vertex_array`](Self::create_vertex_array).
    fn delete_vertex_array(&mut self, vertex_array: Self::VertexArray);

    /// Makes `vertex_array` current; `None` selects the default state.
    fn bind_vertex_array(&mut self, vertex_array: Option<Self::VertexArray>);
}
