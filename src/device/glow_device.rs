//! OpenGL device backed by `glow`.

use ::glow::HasContext;

use super::{DeviceError, GlDevice};

/// [`GlDevice`] over a native (or WebGL) `glow` context.
pub struct GlowDevice<G: HasContext> {
    gl: G,
}

impl<G: HasContext> GlowDevice<G> {
    /// Wraps a `glow` context.
    ///
    /// # Safety
    ///
    /// The GL context behind `gl` must stay current on the calling thread for
    /// as long as the device is used, and must support vertex array objects
    /// (GL 3.0+, GLES 3.0+, or WebGL with `OES_vertex_array_object`).
    pub unsafe fn new(gl: G) -> Self {
        Self { gl }
    }

    #[inline]
    pub fn gl(&self) -> &G {
        &self.gl
    }

    pub fn into_inner(self) -> G {
        self.gl
    }
}

impl<G: HasContext> GlDevice for GlowDevice<G> {
    type VertexArray = G::VertexArray;

    fn create_vertex_array(&mut self) -> Result<G::VertexArray, DeviceError> {
        // SAFETY: `new` requires the context to be current and VAO capable.
        let result = unsafe { self.gl.create_vertex_array() };
        result.map_err(|message| {
            if unsafe { self.gl.get_error() } == ::glow::OUT_OF_MEMORY {
                DeviceError::OutOfMemory
            } else {
                DeviceError::Driver(message)
            }
        })
    }

    fn delete_vertex_array(&mut self, vertex_array: G::VertexArray) {
        // SAFETY: the registry only passes names it received from `create_vertex_array`.
        unsafe { self.gl.delete_vertex_array(vertex_array) };
    }

    fn bind_vertex_array(&mut self, vertex_array: Option<G::VertexArray>) {
        // SAFETY: `vertex_array` is either `None` or a live name owned by the registry.
        unsafe { self.gl.bind_vertex_array(vertex_array) };
    }
}
