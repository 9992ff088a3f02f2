//! GPU resource registries owned by a context.
//!
//! - [`VertexArrayRegistry`]: live vertex array objects and the current binding

pub mod vertex_array;

pub use vertex_array::{BindError, Deletion, VertexArray, VertexArrayKey, VertexArrayRegistry};
