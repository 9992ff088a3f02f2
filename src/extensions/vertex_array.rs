//! `OES_vertex_array_object`
//!
//! | Entry point             | Lost context        | Enabled                          |
//! |-------------------------|---------------------|----------------------------------|
//! | `createVertexArrayOES`  | report, `Ok(None)`  | new handle, or `Err` on exhaustion |
//! | `deleteVertexArrayOES`  | report, no-op       | delete; stale per `DeletePolicy` |
//! | `isVertexArrayOES`      | report, `false`     | liveness + provenance            |
//! | `bindVertexArrayOES`    | report, no-op       | bind; stale handle reported      |

use crate::context::{ErrorCode, ErrorReason, ErrorSink, WebGlContext};
use crate::device::GlDevice;
use crate::errors::{Result, WebGlError};
use crate::resources::{Deletion, VertexArray};

use super::{DeletePolicy, ExtensionName};

/// Borrowed view of a context exposing the vertex array extension.
pub struct OesVertexArrayObject<'a, D: GlDevice, S: ErrorSink> {
    context: &'a mut WebGlContext<D, S>,
}

impl<'a, D: GlDevice, S: ErrorSink> OesVertexArrayObject<'a, D, S> {
    pub const NAME: ExtensionName = ExtensionName::OesVertexArrayObject;

    pub(crate) fn new(context: &'a mut WebGlContext<D, S>) -> Self {
        Self { context }
    }

    /// Creates a vertex array.
    ///
    /// Returns `Ok(None)` on a lost context. A device allocation failure is
    /// reported as `OUT_OF_MEMORY` and returned as
    /// [`WebGlError::ResourceExhausted`].
    pub fn create_vertex_array_oes(&mut self) -> Result<Option<VertexArray>> {
        const OPERATION: &str = "createVertexArrayOES";
        if self.context.check_gate(OPERATION).is_lost() {
            return Ok(None);
        }

        let ctx = &mut *self.context;
        match ctx.vertex_arrays.create(&mut ctx.device) {
            Ok(array) => Ok(Some(array)),
            Err(source) => {
                ctx.report(
                    ErrorCode::OutOfMemory,
                    ErrorReason::ResourceExhaustion,
                    OPERATION,
                    source.to_string(),
                );
                Err(WebGlError::ResourceExhausted {
                    operation: OPERATION,
                    source,
                })
            }
        }
    }

    /// Deletes a vertex array.
    ///
    /// `None` is always a no-op. Foreign and already deleted handles are
    /// accepted silently unless the context was created with
    /// [`DeletePolicy::Strict`].
    pub fn delete_vertex_array_oes(&mut self, array: Option<VertexArray>) {
        const OPERATION: &str = "deleteVertexArrayOES";
        if self.context.check_gate(OPERATION).is_lost() {
            return;
        }
        let Some(array) = array else {
            return;
        };

        let ctx = &mut *self.context;
        let deletion = ctx.vertex_arrays.destroy(&mut ctx.device, array);
        let policy = ctx.settings().delete_policy;
        if let (Deletion::Ignored, DeletePolicy::Strict) = (deletion, policy) {
            ctx.report(
                ErrorCode::InvalidOperation,
                ErrorReason::InvalidHandle,
                OPERATION,
                format!("{array} is not a live object of this context"),
            );
        }
    }

    /// `true` iff `array` is a live vertex array of this context.
    pub fn is_vertex_array_oes(&mut self, array: Option<VertexArray>) -> bool {
        const OPERATION: &str = "isVertexArrayOES";
        if self.context.check_gate(OPERATION).is_lost() {
            return false;
        }
        array.is_some_and(|array| self.context.vertex_arrays.is_live(array))
    }

    /// Binds `array`, or the default vertex array for `None`.
    ///
    /// A handle that is deleted or belongs to another context is reported
    /// and never reaches the device.
    pub fn bind_vertex_array_oes(&mut self, array: Option<VertexArray>) {
        const OPERATION: &str = "bindVertexArrayOES";
        if self.context.check_gate(OPERATION).is_lost() {
            return;
        }

        let ctx = &mut *self.context;
        if let Err(err) = ctx.vertex_arrays.bind(&mut ctx.device, array) {
            let message = match array {
                Some(array) => format!("{array}: {err}"),
                None => err.to_string(),
            };
            ctx.report(
                ErrorCode::InvalidOperation,
                ErrorReason::InvalidHandle,
                OPERATION,
                message,
            );
        }
    }
}
