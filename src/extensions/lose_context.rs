//! `WEBGL_lose_context`
//!
//! Lets the application simulate loss. It goes through the same gate as
//! every other extension, so `loseContext` on an already lost context is
//! reported like any other call.

use crate::context::{ErrorCode, ErrorReason, ErrorSink, LossReason, WebGlContext};
use crate::device::GlDevice;

use super::ExtensionName;

pub struct WebGlLoseContext<'a, D: GlDevice, S: ErrorSink> {
    context: &'a mut WebGlContext<D, S>,
}

impl<'a, D: GlDevice, S: ErrorSink> WebGlLoseContext<'a, D, S> {
    pub const NAME: ExtensionName = ExtensionName::WebGlLoseContext;

    pub(crate) fn new(context: &'a mut WebGlContext<D, S>) -> Self {
        Self { context }
    }

    /// Loses the context with [`LossReason::Requested`].
    pub fn lose_context(&mut self) {
        const OPERATION: &str = "loseContext";
        if self.context.check_gate(OPERATION).is_lost() {
            return;
        }
        self.context
            .lose_context(LossReason::Requested, "loseContext() called by the application");
    }

    /// Always fails: a lost context is never brought back.
    pub fn restore_context(&mut self) {
        const OPERATION: &str = "restoreContext";
        if self.context.check_gate(OPERATION).is_lost() {
            return;
        }
        self.context.report(
            ErrorCode::InvalidOperation,
            ErrorReason::InvalidState,
            OPERATION,
            "context is not lost".to_string(),
        );
    }
}
