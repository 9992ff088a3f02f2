//! WebGL Context
//!
//! The [`WebGlContext`] owns everything the extension facades borrow:
//! - the validity [gate](ContextGate), consulted at the top of every call
//! - the [device](GlDevice) that executes native calls
//! - the per-context [vertex array registry](VertexArrayRegistry)
//! - the [error sink](ErrorSink) receiving out-of-band reports
//!
//! Facades are obtained from the context after their extension has been
//! enabled with [`WebGlContext::get_extension`]. Once enabled, an extension
//! stays reachable for the lifetime of the context, including after loss.

mod error_log;
mod gate;

pub use error_log::{ErrorCode, ErrorLog, ErrorReason, ErrorReport, ErrorSink};
pub use gate::{ContextGate, GateState, LossInfo, LossNotifier, LossReason};

use std::fmt;
use std::num::NonZeroU64;
use std::sync::atomic::{AtomicU64, Ordering};

use crate::device::GlDevice;
use crate::extensions::{ExtensionName, ExtensionSet, OesVertexArrayObject, WebGlLoseContext};
use crate::resources::{VertexArray, VertexArrayRegistry};
use crate::settings::ContextSettings;

/// Global context id generator
static NEXT_CONTEXT_ID: AtomicU64 = AtomicU64::new(0);

/// Process-unique identity of a context.
///
/// Ids are never reused, so a handle from a destroyed context can never pass
/// the provenance check of any other context.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ContextId(NonZeroU64);

impl ContextId {
    pub(crate) fn next() -> Self {
        Self(NonZeroU64::MIN.saturating_add(NEXT_CONTEXT_ID.fetch_add(1, Ordering::Relaxed)))
    }

    #[inline]
    #[must_use]
    pub fn get(self) -> u64 {
        self.0.get()
    }
}

impl fmt::Display for ContextId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A WebGL rendering context: the owner every extension facade borrows from.
pub struct WebGlContext<D: GlDevice, S: ErrorSink = ErrorLog> {
    id: ContextId,
    settings: ContextSettings,
    pub(crate) gate: ContextGate,
    pub(crate) device: D,
    pub(crate) errors: S,
    pub(crate) vertex_arrays: VertexArrayRegistry<D::VertexArray>,
    enabled: ExtensionSet,
}

impl<D: GlDevice> WebGlContext<D> {
    /// Creates a context reporting into a default [`ErrorLog`].
    pub fn new(device: D, settings: ContextSettings) -> Self {
        let errors = ErrorLog::new(settings.error_log);
        Self::with_error_sink(device, settings, errors)
    }
}

impl<D: GlDevice, S: ErrorSink> WebGlContext<D, S> {
    pub fn with_error_sink(device: D, settings: ContextSettings, errors: S) -> Self {
        let id = ContextId::next();
        log::debug!(
            "Created WebGL context {id} ({}), supported extensions: {:?}",
            settings.display_label(),
            settings.supported_extensions
        );
        Self {
            id,
            settings,
            gate: ContextGate::new(),
            device,
            errors,
            vertex_arrays: VertexArrayRegistry::new(id),
            enabled: ExtensionSet::empty(),
        }
    }

    #[inline]
    #[must_use]
    pub fn id(&self) -> ContextId {
        self.id
    }

    #[inline]
    #[must_use]
    pub fn settings(&self) -> &ContextSettings {
        &self.settings
    }

    #[inline]
    #[must_use]
    pub fn device(&self) -> &D {
        &self.device
    }

    /// Direct device access, for embedders that record or reset driver state.
    #[inline]
    pub fn device_mut(&mut self) -> &mut D {
        &mut self.device
    }

    #[inline]
    #[must_use]
    pub fn error_sink(&self) -> &S {
        &self.errors
    }

    #[inline]
    pub fn error_sink_mut(&mut self) -> &mut S {
        &mut self.errors
    }

    // ========================================================================
    // Loss
    // ========================================================================

    #[must_use]
    pub fn is_context_lost(&self) -> bool {
        self.gate.is_lost()
    }

    #[must_use]
    pub fn loss_info(&self) -> Option<&LossInfo> {
        self.gate.loss_info()
    }

    /// Handle that lets other threads (device callbacks) lose this context.
    #[must_use]
    pub fn loss_notifier(&self) -> LossNotifier {
        self.gate.notifier()
    }

    /// Permanently loses the context.
    ///
    /// Returns `false` if it was already lost. Live objects stay registered
    /// but become unreachable; they are forgotten, not released, on drop.
    pub fn lose_context(&mut self, reason: LossReason, message: impl Into<String>) -> bool {
        self.gate.lose(reason, message)
    }

    /// WebGL `getError`.
    ///
    /// The first call after loss returns [`ErrorCode::ContextLostWebgl`];
    /// afterwards a lost context always answers [`ErrorCode::NoError`] and
    /// discards whatever the sink recorded.
    pub fn get_error(&mut self) -> ErrorCode {
        if self.gate.take_lost_error() {
            self.errors.take_error();
            return ErrorCode::ContextLostWebgl;
        }
        let code = self.errors.take_error();
        if self.gate.is_lost() {
            return ErrorCode::NoError;
        }
        code
    }

    // ========================================================================
    // Extensions
    // ========================================================================

    /// Extensions `get_extension` may enable; `None` once the context is lost.
    #[must_use]
    pub fn supported_extensions(&self) -> Option<Vec<ExtensionName>> {
        if self.gate.is_lost() {
            return None;
        }
        let supported = self.settings.supported_extensions;
        Some(
            ExtensionName::ALL
                .into_iter()
                .filter(|name| supported.contains(name.flag()))
                .collect(),
        )
    }

    /// Enables `name` (WebGL `getExtension`).
    ///
    /// Returns `false` when the extension is not supported or the context is
    /// already lost. Enabling twice is harmless.
    pub fn get_extension(&mut self, name: ExtensionName) -> bool {
        if self.gate.is_lost() {
            log::debug!("getExtension({name}) on lost context {}", self.id);
            return false;
        }
        if !self.settings.supported_extensions.contains(name.flag()) {
            return false;
        }
        if !self.enabled.contains(name.flag()) {
            self.enabled.insert(name.flag());
            log::info!("Enabled {name} on context {} ({})", self.id, self.settings.display_label());
        }
        true
    }

    #[inline]
    #[must_use]
    pub fn is_extension_enabled(&self, name: ExtensionName) -> bool {
        self.enabled.contains(name.flag())
    }

    pub fn enabled_extensions(&self) -> impl Iterator<Item = ExtensionName> + '_ {
        ExtensionName::ALL
            .into_iter()
            .filter(|name| self.enabled.contains(name.flag()))
    }

    /// `OES_vertex_array_object` facade, if enabled.
    pub fn oes_vertex_array_object(&mut self) -> Option<OesVertexArrayObject<'_, D, S>> {
        self.is_extension_enabled(ExtensionName::OesVertexArrayObject)
            .then(|| OesVertexArrayObject::new(self))
    }

    /// `WEBGL_lose_context` facade, if enabled.
    pub fn webgl_lose_context(&mut self) -> Option<WebGlLoseContext<'_, D, S>> {
        self.is_extension_enabled(ExtensionName::WebGlLoseContext)
            .then(|| WebGlLoseContext::new(self))
    }

    // ========================================================================
    // Vertex array state
    // ========================================================================

    #[inline]
    #[must_use]
    pub fn bound_vertex_array(&self) -> Option<VertexArray> {
        self.vertex_arrays.bound()
    }

    #[inline]
    #[must_use]
    pub fn vertex_array_count(&self) -> usize {
        self.vertex_arrays.live_count()
    }

    // ========================================================================
    // Facade support
    // ========================================================================

    /// Reads the gate once; on a lost context reports `INVALID_OPERATION`
    /// for `operation`.
    pub(crate) fn check_gate(&mut self, operation: &'static str) -> GateState {
        let state = self.gate.snapshot();
        if state.is_lost() {
            self.report(
                ErrorCode::InvalidOperation,
                ErrorReason::ContextLost,
                operation,
                "extension is lost".to_string(),
            );
        }
        state
    }

    pub(crate) fn report(
        &mut self,
        code: ErrorCode,
        reason: ErrorReason,
        operation: &'static str,
        message: String,
    ) {
        self.errors.report_error(ErrorReport {
            code,
            reason,
            operation,
            message,
        });
    }
}

impl<D: GlDevice, S: ErrorSink> Drop for WebGlContext<D, S> {
    fn drop(&mut self) {
        if self.gate.is_lost() {
            // The device is gone; addressing it could crash the driver.
            self.vertex_arrays.abandon_all();
        } else {
            self.vertex_arrays.release_all(&mut self.device);
        }
        log::debug!("Destroyed WebGL context {}", self.id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::device::HeadlessDevice;

    fn context(extensions: ExtensionSet) -> WebGlContext<HeadlessDevice> {
        WebGlContext::new(
            HeadlessDevice::new(),
            ContextSettings::default().with_extensions(extensions),
        )
    }

    #[test]
    fn test_context_ids_are_unique() {
        let a = context(ExtensionSet::all());
        let b = context(ExtensionSet::all());
        assert_ne!(a.id(), b.id());
    }

    #[test]
    fn test_get_extension_respects_supported_set() {
        let mut ctx = context(ExtensionSet::OES_VERTEX_ARRAY_OBJECT);
        assert!(!ctx.get_extension(ExtensionName::WebGlLoseContext));
        assert!(ctx.webgl_lose_context().is_none());

        assert!(ctx.get_extension(ExtensionName::OesVertexArrayObject));
        assert!(ctx.get_extension(ExtensionName::OesVertexArrayObject));
        assert_eq!(
            ctx.enabled_extensions().collect::<Vec<_>>(),
            vec![ExtensionName::OesVertexArrayObject]
        );
    }

    #[test]
    fn test_get_extension_fails_after_loss_but_facade_survives() {
        let mut ctx = context(ExtensionSet::all());
        assert!(ctx.get_extension(ExtensionName::OesVertexArrayObject));
        ctx.lose_context(LossReason::DeviceLost, "test");

        assert!(!ctx.get_extension(ExtensionName::WebGlLoseContext));
        assert!(ctx.supported_extensions().is_none());
        assert!(ctx.oes_vertex_array_object().is_some());
    }

    #[test]
    fn test_get_error_after_loss() {
        let mut ctx = context(ExtensionSet::all());
        assert_eq!(ctx.get_error(), ErrorCode::NoError);

        ctx.lose_context(LossReason::DeviceReset, "gpu hang");
        assert_eq!(ctx.get_error(), ErrorCode::ContextLostWebgl);
        assert_eq!(ctx.get_error(), ErrorCode::NoError);
    }

    #[test]
    fn test_supported_extensions_listing() {
        let ctx = context(ExtensionSet::WEBGL_LOSE_CONTEXT);
        assert_eq!(
            ctx.supported_extensions(),
            Some(vec![ExtensionName::WebGlLoseContext])
        );
    }
}
