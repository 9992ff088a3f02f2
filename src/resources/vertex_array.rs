//! Vertex Array Registry
//!
//! Per-context table of live vertex array objects.
//!
//! # Design
//!
//! - Identities are `slotmap` keys. A key carries a slot version, so once an
//!   object is deleted its key never matches a later object, even when the
//!   slot (or the driver's native name) is recycled.
//! - Every [`VertexArray`] handle is stamped with the [`ContextId`] of the
//!   registry that issued it. Handles are plain `Copy` values and never keep
//!   a context alive; provenance is a by-value comparison.
//! - Removing an entry and releasing its native object happen in the same
//!   call, so no other operation can observe one without the other.

use std::fmt;

use slotmap::{SlotMap, new_key_type};
use thiserror::Error;

use crate::context::ContextId;
use crate::device::{DeviceError, GlDevice};

new_key_type! {
    pub struct VertexArrayKey;
}

/// Caller-visible vertex array handle (`WebGLVertexArrayObjectOES`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct VertexArray {
    key: VertexArrayKey,
    context: ContextId,
}

impl VertexArray {
    /// Context that issued this handle.
    #[inline]
    #[must_use]
    pub fn context(&self) -> ContextId {
        self.context
    }

    #[inline]
    #[must_use]
    pub fn key(&self) -> VertexArrayKey {
        self.key
    }
}

impl fmt::Display for VertexArray {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "WebGLVertexArrayObject({:?} of context {})", self.key, self.context)
    }
}

/// Why a non-null handle could not be bound.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum BindError {
    #[error("object from a different WebGL context")]
    ForeignContext,
    #[error("object was deleted or never created")]
    NotLive,
}

/// Outcome of [`VertexArrayRegistry::destroy`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Deletion {
    /// The object was live and has been released.
    Released,
    /// The handle was not live here; nothing happened.
    Ignored,
}

#[derive(Debug)]
struct VertexArrayRecord<V> {
    native: V,
}

/// Live vertex arrays of one context, keyed by generational handle.
#[derive(Debug)]
pub struct VertexArrayRegistry<V> {
    context: ContextId,
    objects: SlotMap<VertexArrayKey, VertexArrayRecord<V>>,
    /// `None` is the default (no-array) state
    bound: Option<VertexArrayKey>,
}

impl<V: Copy + fmt::Debug> VertexArrayRegistry<V> {
    #[must_use]
    pub fn new(context: ContextId) -> Self {
        Self {
            context,
            objects: SlotMap::with_key(),
            bound: None,
        }
    }

    #[inline]
    #[must_use]
    pub fn context(&self) -> ContextId {
        self.context
    }

    #[inline]
    #[must_use]
    pub fn live_count(&self) -> usize {
        self.objects.len()
    }

    /// Currently bound vertex array; `None` is the default state.
    #[must_use]
    pub fn bound(&self) -> Option<VertexArray> {
        self.bound.map(|key| VertexArray {
            key,
            context: self.context,
        })
    }

    /// Allocates a native object and registers it under a fresh key.
    pub fn create<D>(&mut self, device: &mut D) -> Result<VertexArray, DeviceError>
    where
        D: GlDevice<VertexArray = V>,
    {
        let native = device.create_vertex_array().inspect_err(|err| {
            log::error!(
                "Vertex array allocation failed ({} live in context {}): {err}",
                self.objects.len(),
                self.context
            );
        })?;
        let key = self.objects.insert(VertexArrayRecord { native });
        log::debug!("Created vertex array {key:?} -> {native:?}");
        Ok(VertexArray {
            key,
            context: self.context,
        })
    }

    /// Releases `handle` if it is live here; anything else is ignored.
    ///
    /// Deleting the bound object first rebinds the default state.
    pub fn destroy<D>(&mut self, device: &mut D, handle: VertexArray) -> Deletion
    where
        D: GlDevice<VertexArray = V>,
    {
        if handle.context != self.context {
            return Deletion::Ignored;
        }
        let Some(record) = self.objects.remove(handle.key) else {
            return Deletion::Ignored;
        };
        if self.bound == Some(handle.key) {
            device.bind_vertex_array(None);
            self.bound = None;
        }
        device.delete_vertex_array(record.native);
        log::debug!("Deleted vertex array {:?} -> {:?}", handle.key, record.native);
        Deletion::Released
    }

    /// `true` iff `handle` was issued here and has not been deleted.
    #[must_use]
    pub fn is_live(&self, handle: VertexArray) -> bool {
        handle.context == self.context && self.objects.contains_key(handle.key)
    }

    /// Binds `handle`, or the default state for `None`.
    ///
    /// A handle that is not live is rejected before the device is called and
    /// leaves the current binding untouched.
    pub fn bind<D>(&mut self, device: &mut D, handle: Option<VertexArray>) -> Result<(), BindError>
    where
        D: GlDevice<VertexArray = V>,
    {
        let Some(handle) = handle else {
            device.bind_vertex_array(None);
            self.bound = None;
            return Ok(());
        };
        if handle.context != self.context {
            return Err(BindError::ForeignContext);
        }
        let record = self.objects.get(handle.key).ok_or(BindError::NotLive)?;
        device.bind_vertex_array(Some(record.native));
        self.bound = Some(handle.key);
        Ok(())
    }

    /// Releases every live object, e.g. on context teardown.
    pub fn release_all<D>(&mut self, device: &mut D)
    where
        D: GlDevice<VertexArray = V>,
    {
        if self.objects.is_empty() {
            return;
        }
        if self.bound.take().is_some() {
            device.bind_vertex_array(None);
        }
        log::debug!(
            "Releasing {} vertex arrays of context {}",
            self.objects.len(),
            self.context
        );
        for (_, record) in self.objects.drain() {
            device.delete_vertex_array(record.native);
        }
    }

    /// Forgets every object without calling the device.
    ///
    /// Used when the device is gone and must not be addressed any more.
    pub fn abandon_all(&mut self) {
        self.bound = None;
        self.objects.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::device::{DeviceCall, HeadlessDevice};

    fn registry() -> (VertexArrayRegistry<crate::device::HeadlessVertexArray>, HeadlessDevice) {
        (VertexArrayRegistry::new(ContextId::next()), HeadlessDevice::new())
    }

    #[test]
    fn test_create_is_live() {
        let (mut reg, mut device) = registry();
        let vao = reg.create(&mut device).unwrap();

        assert!(reg.is_live(vao));
        assert_eq!(vao.context(), reg.context());
        assert_eq!(reg.live_count(), 1);
        assert_eq!(device.live_count(), 1);
    }

    #[test]
    fn test_destroy_is_idempotent() {
        let (mut reg, mut device) = registry();
        let vao = reg.create(&mut device).unwrap();

        assert_eq!(reg.destroy(&mut device, vao), Deletion::Released);
        assert_eq!(reg.destroy(&mut device, vao), Deletion::Ignored);
        assert!(!reg.is_live(vao));
        assert_eq!(device.live_count(), 0);
    }

    #[test]
    fn test_recycled_slot_does_not_alias() {
        let (mut reg, mut device) = registry();
        let old = reg.create(&mut device).unwrap();
        reg.destroy(&mut device, old);

        // Both the slot and the native name get reused.
        let new = reg.create(&mut device).unwrap();
        assert_ne!(old, new);
        assert!(!reg.is_live(old));
        assert!(reg.is_live(new));
        assert_eq!(reg.bind(&mut device, Some(old)), Err(BindError::NotLive));
    }

    #[test]
    fn test_foreign_handle_rejected() {
        let (mut reg_a, mut device_a) = registry();
        let (mut reg_b, mut device_b) = registry();
        let vao_b = reg_b.create(&mut device_b).unwrap();

        assert!(!reg_a.is_live(vao_b));
        assert_eq!(
            reg_a.bind(&mut device_a, Some(vao_b)),
            Err(BindError::ForeignContext)
        );
        assert_eq!(reg_a.destroy(&mut device_a, vao_b), Deletion::Ignored);
        assert!(reg_b.is_live(vao_b));
        assert!(device_a.calls().is_empty());
    }

    #[test]
    fn test_destroy_bound_rebinds_default_first() {
        let (mut reg, mut device) = registry();
        let vao = reg.create(&mut device).unwrap();
        reg.bind(&mut device, Some(vao)).unwrap();
        let native = device.bound().unwrap();
        device.clear_calls();

        reg.destroy(&mut device, vao);
        assert_eq!(reg.bound(), None);
        assert_eq!(
            device.calls(),
            &[DeviceCall::Bind(None), DeviceCall::Delete(native)]
        );
    }

    #[test]
    fn test_failed_bind_keeps_binding() {
        let (mut reg, mut device) = registry();
        let a = reg.create(&mut device).unwrap();
        let b = reg.create(&mut device).unwrap();
        reg.bind(&mut device, Some(a)).unwrap();
        reg.destroy(&mut device, b);

        assert_eq!(reg.bind(&mut device, Some(b)), Err(BindError::NotLive));
        assert_eq!(reg.bound(), Some(a));
    }

    #[test]
    fn test_release_all() {
        let (mut reg, mut device) = registry();
        let a = reg.create(&mut device).unwrap();
        reg.create(&mut device).unwrap();
        reg.bind(&mut device, Some(a)).unwrap();

        reg.release_all(&mut device);
        assert_eq!(reg.live_count(), 0);
        assert_eq!(device.live_count(), 0);
        assert_eq!(device.bound(), None);
    }

    #[test]
    fn test_create_propagates_device_failure() {
        let mut reg = VertexArrayRegistry::new(ContextId::next());
        let mut device = HeadlessDevice::new().with_capacity_limit(0);

        assert_eq!(reg.create(&mut device), Err(DeviceError::OutOfMemory));
        assert_eq!(reg.live_count(), 0);
    }
}
