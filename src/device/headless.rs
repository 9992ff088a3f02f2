//! Headless Device
//!
//! A software [`GlDevice`] with GL-like naming rules: names are non-zero and
//! freed names are handed out again, lowest first. Every call is recorded so
//! callers can assert exactly what reached the "driver".

use std::cmp::Reverse;
use std::collections::BinaryHeap;
use std::num::NonZeroU32;

use rustc_hash::FxHashSet;

use super::{DeviceError, GlDevice};

/// Native name of a headless vertex array.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct HeadlessVertexArray(pub NonZeroU32);

/// A single driver call observed by [`HeadlessDevice`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeviceCall {
    Create(HeadlessVertexArray),
    Delete(HeadlessVertexArray),
    Bind(Option<HeadlessVertexArray>),
}

/// Software device that validates nothing and records everything.
#[derive(Debug, Default)]
pub struct HeadlessDevice {
    live: FxHashSet<HeadlessVertexArray>,
    /// Freed names; min-heap so the lowest name is recycled first
    free_names: BinaryHeap<Reverse<NonZeroU32>>,
    /// Names handed out so far; the next fresh name is `issued + 1`
    issued: u32,
    capacity: Option<usize>,
    bound: Option<HeadlessVertexArray>,
    calls: Vec<DeviceCall>,
}

impl HeadlessDevice {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Limits the number of simultaneously live vertex arrays.
    #[must_use]
    pub fn with_capacity_limit(mut self, limit: usize) -> Self {
        self.capacity = Some(limit);
        self
    }

    #[inline]
    #[must_use]
    pub fn live_count(&self) -> usize {
        self.live.len()
    }

    #[inline]
    #[must_use]
    pub fn is_live(&self, vertex_array: HeadlessVertexArray) -> bool {
        self.live.contains(&vertex_array)
    }

    /// Currently bound native object; `None` is the default state.
    #[inline]
    #[must_use]
    pub fn bound(&self) -> Option<HeadlessVertexArray> {
        self.bound
    }

    #[must_use]
    pub fn calls(&self) -> &[DeviceCall] {
        &self.calls
    }

    /// Clears the call log, leaving device state intact.
    pub fn clear_calls(&mut self) {
        self.calls.clear();
    }

    fn allocate_name(&mut self) -> Result<NonZeroU32, DeviceError> {
        if let Some(Reverse(name)) = self.free_names.pop() {
            return Ok(name);
        }
        let name = self
            .issued
            .checked_add(1)
            .and_then(NonZeroU32::new)
            .ok_or_else(|| DeviceError::Driver("vertex array names exhausted".to_string()))?;
        self.issued = name.get();
        Ok(name)
    }
}

impl GlDevice for HeadlessDevice {
    type VertexArray = HeadlessVertexArray;

    fn create_vertex_array(&mut self) -> Result<HeadlessVertexArray, DeviceError> {
        if self.capacity.is_some_and(|limit| self.live.len() >= limit) {
            return Err(DeviceError::OutOfMemory);
        }
        let vertex_array = HeadlessVertexArray(self.allocate_name()?);
        self.live.insert(vertex_array);
        self.calls.push(DeviceCall::Create(vertex_array));
        Ok(vertex_array)
    }

    fn delete_vertex_array(&mut self, vertex_array: HeadlessVertexArray) {
        self.calls.push(DeviceCall::Delete(vertex_array));
        if self.live.remove(&vertex_array) {
            if self.bound == Some(vertex_array) {
                self.bound = None;
            }
            self.free_names.push(Reverse(vertex_array.0));
        }
    }

    fn bind_vertex_array(&mut self, vertex_array: Option<HeadlessVertexArray>) {
        self.calls.push(DeviceCall::Bind(vertex_array));
        self.bound = vertex_array;
    }
}
