//! Context Validity Gate
//!
//! The single authoritative "is this context permanently unusable" flag.
//!
//! # Design
//!
//! - The lost state lives in a [`OnceCell`]: it can be set exactly once and
//!   never cleared, so the live → lost transition is monotonic by type.
//! - Loss may be signalled from any thread through a [`LossNotifier`]. The
//!   notification is queued on a channel and applied on the owning thread
//!   the next time the gate is read, so no locking is needed here.
//! - Callers take one [`GateState`] snapshot at the top of an operation and
//!   act on it for the whole call.

use std::cell::{Cell, OnceCell};
use std::fmt;

use serde::{Deserialize, Serialize};

/// Why a context was lost.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LossReason {
    /// The application asked for it (`WEBGL_lose_context`).
    Requested,
    /// The device disappeared (driver crash, adapter removal, wgpu loss).
    DeviceLost,
    /// The device was reset after a GPU fault.
    DeviceReset,
}

impl fmt::Display for LossReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            Self::Requested => "requested",
            Self::DeviceLost => "device lost",
            Self::DeviceReset => "device reset",
        };
        f.write_str(text)
    }
}

/// Record of the loss event that invalidated a context.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LossInfo {
    pub reason: LossReason,
    pub message: String,
}

/// Point-in-time view of the gate, read once per operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GateState {
    Live,
    Lost,
}

impl GateState {
    #[inline]
    #[must_use]
    pub fn is_lost(self) -> bool {
        matches!(self, Self::Lost)
    }
}

/// Cloneable, `Send` handle used to signal device loss from any thread.
#[derive(Debug, Clone)]
pub struct LossNotifier {
    sender: flume::Sender<LossInfo>,
}

impl LossNotifier {
    /// Queues a loss notification.
    ///
    /// Returns `false` when the owning context no longer exists.
    pub fn notify(&self, reason: LossReason, message: impl Into<String>) -> bool {
        self.sender
            .send(LossInfo {
                reason,
                message: message.into(),
            })
            .is_ok()
    }
}

/// Monotonic live/lost flag of one context.
#[derive(Debug)]
pub struct ContextGate {
    lost: OnceCell<LossInfo>,
    /// Set on the lost transition, consumed by the first `getError` after it
    lost_error_pending: Cell<bool>,
    sender: flume::Sender<LossInfo>,
    receiver: flume::Receiver<LossInfo>,
}

impl Default for ContextGate {
    fn default() -> Self {
        Self::new()
    }
}

impl ContextGate {
    #[must_use]
    pub fn new() -> Self {
        let (sender, receiver) = flume::unbounded();
        Self {
            lost: OnceCell::new(),
            lost_error_pending: Cell::new(false),
            sender,
            receiver,
        }
    }

    #[must_use]
    pub fn notifier(&self) -> LossNotifier {
        LossNotifier {
            sender: self.sender.clone(),
        }
    }

    /// Applies pending notifications and returns the current state.
    pub fn snapshot(&self) -> GateState {
        while let Ok(info) = self.receiver.try_recv() {
            self.transition(info);
        }
        if self.lost.get().is_some() {
            GateState::Lost
        } else {
            GateState::Live
        }
    }

    #[inline]
    pub fn is_lost(&self) -> bool {
        self.snapshot().is_lost()
    }

    /// Marks the context lost on the owning thread.
    ///
    /// Returns `true` if this call performed the transition, `false` if the
    /// context was already lost (the first recorded reason is kept).
    pub fn lose(&self, reason: LossReason, message: impl Into<String>) -> bool {
        // Earlier queued notifications win over this one.
        if self.is_lost() {
            return false;
        }
        self.transition(LossInfo {
            reason,
            message: message.into(),
        })
    }

    /// Details of the loss event, if any.
    pub fn loss_info(&self) -> Option<&LossInfo> {
        self.snapshot();
        self.lost.get()
    }

    /// Returns `true` once after the lost transition.
    pub(crate) fn take_lost_error(&self) -> bool {
        self.snapshot();
        self.lost_error_pending.replace(false)
    }

    fn transition(&self, info: LossInfo) -> bool {
        if self.lost.get().is_some() {
            log::debug!("Ignoring loss notification on lost context: {}", info.message);
            return false;
        }
        log::info!("WebGL context lost ({}): {}", info.reason, info.message);
        self.lost_error_pending.set(true);
        self.lost.set(info).is_ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gate_starts_live() {
        let gate = ContextGate::new();
        assert_eq!(gate.snapshot(), GateState::Live);
        assert!(gate.loss_info().is_none());
    }

    #[test]
    fn test_lose_is_monotonic() {
        let gate = ContextGate::new();
        assert!(gate.lose(LossReason::DeviceReset, "first"));
        assert!(!gate.lose(LossReason::Requested, "second"));

        assert!(gate.is_lost());
        let info = gate.loss_info().unwrap();
        assert_eq!(info.reason, LossReason::DeviceReset);
        assert_eq!(info.message, "first");
    }

    #[test]
    fn test_notifier_from_other_thread() {
        let gate = ContextGate::new();
        let notifier = gate.notifier();

        std::thread::spawn(move || {
            assert!(notifier.notify(LossReason::DeviceLost, "adapter removed"));
        })
        .join()
        .unwrap();

        assert!(gate.is_lost());
        assert_eq!(gate.loss_info().unwrap().reason, LossReason::DeviceLost);
    }

    #[test]
    fn test_queued_notification_beats_local_lose() {
        let gate = ContextGate::new();
        gate.notifier().notify(LossReason::DeviceLost, "queued");

        assert!(!gate.lose(LossReason::Requested, "local"));
        assert_eq!(gate.loss_info().unwrap().message, "queued");
    }

    #[test]
    fn test_lost_error_reported_once() {
        let gate = ContextGate::new();
        assert!(!gate.take_lost_error());

        gate.lose(LossReason::Requested, "test");
        assert!(gate.take_lost_error());
        assert!(!gate.take_lost_error());
    }
}
