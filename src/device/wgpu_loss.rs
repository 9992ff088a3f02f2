//! Bridges wgpu device loss into a context gate.

use crate::context::{LossNotifier, LossReason};

/// Installs a device-lost callback on `device` that marks the context behind
/// `notifier` as lost.
///
/// wgpu may invoke the callback from any thread; the notification is picked
/// up by the owning context at the start of its next operation.
pub fn watch_device_loss(device: &wgpu::Device, notifier: LossNotifier) {
    device.set_device_lost_callback(device_lost_callback(notifier));
}

fn device_lost_callback(
    notifier: LossNotifier,
) -> impl Fn(wgpu::DeviceLostReason, String) + Send + 'static {
    move |reason, message| {
        log::warn!("wgpu device lost ({reason:?}): {message}");
        notifier.notify(LossReason::DeviceLost, format!("{reason:?}: {message}"));
    }
}
