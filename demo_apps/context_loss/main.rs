//! Context loss walkthrough.
//!
//! Run with `RUST_LOG=debug` to see every registry and device step.

use anyhow::{Context as _, Result};
use myth_webgl::{ContextSettings, ExtensionName, HeadlessDevice, LossReason, WebGlContext};

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let settings = ContextSettings::default().with_label("demo");
    let mut ctx = WebGlContext::new(HeadlessDevice::new().with_capacity_limit(64), settings);

    for name in ctx.supported_extensions().unwrap_or_default() {
        ctx.get_extension(name);
    }

    let mut ext = ctx
        .oes_vertex_array_object()
        .context("OES_vertex_array_object is not enabled")?;
    let a = ext.create_vertex_array_oes()?;
    let b = ext.create_vertex_array_oes()?;
    ext.bind_vertex_array_oes(a);
    ext.delete_vertex_array_oes(a);
    log::info!("after delete: isVertexArrayOES(a) = {}", ext.is_vertex_array_oes(a));

    // Stale handle: reported, never sent to the device.
    ext.bind_vertex_array_oes(a);
    log::info!("getError() = {}", ctx.get_error());

    // The device goes away on another thread.
    let notifier = ctx.loss_notifier();
    std::thread::spawn(move || notifier.notify(LossReason::DeviceLost, "simulated driver reset"))
        .join()
        .map_err(|_| anyhow::anyhow!("device thread panicked"))?;

    let mut ext = ctx
        .oes_vertex_array_object()
        .context("extension disappeared")?;
    let created = ext.create_vertex_array_oes()?;
    log::info!(
        "after loss: create = {created:?}, isVertexArrayOES(b) = {}",
        ext.is_vertex_array_oes(b)
    );
    log::info!("getError() = {}", ctx.get_error());
    log::info!("getError() = {}", ctx.get_error());
    log::info!(
        "getExtension(WEBGL_lose_context) on lost context: {}",
        ctx.get_extension(ExtensionName::WebGlLoseContext)
    );

    if let Some(info) = ctx.loss_info() {
        log::info!("context {} lost: {} ({})", ctx.id(), info.message, info.reason);
    }
    log::info!("{} reports recorded", ctx.error_sink().history().len());
    Ok(())
}
