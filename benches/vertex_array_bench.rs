//! Vertex array facade benchmarks: gate check + registry round trips.

use std::hint::black_box;

use criterion::{Criterion, criterion_group, criterion_main};
use myth_webgl::{ContextSettings, ExtensionName, HeadlessDevice, LossReason, WebGlContext};

fn new_context() -> WebGlContext<HeadlessDevice> {
    let settings = ContextSettings::default().with_max_warnings(0).with_history(false);
    let mut ctx = WebGlContext::new(HeadlessDevice::new(), settings);
    ctx.get_extension(ExtensionName::OesVertexArrayObject);
    ctx
}

fn bench_create_bind_delete(c: &mut Criterion) {
    let mut ctx = new_context();
    c.bench_function("vao_create_bind_delete", |b| {
        b.iter(|| {
            let mut ext = ctx.oes_vertex_array_object().unwrap();
            let vao = ext.create_vertex_array_oes().unwrap();
            ext.bind_vertex_array_oes(black_box(vao));
            ext.delete_vertex_array_oes(vao);
            ctx.device_mut().clear_calls();
        });
    });
}

fn bench_is_vertex_array(c: &mut Criterion) {
    let mut ctx = new_context();
    let vao = ctx
        .oes_vertex_array_object()
        .unwrap()
        .create_vertex_array_oes()
        .unwrap();
    c.bench_function("vao_is_vertex_array", |b| {
        b.iter(|| {
            black_box(
                ctx.oes_vertex_array_object()
                    .unwrap()
                    .is_vertex_array_oes(black_box(vao)),
            )
        });
    });
}

fn bench_lost_context_rejection(c: &mut Criterion) {
    let mut ctx = new_context();
    ctx.lose_context(LossReason::DeviceLost, "bench");
    c.bench_function("vao_create_on_lost_context", |b| {
        b.iter(|| {
            black_box(
                ctx.oes_vertex_array_object()
                    .unwrap()
                    .create_vertex_array_oes()
                    .unwrap(),
            )
        });
    });
}

criterion_group!(
    benches,
    bench_create_bind_delete,
    bench_is_vertex_array,
    bench_lost_context_rejection
);
criterion_main!(benches);
