use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use std::hint::black_box;
use std::sync::Arc;
use vesta_core::attachment::{
    BufferAttachmentDescriptor, BufferBindFlags, BufferDescriptor, ScopeAttachmentAccess,
    ScopeAttachmentStage,
};
use vesta_core::scope::ScopeDescriptor;
use vesta_core::{FrameGraphSettings, SingleDeviceProvider, ValidationMode};
use vesta_graph::FrameGraph;

/// Records a chain of `scope_count` scopes where every scope reads the
/// outputs of its two predecessors and writes its own.
fn record_chain(graph: &mut FrameGraph, scope_count: usize) {
    graph.begin();
    for i in 0..scope_count {
        graph
            .create_transient_buffer(
                format!("buffer_{i}"),
                BufferDescriptor::new(4096, BufferBindFlags::SHADER_WRITE),
            )
            .unwrap();
    }
    for i in 0..scope_count {
        // Alternate blocks of four grouped and four ungrouped scopes.
        let mut descriptor = ScopeDescriptor::new(format!("scope_{i}"));
        if (i / 4) % 2 == 0 {
            descriptor = descriptor.with_group(format!("group_{}", i / 4));
        }
        graph.begin_scope(descriptor);
        for back in 1..=2 {
            if i >= back {
                graph
                    .use_shader_buffer(
                        BufferAttachmentDescriptor::new(format!("buffer_{}", i - back)),
                        ScopeAttachmentAccess::Read,
                        ScopeAttachmentStage::COMPUTE_SHADER,
                    )
                    .unwrap();
            }
        }
        graph
            .use_shader_buffer(
                BufferAttachmentDescriptor::new(format!("buffer_{i}")),
                ScopeAttachmentAccess::Write,
                ScopeAttachmentStage::COMPUTE_SHADER,
            )
            .unwrap();
        graph.end_scope();
    }
}

fn bench_compile(c: &mut Criterion) {
    let settings = FrameGraphSettings {
        validation: ValidationMode::Disabled,
        warn_unused_attachments: false,
        ..FrameGraphSettings::default()
    };
    let mut graph = FrameGraph::new(settings, Arc::new(SingleDeviceProvider));

    let mut group = c.benchmark_group("Frame Graph Compile");
    for scope_count in [64usize, 512, 2048] {
        group.bench_with_input(
            BenchmarkId::new("Record + End (chain)", scope_count),
            &scope_count,
            |b, &scope_count| {
                b.iter(|| {
                    record_chain(&mut graph, scope_count);
                    let result = graph.end();
                    black_box(&result);
                    graph.clear();
                });
            },
        );
    }
    group.finish();
}

criterion_group!(benches, bench_compile);
criterion_main!(benches);
