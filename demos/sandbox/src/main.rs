// Copyright 2025 eraflo
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use anyhow::{Context, Result};
use std::sync::Arc;
use vesta_core::attachment::{
    BufferAttachmentDescriptor, BufferBindFlags, BufferDescriptor, Format,
    ImageAttachmentDescriptor, ImageDescriptor, ScopeAttachmentAccess, ScopeAttachmentStage,
};
use vesta_core::scope::{HardwareQueueClass, ScopeDescriptor};
use vesta_core::{DeviceIndex, FrameGraphSettings, SwapChainId, UniformDeviceProvider};
use vesta_graph::FrameGraph;

const FRAMES: u32 = 3;
const WIDTH: u32 = 1280;
const HEIGHT: u32 = 720;

/// Records a deferred renderer: shadows, depth prepass, light culling on the
/// compute queue, a G-buffer + lighting subpass group, tonemapping and UI.
fn record_frame(graph: &mut FrameGraph) -> Result<()> {
    let target = |format| ImageDescriptor::new_2d(WIDTH, HEIGHT, format);

    graph.import_swap_chain(
        "backbuffer",
        SwapChainId(0),
        DeviceIndex::DEFAULT,
        target(Format::B8G8R8A8Srgb),
    )?;
    graph.import_buffer(
        "scene_constants",
        BufferDescriptor::new(256, BufferBindFlags::SHADER_READ),
    )?;
    graph.create_transient_image(
        "shadow_map",
        ImageDescriptor::new_2d(2048, 2048, Format::D32Float),
    )?;
    graph.create_transient_image("depth", target(Format::D32Float))?;
    graph.create_transient_image("albedo", target(Format::R8G8B8A8Unorm))?;
    graph.create_transient_image("normal", target(Format::R10G10B10A2Unorm))?;
    graph.create_transient_image("hdr", target(Format::R16G16B16A16Float))?;
    graph.create_transient_buffer(
        "light_list",
        BufferDescriptor::new(
            64 * 1024,
            BufferBindFlags::SHADER_READ | BufferBindFlags::SHADER_WRITE,
        ),
    )?;

    graph.begin_scope(ScopeDescriptor::new("shadows"));
    graph.set_estimated_item_count(128);
    graph.use_depth_stencil_attachment(
        ImageAttachmentDescriptor::new("shadow_map"),
        ScopeAttachmentAccess::Write,
    )?;
    graph.end_scope();

    graph.begin_scope(ScopeDescriptor::new("depth_prepass"));
    graph.use_shader_buffer(
        BufferAttachmentDescriptor::new("scene_constants"),
        ScopeAttachmentAccess::Read,
        ScopeAttachmentStage::VERTEX_SHADER,
    )?;
    graph.use_depth_stencil_attachment(
        ImageAttachmentDescriptor::new("depth"),
        ScopeAttachmentAccess::Write,
    )?;
    graph.end_scope();

    graph.begin_scope(
        ScopeDescriptor::new("light_culling").with_queue_class(HardwareQueueClass::Compute),
    );
    graph.use_shader_attachment(
        ImageAttachmentDescriptor::new("depth"),
        ScopeAttachmentAccess::Read,
        ScopeAttachmentStage::COMPUTE_SHADER,
    )?;
    graph.use_shader_buffer(
        BufferAttachmentDescriptor::new("light_list"),
        ScopeAttachmentAccess::Write,
        ScopeAttachmentStage::COMPUTE_SHADER,
    )?;
    graph.end_scope();

    graph.begin_scope(ScopeDescriptor::new("gbuffer").with_group("deferred"));
    graph.set_estimated_item_count(2048);
    graph.use_color_attachment(ImageAttachmentDescriptor::new("albedo"))?;
    graph.use_color_attachment(ImageAttachmentDescriptor::new("normal"))?;
    graph.use_depth_stencil_attachment(
        ImageAttachmentDescriptor::new("depth"),
        ScopeAttachmentAccess::Read,
    )?;
    graph.end_scope();

    graph.begin_scope(ScopeDescriptor::new("lighting").with_group("deferred"));
    graph.use_subpass_input_attachment(ImageAttachmentDescriptor::new("albedo"))?;
    graph.use_subpass_input_attachment(ImageAttachmentDescriptor::new("normal"))?;
    graph.use_shader_attachment(
        ImageAttachmentDescriptor::new("shadow_map"),
        ScopeAttachmentAccess::Read,
        ScopeAttachmentStage::FRAGMENT_SHADER,
    )?;
    graph.use_shader_buffer(
        BufferAttachmentDescriptor::new("light_list"),
        ScopeAttachmentAccess::Read,
        ScopeAttachmentStage::FRAGMENT_SHADER,
    )?;
    graph.use_color_attachment(ImageAttachmentDescriptor::new("hdr"))?;
    graph.end_scope();

    graph.begin_scope(ScopeDescriptor::new("tonemap"));
    graph.use_shader_attachment(
        ImageAttachmentDescriptor::new("hdr"),
        ScopeAttachmentAccess::Read,
        ScopeAttachmentStage::FRAGMENT_SHADER,
    )?;
    graph.use_color_attachment(ImageAttachmentDescriptor::new("backbuffer"))?;
    graph.end_scope();

    graph.begin_scope(ScopeDescriptor::new("ui"));
    graph.use_color_attachment(ImageAttachmentDescriptor::new("backbuffer"))?;
    graph.end_scope();

    Ok(())
}

fn main() -> Result<()> {
    use env_logger::{Builder, Env};

    Builder::from_env(Env::default().default_filter_or("info")).init();

    let settings = FrameGraphSettings::from_ron_str(include_str!("../frame_graph.ron"))
        .context("failed to load frame graph settings")?;
    log::info!("Frame graph settings: {settings:?}");

    let provider = UniformDeviceProvider::new(1, HardwareQueueClass::ALL);
    let mut graph = FrameGraph::new(settings, Arc::new(provider));

    for _ in 0..FRAMES {
        graph.begin();
        record_frame(&mut graph)?;
        graph.end().context("frame graph failed to compile")?;

        let order: Vec<String> = graph
            .scopes()
            .map(|scope| {
                if scope.is_subpass() {
                    format!("{} [subpass]", scope.id())
                } else {
                    scope.id().to_string()
                }
            })
            .collect();
        let stats = graph.statistics();
        log::info!(
            "Frame {}: {} ({} edges, {:?}).",
            stats.frame,
            order.join(" -> "),
            stats.edge_count,
            stats.compile_time
        );

        if graph.frame_count() == u64::from(FRAMES) {
            println!("{}", graph.to_dot());
        }
        graph.clear();
    }

    Ok(())
}
