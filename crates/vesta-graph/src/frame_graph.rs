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

//! The per-frame graph of scopes.
//!
//! A frame is recorded with [`FrameGraph::begin`], a sequence of
//! [`begin_scope`](FrameGraph::begin_scope) / `use_*` /
//! [`end_scope`](FrameGraph::end_scope) blocks, and [`FrameGraph::end`],
//! which orders the scopes. Every attachment use derives producer/consumer
//! edges from the attachment's hazard state on the scope's device:
//!
//! - a read waits on the last writer;
//! - a write waits on the last writer and on every reader since;
//! - a read of a transient attachment nobody wrote yet is bound to the first
//!   later writer, since transient content is undefined until written.
//!
//! Only one scope records at a time, and one thread drives the whole build.

use crate::attachment_database::{AttachmentDatabase, AttachmentIndex};
use crate::diagnostics::{self, FrameGraphStatistics};
use crate::graph_node::{GraphEdge, GraphNode, ScopeGraph};
use crate::scope::{QueryPoolUse, Scope, ScopeIndex};
use crate::scope_attachment::{ScopeAttachmentIndex, ScopeAttachmentView};
use crate::validation;
use ahash::{AHashMap, AHashSet};
use std::fmt;
use std::ops::Range;
use std::sync::Arc;
use std::time::Instant;
use vesta_core::attachment::{
    AttachmentLifetime, AttachmentType, BufferAttachmentDescriptor, BufferDescriptor,
    ImageAttachmentDescriptor, ImageDescriptor, ResolveAttachmentDescriptor,
    ScopeAttachmentAccess, ScopeAttachmentStage, ScopeAttachmentUsage,
};
use vesta_core::graph::{topological_sort, SortError, SortedNode};
use vesta_core::scope::{
    HardwareQueueClass, QueryPoolAttachmentType, QueryType, ScopeActivation, ScopeDescriptor,
};
use vesta_core::{
    AttachmentId, DeviceIndex, DeviceQueueProvider, FenceId, FrameGraphError, FrameGraphSettings,
    QueryPoolId, Result, ScopeId, SingleDeviceProvider, SwapChainId,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum BuildState {
    Idle,
    Building,
    Compiled,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum OrderingHint {
    After,
    Before,
}

/// An explicit ordering against a scope that had not been recorded yet.
#[derive(Debug, Clone)]
struct DeferredOrdering {
    scope: ScopeIndex,
    target: ScopeId,
    hint: OrderingHint,
}

/// Builds, validates and orders the scopes of one frame.
pub struct FrameGraph {
    settings: FrameGraphSettings,
    device_provider: Arc<dyn DeviceQueueProvider>,
    state: BuildState,
    frame_count: u64,
    attachment_database: AttachmentDatabase,
    scopes: Vec<Scope>,
    scope_lookup: AHashMap<ScopeId, ScopeIndex>,
    graph: ScopeGraph,
    current_scope: Option<ScopeIndex>,
    deferred_orderings: Vec<DeferredOrdering>,
    query_pool_last_scope: AHashMap<QueryPoolId, ScopeIndex>,
    sorted_scopes: Vec<ScopeIndex>,
    statistics: FrameGraphStatistics,
}

impl fmt::Debug for FrameGraph {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FrameGraph")
            .field("state", &self.state)
            .field("frame_count", &self.frame_count)
            .field("scopes", &self.scopes.len())
            .field("edges", &self.graph.edges().len())
            .field("attachments", &self.attachment_database.attachments().len())
            .finish_non_exhaustive()
    }
}

impl Default for FrameGraph {
    fn default() -> Self {
        Self::new(FrameGraphSettings::default(), Arc::new(SingleDeviceProvider))
    }
}

impl FrameGraph {
    /// Creates an idle frame graph.
    pub fn new(
        settings: FrameGraphSettings,
        device_provider: Arc<dyn DeviceQueueProvider>,
    ) -> Self {
        Self {
            settings,
            device_provider,
            state: BuildState::Idle,
            frame_count: 0,
            attachment_database: AttachmentDatabase::new(),
            scopes: Vec::new(),
            scope_lookup: AHashMap::new(),
            graph: ScopeGraph::default(),
            current_scope: None,
            deferred_orderings: Vec::new(),
            query_pool_last_scope: AHashMap::new(),
            sorted_scopes: Vec::new(),
            statistics: FrameGraphStatistics::default(),
        }
    }

    /// The settings this graph was created with.
    pub fn settings(&self) -> &FrameGraphSettings {
        &self.settings
    }

    // --- Frame lifecycle ---

    /// Starts recording a new frame, discarding the previous frame's state.
    ///
    /// # Panics
    ///
    /// If a frame is still building, or the previous compiled frame was not
    /// released with [`clear`](Self::clear).
    pub fn begin(&mut self) {
        assert!(
            self.state != BuildState::Building,
            "FrameGraph::begin called, but end was never called on the previous build cycle"
        );
        assert!(
            self.state != BuildState::Compiled,
            "FrameGraph::begin called, but clear was never called on the previous compiled frame"
        );

        self.clear();
        self.state = BuildState::Building;
        self.frame_count += 1;
        log::trace!("Frame graph build {} started.", self.frame_count);
    }

    /// Finishes recording and orders the scopes.
    ///
    /// On error the whole frame is cleared; nothing of it may be used.
    pub fn end(&mut self) -> Result<()> {
        if self.state != BuildState::Building {
            log::error!("FrameGraph::end called, but begin was never called.");
            self.clear();
            return Err(FrameGraphError::NotBuilding);
        }
        if let Some(index) = self.current_scope {
            let scope = self.scopes[index.index()].id().clone();
            log::error!("FrameGraph::end called while scope '{scope}' is still recording.");
            self.clear();
            return Err(FrameGraphError::ScopeStillRecording { scope });
        }

        let start = Instant::now();
        self.resolve_deferred_orderings();
        if self.settings.warn_unused_attachments {
            self.warn_unused_attachments();
        }
        self.assign_swap_chain_presents();
        self.state = BuildState::Idle;

        let sorted = match self.sort_scopes() {
            Ok(sorted) => sorted,
            Err(err) => {
                self.clear();
                return Err(err);
            }
        };
        self.activate_scopes(&sorted);
        self.state = BuildState::Compiled;

        self.statistics = FrameGraphStatistics {
            frame: self.frame_count,
            scope_count: self.scopes.len(),
            edge_count: self.graph.edges().len(),
            attachment_count: self.attachment_database.attachments().len(),
            transient_attachment_count: self.attachment_database.transient_attachments().count(),
            group_count: sorted
                .iter()
                .filter(|entry| entry.grouped)
                .map(|entry| entry.group_id)
                .collect::<AHashSet<_>>()
                .len(),
            compile_time: start.elapsed(),
        };
        log::debug!(
            "Frame {} compiled: {} scopes, {} edges, {} attachments in {:?}.",
            self.statistics.frame,
            self.statistics.scope_count,
            self.statistics.edge_count,
            self.statistics.attachment_count,
            self.statistics.compile_time
        );
        Ok(())
    }

    /// Releases every scope, edge and attachment of the current frame.
    pub fn clear(&mut self) {
        self.attachment_database.clear();
        self.scopes.clear();
        self.scope_lookup.clear();
        self.graph.clear();
        self.current_scope = None;
        self.deferred_orderings.clear();
        self.query_pool_last_scope.clear();
        self.sorted_scopes.clear();
        self.state = BuildState::Idle;
    }

    /// Returns `true` between [`begin`](Self::begin) and [`end`](Self::end).
    pub fn is_building(&self) -> bool {
        self.state == BuildState::Building
    }

    /// Returns `true` after a successful [`end`](Self::end), until cleared.
    pub fn is_compiled(&self) -> bool {
        self.state == BuildState::Compiled
    }

    /// Returns `true` while a scope is recording.
    pub fn is_recording_scope(&self) -> bool {
        self.current_scope.is_some()
    }

    /// Number of frames started with [`begin`](Self::begin).
    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }

    // --- Attachment registration ---

    fn assert_building(&self, operation: &str) {
        assert!(
            self.state == BuildState::Building,
            "FrameGraph::{operation} called outside of begin/end"
        );
    }

    /// Registers an image owned outside the frame graph.
    pub fn import_image(
        &mut self,
        id: impl Into<AttachmentId>,
        descriptor: ImageDescriptor,
    ) -> Result<AttachmentIndex> {
        self.assert_building("import_image");
        self.attachment_database.import_image(id, descriptor)
    }

    /// Registers a buffer owned outside the frame graph.
    pub fn import_buffer(
        &mut self,
        id: impl Into<AttachmentId>,
        descriptor: BufferDescriptor,
    ) -> Result<AttachmentIndex> {
        self.assert_building("import_buffer");
        self.attachment_database.import_buffer(id, descriptor)
    }

    /// Registers the current image of `swap_chain`, owned by `device_index`.
    pub fn import_swap_chain(
        &mut self,
        id: impl Into<AttachmentId>,
        swap_chain: SwapChainId,
        device_index: DeviceIndex,
        descriptor: ImageDescriptor,
    ) -> Result<AttachmentIndex> {
        self.assert_building("import_swap_chain");
        self.attachment_database
            .import_swap_chain(id, swap_chain, device_index, descriptor)
    }

    /// Registers an image that lives for this frame only.
    pub fn create_transient_image(
        &mut self,
        id: impl Into<AttachmentId>,
        descriptor: ImageDescriptor,
    ) -> Result<AttachmentIndex> {
        self.assert_building("create_transient_image");
        self.attachment_database.create_transient_image(id, descriptor)
    }

    /// Registers a buffer that lives for this frame only.
    pub fn create_transient_buffer(
        &mut self,
        id: impl Into<AttachmentId>,
        descriptor: BufferDescriptor,
    ) -> Result<AttachmentIndex> {
        self.assert_building("create_transient_buffer");
        self.attachment_database.create_transient_buffer(id, descriptor)
    }

    // --- Scope recording ---

    /// Opens a scope. Attachment uses and ordering hints apply to it until
    /// [`end_scope`](Self::end_scope).
    ///
    /// # Panics
    ///
    /// If the frame is not building, another scope is recording, the id was
    /// already recorded this frame, the device does not exist, or the frame
    /// exceeds `max_scopes_per_frame`.
    pub fn begin_scope(&mut self, descriptor: ScopeDescriptor) -> ScopeIndex {
        self.assert_building("begin_scope");
        if let Some(current) = self.current_scope {
            panic!(
                "FrameGraph::begin_scope('{}') called while scope '{}' is still recording",
                descriptor.id,
                self.scopes[current.index()].id()
            );
        }
        assert!(
            self.scopes.len() < self.settings.max_scopes_per_frame as usize,
            "frame exceeds max_scopes_per_frame ({})",
            self.settings.max_scopes_per_frame
        );
        assert!(
            usize::from(descriptor.device_index.0) < self.device_provider.device_count(),
            "scope '{}' targets {}, but only {} devices exist",
            descriptor.id,
            descriptor.device_index,
            self.device_provider.device_count()
        );
        assert!(
            !self.scope_lookup.contains_key(&descriptor.id),
            "scope '{}' was already recorded this frame",
            descriptor.id
        );

        let index = ScopeIndex(self.scopes.len() as u32);
        let queue_class = self.resolve_queue_class(
            &descriptor.id,
            descriptor.device_index,
            descriptor.queue_class,
        );
        log::trace!("Scope '{}' begins as node {}.", descriptor.id, index.0);

        self.scope_lookup.insert(descriptor.id.clone(), index);
        self.graph.add_node();
        self.scopes.push(Scope::new(descriptor, index, queue_class));
        self.current_scope = Some(index);
        index
    }

    /// Closes the recording scope.
    ///
    /// # Panics
    ///
    /// If no scope is recording.
    pub fn end_scope(&mut self) {
        match self.current_scope.take() {
            Some(index) => {
                log::trace!("Scope '{}' ends.", self.scopes[index.index()].id());
            }
            None => panic!("FrameGraph::end_scope called without a matching begin_scope"),
        }
    }

    fn current_scope_index(&self, operation: &str) -> ScopeIndex {
        match self.current_scope {
            Some(index) => index,
            None => panic!("FrameGraph::{operation} called outside of a scope"),
        }
    }

    fn current_scope_mut(&mut self, operation: &str) -> &mut Scope {
        let index = self.current_scope_index(operation);
        &mut self.scopes[index.index()]
    }

    fn resolve_queue_class(
        &self,
        scope: &ScopeId,
        device: DeviceIndex,
        requested: HardwareQueueClass,
    ) -> HardwareQueueClass {
        if self.device_provider.supports_queue_class(device, requested) {
            requested
        } else {
            log::warn!(
                "Scope '{scope}' requested a {requested} queue, which {device} does not expose; using graphics."
            );
            HardwareQueueClass::Graphics
        }
    }

    /// Sets the estimated number of items the recording scope will submit.
    pub fn set_estimated_item_count(&mut self, count: u32) {
        self.current_scope_mut("set_estimated_item_count")
            .estimated_item_count = count;
    }

    /// Moves the recording scope to another queue class.
    pub fn set_hardware_queue_class(&mut self, queue_class: HardwareQueueClass) {
        let index = self.current_scope_index("set_hardware_queue_class");
        let scope = &self.scopes[index.index()];
        let resolved = self.resolve_queue_class(scope.id(), scope.device_index(), queue_class);
        self.scopes[index.index()].queue_class = resolved;
    }

    /// Signals `fence` when the recording scope completes.
    pub fn signal_fence(&mut self, fence: FenceId) {
        self.current_scope_mut("signal_fence")
            .fences_to_signal
            .push(fence);
    }

    /// Waits on `fence` before the recording scope starts.
    pub fn wait_fence(&mut self, fence: FenceId) {
        self.current_scope_mut("wait_fence").fences_to_wait.push(fence);
    }

    // --- Attachment uses ---

    /// Declares a use of a buffer attachment by the recording scope.
    ///
    /// Returns [`FrameGraphError::AttachmentNotFound`] if the attachment is
    /// not registered, or [`FrameGraphError::AttachmentTypeMismatch`] if it is
    /// not a buffer.
    ///
    /// # Panics
    ///
    /// Outside a scope, or on an overlap violation while validation is enabled.
    pub fn use_buffer_attachment(
        &mut self,
        descriptor: BufferAttachmentDescriptor,
        access: ScopeAttachmentAccess,
        usage: ScopeAttachmentUsage,
        stage: ScopeAttachmentStage,
    ) -> Result<ScopeAttachmentIndex> {
        let id = descriptor.attachment_id.clone();
        self.use_attachment_internal(
            &id,
            AttachmentType::Buffer,
            usage,
            access,
            stage,
            ScopeAttachmentView::Buffer(descriptor),
        )
    }

    /// Declares a use of an image attachment by the recording scope.
    ///
    /// Same errors and panics as [`use_buffer_attachment`](Self::use_buffer_attachment).
    pub fn use_image_attachment(
        &mut self,
        descriptor: ImageAttachmentDescriptor,
        access: ScopeAttachmentAccess,
        usage: ScopeAttachmentUsage,
        stage: ScopeAttachmentStage,
    ) -> Result<ScopeAttachmentIndex> {
        let id = descriptor.attachment_id.clone();
        self.use_attachment_internal(
            &id,
            AttachmentType::Image,
            usage,
            access,
            stage,
            ScopeAttachmentView::Image(descriptor),
        )
    }

    /// Declares a multisample resolve into `descriptor.image`.
    ///
    /// With validation enabled, the resolve source must already be a render
    /// target of the recording scope.
    pub fn use_resolve_attachment(
        &mut self,
        descriptor: ResolveAttachmentDescriptor,
    ) -> Result<ScopeAttachmentIndex> {
        let index = self.current_scope_index("use_resolve_attachment");
        if self
            .attachment_database
            .find_attachment(&descriptor.resolve_source, AttachmentType::Image)
            .is_none()
        {
            log::error!(
                "Scope '{}' resolves from '{}', which is not a registered image.",
                self.scopes[index.index()].id(),
                descriptor.resolve_source
            );
            return Err(FrameGraphError::AttachmentNotFound {
                id: descriptor.resolve_source,
            });
        }
        if self.settings.validation_enabled() {
            validation::validate_resolve_source(
                &self.attachment_database,
                &self.scopes[index.index()],
                &descriptor.resolve_source,
            );
        }

        let id = descriptor.image.attachment_id.clone();
        self.use_attachment_internal(
            &id,
            AttachmentType::Image,
            ScopeAttachmentUsage::Resolve,
            ScopeAttachmentAccess::Write,
            ScopeAttachmentStage::COLOR_ATTACHMENT_OUTPUT,
            ScopeAttachmentView::Resolve(descriptor),
        )
    }

    /// Writes an image as a color render target.
    pub fn use_color_attachment(
        &mut self,
        descriptor: ImageAttachmentDescriptor,
    ) -> Result<ScopeAttachmentIndex> {
        self.use_image_attachment(
            descriptor,
            ScopeAttachmentAccess::Write,
            ScopeAttachmentUsage::RenderTarget,
            ScopeAttachmentStage::COLOR_ATTACHMENT_OUTPUT,
        )
    }

    /// Uses an image as the depth/stencil buffer.
    pub fn use_depth_stencil_attachment(
        &mut self,
        descriptor: ImageAttachmentDescriptor,
        access: ScopeAttachmentAccess,
    ) -> Result<ScopeAttachmentIndex> {
        self.use_image_attachment(
            descriptor,
            access,
            ScopeAttachmentUsage::DepthStencil,
            ScopeAttachmentStage::default_for(ScopeAttachmentUsage::DepthStencil),
        )
    }

    /// Reads an image written by a previous subpass of the same group.
    pub fn use_subpass_input_attachment(
        &mut self,
        descriptor: ImageAttachmentDescriptor,
    ) -> Result<ScopeAttachmentIndex> {
        self.use_image_attachment(
            descriptor,
            ScopeAttachmentAccess::Read,
            ScopeAttachmentUsage::SubpassInput,
            ScopeAttachmentStage::FRAGMENT_SHADER,
        )
    }

    /// Binds an image to shaders running at `stage`.
    pub fn use_shader_attachment(
        &mut self,
        descriptor: ImageAttachmentDescriptor,
        access: ScopeAttachmentAccess,
        stage: ScopeAttachmentStage,
    ) -> Result<ScopeAttachmentIndex> {
        self.use_image_attachment(descriptor, access, ScopeAttachmentUsage::Shader, stage)
    }

    /// Binds a buffer to shaders running at `stage`.
    pub fn use_shader_buffer(
        &mut self,
        descriptor: BufferAttachmentDescriptor,
        access: ScopeAttachmentAccess,
        stage: ScopeAttachmentStage,
    ) -> Result<ScopeAttachmentIndex> {
        self.use_buffer_attachment(descriptor, access, ScopeAttachmentUsage::Shader, stage)
    }

    /// Uses an image as a copy source (read) or destination (write).
    pub fn use_copy_attachment(
        &mut self,
        descriptor: ImageAttachmentDescriptor,
        access: ScopeAttachmentAccess,
    ) -> Result<ScopeAttachmentIndex> {
        self.use_image_attachment(
            descriptor,
            access,
            ScopeAttachmentUsage::Copy,
            ScopeAttachmentStage::COPY,
        )
    }

    /// Uses a buffer as a copy source (read) or destination (write).
    pub fn use_copy_buffer(
        &mut self,
        descriptor: BufferAttachmentDescriptor,
        access: ScopeAttachmentAccess,
    ) -> Result<ScopeAttachmentIndex> {
        self.use_buffer_attachment(
            descriptor,
            access,
            ScopeAttachmentUsage::Copy,
            ScopeAttachmentStage::COPY,
        )
    }

    /// Reads a buffer as vertex or index data.
    pub fn use_input_assembly_buffer(
        &mut self,
        descriptor: BufferAttachmentDescriptor,
    ) -> Result<ScopeAttachmentIndex> {
        self.use_buffer_attachment(
            descriptor,
            ScopeAttachmentAccess::Read,
            ScopeAttachmentUsage::InputAssembly,
            ScopeAttachmentStage::VERTEX_INPUT,
        )
    }

    /// Reads a buffer as indirect arguments.
    pub fn use_indirect_buffer(
        &mut self,
        descriptor: BufferAttachmentDescriptor,
    ) -> Result<ScopeAttachmentIndex> {
        self.use_buffer_attachment(
            descriptor,
            ScopeAttachmentAccess::Read,
            ScopeAttachmentUsage::Indirect,
            ScopeAttachmentStage::DRAW_INDIRECT,
        )
    }

    /// Reads a buffer as the predication source.
    pub fn use_predication_buffer(
        &mut self,
        descriptor: BufferAttachmentDescriptor,
    ) -> Result<ScopeAttachmentIndex> {
        self.use_buffer_attachment(
            descriptor,
            ScopeAttachmentAccess::Read,
            ScopeAttachmentUsage::Predication,
            ScopeAttachmentStage::PREDICATION,
        )
    }

    /// Reads an image as the shading rate source.
    pub fn use_shading_rate_attachment(
        &mut self,
        descriptor: ImageAttachmentDescriptor,
    ) -> Result<ScopeAttachmentIndex> {
        self.use_image_attachment(
            descriptor,
            ScopeAttachmentAccess::Read,
            ScopeAttachmentUsage::ShadingRate,
            ScopeAttachmentStage::SHADING_RATE,
        )
    }

    fn use_attachment_internal(
        &mut self,
        id: &AttachmentId,
        expected: AttachmentType,
        usage: ScopeAttachmentUsage,
        access: ScopeAttachmentAccess,
        stage: ScopeAttachmentStage,
        view: ScopeAttachmentView,
    ) -> Result<ScopeAttachmentIndex> {
        let scope_index = self.current_scope_index("use_attachment");
        let scope = &self.scopes[scope_index.index()];

        let (attachment, lifetime) = match self.attachment_database.find_any(id) {
            None => {
                log::error!(
                    "Scope '{}' uses attachment '{id}', which is not registered this frame.",
                    scope.id()
                );
                return Err(FrameGraphError::AttachmentNotFound { id: id.clone() });
            }
            Some(found) if found.attachment_type() != expected => {
                log::error!(
                    "Scope '{}' uses {} attachment '{id}' as a {expected}.",
                    scope.id(),
                    found.attachment_type()
                );
                return Err(FrameGraphError::AttachmentTypeMismatch {
                    id: id.clone(),
                    expected,
                    found: found.attachment_type(),
                });
            }
            Some(found) => (found.index(), found.lifetime()),
        };

        if self.settings.validation_enabled() {
            validation::validate_overlap(
                &self.attachment_database,
                scope,
                attachment,
                usage,
                access,
            );
        }

        let device = scope.device_index();
        let (scope_attachment, deps) = self.attachment_database.emplace_scope_attachment(
            scope_index,
            device,
            attachment,
            usage,
            access,
            stage,
            view,
        );
        for producer in deps.producers {
            self.insert_edge(producer, scope_index);
        }
        for consumer in deps.consumers {
            self.insert_edge(scope_index, consumer);
        }

        self.scopes[scope_index.index()].add_attachment(
            scope_attachment,
            attachment,
            expected,
            usage == ScopeAttachmentUsage::Resolve,
            lifetime == AttachmentLifetime::Transient,
        );
        Ok(scope_attachment)
    }

    /// Uses queries `interval` of `pool`. Frame-local pools order the
    /// recording scope after the previous scope that used the pool.
    pub fn use_query_pool(
        &mut self,
        pool: QueryPoolId,
        interval: Range<u32>,
        query_type: QueryType,
        attachment_type: QueryPoolAttachmentType,
        access: ScopeAttachmentAccess,
    ) {
        let scope_index = self.current_scope_index("use_query_pool");
        if attachment_type == QueryPoolAttachmentType::Local {
            if let Some(previous) = self.query_pool_last_scope.insert(pool, scope_index) {
                self.insert_edge(previous, scope_index);
            }
        }
        self.scopes[scope_index.index()]
            .query_pools
            .push(QueryPoolUse {
                pool,
                interval,
                query_type,
                attachment_type,
                access,
            });
    }

    // --- Explicit ordering ---

    /// Orders the recording scope after `producer`.
    ///
    /// If `producer` has not been recorded yet, the hint is resolved at
    /// [`end`](Self::end); a scope that never appears is ignored with a warning.
    pub fn execute_after(&mut self, producer: impl Into<ScopeId>) {
        let scope_index = self.current_scope_index("execute_after");
        self.order(scope_index, producer.into(), OrderingHint::After);
    }

    /// Orders the recording scope before `consumer`. Resolved like
    /// [`execute_after`](Self::execute_after).
    pub fn execute_before(&mut self, consumer: impl Into<ScopeId>) {
        let scope_index = self.current_scope_index("execute_before");
        self.order(scope_index, consumer.into(), OrderingHint::Before);
    }

    fn order(&mut self, scope: ScopeIndex, target: ScopeId, hint: OrderingHint) {
        match self.scope_lookup.get(&target).copied() {
            Some(other) => self.insert_ordering(scope, other, hint),
            None => self.deferred_orderings.push(DeferredOrdering {
                scope,
                target,
                hint,
            }),
        }
    }

    fn insert_ordering(&mut self, scope: ScopeIndex, other: ScopeIndex, hint: OrderingHint) {
        match hint {
            OrderingHint::After => self.insert_edge(other, scope),
            OrderingHint::Before => self.insert_edge(scope, other),
        }
    }

    fn insert_edge(&mut self, producer: ScopeIndex, consumer: ScopeIndex) {
        if self.graph.insert_edge(producer, consumer) {
            log::trace!(
                "Edge '{}' -> '{}'.",
                self.scopes[producer.index()].id(),
                self.scopes[consumer.index()].id()
            );
        }
    }

    // --- Compilation ---

    fn resolve_deferred_orderings(&mut self) {
        for deferred in std::mem::take(&mut self.deferred_orderings) {
            match self.scope_lookup.get(&deferred.target).copied() {
                Some(other) => self.insert_ordering(deferred.scope, other, deferred.hint),
                None => log::warn!(
                    "Scope '{}' is ordered against '{}', which was not recorded this frame; ignoring.",
                    self.scopes[deferred.scope.index()].id(),
                    deferred.target
                ),
            }
        }
    }

    fn warn_unused_attachments(&self) {
        for attachment in self.attachment_database.unused_attachments() {
            log::warn!(
                "Attachment '{}' was declared but never used by any scope.",
                attachment.id()
            );
        }
    }

    fn assign_swap_chain_presents(&mut self) {
        let mut presents = Vec::new();
        for attachment in self.attachment_database.swap_chain_attachments() {
            let Some((swap_chain, device)) = attachment.swap_chain() else {
                continue;
            };
            match attachment
                .last_writer(device)
                .or_else(|| attachment.last_scope(device))
            {
                Some(scope) => presents.push((scope, swap_chain)),
                None => log::warn!(
                    "Swap chain attachment '{}' is not used on {device}; nothing presents it.",
                    attachment.id()
                ),
            }
        }
        for (scope, swap_chain) in presents {
            self.scopes[scope.index()]
                .swap_chains_to_present
                .push(swap_chain);
        }
    }

    fn sort_scopes(&self) -> Result<Vec<SortedNode>> {
        let scopes = &self.scopes;
        let edges: Vec<(usize, usize)> = self
            .graph
            .edges()
            .iter()
            .map(|edge| (edge.producer.index(), edge.consumer.index()))
            .collect();

        match topological_sort(scopes.len(), &edges, |node| scopes[node].group_id().cloned()) {
            Ok(sorted) => Ok(sorted),
            Err(SortError::Cycle(cycle)) => {
                let remaining: Vec<_> = cycle
                    .remaining_edges
                    .iter()
                    .map(|&(producer, consumer)| {
                        (scopes[producer].id().clone(), scopes[consumer].id().clone())
                    })
                    .collect();
                if self.settings.log_cycle_diagnostics {
                    log::error!(
                        "Frame graph cycle detected; {} edges could not be ordered:",
                        remaining.len()
                    );
                    for (producer, consumer) in &remaining {
                        log::error!("    '{producer}' -> '{consumer}'");
                    }
                }
                Err(FrameGraphError::CycleDetected { remaining })
            }
            Err(SortError::GroupOrder(conflict)) => {
                let producer = &scopes[conflict.producer];
                let consumer = &scopes[conflict.consumer];
                let Some(group) = consumer.group_id().or(producer.group_id()).cloned() else {
                    unreachable!("a group ordering conflict always involves a grouped scope");
                };
                log::error!(
                    "Keeping group '{group}' contiguous would run '{}' before its producer '{}'.",
                    consumer.id(),
                    producer.id()
                );
                Err(FrameGraphError::GroupOrderConflict {
                    group,
                    producer: producer.id().clone(),
                    consumer: consumer.id().clone(),
                })
            }
        }
    }

    fn activate_scopes(&mut self, sorted: &[SortedNode]) {
        self.sorted_scopes.clear();
        for (position, entry) in sorted.iter().enumerate() {
            let activation = if entry.grouped {
                ScopeActivation::Subpass
            } else {
                ScopeActivation::None
            };
            self.scopes[entry.node].activate(position as u32, activation);
            self.graph.nodes_mut()[entry.node].group_id = Some(entry.group_id);
            self.sorted_scopes.push(ScopeIndex(entry.node as u32));
        }
    }

    // --- Queries ---

    /// Scopes in compiled order. Empty until the frame compiles.
    pub fn scopes(&self) -> impl ExactSizeIterator<Item = &Scope> + '_ {
        self.sorted_scopes
            .iter()
            .map(|index| &self.scopes[index.index()])
    }

    /// Scope indices in compiled order.
    pub fn scope_order(&self) -> &[ScopeIndex] {
        &self.sorted_scopes
    }

    /// Scopes in recording order.
    pub fn recorded_scopes(&self) -> &[Scope] {
        &self.scopes
    }

    /// The scope at `index`.
    ///
    /// # Panics
    ///
    /// Panics if `index` was not handed out by `begin_scope` in the current
    /// frame, such as an index kept across `clear`.
    pub fn scope(&self, index: ScopeIndex) -> &Scope {
        self.check_scope_index(index);
        &self.scopes[index.index()]
    }

    /// Looks a scope of the current frame up by id.
    pub fn find_scope(&self, id: &ScopeId) -> Option<&Scope> {
        self.scope_lookup
            .get(id)
            .map(|index| &self.scopes[index.index()])
    }

    /// The first scope of the compiled order.
    pub fn root_scope(&self) -> Option<&Scope> {
        self.sorted_scopes
            .first()
            .map(|index| &self.scopes[index.index()])
    }

    /// Scopes that run before `index`.
    ///
    /// # Panics
    ///
    /// Same as [`scope`](Self::scope).
    pub fn producers(&self, index: ScopeIndex) -> &[ScopeIndex] {
        self.check_scope_index(index);
        self.graph.nodes()[index.index()].producers()
    }

    /// Scopes that run after `index`.
    ///
    /// # Panics
    ///
    /// Same as [`scope`](Self::scope).
    pub fn consumers(&self, index: ScopeIndex) -> &[ScopeIndex] {
        self.check_scope_index(index);
        self.graph.nodes()[index.index()].consumers()
    }

    fn check_scope_index(&self, index: ScopeIndex) {
        assert!(
            index.index() < self.scopes.len(),
            "{index:?} does not belong to frame {}, which has {} scopes",
            self.frame_count,
            self.scopes.len()
        );
    }

    /// Every edge, in insertion order.
    pub fn edges(&self) -> &[GraphEdge] {
        self.graph.edges()
    }

    /// Graph nodes, indexed like [`recorded_scopes`](Self::recorded_scopes).
    pub fn graph_nodes(&self) -> &[GraphNode] {
        self.graph.nodes()
    }

    /// The attachments of the current frame.
    pub fn attachment_database(&self) -> &AttachmentDatabase {
        &self.attachment_database
    }

    /// Statistics of the last successful compile.
    pub fn statistics(&self) -> &FrameGraphStatistics {
        &self.statistics
    }

    /// Renders the current graph as Graphviz DOT.
    pub fn to_dot(&self) -> String {
        diagnostics::to_dot(self)
    }
}
