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

//! A scope is one schedulable unit of GPU work within a frame.

use crate::attachment_database::AttachmentIndex;
use crate::scope_attachment::ScopeAttachmentIndex;
use std::ops::Range;
use vesta_core::attachment::{AttachmentType, ScopeAttachmentAccess};
use vesta_core::scope::{
    HardwareQueueClass, QueryPoolAttachmentType, QueryType, ScopeActivation, ScopeDescriptor,
};
use vesta_core::{DeviceIndex, FenceId, QueryPoolId, ScopeGroupId, ScopeId, SwapChainId};

/// Index of a scope in recording order. Doubles as its graph-node index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ScopeIndex(pub(crate) u32);

impl ScopeIndex {
    /// Returns the index as a `usize`.
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// A query pool range used by a scope.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryPoolUse {
    /// The pool.
    pub pool: QueryPoolId,
    /// Queries used inside the pool.
    pub interval: Range<u32>,
    /// Kind of queries.
    pub query_type: QueryType,
    /// Frame-local or cross-frame.
    pub attachment_type: QueryPoolAttachmentType,
    /// Whether the scope writes or reads the queries.
    pub access: ScopeAttachmentAccess,
}

/// Where a scope landed in the compiled order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScopeActivationInfo {
    /// Position in the compiled order.
    pub position: u32,
    /// Standalone or subpass.
    pub activation: ScopeActivation,
}

/// A recorded scope and everything it declared this frame.
#[derive(Debug, Clone)]
pub struct Scope {
    id: ScopeId,
    index: ScopeIndex,
    device_index: DeviceIndex,
    pub(crate) queue_class: HardwareQueueClass,
    pub(crate) estimated_item_count: u32,
    group_id: Option<ScopeGroupId>,
    attachments: Vec<ScopeAttachmentIndex>,
    image_attachments: Vec<ScopeAttachmentIndex>,
    buffer_attachments: Vec<ScopeAttachmentIndex>,
    resolve_attachments: Vec<ScopeAttachmentIndex>,
    transient_attachments: Vec<AttachmentIndex>,
    pub(crate) query_pools: Vec<QueryPoolUse>,
    pub(crate) fences_to_signal: Vec<FenceId>,
    pub(crate) fences_to_wait: Vec<FenceId>,
    pub(crate) swap_chains_to_present: Vec<SwapChainId>,
    activation: Option<ScopeActivationInfo>,
}

impl Scope {
    pub(crate) fn new(
        descriptor: ScopeDescriptor,
        index: ScopeIndex,
        queue_class: HardwareQueueClass,
    ) -> Self {
        Self {
            id: descriptor.id,
            index,
            device_index: descriptor.device_index,
            queue_class,
            estimated_item_count: 0,
            group_id: descriptor.group_id,
            attachments: Vec::new(),
            image_attachments: Vec::new(),
            buffer_attachments: Vec::new(),
            resolve_attachments: Vec::new(),
            transient_attachments: Vec::new(),
            query_pools: Vec::new(),
            fences_to_signal: Vec::new(),
            fences_to_wait: Vec::new(),
            swap_chains_to_present: Vec::new(),
            activation: None,
        }
    }

    /// Files a scope attachment into the per-kind lists.
    pub(crate) fn add_attachment(
        &mut self,
        scope_attachment: ScopeAttachmentIndex,
        attachment: AttachmentIndex,
        attachment_type: AttachmentType,
        is_resolve: bool,
        is_transient: bool,
    ) {
        self.attachments.push(scope_attachment);
        if is_resolve {
            self.resolve_attachments.push(scope_attachment);
        }
        match attachment_type {
            AttachmentType::Image => self.image_attachments.push(scope_attachment),
            AttachmentType::Buffer => self.buffer_attachments.push(scope_attachment),
        }
        if is_transient && !self.transient_attachments.contains(&attachment) {
            self.transient_attachments.push(attachment);
        }
    }

    pub(crate) fn activate(&mut self, position: u32, activation: ScopeActivation) {
        self.activation = Some(ScopeActivationInfo {
            position,
            activation,
        });
    }

    /// The scope id.
    pub fn id(&self) -> &ScopeId {
        &self.id
    }

    /// Recording index, equal to the graph-node index.
    pub fn index(&self) -> ScopeIndex {
        self.index
    }

    /// Device executing the scope.
    pub fn device_index(&self) -> DeviceIndex {
        self.device_index
    }

    /// Queue the scope is submitted to.
    pub fn hardware_queue_class(&self) -> HardwareQueueClass {
        self.queue_class
    }

    /// Estimated number of items (draws, dispatches) the scope records.
    pub fn estimated_item_count(&self) -> u32 {
        self.estimated_item_count
    }

    /// Subpass group, if any.
    pub fn group_id(&self) -> Option<&ScopeGroupId> {
        self.group_id.as_ref()
    }

    /// Every scope attachment, in declaration order.
    pub fn attachments(&self) -> &[ScopeAttachmentIndex] {
        &self.attachments
    }

    /// Image scope attachments, resolves included.
    pub fn image_attachments(&self) -> &[ScopeAttachmentIndex] {
        &self.image_attachments
    }

    /// Buffer scope attachments.
    pub fn buffer_attachments(&self) -> &[ScopeAttachmentIndex] {
        &self.buffer_attachments
    }

    /// Resolve destinations.
    pub fn resolve_attachments(&self) -> &[ScopeAttachmentIndex] {
        &self.resolve_attachments
    }

    /// Transient attachments the scope touches, each listed once.
    pub fn transient_attachments(&self) -> &[AttachmentIndex] {
        &self.transient_attachments
    }

    /// Query pools used by the scope.
    pub fn query_pools(&self) -> &[QueryPoolUse] {
        &self.query_pools
    }

    /// Fences signaled when the scope completes.
    pub fn fences_to_signal(&self) -> &[FenceId] {
        &self.fences_to_signal
    }

    /// Fences waited on before the scope starts.
    pub fn fences_to_wait(&self) -> &[FenceId] {
        &self.fences_to_wait
    }

    /// Swap chains this scope presents at frame end.
    pub fn swap_chains_to_present(&self) -> &[SwapChainId] {
        &self.swap_chains_to_present
    }

    /// Placement in the compiled order; `None` until the frame compiles.
    pub fn activation(&self) -> Option<ScopeActivationInfo> {
        self.activation
    }

    /// Returns `true` if the scope was activated as a subpass.
    pub fn is_subpass(&self) -> bool {
        matches!(
            self.activation,
            Some(ScopeActivationInfo {
                activation: ScopeActivation::Subpass,
                ..
            })
        )
    }
}
