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

//! Scope-level vocabulary shared between the graph and its collaborators.

use crate::ids::{DeviceIndex, ScopeGroupId, ScopeId};
use std::fmt;

/// The class of hardware queue a scope is submitted to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum HardwareQueueClass {
    /// Graphics queue; supports every kind of work.
    #[default]
    Graphics,
    /// Async compute queue.
    Compute,
    /// Transfer-only queue.
    Copy,
}

impl HardwareQueueClass {
    /// Every queue class.
    pub const ALL: [HardwareQueueClass; 3] = [
        HardwareQueueClass::Graphics,
        HardwareQueueClass::Compute,
        HardwareQueueClass::Copy,
    ];
}

impl fmt::Display for HardwareQueueClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HardwareQueueClass::Graphics => f.write_str("graphics"),
            HardwareQueueClass::Compute => f.write_str("compute"),
            HardwareQueueClass::Copy => f.write_str("copy"),
        }
    }
}

/// How a scope was activated by the compiled graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ScopeActivation {
    /// Standalone scope.
    #[default]
    None,
    /// Member of a scope group, executed as a subpass.
    Subpass,
}

/// Whether a query pool is ordered inside the frame graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum QueryPoolAttachmentType {
    /// Queries are written and read within this frame; uses are ordered.
    Local,
    /// Queries span frames; uses are not graph-ordered.
    Global,
}

/// Kind of queries stored in a pool.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum QueryType {
    /// Occlusion queries.
    Occlusion,
    /// GPU timestamps.
    Timestamp,
    /// Pipeline statistics counters.
    PipelineStatistics,
}

/// Everything the frame graph needs to open a scope.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScopeDescriptor {
    /// Unique name of the scope within the frame.
    pub id: ScopeId,
    /// Queue the scope wants to run on.
    pub queue_class: HardwareQueueClass,
    /// Optional subpass group.
    pub group_id: Option<ScopeGroupId>,
    /// Device that executes the scope.
    pub device_index: DeviceIndex,
}

impl ScopeDescriptor {
    /// A graphics scope on the default device with no group.
    pub fn new(id: impl Into<ScopeId>) -> Self {
        Self {
            id: id.into(),
            queue_class: HardwareQueueClass::Graphics,
            group_id: None,
            device_index: DeviceIndex::DEFAULT,
        }
    }

    /// Sets the hardware queue class.
    pub fn with_queue_class(mut self, queue_class: HardwareQueueClass) -> Self {
        self.queue_class = queue_class;
        self
    }

    /// Places the scope in a subpass group.
    pub fn with_group(mut self, group_id: impl Into<ScopeGroupId>) -> Self {
        self.group_id = Some(group_id.into());
        self
    }

    /// Sets the executing device.
    pub fn with_device(mut self, device_index: DeviceIndex) -> Self {
        self.device_index = device_index;
        self
    }
}
