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

//! # Vesta Graph
//!
//! The per-frame scope graph: attachment registration, hazard tracking,
//! usage validation and scope ordering.

#![warn(missing_docs)]

pub mod attachment_database;
pub mod diagnostics;
pub mod frame_graph;
pub mod graph_node;
pub mod scope;
pub mod scope_attachment;

mod validation;

pub use attachment_database::{
    AttachmentDatabase, AttachmentIndex, AttachmentResource, FrameAttachment,
};
pub use diagnostics::{DotGraph, FrameGraphStatistics};
pub use frame_graph::FrameGraph;
pub use graph_node::{GraphEdge, GraphNode};
pub use scope::{QueryPoolUse, Scope, ScopeActivationInfo, ScopeIndex};
pub use scope_attachment::{ScopeAttachment, ScopeAttachmentIndex, ScopeAttachmentView};
