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

//! The binding of one attachment to one scope for one usage.

use crate::attachment_database::AttachmentIndex;
use crate::scope::ScopeIndex;
use vesta_core::attachment::{
    BufferAttachmentDescriptor, ImageAttachmentDescriptor, ResolveAttachmentDescriptor,
    ScopeAttachmentAccess, ScopeAttachmentStage, ScopeAttachmentUsage,
};
use vesta_core::AttachmentId;

/// Index of a [`ScopeAttachment`] in the attachment database.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ScopeAttachmentIndex(pub(crate) u32);

impl ScopeAttachmentIndex {
    /// Returns the index as a `usize`.
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// The view a scope takes of the attachment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScopeAttachmentView {
    /// A buffer range.
    Buffer(BufferAttachmentDescriptor),
    /// An image view.
    Image(ImageAttachmentDescriptor),
    /// A resolve destination.
    Resolve(ResolveAttachmentDescriptor),
}

/// One declared use of an attachment by a scope.
#[derive(Debug, Clone)]
pub struct ScopeAttachment {
    pub(crate) attachment: AttachmentIndex,
    pub(crate) attachment_id: AttachmentId,
    pub(crate) scope: ScopeIndex,
    pub(crate) usage: ScopeAttachmentUsage,
    pub(crate) access: ScopeAttachmentAccess,
    pub(crate) stage: ScopeAttachmentStage,
    pub(crate) view: ScopeAttachmentView,
}

impl ScopeAttachment {
    /// The attachment being used.
    pub fn attachment(&self) -> AttachmentIndex {
        self.attachment
    }

    /// Id of the attachment being used.
    pub fn attachment_id(&self) -> &AttachmentId {
        &self.attachment_id
    }

    /// The scope using the attachment.
    pub fn scope(&self) -> ScopeIndex {
        self.scope
    }

    /// Role of the attachment in the scope.
    pub fn usage(&self) -> ScopeAttachmentUsage {
        self.usage
    }

    /// Read/write intent.
    pub fn access(&self) -> ScopeAttachmentAccess {
        self.access
    }

    /// Pipeline stages touching the attachment.
    pub fn stage(&self) -> ScopeAttachmentStage {
        self.stage
    }

    /// The declared view.
    pub fn view(&self) -> &ScopeAttachmentView {
        &self.view
    }
}
