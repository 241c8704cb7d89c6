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

//! Registry of the attachments declared for the current frame.
//!
//! Every attachment keeps its usage chain (the scope attachments that
//! reference it, in declaration order) and, per device, the hazard state the
//! frame graph needs to derive producer/consumer edges.

use crate::scope::ScopeIndex;
use crate::scope_attachment::{ScopeAttachment, ScopeAttachmentIndex, ScopeAttachmentView};
use ahash::AHashMap;
use vesta_core::attachment::{
    AttachmentLifetime, AttachmentType, BufferDescriptor, ImageDescriptor, ScopeAttachmentAccess,
    ScopeAttachmentStage, ScopeAttachmentUsage,
};
use vesta_core::{AttachmentId, DeviceIndex, FrameGraphError, Result, SwapChainId};

/// Index of a [`FrameAttachment`] in the database.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct AttachmentIndex(pub(crate) u32);

impl AttachmentIndex {
    /// Returns the index as a `usize`.
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// The resource behind a frame attachment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AttachmentResource {
    /// A buffer.
    Buffer(BufferDescriptor),
    /// An image.
    Image(ImageDescriptor),
    /// The current image of a swap chain.
    SwapChain {
        /// Image properties of the swap chain.
        descriptor: ImageDescriptor,
        /// The swap chain to present.
        swap_chain: SwapChainId,
        /// Device that owns the swap chain.
        device_index: DeviceIndex,
    },
}

impl AttachmentResource {
    /// The attachment type of the resource.
    pub fn attachment_type(&self) -> AttachmentType {
        match self {
            AttachmentResource::Buffer(_) => AttachmentType::Buffer,
            AttachmentResource::Image(_) | AttachmentResource::SwapChain { .. } => {
                AttachmentType::Image
            }
        }
    }
}

/// Hazard tracking for one attachment on one device.
#[derive(Debug, Clone, Default)]
pub(crate) struct DeviceUsage {
    first_scope: Option<ScopeIndex>,
    last_scope: Option<ScopeIndex>,
    last_writer: Option<ScopeIndex>,
    readers_since_write: Vec<ScopeIndex>,
    pending_reads: Vec<ScopeIndex>,
}

/// Edges a new use requires, relative to the using scope.
#[derive(Debug, Default, PartialEq, Eq)]
pub(crate) struct UseDependencies {
    /// Scopes that must run before the using scope.
    pub producers: Vec<ScopeIndex>,
    /// Scopes that must run after the using scope.
    pub consumers: Vec<ScopeIndex>,
}

impl DeviceUsage {
    fn record(
        &mut self,
        scope: ScopeIndex,
        access: ScopeAttachmentAccess,
        lifetime: AttachmentLifetime,
    ) -> UseDependencies {
        let mut deps = UseDependencies::default();
        self.first_scope.get_or_insert(scope);
        self.last_scope = Some(scope);

        if access.is_write() {
            // Write after write, then write after read.
            deps.producers.extend(self.last_writer.filter(|&w| w != scope));
            deps.producers
                .extend(self.readers_since_write.drain(..).filter(|&r| r != scope));
            // Transient reads recorded before any write consume this write.
            deps.consumers
                .extend(self.pending_reads.drain(..).filter(|&r| r != scope));
            self.last_writer = Some(scope);
        } else {
            match self.last_writer {
                Some(writer) => {
                    if writer != scope {
                        deps.producers.push(writer);
                    }
                    push_unique(&mut self.readers_since_write, scope);
                }
                None if lifetime == AttachmentLifetime::Transient => {
                    push_unique(&mut self.pending_reads, scope);
                }
                None => push_unique(&mut self.readers_since_write, scope),
            }
        }

        deps.producers.dedup();
        deps
    }
}

fn push_unique(list: &mut Vec<ScopeIndex>, scope: ScopeIndex) {
    if list.last() != Some(&scope) && !list.contains(&scope) {
        list.push(scope);
    }
}

/// An attachment registered for the current frame.
#[derive(Debug, Clone)]
pub struct FrameAttachment {
    id: AttachmentId,
    index: AttachmentIndex,
    lifetime: AttachmentLifetime,
    resource: AttachmentResource,
    usages: Vec<ScopeAttachmentIndex>,
    devices: AHashMap<DeviceIndex, DeviceUsage>,
}

impl FrameAttachment {
    /// The attachment id.
    pub fn id(&self) -> &AttachmentId {
        &self.id
    }

    /// Position in the database.
    pub fn index(&self) -> AttachmentIndex {
        self.index
    }

    /// Imported or transient.
    pub fn lifetime(&self) -> AttachmentLifetime {
        self.lifetime
    }

    /// The backing resource description.
    pub fn resource(&self) -> &AttachmentResource {
        &self.resource
    }

    /// Buffer or image.
    pub fn attachment_type(&self) -> AttachmentType {
        self.resource.attachment_type()
    }

    /// The swap chain behind this attachment, if any.
    pub fn swap_chain(&self) -> Option<(SwapChainId, DeviceIndex)> {
        match self.resource {
            AttachmentResource::SwapChain {
                swap_chain,
                device_index,
                ..
            } => Some((swap_chain, device_index)),
            _ => None,
        }
    }

    /// Every use of this attachment, in declaration order.
    pub fn usages(&self) -> &[ScopeAttachmentIndex] {
        &self.usages
    }

    /// Returns `true` if no scope used the attachment.
    pub fn is_unused(&self) -> bool {
        self.usages.is_empty()
    }

    /// First scope on `device` that used the attachment.
    pub fn first_scope(&self, device: DeviceIndex) -> Option<ScopeIndex> {
        self.devices.get(&device).and_then(|usage| usage.first_scope)
    }

    /// Last scope on `device` that used the attachment.
    pub fn last_scope(&self, device: DeviceIndex) -> Option<ScopeIndex> {
        self.devices.get(&device).and_then(|usage| usage.last_scope)
    }

    /// Last scope on `device` that wrote the attachment.
    pub fn last_writer(&self, device: DeviceIndex) -> Option<ScopeIndex> {
        self.devices.get(&device).and_then(|usage| usage.last_writer)
    }
}

/// Owns every attachment and scope attachment of the current frame.
#[derive(Debug, Default)]
pub struct AttachmentDatabase {
    attachments: Vec<FrameAttachment>,
    lookup: AHashMap<AttachmentId, AttachmentIndex>,
    scope_attachments: Vec<ScopeAttachment>,
    swap_chain_attachments: Vec<AttachmentIndex>,
}

impl AttachmentDatabase {
    /// Creates an empty database.
    pub fn new() -> Self {
        Self::default()
    }

    fn insert(
        &mut self,
        id: AttachmentId,
        lifetime: AttachmentLifetime,
        resource: AttachmentResource,
    ) -> Result<AttachmentIndex> {
        if self.lookup.contains_key(&id) {
            return Err(FrameGraphError::DuplicateAttachment { id });
        }

        let index = AttachmentIndex(self.attachments.len() as u32);
        if matches!(resource, AttachmentResource::SwapChain { .. }) {
            self.swap_chain_attachments.push(index);
        }
        log::trace!("Registered {lifetime:?} attachment '{id}'.");
        self.lookup.insert(id.clone(), index);
        self.attachments.push(FrameAttachment {
            id,
            index,
            lifetime,
            resource,
            usages: Vec::new(),
            devices: AHashMap::new(),
        });
        Ok(index)
    }

    /// Registers an image owned outside the frame graph.
    pub fn import_image(
        &mut self,
        id: impl Into<AttachmentId>,
        descriptor: ImageDescriptor,
    ) -> Result<AttachmentIndex> {
        self.insert(
            id.into(),
            AttachmentLifetime::Imported,
            AttachmentResource::Image(descriptor),
        )
    }

    /// Registers a buffer owned outside the frame graph.
    pub fn import_buffer(
        &mut self,
        id: impl Into<AttachmentId>,
        descriptor: BufferDescriptor,
    ) -> Result<AttachmentIndex> {
        self.insert(
            id.into(),
            AttachmentLifetime::Imported,
            AttachmentResource::Buffer(descriptor),
        )
    }

    /// Registers the current image of a swap chain.
    pub fn import_swap_chain(
        &mut self,
        id: impl Into<AttachmentId>,
        swap_chain: SwapChainId,
        device_index: DeviceIndex,
        descriptor: ImageDescriptor,
    ) -> Result<AttachmentIndex> {
        self.insert(
            id.into(),
            AttachmentLifetime::Imported,
            AttachmentResource::SwapChain {
                descriptor,
                swap_chain,
                device_index,
            },
        )
    }

    /// Registers an image allocated for this frame only.
    pub fn create_transient_image(
        &mut self,
        id: impl Into<AttachmentId>,
        descriptor: ImageDescriptor,
    ) -> Result<AttachmentIndex> {
        self.insert(
            id.into(),
            AttachmentLifetime::Transient,
            AttachmentResource::Image(descriptor),
        )
    }

    /// Registers a buffer allocated for this frame only.
    pub fn create_transient_buffer(
        &mut self,
        id: impl Into<AttachmentId>,
        descriptor: BufferDescriptor,
    ) -> Result<AttachmentIndex> {
        self.insert(
            id.into(),
            AttachmentLifetime::Transient,
            AttachmentResource::Buffer(descriptor),
        )
    }

    /// Looks an attachment up by id, regardless of type.
    pub fn find_any(&self, id: &AttachmentId) -> Option<&FrameAttachment> {
        self.lookup
            .get(id)
            .map(|index| &self.attachments[index.index()])
    }

    /// Looks an attachment of a given type up by id.
    ///
    /// Returns `None` if the id is unknown or names an attachment of another type.
    pub fn find_attachment(
        &self,
        id: &AttachmentId,
        attachment_type: AttachmentType,
    ) -> Option<&FrameAttachment> {
        self.find_any(id)
            .filter(|attachment| attachment.attachment_type() == attachment_type)
    }

    /// The attachment at `index`.
    pub fn attachment(&self, index: AttachmentIndex) -> &FrameAttachment {
        &self.attachments[index.index()]
    }

    /// Every attachment, in registration order.
    pub fn attachments(&self) -> &[FrameAttachment] {
        &self.attachments
    }

    /// Attachments backed by a swap chain.
    pub fn swap_chain_attachments(&self) -> impl Iterator<Item = &FrameAttachment> + '_ {
        self.swap_chain_attachments
            .iter()
            .map(|index| &self.attachments[index.index()])
    }

    /// Attachments allocated for this frame only.
    pub fn transient_attachments(&self) -> impl Iterator<Item = &FrameAttachment> + '_ {
        self.attachments
            .iter()
            .filter(|attachment| attachment.lifetime == AttachmentLifetime::Transient)
    }

    /// Attachments owned outside the frame graph.
    pub fn imported_attachments(&self) -> impl Iterator<Item = &FrameAttachment> + '_ {
        self.attachments
            .iter()
            .filter(|attachment| attachment.lifetime == AttachmentLifetime::Imported)
    }

    /// Attachments no scope used.
    pub fn unused_attachments(&self) -> impl Iterator<Item = &FrameAttachment> + '_ {
        self.attachments.iter().filter(|attachment| attachment.is_unused())
    }

    /// The scope attachment at `index`.
    pub fn scope_attachment(&self, index: ScopeAttachmentIndex) -> &ScopeAttachment {
        &self.scope_attachments[index.index()]
    }

    /// Every scope attachment, in declaration order.
    pub fn scope_attachments(&self) -> &[ScopeAttachment] {
        &self.scope_attachments
    }

    /// Creates a scope attachment, links it into the attachment's usage chain
    /// and updates the attachment's hazard state for `device`.
    ///
    /// Returns the new scope attachment and the edges the use requires.
    #[allow(clippy::too_many_arguments)]
    pub(crate) fn emplace_scope_attachment(
        &mut self,
        scope: ScopeIndex,
        device: DeviceIndex,
        attachment: AttachmentIndex,
        usage: ScopeAttachmentUsage,
        access: ScopeAttachmentAccess,
        stage: ScopeAttachmentStage,
        view: ScopeAttachmentView,
    ) -> (ScopeAttachmentIndex, UseDependencies) {
        let index = ScopeAttachmentIndex(self.scope_attachments.len() as u32);
        let frame_attachment = &mut self.attachments[attachment.index()];

        self.scope_attachments.push(ScopeAttachment {
            attachment,
            attachment_id: frame_attachment.id.clone(),
            scope,
            usage,
            access,
            stage,
            view,
        });
        frame_attachment.usages.push(index);

        let lifetime = frame_attachment.lifetime;
        let deps = frame_attachment
            .devices
            .entry(device)
            .or_default()
            .record(scope, access, lifetime);
        (index, deps)
    }

    /// Releases every attachment.
    pub fn clear(&mut self) {
        self.attachments.clear();
        self.lookup.clear();
        self.scope_attachments.clear();
        self.swap_chain_attachments.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use vesta_core::attachment::{BufferAttachmentDescriptor, BufferBindFlags, Format};

    fn buffer_view(id: &str) -> ScopeAttachmentView {
        ScopeAttachmentView::Buffer(BufferAttachmentDescriptor::new(id))
    }

    fn emplace(
        db: &mut AttachmentDatabase,
        scope: u32,
        attachment: AttachmentIndex,
        access: ScopeAttachmentAccess,
    ) -> UseDependencies {
        let id = db.attachment(attachment).id().as_str().to_owned();
        db.emplace_scope_attachment(
            ScopeIndex(scope),
            DeviceIndex::DEFAULT,
            attachment,
            ScopeAttachmentUsage::Shader,
            access,
            ScopeAttachmentStage::COMPUTE_SHADER,
            buffer_view(&id),
        )
        .1
    }

    #[test]
    fn duplicate_ids_are_rejected() {
        let mut db = AttachmentDatabase::new();
        db.import_buffer("Lights", BufferDescriptor::default())
            .unwrap();
        let err = db
            .create_transient_buffer("Lights", BufferDescriptor::default())
            .unwrap_err();
        assert_eq!(
            err,
            FrameGraphError::DuplicateAttachment {
                id: AttachmentId::from("Lights")
            }
        );
    }

    #[test]
    fn typed_lookup_filters_by_type() {
        let mut db = AttachmentDatabase::new();
        db.import_image("Color", ImageDescriptor::new_2d(8, 8, Format::R8G8B8A8Unorm))
            .unwrap();
        db.import_swap_chain(
            "Backbuffer",
            SwapChainId(0),
            DeviceIndex::DEFAULT,
            ImageDescriptor::new_2d(8, 8, Format::B8G8R8A8Srgb),
        )
        .unwrap();

        let color = AttachmentId::from("Color");
        assert!(db.find_attachment(&color, AttachmentType::Image).is_some());
        assert!(db.find_attachment(&color, AttachmentType::Buffer).is_none());
        assert!(db
            .find_attachment(&AttachmentId::from("Missing"), AttachmentType::Image)
            .is_none());

        let swap_chains: Vec<_> = db.swap_chain_attachments().collect();
        assert_eq!(swap_chains.len(), 1);
        assert_eq!(
            swap_chains[0].swap_chain(),
            Some((SwapChainId(0), DeviceIndex::DEFAULT))
        );
        assert_eq!(swap_chains[0].attachment_type(), AttachmentType::Image);
    }

    #[test]
    fn read_after_write_depends_on_writer() {
        let mut db = AttachmentDatabase::new();
        let a = db
            .import_buffer("Data", BufferDescriptor::new(64, BufferBindFlags::SHADER_WRITE))
            .unwrap();

        assert_eq!(
            emplace(&mut db, 0, a, ScopeAttachmentAccess::Write),
            UseDependencies::default()
        );
        let deps = emplace(&mut db, 1, a, ScopeAttachmentAccess::Read);
        assert_eq!(deps.producers, vec![ScopeIndex(0)]);

        let attachment = db.attachment(a);
        assert_eq!(attachment.usages().len(), 2);
        assert_eq!(attachment.first_scope(DeviceIndex::DEFAULT), Some(ScopeIndex(0)));
        assert_eq!(attachment.last_scope(DeviceIndex::DEFAULT), Some(ScopeIndex(1)));
        assert_eq!(attachment.last_writer(DeviceIndex::DEFAULT), Some(ScopeIndex(0)));
    }

    #[test]
    fn write_after_read_waits_for_readers() {
        let mut db = AttachmentDatabase::new();
        let a = db
            .import_buffer("Data", BufferDescriptor::default())
            .unwrap();

        emplace(&mut db, 0, a, ScopeAttachmentAccess::Write);
        emplace(&mut db, 1, a, ScopeAttachmentAccess::Read);
        emplace(&mut db, 2, a, ScopeAttachmentAccess::Read);
        let deps = emplace(&mut db, 3, a, ScopeAttachmentAccess::Write);
        assert_eq!(
            deps.producers,
            vec![ScopeIndex(0), ScopeIndex(1), ScopeIndex(2)]
        );
    }

    #[test]
    fn imported_read_before_write_is_not_a_consumer() {
        let mut db = AttachmentDatabase::new();
        let a = db
            .import_buffer("History", BufferDescriptor::default())
            .unwrap();

        emplace(&mut db, 0, a, ScopeAttachmentAccess::Read);
        let deps = emplace(&mut db, 1, a, ScopeAttachmentAccess::Write);
        assert_eq!(deps.producers, vec![ScopeIndex(0)]);
        assert!(deps.consumers.is_empty());
    }

    #[test]
    fn transient_read_before_write_binds_to_first_writer() {
        let mut db = AttachmentDatabase::new();
        let a = db
            .create_transient_buffer("Scratch", BufferDescriptor::default())
            .unwrap();

        emplace(&mut db, 0, a, ScopeAttachmentAccess::Read);
        let deps = emplace(&mut db, 1, a, ScopeAttachmentAccess::Write);
        assert!(deps.producers.is_empty());
        assert_eq!(deps.consumers, vec![ScopeIndex(0)]);
    }

    #[test]
    fn same_scope_uses_produce_no_dependencies() {
        let mut db = AttachmentDatabase::new();
        let a = db
            .create_transient_buffer("Scratch", BufferDescriptor::default())
            .unwrap();

        emplace(&mut db, 0, a, ScopeAttachmentAccess::Read);
        assert_eq!(
            emplace(&mut db, 0, a, ScopeAttachmentAccess::Write),
            UseDependencies::default()
        );
        assert_eq!(
            emplace(&mut db, 0, a, ScopeAttachmentAccess::ReadWrite),
            UseDependencies::default()
        );
    }

    #[test]
    fn clear_releases_everything() {
        let mut db = AttachmentDatabase::new();
        let a = db
            .create_transient_buffer("Scratch", BufferDescriptor::default())
            .unwrap();
        emplace(&mut db, 0, a, ScopeAttachmentAccess::Write);
        db.clear();
        assert!(db.attachments().is_empty());
        assert!(db.scope_attachments().is_empty());
        assert!(db.find_any(&AttachmentId::from("Scratch")).is_none());
    }
}
