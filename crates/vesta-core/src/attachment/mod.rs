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

//! Attachment-level vocabulary: what a resource is, how long it lives, and
//! how a scope intends to use it.

pub mod compatibility;
pub mod descriptor;

pub use compatibility::{conflicting_pairs, is_compatible};
pub use descriptor::{
    BufferAttachmentDescriptor, BufferBindFlags, BufferDescriptor, Format,
    ImageAttachmentDescriptor, ImageDescriptor, ResolveAttachmentDescriptor,
};

use std::fmt;

/// The physical kind of a frame attachment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AttachmentType {
    /// A linear buffer.
    Buffer,
    /// An image, including swap chain images.
    Image,
}

impl fmt::Display for AttachmentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AttachmentType::Buffer => f.write_str("buffer"),
            AttachmentType::Image => f.write_str("image"),
        }
    }
}

/// Where the memory backing an attachment comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AttachmentLifetime {
    /// Owned outside the frame graph; content persists across frames.
    Imported,
    /// Allocated for the frame only; memory may be aliased once its last use completes.
    Transient,
}

/// The role an attachment plays inside a scope.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ScopeAttachmentUsage {
    /// Color output of a raster pass.
    RenderTarget,
    /// Depth/stencil buffer of a raster pass.
    DepthStencil,
    /// Bound to a shader as a sampled/storage resource.
    Shader,
    /// Multisample resolve destination.
    Resolve,
    /// Predication (conditional rendering) buffer.
    Predication,
    /// Read as an input attachment from a previous subpass.
    SubpassInput,
    /// Vertex or index data.
    InputAssembly,
    /// Variable rate shading image.
    ShadingRate,
    /// Source or destination of a copy.
    Copy,
    /// Indirect draw/dispatch arguments.
    Indirect,
}

impl ScopeAttachmentUsage {
    /// Number of usage kinds.
    pub const COUNT: usize = 10;

    /// Every usage kind, in declaration order.
    pub const ALL: [ScopeAttachmentUsage; Self::COUNT] = [
        ScopeAttachmentUsage::RenderTarget,
        ScopeAttachmentUsage::DepthStencil,
        ScopeAttachmentUsage::Shader,
        ScopeAttachmentUsage::Resolve,
        ScopeAttachmentUsage::Predication,
        ScopeAttachmentUsage::SubpassInput,
        ScopeAttachmentUsage::InputAssembly,
        ScopeAttachmentUsage::ShadingRate,
        ScopeAttachmentUsage::Copy,
        ScopeAttachmentUsage::Indirect,
    ];

    /// Dense index of this usage, suitable for table lookups.
    pub const fn index(self) -> usize {
        self as usize
    }
}

/// Whether a scope reads, writes or does both to an attachment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScopeAttachmentAccess {
    /// The scope only reads the attachment.
    Read,
    /// The scope only writes the attachment.
    Write,
    /// The scope reads and writes the attachment.
    ReadWrite,
}

impl ScopeAttachmentAccess {
    /// Returns `true` if the access includes reading.
    pub const fn is_read(self) -> bool {
        matches!(self, Self::Read | Self::ReadWrite)
    }

    /// Returns `true` if the access includes writing.
    pub const fn is_write(self) -> bool {
        matches!(self, Self::Write | Self::ReadWrite)
    }
}

/// Pipeline stages at which a scope touches an attachment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ScopeAttachmentStage {
    bits: u32,
}

impl ScopeAttachmentStage {
    /// No stage.
    pub const NONE: Self = Self { bits: 0 };
    /// Vertex shader stage.
    pub const VERTEX_SHADER: Self = Self { bits: 1 << 0 };
    /// Fragment shader stage.
    pub const FRAGMENT_SHADER: Self = Self { bits: 1 << 1 };
    /// Compute shader stage.
    pub const COMPUTE_SHADER: Self = Self { bits: 1 << 2 };
    /// Color attachment output.
    pub const COLOR_ATTACHMENT_OUTPUT: Self = Self { bits: 1 << 3 };
    /// Early depth/stencil tests.
    pub const EARLY_FRAGMENT_TEST: Self = Self { bits: 1 << 4 };
    /// Late depth/stencil tests.
    pub const LATE_FRAGMENT_TEST: Self = Self { bits: 1 << 5 };
    /// Indirect argument fetch.
    pub const DRAW_INDIRECT: Self = Self { bits: 1 << 6 };
    /// Vertex/index fetch.
    pub const VERTEX_INPUT: Self = Self { bits: 1 << 7 };
    /// Transfer operations.
    pub const COPY: Self = Self { bits: 1 << 8 };
    /// Conditional rendering.
    pub const PREDICATION: Self = Self { bits: 1 << 9 };
    /// Shading rate image fetch.
    pub const SHADING_RATE: Self = Self { bits: 1 << 10 };
    /// Every stage.
    pub const ANY: Self = Self { bits: (1 << 11) - 1 };

    /// Returns the raw bits.
    pub const fn bits(&self) -> u32 {
        self.bits
    }

    /// Combines two sets of stages.
    pub const fn union(self, other: Self) -> Self {
        Self {
            bits: self.bits | other.bits,
        }
    }

    /// Returns `true` if every stage in `other` is also in `self`.
    pub const fn contains(&self, other: Self) -> bool {
        (self.bits & other.bits) == other.bits
    }

    /// Returns `true` if no stage is set.
    pub const fn is_empty(&self) -> bool {
        self.bits == 0
    }

    /// The stages a usage kind implies when the caller does not narrow them.
    pub const fn default_for(usage: ScopeAttachmentUsage) -> Self {
        match usage {
            ScopeAttachmentUsage::RenderTarget | ScopeAttachmentUsage::Resolve => {
                Self::COLOR_ATTACHMENT_OUTPUT
            }
            ScopeAttachmentUsage::DepthStencil => {
                Self::EARLY_FRAGMENT_TEST.union(Self::LATE_FRAGMENT_TEST)
            }
            ScopeAttachmentUsage::SubpassInput => Self::FRAGMENT_SHADER,
            ScopeAttachmentUsage::InputAssembly => Self::VERTEX_INPUT,
            ScopeAttachmentUsage::Indirect => Self::DRAW_INDIRECT,
            ScopeAttachmentUsage::Copy => Self::COPY,
            ScopeAttachmentUsage::Predication => Self::PREDICATION,
            ScopeAttachmentUsage::ShadingRate => Self::SHADING_RATE,
            ScopeAttachmentUsage::Shader => Self::ANY,
        }
    }
}

impl Default for ScopeAttachmentStage {
    fn default() -> Self {
        Self::ANY
    }
}

impl std::ops::BitOr for ScopeAttachmentStage {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self::Output {
        self.union(rhs)
    }
}

impl std::ops::BitOrAssign for ScopeAttachmentStage {
    fn bitor_assign(&mut self, rhs: Self) {
        *self = self.union(rhs);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn access_read_write_predicates() {
        assert!(ScopeAttachmentAccess::Read.is_read());
        assert!(!ScopeAttachmentAccess::Read.is_write());
        assert!(ScopeAttachmentAccess::Write.is_write());
        assert!(!ScopeAttachmentAccess::Write.is_read());
        assert!(ScopeAttachmentAccess::ReadWrite.is_read());
        assert!(ScopeAttachmentAccess::ReadWrite.is_write());
    }

    #[test]
    fn usage_indices_are_dense() {
        for (i, usage) in ScopeAttachmentUsage::ALL.iter().enumerate() {
            assert_eq!(usage.index(), i);
        }
    }

    #[test]
    fn stage_flags_combine() {
        let stages = ScopeAttachmentStage::VERTEX_SHADER | ScopeAttachmentStage::FRAGMENT_SHADER;
        assert!(stages.contains(ScopeAttachmentStage::VERTEX_SHADER));
        assert!(!stages.contains(ScopeAttachmentStage::COMPUTE_SHADER));
        assert!(ScopeAttachmentStage::ANY.contains(stages));
        assert!(ScopeAttachmentStage::NONE.is_empty());
    }

    #[test]
    fn depth_stencil_defaults_to_fragment_tests() {
        let stages = ScopeAttachmentStage::default_for(ScopeAttachmentUsage::DepthStencil);
        assert!(stages.contains(ScopeAttachmentStage::EARLY_FRAGMENT_TEST));
        assert!(stages.contains(ScopeAttachmentStage::LATE_FRAGMENT_TEST));
    }
}
