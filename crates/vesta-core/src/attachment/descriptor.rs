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

//! Descriptors for attachment resources and for the views scopes take of them.

use crate::ids::AttachmentId;

/// Pixel formats an image attachment may carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Format {
    /// Format is not known to the frame graph.
    #[default]
    Unknown,
    /// 8-bit RGBA, normalized.
    R8G8B8A8Unorm,
    /// 8-bit BGRA, sRGB.
    B8G8R8A8Srgb,
    /// 16-bit float RGBA.
    R16G16B16A16Float,
    /// 32-bit float RGBA.
    R32G32B32A32Float,
    /// 10/10/10/2 packed.
    R10G10B10A2Unorm,
    /// 32-bit float red.
    R32Float,
    /// 8-bit unsigned red, used for shading rate images.
    R8Uint,
    /// 32-bit float depth.
    D32Float,
    /// 24-bit depth, 8-bit stencil.
    D24UnormS8Uint,
}

impl Format {
    /// Returns `true` for depth or depth/stencil formats.
    pub const fn is_depth(self) -> bool {
        matches!(self, Format::D32Float | Format::D24UnormS8Uint)
    }
}

/// How a buffer may be bound to the pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct BufferBindFlags {
    bits: u32,
}

impl BufferBindFlags {
    /// No binding.
    pub const NONE: Self = Self { bits: 0 };
    /// Vertex or index data.
    pub const INPUT_ASSEMBLY: Self = Self { bits: 1 << 0 };
    /// Read-only shader access.
    pub const SHADER_READ: Self = Self { bits: 1 << 1 };
    /// Read-write shader access.
    pub const SHADER_WRITE: Self = Self { bits: 1 << 2 };
    /// Indirect arguments.
    pub const INDIRECT: Self = Self { bits: 1 << 3 };
    /// Copy source or destination.
    pub const COPY: Self = Self { bits: 1 << 4 };
    /// Predication source.
    pub const PREDICATION: Self = Self { bits: 1 << 5 };

    /// Returns the raw bits.
    pub const fn bits(&self) -> u32 {
        self.bits
    }

    /// Returns `true` if every flag in `other` is set.
    pub const fn contains(&self, other: Self) -> bool {
        (self.bits & other.bits) == other.bits
    }
}

impl std::ops::BitOr for BufferBindFlags {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self::Output {
        Self {
            bits: self.bits | rhs.bits,
        }
    }
}

/// Describes a buffer resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct BufferDescriptor {
    /// Size of the buffer in bytes.
    pub byte_count: u64,
    /// Allowed bindings.
    pub bind_flags: BufferBindFlags,
}

impl BufferDescriptor {
    /// Creates a buffer descriptor.
    pub fn new(byte_count: u64, bind_flags: BufferBindFlags) -> Self {
        Self {
            byte_count,
            bind_flags,
        }
    }
}

/// Describes an image resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ImageDescriptor {
    /// Width in texels.
    pub width: u32,
    /// Height in texels.
    pub height: u32,
    /// Depth in texels (1 for 2D images).
    pub depth: u32,
    /// Number of array layers.
    pub array_size: u16,
    /// Number of mip levels.
    pub mip_levels: u16,
    /// Pixel format.
    pub format: Format,
}

impl ImageDescriptor {
    /// Creates a single-layer, single-mip 2D image descriptor.
    pub fn new_2d(width: u32, height: u32, format: Format) -> Self {
        Self {
            width,
            height,
            depth: 1,
            array_size: 1,
            mip_levels: 1,
            format,
        }
    }
}

impl Default for ImageDescriptor {
    fn default() -> Self {
        Self::new_2d(1, 1, Format::Unknown)
    }
}

/// A scope's view of a buffer attachment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BufferAttachmentDescriptor {
    /// The attachment being used.
    pub attachment_id: AttachmentId,
    /// First byte of the viewed range.
    pub byte_offset: u64,
    /// Size of the viewed range; `None` means "to the end".
    pub byte_count: Option<u64>,
}

impl BufferAttachmentDescriptor {
    /// Views the whole buffer.
    pub fn new(attachment_id: impl Into<AttachmentId>) -> Self {
        Self {
            attachment_id: attachment_id.into(),
            byte_offset: 0,
            byte_count: None,
        }
    }
}

/// A scope's view of an image attachment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageAttachmentDescriptor {
    /// The attachment being used.
    pub attachment_id: AttachmentId,
    /// Format override for the view; `None` uses the image format.
    pub view_format: Option<Format>,
    /// First mip level in the view.
    pub base_mip: u16,
    /// First array layer in the view.
    pub base_array_layer: u16,
}

impl ImageAttachmentDescriptor {
    /// Views the whole image with its own format.
    pub fn new(attachment_id: impl Into<AttachmentId>) -> Self {
        Self {
            attachment_id: attachment_id.into(),
            view_format: None,
            base_mip: 0,
            base_array_layer: 0,
        }
    }
}

/// A multisample resolve: `image` receives the resolved contents of `resolve_source`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolveAttachmentDescriptor {
    /// The resolve destination.
    pub image: ImageAttachmentDescriptor,
    /// The multisampled render target being resolved, used in the same scope.
    pub resolve_source: AttachmentId,
}

impl ResolveAttachmentDescriptor {
    /// Resolves `resolve_source` into `destination`.
    pub fn new(
        destination: impl Into<AttachmentId>,
        resolve_source: impl Into<AttachmentId>,
    ) -> Self {
        Self {
            image: ImageAttachmentDescriptor::new(destination),
            resolve_source: resolve_source.into(),
        }
    }
}
