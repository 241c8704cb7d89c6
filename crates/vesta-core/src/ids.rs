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

//! Stable identifiers shared by every part of the frame graph.
//!
//! Named identifiers ([`AttachmentId`], [`ScopeId`], [`ScopeGroupId`]) are
//! backed by an `Arc<str>` so they can be cloned into lookup maps, edge
//! diagnostics and scope records without reallocating.

use std::fmt;
use std::sync::Arc;

macro_rules! named_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
        pub struct $name(Arc<str>);

        impl $name {
            /// Creates a new identifier from any string-like value.
            pub fn new(name: impl AsRef<str>) -> Self {
                Self(Arc::from(name.as_ref()))
            }

            /// Returns the identifier as a string slice.
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Debug for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}({:?})", stringify!($name), &*self.0)
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<&str> for $name {
            fn from(value: &str) -> Self {
                Self::new(value)
            }
        }

        impl From<String> for $name {
            fn from(value: String) -> Self {
                Self(Arc::from(value))
            }
        }
    };
}

named_id!(
    /// Names a frame attachment (buffer, image or swap chain image).
    AttachmentId
);

named_id!(
    /// Names a scope, the schedulable unit of GPU work inside a frame.
    ScopeId
);

named_id!(
    /// Names a group of scopes that must execute contiguously (subpasses).
    ScopeGroupId
);

/// Identifies a query pool owned by the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct QueryPoolId(pub u32);

/// Identifies a fence owned by the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FenceId(pub u32);

/// Identifies a swap chain owned by the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SwapChainId(pub u32);

/// Index of a physical device in a multi-device setup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct DeviceIndex(pub u16);

impl DeviceIndex {
    /// The device used when a caller does not pick one.
    pub const DEFAULT: Self = Self(0);
}

impl fmt::Display for DeviceIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "device#{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn named_ids_compare_by_content() {
        let a = AttachmentId::from("GBufferAlbedo");
        let b = AttachmentId::new(String::from("GBufferAlbedo"));
        assert_eq!(a, b);

        let mut set = HashSet::new();
        set.insert(a);
        assert!(set.contains(&b));
    }

    #[test]
    fn named_id_display_and_debug() {
        let id = ScopeId::from("ShadowPass");
        assert_eq!(format!("{id}"), "ShadowPass");
        assert_eq!(format!("{id:?}"), "ScopeId(\"ShadowPass\")");
    }

    #[test]
    fn default_device_is_zero() {
        assert_eq!(DeviceIndex::default(), DeviceIndex::DEFAULT);
        assert_eq!(DeviceIndex::DEFAULT.to_string(), "device#0");
    }
}
