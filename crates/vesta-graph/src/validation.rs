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

//! Authoring checks run on attachment declarations when validation is enabled.
//!
//! A failed check is a bug in the pass that declared the attachment, so every
//! check panics instead of returning an error.

use crate::attachment_database::{AttachmentDatabase, AttachmentIndex};
use crate::scope::Scope;
use vesta_core::attachment::{is_compatible, ScopeAttachmentAccess, ScopeAttachmentUsage};
use vesta_core::AttachmentId;

/// Checks a new use of `attachment` against the uses `scope` already declared for it.
///
/// # Panics
///
/// If either use writes the attachment, or the two usage kinds cannot overlap.
pub(crate) fn validate_overlap(
    database: &AttachmentDatabase,
    scope: &Scope,
    attachment: AttachmentIndex,
    usage: ScopeAttachmentUsage,
    access: ScopeAttachmentAccess,
) {
    let overlapping = scope
        .attachments()
        .iter()
        .map(|&index| database.scope_attachment(index))
        .filter(|existing| existing.attachment() == attachment);

    for existing in overlapping {
        if existing.access().is_write() || access.is_write() {
            log::error!(
                "Scope '{}' overlaps attachment '{}' with write access ({:?} as {:?}, then {:?} as {:?}).",
                scope.id(),
                existing.attachment_id(),
                existing.access(),
                existing.usage(),
                access,
                usage
            );
            panic!(
                "overlapping write access on attachment '{}' in scope '{}'",
                existing.attachment_id(),
                scope.id()
            );
        }
        if !is_compatible(existing.usage(), usage) {
            log::error!(
                "Scope '{}' uses attachment '{}' as both {:?} and {:?}.",
                scope.id(),
                existing.attachment_id(),
                existing.usage(),
                usage
            );
            panic!(
                "usage {:?} is incompatible with {:?} on attachment '{}' in scope '{}'",
                usage,
                existing.usage(),
                existing.attachment_id(),
                scope.id()
            );
        }
    }
}

/// Checks that the source of a resolve is a render target of `scope`.
///
/// # Panics
///
/// If `scope` did not declare `source` as a render target.
pub(crate) fn validate_resolve_source(
    database: &AttachmentDatabase,
    scope: &Scope,
    source: &AttachmentId,
) {
    let is_render_target = scope
        .attachments()
        .iter()
        .map(|&index| database.scope_attachment(index))
        .any(|existing| {
            existing.attachment_id() == source
                && existing.usage() == ScopeAttachmentUsage::RenderTarget
        });

    if !is_render_target {
        log::error!(
            "Scope '{}' resolves '{source}', which it does not use as a render target.",
            scope.id()
        );
        panic!(
            "resolve source '{source}' is not a render target of scope '{}'",
            scope.id()
        );
    }
}
