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

//! Recoverable errors reported by the frame graph.
//!
//! Authoring mistakes (overlapping writes, incompatible usages, calls out of
//! order) are not represented here: they panic. What remains are conditions
//! a caller can react to, each classified by a [`ResultCode`].

use crate::attachment::AttachmentType;
use crate::ids::{AttachmentId, ScopeGroupId, ScopeId};
use std::fmt;

/// Coarse classification of a [`FrameGraphError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResultCode {
    /// The caller referenced something that does not exist or cannot be ordered.
    InvalidArgument,
    /// The call is not valid in the current state of the graph.
    InvalidOperation,
}

impl fmt::Display for ResultCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResultCode::InvalidArgument => f.write_str("InvalidArgument"),
            ResultCode::InvalidOperation => f.write_str("InvalidOperation"),
        }
    }
}

/// An error returned by frame graph operations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FrameGraphError {
    /// No attachment with this id was registered this frame.
    #[error("attachment '{id}' is not registered in this frame")]
    AttachmentNotFound {
        /// The missing attachment.
        id: AttachmentId,
    },
    /// The attachment exists but is not of the requested type.
    #[error("attachment '{id}' has type {found}, expected {expected}")]
    AttachmentTypeMismatch {
        /// The attachment.
        id: AttachmentId,
        /// The type the caller asked for.
        expected: AttachmentType,
        /// The registered type.
        found: AttachmentType,
    },
    /// An attachment with this id was already registered this frame.
    #[error("attachment '{id}' is already registered in this frame")]
    DuplicateAttachment {
        /// The duplicated attachment.
        id: AttachmentId,
    },
    /// The scope dependencies contain a cycle.
    #[error("frame graph contains a cycle ({} unresolved edges)", .remaining.len())]
    CycleDetected {
        /// Edges that could not be satisfied, as `(producer, consumer)`.
        remaining: Vec<(ScopeId, ScopeId)>,
    },
    /// Keeping a scope group contiguous would run a consumer before its producer.
    #[error("group '{group}' cannot be contiguous: '{consumer}' would run before its producer '{producer}'")]
    GroupOrderConflict {
        /// The group whose contiguity breaks the dependency.
        group: ScopeGroupId,
        /// Producer scope of the violated edge.
        producer: ScopeId,
        /// Consumer scope of the violated edge.
        consumer: ScopeId,
    },
    /// `end` was called without a matching `begin`.
    #[error("the frame graph is not building")]
    NotBuilding,
    /// `end` was called while a scope was still recording.
    #[error("scope '{scope}' is still recording")]
    ScopeStillRecording {
        /// The scope that was never closed.
        scope: ScopeId,
    },
    /// Settings could not be parsed.
    #[error("invalid frame graph settings: {0}")]
    Settings(String),
}

impl FrameGraphError {
    /// Returns the result code classifying this error.
    pub fn code(&self) -> ResultCode {
        match self {
            FrameGraphError::NotBuilding | FrameGraphError::ScopeStillRecording { .. } => {
                ResultCode::InvalidOperation
            }
            _ => ResultCode::InvalidArgument,
        }
    }
}

/// Result alias used across the frame graph crates.
pub type Result<T, E = FrameGraphError> = std::result::Result<T, E>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_attachment_display() {
        let err = FrameGraphError::AttachmentNotFound {
            id: AttachmentId::from("SceneColor"),
        };
        assert_eq!(
            format!("{err}"),
            "attachment 'SceneColor' is not registered in this frame"
        );
        assert_eq!(err.code(), ResultCode::InvalidArgument);
    }

    #[test]
    fn type_mismatch_display() {
        let err = FrameGraphError::AttachmentTypeMismatch {
            id: AttachmentId::from("Lights"),
            expected: AttachmentType::Image,
            found: AttachmentType::Buffer,
        };
        assert_eq!(
            format!("{err}"),
            "attachment 'Lights' has type buffer, expected image"
        );
    }

    #[test]
    fn cycle_display_counts_edges() {
        let err = FrameGraphError::CycleDetected {
            remaining: vec![
                (ScopeId::from("A"), ScopeId::from("B")),
                (ScopeId::from("B"), ScopeId::from("A")),
            ],
        };
        assert_eq!(
            format!("{err}"),
            "frame graph contains a cycle (2 unresolved edges)"
        );
        assert_eq!(err.code(), ResultCode::InvalidArgument);
    }

    #[test]
    fn state_errors_are_invalid_operations() {
        assert_eq!(
            FrameGraphError::NotBuilding.code(),
            ResultCode::InvalidOperation
        );
        let err = FrameGraphError::ScopeStillRecording {
            scope: ScopeId::from("Forward"),
        };
        assert_eq!(err.code(), ResultCode::InvalidOperation);
        assert_eq!(format!("{err}"), "scope 'Forward' is still recording");
    }
}
