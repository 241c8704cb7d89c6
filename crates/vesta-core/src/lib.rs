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

//! # Vesta Core
//!
//! Foundational types and contracts for the Vesta frame graph: identifiers,
//! attachment and scope vocabulary, the usage compatibility table, settings,
//! errors, and the scope sorter.

#![warn(missing_docs)]

pub mod attachment;
pub mod device;
pub mod error;
pub mod graph;
pub mod ids;
pub mod scope;
pub mod settings;

pub use device::{DeviceQueueProvider, SingleDeviceProvider, UniformDeviceProvider};
pub use error::{FrameGraphError, Result, ResultCode};
pub use ids::{AttachmentId, DeviceIndex, FenceId, QueryPoolId, ScopeGroupId, ScopeId, SwapChainId};
pub use settings::{FrameGraphSettings, ValidationMode};
