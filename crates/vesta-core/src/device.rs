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

//! The device collaborator handed to a frame graph at construction time.

use crate::ids::DeviceIndex;
use crate::scope::HardwareQueueClass;

/// Answers device and queue questions for the frame graph.
///
/// The frame graph never looks devices up globally; whoever owns the frame
/// context constructs it with an implementation of this trait.
pub trait DeviceQueueProvider: Send + Sync {
    /// Number of devices scopes may target.
    fn device_count(&self) -> usize;

    /// Returns `true` if `device` exposes a queue of `class`.
    fn supports_queue_class(&self, device: DeviceIndex, class: HardwareQueueClass) -> bool;
}

/// A single device exposing every queue class.
#[derive(Debug, Clone, Copy, Default)]
pub struct SingleDeviceProvider;

impl DeviceQueueProvider for SingleDeviceProvider {
    fn device_count(&self) -> usize {
        1
    }

    fn supports_queue_class(&self, device: DeviceIndex, _class: HardwareQueueClass) -> bool {
        device == DeviceIndex::DEFAULT
    }
}

/// A fixed set of devices that all expose the same queue classes.
#[derive(Debug, Clone)]
pub struct UniformDeviceProvider {
    device_count: usize,
    queue_classes: Vec<HardwareQueueClass>,
}

impl UniformDeviceProvider {
    /// Creates a provider with `device_count` devices exposing `queue_classes`.
    pub fn new(device_count: usize, queue_classes: impl Into<Vec<HardwareQueueClass>>) -> Self {
        Self {
            device_count,
            queue_classes: queue_classes.into(),
        }
    }
}

impl DeviceQueueProvider for UniformDeviceProvider {
    fn device_count(&self) -> usize {
        self.device_count
    }

    fn supports_queue_class(&self, device: DeviceIndex, class: HardwareQueueClass) -> bool {
        usize::from(device.0) < self.device_count && self.queue_classes.contains(&class)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_device_supports_everything_on_device_zero() {
        let provider = SingleDeviceProvider;
        assert_eq!(provider.device_count(), 1);
        assert!(provider.supports_queue_class(DeviceIndex::DEFAULT, HardwareQueueClass::Copy));
        assert!(!provider.supports_queue_class(DeviceIndex(1), HardwareQueueClass::Graphics));
    }

    #[test]
    fn uniform_provider_filters_classes() {
        let provider = UniformDeviceProvider::new(2, [HardwareQueueClass::Graphics]);
        assert!(provider.supports_queue_class(DeviceIndex(1), HardwareQueueClass::Graphics));
        assert!(!provider.supports_queue_class(DeviceIndex(1), HardwareQueueClass::Compute));
        assert!(!provider.supports_queue_class(DeviceIndex(2), HardwareQueueClass::Graphics));
    }
}
