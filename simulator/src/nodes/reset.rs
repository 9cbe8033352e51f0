// Copyright 2023 Google LLC
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//      http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use crate::node::{ManagerContext, Node, NodeHandle};
use crate::{Signal, SimTime};
use num::{One, Zero};

/// Holds a reset signal asserted from time 0 for `duration`, then releases
/// it for the rest of the run.
pub struct ResetNode<T> {
    name: String,
    signal: Signal<T>,
    duration: SimTime,
    active_low: bool,
}

impl<T> ResetNode<T>
where
    T: Copy + Zero + One + 'static,
{
    pub fn create(signal: &Signal<T>, duration: SimTime, active_low: bool) -> NodeHandle {
        NodeHandle::new(Self {
            name: format!("reset({})", signal.name()),
            signal: signal.clone(),
            duration,
            active_low,
        })
    }

    fn drive(&self, asserted: bool) {
        let level = if asserted != self.active_low {
            T::one()
        } else {
            T::zero()
        };
        self.signal.set(level);
    }
}

impl<T> Node for ResetNode<T>
where
    T: Copy + Zero + One + 'static,
{
    fn name(&self) -> &str {
        &self.name
    }

    fn initialize(&mut self, _manager: &dyn ManagerContext) -> SimTime {
        self.drive(self.duration > 0);
        self.duration
    }

    fn event_proc(&mut self, manager: &dyn ManagerContext) -> SimTime {
        log::debug!("{} released at time {}", self.name, manager.time());
        self.drive(false);
        0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Manager;

    #[test]
    fn releases_after_duration() {
        let rst = Signal::new("rst", 0u8);
        let mut manager = Manager::new();
        manager.add_node(ResetNode::create(&rst, 10, false)).unwrap();
        manager.initialize().unwrap();
        assert_eq!(rst.get(), 1);
        assert_eq!(manager.step().unwrap(), Some(10));
        assert_eq!(rst.get(), 0);
        assert_eq!(manager.step().unwrap(), None);
    }

    #[test]
    fn active_low() {
        let rst_n = Signal::new("rst_n", 1u8);
        let mut manager = Manager::new();
        manager.add_node(ResetNode::create(&rst_n, 3, true)).unwrap();
        manager.initialize().unwrap();
        assert_eq!(rst_n.get(), 0);
        manager.run(3).unwrap();
        assert_eq!(rst_n.get(), 1);
    }

    #[test]
    fn zero_duration_never_asserts() {
        let rst = Signal::new("rst", 1u8);
        let mut manager = Manager::new();
        manager.add_node(ResetNode::create(&rst, 0, false)).unwrap();
        manager.initialize().unwrap();
        assert_eq!(rst.get(), 0);
        assert_eq!(manager.pending_wakes(), 0);
    }
}
