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
use crate::{Error, Signal, SimTime};
use num::{One, Zero};

/// Square-wave clock source. Starts low at time 0; the high phase lasts
/// `period / 2` and the low phase takes the remainder.
pub struct ClockNode<T> {
    name: String,
    signal: Signal<T>,
    high_phase: SimTime,
    low_phase: SimTime,
}

impl<T> ClockNode<T>
where
    T: Copy + Zero + One + 'static,
{
    pub fn create(signal: &Signal<T>, period: SimTime) -> Result<NodeHandle, Error> {
        if period < 2 {
            return Err(Error::InvalidPeriod(period));
        }
        let high_phase = period / 2;
        Ok(NodeHandle::new(Self {
            name: format!("clock({})", signal.name()),
            signal: signal.clone(),
            high_phase,
            low_phase: period - high_phase,
        }))
    }
}

impl<T> Node for ClockNode<T>
where
    T: Copy + Zero + One + 'static,
{
    fn name(&self) -> &str {
        &self.name
    }

    fn initialize(&mut self, _manager: &dyn ManagerContext) -> SimTime {
        self.signal.set(T::zero());
        self.low_phase
    }

    fn event_proc(&mut self, _manager: &dyn ManagerContext) -> SimTime {
        if self.signal.get().is_zero() {
            self.signal.set(T::one());
            self.high_phase
        } else {
            self.signal.set(T::zero());
            self.low_phase
        }
    }
}
