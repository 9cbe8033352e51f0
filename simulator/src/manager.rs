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

//! The step-driven simulation manager.
//!
//! The manager owns every node and a queue of pending wake-ups. A step is
//! executed at the earliest pending wake-up time and consists of three
//! phases over the whole node collection, in registration order:
//!
//!   1. `pre_proc` on every node,
//!   2. `event_proc` on every node whose wake-up is due, in the order the
//!      wake-ups were requested,
//!   3. `post_proc` on every node.
//!
//! Signals driven from `event_proc` (clocks, resets) therefore change
//! between the two sampling phases, which is what makes an edge visible to
//! a node within a single step.

use crate::node::{ManagerContext, NodeHandle, NodeId};
use crate::{Error, SimTime};
use log::{debug, trace};
use std::cmp::Reverse;
use std::collections::BinaryHeap;

#[derive(Clone, Copy, Debug, Default)]
struct SimClock {
    time: SimTime,
    step: u64,
}

impl ManagerContext for SimClock {
    fn time(&self) -> SimTime {
        self.time
    }

    fn step(&self) -> u64 {
        self.step
    }
}

/// Ordered by time, then by request order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
struct Wake {
    time: SimTime,
    seq: u64,
    node: usize,
}

#[derive(Debug, Default)]
struct WakeQueue {
    heap: BinaryHeap<Reverse<Wake>>,
    next_seq: u64,
}

impl WakeQueue {
    fn schedule(&mut self, now: SimTime, offset: SimTime, node: usize) -> Result<(), Error> {
        if offset == 0 {
            return Ok(());
        }
        let time = now.checked_add(offset).ok_or(Error::TimeOverflow)?;
        self.heap.push(Reverse(Wake {
            time,
            seq: self.next_seq,
            node,
        }));
        self.next_seq += 1;
        Ok(())
    }

    fn next_time(&self) -> Option<SimTime> {
        self.heap.peek().map(|Reverse(wake)| wake.time)
    }

    fn pop_due(&mut self, time: SimTime) -> Option<Wake> {
        if self.next_time() == Some(time) {
            self.heap.pop().map(|Reverse(wake)| wake)
        } else {
            None
        }
    }
}

#[derive(Debug, Default)]
pub struct Manager {
    nodes: Vec<NodeHandle>,
    wakes: WakeQueue,
    clock: SimClock,
    initialized: bool,
    finalized: bool,
}

impl Manager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Takes ownership of a node. Registration order is the order of every
    /// phase within a step.
    pub fn add_node(&mut self, node: NodeHandle) -> Result<NodeId, Error> {
        if self.initialized {
            return Err(Error::AlreadyStarted);
        }
        debug!("registering node {} as #{}", node.name(), self.nodes.len());
        self.nodes.push(node);
        Ok(NodeId(self.nodes.len() - 1))
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn node_name(&self, id: NodeId) -> Option<&str> {
        self.nodes.get(id.0).map(|node| node.name())
    }

    pub fn time(&self) -> SimTime {
        self.clock.time
    }

    /// Number of executed steps.
    pub fn steps(&self) -> u64 {
        self.clock.step
    }

    pub fn pending_wakes(&self) -> usize {
        self.wakes.heap.len()
    }

    pub fn next_wake_time(&self) -> Option<SimTime> {
        self.wakes.next_time()
    }

    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    /// Calls `initialize` on every node at time 0. Does nothing when called
    /// again.
    pub fn initialize(&mut self) -> Result<(), Error> {
        if self.initialized {
            return Ok(());
        }
        self.initialized = true;
        debug!("initializing {} nodes", self.nodes.len());
        for (index, node) in self.nodes.iter_mut().enumerate() {
            let offset = node.node_mut().initialize(&self.clock);
            self.wakes.schedule(self.clock.time, offset, index)?;
        }
        Ok(())
    }

    /// Executes one step at the earliest pending wake-up and returns its
    /// time. Returns `None` without doing anything if nothing is pending.
    pub fn step(&mut self) -> Result<Option<SimTime>, Error> {
        self.initialize()?;
        let time = match self.wakes.next_time() {
            Some(time) => time,
            None => return Ok(None),
        };
        self.clock.time = time;
        trace!("step {} at time {}", self.clock.step, time);

        for node in self.nodes.iter_mut() {
            node.node_mut().pre_proc(&self.clock);
        }
        while let Some(wake) = self.wakes.pop_due(time) {
            let node = self.nodes[wake.node].node_mut();
            trace!("wake {} at time {}", node.name(), time);
            let offset = node.event_proc(&self.clock);
            self.wakes.schedule(time, offset, wake.node)?;
        }
        for node in self.nodes.iter_mut() {
            node.node_mut().post_proc(&self.clock);
        }

        self.clock.step += 1;
        Ok(Some(time))
    }

    /// Runs every step due at or before `until` and returns how many steps
    /// were executed. Afterwards the manager's time is at least `until`.
    pub fn run(&mut self, until: SimTime) -> Result<u64, Error> {
        self.initialize()?;
        let mut steps = 0;
        while let Some(next) = self.wakes.next_time() {
            if next > until {
                break;
            }
            self.step()?;
            steps += 1;
        }
        if self.wakes.next_time().is_none() {
            debug!("no pending wake-ups after {} steps", self.clock.step);
        }
        self.clock.time = self.clock.time.max(until);
        Ok(steps)
    }

    /// Calls `finalize` on every node. Does nothing when called again.
    pub fn finalize(&mut self) {
        if self.finalized {
            return;
        }
        self.finalized = true;
        debug!(
            "finalizing at time {} after {} steps",
            self.clock.time, self.clock.step
        );
        for node in self.nodes.iter_mut() {
            node.node_mut().finalize(&self.clock);
        }
    }
}
