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

//! Interface between simulation nodes and the manager that steps them.

use crate::SimTime;
use std::fmt;

/// The view of the manager a node gets during a callback.
pub trait ManagerContext {
    /// Current simulated time.
    fn time(&self) -> SimTime;
    /// Number of steps completed before the current one.
    fn step(&self) -> u64;
}

/// A simulation node.
///
/// Every step the manager calls `pre_proc` on all nodes, then `event_proc`
/// on the nodes whose wake-up is due, then `post_proc` on all nodes. All
/// `pre_proc` calls of a step complete before any `post_proc` call of that
/// step begins.
pub trait Node {
    /// nodes have names
    fn name(&self) -> &str;

    /// Called once before the first step. Returns the offset of the first
    /// wake-up, 0 if the node does not need one.
    fn initialize(&mut self, manager: &dyn ManagerContext) -> SimTime;

    fn pre_proc(&mut self, _manager: &dyn ManagerContext) {}

    /// Called when a wake-up requested by `initialize` or a previous
    /// `event_proc` is due. Returns the offset of the next wake-up, 0 for none.
    fn event_proc(&mut self, _manager: &dyn ManagerContext) -> SimTime {
        0
    }

    fn post_proc(&mut self, _manager: &dyn ManagerContext) {}

    /// Called once when the run is over.
    fn finalize(&mut self, _manager: &dyn ManagerContext) {}
}

/// Opaque owning handle to a node, produced by the node factories and
/// consumed by `Manager::add_node`.
pub struct NodeHandle {
    node: Box<dyn Node>,
}

impl NodeHandle {
    pub fn new<N: Node + 'static>(node: N) -> Self {
        Self {
            node: Box::new(node),
        }
    }

    pub fn name(&self) -> &str {
        self.node.name()
    }

    pub(crate) fn node_mut(&mut self) -> &mut dyn Node {
        self.node.as_mut()
    }
}

impl fmt::Debug for NodeHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "NodeHandle({})", self.node.name())
    }
}

/// Position of a node in the manager's node collection, i.e. its order in
/// every phase of a step.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NodeId(pub(crate) usize);

impl NodeId {
    pub fn index(&self) -> usize {
        self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}
