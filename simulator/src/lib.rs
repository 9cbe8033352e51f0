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

//! A step-driven digital-logic simulator built around clocked
//! pseudo-random signal sources.
//!
//! ```text
//! Circuit (from Config)
//!   ├── Signal<T>      shared scalar cells
//!   └── Manager        owns nodes, steps them: pre_proc, event_proc, post_proc
//!         ├── ClockNode / ResetNode   drive signals from wake-ups
//!         ├── RandomNode              samples on rising clock edges
//!         └── VcdDumpNode             traces signals to a VCD
//! ```

mod circuit;
mod config;
mod error;
mod manager;
mod node;
pub mod nodes;
mod signal;
mod vcd;

// Public types
// type to use for simulated time
pub type SimTime = u64;

pub use crate::circuit::Circuit;
pub use crate::config::{
    ClockConfiguration, Config, DistributionConfiguration, RandomConfiguration,
    ResetConfiguration, SignalConfiguration, SignalDistribution, VcdConfiguration,
};
pub use crate::error::Error;
pub use crate::manager::Manager;
pub use crate::node::{ManagerContext, Node, NodeHandle, NodeId};
pub use crate::signal::Signal;
pub use crate::vcd::{TraceValue, VcdWriter, DEFAULT_TOP_MODULE};
