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

//! Library of simulation nodes.
//!
//! Nodes are created through their factory functions, which hand back an
//! opaque `NodeHandle` for registration with the `Manager`.

pub mod clock;
pub mod random;
pub mod reset;
pub mod vcd_dump;

pub use clock::ClockNode;
pub use random::{create_random_node, default_engine, DefaultEngine, RandomNode, DEFAULT_SEED};
pub use reset::ResetNode;
pub use vcd_dump::{trace, TracedSignal, VcdDumpNode};
