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

use crate::SimTime;
use std::fmt;

#[derive(Debug, Eq, PartialEq)]
pub enum Error {
    /// A clock needs at least one time unit per phase.
    InvalidPeriod(SimTime),
    InvalidDistribution(String),
    UnknownSignal(String),
    DuplicateSignal(String),
    /// The name is taken by a variable the VCD dump declares itself.
    ReservedSignal(String),
    /// Nodes can only be registered before the manager is initialized.
    AlreadyStarted,
    TimeOverflow,
    Io(String),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Self::InvalidPeriod(period) => {
                write!(f, "ERROR: Invalid clock period {}, must be at least 2", period)
            }
            Self::InvalidDistribution(reason) => {
                write!(f, "ERROR: Invalid distribution: {}", reason)
            }
            Self::UnknownSignal(name) => write!(f, "ERROR: Unknown signal {}", name),
            Self::DuplicateSignal(name) => write!(f, "ERROR: Signal {} declared twice", name),
            Self::ReservedSignal(name) => {
                write!(f, "ERROR: Signal name {} is reserved for VCD dumps", name)
            }
            Self::AlreadyStarted => {
                write!(f, "ERROR: Nodes cannot be added after initialization")
            }
            Self::TimeOverflow => write!(f, "ERROR: Simulation time overflowed"),
            Self::Io(msg) => write!(f, "ERROR: I/O failure: {}", msg),
        }
    }
}

impl std::error::Error for Error {}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err.to_string())
    }
}
