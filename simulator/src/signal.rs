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

//! Shared scalar signals.
//!
//! A signal is a single memory cell owned by the circuit. Nodes hold clones
//! of the handle for the lifetime of the simulation and read or drive the
//! value directly; there is no synchronization because the simulator is
//! single-threaded (`Signal` is `!Send`).

use std::cell::Cell;
use std::fmt;
use std::rc::Rc;

struct SignalCell<T> {
    name: String,
    value: Cell<T>,
    /// Number of writes since creation, rewrites of the same value included.
    writes: Cell<u64>,
}

pub struct Signal<T> {
    cell: Rc<SignalCell<T>>,
}

impl<T: Copy> Signal<T> {
    pub fn new(name: &str, init: T) -> Self {
        Self {
            cell: Rc::new(SignalCell {
                name: name.to_string(),
                value: Cell::new(init),
                writes: Cell::new(0),
            }),
        }
    }

    pub fn name(&self) -> &str {
        &self.cell.name
    }

    pub fn get(&self) -> T {
        self.cell.value.get()
    }

    pub fn set(&self, value: T) {
        self.cell.value.set(value);
        self.cell.writes.set(self.cell.writes.get() + 1);
    }

    /// The initial value does not count as a write.
    pub fn write_count(&self) -> u64 {
        self.cell.writes.get()
    }

    /// True if both handles refer to the same cell.
    pub fn same_cell(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.cell, &other.cell)
    }
}

impl<T> Clone for Signal<T> {
    fn clone(&self) -> Self {
        Self {
            cell: Rc::clone(&self.cell),
        }
    }
}

impl<T: Copy + fmt::Debug> fmt::Debug for Signal<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Signal")
            .field("name", &self.cell.name)
            .field("value", &self.get())
            .field("writes", &self.write_count())
            .finish()
    }
}

impl<T: Copy + fmt::Display> fmt::Display for Signal<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}={}", self.cell.name, self.get())
    }
}
