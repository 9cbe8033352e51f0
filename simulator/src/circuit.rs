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

//! Builds a runnable circuit from a `Config`.

use crate::config::Config;
use crate::nodes::vcd_dump::{trace, TracedSignal, STEPS_VAR};
use crate::nodes::{ClockNode, DefaultEngine, RandomNode, ResetNode, VcdDumpNode};
use crate::vcd::VcdWriter;
use crate::{Error, Manager, Signal, SimTime};
use itertools::Itertools;
use rand_core::SeedableRng;

fn find_signal(signals: &[Signal<i64>], name: &str) -> Result<Signal<i64>, Error> {
    signals
        .iter()
        .find(|s| s.name() == name)
        .cloned()
        .ok_or_else(|| Error::UnknownSignal(name.to_string()))
}

/// Signals and nodes of a configured circuit. All configured signals carry
/// `i64` values.
pub struct Circuit {
    manager: Manager,
    signals: Vec<Signal<i64>>,
    time_limit: SimTime,
}

impl Circuit {
    /// Nodes are registered in the order clocks, resets, random sources,
    /// VCD dump; each group in declaration order.
    pub fn from_config(config: &Config) -> Result<Self, Error> {
        let mut signals: Vec<Signal<i64>> = Vec::with_capacity(config.signals.len());
        for signal_config in &config.signals {
            if signals.iter().any(|s| s.name() == signal_config.name) {
                return Err(Error::DuplicateSignal(signal_config.name.clone()));
            }
            signals.push(Signal::new(&signal_config.name, signal_config.init));
        }

        let mut manager = Manager::new();
        for clock in &config.clocks {
            let signal = find_signal(&signals, &clock.signal)?;
            manager.add_node(ClockNode::create(&signal, clock.period)?)?;
        }
        for reset in &config.resets {
            manager.add_node(ResetNode::create(
                &find_signal(&signals, &reset.signal)?,
                reset.duration,
                reset.active_low,
            ))?;
        }
        for random in &config.random {
            manager.add_node(RandomNode::create(
                &find_signal(&signals, &random.clock)?,
                &find_signal(&signals, &random.output)?,
                random.distribution.build()?,
                DefaultEngine::seed_from_u64(random.seed),
            ))?;
        }
        if let Some(dump) = &config.vcd {
            let traced: Vec<Box<dyn TracedSignal>> = if dump.signals.is_empty() {
                signals.iter().map(trace).collect()
            } else {
                dump.signals
                    .iter()
                    .map(|name| find_signal(&signals, name).map(|s| trace(&s)))
                    .collect::<Result<Vec<_>, Error>>()?
            };
            if traced.iter().any(|s| s.name() == STEPS_VAR) {
                return Err(Error::ReservedSignal(STEPS_VAR.to_string()));
            }
            let writer = VcdWriter::create(&dump.path)?;
            manager.add_node(VcdDumpNode::create(writer, traced))?;
        }

        log::debug!(
            "circuit with {} nodes: {}",
            manager.node_count(),
            signals.iter().format(", ")
        );
        Ok(Self {
            manager,
            signals,
            time_limit: config.time_limit,
        })
    }

    pub fn signal(&self, name: &str) -> Option<&Signal<i64>> {
        self.signals.iter().find(|s| s.name() == name)
    }

    pub fn signals(&self) -> &[Signal<i64>] {
        &self.signals
    }

    pub fn time_limit(&self) -> SimTime {
        self.time_limit
    }

    pub fn manager(&self) -> &Manager {
        &self.manager
    }

    pub fn manager_mut(&mut self) -> &mut Manager {
        &mut self.manager
    }

    /// Runs to the time limit and finalizes. Returns the number of steps.
    pub fn run(&mut self) -> Result<u64, Error> {
        let steps = self.manager.run(self.time_limit)?;
        self.manager.finalize();
        Ok(steps)
    }
}
