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
use crate::vcd::{TraceValue, VcdWriter, DEFAULT_TOP_MODULE};
use crate::{Signal, SimTime};
use std::io;

/// Step counter declared next to the traced signals. No traced signal may
/// use this name.
pub const STEPS_VAR: &str = "sim_steps";

/// A signal whose value can be sampled for a VCD dump.
pub trait TracedSignal {
    fn name(&self) -> &str;
    fn width(&self) -> usize;
    fn sample(&self) -> Vec<vcd::Value>;
}

impl<T: TraceValue> TracedSignal for Signal<T> {
    fn name(&self) -> &str {
        Signal::name(self)
    }

    fn width(&self) -> usize {
        T::WIDTH
    }

    fn sample(&self) -> Vec<vcd::Value> {
        self.get().to_vcd()
    }
}

pub fn trace<T: TraceValue + 'static>(signal: &Signal<T>) -> Box<dyn TracedSignal> {
    Box::new(signal.clone())
}

/// Dumps the traced signals to a VCD after every step.
///
/// Register it after the nodes driving the traced signals so that the dump
/// sees their `post_proc` writes.
pub struct VcdDumpNode<W: io::Write> {
    writer: VcdWriter<W>,
    signals: Vec<Box<dyn TracedSignal>>,
    dumped_initial: bool,
}

impl<W: io::Write + 'static> VcdDumpNode<W> {
    pub fn create(writer: VcdWriter<W>, signals: Vec<Box<dyn TracedSignal>>) -> NodeHandle {
        NodeHandle::new(Self {
            writer,
            signals,
            dumped_initial: false,
        })
    }

    fn dump(&mut self, time: SimTime, steps: u64) {
        self.writer.enter_scope(DEFAULT_TOP_MODULE);
        self.writer.change_vector(STEPS_VAR, steps.to_vcd());
        for signal in &self.signals {
            self.writer.change_vector(signal.name(), signal.sample());
        }
        self.writer.commit(time);
        self.writer.leave_scope(DEFAULT_TOP_MODULE);
    }

    fn dump_initial(&mut self) {
        if !self.dumped_initial {
            self.dumped_initial = true;
            self.dump(0, 0);
        }
    }
}

impl<W: io::Write + 'static> Node for VcdDumpNode<W> {
    fn name(&self) -> &str {
        "vcd_dump"
    }

    fn initialize(&mut self, _manager: &dyn ManagerContext) -> SimTime {
        self.writer.write_header();
        self.writer.add_module(DEFAULT_TOP_MODULE);
        self.writer.add_var(STEPS_VAR, u64::WIDTH);
        for signal in &self.signals {
            self.writer.add_var(signal.name(), signal.width());
        }
        self.writer.upscope(DEFAULT_TOP_MODULE);
        self.writer.end_definitions();
        0
    }

    fn pre_proc(&mut self, _manager: &dyn ManagerContext) {
        // Every node has been initialized by now.
        self.dump_initial();
    }

    fn post_proc(&mut self, manager: &dyn ManagerContext) {
        self.dump(manager.time(), manager.step() + 1);
    }

    fn finalize(&mut self, manager: &dyn ManagerContext) {
        self.dump_initial();
        self.writer.flush();
        log::debug!("VCD dump finished at time {}", manager.time());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::nodes::{ClockNode, ResetNode};
    use crate::vcd::tests::{FailOnFlush, SharedBuffer};
    use crate::Manager;

    fn dump_lines(buffer: &SharedBuffer) -> Vec<String> {
        buffer.contents().lines().map(str::to_string).collect()
    }

    #[test]
    fn dumps_every_step() {
        let clk = Signal::new("clk", 0u8);
        let rst = Signal::new("rst", 0u8);
        let buffer = SharedBuffer::default();
        let mut manager = Manager::new();
        manager.add_node(ClockNode::create(&clk, 4).unwrap()).unwrap();
        // untraced, only adds a step at time 3
        manager.add_node(ResetNode::create(&rst, 3, false)).unwrap();
        manager
            .add_node(VcdDumpNode::create(
                VcdWriter::new(buffer.clone()),
                vec![trace(&clk)],
            ))
            .unwrap();
        manager.run(8).unwrap();
        manager.finalize();

        let lines = dump_lines(&buffer);
        assert!(lines.iter().any(|l| l.contains("$var") && l.contains(" clk ")));
        assert!(lines.iter().any(|l| l.contains(STEPS_VAR)));
        assert!(lines.iter().any(|l| l.starts_with("$enddefinitions")));
        for time in ["#0", "#2", "#3", "#4", "#6", "#8"] {
            assert!(lines.contains(&time.to_string()), "missing {}", time);
        }
    }

    #[test]
    fn quiescent_run_still_dumps_initial_values() {
        let flag = Signal::new("flag", true);
        let buffer = SharedBuffer::default();
        let mut manager = Manager::new();
        manager
            .add_node(VcdDumpNode::create(
                VcdWriter::new(buffer.clone()),
                vec![trace(&flag)],
            ))
            .unwrap();
        assert_eq!(manager.run(10).unwrap(), 0);
        manager.finalize();
        let lines = dump_lines(&buffer);
        assert_eq!(lines.iter().filter(|l| l.starts_with('#')).count(), 1);
        assert!(lines.contains(&"#0".to_string()));
    }

    #[test]
    fn finalize_flushes_buffered_output() {
        let _ = env_logger::try_init();
        let clk = Signal::new("clk", 0u8);
        let sink = FailOnFlush::default();
        let mut manager = Manager::new();
        manager.add_node(ClockNode::create(&clk, 2).unwrap()).unwrap();
        manager
            .add_node(VcdDumpNode::create(
                VcdWriter::new(io::BufWriter::new(sink.clone())),
                vec![trace(&clk)],
            ))
            .unwrap();
        manager.run(10).unwrap();
        assert_eq!(sink.flushes(), 0);
        manager.finalize();
        assert_eq!(sink.flushes(), 1);
    }
}
