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

use bitvec::prelude::*;
use std::cell::RefCell;
use std::collections::HashMap;
use std::fmt::Display;
use std::fs;
use std::io;
use std::path::Path;
use std::rc::Rc;

pub const DEFAULT_TOP_MODULE: &str = "circuit";
const DEFAULT_VCD_HEADER: &str = "random signal simulator VCD";

/// A value that can be dumped as a fixed-width VCD vector, most significant
/// bit first.
pub trait TraceValue: Copy {
    const WIDTH: usize;

    fn to_vcd(&self) -> Vec<vcd::Value>;
}

impl TraceValue for bool {
    const WIDTH: usize = 1;

    fn to_vcd(&self) -> Vec<vcd::Value> {
        vec![(*self).into()]
    }
}

macro_rules! impl_trace_value {
    ($($t:ty => $store:ty),*) => {
        $(
            impl TraceValue for $t {
                const WIDTH: usize = <$store>::BITS as usize;

                fn to_vcd(&self) -> Vec<vcd::Value> {
                    let raw = *self as $store;
                    raw.view_bits::<Lsb0>()
                        .iter()
                        .rev()
                        .map(|b| (*b).into())
                        .collect()
                }
            }
        )*
    };
}

impl_trace_value!(
    u8 => u8, u16 => u16, u32 => u32, u64 => u64,
    i8 => u8, i16 => u16, i32 => u32, i64 => u64
);

/// The sink as seen by `vcd::Writer`, which offers no way to flush it.
struct SinkHandle<W>(Rc<RefCell<W>>);

impl<W: io::Write> io::Write for SinkHandle<W> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.borrow_mut().write(buf)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.0.borrow_mut().flush()
    }
}

/// Writes value changes to a VCD stream.
///
/// Changes are collected with `change_vector` and written by `commit`, which
/// emits a timestamp only if at least one value differs from the last one
/// written. The first I/O error is logged and puts the writer in an error
/// state in which all further output is dropped. Buffered sinks only report
/// their errors on `flush`.
pub struct VcdWriter<W: io::Write> {
    writer: vcd::Writer<SinkHandle<W>>,
    sink: Rc<RefCell<W>>,
    is_error_state: bool,
    scope_stack: Vec<String>,
    id_map: HashMap<String, vcd::IdCode>,
    last_value_map: HashMap<vcd::IdCode, Vec<vcd::Value>>,
    deferred_changes: Vec<(vcd::IdCode, Vec<vcd::Value>)>,
}

impl VcdWriter<io::BufWriter<fs::File>> {
    pub fn create<P: AsRef<Path>>(dst: P) -> io::Result<Self> {
        let dst_file = fs::File::create(dst.as_ref())?;
        log::debug!("VCD file: {}", dst.as_ref().display());
        Ok(Self::new(io::BufWriter::new(dst_file)))
    }
}

impl<W: io::Write> VcdWriter<W> {
    pub fn new(dst: W) -> Self {
        let sink = Rc::new(RefCell::new(dst));
        Self {
            writer: vcd::Writer::new(SinkHandle(sink.clone())),
            sink,
            is_error_state: false,
            scope_stack: vec![],
            id_map: HashMap::new(),
            last_value_map: HashMap::new(),
            deferred_changes: vec![],
        }
    }

    pub fn is_error_state(&self) -> bool {
        self.is_error_state
    }

    fn vcd_error_handler(&mut self, err: io::Error) {
        if !self.is_error_state {
            self.is_error_state = true;
            log::error!("VCD writing failed with error {:?}", err)
        }
    }

    pub fn write_header(&mut self) {
        if self.is_error_state {
            return;
        }
        self._write_header()
            .unwrap_or_else(|err| self.vcd_error_handler(err));
    }

    fn _write_header(&mut self) -> io::Result<()> {
        self.writer.comment(DEFAULT_VCD_HEADER)?;
        self.writer.date(chrono::Utc::now().to_string().as_str())
    }

    pub fn add_module<T: Display + ?Sized>(&mut self, name: &T) {
        if self.is_error_state {
            return;
        }
        self._add_module(name)
            .unwrap_or_else(|err| self.vcd_error_handler(err));
    }

    fn _add_module<T: Display + ?Sized>(&mut self, name: &T) -> io::Result<()> {
        self.writer.add_module(&name.to_string())?;
        self.scope_stack.push(name.to_string());
        Ok(())
    }

    pub fn upscope<T: Display + ?Sized>(&mut self, scope: &T) {
        if self.is_error_state {
            return;
        }
        self._upscope(scope)
            .unwrap_or_else(|err| self.vcd_error_handler(err));
    }

    fn _upscope<T: Display + ?Sized>(&mut self, scope: &T) -> io::Result<()> {
        self.leave_scope(scope);
        self.writer.upscope()
    }

    /// Tracing after the definitions happens in the same scopes, without
    /// writing them again.
    pub fn enter_scope<T: Display + ?Sized>(&mut self, name: &T) {
        self.scope_stack.push(name.to_string())
    }

    pub fn leave_scope<T: Display + ?Sized>(&mut self, scope: &T) {
        let popped_scope = self.scope_stack.pop();
        debug_assert_eq!(popped_scope, Some(scope.to_string()));
    }

    pub fn add_var(&mut self, reference: &str, width: usize) {
        if self.is_error_state {
            return;
        }
        self._add_var(reference, width)
            .unwrap_or_else(|err| self.vcd_error_handler(err));
    }

    fn _add_var(&mut self, reference: &str, width: usize) -> io::Result<()> {
        let var_type = if width == 1 {
            vcd::VarType::Wire
        } else {
            vcd::VarType::Integer
        };
        let var_id = self.writer.add_var(var_type, width as u32, reference, None)?;
        self.add_id_map(reference, var_id);
        Ok(())
    }

    pub fn end_definitions(&mut self) {
        if self.is_error_state {
            return;
        }
        self.writer
            .enddefinitions()
            .unwrap_or_else(|err| self.vcd_error_handler(err));
    }

    pub fn flush(&mut self) {
        if self.is_error_state {
            return;
        }
        let result = self.sink.borrow_mut().flush();
        result.unwrap_or_else(|err| self.vcd_error_handler(err));
    }

    /// Queues a change for the next `commit`.
    pub fn change_vector(&mut self, name: &str, value: Vec<vcd::Value>) {
        if let Some(id_code) = self.lookup_id_code(name) {
            if cfg!(feature = "trace-echo-vcd-signal-changes") {
                log::trace!("VCD changing {}", self.scoped_name(name));
            }
            self.deferred_changes.push((id_code, value));
        }
    }

    /// Writes the queued changes at `timestamp`. Returns the number of values
    /// that actually changed.
    pub fn commit(&mut self, timestamp: u64) -> usize {
        let last_value_map = &self.last_value_map;
        let changes: Vec<_> = self
            .deferred_changes
            .drain(..)
            .filter(|(id_code, value)| last_value_map.get(id_code) != Some(value))
            .collect();
        if self.is_error_state || changes.is_empty() {
            return 0;
        }
        let count = changes.len();
        self._commit(timestamp, changes)
            .unwrap_or_else(|err| self.vcd_error_handler(err));
        count
    }

    fn _commit(
        &mut self,
        timestamp: u64,
        changes: Vec<(vcd::IdCode, Vec<vcd::Value>)>,
    ) -> io::Result<()> {
        self.writer.timestamp(timestamp)?;
        for (id_code, value) in changes {
            self.writer.change_vector(id_code, value.as_slice())?;
            self.last_value_map.insert(id_code, value);
        }
        Ok(())
    }

    fn lookup_id_code(&self, name: &str) -> Option<vcd::IdCode> {
        let scoped_name = self.scoped_name(name);
        if let Some(id_code) = self.id_map.get(scoped_name.as_str()) {
            Some(*id_code)
        } else {
            log::warn!(
                "No such scoped name {} was defined for VCD dumps.",
                scoped_name
            );
            None
        }
    }

    fn scoped_name(&self, name: &str) -> String {
        self.scope_stack.join(".") + "." + name
    }

    fn add_id_map(&mut self, name: &str, vcd_id: vcd::IdCode) {
        let scoped_name = self.scoped_name(name);
        if self.id_map.contains_key(scoped_name.as_str()) {
            log::warn!(
                "Scoped name {} was redefined for VCD dumps.",
                scoped_name
            );
        }
        self.id_map.insert(scoped_name, vcd_id);
    }
}
