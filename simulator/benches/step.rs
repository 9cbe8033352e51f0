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

use bencher::Bencher;
use bencher::{benchmark_group, benchmark_main};
use rand::distributions::Uniform;

use simulator::nodes::{create_random_node, ClockNode};
use simulator::*;

const SOURCES: usize = 64;
const RUN_TIME: SimTime = 10_000;

fn build(sources: usize) -> (Manager, Vec<Signal<i64>>) {
    let clk = Signal::new("clk", 0u8);
    let mut manager = Manager::new();
    manager.add_node(ClockNode::create(&clk, 2).unwrap()).unwrap();
    let outputs: Vec<Signal<i64>> = (0..sources)
        .map(|i| Signal::new(&format!("rand{}", i), 0))
        .collect();
    for out in &outputs {
        manager
            .add_node(create_random_node(&clk, out, Uniform::new_inclusive(0, 255)))
            .unwrap();
    }
    (manager, outputs)
}

fn random_sources(bench: &mut Bencher) {
    bench.iter(|| {
        let (mut manager, outputs) = build(SOURCES);
        manager.run(RUN_TIME).unwrap();
        outputs.iter().map(|s| s.get()).sum::<i64>()
    });
}

fn idle_steps(bench: &mut Bencher) {
    bench.iter(|| {
        let (mut manager, _) = build(0);
        manager.run(RUN_TIME).unwrap()
    });
}

benchmark_group!(benches, random_sources, idle_steps);
benchmark_main!(benches);
