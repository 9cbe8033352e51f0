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

//! Clocked pseudo-random signal source.

use crate::node::{ManagerContext, Node, NodeHandle};
use crate::{Signal, SimTime};
use log::trace;
use num::Zero;
use rand::distributions::Distribution;
use rand_core::{RngCore, SeedableRng};
use rand_xoshiro::Xoshiro256StarStar;
use std::fmt::Debug;

/// Seed of the default engine. Fixed so that runs are reproducible unless
/// the caller supplies its own engine.
pub const DEFAULT_SEED: u64 = 1;

pub type DefaultEngine = Xoshiro256StarStar;

pub fn default_engine() -> DefaultEngine {
    DefaultEngine::seed_from_u64(DEFAULT_SEED)
}

/// Drives `signal_rand` with a sample of `dist` once at initialization and
/// then once per rising edge of `signal_clk`.
///
/// The edge test compares the clock level latched in `pre_proc` with the
/// level visible in `post_proc` of the same step. The clock therefore has
/// to change between the two phases of one step for a sample to be drawn;
/// a clock that was already high when `pre_proc` ran does not trigger,
/// whatever it was on the previous step.
pub struct RandomNode<C, R, D, E> {
    name: String,
    signal_clk: Signal<C>,
    signal_rand: Signal<R>,
    dist: D,
    engine: E,
    /// Clock level latched by the last `pre_proc`.
    clk: bool,
}

impl<C, R, D, E> RandomNode<C, R, D, E>
where
    C: Copy + Zero + 'static,
    R: Copy + Debug + 'static,
    D: Distribution<R> + 'static,
    E: RngCore + 'static,
{
    fn new(signal_clk: &Signal<C>, signal_rand: &Signal<R>, dist: D, engine: E) -> Self {
        Self {
            name: format!("random({})", signal_rand.name()),
            signal_clk: signal_clk.clone(),
            signal_rand: signal_rand.clone(),
            dist,
            engine,
            clk: false,
        }
    }

    pub fn create(
        signal_clk: &Signal<C>,
        signal_rand: &Signal<R>,
        dist: D,
        engine: E,
    ) -> NodeHandle {
        NodeHandle::new(Self::new(signal_clk, signal_rand, dist, engine))
    }

    fn draw(&mut self, manager: &dyn ManagerContext) {
        let value = self.dist.sample(&mut self.engine);
        trace!("{} = {:?} at time {}", self.name, value, manager.time());
        self.signal_rand.set(value);
    }
}

/// Same as `RandomNode::create` with the default engine seeded with
/// `DEFAULT_SEED`.
pub fn create_random_node<C, R, D>(
    signal_clk: &Signal<C>,
    signal_rand: &Signal<R>,
    dist: D,
) -> NodeHandle
where
    C: Copy + Zero + 'static,
    R: Copy + Debug + 'static,
    D: Distribution<R> + 'static,
{
    RandomNode::create(signal_clk, signal_rand, dist, default_engine())
}

impl<C, R, D, E> Node for RandomNode<C, R, D, E>
where
    C: Copy + Zero + 'static,
    R: Copy + Debug + 'static,
    D: Distribution<R> + 'static,
    E: RngCore + 'static,
{
    fn name(&self) -> &str {
        &self.name
    }

    fn initialize(&mut self, manager: &dyn ManagerContext) -> SimTime {
        self.draw(manager);
        0
    }

    fn pre_proc(&mut self, _manager: &dyn ManagerContext) {
        self.clk = !self.signal_clk.get().is_zero();
    }

    fn post_proc(&mut self, manager: &dyn ManagerContext) {
        // only on a rising edge within this step
        if self.clk || self.signal_clk.get().is_zero() {
            return;
        }
        self.draw(manager);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::nodes::testing::At;
    use rand::distributions::{Bernoulli, Uniform};

    type Node09 = RandomNode<u8, i64, Uniform<i64>, DefaultEngine>;

    fn digits() -> Uniform<i64> {
        Uniform::new_inclusive(0, 9)
    }

    fn node09(clk: &Signal<u8>, out: &Signal<i64>) -> Node09 {
        RandomNode::new(clk, out, digits(), default_engine())
    }

    /// One step where the clock reads `pre` in `pre_proc` and `post` in
    /// `post_proc`.
    fn step<N: Node>(node: &mut N, clk: &Signal<u8>, pre: u8, post: u8) {
        clk.set(pre);
        node.pre_proc(&At(0));
        clk.set(post);
        node.post_proc(&At(0));
    }

    /// The first `n` values the default engine yields for `digits()`.
    fn reference_draws(n: usize) -> Vec<i64> {
        let mut engine = default_engine();
        let dist = digits();
        (0..n).map(|_| dist.sample(&mut engine)).collect()
    }

    #[test]
    fn initialize_draws_one_sample() {
        let _ = env_logger::try_init();
        let clk = Signal::new("clk", 0u8);
        let out = Signal::new("rand", -1i64);
        let mut node = node09(&clk, &out);
        assert_eq!(node.initialize(&At(0)), 0);
        assert_eq!(out.write_count(), 1);
        assert!((0..=9).contains(&out.get()));

        // The engine moved by exactly one draw: the next edge yields the
        // reference engine's second value.
        let expected = reference_draws(2);
        assert_eq!(out.get(), expected[0]);
        step(&mut node, &clk, 0, 1);
        assert_eq!(out.get(), expected[1]);
    }

    #[test]
    fn no_edge_no_write() {
        let clk = Signal::new("clk", 0u8);
        let out = Signal::new("rand", 0i64);
        let mut node = node09(&clk, &out);
        node.initialize(&At(0));
        let value = out.get();
        for (pre, post) in [(0, 0), (1, 1), (1, 0), (3, 7), (0, 0), (2, 0)] {
            step(&mut node, &clk, pre, post);
            assert_eq!(out.write_count(), 1, "clock {} -> {}", pre, post);
            assert_eq!(out.get(), value);
        }
    }

    #[test]
    fn each_edge_draws_exactly_once() {
        const EDGES: usize = 25;
        let clk = Signal::new("clk", 0u8);
        let out = Signal::new("rand", 0i64);
        let mut node = node09(&clk, &out);
        node.initialize(&At(0));
        let mut values = vec![out.get()];
        for _ in 0..EDGES {
            step(&mut node, &clk, 0, 1);
            values.push(out.get());
        }
        assert_eq!(out.write_count(), 1 + EDGES as u64);
        assert_eq!(values, reference_draws(1 + EDGES));
    }

    #[test]
    fn any_non_zero_level_is_high() {
        let clk = Signal::new("clk", 0u8);
        let out = Signal::new("rand", 0i64);
        let mut node = node09(&clk, &out);
        node.initialize(&At(0));
        step(&mut node, &clk, 0, 0x80);
        step(&mut node, &clk, 0x80, 0x01);
        assert_eq!(out.write_count(), 2);
    }

    #[test]
    fn edge_is_judged_within_the_step() {
        // pre_proc latches the level at the start of the step; a clock that
        // rose between two steps is not an edge.
        let clk = Signal::new("clk", 0u8);
        let out = Signal::new("rand", 0i64);
        let mut node = node09(&clk, &out);
        node.initialize(&At(0));
        step(&mut node, &clk, 0, 0);
        step(&mut node, &clk, 1, 1);
        assert_eq!(out.write_count(), 1);
    }

    #[test]
    fn scenario_0110() {
        // Clock reads per step (pre_proc, post_proc): the only 0 -> 1
        // transition within a step is the second one.
        let clk = Signal::new("clk", 0u8);
        let out = Signal::new("rand", 0i64);
        let mut node = node09(&clk, &out);
        node.initialize(&At(0));
        for (pre, post) in [(0, 0), (0, 1), (1, 1), (1, 0)] {
            step(&mut node, &clk, pre, post);
        }
        assert_eq!(out.write_count(), 2);
        assert_eq!(out.get(), reference_draws(2)[1]);
    }

    #[test]
    fn identical_nodes_agree() {
        let clk = Signal::new("clk", 0u8);
        let out_a = Signal::new("a", 0i64);
        let out_b = Signal::new("b", 0i64);
        let mut a = node09(&clk, &out_a);
        let mut b = node09(&clk, &out_b);
        a.initialize(&At(0));
        b.initialize(&At(0));

        // A pseudo-random but fixed clock pattern.
        let mut pattern = Xoshiro256StarStar::seed_from_u64(0x1234);
        let mut trace_a = vec![out_a.get()];
        let mut trace_b = vec![out_b.get()];
        for _ in 0..200 {
            let bits = pattern.next_u32();
            let (pre, post) = ((bits & 1) as u8, ((bits >> 1) & 1) as u8);
            clk.set(pre);
            a.pre_proc(&At(0));
            b.pre_proc(&At(0));
            clk.set(post);
            a.post_proc(&At(0));
            b.post_proc(&At(0));
            trace_a.push(out_a.get());
            trace_b.push(out_b.get());
        }
        assert_eq!(trace_a, trace_b);
        assert_eq!(out_a.write_count(), out_b.write_count());
        assert!(out_a.write_count() > 1);
    }

    #[test]
    fn seed_selects_the_sequence() {
        let clk = Signal::new("clk", 0u8);
        let out_default = Signal::new("default", 0i64);
        let out_seeded = Signal::new("seeded", 0i64);
        let mut default = node09(&clk, &out_default);
        let mut seeded = RandomNode::new(
            &clk,
            &out_seeded,
            digits(),
            DefaultEngine::seed_from_u64(DEFAULT_SEED + 1),
        );
        default.initialize(&At(0));
        seeded.initialize(&At(0));
        let mut trace_default = vec![out_default.get()];
        let mut trace_seeded = vec![out_seeded.get()];
        for _ in 0..32 {
            step(&mut default, &clk, 0, 1);
            step(&mut seeded, &clk, 0, 1);
            trace_default.push(out_default.get());
            trace_seeded.push(out_seeded.get());
        }
        assert_ne!(trace_default, trace_seeded);
    }

    #[test]
    fn degenerate_distribution_is_constant() {
        let clk = Signal::new("clk", 0u8);
        let out = Signal::new("rand", 0i64);
        let mut node = RandomNode::new(&clk, &out, Uniform::new_inclusive(5, 5), default_engine());
        node.initialize(&At(0));
        for _ in 0..50 {
            step(&mut node, &clk, 0, 1);
            assert_eq!(out.get(), 5);
        }
        assert_eq!(out.write_count(), 51);
    }

    #[test]
    fn drives_any_output_type() {
        let clk = Signal::new("clk", 0u32);
        let out = Signal::new("flag", false);
        let mut handle =
            create_random_node(&clk, &out, Bernoulli::new(1.0).unwrap());
        assert_eq!(handle.name(), "random(flag)");
        handle.node_mut().initialize(&At(0));
        assert!(out.get());
        assert_eq!(out.write_count(), 1);
    }
}
