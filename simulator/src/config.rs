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

//! Circuit descriptions, constructed programmatically or read from YAML.

use crate::nodes::DEFAULT_SEED;
use crate::{Error, SimTime};
use anyhow::Context;
use rand::distributions::{Bernoulli, Distribution, Uniform};
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct SignalConfiguration {
    pub name: String,
    #[serde(default)]
    pub init: i64,
}

#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct ClockConfiguration {
    pub signal: String,
    pub period: SimTime,
}

#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct ResetConfiguration {
    pub signal: String,
    pub duration: SimTime,
    #[serde(default)]
    pub active_low: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Deserialize, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DistributionConfiguration {
    /// Integers in `[low, high]`.
    Uniform { low: i64, high: i64 },
    /// 1 with probability `p`, else 0.
    Bernoulli { p: f64 },
    Constant { value: i64 },
}

impl DistributionConfiguration {
    pub fn build(&self) -> Result<SignalDistribution, Error> {
        match *self {
            Self::Uniform { low, high } => {
                if low > high {
                    return Err(Error::InvalidDistribution(format!(
                        "uniform range [{}, {}] is empty",
                        low, high
                    )));
                }
                Ok(SignalDistribution::Uniform(Uniform::new_inclusive(low, high)))
            }
            Self::Bernoulli { p } => Bernoulli::new(p)
                .map(SignalDistribution::Bernoulli)
                .map_err(|_| {
                    Error::InvalidDistribution(format!("bernoulli p = {} is not in [0, 1]", p))
                }),
            Self::Constant { value } => Ok(SignalDistribution::Constant(value)),
        }
    }
}

/// The distributions a configured circuit can sample, over `i64`.
#[derive(Clone, Copy, Debug)]
pub enum SignalDistribution {
    Uniform(Uniform<i64>),
    Bernoulli(Bernoulli),
    Constant(i64),
}

impl Distribution<i64> for SignalDistribution {
    fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> i64 {
        match self {
            Self::Uniform(dist) => dist.sample(rng),
            Self::Bernoulli(dist) => i64::from(dist.sample(rng)),
            Self::Constant(value) => *value,
        }
    }
}

fn default_seed() -> u64 {
    DEFAULT_SEED
}

#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct RandomConfiguration {
    pub clock: String,
    pub output: String,
    pub distribution: DistributionConfiguration,
    #[serde(default = "default_seed")]
    pub seed: u64,
}

#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct VcdConfiguration {
    pub path: PathBuf,
    /// Signals to trace; all of them if empty.
    #[serde(default)]
    pub signals: Vec<String>,
}

#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct Config {
    pub time_limit: SimTime,
    #[serde(default)]
    pub signals: Vec<SignalConfiguration>,
    #[serde(default)]
    pub clocks: Vec<ClockConfiguration>,
    #[serde(default)]
    pub resets: Vec<ResetConfiguration>,
    #[serde(default)]
    pub random: Vec<RandomConfiguration>,
    #[serde(default)]
    pub vcd: Option<VcdConfiguration>,
}

impl Config {
    pub fn from_file<P: AsRef<Path>>(file_name: P) -> anyhow::Result<Self> {
        let file_name = file_name.as_ref();
        let file = File::open(file_name)
            .with_context(|| format!("File {} not found", file_name.display()))?;
        let reader = BufReader::new(file);
        serde_yaml::from_reader(reader)
            .with_context(|| format!("Failed to parse {}", file_name.display()))
    }

    pub fn from_str(config: &str) -> anyhow::Result<Self> {
        Ok(serde_yaml::from_str(config)?)
    }
}
