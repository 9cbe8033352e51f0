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

//! Runs a circuit of clocked random signal sources described in YAML.

use env_logger::Target;
use simulator::{Circuit, Config, VcdConfiguration};
use std::path::PathBuf;
use structopt::StructOpt;

#[derive(StructOpt)]
#[structopt(
    name = "random_signal",
    about = "Simulates clocked pseudo-random signal sources"
)]
struct Arguments {
    /// YAML circuit description
    #[structopt(parse(from_os_str))]
    config: PathBuf,
    /// overrides the configured time limit
    #[structopt(short, long)]
    time_limit: Option<u64>,
    /// dumps all signals to this VCD file, replacing any configured dump
    #[structopt(short, long, parse(from_os_str))]
    vcd: Option<PathBuf>,
}

fn simulate(args: Arguments) -> anyhow::Result<Circuit> {
    let mut config = Config::from_file(&args.config)?;
    if let Some(time_limit) = args.time_limit {
        config.time_limit = time_limit;
    }
    if let Some(path) = args.vcd {
        config.vcd = Some(VcdConfiguration {
            path,
            signals: vec![],
        });
    }

    let mut circuit = Circuit::from_config(&config)?;
    let steps = circuit.run()?;
    log::info!(
        "simulated {} steps up to time {}",
        steps,
        circuit.manager().time()
    );
    Ok(circuit)
}

fn main() -> anyhow::Result<()> {
    let args = Arguments::from_args();

    let _logger = env_logger::builder()
        .filter(Some("random_signal"), log::LevelFilter::Info)
        .parse_default_env()
        .target(Target::Stderr)
        .init();

    let circuit = simulate(args)?;
    for signal in circuit.signals() {
        log::info!("{} (written {} times)", signal, signal.write_count());
    }
    Ok(())
}
