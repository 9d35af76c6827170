//! # Example: Isotropic Box
//!
//! Flavour evolution of neutrinos and antineutrinos in a homogeneous,
//! isotropic box of matter with vacuum, MSW and self-interaction effects and
//! optional emission and absorption.
//!
//! Run with the built-in configuration, or pass a JSON file:
//!
//! ```text
//! cargo run --example isotropic_box -- run.json > f.dat
//! ```
//!
//! ```json
//! {
//!   "problem": {
//!     "grid": { "energies": [10.0, 20.0], "widths": [5.0, 5.0] },
//!     "vacuum": { "dm21": 7.4e-5, "theta12": 33.8 },
//!     "fluid": { "density": 1.0e6, "temperature": 8.0, "electron_fraction": 0.3 }
//!   },
//!   "settings": { "rmax": 1.0e8, "accuracy": 1.0e-8, "interact": true },
//!   "occupations": [[0.5, 0.05], [0.3, 0.05]],
//!   "mixing": 0.0
//! }
//! ```
//!
//! Grid energies and widths are in MeV. Each output line holds `r` followed
//! by the real and imaginary parts of `f_ee, f_eμ, f_μe, f_μμ` for every
//! (species, bin). Progress goes to stderr through `tracing`; set
//! `RUST_LOG=debug` to see resets.

use std::{
    fs,
    io::{self, BufWriter, Stdout, Write},
};

use serde::Deserialize;
use sqa::prelude::*;
use tracing_subscriber::EnvFilter;

#[derive(Deserialize)]
struct RunConfig {
    problem: Problem,
    settings: Settings,
    #[serde(default)]
    medium: ThermalMedium,
    /// Initial occupations `[species][flavour]`, the same in every bin.
    occupations: [[f64; 2]; 2],
    #[serde(default)]
    mixing: f64,
}

impl Default for RunConfig {
    fn default() -> Self {
        let grid = EnergyGrid::uniform(8, 2.0, 50.0).expect("valid grid");
        let vacuum = VacuumParameters::builder().dm21(7.4e-5).theta12(33.8).build();
        let fluid = Fluid::new(1.0e6, 8.0, 0.3);
        Self {
            problem: Problem::new(grid, vacuum, fluid),
            settings: Settings::builder()
                .rmax(1.0e8)
                .accuracy(1.0e-8)
                .output_stride(10)
                .progress_interval(1.0e6)
                .build(),
            medium: ThermalMedium::default(),
            occupations: [[1.0e-10, 1.0e-11], [6.0e-11, 1.0e-11]],
            mixing: 0.0,
        }
    }
}

/// Writes one line of the `f.dat` table per output point.
struct Table {
    out: BufWriter<Stdout>,
}

impl SolOut for Table {
    fn solout(&mut self, _r_old: f64, r: f64, _dr: f64, f: &FlavorField) -> ControlFlag {
        let mut line = format!("{r:.6e}");
        for species in Species::ALL {
            for m in f.species(species) {
                for z in m.data.iter().flatten() {
                    line.push_str(&format!("\t{:.10e}\t{:.10e}", z.re, z.im));
                }
            }
        }
        match writeln!(self.out, "{line}") {
            Ok(()) => ControlFlag::Continue,
            Err(_) => ControlFlag::Interrupt,
        }
    }
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(io::stderr)
        .init();

    let config: RunConfig = match std::env::args().nth(1) {
        Some(path) => {
            let text = fs::read_to_string(&path).expect("readable configuration file");
            serde_json::from_str(&text).expect("valid configuration")
        }
        None => RunConfig::default(),
    };

    let occupations = config.occupations;
    let f0 = FlavorField::from_occupations(&config.problem.grid, config.mixing, |species, flavor, _| {
        occupations[species.index()][flavor.index()]
    });

    let mut table = Table {
        out: BufWriter::new(io::stdout()),
    };
    match evolve(&config.medium, &config.problem, f0, &mut table, config.settings) {
        Ok(evolution) => {
            let _ = table.out.flush();
            let (n, nbar) = evolution.f.number_densities(&config.problem.grid);
            eprintln!("Final status: {:?}", evolution.status);
            eprintln!("Final distance: {:.6e} cm", evolution.r);
            eprintln!("Number densities: n = {n:.6e} cm^-3, nbar = {nbar:.6e} cm^-3");
            eprintln!("Derivative evaluations: {}", evolution.evals.derivative);
            eprintln!("Collision evaluations: {}", evolution.evals.interaction);
            eprintln!("Accepted steps: {}", evolution.steps.accepted);
            eprintln!("Rejected steps: {}", evolution.steps.rejected);
            eprintln!("Resets: {}", evolution.steps.resets);
        }
        Err(e) => eprintln!("Integration failed: {e}"),
    }
}
