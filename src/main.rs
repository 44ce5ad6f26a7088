use config::SimulationConfig;
use io::ProfileWriter;
use properties::SodiumLiquid;
use solver::Solver;

mod boundary;
mod config;
mod domain;
mod error;
mod io;
mod numerical;
mod properties;
mod solver;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt::init();

    // Optional first argument: path to a JSON configuration; otherwise the
    // sodium evaporator reference case.
    let config = match std::env::args().nth(1) {
        Some(path) => SimulationConfig::from_file(path)?,
        None => SimulationConfig::default(),
    };

    let mut solver = Solver::new(config, SodiumLiquid)?;
    solver.run()?;

    let writer = ProfileWriter::new("output/profiles.csv")?;
    writer.write_final(&solver.state)?;

    Ok(())
}
