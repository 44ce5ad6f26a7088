//! Final-profile output: the converged velocity, pressure and temperature
//! fields serialized as one comma-separated line each. Nothing is persisted
//! at intermediate timesteps.

use std::fs::{self, File};
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

use tracing::info;

use crate::domain::state::SolverState;

/// Writes the three profiles to any text sink, one field per line.
pub fn write_profiles<W: Write>(writer: &mut W, state: &SolverState) -> io::Result<()> {
    for field in [&state.u, &state.p, &state.t] {
        let line = field
            .iter()
            .map(|v| format!("{v:.6e}"))
            .collect::<Vec<_>>()
            .join(", ");
        writeln!(writer, "{line}")?;
    }
    Ok(())
}

#[derive(Debug)]
pub struct ProfileWriter {
    path: PathBuf,
}

impl ProfileWriter {
    /// Creates a writer for `path`, ensuring its parent directory exists.
    pub fn new<P: AsRef<Path>>(path: P) -> io::Result<Self> {
        let path = path.as_ref().to_path_buf();
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        Ok(Self { path })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn write_final(&self, state: &SolverState) -> io::Result<()> {
        let start = std::time::Instant::now();
        let file = File::create(&self.path)?;
        let mut writer = BufWriter::new(file);
        write_profiles(&mut writer, state)?;
        writer.flush()?;
        info!(
            "Wrote final profiles to {} in {:.2}ms",
            self.path.display(),
            start.elapsed().as_secs_f64() * 1e3
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SimulationConfig;
    use crate::domain::grid1d::Grid1D;
    use crate::properties::ConstantProperties;
    use tempfile::tempdir;

    fn dummy_state(nodes: usize) -> SolverState {
        let mut config = SimulationConfig::default();
        config.nodes = nodes;
        let grid = Grid1D::new(nodes, config.length).unwrap();
        let props = ConstantProperties { rho: 800.0, mu: 2e-4, k: 60.0, cp: 1250.0 };
        let mut state = SolverState::new(&grid, &config, &props);
        state.u.fill(1.0);
        state.p.fill(2.0);
        state.t.fill(3.0);
        state
    }

    #[test]
    fn test_writer_creates_parent_dir() -> io::Result<()> {
        let dir = tempdir()?;
        let path = dir.path().join("out").join("profiles.csv");
        assert!(!dir.path().join("out").exists());
        let _writer = ProfileWriter::new(&path)?;
        assert!(dir.path().join("out").exists());
        dir.close()
    }

    #[test]
    fn test_written_profiles_parse_back() -> io::Result<()> {
        let dir = tempdir()?;
        let path = dir.path().join("profiles.csv");
        let writer = ProfileWriter::new(&path)?;
        let state = dummy_state(6);
        writer.write_final(&state)?;

        let content = fs::read_to_string(&path)?;
        let lines: Vec<&str> = content.lines().collect();
        assert_eq!(lines.len(), 3);
        for (line, expected) in lines.iter().zip([1.0, 2.0, 3.0]) {
            let values: Vec<f64> = line
                .split(',')
                .map(|v| v.trim().parse().unwrap())
                .collect();
            assert_eq!(values.len(), 6);
            assert!(values.iter().all(|&v| (v - expected).abs() < 1e-12));
        }
        dir.close()
    }
}
