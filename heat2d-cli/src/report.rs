use anyhow::{Context, Result};
use heat2d_core::{Field, SimulationConfig};
use serde::Serialize;
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;
use std::time::Duration;

const SEPARATOR_WIDTH: usize = 50;

/// One row per line, each cell `{:6.2}` plus a space, then a separator line.
pub fn write_grid<W: Write>(w: &mut W, field: &Field) -> io::Result<()> {
    for row in field.rows() {
        for v in row {
            write!(w, "{v:6.2} ")?;
        }
        writeln!(w)?;
    }
    writeln!(w, "{}", "-".repeat(SEPARATOR_WIDTH))
}

pub fn write_summary<W: Write>(w: &mut W, elapsed: Duration) -> io::Result<()> {
    writeln!(w, "Simulation finished.")?;
    writeln!(w, "Time taken: {:.5} seconds.", elapsed.as_secs_f64())
}

#[derive(Serialize)]
struct Snapshot<'a> {
    config: &'a SimulationConfig,
    iterations: usize,
    elapsed_secs: f64,
    min: Option<f64>,
    max: Option<f64>,
    field: Vec<&'a [f64]>,
}

/// Writes the final field and run metadata as a single JSON document.
pub fn write_json(
    path: &Path,
    config: &SimulationConfig,
    iterations: usize,
    elapsed: Duration,
    field: &Field,
) -> Result<()> {
    let range = field.min_max();
    let snapshot = Snapshot {
        config,
        iterations,
        elapsed_secs: elapsed.as_secs_f64(),
        min: range.map(|(lo, _)| lo),
        max: range.map(|(_, hi)| hi),
        field: field.rows().collect(),
    };

    let file = File::create(path).with_context(|| format!("creating {}", path.display()))?;
    let mut writer = BufWriter::new(file);
    serde_json::to_writer(&mut writer, &snapshot)?;
    writer.write_all(b"\n")?;
    writer.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn grid_format() {
        let field = Field::from_rows(&[[0.0, 100.0], [3.25, -1.5]]).unwrap();
        let mut out = Vec::new();
        write_grid(&mut out, &field).unwrap();
        let text = String::from_utf8(out).unwrap();

        let expected = format!("  0.00 100.00 \n  3.25  -1.50 \n{}\n", "-".repeat(50));
        assert_eq!(text, expected);
    }

    #[test]
    fn summary_uses_five_decimals() {
        let mut out = Vec::new();
        write_summary(&mut out, Duration::from_millis(1234)).unwrap();
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "Simulation finished.\nTime taken: 1.23400 seconds.\n"
        );
    }

    #[test]
    fn json_snapshot_contents() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("final.json");
        let config = SimulationConfig {
            grid_size: 2,
            iterations: 3,
            ..SimulationConfig::default()
        };
        let field = Field::from_rows(&[[1.0, 2.0], [3.0, 4.0]]).unwrap();
        write_json(&path, &config, 3, Duration::from_secs(2), &field).unwrap();

        let text = std::fs::read_to_string(&path).unwrap();
        let v: serde_json::Value = serde_json::from_str(&text).unwrap();
        assert_eq!(v["iterations"], 3);
        assert_eq!(v["elapsed_secs"], 2.0);
        assert_eq!(v["min"], 1.0);
        assert_eq!(v["max"], 4.0);
        assert_eq!(v["field"][1][0], 3.0);
        assert_eq!(v["config"]["grid_size"], 2);
        assert_eq!(v["config"]["schedule"], "rayon");
    }
}
