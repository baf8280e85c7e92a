use std::{
    fs::File,
    io::{self, BufReader, BufWriter},
    path::{Path, PathBuf},
};

use anyhow::Context;
use scendisc_analysis::report::BoxSequence;

use crate::schema::snapshot::Snapshot;

/// Where a report document is written: a file when a path is given, stdout otherwise.
#[derive(Debug)]
pub enum Output {
    Stdout(io::Stdout),
    File { writer: BufWriter<File>, path: PathBuf },
}

impl Output {
    pub fn open(path: Option<PathBuf>) -> anyhow::Result<Self> {
        let Some(path) = path else {
            return Ok(Output::Stdout(io::stdout()));
        };
        let file = File::create(&path)
            .with_context(|| format!("Failed to create report file: {}", path.display()))?;
        Ok(Output::File {
            writer: BufWriter::new(file),
            path,
        })
    }

    /// Writes `value` as pretty-printed JSON to `path`, or stdout without one.
    pub fn save_json<T>(value: &T, path: Option<PathBuf>) -> anyhow::Result<()>
    where
        T: serde::Serialize,
    {
        Output::open(path)?.write_json(value)
    }

    fn target(&self) -> String {
        match self {
            Output::Stdout(_) => "stdout".to_owned(),
            Output::File { path, .. } => path.display().to_string(),
        }
    }

    fn write_json<T>(mut self, value: &T) -> anyhow::Result<()>
    where
        T: serde::Serialize,
    {
        let target = self.target();
        let result = match &mut self {
            Output::Stdout(stdout) => write_pretty(&mut stdout.lock(), value),
            Output::File { writer, .. } => write_pretty(writer, value),
        };
        result.with_context(|| format!("Failed to write report to {target}"))
    }
}

fn write_pretty<W, T>(writer: &mut W, value: &T) -> io::Result<()>
where
    W: io::Write,
    T: serde::Serialize,
{
    serde_json::to_writer_pretty(&mut *writer, value)?;
    writeln!(writer)?;
    writer.flush()
}

/// Read an analysis snapshot and build its box sequence
///
/// # Errors
///
/// Returns error if the file cannot be opened or parsed, or the snapshot
/// describes an invalid dataset or box
pub fn read_snapshot_file<P>(path: P) -> anyhow::Result<BoxSequence>
where
    P: AsRef<Path>,
{
    let path = path.as_ref();
    let file = File::open(path)
        .with_context(|| format!("Failed to open snapshot: {}", path.display()))?;
    let snapshot: Snapshot = serde_json::from_reader(BufReader::new(file))
        .with_context(|| format!("Malformed snapshot JSON: {}", path.display()))?;
    snapshot
        .into_sequence()
        .with_context(|| format!("Invalid snapshot: {}", path.display()))
}

#[cfg(test)]
mod tests {
    use std::fs;

    use super::*;

    fn scratch_path(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!("scendisc-util-{}-{name}", std::process::id()))
    }

    #[test]
    fn test_save_json_to_file() {
        let path = scratch_path("report.json");
        Output::save_json(&serde_json::json!({ "dims": ["x", "kind"] }), Some(path.clone()))
            .unwrap();
        let written = fs::read_to_string(&path).unwrap();
        fs::remove_file(&path).unwrap();
        assert!(written.ends_with("}\n"));
        let value: serde_json::Value = serde_json::from_str(&written).unwrap();
        assert_eq!(value["dims"][1], "kind");
    }

    #[test]
    fn test_missing_snapshot_names_path() {
        let path = scratch_path("missing.json");
        let err = read_snapshot_file(&path).unwrap_err();
        assert!(format!("{err:#}").contains(&path.display().to_string()));
    }

    #[test]
    fn test_malformed_snapshot() {
        let path = scratch_path("malformed.json");
        fs::write(&path, r#"{"experiments": "#).unwrap();
        let err = read_snapshot_file(&path).unwrap_err();
        fs::remove_file(&path).unwrap();
        assert!(err.to_string().starts_with("Malformed snapshot JSON"));
    }
}
