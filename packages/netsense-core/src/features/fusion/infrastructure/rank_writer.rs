//! Ranking file output
//!
//! One `name score` line per signal, score printed with six decimals. The
//! file is written to a temporary sibling and renamed into place.

use std::fs;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use tracing::info;

use crate::features::fusion::domain::Ranking;

/// `gnn_rank_{base}_{version_tag}.txt`
pub fn ranking_file_name(base: &str, version_tag: &str) -> String {
    format!("gnn_rank_{base}_{version_tag}.txt")
}

/// Writes rankings atomically
#[derive(Debug, Default)]
pub struct RankWriter;

impl RankWriter {
    pub fn new() -> Self {
        Self
    }

    pub fn write(&self, path: impl AsRef<Path>, ranking: &Ranking) -> std::io::Result<PathBuf> {
        let path = path.as_ref();
        let dir = match path.parent() {
            Some(p) if !p.as_os_str().is_empty() => p.to_path_buf(),
            _ => PathBuf::from("."),
        };
        fs::create_dir_all(&dir)?;

        let tmp = NamedTempFile::new_in(&dir)?;
        {
            let mut out = BufWriter::new(tmp.as_file());
            for signal in ranking.iter() {
                writeln!(out, "{} {:.6}", signal.name, signal.score)?;
            }
            out.flush()?;
        }
        tmp.as_file().sync_all()?;
        tmp.persist(path).map_err(|e| e.error)?;

        info!(path = %path.display(), signals = ranking.len(), "ranking written");
        Ok(path.to_path_buf())
    }
}
