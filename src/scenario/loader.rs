// src/scenario/loader.rs
//
// Boundary with the trajectory-extraction side: segments arrive as one JSON
// document per file. Nothing here is used during evaluation.

use super::segment::Segment;
use anyhow::{Context, Result};
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use tracing::{info, warn};
use walkdir::WalkDir;

pub fn find_segment_files(input_dir: &Path) -> Vec<PathBuf> {
    let mut files: Vec<PathBuf> = WalkDir::new(input_dir)
        .follow_links(true)
        .into_iter()
        .filter_map(|e| e.ok())
        .map(|e| e.into_path())
        .filter(|p| p.is_file() && p.extension().is_some_and(|ext| ext.eq_ignore_ascii_case("json")))
        .collect();
    files.sort();

    info!("Found {} segment file(s) in {}", files.len(), input_dir.display());
    files
}

pub fn load_segment(path: &Path) -> Result<Segment> {
    let file =
        File::open(path).with_context(|| format!("Failed to open segment {}", path.display()))?;
    let mut segment: Segment = serde_json::from_reader(BufReader::new(file))
        .with_context(|| format!("Failed to parse segment {}", path.display()))?;

    if segment.source.is_empty() {
        segment.source = path.display().to_string();
    }
    Ok(segment)
}

/// Load every segment under `input_dir`. Unreadable files are logged and
/// skipped so one bad export does not block the batch.
pub fn load_segments(input_dir: &Path) -> Vec<Segment> {
    find_segment_files(input_dir)
        .iter()
        .filter_map(|path| match load_segment(path) {
            Ok(segment) => Some(segment),
            Err(e) => {
                warn!("⚠️  Skipping {}: {:#}", path.display(), e);
                None
            }
        })
        .collect()
}
