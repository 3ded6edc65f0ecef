//! Frame sequencing and scoped frame storage.

use std::fs;
use std::path::{Path, PathBuf};

use rela_core::Result;

/// Prefix lengths of an animated render, one per frame.
///
/// Frames grow from `start` by `stride` while strictly below `n`, then a
/// final frame covers the whole table. Fewer than `start` rows yields no
/// frames at all — the caller signals "no artifact" instead of crashing.
pub fn prefix_lengths(n: usize, start: usize, stride: usize) -> Vec<usize> {
    if start == 0 || stride == 0 || n < start {
        return Vec::new();
    }
    let mut lengths: Vec<usize> = (start..n).step_by(stride).collect();
    lengths.push(n);
    lengths
}

/// Zero-padded frame file name; lexical order equals assembly order.
pub fn frame_file_name(index: usize) -> String {
    format!("frame_{index:04}.png")
}

/// Scoped frame storage: created on start, removed on drop unless persisted.
///
/// All frame files of a run live under one explicit directory owned by that
/// run; there is no implicit working directory. Failure paths drop the guard
/// and the partial frames are cleaned up with it.
#[derive(Debug)]
pub struct FrameDir {
    path: PathBuf,
    keep: bool,
}

impl FrameDir {
    pub fn create(path: PathBuf) -> Result<Self> {
        fs::create_dir_all(&path)?;
        Ok(Self { path, keep: false })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Path for the frame at the given sequence index.
    pub fn frame_path(&self, index: usize) -> PathBuf {
        self.path.join(frame_file_name(index))
    }

    /// Keep the directory past the end of the run.
    pub fn persist(&mut self) {
        self.keep = true;
    }
}

impl Drop for FrameDir {
    fn drop(&mut self) {
        if !self.keep {
            if let Err(e) = fs::remove_dir_all(&self.path) {
                tracing::warn!(path = %self.path.display(), "failed to remove frame directory: {e}");
            }
        }
    }
}
