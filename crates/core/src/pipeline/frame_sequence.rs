use std::io;
use std::path::{Path, PathBuf};

use tempfile::TempDir;

use crate::shared::constants::{FRAME_FILE_EXTENSION, FRAME_FILE_PREFIX, TEMP_DIR_PREFIX};

/// Run-private directory of numbered frame images.
///
/// Files are named with a contiguous zero-padded 6-digit counter so the
/// encoder reads them as one image sequence. The directory is removed by
/// [`FrameSequence::release`], or on drop if the run unwinds first.
pub struct FrameSequence {
    dir: TempDir,
    len: usize,
}

impl FrameSequence {
    /// Creates the directory under `root`, or the system temp dir.
    pub fn acquire(root: Option<&Path>) -> io::Result<Self> {
        let mut builder = tempfile::Builder::new();
        builder.prefix(TEMP_DIR_PREFIX);
        let dir = match root {
            Some(root) => builder.tempdir_in(root)?,
            None => builder.tempdir()?,
        };
        Ok(Self { dir, len: 0 })
    }

    pub fn dir(&self) -> &Path {
        self.dir.path()
    }

    /// Path the next committed frame should be written to.
    pub fn next_path(&self) -> PathBuf {
        self.dir.path().join(frame_file_name(self.len))
    }

    /// Marks the file at [`next_path`](Self::next_path) as written.
    pub fn commit(&mut self) {
        self.len += 1;
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// printf-style input pattern for the encoder.
    pub fn pattern(&self) -> PathBuf {
        self.dir
            .path()
            .join(format!("{FRAME_FILE_PREFIX}%06d.{FRAME_FILE_EXTENSION}"))
    }

    /// Deletes the directory and everything in it.
    pub fn release(self) {
        let path = self.dir.path().to_path_buf();
        if let Err(e) = self.dir.close() {
            log::warn!("could not remove {}: {e}", path.display());
        }
    }
}

fn frame_file_name(n: usize) -> String {
    format!("{FRAME_FILE_PREFIX}{n:06}.{FRAME_FILE_EXTENSION}")
}
