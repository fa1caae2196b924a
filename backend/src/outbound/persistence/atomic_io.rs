//! Atomic whole-file replacement.
//!
//! Contents are written to a hidden sibling file, flushed to disk, then
//! renamed over the target, so readers see either the previous file or the
//! new one and never a partial write.

use std::io::{self, Write};
use std::sync::atomic::{AtomicU64, Ordering};

use camino::{Utf8Component, Utf8Path};
use cap_std::fs::{Dir, OpenOptions};

static TEMP_COUNTER: AtomicU64 = AtomicU64::new(0);

/// Temporary sibling file, removed on drop unless renamed into place.
struct PendingFile<'a> {
    dir: &'a Dir,
    name: String,
    committed: bool,
}

impl<'a> PendingFile<'a> {
    fn create(dir: &'a Dir, target: &str) -> io::Result<(Self, cap_std::fs::File)> {
        let counter = TEMP_COUNTER.fetch_add(1, Ordering::Relaxed);
        let name = format!(".{target}.tmp.{}.{counter}", std::process::id());
        let mut options = OpenOptions::new();
        options.write(true).create_new(true);
        let file = dir.open_with(&name, &options)?;
        Ok((
            Self {
                dir,
                name,
                committed: false,
            },
            file,
        ))
    }

    fn commit(mut self, target: &str) -> io::Result<()> {
        rename_into_place(self.dir, &self.name, target)?;
        self.committed = true;
        Ok(())
    }
}

impl Drop for PendingFile<'_> {
    fn drop(&mut self) {
        if !self.committed && self.dir.remove_file(&self.name).is_err() {
            // Cleanup is best effort.
        }
    }
}

/// Replace `file_name` inside `dir` with `contents`.
///
/// `file_name` must be a single normal path component.
///
/// # Errors
///
/// Returns the underlying I/O error when the temporary file cannot be
/// written or synced, or when the rename fails. The previous target file is
/// left untouched in every error case.
pub(crate) fn replace_file(dir: &Dir, file_name: &Utf8Path, contents: &[u8]) -> io::Result<()> {
    let mut components = file_name.components();
    let (Some(Utf8Component::Normal(target)), None) = (components.next(), components.next())
    else {
        return Err(io::Error::new(
            io::ErrorKind::InvalidInput,
            format!("{file_name} is not a plain file name"),
        ));
    };

    let (pending, mut file) = PendingFile::create(dir, target)?;
    file.write_all(contents)?;
    file.sync_all()?;
    drop(file);
    pending.commit(target)?;
    sync_directory(dir);
    Ok(())
}

#[cfg(windows)]
fn rename_into_place(dir: &Dir, tmp_name: &str, target: &str) -> io::Result<()> {
    // Windows refuses to rename over an existing file.
    match dir.remove_file(target) {
        Ok(()) => {}
        Err(err) if err.kind() == io::ErrorKind::NotFound => {}
        Err(err) => return Err(err),
    }
    dir.rename(tmp_name, dir, target)
}

#[cfg(not(windows))]
fn rename_into_place(dir: &Dir, tmp_name: &str, target: &str) -> io::Result<()> {
    dir.rename(tmp_name, dir, target)
}

fn sync_directory(dir: &Dir) {
    if dir.open(".").and_then(|handle| handle.sync_all()).is_err() {
        // Directory sync is best effort.
    }
}
