//! # Reset flag creation.
//!
//! The flag is a zero-byte marker file under the world-data root. Its mere
//! existence tells the external supervisor to rebuild world data on next
//! boot; this crate never writes content into it and never deletes it.
//!
//! Creation is create-if-absent (`create_new`): a second signaling pass
//! makes no filesystem change.

use std::fs::OpenOptions;
use std::io;
use std::path::{Path, PathBuf};

/// Creates the reset flag if it does not exist yet.
///
/// Returns `Ok(Some(path))` when the flag was created by this call,
/// `Ok(None)` when it already existed, and `Err` on any other I/O failure.
pub(crate) fn create_flag(root: &Path, name: &str) -> io::Result<Option<PathBuf>> {
    let path = root.join(name);
    match OpenOptions::new().write(true).create_new(true).open(&path) {
        Ok(_file) => Ok(Some(path)),
        Err(err) if err.kind() == io::ErrorKind::AlreadyExists => Ok(None),
        Err(err) => Err(err),
    }
}
