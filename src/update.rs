//! Copyright © 2025-2026 Wenze Wei. All Rights Reserved.
//!
//! This file is part of Bfboot.
//! The Bfboot project belongs to the Dunimd project team.
//!
//! Licensed under the Apache License, Version 2.0 (the "License");
//! You may not use this file except in compliance with the License.
//! You may obtain a copy of the License at
//!
//!     http://www.apache.org/licenses/LICENSE-2.0
//!
//! Unless required by applicable law or agreed to in writing, software
//! distributed under the License is distributed on an "AS IS" BASIS,
//! WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
//! See the License for the specific language governing permissions and
//! limitations under the License.

//! # Staged Update Install
//!
//! An external updater drops the new extension next to the live one under
//! a prefixed name (`_bflib.dll` beside `bflib.dll`). On the next load the
//! bootstrapper copies it over the live binary and removes it.
//!
//! ## Guarantees
//!
//! - A staged file that is missing, unreadable or empty never changes the
//!   live binary.
//! - An unwritable live path is reported before any bytes move.
//! - New bytes go to a sibling `.tmp` file through the raw, unbuffered
//!   handle, are synced to disk, and only then renamed over the live path.
//!   The loader reads the live path immediately afterwards, so it must
//!   never see a partially flushed binary.
//! - The staged file is only removed after the rename succeeded. Failing
//!   to remove it is logged and otherwise ignored; the next load installs
//!   the same bytes again.

use std::fs::{self, File, OpenOptions, Permissions};
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::errors::{BfError, Result};
use crate::log::{BfCLogLevel, BfCLogRecord, BfCLogSink};

/// What a single `apply_pending_update` call did.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum BfUpdateOutcome {
    /// No staged update was present.
    Skipped,
    /// The staged bytes are now the live extension.
    Applied {
        bytes: usize,
        /// BLAKE3 hex digest of the installed bytes.
        digest: String,
        staged_removed: bool,
    },
    /// Installing failed; the staged file was kept for the next load.
    Failed { error: BfError },
}

impl BfUpdateOutcome {
    pub fn is_applied(&self) -> bool {
        matches!(self, BfUpdateOutcome::Applied { .. })
    }

    pub fn is_skipped(&self) -> bool {
        matches!(self, BfUpdateOutcome::Skipped)
    }

    pub fn error(&self) -> Option<&BfError> {
        match self {
            BfUpdateOutcome::Failed { error } => Some(error),
            _ => None,
        }
    }
}

/// Result of the copy itself, before the staged file is removed.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BfInstalledUpdate {
    pub bytes: usize,
    pub digest: String,
}

/// Probes for a staged update by opening it for reading. The handle is
/// dropped immediately.
pub fn staged_update_exists(staged: &Path) -> bool {
    File::open(staged).is_ok()
}

fn temp_path_for(live: &Path) -> PathBuf {
    let mut name = live.as_os_str().to_owned();
    name.push(".tmp");
    PathBuf::from(name)
}

/// Reads the whole staged file. An empty file is an error.
pub fn read_staged_update(staged: &Path) -> Result<Vec<u8>> {
    let mut file = File::open(staged).map_err(|err| BfError::read_open(staged, err))?;
    let mut bytes = Vec::new();
    file.read_to_end(&mut bytes)
        .map_err(|err| BfError::read(staged, err))?;
    if bytes.is_empty() {
        return Err(BfError::empty_read(staged));
    }
    Ok(bytes)
}

/// Writes `bytes` over `live` without going through a userspace buffer.
///
/// The live path is opened for writing first (without truncating) so that
/// an unwritable target fails as `WriteOpen` with the old content intact.
/// The new binary keeps the permissions of the one it replaces. When no
/// temp file can be created next to `live` (a read-only scripts directory
/// holding a writable binary), the bytes are written over `live` in place.
pub fn write_live_extension(live: &Path, bytes: &[u8]) -> Result<()> {
    let mut permissions = None;
    if live.exists() {
        let probe = OpenOptions::new()
            .write(true)
            .open(live)
            .map_err(|err| BfError::write_open(live, err))?;
        permissions = probe.metadata().ok().map(|meta| meta.permissions());
        drop(probe);
    }

    let tmp = temp_path_for(live);
    match OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(true)
        .open(&tmp)
    {
        Ok(out) => replace_through_temp(out, &tmp, live, bytes, permissions),
        Err(err) => {
            log::debug!(
                "boot.update.in_place: no temp file, writing over the live binary - path={}, error={}",
                tmp.display(),
                err
            );
            write_in_place(live, bytes)
        }
    }
}

fn replace_through_temp(
    mut out: File,
    tmp: &Path,
    live: &Path,
    bytes: &[u8],
    permissions: Option<Permissions>,
) -> Result<()> {
    let written = out
        .write_all(bytes)
        .and_then(|_| out.sync_all())
        .map_err(|err| BfError::write(tmp, err));
    drop(out);

    let result = written
        .and_then(|_| match permissions {
            Some(perms) => fs::set_permissions(tmp, perms).map_err(|err| BfError::write(tmp, err)),
            None => Ok(()),
        })
        .and_then(|_| fs::rename(tmp, live).map_err(|err| BfError::write(live, err)));
    if result.is_err() {
        let _ = fs::remove_file(tmp);
    }
    result
}

fn write_in_place(live: &Path, bytes: &[u8]) -> Result<()> {
    let mut out = OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(true)
        .open(live)
        .map_err(|err| BfError::write_open(live, err))?;
    out.write_all(bytes)
        .and_then(|_| out.sync_all())
        .map_err(|err| BfError::write(live, err))
}

/// Copies the staged update over the live extension. Does not remove the
/// staged file and does not log to the host sink.
pub fn install_staged_update(staged: &Path, live: &Path) -> Result<BfInstalledUpdate> {
    let bytes = read_staged_update(staged)?;
    log::debug!(
        "boot.update.read: staged update read - path={}, bytes={}",
        staged.display(),
        bytes.len()
    );
    write_live_extension(live, &bytes)?;
    Ok(BfInstalledUpdate {
        bytes: bytes.len(),
        digest: blake3::hash(&bytes).to_hex().to_string(),
    })
}

/// Installs a pending staged update, if there is one.
///
/// Never fails: update errors are logged to `sink` and returned as
/// [`BfUpdateOutcome::Failed`] so the caller can go on loading the binary
/// that is already in place.
pub fn apply_pending_update(staged: &Path, live: &Path, sink: &dyn BfCLogSink) -> BfUpdateOutcome {
    apply_pending_update_with(staged, live, sink, |path| fs::remove_file(path))
}

fn apply_pending_update_with<F>(
    staged: &Path,
    live: &Path,
    sink: &dyn BfCLogSink,
    remove_staged: F,
) -> BfUpdateOutcome
where
    F: FnOnce(&Path) -> io::Result<()>,
{
    if !staged_update_exists(staged) {
        log::debug!(
            "boot.update.none: no staged update - path={}",
            staged.display()
        );
        return BfUpdateOutcome::Skipped;
    }

    match install_staged_update(staged, live) {
        Ok(installed) => {
            // Windows keeps the file if another process holds it open.
            let staged_removed = match remove_staged(staged) {
                Ok(()) => true,
                Err(err) => {
                    sink.log(
                        BfCLogRecord::BfFNew(
                            BfCLogLevel::Warning,
                            "boot.update.cleanup_failed",
                            format!("installed update but could not remove staged file: {err}"),
                        )
                        .BfFWithField("path", staged.display().to_string()),
                    );
                    false
                }
            };
            sink.log(
                BfCLogRecord::BfFNew(
                    BfCLogLevel::Info,
                    "boot.update.installed",
                    "installed updated extension",
                )
                .BfFWithField("path", live.display().to_string())
                .BfFWithField("bytes", installed.bytes)
                .BfFWithField("digest", installed.digest.clone()),
            );
            BfUpdateOutcome::Applied {
                bytes: installed.bytes,
                digest: installed.digest,
                staged_removed,
            }
        }
        Err(error) => {
            sink.log(
                BfCLogRecord::BfFNew(
                    BfCLogLevel::Error,
                    "boot.update.failed",
                    format!("could not install updated extension: {error}"),
                )
                .BfFWithField("path", staged.display().to_string()),
            );
            BfUpdateOutcome::Failed { error }
        }
    }
}
