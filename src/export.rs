//! Genesis guard & exporter, plus the atomic-write helper shared by
//! every durable artifact this tool produces.
//!
//! Two observable states exist at a target path: the prior content (or
//! absence) and the fully-written new content. A crash between the temp
//! write and the rename leaves the prior state intact; a concurrent
//! reader never sees a partial document.

use std::{
    fs::{self, OpenOptions},
    io::Write,
    path::Path,
};

use tracing::info;

use crate::{error::AppError, genesis::GenesisDocument};

/// Write the genesis document to `path`.
///
/// If `path` already exists and `overwrite` is false, fails with
/// [`AppError::GenesisExists`] and leaves the existing file byte-for-byte
/// untouched. Overwriting is an explicit operator decision, never
/// inferred. After a successful write the document is immutable; the
/// exporter holds no state between calls.
pub fn export_genesis(
    path: &Path,
    doc: &GenesisDocument,
    overwrite: bool,
) -> Result<(), AppError> {
    if path.exists() && !overwrite {
        return Err(AppError::GenesisExists(path.to_path_buf()));
    }

    let mut rendered = serde_json::to_vec_pretty(doc)
        .map_err(|e| AppError::Genesis(format!("cannot serialize genesis document: {e}")))?;
    rendered.push(b'\n');

    write_atomic(path, &rendered, 0o644)
        .map_err(|e| AppError::Genesis(format!("cannot write {}: {e}", path.display())))?;

    info!(chain_id = %doc.chain_id, path = %path.display(), "genesis file written");
    Ok(())
}

/// All-or-nothing file write: sibling `.tmp` file, `write_all`, `flush`,
/// `sync_all`, set permissions, then rename over the target.
///
/// Creates the parent directory if missing. If two invocations race
/// against the same path the last rename wins — concurrent use of the
/// same home directory is an unsupported precondition, not something
/// this helper arbitrates.
pub fn write_atomic(path: &Path, bytes: &[u8], mode: u32) -> Result<(), std::io::Error> {
    let parent = path.parent().ok_or_else(|| {
        std::io::Error::new(
            std::io::ErrorKind::InvalidInput,
            format!("{} has no parent directory", path.display()),
        )
    })?;
    fs::create_dir_all(parent)?;

    let mut tmp = path.as_os_str().to_owned();
    tmp.push(".tmp");
    let tmp_path = Path::new(&tmp);

    let result = (|| {
        let mut file = OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(true)
            .open(tmp_path)?;
        file.write_all(bytes)?;
        file.flush()?;
        file.sync_all()?;

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            fs::set_permissions(tmp_path, fs::Permissions::from_mode(mode))?;
        }
        #[cfg(not(unix))]
        let _ = mode;

        fs::rename(tmp_path, path)
    })();

    if result.is_err() {
        // The target was never touched; drop the partial temp file.
        let _ = fs::remove_file(tmp_path);
    }
    result
}

// ── tests ─────────────────────────────────────────────────────────────────────
