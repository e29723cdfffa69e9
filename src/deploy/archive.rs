// src/deploy/archive.rs

//! Zip the staging directory into the archive pushed to the remote host.
//!
//! Entry names are paths relative to the staging root, forward-slash
//! separated; the archive carries no absolute paths and no staging-root-name
//! prefix. Entry ordering follows filesystem traversal order, which is fine
//! for a content bundle that is extracted, not diffed.

use std::fs;
use std::io;
use std::path::Path;

use anyhow::Context;
use tracing::{debug, info};
use walkdir::WalkDir;
use zip::ZipWriter;
use zip::write::SimpleFileOptions;

use crate::errors::Result;

/// Create `zip_path` from the contents of `src_dir`.
pub fn zip_dir(src_dir: &Path, zip_path: &Path) -> Result<()> {
    let file = fs::File::create(zip_path)
        .with_context(|| format!("creating archive {:?}", zip_path))?;
    let mut writer = ZipWriter::new(file);

    let mut entries = 0usize;
    for entry in WalkDir::new(src_dir) {
        let entry = entry.with_context(|| format!("walking staging directory {:?}", src_dir))?;
        if !entry.file_type().is_file() {
            continue;
        }

        let rel = entry
            .path()
            .strip_prefix(src_dir)
            .context("stripping staging root prefix")?;
        let rel_str = rel.to_string_lossy().replace('\\', "/");

        let mut options = SimpleFileOptions::default();
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let mode = entry
                .metadata()
                .with_context(|| format!("reading metadata for {:?}", entry.path()))?
                .permissions()
                .mode();
            options = options.unix_permissions(mode);
        }

        debug!(entry = %rel_str, "adding archive entry");
        writer.start_file(&rel_str, options)?;
        let mut src = fs::File::open(entry.path())
            .with_context(|| format!("opening {:?}", entry.path()))?;
        io::copy(&mut src, &mut writer)
            .with_context(|| format!("writing {:?} into archive", entry.path()))?;
        entries += 1;
    }

    writer.finish()?;
    info!(entries, archive = %zip_path.display(), "wrote server archive");
    Ok(())
}
