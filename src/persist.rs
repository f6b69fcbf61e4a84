use anyhow::{Context, Result};
use atomic_write_file::AtomicWriteFile;
use std::io::Write;
use std::path::Path;

/// Replace `path` with `chunks` in one atomic rename, creating parent
/// directories first. Readers never see a half-written file.
pub(crate) fn write_atomically(path: &Path, chunks: &[&[u8]]) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory at {}", parent.display()))?;
    }

    let mut file = AtomicWriteFile::open(path)
        .with_context(|| format!("Failed to open atomic write file at {}", path.display()))?;
    for chunk in chunks {
        file.write_all(chunk)
            .with_context(|| format!("Failed to write {}", path.display()))?;
    }
    file.commit()
        .with_context(|| format!("Failed to save {}", path.display()))
}
