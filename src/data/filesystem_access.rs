//! Location of the persisted post-processing config.
use std::path::{Path, PathBuf};

const APP_DIR: &str = "bvr";

/// `<config dir>/bvr` (`~/.config/bvr` on Linux), created if missing.
pub fn config_dir() -> anyhow::Result<PathBuf> {
    let mut path = dirs::config_dir().ok_or_else(|| anyhow::anyhow!("No config directory available on this system"))?;
    path.push(APP_DIR);
    create_directory(&path)?;
    Ok(path)
}

fn create_directory(path: &Path) -> anyhow::Result<()> {
    if !path.exists() {
        std::fs::create_dir_all(path)?;
        log::debug!("Created directory {}", path.display());
    }
    Ok(())
}
