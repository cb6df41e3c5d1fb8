use anyhow::{Context, Result};
use atomic_write_file::AtomicWriteFile;
use std::fs;
use std::io::Write;
use std::path::Path;

use crate::config::Config;
use crate::scoring::ScoringConfig;

const HEADER: &str = "\
# recovery-risk configuration
#
# Every key under `scoring` is optional. Weights are points at full factor
# intensity; entries you remove fall back to the built-in tables.
";

/// Write the standard scoring tables to `path` as a starting point for edits.
///
/// Refuses to replace an existing file unless `force` is set.
pub fn write_default_config(path: &Path, force: bool) -> Result<()> {
    if path.exists() && !force {
        anyhow::bail!(
            "Config already exists at {}. Use --force to overwrite",
            path.display()
        );
    }

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create config directory at {}", parent.display()))?;
    }

    let config = Config {
        scoring: Some(ScoringConfig::default()),
    };
    let yaml = serde_saphyr::to_string(&config).context("Failed to serialize config")?;

    let mut file = AtomicWriteFile::open(path)
        .with_context(|| format!("Failed to open atomic write file at {}", path.display()))?;
    file.write_all(HEADER.as_bytes())
        .and_then(|_| file.write_all(yaml.as_bytes()))
        .context("Failed to write config")?;
    file.commit().context("Failed to save config")?;

    Ok(())
}
