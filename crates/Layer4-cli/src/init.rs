//! taskd init command
//!
//! Writes a project-local `.taskd/config.json` filled with defaults.

use std::path::Path;
use taskd_foundation::{JsonStore, TaskdConfig, TASKD_CONFIG_FILE};

/// Initialize taskd configuration in the current directory
pub fn init_project(force: bool) -> anyhow::Result<()> {
    let cwd = std::env::current_dir()?;
    init_in(&cwd, force)
}

/// Initialize taskd configuration under `root`
pub fn init_in(root: &Path, force: bool) -> anyhow::Result<()> {
    let store = JsonStore::project(root);

    // Check if already initialized
    if store.exists(TASKD_CONFIG_FILE) && !force {
        println!("✓ taskd already initialized in this directory.");
        println!("  Use --force to reinitialize.");
        return Ok(());
    }

    TaskdConfig::with_defaults().save_to(&store)?;
    println!("  Created {}", store.file_path(TASKD_CONFIG_FILE).display());
    Ok(())
}
