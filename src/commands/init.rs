//! Write a starter configuration file.

use crate::config::loader::CONFIG_FILE_NAME;
use anyhow::Result;
use std::fs;
use std::path::PathBuf;

pub fn init_config(force: bool) -> Result<()> {
    let config_path = PathBuf::from(CONFIG_FILE_NAME);

    if config_path.exists() && !force {
        anyhow::bail!("Configuration file already exists. Use --force to overwrite.");
    }

    let default_config = r#"# covgate configuration

# Threshold preset: "strict", "balanced", or "lenient".
# Explicit values under [thresholds] override the preset per dimension.
preset = "balanced"

# LCOV report location, relative to the repository root.
coverage_file = "coverage/lcov.info"

# Exit non-zero when the gate fails.
strict_mode = false

# Base branch pull requests are compared against.
baseline_branch = "master"

[thresholds]
# lines = 60
# branches = 50
# functions = 50
# statements = 60

[file_filter]
extensions = ["rs", "ts", "tsx", "js", "jsx"]
include = ["src/"]
exclude = ["\\.d\\.ts$", "(^|/)tests?/", "_tests?\\.rs$"]
"#;

    fs::write(&config_path, default_config)?;
    println!("Created {CONFIG_FILE_NAME} configuration file");

    Ok(())
}
