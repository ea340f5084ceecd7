//! Init command implementation.

use anyhow::{bail, Result};
use coreguard_core::OptionDefault;
use coreguard_rules::builtin_entries;
use std::fmt::Write;
use std::path::{Path, PathBuf};

const HEADER: &str = r#"# coreguard configuration

# Severity at or above which `coreguard check` exits non-zero
# fail_on = "info"

[analyzer]
# Glob patterns to exclude from analysis
exclude = [
    "**/node_modules/**",
    "**/dist/**",
]

# File extensions to analyze (default: every TypeScript/JavaScript extension)
# extensions = ["ts", "tsx"]

# Respect .gitignore files
respect_gitignore = true

# Rule configurations
# Each rule can be enabled/disabled and have its severity overridden
"#;

/// Runs the init command.
pub fn run(force: bool) -> Result<()> {
    let path = write_config(Path::new("."), force)?;

    println!("Created {}", path.display());
    println!("\nNext steps:");
    println!("  1. Edit coreguard.toml to configure rules");
    println!("  2. Run: coreguard check");

    Ok(())
}

fn write_config(dir: &Path, force: bool) -> Result<PathBuf> {
    let config_path = dir.join("coreguard.toml");

    if config_path.exists() && !force {
        bail!(
            "Configuration file already exists at {}. Use --force to overwrite.",
            config_path.display()
        );
    }

    std::fs::write(&config_path, default_config())?;
    Ok(config_path)
}

/// Renders the starter config from the built-in rule schemas.
fn default_config() -> String {
    let mut out = HEADER.to_string();
    for entry in builtin_entries() {
        let d = entry.descriptor;
        let _ = writeln!(out, "\n# {} ({})", d.docs.description, d.code);
        let _ = writeln!(out, "[rules.{}]", d.id);
        let _ = writeln!(out, "enabled = {}", d.docs.recommended);
        let _ = writeln!(
            out,
            "# severity = \"{}\"",
            d.category.default_severity()
        );
        for option in d.schema {
            let value = match option.default {
                OptionDefault::Bool(b) => b.to_string(),
                OptionDefault::Str(s) => format!("'{s}'"),
            };
            let _ = writeln!(out, "# {} = {}", option.name, value);
        }
    }
    out
}
