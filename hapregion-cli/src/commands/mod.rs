//! Command implementations for the hapregion CLI

pub mod resolve;
pub mod project;

use anyhow::{Context, Result};
use clap::Args;
use hapregion_core::RegionIdentity;
use std::fs::File;
use std::io::BufWriter;
use std::path::{Path, PathBuf};

use crate::config::Config;
use crate::error::{CliError, CliResult};

/// Region/sample/haplotype names shared by every command
#[derive(Args, Debug, Clone)]
pub struct IdentityArgs {
    /// Region of interest name
    #[arg(long, visible_alias = "rgn")]
    pub region: String,

    /// Sample name
    #[arg(long, visible_alias = "samp")]
    pub sample: String,

    /// Haplotype name
    #[arg(long)]
    pub hap: String,
}

impl IdentityArgs {
    pub fn into_identity(self) -> CliResult<RegionIdentity> {
        let identity = RegionIdentity::new(self.region, self.sample, self.hap);
        if let Some(token) = identity.invalid_token() {
            return Err(CliError::validation(format!(
                "identity token {:?} must be non-empty and free of tabs and newlines",
                token
            )));
        }
        Ok(identity)
    }
}

/// Open `path` for writing, creating parent directories when configured to
pub fn create_output(config: &Config, path: &Path) -> Result<BufWriter<File>> {
    if config.output.create_parent_dirs {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create output directory: {}", parent.display()))?;
        }
    }
    let file = File::create(path).map_err(CliError::from)?;
    Ok(BufWriter::new(file))
}

pub fn show_config(config: &Config, example: bool, out: Option<PathBuf>) -> Result<()> {
    if !example {
        print!("{}", toml::to_string_pretty(config).context("Failed to serialize configuration")?);
        return Ok(());
    }

    match out {
        Some(path) => {
            Config::default().save_to_file(&path)?;
            log::info!("Example configuration written to: {}", path.display());
        }
        None => print!("{}", Config::example_toml()?),
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(region: &str) -> IdentityArgs {
        IdentityArgs {
            region: region.to_string(),
            sample: "HG002".to_string(),
            hap: "h1".to_string(),
        }
    }

    #[test]
    fn test_identity_validation() {
        assert_eq!(args("rgn1").into_identity().unwrap().composite_name(), "rgn1_HG002_h1");
        assert!(matches!(args("").into_identity(), Err(CliError::Validation { .. })));
        assert!(matches!(args("a\tb").into_identity(), Err(CliError::Validation { .. })));
    }

    #[test]
    fn test_create_output_makes_parent_dirs() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("nested/out/region.bed");
        create_output(&Config::default(), &path).unwrap();
        assert!(path.exists());
    }
}
