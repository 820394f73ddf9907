//! Project command implementation - gene coordinates relative to a resolved region

use anyhow::{Context, Result};
use std::path::PathBuf;

use hapregion_core::io::bed::{read_gene_file, read_location_file, write_gene_features, LocationRecord};
use hapregion_core::CoordinateProjector;

use crate::commands::{create_output, IdentityArgs};
use crate::config::Config;
use crate::error::{require_file, CliError};

pub fn execute(
    config: &Config,
    loc_bed: PathBuf,
    gene_bed: PathBuf,
    identity: IdentityArgs,
    out: PathBuf,
) -> Result<()> {
    let identity = identity.into_identity()?;
    log::info!("Projecting genes for {}", identity);

    require_file(&loc_bed)?;
    require_file(&gene_bed)?;

    let region = match read_location_file(&loc_bed)
        .map_err(|e| CliError::parse(loc_bed.display().to_string(), format!("{:#}", e)))?
    {
        LocationRecord::Region(region) => region,
        LocationRecord::Failed(line) => {
            return Err(CliError::validation(format!(
                "{} records a failed region: {}",
                loc_bed.display(),
                line
            ))
            .into());
        }
    };
    if region.name != identity.composite_name() {
        log::warn!(
            "Location BED names region {} but projecting as {}",
            region.name,
            identity
        );
    }

    let genes = read_gene_file(&gene_bed)
        .map_err(|e| CliError::parse(gene_bed.display().to_string(), format!("{:#}", e)))?;
    log::debug!("Loaded {} gene features", genes.len());

    let projector = CoordinateProjector::new(&region, &identity)?;
    if projector.is_reverse() {
        log::info!("{} aligned on the reverse strand, mirroring about {}", identity, region.end);
    }
    // Projection errors abort before anything is written.
    let projected = projector.project(&genes)?;

    let writer = create_output(config, &out)?;
    write_gene_features(writer, &projected)
        .with_context(|| format!("Failed to write gene BED: {}", out.display()))?;
    log::info!("Wrote {} features to {}", projected.len(), out.display());

    Ok(())
}
