//! Resolve command implementation - merge a region's alignments into one BED interval

use anyhow::{Context, Result};
use std::io::Write;
use std::path::PathBuf;

use hapregion_core::io::fai::count_index_records;
use hapregion_core::io::PafParser;
use hapregion_core::{RegionResolver, Resolution};

use crate::commands::{create_output, IdentityArgs};
use crate::config::Config;
use crate::error::{require_file, CliError};

/// Where the expected alignment count comes from, in priority order
fn expected_count(config: &Config, expected: Option<usize>, index: Option<&PathBuf>) -> Result<usize> {
    if let Some(count) = expected {
        return Ok(count);
    }
    if let Some(index) = index {
        require_file(index)?;
        let count = count_index_records(index)
            .map_err(|e| CliError::parse(index.display().to_string(), format!("{:#}", e)))?;
        log::info!("Expecting {} alignments from {}", count, index.display());
        return Ok(count);
    }
    log::debug!(
        "No --expected or --index given, using configured count {}",
        config.resolve.expected_alignments
    );
    Ok(config.resolve.expected_alignments)
}

pub fn execute(
    config: &Config,
    paf: PathBuf,
    expected: Option<usize>,
    index: Option<PathBuf>,
    identity: IdentityArgs,
    out: PathBuf,
    json: bool,
) -> Result<()> {
    let identity = identity.into_identity()?;
    log::info!("Resolving {} from {}", identity, paf.display());

    require_file(&paf)?;
    let expected = expected_count(config, expected, index.as_ref())?;

    let records = PafParser::parse_file(&paf)
        .map_err(|e| CliError::parse(paf.display().to_string(), format!("{:#}", e)))?;
    log::debug!("Loaded {} alignment records", records.len());

    let resolution = RegionResolver::new(expected).resolve(&records, &identity);
    match &resolution {
        Resolution::Resolved(region) => log::info!(
            "{} resolved to {}:{}-{} ({} bp, strand {})",
            identity,
            region.contig,
            region.start,
            region.end,
            region.length(),
            region.strand
        ),
        Resolution::Failed(failure) => log::info!("{} written as failure: {}", identity, failure.reason),
    }

    let writer = create_output(config, &out)?;
    resolution
        .write_to(writer)
        .with_context(|| format!("Failed to write region BED: {}", out.display()))?;

    if json {
        let stdout = std::io::stdout();
        let mut handle = stdout.lock();
        serde_json::to_writer_pretty(&mut handle, &resolution)
            .context("Failed to serialize resolution")?;
        writeln!(handle)?;
    }

    Ok(())
}
