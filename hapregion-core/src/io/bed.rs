//! BED6 reading and writing.
//!
//! Two tables pass through here: the single-record location BED written by
//! region resolution, and gene tables (at least six columns) that are
//! projected into region-local space.

use std::fs::File;
use std::io::{BufRead, BufReader, Write};
use std::path::Path;
use anyhow::{anyhow, Context, Result};
use thiserror::Error;

use crate::annotation::GeneFeature;
use crate::project::ProjectedGeneFeature;
use crate::resolve::FAIL_PREFIX;
use crate::types::{GenomicPos, LocalPos, ResolvedRegion, Strand};

#[derive(Debug, Error)]
pub enum BedError {
    #[error("Invalid BED line: insufficient fields (expected at least 6, got {0})")]
    InsufficientFields(usize),
    #[error("Invalid coordinate: {0}")]
    InvalidCoordinate(String),
    #[error("Invalid strand: {0}")]
    InvalidStrand(String),
    #[error("Invalid interval: start {start} is not before end {end}")]
    InvalidInterval { start: GenomicPos, end: GenomicPos },
}

/// Content of a location BED: a resolved region or the failure notice that
/// was written in its place.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LocationRecord {
    Region(ResolvedRegion),
    Failed(String),
}

fn split_bed6(line: &str) -> Result<Vec<&str>, BedError> {
    let fields: Vec<&str> = line.split('\t').collect();
    if fields.len() < 6 {
        return Err(BedError::InsufficientFields(fields.len()));
    }
    Ok(fields)
}

/// Parse a resolved region line: contig, start, end, name, score, strand.
pub fn parse_region_line(line: &str) -> Result<ResolvedRegion, BedError> {
    let fields = split_bed6(line)?;

    let start = fields[1]
        .parse::<GenomicPos>()
        .map_err(|_| BedError::InvalidCoordinate(fields[1].to_string()))?;
    let end = fields[2]
        .parse::<GenomicPos>()
        .map_err(|_| BedError::InvalidCoordinate(fields[2].to_string()))?;
    if start >= end {
        return Err(BedError::InvalidInterval { start, end });
    }
    let strand = fields[5]
        .parse::<Strand>()
        .map_err(BedError::InvalidStrand)?;

    Ok(ResolvedRegion {
        contig: fields[0].to_string(),
        start,
        end,
        name: fields[3].to_string(),
        strand,
    })
}

/// BED coordinates are non-negative; they must also fit the signed local type.
fn parse_local(field: &str) -> Result<LocalPos, BedError> {
    field
        .parse::<GenomicPos>()
        .ok()
        .and_then(|pos| LocalPos::try_from(pos).ok())
        .ok_or_else(|| BedError::InvalidCoordinate(field.to_string()))
}

/// Parse one gene-table row. A `.` strand is kept as unstranded.
pub fn parse_gene_line(line: &str) -> Result<GeneFeature, BedError> {
    let fields = split_bed6(line)?;

    let start = parse_local(fields[1])?;
    let end = parse_local(fields[2])?;
    let strand = match fields[5] {
        "." => None,
        s => Some(s.parse::<Strand>().map_err(BedError::InvalidStrand)?),
    };

    Ok(GeneFeature {
        name: fields[0].to_string(),
        start,
        end,
        label: fields[3].to_string(),
        score: fields[4].to_string(),
        strand,
        extra: fields[6..].iter().map(|f| f.to_string()).collect(),
    })
}

fn content_lines<R: BufRead>(reader: R) -> impl Iterator<Item = Result<(usize, String)>> {
    reader
        .lines()
        .enumerate()
        .filter_map(|(line_num, line)| match line {
            Ok(line) => {
                let line = line.trim_end_matches(['\n', '\r']).to_string();
                if line.trim().is_empty() || line.starts_with('#') || line.starts_with("track ") {
                    None
                } else {
                    Some(Ok((line_num + 1, line)))
                }
            }
            Err(e) => Some(Err(anyhow::Error::from(e))),
        })
}

/// Read a location BED. Exactly one record is expected.
pub fn read_location<R: BufRead>(reader: R) -> Result<LocationRecord> {
    let mut lines = content_lines(reader);

    let (line_num, line) = lines
        .next()
        .ok_or_else(|| anyhow!("Location BED is empty"))??;

    let record = if line.starts_with(FAIL_PREFIX) {
        LocationRecord::Failed(line)
    } else {
        let region = parse_region_line(&line)
            .map_err(|e| anyhow!("Error parsing line {}: {}", line_num, e))?;
        LocationRecord::Region(region)
    };

    if let Some(extra) = lines.next() {
        let (extra_num, _) = extra?;
        return Err(anyhow!(
            "Location BED must hold a single record, found another on line {}",
            extra_num
        ));
    }

    Ok(record)
}

pub fn read_location_file<P: AsRef<Path>>(path: P) -> Result<LocationRecord> {
    let file = File::open(&path)
        .with_context(|| format!("Failed to open location BED: {}", path.as_ref().display()))?;
    read_location(BufReader::new(file))
        .with_context(|| format!("Failed to read location BED: {}", path.as_ref().display()))
}

/// Read a gene table, preserving input order.
pub fn read_gene_features<R: BufRead>(reader: R) -> Result<Vec<GeneFeature>> {
    content_lines(reader)
        .map(|entry| {
            let (line_num, line) = entry?;
            parse_gene_line(&line).map_err(|e| anyhow!("Error parsing line {}: {}", line_num, e))
        })
        .collect()
}

pub fn read_gene_file<P: AsRef<Path>>(path: P) -> Result<Vec<GeneFeature>> {
    let file = File::open(&path)
        .with_context(|| format!("Failed to open gene BED: {}", path.as_ref().display()))?;
    read_gene_features(BufReader::new(file))
        .with_context(|| format!("Failed to read gene BED: {}", path.as_ref().display()))
}

/// Write projected features as a header-free, tab-separated table.
pub fn write_gene_features<W: Write>(mut writer: W, features: &[ProjectedGeneFeature]) -> Result<()> {
    for feature in features {
        writeln!(writer, "{}", feature.to_bed_line())?;
    }
    writer.flush()?;
    Ok(())
}
