//! PAF (Pairwise mApping Format) file parser
//!
//! PAF is a text format used to describe the approximate mapping positions
//! between two sets of sequences. It consists of at least 12 fields separated by tabs.

use std::collections::HashMap;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;
use flate2::read::GzDecoder;
use anyhow::{anyhow, Context, Result};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::resolve::TargetSpan;
use crate::types::{GenomicPos, Strand};

#[derive(Debug, Error)]
pub enum PafError {
    #[error("Invalid PAF line: insufficient fields (expected at least 12, got {0})")]
    InsufficientFields(usize),
    #[error("Invalid position value: {0}")]
    InvalidPosition(String),
    #[error("Invalid strand: {0}")]
    InvalidStrand(String),
    #[error("Invalid {side} interval: start {start} is not before end {end}")]
    InvalidInterval {
        side: &'static str,
        start: GenomicPos,
        end: GenomicPos,
    },
    #[error("Parse error: {0}")]
    Parse(String),
}

/// One PAF line. Only the target name, target span and strand take part in
/// region resolution; the rest is carried for logging and diagnostics.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AlignmentRecord {
    pub query_name: String,
    pub query_length: GenomicPos,
    pub query_start: GenomicPos,
    pub query_end: GenomicPos,
    pub strand: Strand,
    pub target_name: String,
    pub target_length: GenomicPos,
    pub target_start: GenomicPos,
    pub target_end: GenomicPos,
    pub residue_matches: u64,
    pub block_length: u64,
    pub mapq: Option<u8>,
    pub tags: HashMap<String, String>,
}

impl AlignmentRecord {
    pub fn target_span(&self) -> GenomicPos {
        self.target_end - self.target_start
    }
}

impl TargetSpan for AlignmentRecord {
    fn target_name(&self) -> &str {
        &self.target_name
    }

    fn target_start(&self) -> GenomicPos {
        self.target_start
    }

    fn target_end(&self) -> GenomicPos {
        self.target_end
    }

    fn strand(&self) -> Strand {
        self.strand
    }
}

fn parse_pos(field: &str) -> Result<GenomicPos, PafError> {
    field
        .parse::<GenomicPos>()
        .map_err(|_| PafError::InvalidPosition(field.to_string()))
}

/// PAF parser for reading alignment records
pub struct PafParser;

impl PafParser {
    /// Parse a single PAF line into an AlignmentRecord
    pub fn parse_line(line: &str) -> Result<AlignmentRecord, PafError> {
        let fields: Vec<&str> = line.split('\t').collect();

        if fields.len() < 12 {
            return Err(PafError::InsufficientFields(fields.len()));
        }

        let query_name = fields[0].to_string();
        let query_length = parse_pos(fields[1])?;
        let query_start = parse_pos(fields[2])?;
        let query_end = parse_pos(fields[3])?;

        let strand = fields[4]
            .parse::<Strand>()
            .map_err(PafError::InvalidStrand)?;

        let target_name = fields[5].to_string();
        let target_length = parse_pos(fields[6])?;
        let target_start = parse_pos(fields[7])?;
        let target_end = parse_pos(fields[8])?;

        if query_start > query_end {
            return Err(PafError::InvalidInterval {
                side: "query",
                start: query_start,
                end: query_end,
            });
        }
        // Zero-length target spans would let a merged region collapse to start == end.
        if target_start >= target_end {
            return Err(PafError::InvalidInterval {
                side: "target",
                start: target_start,
                end: target_end,
            });
        }

        let residue_matches = fields[9].parse::<u64>()
            .map_err(|_| PafError::Parse(format!("Invalid residue matches: {}", fields[9])))?;
        let block_length = fields[10].parse::<u64>()
            .map_err(|_| PafError::Parse(format!("Invalid alignment block length: {}", fields[10])))?;

        let mapq = if fields[11] == "255" || fields[11] == "*" {
            None
        } else {
            Some(fields[11].parse::<u8>()
                .map_err(|_| PafError::Parse(format!("Invalid mapping quality: {}", fields[11])))?)
        };

        let tags = fields
            .iter()
            .skip(12)
            .filter_map(|field| Self::parse_tag(field))
            .collect();

        Ok(AlignmentRecord {
            query_name,
            query_length,
            query_start,
            query_end,
            strand,
            target_name,
            target_length,
            target_start,
            target_end,
            residue_matches,
            block_length,
            mapq,
            tags,
        })
    }

    /// Parse PAF optional tags in the format "XX:Y:value"
    /// where XX is the tag name, Y is the type, and value is the value
    fn parse_tag(tag_field: &str) -> Option<(String, String)> {
        let parts: Vec<&str> = tag_field.split(':').collect();
        if parts.len() >= 3 {
            let tag_name = parts[0].to_string();
            let tag_value = parts[2..].join(":"); // Join in case value contains colons
            Some((tag_name, tag_value))
        } else {
            None
        }
    }

    /// Parse a PAF file, transparently decompressing `.gz` input
    pub fn parse_file<P: AsRef<Path>>(path: P) -> Result<Vec<AlignmentRecord>> {
        let file = File::open(&path)
            .with_context(|| format!("Failed to open PAF file: {}", path.as_ref().display()))?;
        let path_str = path.as_ref().to_string_lossy();

        if path_str.ends_with(".gz") {
            let decoder = GzDecoder::new(file);
            let reader = BufReader::new(decoder);
            Self::parse_reader(reader)
        } else {
            let reader = BufReader::new(file);
            Self::parse_reader(reader)
        }
    }

    /// Parse PAF data from any BufRead source
    pub fn parse_reader<R: BufRead>(reader: R) -> Result<Vec<AlignmentRecord>> {
        PafIterator::new(reader).collect()
    }
}

/// Iterator over PAF entries
pub struct PafIterator<R: BufRead> {
    reader: R,
    line_buffer: String,
    line_number: usize,
}

impl<R: BufRead> PafIterator<R> {
    pub fn new(reader: R) -> Self {
        Self {
            reader,
            line_buffer: String::new(),
            line_number: 0,
        }
    }
}

impl<R: BufRead> Iterator for PafIterator<R> {
    type Item = Result<AlignmentRecord>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            self.line_buffer.clear();

            match self.reader.read_line(&mut self.line_buffer) {
                Ok(0) => return None, // EOF
                Ok(_) => {
                    self.line_number += 1;
                    let line = self.line_buffer.trim_end_matches(['\n', '\r']);

                    // Skip empty lines and comments
                    if line.trim().is_empty() || line.starts_with('#') {
                        continue;
                    }

                    return Some(PafParser::parse_line(line).map_err(|e| {
                        anyhow!("Error parsing line {}: {}", self.line_number, e)
                    }));
                }
                Err(e) => return Some(Err(e.into())),
            }
        }
    }
}
