//! Region resolution: merge the alignments of one region against one
//! haplotype into a single BED interval.
//!
//! Checks run in a fixed order and stop at the first violation:
//! record count, then target contig agreement, then strand agreement.
//! A failed check is an ordinary outcome and is returned as
//! [`Resolution::Failed`], never as an error.

use std::collections::BTreeSet;
use std::fmt;
use std::io::Write;
use serde::{Deserialize, Serialize};

use crate::types::{GenomicPos, RegionIdentity, ResolvedRegion, Strand};

/// Leading token of the line written in place of a region BED.
pub const FAIL_PREFIX: &str = "Fail:";

/// Read-only view of an alignment record, limited to what resolution needs.
pub trait TargetSpan {
    fn target_name(&self) -> &str;
    fn target_start(&self) -> GenomicPos;
    fn target_end(&self) -> GenomicPos;
    fn strand(&self) -> Strand;
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum FailureReason {
    CountMismatch { found: usize, expected: usize },
    ContigMismatch { contigs: Vec<String> },
    StrandMismatch,
    NoAlignments,
}

impl fmt::Display for FailureReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailureReason::CountMismatch { found, expected } => write!(
                f,
                "alignment count mismatch (found {}, expected {})",
                found, expected
            ),
            FailureReason::ContigMismatch { contigs } => write!(
                f,
                "unique regions aligned to different contigs ({})",
                contigs.join(",")
            ),
            FailureReason::StrandMismatch => f.write_str("unique regions aligned on different strands"),
            FailureReason::NoAlignments => f.write_str("no alignments to merge"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolutionFailure {
    pub identity: RegionIdentity,
    pub reason: FailureReason,
}

impl fmt::Display for ResolutionFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} : {}", FAIL_PREFIX, self.identity, self.reason)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Resolution {
    Resolved(ResolvedRegion),
    Failed(ResolutionFailure),
}

impl Resolution {
    pub fn is_resolved(&self) -> bool {
        matches!(self, Resolution::Resolved(_))
    }

    pub fn region(&self) -> Option<&ResolvedRegion> {
        match self {
            Resolution::Resolved(region) => Some(region),
            Resolution::Failed(_) => None,
        }
    }

    /// The one line that stands in for the region BED: BED6 on success,
    /// a `Fail:` notice otherwise.
    pub fn to_bed_line(&self) -> String {
        match self {
            Resolution::Resolved(region) => region.to_bed_line(),
            Resolution::Failed(failure) => failure.to_string(),
        }
    }

    pub fn write_to<W: Write>(&self, mut writer: W) -> std::io::Result<()> {
        writeln!(writer, "{}", self.to_bed_line())?;
        writer.flush()
    }
}

/// Collect the distinct values of one field across `records`.
/// Agreement means the returned set has exactly one member.
fn distinct_values<R, T, F>(records: &[R], field: F) -> BTreeSet<T>
where
    T: Ord,
    F: Fn(&R) -> T,
{
    records.iter().map(field).collect()
}

#[derive(Debug, Clone, Copy)]
pub struct RegionResolver {
    expected_count: usize,
}

impl RegionResolver {
    pub fn new(expected_count: usize) -> Self {
        Self { expected_count }
    }

    pub fn resolve<R: TargetSpan>(&self, records: &[R], identity: &RegionIdentity) -> Resolution {
        match self.check(records) {
            Ok(()) => Resolution::Resolved(Self::merge(records, identity)),
            Err(reason) => {
                log::debug!("{} failed resolution: {}", identity, reason);
                Resolution::Failed(ResolutionFailure {
                    identity: identity.clone(),
                    reason,
                })
            }
        }
    }

    fn check<R: TargetSpan>(&self, records: &[R]) -> Result<(), FailureReason> {
        if records.len() != self.expected_count {
            return Err(FailureReason::CountMismatch {
                found: records.len(),
                expected: self.expected_count,
            });
        }
        if records.is_empty() {
            return Err(FailureReason::NoAlignments);
        }

        let contigs = distinct_values(records, |r| r.target_name().to_string());
        if contigs.len() != 1 {
            return Err(FailureReason::ContigMismatch {
                contigs: contigs.into_iter().collect(),
            });
        }

        let strands = distinct_values(records, |r| char::from(r.strand()));
        if strands.len() != 1 {
            return Err(FailureReason::StrandMismatch);
        }

        Ok(())
    }

    /// Caller guarantees `records` is non-empty and passed `check`.
    fn merge<R: TargetSpan>(records: &[R], identity: &RegionIdentity) -> ResolvedRegion {
        let first = &records[0];
        let (start, end) = records[1..]
            .iter()
            .fold((first.target_start(), first.target_end()), |(start, end), r| {
                (start.min(r.target_start()), end.max(r.target_end()))
            });

        log::debug!(
            "{}: merged {} segments into {}:{}-{}",
            identity,
            records.len(),
            first.target_name(),
            start,
            end
        );

        ResolvedRegion {
            contig: first.target_name().to_string(),
            start,
            end,
            name: identity.composite_name(),
            strand: first.strand(),
        }
    }
}
