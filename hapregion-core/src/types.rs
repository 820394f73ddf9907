use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// 0-based, half-open position on an assembled contig.
pub type GenomicPos = u64;

/// Position in region-local space. Signed, since a feature that overhangs
/// the region projects to coordinates outside `[0, region length)`.
pub type LocalPos = i64;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Strand {
    Forward,
    Reverse,
}

impl Strand {
    pub fn flip(self) -> Self {
        match self {
            Strand::Forward => Strand::Reverse,
            Strand::Reverse => Strand::Forward,
        }
    }

    pub fn symbol(self) -> char {
        self.into()
    }
}

impl From<bool> for Strand {
    fn from(forward: bool) -> Self {
        if forward {
            Strand::Forward
        } else {
            Strand::Reverse
        }
    }
}

impl From<Strand> for char {
    fn from(strand: Strand) -> Self {
        match strand {
            Strand::Forward => '+',
            Strand::Reverse => '-',
        }
    }
}

impl FromStr for Strand {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "+" => Ok(Strand::Forward),
            "-" => Ok(Strand::Reverse),
            other => Err(other.to_string()),
        }
    }
}

impl fmt::Display for Strand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.symbol())
    }
}

/// The region/sample/haplotype triple one invocation works on.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RegionIdentity {
    pub region: String,
    pub sample: String,
    pub hap: String,
}

impl RegionIdentity {
    pub fn new<S: Into<String>>(region: S, sample: S, hap: S) -> Self {
        Self {
            region: region.into(),
            sample: sample.into(),
            hap: hap.into(),
        }
    }

    /// `{region}_{sample}_{hap}`, used as the BED name of a resolved region.
    pub fn composite_name(&self) -> String {
        format!("{}_{}_{}", self.region, self.sample, self.hap)
    }

    /// Name given to a gene feature drawn from this region.
    pub fn feature_name(&self, original: &str) -> String {
        format!("{}__{}", self.composite_name(), original)
    }

    /// Returns the first token that cannot be embedded in a BED line.
    pub fn invalid_token(&self) -> Option<&str> {
        [&self.region, &self.sample, &self.hap]
            .into_iter()
            .find(|token| token.is_empty() || token.contains(['\t', '\n', '\r']))
            .map(String::as_str)
    }
}

impl fmt::Display for RegionIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.composite_name())
    }
}

/// The single BED interval an alignment set resolves to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolvedRegion {
    pub contig: String,
    pub start: GenomicPos,
    pub end: GenomicPos,
    pub name: String,
    pub strand: Strand,
}

impl ResolvedRegion {
    pub fn length(&self) -> GenomicPos {
        self.end.saturating_sub(self.start)
    }

    /// BED6 line without trailing newline; `.` fills the score column.
    pub fn to_bed_line(&self) -> String {
        format!(
            "{}\t{}\t{}\t{}\t.\t{}",
            self.contig, self.start, self.end, self.name, self.strand
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strand_flip_and_symbols() {
        assert_eq!(Strand::Forward.flip(), Strand::Reverse);
        assert_eq!(Strand::Reverse.flip(), Strand::Forward);
        assert_eq!(Strand::Forward.symbol(), '+');
        assert_eq!("-".parse::<Strand>(), Ok(Strand::Reverse));
        assert!("x".parse::<Strand>().is_err());
    }

    #[test]
    fn test_identity_names() {
        let id = RegionIdentity::new("rgn1", "HG002", "h1");
        assert_eq!(id.composite_name(), "rgn1_HG002_h1");
        assert_eq!(id.feature_name("GENE"), "rgn1_HG002_h1__GENE");
        assert_eq!(id.invalid_token(), None);

        let bad = RegionIdentity::new("rgn\t1", "HG002", "h1");
        assert_eq!(bad.invalid_token(), Some("rgn\t1"));
    }

    #[test]
    fn test_region_bed_line() {
        let region = ResolvedRegion {
            contig: "h1tg000001l".to_string(),
            start: 10,
            end: 90,
            name: "rgn1_HG002_h1".to_string(),
            strand: Strand::Reverse,
        };
        assert_eq!(region.to_bed_line(), "h1tg000001l\t10\t90\trgn1_HG002_h1\t.\t-");
        assert_eq!(region.length(), 80);
    }
}
