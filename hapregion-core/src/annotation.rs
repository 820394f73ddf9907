use crate::types::*;
use serde::{Deserialize, Serialize};

/// One row of a BED6-compatible gene table.
///
/// Column 0 is treated as the feature identifier and is the column renamed on
/// projection. Columns 3 and 4 and anything past column 5 are carried through
/// untouched.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeneFeature {
    pub name: String,
    pub start: LocalPos,
    pub end: LocalPos,
    pub label: String,
    pub score: String,
    pub strand: Option<Strand>,
    pub extra: Vec<String>,
}

impl GeneFeature {
    pub fn new<S: Into<String>>(name: S, start: LocalPos, end: LocalPos, strand: Option<Strand>) -> Self {
        Self {
            name: name.into(),
            start,
            end,
            label: ".".to_string(),
            score: ".".to_string(),
            strand,
            extra: Vec::new(),
        }
    }

    pub fn length(&self) -> LocalPos {
        self.end - self.start
    }

    pub fn overlaps(&self, start: LocalPos, end: LocalPos) -> bool {
        self.start < end && start < self.end
    }

    pub fn strand_symbol(&self) -> char {
        self.strand.map(char::from).unwrap_or('.')
    }

    pub fn to_bed_line(&self) -> String {
        let mut line = format!(
            "{}\t{}\t{}\t{}\t{}\t{}",
            self.name,
            self.start,
            self.end,
            self.label,
            self.score,
            self.strand_symbol()
        );
        for field in &self.extra {
            line.push('\t');
            line.push_str(field);
        }
        line
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bed_line_keeps_passthrough_columns() {
        let mut gene = GeneFeature::new("CYP2D6", 1050, 1100, Some(Strand::Reverse));
        gene.label = "ENSG00000100197".to_string();
        gene.score = "0".to_string();
        gene.extra = vec!["protein_coding".to_string()];

        assert_eq!(
            gene.to_bed_line(),
            "CYP2D6\t1050\t1100\tENSG00000100197\t0\t-\tprotein_coding"
        );
        assert_eq!(gene.length(), 50);
    }

    #[test]
    fn test_unstranded_and_overlap() {
        let gene = GeneFeature::new("lncRNA", -20, 30, None);
        assert_eq!(gene.strand_symbol(), '.');
        assert!(gene.overlaps(0, 10));
        assert!(!gene.overlaps(30, 40));
    }
}
