//! Projection of gene coordinates into region-local space.
//!
//! A forward region re-origins features at `region.start`. A reverse region
//! mirrors them about `region.end` and flips their strand, so genes line up
//! with the region when it is drawn reverse-complemented.

use serde::Serialize;
use thiserror::Error;

use crate::annotation::GeneFeature;
use crate::types::{LocalPos, RegionIdentity, ResolvedRegion, Strand};

#[derive(Debug, Error)]
pub enum ProjectionError {
    #[error("Projected feature {name} has start {start} not before end {end}")]
    InvertedInterval {
        name: String,
        start: LocalPos,
        end: LocalPos,
    },
    #[error("Coordinate overflow: {0}")]
    CoordinateOverflow(String),
}

/// A gene feature in region-local coordinates. Only the projector builds
/// these, so `start < end` always holds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProjectedGeneFeature(GeneFeature);

impl ProjectedGeneFeature {
    pub fn feature(&self) -> &GeneFeature {
        &self.0
    }

    pub fn into_inner(self) -> GeneFeature {
        self.0
    }

    pub fn to_bed_line(&self) -> String {
        self.0.to_bed_line()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mode {
    Forward { origin: LocalPos },
    Reverse { mirror: LocalPos },
}

pub struct CoordinateProjector<'a> {
    mode: Mode,
    span: (LocalPos, LocalPos),
    identity: &'a RegionIdentity,
}

fn to_local(pos: u64) -> Result<LocalPos, ProjectionError> {
    LocalPos::try_from(pos).map_err(|_| {
        ProjectionError::CoordinateOverflow(format!("region coordinate {} exceeds {}", pos, LocalPos::MAX))
    })
}

fn local_sub(a: LocalPos, b: LocalPos, name: &str) -> Result<LocalPos, ProjectionError> {
    a.checked_sub(b)
        .ok_or_else(|| ProjectionError::CoordinateOverflow(format!("{}: {} - {}", name, a, b)))
}

impl<'a> CoordinateProjector<'a> {
    pub fn new(region: &ResolvedRegion, identity: &'a RegionIdentity) -> Result<Self, ProjectionError> {
        let start = to_local(region.start)?;
        let end = to_local(region.end)?;
        let mode = match region.strand {
            Strand::Forward => Mode::Forward { origin: start },
            Strand::Reverse => Mode::Reverse { mirror: end },
        };
        Ok(Self {
            mode,
            span: (start, end),
            identity,
        })
    }

    pub fn is_reverse(&self) -> bool {
        matches!(self.mode, Mode::Reverse { .. })
    }

    /// Project every feature, preserving input order. Stops at the first
    /// feature whose projected interval is empty or inverted.
    pub fn project(&self, features: &[GeneFeature]) -> Result<Vec<ProjectedGeneFeature>, ProjectionError> {
        features.iter().map(|f| self.project_one(f)).collect()
    }

    pub fn project_one(&self, feature: &GeneFeature) -> Result<ProjectedGeneFeature, ProjectionError> {
        if !feature.overlaps(self.span.0, self.span.1) {
            log::debug!(
                "{} [{}, {}) lies outside region [{}, {})",
                feature.name,
                feature.start,
                feature.end,
                self.span.0,
                self.span.1
            );
        }

        let (start, end, strand) = match self.mode {
            Mode::Forward { origin } => (
                local_sub(feature.start, origin, &feature.name)?,
                local_sub(feature.end, origin, &feature.name)?,
                feature.strand,
            ),
            Mode::Reverse { mirror } => (
                local_sub(mirror, feature.end, &feature.name)?,
                local_sub(mirror, feature.start, &feature.name)?,
                feature.strand.map(Strand::flip),
            ),
        };

        let name = self.identity.feature_name(&feature.name);
        if start >= end {
            return Err(ProjectionError::InvertedInterval { name, start, end });
        }

        Ok(ProjectedGeneFeature(GeneFeature {
            name,
            start,
            end,
            strand,
            ..feature.clone()
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn region(start: u64, end: u64, strand: Strand) -> ResolvedRegion {
        ResolvedRegion {
            contig: "h1tg000001l".to_string(),
            start,
            end,
            name: "rgn1_HG002_h1".to_string(),
            strand,
        }
    }

    fn identity() -> RegionIdentity {
        RegionIdentity::new("rgn1", "HG002", "h1")
    }

    #[test]
    fn test_forward_projection() {
        let id = identity();
        let projector = CoordinateProjector::new(&region(1000, 1200, Strand::Forward), &id).unwrap();
        let gene = GeneFeature::new("GENE", 1050, 1100, Some(Strand::Forward));

        let projected = projector.project_one(&gene).unwrap();
        let f = projected.feature();
        assert_eq!((f.start, f.end), (50, 100));
        assert_eq!(f.strand, Some(Strand::Forward));
        assert_eq!(f.name, "rgn1_HG002_h1__GENE");
    }

    #[test]
    fn test_reverse_projection_flips() {
        let id = identity();
        let projector = CoordinateProjector::new(&region(1000, 1200, Strand::Reverse), &id).unwrap();
        let gene = GeneFeature::new("GENE", 1050, 1100, Some(Strand::Forward));

        let projected = projector.project_one(&gene).unwrap();
        let f = projected.feature();
        assert!(projector.is_reverse());
        assert_eq!((f.start, f.end), (100, 150));
        assert_eq!(f.strand, Some(Strand::Reverse));
    }

    #[test]
    fn test_forward_at_origin_is_identity() {
        let id = identity();
        let projector = CoordinateProjector::new(&region(0, 5000, Strand::Forward), &id).unwrap();
        let genes = vec![
            GeneFeature::new("A", 0, 10, Some(Strand::Forward)),
            GeneFeature::new("B", 4000, 4999, Some(Strand::Reverse)),
        ];

        let projected = projector.project(&genes).unwrap();
        for (orig, proj) in genes.iter().zip(&projected) {
            assert_eq!((orig.start, orig.end), (proj.feature().start, proj.feature().end));
            assert_eq!(orig.strand, proj.feature().strand);
        }
    }

    #[test]
    fn test_reverse_projection_is_involution() {
        let id = identity();
        let projector = CoordinateProjector::new(&region(0, 2000, Strand::Reverse), &id).unwrap();
        let gene = GeneFeature::new("GENE", 300, 420, Some(Strand::Reverse));

        let once = projector.project_one(&gene).unwrap().into_inner();
        assert_eq!((once.start, once.end), (1580, 1700));

        let twice = projector.project_one(&once).unwrap().into_inner();
        assert_eq!((twice.start, twice.end), (300, 420));
        assert_eq!(twice.strand, Some(Strand::Reverse));
    }

    #[test]
    fn test_overhanging_feature_goes_negative() {
        let id = identity();
        let projector = CoordinateProjector::new(&region(1000, 1200, Strand::Forward), &id).unwrap();
        let gene = GeneFeature::new("GENE", 900, 1100, None);

        let projected = projector.project_one(&gene).unwrap();
        assert_eq!((projected.feature().start, projected.feature().end), (-100, 100));
        assert_eq!(projected.feature().strand, None);
    }

    #[test]
    fn test_unstranded_stays_unstranded_on_reverse() {
        let id = identity();
        let projector = CoordinateProjector::new(&region(1000, 1200, Strand::Reverse), &id).unwrap();
        let gene = GeneFeature::new("GENE", 1050, 1100, None);

        assert_eq!(projector.project_one(&gene).unwrap().feature().strand, None);
    }

    #[test]
    fn test_preserves_order_and_passthrough_columns() {
        let id = identity();
        let projector = CoordinateProjector::new(&region(1000, 1200, Strand::Reverse), &id).unwrap();
        let mut first = GeneFeature::new("Z", 1150, 1190, Some(Strand::Reverse));
        first.label = "ENSG9".to_string();
        first.extra = vec!["lncRNA".to_string()];
        let second = GeneFeature::new("A", 1010, 1020, Some(Strand::Forward));

        let projected = projector.project(&[first, second]).unwrap();
        assert_eq!(projected[0].to_bed_line(), "rgn1_HG002_h1__Z\t10\t50\tENSG9\t.\t+\tlncRNA");
        assert_eq!(projected[1].to_bed_line(), "rgn1_HG002_h1__A\t180\t190\t.\t.\t-");
    }

    #[test]
    fn test_inverted_interval_is_fatal() {
        let id = identity();
        let projector = CoordinateProjector::new(&region(1000, 1200, Strand::Reverse), &id).unwrap();
        let good = GeneFeature::new("OK", 1050, 1100, Some(Strand::Forward));
        let empty = GeneFeature::new("EMPTY", 1100, 1100, Some(Strand::Forward));

        let err = projector.project(&[good, empty]).unwrap_err();
        assert!(matches!(
            err,
            ProjectionError::InvertedInterval { ref name, start: 100, end: 100 } if name == "rgn1_HG002_h1__EMPTY"
        ));
    }

    #[test]
    fn test_rejects_unrepresentable_region() {
        let id = identity();
        let result = CoordinateProjector::new(&region(0, u64::MAX, Strand::Forward), &id);
        assert!(matches!(result, Err(ProjectionError::CoordinateOverflow(_))));
    }

    #[test]
    fn test_extreme_coordinates_overflow_instead_of_wrapping() {
        let id = identity();
        let forward = CoordinateProjector::new(&region(1000, 1200, Strand::Forward), &id).unwrap();
        let low = GeneFeature::new("G", LocalPos::MIN, LocalPos::MIN + 10, Some(Strand::Forward));
        assert!(matches!(
            forward.project_one(&low),
            Err(ProjectionError::CoordinateOverflow(ref msg)) if msg.starts_with("G:")
        ));

        let reverse = CoordinateProjector::new(&region(1000, 1200, Strand::Reverse), &id).unwrap();
        assert!(matches!(
            reverse.project(&[low]),
            Err(ProjectionError::CoordinateOverflow(_))
        ));
    }

    #[test]
    fn test_empty_feature_list() {
        let id = identity();
        let projector = CoordinateProjector::new(&region(1000, 1200, Strand::Reverse), &id).unwrap();
        assert_eq!(projector.project(&[]).unwrap(), Vec::new());
    }
}
