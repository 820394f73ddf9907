//! hapregion core library
//!
//! Resolves the alignments of a region of interest into a single BED interval
//! on a haplotype assembly, and projects gene annotations into that region's
//! local coordinate space for plotting.

pub mod types;
pub mod io;
pub mod annotation;
pub mod resolve;
pub mod project;

// Re-export commonly used types and functions
pub use types::{GenomicPos, LocalPos, RegionIdentity, ResolvedRegion, Strand};
pub use annotation::GeneFeature;
pub use resolve::{FailureReason, RegionResolver, Resolution, ResolutionFailure, TargetSpan, FAIL_PREFIX};
pub use project::{CoordinateProjector, ProjectedGeneFeature, ProjectionError};

/// Version information for the hapregion core library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_is_set() {
        assert!(!VERSION.is_empty());
    }
}
