//! File format I/O modules for hapregion
//!
//! Readers and writers for the alignment, index and interval formats the
//! resolver and projector consume.

#[cfg(feature = "io-paf")] pub mod paf;
pub mod bed;
pub mod fai;

#[cfg(feature = "io-paf")] pub use paf::{AlignmentRecord, PafError, PafIterator, PafParser};
pub use bed::{BedError, LocationRecord};
pub use fai::count_index_records;
