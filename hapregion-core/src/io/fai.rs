//! Companion sequence index (`.fai`) support.
//!
//! A region of interest may be stored as several sub-sequences; each of them
//! is expected to produce exactly one alignment against the haplotype, so the
//! number of index records is the expected alignment count.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;
use anyhow::{anyhow, Context, Result};

/// Count the records of a sequence index read from `reader`.
pub fn count_index_reader<R: BufRead>(reader: R) -> Result<usize> {
    let mut count = 0;
    for (line_num, line) in reader.lines().enumerate() {
        let line = line?;
        let line = line.trim_end();
        if line.is_empty() {
            continue;
        }
        // name, length, offset, linebases, linewidth
        if line.split('\t').count() < 2 {
            return Err(anyhow!(
                "Malformed index record on line {}: {}",
                line_num + 1,
                line
            ));
        }
        count += 1;
    }
    Ok(count)
}

pub fn count_index_records<P: AsRef<Path>>(path: P) -> Result<usize> {
    let file = File::open(&path)
        .with_context(|| format!("Failed to open sequence index: {}", path.as_ref().display()))?;
    let count = count_index_reader(BufReader::new(file))
        .with_context(|| format!("Failed to read sequence index: {}", path.as_ref().display()))?;
    log::debug!("{} lists {} sequences", path.as_ref().display(), count);
    Ok(count)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{Cursor, Write};
    use tempfile::NamedTempFile;

    #[test]
    fn test_counts_non_empty_records() {
        let fai = "rgn1_part1\t5000\t12\t60\t61\nrgn1_part2\t3000\t5110\t60\t61\n\n";
        assert_eq!(count_index_reader(Cursor::new(fai)).unwrap(), 2);
    }

    #[test]
    fn test_rejects_malformed_record() {
        let fai = "rgn1_part1\t5000\t12\t60\t61\njunk\n";
        let err = count_index_reader(Cursor::new(fai)).unwrap_err();
        assert!(err.to_string().contains("line 2"));
    }

    #[test]
    fn test_count_from_file() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "rgn1\t5000\t6\t60\t61").unwrap();
        assert_eq!(count_index_records(file.path()).unwrap(), 1);
    }
}
