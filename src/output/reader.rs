//! Symbol map reader.
//!
//! Parses `perf-<pid>.map` files back into ranges, for validation.

use crate::symbols::SymbolRange;
use crate::utils::error::OutputError;
use log::debug;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

/// Read every range of a symbol map file
///
/// **Public** - used by the validate command and tests
///
/// # Errors
/// * `OutputError::ReadFailed` - File cannot be opened or read
/// * `OutputError::MalformedLine` - A line does not follow the map format
pub fn read_map(input_path: impl AsRef<Path>) -> Result<Vec<SymbolRange>, OutputError> {
    let input_path = input_path.as_ref();

    debug!("Reading symbol map from: {}", input_path.display());

    let read_failed = |source| OutputError::ReadFailed {
        path: input_path.to_path_buf(),
        source,
    };

    let file = File::open(input_path).map_err(read_failed)?;

    let mut ranges = Vec::new();
    for (index, line) in BufReader::new(file).lines().enumerate() {
        let line = line.map_err(read_failed)?;
        ranges.push(parse_map_line(&line, index + 1)?);
    }

    debug!("Symbol map loaded: {} entries", ranges.len());

    Ok(ranges)
}

/// Parse one map line (`<hex address> <hex length> <label>`)
///
/// The label is everything after the second space and may itself contain
/// spaces.
pub fn parse_map_line(line: &str, line_number: usize) -> Result<SymbolRange, OutputError> {
    let malformed = |reason: &str| OutputError::MalformedLine {
        line: line_number,
        reason: reason.to_string(),
    };

    let mut fields = line.splitn(3, ' ');
    let address = fields
        .next()
        .filter(|f| !f.is_empty())
        .ok_or_else(|| malformed("missing address"))?;
    let length = fields.next().ok_or_else(|| malformed("missing length"))?;
    let label = fields.next().ok_or_else(|| malformed("missing label"))?;

    let address =
        u64::from_str_radix(address, 16).map_err(|_| malformed("address is not hexadecimal"))?;
    let length =
        u64::from_str_radix(length, 16).map_err(|_| malformed("length is not hexadecimal"))?;

    Ok(SymbolRange::new(address, length, label))
}

/// Pairs of ranges that overlap, by index into `ranges`
///
/// Ranges are compared in address order; zero-length ranges never overlap.
pub fn find_overlaps(ranges: &[SymbolRange]) -> Vec<(usize, usize)> {
    let mut order: Vec<usize> = (0..ranges.len()).filter(|&i| ranges[i].length > 0).collect();
    order.sort_by_key(|&i| (ranges[i].address, ranges[i].end()));

    let mut overlaps = Vec::new();
    let mut furthest: Option<usize> = None;
    for &i in &order {
        if let Some(prev) = furthest {
            if ranges[i].address < ranges[prev].end() {
                overlaps.push((prev, i));
            }
            if ranges[i].end() > ranges[prev].end() {
                furthest = Some(i);
            }
        } else {
            furthest = Some(i);
        }
    }

    overlaps
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_parse_map_line() {
        let range = parse_map_line("7f00a0 1c LFoo;.bar_[i]->LFoo;.baz_[j]", 1).unwrap();
        assert_eq!(range, SymbolRange::new(0x7f00a0, 0x1c, "LFoo;.bar_[i]->LFoo;.baz_[j]"));
    }

    #[test]
    fn test_parse_map_line_label_with_spaces() {
        let range = parse_map_line("1000 20 Interpreter entry stub", 1).unwrap();
        assert_eq!(range.label, "Interpreter entry stub");
    }

    #[test]
    fn test_parse_map_line_errors() {
        assert!(parse_map_line("", 1).is_err());
        assert!(parse_map_line("1000", 1).is_err());
        assert!(parse_map_line("1000 20", 1).is_err());
        assert!(parse_map_line("0x1000 20 x", 1).is_err());
        assert!(parse_map_line("1000 zz x", 4).is_err());
    }

    #[test]
    fn test_read_map() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "1000 20 stub_1").unwrap();
        writeln!(file, "1020 10 LFoo;.bar").unwrap();

        let ranges = read_map(file.path()).unwrap();
        assert_eq!(ranges.len(), 2);
        assert_eq!(ranges[1], SymbolRange::new(0x1020, 0x10, "LFoo;.bar"));
    }

    #[test]
    fn test_find_overlaps() {
        let ranges = vec![
            SymbolRange::new(0x1000, 0x20, "a"),
            SymbolRange::new(0x1020, 0x10, "b"),
            SymbolRange::new(0x1010, 0x4, "c"),
            SymbolRange::new(0x2000, 0, "empty"),
        ];
        assert_eq!(find_overlaps(&ranges), vec![(0, 2)]);
    }

    #[test]
    fn test_find_overlaps_tiled() {
        let ranges = vec![
            SymbolRange::new(0x1000, 0x20, "a"),
            SymbolRange::new(0x1020, 0x10, "b"),
        ];
        assert!(find_overlaps(&ranges).is_empty());
    }
}
