use jit_perf_map::commands::validate_map_file;
use jit_perf_map::output::{find_overlaps, map_file_path, read_map, PerfMapFile, SymbolSink};
use jit_perf_map::symbols::SymbolRange;
use std::io::Write;
use tempfile::NamedTempFile;

#[test]
fn test_write_and_read_map() {
    let temp_dir = tempfile::tempdir().unwrap();
    let path = map_file_path(temp_dir.path(), 31337);

    let writer = PerfMapFile::create(&path).unwrap();
    writer.write_entry(0x7f00_1000, 0x40, "Lapp/Main;.loop", false);
    writer.write_entry(0x7f00_1040, 0x20, "Interpreter", true);
    writer.close().unwrap();

    let ranges = read_map(&path).unwrap();
    assert_eq!(
        ranges,
        vec![
            SymbolRange::new(0x7f00_1000, 0x40, "Lapp/Main;.loop"),
            SymbolRange::new(0x7f00_1040, 0x20, "Interpreter"),
        ]
    );
    assert!(find_overlaps(&ranges).is_empty());
}

#[test]
fn test_flush_now_is_visible_before_close() {
    let temp_dir = tempfile::tempdir().unwrap();
    let path = map_file_path(temp_dir.path(), 1);

    let writer = PerfMapFile::create(&path).unwrap();
    writer.write_entry(0x1000, 0x20, "stub_1", true);

    assert_eq!(std::fs::read_to_string(&path).unwrap(), "1000 20 stub_1\n");
    writer.close().unwrap();
}

#[test]
fn test_validate_map_file_counts_entries() {
    let mut file = NamedTempFile::new().unwrap();
    writeln!(file, "1000 20 stub_1").unwrap();
    writeln!(file, "1010 20 overlapping").unwrap();

    assert_eq!(validate_map_file(file.path()).unwrap(), 2);
}

#[test]
fn test_validate_map_file_rejects_garbage() {
    let mut file = NamedTempFile::new().unwrap();
    writeln!(file, "not a map line").unwrap();

    assert!(validate_map_file(file.path()).is_err());
}

#[test]
fn test_validate_map_file_saturates_covered_bytes() {
    let mut file = NamedTempFile::new().unwrap();
    writeln!(file, "0 ffffffffffffffff a").unwrap();
    writeln!(file, "10 10 b").unwrap();

    assert_eq!(validate_map_file(file.path()).unwrap(), 2);
}

#[test]
fn test_read_missing_map() {
    let temp_dir = tempfile::tempdir().unwrap();
    let err = read_map(temp_dir.path().join("perf-0.map")).unwrap_err();

    let message = err.to_string();
    assert!(message.starts_with("Failed to read symbol map"), "{}", message);
    assert!(message.contains("perf-0.map"), "{}", message);
}
