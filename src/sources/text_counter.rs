//! Reading a labelled counter out of a `/proc`-style text file, like the
//! `Cached:` line in `/proc/meminfo`.

use std::{
    fs::File,
    io::{BufRead, BufReader},
    path::Path,
};

use anyhow::Context;

use crate::error::{MemInfoError, MemInfoResult};

/// Opens `path` and returns the number following the first line starting with
/// `label`. The value is returned as-is; the caller knows its unit.
pub fn read_counter(path: &Path, label: &str) -> MemInfoResult<u64> {
    let file = File::open(path).with_context(|| format!("failed to open {}", path.display()))?;

    find_counter(BufReader::new(file), label)
}

/// Scans `reader` line by line for `label` and parses the integer token after
/// it. Running out of input is [`MemInfoError::NotFound`]; a read error or a
/// malformed value is a platform error.
pub fn find_counter(mut reader: impl BufRead, label: &str) -> MemInfoResult<u64> {
    let mut line = String::new();

    loop {
        line.clear();
        let read = reader
            .read_line(&mut line)
            .with_context(|| format!("failed while looking for `{label}`"))?;

        if read == 0 {
            return Err(MemInfoError::NotFound(format!("`{label}` counter")));
        }

        if let Some(rest) = line.strip_prefix(label) {
            let token = rest.split_ascii_whitespace().next().unwrap_or_default();

            return token.parse::<u64>().map_err(|err| {
                MemInfoError::platform(format!("bad value {token:?} for `{label}`: {err}"))
            });
        }
    }
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use super::*;
    use crate::error::ErrorKind;

    const MEMINFO: &str = "MemTotal:       16314248 kB
MemFree:         1233712 kB
MemAvailable:    9884052 kB
Buffers:          512044 kB
Cached:          7741368 kB
SwapCached:         4032 kB
Active:          6051384 kB
SwapTotal:       8388604 kB
SwapFree:        8120060 kB
";

    #[test]
    fn test_find_counter() {
        let counter = |label| find_counter(Cursor::new(MEMINFO), label).unwrap();

        assert_eq!(counter("MemTotal:"), 16_314_248);
        assert_eq!(counter("Buffers:"), 512_044);
        assert_eq!(counter("Cached:"), 7_741_368);
        assert_eq!(counter("SwapCached:"), 4032);
        assert_eq!(counter("SwapFree:"), 8_120_060);
    }

    #[test]
    fn test_synthetic_cached_line() {
        let cached = find_counter(Cursor::new("Cached:    2048 kB\n"), "Cached:").unwrap();
        assert_eq!(cached, 2048);
    }

    #[test]
    fn test_no_trailing_newline() {
        let cached = find_counter(Cursor::new("Cached: 12 kB"), "Cached:").unwrap();
        assert_eq!(cached, 12);
    }

    #[test]
    fn test_missing_label() {
        let err = find_counter(Cursor::new(MEMINFO), "Hugepagesize:").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound);

        let err = find_counter(Cursor::new(""), "Cached:").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound);
    }

    #[test]
    fn test_malformed_value() {
        let err = find_counter(Cursor::new("Cached: lots kB\n"), "Cached:").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::PlatformError);

        let err = find_counter(Cursor::new("Cached:\n"), "Cached:").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::PlatformError);
    }

    #[test]
    fn test_missing_file() {
        let err = read_counter(Path::new("/this/path/does/not/exist"), "Cached:").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::PlatformError);
        assert!(err.raw_os_error().is_some());
    }
}
