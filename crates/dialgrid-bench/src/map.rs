//! MovingAI `.map` files.
//!
//! ```text
//! type octile
//! height 3
//! width 4
//! map
//! ..@.
//! .T..
//! ....
//! ```
//!
//! `.`, `G` and `S` are traversable; every other character is blocked.
//! Whitespace inside the map body is skipped.

use std::iter::Enumerate;
use std::path::Path;
use std::str::Lines;

use dialgrid_core::{GridMap, is_open_tile};

use crate::error::LoadError;

/// Header reader that remembers the current line for error reports.
struct Header<'a> {
    lines: Enumerate<Lines<'a>>,
    line: usize,
}

impl<'a> Header<'a> {
    fn field(&mut self, key: &'static str) -> Result<&'a str, LoadError> {
        let found = match self.lines.next() {
            Some((i, text)) => {
                self.line = i + 1;
                text.trim()
            }
            None => {
                self.line += 1;
                ""
            }
        };
        found
            .strip_prefix(key)
            .filter(|rest| rest.is_empty() || rest.starts_with(char::is_whitespace))
            .map(str::trim)
            .ok_or_else(|| LoadError::Header {
                line: self.line,
                expected: key,
                found: found.to_string(),
            })
    }

    fn number(&mut self, key: &'static str) -> Result<u32, LoadError> {
        let value = self.field(key)?;
        value.parse().map_err(|_| LoadError::Header {
            line: self.line,
            expected: key,
            found: format!("{key} {value}"),
        })
    }
}

/// Parse the contents of a `.map` file.
pub fn parse_map(text: &str) -> Result<GridMap, LoadError> {
    let mut header = Header {
        lines: text.lines().enumerate(),
        line: 0,
    };
    let kind = header.field("type")?;
    if kind != "octile" {
        return Err(LoadError::MapType(kind.to_string()));
    }
    let height = header.number("height")?;
    let width = header.number("width")?;
    header.field("map")?;

    let expected = width as usize * height as usize;
    let bits: Vec<bool> = header
        .lines
        .flat_map(|(_, row)| row.chars())
        .filter(|c| !c.is_whitespace())
        .take(expected)
        .map(is_open_tile)
        .collect();
    if bits.len() < expected {
        return Err(LoadError::Truncated {
            expected,
            found: bits.len(),
        });
    }
    let map = GridMap::from_bits(bits, width, height)?;
    log::debug!(
        "parsed {}x{} map, {} open cells",
        width,
        height,
        map.bits().iter().filter(|b| **b).count()
    );
    Ok(map)
}

/// Read and parse a `.map` file.
pub fn load_map(path: &Path) -> Result<GridMap, LoadError> {
    let text = std::fs::read_to_string(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    parse_map(&text)
}

#[cfg(test)]
mod tests {
    use dialgrid_core::Point;

    use super::*;

    const SAMPLE: &str = "type octile\nheight 3\nwidth 4\nmap\n..@.\n.T..\n...G\n";

    #[test]
    fn parses_header_and_cells() {
        let map = parse_map(SAMPLE).unwrap();
        assert_eq!((map.width(), map.height()), (4, 3));
        assert!(!map.get(Point::new(2, 0)));
        assert!(!map.get(Point::new(1, 1)));
        assert!(map.get(Point::new(3, 2)));
        assert_eq!(map.bits().iter().filter(|b| !**b).count(), 2);
    }

    #[test]
    fn tolerates_crlf_and_wrapped_rows() {
        let text = "type octile\r\nheight 2\r\nwidth 3\r\nmap\r\n.. @\r\n\r\nS.\r\n.\r\n";
        let map = parse_map(text).unwrap();
        assert!(!map.get(Point::new(2, 0)));
        assert!(map.get(Point::new(0, 1)));
    }

    #[test]
    fn header_errors_name_the_line() {
        let err = parse_map("type octile\nheight x\nwidth 4\nmap\n").unwrap_err();
        assert!(matches!(err, LoadError::Header { line: 2, expected: "height", .. }));
        let err = parse_map("type octile\nwidth 4\nheight 3\nmap\n").unwrap_err();
        assert!(matches!(err, LoadError::Header { line: 2, .. }));
        let err = parse_map("type octile\nheight 1\nwidth 1\n").unwrap_err();
        assert!(matches!(err, LoadError::Header { line: 4, expected: "map", .. }));
        // `heights` is not `height`.
        let err = parse_map("type octile\nheights 1\n").unwrap_err();
        assert!(matches!(err, LoadError::Header { line: 2, .. }));
    }

    #[test]
    fn rejects_other_types_and_short_bodies() {
        assert!(matches!(parse_map("type hex\n"), Err(LoadError::MapType(t)) if t == "hex"));
        let err = parse_map("type octile\nheight 2\nwidth 2\nmap\n...\n").unwrap_err();
        assert!(matches!(err, LoadError::Truncated { expected: 4, found: 3 }));
    }

    #[test]
    fn missing_file_is_io_error() {
        let err = load_map(Path::new("/nonexistent/dialgrid/test.map")).unwrap_err();
        assert!(matches!(err, LoadError::Io { .. }));
        assert!(err.to_string().contains("test.map"));
    }
}
