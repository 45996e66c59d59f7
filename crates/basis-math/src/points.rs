//! Plain-text point files.
//!
//! One point per line, three numbers separated by whitespace and/or commas.
//! `#` starts a comment that runs to the end of the line.
//!
//! # Format
//!
//! ```text
//! # scanned fixture
//! 0.0 0.0 0.0
//! 1.5, 0.25, -3
//! 2 1 0   # trailing comment
//! ```
//!
//! # Example
//!
//! ```rust
//! use basis_math::{parse_points, Vec3};
//!
//! let points = parse_points("1 2 3\n# skip\n4,5,6\n".as_bytes()).unwrap();
//! assert_eq!(points, vec![Vec3::new(1.0, 2.0, 3.0), Vec3::new(4.0, 5.0, 6.0)]);
//! ```

use crate::Vec3;
use basis_core::{Error, Result};
use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::Path;
use tracing::debug;

/// Reads points from a file.
pub fn read_points<P: AsRef<Path>>(path: P) -> Result<Vec<Vec3>> {
    let file = File::open(path.as_ref())?;
    let points = parse_points(BufReader::new(file))?;
    debug!(path = %path.as_ref().display(), count = points.len(), "read points");
    Ok(points)
}

/// Parses points from a reader.
///
/// # Errors
///
/// [`Error::Parse`] with the 1-based line number for lines that do not hold
/// exactly three finite numbers.
pub fn parse_points<R: BufRead>(reader: R) -> Result<Vec<Vec3>> {
    let mut points = Vec::new();
    for (idx, line) in reader.lines().enumerate() {
        let line = line?;
        let data = match line.split_once('#') {
            Some((data, _)) => data,
            None => &line,
        };
        let data = data.trim();
        if data.is_empty() {
            continue;
        }
        points.push(parse_point(data).map_err(|reason| Error::parse(idx + 1, reason))?);
    }
    Ok(points)
}

/// Parses a single `x y z` / `x,y,z` triple.
pub fn parse_point(s: &str) -> std::result::Result<Vec3, String> {
    let fields: Vec<&str> = s
        .split(|c: char| c == ',' || c.is_whitespace())
        .filter(|f| !f.is_empty())
        .collect();
    if fields.len() != 3 {
        return Err(format!("expected 3 values, found {}", fields.len()));
    }

    let mut v = Vec3::ZERO;
    for (i, field) in fields.iter().enumerate() {
        let value: f32 = field
            .parse()
            .map_err(|_| format!("invalid number '{}'", field))?;
        if !value.is_finite() {
            return Err(format!("non-finite value '{}'", field));
        }
        v[i] = value;
    }
    Ok(v)
}

/// Writes points, one `x y z` line each.
pub fn write_points<P: AsRef<Path>>(path: P, points: &[Vec3]) -> Result<()> {
    let file = File::create(path.as_ref())?;
    let mut writer = BufWriter::new(file);
    for p in points {
        writeln!(writer, "{} {} {}", p.x, p.y, p.z)?;
    }
    writer.flush()?;
    Ok(())
}
