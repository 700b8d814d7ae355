//! MovingAI `.scen` files.
//!
//! Version 1 files start with `version 1` and carry nine columns per query:
//! bucket, map name, map width, map height, start x, start y, goal x, goal y
//! and the optimal length. Unversioned (version 0) files omit the map size.

use std::path::Path;
use std::str::FromStr;

use dialgrid_core::Point;

use crate::error::LoadError;

/// One query from a scenario file.
#[derive(Debug, Clone, PartialEq)]
pub struct Experiment {
    pub bucket: u32,
    pub map: String,
    /// Map size the query was generated for; `None` in version 0 files.
    pub map_size: Option<(u32, u32)>,
    pub start: Point,
    pub goal: Point,
    /// Optimal path length listed in the file.
    pub distance: f64,
}

/// A parsed scenario file.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Scenario {
    version: u32,
    experiments: Vec<Experiment>,
}

impl Scenario {
    #[inline]
    pub fn version(&self) -> u32 {
        self.version
    }

    #[inline]
    pub fn experiments(&self) -> &[Experiment] {
        &self.experiments
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.experiments.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.experiments.is_empty()
    }
}

fn column<T: FromStr>(line: usize, name: &str, value: &str) -> Result<T, LoadError> {
    value.parse().map_err(|_| LoadError::Experiment {
        line,
        reason: format!("invalid {name} `{value}`"),
    })
}

fn parse_version(value: &str) -> Result<u32, LoadError> {
    match value.parse::<f64>() {
        Ok(v) if v == 0.0 => Ok(0),
        Ok(v) if v == 1.0 => Ok(1),
        _ => Err(LoadError::Version(value.to_string())),
    }
}

fn parse_experiment(line: usize, fields: &[&str], version: u32) -> Result<Experiment, LoadError> {
    let (map_size, coords) = if version == 1 {
        let size = (
            column(line, "map width", fields[2])?,
            column(line, "map height", fields[3])?,
        );
        (Some(size), &fields[4..])
    } else {
        (None, &fields[2..])
    };
    Ok(Experiment {
        bucket: column(line, "bucket", fields[0])?,
        map: fields[1].to_string(),
        map_size,
        start: Point::new(
            column(line, "start x", coords[0])?,
            column(line, "start y", coords[1])?,
        ),
        goal: Point::new(
            column(line, "goal x", coords[2])?,
            column(line, "goal y", coords[3])?,
        ),
        distance: column(line, "distance", coords[4])?,
    })
}

/// Parse the contents of a `.scen` file. Blank lines are skipped.
pub fn parse_scenario(text: &str) -> Result<Scenario, LoadError> {
    let mut lines = text
        .lines()
        .enumerate()
        .map(|(i, l)| (i + 1, l.trim()))
        .filter(|(_, l)| !l.is_empty())
        .peekable();

    let mut version = 0;
    if let Some(&(_, first)) = lines.peek() {
        if let Some(rest) = first.strip_prefix("version") {
            version = parse_version(rest.trim())?;
            lines.next();
        }
    }
    let columns = if version == 1 { 9 } else { 7 };

    let mut experiments = Vec::new();
    for (line, text) in lines {
        let fields: Vec<&str> = text.split_whitespace().collect();
        if fields.len() != columns {
            return Err(LoadError::Experiment {
                line,
                reason: format!("expected {columns} columns, found {}", fields.len()),
            });
        }
        experiments.push(parse_experiment(line, &fields, version)?);
    }
    log::debug!(
        "parsed version {} scenario with {} experiments",
        version,
        experiments.len()
    );
    Ok(Scenario {
        version,
        experiments,
    })
}

/// Read and parse a `.scen` file.
pub fn load_scenario(path: &Path) -> Result<Scenario, LoadError> {
    let text = std::fs::read_to_string(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    parse_scenario(&text)
}
