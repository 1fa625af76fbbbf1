use crate::error::{Result, ScancatError};
use regex::Regex;
use std::fmt;
use std::sync::OnceLock;

fn number_regex() -> &'static Regex {
    static REGEX: OnceLock<Regex> = OnceLock::new();
    REGEX.get_or_init(|| {
        Regex::new(r"[-+]?\d*\.?\d+(?:[eE][-+]?\d+)?").expect("Failed to compile regex")
    })
}

/// In-plane voxel size in millimeters, as stored in PixelSpacing (0028,0030)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PixelSpacing {
    pub row: f64,
    pub col: f64,
}

impl PixelSpacing {
    /// Reads the first two numbers out of a raw PixelSpacing value.
    ///
    /// Scanner exports are inconsistent about separators, so `0.04\0.04`,
    /// `0.04 0.04` and `[0.04, 0.04]` all parse. Values after the second
    /// number are ignored.
    pub fn parse(raw: &str) -> Result<Self> {
        let mut values = number_regex()
            .find_iter(raw)
            .filter_map(|m| m.as_str().parse::<f64>().ok());

        match (values.next(), values.next()) {
            (Some(row), Some(col)) if row.is_finite() && col.is_finite() => {
                Ok(Self { row, col })
            }
            _ => Err(ScancatError::InvalidValue(format!(
                "PixelSpacing '{}' does not hold two numbers",
                raw.trim()
            ))),
        }
    }

    /// Cell text for the scan table; unparseable values are kept as written.
    pub fn normalize(raw: &str) -> String {
        Self::parse(raw)
            .map(|ps| ps.to_string())
            .unwrap_or_else(|_| raw.trim().to_string())
    }
}

impl fmt::Display for PixelSpacing {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}\\{}", self.row, self.col)
    }
}
