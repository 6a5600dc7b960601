//! Manufacturer Power-Curve Sheets
//!
//! ## Sheet Layout
//!
//! ```text
//! ws, P_095, P_100, P_1225, P_127
//! 3,  18.1,  19.0,  23.3,   24.2
//! 4,  60.7,  63.9,  78.3,   81.2
//! ...
//! ```
//!
//! The first column is wind speed. Every other header carries the density
//! it was published for, encoded as digits. The long form is one
//! [`PowerCurveEntry`] per non-empty cell, sorted by (air density, wind speed).
//!
//! ## Density Codes
//!
//! Sheets rarely write `1.225` in a header. The common convention strips the
//! decimal point: all digits are concatenated into an integer, and
//!
//! ```text
//! code > 1000  →  code / 1000      "P_1225" → 1.225
//! otherwise    →  code / 100       "P_095"  → 0.95, "P_100" → 1.00
//! ```
//!
//! This is a property of one family of sheets, not of physics, and it
//! silently mis-decodes anything else (`"P_0975"` becomes 9.75). When the
//! encoding is known, pass a [`DensityCodec::Explicit`] map instead.

use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::fmt::Write as _;

use serde::{Deserialize, Serialize};
use windguard_core::{AnalysisError, AnalysisResult};

use crate::PowerCurveEntry;

/// Tolerance for treating two decoded densities or speeds as the same
const SAME_VALUE_TOL: f64 = 1e-9;

fn mismatch(reason: &'static str) -> AnalysisError {
    AnalysisError::FormatMismatch { reason }
}

/// A sheet as read from disk: header labels and numeric cells.
///
/// Empty and `NA` cells are `None`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WideSheet {
    /// Column labels, wind speed first
    pub headers: Vec<String>,
    /// Data rows, same width as `headers`
    pub rows: Vec<Vec<Option<f64>>>,
}

impl WideSheet {
    /// Parse comma-separated text. Blank lines are ignored.
    pub fn parse_csv(text: &str) -> AnalysisResult<Self> {
        let mut lines = text.lines().map(str::trim).filter(|l| !l.is_empty());

        let header_line = lines.next().ok_or(mismatch("empty sheet"))?;
        let headers: Vec<String> = header_line
            .split(',')
            .map(|h| h.trim().trim_matches('"').to_string())
            .collect();

        let rows = lines
            .map(|line| line.split(',').map(parse_cell).collect())
            .collect::<AnalysisResult<Vec<Vec<Option<f64>>>>>()?;

        let sheet = Self { headers, rows };
        sheet.check_shape()?;
        Ok(sheet)
    }

    /// Render as comma-separated text; empty cells are written as `NA`
    pub fn to_csv(&self) -> String {
        let mut out = self.headers.join(",");
        for row in &self.rows {
            out.push('\n');
            for (i, cell) in row.iter().enumerate() {
                if i > 0 {
                    out.push(',');
                }
                match cell {
                    Some(v) => {
                        let _ = write!(out, "{v}");
                    }
                    None => out.push_str("NA"),
                }
            }
        }
        out
    }

    fn check_shape(&self) -> AnalysisResult<()> {
        if self.headers.len() < 2 {
            return Err(mismatch("sheet needs a wind speed column and a density column"));
        }
        if self.rows.is_empty() {
            return Err(mismatch("sheet has no data rows"));
        }
        if self.rows.iter().any(|r| r.len() != self.headers.len()) {
            return Err(mismatch("ragged row"));
        }
        Ok(())
    }
}

fn parse_cell(raw: &str) -> AnalysisResult<Option<f64>> {
    let cell = raw.trim().trim_matches('"');
    if cell.is_empty() || cell.eq_ignore_ascii_case("na") {
        return Ok(None);
    }
    match cell.parse::<f64>() {
        Ok(value) if value.is_finite() => Ok(Some(value)),
        _ => Err(mismatch("unparseable numeric cell")),
    }
}

/// How column headers map to physical air density
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DensityCodec {
    /// Concatenate header digits; `> 1000` divides by 1000, else by 100
    #[default]
    Heuristic,
    /// Header label → density (kg/m³), supplied with the sheet
    Explicit(BTreeMap<String, f64>),
}

impl DensityCodec {
    /// Density (kg/m³) for a column header
    pub fn decode(&self, label: &str) -> AnalysisResult<f64> {
        let density = match self {
            DensityCodec::Heuristic => decode_density_code(label)?,
            DensityCodec::Explicit(map) => *map
                .get(label.trim())
                .ok_or(mismatch("column header missing from density map"))?,
        };
        if density.is_finite() && density > 0.0 {
            Ok(density)
        } else {
            Err(mismatch("density code does not decode to a positive density"))
        }
    }
}

/// Heuristic decoding of a header such as `"P_1225"` into 1.225 kg/m³
pub fn decode_density_code(label: &str) -> AnalysisResult<f64> {
    let digits: String = label.chars().filter(char::is_ascii_digit).collect();
    if digits.is_empty() {
        return Err(mismatch("column header has no density code"));
    }
    let code: u64 = digits
        .parse()
        .map_err(|_| mismatch("density code out of range"))?;
    let density = if code > 1000 {
        code as f64 / 1000.0
    } else {
        code as f64 / 100.0
    };
    Ok(density)
}

/// One density column of the sheet
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DensityColumn {
    /// Original header
    pub label: String,
    /// Decoded density (kg/m³)
    pub density: f64,
}

/// Canonical long-form power curve
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PowerCurveTable {
    wind_speed_label: String,
    columns: Vec<DensityColumn>,
    row_speeds: Vec<f64>,
    entries: Vec<PowerCurveEntry>,
}

impl PowerCurveTable {
    /// Parse CSV text and reshape it
    pub fn from_csv(text: &str, codec: &DensityCodec) -> AnalysisResult<Self> {
        Self::from_wide(&WideSheet::parse_csv(text)?, codec)
    }

    /// Reshape a wide sheet into long form
    pub fn from_wide(sheet: &WideSheet, codec: &DensityCodec) -> AnalysisResult<Self> {
        sheet.check_shape()?;

        let columns = sheet.headers[1..]
            .iter()
            .map(|label| {
                Ok(DensityColumn {
                    label: label.clone(),
                    density: codec.decode(label)?,
                })
            })
            .collect::<AnalysisResult<Vec<_>>>()?;
        if has_near_duplicates(columns.iter().map(|c| c.density)) {
            return Err(mismatch("duplicate density column"));
        }

        let row_speeds = sheet
            .rows
            .iter()
            .map(|row| row[0].ok_or(mismatch("missing wind speed")))
            .collect::<AnalysisResult<Vec<f64>>>()?;
        if has_near_duplicates(row_speeds.iter().copied()) {
            return Err(mismatch("duplicate wind speed row"));
        }

        let mut entries = Vec::with_capacity(sheet.rows.len() * columns.len());
        for (row, &wind_speed) in sheet.rows.iter().zip(&row_speeds) {
            for (cell, column) in row[1..].iter().zip(&columns) {
                if let Some(power) = *cell {
                    entries.push(PowerCurveEntry::new(wind_speed, column.density, power));
                }
            }
        }
        entries.sort_by(entry_order);

        log::debug!(
            "power curve: {} speeds x {} densities, {} entries",
            row_speeds.len(),
            columns.len(),
            entries.len()
        );

        Ok(Self {
            wind_speed_label: sheet.headers[0].clone(),
            columns,
            row_speeds,
            entries,
        })
    }

    /// Rebuild the wide sheet with the original labels and row order
    pub fn to_wide(&self) -> WideSheet {
        let mut headers = Vec::with_capacity(self.columns.len() + 1);
        headers.push(self.wind_speed_label.clone());
        headers.extend(self.columns.iter().map(|c| c.label.clone()));

        let rows = self
            .row_speeds
            .iter()
            .map(|&ws| {
                let mut row = Vec::with_capacity(headers.len());
                row.push(Some(ws));
                row.extend(self.columns.iter().map(|c| self.power_at(ws, c.density)));
                row
            })
            .collect();

        WideSheet { headers, rows }
    }

    /// Entries sorted by (air density, wind speed)
    pub fn entries(&self) -> &[PowerCurveEntry] {
        &self.entries
    }

    /// Density columns in sheet order
    pub fn columns(&self) -> &[DensityColumn] {
        &self.columns
    }

    /// Published densities, ascending
    pub fn densities(&self) -> Vec<f64> {
        let mut densities: Vec<f64> = self.columns.iter().map(|c| c.density).collect();
        densities.sort_by(f64::total_cmp);
        densities
    }

    /// Published wind speeds, ascending
    pub fn wind_speeds(&self) -> Vec<f64> {
        let mut speeds = self.row_speeds.clone();
        speeds.sort_by(f64::total_cmp);
        speeds
    }

    /// Entries of the column closest to `density`
    pub fn column(&self, density: f64) -> Vec<PowerCurveEntry> {
        let nearest = self
            .columns
            .iter()
            .map(|c| c.density)
            .min_by(|a, b| (a - density).abs().total_cmp(&(b - density).abs()));
        match nearest {
            Some(d) => self
                .entries
                .iter()
                .filter(|e| e.air_density == d)
                .copied()
                .collect(),
            None => Vec::new(),
        }
    }

    /// Exact lookup of a published value
    pub fn power_at(&self, wind_speed: f64, air_density: f64) -> Option<f64> {
        let key = PowerCurveEntry::new(wind_speed, air_density, 0.0);
        self.entries
            .binary_search_by(|e| entry_order(e, &key))
            .ok()
            .map(|i| self.entries[i].power)
    }

    /// Number of published values
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True when every cell was empty
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

fn entry_order(a: &PowerCurveEntry, b: &PowerCurveEntry) -> Ordering {
    a.air_density
        .total_cmp(&b.air_density)
        .then(a.wind_speed.total_cmp(&b.wind_speed))
}

fn has_near_duplicates(values: impl Iterator<Item = f64>) -> bool {
    let mut sorted: Vec<f64> = values.collect();
    sorted.sort_by(f64::total_cmp);
    sorted.windows(2).any(|w| (w[1] - w[0]).abs() < SAME_VALUE_TOL)
}
