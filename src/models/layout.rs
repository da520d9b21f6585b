//! Static venue description: grid dimensions, seat categories and pricing.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use thiserror::Error;
use validator::{Validate, ValidationError, ValidationErrors};

use super::seat::{SeatKey, SeatType};

#[derive(Debug, Error)]
pub enum LayoutError {
    #[error("invalid seat layout: {0}")]
    Invalid(#[from] ValidationErrors),
}

/// Geometry and seat categories of a venue. Immutable once a grid is built.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
#[validate(schema(function = "validate_layout_indices"))]
pub struct SeatConfig {
    pub rows: usize,
    pub columns: usize,
    pub row_labels: Vec<String>,
    #[serde(default)]
    pub vip_rows: BTreeSet<usize>,
    #[serde(default)]
    pub vip_columns: BTreeSet<usize>,
    #[serde(default)]
    pub accessible_seats: BTreeSet<SeatKey>,
    #[serde(default)]
    pub discount_rows: BTreeSet<usize>,
    /// The aisle sits between this column and the next one.
    #[serde(default)]
    pub aisle_after_column: Option<usize>,
}

impl Default for SeatConfig {
    /// The stock 15x12 theater: VIP block J-L / 3-10, wheelchair spaces at
    /// both ends of row F, cheap rows A-B and an aisle after seat 6.
    fn default() -> Self {
        Self {
            rows: 15,
            columns: 12,
            row_labels: ('A'..='O').map(String::from).collect(),
            vip_rows: BTreeSet::from([9, 10, 11]),
            vip_columns: (2..=9).collect(),
            accessible_seats: BTreeSet::from([
                SeatKey::new(5, 0),
                SeatKey::new(5, 1),
                SeatKey::new(5, 10),
                SeatKey::new(5, 11),
            ]),
            discount_rows: BTreeSet::from([0, 1]),
            aisle_after_column: Some(5),
        }
    }
}

impl SeatConfig {
    /// Uniform layout without VIP, accessible or discount seats and no aisle.
    /// Rows are labelled A, B, ... Z, AA, AB, ...
    pub fn plain(rows: usize, columns: usize) -> Self {
        Self {
            rows,
            columns,
            row_labels: (0..rows).map(spreadsheet_label).collect(),
            vip_rows: BTreeSet::new(),
            vip_columns: BTreeSet::new(),
            accessible_seats: BTreeSet::new(),
            discount_rows: BTreeSet::new(),
            aisle_after_column: None,
        }
    }

    pub fn with_aisle_after(mut self, column: usize) -> Self {
        self.aisle_after_column = Some(column);
        self
    }

    /// Accessible beats VIP, VIP beats normal.
    pub fn seat_type_at(&self, row: usize, col: usize) -> SeatType {
        if self.accessible_seats.contains(&SeatKey::new(row, col)) {
            SeatType::Accessible
        } else if self.vip_rows.contains(&row) && self.vip_columns.contains(&col) {
            SeatType::Vip
        } else {
            SeatType::Normal
        }
    }

    pub fn is_discount_row(&self, row: usize) -> bool {
        self.discount_rows.contains(&row)
    }

    pub fn has_accessible_in_row(&self, row: usize) -> bool {
        self.accessible_seats.iter().any(|key| key.row == row)
    }

    /// True when the aisle separates `col - 1` from `col`.
    pub fn aisle_before(&self, col: usize) -> bool {
        self.aisle_after_column
            .is_some_and(|aisle| col == aisle + 1)
    }

    /// Same aisle segment, i.e. no aisle between the two columns.
    pub fn same_segment(&self, a: usize, b: usize) -> bool {
        match self.aisle_after_column {
            Some(aisle) => (a <= aisle) == (b <= aisle),
            None => true,
        }
    }

    /// Human facing seat id: row label followed by the 1-based seat number.
    pub fn seat_label(&self, row: usize, col: usize) -> String {
        let label = self.row_labels.get(row).map(String::as_str).unwrap_or("?");
        format!("{}{}", label, col + 1)
    }

    /// Resolves ids such as `F11` back to grid coordinates.
    pub fn parse_seat_label(&self, id: &str) -> Option<SeatKey> {
        let id = id.trim();
        self.row_labels
            .iter()
            .enumerate()
            .filter(|(_, label)| !label.is_empty())
            .filter_map(|(row, label)| {
                let number = strip_prefix_ignore_case(id, label)?;
                let col = number.parse::<usize>().ok()?.checked_sub(1)?;
                (col < self.columns).then_some((label.len(), SeatKey::new(row, col)))
            })
            // longest label wins so that "AA3" is not read as "A" + "A3"
            .max_by_key(|(len, _)| *len)
            .map(|(_, key)| key)
    }

    pub fn validate_layout(&self) -> Result<(), LayoutError> {
        self.validate()?;
        Ok(())
    }
}

fn strip_prefix_ignore_case<'a>(id: &'a str, prefix: &str) -> Option<&'a str> {
    let head = id.get(..prefix.len())?;
    head.eq_ignore_ascii_case(prefix).then(|| &id[prefix.len()..])
}

fn spreadsheet_label(mut index: usize) -> String {
    let mut label = Vec::new();
    loop {
        label.push(b'A' + (index % 26) as u8);
        if index < 26 {
            break;
        }
        index = index / 26 - 1;
    }
    label.reverse();
    String::from_utf8_lossy(&label).into_owned()
}

fn out_of_range(code: &'static str, message: String) -> ValidationError {
    ValidationError::new(code).with_message(message.into())
}

fn validate_layout_indices(config: &SeatConfig) -> Result<(), ValidationError> {
    if config.row_labels.len() != config.rows {
        return Err(out_of_range(
            "row_labels",
            format!(
                "{} row labels for {} rows",
                config.row_labels.len(),
                config.rows
            ),
        ));
    }

    let rows = [("vip_rows", &config.vip_rows), ("discount_rows", &config.discount_rows)];
    for (field, set) in rows {
        if let Some(row) = set.iter().find(|&&row| row >= config.rows) {
            return Err(out_of_range(
                "row_out_of_range",
                format!("{field} contains row {row}, layout has {} rows", config.rows),
            ));
        }
    }

    if let Some(col) = config.vip_columns.iter().find(|&&col| col >= config.columns) {
        return Err(out_of_range(
            "column_out_of_range",
            format!("vip_columns contains column {col}, layout has {} columns", config.columns),
        ));
    }

    if let Some(key) = config
        .accessible_seats
        .iter()
        .find(|key| key.row >= config.rows || key.col >= config.columns)
    {
        return Err(out_of_range(
            "seat_out_of_range",
            format!("accessible seat ({}, {}) is outside the grid", key.row, key.col),
        ));
    }

    if let Some(aisle) = config.aisle_after_column.filter(|&aisle| aisle >= config.columns) {
        return Err(out_of_range(
            "column_out_of_range",
            format!("aisle after column {aisle}, layout has {} columns", config.columns),
        ));
    }

    Ok(())
}

/// Ticket prices per category. The discount price only applies to normal
/// seats in discount rows.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[validate(schema(function = "validate_finite_prices"))]
pub struct Pricing {
    #[validate(range(min = 0.0))]
    pub normal: f64,
    #[validate(range(min = 0.0))]
    pub vip: f64,
    #[validate(range(min = 0.0))]
    pub accessible: f64,
    #[validate(range(min = 0.0))]
    pub discount: f64,
}

impl Default for Pricing {
    fn default() -> Self {
        Self {
            normal: 10.00,
            vip: 15.00,
            accessible: 10.00,
            discount: 7.50,
        }
    }
}

impl Pricing {
    pub fn price_for(&self, seat_type: SeatType, is_discount: bool) -> f64 {
        match seat_type {
            SeatType::Normal if is_discount => self.discount,
            SeatType::Normal => self.normal,
            SeatType::Vip => self.vip,
            SeatType::Accessible => self.accessible,
        }
    }

    pub fn validate_pricing(&self) -> Result<(), LayoutError> {
        self.validate()?;
        Ok(())
    }
}

// range() lets NaN through
fn validate_finite_prices(pricing: &Pricing) -> Result<(), ValidationError> {
    let amounts = [pricing.normal, pricing.vip, pricing.accessible, pricing.discount];
    if amounts.iter().all(|amount| amount.is_finite()) {
        Ok(())
    } else {
        Err(out_of_range("price_not_finite", "prices must be finite amounts".to_string()))
    }
}
