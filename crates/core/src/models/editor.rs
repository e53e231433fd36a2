use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::duration::HoldDuration;
use super::holding::Holding;

/// The three editable values of one row, as the editors currently show them.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RowEdits {
    pub hold_duration: HoldDuration,
    pub target_price: f64,
    pub stop_loss_price: f64,
}

impl RowEdits {
    /// Editor defaults for a row that hasn't been touched yet: the stored
    /// duration if it is one of the choices (else the first choice), and the
    /// stored prices or zero.
    pub fn defaults_for(holding: &Holding) -> Self {
        Self {
            hold_duration: HoldDuration::preselect(holding.expected_hold_duration.as_deref()),
            target_price: holding.target_price.unwrap_or(0.0),
            stop_loss_price: holding.stop_loss_price.unwrap_or(0.0),
        }
    }

    /// Write these values into the row.
    pub fn apply_to(&self, holding: &mut Holding) {
        holding.expected_hold_duration = Some(self.hold_duration.label().to_string());
        holding.target_price = Some(self.target_price);
        holding.stop_loss_price = Some(self.stop_loss_price);
    }
}

/// What a front end needs to draw the editors of one row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RowEditor {
    pub row: usize,
    pub symbol: String,
    pub hold_duration: HoldDuration,
    /// Index of `hold_duration` in [`HoldDuration::ALL`]
    pub hold_duration_index: usize,
    pub target_price: f64,
    pub stop_loss_price: f64,
}

impl RowEditor {
    pub fn new(row: usize, symbol: impl Into<String>, edits: RowEdits) -> Self {
        Self {
            row,
            symbol: symbol.into(),
            hold_duration: edits.hold_duration,
            hold_duration_index: edits.hold_duration.index(),
            target_price: edits.target_price,
            stop_loss_price: edits.stop_loss_price,
        }
    }

    pub fn duration_label(&self) -> String {
        format!("{} - Hold Duration", self.symbol)
    }

    pub fn target_label(&self) -> String {
        format!("{} - Target Price", self.symbol)
    }

    pub fn stop_loss_label(&self) -> String {
        format!("{} - Stop Loss", self.symbol)
    }
}

/// Editor values keyed by row index. Lives only as long as the session.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WidgetState {
    edits: BTreeMap<usize, RowEdits>,
}

impl WidgetState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, row: usize) -> Option<&RowEdits> {
        self.edits.get(&row)
    }

    /// Current editor values for a row, seeding them from the row on first access.
    pub fn entry(&mut self, row: usize, holding: &Holding) -> &mut RowEdits {
        self.edits
            .entry(row)
            .or_insert_with(|| RowEdits::defaults_for(holding))
    }

    pub fn len(&self) -> usize {
        self.edits.len()
    }

    pub fn is_empty(&self) -> bool {
        self.edits.is_empty()
    }

    pub fn clear(&mut self) {
        self.edits.clear();
    }
}
