use serde::{Deserialize, Serialize};

/// Derived figures for one holding. Every field is `None` when undefined.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct HoldingPerformance {
    /// `Cost Basis Total` coerced to a number
    pub cost_basis: Option<f64>,

    /// `Current Value` coerced to a number
    pub current_price: Option<f64>,

    /// (current − cost) / cost
    pub stock_return: Option<f64>,

    /// Benchmark move from the first close on/after purchase to the latest close
    pub benchmark_return: Option<f64>,

    /// stock_return − benchmark_return
    pub alpha: Option<f64>,
}

/// Sign of alpha, used to color it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AlphaTone {
    /// Beat the benchmark (green)
    Positive,
    /// Zero or trailed the benchmark (red)
    Negative,
    /// No alpha to show (no color)
    Undefined,
}

impl AlphaTone {
    pub fn from_alpha(alpha: Option<f64>) -> Self {
        match alpha {
            Some(a) if a.is_nan() => AlphaTone::Undefined,
            Some(a) if a > 0.0 => AlphaTone::Positive,
            Some(_) => AlphaTone::Negative,
            None => AlphaTone::Undefined,
        }
    }

    /// Color name for front ends that style by name.
    pub fn color(&self) -> Option<&'static str> {
        match self {
            AlphaTone::Positive => Some("green"),
            AlphaTone::Negative => Some("red"),
            AlphaTone::Undefined => None,
        }
    }
}

/// One line of the read-only results table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PerformanceRow {
    pub row: usize,
    pub symbol: String,
    pub current_price: Option<f64>,
    pub cost_basis: Option<f64>,
    pub stock_return: Option<f64>,
    pub benchmark_return: Option<f64>,
    pub alpha: Option<f64>,
    pub alpha_tone: AlphaTone,
}
