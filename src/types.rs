use serde::{Deserialize, Deserializer, Serialize};

use crate::error::CutError;

/// Tolerance used for every width comparison.
pub const EPS: f64 = 1e-9;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ParentRoll {
    pub width: f64,
}

impl ParentRoll {
    pub fn new(width: f64) -> Self {
        Self { width }
    }
}

impl std::fmt::Display for ParentRoll {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.width)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Demand {
    pub width: f64,
    #[serde(deserialize_with = "deserialize_u32_from_number")]
    pub qty: u32,
}

impl Demand {
    pub fn new(width: f64, qty: u32) -> Self {
        Self { width, qty }
    }

    pub fn volume(&self) -> f64 {
        self.width * self.qty as f64
    }

    pub fn fits_in(&self, parent: &ParentRoll) -> bool {
        self.width <= parent.width + EPS
    }
}

/// Accepts quantities sent as `4` or `4.0`, rejecting fractions and negatives.
pub fn deserialize_u32_from_number<'de, D>(deserializer: D) -> Result<u32, D::Error>
where
    D: Deserializer<'de>,
{
    let value = f64::deserialize(deserializer)?;
    if value.is_finite() && value >= 0.0 && value.fract() == 0.0 && value <= u32::MAX as f64 {
        Ok(value as u32)
    } else {
        Err(serde::de::Error::custom(format!(
            "expected a non-negative whole number, got {value}"
        )))
    }
}

/// Merges duplicate widths (summing quantities) and orders the result by
/// descending width. Applying it to its own output is a no-op.
pub fn aggregate_demands<I>(raw: I) -> Vec<Demand>
where
    I: IntoIterator<Item = Demand>,
{
    let mut demands: Vec<Demand> = raw.into_iter().collect();
    demands.sort_by(|a, b| b.width.total_cmp(&a.width));

    let mut merged: Vec<Demand> = Vec::with_capacity(demands.len());
    for d in demands {
        match merged.last_mut() {
            Some(last) if last.width == d.width => last.qty = last.qty.saturating_add(d.qty),
            _ => merged.push(d),
        }
    }
    merged
}

pub fn validate_parent(parent: &ParentRoll) -> Result<(), CutError> {
    if parent.width.is_finite() && parent.width > 0.0 {
        Ok(())
    } else {
        Err(CutError::InvalidParent(parent.width))
    }
}

/// Every piece must be a finite positive width no larger than the parent roll.
pub fn validate_demands(demands: &[Demand], parent: &ParentRoll) -> Result<(), CutError> {
    validate_parent(parent)?;
    for d in demands {
        if !d.width.is_finite() || d.width <= 0.0 || !d.fits_in(parent) {
            return Err(CutError::InvalidDemand {
                width: d.width,
                parent: parent.width,
            });
        }
    }
    Ok(())
}

/// One parent roll's cutting pattern.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RollPlan {
    pub pieces: Vec<f64>,
    pub waste: f64,
}

impl RollPlan {
    /// Builds a plan whose waste is whatever the pieces leave of the parent width.
    pub fn from_pieces(pieces: Vec<f64>, parent_width: f64) -> Self {
        let used: f64 = pieces.iter().sum();
        Self {
            pieces,
            waste: (parent_width - used).max(0.0),
        }
    }

    pub fn used_width(&self) -> f64 {
        self.pieces.iter().sum()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SolutionSource {
    Ilp,
    Greedy,
}

impl std::fmt::Display for SolutionSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SolutionSource::Ilp => write!(f, "ilp"),
            SolutionSource::Greedy => write!(f, "greedy"),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Solution {
    pub rolls: Vec<RollPlan>,
    pub parent: ParentRoll,
    pub source: SolutionSource,
}

impl Solution {
    pub fn empty(parent: ParentRoll, source: SolutionSource) -> Self {
        Self {
            rolls: vec![],
            parent,
            source,
        }
    }

    pub fn rolls_used(&self) -> usize {
        self.rolls.len()
    }

    pub fn total_waste(&self) -> f64 {
        self.rolls.iter().map(|r| r.waste).sum()
    }

    pub fn total_waste_percent(&self) -> f64 {
        let total_stock = self.parent.width * self.rolls.len() as f64;
        if total_stock <= 0.0 {
            return 0.0;
        }
        self.total_waste() / total_stock * 100.0
    }

    /// Number of pieces of the given width cut across all rolls.
    pub fn pieces_cut(&self, width: f64) -> usize {
        self.rolls
            .iter()
            .flat_map(|r| &r.pieces)
            .filter(|&&w| (w - width).abs() <= EPS)
            .count()
    }

    /// Ordering key for best-of selection: fewer rolls, then less waste.
    pub(crate) fn cost(&self) -> (usize, f64) {
        (self.rolls_used(), self.total_waste())
    }
}
