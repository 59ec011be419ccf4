//! Simulator query and outcome types

use std::str::FromStr;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::rate_tier::RateTier;

/// Unit in which the depositor entered the term
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TermUnit {
    #[default]
    Days,
    Months,
}

impl FromStr for TermUnit {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "d" | "day" | "days" => Ok(TermUnit::Days),
            "m" | "month" | "months" => Ok(TermUnit::Months),
            other => Err(format!("unknown term unit '{}'", other)),
        }
    }
}

impl std::fmt::Display for TermUnit {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TermUnit::Days => write!(f, "days"),
            TermUnit::Months => write!(f, "months"),
        }
    }
}

/// Investment simulation request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Query {
    /// Amount to invest
    pub capital: Option<Decimal>,

    /// Term, in `unit`
    pub term: Option<i64>,

    pub unit: TermUnit,
}

impl Query {
    pub fn new(capital: Decimal, term: i64, unit: TermUnit) -> Self {
        Self {
            capital: Some(capital),
            term: Some(term),
            unit,
        }
    }

    /// Query with the term in days
    pub fn days(capital: Decimal, term: i64) -> Self {
        Self::new(capital, term, TermUnit::Days)
    }

    /// Query with the term in months
    pub fn months(capital: Decimal, term: i64) -> Self {
        Self::new(capital, term, TermUnit::Months)
    }

    /// Build a query from form strings; blank or non-numeric input leaves the field unset
    pub fn parse(capital: &str, term: &str, unit: TermUnit) -> Self {
        Self {
            capital: capital.trim().parse().ok(),
            term: term.trim().parse().ok(),
            unit,
        }
    }
}

/// Outcome of a resolved simulation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Simulation {
    /// The single tier that applied
    pub tier: RateTier,

    /// Capital invested
    pub capital: Decimal,

    /// Term after unit conversion
    pub term_days: u32,

    /// Tier rate as a percentage
    pub rate: Decimal,

    /// Tax withheld from gross interest (0.02 = 2%)
    pub tax_rate: Decimal,

    /// Interest after tax, rounded to 2 decimals
    pub net_interest: Decimal,

    /// capital + net_interest
    pub total_payout: Decimal,

    /// Calculation timestamp (Unix milliseconds)
    pub computed_at: i64,
}

impl Simulation {
    /// Net return as a fraction of capital
    pub fn net_yield(&self) -> Option<Decimal> {
        if self.capital > Decimal::ZERO {
            Some(self.net_interest / self.capital)
        } else {
            None
        }
    }
}
