//! Tier grid view
//!
//! Rows are the distinct term ranges, columns the distinct amount ranges. A
//! cell holds the rate of the tier declaring exactly that (term, amount) pair;
//! tiers that do not line up with the grid leave placeholders rather than
//! being matched partially. Display only, never used for interest.

use std::collections::BTreeSet;
use std::fmt;

use quantum_common::{AmountRange, RateTier, TermRange};
use rust_decimal::Decimal;

use crate::GRID_PLACEHOLDER;

/// Cross-tabulated tier rates
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TierGrid {
    terms: Vec<TermRange>,
    amounts: Vec<AmountRange>,
    /// `cells[row][column]`
    cells: Vec<Vec<Option<Decimal>>>,
}

impl TierGrid {
    pub fn build(tiers: &[RateTier]) -> Self {
        let terms: Vec<TermRange> = tiers
            .iter()
            .map(RateTier::term_range)
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();
        let amounts: Vec<AmountRange> = tiers
            .iter()
            .map(RateTier::amount_range)
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();

        let cells = terms
            .iter()
            .map(|term| {
                amounts
                    .iter()
                    .map(|amount| {
                        tiers
                            .iter()
                            .find(|t| t.term_range() == *term && t.amount_range() == *amount)
                            .map(|t| t.rate)
                    })
                    .collect()
            })
            .collect();

        Self {
            terms,
            amounts,
            cells,
        }
    }

    /// Row headers, shortest term first
    pub fn terms(&self) -> &[TermRange] {
        &self.terms
    }

    /// Column headers, smallest amount first
    pub fn amounts(&self) -> &[AmountRange] {
        &self.amounts
    }

    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }

    pub fn cell(&self, row: usize, column: usize) -> Option<Decimal> {
        self.cells.get(row)?.get(column).copied().flatten()
    }

    /// Rate for an exact (term, amount) declaration
    pub fn rate(&self, term: &TermRange, amount: &AmountRange) -> Option<Decimal> {
        let row = self.terms.iter().position(|t| t == term)?;
        let column = self.amounts.iter().position(|a| a == amount)?;
        self.cell(row, column)
    }

    /// Cell text: `5.25%` or the placeholder
    pub fn cell_label(&self, row: usize, column: usize) -> String {
        match self.cell(row, column) {
            Some(rate) => format!("{}%", rate.normalize()),
            None => GRID_PLACEHOLDER.to_string(),
        }
    }

    /// Plain-text table
    pub fn render(&self) -> String {
        let mut table: Vec<Vec<String>> = Vec::with_capacity(self.terms.len() + 1);

        let mut header = vec!["Term \\ Amount".to_string()];
        header.extend(self.amounts.iter().map(AmountRange::label));
        table.push(header);

        for (row, term) in self.terms.iter().enumerate() {
            let mut line = vec![term.label()];
            line.extend((0..self.amounts.len()).map(|column| self.cell_label(row, column)));
            table.push(line);
        }

        let widths: Vec<usize> = (0..=self.amounts.len())
            .map(|column| {
                table
                    .iter()
                    .map(|line| line[column].chars().count())
                    .max()
                    .unwrap_or(0)
            })
            .collect();

        table
            .iter()
            .map(|line| {
                line.iter()
                    .zip(&widths)
                    .map(|(text, width)| {
                        let pad = width - text.chars().count();
                        format!("{}{}", text, " ".repeat(pad))
                    })
                    .collect::<Vec<_>>()
                    .join(" | ")
                    .trim_end()
                    .to_string()
            })
            .collect::<Vec<_>>()
            .join("\n")
    }
}

impl fmt::Display for TierGrid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render())
    }
}
