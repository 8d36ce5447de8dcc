//! Rule-based field extractors for Brazilian bills.

pub mod amounts;
pub mod barcode;
pub mod category;
pub mod cleanup;
pub mod company;
pub mod dates;
pub mod patterns;

pub use amounts::{extract_value, parse_amount, AmountExtractor};
pub use barcode::{extract_barcode, normalize_barcode, BarcodeExtractor};
pub use category::{classify, BillType};
pub use cleanup::clean_ocr_text;
pub use company::{identify_company, Biller};
pub use dates::{extract_due_date, parse_due_date, DateWindow, DueDateExtractor};

use serde::Serialize;

/// Trait for ranked field extractors.
pub trait FieldExtractor {
    /// The type of value this extractor produces.
    type Output;

    /// All accepted candidates, best first.
    fn extract_all(&self, text: &str) -> Vec<Candidate<Self::Output>>;

    /// The winning candidate, if any.
    fn extract(&self, text: &str) -> Option<Candidate<Self::Output>> {
        self.extract_all(text).into_iter().next()
    }
}

/// A pattern match for a field, before the winner is chosen.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Candidate<T> {
    /// Parsed value.
    pub value: T,
    /// Ranking score; higher wins.
    pub priority: f64,
    /// Index of the pattern tier that produced the match.
    pub tier: usize,
    /// Text that was matched.
    pub raw_match: String,
    /// Byte span of the match in the searched text.
    pub position: (usize, usize),
}

impl<T> Candidate<T> {
    pub fn new(value: T, priority: f64, tier: usize, raw_match: impl Into<String>) -> Self {
        Self {
            value,
            priority,
            tier,
            raw_match: raw_match.into(),
            position: (0, 0),
        }
    }

    pub fn with_position(mut self, start: usize, end: usize) -> Self {
        self.position = (start, end);
        self
    }
}
