//! Amount normalization and ranking for Brazilian bills.

use rust_decimal::Decimal;
use std::str::FromStr;
use tracing::trace;

use super::cleanup::clean_ocr_text;
use super::patterns::{VALUE_BASE_PRIORITY, VALUE_PATTERNS};
use super::{Candidate, FieldExtractor};

/// Amount field extractor.
///
/// Candidates rank by tier priority, then by amount: a bill usually prints
/// several sub-totals next to one larger grand total.
pub struct AmountExtractor {
    min_value: Decimal,
    max_value: Decimal,
    clean_noise: bool,
}

impl AmountExtractor {
    pub fn new() -> Self {
        Self {
            min_value: Decimal::from(5),
            max_value: Decimal::from(100_000),
            clean_noise: true,
        }
    }

    /// Set the accepted range, `min` inclusive and `max` exclusive.
    pub fn with_bounds(mut self, min: Decimal, max: Decimal) -> Self {
        self.min_value = min;
        self.max_value = max;
        self
    }

    /// Set whether OCR noise cleanup runs before matching.
    pub fn with_noise_cleanup(mut self, clean: bool) -> Self {
        self.clean_noise = clean;
        self
    }

    fn in_bounds(&self, amount: Decimal) -> bool {
        amount >= self.min_value && amount < self.max_value
    }
}

impl Default for AmountExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl FieldExtractor for AmountExtractor {
    type Output = Decimal;

    fn extract_all(&self, text: &str) -> Vec<Candidate<Decimal>> {
        let text = if self.clean_noise {
            clean_ocr_text(text)
        } else {
            text.into()
        };

        let mut results = Vec::new();

        for (tier, pattern) in VALUE_PATTERNS.iter().enumerate() {
            let priority = VALUE_BASE_PRIORITY - tier as f64;

            for caps in pattern.captures_iter(&text) {
                let Some(m) = caps.get(1) else { continue };
                if continues_as_number(&text, m.end()) {
                    trace!("Rejected amount {:?} cut out of a longer number", m.as_str());
                    continue;
                }
                let Some(amount) = parse_amount(m.as_str()) else { continue };

                if !self.in_bounds(amount) {
                    trace!("Rejected amount {} outside bounds", amount);
                    continue;
                }

                results.push(
                    Candidate::new(amount, priority, tier, m.as_str())
                        .with_position(m.start(), m.end()),
                );
            }
        }

        results.sort_by(|a, b| {
            b.priority
                .total_cmp(&a.priority)
                .then_with(|| b.value.cmp(&a.value))
        });

        results
    }
}

/// Whether the text after `end` keeps going as digits, as in a dotted date
/// (`15.03.2025`) or a boleto block (`00190.00009`).
fn continues_as_number(text: &str, end: usize) -> bool {
    match text.as_bytes().get(end..).unwrap_or_default() {
        [next, ..] if next.is_ascii_digit() => true,
        [b'.' | b'/' | b'-', next, ..] => next.is_ascii_digit(),
        _ => false,
    }
}

/// Extract the bill amount using default bounds.
pub fn extract_value(text: &str) -> Option<Decimal> {
    AmountExtractor::new().extract(text).map(|c| c.value)
}

/// Parse a Brazilian-formatted amount (e.g. "R$ 1.234,56").
///
/// Every `.` is a thousands separator and the last `,` is the decimal
/// point. US-formatted input ("1,234.56") is not supported.
pub fn parse_amount(raw: &str) -> Option<Decimal> {
    let cleaned: String = raw
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == ',' || *c == '.')
        .filter(|c| *c != '.')
        .collect();

    let normalized = match cleaned.rfind(',') {
        Some(pos) => format!("{}.{}", &cleaned[..pos], &cleaned[pos + 1..]),
        None => cleaned,
    };

    if !normalized.bytes().any(|b| b.is_ascii_digit()) {
        return None;
    }

    Decimal::from_str(&normalized).ok()
}

/// Format amount in Brazilian style (R$ 1.234,56).
pub fn format_brl(amount: Decimal) -> String {
    let s = format!("{:.2}", amount.round_dp(2));
    let (integer_part, decimal_part) = s.split_once('.').unwrap_or((s.as_str(), "00"));

    let (sign, digits) = match integer_part.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", integer_part),
    };

    let chars: Vec<char> = digits.chars().collect();
    let mut formatted = String::new();
    for (i, c) in chars.iter().enumerate() {
        if i > 0 && (chars.len() - i) % 3 == 0 {
            formatted.push('.');
        }
        formatted.push(*c);
    }

    format!("R$ {}{},{}", sign, formatted, decimal_part)
}
