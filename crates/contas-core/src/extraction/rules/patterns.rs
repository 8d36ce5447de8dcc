//! Ordered regex tiers for bill field extraction.
//!
//! Within each list, earlier tiers are more credible. Ranking code turns the
//! tier index into a priority of `BASE - index`.

use lazy_static::lazy_static;
use regex::Regex;

/// Base priority for value tiers.
pub const VALUE_BASE_PRIORITY: f64 = 10.0;

/// Base priority for due date tiers.
pub const DATE_BASE_PRIORITY: f64 = 5.0;

/// Brazilian amount: `1.234,56`, `1234,56`, `150,00`, OCR variants with mixed separators.
const AMOUNT: &str = r"(?:\d{1,3}(?:[.,]\d{3})+|\d+)[,.]\d{2}";

/// `DD/MM/YYYY` or `DD/MM/YY` with `/`, `-` or `.` separators.
const DATE: &str = r"\d{2}[/\-.]\d{2}[/\-.](?:\d{4}|\d{2})";

lazy_static! {
    /// Value tiers, most specific first.
    pub static ref VALUE_PATTERNS: Vec<Regex> = vec![
        // Amount after a "total to pay" style keyword
        Regex::new(&format!(
            r"(?i)(?:total\s*a\s*pagar|valor\s*total|valor\s+a\s+pagar|total|pagar)[:\s=]*R?\$?\s*({AMOUNT})"
        )).unwrap(),
        // R$ prefix
        Regex::new(&format!(r"R\$\s*({AMOUNT})")).unwrap(),
        // R$ read as RS by OCR
        Regex::new(&format!(r"(?i)\bRS\s*({AMOUNT})")).unwrap(),
        // Amount alone on its line
        Regex::new(&format!(r"(?m)^\s*({AMOUNT})\s*$")).unwrap(),
        // Any decimal-looking number
        Regex::new(&format!(r"\b({AMOUNT})")).unwrap(),
    ];

    /// Due date tiers, most specific first.
    pub static ref DATE_PATTERNS: Vec<Regex> = vec![
        // Date after a due-date keyword
        Regex::new(&format!(
            r"(?i)(?:vencimento|venc\.?|vencto|data\s*de?\s*venc(?:imento)?|pagar\s*at[eé]|pagamento\s*at[eé]?|at[eé])[:\s=]*({DATE})"
        )).unwrap(),
        // DD/MM/YYYY
        Regex::new(r"\b(\d{2}[/\-.]\d{2}[/\-.]\d{4})\b").unwrap(),
        // DD/MM/YY
        Regex::new(r"\b(\d{2}[/\-.]\d{2}[/\-.]\d{2})\b").unwrap(),
        // Date split by OCR whitespace
        Regex::new(r"\b(\d{2}\s*[/\-.]\s*\d{2}\s*[/\-.]\s*\d{2,4})\b").unwrap(),
    ];

    /// Date shape inside an already matched, whitespace-free substring.
    pub static ref DATE_PARTS: Regex = Regex::new(
        r"(\d{1,2})[/\-.](\d{1,2})[/\-.](\d{4}|\d{2})"
    ).unwrap();

    /// Payment line tiers, most complete layout first.
    pub static ref BARCODE_PATTERNS: Vec<Regex> = vec![
        // Bank boleto: 5.5 5.6 5.6 1 14
        Regex::new(
            r"\b\d{5}[.\s]?\d{5}\s?\d{5}[.\s]?\d{6}\s?\d{5}[.\s]?\d{6}\s?\d\s?\d{14}\b"
        ).unwrap(),
        // Utility (arrecadação): four blocks of 11 digits plus a check digit
        Regex::new(
            r"\b\d{11}[-\s]?\d\s?\d{11}[-\s]?\d\s?\d{11}[-\s]?\d\s?\d{11}[-\s]?\d\b"
        ).unwrap(),
        // Fully concatenated line
        Regex::new(r"\b\d{47,48}\b").unwrap(),
        // Loose digit run with stray separators
        Regex::new(r"\b(?:\d[. \t-]?){43,49}\d\b").unwrap(),
    ];
}
