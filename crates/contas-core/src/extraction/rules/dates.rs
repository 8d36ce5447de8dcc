//! Due date parsing and ranking for Brazilian bills.

use chrono::{Local, Months, NaiveDate};
use tracing::trace;

use super::cleanup::clean_ocr_text;
use super::patterns::{DATE_BASE_PRIORITY, DATE_PARTS, DATE_PATTERNS};
use super::{Candidate, FieldExtractor};

/// Bonus for a date on or after the reference day.
const FUTURE_BONUS: f64 = 10.0;

/// Future dates within this many days get a proximity bonus.
const HORIZON_DAYS: i64 = 90;

/// Range of plausible due dates around a reference day.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateWindow {
    reference: NaiveDate,
    earliest: NaiveDate,
    latest: NaiveDate,
}

impl DateWindow {
    /// Window from `past_months` before to `future_months` after `reference`.
    pub fn new(reference: NaiveDate, past_months: u32, future_months: u32) -> Self {
        Self {
            reference,
            earliest: reference
                .checked_sub_months(Months::new(past_months))
                .unwrap_or(NaiveDate::MIN),
            latest: reference
                .checked_add_months(Months::new(future_months))
                .unwrap_or(NaiveDate::MAX),
        }
    }

    /// Default window: two months back, two years ahead.
    pub fn around(reference: NaiveDate) -> Self {
        Self::new(reference, 2, 24)
    }

    /// Default window around today's local date.
    pub fn today() -> Self {
        Self::around(Local::now().date_naive())
    }

    pub fn reference(&self) -> NaiveDate {
        self.reference
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        date >= self.earliest && date <= self.latest
    }

    /// Parse a `DD/MM/YYYY`-style date and keep it only if it falls inside the window.
    ///
    /// Whitespace is stripped first, so `15 / 03 / 2025` parses. Two-digit
    /// years are taken as 20YY. Impossible dates such as 31/02 are rejected.
    pub fn parse(&self, raw: &str) -> Option<NaiveDate> {
        let compact: String = raw.chars().filter(|c| !c.is_whitespace()).collect();
        let caps = DATE_PARTS.captures(&compact)?;

        let day: u32 = caps[1].parse().ok()?;
        let month: u32 = caps[2].parse().ok()?;
        let mut year: i32 = caps[3].parse().ok()?;

        if year < 100 {
            year += 2000;
        }

        if !(1..=31).contains(&day) || !(1..=12).contains(&month) {
            return None;
        }

        let date = NaiveDate::from_ymd_opt(year, month, day)?;

        if !self.contains(date) {
            trace!("Rejected date {} outside window", date);
            return None;
        }

        Some(date)
    }

    /// Ranking bonus for a candidate date: future dates first, sooner ones higher.
    fn proximity_bonus(&self, date: NaiveDate) -> f64 {
        if date < self.reference {
            return 0.0;
        }

        let days_until = (date - self.reference).num_days();
        let mut bonus = FUTURE_BONUS;
        if days_until <= HORIZON_DAYS {
            bonus += (HORIZON_DAYS - days_until) as f64 / 30.0;
        }
        bonus
    }
}

/// Parse a due date relative to `reference`, using the default window.
pub fn parse_due_date(raw: &str, reference: NaiveDate) -> Option<NaiveDate> {
    DateWindow::around(reference).parse(raw)
}

/// Due date field extractor.
pub struct DueDateExtractor {
    window: DateWindow,
    clean_noise: bool,
}

impl DueDateExtractor {
    pub fn new(window: DateWindow) -> Self {
        Self {
            window,
            clean_noise: true,
        }
    }

    /// Set whether OCR noise cleanup runs before matching.
    pub fn with_noise_cleanup(mut self, clean: bool) -> Self {
        self.clean_noise = clean;
        self
    }
}

impl Default for DueDateExtractor {
    fn default() -> Self {
        Self::new(DateWindow::today())
    }
}

impl FieldExtractor for DueDateExtractor {
    type Output = NaiveDate;

    fn extract_all(&self, text: &str) -> Vec<Candidate<NaiveDate>> {
        let text = if self.clean_noise {
            clean_ocr_text(text)
        } else {
            text.into()
        };

        let mut results = Vec::new();

        for (tier, pattern) in DATE_PATTERNS.iter().enumerate() {
            let base = DATE_BASE_PRIORITY - tier as f64;

            for caps in pattern.captures_iter(&text) {
                let Some(m) = caps.get(1) else { continue };
                let Some(date) = self.window.parse(m.as_str()) else { continue };

                let priority = base + self.window.proximity_bonus(date);
                results.push(
                    Candidate::new(date, priority, tier, m.as_str())
                        .with_position(m.start(), m.end()),
                );
            }
        }

        // Stable: equal scores keep tier order, then text order.
        results.sort_by(|a, b| b.priority.total_cmp(&a.priority));

        results
    }
}

/// Extract the due date relative to `reference`, using the default window.
pub fn extract_due_date(text: &str, reference: NaiveDate) -> Option<NaiveDate> {
    DueDateExtractor::new(DateWindow::around(reference))
        .extract(text)
        .map(|c| c.value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn reference() -> NaiveDate {
        ymd(2025, 2, 1)
    }

    #[test]
    fn test_parse_formats() {
        let r = reference();
        assert_eq!(parse_due_date("15/03/2025", r), Some(ymd(2025, 3, 15)));
        assert_eq!(parse_due_date("15-03-25", r), Some(ymd(2025, 3, 15)));
        assert_eq!(parse_due_date("15.03/2025", r), Some(ymd(2025, 3, 15)));
        assert_eq!(parse_due_date("15 / 03 / 2025", r), Some(ymd(2025, 3, 15)));
    }

    #[test]
    fn test_impossible_calendar_date() {
        assert_eq!(parse_due_date("31/02/2024", ymd(2024, 2, 1)), None);
        assert_eq!(parse_due_date("29/02/2024", ymd(2024, 2, 1)), Some(ymd(2024, 2, 29)));
        assert_eq!(parse_due_date("29/02/2025", reference()), None);
    }

    #[test]
    fn test_out_of_range_components() {
        assert_eq!(parse_due_date("32/13/2025", reference()), None);
        assert_eq!(parse_due_date("00/03/2025", reference()), None);
        assert_eq!(parse_due_date("15/00/2025", reference()), None);
        assert_eq!(parse_due_date("sem data", reference()), None);
    }

    #[test]
    fn test_window_bounds() {
        let r = reference();
        assert_eq!(parse_due_date("01/12/2024", r), Some(ymd(2024, 12, 1)));
        assert_eq!(parse_due_date("30/11/2024", r), None);
        assert_eq!(parse_due_date("01/02/2027", r), Some(ymd(2027, 2, 1)));
        assert_eq!(parse_due_date("02/02/2027", r), None);
    }

    #[test]
    fn test_custom_window() {
        let window = DateWindow::new(reference(), 1, 12);
        assert_eq!(window.parse("15/12/2024"), None);
        assert_eq!(window.parse("15/01/2025"), Some(ymd(2025, 1, 15)));
        assert_eq!(window.parse("15/03/2026"), None);
    }

    #[test]
    fn test_keyword_due_date() {
        let text = "Emissão 20/01/2025\nVencimento: 15/03/2025";
        assert_eq!(extract_due_date(text, reference()), Some(ymd(2025, 3, 15)));
    }

    #[test]
    fn test_sooner_future_date_wins() {
        let text = "Leitura 10/04/2025\nProxima 10/02/2025";
        let candidates = DueDateExtractor::new(DateWindow::around(reference())).extract_all(text);

        assert_eq!(candidates[0].value, ymd(2025, 2, 10));
        assert!(candidates[0].priority > 14.0);
    }

    #[test]
    fn test_future_beats_keyword_in_past() {
        let text = "Vencimento 20/01/2025\nPagavel em 25/02/2025";
        assert_eq!(extract_due_date(text, reference()), Some(ymd(2025, 2, 25)));
    }

    #[test]
    fn test_overdue_bill_keeps_past_due_date() {
        let text = "Vencimento: 10/01/2025\nEmissão 02/01/2025";
        assert_eq!(extract_due_date(text, reference()), Some(ymd(2025, 1, 10)));
    }

    #[test]
    fn test_priority_formula() {
        let text = "Vencimento: 15/03/2025";
        let best = DueDateExtractor::new(DateWindow::around(reference()))
            .extract(text)
            .unwrap();

        // 5 (keyword tier) + 10 (future) + (90 - 42) / 30
        assert_eq!(best.tier, 0);
        assert!((best.priority - 16.6).abs() < 1e-9);
    }

    #[test]
    fn test_garbage_dates_ignored() {
        let text = "Codigo 99/99/9999 Ref 45/13/24";
        assert_eq!(extract_due_date(text, reference()), None);
    }
}
