//! Reminder planning for a bill's due date.
//!
//! Only the schedule is computed here; storing and delivering reminders is
//! left to the caller.

use chrono::{Days, NaiveDate, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};

/// Hour of day at which every reminder fires.
pub const REMINDER_HOUR: u32 = 9;

/// Which of the standard reminders this is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ReminderKind {
    ThreeDaysBefore,
    OneDayBefore,
    DueDate,
}

impl ReminderKind {
    pub const ALL: [ReminderKind; 3] = [
        ReminderKind::ThreeDaysBefore,
        ReminderKind::OneDayBefore,
        ReminderKind::DueDate,
    ];

    /// Days between the reminder and the due date.
    pub fn days_before(&self) -> u64 {
        match self {
            Self::ThreeDaysBefore => 3,
            Self::OneDayBefore => 1,
            Self::DueDate => 0,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ThreeDaysBefore => "THREE_DAYS_BEFORE",
            Self::OneDayBefore => "ONE_DAY_BEFORE",
            Self::DueDate => "DUE_DATE",
        }
    }
}

impl std::fmt::Display for ReminderKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A scheduled reminder.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reminder {
    pub kind: ReminderKind,
    pub at: NaiveDateTime,
}

/// Plan the reminders for a bill due on `due_date`.
///
/// Reminders fire at 09:00 three days before, one day before and on the due
/// date. Any reminder not strictly after `created_at` is dropped, so a bill
/// registered late gets only the reminders still ahead of it.
pub fn plan_reminders(due_date: NaiveDate, created_at: NaiveDateTime) -> Vec<Reminder> {
    let nine = NaiveTime::from_hms_opt(REMINDER_HOUR, 0, 0).unwrap_or(NaiveTime::MIN);

    ReminderKind::ALL
        .iter()
        .filter_map(|&kind| {
            let day = due_date.checked_sub_days(Days::new(kind.days_before()))?;
            let at = day.and_time(nine);
            (at > created_at).then_some(Reminder { kind, at })
        })
        .collect()
}
