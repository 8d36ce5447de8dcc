//! Reminders command - show when reminders would fire for a due date.

use chrono::{Local, NaiveDate, NaiveDateTime};
use clap::Args;

use contas_core::plan_reminders;

/// Arguments for the reminders command.
#[derive(Args)]
pub struct RemindersArgs {
    /// Due date (YYYY-MM-DD)
    due_date: NaiveDate,

    /// Creation instant to plan from (YYYY-MM-DDTHH:MM:SS, default: now)
    #[arg(long)]
    created_at: Option<NaiveDateTime>,

    /// Print the plan as JSON
    #[arg(long)]
    json: bool,
}

pub fn run(args: RemindersArgs) -> anyhow::Result<()> {
    let created_at = args
        .created_at
        .unwrap_or_else(|| Local::now().naive_local());
    let plan = plan_reminders(args.due_date, created_at);

    if args.json {
        println!("{}", serde_json::to_string_pretty(&plan)?);
        return Ok(());
    }

    if plan.is_empty() {
        println!("No upcoming reminders for {}", args.due_date);
        return Ok(());
    }

    for reminder in &plan {
        println!("{:<18} {}", reminder.kind.as_str(), reminder.at.format("%Y-%m-%d %H:%M"));
    }

    Ok(())
}
