use super::{store, today};
use crate::libs::calendar::{buckets, week_title, CalendarWeek};
use crate::libs::messages::Message;
use crate::libs::view::View;
use crate::{msg_info, msg_print};
use anyhow::Result;
use clap::Args;

#[derive(Debug, Args)]
pub struct CalendarArgs {
    /// Weeks from the current one: -1 is last week, 1 is next week
    #[arg(short, long, default_value_t = 0, allow_negative_numbers = true)]
    week: i64,
}

/// Prints one week of due tasks grouped by day. Overdue tasks are only
/// listed for the current week.
pub async fn cmd(calendar_args: CalendarArgs) -> Result<()> {
    let today = today();
    let week = CalendarWeek::relative(today, calendar_args.week);
    let response = store()?.tasks_by_date(&week).await?;
    let buckets = buckets(response, week.is_current);

    msg_print!(week_title(&week, today), true);
    if buckets.iter().all(|b| b.tasks.is_empty()) {
        msg_info!(Message::NothingDue);
        return Ok(());
    }
    View::calendar(&buckets, today);
    Ok(())
}
