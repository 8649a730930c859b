use ansi_term::Colour;
use chrono::{DateTime, TimeZone};

use crate::{
    due::{days_until_due, time_since_completion, DaysUntilDue},
    store::entities::{Chore, Frequency},
};

/// Prints one tab separated row per chore: days until due, time since the last completion,
/// frequency, name and id. Rows keep the stored order, which is insertion order.
pub fn print_chore_list<Tz: TimeZone>(chores: &[Chore], now: &DateTime<Tz>) {
    for chore in chores {
        let last_completed = chore
            .last_completed
            .map(|v| v.with_timezone(&now.timezone()));
        let due = days_until_due(last_completed.as_ref(), chore.frequency, now);
        let age = time_since_completion(last_completed.as_ref(), now);

        println!(
            "{}\t{}\t{}\t{}\t{}",
            paint_due(due),
            age,
            format_frequency(chore.frequency),
            chore.name,
            chore.id
        );
    }
}

/// Overdue chores are painted red, chores due today yellow.
fn paint_due(due: DaysUntilDue) -> String {
    match due {
        DaysUntilDue::Days(days) if days < 0 => Colour::Red.paint(due.to_string()).to_string(),
        DaysUntilDue::Days(0) => Colour::Yellow.paint(due.to_string()).to_string(),
        _ => due.to_string(),
    }
}

fn format_frequency(frequency: Frequency) -> String {
    if *frequency == 1 {
        "every day".to_string()
    } else {
        format!("every {} days", *frequency)
    }
}

#[cfg(test)]
mod tests {
    use ansi_term::Colour;

    use crate::{
        cli::list::{format_frequency, paint_due},
        due::DaysUntilDue,
        store::entities::Frequency,
    };

    #[test]
    fn test_only_overdue_and_due_today_are_painted() {
        assert_eq!(
            paint_due(DaysUntilDue::Days(-2)),
            Colour::Red.paint("-2").to_string()
        );
        assert_eq!(
            paint_due(DaysUntilDue::Days(0)),
            Colour::Yellow.paint("0").to_string()
        );
        assert_eq!(paint_due(DaysUntilDue::Days(4)), "4");
        assert_eq!(paint_due(DaysUntilDue::NotApplicable), "/");
    }

    #[test]
    fn test_daily_chores_read_as_every_day() {
        assert_eq!(format_frequency(Frequency::new_opt(1).unwrap()), "every day");
        assert_eq!(
            format_frequency(Frequency::new_opt(14).unwrap()),
            "every 14 days"
        );
    }
}
