//! Due date arithmetic for the chore list. Everything here works at day granularity:
//! time of day is discarded by normalizing both sides to their calendar day before
//! comparing, so a chore completed at 23:59 counts the same as one completed at 08:00.

use std::fmt::{Display, Formatter};

use chrono::{DateTime, Duration, TimeZone};

use crate::store::entities::Frequency;

/// Whole days until a chore is due again. A chore that was never completed has no due
/// date at all, which is distinct from being due today.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DaysUntilDue {
    NotApplicable,
    /// Days left until due. Zero means due today, negative means overdue by that many
    /// days.
    Days(i64),
}

impl Display for DaysUntilDue {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            DaysUntilDue::NotApplicable => write!(f, "/"),
            DaysUntilDue::Days(days) => write!(f, "{days}"),
        }
    }
}

/// Age of the most recent completion, at the granularity the list shows it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompletionAge {
    Never,
    Today,
    Yesterday,
    /// Day count as displayed. The completion day itself is counted, so a completion two
    /// calendar days back reads "3 days ago".
    DaysAgo(i64),
}

impl Display for CompletionAge {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            CompletionAge::Never => write!(f, "Never"),
            CompletionAge::Today => write!(f, "Today"),
            CompletionAge::Yesterday => write!(f, "Yesterday"),
            CompletionAge::DaysAgo(days) => write!(f, "{days} days ago"),
        }
    }
}

/// Computes how many whole days remain until the chore is due, counting from the day of
/// the last completion plus its frequency.
pub fn days_until_due<Tz: TimeZone>(
    last_completed: Option<&DateTime<Tz>>,
    frequency: Frequency,
    now: &DateTime<Tz>,
) -> DaysUntilDue {
    let Some(last_completed) = last_completed else {
        return DaysUntilDue::NotApplicable;
    };
    let due_day = last_completed.date_naive() + Duration::days(i64::from(*frequency));

    DaysUntilDue::Days((due_day - now.date_naive()).num_days())
}

/// Maps the last completion to the label shown in the list. From two calendar days back
/// the count is inclusive of the completion day itself.
pub fn time_since_completion<Tz: TimeZone>(
    last_completed: Option<&DateTime<Tz>>,
    now: &DateTime<Tz>,
) -> CompletionAge {
    let Some(last_completed) = last_completed else {
        return CompletionAge::Never;
    };

    let days = (now.date_naive() - last_completed.date_naive()).num_days();
    match days {
        days if days <= 0 => CompletionAge::Today,
        1 => CompletionAge::Yesterday,
        days => CompletionAge::DaysAgo(days + 1),
    }
}

#[cfg(test)]
mod tests {
    use chrono::{DateTime, Duration, FixedOffset, NaiveDate, NaiveDateTime, NaiveTime, TimeZone, Utc};

    use crate::{
        due::{days_until_due, time_since_completion, CompletionAge, DaysUntilDue},
        store::entities::Frequency,
    };

    const TEST_DATE: NaiveDateTime =
        NaiveDateTime::new(NaiveDate::from_ymd_opt(2023, 8, 17).unwrap(), NaiveTime::MIN);

    fn test_now() -> DateTime<Utc> {
        Utc.from_utc_datetime(&TEST_DATE) + Duration::hours(9)
    }

    fn frequency(days: u32) -> Frequency {
        Frequency::new_opt(days).unwrap()
    }

    #[test]
    fn test_never_completed_chores_have_no_due_date() {
        let result = days_until_due(None, frequency(7), &test_now());

        assert_eq!(result, DaysUntilDue::NotApplicable);
        assert_eq!(result.to_string(), "/");
    }

    #[test]
    fn test_completing_today_restarts_the_full_interval() {
        let result = days_until_due(Some(&test_now()), frequency(5), &test_now());

        assert_eq!(result, DaysUntilDue::Days(5));
    }

    #[test]
    fn test_overdue_chores_count_negative() {
        let last = test_now() - Duration::days(7);

        let result = days_until_due(Some(&last), frequency(5), &test_now());

        assert_eq!(result, DaysUntilDue::Days(-2));
        assert_eq!(result.to_string(), "-2");
    }

    #[test]
    fn test_time_of_day_does_not_move_the_due_date() {
        let late_evening = Utc.from_utc_datetime(&TEST_DATE) + Duration::hours(23)
            + Duration::minutes(59);

        let result = days_until_due(Some(&late_evening), frequency(5), &test_now());

        assert_eq!(result, DaysUntilDue::Days(5));
    }

    #[test]
    fn test_completion_age_labels() {
        assert_eq!(time_since_completion::<Utc>(None, &test_now()), CompletionAge::Never);
        assert_eq!(
            time_since_completion(Some(&test_now()), &test_now()),
            CompletionAge::Today
        );
        assert_eq!(
            time_since_completion(Some(&(test_now() - Duration::days(1))), &test_now()),
            CompletionAge::Yesterday
        );
        assert_eq!(
            time_since_completion(Some(&(test_now() - Duration::days(3))), &test_now()),
            CompletionAge::DaysAgo(4)
        );
        assert_eq!(CompletionAge::DaysAgo(4).to_string(), "4 days ago");
    }

    #[test]
    fn test_age_counts_calendar_days_not_elapsed_hours() {
        let just_before_midnight = Utc.from_utc_datetime(&TEST_DATE) - Duration::minutes(30);
        let just_after_midnight = Utc.from_utc_datetime(&TEST_DATE) + Duration::minutes(10);

        let result = time_since_completion(Some(&just_before_midnight), &just_after_midnight);

        assert_eq!(result, CompletionAge::Yesterday);
    }

    #[test]
    fn test_days_are_taken_in_the_callers_timezone() {
        // 23:30 on the 16th in +03:00 is already the 17th in UTC. The local calendar day
        // is the one that counts.
        let zone = FixedOffset::east_opt(3 * 3600).unwrap();
        let last = zone.with_ymd_and_hms(2023, 8, 16, 23, 30, 0).unwrap();
        let now = zone.with_ymd_and_hms(2023, 8, 17, 0, 10, 0).unwrap();

        assert_eq!(time_since_completion(Some(&last), &now), CompletionAge::Yesterday);
        assert_eq!(days_until_due(Some(&last), frequency(3), &now), DaysUntilDue::Days(2));
    }
}
