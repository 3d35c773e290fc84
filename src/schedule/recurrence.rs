//! Next-occurrence computation for recurring game sessions.
//!
//! The calculator never returns "today": when today already is the target weekday the
//! session rolls over to next week. Dates that are already scheduled in the future pass
//! through untouched so editing a schedule never moves a session that was announced.

use std::{fmt, str::FromStr};

use thiserror::Error;
use time::{
    Date, Duration, OffsetDateTime, PrimitiveDateTime, Time, UtcOffset, Weekday,
    format_description::well_known::Rfc3339, macros::format_description,
};

/// Errors raised while parsing recurrence inputs or computing a date.
#[derive(Debug, Error)]
pub enum RecurrenceError {
    /// The weekday name is not one of the seven English weekday names.
    #[error("unknown weekday `{0}`")]
    UnknownWeekday(String),
    /// The interval is not one of `weekly`, `biweekly`, `monthly` or `custom`.
    #[error("unknown interval `{0}`")]
    UnknownInterval(String),
    /// The already-known session date could not be parsed.
    #[error("invalid known date `{value}`")]
    InvalidKnownDate {
        value: String,
        #[source]
        source: time::error::Parse,
    },
    /// The computed date does not fit in the supported calendar range.
    #[error("computed date is out of range")]
    OutOfRange,
    /// Formatting the result as RFC 3339 failed.
    #[error("failed to format session date")]
    Format(#[from] time::error::Format),
}

/// How often a game session repeats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Interval {
    /// Every week on the same weekday.
    Weekly,
    /// Every other week.
    Biweekly,
    /// Once per calendar month.
    Monthly,
    /// Club-specific cadence. Computed exactly like [`Interval::Weekly`] until custom
    /// cadences are modelled.
    Custom,
}

impl Interval {
    /// Lowercase wire name of the interval.
    pub fn as_str(&self) -> &'static str {
        match self {
            Interval::Weekly => "weekly",
            Interval::Biweekly => "biweekly",
            Interval::Monthly => "monthly",
            Interval::Custom => "custom",
        }
    }
}

impl fmt::Display for Interval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Interval {
    type Err = RecurrenceError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "weekly" => Ok(Interval::Weekly),
            "biweekly" => Ok(Interval::Biweekly),
            "monthly" => Ok(Interval::Monthly),
            "custom" => Ok(Interval::Custom),
            _ => Err(RecurrenceError::UnknownInterval(value.to_string())),
        }
    }
}

/// Parse an English weekday name, ignoring case and surrounding whitespace.
pub fn parse_weekday(value: &str) -> Result<Weekday, RecurrenceError> {
    match value.trim().to_ascii_lowercase().as_str() {
        "monday" => Ok(Weekday::Monday),
        "tuesday" => Ok(Weekday::Tuesday),
        "wednesday" => Ok(Weekday::Wednesday),
        "thursday" => Ok(Weekday::Thursday),
        "friday" => Ok(Weekday::Friday),
        "saturday" => Ok(Weekday::Saturday),
        "sunday" => Ok(Weekday::Sunday),
        _ => Err(RecurrenceError::UnknownWeekday(value.to_string())),
    }
}

/// Compute the next session date relative to `today`.
///
/// A `known` date strictly after `today` is returned unchanged. Otherwise the next
/// occurrence of `day` at least one day ahead is computed and shifted by the interval:
/// one extra week for [`Interval::Biweekly`], one calendar month for
/// [`Interval::Monthly`].
pub fn next_game_date(
    day: Weekday,
    interval: Interval,
    known: Option<Date>,
    today: Date,
) -> Result<Date, RecurrenceError> {
    if let Some(known) = known {
        if known > today {
            return Ok(known);
        }
    }

    let target = i64::from(day.number_days_from_sunday());
    let current = i64::from(today.weekday().number_days_from_sunday());
    let mut days_until_next = (target - current + 7) % 7;
    if days_until_next == 0 {
        days_until_next = 7;
    }

    let next = today
        .checked_add(Duration::days(days_until_next))
        .ok_or(RecurrenceError::OutOfRange)?;

    match interval {
        Interval::Biweekly => next
            .checked_add(Duration::days(7))
            .ok_or(RecurrenceError::OutOfRange),
        Interval::Monthly => add_calendar_month(next),
        Interval::Weekly | Interval::Custom => Ok(next),
    }
}

/// String boundary used by schedule-editing flows.
///
/// "Today" is the local calendar date. A `known` date in the future is handed back
/// verbatim; any computed date is local midnight rendered as an RFC 3339 UTC timestamp.
pub fn calculate_next_game_date(
    day: &str,
    interval: &str,
    known: Option<&str>,
) -> Result<String, RecurrenceError> {
    let day = parse_weekday(day)?;
    let interval = interval.parse::<Interval>()?;
    let offset = local_offset();
    let today = OffsetDateTime::now_utc().to_offset(offset).date();

    let known_date = known.map(|value| parse_known_date(value, offset)).transpose()?;
    if let (Some(raw), Some(date)) = (known, known_date) {
        if date > today {
            return Ok(raw.to_string());
        }
    }

    let next = next_game_date(day, interval, None, today)?;
    format_midnight(next, offset)
}

/// Current calendar date in the local timezone, falling back to UTC.
pub fn local_today() -> Date {
    OffsetDateTime::now_utc().to_offset(local_offset()).date()
}

fn local_offset() -> UtcOffset {
    UtcOffset::current_local_offset().unwrap_or(UtcOffset::UTC)
}

/// Accept either a bare `YYYY-MM-DD` date or a full RFC 3339 timestamp.
fn parse_known_date(value: &str, offset: UtcOffset) -> Result<Date, RecurrenceError> {
    let trimmed = value.trim();
    if let Ok(date) = Date::parse(trimmed, format_description!("[year]-[month]-[day]")) {
        return Ok(date);
    }

    OffsetDateTime::parse(trimmed, &Rfc3339)
        .map(|timestamp| timestamp.to_offset(offset).date())
        .map_err(|source| RecurrenceError::InvalidKnownDate {
            value: value.to_string(),
            source,
        })
}

fn format_midnight(date: Date, offset: UtcOffset) -> Result<String, RecurrenceError> {
    let midnight = PrimitiveDateTime::new(date, Time::MIDNIGHT)
        .assume_offset(offset)
        .to_offset(UtcOffset::UTC);
    Ok(midnight.format(&Rfc3339)?)
}

/// Move one calendar month forward, clamping the day to the target month's length.
fn add_calendar_month(date: Date) -> Result<Date, RecurrenceError> {
    let (year, month) = match date.month() {
        time::Month::December => (date.year() + 1, time::Month::January),
        other => (date.year(), other.next()),
    };

    let mut day = date.day();
    loop {
        match Date::from_calendar_date(year, month, day) {
            Ok(next) => return Ok(next),
            // Shorter month: step back towards its last day.
            Err(_) if day > 28 => day -= 1,
            Err(_) => return Err(RecurrenceError::OutOfRange),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::date;

    const ALL_DAYS: [Weekday; 7] = [
        Weekday::Monday,
        Weekday::Tuesday,
        Weekday::Wednesday,
        Weekday::Thursday,
        Weekday::Friday,
        Weekday::Saturday,
        Weekday::Sunday,
    ];

    const ALL_INTERVALS: [Interval; 4] = [
        Interval::Weekly,
        Interval::Biweekly,
        Interval::Monthly,
        Interval::Custom,
    ];

    #[test]
    fn result_is_always_after_today() {
        // 2025-06-02 is a Monday; walk a whole week of "today" values.
        for offset in 0..7 {
            let today = date!(2025 - 06 - 02) + Duration::days(offset);
            for day in ALL_DAYS {
                for interval in ALL_INTERVALS {
                    let next = next_game_date(day, interval, None, today).unwrap();
                    assert!(next > today, "{day:?}/{interval:?} from {today} gave {next}");
                    if interval != Interval::Monthly {
                        assert_eq!(next.weekday(), day);
                    }
                }
            }
        }
    }

    #[test]
    fn same_weekday_rolls_to_next_week() {
        let today = date!(2025 - 06 - 04);
        assert_eq!(today.weekday(), Weekday::Wednesday);
        let next = next_game_date(Weekday::Wednesday, Interval::Weekly, None, today).unwrap();
        assert_eq!(next, date!(2025 - 06 - 11));
    }

    #[test]
    fn future_known_date_passes_through() {
        let today = date!(2025 - 06 - 04);
        let known = date!(2025 - 06 - 06);
        for day in ALL_DAYS {
            for interval in ALL_INTERVALS {
                assert_eq!(
                    next_game_date(day, interval, Some(known), today).unwrap(),
                    known
                );
            }
        }
    }

    #[test]
    fn known_date_today_or_past_is_recomputed() {
        let today = date!(2025 - 06 - 04);
        let expected = date!(2025 - 06 - 06);
        for known in [today, date!(2025 - 05 - 01)] {
            let next =
                next_game_date(Weekday::Friday, Interval::Weekly, Some(known), today).unwrap();
            assert_eq!(next, expected);
        }
    }

    #[test]
    fn monthly_uses_calendar_months() {
        // Thursday 2025-01-30: next Friday is the 31st, one month later clamps to Feb 28.
        let today = date!(2025 - 01 - 30);
        let next = next_game_date(Weekday::Friday, Interval::Monthly, None, today).unwrap();
        assert_eq!(next, date!(2025 - 02 - 28));

        // Leap year clamps to the 29th.
        let today = date!(2024 - 01 - 30);
        let next = next_game_date(Weekday::Wednesday, Interval::Monthly, None, today).unwrap();
        assert_eq!(next, date!(2024 - 02 - 29));
    }

    #[test]
    fn monthly_crosses_year_boundary() {
        let today = date!(2025 - 12 - 20);
        let next = next_game_date(Weekday::Monday, Interval::Monthly, None, today).unwrap();
        assert_eq!(next, date!(2026 - 01 - 22));
    }

    #[test]
    fn biweekly_is_weekly_plus_seven_days() {
        let today = date!(2025 - 03 - 13);
        for day in ALL_DAYS {
            let weekly = next_game_date(day, Interval::Weekly, None, today).unwrap();
            let biweekly = next_game_date(day, Interval::Biweekly, None, today).unwrap();
            assert_eq!(biweekly - weekly, Duration::days(7));
        }
    }

    #[test]
    fn custom_matches_weekly() {
        let today = date!(2025 - 03 - 13);
        for day in ALL_DAYS {
            assert_eq!(
                next_game_date(day, Interval::Custom, None, today).unwrap(),
                next_game_date(day, Interval::Weekly, None, today).unwrap()
            );
        }
    }

    #[test]
    fn parses_names_case_insensitively() {
        assert_eq!(parse_weekday(" Saturday ").unwrap(), Weekday::Saturday);
        assert_eq!("BiWeekly".parse::<Interval>().unwrap(), Interval::Biweekly);
        assert!(matches!(
            parse_weekday("caturday"),
            Err(RecurrenceError::UnknownWeekday(_))
        ));
        assert!(matches!(
            "fortnightly".parse::<Interval>(),
            Err(RecurrenceError::UnknownInterval(_))
        ));
    }

    #[test]
    fn string_boundary_returns_future_known_date_verbatim() {
        let known = (local_today() + Duration::days(2)).to_string();
        let result = calculate_next_game_date("monday", "monthly", Some(&known)).unwrap();
        assert_eq!(result, known);
    }

    #[test]
    fn string_boundary_formats_rfc3339() {
        let result = calculate_next_game_date("friday", "weekly", None).unwrap();
        let parsed = OffsetDateTime::parse(&result, &Rfc3339).unwrap();
        assert!(parsed > OffsetDateTime::now_utc() - Duration::days(1));
        assert!(result.ends_with('Z'));
    }

    #[test]
    fn string_boundary_rejects_garbage_known_date() {
        let err = calculate_next_game_date("friday", "weekly", Some("next tuesday")).unwrap_err();
        assert!(matches!(err, RecurrenceError::InvalidKnownDate { .. }));
    }
}
