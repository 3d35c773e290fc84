//! Game-session scheduling helpers.

pub mod recurrence;

pub use self::recurrence::{
    Interval, RecurrenceError, calculate_next_game_date, local_today, next_game_date,
    parse_weekday,
};
