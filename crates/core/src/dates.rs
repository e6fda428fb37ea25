//! Relative date keywords.
//!
//! Only a fixed set of keywords is understood; anything richer is left to
//! the model, which receives the concrete reference dates in its prompt.

use chrono::{Datelike, Days, NaiveDate, Weekday};

/// Maps "hoy", "mañana", "pasado mañana" (and their English forms) to a
/// concrete date relative to `today`. Returns `None` for anything else.
pub fn resolve_relative_date(value: &str, today: NaiveDate) -> Option<NaiveDate> {
    let offset = match value.trim().to_lowercase().as_str() {
        "hoy" | "today" => 0,
        "mañana" | "manana" | "tomorrow" => 1,
        "pasado mañana" | "pasado manana" | "day after tomorrow" => 2,
        _ => return None,
    };
    today.checked_add_days(Days::new(offset))
}

/// Spanish weekday name, used when rendering reference dates for the model.
pub fn weekday_name(date: NaiveDate) -> &'static str {
    match date.weekday() {
        Weekday::Mon => "lunes",
        Weekday::Tue => "martes",
        Weekday::Wed => "miércoles",
        Weekday::Thu => "jueves",
        Weekday::Fri => "viernes",
        Weekday::Sat => "sábado",
        Weekday::Sun => "domingo",
    }
}
