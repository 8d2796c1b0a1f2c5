//! Event card formatting.
//!
//! An [`EventCard`] is the text rendering of one [`CalendarItem`]: title,
//! an optional confirmation badge, a short description, the date, the time
//! range and the location.
//!
//! # Example
//!
//! ```rust
//! use calproxy_core::format::{CardOptions, EventCard};
//! use calproxy_core::{CalendarItem, ItemTime};
//! use chrono::{TimeZone, Utc};
//!
//! let item = CalendarItem::new(
//!     "evt1",
//!     "Team sync",
//!     ItemTime::from_datetime(Utc.with_ymd_and_hms(2024, 3, 15, 10, 0, 0).unwrap()),
//!     ItemTime::from_datetime(Utc.with_ymd_and_hms(2024, 3, 15, 11, 0, 0).unwrap()),
//! );
//! let card = EventCard::new(&item, &Utc, &CardOptions::default());
//! assert_eq!(card.time_line, "10:00 - 11:00");
//! ```

use std::borrow::Cow;
use std::fmt::Display;

use chrono::TimeZone;

use crate::event::CalendarItem;
use crate::time::ItemTime;

/// Label shown instead of a time range for all-day items.
pub const ALL_DAY_LABEL: &str = "All day";

/// Badge shown on confirmed items.
pub const CONFIRMED_BADGE: &str = "Confirmed";

/// Options for card rendering.
#[derive(Debug, Clone)]
pub struct CardOptions {
    /// Maximum description length (truncated with ellipsis).
    pub max_description_length: Option<usize>,
    /// `strftime` pattern for the date line.
    pub date_format: String,
    /// `strftime` pattern for each end of the time range.
    pub time_format: String,
}

impl Default for CardOptions {
    fn default() -> Self {
        Self {
            max_description_length: Some(120),
            date_format: "%d %B".to_string(),
            time_format: "%H:%M".to_string(),
        }
    }
}

/// A display-ready card for one calendar item.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventCard {
    pub title: String,
    pub badge: Option<&'static str>,
    pub description: Option<String>,
    pub date_line: String,
    pub time_line: String,
    pub location: Option<String>,
}

impl EventCard {
    /// Builds a card, rendering times as seen from `tz`.
    pub fn new<Tz>(item: &CalendarItem, tz: &Tz, options: &CardOptions) -> Self
    where
        Tz: TimeZone,
        Tz::Offset: Display,
    {
        let description = item
            .description
            .as_deref()
            .filter(|d| !d.trim().is_empty())
            .map(|d| match options.max_description_length {
                Some(max) => ellipsis(d, max).into_owned(),
                None => d.to_string(),
            });

        Self {
            title: item.summary.clone(),
            badge: item.is_confirmed().then_some(CONFIRMED_BADGE),
            description,
            date_line: item
                .start
                .date_in(tz)
                .format(&options.date_format)
                .to_string(),
            time_line: time_range(&item.start, &item.end, tz, &options.time_format),
            location: item.location.clone().filter(|l| !l.trim().is_empty()),
        }
    }

    /// Renders the card as plain text, one field per line.
    pub fn render(&self) -> String {
        let mut lines = Vec::with_capacity(6);
        match self.badge {
            Some(badge) => lines.push(format!("{} [{}]", self.title, badge)),
            None => lines.push(self.title.clone()),
        }
        if let Some(ref description) = self.description {
            lines.push(format!("  {}", description));
        }
        lines.push(format!("  Date: {}", self.date_line));
        lines.push(format!("  Time: {}", self.time_line));
        if let Some(ref location) = self.location {
            lines.push(format!("  Where: {}", location));
        }
        lines.join("\n")
    }
}

/// Formats the time range of an item.
///
/// Items starting at a date rather than an instant are all-day. An all-day
/// end on a timed item is read as midnight UTC of that date.
pub fn time_range<Tz>(start: &ItemTime, end: &ItemTime, tz: &Tz, pattern: &str) -> String
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    match start.as_datetime() {
        Some(start) => {
            let end = end.to_utc_datetime();
            format!(
                "{} - {}",
                start.with_timezone(tz).format(pattern),
                end.with_timezone(tz).format(pattern)
            )
        }
        None => ALL_DAY_LABEL.to_string(),
    }
}

/// Truncates a string to a maximum number of characters, appending `...`.
pub fn ellipsis(s: &str, max_len: usize) -> Cow<'_, str> {
    if max_len == 0 {
        return Cow::Borrowed("");
    }

    if s.chars().count() <= max_len {
        return Cow::Borrowed(s);
    }

    let truncated: String = s.chars().take(max_len.saturating_sub(3)).collect();
    Cow::Owned(format!("{}...", truncated))
}

/// Renders every item as a card separated by blank lines.
pub fn render_cards<Tz>(items: &[CalendarItem], tz: &Tz, options: &CardOptions) -> String
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    items
        .iter()
        .map(|item| EventCard::new(item, tz, options).render())
        .collect::<Vec<_>>()
        .join("\n\n")
}
