//! Calendar item types.
//!
//! [`CalendarItem`] is the display-only view of one entry from the calendar
//! listing; [`EventList`] is the listing envelope. The backend relays the
//! provider body untouched, so these types only exist on the consuming side.

use serde::{Deserialize, Serialize};

use crate::time::ItemTime;

/// Status value the provider uses for confirmed items.
pub const STATUS_CONFIRMED: &str = "confirmed";

/// A single upcoming calendar item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CalendarItem {
    /// Provider identifier.
    pub id: String,
    /// Item title. Untitled items come back without a summary.
    #[serde(default)]
    pub summary: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub start: ItemTime,
    pub end: ItemTime,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
}

impl CalendarItem {
    /// Creates an item with the required fields.
    pub fn new(
        id: impl Into<String>,
        summary: impl Into<String>,
        start: ItemTime,
        end: ItemTime,
    ) -> Self {
        Self {
            id: id.into(),
            summary: summary.into(),
            description: None,
            start,
            end,
            location: None,
            status: None,
        }
    }

    /// Builder: set the description.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Builder: set the location.
    pub fn with_location(mut self, location: impl Into<String>) -> Self {
        self.location = Some(location.into());
        self
    }

    /// Builder: set the status.
    pub fn with_status(mut self, status: impl Into<String>) -> Self {
        self.status = Some(status.into());
        self
    }

    /// Returns `true` when the provider marked the item confirmed.
    pub fn is_confirmed(&self) -> bool {
        self.status.as_deref() == Some(STATUS_CONFIRMED)
    }

    /// Returns `true` for all-day items.
    pub fn is_all_day(&self) -> bool {
        self.start.is_all_day()
    }
}

/// The listing envelope returned by the events endpoint.
///
/// Only `items` is consumed; other envelope fields are ignored.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventList {
    #[serde(default)]
    pub items: Vec<CalendarItem>,
}

impl EventList {
    /// Parses a listing body.
    pub fn from_json(body: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(body)
    }
}
