//! Dashboard state.
//!
//! The dashboard holds the sign-in credential, the fetched items and a
//! loading flag. It does no I/O: callers start a fetch with
//! [`Dashboard::sign_in`] or [`Dashboard::refresh`], perform it, and report
//! the outcome with [`Dashboard::finish_fetch`].

use crate::event::CalendarItem;

/// What the dashboard currently shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DashboardStatus {
    /// No credential.
    SignedOut,
    /// A fetch is in flight.
    Loading,
    /// Signed in, no upcoming items.
    Empty,
    /// Signed in with items to show.
    Ready,
}

/// Client-side dashboard state.
#[derive(Debug, Clone, Default)]
pub struct Dashboard {
    access_token: Option<String>,
    events: Vec<CalendarItem>,
    is_loading: bool,
}

impl Dashboard {
    /// Creates a signed-out dashboard.
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores the credential and starts a fetch.
    ///
    /// Returns the credential the fetch should use.
    pub fn sign_in(&mut self, token: impl Into<String>) -> &str {
        self.is_loading = true;
        self.access_token.insert(token.into())
    }

    /// Starts a new fetch with the current credential.
    ///
    /// Returns `None` when signed out.
    pub fn refresh(&mut self) -> Option<&str> {
        if self.access_token.is_none() {
            return None;
        }
        self.is_loading = true;
        self.access_token.as_deref()
    }

    /// Records the outcome of a fetch.
    ///
    /// The loading flag is cleared whatever the outcome. Results arriving
    /// after sign-out are dropped.
    pub fn finish_fetch<E>(&mut self, result: Result<Vec<CalendarItem>, E>) -> Result<usize, E> {
        self.is_loading = false;
        let items = result?;
        if self.access_token.is_none() {
            return Ok(0);
        }
        self.events = items;
        Ok(self.events.len())
    }

    /// Clears the credential and the item list.
    pub fn sign_out(&mut self) {
        self.access_token = None;
        self.events.clear();
        self.is_loading = false;
    }

    pub fn access_token(&self) -> Option<&str> {
        self.access_token.as_deref()
    }

    pub fn events(&self) -> &[CalendarItem] {
        &self.events
    }

    pub fn is_loading(&self) -> bool {
        self.is_loading
    }

    pub fn is_signed_in(&self) -> bool {
        self.access_token.is_some()
    }

    /// Returns what the dashboard should display.
    pub fn status(&self) -> DashboardStatus {
        if !self.is_signed_in() {
            DashboardStatus::SignedOut
        } else if self.is_loading {
            DashboardStatus::Loading
        } else if self.events.is_empty() {
            DashboardStatus::Empty
        } else {
            DashboardStatus::Ready
        }
    }
}
