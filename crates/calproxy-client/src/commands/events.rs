//! The events dashboard.

use std::fmt::Display;

use chrono::TimeZone;
use tracing::debug;

use calproxy_core::{CardOptions, Dashboard, DashboardStatus, render_cards};

use crate::backend::BackendClient;
use crate::error::ClientResult;

/// Fetches upcoming events and prints them as cards.
pub async fn show<Tz>(
    client: &BackendClient,
    session: Option<&str>,
    tz: &Tz,
    options: &CardOptions,
) -> ClientResult<()>
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    let mut dashboard = Dashboard::new();
    if let Some(session) = session {
        dashboard.sign_in(session);
        let fetched = client.events().await.map(|list| list.items);
        let count = dashboard.finish_fetch(fetched)?;
        debug!(count, "fetched events");
    }

    let login_url = client.login_url()?;
    println!("{}", render(&dashboard, tz, options, login_url.as_str()));
    Ok(())
}

/// Renders the dashboard for a terminal.
pub fn render<Tz>(dashboard: &Dashboard, tz: &Tz, options: &CardOptions, login_url: &str) -> String
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    match dashboard.status() {
        DashboardStatus::SignedOut => format!(
            "Not signed in. Open {} in a browser, then pass the session cookie with --session.",
            login_url
        ),
        DashboardStatus::Loading => "Loading...".to_string(),
        DashboardStatus::Empty => "No upcoming events.".to_string(),
        DashboardStatus::Ready => render_cards(dashboard.events(), tz, options),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use calproxy_core::{CalendarItem, ItemTime};
    use chrono::{NaiveDate, Utc};

    const LOGIN: &str = "http://localhost:4000/api/auth/google";

    #[test]
    fn signed_out_points_at_login() {
        let out = render(&Dashboard::new(), &Utc, &CardOptions::default(), LOGIN);
        assert!(out.contains(LOGIN));
    }

    #[test]
    fn empty_listing() {
        let mut dashboard = Dashboard::new();
        dashboard.sign_in("cookie");
        dashboard.finish_fetch::<()>(Ok(vec![])).unwrap();
        assert_eq!(
            render(&dashboard, &Utc, &CardOptions::default(), LOGIN),
            "No upcoming events."
        );
    }

    #[test]
    fn ready_renders_cards() {
        let day = NaiveDate::from_ymd_opt(2026, 3, 2).unwrap();
        let item = CalendarItem::new(
            "e1",
            "Offsite",
            ItemTime::from_date(day),
            ItemTime::from_date(day.succ_opt().unwrap()),
        );

        let mut dashboard = Dashboard::new();
        dashboard.sign_in("cookie");
        dashboard.finish_fetch::<()>(Ok(vec![item])).unwrap();

        let out = render(&dashboard, &Utc, &CardOptions::default(), LOGIN);
        assert!(out.starts_with("Offsite"));
        assert!(out.contains("All day"));
    }
}
