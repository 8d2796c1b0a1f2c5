//! Core types: calendar items, dashboard state, card formatting, tracing

pub mod event;
pub mod format;
pub mod time;
pub mod tracing;
pub mod view;

pub use event::{CalendarItem, EventList, STATUS_CONFIRMED};
pub use format::{CardOptions, EventCard, ellipsis, render_cards};
pub use time::{ItemTime, ItemTimeError};
pub use tracing::{TracingConfig, TracingError, TracingOutputFormat, init_tracing};
pub use view::{Dashboard, DashboardStatus};
