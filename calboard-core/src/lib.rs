//! Core library for calboard.
//!
//! An in-memory calendar event store for engineering and field-service
//! scheduling:
//! - `repository` holds the canonical, start-time-sorted event collection
//! - `filter` reduces it to the visible set
//! - `query` buckets visible events into days, weeks, months and grids
//! - `store` ties these together behind an observable `CalendarStore`
//! - `ics` exports events as iCalendar text

pub mod clock;
pub mod config;
pub mod date_range;
pub mod error;
pub mod event;
pub mod filter;
pub mod ics;
pub mod locale;
pub mod lookup;
pub mod query;
pub mod repository;
pub mod seed;
pub mod store;
pub mod view;

pub use clock::{Clock, FixedClock, SystemClock};
pub use crate::config::CalBoardConfig;
pub use date_range::DateRange;
pub use error::{CalBoardError, CalBoardResult};
pub use event::{
    Assignee, CalendarEvent, EventPatch, EventStatus, EventType, NewEvent, Priority, TypeFamily,
};
pub use filter::{CalendarFilters, FilterUpdate, RoleContext, compute_visible};
pub use locale::Locale;
pub use lookup::{CurrencyFormat, color_for_status, color_for_type};
pub use repository::{EventRecord, EventRepository};
pub use store::{CalendarStore, StoreChange, SubscriptionId};
pub use view::{ViewMode, ViewState};
