//! Event subscribers: the observability extension point.
//!
//! ## Contents
//! - [`Subscribe`] the subscriber contract
//! - [`SubscriberSet`] non-blocking fan-out with per-subscriber queues
//! - [`LogWriter`] built-in structured-log subscriber (`logging` feature)
//!
//! Subscribers handed to
//! [`Supervisor::initialize`](crate::Supervisor::initialize) observe every
//! runtime event, bootstrap included.

mod set;
mod subscribe;

pub use set::SubscriberSet;
pub use subscribe::Subscribe;

#[cfg(feature = "logging")]
mod log;
#[cfg(feature = "logging")]
pub use log::LogWriter;
