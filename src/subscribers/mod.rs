//! Subscriber API: the [`Subscribe`] trait, the fan-out set, and the
//! stdout [`LogWriter`].

mod log;
mod set;
mod subscribe;

pub use log::LogWriter;
pub use set::SubscriberSet;
pub use subscribe::Subscribe;
