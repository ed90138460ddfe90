//! Explicit per-user state: the selected school and date, the fetched menu,
//! and the set of items whose automatic lookup already ran.

pub mod state;

pub use state::{MenuSession, SessionError};
