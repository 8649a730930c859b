//! Terminal tracker for recurring chores. Chores carry a name and a frequency in days,
//! completing one restarts its interval, and the list shows at a glance what is due,
//! overdue or never done.
//!

pub mod cli;
pub mod due;
pub mod store;
pub mod utils;
