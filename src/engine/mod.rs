pub mod calendar;
pub mod quotes;
pub mod tracker;
