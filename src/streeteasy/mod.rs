pub mod helpers;
pub mod listing;
pub mod search;
