pub mod apartment;
pub mod search;
