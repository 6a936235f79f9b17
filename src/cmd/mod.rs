pub mod categorize;
pub mod inspect;
