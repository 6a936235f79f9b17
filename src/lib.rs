pub mod category;
pub mod config;
pub mod driver;
pub mod error;
pub mod histogram;
pub mod sample;
pub mod selection;
pub mod variables;
pub mod vars;
// cmd and reports are modules of the binary crate (main.rs).
