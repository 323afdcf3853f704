pub mod display;
pub mod error;
pub mod filter;
pub mod model;
pub mod parser;
pub mod settings;
pub mod source;
pub mod store;
