pub mod catalog;
pub mod parser;
