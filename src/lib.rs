pub mod app;
pub mod cli;
pub mod config;
pub mod editor;
pub mod filter;
pub mod form;
pub mod model;
pub mod output;
pub mod pagination;
pub mod sanitizer;
pub mod scheduler;
pub mod shell;
pub mod store;
pub mod translate;
pub mod utils;

#[cfg(test)]
mod tests;
