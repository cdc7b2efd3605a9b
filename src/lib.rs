pub mod app;
pub mod cli;
pub mod config;
pub mod loader;
pub mod model;
pub mod output;
pub mod transform;
pub mod utils;
pub mod view;

#[cfg(test)]
mod tests;
