pub mod api;
pub mod cliopt;
pub mod common;
pub mod config;
pub mod decode;
pub mod engine;
pub mod error;
pub mod logging;
pub mod mapping;
pub mod model;
pub mod query;
pub mod series;
pub mod store;

#[cfg(test)]
pub(crate) mod test_utils;
