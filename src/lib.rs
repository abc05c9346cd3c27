pub mod audio;
pub mod catalog;
pub mod config;
pub mod db;
pub mod domain;
pub mod error;
pub mod filters;
pub mod handlers;
pub mod paths;
pub mod quiz;
pub mod routes;
pub mod session;
pub mod state;

#[cfg(test)]
pub mod testing;
