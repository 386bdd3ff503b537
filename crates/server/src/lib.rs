//! HTTP service for recording self-played chess games against a local
//! SQLite store.

pub mod config;
pub mod db;
pub mod error;
pub mod routes;
pub mod session;
