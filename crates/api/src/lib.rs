//! MarketHub API library.
//!
//! This crate provides the marketplace API as a library, allowing it to be
//! tested and reused (the CLI uses the repositories for seeding).

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod config;
pub mod db;
pub mod error;
pub mod middleware;
pub mod models;
pub mod response;
pub mod routes;
pub mod services;
pub mod state;

/// Embedded database migrations, run explicitly via the CLI.
pub static MIGRATOR: sqlx::migrate::Migrator = sqlx::migrate!("./migrations");
