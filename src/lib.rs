//! Course attendance tracking: courses, daily present/absent marks and
//! attendance percentages, stored in SQLite.

pub mod auth;
pub mod cli;
pub mod date_key;
pub mod db;
pub mod display;
pub mod error;
pub mod import;
pub mod manager;
pub mod models;
pub mod pages;
pub mod routes;
pub mod schema;
pub mod session;
pub mod session_file;
pub mod settings;
pub mod summary;

pub use error::{Error, Result};
