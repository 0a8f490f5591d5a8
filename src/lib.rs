//! toolbelt - Polygon collision checks plus small key-value, word-count and file utilities

pub mod audit;
pub mod config;
pub mod domain;
pub mod files;
pub mod geometry;
pub mod store;
pub mod words;
