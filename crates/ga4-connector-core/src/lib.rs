pub mod config;
pub mod error;
pub mod filters;
pub mod models;
pub mod report;
pub mod service;
pub mod validate;
