#![doc = "The `taskpulse` library crate."]
#![doc = ""]
#![doc = "This crate contains the business logic for the TaskPulse application: domain"]
#![doc = "models, authentication, routing configuration, dashboard statistics, and"]
#![doc = "error handling. It is used by the main binary (`main.rs`) to construct and"]
#![doc = "run the HTTP server."]

pub mod auth;
pub mod config;
pub mod error;
pub mod models;
pub mod routes;
pub mod stats;
