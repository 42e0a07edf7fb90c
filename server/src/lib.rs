//! Event ticketing API: a moderated event catalogue, ticket sales with
//! oversell-safe inventory, organizer dashboards and an admin review queue.

pub mod auth;
pub mod config;
pub mod handlers;
pub mod models;
pub mod routes;
pub mod services;
pub mod state;
pub mod store;
pub mod utils;

pub use state::AppState;
