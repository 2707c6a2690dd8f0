pub mod auth;
pub mod cache;
pub mod config;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod routes;
pub mod state;

pub use routes::app;
pub use state::AppState;

#[cfg(test)]
pub mod testing;
