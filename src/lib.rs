//! Board-game catalog: a `/games` JSON endpoint over a blob store, plus the
//! client-side library (filtering, gated editing, import/export) that drives it.

/// Client-side catalog library.
pub mod catalog;
/// Application configuration loaded at startup.
pub mod config;
/// Persistence backends.
pub mod dao;
/// Wire types for the HTTP API.
pub mod dto;
/// Service and HTTP error types.
pub mod error;
/// Axum routers.
pub mod routes;
/// Request-independent business logic.
pub mod services;
/// Shared application state.
pub mod state;
