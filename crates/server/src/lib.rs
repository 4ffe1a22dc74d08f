// Teamcal server library
// Decision: Shared library for binaries (API server, OpenAPI export) and integration tests

// API routes and types (shared for OpenAPI generation)
pub mod api;

// Authentication module
pub mod auth;

// Environment configuration
pub mod config;

// Router assembly
pub mod router;

// Services layer
pub mod services;

// Storage layer
pub mod storage;

// OpenAPI spec generation
pub mod openapi;

pub use config::ServerConfig;
pub use router::build_router;
