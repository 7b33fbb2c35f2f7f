//! EthicSupply Gateway Library
//!
//! Supplier data access for the ethical supply-chain dashboard: a backend
//! client that follows pagination and falls back to deterministic demo data,
//! the scoring engine, the recommendation rules, and the HTTP gateway that
//! exposes them.
//!
//! # Modules
//!
//! - `backend_client`: JSON transport to the backend API.
//! - `circuit_breaker`: Circuit breaker guarding the backend.
//! - `config`: Configuration management and feature flags.
//! - `errors`: Transport errors, fallback policy, HTTP errors.
//! - `fallback_store`: In-memory supplier store used while the backend is down.
//! - `handlers`: HTTP request handlers and router.
//! - `mock_data`: Deterministic synthetic payloads.
//! - `models`: Supplier and payload types.
//! - `recommendations`: Recommendation text, suggestions and assessments.
//! - `scoring`: Ethical, environmental, social and governance scores.
//! - `services`: The supplier data client.

pub mod backend_client;
pub mod circuit_breaker;
pub mod config;
pub mod errors;
pub mod fallback_store;
pub mod handlers;
pub mod mock_data;
pub mod models;
pub mod recommendations;
pub mod scoring;
pub mod services;
