//! HTTP client for the donation intake service.
//!
//! Provides the reqwest-backed [`api::IntakeApi`], which implements the
//! [`IntakeBackend`](intake_core::backend::IntakeBackend) port, and the
//! environment-driven [`config::ClientConfig`].

pub mod api;
pub mod config;
