//! `issuetrack` - Project-scoped issue tracking CRUD service.
//!
//! This crate provides the HTTP surface for the `issuetrackd` binary,
//! exposing one resource route over the `issues-lib` document store.
//!
//! # Architecture
//!
//! - [`api`] - axum router and request handlers
//! - [`config`] - Command-line and environment configuration using clap
//! - [`logging`] - tracing subscriber setup

#![forbid(unsafe_code)]
#![warn(clippy::pedantic, clippy::nursery)]
#![allow(clippy::module_name_repetitions)]

pub mod api;
pub mod config;
pub mod logging;

pub use api::{AppState, build_router};
