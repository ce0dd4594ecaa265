//! # Airnav Backend
//!
//! Indoor wayfinding engine for an airport terminal.
//!
//! The terminal is modelled as named locations on a 2D plane, weighted paths
//! between them and wall segments that block movement. The engine answers
//! shortest-route queries that avoid walls and keeps a congestion reading per
//! path. An Axum REST API exposes map editing, navigation and a live
//! congestion feed.
//!
//! ## Architecture
//!
//! - [`algorithms`]: geometry kernel, graph builder, congestion model and pathfinder
//! - [`models`]: map entities and write models
//! - [`db`]: repository traits, in-memory and Postgres backends, validated CRUD
//! - [`services`]: map queries, congestion refresh, seed layout
//! - [`config`]: TOML + environment configuration
//! - [`http`]: Axum server and request handlers
//!

// Allow large error types - RepositoryError contains rich context for debugging
#![allow(clippy::result_large_err)]

pub mod algorithms;
pub mod config;
pub mod db;
pub mod models;
pub mod services;

#[cfg(feature = "http-server")]
pub mod http;
