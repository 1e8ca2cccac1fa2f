//! Library crate for artemis-back, exposing modules for binaries and integration tests.

pub mod config;
pub mod dao;
pub mod dto;
pub mod error;
pub mod routes;
pub mod security;
pub mod services;
pub mod state;
