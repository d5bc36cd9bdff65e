//! HTTP surface for the TokenLife token engine
//!
//! Exposes refresh, revocation, introspection and a Bearer-protected
//! `me` endpoint over actix-web. Library exports exist for integration tests.

pub mod app;
pub mod config;
pub mod dto;
pub mod handlers;
pub mod middleware;
pub mod routes;
