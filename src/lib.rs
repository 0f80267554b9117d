//! LivePage - a link-in-bio page publishing service
//!
//! This library provides the core functionality for the LivePage service:
//! page creation with moderation and age-gating, post publishing, and the
//! public HTML page views.

pub mod api;
pub mod config;
pub mod db;
pub mod models;
pub mod services;
