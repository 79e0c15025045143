//! # chirp-entity
//!
//! Domain entity models for Chirp. Every struct in this crate represents a
//! database row or a domain value object. Row types additionally derive
//! `sqlx::FromRow`. JSON field names are camelCase to match the web client.

pub mod graph;
pub mod notification;
pub mod post;
pub mod user;
