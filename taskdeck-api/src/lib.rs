//! Shared wire-format definitions for the `TaskDeck` REST API.

pub mod activity;
pub mod auth;
pub mod comment;
pub mod task;
pub mod user;
