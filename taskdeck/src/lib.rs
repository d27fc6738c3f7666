//! `TaskDeck` — terminal kanban client library.

pub mod api;
pub mod app;
pub mod board;
pub mod config;
pub mod debounce;
pub mod drag;
pub mod session;
pub mod storage;
pub mod store;
pub mod ui;
pub mod worker;
