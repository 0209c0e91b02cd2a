// src/lib.rs — Library root for specialist-desk

pub mod cli;
pub mod infra;
pub mod presence;
pub mod session;
pub mod tui;
