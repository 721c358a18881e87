//! CLI layer for the fmq binary: argument parsing and command handlers

pub mod args;
pub mod commands;
