//! Command implementations for the daybrief binary.

pub mod calendar;
pub mod config;
pub mod recap;
pub mod tasks;
pub mod workflows;
