//! Client-side orchestration for the readmission risk dashboard: per-section
//! loading and rendering, chart composition, and confirmed commands that
//! cascade reloads into the sections they affect.

pub mod charts;
pub mod commands;
pub mod config;
pub mod controller;
pub mod csrf;
pub mod dashboard;
pub mod document;
pub mod fetcher;
pub mod fragment;
pub mod models;
pub mod prompt;
pub mod render;
pub mod report;
#[cfg(test)]
mod test_support;
