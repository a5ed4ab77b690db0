//! Command-line interface

pub mod commands;
pub mod render;

pub use render::TextReport;
