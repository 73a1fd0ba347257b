//! Report building on top of the table model.
//!
//! The pipeline reads a region and a market workbook, derives the display
//! columns, selects the report rows and hands the result to a [`render::Renderer`].

pub mod derive;
pub mod format;
pub mod layout;
pub mod mapping;
pub mod markup;
pub mod pipeline;
pub mod reader;
pub mod render;
pub mod select;

use thiserror::Error;

/// Errors raised by the report layer.
#[derive(Error, Debug)]
pub enum ReportError {
    #[error("Invalid parameter '{name}': {message}")]
    InvalidParameter { name: String, message: String },

    #[error("Invalid configuration: {0}")]
    ConfigError(String),
}
