//! # PPA Report
//!
//! Builds the category performance table of a market from two Excel workbooks.
//!
//! ## Pipeline
//!
//! - **Workbook reader**: one sheet of an `.xlsx` / `.xlsm` file to a [`Table`], with
//!   header-row offset, column selection, explicit names and placeholder-to-missing mapping
//! - **Mapping extractor**: category code to display label lookup
//! - **Derived columns**: currency and signed-evolution cells made of markup tokens
//! - **Selector**: equality filters, column projection and re-indexing
//! - **Renderer**: the [`Renderer`] seam, with a fixed-width [`TextRenderer`]
//!
//! Every step takes its parameters from a [`ReportConfig`].
//!
//! ```no_run
//! use ppa_report::{run, ReportConfig, TextRenderer};
//!
//! let config = ReportConfig::new("apac.xlsx", "china.xlsx");
//! let mut renderer = TextRenderer::new(std::io::stdout());
//! run(&config, &mut renderer)?;
//! # Ok::<(), ppa_report::PpaReportError>(())
//! ```

pub mod config;
pub mod database;
pub mod error;
pub(crate) mod helpers;
pub mod report;
pub mod spreadsheet;

pub use config::ReportConfig;
pub use config::Tabs;
pub use database::column::Column;
pub use database::table::Table;
pub use database::value::Value;
pub use error::PpaReportError;
pub use report::mapping::CategoryMapping;
pub use report::pipeline::run;
pub use report::reader::read_table;
pub use report::reader::ReadOptions;
pub use report::render::Renderer;
pub use report::render::Report;
pub use report::render::TextRenderer;
pub use spreadsheet::SpreadsheetError;
