//! Report configuration.
//!
//! Every component takes its parameters from [`ReportConfig`]. Only the two
//! workbook paths are required in the JSON file; every other field defaults to
//! the handbag report.

use crate::error::PpaReportError;
use crate::error::ResultMessage;
use crate::report::derive::default_derived_columns;
use crate::report::derive::DerivedColumnRule;
use crate::report::layout::default_column_definitions;
use crate::report::layout::ColumnDefinition;
use crate::report::layout::TableStyle;
use crate::report::mapping::MappingOptions;
use crate::report::reader::ReadOptions;
use crate::report::select::Selection;
use crate::report::ReportError;
use serde::Deserialize;
use serde::Serialize;
use std::path::Path;
use std::path::PathBuf;

/// Sheet names inside the workbooks.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tabs {
    /// Recruitment figures, read from both workbooks
    pub recruitment: String,
    /// Category labels, read from the market workbook
    pub labels_mappings: String,
    /// Converted-client figures, not read by the handbag report
    pub conversion: String,
    /// Recruitment figures by generation, not read by the handbag report
    pub generation: String,
}

impl Default for Tabs {
    fn default() -> Self {
        Tabs {
            recruitment: "SAS 12.1 RECRUT REACH SSCAT".to_owned(),
            labels_mappings: "Params".to_owned(),
            conversion: "SAS 12.1b Focus converties".to_owned(),
            generation: "SAS 12.2 RECRUT REACH SSCAT GYZ".to_owned(),
        }
    }
}

fn default_read_options() -> ReadOptions {
    ReadOptions {
        header_row: 1,
        placeholders: vec![",".to_owned()],
        ..ReadOptions::default()
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ReportConfig {
    /// Regional workbook
    pub region_file: PathBuf,
    /// Market workbook, source of the report rows and of the labels
    pub market_file: PathBuf,
    #[serde(default)]
    pub tabs: Tabs,
    /// How the recruitment sheets are read
    #[serde(default = "default_read_options")]
    pub read: ReadOptions,
    #[serde(default)]
    pub mapping: MappingOptions,
    #[serde(default = "default_derived_columns")]
    pub derived_columns: Vec<DerivedColumnRule>,
    #[serde(default)]
    pub selection: Selection,
    #[serde(default = "default_column_definitions")]
    pub column_definitions: Vec<ColumnDefinition>,
    #[serde(default)]
    pub style: TableStyle,
}

impl ReportConfig {
    /// Default report over the two given workbooks.
    pub fn new(region_file: impl Into<PathBuf>, market_file: impl Into<PathBuf>) -> Self {
        ReportConfig {
            region_file: region_file.into(),
            market_file: market_file.into(),
            tabs: Tabs::default(),
            read: default_read_options(),
            mapping: MappingOptions::default(),
            derived_columns: default_derived_columns(),
            selection: Selection::default(),
            column_definitions: default_column_definitions(),
            style: TableStyle::default(),
        }
    }

    /// Loads a JSON configuration file. Relative workbook paths are resolved
    /// against the directory of the file.
    pub fn load(path: &Path) -> Result<Self, PpaReportError> {
        let prefix = format!("Load configuration '{}'", path.display());
        let json = std::fs::read_to_string(path)
            .map_err(PpaReportError::from)
            .with_prefix(&prefix)?;
        let mut config = Self::parse(&json).with_prefix(&prefix)?;
        if let Some(directory) = path.parent() {
            config.region_file = directory.join(&config.region_file);
            config.market_file = directory.join(&config.market_file);
        }
        log::info!("loaded configuration from '{}'", path.display());
        Ok(config)
    }

    /// Parses and validates a JSON configuration.
    pub fn parse(json: &str) -> Result<Self, PpaReportError> {
        let config: ReportConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Rejects settings no report can be built from.
    pub fn validate(&self) -> Result<(), PpaReportError> {
        if self.selection.columns.is_empty() {
            Err(ReportError::ConfigError("selection.columns is empty".to_owned()))?
        }
        if let Some(rule) = self.derived_columns.iter().find(|rule| rule.sources.is_empty()) {
            Err(ReportError::ConfigError(format!("derived column '{}' has no source", rule.name)))?
        }
        if let Some(plot) = self.column_definitions.iter().filter_map(|definition| definition.plot.as_ref()).find(|plot| plot.xlim.0 >= plot.xlim.1) {
            Err(ReportError::ConfigError(format!("bar limits {:?} are not increasing", plot.xlim)))?
        }
        Ok(())
    }
}
