//! End-to-end report run: load, derive, select, render.

use crate::config::ReportConfig;
use crate::database::table::Table;
use crate::error::PpaReportError;
use crate::helpers::reader::ensure_source_exists;
use crate::report::derive::derive_columns;
use crate::report::mapping::extract_mapping;
use crate::report::mapping::CategoryMapping;
use crate::report::reader::read_table;
use crate::report::render::Renderer;
use crate::report::render::Report;
use crate::report::select::select_rows;

/// Tables loaded from the two workbooks.
#[derive(Clone, Debug)]
pub struct ReportData {
    pub region: Table,
    pub market: Table,
    pub label_mapping: CategoryMapping,
}

/// Loads the recruitment tables of both workbooks and the category labels of
/// the market workbook. Both paths are checked before any workbook is read.
pub fn load_data_from_files(config: &ReportConfig) -> Result<ReportData, PpaReportError> {
    ensure_source_exists(&config.region_file)?;
    ensure_source_exists(&config.market_file)?;

    let region = read_table(&config.region_file, &config.tabs.recruitment, &config.read)?;
    let market = read_table(&config.market_file, &config.tabs.recruitment, &config.read)?;
    let label_mapping = extract_mapping(&config.market_file, &config.tabs.labels_mappings, &config.mapping)?;
    log::info!(
        "loaded region ({} rows), market ({} rows) and {} category label(s)",
        region.row_count(),
        market.row_count(),
        label_mapping.len()
    );
    Ok(ReportData {
        region,
        market,
        label_mapping,
    })
}

/// Appends the derived columns to the market table and selects the report rows.
pub fn build_report_table(data: &mut ReportData, config: &ReportConfig) -> Result<Table, PpaReportError> {
    derive_columns(&mut data.market, &config.derived_columns)?;
    select_rows(&data.market, &config.selection)
}

/// Runs the whole report and hands the result to `renderer`.
pub fn run<R: Renderer>(config: &ReportConfig, renderer: &mut R) -> Result<Table, PpaReportError> {
    let mut data = load_data_from_files(config)?;
    let table = build_report_table(&mut data, config)?;
    renderer.render(&Report::new(&table, &config.column_definitions, &config.style))?;
    Ok(table)
}
