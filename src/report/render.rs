//! Report rendering.
//!
//! [`Renderer`] is the seam to the component drawing the final table.
//! [`TextRenderer`] draws a fixed-width text grid.

use crate::database::column::Column;
use crate::database::table::Table;
use crate::database::value::Value;
use crate::error::PpaReportError;
use crate::report::layout::BarPlot;
use crate::report::layout::ColumnDefinition;
use crate::report::layout::TableStyle;
use crate::report::markup;
use std::io::Write;

const COLUMN_SEPARATOR: &str = "  ";
const BAR: char = '█';

/// Everything a renderer needs: the table and how to show it.
#[derive(Clone, Copy, Debug)]
pub struct Report<'a> {
    pub table: &'a Table,
    /// Display rules, matched to columns by name
    pub columns: &'a [ColumnDefinition],
    pub style: &'a TableStyle,
}

impl<'a> Report<'a> {
    pub fn new(table: &'a Table, columns: &'a [ColumnDefinition], style: &'a TableStyle) -> Self {
        Report { table, columns, style }
    }

    /// Index column then data columns, each with its display rule.
    /// Columns without a rule get the default one.
    pub fn visible_columns(&self) -> Vec<(&'a Column, ColumnDefinition)> {
        self.table
            .index
            .iter()
            .chain(self.table.columns.iter())
            .map(|column| {
                let definition = self.columns
                    .iter()
                    .find(|definition| definition.name == column.name)
                    .cloned()
                    .unwrap_or_else(|| ColumnDefinition::new(&column.name));
                (column, definition)
            })
            .collect()
    }
}

/// Draws a report.
pub trait Renderer {
    fn render(&mut self, report: &Report<'_>) -> Result<(), PpaReportError>;
}

/// Fixed-width text grid written to any [`Write`].
///
/// Markup tokens are shown as their text, formatters are applied and bar plots
/// become runs of `█`. Colors and fonts are not rendered.
pub struct TextRenderer<W: Write> {
    writer: W,
    /// Characters per unit of column width
    unit_width: usize,
}

impl<W: Write> TextRenderer<W> {
    pub fn new(writer: W) -> Self {
        TextRenderer {
            writer,
            unit_width: 12,
        }
    }

    pub fn with_unit_width(mut self, unit_width: usize) -> Self {
        self.unit_width = unit_width.max(1);
        self
    }

    pub fn into_inner(self) -> W {
        self.writer
    }

    fn nominal_width(&self, definition: &ColumnDefinition) -> usize {
        ((definition.width * self.unit_width as f64).round() as usize).max(1)
    }
}

/// Lines of one cell.
fn cell_lines(value: &Value, definition: &ColumnDefinition, bar_cells: usize) -> Vec<String> {
    match (value, &definition.plot) {
        (Value::Number(number), Some(plot)) => vec![bar(*number, plot, bar_cells)],
        (Value::Text(text), _) => markup::strip(text),
        (value, _) => {
            let text = match definition.formatter {
                Some(formatter) => formatter.apply(value),
                None => value.to_string(),
            };
            vec![text]
        }
    }
}

/// A bar scaled over `xlim`, followed by its annotation.
fn bar(number: f64, plot: &BarPlot, cells: usize) -> String {
    let (lower, upper) = plot.xlim;
    let span = upper - lower;
    let ratio = if span > 0.0 { ((number - lower) / span).clamp(0.0, 1.0) } else { 0.0 };
    let length = (ratio * cells as f64).round() as usize;
    let mut text: String = std::iter::repeat(BAR).take(length).collect();
    if plot.annotate {
        let annotation = match plot.formatter {
            Some(formatter) => formatter.format(number),
            None => Value::Number(number).to_string(),
        };
        if !text.is_empty() {
            text.push(' ');
        }
        text.push_str(&annotation);
    }
    text
}

fn text_width(text: &str) -> usize {
    text.chars().count()
}

fn pad(text: &str, width: usize, align_right: bool) -> String {
    if align_right {
        format!("{:>width$}", text, width = width)
    } else {
        format!("{:<width$}", text, width = width)
    }
}

fn center(text: &str, width: usize) -> String {
    format!("{:^width$}", text, width = width)
}

fn write_line<W: Write>(writer: &mut W, cells: &[String]) -> Result<(), PpaReportError> {
    let line = cells.join(COLUMN_SEPARATOR);
    writeln!(writer, "{}", line.trim_end())?;
    Ok(())
}

impl<W: Write> Renderer for TextRenderer<W> {
    fn render(&mut self, report: &Report<'_>) -> Result<(), PpaReportError> {
        let visible = report.visible_columns();
        let row_count = report.table.row_count();

        // Cell lines per column, then the width every column needs
        let mut grid = Vec::<Vec<Vec<String>>>::with_capacity(visible.len());
        let mut widths = Vec::<usize>::with_capacity(visible.len());
        let mut right_aligned = Vec::<bool>::with_capacity(visible.len());
        for (column, definition) in &visible {
            let nominal = self.nominal_width(definition);
            let bar_cells = (nominal / 2).max(1);
            let cells: Vec<Vec<String>> = (0..row_count)
                .map(|row| {
                    let value = column.values.get(row).unwrap_or(&Value::Missing);
                    cell_lines(value, definition, bar_cells)
                })
                .collect();
            let content = cells
                .iter()
                .flatten()
                .map(|line| text_width(line))
                .chain(std::iter::once(text_width(definition.label())))
                .max()
                .unwrap_or(0);
            widths.push(nominal.max(content));
            right_aligned.push(definition.plot.is_none() && column.kind().is_numeric());
            grid.push(cells);
        }

        // Group row, spans of adjacent columns sharing a group
        if visible.iter().any(|(_, definition)| definition.group.is_some()) {
            let mut groups = Vec::<String>::new();
            let mut index = 0usize;
            while index < visible.len() {
                let group = visible[index].1.group.as_deref();
                let mut end = index + 1;
                while group.is_some() && end < visible.len() && visible[end].1.group.as_deref() == group {
                    end += 1;
                }
                let span = widths[index..end].iter().sum::<usize>() + COLUMN_SEPARATOR.len() * (end - index - 1);
                groups.push(center(group.unwrap_or(""), span));
                index = end;
            }
            write_line(&mut self.writer, &groups)?;
        }

        let titles: Vec<String> = visible
            .iter()
            .zip(&widths)
            .map(|((_, definition), width)| center(definition.label(), *width))
            .collect();
        write_line(&mut self.writer, &titles)?;

        let total_width = widths.iter().sum::<usize>() + COLUMN_SEPARATOR.len() * widths.len().saturating_sub(1);
        if report.style.col_label_divider {
            writeln!(self.writer, "{}", "-".repeat(total_width))?;
        }

        for row in 0..row_count {
            let height = grid.iter().map(|cells| cells[row].len()).max().unwrap_or(1).max(1);
            for line in 0..height {
                let cells: Vec<String> = grid
                    .iter()
                    .enumerate()
                    .map(|(index, cells)| {
                        let text = cells[row].get(line).map(String::as_str).unwrap_or("");
                        pad(text, widths[index], right_aligned[index])
                    })
                    .collect();
                write_line(&mut self.writer, &cells)?;
            }
            if report.style.row_dividers && row + 1 < row_count {
                writeln!(self.writer, "{}", "-".repeat(total_width))?;
            }
        }

        self.writer.flush()?;
        log::debug!("rendered {} row(s) x {} column(s)", row_count, visible.len());
        Ok(())
    }
}
