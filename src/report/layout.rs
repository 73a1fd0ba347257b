//! Display rules of the report columns.

use crate::report::format::Formatter;
use serde::Deserialize;
use serde::Serialize;

/// Inline bar drawn in a cell.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BarPlot {
    /// Write the formatted value next to the bar
    pub annotate: bool,
    /// Bar height relative to the row
    pub height: f64,
    pub line_width: f64,
    /// Value range spanned by the cell
    pub xlim: (f64, f64),
    /// Formatter of the annotation
    pub formatter: Option<Formatter>,
    pub color: String,
}

impl Default for BarPlot {
    fn default() -> Self {
        BarPlot {
            annotate: true,
            height: 0.95,
            line_width: 0.0,
            xlim: (0.0, 1.0),
            formatter: Some(Formatter::DecimalToPercent),
            color: "#d2b496".to_owned(),
        }
    }
}

/// How one report column is shown.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ColumnDefinition {
    pub name: String,
    /// Column label, the column name when absent
    #[serde(default)]
    pub title: Option<String>,
    /// Label shared by adjacent columns above their titles
    #[serde(default)]
    pub group: Option<String>,
    #[serde(default = "default_width")]
    pub width: f64,
    #[serde(default)]
    pub formatter: Option<Formatter>,
    #[serde(default)]
    pub plot: Option<BarPlot>,
    /// Font family override
    #[serde(default)]
    pub family: Option<String>,
}

fn default_width() -> f64 {
    1.0
}

impl ColumnDefinition {
    pub fn new(name: &str) -> Self {
        ColumnDefinition {
            name: name.to_owned(),
            title: None,
            group: None,
            width: default_width(),
            formatter: None,
            plot: None,
            family: None,
        }
    }

    pub fn title(mut self, title: &str) -> Self {
        self.title = Some(title.to_owned());
        self
    }

    pub fn group(mut self, group: &str) -> Self {
        self.group = Some(group.to_owned());
        self
    }

    pub fn width(mut self, width: f64) -> Self {
        self.width = width;
        self
    }

    pub fn formatter(mut self, formatter: Formatter) -> Self {
        self.formatter = Some(formatter);
        self
    }

    pub fn plot(mut self, plot: BarPlot) -> Self {
        self.plot = Some(plot);
        self
    }

    pub fn family(mut self, family: &str) -> Self {
        self.family = Some(family.to_owned());
        self
    }

    /// Label written in the title row.
    pub fn label(&self) -> &str {
        self.title.as_deref().unwrap_or(&self.name)
    }
}

/// Table-wide presentation switches.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TableStyle {
    /// Line under the column labels
    pub col_label_divider: bool,
    /// Lines between data rows
    pub row_dividers: bool,
    /// Height of the column label cells
    pub col_label_height: f64,
    pub font_family: String,
    pub font_size: f64,
}

impl Default for TableStyle {
    fn default() -> Self {
        TableStyle {
            col_label_divider: false,
            row_dividers: false,
            col_label_height: 0.5,
            font_family: "Century Gothic".to_owned(),
            font_size: 8.0,
        }
    }
}

/// Display rules of the handbag report.
pub fn default_column_definitions() -> Vec<ColumnDefinition> {
    let share_bar = BarPlot {
        xlim: (-0.1, 0.5),
        ..BarPlot::default()
    };
    let repeat_bar = BarPlot {
        xlim: (-0.1, 0.7),
        ..BarPlot::default()
    };
    vec![
        ColumnDefinition::new("micro_categorie").title(" ").width(1.25),
        ColumnDefinition::new("first_purch_to").title("").group("Entry T.O.").width(0.75),
        ColumnDefinition::new("evol_first_purch_to").title("vs LY.").group("Entry T.O.").width(0.75),
        ColumnDefinition::new("share_of_entry_ty").title("").group("Share of entry").width(1.25).plot(share_bar),
        ColumnDefinition::new("evol_share_of_entry")
            .title("vs LY.")
            .group("Share of entry")
            .width(0.75)
            .formatter(Formatter::PercentagePoints)
            .family("sans-serif"),
        ColumnDefinition::new("recr_index_ty").title("").group("Recruitment Index").width(0.75),
        ColumnDefinition::new("evol_recr_index")
            .title("vs LY.")
            .group("Recruitment Index")
            .width(0.75)
            .formatter(Formatter::Pct),
        ColumnDefinition::new("repeat_rate_ty").title(" ").group("Repeat Rate").width(1.25).plot(repeat_bar),
        ColumnDefinition::new("evol_repeat_rate")
            .title("vs LY.")
            .group("Repeat Rate")
            .width(0.75)
            .formatter(Formatter::PercentagePoints)
            .family("sans-serif"),
        ColumnDefinition::new("repeat_to_ty").title(" ").group("Repeat TO").formatter(Formatter::Kdollar),
        ColumnDefinition::new("evol_repeat_to")
            .title("vs LY.")
            .group("Repeat TO")
            .width(0.75)
            .formatter(Formatter::Pct),
    ]
}
