//! Aggregated reports.
//!
//! A [`Report`] wraps a [`Projection`] with a title, an optional period and
//! comments, and per-column statistics. It renders to a standalone HTML
//! page through minijinja, or to CSV (the table alone).

use std::fmt;
use std::str::FromStr;

use chrono::{Local, NaiveDate};
use minijinja::{context, Environment};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{ExportError, Result};
use crate::projection::{Cell, Projection};
use crate::serialize::{header_labels, text_rows, to_csv};
use crate::templates;

/// Footer attribution when no company name is configured.
pub const DEFAULT_COMPANY: &str = "TechRepair Admin";

/// Column statistic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Aggregation {
    Sum,
    Avg,
    Count,
    Min,
    Max,
}

impl Aggregation {
    pub fn as_str(self) -> &'static str {
        match self {
            Aggregation::Sum => "sum",
            Aggregation::Avg => "avg",
            Aggregation::Count => "count",
            Aggregation::Min => "min",
            Aggregation::Max => "max",
        }
    }

    /// Applies the aggregation. Cells are read with
    /// [`Cell::coerce_number`], so text that is not a number counts as 0.
    ///
    /// `avg`, `min` and `max` of no cells have no value.
    pub fn apply<'a>(self, cells: impl IntoIterator<Item = &'a Cell>) -> Option<f64> {
        let values: Vec<f64> = cells.into_iter().map(Cell::coerce_number).collect();
        match self {
            Aggregation::Sum => Some(values.iter().sum()),
            Aggregation::Count => Some(values.len() as f64),
            Aggregation::Avg if values.is_empty() => None,
            Aggregation::Avg => Some(values.iter().sum::<f64>() / values.len() as f64),
            Aggregation::Min => values.into_iter().reduce(f64::min),
            Aggregation::Max => values.into_iter().reduce(f64::max),
        }
    }
}

impl fmt::Display for Aggregation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Aggregation {
    type Err = ExportError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "sum" => Ok(Aggregation::Sum),
            "avg" | "average" | "mean" => Ok(Aggregation::Avg),
            "count" => Ok(Aggregation::Count),
            "min" => Ok(Aggregation::Min),
            "max" => Ok(Aggregation::Max),
            _ => Err(ExportError::UnknownAggregation(s.to_string())),
        }
    }
}

/// Reporting period, both ends inclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Period {
    pub from: NaiveDate,
    pub to: NaiveDate,
}

/// A computed statistic.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Statistic {
    pub label: String,
    pub aggregation: Aggregation,
    pub value: f64,
}

impl Statistic {
    /// Two decimals, the way the report prints it.
    pub fn formatted(&self) -> String {
        format!("{:.2}", self.value)
    }
}

/// Output format of a report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReportFormat {
    Html,
    Csv,
}

impl ReportFormat {
    pub fn extension(self) -> &'static str {
        match self {
            ReportFormat::Html => "html",
            ReportFormat::Csv => "csv",
        }
    }
}

impl FromStr for ReportFormat {
    type Err = ExportError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "html" | "pdf" => Ok(ReportFormat::Html),
            "csv" => Ok(ReportFormat::Csv),
            _ => Err(ExportError::UnknownFormat(s.to_string())),
        }
    }
}

/// A titled report over a projection.
#[derive(Debug, Clone)]
pub struct Report {
    title: String,
    projection: Projection,
    period: Option<Period>,
    comments: Option<String>,
    aggregations: Vec<(String, Aggregation)>,
    include_stats: bool,
    company: String,
    generated_on: NaiveDate,
}

impl Report {
    pub fn new(title: impl Into<String>, projection: Projection) -> Self {
        Report {
            title: title.into(),
            projection,
            period: None,
            comments: None,
            aggregations: Vec::new(),
            include_stats: true,
            company: DEFAULT_COMPANY.to_string(),
            generated_on: Local::now().date_naive(),
        }
    }

    pub fn period(mut self, from: NaiveDate, to: NaiveDate) -> Self {
        self.period = Some(Period { from, to });
        self
    }

    /// Blank comments are dropped.
    pub fn comments(mut self, comments: impl Into<String>) -> Self {
        let comments = comments.into();
        self.comments = (!comments.trim().is_empty()).then_some(comments);
        self
    }

    /// Adds a statistic for the column with `key`. Columns missing from
    /// the projection produce no statistic.
    pub fn aggregate(mut self, key: impl Into<String>, aggregation: Aggregation) -> Self {
        self.aggregations.push((key.into(), aggregation));
        self
    }

    pub fn include_stats(mut self, include: bool) -> Self {
        self.include_stats = include;
        self
    }

    pub fn company(mut self, company: impl Into<String>) -> Self {
        self.company = company.into();
        self
    }

    pub fn generated_on(mut self, date: NaiveDate) -> Self {
        self.generated_on = date;
        self
    }

    pub fn projection(&self) -> &Projection {
        &self.projection
    }

    /// Statistics in declaration order.
    pub fn statistics(&self) -> Vec<Statistic> {
        self.aggregations
            .iter()
            .filter_map(|(key, aggregation)| {
                let index = self.projection.column_index(key)?;
                let value = aggregation.apply(self.projection.column_cells(index))?;
                Some(Statistic {
                    label: self.projection.columns()[index].label.clone(),
                    aggregation: *aggregation,
                    value,
                })
            })
            .collect()
    }

    pub fn render(&self, format: ReportFormat) -> Result<String> {
        match format {
            ReportFormat::Html => self.to_html(),
            ReportFormat::Csv => to_csv(&self.projection),
        }
    }

    pub fn to_html(&self) -> Result<String> {
        let stats = self.include_stats.then(|| {
            self.statistics()
                .into_iter()
                .map(|s| {
                    context! {
                        label => s.label.clone(),
                        aggregation => s.aggregation.as_str(),
                        value => s.formatted(),
                    }
                })
                .collect::<Vec<_>>()
        });

        let mut env = Environment::new();
        env.add_template(templates::REPORT_NAME, templates::REPORT)?;
        let template = env.get_template(templates::REPORT_NAME)?;
        let html = template.render(context! {
            title => &self.title,
            generated_on => self.generated_on.format("%d.%m.%Y").to_string(),
            period => self.period,
            record_count => self.projection.len(),
            comments => &self.comments,
            stats => stats,
            headers => header_labels(&self.projection),
            rows => text_rows(&self.projection),
            company => &self.company,
        })?;
        debug!(title = %self.title, rows = self.projection.len(), "rendered report");
        Ok(html)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::projection::Column;
    use repairdesk_query::Number;

    fn cells(values: &[f64]) -> Vec<Cell> {
        values.iter().map(|v| Cell::Number(Number::F64(*v))).collect()
    }

    #[test]
    fn aggregations() {
        let c = cells(&[4500.0, 12000.0, 3500.0]);
        assert_eq!(Aggregation::Sum.apply(&c), Some(20000.0));
        assert_eq!(Aggregation::Count.apply(&c), Some(3.0));
        assert_eq!(Aggregation::Min.apply(&c), Some(3500.0));
        assert_eq!(Aggregation::Max.apply(&c), Some(12000.0));
        assert!((Aggregation::Avg.apply(&c).unwrap() - 6666.666).abs() < 0.01);
    }

    #[test]
    fn empty_aggregations() {
        let none: Vec<Cell> = Vec::new();
        assert_eq!(Aggregation::Sum.apply(&none), Some(0.0));
        assert_eq!(Aggregation::Count.apply(&none), Some(0.0));
        assert_eq!(Aggregation::Avg.apply(&none), None);
        assert_eq!(Aggregation::Min.apply(&none), None);
        assert_eq!(Aggregation::Max.apply(&none), None);
    }

    #[test]
    fn text_counts_as_zero() {
        let c = vec![Cell::Text("abc".into()), Cell::Number(Number::I64(5)), Cell::Empty];
        assert_eq!(Aggregation::Sum.apply(&c), Some(5.0));
        assert_eq!(Aggregation::Min.apply(&c), Some(0.0));
    }

    #[test]
    fn parse_aggregation() {
        assert_eq!("AVG".parse::<Aggregation>().unwrap(), Aggregation::Avg);
        assert!("median".parse::<Aggregation>().is_err());
    }

    fn report() -> Report {
        let projection = Projection::from_rows(
            vec![Column::new("device", "Device"), Column::new("cost", "Cost")],
            vec![
                vec![Cell::Text("iPhone 13".into()), Cell::Number(Number::U64(4500))],
                vec![Cell::Text("MacBook Pro".into()), Cell::Number(Number::U64(12000))],
            ],
        )
        .unwrap();
        Report::new("Orders", projection)
            .generated_on(NaiveDate::from_ymd_opt(2024, 1, 31).unwrap())
            .aggregate("cost", Aggregation::Sum)
            .aggregate("missing", Aggregation::Max)
    }

    #[test]
    fn statistics_skip_unselected_columns() {
        let stats = report().statistics();
        assert_eq!(stats.len(), 1);
        assert_eq!(stats[0].label, "Cost");
        assert_eq!(stats[0].formatted(), "16500.00");
    }

    #[test]
    fn html_report_contents() {
        let html = report()
            .period(
                NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
                NaiveDate::from_ymd_opt(2024, 1, 31).unwrap(),
            )
            .comments("Q1 <draft>")
            .company("FixIt")
            .to_html()
            .unwrap();

        assert!(html.contains("<h1>Orders</h1>"));
        assert!(html.contains("31.01.2024"));
        assert!(html.contains("2024-01-01 to 2024-01-31"));
        assert!(html.contains("<strong>Total records:</strong> 2"));
        assert!(html.contains("Q1 &lt;draft&gt;"));
        assert!(html.contains("Cost (sum)"));
        assert!(html.contains("16500.00"));
        assert!(html.contains("<td>MacBook Pro</td>"));
        assert!(html.contains("FixIt"));
    }

    #[test]
    fn stats_block_can_be_left_out() {
        let html = report().include_stats(false).to_html().unwrap();
        assert!(!html.contains("Summary statistics"));
        assert!(!html.contains("Period:"));
        assert!(!html.contains("Comments:"));
        assert!(html.contains(DEFAULT_COMPANY));
    }

    #[test]
    fn csv_report_is_the_table() {
        let csv = report().render(ReportFormat::Csv).unwrap();
        assert_eq!(csv.lines().next(), Some("Device,Cost"));
        assert_eq!(csv.lines().count(), 3);
    }
}
