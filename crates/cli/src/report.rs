//! Text rendering of per-city aggregates.

use std::fmt;

use citycmp_core::{Aggregate, CompareDb, Error, Metric};

/// Width of a full bar, in characters.
pub const BAR_WIDTH: usize = 40;

const BAR_CHAR: char = '#';

/// One metric across every city in the report.
#[derive(Debug, Clone, PartialEq)]
pub struct MetricRow {
    pub metric: Metric,
    pub values: Vec<Aggregate>,
}

/// Every metric for one or more cities, in the order queried.
#[derive(Debug, Clone, PartialEq)]
pub struct Report {
    pub rows: Vec<MetricRow>,
}

impl Report {
    /// Query every metric for `cities`.
    pub async fn build(db: &CompareDb, cities: &[&str]) -> Result<Self, Error> {
        let mut rows = Vec::with_capacity(Metric::ALL.len());
        for metric in Metric::ALL {
            let mut values = Vec::with_capacity(cities.len());
            for city in cities {
                values.push(db.query_aggregate(city, metric).await?);
            }
            rows.push(MetricRow { metric, values });
        }
        Ok(Self { rows })
    }

    pub fn row(&self, metric: Metric) -> Option<&MetricRow> {
        self.rows.iter().find(|row| row.metric == metric)
    }

    fn title(&self) -> String {
        self.rows
            .first()
            .map(|row| row.values.iter().map(|v| v.city.as_str()).collect::<Vec<_>>().join(" vs "))
            .unwrap_or_default()
    }

    fn name_width(&self) -> usize {
        self.rows.iter().flat_map(|row| row.values.iter()).map(|v| v.city.chars().count()).max().unwrap_or(0)
    }
}

impl fmt::Display for Report {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.title())?;
        let width = self.name_width();

        for row in &self.rows {
            writeln!(f)?;
            writeln!(f, "{}", row.metric.label())?;

            let max = row.values.iter().filter_map(|v| v.value).fold(0.0_f64, f64::max);
            for value in &row.values {
                let bar = bar(value.value, max, BAR_WIDTH);
                writeln!(
                    f,
                    "  {:<width$} | {:<BAR_WIDTH$} {}",
                    value.city,
                    bar,
                    format_value(row.metric, value.value)
                )?;
            }

            if let [first, second] = row.values.as_slice() {
                writeln!(f, "  {}", verdict(row.metric, first, second))?;
            }
        }

        Ok(())
    }
}

/// A bar of `width * value / max` characters, rounded. Empty for missing or
/// non-positive values.
pub fn bar(value: Option<f64>, max: f64, width: usize) -> String {
    let Some(value) = value.filter(|v| *v > 0.0 && max > 0.0) else {
        return String::new();
    };
    let len = ((value / max) * width as f64).round() as usize;
    std::iter::repeat_n(BAR_CHAR, len.min(width)).collect()
}

fn format_value(metric: Metric, value: Option<f64>) -> String {
    match (metric, value) {
        (_, None) => "n/a".to_string(),
        (Metric::RestaurantCount | Metric::EventCount, Some(v)) => format!("{v:.0}"),
        (_, Some(v)) => format!("{v:.2}"),
    }
}

/// One sentence naming the city ahead on `metric`.
pub fn verdict(metric: Metric, first: &Aggregate, second: &Aggregate) -> String {
    let (a, b) = match (first.value, second.value) {
        (Some(a), Some(b)) => (a, b),
        (None, _) => return format!("No {} data for {}", metric.label().to_lowercase(), first.city),
        (_, None) => return format!("No {} data for {}", metric.label().to_lowercase(), second.city),
    };

    if (a - b).abs() < f64::EPSILON {
        return format!("{} and {} tie on {}", first.city, second.city, metric.label().to_lowercase());
    }

    let winner = if a > b { &first.city } else { &second.city };
    match metric {
        Metric::RestaurantCount => format!("{winner} has more restaurants"),
        Metric::AverageRating => format!("{winner} has better rated restaurants"),
        Metric::AverageReviewCount => format!("{winner} has more reviewed restaurants"),
        Metric::EventCount => format!("{winner} has more events"),
    }
}
