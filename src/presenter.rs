use std::iter::{once, repeat_n};

use itertools::Itertools;

use crate::{
    error::{VpError, VpResult},
    prediction::{NextWeek, PastWeek, PredictionResponse},
};

pub static NOT_AVAILABLE: &str = "N/A";

#[derive(Clone, Copy, Debug, Eq, PartialEq, strum::Display)]
#[strum(serialize_all = "lowercase")]
pub enum Sign {
    Positive,
    Negative,
}

#[derive(Clone, Debug, PartialEq)]
pub struct PercentCell {
    pub value: Option<f64>,
    pub text: String,
    pub sign: Option<Sign>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct PriceFields {
    pub past_week_open: String,
    pub past_week_close: String,
    pub current: String,
    pub predicted: String,
}

#[derive(Clone, Debug, PartialEq)]
pub struct TableRow {
    pub date: String,
    pub price: String,
    pub change: PercentCell,
}

/// Both series share the label axis, `None` marks a slot without a data point.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ChartSeries {
    pub labels: Vec<String>,
    pub actual: Vec<Option<f64>>,
    pub predicted: Vec<Option<f64>>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct RenderModel {
    pub company_name: String,
    pub stock_symbol: String,
    pub prices: PriceFields,
    pub past_week_change: PercentCell,
    pub next_week_change: PercentCell,
    pub rows: Vec<TableRow>,
    pub chart: ChartSeries,
}

impl Sign {
    /// Zero counts as positive.
    pub fn of(value: f64) -> Self {
        if value >= 0.0 {
            Self::Positive
        } else {
            Self::Negative
        }
    }
}

impl PercentCell {
    pub fn new(value: Option<f64>) -> Self {
        match value.filter(|v| v.is_finite()) {
            Some(v) => Self {
                value: Some(v),
                text: format_percent(v),
                sign: Some(Sign::of(v)),
            },
            None => Self {
                value: None,
                text: NOT_AVAILABLE.to_string(),
                sign: None,
            },
        }
    }
}

impl ChartSeries {
    pub fn new(past_week: &PastWeek, next_week: &NextWeek) -> Self {
        let labels = past_week
            .dates
            .iter()
            .chain(&next_week.dates)
            .cloned()
            .collect();

        let actual = past_week
            .prices
            .iter()
            .copied()
            .map(Some)
            .chain(repeat_n(None, next_week.dates.len()))
            .collect();

        let predicted = repeat_n(None, past_week.dates.len())
            .chain(next_week.predictions.iter().copied().map(Some))
            .collect();

        Self {
            labels,
            actual,
            predicted,
        }
    }

    pub fn actual_points(&self) -> Vec<[f64; 2]> {
        to_points(&self.actual)
    }

    pub fn predicted_points(&self) -> Vec<[f64; 2]> {
        to_points(&self.predicted)
    }

    pub fn label_at(&self, x: f64) -> Option<&str> {
        let i = x.round();
        if i < 0.0 {
            return None;
        }

        self.labels.get(i as usize).map(String::as_str)
    }
}

pub fn render(response: &PredictionResponse) -> VpResult<RenderModel> {
    response.validate()?;

    let PredictionResponse {
        company_name,
        stock_symbol,
        current_price,
        past_week,
        next_week,
    } = response;

    let past_week_open = past_week.prices.first().ok_or_else(|| no_data("past_week"))?;
    let past_week_close = past_week.prices.last().ok_or_else(|| no_data("past_week"))?;
    let predicted = next_week
        .predictions
        .last()
        .ok_or_else(|| no_data("next_week"))?;

    let rows = next_week
        .dates
        .iter()
        .zip(&next_week.predictions)
        .zip(daily_changes(*current_price, &next_week.predictions))
        .map(|((date, price), change)| TableRow {
            date: date.to_string(),
            price: format_currency(*price),
            change: PercentCell::new(change),
        })
        .collect();

    Ok(RenderModel {
        company_name: company_name.to_string(),
        stock_symbol: stock_symbol.to_string(),
        prices: PriceFields {
            past_week_open: format_currency(*past_week_open),
            past_week_close: format_currency(*past_week_close),
            current: format_currency(*current_price),
            predicted: format_currency(*predicted),
        },
        past_week_change: PercentCell::new(Some(past_week.change_percent)),
        next_week_change: PercentCell::new(Some(next_week.change_percent)),
        rows,
        chart: ChartSeries::new(past_week, next_week),
    })
}

/// The first change is against the current price, each later one against the previous prediction.
pub fn daily_changes(current_price: f64, predictions: &[f64]) -> Vec<Option<f64>> {
    once(current_price)
        .chain(predictions.iter().copied())
        .tuple_windows()
        .map(|(from, to)| percent_change(from, to))
        .collect()
}

pub fn percent_change(from: f64, to: f64) -> Option<f64> {
    if from == 0.0 {
        return None;
    }

    let change = (to - from) / from * 100.0;
    change.is_finite().then_some(change)
}

/// Formats as US dollars, e.g. `-$1,234.50`.
pub fn format_currency(value: f64) -> String {
    if !value.is_finite() {
        return NOT_AVAILABLE.to_string();
    }

    let cents = round_cents(value);
    let text = format!("{:.2}", cents.abs());
    let (int_part, frac_part) = text.split_once('.').unwrap_or((text.as_str(), "00"));

    let mut grouped = String::new();
    let len = int_part.len();
    for (i, c) in int_part.chars().enumerate() {
        if i > 0 && (len - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(c);
    }

    let sign = if cents < 0.0 { "-" } else { "" };
    format!("{sign}${grouped}.{frac_part}")
}

pub fn format_percent(value: f64) -> String {
    format!("{:.2}%", round_cents(value))
}

/// Rounds half away from zero to two decimals, a zero result is always positive.
fn round_cents(value: f64) -> f64 {
    let rounded = (value * 100.0).round() / 100.0;
    if rounded == 0.0 { 0.0 } else { rounded }
}

fn to_points(series: &[Option<f64>]) -> Vec<[f64; 2]> {
    series
        .iter()
        .enumerate()
        .filter_map(|(i, v)| v.map(|v| [i as f64, v]))
        .collect()
}

fn no_data(window: &str) -> VpError {
    VpError::NoData {
        code: "EMPTY_WINDOW",
        message: format!("{window} is empty"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn response(past_len: usize, predictions: &[f64]) -> PredictionResponse {
        PredictionResponse {
            company_name: "Apple Inc.".to_string(),
            stock_symbol: "AAPL".to_string(),
            current_price: 100.0,
            past_week: PastWeek {
                dates: (0..past_len).map(|i| format!("01/{:02}/2025", i + 1)).collect(),
                prices: (0..past_len).map(|i| 90.0 + i as f64).collect(),
                change_percent: 6.5,
            },
            next_week: NextWeek {
                dates: (0..predictions.len())
                    .map(|i| format!("02/{:02}/2025", i + 1))
                    .collect(),
                predictions: predictions.to_vec(),
                change_percent: -1.25,
            },
        }
    }

    #[test]
    fn test_render_daily_changes() {
        let model = render(&response(2, &[110.0, 121.0])).unwrap();

        assert_eq!(model.rows.len(), 2);
        assert_eq!(model.rows[0].change.text, "10.00%");
        assert_eq!(model.rows[0].change.sign, Some(Sign::Positive));
        assert_eq!(model.rows[1].change.text, "10.00%");
        assert_eq!(model.rows[1].change.sign, Some(Sign::Positive));
        assert_eq!(model.rows[1].price, "$121.00");
        assert_eq!(model.rows[1].date, "02/02/2025");
    }

    #[test]
    fn test_render_price_fields() {
        let model = render(&response(7, &[99.5, 98.0, 1234.5])).unwrap();

        assert_eq!(model.prices.past_week_open, "$90.00");
        assert_eq!(model.prices.past_week_close, "$96.00");
        assert_eq!(model.prices.current, "$100.00");
        assert_eq!(model.prices.predicted, "$1,234.50");
        assert_eq!(model.past_week_change.text, "6.50%");
        assert_eq!(model.past_week_change.sign, Some(Sign::Positive));
        assert_eq!(model.next_week_change.text, "-1.25%");
        assert_eq!(model.next_week_change.sign, Some(Sign::Negative));
        assert_eq!(model.rows[0].change.text, "-0.50%");
        assert_eq!(model.rows[0].change.sign, Some(Sign::Negative));
    }

    #[test]
    fn test_render_rows_follow_next_week() {
        for n in 1..10 {
            let predictions: Vec<f64> = (0..n).map(|i| 100.0 + i as f64).collect();
            let r = response(7, &predictions);
            let model = render(&r).unwrap();

            assert_eq!(model.rows.len(), r.next_week.dates.len());

            let expected = (r.next_week.predictions[0] - r.current_price) / r.current_price * 100.0;
            assert_eq!(model.rows[0].change.text, format!("{expected:.2}%"));
        }
    }

    #[test]
    fn test_render_is_idempotent() {
        let r = response(7, &[101.0, 102.0, 103.0]);
        assert_eq!(render(&r).unwrap(), render(&r).unwrap());
    }

    #[test]
    fn test_render_rejects_invalid_response() {
        let mut r = response(3, &[101.0]);
        r.next_week.dates.push("02/09/2025".to_string());
        assert!(render(&r).is_err());

        let mut r = response(3, &[101.0]);
        r.current_price = 0.0;
        assert!(render(&r).is_err());
    }

    #[test]
    fn test_chart_series_padding() {
        let r = response(7, &[1.0, 2.0, 3.0, 4.0, 5.0]);
        let chart = render(&r).unwrap().chart;

        assert_eq!(chart.labels.len(), 12);
        assert_eq!(chart.actual.len(), 12);
        assert_eq!(chart.predicted.len(), 12);
        assert_eq!(chart.labels[0], "01/01/2025");
        assert_eq!(chart.labels[7], "02/01/2025");

        assert!(chart.actual[..7].iter().all(Option::is_some));
        assert!(chart.actual[7..].iter().all(Option::is_none));
        assert_eq!(chart.actual.iter().filter(|v| v.is_none()).count(), 5);

        assert!(chart.predicted[..7].iter().all(Option::is_none));
        assert_eq!(chart.predicted[7..], [Some(1.0), Some(2.0), Some(3.0), Some(4.0), Some(5.0)]);
    }

    #[test]
    fn test_chart_points() {
        let chart = render(&response(2, &[110.0])).unwrap().chart;

        assert_eq!(chart.actual_points(), vec![[0.0, 90.0], [1.0, 91.0]]);
        assert_eq!(chart.predicted_points(), vec![[2.0, 110.0]]);
        assert_eq!(chart.label_at(2.2), Some("02/01/2025"));
        assert_eq!(chart.label_at(-1.0), None);
        assert_eq!(chart.label_at(3.0), None);
    }

    #[test]
    fn test_daily_changes_division_by_zero() {
        let changes = daily_changes(100.0, &[0.0, 50.0, 60.0]);

        assert_eq!(changes[0], Some(-100.0));
        assert_eq!(changes[1], None);
        assert!((changes[2].unwrap() - 20.0).abs() < 1e-10);

        let cell = PercentCell::new(changes[1]);
        assert_eq!(cell.text, "N/A");
        assert_eq!(cell.sign, None);
    }

    #[test]
    fn test_sign_boundary() {
        assert_eq!(Sign::of(0.0), Sign::Positive);
        assert_eq!(Sign::of(-0.0), Sign::Positive);
        assert_eq!(Sign::of(-1e-12), Sign::Negative);
        assert_eq!(Sign::Positive.to_string(), "positive");
    }

    #[test]
    fn test_format_currency() {
        assert_eq!(format_currency(0.0), "$0.00");
        assert_eq!(format_currency(9.999), "$10.00");
        assert_eq!(format_currency(999.994), "$999.99");
        assert_eq!(format_currency(1000.0), "$1,000.00");
        assert_eq!(format_currency(1234567.891), "$1,234,567.89");
        assert_eq!(format_currency(-42.5), "-$42.50");
        assert_eq!(format_currency(f64::NAN), "N/A");
    }

    #[test]
    fn test_format_rounds_half_away_from_zero() {
        assert_eq!(format_currency(0.125), "$0.13");
        assert_eq!(format_currency(-0.125), "-$0.13");
        assert_eq!(format_currency(-0.001), "$0.00");
        assert_eq!(format_percent(0.125), "0.13%");
        assert_eq!(format_percent(-0.125), "-0.13%");
        assert_eq!(format_percent(-0.0), "0.00%");
        assert_eq!(format_percent(-0.001), "0.00%");
    }

    #[test]
    fn test_format_percent() {
        assert_eq!(format_percent(10.0), "10.00%");
        assert_eq!(format_percent(-3.14159), "-3.14%");
    }
}
