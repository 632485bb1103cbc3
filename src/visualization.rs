//! Chart projections of the aggregates
//!
//! Pure functions: nothing here holds state. The series are shaped for a
//! proportion (doughnut) chart and a categorical bar chart; the `render_*`
//! functions draw the same series as plain text for the terminal.

use crate::types::{SentimentLabel, SentimentTally, WordFrequencyMap};
use serde::Serialize;

/// Title of the sentiment chart
pub const SENTIMENT_CHART_TITLE: &str = "Sentiment Score";

/// Title of the word-frequency chart
pub const FREQUENCY_CHART_TITLE: &str = "Word Frequency";

/// Accent shown while a submission is in flight
pub const SUBMITTING_COLOR: &str = "#8EABC9";

/// Accent shown when no sentiment is known
pub const IDLE_COLOR: &str = "#E5E7EB";

/// Width of the longest bar in text rendering
const BAR_WIDTH: usize = 40;

/// Display colour of a sentiment label
pub fn label_color(label: SentimentLabel) -> &'static str {
    match label {
        SentimentLabel::Positive => "#80EF80",
        SentimentLabel::Neutral => "#808080",
        SentimentLabel::Negative => "#FF6961",
    }
}

/// Series for a proportion chart of the tally
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SentimentSeries {
    pub title: &'static str,
    pub labels: [&'static str; 3],
    pub values: [u64; 3],
    pub colors: [&'static str; 3],
}

/// Parallel word / count sequences in first-seen order
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FrequencySeries {
    pub title: &'static str,
    pub words: Vec<String>,
    pub counts: Vec<u64>,
}

/// A chart, or the signal that there is nothing to draw
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", content = "series", rename_all = "snake_case")]
pub enum ChartData<T> {
    Series(T),
    NoData,
}

impl<T> ChartData<T> {
    pub fn is_empty(&self) -> bool {
        matches!(self, ChartData::NoData)
    }
}

/// Project the tally into three labelled values
pub fn sentiment_chart(tally: &SentimentTally) -> SentimentSeries {
    SentimentSeries {
        title: SENTIMENT_CHART_TITLE,
        labels: SentimentLabel::ALL.map(SentimentLabel::as_str),
        values: tally.as_array(),
        colors: SentimentLabel::ALL.map(label_color),
    }
}

/// Project the word-frequency map; `NoData` when it is empty
pub fn frequency_chart(map: &WordFrequencyMap) -> ChartData<FrequencySeries> {
    if map.is_empty() {
        return ChartData::NoData;
    }

    let (words, counts) = map.iter().map(|wc| (wc.word.clone(), wc.count)).unzip();
    ChartData::Series(FrequencySeries {
        title: FREQUENCY_CHART_TITLE,
        words,
        counts,
    })
}

/// Text rendering of the sentiment chart
pub fn render_sentiment(series: &SentimentSeries) -> String {
    let total: u64 = series.values.iter().sum();
    let mut out = format!("{}\n", series.title);

    for (label, value) in series.labels.iter().zip(series.values.iter()) {
        let percent = if total == 0 {
            0.0
        } else {
            *value as f64 * 100.0 / total as f64
        };
        out.push_str(&format!(
            "  {:<8} {:>5}  {:>5.1}%  {}\n",
            label,
            value,
            percent,
            bar(*value, total)
        ));
    }
    out
}

/// Text rendering of the word-frequency chart
pub fn render_frequency(chart: &ChartData<FrequencySeries>) -> String {
    let series = match chart {
        ChartData::NoData => return format!("{}\n  No data available.\n", FREQUENCY_CHART_TITLE),
        ChartData::Series(series) => series,
    };

    let max = series.counts.iter().copied().max().unwrap_or(0);
    let width = series
        .words
        .iter()
        .map(|w| w.chars().count())
        .max()
        .unwrap_or(0);

    let mut out = format!("{}\n", series.title);
    for (word, count) in series.words.iter().zip(series.counts.iter()) {
        out.push_str(&format!(
            "  {:<width$} {:>5}  {}\n",
            word,
            count,
            bar(*count, max),
            width = width
        ));
    }
    out
}

fn bar(value: u64, max: u64) -> String {
    if max == 0 {
        return String::new();
    }
    let len = ((value as f64 / max as f64) * BAR_WIDTH as f64).round() as usize;
    "█".repeat(len.max(usize::from(value > 0)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::WordCount;

    #[test]
    fn test_sentiment_chart() {
        let series = sentiment_chart(&SentimentTally([3, 1, 2]));
        assert_eq!(series.labels, ["Positive", "Neutral", "Negative"]);
        assert_eq!(series.values, [3, 1, 2]);
        assert_eq!(series.colors, ["#80EF80", "#808080", "#FF6961"]);
        assert_eq!(series.title, "Sentiment Score");
    }

    #[test]
    fn test_frequency_chart_keeps_insertion_order() {
        let map = WordFrequencyMap::from(vec![
            WordCount::new("zebra", 1),
            WordCount::new("apple", 9),
            WordCount::new("mango", 3),
        ]);

        match frequency_chart(&map) {
            ChartData::Series(series) => {
                assert_eq!(series.words, vec!["zebra", "apple", "mango"]);
                assert_eq!(series.counts, vec![1, 9, 3]);
            }
            ChartData::NoData => panic!("expected series"),
        }
    }

    #[test]
    fn test_empty_map_is_no_data() {
        let chart = frequency_chart(&WordFrequencyMap::new());
        assert!(chart.is_empty());
        assert!(render_frequency(&chart).contains("No data available."));
    }

    #[test]
    fn test_render_sentiment() {
        let text = render_sentiment(&sentiment_chart(&SentimentTally([1, 0, 1])));
        assert!(text.starts_with("Sentiment Score\n"));
        assert!(text.contains("Positive"));
        assert!(text.contains("50.0%"));

        let empty = render_sentiment(&sentiment_chart(&SentimentTally::default()));
        assert!(empty.contains("0.0%"));
    }

    #[test]
    fn test_render_frequency_bars_scale_to_max() {
        let map = WordFrequencyMap::from(vec![WordCount::new("a", 4), WordCount::new("b", 1)]);
        let text = render_frequency(&frequency_chart(&map));
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[1].matches('█').count(), BAR_WIDTH);
        assert_eq!(lines[2].matches('█').count(), BAR_WIDTH / 4);
    }

    #[test]
    fn test_chart_json_shape() {
        let json = serde_json::to_value(frequency_chart(&WordFrequencyMap::new())).unwrap();
        assert_eq!(json, serde_json::json!({ "kind": "no_data" }));
    }
}
