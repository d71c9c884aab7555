//! Yahoo Finance market data source.
//!
//! Fetches daily bars from Yahoo's v8 chart API with a single request per
//! call. Yahoo has no official API and changes format without notice; the
//! CSV source is the fallback when it is unavailable.

use chrono::NaiveDate;
use newsalign_core::{DailyMarketBar, DataSource, MarketDataSource, SourceError};
use serde::Deserialize;
use std::time::Duration;

#[derive(Debug, Deserialize)]
struct ChartResponse {
    chart: ChartResult,
}

#[derive(Debug, Deserialize)]
struct ChartResult {
    result: Option<Vec<ChartData>>,
    error: Option<ChartError>,
}

#[derive(Debug, Deserialize)]
struct ChartError {
    code: String,
    description: String,
}

#[derive(Debug, Deserialize)]
struct ChartData {
    timestamp: Option<Vec<i64>>,
    indicators: Indicators,
}

#[derive(Debug, Deserialize)]
struct Indicators {
    quote: Vec<QuoteData>,
}

#[derive(Debug, Deserialize)]
struct QuoteData {
    open: Vec<Option<f64>>,
    high: Vec<Option<f64>>,
    low: Vec<Option<f64>>,
    close: Vec<Option<f64>>,
    volume: Vec<Option<u64>>,
}

pub struct YahooChartSource {
    client: reqwest::blocking::Client,
    base_url: String,
}

impl YahooChartSource {
    pub const DEFAULT_BASE_URL: &'static str = "https://query2.finance.yahoo.com";

    pub fn new() -> Result<Self, SourceError> {
        Self::with_base_url(Self::DEFAULT_BASE_URL)
    }

    /// Point the source at a different host, e.g. a local mock server.
    pub fn with_base_url(base_url: impl Into<String>) -> Result<Self, SourceError> {
        let client = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(30))
            .user_agent("Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36")
            .build()
            .map_err(|e| SourceError::Other(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    fn chart_url(&self, ticker: &str, start: NaiveDate, end: NaiveDate) -> String {
        let start_ts = start.and_time(chrono::NaiveTime::MIN).and_utc().timestamp();
        let end_ts = end.and_time(chrono::NaiveTime::MIN).and_utc().timestamp() + 86_399;
        format!(
            "{}/v8/finance/chart/{ticker}?period1={start_ts}&period2={end_ts}&interval=1d",
            self.base_url
        )
    }

    /// Parse a chart API response body into bars, ascending by date.
    ///
    /// Days with no close (holidays, halted sessions) are skipped. Missing
    /// open/high/low fall back to the close.
    pub fn parse_response(ticker: &str, body: &str) -> Result<Vec<DailyMarketBar>, SourceError> {
        let resp: ChartResponse = serde_json::from_str(body).map_err(|e| {
            SourceError::ResponseFormatChanged(format!("failed to parse response for {ticker}: {e}"))
        })?;

        let result = resp.chart.result.ok_or_else(|| match resp.chart.error {
            Some(err) if err.code == "Not Found" => SourceError::SymbolNotFound {
                symbol: ticker.to_string(),
            },
            Some(err) => {
                SourceError::ResponseFormatChanged(format!("{}: {}", err.code, err.description))
            }
            None => SourceError::ResponseFormatChanged("empty result with no error".into()),
        })?;

        let data = result
            .into_iter()
            .next()
            .ok_or_else(|| SourceError::ResponseFormatChanged("result array is empty".into()))?;

        // Yahoo omits timestamps entirely when the range has no sessions.
        let timestamps = data.timestamp.unwrap_or_default();

        let quote = data
            .indicators
            .quote
            .into_iter()
            .next()
            .ok_or_else(|| SourceError::ResponseFormatChanged("no quote data".into()))?;

        let mut bars = Vec::with_capacity(timestamps.len());
        for (i, &ts) in timestamps.iter().enumerate() {
            let date = chrono::DateTime::from_timestamp(ts, 0)
                .map(|dt| dt.naive_utc().date())
                .ok_or_else(|| {
                    SourceError::ResponseFormatChanged(format!("invalid timestamp: {ts}"))
                })?;

            let Some(close) = quote.close.get(i).copied().flatten() else {
                continue;
            };
            bars.push(DailyMarketBar {
                date,
                open: quote.open.get(i).copied().flatten().unwrap_or(close),
                high: quote.high.get(i).copied().flatten().unwrap_or(close),
                low: quote.low.get(i).copied().flatten().unwrap_or(close),
                close,
                volume: quote.volume.get(i).copied().flatten().unwrap_or(0),
            });
        }

        bars.sort_by_key(|b| b.date);
        bars.dedup_by_key(|b| b.date);
        Ok(bars)
    }
}

impl MarketDataSource for YahooChartSource {
    fn name(&self) -> &str {
        "yahoo_finance"
    }

    fn kind(&self) -> DataSource {
        DataSource::YahooFinance
    }

    fn fetch_daily_bars(
        &self,
        ticker: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<DailyMarketBar>, SourceError> {
        let url = self.chart_url(ticker, start, end);

        let resp = self
            .client
            .get(&url)
            .send()
            .map_err(|e| SourceError::NetworkUnreachable(e.to_string()))?;

        let status = resp.status();
        if status == reqwest::StatusCode::NOT_FOUND {
            return Err(SourceError::SymbolNotFound {
                symbol: ticker.to_string(),
            });
        }
        if !status.is_success() {
            return Err(SourceError::Other(format!("HTTP {status} for {ticker}")));
        }

        let body = resp
            .text()
            .map_err(|e| SourceError::NetworkUnreachable(e.to_string()))?;

        let bars: Vec<DailyMarketBar> = Self::parse_response(ticker, &body)?
            .into_iter()
            .filter(|b| b.date >= start && b.date <= end)
            .collect();

        if bars.is_empty() {
            return Err(SourceError::EmptyRange {
                ticker: ticker.to_string(),
                start,
                end,
            });
        }
        Ok(bars)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // 2023-03-01, 2023-03-02 (no close), 2023-03-03 at 14:30 UTC
    const BODY: &str = r#"{
        "chart": {
            "result": [{
                "meta": {"symbol": "AAPL"},
                "timestamp": [1677681000, 1677767400, 1677853800],
                "indicators": {
                    "quote": [{
                        "open":   [147.0, null, 148.0],
                        "high":   [149.0, null, 151.0],
                        "low":    [145.5, null, 147.5],
                        "close":  [145.3, null, 151.0],
                        "volume": [52000000, null, 70000000]
                    }],
                    "adjclose": [{"adjclose": [145.0, null, 150.7]}]
                }
            }],
            "error": null
        }
    }"#;

    #[test]
    fn parses_bars_and_skips_missing_close() {
        let bars = YahooChartSource::parse_response("AAPL", BODY).unwrap();
        assert_eq!(bars.len(), 2);
        assert_eq!(bars[0].date, NaiveDate::from_ymd_opt(2023, 3, 1).unwrap());
        assert_eq!(bars[0].close, 145.3);
        assert_eq!(bars[0].volume, 52_000_000);
        assert_eq!(bars[1].date, NaiveDate::from_ymd_opt(2023, 3, 3).unwrap());
    }

    #[test]
    fn not_found_maps_to_symbol_not_found() {
        let body = r#"{"chart":{"result":null,"error":{"code":"Not Found","description":"No data found, symbol may be delisted"}}}"#;
        assert!(matches!(
            YahooChartSource::parse_response("ZZZZ", body),
            Err(SourceError::SymbolNotFound { .. })
        ));
    }

    #[test]
    fn other_chart_error_is_format_change() {
        let body = r#"{"chart":{"result":null,"error":{"code":"Bad Request","description":"Invalid input"}}}"#;
        assert!(matches!(
            YahooChartSource::parse_response("AAPL", body),
            Err(SourceError::ResponseFormatChanged(_))
        ));
    }

    #[test]
    fn html_body_is_format_change() {
        assert!(matches!(
            YahooChartSource::parse_response("AAPL", "<html>blocked</html>"),
            Err(SourceError::ResponseFormatChanged(_))
        ));
    }

    #[test]
    fn chart_url_covers_whole_end_day() {
        let src = YahooChartSource::with_base_url("http://localhost:1/").unwrap();
        let url = src.chart_url(
            "AAPL",
            NaiveDate::from_ymd_opt(2023, 3, 1).unwrap(),
            NaiveDate::from_ymd_opt(2023, 3, 1).unwrap(),
        );
        assert_eq!(
            url,
            "http://localhost:1/v8/finance/chart/AAPL?period1=1677628800&period2=1677715199&interval=1d"
        );
    }

    #[test]
    fn unreachable_host_is_network_error() {
        let src = YahooChartSource::with_base_url("http://127.0.0.1:9").unwrap();
        let d = NaiveDate::from_ymd_opt(2023, 3, 1).unwrap();
        assert!(matches!(
            src.fetch_daily_bars("AAPL", d, d),
            Err(SourceError::NetworkUnreachable(_))
        ));
    }
}
