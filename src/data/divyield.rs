//! Dividend yield scraping
//!
//! Pulls annualized dividend yields from stockanalysis.com profile pages,
//! trying the stock page first and falling back to the ETF page. A symbol
//! with no published yield is recorded as 0.0 rather than failing the
//! refresh. SPX has no page of its own and mirrors SPY.

use std::thread;
use std::time::Duration;

use regex::Regex;
use rust_decimal::Decimal;

use crate::core::{VolBatchError, VolBatchResult};
use crate::skew::sanitize;

use super::universe::TickerUniverse;

const USER_AGENT: &str =
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/124.0 Safari/537.36";

/// Scraper for annualized dividend yields
pub struct DivYieldClient {
    client: reqwest::blocking::Client,
    base_url: String,
    /// Pause between page fetches to stay under the site's rate limits
    pub fetch_pause: Duration,
    yield_pattern: Regex,
}

impl DivYieldClient {
    pub fn new() -> Self {
        Self::with_base_url("https://stockanalysis.com")
    }

    /// Override the page host (used by tests)
    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self {
            client: reqwest::blocking::Client::builder()
                .user_agent(USER_AGENT)
                .timeout(Duration::from_secs(10))
                .build()
                .expect("Failed to create HTTP client"),
            base_url: base_url.into(),
            fetch_pause: Duration::from_secs(5),
            yield_pattern: Regex::new(r"Dividend Yield[^0-9]{0,100}([0-9]+\.?[0-9]*)%")
                .expect("invalid dividend yield pattern"),
        }
    }

    /// Fetch the annualized dividend yield for one symbol.
    ///
    /// Returns 0.0 when the page exists but publishes no yield.
    pub fn fetch_yield(&self, symbol: &str) -> VolBatchResult<f64> {
        let lower = symbol.to_lowercase();

        let stock_url = format!("{}/stocks/{}/", self.base_url, lower);
        match self.fetch_page_yield(&stock_url) {
            Ok(y) => return Ok(y),
            Err(e) => {
                tracing::debug!("Stock page failed for {}: {}, trying ETF page", symbol, e);
            }
        }

        let etf_url = format!("{}/etf/{}/", self.base_url, lower);
        self.fetch_page_yield(&etf_url)
    }

    fn fetch_page_yield(&self, url: &str) -> VolBatchResult<f64> {
        let response = self
            .client
            .get(url)
            .send()
            .map_err(|e| VolBatchError::network(e.to_string()))?;

        if !response.status().is_success() {
            return Err(VolBatchError::upstream(format!(
                "{} returned {}",
                url,
                response.status()
            )));
        }

        let body = response
            .text()
            .map_err(|e| VolBatchError::network(e.to_string()))?;
        Ok(self.parse_yield(&body).unwrap_or(0.0))
    }

    /// Extract the yield percentage from page HTML. `None` when the page
    /// publishes no yield (or a value the sanitizer rejects).
    fn parse_yield(&self, html: &str) -> Option<f64> {
        let captures = self.yield_pattern.captures(html)?;
        let percent: Decimal = captures.get(1)?.as_str().parse().ok()?;
        sanitize::from_decimal(percent / Decimal::from(100))
    }

    /// Refresh dividend yields for every symbol in the universe.
    ///
    /// A failed symbol is recorded as 0.0 and logged; the refresh never
    /// aborts on a single page. SPX mirrors SPY after the pass.
    pub fn update_universe(&self, universe: &mut TickerUniverse) -> VolBatchResult<()> {
        let symbols: Vec<String> = universe.symbols().map(String::from).collect();

        for (i, symbol) in symbols.iter().enumerate() {
            let div_yield = match self.fetch_yield(symbol) {
                Ok(y) => {
                    tracing::info!("Dividend yield for {}: {:.4}", symbol, y);
                    y
                }
                Err(e) => {
                    tracing::warn!("No dividend yield for {}: {}", symbol, e);
                    0.0
                }
            };
            universe.set_div_yield(symbol, div_yield);

            if i + 1 < symbols.len() && !self.fetch_pause.is_zero() {
                thread::sleep(self.fetch_pause);
            }
        }

        // SPX options discount with the SPY fund's yield
        if let Some(spy) = universe.get("SPY").map(|e| e.div_yield) {
            universe.set_div_yield("SPX", spy);
        }

        Ok(())
    }
}

impl Default for DivYieldClient {
    fn default() -> Self {
        Self::new()
    }
}
