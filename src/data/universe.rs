//! Ticker universe configuration
//!
//! The batch's ticker set with display names and annualized dividend yields.
//! Persisted as `tickerMap.json` so yields scraped in one run can be reused
//! by later runs. This is configuration passed by value into the runner, not
//! process-wide state.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::core::{TickerSpec, VolBatchError, VolBatchResult};

/// One universe entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TickerEntry {
    /// Symbol understood by the option-data collaborator
    pub ticker: String,
    /// Display name
    pub name: String,
    /// Annualized dividend yield (0.0 when none or unknown)
    #[serde(rename = "divYield", default)]
    pub div_yield: f64,
}

/// The set of tickers a batch run processes.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TickerUniverse {
    entries: BTreeMap<String, TickerEntry>,
}

impl TickerUniverse {
    /// Built-in set of liquid US option tickers
    pub fn default_universe() -> Self {
        let names: &[(&str, &str)] = &[
            ("AAPL", "Apple"),
            ("AMD", "Advanced Micro Devices"),
            ("AMZN", "Amazon"),
            ("BA", "Boeing"),
            ("BAC", "Bank of America"),
            ("DIS", "Walt Disney"),
            ("GLD", "SPDR Gold Shares"),
            ("GOOGL", "Alphabet"),
            ("IWM", "iShares Russell 2000 ETF"),
            ("JPM", "JPMorgan Chase"),
            ("META", "Meta Platforms"),
            ("MSFT", "Microsoft"),
            ("NFLX", "Netflix"),
            ("NVDA", "NVIDIA"),
            ("QQQ", "Invesco QQQ Trust"),
            ("SPY", "SPDR S&P 500 ETF"),
            ("TSLA", "Tesla"),
            ("XLE", "Energy Select Sector SPDR"),
            ("XOM", "Exxon Mobil"),
        ];

        let entries = names
            .iter()
            .map(|&(symbol, name)| {
                (
                    symbol.to_string(),
                    TickerEntry {
                        ticker: symbol.to_string(),
                        name: name.to_string(),
                        div_yield: 0.0,
                    },
                )
            })
            .collect();

        Self { entries }
    }

    /// Load a universe from a `tickerMap.json` file
    pub fn load(path: impl AsRef<Path>) -> VolBatchResult<Self> {
        let json = fs::read_to_string(path.as_ref())?;
        serde_json::from_str(&json).map_err(|e| VolBatchError::serialization(e.to_string()))
    }

    /// Save the universe (typically after a dividend yield refresh)
    pub fn save(&self, path: impl AsRef<Path>) -> VolBatchResult<()> {
        let json = serde_json::to_string_pretty(self)
            .map_err(|e| VolBatchError::serialization(e.to_string()))?;
        fs::write(path.as_ref(), json)?;
        tracing::info!("Saved ticker universe to {:?}", path.as_ref());
        Ok(())
    }

    pub fn insert(&mut self, entry: TickerEntry) {
        self.entries.insert(entry.ticker.clone(), entry);
    }

    pub fn get(&self, symbol: &str) -> Option<&TickerEntry> {
        self.entries.get(symbol)
    }

    pub fn symbols(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Record a scraped dividend yield for a symbol
    pub fn set_div_yield(&mut self, symbol: &str, div_yield: f64) {
        if let Some(entry) = self.entries.get_mut(symbol) {
            entry.div_yield = div_yield;
        }
    }

    /// Convert to batch work items in symbol order.
    ///
    /// With `use_dividends` each spec carries the entry's annualized yield;
    /// otherwise discount inputs are calibrated from put-call parity.
    pub fn to_specs(&self, start_date: NaiveDate, use_dividends: bool) -> Vec<TickerSpec> {
        self.entries
            .values()
            .map(|entry| {
                let mut spec = if use_dividends {
                    TickerSpec::with_dividend_yield(&entry.ticker, start_date, entry.div_yield)
                } else {
                    TickerSpec::new(&entry.ticker, start_date)
                };
                spec.name = Some(entry.name.clone());
                spec
            })
            .collect()
    }
}
