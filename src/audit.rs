//! Line-oriented auditing of JSON record streams.
//!
//! Each non-blank line is decoded as one record of the configured kind. Lines
//! whose money fields fail validation are rejected whole; accepted records
//! feed running totals kept with checked money arithmetic.

use crate::config::Config;
use crate::domain::{LastPrice, Record, RecordKind, Sats, Symbol, Usd};
use crate::error::AppError;
use rust_decimal::{Decimal, RoundingStrategy};
use std::collections::{BTreeMap, HashSet};
use std::fmt;
use std::fs::File;
use std::io::{BufRead, BufReader};
use tracing::{debug, info, warn};

/// A line that could not be accepted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rejection {
    pub line: usize,
    pub message: String,
}

/// Totals produced by an audit run.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AuditReport {
    pub accepted: usize,
    pub duplicates: usize,
    pub rejected: Vec<Rejection>,
    /// Sum of trade fees (rebates are negative).
    pub fee_total: Sats,
    /// Net deposits minus withdrawals, unique by event key.
    pub deposit_total: Sats,
    /// Sum of rounded trade notionals.
    pub notional_total: Usd,
    /// Net traded size per symbol (buys minus sells).
    pub net_size: BTreeMap<Symbol, Decimal>,
    /// Most recent tick per symbol.
    pub last_prices: BTreeMap<Symbol, LastPrice>,
}

impl fmt::Display for AuditReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "records accepted: {}", self.accepted)?;
        writeln!(f, "records rejected: {}", self.rejected.len())?;
        writeln!(f, "duplicates skipped: {}", self.duplicates)?;
        writeln!(f, "fee total: {}", self.fee_total.with_symbol())?;
        writeln!(f, "deposit total: {}", self.deposit_total.with_symbol())?;
        writeln!(f, "notional total: {}", self.notional_total.with_symbol())?;
        for (symbol, size) in &self.net_size {
            writeln!(f, "net size {}: {}", symbol, size.normalize())?;
        }
        for (symbol, tick) in &self.last_prices {
            writeln!(f, "last price {}: {}", symbol, tick.price.with_symbol())?;
        }
        for rejection in &self.rejected {
            writeln!(f, "line {}: {}", rejection.line, rejection.message)?;
        }
        Ok(())
    }
}

pub struct Auditor {
    kind: RecordKind,
    strategy: RoundingStrategy,
    fail_fast: bool,
    deposit_keys: HashSet<String>,
    report: AuditReport,
}

impl Auditor {
    pub fn new(kind: RecordKind, strategy: RoundingStrategy) -> Self {
        Self {
            kind,
            strategy,
            fail_fast: false,
            deposit_keys: HashSet::new(),
            report: AuditReport::default(),
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(config.record_kind, config.rounding.strategy()).with_fail_fast(config.fail_fast)
    }

    /// Stop at the first rejected line instead of recording it and moving on.
    pub fn with_fail_fast(mut self, fail_fast: bool) -> Self {
        self.fail_fast = fail_fast;
        self
    }

    /// Decode and account for one line. Blank lines are ignored.
    ///
    /// # Errors
    /// Returns [`AppError::Rejected`] for an invalid line in fail-fast mode.
    pub fn ingest_line(&mut self, line_no: usize, line: &str) -> Result<(), AppError> {
        let line = line.trim();
        if line.is_empty() {
            return Ok(());
        }

        let outcome = Record::decode(self.kind, line)
            .map_err(|e| e.to_string())
            .and_then(|record| self.apply(record));

        match outcome {
            Ok(()) => {
                debug!(line = line_no, kind = %self.kind, "Accepted record");
                Ok(())
            }
            Err(message) => {
                warn!(line = line_no, kind = %self.kind, error = %message, "Rejected record");
                if self.fail_fast {
                    return Err(AppError::Rejected {
                        line: line_no,
                        message,
                    });
                }
                self.report.rejected.push(Rejection {
                    line: line_no,
                    message,
                });
                Ok(())
            }
        }
    }

    fn apply(&mut self, record: Record) -> Result<(), String> {
        match record {
            Record::Trade(trade) => {
                let fee_total = self
                    .report
                    .fee_total
                    .checked_add(trade.fee)
                    .ok_or("fee total overflowed")?;
                let notional = trade
                    .notional(self.strategy)
                    .ok_or("notional overflowed")?;
                let notional_total = self
                    .report
                    .notional_total
                    .checked_add(notional)
                    .ok_or("notional total overflowed")?;
                let net_size = self
                    .report
                    .net_size
                    .get(&trade.symbol)
                    .copied()
                    .unwrap_or(Decimal::ZERO)
                    .checked_add(trade.signed_size())
                    .ok_or("net size overflowed")?;
                self.report.fee_total = fee_total;
                self.report.notional_total = notional_total;
                self.report.net_size.insert(trade.symbol, net_size);
            }
            Record::Deposit(deposit) => {
                let key = deposit.event_key();
                if self.deposit_keys.contains(&key) {
                    debug!(event_key = %key, "Skipping duplicate deposit");
                    self.report.duplicates += 1;
                    return Ok(());
                }
                self.report.deposit_total = self
                    .report
                    .deposit_total
                    .checked_add(deposit.amount)
                    .ok_or("deposit total overflowed")?;
                self.deposit_keys.insert(key);
            }
            Record::LastPrice(tick) => {
                let newer = self
                    .report
                    .last_prices
                    .get(&tick.symbol)
                    .map_or(true, |current| tick.timestamp >= current.timestamp);
                if newer {
                    self.report.last_prices.insert(tick.symbol.clone(), tick);
                }
            }
        }
        self.report.accepted += 1;
        Ok(())
    }

    /// Feed every line of `reader`, then return the report.
    pub fn audit_reader<R: BufRead>(mut self, reader: R) -> Result<AuditReport, AppError> {
        for (idx, line) in reader.lines().enumerate() {
            self.ingest_line(idx + 1, &line?)?;
        }
        Ok(self.finish())
    }

    pub fn finish(self) -> AuditReport {
        self.report
    }
}

/// Audit the file named by the configuration.
pub fn run(config: &Config) -> Result<AuditReport, AppError> {
    info!(
        path = %config.input_path,
        kind = %config.record_kind,
        fail_fast = config.fail_fast,
        "Starting audit"
    );
    let file = File::open(&config.input_path)?;
    let report = Auditor::from_config(config).audit_reader(BufReader::new(file))?;
    info!(
        accepted = report.accepted,
        rejected = report.rejected.len(),
        "Audit finished"
    );
    Ok(report)
}
