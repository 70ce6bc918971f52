//! Synthetic ledger generation for demos and offline runs.
//!
//! `SampleStore` fabricates a deterministic monthly expense ledger for any
//! building id: log-normal noise around a per-building base level, rows split
//! across two categories per month, and occasional spike months (a large
//! one-off charge) so the conditioning stage has something to cap.
//!
//! Determinism matters more than realism here: the seed is derived by hashing
//! the building id together with the generator settings, so the same CLI
//! invocation always produces the same ledger.

use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

use chrono::{Datelike, Months, NaiveDate};
use rand::prelude::*;
use rand::rngs::StdRng;
use rand_distr::Normal;

use crate::data::store::ExpenseStore;
use crate::domain::{month_key, ExpenseRow};
use crate::error::ApiError;

/// Probability that a month carries a large one-off charge.
const SPIKE_PROB: f64 = 0.05;

/// Spike size as a multiple of the base level.
const SPIKE_FACTOR: f64 = 9.0;

/// Monthly log-noise standard deviation.
const NOISE_SIGMA: f64 = 0.08;

pub struct SampleStore {
    /// Number of history months to generate, ending at `end`.
    months: usize,
    /// Last generated month (normally the query's "now").
    end: NaiveDate,
    seed: u64,
}

impl SampleStore {
    pub fn new(months: usize, end: NaiveDate, seed: u64) -> Self {
        Self {
            months,
            end: month_key(end),
            seed,
        }
    }
}

impl ExpenseStore for SampleStore {
    fn fetch_expenses(&self, building_id: &str) -> Result<Vec<ExpenseRow>, ApiError> {
        let mut rng = StdRng::seed_from_u64(sample_seed(building_id, self.months, self.seed));
        let normal = Normal::new(0.0, NOISE_SIGMA)
            .map_err(|e| ApiError::upstream(format!("Noise distribution error: {e}")))?;

        // Per-building base level in currency units per month.
        let base = rng.gen_range(180.0..450.0);

        let mut rows = Vec::with_capacity(self.months * 2);
        for i in 0..self.months {
            let offset = (self.months - 1 - i) as u32;
            let date = self
                .end
                .checked_sub_months(Months::new(offset))
                .unwrap_or(self.end);

            let level = base * normal.sample(&mut rng).exp();
            // Split the month across two categories so aggregation has
            // something to sum.
            let electricity_share = rng.gen_range(0.35..0.65);
            rows.push(ExpenseRow {
                year: date.year(),
                month: date.month(),
                amount: level * electricity_share,
                category: "electricity".to_string(),
            });
            rows.push(ExpenseRow {
                year: date.year(),
                month: date.month(),
                amount: level * (1.0 - electricity_share),
                category: "maintenance".to_string(),
            });

            let roll: f64 = rng.r#gen();
            if roll < SPIKE_PROB {
                rows.push(ExpenseRow {
                    year: date.year(),
                    month: date.month(),
                    amount: base * SPIKE_FACTOR,
                    category: "repairs".to_string(),
                });
            }
        }

        Ok(rows)
    }
}

fn sample_seed(building_id: &str, months: usize, seed: u64) -> u64 {
    let mut hasher = DefaultHasher::new();
    building_id.hash(&mut hasher);
    months.hash(&mut hasher);
    seed.hash(&mut hasher);
    hasher.finish()
}
