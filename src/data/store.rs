//! Expense store access.
//!
//! The pipeline reads ledger rows through the `ExpenseStore` trait exactly
//! once per query; everything downstream is pure computation. The REST
//! implementation targets the PostgREST-style `expenses` table the production
//! data lives in. Credentials come from the environment (`.env` supported)
//! but the client itself is an explicitly constructed value handed to the
//! pipeline — no process-wide singleton.
//!
//! Store-level failures (connectivity, non-success status, unreadable body)
//! are upstream errors, a different class from "no rows for this building",
//! which the aggregator reports after looking at the payload.

use reqwest::blocking::Client;

use crate::domain::ExpenseRow;
use crate::error::ApiError;

/// Read-only access to a building's ledger rows.
///
/// No date filtering is requested of the store; future-dated entries are
/// dropped in the core.
pub trait ExpenseStore {
    fn fetch_expenses(&self, building_id: &str) -> Result<Vec<ExpenseRow>, ApiError>;
}

/// PostgREST-backed store client.
pub struct RestStore {
    client: Client,
    base_url: String,
    api_key: String,
}

impl RestStore {
    /// Build a client from `SUPABASE_URL` / `SUPABASE_SERVICE_ROLE_KEY`
    /// (a `.env` file is honored).
    pub fn from_env() -> Result<Self, ApiError> {
        dotenvy::dotenv().ok();
        let base_url = std::env::var("SUPABASE_URL")
            .map_err(|_| ApiError::upstream("Missing SUPABASE_URL in environment (.env)."))?;
        let api_key = std::env::var("SUPABASE_SERVICE_ROLE_KEY").map_err(|_| {
            ApiError::upstream("Missing SUPABASE_SERVICE_ROLE_KEY in environment (.env).")
        })?;
        Ok(Self::new(base_url, api_key))
    }

    pub fn new(base_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key: api_key.into(),
        }
    }
}

impl ExpenseStore for RestStore {
    fn fetch_expenses(&self, building_id: &str) -> Result<Vec<ExpenseRow>, ApiError> {
        let url = format!("{}/rest/v1/expenses", self.base_url);
        let id_filter = format!("eq.{building_id}");

        let resp = self
            .client
            .get(&url)
            .header("apikey", &self.api_key)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .query(&[
                ("select", "year,month,current_month,type"),
                ("building_id", id_filter.as_str()),
            ])
            .send()
            .map_err(|e| ApiError::upstream(format!("Expense store request failed: {e}")))?;

        if !resp.status().is_success() {
            return Err(ApiError::upstream(format!(
                "Expense store request failed with status {}.",
                resp.status()
            )));
        }

        let rows: Vec<ExpenseRow> = resp
            .json()
            .map_err(|e| ApiError::upstream(format!("Failed to parse expense store response: {e}")))?;

        Ok(rows)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn base_url_trailing_slash_is_normalized() {
        let store = RestStore::new("https://example.test/", "key");
        assert_eq!(store.base_url, "https://example.test");
    }
}
