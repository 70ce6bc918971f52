//! Crate-wide error type.
//!
//! Every failure that can abort a forecast query is an `ApiError` with a
//! `kind` that fixes how the boundary reports it:
//!
//! - `status_code()` — the HTTP-style status a serving layer should map it to
//! - `exit_code()` — the process exit code used by the `ef` binary
//!
//! Fit failures inside the model selector are deliberately *not* represented
//! here; they are converted to the fallback strategy before reaching any
//! caller-visible surface.

/// Classification of a query failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Missing or reserved building identifier; no pipeline stage ran.
    BadRequest,
    /// The expense store read failed or returned an unreadable shape.
    Upstream,
    /// The building has no ledger rows at all.
    NoData,
    /// Ledger rows exist, but none are dated on/before "now".
    NoHistoricalData,
}

#[derive(Clone)]
pub struct ApiError {
    kind: ErrorKind,
    message: String,
}

impl ApiError {
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::BadRequest, message)
    }

    pub fn upstream(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Upstream, message)
    }

    pub fn no_data(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::NoData, message)
    }

    pub fn no_historical_data(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::NoHistoricalData, message)
    }

    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    /// HTTP-style status the serving boundary should report.
    ///
    /// The two not-found kinds share a status but keep distinct messages.
    pub fn status_code(&self) -> u16 {
        match self.kind {
            ErrorKind::BadRequest => 400,
            ErrorKind::Upstream => 502,
            ErrorKind::NoData | ErrorKind::NoHistoricalData => 404,
        }
    }

    /// Process exit code for the CLI binary.
    ///
    /// 2 = caller mistake, 3 = no usable data, 4 = upstream failure.
    pub fn exit_code(&self) -> u8 {
        match self.kind {
            ErrorKind::BadRequest => 2,
            ErrorKind::NoData | ErrorKind::NoHistoricalData => 3,
            ErrorKind::Upstream => 4,
        }
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::fmt::Debug for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiError")
            .field("kind", &self.kind)
            .field("message", &self.message)
            .finish()
    }
}

impl std::error::Error for ApiError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_codes_follow_kind() {
        assert_eq!(ApiError::bad_request("x").status_code(), 400);
        assert_eq!(ApiError::upstream("x").status_code(), 502);
        assert_eq!(ApiError::no_data("x").status_code(), 404);
        assert_eq!(ApiError::no_historical_data("x").status_code(), 404);
    }

    #[test]
    fn not_found_kinds_stay_distinct() {
        let a = ApiError::no_data("no rows");
        let b = ApiError::no_historical_data("nothing on or before now");
        assert_ne!(a.kind(), b.kind());
        assert_eq!(a.exit_code(), b.exit_code());
    }
}
