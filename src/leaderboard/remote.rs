//! Supabase leaderboard over the PostgREST HTTP API
//!
//! Every failure degrades to the local board: fetches return local scores, and
//! submissions are saved locally with a message saying what went wrong.

use serde::Deserialize;

use super::local::LocalScoreBoard;
use super::{LeaderboardEntry, LeaderboardError, ScoreBoard, SubmitOutcome, validate_username};
use crate::platform::{HttpRequest, HttpResponse, KeyValueStore, Method, Transport};

/// Remote table name
pub const TABLE: &str = "leaderboard";

/// Postgres `numeric_value_out_of_range`
const PG_OUT_OF_RANGE: &str = "22003";

/// PostgREST error body
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct ApiError {
    code: Option<String>,
    message: Option<String>,
}

/// Request builders and response parsing for the leaderboard table
#[derive(Debug, Clone, PartialEq)]
pub struct SupabaseApi {
    base_url: String,
    anon_key: String,
}

impl SupabaseApi {
    pub fn new(base_url: &str, anon_key: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            anon_key: anon_key.to_string(),
        }
    }

    fn endpoint(&self) -> String {
        format!("{}/rest/v1/{}", self.base_url, TABLE)
    }

    fn authorized(&self, request: HttpRequest) -> HttpRequest {
        request
            .header("apikey", &self.anon_key)
            .header("Authorization", &format!("Bearer {}", self.anon_key))
    }

    /// Top `n` scores, highest first
    pub fn fetch_request(&self, n: usize) -> HttpRequest {
        let url = format!(
            "{}?select=username,score&order=score.desc&limit={}",
            self.endpoint(),
            n
        );
        self.authorized(HttpRequest::new(Method::Get, url))
            .header("Accept", "application/json")
    }

    pub fn insert_request(&self, entry: &LeaderboardEntry) -> Result<HttpRequest, LeaderboardError> {
        let body = serde_json::to_string(&[entry])
            .map_err(|e| LeaderboardError::Malformed(e.to_string()))?;
        Ok(self
            .authorized(HttpRequest::new(Method::Post, self.endpoint()))
            .header("Content-Type", "application/json")
            .header("Prefer", "return=minimal")
            .body(body))
    }

    /// Row count only, used as a connectivity check
    pub fn probe_request(&self) -> HttpRequest {
        let url = format!("{}?select=count", self.endpoint());
        self.authorized(HttpRequest::new(Method::Head, url))
            .header("Prefer", "count=exact")
    }

    pub fn parse_entries(response: &HttpResponse) -> Result<Vec<LeaderboardEntry>, LeaderboardError> {
        Self::check_status(response, None)?;
        serde_json::from_str(&response.body).map_err(|e| LeaderboardError::Malformed(e.to_string()))
    }

    /// Map an error status to a [`LeaderboardError`]
    pub fn check_status(response: &HttpResponse, score: Option<u64>) -> Result<(), LeaderboardError> {
        if response.is_success() {
            return Ok(());
        }

        let api_error: ApiError = serde_json::from_str(&response.body).unwrap_or_default();
        let message = api_error
            .message
            .filter(|m| !m.is_empty())
            .unwrap_or_else(|| format!("status {}", response.status));

        let out_of_range = api_error.code.as_deref() == Some(PG_OUT_OF_RANGE)
            || message.to_ascii_lowercase().contains("out of range");
        match score {
            Some(score) if out_of_range => Err(LeaderboardError::ScoreOutOfRange { score }),
            _ => Err(LeaderboardError::Rejected {
                status: response.status,
                message,
            }),
        }
    }
}

/// Online leaderboard with a local fallback
#[derive(Debug, Clone)]
pub struct RemoteScoreBoard<T, S> {
    api: SupabaseApi,
    transport: T,
    fallback: LocalScoreBoard<S>,
}

impl<T: Transport, S: KeyValueStore> RemoteScoreBoard<T, S> {
    pub fn new(api: SupabaseApi, transport: T, store: S) -> Self {
        Self {
            api,
            transport,
            fallback: LocalScoreBoard::new(store),
        }
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub fn fallback(&self) -> &LocalScoreBoard<S> {
        &self.fallback
    }

    /// Check the backend answers; a failure is logged and nothing else changes
    pub async fn probe(&self) -> Result<(), LeaderboardError> {
        let response = self.transport.send(self.api.probe_request()).await?;
        match SupabaseApi::check_status(&response, None) {
            Ok(()) => {
                log::info!("Leaderboard connected");
                Ok(())
            }
            Err(e) => {
                log::error!("Leaderboard connection test failed: {}", e);
                Err(e)
            }
        }
    }

    async fn fetch_remote(&self, n: usize) -> Result<Vec<LeaderboardEntry>, LeaderboardError> {
        let response = self.transport.send(self.api.fetch_request(n)).await?;
        SupabaseApi::parse_entries(&response)
    }

    async fn insert_remote(&self, entry: &LeaderboardEntry) -> Result<(), LeaderboardError> {
        let request = self.api.insert_request(entry)?;
        let response = self.transport.send(request).await?;
        SupabaseApi::check_status(&response, Some(entry.score))
    }

    fn save_locally(&mut self, entry: LeaderboardEntry) {
        if let Err(e) = self.fallback.record(entry) {
            log::error!("Error saving local score: {}", e);
        }
    }
}

impl<T: Transport, S: KeyValueStore> ScoreBoard for RemoteScoreBoard<T, S> {
    fn is_online(&self) -> bool {
        true
    }

    async fn fetch_top(&self, n: usize) -> Vec<LeaderboardEntry> {
        match self.fetch_remote(n).await {
            Ok(entries) => entries,
            Err(e) => {
                log::error!("Error fetching remote leaderboard: {}", e);
                self.fallback.fetch_top(n).await
            }
        }
    }

    async fn submit(&mut self, username: &str, score: u64) -> SubmitOutcome {
        let username = match validate_username(username) {
            Ok(name) => name,
            Err(e) => return SubmitOutcome::failed(e.to_string()),
        };
        let entry = LeaderboardEntry {
            username: username.to_string(),
            score,
        };

        match self.insert_remote(&entry).await {
            Ok(()) => {
                log::info!("Score submitted: {} - {}", entry.username, score);
                SubmitOutcome::ok("Score submitted successfully!")
            }
            Err(LeaderboardError::Unreachable(reason)) => {
                log::error!("Exception submitting score: {}", reason);
                self.save_locally(entry);
                SubmitOutcome::failed("Network error. Saved locally.")
            }
            Err(e) => {
                log::error!("Error submitting score: {}", e);
                self.save_locally(entry);
                let reason = match &e {
                    LeaderboardError::Rejected { message, .. } => message.clone(),
                    other => other.to_string(),
                };
                SubmitOutcome::failed(format!("Remote upload failed ({}). Saved locally.", reason))
            }
        }
    }
}
