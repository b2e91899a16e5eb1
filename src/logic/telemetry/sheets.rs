//! Google Sheets Sink
//!
//! Appends `[timestamp, cheating, confidence]` rows to a spreadsheet via
//! the Sheets `values:append` API, authenticating as a service account.

use std::path::Path;
use std::time::{Duration, Instant};

use jsonwebtoken::{encode, Algorithm, EncodingKey, Header};
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};

use super::record::{LogRecord, LogSink, SinkError};

const SHEETS_SCOPE: &str = "https://www.googleapis.com/auth/spreadsheets";
const DEFAULT_TOKEN_URI: &str = "https://oauth2.googleapis.com/token";
const SHEETS_API: &str = "https://sheets.googleapis.com/v4/spreadsheets";

/// Lifetime requested for each signed assertion (Google's maximum)
const ASSERTION_TTL_SECS: i64 = 3600;

/// Refresh this long before the access token expires
const TOKEN_REFRESH_MARGIN: Duration = Duration::from_secs(60);

const HTTP_TIMEOUT: Duration = Duration::from_secs(10);

/// Fields used from a service-account key file
#[derive(Debug, Deserialize)]
struct ServiceAccountKey {
    client_email: String,
    private_key: String,
    #[serde(default)]
    private_key_id: Option<String>,
    #[serde(default = "default_token_uri")]
    token_uri: String,
}

fn default_token_uri() -> String {
    DEFAULT_TOKEN_URI.to_string()
}

#[derive(Debug, Serialize)]
struct Claims<'a> {
    iss: &'a str,
    scope: &'a str,
    aud: &'a str,
    iat: i64,
    exp: i64,
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    expires_in: u64,
}

struct CachedToken {
    token: String,
    refresh_at: Instant,
}

pub struct SheetsSink {
    client_email: String,
    key_id: Option<String>,
    token_uri: String,
    signing_key: EncodingKey,
    append_url: String,
    agent: ureq::Agent,
    token: Mutex<Option<CachedToken>>,
}

impl SheetsSink {
    /// Build from a service-account JSON key file
    pub fn from_key_file(
        path: &Path,
        sheet_id: String,
        range: String,
    ) -> Result<Self, SinkError> {
        let content = std::fs::read_to_string(path)?;
        let key: ServiceAccountKey = serde_json::from_str(&content)?;
        Self::from_key(key, &sheet_id, &range)
    }

    fn from_key(key: ServiceAccountKey, sheet_id: &str, range: &str) -> Result<Self, SinkError> {
        let signing_key = EncodingKey::from_rsa_pem(key.private_key.as_bytes())
            .map_err(|e| SinkError::Auth(format!("invalid private key: {}", e)))?;

        let agent = ureq::AgentBuilder::new()
            .timeout(HTTP_TIMEOUT)
            .build();

        Ok(Self {
            client_email: key.client_email,
            key_id: key.private_key_id,
            token_uri: key.token_uri,
            signing_key,
            append_url: append_url(sheet_id, range),
            agent,
            token: Mutex::new(None),
        })
    }

    /// Signed JWT assertion for the OAuth2 jwt-bearer grant
    fn assertion(&self, now: i64) -> Result<String, SinkError> {
        let claims = Claims {
            iss: &self.client_email,
            scope: SHEETS_SCOPE,
            aud: &self.token_uri,
            iat: now,
            exp: now + ASSERTION_TTL_SECS,
        };

        let mut header = Header::new(Algorithm::RS256);
        header.kid = self.key_id.clone();

        encode(&header, &claims, &self.signing_key)
            .map_err(|e| SinkError::Auth(format!("failed to sign assertion: {}", e)))
    }

    /// Cached access token, refreshed shortly before expiry
    fn access_token(&self) -> Result<String, SinkError> {
        let mut cached = self.token.lock();
        if let Some(token) = cached.as_ref() {
            if Instant::now() < token.refresh_at {
                return Ok(token.token.clone());
            }
        }

        let assertion = self.assertion(chrono::Utc::now().timestamp())?;
        let response = self.agent
            .post(&self.token_uri)
            .send_form(&[
                ("grant_type", "urn:ietf:params:oauth:grant-type:jwt-bearer"),
                ("assertion", assertion.as_str()),
            ])
            .map_err(|e| SinkError::Auth(e.to_string()))?;

        let body = response.into_string()?;
        let parsed: TokenResponse = serde_json::from_str(&body)?;

        let lifetime = Duration::from_secs(parsed.expires_in).saturating_sub(TOKEN_REFRESH_MARGIN);
        *cached = Some(CachedToken {
            token: parsed.access_token.clone(),
            refresh_at: Instant::now() + lifetime,
        });
        tracing::debug!("Refreshed Sheets access token");

        Ok(parsed.access_token)
    }
}

impl LogSink for SheetsSink {
    fn append(&self, record: &LogRecord) -> Result<(), SinkError> {
        let token = self.access_token()?;
        let body = serde_json::to_string(&append_body(record))?;

        let response = self.agent
            .post(&self.append_url)
            .set("Authorization", &format!("Bearer {}", token))
            .set("Content-Type", "application/json")
            .send_string(&body);

        match response {
            Ok(_) => Ok(()),
            Err(ureq::Error::Status(401, _)) => {
                // Token revoked early; force a refresh next time
                *self.token.lock() = None;
                Err(SinkError::Auth("access token rejected".to_string()))
            }
            Err(e) => Err(SinkError::Http(e.to_string())),
        }
    }

    fn name(&self) -> &'static str {
        "sheets"
    }
}

fn append_url(sheet_id: &str, range: &str) -> String {
    format!(
        "{}/{}/values/{}:append?valueInputOption=USER_ENTERED&insertDataOption=INSERT_ROWS",
        SHEETS_API,
        sheet_id,
        range.replace(' ', "%20")
    )
}

/// `values:append` request body holding one row
fn append_body(record: &LogRecord) -> serde_json::Value {
    serde_json::json!({
        "values": [[record.timestamp_string(), record.cheating, record.confidence]]
    })
}
