//! HTTP client for the Bitable open API.
//!
//! Token handling follows the tenant-access-token flow: the token is
//! cached and refreshed five minutes before its declared expiry.
//! Record listing is a blocking pagination loop on `page_token`.

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use log::{debug, warn};
use reqwest::Client;
use tokio::sync::Mutex;

use crate::errors::BitableError;
use crate::models::{
    BitableRecord, Envelope, FieldsPage, RecordsPage, TableField, TokenResponse,
};
use crate::source::BitableSource;

const DEFAULT_BASE_URL: &str = "https://open.feishu.cn";
const PAGE_SIZE: u32 = 100;
/// Refresh the token this long before its declared expiry.
const TOKEN_REFRESH_MARGIN_SECS: i64 = 300;

struct CachedToken {
    token: String,
    expires_at: DateTime<Utc>,
}

pub struct BitableClient {
    client: Client,
    base_url: String,
    app_id: String,
    app_secret: String,
    token: Mutex<Option<CachedToken>>,
}

impl BitableClient {
    pub fn new(app_id: String, app_secret: String) -> Self {
        Self::with_base_url(app_id, app_secret, DEFAULT_BASE_URL.to_string())
    }

    pub fn with_base_url(app_id: String, app_secret: String, base_url: String) -> Self {
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(30))
            .build()
            .unwrap_or_else(|_| Client::new());

        Self {
            client,
            base_url,
            app_id,
            app_secret,
            token: Mutex::new(None),
        }
    }

    /// Returns a valid access token, requesting a new one if the cached
    /// token is absent or within the refresh margin of expiry.
    async fn access_token(&self) -> Result<String, BitableError> {
        let mut guard = self.token.lock().await;

        if let Some(cached) = guard.as_ref() {
            if Utc::now() < cached.expires_at {
                return Ok(cached.token.clone());
            }
        }

        let url = format!(
            "{}/open-apis/auth/v3/tenant_access_token/internal",
            self.base_url
        );
        let body = serde_json::json!({
            "app_id": self.app_id,
            "app_secret": self.app_secret,
        });

        let response = self
            .client
            .post(&url)
            .json(&body)
            .send()
            .await
            .map_err(|e| BitableError::Auth(e.to_string()))?;

        let token_response: TokenResponse = response
            .json()
            .await
            .map_err(|e| BitableError::Auth(e.to_string()))?;

        if token_response.code != 0 {
            return Err(BitableError::Auth(format!(
                "code {}: {}",
                token_response.code, token_response.msg
            )));
        }

        let token = token_response
            .tenant_access_token
            .ok_or_else(|| BitableError::Auth("token missing from response".to_string()))?;

        let expires_at = Utc::now()
            + Duration::seconds((token_response.expire - TOKEN_REFRESH_MARGIN_SECS).max(0));
        debug!("Obtained tenant access token, valid until {}", expires_at);

        *guard = Some(CachedToken {
            token: token.clone(),
            expires_at,
        });

        Ok(token)
    }

    async fn get_envelope<T: serde::de::DeserializeOwned>(
        &self,
        url: &str,
        query: &[(&str, String)],
        table_id: &str,
    ) -> Result<T, BitableError> {
        let token = self.access_token().await?;

        let response = self
            .client
            .get(url)
            .bearer_auth(&token)
            .query(query)
            .send()
            .await
            .map_err(|e| BitableError::from_reqwest(e, table_id))?;

        let status = response.status();
        if !status.is_success() {
            return Err(BitableError::Http(format!("HTTP {}", status)));
        }

        let envelope: Envelope<T> = response
            .json()
            .await
            .map_err(|e| BitableError::UnexpectedResponse(e.to_string()))?;

        if envelope.code != 0 {
            return Err(BitableError::Api {
                code: envelope.code,
                msg: envelope.msg,
            });
        }

        envelope
            .data
            .ok_or_else(|| BitableError::UnexpectedResponse("empty data".to_string()))
    }
}

#[async_trait]
impl BitableSource for BitableClient {
    async fn ensure_credential(&self) -> Result<(), BitableError> {
        self.access_token().await.map(|_| ())
    }

    async fn list_records(
        &self,
        app_token: &str,
        table_id: &str,
    ) -> Result<Vec<BitableRecord>, BitableError> {
        let url = format!(
            "{}/open-apis/bitable/v1/apps/{}/tables/{}/records",
            self.base_url, app_token, table_id
        );

        let mut records = Vec::new();
        let mut page_token: Option<String> = None;

        loop {
            let mut query = vec![("page_size", PAGE_SIZE.to_string())];
            if let Some(ref token) = page_token {
                query.push(("page_token", token.clone()));
            }

            let page: RecordsPage = self.get_envelope(&url, &query, table_id).await?;
            records.extend(page.items);

            match page.page_token {
                Some(token) if page.has_more && !token.is_empty() => page_token = Some(token),
                _ => break,
            }
        }

        debug!("Fetched {} records from table {}", records.len(), table_id);
        Ok(records)
    }

    async fn list_fields(
        &self,
        app_token: &str,
        table_id: &str,
    ) -> Result<Vec<TableField>, BitableError> {
        let url = format!(
            "{}/open-apis/bitable/v1/apps/{}/tables/{}/fields",
            self.base_url, app_token, table_id
        );

        let page: FieldsPage = self.get_envelope(&url, &[], table_id).await?;
        if page.items.is_empty() {
            warn!("Field schema for table {} is empty", table_id);
        }
        Ok(page.items)
    }
}
