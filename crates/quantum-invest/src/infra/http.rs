//! REST client for the rate tier backend
//!
//! Wire format:
//! - `GET {tiers}` → `[TierRecord]`
//! - `POST {tiers}` with [`NewTierPayload`] (snake_case) → `TierRecord`
//! - `PUT {tiers}` with [`UpdateTierPayload`] (camelCase, id in body)
//! - `DELETE {tiers}/{id}`
//!
//! The backend names the term fields `*_term_months` but stores days.

use async_trait::async_trait;
use quantum_common::{RateTier, RepositoryError, TierId, TierSpec};
use reqwest::{Client, Response, StatusCode};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument, warn};

use super::repository::TierRepository;
use crate::config::RepositorySettings;

/// Tier as returned by the backend
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TierRecord {
    pub id: TierId,
    #[serde(with = "rust_decimal::serde::float")]
    pub min_amount: Decimal,
    #[serde(default, with = "rust_decimal::serde::float_option")]
    pub max_amount: Option<Decimal>,
    pub min_term_months: u32,
    #[serde(default)]
    pub max_term_months: Option<u32>,
    #[serde(with = "rust_decimal::serde::float")]
    pub interest_rate: Decimal,
}

impl From<TierRecord> for RateTier {
    fn from(record: TierRecord) -> Self {
        RateTier {
            id: record.id,
            amount_from: record.min_amount,
            amount_to: record.max_amount,
            term_from: record.min_term_months,
            term_to: record.max_term_months,
            rate: record.interest_rate,
        }
    }
}

impl From<&RateTier> for TierRecord {
    fn from(tier: &RateTier) -> Self {
        TierRecord {
            id: tier.id,
            min_amount: tier.amount_from,
            max_amount: tier.amount_to,
            min_term_months: tier.term_from,
            max_term_months: tier.term_to,
            interest_rate: tier.rate,
        }
    }
}

/// POST body; open bounds are omitted rather than sent as null
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewTierPayload {
    #[serde(with = "rust_decimal::serde::float")]
    pub min_amount: Decimal,
    #[serde(
        with = "rust_decimal::serde::float_option",
        skip_serializing_if = "Option::is_none"
    )]
    pub max_amount: Option<Decimal>,
    pub min_term_months: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_term_months: Option<u32>,
    #[serde(with = "rust_decimal::serde::float")]
    pub interest_rate: Decimal,
}

impl From<&TierSpec> for NewTierPayload {
    fn from(spec: &TierSpec) -> Self {
        Self {
            min_amount: spec.amount_from,
            max_amount: spec.amount_to,
            min_term_months: spec.term_from,
            max_term_months: spec.term_to,
            interest_rate: spec.rate,
        }
    }
}

/// PUT body; open bounds are sent as explicit nulls
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateTierPayload {
    pub id: TierId,
    #[serde(with = "rust_decimal::serde::float")]
    pub min_amount: Decimal,
    #[serde(with = "rust_decimal::serde::float_option")]
    pub max_amount: Option<Decimal>,
    pub min_term_months: u32,
    pub max_term_months: Option<u32>,
    #[serde(with = "rust_decimal::serde::float")]
    pub interest_rate: Decimal,
}

impl From<&RateTier> for UpdateTierPayload {
    fn from(tier: &RateTier) -> Self {
        Self {
            id: tier.id,
            min_amount: tier.amount_from,
            max_amount: tier.amount_to,
            min_term_months: tier.term_from,
            max_term_months: tier.term_to,
            interest_rate: tier.rate,
        }
    }
}

/// Decode a JSON array of backend records
pub fn decode_records(json: &str) -> Result<Vec<RateTier>, RepositoryError> {
    let records: Vec<TierRecord> = serde_json::from_str(json)?;
    Ok(records.into_iter().map(RateTier::from).collect())
}

/// HTTP-backed tier repository
pub struct HttpTierRepository {
    client: Client,
    tiers_url: String,
}

impl HttpTierRepository {
    pub fn new(settings: &RepositorySettings) -> Self {
        Self::with_client(Client::new(), settings.tiers_url())
    }

    /// Use a preconfigured client, e.g. one carrying auth headers
    pub fn with_client(client: Client, tiers_url: impl Into<String>) -> Self {
        Self {
            client,
            tiers_url: tiers_url.into(),
        }
    }

    pub fn tiers_url(&self) -> &str {
        &self.tiers_url
    }

    fn tier_url(&self, id: TierId) -> String {
        format!("{}/{}", self.tiers_url, id)
    }
}

fn transport(err: reqwest::Error) -> RepositoryError {
    warn!("Tier repository request failed: {}", err);
    RepositoryError::Transport(err.to_string())
}

/// Turn non-2xx responses into `RepositoryError::Status`
async fn ensure_success(response: Response) -> Result<Response, RepositoryError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let message = response
        .text()
        .await
        .ok()
        .filter(|body| !body.is_empty())
        .unwrap_or_else(|| status.canonical_reason().unwrap_or("").to_string());
    warn!(status = status.as_u16(), %message, "Tier repository rejected request");
    Err(RepositoryError::Status {
        status: status.as_u16(),
        message,
    })
}

#[async_trait]
impl TierRepository for HttpTierRepository {
    #[instrument(skip(self))]
    async fn fetch_all(&self) -> Result<Vec<RateTier>, RepositoryError> {
        let response = self
            .client
            .get(&self.tiers_url)
            .send()
            .await
            .map_err(transport)?;
        let response = ensure_success(response).await?;

        let records: Vec<TierRecord> = response
            .json()
            .await
            .map_err(|e| RepositoryError::Decode(e.to_string()))?;
        debug!(count = records.len(), "Fetched rate tiers");
        Ok(records.into_iter().map(RateTier::from).collect())
    }

    #[instrument(skip(self))]
    async fn create(&self, spec: TierSpec) -> Result<RateTier, RepositoryError> {
        let response = self
            .client
            .post(&self.tiers_url)
            .json(&NewTierPayload::from(&spec))
            .send()
            .await
            .map_err(transport)?;
        let response = ensure_success(response).await?;

        let record: TierRecord = response
            .json()
            .await
            .map_err(|e| RepositoryError::Decode(e.to_string()))?;
        debug!(id = record.id, "Created rate tier");
        Ok(record.into())
    }

    #[instrument(skip(self))]
    async fn update(&self, tier: RateTier) -> Result<(), RepositoryError> {
        let response = self
            .client
            .put(&self.tiers_url)
            .json(&UpdateTierPayload::from(&tier))
            .send()
            .await
            .map_err(transport)?;

        if response.status() == StatusCode::NOT_FOUND {
            return Err(RepositoryError::NotFound(tier.id));
        }
        ensure_success(response).await?;
        Ok(())
    }

    #[instrument(skip(self))]
    async fn delete(&self, id: TierId) -> Result<(), RepositoryError> {
        let response = self
            .client
            .delete(self.tier_url(id))
            .send()
            .await
            .map_err(transport)?;

        if response.status() == StatusCode::NOT_FOUND {
            return Err(RepositoryError::NotFound(id));
        }
        ensure_success(response).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use quantum_common::{AmountRange, TermRange};
    use rust_decimal_macros::dec;
    use serde_json::{json, Value};
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    /// Serve one canned HTTP response and return the base URL
    async fn serve_once(status_line: &'static str, body: &'static str) -> String {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut buf = vec![0u8; 4096];
            let mut read = 0;
            while !buf[..read].windows(4).any(|w| w == b"\r\n\r\n") {
                let n = socket.read(&mut buf[read..]).await.unwrap();
                if n == 0 {
                    break;
                }
                read += n;
            }
            let response = format!(
                "HTTP/1.1 {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                status_line,
                body.len(),
                body
            );
            socket.write_all(response.as_bytes()).await.unwrap();
            socket.shutdown().await.ok();
        });

        format!("http://{}/investment-tiers", addr)
    }

    #[test]
    fn test_decode_records_maps_fields() {
        let tiers = decode_records(
            r#"[
                {"id": 1, "min_amount": 0, "max_amount": 1000.5, "min_term_months": 30, "max_term_months": 89, "interest_rate": 5.25},
                {"id": 2, "min_amount": 1000.5, "max_amount": null, "min_term_months": 30, "interest_rate": 6}
            ]"#,
        )
        .unwrap();

        assert_eq!(tiers[0].amount_to, Some(dec!(1000.5)));
        assert_eq!(tiers[0].term_to, Some(89));
        assert_eq!(tiers[0].rate, dec!(5.25));
        assert_eq!(tiers[1].amount_to, None);
        assert_eq!(tiers[1].term_to, None);
        assert_eq!(tiers[1].rate, dec!(6));
    }

    #[test]
    fn test_decode_rejects_garbage() {
        assert!(matches!(
            decode_records("{\"not\": \"a list\"}"),
            Err(RepositoryError::Decode(_))
        ));
    }

    #[test]
    fn test_create_payload_is_snake_case_without_open_bounds() {
        let spec = TierSpec::new(AmountRange::open(dec!(1000)), TermRange::open(90), dec!(6));
        let value = serde_json::to_value(NewTierPayload::from(&spec)).unwrap();

        assert_eq!(
            value,
            json!({"min_amount": 1000.0, "min_term_months": 90, "interest_rate": 6.0})
        );
    }

    #[test]
    fn test_update_payload_is_camel_case_with_nulls() {
        let tier = RateTier::from_spec(
            3,
            TierSpec::new(AmountRange::open(dec!(1000)), TermRange::bounded(30, 89), dec!(6)),
        );
        let value = serde_json::to_value(UpdateTierPayload::from(&tier)).unwrap();

        assert_eq!(value["id"], json!(3));
        assert_eq!(value["minAmount"], json!(1000.0));
        assert_eq!(value["maxAmount"], Value::Null);
        assert_eq!(value["minTermMonths"], json!(30));
        assert_eq!(value["maxTermMonths"], json!(89));
        assert_eq!(value["interestRate"], json!(6.0));
    }

    #[tokio::test]
    async fn test_fetch_all_over_http() {
        let url = serve_once(
            "200 OK",
            r#"[{"id": 4, "min_amount": 0, "max_amount": 500, "min_term_months": 30, "max_term_months": 60, "interest_rate": 4}]"#,
        )
        .await;
        let repo = HttpTierRepository::with_client(Client::new(), url);

        let tiers = repo.fetch_all().await.unwrap();
        assert_eq!(tiers.len(), 1);
        assert_eq!(tiers[0].id, 4);
        assert_eq!(tiers[0].amount_to, Some(dec!(500)));
    }

    #[tokio::test]
    async fn test_error_status_is_reported() {
        let url = serve_once("500 Internal Server Error", "boom").await;
        let repo = HttpTierRepository::with_client(Client::new(), url);

        let err = repo.fetch_all().await.unwrap_err();
        assert_eq!(
            err,
            RepositoryError::Status {
                status: 500,
                message: "boom".to_string()
            }
        );
    }

    #[tokio::test]
    async fn test_delete_not_found() {
        let url = serve_once("404 Not Found", "").await;
        let repo = HttpTierRepository::with_client(Client::new(), url);

        assert_eq!(repo.delete(12).await, Err(RepositoryError::NotFound(12)));
    }

    #[tokio::test]
    async fn test_unreachable_backend() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let repo = HttpTierRepository::with_client(
            Client::new(),
            format!("http://{}/investment-tiers", addr),
        );
        assert!(matches!(
            repo.fetch_all().await,
            Err(RepositoryError::Transport(_))
        ));
    }
}
