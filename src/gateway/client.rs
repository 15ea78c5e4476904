use async_trait::async_trait;
use chrono::{Duration as ChronoDuration, Utc};
use governor::{DefaultDirectRateLimiter, Jitter, Quota, RateLimiter};
use serde_json::Value;
use std::num::NonZeroU32;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};

use super::errors::GatewayError;
use super::{AuditGateway, RawRecord, SubmissionSummary};
use crate::config::HubSpotConfig;
use crate::observability::gateway_metrics;

/// Workflow listings, newest API first. Portals expose different subsets.
pub const WORKFLOW_ENDPOINTS: &[&str] = &[
    "/automation/v3/workflows",
    "/automation/v4/flows",
    "/workflows/v3/workflows",
    "/automation/v2/workflows",
];

const PAGE_SIZE: &str = "100";
/// Upper bound on followed `paging.next.after` cursors per listing
pub const MAX_PAGES: usize = 20;

/// Rate-limited HubSpot REST client
#[derive(Debug)]
pub struct HubSpotClient {
    http: reqwest::Client,
    base_url: String,
    token: String,
    rate_limiter: Arc<DefaultDirectRateLimiter>,
}

impl HubSpotClient {
    pub fn new(config: &HubSpotConfig) -> Result<Self, GatewayError> {
        let token = config
            .access_token
            .clone()
            .filter(|token| !token.trim().is_empty())
            .ok_or(GatewayError::MissingToken)?;

        let per_second =
            NonZeroU32::new(config.rate_limit.requests_per_second).unwrap_or(NonZeroU32::MIN);
        let burst = NonZeroU32::new(config.rate_limit.burst_capacity).unwrap_or(per_second);
        let rate_limiter = Arc::new(RateLimiter::direct(
            Quota::per_second(per_second).allow_burst(burst),
        ));

        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .user_agent(concat!("hubspot-audit/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| GatewayError::Network {
                endpoint: config.base_url.clone(),
                message: e.to_string(),
            })?;

        info!(base_url = %config.base_url, "HubSpot client ready");

        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            token,
            rate_limiter,
        })
    }

    /// GET `endpoint` and decode the JSON body.
    async fn get_json(
        &self,
        endpoint: &str,
        query: &[(&str, &str)],
    ) -> Result<Value, GatewayError> {
        self.rate_limiter
            .until_ready_with_jitter(Jitter::up_to(Duration::from_millis(50)))
            .await;

        let metrics = gateway_metrics();
        metrics.record_request();

        let response = self
            .http
            .get(format!("{}{}", self.base_url, endpoint))
            .bearer_auth(&self.token)
            .query(query)
            .send()
            .await
            .map_err(|e| {
                metrics.record_error();
                GatewayError::Network {
                    endpoint: endpoint.to_string(),
                    message: e.to_string(),
                }
            })?;

        let status = response.status();
        debug!(endpoint, status = status.as_u16(), "HubSpot API response");

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let err = GatewayError::from_response(endpoint, status.as_u16(), &body);
            if err.is_permission_denied() {
                metrics.record_permission_denied(endpoint);
            } else {
                metrics.record_error();
            }
            return Err(err);
        }

        response.json::<Value>().await.map_err(|e| {
            metrics.record_error();
            GatewayError::Decode {
                endpoint: endpoint.to_string(),
                message: e.to_string(),
            }
        })
    }

    /// Every page of a listing, following `paging.next.after`.
    async fn get_list(&self, endpoint: &str) -> Result<Vec<RawRecord>, GatewayError> {
        let mut records = Vec::new();
        let mut after: Option<String> = None;

        for _ in 0..MAX_PAGES {
            let page = {
                let mut query = vec![("limit", PAGE_SIZE)];
                if let Some(cursor) = after.as_deref() {
                    query.push(("after", cursor));
                }
                self.get_json(endpoint, &query).await?
            };
            after = next_cursor(&page);
            records.extend(extract_list(endpoint, page)?);
            if after.is_none() {
                break;
            }
        }

        warn_if_truncated(endpoint, after.as_deref(), records.len());
        Ok(records)
    }

    async fn count_submissions(
        &self,
        form_id: &str,
        days_back: u32,
    ) -> Result<u64, GatewayError> {
        let endpoint = format!("/form-integrations/v1/submissions/forms/{form_id}");
        let since =
            (Utc::now() - ChronoDuration::days(i64::from(days_back))).timestamp_millis();

        let mut count = 0;
        let mut after: Option<String> = None;
        for _ in 0..MAX_PAGES {
            let page = {
                let mut query = vec![("limit", "50")];
                if let Some(cursor) = after.as_deref() {
                    query.push(("after", cursor));
                }
                self.get_json(&endpoint, &query).await?
            };
            after = next_cursor(&page);

            let submissions = extract_list(&endpoint, page)?;
            let recent = submissions
                .iter()
                .filter(|s| {
                    s.get("submittedAt")
                        .and_then(Value::as_i64)
                        .is_some_and(|at| at >= since)
                })
                .count();
            count += recent as u64;

            // pages are newest first; an old entry means the window is exhausted
            if recent < submissions.len() {
                after = None;
                break;
            }
            if after.is_none() {
                break;
            }
        }
        warn_if_truncated(&endpoint, after.as_deref(), count as usize);
        Ok(count)
    }
}

/// A cursor left over after the loop means the page cap cut the listing short.
fn warn_if_truncated(endpoint: &str, cursor: Option<&str>, collected: usize) {
    if let Some(cursor) = cursor {
        warn!(
            endpoint,
            cursor,
            collected,
            max_pages = MAX_PAGES,
            "Stopped paging at the page limit; listing is incomplete"
        );
    }
}

fn next_cursor(page: &Value) -> Option<String> {
    page.pointer("/paging/next/after").and_then(|after| match after {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    })
}

/// Records from a bare array, `results`, or `workflows`. Non-object entries are dropped.
pub fn extract_list(endpoint: &str, body: Value) -> Result<Vec<RawRecord>, GatewayError> {
    let items = match body {
        Value::Array(items) => items,
        Value::Object(mut object) => match object
            .remove("results")
            .or_else(|| object.remove("workflows"))
        {
            Some(Value::Array(items)) => items,
            _ => {
                return Err(GatewayError::Decode {
                    endpoint: endpoint.to_string(),
                    message: "expected a list under `results` or `workflows`".to_string(),
                })
            }
        },
        other => {
            return Err(GatewayError::Decode {
                endpoint: endpoint.to_string(),
                message: format!("expected a JSON array or object, got {other}"),
            })
        }
    };

    Ok(items
        .into_iter()
        .filter_map(|item| match item {
            Value::Object(record) => Some(record),
            _ => None,
        })
        .collect())
}

#[async_trait]
impl AuditGateway for HubSpotClient {
    async fn get_users(&self) -> Result<Vec<RawRecord>, GatewayError> {
        self.get_list("/settings/v3/users").await
    }

    async fn get_integrations(&self) -> Result<Vec<RawRecord>, GatewayError> {
        self.get_list("/integrations/v1/me").await
    }

    async fn get_contact_properties(&self) -> Result<Vec<RawRecord>, GatewayError> {
        self.get_list("/crm/v3/properties/contacts").await
    }

    async fn get_company_properties(&self) -> Result<Vec<RawRecord>, GatewayError> {
        self.get_list("/crm/v3/properties/companies").await
    }

    async fn get_deal_properties(&self) -> Result<Vec<RawRecord>, GatewayError> {
        self.get_list("/crm/v3/properties/deals").await
    }

    /// First endpoint with a non-empty listing wins.
    ///
    /// When every endpoint fails, a permission failure is reported in
    /// preference to whatever failed last.
    async fn get_workflows(&self) -> Result<Vec<RawRecord>, GatewayError> {
        let mut answered_empty = false;
        let mut denied = None;
        let mut last_error = None;

        for endpoint in WORKFLOW_ENDPOINTS {
            match self.get_list(endpoint).await {
                Ok(workflows) if !workflows.is_empty() => {
                    debug!(endpoint, count = workflows.len(), "Using workflow endpoint");
                    return Ok(workflows);
                }
                Ok(_) => answered_empty = true,
                Err(e) if e.is_permission_denied() => denied = Some(e),
                Err(e) => last_error = Some(e),
            }
        }

        if answered_empty {
            return Ok(Vec::new());
        }
        match denied.or(last_error) {
            Some(err) => Err(err),
            None => Ok(Vec::new()),
        }
    }

    async fn get_forms(&self) -> Result<Vec<RawRecord>, GatewayError> {
        let body = self.get_json("/forms/v2/forms", &[]).await?;
        extract_list("/forms/v2/forms", body)
    }

    async fn get_form_submissions(
        &self,
        form_id: &str,
        days_back: u32,
    ) -> Result<SubmissionSummary, GatewayError> {
        let submissions_count = self.count_submissions(form_id, days_back).await?;
        Ok(SubmissionSummary { submissions_count })
    }

    async fn get_dashboards(&self) -> Result<Vec<RawRecord>, GatewayError> {
        let body = self.get_json("/reports/v2/dashboards", &[]).await?;
        extract_list("/reports/v2/dashboards", body)
    }

    async fn get_reports(&self) -> Result<Vec<RawRecord>, GatewayError> {
        let body = self.get_json("/reports/v2/reports", &[]).await?;
        extract_list("/reports/v2/reports", body)
    }

    async fn get_pipelines(&self) -> Result<Vec<RawRecord>, GatewayError> {
        self.get_list("/crm/v3/pipelines/deals").await
    }
}
