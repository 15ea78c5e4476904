//! Inbound boundary of the audit engine.
//!
//! Every adapter (live HTTP, recorded snapshot, test double) hands the engine
//! ordered sequences of loosely-typed records. The engine never assumes a
//! schema; see [`crate::audit::record`] for the defaulting accessors.

pub mod client;
pub mod errors;
pub mod snapshot;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

#[cfg(any(test, feature = "testing"))]
use mockall::automock;

pub use client::HubSpotClient;
pub use errors::GatewayError;
pub use snapshot::SnapshotGateway;

/// One entity as returned by the API (user, property, workflow, form, ...).
pub type RawRecord = serde_json::Map<String, serde_json::Value>;

/// Submission count for one form over a trailing window.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubmissionSummary {
    pub submissions_count: u64,
}

/// Source of raw portal data for an audit run.
///
/// Implementations must be interchangeable: a workflow record coming from any
/// adapter is interpreted by the same accessor chain.
#[cfg_attr(any(test, feature = "testing"), automock)]
#[async_trait]
pub trait AuditGateway: Send + Sync {
    async fn get_users(&self) -> Result<Vec<RawRecord>, GatewayError>;
    async fn get_integrations(&self) -> Result<Vec<RawRecord>, GatewayError>;
    async fn get_contact_properties(&self) -> Result<Vec<RawRecord>, GatewayError>;
    async fn get_company_properties(&self) -> Result<Vec<RawRecord>, GatewayError>;
    async fn get_deal_properties(&self) -> Result<Vec<RawRecord>, GatewayError>;
    async fn get_workflows(&self) -> Result<Vec<RawRecord>, GatewayError>;
    async fn get_forms(&self) -> Result<Vec<RawRecord>, GatewayError>;
    async fn get_form_submissions(
        &self,
        form_id: &str,
        days_back: u32,
    ) -> Result<SubmissionSummary, GatewayError>;
    async fn get_dashboards(&self) -> Result<Vec<RawRecord>, GatewayError>;
    async fn get_reports(&self) -> Result<Vec<RawRecord>, GatewayError>;
    async fn get_pipelines(&self) -> Result<Vec<RawRecord>, GatewayError>;
}
