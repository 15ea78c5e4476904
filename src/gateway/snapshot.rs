//! Gateway over a recorded portal snapshot.
//!
//! A snapshot is one JSON document holding every collection the engine asks
//! for, plus optional per-operation failures to replay:
//!
//! ```json
//! {
//!   "users": [{"email": "owner@example.com", "superAdmin": true}],
//!   "forms": [{"guid": "f1", "isPublished": true}],
//!   "form_submissions": {"f1": 12},
//!   "failures": {"get_workflows": "permission"}
//! }
//! ```

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

use super::errors::GatewayError;
use super::{AuditGateway, RawRecord, SubmissionSummary};

/// Failure to replay for one gateway operation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SnapshotFailure {
    Permission,
    Api,
    NotFound,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SnapshotGateway {
    pub users: Vec<RawRecord>,
    pub integrations: Vec<RawRecord>,
    pub contact_properties: Vec<RawRecord>,
    pub company_properties: Vec<RawRecord>,
    pub deal_properties: Vec<RawRecord>,
    pub workflows: Vec<RawRecord>,
    pub forms: Vec<RawRecord>,
    /// Submission count per form id; absent forms have none
    pub form_submissions: BTreeMap<String, u64>,
    pub dashboards: Vec<RawRecord>,
    pub reports: Vec<RawRecord>,
    pub pipelines: Vec<RawRecord>,
    /// Keyed by operation name, e.g. `get_users`, or `get_form_submissions:<form id>`
    pub failures: BTreeMap<String, SnapshotFailure>,
}

impl SnapshotGateway {
    pub fn from_json(text: &str) -> Result<Self, GatewayError> {
        serde_json::from_str(text).map_err(|e| GatewayError::Decode {
            endpoint: "snapshot".to_string(),
            message: e.to_string(),
        })
    }

    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, GatewayError> {
        let endpoint = path.as_ref().display().to_string();
        let text = std::fs::read_to_string(path.as_ref()).map_err(|e| GatewayError::Io {
            path: endpoint.clone(),
            message: e.to_string(),
        })?;
        serde_json::from_str(&text).map_err(|e| GatewayError::Decode {
            endpoint,
            message: e.to_string(),
        })
    }

    fn replay(&self, operation: &str) -> Result<(), GatewayError> {
        let endpoint = format!("snapshot:{operation}");
        match self.failures.get(operation) {
            None => Ok(()),
            Some(SnapshotFailure::Permission) => Err(GatewayError::PermissionDenied {
                endpoint,
                message: "This app hasn't been granted all required scopes".to_string(),
            }),
            Some(SnapshotFailure::NotFound) => Err(GatewayError::NotFound { endpoint }),
            Some(SnapshotFailure::Api) => Err(GatewayError::Api {
                endpoint,
                status: 500,
                message: "recorded failure".to_string(),
            }),
        }
    }

    fn collection(
        &self,
        operation: &str,
        records: &[RawRecord],
    ) -> Result<Vec<RawRecord>, GatewayError> {
        self.replay(operation)?;
        Ok(records.to_vec())
    }
}

#[async_trait]
impl AuditGateway for SnapshotGateway {
    async fn get_users(&self) -> Result<Vec<RawRecord>, GatewayError> {
        self.collection("get_users", &self.users)
    }

    async fn get_integrations(&self) -> Result<Vec<RawRecord>, GatewayError> {
        self.collection("get_integrations", &self.integrations)
    }

    async fn get_contact_properties(&self) -> Result<Vec<RawRecord>, GatewayError> {
        self.collection("get_contact_properties", &self.contact_properties)
    }

    async fn get_company_properties(&self) -> Result<Vec<RawRecord>, GatewayError> {
        self.collection("get_company_properties", &self.company_properties)
    }

    async fn get_deal_properties(&self) -> Result<Vec<RawRecord>, GatewayError> {
        self.collection("get_deal_properties", &self.deal_properties)
    }

    async fn get_workflows(&self) -> Result<Vec<RawRecord>, GatewayError> {
        self.collection("get_workflows", &self.workflows)
    }

    async fn get_forms(&self) -> Result<Vec<RawRecord>, GatewayError> {
        self.collection("get_forms", &self.forms)
    }

    async fn get_form_submissions(
        &self,
        form_id: &str,
        _days_back: u32,
    ) -> Result<SubmissionSummary, GatewayError> {
        self.replay("get_form_submissions")?;
        self.replay(&format!("get_form_submissions:{form_id}"))?;
        Ok(SubmissionSummary {
            submissions_count: self.form_submissions.get(form_id).copied().unwrap_or(0),
        })
    }

    async fn get_dashboards(&self) -> Result<Vec<RawRecord>, GatewayError> {
        self.collection("get_dashboards", &self.dashboards)
    }

    async fn get_reports(&self) -> Result<Vec<RawRecord>, GatewayError> {
        self.collection("get_reports", &self.reports)
    }

    async fn get_pipelines(&self) -> Result<Vec<RawRecord>, GatewayError> {
        self.collection("get_pipelines", &self.pipelines)
    }
}
