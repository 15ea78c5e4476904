//! One audit run over the six categories.
//!
//! Categories run one after another and never affect each other: every gateway
//! failure ends up as a status on its own category result, and the run itself
//! never returns an error.

use std::sync::Arc;

use tracing::{debug, error, info, warn, Instrument};

use crate::config::AuditSettings;
use crate::gateway::{AuditGateway, GatewayError, RawRecord};
use crate::observability::{gateway_metrics, OperationTimer};
use crate::telemetry::{create_audit_span, create_category_span, generate_run_id};

use super::aggregate::{aggregate, AuditError};
use super::categories::forms::FormActivity;
use super::categories::properties::PropertySets;
use super::categories::{admin, forms, properties, reporting, sales, workflows};
use super::findings::{classify, no_forms_result};
use super::metrics::CategoryMetrics;
use super::scoring::{score_to_grade, Scorer};
use super::types::{AuditResults, Category, CategoryResult, CategoryStatus};

/// Status of a category whose gateway call failed
pub fn status_for(err: &GatewayError) -> CategoryStatus {
    if err.is_permission_denied() {
        CategoryStatus::InsufficientPermissions
    } else if err.is_not_found() {
        CategoryStatus::DataUnavailable
    } else {
        CategoryStatus::ApiError
    }
}

pub struct AuditEngine {
    gateway: Arc<dyn AuditGateway>,
    scorer: Scorer,
    settings: AuditSettings,
}

impl AuditEngine {
    pub fn new(gateway: Arc<dyn AuditGateway>, scorer: Scorer, settings: AuditSettings) -> Self {
        Self {
            gateway,
            scorer,
            settings,
        }
    }

    pub fn scorer(&self) -> &Scorer {
        &self.scorer
    }

    /// Audit every category and aggregate the results.
    ///
    /// If the overall result cannot be assembled, the error is logged and an
    /// empty result is returned instead.
    pub async fn run_full_audit(&self) -> AuditResults {
        let run_id = generate_run_id();
        let span = create_audit_span(&run_id);

        async {
            info!("Starting HubSpot portal audit");
            let timer = OperationTimer::new("full_audit");
            let baseline = gateway_metrics().get_stats();

            let admin = self.run_category(Category::Admin, &run_id).await;
            let properties = self.run_category(Category::Properties, &run_id).await;
            let workflows = self.run_category(Category::Workflows, &run_id).await;
            let forms = self.run_category(Category::Forms, &run_id).await;
            let reporting = self.run_category(Category::Reporting, &run_id).await;
            let sales = self.run_category(Category::Sales, &run_id).await;

            let results = match assemble(admin, properties, workflows, forms, reporting, sales) {
                Ok(results) => {
                    info!(
                        overall_score = results.overall_score,
                        overall_grade = %results.overall_grade,
                        "Audit completed"
                    );
                    results
                }
                Err(e) => {
                    error!(error = %e, "Failed to assemble audit results");
                    AuditResults::empty()
                }
            };

            timer.finish();
            gateway_metrics().log_stats_since(&baseline);
            results
        }
        .instrument(span)
        .await
    }

    async fn run_category(&self, category: Category, run_id: &str) -> CategoryResult {
        let span = create_category_span(category.key(), run_id);

        async {
            let timer = OperationTimer::new(&format!("audit_{category}"));
            let result = match self.audit_category(category).await {
                Ok(result) => result,
                Err(e) => {
                    let status = status_for(&e);
                    warn!(error = %e, ?status, "Category could not be audited");
                    CategoryResult::unavailable(status)
                }
            };
            debug!(score = ?result.score, grade = %result.grade, "Category audited");
            timer.finish();
            result
        }
        .instrument(span)
        .await
    }

    async fn audit_category(&self, category: Category) -> Result<CategoryResult, GatewayError> {
        let limit = self.settings.sample_limit;
        let gateway = &self.gateway;

        match category {
            Category::Admin => {
                let users = gateway.get_users().await?;
                let integrations = secondary("integrations", gateway.get_integrations().await)?;
                Ok(self.scored(category, admin::extract_metrics(&users, &integrations)))
            }
            Category::Properties => {
                let contact = gateway.get_contact_properties().await?;
                let company =
                    secondary("company properties", gateway.get_company_properties().await)?;
                let deal = secondary("deal properties", gateway.get_deal_properties().await)?;
                let forms = cross_reference("forms", gateway.get_forms().await);
                let sets = PropertySets {
                    contact: &contact,
                    company: &company,
                    deal: &deal,
                    forms: forms.as_deref(),
                };
                Ok(self.scored(category, properties::extract_metrics(&sets, limit)))
            }
            Category::Workflows => {
                let all = gateway.get_workflows().await?;
                Ok(self.scored(category, workflows::extract_metrics(&all, limit)))
            }
            Category::Forms => self.audit_forms().await,
            Category::Reporting => {
                let dashboards = gateway.get_dashboards().await?;
                let reports = secondary("reports", gateway.get_reports().await)?;
                Ok(self.scored(category, reporting::extract_metrics(&dashboards, &reports)))
            }
            Category::Sales => {
                let pipelines = gateway.get_pipelines().await?;
                Ok(self.scored(category, sales::extract_metrics(&pipelines)))
            }
        }
    }

    async fn audit_forms(&self) -> Result<CategoryResult, GatewayError> {
        let all: Vec<RawRecord> = self.gateway.get_forms().await?;
        if all.is_empty() {
            info!("Portal has no forms");
            return Ok(no_forms_result(
                CategoryMetrics::builder().count("total_forms", 0).build(),
            ));
        }

        let days = self.settings.submission_window_days;
        let mut activity = Vec::new();
        for form_id in forms::sample_ids(&all, self.settings.forms_sample_size) {
            match self.gateway.get_form_submissions(&form_id, days).await {
                Ok(summary) => activity.push(FormActivity {
                    form_id,
                    submissions: summary.submissions_count,
                }),
                Err(e) if e.is_permission_denied() => return Err(e),
                Err(e) => {
                    warn!(form_id = %form_id, error = %e, "Skipping form in submission sample");
                }
            }
        }

        let metrics = forms::extract_metrics(&all, &activity, self.settings.sample_limit);
        Ok(self.scored(Category::Forms, metrics))
    }

    fn scored(&self, category: Category, metrics: CategoryMetrics) -> CategoryResult {
        let score = self.scorer.score(category, &metrics);
        let findings = classify(category, &metrics);
        CategoryResult {
            score: Some(score),
            grade: score_to_grade(score),
            metrics,
            recommendations: findings.recommendations,
            critical_issues: findings.critical_issues,
            status: CategoryStatus::Ok,
        }
    }
}

/// A failed secondary collection counts as empty, unless access was denied.
fn secondary(
    what: &str,
    fetched: Result<Vec<RawRecord>, GatewayError>,
) -> Result<Vec<RawRecord>, GatewayError> {
    match fetched {
        Ok(records) => Ok(records),
        Err(e) if e.is_permission_denied() => Err(e),
        Err(e) => {
            warn!(collection = what, error = %e, "Treating failed fetch as empty");
            Ok(Vec::new())
        }
    }
}

/// Data borrowed from another category. Any failure, denial included, only drops it.
fn cross_reference(
    what: &str,
    fetched: Result<Vec<RawRecord>, GatewayError>,
) -> Option<Vec<RawRecord>> {
    match fetched {
        Ok(records) => Some(records),
        Err(e) => {
            warn!(collection = what, error = %e, "Skipping cross-reference");
            None
        }
    }
}

fn assemble(
    admin: CategoryResult,
    properties: CategoryResult,
    workflows: CategoryResult,
    forms: CategoryResult,
    reporting: CategoryResult,
    sales: CategoryResult,
) -> Result<AuditResults, AuditError> {
    let mut results = AuditResults {
        admin,
        properties,
        workflows,
        forms,
        reporting,
        sales,
        overall_score: 0.0,
        overall_grade: super::types::Grade::F,
        enrichment: None,
    };
    let overall = aggregate(results.categories())?;
    results.overall_score = overall.score;
    results.overall_grade = overall.grade;
    Ok(results)
}
