use crate::audit::metrics::CategoryMetrics;
use crate::audit::record;
use crate::gateway::RawRecord;

pub fn extract_metrics(users: &[RawRecord], integrations: &[RawRecord]) -> CategoryMetrics {
    let super_admin_names: Vec<String> = users
        .iter()
        .filter(|user| record::flag(user, "superAdmin", false))
        .map(|user| record::text_or(user, &["email"], "Unknown"))
        .collect();

    let integration_names: Vec<String> = integrations
        .iter()
        .filter(|integration| record::flag(integration, "enabled", false))
        .map(|integration| record::text_or(integration, &["name"], "Unknown"))
        .collect();

    CategoryMetrics::builder()
        .count("total_users", users.len())
        .count("super_admins_count", super_admin_names.len())
        .count("active_integrations_count", integration_names.len())
        .labels("super_admin_names", super_admin_names)
        .labels("integration_names", integration_names)
        .build()
}
