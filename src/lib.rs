// hubspot-audit library - HubSpot portal audit scoring
// This exposes the engine, gateways and CLI for the binary and for tests

pub mod audit;
pub mod cli;
pub mod config;
pub mod database;
pub mod gateway;
pub mod observability;
pub mod telemetry;

// Re-export key types for easy access
pub use audit::{
    AuditEngine, AuditError, AuditResults, Category, CategoryResult, CategoryStatus, Grade,
    Scorer, ScoringThresholds,
};
pub use config::{config, init_config, AuditConfig};
pub use gateway::{AuditGateway, GatewayError, HubSpotClient, RawRecord, SnapshotGateway};
pub use observability::{gateway_metrics, GatewayApiMetrics, OperationTimer};
pub use telemetry::{create_audit_span, generate_run_id, init_telemetry};
