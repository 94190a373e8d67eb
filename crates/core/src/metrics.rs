//! Prometheus metrics for core components.
//!
//! This module provides metrics for:
//! - Pipeline (operations, stage transitions, cleanup)
//! - Adapter calls (downloads, translation, synthesis, composition)
//! - Credential pools (selections, pool sizes)

use once_cell::sync::Lazy;
use prometheus::{HistogramOpts, HistogramVec, IntCounter, IntCounterVec, IntGaugeVec, Opts};

// =============================================================================
// Pipeline Metrics
// =============================================================================

/// Pipeline operations total by operation and outcome.
pub static PIPELINE_OPERATIONS: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new(
            "overdub_pipeline_operations_total",
            "Total pipeline operations",
        ),
        // outcome: "success", "validation_error", "no_credential", "busy", "adapter_error"
        &["operation", "outcome"],
    )
    .unwrap()
});

/// Stage transitions total by destination stage and trigger.
pub static STAGE_TRANSITIONS: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new(
            "overdub_stage_transitions_total",
            "Total pipeline stage transitions",
        ),
        &["to", "trigger"], // trigger: "auto", "manual"
    )
    .unwrap()
});

/// Auto-transitions suppressed because the stage changed before the timer fired.
pub static AUTO_TRANSITIONS_SUPPRESSED: Lazy<IntCounter> = Lazy::new(|| {
    IntCounter::new(
        "overdub_auto_transitions_suppressed_total",
        "Total scheduled stage transitions suppressed by manual navigation",
    )
    .unwrap()
});

/// Files deleted by cleanup.
pub static CLEANUP_FILES_DELETED: Lazy<IntCounter> = Lazy::new(|| {
    IntCounter::new(
        "overdub_cleanup_files_deleted_total",
        "Total intermediate files deleted by cleanup",
    )
    .unwrap()
});

/// Per-file cleanup errors.
pub static CLEANUP_FILE_ERRORS: Lazy<IntCounter> = Lazy::new(|| {
    IntCounter::new(
        "overdub_cleanup_file_errors_total",
        "Total per-file errors reported by cleanup",
    )
    .unwrap()
});

// =============================================================================
// Adapter Metrics
// =============================================================================

/// Adapter call duration in seconds.
pub static ADAPTER_DURATION: Lazy<HistogramVec> = Lazy::new(|| {
    HistogramVec::new(
        HistogramOpts::new(
            "overdub_adapter_duration_seconds",
            "Duration of external adapter calls",
        )
        .buckets(vec![
            0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0, 30.0, 60.0, 120.0,
        ]),
        &["service"], // "download", "translate", "synthesize", "compose", "cleanup"
    )
    .unwrap()
});

/// Adapter requests total.
pub static ADAPTER_REQUESTS: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new(
            "overdub_adapter_requests_total",
            "Total external adapter requests",
        ),
        &["service", "status"], // status: "success", "error"
    )
    .unwrap()
});

// =============================================================================
// Credential Pool Metrics
// =============================================================================

/// Credential selections total by provider and outcome.
pub static CREDENTIAL_SELECTIONS: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new(
            "overdub_credential_selections_total",
            "Total credential selection attempts",
        ),
        &["provider", "outcome"], // outcome: "selected", "none"
    )
    .unwrap()
});

/// Current pool size by provider.
pub static CREDENTIAL_POOL_SIZE: Lazy<IntGaugeVec> = Lazy::new(|| {
    IntGaugeVec::new(
        Opts::new(
            "overdub_credential_pool_size",
            "Number of credentials in each pool",
        ),
        &["provider"],
    )
    .unwrap()
});

// =============================================================================
// Helper functions
// =============================================================================

/// Get all core metrics for registration in a registry.
pub fn all_metrics() -> Vec<Box<dyn prometheus::core::Collector>> {
    vec![
        // Pipeline
        Box::new(PIPELINE_OPERATIONS.clone()),
        Box::new(STAGE_TRANSITIONS.clone()),
        Box::new(AUTO_TRANSITIONS_SUPPRESSED.clone()),
        Box::new(CLEANUP_FILES_DELETED.clone()),
        Box::new(CLEANUP_FILE_ERRORS.clone()),
        // Adapters
        Box::new(ADAPTER_DURATION.clone()),
        Box::new(ADAPTER_REQUESTS.clone()),
        // Credential pools
        Box::new(CREDENTIAL_SELECTIONS.clone()),
        Box::new(CREDENTIAL_POOL_SIZE.clone()),
    ]
}
