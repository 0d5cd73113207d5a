//! Prometheus metrics for the API service.
//!
//! [`ApiMetrics`] owns a dedicated [`Registry`] that the `/metrics`
//! endpoint encodes into the text exposition format.

use prometheus::{
    register_histogram_with_registry, register_int_counter_with_registry,
    register_int_gauge_with_registry, Encoder, Histogram, HistogramOpts, IntCounter, IntGauge,
    Opts, Registry, TextEncoder,
};

/// Central collection of API-level Prometheus metrics.
pub struct ApiMetrics {
    /// The Prometheus registry that owns every metric below.
    pub registry: Registry,

    // ── Counters ────────────────────────────────────────────────────────
    /// Verification requests that completed the pipeline.
    pub verifications_total: IntCounter,
    /// Verifications that ended Verified (including idempotent reuse).
    pub verifications_verified: IntCounter,
    /// Verifications that ended Rejected.
    pub verifications_rejected: IntCounter,
    /// Successful wallet-gated disclosures.
    pub disclosures_granted: IntCounter,
    /// Disclosure attempts refused (401/403/404).
    pub disclosures_refused: IntCounter,
    /// Successful logins.
    pub logins_total: IntCounter,

    // ── Gauges ──────────────────────────────────────────────────────────
    /// Registered users.
    pub user_count: IntGauge,

    // ── Histograms ──────────────────────────────────────────────────────
    /// End-to-end verification pipeline time, in milliseconds.
    pub verification_time_ms: Histogram,
}

impl ApiMetrics {
    /// Create a fresh set of metrics, all registered under a new
    /// [`Registry`].
    pub fn new() -> Self {
        let registry = Registry::new();

        let verifications_total = register_int_counter_with_registry!(
            Opts::new(
                "veridoc_verifications_total",
                "Verification requests that completed the pipeline"
            ),
            registry
        )
        .expect("failed to register verifications_total counter");

        let verifications_verified = register_int_counter_with_registry!(
            Opts::new(
                "veridoc_verifications_verified_total",
                "Verifications that ended Verified"
            ),
            registry
        )
        .expect("failed to register verifications_verified counter");

        let verifications_rejected = register_int_counter_with_registry!(
            Opts::new(
                "veridoc_verifications_rejected_total",
                "Verifications that ended Rejected"
            ),
            registry
        )
        .expect("failed to register verifications_rejected counter");

        let disclosures_granted = register_int_counter_with_registry!(
            Opts::new(
                "veridoc_disclosures_granted_total",
                "Wallet-gated disclosures granted"
            ),
            registry
        )
        .expect("failed to register disclosures_granted counter");

        let disclosures_refused = register_int_counter_with_registry!(
            Opts::new(
                "veridoc_disclosures_refused_total",
                "Disclosure attempts refused"
            ),
            registry
        )
        .expect("failed to register disclosures_refused counter");

        let logins_total = register_int_counter_with_registry!(
            Opts::new("veridoc_logins_total", "Successful logins"),
            registry
        )
        .expect("failed to register logins_total counter");

        let user_count = register_int_gauge_with_registry!(
            Opts::new("veridoc_user_count", "Registered users"),
            registry
        )
        .expect("failed to register user_count gauge");

        let verification_time_ms = register_histogram_with_registry!(
            HistogramOpts::new(
                "veridoc_verification_time_ms",
                "End-to-end verification pipeline time in milliseconds"
            )
            .buckets(prometheus::exponential_buckets(10.0, 2.0, 12).unwrap()),
            registry
        )
        .expect("failed to register verification_time_ms histogram");

        Self {
            registry,
            verifications_total,
            verifications_verified,
            verifications_rejected,
            disclosures_granted,
            disclosures_refused,
            logins_total,
            user_count,
            verification_time_ms,
        }
    }

    /// Encode the registry in the Prometheus text format.
    pub fn encode(&self) -> String {
        let encoder = TextEncoder::new();
        let mut buf = Vec::new();
        if encoder.encode(&self.registry.gather(), &mut buf).is_err() {
            return String::new();
        }
        String::from_utf8(buf).unwrap_or_default()
    }
}

impl Default for ApiMetrics {
    fn default() -> Self {
        Self::new()
    }
}
