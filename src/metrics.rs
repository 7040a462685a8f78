//! Prometheus metrics registry

use prometheus::{Encoder, Gauge, Histogram, HistogramOpts, IntCounter, IntGauge, Registry, TextEncoder};

pub struct Metrics {
    registry: Registry,

    pub http_requests_total: IntCounter,
    pub http_requests_in_flight: IntGauge,
    pub http_request_duration_seconds: Histogram,

    pub cycles_total: IntCounter,
    pub evaluations_total: IntCounter,
    pub trades_executed_total: IntCounter,
    pub evaluation_errors_total: IntCounter,
    pub evaluation_duration_seconds: Histogram,
    pub confirmation_polls: Histogram,

    pub database_connected: Gauge,
}

impl Metrics {
    pub fn new() -> Result<Self, prometheus::Error> {
        let registry = Registry::new();

        let http_requests_total =
            IntCounter::new("http_requests_total", "Total HTTP requests served")?;
        let http_requests_in_flight =
            IntGauge::new("http_requests_in_flight", "HTTP requests currently in flight")?;
        let http_request_duration_seconds = Histogram::with_opts(HistogramOpts::new(
            "http_request_duration_seconds",
            "HTTP request latency",
        ))?;

        let cycles_total = IntCounter::new("cycles_total", "Evaluation cycles run")?;
        let evaluations_total =
            IntCounter::new("evaluations_total", "Individual strategy evaluations")?;
        let trades_executed_total =
            IntCounter::new("trades_executed_total", "Trades executed and confirmed")?;
        let evaluation_errors_total =
            IntCounter::new("evaluation_errors_total", "Evaluations that ended in ERROR")?;
        let evaluation_duration_seconds = Histogram::with_opts(HistogramOpts::new(
            "evaluation_duration_seconds",
            "Per-strategy evaluation latency",
        ))?;
        let confirmation_polls = Histogram::with_opts(
            HistogramOpts::new(
                "confirmation_polls",
                "Status polls needed before a broadcast resolved",
            )
            .buckets(vec![1.0, 2.0, 5.0, 10.0, 20.0, 30.0]),
        )?;

        let database_connected =
            Gauge::new("database_connected", "1 when the store connection is up")?;

        registry.register(Box::new(http_requests_total.clone()))?;
        registry.register(Box::new(http_requests_in_flight.clone()))?;
        registry.register(Box::new(http_request_duration_seconds.clone()))?;
        registry.register(Box::new(cycles_total.clone()))?;
        registry.register(Box::new(evaluations_total.clone()))?;
        registry.register(Box::new(trades_executed_total.clone()))?;
        registry.register(Box::new(evaluation_errors_total.clone()))?;
        registry.register(Box::new(evaluation_duration_seconds.clone()))?;
        registry.register(Box::new(confirmation_polls.clone()))?;
        registry.register(Box::new(database_connected.clone()))?;

        Ok(Self {
            registry,
            http_requests_total,
            http_requests_in_flight,
            http_request_duration_seconds,
            cycles_total,
            evaluations_total,
            trades_executed_total,
            evaluation_errors_total,
            evaluation_duration_seconds,
            confirmation_polls,
            database_connected,
        })
    }

    /// Export all metrics in the Prometheus text format.
    pub fn export(&self) -> Result<String, prometheus::Error> {
        let encoder = TextEncoder::new();
        let mut buffer = Vec::new();
        encoder.encode(&self.registry.gather(), &mut buffer)?;
        Ok(String::from_utf8(buffer).unwrap_or_default())
    }
}
