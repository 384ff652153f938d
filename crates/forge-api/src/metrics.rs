//! Prometheus counters served on `/metrics`.
use forge_core::Severity;
use forge_quality::PipelineReport;
use prometheus::{Encoder, IntCounter, IntCounterVec, Opts, Registry, TextEncoder};

pub struct ApiMetrics {
    registry: Registry,
    pub pipeline_runs: IntCounter,
    pub diagnostics: IntCounterVec,
    pub exports_blocked: IntCounter,
}

impl ApiMetrics {
    pub fn new() -> Result<Self, prometheus::Error> {
        let registry = Registry::new();

        let pipeline_runs = IntCounter::new("forge_pipeline_runs_total", "Validation pipeline runs")?;
        let diagnostics = IntCounterVec::new(
            Opts::new("forge_diagnostics_total", "Diagnostics emitted by severity"),
            &["severity"],
        )?;
        let exports_blocked = IntCounter::new("forge_exports_blocked_total", "Exports refused by the gate")?;

        registry.register(Box::new(pipeline_runs.clone()))?;
        registry.register(Box::new(diagnostics.clone()))?;
        registry.register(Box::new(exports_blocked.clone()))?;

        Ok(Self {
            registry,
            pipeline_runs,
            diagnostics,
            exports_blocked,
        })
    }

    pub fn record_report(&self, report: &PipelineReport) {
        self.pipeline_runs.inc();
        for diagnostic in report.all_diagnostics() {
            let label = match diagnostic.severity {
                Severity::Error => "error",
                Severity::Warning => "warning",
            };
            self.diagnostics.with_label_values(&[label]).inc();
        }
    }

    pub fn encode(&self) -> Result<String, prometheus::Error> {
        let encoder = TextEncoder::new();
        let mut buffer = Vec::new();
        encoder.encode(&self.registry.gather(), &mut buffer)?;
        Ok(String::from_utf8_lossy(&buffer).to_string())
    }
}
