use crate::core::Pipeline;
use crate::domain::model::RunReport;
use crate::utils::error::Result;
use crate::utils::monitor::{ProcessMonitor, RunPhase};

pub struct EtlEngine<P: Pipeline> {
    pipeline: P,
    monitor: ProcessMonitor,
}

impl<P: Pipeline> EtlEngine<P> {
    pub fn new(pipeline: P) -> Self {
        Self::new_with_monitoring(pipeline, false)
    }

    pub fn new_with_monitoring(pipeline: P, monitor_enabled: bool) -> Self {
        Self {
            pipeline,
            monitor: ProcessMonitor::new(monitor_enabled),
        }
    }

    pub fn pipeline(&self) -> &P {
        &self.pipeline
    }

    pub async fn run(&self) -> Result<RunReport> {
        tracing::info!("Starting pipeline run");

        let raw_records = self.pipeline.extract().await?;
        tracing::info!(records = raw_records.len(), "Extracted raw records");
        self.monitor.log_phase(RunPhase::Fetch);

        let transformed = self.pipeline.transform(raw_records).await?;
        self.monitor.log_phase(RunPhase::Score);

        let report = self.pipeline.load(transformed).await?;
        self.monitor.log_phase(RunPhase::Persist);
        self.monitor.log_final();

        if report.degraded > 0 {
            tracing::warn!(
                degraded = report.degraded,
                "Run completed with articles scored by the default fallback"
            );
        }
        tracing::info!(
            fetched = report.fetched,
            skipped = report.skipped,
            sampled = report.sampled_ids.len(),
            "Pipeline run finished"
        );

        Ok(report)
    }
}
