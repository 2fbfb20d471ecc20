mod bootstrap;

use anyhow::Result;
use churn_core::formatting::format_preview;
use churn_core::settings::Settings;
use churn_runtime::ChurnPipeline;

fn main() -> Result<()> {
    let settings = Settings::load();

    bootstrap::setup_logging(&settings.log_level)?;

    tracing::info!("Churn analyzer v{} starting", env!("CARGO_PKG_VERSION"));

    let pipeline = ChurnPipeline::new(settings.pipeline_config());
    let state = match pipeline.run() {
        Ok(state) => state,
        Err(err) => {
            tracing::error!(kind = ?err.kind(), "Pipeline failed: {}", err);
            return Err(err.into());
        }
    };

    if settings.head > 0 {
        tracing::info!(
            "First {} rows of the cleaned data:\n{}",
            settings.head,
            format_preview(&state.table.head(settings.head))
        );
    }

    tracing::info!(
        "Report ready at {}",
        pipeline.config().output_html.display()
    );
    Ok(())
}
