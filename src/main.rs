//! Binary entry point — load notes, run the pipeline, persist results.

use std::process::ExitCode;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;

use tracing_subscriber::EnvFilter;

use notesieve::classify::HttpScoringClient;
use notesieve::config::{self, Settings};
use notesieve::pipeline::PatientPipeline;
use notesieve::scoring_service::ScoringService;
use notesieve::store::{self, ResultSink};

fn main() -> ExitCode {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(config::default_log_filter())),
        )
        .init();

    tracing::info!("Notesieve starting v{}", config::APP_VERSION);

    // Configuration errors are fatal before any patient is touched.
    let settings = match Settings::load() {
        Ok(settings) => settings,
        Err(e) => {
            tracing::error!(error = %e, "Invalid configuration");
            return ExitCode::FAILURE;
        }
    };
    if let Err(e) = settings.validate() {
        tracing::error!(error = %e, "Invalid configuration");
        return ExitCode::FAILURE;
    }

    let patients = match store::load_patients(&settings.data_dir) {
        Ok(patients) => patients,
        Err(e) => {
            tracing::error!(error = %e, "Failed to load patient notes");
            return ExitCode::FAILURE;
        }
    };
    if patients.is_empty() {
        tracing::warn!(
            data_dir = %settings.data_dir.display(),
            "No patient directories found — nothing to do"
        );
        return ExitCode::SUCCESS;
    }

    // The scoring model handle is built once and owned for the whole run.
    let client = Box::new(HttpScoringClient::new(
        &settings.scoring_url,
        settings.classification_timeout_ms,
    ));
    let service = Arc::new(ScoringService::new());

    let pipeline = match PatientPipeline::new(&settings, client, service) {
        Ok(pipeline) => pipeline,
        Err(e) => {
            tracing::error!(error = %e, "Invalid configuration");
            return ExitCode::FAILURE;
        }
    };

    let sink = ResultSink::new(&settings.results_dir);
    let stop = AtomicBool::new(false);

    let result = pipeline.run_batch(&patients, Some(&sink), &stop);

    if let Err(e) = sink.write_results(&result) {
        tracing::error!(error = %e, "Failed to write results file");
        return ExitCode::FAILURE;
    }

    tracing::info!(
        verdicts = result.verdict_count(),
        failures = result.failure_count(),
        results_dir = %sink.results_dir().display(),
        "Workflow complete"
    );

    ExitCode::SUCCESS
}
