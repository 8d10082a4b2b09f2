//! CLI entry points. Each command plays the role of one client view and
//! reports errors as messages, never panics.

use std::net::SocketAddr;
use std::path::Path;
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{info, warn};

use crate::backend::{AnalysisBackend, HttpBackend};
use crate::config::Config;
use crate::fetch::{download_artifact, ResultFetcher};
use crate::routes::build_router;
use crate::state::AppState;
use crate::upload::{UploadAck, UploadError, UploadFile, UploadSubmitter};
use crate::views::{ReportView, Route, UploadView, ViewState};

pub async fn serve(config: Config) -> Result<()> {
    info!("Starting RFP portal backend v{}", env!("CARGO_PKG_VERSION"));

    let state = AppState::from_config(&config);
    tokio::fs::create_dir_all(&state.data_dir)
        .await
        .with_context(|| format!("Failed to create data dir {}", state.data_dir.display()))?;
    info!("Storing documents in {}", state.data_dir.display());

    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

pub async fn analyze(
    config: &Config,
    file: &Path,
    no_wait: bool,
    upload_retries: u32,
) -> Result<()> {
    let backend = http_backend(config);
    let mut upload_view = UploadView::new(UploadSubmitter::new(
        backend.clone(),
        config.max_upload_bytes,
    ));

    upload_view.select(UploadFile::from_path(file).await?);
    let ack = submit_with_retries(&mut upload_view, upload_retries).await?;
    println!("{}", ack.message);

    if no_wait || upload_view.route() != Route::Result {
        return Ok(());
    }
    show_report(config, backend, false, 0).await
}

/// Submits the selected file, resubmitting up to `retries` times after a
/// network failure. Validation and server rejections are not retried.
async fn submit_with_retries(
    view: &mut UploadView,
    retries: u32,
) -> Result<UploadAck, UploadError> {
    let mut outcome = view.submit().await;
    for _ in 0..retries {
        if !matches!(outcome, Err(UploadError::Transport(_))) {
            break;
        }
        if let Some(message) = view.task().and_then(|t| t.error_message()) {
            warn!("{message}; submitting the file again");
        }
        view.retry();
        outcome = view.submit().await;
    }
    outcome
}

pub async fn report(config: &Config, json: bool, retries: u32) -> Result<()> {
    show_report(config, http_backend(config), json, retries).await
}

pub async fn download_report(config: &Config, out: &Path) -> Result<()> {
    let backend = http_backend(config);
    let pdf = download_artifact(backend.as_ref()).await?;
    tokio::fs::write(out, &pdf)
        .await
        .with_context(|| format!("Failed to write {}", out.display()))?;
    println!("Saved report PDF to {} ({} bytes)", out.display(), pdf.len());
    Ok(())
}

fn http_backend(config: &Config) -> Arc<dyn AnalysisBackend> {
    Arc::new(HttpBackend::new(config))
}

/// Polls for the report and prints it. `retries` is how many fresh sessions
/// to start after the first one times out.
async fn show_report(
    config: &Config,
    backend: Arc<dyn AnalysisBackend>,
    json: bool,
    retries: u32,
) -> Result<()> {
    let policy = config.retry_policy();
    let mut view = ReportView::new(ResultFetcher::new(backend, policy));
    info!(
        session = %view.session().id(),
        "Waiting for compliance report (up to {} attempts, {}s apart)",
        policy.max_attempts,
        policy.backoff.as_secs()
    );

    let teardown = view.teardown_handle();
    let interrupt = tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            teardown.cancel();
        }
    });

    let mut state = view.load().await;
    for _ in 0..retries {
        match &state {
            ViewState::Error {
                can_retry: true,
                message,
            } => {
                warn!("{message}; starting a new fetch session");
                state = view.retry().await;
            }
            _ => break,
        }
    }
    interrupt.abort();

    print_outcome(state, json)
}

fn print_outcome(state: ViewState, json: bool) -> Result<()> {
    match state {
        ViewState::Loaded(dashboard) if json => {
            println!("{}", serde_json::to_string_pretty(&dashboard)?);
            Ok(())
        }
        ViewState::Loaded(dashboard) => {
            print!("{dashboard}");
            Ok(())
        }
        ViewState::Error { message, can_retry } => {
            if can_retry {
                bail!("{message}\nRun `rfp-portal report` to try again.");
            }
            bail!("{message}")
        }
        ViewState::Cancelled => bail!("Cancelled"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::mock::{self, MockBackend};
    use crate::upload::PDF_CONTENT_TYPE;

    fn upload_view(backend: &Arc<MockBackend>) -> UploadView {
        let mut view = UploadView::new(UploadSubmitter::new(backend.clone(), 1024));
        view.select(UploadFile::new("tender.pdf", PDF_CONTENT_TYPE, vec![1u8; 8]));
        view
    }

    #[tokio::test]
    async fn test_upload_resubmitted_after_network_failure() {
        let backend = Arc::new(
            MockBackend::new().with_uploads([mock::offline(), mock::json(200, "{}")]),
        );
        let mut view = upload_view(&backend);

        submit_with_retries(&mut view, 2).await.unwrap();

        assert_eq!(view.route(), Route::Result);
        assert_eq!(backend.upload_calls(), 2);
    }

    #[tokio::test]
    async fn test_server_rejection_is_not_resubmitted() {
        let backend = Arc::new(MockBackend::new().with_uploads([
            mock::json(400, r#"{"error": "No file part"}"#),
            mock::json(200, "{}"),
        ]));
        let mut view = upload_view(&backend);

        let err = submit_with_retries(&mut view, 3).await.unwrap_err();

        assert!(matches!(err, UploadError::ServerRejected(_)));
        assert_eq!(backend.upload_calls(), 1);
    }

    #[tokio::test]
    async fn test_upload_gives_up_after_retries() {
        let backend = Arc::new(
            MockBackend::new().with_uploads([mock::offline(), mock::offline(), mock::offline()]),
        );
        let mut view = upload_view(&backend);

        let err = submit_with_retries(&mut view, 1).await.unwrap_err();

        assert!(matches!(err, UploadError::Transport(_)));
        assert_eq!(backend.upload_calls(), 2);
        assert_eq!(view.route(), Route::Upload);
    }

    #[test]
    fn test_cancelled_view_is_an_error() {
        let err = print_outcome(ViewState::Cancelled, false).unwrap_err();
        assert_eq!(err.to_string(), "Cancelled");
    }

    #[test]
    fn test_timeout_error_suggests_retry() {
        let state = ViewState::Error {
            message: "Timed out".to_string(),
            can_retry: true,
        };
        let err = print_outcome(state, false).unwrap_err();
        assert!(err.to_string().contains("try again"));
    }
}
