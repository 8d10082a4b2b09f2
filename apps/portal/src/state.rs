use std::path::PathBuf;

use crate::config::Config;

/// File name the uploaded RFP is stored under.
pub const STORED_PDF_NAME: &str = "relevant_tenders_report.pdf";
/// File the analysis pipeline writes its result to.
pub const CHECKLIST_OUTPUT_NAME: &str = "checklist_output.json";

/// Shared state injected into the dev backend's route handlers.
#[derive(Clone)]
pub struct AppState {
    pub data_dir: PathBuf,
    pub max_upload_bytes: usize,
}

impl AppState {
    pub fn from_config(config: &Config) -> Self {
        Self {
            data_dir: config.data_dir.clone(),
            max_upload_bytes: config.max_upload_bytes,
        }
    }

    pub fn stored_pdf_path(&self) -> PathBuf {
        self.data_dir.join(STORED_PDF_NAME)
    }

    pub fn checklist_output_path(&self) -> PathBuf {
        self.data_dir.join(CHECKLIST_OUTPUT_NAME)
    }
}
