//! Upload Submitter: validates one selected document locally and sends it to
//! the analysis backend.

pub mod submitter;
pub mod task;

pub use submitter::{UploadAck, UploadError, UploadSubmitter};
pub use task::{is_pdf_content_type, UploadFile, UploadState, UploadTask};

pub const PDF_CONTENT_TYPE: &str = "application/pdf";

/// Default client-side size ceiling (10 MiB).
pub const DEFAULT_MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;
