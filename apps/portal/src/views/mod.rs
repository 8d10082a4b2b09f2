//! View controllers. Each view exclusively owns its `UploadTask` or
//! `FetchSession`, and every error is turned into view state here.

pub mod report;
pub mod upload;

pub use report::{ReportView, ViewState};
pub use upload::UploadView;

/// Where the client should be after an action completes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    Upload,
    Result,
}
