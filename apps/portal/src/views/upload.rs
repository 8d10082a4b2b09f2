use crate::upload::{UploadAck, UploadError, UploadFile, UploadState, UploadSubmitter, UploadTask};
use crate::views::Route;

/// Upload screen: holds the task for the currently selected file.
pub struct UploadView {
    submitter: UploadSubmitter,
    task: Option<UploadTask>,
}

impl UploadView {
    pub fn new(submitter: UploadSubmitter) -> Self {
        Self {
            submitter,
            task: None,
        }
    }

    /// Selecting a file always starts a fresh task.
    pub fn select(&mut self, file: UploadFile) {
        self.task = Some(UploadTask::new(file));
    }

    pub fn task(&self) -> Option<&UploadTask> {
        self.task.as_ref()
    }

    pub fn can_submit(&self) -> bool {
        self.task.as_ref().is_some_and(UploadTask::can_submit)
    }

    pub async fn submit(&mut self) -> Result<UploadAck, UploadError> {
        let task = self.task.as_mut().ok_or(UploadError::NoFileSelected)?;
        self.submitter.submit(task).await
    }

    /// Manual retry after a failure: same file, fresh task.
    pub fn retry(&mut self) {
        if let Some(task) = &self.task {
            if task.state() == UploadState::Failed {
                self.task = Some(task.retry());
            }
        }
    }

    pub fn route(&self) -> Route {
        match self.task.as_ref().map(UploadTask::state) {
            Some(UploadState::Succeeded) => Route::Result,
            _ => Route::Upload,
        }
    }
}
