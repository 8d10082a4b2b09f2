//! Result Fetcher: polls the analysis-result endpoint until a compliance
//! report is available, a terminal error occurs, or the attempt ceiling is
//! reached.

pub mod artifact;
pub mod fetcher;
pub mod session;

pub use artifact::{download_artifact, ArtifactError};
pub use fetcher::{FetchError, ResultFetcher, RetryPolicy, TransientCause};
pub use session::{CancelToken, FetchSession, FetchState};
