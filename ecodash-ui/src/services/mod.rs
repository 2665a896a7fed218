//! Service layer: uploader, assessment client, result poller, session
//! tracking, and request deduplication.

pub mod assessment_client;
pub mod poller;
pub mod session;
pub mod single_flight;
pub mod uploader;

pub use assessment_client::AssessmentClient;
pub use poller::{PollOutcome, PollerConfig};
pub use session::{SessionTracker, UploadRecord, UploadStatus};
pub use single_flight::SingleFlight;
pub use uploader::{UploadError, Uploader};
