//! Artifact publishing for Kickstartr templates.
//!
//! A publish is three strictly ordered remote calls: obtain a signed upload
//! grant, PUT the archive to storage, then create the template (or version)
//! record. The record is never created unless the upload succeeded. Nothing is
//! retried and no grant is reused; a failed publish starts over from the grant.

pub mod coordinator;
pub mod error;
pub mod mock;
pub mod progress;
pub mod state;
pub mod transport;

pub use coordinator::{PublishInput, PublishedArtifact, Publisher};
pub use error::PublishError;
pub use mock::MockTransport;
pub use progress::{ProgressSink, ProgressTracker};
pub use state::{PublishObserver, PublishState, PublishStep};
pub use transport::{ArtifactTransport, RecordMetadata};
