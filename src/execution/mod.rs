//! Pipeline execution - stage functions, orchestration and rollback

pub mod engine;
pub mod error;
pub mod steps;
pub mod workspace;

pub use engine::{EventHandler, Outcome, PipelineEvent, RollbackResult, SetupPipeline};
pub use error::{PipelineError, StepError};
pub use workspace::{Workspace, WorkspaceError};
