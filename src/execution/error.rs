//! Pipeline errors

use crate::console::PromptError;
use crate::core::{answers::AnswersError, stage::StageError, stage::Step};
use crate::database::DatabaseError;
use crate::wpcli::ChannelError;
use thiserror::Error;

/// Why a single step failed
#[derive(Debug, Error)]
pub enum StepError {
    #[error(transparent)]
    Channel(#[from] ChannelError),

    #[error(transparent)]
    Database(#[from] DatabaseError),

    #[error(transparent)]
    Prompt(#[from] PromptError),

    #[error(transparent)]
    Answers(#[from] AnswersError),

    #[error(transparent)]
    Stage(#[from] StageError),

    #[error("missing answer '{0}'")]
    MissingAnswer(&'static str),

    #[error("no database connection is open")]
    NotConnected,
}

/// A run that ended in failure, after any rollback completed
#[derive(Debug, Error)]
#[error("{step} step failed")]
pub struct PipelineError {
    pub step: Step,
    #[source]
    pub source: StepError,
}

impl PipelineError {
    pub fn new(step: Step, source: impl Into<StepError>) -> Self {
        Self {
            step,
            source: source.into(),
        }
    }
}
