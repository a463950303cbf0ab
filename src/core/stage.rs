//! Pipeline stages, steps and the rollback table

use std::fmt;
use thiserror::Error;

/// How far a setup run has progressed
///
/// Ordered: a run only ever moves to a later stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum PipelineStage {
    NotStarted,
    Downloaded,
    Configured,
    DatabaseCreated,
    UserGranted,
    Installed,
}

impl PipelineStage {
    /// Move forward to `next`
    pub fn advance_to(self, next: PipelineStage) -> Result<PipelineStage, StageError> {
        if next <= self {
            return Err(StageError::Backward {
                from: self,
                to: next,
            });
        }
        Ok(next)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StageError {
    #[error("cannot move from stage {from:?} to {to:?}")]
    Backward {
        from: PipelineStage,
        to: PipelineStage,
    },
}

/// Undo action applied after a failed step
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RollbackAction {
    DropDatabase,
    DeleteConfigFile,
}

impl fmt::Display for RollbackAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RollbackAction::DropDatabase => write!(f, "drop database"),
            RollbackAction::DeleteConfigFile => write!(f, "delete configuration file"),
        }
    }
}

/// A unit of work in the setup pipeline
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Step {
    Check,
    Download,
    Configure,
    CreateDatabase,
    GrantUser,
    Install,
}

impl Step {
    /// Steps in execution order
    pub const ALL: [Step; 6] = [
        Step::Check,
        Step::Download,
        Step::Configure,
        Step::CreateDatabase,
        Step::GrantUser,
        Step::Install,
    ];

    /// Actions undoing the partial effects of this step, in order
    pub fn rollback_plan(self) -> &'static [RollbackAction] {
        match self {
            Step::Configure | Step::CreateDatabase => &[RollbackAction::DeleteConfigFile],
            Step::GrantUser => &[RollbackAction::DropDatabase, RollbackAction::DeleteConfigFile],
            Step::Check | Step::Download | Step::Install => &[],
        }
    }

    /// Stage reached when this step completes
    pub fn reached_stage(self) -> Option<PipelineStage> {
        match self {
            Step::Check => None,
            Step::Download => Some(PipelineStage::Downloaded),
            Step::Configure => Some(PipelineStage::Configured),
            Step::CreateDatabase => Some(PipelineStage::DatabaseCreated),
            Step::GrantUser => Some(PipelineStage::UserGranted),
            Step::Install => Some(PipelineStage::Installed),
        }
    }

    /// Operator-facing title
    pub fn title(self) -> &'static str {
        match self {
            Step::Check => "Check installation",
            Step::Download => "Download WordPress",
            Step::Configure => "Configure WordPress",
            Step::CreateDatabase => "Create Database",
            Step::GrantUser => "Create Database User",
            Step::Install => "Install WordPress",
        }
    }
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Step::Check => "check",
            Step::Download => "download",
            Step::Configure => "configure",
            Step::CreateDatabase => "create-database",
            Step::GrantUser => "grant-user",
            Step::Install => "install",
        };
        f.write_str(name)
    }
}
