//! Setup context - state threaded through every stage of a run

use crate::core::{
    answers::ConfigurationAnswers,
    stage::{PipelineStage, StageError, Step},
};
use chrono::{DateTime, Utc};

/// How a step ended
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StepOutcome {
    Completed,
    Skipped { reason: String },
    Failed { error: String },
}

/// Timing and outcome of one step
#[derive(Debug, Clone)]
pub struct StepRecord {
    pub step: Step,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    pub outcome: StepOutcome,
}

impl StepRecord {
    pub fn duration(&self) -> std::time::Duration {
        self.finished_at
            .signed_duration_since(self.started_at)
            .to_std()
            .unwrap_or_default()
    }
}

/// Execution context for a single setup run
#[derive(Debug, Clone)]
pub struct SetupContext {
    /// Answers collected so far
    pub answers: ConfigurationAnswers,

    stage: PipelineStage,

    /// Set once this run has created the target database
    database_created: bool,

    records: Vec<StepRecord>,
}

impl SetupContext {
    pub fn new() -> Self {
        Self::with_answers(ConfigurationAnswers::new())
    }

    /// Context seeded with answers, e.g. to run a stage in isolation
    pub fn with_answers(answers: ConfigurationAnswers) -> Self {
        Self {
            answers,
            stage: PipelineStage::NotStarted,
            database_created: false,
            records: Vec::new(),
        }
    }

    pub fn stage(&self) -> PipelineStage {
        self.stage
    }

    /// Advance to a later stage
    pub fn advance(&mut self, next: PipelineStage) -> Result<(), StageError> {
        self.stage = self.stage.advance_to(next)?;
        if next == PipelineStage::DatabaseCreated {
            self.database_created = true;
        }
        Ok(())
    }

    /// Whether the target database was created during this run
    pub fn database_created(&self) -> bool {
        self.database_created
    }

    /// Name of the target database, as last recorded in the answers
    pub fn database_name(&self) -> Option<&str> {
        self.answers.get("dbname")
    }

    pub fn record(&mut self, step: Step, started_at: DateTime<Utc>, outcome: StepOutcome) {
        self.records.push(StepRecord {
            step,
            started_at,
            finished_at: Utc::now(),
            outcome,
        });
    }

    pub fn records(&self) -> &[StepRecord] {
        &self.records
    }
}

impl Default for SetupContext {
    fn default() -> Self {
        Self::new()
    }
}
