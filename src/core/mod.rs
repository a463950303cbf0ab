//! Core domain models for provisioning
//!
//! Answers, validation rules, option rendering, stages and the context
//! threaded through a run.

pub mod answers;
pub mod config;
pub mod context;
pub mod options;
pub mod stage;
pub mod validator;

pub use answers::{AnswersError, ConfigurationAnswers};
pub use config::{PromptDefaults, ProvisionConfig};
pub use context::{SetupContext, StepOutcome, StepRecord};
pub use options::OptionSet;
pub use stage::{PipelineStage, RollbackAction, StageError, Step};
pub use validator::{Rule, RuleSet, ValidationError};
