//! CLI output formatting

use crate::{
    core::{
        context::{StepOutcome, StepRecord},
        stage::Step,
    },
    execution::{Outcome, PipelineEvent, RollbackResult},
};
use console::Emoji;

// Re-export style
pub use console::style;

// Emojis for output
pub static CHECK: Emoji<'_, '_> = Emoji("✅ ", "✓ ");
pub static CROSS: Emoji<'_, '_> = Emoji("❌ ", "✗ ");
pub static INFO: Emoji<'_, '_> = Emoji("ℹ️  ", "i ");
pub static WARN: Emoji<'_, '_> = Emoji("⚠️  ", "! ");
pub static SKIP: Emoji<'_, '_> = Emoji("⏭️  ", "- ");
pub static UNDO: Emoji<'_, '_> = Emoji("↩️  ", "< ");
pub static ROCKET: Emoji<'_, '_> = Emoji("🚀 ", "> ");

/// Step header, e.g. `[2/6] Download WordPress`
pub fn format_step_header(step: Step) -> String {
    let position = Step::ALL.iter().position(|s| *s == step).unwrap_or(0) + 1;
    format!(
        "{} {}",
        style(format!("[{}/{}]", position, Step::ALL.len())).dim(),
        style(step.title()).bold().cyan()
    )
}

/// Format a pipeline event for display
pub fn format_pipeline_event(event: &PipelineEvent) -> String {
    match event {
        PipelineEvent::StageStarted(step) => format!("\n{}", format_step_header(*step)),
        PipelineEvent::StageSkipped { step, reason } => format!(
            "{} {} skipped ({})",
            SKIP,
            style(step.title()).dim(),
            style(reason).dim()
        ),
        PipelineEvent::StageCompleted { step, stage } => match stage {
            Some(stage) => format!(
                "{} {} {}",
                CHECK,
                style(step.title()).green(),
                style(format!("({:?})", stage)).dim()
            ),
            None => format!("{} {}", CHECK, style(step.title()).green()),
        },
        PipelineEvent::StageFailed { step, error } => {
            format!("{} {}: {}", CROSS, style(step.title()).red(), style(error).dim())
        }
        PipelineEvent::RollbackStarted(step) => format!(
            "{} Rolling back {}",
            WARN,
            style(step.title()).yellow()
        ),
        PipelineEvent::RollbackAction { action, result } => match result {
            RollbackResult::Done => format!("{} {}", UNDO, style(action).yellow()),
            RollbackResult::Skipped(reason) => format!(
                "{} {} skipped ({})",
                SKIP,
                style(action).dim(),
                style(reason).dim()
            ),
            RollbackResult::Failed(reason) => format!(
                "{} {} failed: {}",
                CROSS,
                style(action).red(),
                style(reason).dim()
            ),
        },
        PipelineEvent::PipelineCompleted(outcome) => match outcome {
            Outcome::AlreadyInstalled => format!("{} WordPress is already installed", INFO),
            Outcome::Installed => format!(
                "\n{} WordPress installed {}",
                ROCKET,
                style("successfully").green()
            ),
        },
    }
}

/// One summary line per recorded step
pub fn format_step_record(record: &StepRecord) -> String {
    let (icon, outcome) = match &record.outcome {
        StepOutcome::Completed => (CHECK, style("completed".to_string()).green()),
        StepOutcome::Skipped { reason } => (SKIP, style(format!("skipped: {}", reason)).dim()),
        StepOutcome::Failed { error } => (CROSS, style(format!("failed: {}", error)).red()),
    };
    format!(
        "  {}{:<22} {} {}",
        icon,
        record.step.title(),
        style(format_duration(record.duration())).dim(),
        outcome
    )
}

pub fn format_duration(duration: std::time::Duration) -> String {
    let secs = duration.as_secs();
    if secs < 60 {
        format!("{}s", secs)
    } else if secs < 3600 {
        format!("{}m {}s", secs / 60, secs % 60)
    } else {
        format!("{}h {}m {}s", secs / 3600, (secs % 3600) / 60, secs % 60)
    }
}
