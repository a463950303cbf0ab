//! Test: failed steps undo their partial work and keep the original error

use crate::helpers::*;
use wp_provision::core::stage::RollbackAction;
use wp_provision::execution::{PipelineEvent, RollbackResult, StepError};
use wp_provision::{ChannelError, DatabaseError, PipelineStage, SetupContext, Step};

fn provisioning_answers() -> Vec<&'static str> {
    CONFIGURE_ANSWERS
        .iter()
        .chain(CREATE_DATABASE_ANSWERS.iter())
        .copied()
        .collect()
}

fn rollback_results(events: &[PipelineEvent]) -> Vec<(RollbackAction, RollbackResult)> {
    events
        .iter()
        .filter_map(|event| match event {
            PipelineEvent::RollbackAction { action, result } => Some((*action, result.clone())),
            _ => None,
        })
        .collect()
}

#[tokio::test]
async fn test_grant_failure_drops_database_and_config() {
    let dir = workspace_dir();
    let channel = MockChannel::new(dir.path());
    let database = MockDatabase::with_faults(Faults {
        grant: true,
        ..Faults::default()
    });
    let harness = Harness::new(dir, channel, database, &provisioning_answers());
    let mut ctx = SetupContext::new();

    let err = harness.pipeline.run(&mut ctx).await.unwrap_err();

    assert_eq!(err.step, Step::GrantUser);
    assert!(matches!(err.source, StepError::Database(DatabaseError::Grant { .. })));
    assert_eq!(ctx.stage(), PipelineStage::DatabaseCreated);

    let statements = harness.database.statements();
    assert_eq!(statements.len(), 3);
    assert_eq!(statements[2], "DROP DATABASE `testsite`");
    assert_eq!(harness.database.connects(), 1, "rollback reuses the open session");
    assert!(!harness.config_exists());

    assert_eq!(
        rollback_results(&harness.events()),
        vec![
            (RollbackAction::DropDatabase, RollbackResult::Done),
            (RollbackAction::DeleteConfigFile, RollbackResult::Done),
        ]
    );
    assert!(!harness.channel.subcommands().contains(&"core install".to_string()));
}

#[tokio::test]
async fn test_failed_drop_keeps_grant_error() {
    let dir = workspace_dir();
    let channel = MockChannel::new(dir.path());
    let database = MockDatabase::with_faults(Faults {
        grant: true,
        drop: true,
        ..Faults::default()
    });
    let harness = Harness::new(dir, channel, database, &provisioning_answers());
    let mut ctx = SetupContext::new();

    let err = harness.pipeline.run(&mut ctx).await.unwrap_err();

    assert_eq!(err.step, Step::GrantUser);
    assert!(matches!(err.source, StepError::Database(DatabaseError::Grant { .. })));
    assert!(err.source.to_string().starts_with("failed to grant privileges"));

    // The config file is still removed after the drop fails
    assert!(!harness.config_exists());
    let results = rollback_results(&harness.events());
    assert!(matches!(
        results[0],
        (RollbackAction::DropDatabase, RollbackResult::Failed(_))
    ));
    assert_eq!(
        results[1],
        (RollbackAction::DeleteConfigFile, RollbackResult::Done)
    );
    assert!(harness
        .console
        .output()
        .iter()
        .any(|line| line.starts_with("Could not drop database")));
}

#[tokio::test]
async fn test_connect_failure_only_removes_config() {
    let dir = workspace_dir();
    let channel = MockChannel::new(dir.path());
    let database = MockDatabase::with_faults(Faults {
        connect: true,
        ..Faults::default()
    });
    let harness = Harness::new(dir, channel, database, &provisioning_answers());
    let mut ctx = SetupContext::new();

    let err = harness.pipeline.run(&mut ctx).await.unwrap_err();

    assert_eq!(err.step, Step::CreateDatabase);
    assert!(matches!(err.source, StepError::Database(DatabaseError::Connect { .. })));
    assert!(!ctx.database_created());
    assert!(harness.database.statements().is_empty());
    assert!(!harness.config_exists());
    assert_eq!(
        rollback_results(&harness.events()),
        vec![(RollbackAction::DeleteConfigFile, RollbackResult::Done)]
    );
}

#[tokio::test]
async fn test_create_failure_removes_config_without_drop() {
    let dir = workspace_dir();
    let channel = MockChannel::new(dir.path());
    let database = MockDatabase::with_faults(Faults {
        create: true,
        ..Faults::default()
    });
    let harness = Harness::new(dir, channel, database, &provisioning_answers());
    let mut ctx = SetupContext::new();

    let err = harness.pipeline.run(&mut ctx).await.unwrap_err();

    assert_eq!(err.step, Step::CreateDatabase);
    assert!(matches!(err.source, StepError::Database(DatabaseError::Create { .. })));
    assert_eq!(harness.database.statements().len(), 1);
    assert!(!harness.config_exists());
}

#[tokio::test]
async fn test_configure_failure_removes_partial_config() {
    let dir = workspace_dir();
    let channel = MockChannel::new(dir.path()).failing_on("core config");
    let harness = Harness::new(dir, channel, MockDatabase::new(), &CONFIGURE_ANSWERS);
    let mut ctx = SetupContext::new();

    let err = harness.pipeline.run(&mut ctx).await.unwrap_err();

    assert_eq!(err.step, Step::Configure);
    assert!(matches!(
        err.source,
        StepError::Channel(ChannelError::CommandFailed { status: 1, .. })
    ));
    assert!(!harness.config_exists());
    assert_eq!(harness.database.connects(), 0);
    assert!(harness
        .events()
        .contains(&PipelineEvent::RollbackStarted(Step::Configure)));
}

#[tokio::test]
async fn test_missing_config_is_not_a_rollback_failure() {
    let dir = workspace_dir();
    let channel = MockChannel::new(dir.path())
        .failing_on("core config")
        .without_config_file();
    let harness = Harness::new(dir, channel, MockDatabase::new(), &CONFIGURE_ANSWERS);
    let mut ctx = SetupContext::new();

    harness.pipeline.run(&mut ctx).await.unwrap_err();

    assert!(matches!(
        rollback_results(&harness.events())[..],
        [(RollbackAction::DeleteConfigFile, RollbackResult::Skipped(_))]
    ));
    assert!(harness.console.output().is_empty());
}

#[tokio::test]
async fn test_download_failure_is_not_rolled_back() {
    let dir = workspace_dir();
    let channel = MockChannel::new(dir.path()).failing_on("core download");
    let harness = Harness::new(dir, channel, MockDatabase::new(), &[]);
    let mut ctx = SetupContext::new();

    let err = harness.pipeline.run(&mut ctx).await.unwrap_err();

    assert_eq!(err.step, Step::Download);
    assert_eq!(err.to_string(), "download step failed");
    assert_eq!(ctx.stage(), PipelineStage::NotStarted);
    assert!(harness.console.prompts().is_empty());
    assert!(!harness
        .events()
        .iter()
        .any(|e| matches!(e, PipelineEvent::RollbackStarted(_))));
}

#[tokio::test]
async fn test_install_failure_keeps_config_and_database() {
    let dir = workspace_dir();
    let channel = MockChannel::new(dir.path()).failing_on("core install");
    let harness = Harness::new(dir, channel, MockDatabase::new(), &full_run_answers());
    let mut ctx = SetupContext::new();

    let err = harness.pipeline.run(&mut ctx).await.unwrap_err();

    assert_eq!(err.step, Step::Install);
    assert_eq!(ctx.stage(), PipelineStage::UserGranted);
    assert!(harness.config_exists());
    assert!(!harness
        .database
        .statements()
        .iter()
        .any(|s| s.starts_with("DROP")));
    assert!(rollback_results(&harness.events()).is_empty());
}
