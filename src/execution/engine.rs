//! Setup pipeline - runs the steps in order and rolls back on failure

use crate::{
    console::Console,
    core::{
        config::{PromptDefaults, ProvisionConfig},
        context::{SetupContext, StepOutcome},
        stage::{PipelineStage, RollbackAction, Step},
    },
    database::{DatabaseConnector, DatabaseProvisioner},
    execution::{
        error::{PipelineError, StepError},
        steps,
        workspace::Workspace,
    },
    wpcli::InstallerChannel,
};
use chrono::{DateTime, Utc};
use std::sync::{Arc, Mutex, PoisonError};
use tracing::{info, warn};

/// How a successful run ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// WordPress was already installed; nothing was touched
    AlreadyInstalled,
    Installed,
}

/// Result of a single rollback action
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RollbackResult {
    Done,
    Skipped(String),
    Failed(String),
}

/// Events that can occur during a run
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PipelineEvent {
    StageStarted(Step),
    StageSkipped {
        step: Step,
        reason: String,
    },
    StageCompleted {
        step: Step,
        stage: Option<PipelineStage>,
    },
    StageFailed {
        step: Step,
        error: String,
    },
    RollbackStarted(Step),
    RollbackAction {
        action: RollbackAction,
        result: RollbackResult,
    },
    PipelineCompleted(Outcome),
}

/// Type for event handlers
pub type EventHandler = Arc<dyn Fn(PipelineEvent) + Send + Sync>;

/// Drives one WordPress setup from check to install
pub struct SetupPipeline {
    channel: Arc<dyn InstallerChannel>,
    connector: Arc<dyn DatabaseConnector>,
    console: Arc<dyn Console>,
    workspace: Workspace,
    locale: String,
    defaults: PromptDefaults,
    event_handlers: Mutex<Vec<EventHandler>>,
}

impl SetupPipeline {
    pub fn new(
        channel: Arc<dyn InstallerChannel>,
        connector: Arc<dyn DatabaseConnector>,
        console: Arc<dyn Console>,
        workspace: Workspace,
    ) -> Self {
        let config = ProvisionConfig::default();
        Self {
            channel,
            connector,
            console,
            workspace,
            locale: config.locale,
            defaults: config.defaults,
            event_handlers: Mutex::new(Vec::new()),
        }
    }

    /// Take the locale and prompt defaults from `config`
    pub fn with_config(mut self, config: &ProvisionConfig) -> Self {
        self.locale = config.locale.clone();
        self.defaults = config.defaults.clone();
        self
    }

    pub fn workspace(&self) -> &Workspace {
        &self.workspace
    }

    /// Add an event handler
    pub fn add_event_handler<F>(&self, handler: F)
    where
        F: Fn(PipelineEvent) + Send + Sync + 'static,
    {
        self.event_handlers
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(Arc::new(handler));
    }

    /// Emit an event to all handlers
    fn emit(&self, event: PipelineEvent) {
        let handlers = self
            .event_handlers
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        for handler in handlers.iter() {
            handler(event.clone());
        }
    }

    /// Run every step that is still needed
    ///
    /// On failure the step's rollback plan has already been carried out when
    /// the error is returned.
    pub async fn run(&self, ctx: &mut SetupContext) -> Result<Outcome, PipelineError> {
        info!("Setting up WordPress in {}", self.workspace.root().display());

        let started = self.begin(Step::Check);
        let installed = match self.channel.is_installed().await {
            Ok(installed) => installed,
            Err(e) => return Err(self.fail(ctx, Step::Check, started, e.into(), None).await),
        };
        self.conclude(ctx, Step::Check, started, Ok(()), None).await?;

        if installed {
            self.console.write("WordPress is installed. Nothing to do.", true);
            self.emit(PipelineEvent::PipelineCompleted(Outcome::AlreadyInstalled));
            return Ok(Outcome::AlreadyInstalled);
        }

        if self.workspace.has_loader() {
            self.skip(ctx, Step::Download, "WordPress files are already present");
        } else {
            let started = self.begin(Step::Download);
            let result = steps::download(self.channel.as_ref(), &self.locale).await;
            self.conclude(ctx, Step::Download, started, result, None).await?;
        }

        if self.workspace.has_config() {
            let reason = "configuration file already exists";
            self.skip(ctx, Step::Configure, reason);
            self.skip(ctx, Step::CreateDatabase, reason);
            self.skip(ctx, Step::GrantUser, reason);
        } else {
            self.provision(ctx).await?;
        }

        let started = self.begin(Step::Install);
        let result = steps::install(self.channel.as_ref(), self.console.as_ref(), ctx).await;
        self.conclude(ctx, Step::Install, started, result, None).await?;

        info!("WordPress installed in {}", self.workspace.root().display());
        self.emit(PipelineEvent::PipelineCompleted(Outcome::Installed));
        Ok(Outcome::Installed)
    }

    /// Configure, create the database and grant its user
    async fn provision(&self, ctx: &mut SetupContext) -> Result<(), PipelineError> {
        let started = self.begin(Step::Configure);
        let result = steps::configure(
            self.channel.as_ref(),
            self.console.as_ref(),
            &self.defaults,
            ctx,
        )
        .await;
        self.conclude(ctx, Step::Configure, started, result, None).await?;

        let started = self.begin(Step::CreateDatabase);
        let created =
            steps::create_database(self.console.as_ref(), self.connector.clone(), ctx).await;
        let mut provisioner = match created {
            Ok(provisioner) => provisioner,
            Err(e) => return Err(self.fail(ctx, Step::CreateDatabase, started, e, None).await),
        };
        self.conclude(ctx, Step::CreateDatabase, started, Ok(()), Some(&mut provisioner))
            .await?;

        let started = self.begin(Step::GrantUser);
        let result = steps::grant_user(&mut provisioner, ctx).await;
        let granted = self
            .conclude(ctx, Step::GrantUser, started, result, Some(&mut provisioner))
            .await;
        provisioner.close();
        granted
    }

    fn begin(&self, step: Step) -> DateTime<Utc> {
        info!("Starting step: {}", step.title());
        self.emit(PipelineEvent::StageStarted(step));
        Utc::now()
    }

    fn skip(&self, ctx: &mut SetupContext, step: Step, reason: &str) {
        info!("Skipping step {}: {}", step, reason);
        ctx.record(
            step,
            Utc::now(),
            StepOutcome::Skipped {
                reason: reason.to_string(),
            },
        );
        self.emit(PipelineEvent::StageSkipped {
            step,
            reason: reason.to_string(),
        });
    }

    /// Record the step result and advance the stage, or fail the step
    async fn conclude(
        &self,
        ctx: &mut SetupContext,
        step: Step,
        started: DateTime<Utc>,
        result: Result<(), StepError>,
        provisioner: Option<&mut DatabaseProvisioner>,
    ) -> Result<(), PipelineError> {
        let result = result.and_then(|()| match step.reached_stage() {
            Some(stage) => ctx.advance(stage).map_err(StepError::from),
            None => Ok(()),
        });

        match result {
            Ok(()) => {
                ctx.record(step, started, StepOutcome::Completed);
                self.emit(PipelineEvent::StageCompleted {
                    step,
                    stage: step.reached_stage(),
                });
                Ok(())
            }
            Err(error) => Err(self.fail(ctx, step, started, error, provisioner).await),
        }
    }

    async fn fail(
        &self,
        ctx: &mut SetupContext,
        step: Step,
        started: DateTime<Utc>,
        error: StepError,
        provisioner: Option<&mut DatabaseProvisioner>,
    ) -> PipelineError {
        warn!("Step {} failed: {}", step, error);
        ctx.record(
            step,
            started,
            StepOutcome::Failed {
                error: error.to_string(),
            },
        );
        self.emit(PipelineEvent::StageFailed {
            step,
            error: error.to_string(),
        });

        self.roll_back(step, ctx, provisioner).await;
        PipelineError::new(step, error)
    }

    /// Undo the side effects of a failed step
    ///
    /// Every action in the plan is attempted once. Failures are reported
    /// and never stop the remaining actions.
    async fn roll_back(
        &self,
        step: Step,
        ctx: &SetupContext,
        mut provisioner: Option<&mut DatabaseProvisioner>,
    ) {
        let plan = step.rollback_plan();
        if plan.is_empty() {
            return;
        }

        info!("Rolling back {} step", step);
        self.emit(PipelineEvent::RollbackStarted(step));

        for &action in plan {
            let result = match action {
                RollbackAction::DropDatabase => {
                    self.drop_database(ctx, provisioner.as_deref_mut()).await
                }
                RollbackAction::DeleteConfigFile => self.delete_config_file(),
            };

            if let RollbackResult::Failed(reason) = &result {
                warn!("Rollback action '{}' failed: {}", action, reason);
                self.console
                    .write(&format!("Could not {}: {}", action, reason), true);
            }
            self.emit(PipelineEvent::RollbackAction { action, result });
        }
    }

    async fn drop_database(
        &self,
        ctx: &SetupContext,
        provisioner: Option<&mut DatabaseProvisioner>,
    ) -> RollbackResult {
        if !ctx.database_created() {
            return RollbackResult::Skipped("no database was created".to_string());
        }
        let Some(name) = ctx.database_name() else {
            return RollbackResult::Skipped("no database name was recorded".to_string());
        };
        let Some(provisioner) = provisioner else {
            return RollbackResult::Failed(StepError::NotConnected.to_string());
        };

        match provisioner.drop_database(name).await {
            Ok(()) => RollbackResult::Done,
            Err(e) => RollbackResult::Failed(e.to_string()),
        }
    }

    fn delete_config_file(&self) -> RollbackResult {
        match self.workspace.discard_config() {
            Ok(true) => RollbackResult::Done,
            Ok(false) => RollbackResult::Skipped("no configuration file".to_string()),
            Err(e) => RollbackResult::Failed(format!("{}: {}", e, e.source)),
        }
    }
}
