//! Test doubles for pipeline scenarios

use async_trait::async_trait;
use std::collections::VecDeque;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use wp_provision::core::config::ProvisionConfig;
use wp_provision::core::options::OptionSet;
use wp_provision::database::sql;
use wp_provision::execution::{PipelineEvent, SetupPipeline, Workspace};
use wp_provision::{
    ChannelError, Console, Credentials, DatabaseConnector, DatabaseError, DatabaseSession,
    InstallerChannel, PromptError,
};

/// One recorded wp-cli invocation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    pub subcommand: String,
    pub options: String,
    pub input: Option<String>,
}

/// wp-cli stand-in that records calls and touches the workspace like the
/// real commands would
pub struct MockChannel {
    root: PathBuf,
    installed: bool,
    fail_on: Option<&'static str>,
    write_config_file: bool,
    calls: Mutex<Vec<Invocation>>,
}

impl MockChannel {
    pub fn new(root: &Path) -> Self {
        Self {
            root: root.to_path_buf(),
            installed: false,
            fail_on: None,
            write_config_file: true,
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn installed(mut self) -> Self {
        self.installed = true;
        self
    }

    /// Exit nonzero for `subcommand`
    pub fn failing_on(mut self, subcommand: &'static str) -> Self {
        self.fail_on = Some(subcommand);
        self
    }

    /// Leave the config file alone even when `core config` succeeds
    pub fn without_config_file(mut self) -> Self {
        self.write_config_file = false;
        self
    }

    pub fn calls(&self) -> Vec<Invocation> {
        self.calls.lock().unwrap().clone()
    }

    pub fn subcommands(&self) -> Vec<String> {
        self.calls().into_iter().map(|c| c.subcommand).collect()
    }
}

#[async_trait]
impl InstallerChannel for MockChannel {
    async fn run(
        &self,
        subcommand: &str,
        options: &OptionSet,
        input: Option<&str>,
        fail_on_nonzero: bool,
    ) -> Result<i32, ChannelError> {
        self.calls.lock().unwrap().push(Invocation {
            subcommand: subcommand.to_string(),
            options: options.encode(),
            input: input.map(str::to_string),
        });

        let status = match subcommand {
            "core is-installed" => i32::from(!self.installed),
            _ if self.fail_on == Some(subcommand) => 1,
            "core download" => {
                std::fs::write(self.root.join("wp-load.php"), "<?php").unwrap();
                0
            }
            "core config" => {
                if self.write_config_file {
                    std::fs::write(self.root.join("wp-config.php"), "<?php").unwrap();
                }
                0
            }
            _ => 0,
        };

        // Partial output of a failed `core config`
        if status != 0 && subcommand == "core config" && self.write_config_file {
            std::fs::write(self.root.join("wp-config.php"), "<?php").unwrap();
        }

        if status != 0 && fail_on_nonzero {
            return Err(ChannelError::CommandFailed {
                command_line: format!("wp {}", subcommand),
                options: options.encode(),
                status,
            });
        }
        Ok(status)
    }
}

/// Database failure switches
#[derive(Debug, Default, Clone, Copy)]
pub struct Faults {
    pub connect: bool,
    pub create: bool,
    pub grant: bool,
    pub drop: bool,
}

/// In-memory database server
#[derive(Default)]
pub struct MockDatabase {
    pub faults: Faults,
    connects: AtomicUsize,
    credentials: Mutex<Vec<Credentials>>,
    statements: Arc<Mutex<Vec<String>>>,
}

impl MockDatabase {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_faults(faults: Faults) -> Self {
        Self {
            faults,
            ..Self::default()
        }
    }

    pub fn connects(&self) -> usize {
        self.connects.load(Ordering::SeqCst)
    }

    pub fn credentials(&self) -> Vec<Credentials> {
        self.credentials.lock().unwrap().clone()
    }

    pub fn statements(&self) -> Vec<String> {
        self.statements.lock().unwrap().clone()
    }
}

struct MockSession {
    faults: Faults,
    statements: Arc<Mutex<Vec<String>>>,
}

#[async_trait]
impl DatabaseConnector for MockDatabase {
    async fn connect(&self, credentials: &Credentials) -> Result<Box<dyn DatabaseSession>, DatabaseError> {
        self.connects.fetch_add(1, Ordering::SeqCst);
        self.credentials.lock().unwrap().push(credentials.clone());
        if self.faults.connect {
            return Err(DatabaseError::Connect {
                host: credentials.host.clone(),
                user: credentials.user.clone(),
                detail: "Access denied".to_string(),
            });
        }
        Ok(Box::new(MockSession {
            faults: self.faults,
            statements: self.statements.clone(),
        }))
    }
}

#[async_trait]
impl DatabaseSession for MockSession {
    async fn execute(&mut self, statement: &str) -> Result<(), String> {
        self.statements.lock().unwrap().push(statement.to_string());
        let failed = (statement.starts_with("CREATE") && self.faults.create)
            || (statement.starts_with("GRANT") && self.faults.grant)
            || (statement.starts_with("DROP") && self.faults.drop);
        if failed {
            return Err(format!("statement rejected: {}", statement));
        }
        Ok(())
    }

    fn quote(&self, value: &str) -> String {
        sql::quote_literal(value)
    }
}

/// Console answering prompts from a script
///
/// An empty scripted answer takes the prompt's default.
pub struct ScriptedConsole {
    answers: Mutex<VecDeque<String>>,
    prompts: Mutex<Vec<String>>,
    output: Mutex<Vec<String>>,
}

impl ScriptedConsole {
    pub fn new(answers: &[&str]) -> Self {
        Self {
            answers: Mutex::new(answers.iter().map(|a| a.to_string()).collect()),
            prompts: Mutex::new(Vec::new()),
            output: Mutex::new(Vec::new()),
        }
    }

    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().unwrap().clone()
    }

    pub fn output(&self) -> Vec<String> {
        self.output.lock().unwrap().clone()
    }

    pub fn remaining(&self) -> usize {
        self.answers.lock().unwrap().len()
    }
}

impl Console for ScriptedConsole {
    fn ask(&self, prompt: &str, default: Option<&str>) -> Result<String, PromptError> {
        self.prompts.lock().unwrap().push(prompt.to_string());
        let answer = self
            .answers
            .lock()
            .unwrap()
            .pop_front()
            .ok_or_else(|| PromptError::Interaction(format!("no scripted answer for '{}'", prompt)))?;
        match default {
            Some(default) if answer.is_empty() => Ok(default.to_string()),
            _ => Ok(answer),
        }
    }

    fn ask_hidden(&self, prompt: &str, default: Option<&str>) -> Result<String, PromptError> {
        self.ask(prompt, default)
    }

    fn write(&self, line: &str, _newline: bool) {
        self.output.lock().unwrap().push(line.to_string());
    }
}

/// Answers for the configure prompts: name, user, password, then defaults
pub const CONFIGURE_ANSWERS: [&str; 7] = ["testsite", "testsite", "secret", "", "", "", ""];

/// Answers for the create-database prompts, taking the site user's defaults
pub const CREATE_DATABASE_ANSWERS: [&str; 2] = ["", ""];

pub const INSTALL_ANSWERS: [&str; 5] = [
    "example.test",
    "Example",
    "admin",
    "adminpass",
    "admin@example.test",
];

/// Every answer of a fresh run, in prompt order
pub fn full_run_answers() -> Vec<&'static str> {
    CONFIGURE_ANSWERS
        .iter()
        .chain(CREATE_DATABASE_ANSWERS.iter())
        .chain(INSTALL_ANSWERS.iter())
        .copied()
        .collect()
}

/// A pipeline wired to test doubles, with every event captured
pub struct Harness {
    pub dir: tempfile::TempDir,
    pub channel: Arc<MockChannel>,
    pub database: Arc<MockDatabase>,
    pub console: Arc<ScriptedConsole>,
    pub events: Arc<Mutex<Vec<PipelineEvent>>>,
    pub pipeline: SetupPipeline,
}

impl Harness {
    pub fn new(
        dir: tempfile::TempDir,
        channel: MockChannel,
        database: MockDatabase,
        answers: &[&str],
    ) -> Self {
        Self::with_config(dir, channel, database, answers, &ProvisionConfig::default())
    }

    pub fn with_config(
        dir: tempfile::TempDir,
        channel: MockChannel,
        database: MockDatabase,
        answers: &[&str],
        config: &ProvisionConfig,
    ) -> Self {
        let channel = Arc::new(channel);
        let database = Arc::new(database);
        let console = Arc::new(ScriptedConsole::new(answers));
        let workspace = Workspace::new(dir.path(), "wp-load.php", "wp-config.php");

        let pipeline = SetupPipeline::new(
            channel.clone(),
            database.clone(),
            console.clone(),
            workspace,
        )
        .with_config(config);

        let events = Arc::new(Mutex::new(Vec::new()));
        let sink = events.clone();
        pipeline.add_event_handler(move |event| sink.lock().unwrap().push(event));

        Self {
            dir,
            channel,
            database,
            console,
            events,
            pipeline,
        }
    }

    pub fn events(&self) -> Vec<PipelineEvent> {
        self.events.lock().unwrap().clone()
    }

    pub fn config_exists(&self) -> bool {
        self.dir.path().join("wp-config.php").exists()
    }
}

pub fn workspace_dir() -> tempfile::TempDir {
    tempfile::tempdir().unwrap()
}
