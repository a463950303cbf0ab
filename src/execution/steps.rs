//! Stage functions
//!
//! Each function performs one step against its collaborators and records
//! answers in the context. Stage bookkeeping and rollback belong to the
//! engine.

use crate::console::Console;
use crate::core::{config::PromptDefaults, context::SetupContext, validator::RuleSet};
use crate::database::{Credentials, DatabaseConnector, DatabaseProvisioner};
use crate::execution::error::StepError;
use crate::wpcli::InstallerChannel;
use std::sync::Arc;
use tracing::info;

/// Answers rendered into `core config`
pub const CONFIG_KEYS: [&str; 7] = [
    "dbname",
    "dbuser",
    "dbpass",
    "dbhost",
    "dbprefix",
    "dbcharset",
    "dbcollate",
];

/// Answers rendered into `core install`
pub const INSTALL_KEYS: [&str; 5] = ["url", "title", "admin_user", "admin_password", "admin_email"];

fn answer<'a>(ctx: &'a SetupContext, key: &'static str) -> Result<&'a str, StepError> {
    ctx.answers.get(key).ok_or(StepError::MissingAnswer(key))
}

pub async fn download(channel: &dyn InstallerChannel, locale: &str) -> Result<(), StepError> {
    info!("Downloading WordPress ({})", locale);
    channel.download(locale).await?;
    Ok(())
}

/// Collect database answers and write the configuration file
pub async fn configure(
    channel: &dyn InstallerChannel,
    console: &dyn Console,
    defaults: &PromptDefaults,
    ctx: &mut SetupContext,
) -> Result<(), StepError> {
    let identifier = RuleSet::identifier();
    let alnum = RuleSet::alphanumeric_or_underscore();

    let dbname = console.ask_and_validate("DB name", &identifier, None)?;
    ctx.answers.insert("dbname", dbname)?;
    let dbuser = console.ask_and_validate("DB user", &identifier, None)?;
    ctx.answers.insert("dbuser", dbuser)?;
    let dbpass = console.ask_hidden("DB pass (input will be hidden)", None)?;
    ctx.answers.insert("dbpass", dbpass)?;
    let dbhost = console.ask("DB host", Some(defaults.dbhost.as_str()))?;
    ctx.answers.insert("dbhost", dbhost)?;
    let dbprefix = console.ask_and_validate("DB prefix", &alnum, Some(defaults.dbprefix.as_str()))?;
    ctx.answers.insert("dbprefix", dbprefix)?;
    let dbcharset = console.ask_and_validate("DB character set", &alnum, Some(defaults.dbcharset.as_str()))?;
    ctx.answers.insert("dbcharset", dbcharset)?;
    let dbcollate = console.ask_and_validate("DB collate", &alnum, Some(defaults.dbcollate.as_str()))?;
    ctx.answers.insert("dbcollate", dbcollate)?;

    channel.write_config(&ctx.answers.select(&CONFIG_KEYS)).await?;
    Ok(())
}

/// Connect as a privileged user and create the site database
///
/// The returned provisioner keeps the connection open for the grant.
pub async fn create_database(
    console: &dyn Console,
    connector: Arc<dyn DatabaseConnector>,
    ctx: &SetupContext,
) -> Result<DatabaseProvisioner, StepError> {
    let dbuser = answer(ctx, "dbuser")?;
    let dbpass = answer(ctx, "dbpass")?;

    let user = console.ask("MySQL user to create database", Some(dbuser))?;
    let password = console.ask_hidden("Password for user above", Some(dbpass))?;
    let credentials = Credentials {
        host: answer(ctx, "dbhost")?.to_string(),
        user,
        password,
    };

    let mut provisioner = DatabaseProvisioner::new(connector, credentials);
    provisioner.connect().await?;
    provisioner
        .create_database(
            answer(ctx, "dbname")?,
            answer(ctx, "dbcharset")?,
            ctx.answers.get("dbcollate").unwrap_or_default(),
        )
        .await?;
    Ok(provisioner)
}

/// Grant the site user access to the site database
pub async fn grant_user(
    provisioner: &mut DatabaseProvisioner,
    ctx: &SetupContext,
) -> Result<(), StepError> {
    provisioner
        .grant_user(
            answer(ctx, "dbname")?,
            answer(ctx, "dbuser")?,
            ctx.answers.get("dbpass").unwrap_or_default(),
        )
        .await?;
    Ok(())
}

/// Collect site answers and run the installer
pub async fn install(
    channel: &dyn InstallerChannel,
    console: &dyn Console,
    ctx: &mut SetupContext,
) -> Result<(), StepError> {
    let required = RuleSet::required();
    let prompts = [
        ("url", "Site URL"),
        ("title", "Site name"),
        ("admin_user", "Admin user name"),
        ("admin_password", "Admin password"),
        ("admin_email", "Admin email"),
    ];
    for (key, prompt) in prompts {
        let value = console.ask_and_validate(prompt, &required, None)?;
        ctx.answers.insert(key, value)?;
    }

    channel.install(&ctx.answers.select(&INSTALL_KEYS)).await?;
    Ok(())
}
