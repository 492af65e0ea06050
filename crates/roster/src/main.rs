mod cli;
mod text;

use std::io;
use std::sync::Arc;

use clap::Parser;
use cli::{Opts, OptsCmd};
use roster_client::error::{FetchError, TransportError};
use roster_client::{HttpTrustClient, Roster, TrustApi as _};
use roster_core::{IdToken, PersonaName, SortState, TrustAction};
use snafu::{FromString, ResultExt, Snafu, Whatever};
use text::TextRenderer;
use tracing::info;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

pub const LOG_TARGET: &str = "roster::cli";

type WhateverResult<T> = std::result::Result<T, snafu::Whatever>;

#[derive(Debug, Snafu)]
pub enum CliError {
    #[snafu(display("Initialization error: {source}"))]
    Init { source: TransportError },
    #[snafu(display("Fetch error: {source}"))]
    Fetch { source: FetchError },
    #[snafu(display("Action error: {source}"))]
    Action { source: TransportError },
    #[snafu(display("Poller stopped: {source}"))]
    Poller { source: tokio::task::JoinError },
    #[snafu(display("Miscellaneous error: {source}"))]
    Whatever { source: Whatever },
}

pub type CliResult<T> = std::result::Result<T, CliError>;

#[snafu::report]
#[tokio::main]
async fn main() -> CliResult<()> {
    init_logging().context(WhateverSnafu)?;

    let opts = Opts::parse();
    match handle_cmd(opts).await {
        Ok(v) => {
            println!("{}", serde_json::to_string_pretty(&v).expect("Can't fail"));
            Ok(())
        }
        Err(err) => Err(err),
    }
}

async fn handle_cmd(opts: Opts) -> CliResult<serde_json::Value> {
    let client = || {
        HttpTrustClient::new(opts.global.url.clone(), &opts.global.user_agent).context(InitSnafu)
    };

    Ok(match opts.cmd {
        OptsCmd::Token { name } => {
            let token = IdToken::encode(&PersonaName::from(name.as_str()));
            serde_json::json!({ "name": name, "token": token })
        }
        OptsCmd::Revision => {
            let revision = client()?.fetch_revision().await.context(FetchSnafu)?;
            serde_json::to_value(revision).expect("Can't fail")
        }
        OptsCmd::List { list, key, order } => {
            let personas = client()?
                .fetch_list(list, SortState { key, order })
                .await
                .context(FetchSnafu)?;
            serde_json::to_value(personas).expect("Can't fail")
        }
        OptsCmd::Watch => {
            let poll_interval = opts.global.poll_interval();
            info!(target: LOG_TARGET, url = %opts.global.url, ?poll_interval, "Watching roster");

            let roster = Roster::builder()
                .api(Arc::new(client()?))
                .renderer(Arc::new(TextRenderer))
                .poll_interval(poll_interval)
                .build();
            let poller = roster.poller();
            let mut revisions = poller.revision_subscribe();
            tokio::spawn(async move {
                while revisions.changed().await.is_ok() {
                    if let Some(revision) = *revisions.borrow_and_update() {
                        info!(target: LOG_TARGET, %revision, "Roster revision changed");
                    }
                }
            });
            tokio::spawn(poller.run()).await.context(PollerSnafu)?;

            serde_json::Value::Null
        }
        OptsCmd::Trust { token, reason } => {
            submit(&client()?, TrustAction::Trust, token, &reason).await?
        }
        OptsCmd::Distrust { token, reason } => {
            submit(&client()?, TrustAction::Distrust, token, &reason).await?
        }
        OptsCmd::Neutral { token } => submit(&client()?, TrustAction::Neutral, token, "").await?,
        OptsCmd::Subscribe { token } => {
            submit(&client()?, TrustAction::Subscribe, token, "").await?
        }
    })
}

async fn submit(
    client: &HttpTrustClient,
    action: TrustAction,
    token: IdToken,
    reason: &str,
) -> CliResult<serde_json::Value> {
    client
        .submit_action(action, &token, reason)
        .await
        .context(ActionSnafu)?;
    info!(target: LOG_TARGET, %action, %token, "Action accepted");

    Ok(serde_json::json!({ "action": action, "persona": token }))
}

pub fn init_logging() -> WhateverResult<()> {
    tracing_subscriber::fmt()
        .with_writer(io::stderr)
        .with_env_filter(
            EnvFilter::builder()
                .with_default_directive(LevelFilter::INFO.into())
                .from_env_lossy(),
        )
        .try_init()
        .map_err(|_| Whatever::without_source("Failed to initialize logging".to_string()))?;

    Ok(())
}
