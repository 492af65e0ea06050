use std::time::Duration;

use clap::{Args, Parser, Subcommand};
use roster_client::DEFAULT_POLL_INTERVAL;
use roster_core::{IdToken, RosterColumn, SortOrder, TrustList};
use url::Url;

pub const DEFAULT_URL: &str = "http://127.0.0.1:9090/MuWire/Trust";
const DEV_MODE_POLL_INTERVAL: Duration = Duration::from_secs(1);

/// Trust roster client
#[derive(Debug, Parser)]
#[command(version, about, long_about = None)]
pub struct Opts {
    #[command(flatten)]
    pub global: GlobalOpts,

    #[command(subcommand)]
    pub cmd: OptsCmd,
}

#[derive(Debug, Args)]
pub struct GlobalOpts {
    /// Trust endpoint
    #[arg(long, env = "ROSTER_URL", default_value = DEFAULT_URL)]
    pub url: Url,

    /// Seconds between revision checks
    #[arg(long, env = "ROSTER_POLL_INTERVAL_SECS", value_parser = clap::value_parser!(u64).range(1..))]
    pub poll_interval_secs: Option<u64>,

    #[arg(long, env = "ROSTER_USER_AGENT", default_value = concat!("roster/", env!("CARGO_PKG_VERSION")))]
    pub user_agent: String,
}

impl GlobalOpts {
    pub fn poll_interval(&self) -> Duration {
        match self.poll_interval_secs {
            Some(secs) => Duration::from_secs(secs),
            None if is_env_var_set("ROSTER_DEV_MODE") => DEV_MODE_POLL_INTERVAL,
            None => DEFAULT_POLL_INTERVAL,
        }
    }
}

pub fn is_env_var_set(var: &str) -> bool {
    std::env::var_os(var).is_some_and(|v| v != "0" && v != "false")
}

#[derive(Debug, Subcommand)]
pub enum OptsCmd {
    /// Print the current roster revision
    Revision,
    /// Print one list, as sorted by the server
    List {
        list: TrustList,
        #[arg(long, default_value = "User")]
        key: RosterColumn,
        #[arg(long, default_value = "ascending")]
        order: SortOrder,
    },
    /// Keep both lists in sync and print them whenever they change
    Watch,
    /// Mark a persona trusted
    Trust {
        token: IdToken,
        #[arg(long, default_value = "")]
        reason: String,
    },
    /// Mark a persona distrusted
    Distrust {
        token: IdToken,
        #[arg(long, default_value = "")]
        reason: String,
    },
    /// Neither trusted nor distrusted
    Neutral { token: IdToken },
    Subscribe { token: IdToken },
    /// Print the token of a persona name
    Token { name: String },
}
