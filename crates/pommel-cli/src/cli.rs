//! Command-line surface.
//!
//! Every override is optional: an absent flag falls through to the
//! environment variable and then to the built-in default during
//! [`pommel_core::config::resolve`]. Flags therefore never carry clap
//! defaults of their own.

use std::path::PathBuf;

use clap::{ArgAction, Parser, Subcommand};

use pommel_core::config::{BrowserKind, ConfigOverrides, Environment};

#[derive(Parser, Debug)]
#[command(name = "pommel")]
#[command(about = "Page-object test suite runner for the practice storefront")]
#[command(version)]
pub struct Cli {
    /// Increase verbosity (-v debug, -vv trace)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub verbose: u8,

    /// Environment whose base URL the suite runs against
    #[arg(long, global = true, value_enum, value_name = "ENV")]
    pub env: Option<Environment>,

    /// Browser to drive
    #[arg(short, long, global = true, value_enum, value_name = "BROWSER")]
    pub browser: Option<BrowserKind>,

    /// Run with a visible browser window (`--headed` or `--headed=false`)
    #[arg(
        long,
        global = true,
        num_args = 0..=1,
        require_equals = true,
        default_missing_value = "true",
        value_name = "BOOL"
    )]
    pub headed: Option<bool>,

    /// Delay between browser operations (ms)
    #[arg(long, global = true, value_name = "MS")]
    pub slowmo: Option<u64>,

    /// Timeout for waits and assertions (ms)
    #[arg(long, global = true, value_name = "MS")]
    pub timeout: Option<u64>,

    /// Collect a video of each scenario, engine permitting
    #[arg(
        long,
        global = true,
        num_args = 0..=1,
        require_equals = true,
        default_missing_value = "true",
        value_name = "BOOL"
    )]
    pub video: Option<bool>,

    /// Base URL, overriding the environment's
    #[arg(long, global = true, value_name = "URL")]
    pub base_url: Option<String>,

    /// Login username
    #[arg(long, global = true, value_name = "USER")]
    pub username: Option<String>,

    /// Login password
    #[arg(long, global = true, value_name = "PASSWORD")]
    pub password: Option<String>,

    /// Attach to a running browser over this DevTools endpoint instead of
    /// launching one
    #[arg(long, global = true, value_name = "URL")]
    pub cdp_endpoint: Option<String>,

    /// Directory receiving logs, screenshots, videos and the run report
    #[arg(short, long, global = true, value_name = "DIR", default_value = ".")]
    pub output_dir: PathBuf,

    #[command(subcommand)]
    pub command: Commands,
}

impl Cli {
    pub fn overrides(&self) -> ConfigOverrides {
        ConfigOverrides {
            environment: self.env,
            browser: self.browser,
            headed: self.headed,
            slow_mo_ms: self.slowmo,
            timeout_ms: self.timeout,
            video: self.video,
            base_url: self.base_url.clone(),
            cdp_endpoint: self.cdp_endpoint.clone(),
            username: self.username.clone(),
            password: self.password.clone(),
        }
    }
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run the suite, optionally narrowed by tag and name
    Run {
        /// Only scenarios carrying every given tag (repeatable)
        #[arg(short, long, value_name = "TAG")]
        tag: Vec<String>,

        /// Only scenarios whose name contains this substring
        #[arg(long, value_name = "SUBSTRING")]
        filter: Option<String>,
    },

    /// List the registered scenarios and their tags
    List,

    /// Print the resolved configuration as JSON
    Config,
}
