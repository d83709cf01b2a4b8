//! `navigator` CLI surface: argument parsing (`args`) plus the offline
//! reference stack (`offline`) the `run --offline` and `demo` subcommands
//! drive. No concrete `BrowserFacade`/`LanguageModel` backend ships here
//! (spec §1/§6 keep both external); `run` without `--offline` surfaces that
//! plainly rather than pretending to drive a browser that isn't there.

mod args;
mod offline;

pub use args::{CliArgs, Command};

use crate::config::Config;
use anyhow::{bail, Result};
use tracing::info;

/// Runs the parsed CLI to completion and prints the `RunResult` as pretty
/// JSON on success (spec §6 "Run output").
pub async fn run(args: CliArgs) -> Result<()> {
    match args.command {
        Command::Run { goal, offline, max_steps, headless, planner_mode, seed } => {
            let mut config = Config::from_env();
            if let Some(max_steps) = max_steps {
                config.max_steps = max_steps;
            }
            if let Some(headless) = headless {
                config.headless = headless;
            }
            if let Some(mode) = planner_mode {
                config.planner_mode = mode.parse().map_err(|e: String| anyhow::anyhow!(e))?;
            }

            if !offline {
                bail!(
                    "no browser/language-model backend is wired up in this binary; \
                     pass --offline to drive the scripted reference stack, or embed \
                     `agent-session::AgentSession` with your own `BrowserFacade`/`LanguageModel`"
                );
            }

            info!(%goal, max_steps = config.max_steps, "starting offline run");
            let mut session = offline::offline_session_blank(&config, seed);
            let result = session.run(&goal).await?;
            print_result(&result)?;
        }

        Command::Demo { goal, seed } => {
            let config = Config::default();
            info!(%goal, "starting scripted demo walkthrough");
            let mut session = offline::offline_session(&config, seed);
            let result = session.run(&goal).await?;
            print_result(&result)?;
        }
    }
    Ok(())
}

fn print_result(result: &agent_types::RunResult) -> Result<()> {
    let json = serde_json::to_string_pretty(result)?;
    println!("{json}");
    Ok(())
}
