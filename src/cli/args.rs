//! CLI surface. The teacher's `soulbrowser` binary spreads its subcommands
//! across `src/cli/*`; this crate needs only the two spec §1 calls for
//! (run a goal, demo the loop offline), so the whole surface fits in one
//! `clap`-derived struct.

use clap::{Parser, Subcommand};

#[derive(Debug, Parser)]
#[command(name = "navigator", version, about = "Goal-directed web navigation agent")]
pub struct CliArgs {
    #[command(subcommand)]
    pub command: Command,

    /// `tracing-subscriber` env-filter directive, e.g. "navigator=debug".
    #[arg(long, global = true, default_value = "navigator=info,agent_session=info")]
    pub log_level: String,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Run a goal to completion.
    Run {
        /// The natural-language objective.
        goal: String,
        /// Drive an in-memory scripted browser and a rule-driven mock model
        /// instead of real backends (spec §1 treats both as external; this
        /// is the CLI's only shipped way to exercise the loop end-to-end).
        #[arg(long)]
        offline: bool,
        #[arg(long)]
        max_steps: Option<u32>,
        #[arg(long)]
        headless: Option<bool>,
        #[arg(long)]
        planner_mode: Option<String>,
        /// Seed forwarded to the cursor path generator, for reproducible demos.
        #[arg(long)]
        seed: Option<u64>,
    },
    /// Run the built-in scripted search-engine walkthrough end to end,
    /// entirely offline (no network, no real model).
    Demo {
        #[arg(default_value = "search for rust programming language tutorials")]
        goal: String,
        #[arg(long)]
        seed: Option<u64>,
    },
}
