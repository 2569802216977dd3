// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Command-line interface.
//!
//! The root command only carries global flags; every subcommand comes from a
//! [`CommandPlugin`]. The built-in `run`, `show` and `modules` commands are
//! themselves a plugin, [`CoreCommands`], so applications can add or replace
//! commands the same way.

use std::io::Write;
use std::path::PathBuf;

use anyhow::{anyhow, Context as _};
use clap::{Arg, ArgAction, ArgMatches, Command};

use crate::config::{load_config, Runtime, RuntimeBuilder};
use crate::processors::Context;
use crate::traits::DEFAULT_INDENT_WIDTH;

pub const BINARY_NAME: &str = "pocketchemist";

/// A source of subcommands.
pub trait CommandPlugin {
    /// Attach this plugin's commands to `root` and return it.
    fn add_command(&self, root: Command) -> Command;

    /// Whether `name` is one of this plugin's commands.
    fn handles(&self, name: &str) -> bool;

    /// Run the command `name` with its matches, writing results to `out`.
    fn execute(&self, name: &str, matches: &ArgMatches, out: &mut dyn Write) -> anyhow::Result<()>;
}

/// Root command with the global `-v` flag and every plugin's subcommands.
pub fn build_cli(plugins: &[&dyn CommandPlugin]) -> Command {
    let root = Command::new(BINARY_NAME)
        .about("Run processor pipelines with optional external modules")
        .version(env!("CARGO_PKG_VERSION"))
        .subcommand_required(true)
        .arg_required_else_help(true)
        .arg(
            Arg::new("verbose")
                .short('v')
                .long("verbose")
                .action(ArgAction::Count)
                .global(true)
                .help("Increase log verbosity (-v info, -vv debug)"),
        );

    plugins.iter().fold(root, |root, plugin| plugin.add_command(root))
}

/// Hand the matched subcommand to the first plugin that claims it.
pub fn dispatch(plugins: &[&dyn CommandPlugin], matches: &ArgMatches, out: &mut dyn Write) -> anyhow::Result<()> {
    let (name, sub_matches) = matches
        .subcommand()
        .ok_or_else(|| anyhow!("no command given"))?;

    let plugin = plugins
        .iter()
        .find(|plugin| plugin.handles(name))
        .ok_or_else(|| anyhow!("no plugin handles command '{}'", name))?;
    plugin.execute(name, sub_matches, out)
}

/// Built-in commands: `run`, `show` and `modules`.
#[derive(Debug, Default)]
pub struct CoreCommands;

impl CoreCommands {
    const RUN: &'static str = "run";
    const SHOW: &'static str = "show";
    const MODULES: &'static str = "modules";

    fn config_arg() -> Arg {
        Arg::new("config")
            .required(true)
            .value_parser(clap::value_parser!(PathBuf))
            .help("Pipeline configuration (.yaml, .yml or .toml)")
    }

    fn runtime(matches: &ArgMatches) -> anyhow::Result<Runtime> {
        let path = matches
            .get_one::<PathBuf>("config")
            .ok_or_else(|| anyhow!("missing config path"))?;
        let config = load_config(path).with_context(|| format!("loading {}", path.display()))?;
        let runtime = RuntimeBuilder::from_config(&config)
            .with_context(|| format!("building pipeline from {}", path.display()))?;
        Ok(runtime)
    }

    fn write_lines(out: &mut dyn Write, lines: &[String]) -> anyhow::Result<()> {
        for line in lines {
            writeln!(out, "{}", line)?;
        }
        Ok(())
    }

    fn run(runtime: &Runtime, out: &mut dyn Write) -> anyhow::Result<()> {
        runtime.pipeline().print(0, DEFAULT_INDENT_WIDTH, None);

        let mut context = Context::new();
        runtime.run(&mut context).context("pipeline run failed")?;

        let scalars: serde_json::Map<String, serde_json::Value> = context
            .scalars()
            .into_iter()
            .map(|(key, value)| serde_json::to_value(value).map(|json| (key.to_string(), json)))
            .collect::<Result<_, _>>()?;
        writeln!(out, "{}", serde_json::to_string_pretty(&scalars)?)?;
        Ok(())
    }
}

impl CommandPlugin for CoreCommands {
    fn add_command(&self, root: Command) -> Command {
        root.subcommand(
            Command::new(Self::RUN)
                .about("Run a pipeline and print the resulting values as JSON")
                .arg(Self::config_arg()),
        )
        .subcommand(
            Command::new(Self::SHOW)
                .about("Print the processor tree of a pipeline")
                .arg(Self::config_arg()),
        )
        .subcommand(
            Command::new(Self::MODULES)
                .about("Report which optional modules are available")
                .arg(Self::config_arg()),
        )
    }

    fn handles(&self, name: &str) -> bool {
        matches!(name, Self::RUN | Self::SHOW | Self::MODULES)
    }

    fn execute(&self, name: &str, matches: &ArgMatches, out: &mut dyn Write) -> anyhow::Result<()> {
        let runtime = Self::runtime(matches)?;
        match name {
            Self::RUN => Self::run(&runtime, out),
            Self::SHOW => Self::write_lines(out, &runtime.render_pipeline(DEFAULT_INDENT_WIDTH)),
            Self::MODULES => Self::write_lines(out, &runtime.registry().render_modules(DEFAULT_INDENT_WIDTH)),
            other => Err(anyhow!("unknown command '{}'", other)),
        }
    }
}
