// SPDX-FileCopyrightText: 2025 Caspar Water Company
//
// SPDX-License-Identifier: Apache-2.0

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Result;
use clap::{Parser, Subcommand};
use cmd::commands::{self, VerifyTarget};
use cmd::common::SeoContext;
use diagnostics::error_event;
use verify::SubprocessRunner;
use verify::determinism::GENERATOR_ROOT_ENV;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
#[command(name = "sansthan-seo")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
    /// Repository root (defaults to the current directory)
    #[arg(long, global = true)]
    root: Option<PathBuf>,
    /// Prerendered build output directory
    #[arg(long, global = true)]
    build_dir: Option<PathBuf>,
    /// Settings file (defaults to seo.yaml under the root when present)
    #[arg(long, global = true)]
    config: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Regenerate the SEO content cluster and its manifest
    Generate {
        /// Output blog root
        #[arg(long, env = GENERATOR_ROOT_ENV)]
        blog_root: Option<PathBuf>,
    },
    /// Validate frontmatter, links and corpus coverage of every post
    ValidateContent {
        /// Treat warnings as failures
        #[arg(long)]
        strict: bool,
    },
    /// Render sitemap, robots and feed bodies for the corpus
    Render {
        /// Output directory
        #[arg(long)]
        out: PathBuf,
    },
    /// Run the whole quality gate chain, stopping at the first failure
    Check {
        /// Finish with strict content validation
        #[arg(long)]
        strict: bool,
    },
    /// Run one verifier
    Verify {
        #[arg(value_enum)]
        target: VerifyTarget,
    },
}

impl Commands {
    fn event_prefix(&self) -> &'static str {
        match self {
            Commands::Generate { .. } => commands::generate::EVENT_PREFIX,
            Commands::ValidateContent { .. } => commands::validate::EVENT_PREFIX,
            Commands::Render { .. } => commands::render::EVENT_PREFIX,
            Commands::Check { .. } => commands::check::EVENT_PREFIX,
            Commands::Verify { target } => target.event_prefix(),
        }
    }
}

/// Returns whether the command passed.
fn run(ctx: &SeoContext, command: Commands) -> Result<bool> {
    match command {
        Commands::Generate { blog_root } => {
            _ = commands::generate_command(ctx, blog_root)?;
            Ok(true)
        }
        Commands::ValidateContent { strict } => Ok(commands::validate_content_command(ctx, strict)?.passed()),
        Commands::Render { out } => {
            _ = commands::render_command(ctx, &out)?;
            Ok(true)
        }
        Commands::Check { strict } => {
            let runner = SubprocessRunner::current_exe(&ctx.root)?;
            Ok(commands::check_command(ctx, strict, &runner)?.succeeded())
        }
        Commands::Verify { target } => {
            let runner = SubprocessRunner::current_exe(&ctx.root)?;
            Ok(commands::verify_command(ctx, target, &runner)?.passed())
        }
    }
}

fn main() -> ExitCode {
    diagnostics::init();

    let cli = Cli::parse();
    let prefix = cli.command.event_prefix();
    let result =
        SeoContext::from_args(cli.root, cli.build_dir, cli.config).and_then(|ctx| run(&ctx, cli.command));

    match result {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(e) => {
            error_event!(&format!("{prefix}-failure"), {
                "check": "unhandled-runtime-error",
                "reason": format!("{e:#}"),
            });
            ExitCode::FAILURE
        }
    }
}
