use std::io::IsTerminal as _;
use std::path::PathBuf;

use anyhow::Result;
use anyhow::bail;
use clap::Args;
use clap::Parser;
use clap::Subcommand;
use gsync::App;
use gsync::Config;
use gsync::SyncOptions;
use gsync::ops::git::RealGit;
use gsync::pipeline::FailurePolicy;
use gsync::prompt::TerminalPrompt;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::Layer as _;
use tracing_subscriber::layer::SubscriberExt as _;
use tracing_subscriber::util::SubscriberInitExt as _;

#[derive(Parser)]
#[command(name = "gsync")]
#[command(about = "Stage, commit, pull --rebase and push the current branch in one go", long_about = None)]
pub struct Cli {
    /// Run as if gsync was started in <PATH>
    #[arg(short = 'C', global = true, value_name = "PATH")]
    pub path: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Commit all local changes and sync them with the remote (default)
    Sync(SyncArgs),
    /// Show what a sync would commit, without changing anything
    Status {
        /// Print machine readable JSON
        #[arg(long)]
        json: bool,
    },
}

/// Options for `gsync sync`.
///
/// The commit message prompt only appears when stdin is a terminal. Piped
/// input is never read as the message, so `echo msg | gsync` commits with the
/// default message; use `--message` for unattended runs.
#[derive(Args, Default)]
pub struct SyncArgs {
    /// Commit message (prompted for when omitted and stdin is a terminal)
    #[arg(short, long)]
    pub message: Option<String>,
    /// Never prompt; use the default commit message when none is given.
    /// Implied when stdin is not a terminal
    #[arg(long)]
    pub no_prompt: bool,
    /// What to do after a step fails: continue or halt
    #[arg(long, value_name = "POLICY")]
    pub on_failure: Option<FailurePolicy>,
    /// Remote to pull from and push to
    #[arg(long)]
    pub remote: Option<String>,
    /// Branch to use when the current branch cannot be resolved
    #[arg(long)]
    pub default_branch: Option<String>,
    /// Exit with a non-zero status when any step failed
    #[arg(long)]
    pub strict: bool,
}

impl SyncArgs {
    /// Flags take precedence over git config.
    fn apply(&self, config: &mut Config) {
        if let Some(policy) = self.on_failure {
            config.on_failure = policy;
        }
        if let Some(remote) = &self.remote {
            config.remote = remote.clone();
        }
        if let Some(branch) = &self.default_branch {
            config.default_branch = branch.clone();
        }
        if self.strict {
            config.strict = true;
        }
    }
}

fn setup_logging() -> Result<()> {
    let timer = tracing_subscriber::fmt::time::ChronoLocal::new("%H:%M:%S%.3f".into());
    let format = tracing_subscriber::fmt::format().with_timer(timer);
    let filter = tracing_subscriber::EnvFilter::builder()
        .with_default_directive(LevelFilter::WARN.into())
        .from_env()?;
    let subscriber = tracing_subscriber::fmt::layer()
        .event_format(format)
        .with_writer(std::io::stderr)
        .with_filter(filter);
    tracing_subscriber::registry().with(subscriber).init();
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    setup_logging()?;

    let cli = Cli::parse();

    let path = match cli.path {
        Some(path) => path,
        None => std::env::current_dir()?,
    };
    let mut config = Config::load(&path)?;

    match cli.command.unwrap_or_else(|| Commands::Sync(SyncArgs::default())) {
        Commands::Sync(args) => {
            args.apply(&mut config);
            let strict = config.strict;
            let app = App::new(config, RealGit::new(path));
            let options = SyncOptions {
                interactive: !args.no_prompt && std::io::stdin().is_terminal(),
                message: args.message,
            };
            let report = app
                .cmd_sync(&options, &TerminalPrompt, &mut std::io::stdout())
                .await?;
            if report.exit_failure(strict) {
                bail!("Sync finished with failed steps");
            }
        }
        Commands::Status { json } => {
            let app = App::new(config, RealGit::new(path));
            app.cmd_status(json, &mut std::io::stdout()).await?
        }
    }

    Ok(())
}
