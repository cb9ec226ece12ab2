use std::path::PathBuf;

mod batches;
mod calendar;
mod form;
mod init;
mod requests;
mod status;
mod terminal;

use anyhow::Context as _;
use batches::Batches;
use calendar::Calendar;
use clap::ArgAction;
use form::Form;
use init::Init;
use requests::Requests;
use status::Status;
use travel_desk::{
    storage::{Dataset, Workspace},
    Config,
};

#[derive(Debug, clap::Parser)]
#[command(version, about)]
pub struct Cli {
    /// Verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    /// The directory holding the `.travel` settings
    #[arg(short, long, default_value = ".", global = true)]
    root: PathBuf,

    /// A YAML dataset to use instead of the workspace one
    #[arg(short, long, value_name = "FILE", global = true)]
    data: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Command>,
}

impl Cli {
    pub fn run(self) -> anyhow::Result<()> {
        Self::setup_logging(self.verbose);

        let context = Context {
            workspace: Workspace::open(self.root),
            data: self.data,
        };

        self.command
            .unwrap_or_else(|| Command::Status(Status::default()))
            .run(&context)
    }

    fn setup_logging(verbosity: u8) {
        use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

        let level = match verbosity {
            0 => tracing::Level::WARN,
            1 => tracing::Level::INFO,
            2 => tracing::Level::DEBUG,
            _ => tracing::Level::TRACE,
        };

        let filter = tracing_subscriber::EnvFilter::from_default_env().add_directive(level.into());

        let fmt_layer = tracing_subscriber::fmt::layer()
            .with_writer(std::io::stderr)
            .with_target(false)
            .with_thread_names(false)
            .with_line_number(false);

        tracing_subscriber::registry()
            .with(filter)
            .with(fmt_layer)
            .init();
    }
}

#[derive(Debug, clap::Parser)]
pub enum Command {
    /// Show dashboard statistics (default)
    Status(Status),

    /// Initialize a workspace with default settings and the sample data
    Init,

    /// List travel requests
    ///
    /// With `--from-batches`, the batches are shown as requests instead.
    Requests(Requests),

    /// List travel batches and travelers
    Batches(Batches),

    /// Show the trip calendar
    Calendar(Calendar),

    /// Fill in a travel request
    ///
    /// Fields are addressed by their dotted path, e.g.
    /// `--set location.ville=Lyon --set needs.carteSIM=true`.
    Form(Form),
}

impl Command {
    fn run(self, context: &Context) -> anyhow::Result<()> {
        match self {
            Self::Status(command) => command.run(context)?,
            Self::Init => Init::run(context)?,
            Self::Requests(command) => command.run(context)?,
            Self::Batches(command) => command.run(context)?,
            Self::Calendar(command) => command.run(context)?,
            Self::Form(command) => command.run(context)?,
        }
        Ok(())
    }
}

/// What every command gets to work with.
#[derive(Debug)]
pub struct Context {
    workspace: Workspace,
    data: Option<PathBuf>,
}

impl Context {
    const fn workspace(&self) -> &Workspace {
        &self.workspace
    }

    fn config(&self) -> Config {
        self.workspace.load_config()
    }

    fn dataset(&self) -> anyhow::Result<Dataset> {
        self.workspace
            .load_dataset(self.data.as_deref())
            .context("failed to load the travel dataset")
    }
}
