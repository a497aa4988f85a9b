// crates/edge/src/cli.rs

use crate::{
    server,
    site::{self, Overrides},
    EdgeError,
};
use chrono::Utc;
use clap::{builder::ValueHint, Parser, Subcommand};
use domain::setting::Settings;
use serve::Resolver;
use std::{net::SocketAddr, path::PathBuf, process::ExitCode, sync::Arc};
use tracing::{error, info};

pub type Result<T> = std::result::Result<T, EdgeError>;

/// Brochure CLI
#[tokio::main(flavor = "multi_thread")]
#[tracing::instrument(skip_all)]
pub async fn start() -> ExitCode {
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Serve(cmd) => do_serve(cmd).await,
        Commands::Routes(cmd) => do_routes(cmd).await,
    };

    result.map_or_else(
        |e| {
            error!("brochure failed: {}", e);
            ExitCode::FAILURE
        },
        |_| ExitCode::SUCCESS,
    )
}

#[tracing::instrument(skip_all)]
async fn do_serve(cmd: SiteCmd) -> Result<()> {
    let process = prepare(cmd)?;

    let then = Utc::now();
    let process = process.bind_state();
    info!(
        "Application state built in {} milliseconds",
        Utc::now().timestamp_millis() - then.timestamp_millis()
    );

    process.serve().await
}

#[tracing::instrument(skip_all)]
async fn do_routes(cmd: SiteCmd) -> Result<()> {
    let process = prepare(cmd)?;

    for route in process.static_routes().await? {
        println!("{route}");
    }
    Ok(())
}

fn prepare(cmd: SiteCmd) -> Result<StartProcess<ResolverReady>> {
    let then = Utc::now();
    let process = StartProcess::<CommandIssued>::parse_settings_file(cmd)?;
    info!(
        "Settings parsed in {} milliseconds",
        Utc::now().timestamp_millis() - then.timestamp_millis()
    );

    let then = Utc::now();
    let process = process.inject_dependencies()?;
    info!(
        "Dependencies injected in {} milliseconds",
        Utc::now().timestamp_millis() - then.timestamp_millis()
    );

    Ok(process)
}

#[derive(Parser, Debug)]
#[command(name = "brochure", version, about = "Localized CMS site server")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Serve the site in the specified directory over HTTP
    Serve(SiteCmd),
    /// Print every page and blog route that can be precomputed
    Routes(SiteCmd),
}

#[derive(Parser, Debug, Clone)]
pub struct SiteCmd {
    /// Site directory holding settings.toml (or set BROCHURE_DIR)
    #[arg(
        value_name = "DIR",
        env = "BROCHURE_DIR",
        required = true,
        value_hint = ValueHint::DirPath,
        value_parser = dir_must_exist
    )]
    pub dir: PathBuf,

    /// Listen address, overrides `[server] bind`
    #[arg(long, env = "BROCHURE_BIND")]
    pub bind: Option<SocketAddr>,

    /// CMS environment id, overrides `[delivery] environment_id`
    #[arg(long, env = "KONTENT_PROJECT_ID")]
    pub environment_id: Option<String>,

    /// Preview Delivery API key
    #[arg(long, env = "KONTENT_PREVIEW_API_KEY", hide_env_values = true)]
    pub preview_api_key: Option<String>,

    /// Shared secret for `/api/draft`
    #[arg(long, env = "KONTENT_PREVIEW_SECRET", hide_env_values = true)]
    pub preview_secret: Option<String>,
}

impl SiteCmd {
    fn overrides(&self) -> Overrides {
        Overrides {
            bind: self.bind,
            environment_id: self.environment_id.clone(),
            preview_api_key: self.preview_api_key.clone(),
            preview_secret: self.preview_secret.clone(),
        }
    }
}

fn dir_must_exist(s: &str) -> std::result::Result<PathBuf, String> {
    let p = PathBuf::from(s);
    if !p.exists() {
        return Err(format!("Not found: {}", p.display()));
    }
    if !p.is_dir() {
        return Err(format!("Not a directory: {}", p.display()));
    }
    Ok(p)
}

// ─────────────────────────────────────────────────────────────────────────────
// Start process state machine
// ─────────────────────────────────────────────────────────────────────────────

trait ProcessState {}

struct CommandIssued;

struct SettingsLoaded {
    command: SiteCmd,
    settings: Settings,
}

struct ResolverReady {
    command: SiteCmd,
    settings: Settings,
    resolver: Arc<Resolver>,
}

struct StateBound {
    settings: Settings,
    state: adapt::http::AppState,
}

impl ProcessState for CommandIssued {}
impl ProcessState for SettingsLoaded {}
impl ProcessState for ResolverReady {}
impl ProcessState for StateBound {}

struct StartProcess<S: ProcessState> {
    state: S,
}

impl StartProcess<CommandIssued> {
    /// Load `<dir>/settings.toml` and lay command-line values over it.
    #[tracing::instrument(skip_all)]
    fn parse_settings_file(command: SiteCmd) -> Result<StartProcess<SettingsLoaded>> {
        let mut settings = site::load_settings(&command.dir)?;
        command.overrides().apply(&mut settings);

        Ok(StartProcess {
            state: SettingsLoaded { command, settings },
        })
    }
}

impl StartProcess<SettingsLoaded> {
    #[tracing::instrument(skip_all)]
    fn inject_dependencies(self) -> Result<StartProcess<ResolverReady>> {
        let resolver = site::resolver(&self.state.command.dir, &self.state.settings)?;

        Ok(StartProcess {
            state: ResolverReady {
                command: self.state.command,
                settings: self.state.settings,
                resolver: Arc::new(resolver),
            },
        })
    }
}

impl StartProcess<ResolverReady> {
    #[tracing::instrument(skip_all)]
    async fn static_routes(&self) -> Result<Vec<String>> {
        let codes: Vec<&str> = self.state.resolver.locales().codes().collect();
        let routes = self.state.resolver.static_routes(&codes).await?;
        info!(
            dir = %self.state.command.dir.display(),
            count = routes.len(),
            "static routes enumerated"
        );
        Ok(routes)
    }

    #[tracing::instrument(skip_all)]
    fn bind_state(self) -> StartProcess<StateBound> {
        let state = site::app_state(&self.state.settings, self.state.resolver);
        StartProcess {
            state: StateBound {
                settings: self.state.settings,
                state,
            },
        }
    }
}

impl StartProcess<StateBound> {
    #[tracing::instrument(skip_all)]
    async fn serve(self) -> Result<()> {
        server::run(self.state.settings.server.bind, self.state.state).await
    }
}
