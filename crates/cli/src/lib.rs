use anyhow::{Context as AnyhowContext, Result};
use axum::{
    body::{Body, Bytes},
    http::{HeaderMap, Response as HttpResponse, StatusCode},
    response::Response,
    routing::{get, post},
    Router,
};
use clap::{Args, Parser, Subcommand};
use command::domain::{
    next_action, HeadlandsOutput, ListSectorsPayload, RoutePayload, SearchPayload,
    SectorPayload,
};
use command::{
    browse, AppState, CommandAction, CommandHandler, CommandRequest, CommandResponse,
    CommandStatus, Hint, HintKind, ResponseMeta,
};
use config::{FlagOverrides, Settings};
use crag_protocol::{serialize_json, serialize_json_pretty, RouteFilter};
use std::fs;
use std::io::{self, Read};
use std::path::PathBuf;
use std::sync::Arc;

mod command;
mod config;
mod http_api;
mod report;
mod server_security;

fn print_stdout(text: &str) -> Result<()> {
    use std::io::Write;

    let mut stdout = io::stdout().lock();
    if let Err(err) = stdout
        .write_all(text.as_bytes())
        .and_then(|_| stdout.write_all(b"\n"))
        .and_then(|_| stdout.flush())
    {
        if err.kind() == io::ErrorKind::BrokenPipe {
            return Ok(());
        }
        return Err(err.into());
    }
    Ok(())
}

#[derive(Parser)]
#[command(name = "crag")]
#[command(about = "Browse and curate a climbing route catalogue", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Catalogue JSON file (env: CRAG_DATA)
    #[arg(long, global = true)]
    data: Option<PathBuf>,

    /// Comment pool JSON file (env: CRAG_COMMENTS)
    #[arg(long, global = true)]
    comments: Option<PathBuf>,

    /// Config file (env: CRAG_CONFIG, default: ./crag.toml when present)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Quiet mode: log only warnings/errors
    #[arg(long, global = true)]
    quiet: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// List headlands and their sectors
    Headlands(OutputArgs),

    /// Sector cards with grade bands and route types
    Sectors(SectorsArgs),

    /// One sector's route table
    Sector(SectorArgs),

    /// Route page with selected comments, difficulty consensus and tags
    Route(RouteArgs),

    /// Search sectors and routes
    Search(SearchArgs),

    /// Validate a seed file and write it out as the catalogue
    Import(ImportArgs),

    /// Execute a JSON Command API request
    Command(CommandArgs),

    /// Serve Command API over HTTP (POST /command)
    ServeHttp(ServeArgs),
}

#[derive(Args, Clone, Copy, Default)]
struct OutputArgs {
    /// Print the Command API response as JSON instead of text
    #[arg(long)]
    json: bool,
}

#[derive(Args)]
struct SectorsArgs {
    #[command(flatten)]
    output: OutputArgs,

    /// Only sectors of this headland
    #[arg(long)]
    headland: Option<String>,
}

#[derive(Args)]
struct SectorArgs {
    #[command(flatten)]
    output: OutputArgs,

    slug: String,

    #[arg(long)]
    min_grade: Option<i32>,

    #[arg(long)]
    max_grade: Option<i32>,

    /// Keep routes of this style (repeatable)
    #[arg(long = "style")]
    styles: Vec<String>,

    /// Keep routes carrying this tag (repeatable)
    #[arg(long = "tag")]
    tags: Vec<String>,
}

#[derive(Args)]
struct RouteArgs {
    #[command(flatten)]
    output: OutputArgs,

    slug: String,

    /// User whose own votes are marked
    #[arg(long)]
    viewer: Option<String>,

    /// Show beta comments instead of collapsing them
    #[arg(long)]
    beta: bool,
}

#[derive(Args)]
struct SearchArgs {
    #[command(flatten)]
    output: OutputArgs,

    query: String,

    /// Rank routes by fuzzy score instead of substring matching
    #[arg(long)]
    fuzzy: bool,

    /// Maximum results per group
    #[arg(short = 'n', long)]
    limit: Option<usize>,
}

#[derive(Args)]
struct ImportArgs {
    #[command(flatten)]
    output: OutputArgs,

    /// Seed JSON with a top-level `headlands` array
    seed: PathBuf,

    /// Where to write the catalogue (default: the configured data path)
    #[arg(long)]
    out: Option<PathBuf>,
}

#[derive(Args)]
struct CommandArgs {
    /// Inline JSON payload (mutually exclusive with --file)
    #[arg(long = "json", conflicts_with = "file")]
    request: Option<String>,

    /// Path to file containing JSON payload
    #[arg(long)]
    file: Option<PathBuf>,

    /// Pretty-print JSON response
    #[arg(long)]
    pretty: bool,
}

#[derive(Args)]
struct ServeArgs {
    /// Bind address (default: `server.bind` from config, else 127.0.0.1:7700)
    #[arg(long)]
    bind: Option<String>,

    /// Allow binding to non-loopback addresses (requires --auth-token)
    #[arg(long)]
    public: bool,

    /// Require Authorization: Bearer <token> on admin actions (env: CRAG_AUTH_TOKEN)
    #[arg(long)]
    auth_token: Option<String>,
}

pub async fn main_entry() -> Result<()> {
    let mut cli = Cli::parse();

    // stdout is reserved for JSON whenever a response envelope is printed
    let json = match &cli.command {
        Commands::Headlands(output) => output.json,
        Commands::Sectors(args) => args.output.json,
        Commands::Sector(args) => args.output.json,
        Commands::Route(args) => args.output.json,
        Commands::Search(args) => args.output.json,
        Commands::Import(args) => args.output.json,
        Commands::Command(_) => true,
        Commands::ServeHttp(_) => false,
    };
    if json {
        cli.quiet = true;
    }

    let mut builder =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"));
    if cli.quiet {
        builder.filter_level(log::LevelFilter::Warn);
    } else if cli.verbose {
        builder.filter_level(log::LevelFilter::Debug);
    }
    builder.target(env_logger::Target::Stderr).init();

    let Cli {
        command,
        data,
        comments,
        config,
        ..
    } = cli;
    let settings = Settings::load(&FlagOverrides {
        config,
        data,
        comments,
    })?;
    if let Some(path) = &settings.config_path {
        log::debug!("Using config {}", path.display());
    }

    match command {
        Commands::Headlands(_) => {
            if json {
                let payload = serde_json::json!({});
                return respond_json(&settings, CommandAction::ListHeadlands, payload).await;
            }
            let state = AppState::load(&settings)?;
            let out: HeadlandsOutput = browse::list_headlands(&state);
            print_stdout(&report::render_headlands(&out))?;
        }
        Commands::Sectors(args) => {
            let payload = ListSectorsPayload {
                headland: args.headland,
            };
            if json {
                return respond_json(&settings, CommandAction::ListSectors, payload).await;
            }
            let state = AppState::load(&settings)?;
            let out = browse::list_sectors(&state, payload)?;
            print_stdout(&report::render_sectors(&out))?;
        }
        Commands::Sector(args) => {
            let payload = SectorPayload {
                slug: args.slug,
                filter: RouteFilter {
                    min_grade: args.min_grade,
                    max_grade: args.max_grade,
                    styles: args.styles,
                    tags: args.tags,
                },
            };
            if json {
                return respond_json(&settings, CommandAction::Sector, payload).await;
            }
            let state = AppState::load(&settings)?;
            let out = browse::sector(&state, payload)?;
            print_stdout(&report::render_sector(&out))?;
        }
        Commands::Route(args) => {
            let payload = RoutePayload {
                slug: args.slug,
                viewer: args.viewer,
            };
            if json {
                return respond_json(&settings, CommandAction::Route, payload).await;
            }
            let state = AppState::load(&settings)?;
            let view = browse::route(&state, payload)?;
            print_stdout(&report::render_route(&view, args.beta))?;
        }
        Commands::Search(args) => {
            let payload = SearchPayload {
                query: args.query,
                fuzzy: args.fuzzy,
                limit: args.limit,
            };
            if json {
                return respond_json(&settings, CommandAction::Search, payload).await;
            }
            let state = AppState::load(&settings)?;
            let out = browse::search(&state, payload)?;
            print_stdout(&report::render_search(&out))?;
        }
        Commands::Import(args) => run_import(args, &settings, json)?,
        Commands::Command(args) => run_command(args, &settings).await?,
        Commands::ServeHttp(args) => serve_http(args, settings).await?,
    }

    Ok(())
}

async fn respond_json<P: serde::Serialize>(
    settings: &Settings,
    action: CommandAction,
    payload: P,
) -> Result<()> {
    let request = CommandRequest::new(action, payload)?;
    let handler = CommandHandler::new(AppState::load(settings)?, Some(settings.data.clone()));
    let response = handler.execute(request).await;
    emit(&response, true)
}

fn emit(response: &CommandResponse, pretty: bool) -> Result<()> {
    let output = if pretty {
        serialize_json_pretty(response)?
    } else {
        serialize_json(response)?
    };
    print_stdout(&output)?;

    if response.is_error() {
        std::process::exit(1);
    }
    Ok(())
}

fn run_import(args: ImportArgs, settings: &Settings, json: bool) -> Result<()> {
    let raw = fs::read_to_string(&args.seed)
        .with_context(|| format!("Failed to read seed {}", args.seed.display()))?;
    let report = crag_catalog::import_seed(&raw)
        .with_context(|| format!("Failed to import seed {}", args.seed.display()))?;

    let out = args.out.unwrap_or_else(|| settings.data.clone());
    report
        .catalog
        .save(&out)
        .with_context(|| format!("Failed to write catalogue to {}", out.display()))?;

    if !json {
        return print_stdout(&report::render_import(&report, &out));
    }

    let hints = if report.is_clean() {
        Vec::new()
    } else {
        vec![Hint {
            kind: HintKind::Warn,
            text: format!("{} record(s) were skipped; see data.issues.", report.stats.skipped),
        }]
    };
    let response = CommandResponse {
        status: CommandStatus::Ok,
        message: None,
        error: None,
        hints,
        next_actions: vec![next_action(
            CommandAction::ListHeadlands,
            serde_json::json!({}),
            "Browse the imported catalogue.",
        )],
        data: serde_json::json!({
            "stats": report.stats,
            "issues": report.issues,
        }),
        meta: ResponseMeta {
            catalog_saved: Some(true),
            data_path: Some(out.display().to_string()),
            ..Default::default()
        },
    };
    emit(&response, true)
}

async fn run_command(args: CommandArgs, settings: &Settings) -> Result<()> {
    let raw = read_payload(&args)?;
    let request: CommandRequest =
        serde_json::from_str(&raw).context("Invalid JSON passed to --json/--file")?;

    let handler = CommandHandler::new(AppState::load(settings)?, Some(settings.data.clone()));
    let response = handler.execute(request).await;
    emit(&response, args.pretty)
}

fn read_payload(args: &CommandArgs) -> Result<String> {
    if let Some(raw) = &args.request {
        return Ok(raw.clone());
    }
    if let Some(path) = &args.file {
        return fs::read_to_string(path)
            .with_context(|| format!("Failed to read JSON from {}", path.display()));
    }

    let mut buffer = String::new();
    io::stdin()
        .read_to_string(&mut buffer)
        .context("Failed to read JSON from stdin")?;

    if buffer.trim().is_empty() {
        anyhow::bail!("Command request is empty. Provide --json, --file, or pipe JSON via stdin.");
    }

    Ok(buffer)
}

async fn serve_http(args: ServeArgs, settings: Settings) -> Result<()> {
    let bind = args.bind.unwrap_or_else(|| settings.bind.clone());
    let addrs = server_security::resolve_guarded_bind_addrs(&bind, args.public).await?;
    let auth_token_raw = args
        .auth_token
        .or_else(|| std::env::var(server_security::AUTH_TOKEN_ENV).ok());
    let auth_token = server_security::AuthToken::parse(auth_token_raw.as_deref())?;
    if args.public && auth_token.is_none() {
        anyhow::bail!(
            "--public requires an auth token: set --auth-token or export {}",
            server_security::AUTH_TOKEN_ENV
        );
    }

    let state = Arc::new(HttpState {
        handler: CommandHandler::new(AppState::load(&settings)?, Some(settings.data.clone())),
        auth_token,
    });
    let guarded = state.auth_token.is_some();
    let app = router(state);

    let listener = tokio::net::TcpListener::bind(&bind).await?;
    let local_addr = listener.local_addr()?;
    let base_url = format!("http://{local_addr}");

    print_stdout(&format!("Serving Command API: {base_url}/command"))?;
    print_stdout(&format!("Health endpoint: {base_url}/health"))?;
    if guarded {
        print_stdout(&format!(
            "Admin actions require header 'Authorization: Bearer ${}'",
            server_security::AUTH_TOKEN_ENV
        ))?;
    }
    if args.public {
        let addrs = addrs
            .iter()
            .map(|a| a.to_string())
            .collect::<Vec<_>>()
            .join(", ");
        print_stdout(&format!(
            "Public bind enabled (--public). Resolved addresses: {addrs}"
        ))?;
    }
    print_stdout(&format!(
        "Try: curl -X POST {base_url}/command -H 'Content-Type: application/json' -d '{{\"action\":\"list_headlands\"}}'"
    ))?;

    axum::serve(listener, app).await?;
    Ok(())
}

fn router(state: Arc<HttpState>) -> Router {
    Router::new()
        .route(
            "/command",
            post({
                let state = state.clone();
                move |headers, body| http_handler(headers, body, state.clone())
            }),
        )
        .route(
            "/health",
            get({
                let state = state.clone();
                move || http_health(state.clone())
            }),
        )
}

async fn http_handler(
    headers: HeaderMap,
    body: Bytes,
    state: Arc<HttpState>,
) -> Result<Response, StatusCode> {
    let request: CommandRequest = match serde_json::from_slice(&body) {
        Ok(request) => request,
        Err(err) => {
            let response =
                http_api::error_response("invalid_request", format!("Invalid JSON request: {err}"));
            return http_api::build_response(StatusCode::BAD_REQUEST, response);
        }
    };

    if request.action.is_admin() {
        if let Some(token) = &state.auth_token {
            if !http_api::is_authorized(&headers, token) {
                log::warn!(
                    "Rejected {} without a valid bearer token",
                    request.action.as_str()
                );
                let response = http_api::error_response(
                    "unauthorized",
                    "Missing or invalid Authorization header".to_string(),
                );
                return http_api::build_response(StatusCode::UNAUTHORIZED, response);
            }
        }
    }

    let response = state.handler.execute(request).await;
    http_api::build_response(http_api::status_for(&response), response)
}

async fn http_health(state: Arc<HttpState>) -> Result<Response, StatusCode> {
    let body = serde_json::json!({
        "status": "ok",
        "counts": state.handler.counts().await,
    });
    let bytes = serde_json::to_vec(&body).map_err(|_| StatusCode::INTERNAL_SERVER_ERROR)?;
    HttpResponse::builder()
        .status(StatusCode::OK)
        .header("content-type", "application/json")
        .body(Body::from(bytes))
        .map_err(|_| StatusCode::INTERNAL_SERVER_ERROR)
}

struct HttpState {
    handler: CommandHandler,
    auth_token: Option<server_security::AuthToken>,
}
