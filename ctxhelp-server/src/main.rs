use clap::Parser;
use std::net::SocketAddr;
use std::path::PathBuf;
use axum_server::Handle;
use tracing::{error, info};
use tracing_subscriber::{fmt, EnvFilter};

use ctxhelp_core::auth::EDITOR_ROLE;
use ctxhelp_core::http::router;
use ctxhelp_core::Error;

mod context;
use context::ServerContext;

#[derive(Parser, Debug, Clone)]
#[command(name = "ctxhelp")]
#[command(author, version, about = "Context help store and editor")]
pub struct Args {
    /// Address to which the server will bind
    #[arg(long, default_value = "0.0.0.0:8080")]
    server_addr: String,

    /// Postgres connection URL.
    #[arg(long, env = "DATABASE_URL", default_value = "postgres://ctxhelp@localhost:5432/ctxhelp")]
    db_path: String,

    /// Keep help entries in memory instead of Postgres
    #[arg(long, default_value = "false")]
    memory: bool,

    /// Role whose members may create, edit and delete help entries
    #[arg(long, default_value = EDITOR_ROLE)]
    editor_role: String,

    /// JSON array of entries to insert at startup
    #[arg(long)]
    seed: Option<PathBuf>,
}

fn init_tracing() {
    // Route `log` records from dependencies through tracing as well.
    let _ = tracing_log::LogTracer::init();
    let filter = EnvFilter::from_default_env()
        .add_directive("ctxhelp=info".parse().unwrap_or_default())
        .add_directive("tower_http=info".parse().unwrap_or_default());
    let sub = fmt().with_env_filter(filter).finish();
    if tracing::subscriber::set_global_default(sub).is_err() {
        eprintln!("A global tracing subscriber was already set");
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();
    init_tracing();
    let args = Args::parse();
    info!("ctxhelp starting. addr={}, memory={}", args.server_addr, args.memory);

    if let Err(e) = run_server(args).await {
        error!("Server error: {:?}", e);
        return Err(e.into());
    }
    info!("Main finished. Goodbye!");
    Ok(())
}

async fn run_server(args: Args) -> Result<(), Error> {
    // 1) Store, policy, service
    let ctx = ServerContext::new(&args).await?;

    // 2) HTTP
    let app = router(ctx.service.clone());
    let addr: SocketAddr = args.server_addr.parse()?;
    info!("Context help server listening on http://{}", addr);

    let handle = Handle::new();
    let shutdown_handle = handle.clone();

    // 3) Ctrl-C => graceful shutdown
    tokio::spawn(async move {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!("Failed to listen for Ctrl-C: {:?}", e);
        }
        info!("Ctrl-C detected; shutting down...");
        shutdown_handle.graceful_shutdown(None);
    });

    axum_server::bind(addr)
        .handle(handle)
        .serve(app.into_make_service())
        .await?;

    // 4) Close the pool
    if let Some(db) = ctx.db {
        db.pool().close().await;
    }
    Ok(())
}
