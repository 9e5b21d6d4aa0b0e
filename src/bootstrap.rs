use std::sync::Arc;

use axum::Router;
use tokio::net::TcpListener;
use tracing::{Level, info};
use tracing_subscriber::EnvFilter;

use crate::{
    application::{group_service::GroupService, student_service::StudentService},
    config::AppConfig,
    domain::{group::GroupRepository, student::StudentRepository},
    infrastructure::postgres::{
        build_pg_pool,
        repositories::{PgGroupRepository, PgStudentRepository},
    },
    interfaces::http::router::build_router,
    state::AppState,
};

pub async fn run() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    init_tracing();

    let config = AppConfig::load()?;

    let pg_pool = build_pg_pool(&config.postgres).await?;

    let group_repo: Arc<dyn GroupRepository> = Arc::new(PgGroupRepository::new(pg_pool.clone()));
    let student_repo: Arc<dyn StudentRepository> =
        Arc::new(PgStudentRepository::new(pg_pool.clone()));

    let group_service = Arc::new(GroupService::new(group_repo.clone()));
    let student_service = Arc::new(StudentService::new(student_repo, group_repo));

    let shared_state = Arc::new(AppState::new(group_service, student_service));

    let router: Router = build_router(shared_state);
    let addr = config.addr();
    let listener = TcpListener::bind(&addr).await?;
    info!("HTTP server listening on {addr}");

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

fn init_tracing() {
    if tracing::subscriber::set_global_default(
        tracing_subscriber::fmt()
            .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                EnvFilter::builder()
                    .with_default_directive(Level::INFO.into())
                    .from_env_lossy()
            }))
            .finish(),
    )
    .is_ok()
    {
        return;
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
