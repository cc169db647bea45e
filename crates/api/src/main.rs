use backshop_api::app::{self, AppServices};
use backshop_api::config::AppConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    backshop_observability::init();

    let config = AppConfig::from_env()?;

    let services = match &config.database_url {
        Some(url) => {
            let pool = sqlx::PgPool::connect(url).await?;
            backshop_infra::ensure_schema(&pool).await?;
            tracing::info!("using postgres storage");
            AppServices::postgres(pool)
        }
        None => {
            tracing::warn!("DATABASE_URL not set; using in-memory storage");
            AppServices::in_memory()
        }
    };

    let app = app::build_app(services, config.error_codes.clone());

    let listener = tokio::net::TcpListener::bind(&config.listen_addr).await?;
    tracing::info!("listening on {}", listener.local_addr()?);

    axum::serve(listener, app).await?;
    Ok(())
}
