use anyhow::Result;

#[tokio::main]
async fn main() -> Result<()> {
    if let Err(err) = dotenvy::dotenv() {
        if !err.not_found() {
            return Err(err.into());
        }
    }

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let ax = dine_delight::build()?;
    let cfg = ax.app.config_snapshot();

    if cfg.get_bool("demo.seed_on_start").unwrap_or(false) {
        let report = dine_delight::functions::seed_demo(&ax.app).await?;
        tracing::info!(tenant_id = %report.tenant_id, items = report.items_count, "seeded demo data");
    }

    let host = cfg
        .get_string("http.host")
        .unwrap_or_else(|| "127.0.0.1".to_string());
    let port = cfg
        .get_string("http.port")
        .unwrap_or_else(|| "3030".to_string());

    ax.listen(format!("{host}:{port}")).await?;

    Ok(())
}
