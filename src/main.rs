use anyhow::Context;
use stacks_app::modules;
use stacks_kernel::settings::Settings;
use stacks_kernel::{InitCtx, ModuleRegistry};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let settings = Settings::load().with_context(|| "failed to load STACKS settings")?;

    stacks_telemetry::init(&settings.telemetry)?;

    tracing::info!(
        env = ?settings.environment,
        db = %settings.database.url,
        "stacks-app bootstrap starting"
    );

    let pool = stacks_db::connect(&settings.database).await?;

    let mut registry = ModuleRegistry::new();
    modules::register_all(&mut registry);

    let ctx = InitCtx {
        settings: &settings,
        db: &pool,
    };

    registry.init_all(&ctx).await?;
    stacks_db::run_migrations(&pool, &registry.collect_migrations()).await?;
    registry.start_all(&ctx).await?;

    tracing::info!("stacks-app bootstrap complete");

    stacks_http::start_server(&registry, &ctx).await?;

    registry.stop_all().await?;
    pool.close().await;

    tracing::info!("stacks-app shut down cleanly");
    Ok(())
}
