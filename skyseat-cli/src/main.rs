use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "skyseat=info,skyseat_core=info,skyseat_store=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let mut config = skyseat_store::app_config::Config::load()?;
    // A path on the command line wins over the configured one
    if let Some(path) = std::env::args().nth(1) {
        config.source.bookings_path = path;
    }
    tracing::info!("Allocating seats from {}", config.source.bookings_path);

    let seat_map = skyseat_cli::run(&config).await?;
    println!("{}", seat_map);
    Ok(())
}
