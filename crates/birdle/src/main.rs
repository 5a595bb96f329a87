use birdle::{setup_logger, Application, Cli, Settings};
use clap::Parser;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let settings = Settings::load(Cli::parse())?;
    setup_logger(settings.log_level(), &["hyper", "sqlx::query"])?;
    let application = Application::build(settings).await?;

    application.run_until_stopped().await?;
    Ok(())
}
