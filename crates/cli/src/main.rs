use anyhow::Context;
use bookshelf_kernel::settings::Settings;
use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "bookshelf", version, about = "Personal bookshelf API")]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Run the HTTP server (default)
    Serve,
    /// Print the resolved settings as JSON
    Config,
    /// Print the merged OpenAPI document
    Openapi,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let settings = Settings::load().context("failed to load bookshelf settings")?;

    match cli.command.unwrap_or(Command::Serve) {
        Command::Serve => serve(settings),
        Command::Config => print_json(&serde_json::to_value(&settings)?),
        Command::Openapi => {
            let registry = bookshelf_app::registry();
            print_json(&bookshelf_http::router::openapi_document(&registry))
        }
    }
}

fn serve(settings: Settings) -> anyhow::Result<()> {
    bookshelf_telemetry::init(&settings.telemetry)?;

    tracing::info!(
        env = ?settings.environment,
        address = %settings.bind_address(),
        "bookshelf serve starting"
    );

    tokio::runtime::Runtime::new()
        .context("failed to build tokio runtime")?
        .block_on(bookshelf_app::run(settings))
}

fn print_json(value: &serde_json::Value) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
