//! AttachIt CLI binary.
//!
//! This binary provides command-line access to a configured content store:
//! - Store an upload and its styles
//! - Read a stored blob back
//! - Purge keys
//! - List the keys an attachment occupies

use clap::Parser;

mod cli;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    use cli::{Cli, Commands, handle_keys, handle_purge, handle_read, handle_store};

    let cli = Cli::parse();

    let log_level = if cli.verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::INFO
    };

    tracing_subscriber::fmt()
        .with_max_level(log_level)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let config = cli.load_config()?;

    match cli.command {
        Commands::Store {
            object_id,
            name,
            file,
            styles,
        } => {
            if !handle_store(&config, &object_id, &name, &file, &styles).await? {
                std::process::exit(1);
            }
        }

        Commands::Read { key, output } => {
            handle_read(&config, &key, output.as_deref()).await?;
        }

        Commands::Purge { keys } => {
            if !handle_purge(&config, &keys).await? {
                std::process::exit(1);
            }
        }

        Commands::Keys { object_id, name } => {
            handle_keys(&config, &object_id, &name)?;
        }
    }

    Ok(())
}
