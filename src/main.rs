use clap::Parser;
use color_eyre::Result;
use facilog::{
    cli::{Cli, Commands},
    Config, Profile, SqliteStore, SyncEngine,
};

fn main() -> Result<()> {
    // Set up error reporting with color-eyre
    color_eyre::install()?;

    let cli = Cli::parse();

    // --dev flag enables dev mode with separate config/store paths
    let profile = if cli.dev { Profile::Dev } else { Profile::Prod };

    let config = Config::load_with_profile(profile)?;

    // Open the shared store
    let store_path = config.get_store_path();
    let store = SqliteStore::new(
        store_path
            .to_str()
            .ok_or_else(|| color_eyre::eyre::eyre!("Store path contains invalid UTF-8"))?,
    )?;

    match cli.command.unwrap_or(Commands::Tui) {
        Commands::Tui => {
            let engine = SyncEngine::new(Box::new(store), config.poll_interval());
            let app = facilog::tui::App::new(config, engine);
            facilog::tui::run_event_loop(app)?;
        }
        Commands::Add {
            job,
            writer,
            work,
            date,
            issue,
            action,
            status,
            urgency,
            need_report,
        } => {
            facilog::cli::handle_add(
                job, writer, work, date, issue, action, status, urgency, need_report, &store,
            )?;
        }
        Commands::Summary { date } => {
            facilog::cli::handle_summary(date, &store)?;
        }
    }

    Ok(())
}
