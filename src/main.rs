use anyhow::Context;
use clap::Parser;
use unifinder::config::{Cli, Command, FavoritesCommand, LogFormat};
use unifinder::core::KeyValueStore;
use unifinder::utils::{logger, validation::Validate};
use unifinder::{
    AppConfig, DirectoryClient, FavoritesStore, FileStore, SearchHit, UniFinder, UnifinderError,
    UniversityDirectory,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut config = match AppConfig::load(cli.config.as_deref()) {
        Ok(config) => config,
        Err(e) => exit_with(&e),
    };
    if let Some(data_dir) = &cli.data_dir {
        config.storage.data_dir = Some(data_dir.clone());
    }

    match config.logging.format {
        LogFormat::Compact => logger::init_cli_logger(cli.verbose),
        LogFormat::Json => logger::init_json_logger(cli.verbose),
    }
    tracing::debug!("CLI arguments: {:?}", cli);
    tracing::debug!("Configuration: {:?}", config);

    if let Err(e) = config.validate() {
        tracing::error!("Configuration validation failed: {}", e);
        exit_with(&e);
    }

    let directory = match DirectoryClient::with_base_url(config.base_url()) {
        Ok(directory) => directory,
        Err(e) => exit_with(&e),
    };
    let storage = FileStore::new(config.data_dir());
    let finder = UniFinder::new(
        directory,
        FavoritesStore::with_key(storage, config.favorites_key()),
    );

    if let Err(e) = run(&finder, &cli).await {
        match e.downcast_ref::<UnifinderError>() {
            Some(err) => {
                tracing::error!("{:#}", e);
                exit_with(err);
            }
            None => return Err(e),
        }
    }

    Ok(())
}

async fn run<D, S>(finder: &UniFinder<D, S>, cli: &Cli) -> anyhow::Result<()>
where
    D: UniversityDirectory,
    S: KeyValueStore,
{
    match &cli.command {
        Command::Search { country } => {
            let hits = finder
                .search(country)
                .await
                .with_context(|| format!("searching universities in {}", country))?;
            if hits.is_empty() && !cli.json {
                println!("No universities found for this country");
            }
            print_hits(&hits, cli.json)?;
        }
        Command::All { limit } => {
            let mut hits = finder
                .search_all()
                .await
                .context("fetching all universities")?;
            let total = hits.len();
            if let Some(limit) = limit {
                hits.truncate(*limit);
            }
            print_hits(&hits, cli.json)?;
            if !cli.json && hits.len() < total {
                println!("... {} more", total - hits.len());
            }
        }
        Command::Favorites(command) => run_favorites(finder, command, cli.json).await?,
    }
    Ok(())
}

async fn run_favorites<D, S>(
    finder: &UniFinder<D, S>,
    command: &FavoritesCommand,
    json: bool,
) -> anyhow::Result<()>
where
    D: UniversityDirectory,
    S: KeyValueStore,
{
    let favorites = finder.favorites();
    match command {
        FavoritesCommand::List => {
            let list = favorites.list().await;
            if json {
                println!("{}", serde_json::to_string_pretty(&list)?);
            } else if list.is_empty() {
                println!("No favorites yet");
            } else {
                for fav in &list {
                    println!(
                        "{}  {} ({})  added {}",
                        fav.id,
                        fav.university.name,
                        fav.university.country,
                        fav.added_at.format("%Y-%m-%d %H:%M")
                    );
                }
            }
        }
        FavoritesCommand::Add { country, name } => {
            let (university, created) = finder.favorite_by_name(country, name).await?;
            if created {
                println!("Added {} to favorites", university.key());
            } else {
                println!("{} is already a favorite", university.key());
            }
        }
        FavoritesCommand::Remove { id } => {
            if favorites.remove(id).await? {
                println!("Removed {}", id);
            } else {
                println!("No favorite with id {}", id);
            }
        }
        FavoritesCommand::Check { country, name } => {
            let is_favorite = finder.is_favorite_by_name(country, name).await?;
            if json {
                println!("{}", serde_json::json!({ "is_favorite": is_favorite }));
            } else if is_favorite {
                println!("{} ({}) is a favorite", name, country.trim());
            } else {
                println!("{} ({}) is not a favorite", name, country.trim());
            }
        }
        FavoritesCommand::Toggle { country, name } => {
            let now_favorite = finder.toggle_by_name(country, name).await?;
            let verb = if now_favorite { "Added" } else { "Removed" };
            println!("{} {} ({})", verb, name, country);
        }
    }
    Ok(())
}

fn print_hits(hits: &[SearchHit], json: bool) -> anyhow::Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(hits)?);
        return Ok(());
    }
    for hit in hits {
        let marker = if hit.is_favorite { '*' } else { ' ' };
        let website = hit.university.web_pages.first().map(String::as_str).unwrap_or("-");
        println!(
            "{} {} [{}] {}",
            marker, hit.university.name, hit.university.alpha_two_code, website
        );
    }
    Ok(())
}

fn exit_with(err: &UnifinderError) -> ! {
    eprintln!("❌ {}", err.user_friendly_message());
    eprintln!("💡 {}", err.recovery_suggestion());

    let exit_code = if err.is_storage_error() {
        3
    } else if err.is_retryable() {
        2
    } else {
        1
    };
    std::process::exit(exit_code);
}
