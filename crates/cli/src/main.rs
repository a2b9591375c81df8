use anyhow::{Context, Result};
use catalog::{Attribute, DurationBucket, Movie, Preferences, RecommendationRecord, parser};
use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use engine::{RecommendationEngine, Session, Strategy};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;
use store::SqliteStore;
use tracing::info;

/// Movie Advisor - decade-scoped movie recommendations
#[derive(Parser)]
#[command(name = "movie-advisor")]
#[command(about = "Movie recommendations by similarity or predicted popularity", long_about = None)]
struct Cli {
    /// Path to the SQLite database
    #[arg(short, long, global = true, default_value = "movies.db")]
    database: PathBuf,

    /// Print results as JSON
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Load a `title::genre::duration::style::popularity::year` catalog file
    Import {
        /// Catalog file to read
        #[arg(long)]
        file: PathBuf,

        /// Drop the existing catalog first
        #[arg(long)]
        replace: bool,
    },

    /// List the decades present in the catalog
    Decades,

    /// List distinct genres or styles
    Distinct {
        #[arg(value_enum)]
        attribute: AttributeArg,
    },

    /// Recommend movies from one decade
    Recommend {
        /// Who is asking
        #[arg(long)]
        user: String,

        #[arg(long, value_enum, default_value = "similarity")]
        strategy: StrategyArg,

        #[arg(long)]
        genre: String,

        #[arg(long, value_enum, default_value = "long")]
        duration: DurationArg,

        #[arg(long)]
        style: String,

        /// Minimum popularity, 1-10
        #[arg(long, value_parser = clap::value_parser!(u8).range(1..=10))]
        popularity: u8,

        /// Decade label, e.g. 1990s
        #[arg(long)]
        decade: String,

        /// Rate the newest recommendation right away (1-5)
        #[arg(long)]
        rate: Option<u8>,
    },

    /// Rate your newest unrated recommendation
    Rate {
        #[arg(long)]
        user: String,

        /// Rating, 1-5
        #[arg(long)]
        rating: u8,
    },

    /// Show your rated recommendations, most recent first
    History {
        #[arg(long)]
        user: String,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum AttributeArg {
    Genre,
    Style,
}

impl From<AttributeArg> for Attribute {
    fn from(arg: AttributeArg) -> Self {
        match arg {
            AttributeArg::Genre => Attribute::Genre,
            AttributeArg::Style => Attribute::Style,
        }
    }
}

#[derive(Clone, Copy, ValueEnum)]
enum StrategyArg {
    Similarity,
    Popularity,
}

impl From<StrategyArg> for Strategy {
    fn from(arg: StrategyArg) -> Self {
        match arg {
            StrategyArg::Similarity => Strategy::Similarity,
            StrategyArg::Popularity => Strategy::Popularity,
        }
    }
}

#[derive(Clone, Copy, ValueEnum)]
enum DurationArg {
    /// Up to 100 minutes
    Short,
    /// 100 minutes or more
    Long,
}

impl From<DurationArg> for DurationBucket {
    fn from(arg: DurationArg) -> Self {
        match arg {
            DurationArg::Short => DurationBucket::Short,
            DurationArg::Long => DurationBucket::Long,
        }
    }
}

fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let store = Arc::new(
        SqliteStore::open(&cli.database)
            .with_context(|| format!("Failed to open database {}", cli.database.display()))?,
    );

    match cli.command {
        Commands::Import { file, replace } => handle_import(&store, file, replace, cli.json)?,
        Commands::Decades => {
            let engine = RecommendationEngine::new(store);
            print_list("Decades", &engine.list_decades()?, cli.json)?;
        }
        Commands::Distinct { attribute } => {
            let engine = RecommendationEngine::new(store);
            let attribute = Attribute::from(attribute);
            let values = engine.list_distinct(attribute)?;
            print_list(&format!("Distinct {}s", attribute), &values, cli.json)?;
        }
        Commands::Recommend {
            user,
            strategy,
            genre,
            duration,
            style,
            popularity,
            decade,
            rate,
        } => {
            let duration = DurationBucket::from(duration).midpoint();
            let preferences = Preferences::new(genre, duration, style, popularity, &decade)?;
            handle_recommend(
                RecommendationEngine::new(store),
                &Session::new(user),
                strategy.into(),
                &preferences,
                rate,
                cli.json,
            )?;
        }
        Commands::Rate { user, rating } => {
            let engine = RecommendationEngine::new(store);
            handle_rate(&engine, &Session::new(user), rating)?;
        }
        Commands::History { user } => {
            let engine = RecommendationEngine::new(store);
            let records = engine.history(&Session::new(user))?;
            print_history(&records, cli.json)?;
        }
    }

    Ok(())
}

/// Handle the 'import' command
fn handle_import(store: &SqliteStore, file: PathBuf, replace: bool, json: bool) -> Result<()> {
    let start = Instant::now();
    let movies = parser::parse_catalog(&file)
        .with_context(|| format!("Failed to read catalog {}", file.display()))?;

    if replace {
        let removed = store.clear_catalog().context("Failed to clear catalog")?;
        info!("Removed {} existing movies", removed);
    }
    let imported = store.import_movies(&movies).context("Failed to import catalog")?;
    let total = store.movie_count().context("Failed to count movies")?;

    if json {
        println!(
            "{}",
            serde_json::json!({ "imported": imported, "total": total })
        );
    } else {
        println!(
            "{} Imported {} movies in {:?} ({} in catalog)",
            "✓".green(),
            imported,
            start.elapsed(),
            total
        );
    }
    Ok(())
}

/// Handle the 'recommend' command
fn handle_recommend(
    engine: RecommendationEngine<SqliteStore>,
    session: &Session,
    strategy: Strategy,
    preferences: &Preferences,
    rate: Option<u8>,
    json: bool,
) -> Result<()> {
    let movies = engine.recommend(session, strategy, preferences)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&movies)?);
    } else {
        print_recommendations(&movies, strategy, preferences);
    }

    if let Some(rating) = rate {
        handle_rate(&engine, session, rating)?;
    }
    Ok(())
}

/// Handle the 'rate' command
fn handle_rate(engine: &RecommendationEngine<SqliteStore>, session: &Session, rating: u8) -> Result<()> {
    if engine.submit_rating(session, rating)? {
        println!("{} Rated your latest recommendation {}/5", "✓".green(), rating);
    } else {
        println!("{}", "Nothing to rate yet".yellow());
    }
    Ok(())
}

fn print_list(title: &str, values: &[String], json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(values)?);
        return Ok(());
    }
    println!("{}", format!("{}:", title).bold().blue());
    for value in values {
        println!("  - {}", value);
    }
    Ok(())
}

fn print_recommendations(movies: &[Movie], strategy: Strategy, preferences: &Preferences) {
    println!(
        "{}",
        format!("Movie Recommendations ({}, {}):", strategy, preferences.decade)
            .bold()
            .blue()
    );
    if movies.is_empty() {
        println!("{}", "No movies matched".yellow());
        return;
    }
    for (rank, movie) in movies.iter().enumerate() {
        println!(
            "{}. {} ({}) [{}, {}] {} min - Popularity: {:.1}",
            (rank + 1).to_string().green(),
            movie.title,
            movie.year,
            movie.genre,
            movie.style,
            movie.duration,
            movie.popularity
        );
    }
}

fn print_history(records: &[RecommendationRecord], json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(records)?);
        return Ok(());
    }
    println!("{}", "Rated recommendations:".bold().blue());
    if records.is_empty() {
        println!("{}", "No ratings yet".yellow());
    }
    for record in records {
        println!(
            "  - {} ({}) rated {}/5 on {}",
            record.movie.title,
            record.movie.year,
            record.rating.unwrap_or(0),
            record.recommended_at.format("%Y-%m-%d %H:%M")
        );
    }
    Ok(())
}
