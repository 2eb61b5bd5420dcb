//! CLI command definitions, routing, and tracing setup.

use clap::{Parser, Subcommand, ValueEnum};
use color_eyre::eyre::{Result, eyre};
use indicatif::{ProgressBar, ProgressStyle};
use tracing::info;

use stagedoor_catalog::{Catalog, Direction, View, category_eq};
use stagedoor_shared::{
    ActorDetail, ActorId, ActorShort, CharacterDetail, CharacterId, PlayDetail, PlayId,
    PlayShort, SourceConfig, SourceKind, config_file_path, init_config, load_config,
};
use stagedoor_source::{CsvSource, RestSource};

// ---------------------------------------------------------------------------
// CLI structure
// ---------------------------------------------------------------------------

/// stagedoor — a theater catalog in your terminal.
#[derive(Parser)]
#[command(
    name = "stagedoor",
    version,
    about = "Browse a theater's actors, characters, and plays from CSV files or the theater API.",
    long_about = None,
)]
pub(crate) struct Cli {
    /// Data source: csv or rest (overrides the config file).
    #[arg(long, global = true)]
    pub source: Option<CliSourceKind>,

    /// REST API base URL (overrides STAGEDOOR_API_BASE and the config file).
    #[arg(long, global = true)]
    pub api_base: Option<String>,

    /// CSV base location: a directory or an http(s) URL.
    #[arg(long, global = true)]
    pub data: Option<String>,

    /// Print results as JSON instead of text cards.
    #[arg(long, global = true)]
    pub json: bool,

    /// Log format: text (default) or json.
    #[arg(long, default_value = "text", global = true)]
    pub log_format: LogFormat,

    /// Verbosity level (-v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

/// Log output format.
#[derive(Clone, Debug, ValueEnum)]
pub(crate) enum LogFormat {
    Text,
    Json,
}

/// Data source selection on the command line.
#[derive(Clone, Copy, Debug, ValueEnum)]
pub(crate) enum CliSourceKind {
    Csv,
    Rest,
}

impl From<CliSourceKind> for SourceKind {
    fn from(kind: CliSourceKind) -> Self {
        match kind {
            CliSourceKind::Csv => SourceKind::Csv,
            CliSourceKind::Rest => SourceKind::Rest,
        }
    }
}

/// Sort direction.
#[derive(Clone, Copy, Debug, ValueEnum)]
pub(crate) enum SortDirection {
    Asc,
    Desc,
}

impl From<SortDirection> for Direction {
    fn from(dir: SortDirection) -> Self {
        match dir {
            SortDirection::Asc => Direction::Asc,
            SortDirection::Desc => Direction::Desc,
        }
    }
}

/// Sort key for the actors list.
#[derive(Clone, Copy, Debug, ValueEnum)]
pub(crate) enum ActorSort {
    Name,
    Age,
}

/// Sort key for the plays list.
#[derive(Clone, Copy, Debug, ValueEnum)]
pub(crate) enum PlaySort {
    Title,
    Genre,
}

/// Top-level CLI subcommands.
#[derive(Subcommand)]
pub(crate) enum Command {
    /// List actors.
    Actors {
        /// Name substring to search for (case-insensitive).
        #[arg(short, long)]
        query: Option<String>,

        /// Only actors with this gender.
        #[arg(long)]
        gender: Option<String>,

        /// Sort key.
        #[arg(long, value_enum, default_value = "name")]
        sort: ActorSort,

        /// Sort direction.
        #[arg(long, value_enum, default_value = "asc")]
        direction: SortDirection,
    },

    /// Show one actor and the characters they play.
    Actor {
        /// Actor id.
        id: String,

        /// Filter the character list by character or play title.
        #[arg(short, long)]
        query: Option<String>,
    },

    /// List plays.
    Plays {
        /// Title substring to search for (case-insensitive).
        #[arg(short, long)]
        query: Option<String>,

        /// Only plays with this genre.
        #[arg(long)]
        genre: Option<String>,

        /// Only plays with this format.
        #[arg(long)]
        format: Option<String>,

        /// Sort key.
        #[arg(long, value_enum, default_value = "title")]
        sort: PlaySort,

        /// Sort direction.
        #[arg(long, value_enum, default_value = "asc")]
        direction: SortDirection,
    },

    /// Show one play and its cast.
    Play {
        /// Play id.
        id: String,

        /// Filter the cast by character or actor name.
        #[arg(short, long)]
        query: Option<String>,
    },

    /// Show one character with its actor and play.
    Character {
        /// Character id.
        id: String,
    },

    /// Configuration management.
    Config {
        /// Config subcommand.
        #[command(subcommand)]
        action: ConfigAction,
    },
}

/// Config subcommands.
#[derive(Subcommand)]
pub(crate) enum ConfigAction {
    /// Initialize config file with defaults.
    Init,
    /// Show resolved configuration.
    Show,
}

// ---------------------------------------------------------------------------
// Tracing setup
// ---------------------------------------------------------------------------

/// Initialize tracing based on CLI flags.
pub(crate) fn init_tracing(cli: &Cli) {
    use tracing_subscriber::{EnvFilter, fmt};

    let filter = match cli.verbose {
        0 => "stagedoor=info",
        1 => "stagedoor=debug",
        _ => "stagedoor=trace",
    };

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter));

    match cli.log_format {
        LogFormat::Text => {
            fmt()
                .with_env_filter(env_filter)
                .with_target(false)
                .init();
        }
        LogFormat::Json => {
            fmt().json().with_env_filter(env_filter).init();
        }
    }
}

// ---------------------------------------------------------------------------
// Command dispatch
// ---------------------------------------------------------------------------

/// Run the CLI command.
pub(crate) async fn run(cli: Cli) -> Result<()> {
    let config = load_config()?;
    let source = SourceConfig::resolve(
        &config,
        cli.source.map(SourceKind::from),
        cli.api_base.as_deref(),
        cli.data.as_deref(),
    );

    match cli.command {
        Command::Actors {
            query,
            gender,
            sort,
            direction,
        } => cmd_actors(&source, cli.json, query.as_deref(), gender, sort, direction).await,
        Command::Actor { id, query } => cmd_actor(&source, cli.json, &id, query.as_deref()).await,
        Command::Plays {
            query,
            genre,
            format,
            sort,
            direction,
        } => cmd_plays(&source, cli.json, query.as_deref(), genre, format, sort, direction).await,
        Command::Play { id, query } => cmd_play(&source, cli.json, &id, query.as_deref()).await,
        Command::Character { id } => cmd_character(&source, cli.json, &id).await,
        Command::Config { action } => match action {
            ConfigAction::Init => cmd_config_init(),
            ConfigAction::Show => cmd_config_show(&source),
        },
    }
}

// ---------------------------------------------------------------------------
// Backend loading
// ---------------------------------------------------------------------------

/// A page's data backend: the REST API, or CSV tables joined locally.
enum Backend {
    Rest(RestSource),
    Csv(Catalog),
}

/// Build the backend for this invocation, loading CSV tables under a
/// spinner when needed.
async fn load_backend(source: &SourceConfig) -> Result<Backend> {
    match source.kind {
        SourceKind::Rest => Ok(Backend::Rest(RestSource::new(&source.api_base_url)?)),
        SourceKind::Csv => {
            let spinner = loading_spinner("Loading catalog tables");
            let result = CsvSource::new(&source.data_location)?.load().await;
            spinner.finish_and_clear();

            let tables = result?;
            Ok(Backend::Csv(Catalog::new(
                tables.actors,
                tables.characters,
                tables.plays,
            )))
        }
    }
}

/// Spinner shown while data loads.
fn loading_spinner(msg: &str) -> ProgressBar {
    let spinner = ProgressBar::new_spinner();
    spinner.set_style(
        ProgressStyle::with_template("{spinner:.cyan} {msg}")
            .expect("spinner template")
            .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"]),
    );
    spinner.enable_steady_tick(std::time::Duration::from_millis(80));
    spinner.set_message(msg.to_string());
    spinner
}

fn parse_id<T: std::str::FromStr>(raw: &str) -> Result<T>
where
    T::Err: std::fmt::Display,
{
    raw.parse::<T>().map_err(|e| eyre!("{e}"))
}

// ---------------------------------------------------------------------------
// Command handlers
// ---------------------------------------------------------------------------

async fn cmd_actors(
    source: &SourceConfig,
    json: bool,
    query: Option<&str>,
    gender: Option<String>,
    sort: ActorSort,
    direction: SortDirection,
) -> Result<()> {
    let shorts: Vec<ActorShort> = match load_backend(source).await? {
        Backend::Rest(rest) => {
            let spinner = loading_spinner("Fetching actors");
            let result = rest.actors().await;
            spinner.finish_and_clear();
            result?
        }
        Backend::Csv(catalog) => catalog.actor_shorts(),
    };

    let mut view = View::of(&shorts).search(query.unwrap_or(""), |a| vec![a.full_name()]);
    if let Some(gender) = gender {
        view = view.filter(move |a| category_eq(a.gender.as_deref(), &gender));
    }
    view = match sort {
        ActorSort::Name => view.order_by(|a, b| a.full_name().cmp(&b.full_name()), direction.into()),
        ActorSort::Age => view.order_by(|a, b| a.age.cmp(&b.age), direction.into()),
    };
    let visible = view.collect();

    info!(total = shorts.len(), visible = visible.len(), "actors listed");

    if json {
        println!("{}", serde_json::to_string_pretty(&visible)?);
        return Ok(());
    }

    println!();
    println!("  Actors ({} of {})", visible.len(), shorts.len());
    println!();
    for actor in visible {
        render_actor_card(actor);
    }
    Ok(())
}

async fn cmd_actor(
    source: &SourceConfig,
    json: bool,
    id: &str,
    query: Option<&str>,
) -> Result<()> {
    let id: ActorId = parse_id(id)?;

    let detail: ActorDetail = match load_backend(source).await? {
        Backend::Rest(rest) => {
            let spinner = loading_spinner("Fetching actor");
            let result = rest.actor(id).await;
            spinner.finish_and_clear();
            result?
        }
        Backend::Csv(catalog) => catalog.actor_detail(id)?,
    };

    let visible = View::of(&detail.characters)
        .search(query.unwrap_or(""), |c| {
            let mut fields = vec![c.name.clone()];
            fields.extend(c.play_title.clone());
            fields
        })
        .collect();

    if json {
        println!("{}", serde_json::to_string_pretty(&detail)?);
        return Ok(());
    }

    let actor = &detail.actor;
    println!();
    println!("  {}  (#{})", actor.full_name(), actor.actor_id);
    if let Some(dob) = actor.dob {
        println!("  Born:  {dob}");
    }
    if let Some(age) = actor.age {
        println!("  Age:   {age}");
    }
    print_field("Gender", actor.gender.as_deref());
    print_field("Skin", actor.skin_color.as_deref());
    print_field("Eyes", actor.eye_color.as_deref());
    print_field("Hair", actor.hair_color.as_deref());
    println!();
    println!(
        "  Characters (showing {} of {})",
        visible.len(),
        detail.characters.len()
    );
    for entry in visible {
        let play = entry
            .play_title
            .as_deref()
            .map(|t| match entry.play_format.as_deref() {
                Some(f) => format!("{t} - {f}"),
                None => t.to_string(),
            })
            .unwrap_or_else(|| "(no play)".into());
        let badge = if entry.principal { "  [principal]" } else { "" };
        println!("    #{:<4} {:<24} {play}{badge}", entry.character_id, entry.name);
    }
    println!();
    Ok(())
}

async fn cmd_plays(
    source: &SourceConfig,
    json: bool,
    query: Option<&str>,
    genre: Option<String>,
    format: Option<String>,
    sort: PlaySort,
    direction: SortDirection,
) -> Result<()> {
    let shorts: Vec<PlayShort> = match load_backend(source).await? {
        Backend::Rest(rest) => {
            let spinner = loading_spinner("Fetching plays");
            let result = rest.plays().await;
            spinner.finish_and_clear();
            result?
        }
        Backend::Csv(catalog) => catalog.play_shorts(),
    };

    let mut view = View::of(&shorts).search(query.unwrap_or(""), |p| vec![p.title.clone()]);
    if let Some(genre) = genre {
        view = view.filter(move |p| category_eq(p.genre.as_deref(), &genre));
    }
    if let Some(format) = format {
        view = view.filter(move |p| category_eq(p.format.as_deref(), &format));
    }
    view = match sort {
        PlaySort::Title => view.order_by(|a, b| a.title.cmp(&b.title), direction.into()),
        PlaySort::Genre => view.order_by(|a, b| a.genre.cmp(&b.genre), direction.into()),
    };
    let visible = view.collect();

    info!(total = shorts.len(), visible = visible.len(), "plays listed");

    if json {
        println!("{}", serde_json::to_string_pretty(&visible)?);
        return Ok(());
    }

    println!();
    println!("  Plays ({} of {})", visible.len(), shorts.len());
    println!();
    for play in visible {
        let line = [play.format.as_deref(), play.genre.as_deref()]
            .into_iter()
            .flatten()
            .collect::<Vec<_>>()
            .join(" · ");
        println!("  #{:<4} {}", play.play_id, play.title);
        if !line.is_empty() {
            println!("        {line}");
        }
        println!("        {} Characters", play.character_count);
        println!();
    }
    Ok(())
}

async fn cmd_play(source: &SourceConfig, json: bool, id: &str, query: Option<&str>) -> Result<()> {
    let id: PlayId = parse_id(id)?;

    let detail: PlayDetail = match load_backend(source).await? {
        // The theater API has no play detail endpoint; the original site
        // served this page from the CSV files.
        Backend::Rest(_) => {
            return Err(eyre!(
                "play details are not served by the REST API; use --source csv"
            ));
        }
        Backend::Csv(catalog) => catalog.play_detail(id)?,
    };

    let visible = View::of(&detail.characters)
        .search(query.unwrap_or(""), |c| {
            let mut fields = vec![c.name.clone()];
            fields.extend(c.actor.as_ref().map(|a| a.full_name()));
            fields
        })
        .collect();

    if json {
        println!("{}", serde_json::to_string_pretty(&detail)?);
        return Ok(());
    }

    let play = &detail.play;
    println!();
    println!("  {}  (#{})", play.title, play.play_id);
    let line = [play.format.as_deref(), play.genre.as_deref()]
        .into_iter()
        .flatten()
        .collect::<Vec<_>>()
        .join(" · ");
    if !line.is_empty() {
        println!("  {line}");
    }
    if let Some(description) = &play.description {
        println!();
        println!("  {description}");
    }
    print_field("Script", play.script_link.as_deref());
    println!();
    println!(
        "  Characters (showing {} of {})",
        visible.len(),
        detail.characters.len()
    );
    for entry in visible {
        let actor = entry
            .actor
            .as_ref()
            .map(|a| a.full_name())
            .unwrap_or_else(|| "(unassigned)".into());
        let badge = if entry.principal { "  [principal]" } else { "" };
        println!("    #{:<4} {:<24} {actor}{badge}", entry.character_id, entry.name);
    }
    println!();
    Ok(())
}

async fn cmd_character(source: &SourceConfig, json: bool, id: &str) -> Result<()> {
    let id: CharacterId = parse_id(id)?;

    let detail: CharacterDetail = match load_backend(source).await? {
        Backend::Rest(rest) => {
            let spinner = loading_spinner("Fetching character");
            let result = rest.character(id).await;
            spinner.finish_and_clear();
            result?
        }
        Backend::Csv(catalog) => catalog.character_detail(id)?,
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&detail)?);
        return Ok(());
    }

    let character = &detail.character;
    println!();
    println!("  {}  (#{})", character.name, character.character_id);
    if character.principal {
        println!("  Principal role");
    }
    print_field("Age", character.age.as_deref());
    print_field("Gender", character.gender.as_deref());
    if let Some(description) = &character.description {
        println!();
        println!("  {description}");
    }
    println!();
    match &detail.actor {
        Some(actor) => println!("  Played by: {} (#{})", actor.full_name(), actor.actor_id),
        None => println!("  Played by: (unassigned)"),
    }
    match &detail.play {
        Some(play) => println!("  Appears in: {} (#{})", play.title, play.play_id),
        None => println!("  Appears in: (no play)"),
    }
    println!();
    Ok(())
}

fn cmd_config_init() -> Result<()> {
    let path = init_config()?;
    println!("Wrote default config to {}", path.display());
    Ok(())
}

fn cmd_config_show(source: &SourceConfig) -> Result<()> {
    let path = config_file_path()?;
    let config = load_config()?;

    println!("Config file: {}", path.display());
    println!();
    println!("{}", toml::to_string_pretty(&config)?);
    println!("Resolved (after env and flags):");
    println!("  kind:          {:?}", source.kind);
    println!("  api_base_url:  {}", source.api_base_url);
    println!("  data_location: {}", source.data_location);
    Ok(())
}

fn render_actor_card(actor: &ActorShort) {
    println!("  #{:<4} {}", actor.actor_id, actor.full_name());
    let line = [
        actor.age.map(|a| format!("{a} years")),
        actor.gender.clone(),
    ]
    .into_iter()
    .flatten()
    .collect::<Vec<_>>()
    .join(" · ");
    if !line.is_empty() {
        println!("        {line}");
    }
    println!(
        "        {} Characters ({} principal)",
        actor.character_count, actor.principal_count
    );
    println!();
}

fn print_field(label: &str, value: Option<&str>) {
    if let Some(value) = value {
        println!("  {label}: {value}");
    }
}
