use clap::{Parser, Subcommand};
use ghsearch_core::providers::{CodeSearch, RepositorySearch, TrendingSource};
use ghsearch_core::{
    fetch_all_ranges, resolve_token, CodeMatch, Config, DateRange, PageFetcher, Repository,
    SearchKind, SearchSettings, TrendSettings, TrendingLanguage, TrendingRepository,
    LAUNCH_STAGGER,
};
use ghsearch_tui::{
    present, run_with_progress, PresentationMode, Session, SessionEnd, SessionOptions, StatusLine,
};
use std::fs::OpenOptions;
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::{Arc, Mutex};
use tracing::{debug, error, info};
use tracing_subscriber::{fmt::writer::BoxMakeWriter, layer::SubscriberExt, util::SubscriberInitExt};

/// Exit status after Ctrl+C, as a shell would report SIGINT
const FORCE_QUIT_STATUS: u8 = 130;

#[derive(Parser)]
#[command(name = "ghsearch")]
#[command(version, about = "Search GitHub and browse trending repositories from the terminal", long_about = None)]
struct Cli {
    /// Config file to use instead of the default location
    #[arg(long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Search repositories (or code with --code)
    Search {
        /// Language qualifier, e.g. go
        #[arg(short, long)]
        lang: Option<String>,

        /// API token
        #[arg(long, env = "GITHUB_TOKEN", hide_env_values = true)]
        token: Option<String>,

        /// Page to start on
        #[arg(short, long, default_value_t = 1, value_parser = clap::value_parser!(u32).range(1..))]
        page: u32,

        /// Search code instead of repositories
        #[arg(long)]
        code: bool,

        /// Print a plain table instead of the interactive browser
        #[arg(long)]
        plain: bool,

        /// Search keywords
        keywords: Vec<String>,
    },
    /// Browse the trending page
    Trend {
        /// Programming languages, comma separated; more than one opens a picker
        #[arg(short, long, value_delimiter = ',')]
        lang: Vec<String>,

        /// Spoken language code, e.g. zh
        #[arg(long)]
        spoken: Option<String>,

        /// daily, weekly or monthly; all three as tabs when omitted
        #[arg(long)]
        since: Option<String>,

        /// Print a plain table instead of the interactive browser
        #[arg(long)]
        plain: bool,
    },
}

fn presentation(plain: bool) -> PresentationMode {
    if plain {
        PresentationMode::Table
    } else {
        PresentationMode::Interactive
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging();

    match run(cli).await {
        Ok(SessionEnd::ForceQuit) => {
            info!("force quit");
            ExitCode::from(FORCE_QUIT_STATUS)
        }
        Ok(end) => {
            info!("session ended: {:?}", end);
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!("{:#}", e);
            eprintln!("Error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}

/// The TUI owns the terminal, so logs go to a file in the cache dir
fn init_logging() {
    let writer = log_file()
        .map(|file| BoxMakeWriter::new(Mutex::new(file)))
        .unwrap_or_else(|| BoxMakeWriter::new(std::io::sink));

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "ghsearch=info".into()),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(writer)
                .with_ansi(false),
        )
        .init();
}

fn log_file() -> Option<std::fs::File> {
    let dir = dirs::cache_dir()?.join("ghsearch");
    std::fs::create_dir_all(&dir).ok()?;
    OpenOptions::new()
        .create(true)
        .append(true)
        .open(dir.join("ghsearch.log"))
        .ok()
}

async fn run(cli: Cli) -> anyhow::Result<SessionEnd> {
    let config = match &cli.config {
        Some(path) => Config::load_from(path)?,
        None => Config::load()?,
    };

    match cli.command {
        Commands::Search {
            lang,
            token,
            page,
            code,
            plain,
            keywords,
        } => {
            let settings = SearchSettings {
                token: resolve_token(token, config.github.token)?,
                api_url: config.github.api_url,
                language: lang.unwrap_or(config.search.language),
                keywords,
                kind: if code {
                    SearchKind::Code
                } else {
                    SearchKind::Repositories
                },
                page,
                per_page: config.search.per_page,
            };
            search(&settings, presentation(plain)).await
        }
        Commands::Trend {
            lang,
            spoken,
            since,
            plain,
        } => {
            // Validate before anything touches the network or the terminal
            let since = since.map(|s| s.parse::<DateRange>()).transpose()?;
            let languages = trend_languages(lang, config.trending.languages);
            let settings = TrendSettings {
                web_url: config.github.web_url,
                language: languages.first().cloned().unwrap_or_default(),
                spoken_language: spoken.unwrap_or(config.trending.spoken_language),
            };
            trend(&settings, &languages, since, presentation(plain)).await
        }
    }
}

async fn search(settings: &SearchSettings, mode: PresentationMode) -> anyhow::Result<SessionEnd> {
    info!(
        "searching {} for '{}' from page {}",
        settings.kind,
        settings.query(),
        settings.page
    );
    let options = SessionOptions {
        page_size: settings.per_page as usize,
        ..SessionOptions::default()
    };

    match settings.kind {
        SearchKind::Repositories => {
            let fetcher: Arc<dyn PageFetcher<Repository>> =
                Arc::new(RepositorySearch::new(settings)?);
            present(
                Session::paged(settings.label(), fetcher, settings.page, options),
                mode,
            )
            .await
        }
        SearchKind::Code => {
            let fetcher: Arc<dyn PageFetcher<CodeMatch>> = Arc::new(CodeSearch::new(settings)?);
            present(
                Session::paged(
                    format!("code {}", settings.label()),
                    fetcher,
                    settings.page,
                    options,
                ),
                mode,
            )
            .await
        }
    }
}

fn trend_title(settings: &TrendSettings) -> String {
    let mut title = String::from("trending");
    if !settings.language.is_empty() {
        title.push_str(&format!(" lang:{}", settings.language));
    }
    if !settings.spoken_language.is_empty() {
        title.push_str(&format!(" spoken:{}", settings.spoken_language));
    }
    title
}

/// `--lang` wins over the config list; never empty, `""` means all languages
fn trend_languages(flag: Vec<String>, config: Vec<String>) -> Vec<String> {
    let languages: Vec<String> = (if flag.is_empty() { config } else { flag })
        .into_iter()
        .map(|l| l.trim().to_string())
        .collect();
    if languages.is_empty() {
        vec![String::new()]
    } else {
        languages
    }
}

fn with_language(settings: &TrendSettings, language: &str) -> TrendSettings {
    TrendSettings {
        language: language.to_string(),
        ..settings.clone()
    }
}

/// Trending for each language in turn, or through the picker when there is a choice.
///
/// Leaving a trending list goes back to the picker; leaving the picker ends the command.
async fn trend(
    settings: &TrendSettings,
    languages: &[String],
    since: Option<DateRange>,
    mode: PresentationMode,
) -> anyhow::Result<SessionEnd> {
    if languages.len() == 1 || mode == PresentationMode::Table {
        let mut end = SessionEnd::Empty;
        for language in languages {
            let settings = with_language(settings, language);
            if languages.len() > 1 {
                println!("{}", trend_title(&settings));
            }
            end = trend_language(&settings, since, mode).await?;
        }
        return Ok(end);
    }

    loop {
        let choices: Vec<TrendingLanguage> = languages
            .iter()
            .map(|l| TrendingLanguage::new(&settings.web_url, l.as_str()))
            .collect();
        let picker = Session::picker("select language", choices, SessionOptions::default());

        let index = match present(picker, PresentationMode::Interactive).await? {
            SessionEnd::Picked(index) => index,
            end => return Ok(end),
        };
        let Some(language) = languages.get(index) else {
            continue;
        };

        match trend_language(&with_language(settings, language), since, mode).await? {
            SessionEnd::ForceQuit => return Ok(SessionEnd::ForceQuit),
            end => debug!("trending {} ended with {:?}, back to the picker", language, end),
        }
    }
}

async fn trend_language(
    settings: &TrendSettings,
    since: Option<DateRange>,
    mode: PresentationMode,
) -> anyhow::Result<SessionEnd> {
    info!("fetching {} for {:?}", trend_title(settings), since);
    let source = TrendingSource::new(settings)?;
    let mut status = StatusLine::stderr();

    let tabs: Vec<(String, Vec<TrendingRepository>)> = match since {
        Some(range) => {
            let rows =
                run_with_progress("loading", async move { source.fetch(range).await }, &mut status)
                    .await?;
            vec![(range.display_name().to_string(), rows)]
        }
        None => run_with_progress(
            "loading",
            async move { fetch_all_ranges(&source, LAUNCH_STAGGER).await },
            &mut status,
        )
        .await?
        .into_iter()
        .map(|(range, rows)| (range.display_name().to_string(), rows))
        .collect(),
    };

    present(
        Session::tabbed(trend_title(settings), tabs, SessionOptions::default()),
        mode,
    )
    .await
}
