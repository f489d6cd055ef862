mod console;
mod settings;

use clap::{ArgAction, Parser, ValueEnum};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;
use web_adapter::{
    AppleArcadeCatalog, GogWishlist, HttpClient, HttpSettings, PcGamingWikiCatalog,
    StadiaCatalog, SteamWishlist,
};
use wishlist_core::application::OverlapServiceImpl;
use wishlist_core::ports::{CatalogSource, ReportWriter, WishlistSource};
use wishlist_core::{Error, WishlistPlatform};

use settings::{AppConfig, ServiceConfig};
use console::{ConsoleReportWriter, JsonReportWriter};
use markdown_adapter::MarkdownWriterAdapter;

/// Check a public Steam or GOG wishlist for games on subscription services
#[derive(Parser, Debug)]
#[command(name = "wishlist-overlap", version)]
#[command(
    about = "Check a public Steam or GOG wishlist for games on Apple Arcade, EA Play, Stadia, Ubisoft+, and Xbox Game Pass",
    after_help = "Title-only catalogs (Apple Arcade, Stadia) are matched on exact titles and can miss games listed under a different name."
)]
struct Cli {
    /// Public Steam or GOG wishlist URL
    #[arg(required_unless_present = "list_services")]
    url: Option<String>,

    /// Output format
    #[arg(short = 'f', long, value_enum, default_value_t = OutputFormat::Text)]
    format: OutputFormat,

    /// Folder for the markdown report (implies a markdown report)
    #[arg(short = 'o', long = "output-dir")]
    output_dir: Option<PathBuf>,

    /// Config file (defaults to ./wishlist-overlap.toml when present)
    #[arg(short = 'c', long)]
    config: Option<PathBuf>,

    /// Only check the named service; repeatable
    #[arg(short = 's', long = "service")]
    services: Vec<String>,

    /// Stop at the first catalog that cannot be loaded
    #[arg(long)]
    fail_fast: bool,

    /// Raise log verbosity (-v info, -vv debug)
    #[arg(short = 'v', long = "verbose", action = ArgAction::Count)]
    verbose: u8,

    /// Print the configured service names and exit
    #[arg(long)]
    list_services: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Text,
    Json,
    Markdown,
}

fn main() {
    let cli = Cli::parse();

    let config = match AppConfig::load(cli.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error loading configuration: {:#}", e);
            std::process::exit(1);
        }
    };
    init_tracing(&config.log_level, cli.verbose);
    warn_if_no_services(&config);

    if cli.list_services {
        for service in &config.services {
            println!("{}", service.name());
        }
        return;
    }

    std::process::exit(exit_code(&run(&cli, &config)));
}

/// Prints the outcome of a run and maps it to a process exit code.
/// An empty wishlist is an answer, not a failure.
fn exit_code(result: &Result<(), RunError>) -> i32 {
    match result {
        Ok(()) => 0,
        Err(RunError::Overlap(Error::EmptyWishlist { platform })) => {
            println!("{} wishlist is empty.", platform);
            0
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            1
        }
    }
}

/// Must run after `init_tracing`, or the warning has nowhere to go.
fn warn_if_no_services(config: &AppConfig) -> bool {
    let empty = config.services.is_empty();
    if empty {
        tracing::warn!("No services configured, nothing will be checked");
    }
    empty
}

#[derive(Debug)]
enum RunError {
    Overlap(Error),
    Setup(anyhow::Error),
}

impl std::fmt::Display for RunError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RunError::Overlap(e) => write!(f, "{}", e),
            RunError::Setup(e) => write!(f, "{:#}", e),
        }
    }
}

impl From<Error> for RunError {
    fn from(e: Error) -> Self {
        RunError::Overlap(e)
    }
}

impl From<anyhow::Error> for RunError {
    fn from(e: anyhow::Error) -> Self {
        RunError::Setup(e)
    }
}

fn run(cli: &Cli, config: &AppConfig) -> Result<(), RunError> {
    let url = cli
        .url
        .as_deref()
        .ok_or_else(|| anyhow::anyhow!("a wishlist URL is required"))?;
    let platform = WishlistPlatform::from_url(url)?;
    let services = config.select_services(&cli.services)?;
    let settings = config.http_settings();

    // Instantiate concrete implementations of secondary adapters
    let wishlist_source = build_wishlist_source(platform, url, &settings, config)?;
    let catalog_sources = build_catalog_sources(&services, platform, &settings, config)?;
    let report_writers = build_report_writers(cli);

    eprintln!("processing, this will take a few seconds");

    // Instantiate the core business service with dependency injection
    let service = OverlapServiceImpl::new(wishlist_source, catalog_sources, report_writers)
        .with_fail_fast(cli.fail_fast || config.fail_fast);
    service.execute()?;
    Ok(())
}

fn build_wishlist_source(
    platform: WishlistPlatform,
    url: &str,
    settings: &HttpSettings,
    config: &AppConfig,
) -> Result<Box<dyn WishlistSource>, Error> {
    let source: Box<dyn WishlistSource> = match platform {
        // A private or unknown Steam profile answers with a redirect
        WishlistPlatform::Steam => {
            Box::new(SteamWishlist::new(HttpClient::without_redirects(settings)?, url))
        }
        // The wishlist page may redirect to its canonical URL; the JSON
        // search must not, a redirect there means the wishlist is private
        WishlistPlatform::Gog => Box::new(
            GogWishlist::new(
                HttpClient::new(settings)?,
                HttpClient::without_redirects(settings)?,
                url,
            )
            .with_embed_base(&config.gog_embed_base),
        ),
    };
    Ok(source)
}

fn build_catalog_sources(
    services: &[ServiceConfig],
    platform: WishlistPlatform,
    settings: &HttpSettings,
    config: &AppConfig,
) -> Result<Vec<Box<dyn CatalogSource>>, Error> {
    let client = HttpClient::new(settings)?;
    Ok(services
        .iter()
        .map(|service| -> Box<dyn CatalogSource> {
            match service {
                ServiceConfig::PcGamingWiki { name, condition } => Box::new(
                    PcGamingWikiCatalog::new(client.clone(), name.as_str(), condition.as_str(), platform)
                        .with_endpoint(&config.pcgamingwiki_endpoint),
                ),
                ServiceConfig::Stadia { name, url } => {
                    Box::new(StadiaCatalog::new(client.clone(), name.as_str(), url.as_str()))
                }
                ServiceConfig::AppleArcade { name, url } => {
                    Box::new(AppleArcadeCatalog::new(client.clone(), name.as_str(), url.as_str()))
                }
            }
        })
        .collect())
}

fn build_report_writers(cli: &Cli) -> Vec<Box<dyn ReportWriter>> {
    let mut writers: Vec<Box<dyn ReportWriter>> = Vec::new();
    match cli.format {
        OutputFormat::Text => writers.push(Box::new(ConsoleReportWriter)),
        OutputFormat::Json => writers.push(Box::new(JsonReportWriter)),
        OutputFormat::Markdown => {}
    }
    if cli.format == OutputFormat::Markdown || cli.output_dir.is_some() {
        let folder = cli.output_dir.clone().unwrap_or_else(|| PathBuf::from("."));
        writers.push(Box::new(MarkdownWriterAdapter::new(folder)));
    }
    writers
}

fn init_tracing(level: &str, verbose: u8) {
    let level = match verbose {
        0 => level,
        1 => "info",
        _ => "debug",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_cli_parses_flags() {
        let cli = Cli::try_parse_from([
            "wishlist-overlap",
            "https://store.steampowered.com/wishlist/id/ezekiel_iii",
            "--format",
            "json",
            "-s",
            "Stadia",
            "-s",
            "EA Play",
            "-vv",
        ])
        .unwrap();
        assert_eq!(cli.format, OutputFormat::Json);
        assert_eq!(cli.services, vec!["Stadia", "EA Play"]);
        assert_eq!(cli.verbose, 2);
        assert!(!cli.fail_fast);
    }

    #[test]
    fn test_cli_url_required() {
        assert!(Cli::try_parse_from(["wishlist-overlap"]).is_err());
        assert!(Cli::try_parse_from(["wishlist-overlap", "--list-services"]).is_ok());
    }

    #[test]
    fn test_report_writers_for_format() {
        let cli = Cli::try_parse_from(["wishlist-overlap", "u"]).unwrap();
        assert_eq!(build_report_writers(&cli).len(), 1);

        let cli = Cli::try_parse_from(["wishlist-overlap", "u", "-o", "reports"]).unwrap();
        assert_eq!(build_report_writers(&cli).len(), 2);

        let cli = Cli::try_parse_from(["wishlist-overlap", "u", "-f", "markdown"]).unwrap();
        assert_eq!(build_report_writers(&cli).len(), 1);
    }

    #[test]
    fn test_run_rejects_unsupported_url() {
        let cli = Cli::try_parse_from(["wishlist-overlap", "https://example.com/wishlist"]).unwrap();
        match run(&cli, &AppConfig::default()) {
            Err(RunError::Overlap(Error::UnsupportedUrl(url))) => {
                assert_eq!(url, "https://example.com/wishlist")
            }
            other => panic!("expected unsupported url, got {other:?}"),
        }
    }

    #[test]
    fn test_run_rejects_unknown_service() {
        let cli = Cli::try_parse_from([
            "wishlist-overlap",
            "https://www.gog.com/u/someone/wishlist",
            "-s",
            "Netflix",
        ])
        .unwrap();
        assert!(matches!(run(&cli, &AppConfig::default()), Err(RunError::Setup(_))));
    }

    #[test]
    fn test_exit_code_empty_wishlist_is_success() {
        let result = Err(RunError::Overlap(Error::EmptyWishlist {
            platform: "Steam".into(),
        }));
        assert_eq!(exit_code(&result), 0);
        assert_eq!(exit_code(&Ok(())), 0);
    }

    #[test]
    fn test_exit_code_failures() {
        let unsupported = Err(RunError::Overlap(Error::UnsupportedUrl(
            "https://example.com/wishlist".into(),
        )));
        assert_eq!(exit_code(&unsupported), 1);

        let unavailable = Err(RunError::Overlap(Error::unavailable(
            "Steam wishlist",
            "HTTP 302",
        )));
        assert_eq!(exit_code(&unavailable), 1);

        let setup = Err(RunError::Setup(anyhow::anyhow!("unknown service 'Netflix'")));
        assert_eq!(exit_code(&setup), 1);
    }

    #[test]
    fn test_exit_code_for_unsupported_url_run() {
        let cli = Cli::try_parse_from(["wishlist-overlap", "https://example.com/wishlist"]).unwrap();
        assert_eq!(exit_code(&run(&cli, &AppConfig::default())), 1);
    }

    #[test]
    fn test_warn_if_no_services() {
        let mut config = AppConfig::default();
        assert!(!warn_if_no_services(&config));
        config.services.clear();
        assert!(warn_if_no_services(&config));
    }

    #[test]
    fn test_wishlist_source_per_platform() {
        let config = AppConfig::default();
        let settings = config.http_settings();
        let gog = build_wishlist_source(
            WishlistPlatform::Gog,
            "https://www.gog.com/u/someone/wishlist",
            &settings,
            &config,
        )
        .unwrap();
        assert_eq!(gog.platform(), WishlistPlatform::Gog);
    }

    #[test]
    fn test_catalog_sources_follow_config() {
        let config = AppConfig::default();
        let sources = build_catalog_sources(
            &config.services,
            WishlistPlatform::Steam,
            &config.http_settings(),
            &config,
        )
        .unwrap();
        let names: Vec<&str> = sources.iter().map(|s| s.service_name()).collect();
        let expected: Vec<&str> = config.services.iter().map(ServiceConfig::name).collect();
        assert_eq!(names, expected);
    }
}
