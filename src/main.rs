use std::path::PathBuf;

use anyhow::{bail, Context};
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use cs2multisell::{
    browser::{collector::InventoryCollector, steamcommunity::SteamCommunity},
    config::Config,
    models::inventory::{AggregatedItem, LoadSummary, SteamId},
    parsing::{
        aggregate::{aggregate_retrieval, filter_by_name},
        multisell_url::{build_multisell_url, entries_from_selection, MultisellEntry},
        steamid::detect_steamid_from_url,
    },
    prefs::{PreferenceStore, SqlitePreferences},
    status::{Severity, StatusReporter, TracingStatus},
};

#[derive(Debug, Parser)]
#[command(name = "cs2multisell", version, about = "List tradable CS2 commodities in a Steam inventory and build multisell links for them")]
struct Cli {
    /// TOML config file, defaults to ./cs2multisell.toml when present
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Load an inventory and list its tradable commodities
    Load {
        /// SteamID64, falls back to the last one used
        #[arg(long)]
        steamid: Option<String>,
        /// Take the SteamID64 from a steamcommunity.com/profiles/... url instead
        #[arg(long, conflicts_with = "steamid")]
        from_url: Option<String>,
        /// Only show items whose name contains this (case insensitive)
        #[arg(long)]
        filter: Option<String>,
        /// Print the items as JSON
        #[arg(long)]
        json: bool,
        /// Also print a multisell link for every listed item
        #[arg(long)]
        link: bool,
        /// steamLoginSecure cookie, overrides the config file
        #[arg(long, env = "STEAM_LOGIN_SECURE", hide_env_values = true)]
        login_secure: Option<String>,
    },
    /// Build a multisell link. `Name Tag=3` sets a quantity, plain names get 0
    Link {
        #[arg(required = true)]
        items: Vec<String>,
    },
    /// Find the SteamID64 in a profile url and remember it
    Detect {
        url: String,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let config = Config::load(cli.config.as_deref())?;
    init_tracing(config.log_level.as_deref());
    config.validate()?;

    match cli.command {
        Command::Load { steamid, from_url, filter, json, link, login_secure } => {
            let prefs = SqlitePreferences::open(&config.prefs_path)
                .with_context(|| format!("Couldn't open preferences at {:?}", config.prefs_path))?;

            let steamid = resolve_steamid(steamid.as_deref(), from_url.as_deref(), &prefs)?;
            prefs.remember_steamid(&steamid)?;

            let login_secure = login_secure.or_else(|| config.steam.login_secure.clone());
            let steam = SteamCommunity::new(login_secure.as_deref())?;
            let collector = InventoryCollector::new(steam, TracingStatus, config.collector_settings());

            // Failures go back to main and get printed there, once
            let result = collector.collect(&steamid).await?;

            let mut summary = LoadSummary {
                unique_items: 0,
                assets: result.assets.len(),
                page_size_used: result.page_size_used,
                partial: result.partial,
            };
            let items = aggregate_retrieval(result);
            summary.unique_items = items.len();
            TracingStatus.report(Severity::Ok, &summary.to_string());

            let shown = filter_by_name(&items, filter.as_deref().unwrap_or(""));
            if shown.is_empty() {
                TracingStatus.report(Severity::Muted, "No items match your filter.");
            }

            if json {
                println!("{}", serde_json::to_string_pretty(&shown)?);
            } else {
                print_items(&shown);
            }

            if link && !shown.is_empty() {
                let entries = entries_from_selection(shown.iter().map(|i| i.name.as_str()));
                println!("\n{}", build_multisell_url(&entries));
            }
        }
        Command::Link { items } => {
            let entries: Vec<MultisellEntry> = items.iter()
                .filter_map(|i| i.parse().ok())
                .collect();
            println!("{}", build_multisell_url(&entries));
        }
        Command::Detect { url } => {
            let Some(steamid) = detect_steamid_from_url(&url) else {
                bail!("Couldn't detect SteamID64 from {}. Use one like steamcommunity.com/profiles/<steamid64>/ …", url);
            };

            let prefs = SqlitePreferences::open(&config.prefs_path)?;
            prefs.remember_steamid(&steamid)?;
            TracingStatus.report(Severity::Ok, &format!("Detected SteamID64 from url: {}", steamid));
            println!("{}", steamid);
        }
    }

    Ok(())
}

fn init_tracing(log_level: Option<&str>) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(log_level.unwrap_or("info")));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

///Explicit id first, then one found in a url, then whatever was used last time.
fn resolve_steamid(
    explicit: Option<&str>,
    from_url: Option<&str>,
    prefs: &impl PreferenceStore,
) -> anyhow::Result<SteamId> {
    if let Some(input) = explicit {
        return Ok( SteamId::parse(input)? );
    }

    if let Some(url) = from_url {
        return detect_steamid_from_url(url)
            .with_context(|| format!("Couldn't detect SteamID64 from {}", url));
    }

    match prefs.last_steamid()? {
        Some(id) => Ok(id),
        None => bail!("Enter a SteamID64 with --steamid (or use --from-url) then load again."),
    }
}

fn print_items(items: &[&AggregatedItem]) {
    for item in items {
        println!("x{:<6} {}  ({})", item.total_quantity, item.name, item.flags());
    }
}
