mod config;
mod model;
mod render;

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use listfetch_engine::{ListController, PageFetcher, ReqwestPageFetcher};
use listfetch_logging::listfetch_info;
use log::LevelFilter;
use tokio::runtime::Handle;

use crate::config::{load_config, DEFAULT_CONFIG_FILE};
use crate::model::{Character, StatusFilter};
use crate::render::TerminalView;

/// Browse a paginated, filterable remote character list.
#[derive(Debug, Parser)]
#[command(name = "listfetch", version)]
struct Args {
    /// RON config file; defaults apply when it does not exist.
    #[arg(long, default_value = DEFAULT_CONFIG_FILE)]
    config: PathBuf,
    /// Status filter, overriding the config.
    #[arg(long, value_enum)]
    filter: Option<StatusFilter>,
    /// Number of pages to load, overriding the config.
    #[arg(long)]
    pages: Option<u32>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    let mut config = load_config(&args.config)
        .with_context(|| format!("loading config from {}", args.config.display()))?;
    if args.filter.is_some() {
        config.filter = args.filter;
    }
    if let Some(pages) = args.pages {
        config.pages = pages;
    }

    let level = if config.verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };
    listfetch_logging::initialize(config.log.into(), level);
    listfetch_info!("Browsing {} filter={:?}", config.base_url, config.filter);

    let fetcher = ReqwestPageFetcher::<Character>::new(config.endpoint(), config.fetch_settings())
        .context("building HTTP client")?;
    let fetcher: Arc<dyn PageFetcher<Character, StatusFilter>> = Arc::new(fetcher);
    let mut controller = ListController::new(fetcher, Handle::current());

    browse(&mut controller, config.filter, config.pages).await;
    controller.shutdown();
    Ok(())
}

/// Loads pages until `pages` is reached, a fetch fails or a page comes back empty.
async fn browse(
    controller: &mut ListController<Character, StatusFilter>,
    filter: Option<StatusFilter>,
    pages: u32,
) {
    let mut terminal = TerminalView::default();
    match filter {
        Some(_) => controller.set_filter(filter),
        None => controller.reset(),
    }

    let mut seen = 0;
    loop {
        controller.settle().await;
        if controller.consume_dirty() {
            for line in terminal.render(&controller.view()) {
                println!("{line}");
            }
        }

        let loaded = controller.items().len();
        if controller.error().is_some() || controller.page() >= pages || loaded == seen {
            break;
        }
        seen = loaded;
        controller.load_more();
    }
}
