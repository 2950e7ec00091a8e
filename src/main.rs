use std::{path::Path, process::ExitCode};

use anyhow::Result;
use clap::Parser;
use futures::future::join_all;

use healthlink_search::{
    SearchSession, SearchState,
    cli::CliArgs,
    config::{Config, load_config},
    core::SearchFilter,
    display,
    engines::{HealthLink, ImageSearchEngine},
    files::ImageUpload,
};

/// Search with one image; returns whether it succeeded.
async fn search_image(
    engine: &dyn ImageSearchEngine,
    path: &Path,
    filter: &SearchFilter,
    config: &Config,
) -> Result<bool> {
    let upload = match ImageUpload::from_path(path).await {
        Ok(upload) => upload,
        Err(err) => {
            log::error!("Cannot load {}: {}", path.display(), err);
            println!("{}: {}", path.display(), err);
            return Ok(false);
        }
    };

    let session = SearchSession::new();
    let ok = match session.run(engine, &upload, filter).await {
        Some(SearchState::Searched { products, .. }) => {
            let rendered = display::render(&products, config.format())?;
            println!("{}:\n{}", path.display(), rendered);
            true
        }
        Some(SearchState::Failed { message, .. }) => {
            println!("{}: search failed: {}", path.display(), message);
            false
        }
        state => {
            log::warn!("Search for {} ended in state {:?}", path.display(), state);
            false
        }
    };

    Ok(ok)
}

async fn run(args: CliArgs) -> Result<bool> {
    let config = load_config(&args)?;
    let engine = HealthLink::new(&config.api)?;
    let filter = config.search_filter();

    log::info!(
        "Searching {} image(s) against {}",
        args.images.len(),
        engine.endpoint()
    );

    let results = join_all(
        args.images
            .iter()
            .map(|path| search_image(&engine, path, &filter, &config)),
    )
    .await;

    let mut all_ok = true;
    for result in results {
        all_ok &= result?;
    }

    Ok(all_ok)
}

#[tokio::main]
async fn main() -> ExitCode {
    pretty_env_logger::init();
    let args = CliArgs::parse();

    match run(args).await {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(err) => {
            log::error!("{:#}", err);
            eprintln!("Error: {:#}", err);
            ExitCode::FAILURE
        }
    }
}
