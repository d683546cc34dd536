//! services/flashlearn/src/bin/flashlearn.rs

use chrono::Utc;
use flashlearn_core::{ProfileGateway, ProfileService};
use flashlearn_lib::{
    adapters::{FileCache, FileHostProfile},
    config::Config,
    console::{Command, Console},
    error::AppError,
    study::{resolve_launch, Analytics, StudySetStore},
};
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), AppError> {
    // --- 1. Load Configuration & Set Up Logging ---
    let config = Config::from_env()?;
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(config.log_level.to_string()))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
    info!("Configuration loaded. Starting FlashLearn...");

    // --- 2. Initialize the Profile Gateway ---
    let host = config
        .host_dir
        .as_ref()
        .map(|dir| Arc::new(FileHostProfile::new(dir)) as Arc<dyn ProfileService>);
    let gateway = ProfileGateway::connect(&config.activity_id, host).await;
    let profile = gateway.player_profile().await;
    info!(
        "Playing as {} ({}).",
        profile.name.as_deref().unwrap_or("Player"),
        if profile.anonymous { "anonymous" } else { "signed in" }
    );

    // --- 3. Load the Study Set Collection ---
    let cache = Arc::new(FileCache::new(&config.data_dir));
    let mut store = StudySetStore::new(cache, Analytics::new(gateway));
    let count = store.load().await.len();
    info!("{} study sets available.", count);

    // --- 4. Resolve the Launch Route ---
    let mut console = Console::new(store);
    let navigation = resolve_launch(config.launch_url.as_deref().unwrap_or("/"), Utc::now());
    print_lines(console.navigate(navigation).await);

    // --- 5. Console Loop ---
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        if line.trim().is_empty() {
            continue;
        }
        match Command::parse(&line) {
            Ok(Command::Quit) => break,
            Ok(command) => print_lines(console.execute(command).await),
            Err(message) => println!("{}", message),
        }
    }

    print_lines(console.shutdown().await);
    Ok(())
}

fn print_lines(lines: Vec<String>) {
    for line in lines {
        println!("{}", line);
    }
}
