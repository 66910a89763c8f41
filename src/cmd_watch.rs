//! `watch` subcommand: the full suggestion engine on a file-backed page.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use notify::{Event, RecommendedWatcher, RecursiveMode, Watcher};
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::{broadcast, mpsc};
use tracing::{debug, info, warn};

use quizlens_config::{Config, ConfigLoader};
use quizlens_protocols::{KeyValueStore, PageEvent};
use quizlens_session::{
    AnalysisClient, EngineOptions, Hotkey, KeyEvent, ObserverTimings, QuestionObserver,
    SuggestionEngine,
};
use quizlens_store::{FileStore, ResultCache, Settings};

use crate::console::{ConsoleMarkers, ConsolePanel};
use crate::page_file::JsonPageSource;

/// A line typed on stdin while watching.
#[derive(Debug, PartialEq, Eq)]
pub(crate) enum WatchCommand {
    TogglePanel,
    SetEnabled(bool),
    Rescan,
    Quit,
    Empty,
    Unknown(String),
}

/// `p` toggles the panel, as does typing the configured hotkey chord.
pub(crate) fn parse_command(line: &str, hotkey: &Hotkey) -> WatchCommand {
    let line = line.trim();
    match line.to_ascii_lowercase().as_str() {
        "" => WatchCommand::Empty,
        "p" | "panel" => WatchCommand::TogglePanel,
        "on" => WatchCommand::SetEnabled(true),
        "off" => WatchCommand::SetEnabled(false),
        "r" | "rescan" => WatchCommand::Rescan,
        "q" | "quit" | "exit" => WatchCommand::Quit,
        _ => match KeyEvent::from_chord(line) {
            Ok(event) if hotkey.matches(&event) => WatchCommand::TogglePanel,
            _ => WatchCommand::Unknown(line.to_string()),
        },
    }
}

fn print_help(hotkey: &str) {
    println!("Commands: p or {} (toggle panel), on / off (enable suggestions), r (rescan), q (quit)", hotkey);
}

pub(crate) async fn run(config: Config, page_path: PathBuf, proxy_url: Option<String>) -> anyhow::Result<()> {
    let page = Arc::new(JsonPageSource::load(&page_path)?);

    let store_path = ConfigLoader::expand_path(&config.storage.path);
    let store: Arc<dyn KeyValueStore> = Arc::new(FileStore::open(store_path).await?);
    let cache = ResultCache::with_prefix(store.clone(), config.storage.cache_prefix.clone());
    let settings = Settings::new(store);

    let analyzer = Arc::new(AnalysisClient::new(
        proxy_url.or_else(|| config.client.proxy_url.clone()),
    )?);
    let hotkey = Hotkey::parse(&config.client.hotkey)?;
    let markers = Arc::new(ConsoleMarkers::new(page.clone()));
    let panel = Arc::new(ConsolePanel::new(&config.client.hotkey));

    let engine = SuggestionEngine::new(
        page.clone(),
        analyzer,
        cache,
        markers,
        panel,
        EngineOptions::from_config(&config),
    );
    if !settings.ai_enabled().await? {
        engine.set_enabled(false).await;
    }

    let (events_tx, events_rx) = mpsc::channel(64);
    let observer_engine = engine.clone();
    let observer = QuestionObserver::spawn(
        page.clone(),
        events_rx,
        move |element| observer_engine.notify_question(element),
        ObserverTimings::from(&config.client),
    );
    let _watcher = watch_page_file(page.clone(), events_tx.clone())?;
    spawn_settings_listener(&settings, engine.clone());

    info!("Watching {}", page_path.display());
    print_help(&config.client.hotkey);

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        let line = tokio::select! {
            _ = tokio::signal::ctrl_c() => break,
            line = lines.next_line() => line?,
        };
        let Some(line) = line else { break };

        match parse_command(&line, &hotkey) {
            WatchCommand::TogglePanel => engine.toggle_panel(),
            WatchCommand::SetEnabled(enabled) => settings.set_ai_enabled(enabled).await?,
            WatchCommand::Rescan => events_tx.send(PageEvent::Scroll).await?,
            WatchCommand::Quit => break,
            WatchCommand::Empty => {}
            WatchCommand::Unknown(input) => {
                println!("Unknown command: {}", input);
                print_help(&config.client.hotkey);
            }
        }
    }

    observer.dispose();
    engine.settle().await;
    info!("Stopped watching");
    Ok(())
}

/// Store notifications for `aiEnabled` drive the engine, so writes from
/// any process sharing the store take effect here.
fn spawn_settings_listener(settings: &Settings, engine: SuggestionEngine) {
    let mut changes = settings.subscribe();
    tokio::spawn(async move {
        loop {
            match changes.recv().await {
                Ok(change) => {
                    if let Some(enabled) = Settings::ai_enabled_change(&change) {
                        engine.set_enabled(enabled).await;
                    }
                }
                Err(broadcast::error::RecvError::Lagged(skipped)) => {
                    warn!("Missed {} storage notifications", skipped);
                }
                Err(broadcast::error::RecvError::Closed) => break,
            }
        }
    });
}

/// Reload the page description on change and report a mutation.
///
/// The parent directory is watched so editors that replace the file on save
/// are still seen.
fn watch_page_file(
    page: Arc<JsonPageSource>,
    events: mpsc::Sender<PageEvent>,
) -> anyhow::Result<RecommendedWatcher> {
    let (fs_tx, mut fs_rx) = mpsc::channel::<Event>(100);
    let mut watcher = RecommendedWatcher::new(
        move |result: Result<Event, notify::Error>| match result {
            Ok(event) => {
                let _ = fs_tx.blocking_send(event);
            }
            Err(e) => warn!("Page watcher error: {}", e),
        },
        notify::Config::default(),
    )?;

    let path = page.path().to_path_buf();
    let dir = path
        .parent()
        .filter(|parent| !parent.as_os_str().is_empty())
        .unwrap_or(Path::new("."));
    watcher.watch(dir, RecursiveMode::NonRecursive)?;

    let file_name = path.file_name().map(ToOwned::to_owned);
    tokio::spawn(async move {
        while let Some(event) = fs_rx.recv().await {
            let relevant = (event.kind.is_modify() || event.kind.is_create())
                && event
                    .paths
                    .iter()
                    .any(|changed| changed.file_name() == file_name.as_deref());
            if !relevant {
                continue;
            }
            match page.reload() {
                Ok(()) => {
                    debug!("Page description changed");
                    if events.send(PageEvent::Mutation).await.is_err() {
                        break;
                    }
                }
                Err(e) => warn!("Keeping previous page: {:#}", e),
            }
        }
    });

    Ok(watcher)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hotkey() -> Hotkey {
        Hotkey::parse("Alt+A").unwrap()
    }

    #[test]
    fn test_parse_commands() {
        assert_eq!(parse_command("p", &hotkey()), WatchCommand::TogglePanel);
        assert_eq!(parse_command(" ON ", &hotkey()), WatchCommand::SetEnabled(true));
        assert_eq!(parse_command("off", &hotkey()), WatchCommand::SetEnabled(false));
        assert_eq!(parse_command("r", &hotkey()), WatchCommand::Rescan);
        assert_eq!(parse_command("quit", &hotkey()), WatchCommand::Quit);
        assert_eq!(parse_command("   ", &hotkey()), WatchCommand::Empty);
    }

    #[test]
    fn test_hotkey_chord_toggles_panel() {
        assert_eq!(parse_command("alt+a", &hotkey()), WatchCommand::TogglePanel);
        assert_eq!(
            parse_command("Ctrl+A", &hotkey()),
            WatchCommand::Unknown("Ctrl+A".to_string())
        );
        assert_eq!(
            parse_command("hello", &hotkey()),
            WatchCommand::Unknown("hello".to_string())
        );
    }
}
