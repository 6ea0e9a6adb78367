//! Map-Edit-Replay.
//!
//! Spielt ein JSON-Skript aus `AppIntent`s gegen eine Session mit
//! In-Memory-Store ab und gibt die resultierenden Layer als JSON aus.

use anyhow::Context;
use map_edit_core::{AppController, AppIntent, EditingSession, EditorOptions, InMemoryFeatureStore};
use std::rc::Rc;

fn main() -> anyhow::Result<()> {
    // Logger initialisieren
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .init();

    log::info!("Map-Edit-Replay v{} startet...", env!("CARGO_PKG_VERSION"));

    let script_path = std::env::args()
        .nth(1)
        .context("Aufruf: map-edit-replay <skript.json>")?;
    let content = std::fs::read_to_string(&script_path)
        .with_context(|| format!("Skript nicht lesbar: {}", script_path))?;
    let intents: Vec<AppIntent> = serde_json::from_str(&content)
        .with_context(|| format!("Skript ist kein gültiges Intent-Array: {}", script_path))?;

    let options = EditorOptions::load_from_file(&EditorOptions::config_path());
    let store = Rc::new(InMemoryFeatureStore::new());
    let mut session = EditingSession::new(store.clone(), store.clone(), options);
    let mut controller = AppController::new();

    for (index, intent) in intents.into_iter().enumerate() {
        let pending = match controller.handle_intent(&mut session, intent) {
            Ok(pending) => pending,
            Err(e) => {
                log::warn!("Intent #{} abgelehnt: {:#}", index, e);
                continue;
            }
        };
        for mutation in pending {
            if let Err(e) = pollster::block_on(session.run(mutation)) {
                log::warn!("Mutation aus Intent #{} fehlgeschlagen: {}", index, e);
            }
        }
    }

    log::info!(
        "{} Commands ausgeführt, {} Events gemeldet",
        session.command_log.len(),
        session.events.len()
    );

    let layers: Vec<_> = session.registry.layers().collect();
    println!("{}", serde_json::to_string_pretty(&layers)?);
    Ok(())
}
