use chrono::{DateTime, Utc};
use tabled::Table;

use crate::{
    config, error, info,
    divide::Cursor,
    management::open_store,
    success,
    types::{SessionState, SessionTableRow},
    warning,
};

fn last_seen(secs: u64) -> String {
    DateTime::<Utc>::from_timestamp(secs as i64, 0)
        .map(|t| t.format("%Y-%m-%d %H:%M:%S").to_string())
        .unwrap_or_else(|| "-".to_string())
}

fn table_row(state: SessionState) -> SessionTableRow {
    let position = match state.cursor {
        Cursor::Positioned(i) => format!("{}", i + 1),
        Cursor::Exhausted => "-".to_string(),
    };

    SessionTableRow {
        session: state.session_id,
        user: state
            .display_name
            .or(state.user_id)
            .unwrap_or_else(|| "-".to_string()),
        source: state
            .source
            .map(|s| s.to_string())
            .unwrap_or_else(|| "-".to_string()),
        tracks: state.tracks.len(),
        position,
        last_seen: last_seen(state.last_seen),
    }
}

/// Lists the stored sessions, or sweeps the idle ones with `purge`.
pub async fn sessions(purge: bool) {
    let backend = match config::session_backend() {
        Ok(b) => b,
        Err(e) => error!("Cannot load configuration. Err: {}", e),
    };
    let lifetime = match config::session_lifetime() {
        Ok(l) => l,
        Err(e) => error!("Cannot load configuration. Err: {}", e),
    };

    let store = open_store(backend, config::session_dir(), lifetime);
    if store.backend_name() == "memory" {
        warning!("Sessions live in the server process with the memory backend, nothing to show.");
        return;
    }

    if purge {
        match store.purge_expired().await {
            Ok(n) => success!("Purged {} expired sessions.", n),
            Err(e) => error!("Failed to purge sessions. Err: {}", e),
        }
        return;
    }

    let mut states = match store.list().await {
        Ok(states) => states,
        Err(e) => error!("Failed to list sessions. Err: {}", e),
    };

    if states.is_empty() {
        info!("No sessions stored in {}", config::session_dir().display());
        return;
    }

    states.sort_by(|a, b| b.last_seen.cmp(&a.last_seen));
    let rows: Vec<SessionTableRow> = states.into_iter().map(table_row).collect();
    println!("{}", Table::new(rows));
}
