//! Wox query box - terminal demo.
//!
//! Reads lines from stdin and drives a `QueryBox` backed by the in-process
//! demo producers. Plain text is typed into the query box; lines starting
//! with `:` are input events:
//!
//! ```text
//! :up  :down  :enter  :click  :hover N  :wheel DELTA  :key KEYSTROKE  :quit
//! ```

use std::io::BufRead;
use std::sync::Arc;

use wox_launcher::demo::DemoChannel;
use wox_launcher::{
    event_channel, EventSender, Keymap, LauncherConfig, LauncherEvent, LauncherSnapshot, QueryBox,
};

// =============================================================================
// Logging
// =============================================================================

/// Initialize the tracing subscriber.
///
/// `RUST_LOG` overrides the default filter, e.g. `RUST_LOG=wox_launcher=debug`.
fn init_tracing() {
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(true)
                .with_line_number(true),
        )
        .with(filter)
        .init();
}

// =============================================================================
// Input
// =============================================================================

/// Turn one input line into an event.
fn parse_line(line: &str, keymap: &Keymap) -> Option<LauncherEvent> {
    let Some(command) = line.strip_prefix(':') else {
        return Some(LauncherEvent::QueryTextChanged(line.to_string()));
    };

    let (name, arg) = match command.split_once(' ') {
        Some((name, arg)) => (name, arg.trim()),
        None => (command, ""),
    };

    match name {
        "up" => keymap.resolve("up").map(|c| c.to_event()),
        "down" => keymap.resolve("down").map(|c| c.to_event()),
        "enter" => keymap.resolve("enter").map(|c| c.to_event()),
        "key" => keymap.resolve(arg).map(|c| c.to_event()),
        "click" => Some(LauncherEvent::Click),
        "hover" => arg.parse().ok().map(LauncherEvent::Hover),
        "wheel" => arg.parse().ok().map(|delta_y| LauncherEvent::Wheel { delta_y }),
        "quit" => Some(LauncherEvent::Shutdown),
        _ => None,
    }
}

/// Read stdin on a dedicated thread; the query box runs on the runtime.
fn spawn_stdin_reader(events: EventSender, keymap: Keymap) {
    std::thread::spawn(move || {
        let stdin = std::io::stdin();
        for line in stdin.lock().lines() {
            let Ok(line) = line else { break };
            match parse_line(&line, &keymap) {
                Some(event) => {
                    let stop = matches!(event, LauncherEvent::Shutdown);
                    if !events.send(event) || stop {
                        return;
                    }
                }
                None => eprintln!("Unknown command: {}", line),
            }
        }
        events.send(LauncherEvent::Shutdown);
    });
}

// =============================================================================
// Rendering
// =============================================================================

fn render(snapshot: &LauncherSnapshot) -> String {
    let mut out = format!("-- {:?} ({} results)\n", snapshot.query, snapshot.total);
    for (row, item) in snapshot.items.iter().enumerate() {
        let marker = if snapshot.active_index == Some(row) { '>' } else { ' ' };
        out.push_str(&format!("{} [{:>2}] {}", marker, item.index, item.title));
        if !item.subtitle.is_empty() {
            out.push_str(&format!(" - {}", item.subtitle));
        }
        out.push('\n');
    }
    if snapshot.has_preview && !snapshot.preview.is_empty() {
        out.push_str(&format!(
            "   preview ({}): {}\n",
            snapshot.preview.preview_type, snapshot.preview.preview_data
        ));
    }
    out
}

// =============================================================================
// Entry Point
// =============================================================================

fn main() {
    init_tracing();

    tracing::info!("Wox query box starting...");

    let config = match LauncherConfig::load() {
        Ok(config) => config,
        Err(e) => {
            tracing::error!("Failed to load config: {}", e);
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    };

    let mut keymap = Keymap::with_defaults();
    keymap.apply_config(&config.keymap);

    let rt = match tokio::runtime::Builder::new_current_thread()
        .enable_time()
        .build()
    {
        Ok(rt) => rt,
        Err(e) => {
            tracing::error!("Failed to create tokio runtime: {}", e);
            std::process::exit(1);
        }
    };

    let (events, rx) = event_channel();
    let query_box = QueryBox::new(&config.query, Arc::new(DemoChannel::new()), events.clone());
    let mut snapshots = query_box.subscribe();

    spawn_stdin_reader(events, keymap);

    rt.block_on(async move {
        tokio::spawn(async move {
            while snapshots.changed().await.is_ok() {
                let snapshot = snapshots.borrow_and_update().clone();
                print!("{}", render(&snapshot));
            }
        });

        query_box.run(rx).await;
    });

    tracing::info!("Wox query box stopped");
}
