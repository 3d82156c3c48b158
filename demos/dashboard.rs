//! Terminal dashboard against a running Groot backend.
//!
//! Demonstrates:
//! - Building a session from `GROOT_*` environment variables
//! - Status refresh on open and on demand
//! - Chat queries with suggested commands and follow-up questions
//! - Namespace table reload after each status update
//! - Reconnect after the backend restarts
//!
//! Usage:
//!   GROOT_ORIGIN=http://127.0.0.1:8080 cargo run --example dashboard
//!   GROOT_ORIGIN=http://127.0.0.1:8080 cargo run --example dashboard -- --debug
//!
//! Type a question and press Enter. `/status` refreshes, `/quit` exits.

// ============================================================================
// Imports
// ============================================================================

use groot_client::{
    ChatViewModel, Intent, NamespaceClient, Result, Session, SessionBuilder, StatusViewModel,
    ViewSink,
};
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;
use tracing_subscriber::EnvFilter;

// ============================================================================
// Console Sink
// ============================================================================

struct Console {
    namespaces: NamespaceClient,
}

impl ViewSink for Console {
    fn chat_entry(&mut self, entry: ChatViewModel) {
        println!("\n[assistant] {}", entry.text);

        if entry.has_commands() {
            println!("  Suggested Commands:");
            for cmd in &entry.commands {
                println!("    $ {} - {}", cmd.command, cmd.description);
            }
        }

        if entry.has_questions() {
            println!("  Follow-up Questions:");
            for question in &entry.questions {
                println!("    ? {question}");
            }
        }
    }

    fn status_view(&mut self, view: StatusViewModel) {
        println!(
            "\n[status] pods={} deployments={} services={}",
            view.pod_count, view.deployment_count, view.service_count
        );
        for slice in view.chart().slices {
            println!(
                "  {:<12} {:>4} ({:>3}%) {}",
                slice.label, slice.value, slice.percentage, slice.color
            );
        }

        let namespaces = self.namespaces.clone();
        tokio::spawn(async move {
            match namespaces.rows().await {
                Ok(rows) => {
                    println!("  Namespaces:");
                    for row in rows {
                        println!("    {:<24} {:<8} {}", row.name, row.status, row.age);
                    }
                }
                Err(e) => tracing::error!(error = %e, "Error loading namespaces"),
            }
        });
    }

    fn error_message(&mut self, message: &str) {
        println!("\n[system] {message}");
    }

    fn user_message(&mut self, text: &str) {
        println!("[you] {text}");
    }
}

// ============================================================================
// Main
// ============================================================================

#[tokio::main]
async fn main() {
    let debug = std::env::args().any(|a| a == "--debug");
    init_logging(debug);

    if let Err(e) = run().await {
        eprintln!("\n[ERROR] {e}");
        std::process::exit(1);
    }
}

fn init_logging(debug: bool) {
    let filter = if debug {
        "groot_client=debug"
    } else {
        "groot_client=info"
    };

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .with_target(false)
        .init();
}

async fn run() -> Result<()> {
    let config = SessionBuilder::from_env()?
        .request_status_on_open(true)
        .build()?;
    let sink = Console {
        namespaces: NamespaceClient::new(config.origin())?,
    };

    let (intents, intents_rx) = mpsc::unbounded_channel();

    tokio::spawn(async move {
        let mut lines = BufReader::new(tokio::io::stdin()).lines();
        loop {
            let intent = tokio::select! {
                _ = tokio::signal::ctrl_c() => Intent::Teardown,
                line = lines.next_line() => match line {
                    Ok(Some(line)) => match line.trim() {
                        "/quit" => Intent::Teardown,
                        "/status" => Intent::RefreshStatus,
                        _ => Intent::Query { text: line, namespace: None },
                    },
                    _ => Intent::Teardown,
                },
            };

            let done = intent == Intent::Teardown;
            if intents.send(intent).is_err() || done {
                break;
            }
        }
    });

    let mut session = Session::websocket(config, sink);
    session.run(intents_rx).await
}
