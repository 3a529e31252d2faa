//! vday CLI — chronicles dev server, terminal preview, narration generator.
//!
//! ```text
//! vday serve                                      # site + /audio + /api/speak
//! vday preview [--audio-dir audio] [--json]
//! vday speak "text" [--year 2020] [--out 2020_vday.mp3] [--server URL]
//! ```

mod preview;

use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use tokio::io::AsyncWriteExt;

use vday_lib::config::ServerConfig;
use vday_lib::server::{self, AppState};

/// vday — V-Day chronicles slideshow server
#[derive(Parser)]
#[command(name = "vday", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Start the dev server (configured via the environment and ./.env)
    Serve,
    /// Walk the slideshow in the terminal with narration playback
    Preview {
        /// Directory holding the narration mp3s
        #[arg(long, default_value = "audio")]
        audio_dir: PathBuf,
        /// Print view snapshots as JSON instead of text
        #[arg(long)]
        json: bool,
    },
    /// Ask a running server to synthesize narration and save the mp3
    Speak {
        /// Text to narrate
        text: String,
        /// Year whose voice to use
        #[arg(long)]
        year: Option<u16>,
        /// Output file
        #[arg(long, default_value = "narration.mp3")]
        out: PathBuf,
        /// Server URL
        #[arg(long, default_value = "http://localhost:3000")]
        server: String,
    },
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Command::Serve => {
            let root = std::env::current_dir().expect("cannot determine working directory");
            let config = ServerConfig::load(&root);
            let addr = format!("0.0.0.0:{}", config.port);
            let listener = tokio::net::TcpListener::bind(&addr)
                .await
                .expect("failed to bind");
            server::log_startup(&config);
            let app = server::router(AppState::new(config));
            axum::serve(listener, app).await.expect("server error");
        }

        Command::Preview { audio_dir, json } => {
            if let Err(e) = preview::run(&audio_dir, json) {
                eprintln!("preview failed: {e}");
                std::process::exit(1);
            }
        }

        Command::Speak {
            text,
            year,
            out,
            server,
        } => {
            if let Err(e) = speak(&text, year, &out, &server).await {
                eprintln!("speak failed: {e}");
                std::process::exit(1);
            }
        }
    }
}

/// POST to a running server's `/api/speak` and stream the mp3 to disk.
async fn speak(text: &str, year: Option<u16>, out: &Path, server: &str) -> Result<(), String> {
    let mut body = serde_json::json!({ "text": text });
    if let Some(year) = year {
        body["year"] = serde_json::json!(year);
    }

    let resp = reqwest::Client::new()
        .post(format!("{server}/api/speak"))
        .json(&body)
        .send()
        .await
        .map_err(|e| format!("request failed: {e}"))?;

    if !resp.status().is_success() {
        let status = resp.status();
        let detail = resp.text().await.unwrap_or_default();
        return Err(format!("server returned {status}: {detail}"));
    }

    let mut file = tokio::fs::File::create(out)
        .await
        .map_err(|e| format!("cannot create {}: {e}", out.display()))?;

    let mut stream = resp.bytes_stream();
    use futures_util::StreamExt;
    while let Some(chunk) = stream.next().await {
        let chunk = chunk.map_err(|e| format!("download stream error: {e}"))?;
        file.write_all(&chunk)
            .await
            .map_err(|e| format!("failed to write chunk: {e}"))?;
    }
    file.flush().await.map_err(|e| format!("flush failed: {e}"))?;

    println!("wrote {}", out.display());
    Ok(())
}
