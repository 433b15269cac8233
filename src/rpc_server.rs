//! Cozy Hub RPC Server: JSON-RPC over stdin/stdout for the presentation layer.
//!
//! Protocol: one JSON object per line (newline-delimited JSON).
//! Request:  {"id":1, "method":"bookmark.create", "params":{"title":"...","url":"..."}}
//! Response: {"id":1, "result":{...}} or {"id":1, "error":"..."}
//!
//! Logs go to stderr so stdout carries protocol frames only.

use std::io::{self, BufRead, Write};
use std::sync::Mutex;
use std::time::Instant;

use cozyhub::app::App;
use cozyhub::platform;
use cozyhub::rpc_handler::handle_method;
use cozyhub::services::settings_engine::{SettingsEngine, SettingsEngineTrait};

use serde_json::{json, Value};
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

const MAX_REQUESTS_PER_SECOND: u32 = 200;

/// Fixed-window limiter on requests per second.
struct RateLimiter {
    window_start: Instant,
    request_count: u32,
    max_per_second: u32,
}

impl RateLimiter {
    fn new(max_per_second: u32) -> Self {
        Self { window_start: Instant::now(), request_count: 0, max_per_second }
    }

    /// Returns true if the request is allowed, false if rate-limited.
    fn check(&mut self) -> bool {
        if self.window_start.elapsed().as_secs() >= 1 {
            self.window_start = Instant::now();
            self.request_count = 0;
        }
        self.request_count += 1;
        self.request_count <= self.max_per_second
    }
}

fn init_logging(default_filter: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn send(out: &mut impl Write, frame: &Value) -> io::Result<()> {
    writeln!(out, "{}", frame)?;
    out.flush()
}

fn main() {
    let mut settings = SettingsEngine::new(None);
    let filter = match settings.load() {
        Ok(s) => s.logging.filter,
        Err(_) => settings.get_settings().logging.filter.clone(),
    };
    init_logging(&filter);

    let data_dir = platform::get_data_dir();
    if let Err(e) = std::fs::create_dir_all(&data_dir) {
        warn!(dir = %data_dir.display(), error = %e, "could not create data directory");
    }
    let db_file = settings.get_settings().storage.database_file.clone();
    let db_path = data_dir.join(db_file);

    let app = match App::new(&db_path.to_string_lossy()) {
        Ok(app) => Mutex::new(app),
        Err(e) => {
            error!(error = %e, "failed to initialize Cozy Hub");
            std::process::exit(1);
        }
    };

    let stdout = io::stdout();
    let mut out = stdout.lock();
    if send(&mut out, &json!({"event": "ready", "version": env!("CARGO_PKG_VERSION")})).is_err() {
        return;
    }

    let mut rate_limiter = RateLimiter::new(MAX_REQUESTS_PER_SECOND);

    for line in io::stdin().lock().lines() {
        let line = match line {
            Ok(l) => l,
            Err(_) => break,
        };
        if line.trim().is_empty() {
            continue;
        }

        let response = match serde_json::from_str::<Value>(&line) {
            Err(e) => json!({"id": null, "error": format!("parse error: {}", e)}),
            Ok(req) => {
                let id = req.get("id").cloned().unwrap_or(Value::Null);
                if !rate_limiter.check() {
                    warn!("rate limit exceeded");
                    json!({"id": id, "error": "rate limit exceeded"})
                } else {
                    let method = req.get("method").and_then(|v| v.as_str()).unwrap_or("");
                    let params = req.get("params").cloned().unwrap_or(json!({}));
                    match handle_method(&app, method, &params) {
                        Ok(val) => json!({"id": id, "result": val}),
                        Err(err) => {
                            warn!(method, error = %err, "request failed");
                            json!({"id": id, "error": err})
                        }
                    }
                }
            }
        };

        if send(&mut out, &response).is_err() {
            break;
        }
    }
    info!("stdin closed, shutting down");
}
