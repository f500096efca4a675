//! Host server: one render pass per page view, with optional live reload

use anyhow::Result;
use axum::{
    body::Body,
    extract::{
        ws::{Message, WebSocket},
        State, WebSocketUpgrade,
    },
    http::{Request, StatusCode},
    response::{Html, IntoResponse, Response},
    routing::get,
    Router,
};
use notify_debouncer_mini::{
    new_debouncer,
    notify::{RecursiveMode, Watcher},
};
use percent_encoding::percent_decode_str;
use std::collections::HashSet;
use std::ffi::OsStr;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::sync::{Arc, RwLock};
use std::time::Duration;
use tokio::sync::broadcast;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use crate::config::{PlatformConfig, CONFIG_FILE};
use crate::Platform;

/// Live reload script injected into the host page
const LIVE_RELOAD_SCRIPT: &str = r#"
<script>
(function() {
    var ws = new WebSocket('ws://' + location.host + '/__livereload');
    ws.onmessage = function(msg) {
        if (msg.data === 'reload') {
            location.reload();
        }
    };
    ws.onclose = function() {
        console.log('Live reload disconnected. Attempting to reconnect...');
        setTimeout(function() { location.reload(); }, 1000);
    };
})();
</script>
</body>
"#;

/// Server state
struct ServerState {
    base_dir: PathBuf,
    config: RwLock<PlatformConfig>,
    reload_tx: broadcast::Sender<()>,
    live_reload: bool,
}

/// Start the host server
pub async fn start(
    platform: &Platform,
    ip: &str,
    port: u16,
    watch: bool,
    open: bool,
) -> Result<()> {
    // Create broadcast channel for live reload notifications
    let (reload_tx, _) = broadcast::channel::<()>(16);

    let state = Arc::new(ServerState {
        base_dir: platform.base_dir.clone(),
        config: RwLock::new(platform.config.clone()),
        reload_tx: reload_tx.clone(),
        live_reload: watch,
    });

    let app = router(state.clone());

    // Parse address - handle "localhost" specially
    let bind_ip = if ip == "localhost" { "127.0.0.1" } else { ip };
    let addr: SocketAddr = format!("{}:{}", bind_ip, port).parse()?;

    let url = format!("http://{}:{}", ip, port);
    println!("Server running at {}", url);
    if watch {
        println!("Live reload enabled. Watching for changes...");
    }
    println!("Press Ctrl+C to stop.");

    if open {
        if let Err(e) = open_browser(&url) {
            tracing::warn!("Failed to open browser: {}", e);
        }
    }

    if watch {
        tokio::task::spawn_blocking(move || {
            if let Err(e) = watch_and_reload(state) {
                tracing::error!("File watcher error: {}", e);
            }
        });
    }

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

fn router(state: Arc<ServerState>) -> Router {
    Router::new()
        .route("/", get(page_handler))
        .route("/index.html", get(page_handler))
        .route("/__livereload", get(livereload_handler))
        .fallback(static_handler)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Files whose changes trigger a reload, derived from the current config
#[derive(Debug, Clone, PartialEq)]
struct WatchSet {
    files: Vec<PathBuf>,
}

impl WatchSet {
    /// Config file plus both document paths
    fn new(base_dir: &Path, config: &PlatformConfig) -> Self {
        let mut files = vec![base_dir.join(CONFIG_FILE)];
        files.push(base_dir.join(&config.primary.path));
        if let Some(fallback) = &config.fallback {
            files.push(base_dir.join(&fallback.path));
        }
        Self { files }
    }

    /// Parent directories; documents may not exist yet, so these are watched
    fn dirs(&self) -> Vec<PathBuf> {
        let mut dirs: Vec<PathBuf> = self
            .files
            .iter()
            .filter_map(|f| f.parent().map(Path::to_path_buf))
            .collect();
        dirs.sort();
        dirs.dedup();
        dirs
    }

    fn matches(&self, path: &Path) -> bool {
        path.file_name().is_some_and(|name| {
            self.files
                .iter()
                .any(|f| f.file_name() == Some(name))
        })
    }
}

/// Directories to start and stop watching to go from `watched` to `wanted`
fn dir_changes(
    watched: &HashSet<PathBuf>,
    wanted: &[PathBuf],
) -> (Vec<PathBuf>, Vec<PathBuf>) {
    let added = wanted
        .iter()
        .filter(|d| !watched.contains(*d))
        .cloned()
        .collect();
    let removed = watched
        .iter()
        .filter(|d| !wanted.contains(d))
        .cloned()
        .collect();
    (added, removed)
}

/// Bring the watcher in line with a watch set
fn sync_watches(
    watcher: &mut dyn Watcher,
    watched: &mut HashSet<PathBuf>,
    set: &WatchSet,
) {
    let (added, removed) = dir_changes(watched, &set.dirs());

    for dir in removed {
        if let Err(e) = watcher.unwatch(&dir) {
            tracing::debug!("Failed to unwatch {:?}: {}", dir, e);
        }
        watched.remove(&dir);
    }

    for dir in added {
        if !dir.exists() {
            tracing::debug!("Not watching missing directory {:?}", dir);
            continue;
        }
        match watcher.watch(&dir, RecursiveMode::NonRecursive) {
            Ok(()) => {
                tracing::debug!("Watching: {:?}", dir);
                watched.insert(dir);
            }
            Err(e) => tracing::warn!("Failed to watch {:?}: {}", dir, e),
        }
    }
}

/// Watch the config and documents; reload config on change and notify clients
fn watch_and_reload(state: Arc<ServerState>) -> Result<()> {
    let (tx, rx) = std::sync::mpsc::channel();

    // Create debouncer to avoid multiple rapid reloads
    let mut debouncer = new_debouncer(Duration::from_millis(500), tx)?;

    let initial = match state.config.read() {
        Ok(config) => WatchSet::new(&state.base_dir, &config),
        Err(_) => anyhow::bail!("configuration lock poisoned"),
    };
    let mut watch_set = initial;
    let mut watched = HashSet::new();
    sync_watches(debouncer.watcher(), &mut watched, &watch_set);

    loop {
        match rx.recv() {
            Ok(Ok(events)) => {
                let changed: Vec<_> = events
                    .iter()
                    .filter(|e| watch_set.matches(&e.path))
                    .collect();

                if changed.is_empty() {
                    continue;
                }

                for event in &changed {
                    println!("📝 File changed: {}", event.path.display());
                }

                let config_changed = changed
                    .iter()
                    .any(|e| e.path.file_name() == Some(OsStr::new(CONFIG_FILE)));
                if config_changed {
                    if let Some(config) = reload_config(&state) {
                        watch_set = WatchSet::new(&state.base_dir, &config);
                        sync_watches(debouncer.watcher(), &mut watched, &watch_set);
                    }
                }

                let _ = state.reload_tx.send(());
            }
            Ok(Err(e)) => {
                tracing::error!("Watch error: {:?}", e);
            }
            Err(e) => {
                tracing::error!("Channel error: {:?}", e);
                break;
            }
        }
    }

    Ok(())
}

/// Re-read `_platform.yml`; keep the previous config if it does not parse
fn reload_config(state: &ServerState) -> Option<PlatformConfig> {
    match PlatformConfig::load_or_default(&state.base_dir) {
        Ok(config) => {
            let mut current = state.config.write().ok()?;
            *current = config.clone();
            println!("🔄 Configuration reloaded");
            Some(config)
        }
        Err(e) => {
            println!("❌ Configuration reload failed: {}", e);
            None
        }
    }
}

/// Serve other files from the base directory, except the config and dotfiles
async fn static_handler(
    State(state): State<Arc<ServerState>>,
    request: Request<Body>,
) -> Response {
    if !is_public_path(request.uri().path()) {
        return (StatusCode::NOT_FOUND, "Not found").into_response();
    }

    let mut service = ServeDir::new(&state.base_dir);
    match service.try_call(request).await {
        Ok(response) => response.into_response(),
        Err(_) => (StatusCode::INTERNAL_SERVER_ERROR, "Server error").into_response(),
    }
}

/// Whether a request path may be served from the base directory
fn is_public_path(path: &str) -> bool {
    let decoded = percent_decode_str(path).decode_utf8_lossy();
    decoded
        .split(|c: char| c == '/' || c == '\\')
        .filter(|segment| !segment.is_empty())
        .all(|segment| !segment.starts_with('.') && segment != CONFIG_FILE)
}

/// Serve the host page; every request runs a fresh render pass
async fn page_handler(State(state): State<Arc<ServerState>>) -> Response {
    let config = match state.config.read() {
        Ok(config) => config.clone(),
        Err(_) => {
            return (StatusCode::INTERNAL_SERVER_ERROR, "Server error").into_response();
        }
    };
    let platform = Platform::with_config(&state.base_dir, config);

    match tokio::task::spawn_blocking(move || platform.render_page()).await {
        Ok(page) => {
            if state.live_reload {
                Html(inject_live_reload(&page)).into_response()
            } else {
                Html(page).into_response()
            }
        }
        Err(e) => {
            tracing::error!("Render task failed: {}", e);
            (StatusCode::INTERNAL_SERVER_ERROR, "Server error").into_response()
        }
    }
}

/// WebSocket handler for live reload
async fn livereload_handler(
    ws: WebSocketUpgrade,
    State(state): State<Arc<ServerState>>,
) -> impl IntoResponse {
    let reload_rx = state.reload_tx.subscribe();
    ws.on_upgrade(move |socket| handle_livereload_socket(socket, reload_rx))
}

/// Handle WebSocket connection for live reload
async fn handle_livereload_socket(mut socket: WebSocket, mut reload_rx: broadcast::Receiver<()>) {
    tracing::debug!("Live reload client connected");

    loop {
        tokio::select! {
            result = reload_rx.recv() => {
                match result {
                    Ok(_) => {
                        if socket.send(Message::Text("reload".to_string())).await.is_err() {
                            break;
                        }
                    }
                    Err(broadcast::error::RecvError::Closed) => break,
                    Err(broadcast::error::RecvError::Lagged(_)) => continue,
                }
            }
            msg = socket.recv() => {
                match msg {
                    Some(Ok(Message::Ping(data))) => {
                        if socket.send(Message::Pong(data)).await.is_err() {
                            break;
                        }
                    }
                    Some(Ok(Message::Close(_))) | None => break,
                    _ => {}
                }
            }
        }
    }

    tracing::debug!("Live reload client disconnected");
}

/// Inject live reload script into HTML content
fn inject_live_reload(html: &str) -> String {
    match html.rfind("</body>") {
        Some(pos) => format!("{}{}{}", &html[..pos], LIVE_RELOAD_SCRIPT, &html[pos + 7..]),
        None => format!("{}{}", html, LIVE_RELOAD_SCRIPT),
    }
}

/// Open a URL in the default browser
fn open_browser(url: &str) -> Result<()> {
    #[cfg(target_os = "macos")]
    {
        std::process::Command::new("open").arg(url).spawn()?;
    }

    #[cfg(target_os = "linux")]
    {
        std::process::Command::new("xdg-open").arg(url).spawn()?;
    }

    #[cfg(target_os = "windows")]
    {
        std::process::Command::new("cmd")
            .args(["/c", "start", url])
            .spawn()?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DocumentSpec;

    #[test]
    fn test_inject_live_reload_replaces_last_body_close() {
        // The host page's own </body> is last; escaped document markup is not
        let page = "<body><iframe srcdoc=\"&lt;/body&gt;\"></iframe></body>\n</html>\n";
        let injected = inject_live_reload(page);
        assert!(injected.contains("__livereload"));
        assert!(injected.contains("&lt;/body&gt;"));
        assert!(injected.ends_with("</body>\n\n</html>\n"));
    }

    #[test]
    fn test_inject_live_reload_without_body() {
        let injected = inject_live_reload("<p>hi</p>");
        assert!(injected.starts_with("<p>hi</p>"));
        assert!(injected.contains("__livereload"));
    }

    fn config_with(primary: &str, fallback: Option<&str>) -> PlatformConfig {
        let mut config = PlatformConfig::default();
        config.primary = DocumentSpec::new(primary, 1200);
        config.fallback = fallback.map(|path| DocumentSpec::new(path, 1000));
        config
    }

    #[test]
    fn test_watch_set_files_and_dirs() {
        let set = WatchSet::new(Path::new("/srv/site"), &config_with("a.html", None));
        assert_eq!(
            set.files,
            vec![
                PathBuf::from("/srv/site/_platform.yml"),
                PathBuf::from("/srv/site/a.html"),
            ]
        );
        assert_eq!(set.dirs(), vec![PathBuf::from("/srv/site")]);
        assert!(set.matches(Path::new("/srv/site/a.html")));
        assert!(!set.matches(Path::new("/srv/site/notes.txt")));
    }

    #[test]
    fn test_watch_set_follows_config_reload() {
        let base = Path::new("/srv/site");
        let before = WatchSet::new(base, &config_with("a.html", Some("fallback.html")));
        let after = WatchSet::new(base, &config_with("docs/b.html", Some("fallback.html")));

        assert!(!before.matches(Path::new("/srv/site/docs/b.html")));
        assert!(after.matches(Path::new("/srv/site/docs/b.html")));
        assert!(!after.matches(Path::new("/srv/site/a.html")));

        let watched: HashSet<PathBuf> = before.dirs().into_iter().collect();
        let (added, removed) = dir_changes(&watched, &after.dirs());
        assert_eq!(added, vec![PathBuf::from("/srv/site/docs")]);
        assert!(removed.is_empty());
    }

    #[test]
    fn test_dir_changes_drops_stale_dirs() {
        let watched: HashSet<PathBuf> =
            [PathBuf::from("/srv/site"), PathBuf::from("/srv/site/old")]
                .into_iter()
                .collect();
        let (added, removed) = dir_changes(&watched, &[PathBuf::from("/srv/site")]);
        assert!(added.is_empty());
        assert_eq!(removed, vec![PathBuf::from("/srv/site/old")]);
    }

    #[test]
    fn test_config_and_dotfiles_are_not_served() {
        assert!(!is_public_path("/_platform.yml"));
        assert!(!is_public_path("/%5Fplatform.yml"));
        assert!(!is_public_path("/.git/config"));
        assert!(!is_public_path("/js/%2e%2e/_platform.yml"));
        assert!(is_public_path("/js/main.js"));
        assert!(is_public_path("/img/a%20b.png"));
    }
}
