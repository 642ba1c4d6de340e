//! Development server with live reload and the site's JSON endpoints

mod api;

use anyhow::Result;
use axum::{
    body::Body,
    extract::{
        ws::{Message, WebSocket},
        State, WebSocketUpgrade,
    },
    http::{Request, StatusCode},
    response::{Html, IntoResponse, Response},
    routing::{get, post},
    Router,
};
use percent_encoding::percent_decode_str;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::{broadcast, watch};
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use crate::commands::generate;
use crate::contact::Mailer;
use crate::content::loader::ContentLoader;
use crate::generator::SiteContent;
use crate::music::Song;
use crate::palette::Command;
use crate::Portfolio;

/// Live reload script injected into HTML pages
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
    public_dir: PathBuf,
    reload_tx: broadcast::Sender<()>,
    live_reload: bool,
    /// Latest palette commands, replaced after each rebuild
    commands: watch::Receiver<Arc<Vec<Command>>>,
    mailer: Mailer,
    songs: Vec<Song>,
}

impl ServerState {
    fn new(
        portfolio: &Portfolio,
        reload_tx: broadcast::Sender<()>,
        live_reload: bool,
        commands: watch::Receiver<Arc<Vec<Command>>>,
    ) -> Result<Self> {
        let songs = if portfolio.config.music.enable {
            portfolio.config.music.songs.clone()
        } else {
            Vec::new()
        };
        Ok(Self {
            public_dir: portfolio.public_dir.clone(),
            reload_tx,
            live_reload,
            commands,
            mailer: Mailer::new(&portfolio.config.contact)?,
            songs,
        })
    }
}

fn router(state: Arc<ServerState>) -> Router {
    Router::new()
        .route("/__livereload", get(livereload_handler))
        .route("/api/palette", get(api::palette))
        .route("/api/contact", post(api::contact))
        .route("/api/music/next", get(api::music_next))
        .fallback(fallback_handler)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Start the development server.
///
/// Unless `static_only` is set the site is generated first and rebuilt on
/// every change, with connected pages reloaded afterwards.
pub async fn start(
    portfolio: &Portfolio,
    ip: &str,
    port: u16,
    static_only: bool,
    open: bool,
) -> Result<()> {
    let live_reload = !static_only;

    let content = if static_only {
        let client = portfolio.content_client()?;
        SiteContent::gather(&client, &ContentLoader::new(portfolio)).await
    } else {
        generate::build(portfolio).await?
    };

    let (commands_tx, commands_rx) = watch::channel(Arc::new(content.commands()));
    let (reload_tx, _) = broadcast::channel::<()>(16);

    let state = Arc::new(ServerState::new(
        portfolio,
        reload_tx.clone(),
        live_reload,
        commands_rx,
    )?);
    let app = router(state);

    // Parse address - handle "localhost" specially
    let bind_ip = if ip == "localhost" { "127.0.0.1" } else { ip };
    let addr: SocketAddr = format!("{}:{}", bind_ip, port).parse()?;

    let url = format!("http://{}:{}", ip, port);
    println!("Server running at {}", url);
    if live_reload {
        println!("Live reload enabled. Watching for changes...");
    }
    println!("Press Ctrl+C to stop.");

    if open {
        if let Err(e) = open_browser(&url) {
            tracing::warn!("Failed to open browser: {}", e);
        }
    }

    if live_reload {
        let portfolio = portfolio.clone();
        tokio::spawn(async move {
            if let Err(e) = watch_and_reload(portfolio, reload_tx, commands_tx).await {
                tracing::error!("File watcher error: {}", e);
            }
        });
    }

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Rebuild on file changes, then refresh the palette and reload clients
async fn watch_and_reload(
    portfolio: Portfolio,
    reload_tx: broadcast::Sender<()>,
    commands_tx: watch::Sender<Arc<Vec<Command>>>,
) -> Result<()> {
    let (_debouncer, mut rx) = generate::spawn_watcher(&portfolio)?;
    let mut current = portfolio;

    while let Some(paths) = rx.recv().await {
        println!();
        for path in &paths {
            println!("📝 File changed: {}", path.display());
        }

        println!("\n🔄 Regenerating...");
        match generate::rebuild(&current).await {
            Ok((fresh, content)) => {
                current = fresh;
                let _ = commands_tx.send(Arc::new(content.commands()));
                println!("✅ Regenerated successfully!");
                let _ = reload_tx.send(());
            }
            Err(e) => {
                println!("❌ Generation failed: {}", e);
            }
        }
    }

    Ok(())
}

/// WebSocket handler for live reload
async fn livereload_handler(
    ws: WebSocketUpgrade,
    State(state): State<Arc<ServerState>>,
) -> impl IntoResponse {
    let reload_rx = state.reload_tx.subscribe();
    ws.on_upgrade(move |socket| handle_livereload_socket(socket, reload_rx))
}

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

/// Map a request path to a file under the public directory
fn resolve(public_dir: &Path, path: &str) -> Option<PathBuf> {
    let clean = path.trim_start_matches('/');
    if clean.split('/').any(|segment| segment == "..") {
        return None;
    }

    let candidate = public_dir.join(clean);
    if candidate.is_dir() {
        let index = candidate.join("index.html");
        return index.is_file().then_some(index);
    }
    if candidate.is_file() {
        return Some(candidate);
    }

    // Try adding .html extension
    let with_html = public_dir.join(format!("{}.html", clean.trim_end_matches('/')));
    with_html.is_file().then_some(with_html)
}

/// Serves files, injecting the live reload script into HTML pages
async fn fallback_handler(
    State(state): State<Arc<ServerState>>,
    request: Request<Body>,
) -> Response {
    let path = percent_decode_str(request.uri().path())
        .decode_utf8_lossy()
        .into_owned();

    let Some(file_path) = resolve(&state.public_dir, &path) else {
        return not_found(&state).await;
    };

    let is_html = file_path
        .extension()
        .is_some_and(|ext| ext == "html" || ext == "htm");

    if is_html {
        match tokio::fs::read_to_string(&file_path).await {
            Ok(content) => Html(decorate(&state, content)).into_response(),
            Err(_) => not_found(&state).await,
        }
    } else {
        let mut service = ServeDir::new(&state.public_dir).append_index_html_on_directories(true);
        match service.try_call(request).await {
            Ok(response) => response.into_response(),
            Err(_) => (StatusCode::INTERNAL_SERVER_ERROR, "Server error").into_response(),
        }
    }
}

/// The generated 404 page, or plain text when it has not been built
async fn not_found(state: &ServerState) -> Response {
    match tokio::fs::read_to_string(state.public_dir.join("404.html")).await {
        Ok(content) => (StatusCode::NOT_FOUND, Html(decorate(state, content))).into_response(),
        Err(_) => (StatusCode::NOT_FOUND, "Not found").into_response(),
    }
}

fn decorate(state: &ServerState, html: String) -> String {
    if state.live_reload {
        inject_live_reload(&html)
    } else {
        html
    }
}

/// Inject live reload script into HTML content
fn inject_live_reload(html: &str) -> String {
    if html.contains("</body>") {
        html.replacen("</body>", LIVE_RELOAD_SCRIPT, 1)
    } else {
        format!("{}{}", html, LIVE_RELOAD_SCRIPT)
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
    use crate::cms::ContentClient;
    use crate::config::SiteConfig;
    use serde_json::Value;
    use std::fs;
    use tempfile::TempDir;

    /// Serve a tiny public dir on an ephemeral port
    async fn spawn(live_reload: bool) -> (TempDir, String) {
        let tmp = TempDir::new().unwrap();
        let portfolio = Portfolio::with_config(tmp.path(), SiteConfig::default());
        fs::create_dir_all(portfolio.public_dir.join("blogs/a")).unwrap();
        fs::create_dir_all(portfolio.public_dir.join("css")).unwrap();
        fs::write(
            portfolio.public_dir.join("index.html"),
            "<html><body>home</body></html>",
        )
        .unwrap();
        fs::write(portfolio.public_dir.join("blogs/a/index.html"), "<p>post a</p>").unwrap();
        fs::write(portfolio.public_dir.join("404.html"), "<body>lost</body>").unwrap();
        fs::write(portfolio.public_dir.join("css/site.css"), "body{}").unwrap();

        let loader = ContentLoader::from_dir(&portfolio.content_dir);
        let content = SiteContent::gather(&ContentClient::offline(), &loader).await;
        let (_tx, rx) = watch::channel(Arc::new(content.commands()));
        let (reload_tx, _) = broadcast::channel(4);
        let state = ServerState::new(&portfolio, reload_tx, live_reload, rx).unwrap();

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, router(Arc::new(state))).await.unwrap();
        });
        (tmp, format!("http://{}", addr))
    }

    #[tokio::test]
    async fn test_serves_pages_with_live_reload() {
        let (_tmp, base) = spawn(true).await;
        let body = reqwest::get(format!("{}/", base)).await.unwrap().text().await.unwrap();
        assert!(body.contains("home"));
        assert!(body.contains("/__livereload"));

        let post = reqwest::get(format!("{}/blogs/a/", base)).await.unwrap();
        assert_eq!(post.status(), 200);

        let css = reqwest::get(format!("{}/css/site.css", base)).await.unwrap();
        assert_eq!(css.text().await.unwrap(), "body{}");
    }

    #[tokio::test]
    async fn test_missing_page_serves_404() {
        let (_tmp, base) = spawn(false).await;
        let response = reqwest::get(format!("{}/nope/", base)).await.unwrap();
        assert_eq!(response.status(), 404);
        assert_eq!(response.text().await.unwrap(), "<body>lost</body>");
    }

    #[tokio::test]
    async fn test_palette_endpoint() {
        let (_tmp, base) = spawn(false).await;
        let all: Value = reqwest::get(format!("{}/api/palette", base))
            .await
            .unwrap()
            .json()
            .await
            .unwrap();
        assert_eq!(all["groups"].as_array().unwrap().len(), 6);
        assert_eq!(all["groups"][0]["label"], "Navigation");

        let none: Value = reqwest::get(format!("{}/api/palette?q=zzzzzz", base))
            .await
            .unwrap()
            .json()
            .await
            .unwrap();
        assert_eq!(none["total"], 0);
    }

    #[tokio::test]
    async fn test_contact_endpoint() {
        let (_tmp, base) = spawn(false).await;
        let http = reqwest::Client::new();

        let invalid = http
            .post(format!("{}/api/contact", base))
            .json(&serde_json::json!({ "name": "A", "email": "nope", "message": "short" }))
            .send()
            .await
            .unwrap();
        assert_eq!(invalid.status(), 400);
        let body: Value = invalid.json().await.unwrap();
        assert!(body["errors"]["email"].is_string());

        let valid = http
            .post(format!("{}/api/contact", base))
            .json(&serde_json::json!({
                "name": "Ada",
                "email": "ada@example.com",
                "message": "Hello there, nice site!"
            }))
            .send()
            .await
            .unwrap();
        // No EmailJS credentials in the default config
        assert_eq!(valid.status(), 503);
        let body: Value = valid.json().await.unwrap();
        assert!(body["error"]
            .as_str()
            .unwrap()
            .starts_with("Email service is not configured"));
    }

    #[tokio::test]
    async fn test_music_endpoint() {
        let (_tmp, base) = spawn(false).await;
        let song: Value = reqwest::get(format!("{}/api/music/next", base))
            .await
            .unwrap()
            .json()
            .await
            .unwrap();
        assert!(song["url"].as_str().unwrap().starts_with("https://"));
    }

    #[test]
    fn test_resolve_rejects_parent_segments() {
        let tmp = TempDir::new().unwrap();
        assert!(resolve(tmp.path(), "/../etc/passwd").is_none());
    }

    #[test]
    fn test_inject_live_reload() {
        let html = inject_live_reload("<html><body>x</body></html>");
        assert!(html.contains("__livereload"));
        assert!(html.ends_with("</html>"));
    }
}
