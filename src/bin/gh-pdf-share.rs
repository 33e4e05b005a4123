//! CLI binary for gh-pdf-share.
//!
//! A thin shim over the library crate that maps CLI flags to
//! `UploadConfig` / `UploadRequest` and renders the result.

use anyhow::{Context, Result};
use clap::Parser;
use gh_pdf_share::config::{DEFAULT_API_BASE_URL, DEFAULT_BRANCH, DEFAULT_MAX_ATTEMPTS};
use gh_pdf_share::{
    upload, validate_request, CredentialStore, FileCredentialStore, PdfFile, ProgressCallback,
    RedirectError, RedirectPage, UploadConfig, UploadProgressCallback, UploadRequest,
    UploadResult,
};
use indicatif::{ProgressBar, ProgressStyle};
use std::io;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tracing::warn;
use tracing_subscriber::EnvFilter;

// ── ANSI colour helpers (no extra deps) ──────────────────────────────────────

fn green(s: &str) -> String {
    format!("\x1b[32m{s}\x1b[0m")
}
fn red(s: &str) -> String {
    format!("\x1b[31m{s}\x1b[0m")
}
fn dim(s: &str) -> String {
    format!("\x1b[2m{s}\x1b[0m")
}
fn bold(s: &str) -> String {
    format!("\x1b[1m{s}\x1b[0m")
}
fn cyan(s: &str) -> String {
    format!("\x1b[36m{s}\x1b[0m")
}

// ── CLI progress callback using indicatif ────────────────────────────────────

/// Terminal progress callback: a spinner while requests are in flight plus
/// one log line per notable event.
struct CliProgressCallback {
    bar: ProgressBar,
}

impl CliProgressCallback {
    fn new() -> Arc<Self> {
        let bar = ProgressBar::new_spinner();
        let style = ProgressStyle::with_template("{spinner:.cyan} {prefix:.bold}  {msg}  {elapsed:.dim}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
            .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏", "⠿"]);
        bar.set_style(style);
        bar.set_prefix("Preparing");
        bar.enable_steady_tick(Duration::from_millis(80));
        Arc::new(Self { bar })
    }
}

impl UploadProgressCallback for CliProgressCallback {
    fn on_upload_start(&self, file_name: &str, size_bytes: u64) {
        self.bar.set_prefix("Uploading");
        self.bar.set_message(format!(
            "{file_name} {}",
            dim(&format!("({:.1} KiB)", size_bytes as f64 / 1024.0))
        ));
    }

    fn on_attempt(&self, attempt: u32, max_attempts: u32, path: &str) {
        if attempt > 1 {
            self.bar.set_prefix(format!("Retry {attempt}/{max_attempts}"));
        }
        self.bar.set_message(path.to_string());
    }

    fn on_conflict(&self, attempt: u32, path: &str) {
        self.bar.println(format!(
            "  {} attempt {attempt}: {} already exists, picking a new name",
            cyan("⚠"),
            dim(path)
        ));
    }

    fn on_pdf_published(&self, pdf_url: &str) {
        self.bar
            .println(format!("  {} PDF committed  {}", green("✓"), dim(pdf_url)));
        self.bar.set_prefix("Publishing");
        self.bar.set_message("redirect page…");
    }

    fn on_redirect_published(&self, html_url: &str) {
        self.bar.println(format!(
            "  {} Redirect page committed  {}",
            green("✓"),
            dim(html_url)
        ));
    }

    fn on_redirect_failed(&self, error: &RedirectError) {
        self.bar.println(format!(
            "  {} Redirect page skipped: {}",
            cyan("⚠"),
            dim(&error.to_string())
        ));
    }

    fn on_upload_complete(&self, _result: &UploadResult) {
        self.bar.finish_and_clear();
    }
}

impl Drop for CliProgressCallback {
    // Clears the spinner on error paths too.
    fn drop(&mut self) {
        if !self.bar.is_finished() {
            self.bar.finish_and_clear();
        }
    }
}

const AFTER_HELP: &str = r#"EXAMPLES:
  # Upload and print the share URL
  gh-pdf-share --owner octocat --repo docs report.pdf

  # Upload to the gh-pages branch without a redirect page
  gh-pdf-share --owner octocat --repo docs --branch gh-pages --no-redirect report.pdf

  # Machine-readable output
  gh-pdf-share --owner octocat --repo docs --json report.pdf

  # Site served from a custom domain
  gh-pdf-share --owner octocat --repo docs --pages-url https://docs.example.com report.pdf

  # Remove the cached token
  gh-pdf-share --forget-token

STORAGE LAYOUT:
  uploads/<YYYY>/<MM>/<epoch-millis>-<8 random chars>-<sanitized name>.pdf
  uploads/<YYYY>/<MM>/<epoch-millis>-<8 random chars>-<sanitized name>.html  (redirect page)

TOKEN:
  A fine-grained personal access token with "Contents: read and write" on the
  target repository. Taken from --token / GITHUB_TOKEN, else from the cache
  written by a previous run (~/.config/gh-pdf-share/credentials.json on Linux).

ENVIRONMENT VARIABLES:
  GITHUB_TOKEN             Access token
  GH_PDF_SHARE_OWNER       Repository owner
  GH_PDF_SHARE_REPO        Repository name
  GH_PDF_SHARE_BRANCH      Target branch (default: main)
  GH_PDF_SHARE_API_URL     REST API base URL (GitHub Enterprise)
  GH_PDF_SHARE_PAGES_URL   Public base URL of the Pages site
  RUST_LOG                 Overrides the log filter

NOTE:
  The URLs are derived from the repository name; they resolve once GitHub
  Pages is enabled for the branch. The first deploy may take ~1–2 minutes.
"#;

/// Upload a PDF to a GitHub repository and print its GitHub Pages URL.
#[derive(Parser, Debug)]
#[command(
    name = "gh-pdf-share",
    version,
    about = "Upload a PDF to GitHub and share it through GitHub Pages",
    long_about = "Upload a PDF to a GitHub repository via the Contents API under a unique \
path, publish an HTML redirect page next to it for webmail clients, and print the public \
GitHub Pages URLs.",
    arg_required_else_help = true,
    color = clap::ColorChoice::Auto,
    after_long_help = AFTER_HELP
)]
struct Cli {
    /// PDF file to upload.
    #[arg(required_unless_present = "forget_token")]
    file: Option<PathBuf>,

    /// Repository owner (user or organisation).
    #[arg(long, env = "GH_PDF_SHARE_OWNER", default_value = "")]
    owner: String,

    /// Repository name.
    #[arg(long, env = "GH_PDF_SHARE_REPO", default_value = "")]
    repo: String,

    /// Branch to commit to.
    #[arg(long, env = "GH_PDF_SHARE_BRANCH", default_value = DEFAULT_BRANCH)]
    branch: String,

    /// Personal access token. Falls back to the cached token.
    #[arg(long, env = "GITHUB_TOKEN", hide_env_values = true)]
    token: Option<String>,

    /// Do not publish the HTML redirect page.
    #[arg(long)]
    no_redirect: bool,

    /// Maximum upload attempts when generated names collide.
    #[arg(long, default_value_t = DEFAULT_MAX_ATTEMPTS,
          value_parser = clap::value_parser!(u32).range(1..=20))]
    max_attempts: u32,

    /// REST API base URL.
    #[arg(long, env = "GH_PDF_SHARE_API_URL", default_value = DEFAULT_API_BASE_URL)]
    api_url: String,

    /// Public base URL of the Pages site (default: https://<owner>.github.io/<repo>).
    #[arg(long, env = "GH_PDF_SHARE_PAGES_URL")]
    pages_url: Option<String>,

    /// Per-request timeout in seconds (default: none).
    #[arg(long)]
    timeout: Option<u64>,

    /// Output the result as JSON.
    #[arg(long)]
    json: bool,

    /// Disable the progress spinner.
    #[arg(long)]
    no_progress: bool,

    /// Do not cache the token for later runs.
    #[arg(long)]
    no_save_token: bool,

    /// Delete the cached token and exit.
    #[arg(long)]
    forget_token: bool,

    /// Enable DEBUG-level tracing logs.
    #[arg(short, long, env = "GH_PDF_SHARE_VERBOSE")]
    verbose: bool,

    /// Print only the share URL.
    #[arg(short, long)]
    quiet: bool,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    // ── Logging setup ────────────────────────────────────────────────────
    // The spinner already reports every step, so library INFO logs are
    // suppressed while it is active.
    let show_progress = !cli.quiet && !cli.no_progress && !cli.json;
    let filter = if cli.verbose {
        "debug"
    } else if cli.quiet || show_progress {
        "error"
    } else {
        "info"
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_writer(io::stderr)
        .init();

    if let Err(e) = run(cli, show_progress).await {
        eprintln!("{} {e:#}", red("Error:"));
        std::process::exit(1);
    }
}

async fn run(cli: Cli, show_progress: bool) -> Result<()> {
    let store = match FileCredentialStore::default_location() {
        Ok(store) => Some(store),
        Err(e) => {
            warn!("Token cache unavailable: {}", e);
            None
        }
    };

    // ── Forget-token mode ────────────────────────────────────────────────
    if cli.forget_token {
        let store = store.context("No token cache location on this system")?;
        store.clear()?;
        if !cli.quiet {
            eprintln!("{} Removed {}", green("✔"), store.path().display());
        }
        return Ok(());
    }

    let Some(ref file_path) = cli.file else {
        anyhow::bail!("No PDF file given");
    };

    // ── Build request ────────────────────────────────────────────────────
    let token = match cli.token.clone().filter(|t| !t.trim().is_empty()) {
        Some(t) => t,
        None => load_cached_token(store.as_ref()).unwrap_or_default(),
    };
    let file = PdfFile::from_path(file_path)?;
    let request = UploadRequest::new(&cli.owner, &cli.repo, &cli.branch, token, file);

    let progress_cb: Option<ProgressCallback> = if show_progress {
        Some(CliProgressCallback::new() as Arc<dyn UploadProgressCallback>)
    } else {
        None
    };
    let config = build_config(&cli, progress_cb)?;

    // ── Validate, cache token, upload ────────────────────────────────────
    validate_request(&request, &config)?;

    if !cli.no_save_token {
        if let Some(ref store) = store {
            if let Err(e) = store.save(&request.credential) {
                warn!("Could not cache token: {}", e);
            }
        }
    }

    let result = upload(&request, &config).await?;
    render_result(&cli, &result)
}

/// Map CLI args to `UploadConfig`.
fn build_config(cli: &Cli, progress: Option<ProgressCallback>) -> Result<UploadConfig> {
    let mut builder = UploadConfig::builder()
        .api_base_url(&cli.api_url)
        .max_attempts(cli.max_attempts)
        .redirect_page(if cli.no_redirect {
            RedirectPage::Skip
        } else {
            RedirectPage::Publish
        });

    if let Some(ref pages) = cli.pages_url {
        builder = builder.pages_base_url(pages);
    }
    if let Some(secs) = cli.timeout {
        builder = builder.request_timeout_secs(secs);
    }
    if let Some(cb) = progress {
        builder = builder.progress_callback(cb);
    }

    Ok(builder.build()?)
}

fn load_cached_token(store: Option<&FileCredentialStore>) -> Option<String> {
    match store?.load() {
        Ok(token) => token,
        Err(e) => {
            warn!("Ignoring unreadable token cache: {}", e);
            None
        }
    }
}

fn render_result(cli: &Cli, result: &UploadResult) -> Result<()> {
    if cli.json {
        let json = serde_json::to_string_pretty(result).context("Failed to serialise result")?;
        println!("{json}");
        return Ok(());
    }

    if cli.quiet {
        println!("{}", result.html_url);
        return Ok(());
    }

    eprintln!("{} {}", green("✔"), bold("Upload successful!"));
    if result.has_redirect_page() {
        println!("Public URL (for email providers): {}", result.html_url);
    }
    println!("Direct PDF URL:                   {}", result.pdf_url);
    if result.attempts > 1 {
        eprintln!(
            "   {}",
            dim(&format!("took {} attempts (name collisions)", result.attempts))
        );
    }
    eprintln!(
        "   {}",
        dim("Note: if you just enabled GitHub Pages, the first deploy may take ~1–2 minutes.")
    );
    Ok(())
}
