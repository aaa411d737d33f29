use clap::{Args, Parser, Subcommand};
use miette::{IntoDiagnostic, Result, miette};
use mime_sniffer::MimeTypeSniffer;
use quire_common::config::{Config, FileStore};
use quire_common::telemetry::{self, TelemetryConfig};
use quire_common::{ApiClient, QuireError, SubmitTarget};
use quire_editor_core::{EditorController, EditorMode, Submission, mode};
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(version, about = "Quire - write and manage posts from the command line", long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Path to config file (.toml or .json)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Server base URL, e.g. http://localhost:8000
    #[arg(long, global = true)]
    endpoint: Option<String>,

    /// Token sent as X-CSRFToken
    #[arg(long, global = true)]
    csrf_token: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Render a Markdown file to HTML on stdout
    Preview {
        /// Markdown source
        file: PathBuf,
    },
    /// Create a new entry
    Post {
        /// Author id or uuid
        #[arg(long)]
        author: String,

        #[command(flatten)]
        draft: DraftArgs,
    },
    /// Replace an existing entry
    Edit {
        /// Author id or uuid
        #[arg(long)]
        author: String,

        /// Entry id or uuid
        #[arg(long)]
        entry: String,

        #[command(flatten)]
        draft: DraftArgs,
    },
    /// Delete an entry
    Delete {
        /// Author id or uuid
        #[arg(long)]
        author: String,

        /// Entry id or uuid
        #[arg(long)]
        entry: String,
    },
    /// Print the resolved configuration
    Config {
        /// Also write it to the config file
        #[arg(long)]
        save: bool,
    },
}

#[derive(Args, Debug, Clone)]
struct DraftArgs {
    #[arg(long, default_value = "")]
    title: String,

    #[arg(long, default_value = "")]
    description: String,

    #[arg(long, default_value = "PUBLIC")]
    visibility: String,

    /// text/plain, text/markdown or image
    #[arg(long = "content-type", default_value = mode::PLAIN_TEXT)]
    content_type: String,

    /// Append an image to a Markdown body: "URL" or "URL alt text"
    #[arg(long = "image-link")]
    image_links: Vec<String>,

    /// Body text, or the image itself with --content-type image
    file: PathBuf,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    init_miette();
    telemetry::init(TelemetryConfig::from_env("quire-cli"));

    let cli = Cli::parse();
    let config_path = match &cli.config {
        Some(path) => path.clone(),
        None => default_config_path()?,
    };
    let config = resolve_config(&cli, &config_path).await?;
    tracing::debug!(endpoint = %config.endpoint, "configuration resolved");

    match cli.command {
        Commands::Preview { file } => {
            println!("{}", preview(&read_text(&file)?));
        }
        Commands::Post { author, draft } => {
            submit(&config, SubmitTarget::create(author), &draft).await?;
        }
        Commands::Edit {
            author,
            entry,
            draft,
        } => {
            submit(&config, SubmitTarget::update(author, entry), &draft).await?;
        }
        Commands::Delete { author, entry } => {
            let client = ApiClient::new(&config)?;
            client
                .delete_entry(&author, &entry)
                .await
                .map_err(|e| report(e, "Failed to delete the post."))?;
            println!("✓ Post deleted successfully.");
        }
        Commands::Config { save } => {
            print!("{}", toml_string(&config)?);
            if save {
                if let Some(parent) = config_path.parent() {
                    std::fs::create_dir_all(parent).into_diagnostic()?;
                }
                config.save(&FileStore::new(&config_path)).await?;
                println!("✓ Saved to {}", config_path.display());
            }
        }
    }

    Ok(())
}

/// File, then environment, then flags.
async fn resolve_config(cli: &Cli, path: &Path) -> Result<Config> {
    let base = if cli.config.is_some() || path.exists() {
        Config::load(&FileStore::new(path)).await?
    } else {
        Config::default()
    };
    let config = base.with_overrides(|key| std::env::var(key).ok());
    Ok(apply_flags(config, cli.endpoint.clone(), cli.csrf_token.clone()))
}

fn apply_flags(mut config: Config, endpoint: Option<String>, csrf_token: Option<String>) -> Config {
    if let Some(endpoint) = endpoint {
        config.endpoint = endpoint;
    }
    if csrf_token.is_some() {
        config.csrf_token = csrf_token;
    }
    config
}

fn preview(markdown: &str) -> String {
    let mut editor = EditorController::new();
    editor.set_content_type(mode::MARKDOWN);
    editor.on_text_changed(markdown);
    editor.preview_html().to_string()
}

/// Drive an editor the way a user would: pick the mode, then fill it in.
fn build_editor(draft: &DraftArgs) -> Result<EditorController> {
    let mut editor = EditorController::new();
    editor.set_content_type(&draft.content_type);
    editor.set_title(&draft.title);
    editor.set_description(&draft.description);
    editor.set_visibility(&draft.visibility);

    if editor.mode() == EditorMode::Image {
        let bytes = std::fs::read(&draft.file).into_diagnostic()?;
        let slice = bytes.as_slice();
        let mime = slice.sniff_mime_type().unwrap_or_default();
        tracing::debug!(mime, len = bytes.len(), "image read");
        editor.attach_image_file(Some(&bytes), mime);
    } else {
        editor.on_text_changed(&read_text(&draft.file)?);
    }

    for link in &draft.image_links {
        let (url, alt) = parse_image_link(link);
        if !editor.insert_markdown_image_link(url, alt) {
            return Err(miette!(
                "--image-link needs --content-type {} and a URL",
                mode::MARKDOWN
            ));
        }
    }
    Ok(editor)
}

/// `"URL"` or `"URL alt text"`.
fn parse_image_link(value: &str) -> (&str, &str) {
    let value = value.trim();
    match value.split_once(char::is_whitespace) {
        Some((url, alt)) => (url, alt.trim()),
        None => (value, ""),
    }
}

async fn submit(config: &Config, target: SubmitTarget, draft: &DraftArgs) -> Result<()> {
    let editor = build_editor(draft)?;
    let client = ApiClient::new(config)?;
    let url = client.url(&target.path())?;
    let submission = Submission::new(client, target);

    println!("→ Submitting to {url}");
    match submission.submit(&editor).await {
        Ok(entry) => {
            println!("✓ {}", submission.target().success_message());
            if let Some(id) = entry.id {
                println!("✓ Entry: {id}");
            }
            Ok(())
        }
        Err(e) => {
            let message = e.user_message("Failed to save the post.");
            Err(miette::Report::new(e).wrap_err(message))
        }
    }
}

fn report(err: QuireError, fallback: &str) -> miette::Report {
    let message = err.user_message(fallback);
    miette::Report::new(err).wrap_err(message)
}

fn read_text(path: &Path) -> Result<String> {
    std::fs::read_to_string(path)
        .into_diagnostic()
        .map_err(|e| e.wrap_err(format!("Could not read {}", path.display())))
}

fn toml_string(config: &Config) -> Result<String> {
    toml::to_string_pretty(config).into_diagnostic()
}

fn default_config_path() -> Result<PathBuf> {
    dirs::config_dir()
        .map(|dir| dir.join("quire").join("config.toml"))
        .ok_or_else(|| miette!("Could not determine config directory"))
}

fn init_miette() {
    let _ = miette::set_hook(Box::new(|_| {
        Box::new(
            miette::MietteHandlerOpts::new()
                .terminal_links(true)
                .with_cause_chain()
                .color(true)
                .context_lines(5)
                .tab_width(2)
                .break_words(true)
                .build(),
        )
    }));
    miette::set_panic_hook();
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_file(name: &str, contents: &[u8]) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("quire-cli-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join(name);
        std::fs::write(&path, contents).unwrap();
        path
    }

    fn draft(content_type: &str, file: PathBuf) -> DraftArgs {
        DraftArgs {
            title: " Hello ".into(),
            description: String::new(),
            visibility: "friends".into(),
            content_type: content_type.into(),
            image_links: Vec::new(),
            file,
        }
    }

    #[test]
    fn test_cli_parses_post() {
        let cli = Cli::try_parse_from([
            "quire",
            "--endpoint",
            "http://node:8000",
            "post",
            "--author",
            "42",
            "--content-type",
            "text/markdown",
            "--image-link",
            "http://x/y.png cat",
            "body.md",
        ])
        .unwrap();
        assert_eq!(cli.endpoint.as_deref(), Some("http://node:8000"));
        match cli.command {
            Commands::Post { author, draft } => {
                assert_eq!(author, "42");
                assert_eq!(draft.content_type, "text/markdown");
                assert_eq!(draft.visibility, "PUBLIC");
                assert_eq!(draft.image_links, vec!["http://x/y.png cat".to_string()]);
            }
            _ => panic!("expected post"),
        }
    }

    #[test]
    fn test_parse_image_link() {
        assert_eq!(parse_image_link("http://x/y.png"), ("http://x/y.png", ""));
        assert_eq!(
            parse_image_link(" http://x/y.png  a cat "),
            ("http://x/y.png", "a cat")
        );
    }

    #[test]
    fn test_flags_override_config() {
        let config = apply_flags(Config::default(), Some("http://other".into()), None);
        assert_eq!(config.endpoint, "http://other");
        assert_eq!(config.csrf_token, None);
        let config = apply_flags(config, None, Some("tok".into()));
        assert_eq!(config.endpoint, "http://other");
        assert_eq!(config.csrf_token.as_deref(), Some("tok"));
    }

    #[test]
    fn test_preview_renders_markdown() {
        assert!(preview("# Title").contains("Title</h1>"));
        assert_eq!(preview(""), "");
    }

    #[test]
    fn test_build_markdown_draft_with_links() {
        let file = temp_file("post.md", b"some *text*\n");
        let mut args = draft(mode::MARKDOWN, file);
        args.image_links = vec!["http://x/y.png cat".into()];

        let payload = build_editor(&args)
            .unwrap()
            .build_submission_payload()
            .unwrap();
        assert_eq!(payload.title, "Hello");
        assert_eq!(payload.visibility, "FRIENDS");
        assert_eq!(payload.content_type, "text/markdown");
        assert_eq!(payload.content, "some *text*\n\n\n![cat](http://x/y.png)");
    }

    #[test]
    fn test_image_link_outside_markdown_is_an_error() {
        let file = temp_file("plain.txt", b"words");
        let mut args = draft(mode::PLAIN_TEXT, file);
        args.image_links = vec!["http://x/y.png".into()];
        assert!(build_editor(&args).is_err());
    }

    #[test]
    fn test_build_image_draft_sniffs_png() {
        let png = b"\x89PNG\r\n\x1a\n\0\0\0\rIHDR";
        let file = temp_file("pic.png", png);
        let payload = build_editor(&draft(mode::IMAGE, file))
            .unwrap()
            .build_submission_payload()
            .unwrap();
        assert_eq!(payload.content_type, "image/png;base64");
    }

    #[test]
    fn test_unknown_image_bytes_fall_back() {
        let file = temp_file("blob.bin", b"not an image");
        let payload = build_editor(&draft(mode::IMAGE, file))
            .unwrap()
            .build_submission_payload()
            .unwrap();
        assert_eq!(payload.content_type, "application/base64");
    }

    #[test]
    fn test_format_toml() {
        let config = Config {
            endpoint: "http://localhost:8000".into(),
            csrf_token: Some("tok".into()),
            session_cookie: None,
        };
        let out = toml_string(&config).unwrap();
        assert!(out.contains(r#"endpoint = "http://localhost:8000""#));
        assert!(out.contains(r#"csrf_token = "tok""#));
        assert!(!out.contains("session_cookie"));
    }
}
