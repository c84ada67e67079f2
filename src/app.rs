use std::io::Write;
use std::path::PathBuf;
use std::time::Duration;

use clap::{error::ErrorKind, Parser};
use colored::Colorize;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::time::Instant;
use tracing_subscriber::EnvFilter;

use crate::cli::args::CliArgs;
use crate::cli::validation;
use crate::config::{self, ConfigFile};
use crate::editor::{Editor, EditorOptions, DEFAULT_FILE_NAME};
use crate::output::format_kv_line;
use crate::pagination;
use crate::scheduler;
use crate::shell::{self, Shell};
use crate::translate::{self, TranslatorConfig};

fn print_banner() {
    const BANNER: &str = r#"
                        _              ___ __
  ___ _  _____ ________(_)__ ___ ___  / __/ /__ __
 / -_) |/ / -_) __/ __/ (_-</ -_)___/ _// / _ / _/
 \__/|_/\_\\__/_/  \__/_/___/\__/   /___/_\_,_/\__/
"#;
    print!("{}", BANNER.bold().blue());
    println!("       v{} - exercise dataset editor", env!("CARGO_PKG_VERSION"));
    println!();
}

#[derive(Clone, Debug)]
struct RunConfig {
    file: Option<PathBuf>,
    config_path: Option<PathBuf>,
    page_size: usize,
    delete_window: Duration,
    api_key: Option<String>,
    translator: TranslatorConfig,
    no_color: bool,
    verbose: u8,
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn build_run_config(
    args: CliArgs,
    cfg: ConfigFile,
    config_path: Option<PathBuf>,
) -> Result<RunConfig, String> {
    validation::validate(&args)?;

    let page_size = args
        .page_size
        .or(cfg.page_size)
        .unwrap_or(pagination::DEFAULT_PAGE_SIZE);
    validation::validate_page_size(page_size)
        .map_err(|e| format!("invalid page_size {page_size} in config: {e}"))?;

    let delete_window = match args.delete_window.or(cfg.delete_window) {
        Some(seconds) => {
            validation::validate_delete_window(seconds)
                .map_err(|e| format!("invalid delete_window {seconds} in config: {e}"))?;
            Duration::from_secs(seconds)
        }
        None => scheduler::DEFAULT_DELETE_WINDOW,
    };

    let timeout_seconds = args
        .timeout
        .or(cfg.timeout)
        .unwrap_or(translate::DEFAULT_TIMEOUT_SECONDS);
    if timeout_seconds == 0 {
        return Err("invalid timeout 0 in config, expected positive integer".to_string());
    }

    let translator = TranslatorConfig {
        endpoint: non_blank(args.endpoint.or(cfg.endpoint))
            .unwrap_or_else(|| translate::DEFAULT_ENDPOINT.to_string()),
        model: non_blank(args.model.or(cfg.model))
            .unwrap_or_else(|| translate::DEFAULT_MODEL.to_string()),
        target_language: non_blank(args.target_language.or(cfg.target_language))
            .unwrap_or_else(|| translate::DEFAULT_TARGET_LANGUAGE.to_string()),
        timeout_seconds,
        proxy: non_blank(args.proxy.or(cfg.proxy)),
    };

    let file = non_blank(args.file.or(cfg.file)).map(|p| config::expand_tilde(&p));

    Ok(RunConfig {
        file,
        config_path,
        page_size,
        delete_window,
        api_key: non_blank(args.api_key.or(cfg.api_key)),
        translator,
        no_color: args.no_color || cfg.no_color.unwrap_or(false),
        verbose: args.verbose,
    })
}

fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("exercise_editor={level}")));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}

fn print_settings(run: &RunConfig) {
    println!(
        "{}",
        format_kv_line(
            "File",
            &run
                .file
                .as_ref()
                .map(|p| p.display().to_string())
                .unwrap_or_else(|| format!("none (saves to {DEFAULT_FILE_NAME})")),
        )
    );
    println!("{}", format_kv_line("Page size", &run.page_size.to_string()));
    println!(
        "{}",
        format_kv_line("Undo", &format!("{}s", run.delete_window.as_secs()))
    );
    println!(
        "{}",
        format_kv_line(
            "Translate",
            &format!(
                "{} -> {} ({})",
                run.translator.model,
                run.translator.target_language,
                if run.api_key.is_some() { "key set" } else { "no key" }
            ),
        )
    );
    println!();
}

fn prompt() {
    print!("{} ", ">".bold().green());
    let _ = std::io::stdout().flush();
}

async fn run_async(run: RunConfig) -> Result<(), String> {
    if run.no_color {
        colored::control::set_override(false);
    }
    print_banner();
    print_settings(&run);

    let file_name = run
        .file
        .as_ref()
        .and_then(|p| p.file_name())
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_else(|| DEFAULT_FILE_NAME.to_string());
    let editor = Editor::new(EditorOptions {
        page_size: run.page_size,
        delete_window: run.delete_window,
        file_name,
    });
    let mut shell = Shell::new(editor, run.config_path, run.api_key, run.translator);

    if let Some(path) = run.file.as_deref() {
        match shell.load(path).await {
            Ok(message) => println!("{message}"),
            Err(e) => println!("{}", shell::error_notice(&e)),
        }
    }
    print!("{}", shell.listing(Instant::now()));
    println!("type 'help' for commands");

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut read_error = None;
    loop {
        prompt();
        let deadline = shell.next_deadline();
        tokio::select! {
            line = lines.next_line() => match line {
                Ok(Some(line)) => match shell.handle_line(&line).await {
                    Some(out) => print!("{out}"),
                    None => break,
                },
                Ok(None) => {
                    println!();
                    break;
                }
                Err(e) => {
                    read_error = Some(format!("failed to read input: {e}"));
                    break;
                }
            },
            _ = shell::sleep_until_deadline(deadline) => {
                if let Some(notice) = shell.fire_due(Instant::now()) {
                    println!();
                    print!("{notice}");
                }
            }
            _ = tokio::signal::ctrl_c() => {
                println!();
                break;
            }
        }
    }

    if let Some(notice) = shell.teardown() {
        println!("{notice}");
    }
    match read_error {
        Some(e) => Err(e),
        None => Ok(()),
    }
}

pub fn run_cli() -> Result<(), String> {
    let args = match CliArgs::try_parse() {
        Ok(args) => args,
        Err(e) => match e.kind() {
            ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => {
                print!("{e}");
                return Ok(());
            }
            _ => return Err(e.to_string()),
        },
    };

    let user_config_path = args.config.as_deref().map(config::expand_tilde);
    let config_path = user_config_path.clone().or_else(config::default_config_path);

    if args.init_config {
        let path = config_path
            .as_deref()
            .ok_or_else(|| "cannot resolve a home directory for the config file".to_string())?;
        if config::ensure_default_config_file(path)? {
            println!("wrote default config to {}", path.display());
        } else {
            println!("config already exists at {}", path.display());
        }
        return Ok(());
    }

    let cfg = match (user_config_path.as_deref(), config_path.as_deref()) {
        (Some(path), _) => config::load_config(path, false)?,
        (None, Some(path)) => config::load_config(path, true)?,
        (None, None) => ConfigFile::default(),
    };

    let run = build_run_config(args, cfg, config_path)?;
    init_tracing(run.verbose);
    tracing::debug!(config = ?run.config_path, page_size = run.page_size, "starting editor");

    let rt = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .map_err(|e| format!("failed to build runtime: {e}"))?;

    rt.block_on(run_async(run))
}

#[cfg(test)]
mod cli_tests {
    use super::*;

    fn args(extra: &[&str]) -> CliArgs {
        let mut argv = vec!["exercise-editor"];
        argv.extend_from_slice(extra);
        CliArgs::parse_from(argv)
    }

    #[test]
    fn defaults_apply_without_config() {
        let run = build_run_config(args(&[]), ConfigFile::default(), None).unwrap();
        assert_eq!(run.page_size, 20);
        assert_eq!(run.delete_window, Duration::from_secs(5));
        assert_eq!(run.translator.model, translate::DEFAULT_MODEL);
        assert!(run.file.is_none());
        assert!(!run.no_color);
    }

    #[test]
    fn cli_overrides_config_which_overrides_defaults() {
        let cfg = ConfigFile {
            page_size: Some(50),
            delete_window: Some(8),
            model: Some("from-config".to_string()),
            api_key: Some("cfg-key".to_string()),
            no_color: Some(true),
            ..Default::default()
        };
        let run = build_run_config(
            args(&["--page-size", "100", "--api-key", "cli-key"]),
            cfg,
            None,
        )
        .unwrap();
        assert_eq!(run.page_size, 100);
        assert_eq!(run.delete_window, Duration::from_secs(8));
        assert_eq!(run.translator.model, "from-config");
        assert_eq!(run.api_key.as_deref(), Some("cli-key"));
        assert!(run.no_color);
    }

    #[test]
    fn invalid_config_values_are_rejected() {
        let cfg = ConfigFile {
            page_size: Some(30),
            ..Default::default()
        };
        let err = build_run_config(args(&[]), cfg, None).unwrap_err();
        assert!(err.contains("page_size"));

        let cfg = ConfigFile {
            delete_window: Some(0),
            ..Default::default()
        };
        assert!(build_run_config(args(&[]), cfg, None).is_err());
    }

    #[test]
    fn blank_api_key_counts_as_missing() {
        let cfg = ConfigFile {
            api_key: Some("   ".to_string()),
            ..Default::default()
        };
        let run = build_run_config(args(&["--api-key", "  "]), cfg, None).unwrap();
        assert!(run.api_key.is_none());
    }
}
