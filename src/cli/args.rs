use clap::{ArgAction, Parser};

#[derive(Parser, Debug, Clone)]
#[command(
    name = "exercise-editor",
    version,
    about = "interactive editor for exercise JSON datasets",
    long_about = "exercise-editor loads an exercise JSON dataset, lets you filter, page through, add, edit and delete records, translates names and instructions through a generative-language API, and saves the result back to disk.\n\nExamples:\n  exercise-editor -f ./exercises.json\n  exercise-editor -f ./exercises.json --page-size 50 --delete-window 10\n  exercise-editor --init-config\n\nType 'help' inside the shell for the list of commands."
)]
pub struct CliArgs {
    #[arg(
        short = 'v',
        long = "verbose",
        action = ArgAction::Count,
        help_heading = "Output",
        help = "Increase log verbosity (-v info, -vv debug)."
    )]
    pub verbose: u8,

    #[arg(
        short = 'n',
        long = "no-color",
        help_heading = "Output",
        help = "Disable colored output."
    )]
    pub no_color: bool,

    #[arg(
        short = 'f',
        long = "file",
        visible_alias = "input",
        value_name = "FILE",
        help_heading = "Input",
        help = "Exercise JSON file to load at startup."
    )]
    pub file: Option<String>,

    #[arg(
        short = 'C',
        long = "config",
        value_name = "FILE",
        help_heading = "Input",
        help = "Path to config file (defaults to ~/.exercise-editor/config.yml)."
    )]
    pub config: Option<String>,

    #[arg(
        long = "init-config",
        help_heading = "Input",
        help = "Write a commented default config file if none exists, then exit."
    )]
    pub init_config: bool,

    #[arg(
        short = 's',
        long = "page-size",
        value_name = "N",
        help_heading = "Listing",
        help = "Exercises per page (10, 20, 50 or 100)."
    )]
    pub page_size: Option<usize>,

    #[arg(
        short = 'd',
        long = "delete-window",
        value_name = "SECONDS",
        help_heading = "Listing",
        help = "Seconds a delete can be undone before it is committed."
    )]
    pub delete_window: Option<u64>,

    #[arg(
        short = 'k',
        long = "api-key",
        env = "GEMINI_API_KEY",
        hide_env_values = true,
        value_name = "KEY",
        help_heading = "Translation",
        help = "API key for the translation service (overrides the config file)."
    )]
    pub api_key: Option<String>,

    #[arg(
        short = 'm',
        long = "model",
        value_name = "MODEL",
        help_heading = "Translation",
        help = "Model used for translation."
    )]
    pub model: Option<String>,

    #[arg(
        long = "endpoint",
        value_name = "URL",
        help_heading = "Translation",
        help = "Base URL of the translation API."
    )]
    pub endpoint: Option<String>,

    #[arg(
        short = 'l',
        long = "language",
        visible_alias = "target-language",
        value_name = "LANGUAGE",
        help_heading = "Translation",
        help = "Language the localized fields are translated into."
    )]
    pub target_language: Option<String>,

    #[arg(
        short = 'T',
        long = "timeout",
        value_name = "SECONDS",
        help_heading = "HTTP",
        help = "Per-request timeout in seconds."
    )]
    pub timeout: Option<u64>,

    #[arg(
        short = 'p',
        long = "proxy",
        value_name = "URL",
        help_heading = "HTTP",
        help = "HTTP proxy URL (e.g. http://127.0.0.1:8080)."
    )]
    pub proxy: Option<String>,
}
