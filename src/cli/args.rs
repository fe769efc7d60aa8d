use clap::{Args as ClapArgs, Parser, Subcommand};
use std::path::PathBuf;

use crate::config::API_KEY_ENV;
use crate::pipeline::ChatModel;
use crate::settings::DEFAULT_SAVE_NAME;

#[derive(Parser, Debug)]
#[command(name = "ragsum", version, about = "Summarize text with retrieval-augmented prompting")]
pub struct Args {
    /// Path to config.toml (defaults to the user config directory)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Print pipeline progress and HTTP details to stderr
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Chunk, embed, retrieve and summarize text
    Run(RunArgs),

    /// Inspect or reset saved settings
    Settings {
        #[command(subcommand)]
        action: SettingsAction,
    },
}

#[derive(Subcommand, Debug)]
pub enum SettingsAction {
    /// Show the saved settings for a save-name
    Show {
        #[arg(default_value = DEFAULT_SAVE_NAME)]
        name: String,
        #[arg(long)]
        json: bool,
    },
    /// Delete the saved settings for a save-name
    Reset {
        #[arg(default_value = DEFAULT_SAVE_NAME)]
        name: String,
    },
    /// List save-names
    List,
}

/// Flags override the last saved values; anything omitted is reused.
#[derive(ClapArgs, Debug, Default)]
pub struct RunArgs {
    /// Settings snapshot to load from and save to
    #[arg(long, default_value = DEFAULT_SAVE_NAME)]
    pub save_name: String,

    #[arg(long, env = API_KEY_ENV, hide_env_values = true, default_value = "")]
    pub api_key: String,

    /// gpt-4 or gpt-3.5-turbo
    #[arg(long)]
    pub model: Option<ChatModel>,

    #[arg(long)]
    pub max_tokens: Option<u32>,

    #[arg(long)]
    pub temperature: Option<f32>,

    #[arg(long, allow_negative_numbers = true)]
    pub presence_penalty: Option<f32>,

    #[arg(long, allow_negative_numbers = true)]
    pub frequency_penalty: Option<f32>,

    #[arg(long)]
    pub system_prompt: Option<String>,

    /// User prompt template; `{summary_data}` is replaced by the retrieved text
    #[arg(long)]
    pub user_prompt: Option<String>,

    /// Text to summarize
    #[arg(long, conflicts_with = "text_file")]
    pub text: Option<String>,

    /// Read the text to summarize from a file, or `-` for stdin
    #[arg(long)]
    pub text_file: Option<PathBuf>,

    #[arg(long)]
    pub chunk_size: Option<usize>,

    #[arg(long)]
    pub chunk_overlap: Option<usize>,

    /// Query used to pick the most relevant chunks
    #[arg(short, long)]
    pub query: Option<String>,

    /// Number of chunks to retrieve (1-10)
    #[arg(short = 'k', long)]
    pub docs: Option<usize>,

    /// Fill in every field with prompts, prefilled from the saved values
    #[arg(short, long)]
    pub interactive: bool,

    #[arg(long)]
    pub json: bool,
}
