use anyhow::Result;
use console::style;

use super::tui::print_success;
use crate::config::AppConfig;
use crate::settings::{JsonSettingsStore, Settings, SettingsStore};

pub async fn run_settings_show(name: &str, json: bool, config: &AppConfig) -> Result<()> {
    let store = JsonSettingsStore::new(config.settings_dir());
    let settings = store.load_or_default(name).await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&settings)?);
        return Ok(());
    }

    let origin = match store.saved_at(name)? {
        Some(at) => format!("saved {}", at.format("%Y-%m-%d %H:%M:%S")),
        None => "defaults, nothing saved yet".to_string(),
    };

    println!("\n{} {}\n", style(name).cyan().bold(), style(format!("({})", origin)).dim());
    print_settings(&settings);

    Ok(())
}

fn print_settings(settings: &Settings) {
    let model = settings
        .model()
        .map(|m| m.to_string())
        .unwrap_or_else(|_| format!("<invalid index {}>", settings.gpt_model_index));

    println!("  Model:             {}", style(model).green());
    println!("  Max tokens:        {}", settings.max_tokens);
    println!("  Temperature:       {:.1}", settings.temperature);
    println!("  Presence penalty:  {:.1}", settings.presence_penalty);
    println!("  Frequency penalty: {:.1}", settings.frequency_penalty);
    println!("  Chunk size:        {}", settings.data_chunk_size);
    println!("  Chunk overlap:     {}", settings.data_chunk_overlap);
    println!("  Query:             {}", style(&settings.embedding_query).yellow());
    println!("  Chunks retrieved:  {}", settings.number_of_docs);
    println!(
        "  Text:              {} characters",
        style(settings.text_data.chars().count()).cyan()
    );
    println!("\n  {}", style("System role:").bold());
    println!("{}", indent(&settings.system_role_prompt));
    println!("\n  {}", style("User prompt:").bold());
    println!("{}", indent(&settings.user_prompt));
}

fn indent(text: &str) -> String {
    text.lines()
        .map(|l| format!("    {}", l))
        .collect::<Vec<_>>()
        .join("\n")
}

pub async fn run_settings_reset(name: &str, config: &AppConfig) -> Result<()> {
    let store = JsonSettingsStore::new(config.settings_dir());
    if store.delete(name).await? {
        print_success(&format!("Settings '{}' reset to defaults.", name));
    } else {
        println!("No saved settings named '{}'.", name);
    }
    Ok(())
}

pub async fn run_settings_list(config: &AppConfig) -> Result<()> {
    let store = JsonSettingsStore::new(config.settings_dir());
    let names = store.list().await?;

    if names.is_empty() {
        println!("No saved settings in {}", store.dir().display());
        return Ok(());
    }

    for name in names {
        println!("{}", name);
    }
    Ok(())
}
