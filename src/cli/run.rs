use anyhow::{bail, Context, Result};
use console::{style, Emoji};
use indicatif::{ProgressBar, ProgressStyle};
use serde::Serialize;
use std::fs;
use std::io::Read;
use std::path::Path;
use std::sync::Arc;
use std::time::{Duration, Instant};

use super::args::RunArgs;
use super::form::{prompt_api_key, prompt_settings};
use crate::config::AppConfig;
use crate::pipeline::{
    create_embedder, ChatClient, Embedder, EmbedderConfig, OpenAiChatClient, Summarizer,
    SummaryOutcome,
};
use crate::settings::{JsonSettingsStore, Settings, SettingsStore};

static SUMMARY: Emoji<'_, '_> = Emoji("📝 ", "");
static SUCCESS: Emoji<'_, '_> = Emoji("✅ ", "");

#[derive(Serialize)]
struct JsonReport<'a> {
    #[serde(flatten)]
    outcome: &'a SummaryOutcome,
    elapsed_secs: u64,
}

pub async fn run_summarize(args: RunArgs, config: &AppConfig) -> Result<()> {
    let api_key = resolve_api_key(&args.api_key, args.interactive, prompt_api_key)?;

    let store = Arc::new(JsonSettingsStore::new(config.settings_dir()));
    let mut settings = store.load_or_default(&args.save_name).await?;
    apply_overrides(&mut settings, &args)?;

    if args.interactive {
        settings = prompt_settings(&args.save_name, settings)?;
    }

    let embedder: Arc<dyn Embedder> =
        Arc::from(create_embedder(&EmbedderConfig::from_app(config, &api_key))?);
    let chat: Arc<dyn ChatClient> = Arc::new(OpenAiChatClient::new(
        &config.api_base,
        &api_key,
        config.request_timeout_secs,
    )?);

    let pb = if args.json {
        ProgressBar::hidden()
    } else {
        let pb = ProgressBar::new_spinner();
        pb.set_style(ProgressStyle::default_spinner().template("{spinner:.green} {msg}")?);
        pb.set_message("Processing text data...");
        pb.enable_steady_tick(Duration::from_millis(100));
        pb
    };

    let spinner = pb.clone();
    let summarizer = Summarizer::new(embedder, chat, store)
        .with_batch_size(config.embedding_batch_size)
        .with_progress(move |stage| spinner.set_message(stage.to_string()));

    let start = Instant::now();
    let result = summarizer.run(&args.save_name, &settings).await;
    pb.finish_and_clear();
    let outcome = result?;
    let elapsed = start.elapsed().as_secs();

    if args.json {
        let report = JsonReport {
            outcome: &outcome,
            elapsed_secs: elapsed,
        };
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    println!(
        "{}Text data processed! Elapsed time: {} seconds\n",
        SUCCESS, elapsed
    );
    println!("{}{}", SUMMARY, style("Output").bold());
    println!(
        "{}",
        style(format!(
            "result ({} total tokens consumed). Cost: ${:.5}",
            outcome.total_tokens, outcome.total_cost
        ))
        .dim()
    );
    println!();
    println!("{}", outcome.summary);

    Ok(())
}

/// Pick the key from flags or env, falling back to `prompt` in interactive mode.
pub fn resolve_api_key<F>(given: &str, interactive: bool, prompt: F) -> Result<String>
where
    F: FnOnce() -> Result<String>,
{
    let given = given.trim();
    if !given.is_empty() {
        return Ok(given.to_string());
    }

    if interactive {
        let entered = prompt()?;
        let entered = entered.trim();
        if !entered.is_empty() {
            return Ok(entered.to_string());
        }
    }

    bail!("Missing API key. Set OPENAI_API_KEY or pass --api-key")
}

/// Overlay command-line flags on the saved settings.
pub fn apply_overrides(settings: &mut Settings, args: &RunArgs) -> Result<()> {
    if let Some(model) = args.model {
        settings.set_model(model);
    }
    if let Some(v) = args.max_tokens {
        settings.max_tokens = v;
    }
    if let Some(v) = args.temperature {
        settings.temperature = v;
    }
    if let Some(v) = args.presence_penalty {
        settings.presence_penalty = v;
    }
    if let Some(v) = args.frequency_penalty {
        settings.frequency_penalty = v;
    }
    if let Some(v) = &args.system_prompt {
        settings.system_role_prompt = v.clone();
    }
    if let Some(v) = &args.user_prompt {
        settings.user_prompt = v.clone();
    }
    if let Some(v) = &args.text {
        settings.text_data = v.clone();
    }
    if let Some(path) = &args.text_file {
        settings.text_data = read_text(path)?;
    }
    if let Some(v) = args.chunk_size {
        settings.data_chunk_size = v;
    }
    if let Some(v) = args.chunk_overlap {
        settings.data_chunk_overlap = v;
    }
    if let Some(v) = &args.query {
        settings.embedding_query = v.clone();
    }
    if let Some(v) = args.docs {
        settings.number_of_docs = v;
    }
    Ok(())
}

fn read_text(path: &Path) -> Result<String> {
    if path == Path::new("-") {
        let mut buf = String::new();
        std::io::stdin()
            .read_to_string(&mut buf)
            .context("Failed to read text from stdin")?;
        return Ok(buf);
    }

    fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::ChatModel;

    #[test]
    fn test_overrides_only_touch_given_flags() {
        let mut settings = Settings {
            embedding_query: "old query".to_string(),
            text_data: "old text".to_string(),
            ..Default::default()
        };
        let args = RunArgs {
            model: Some(ChatModel::Gpt4),
            frequency_penalty: Some(-1.5),
            query: Some("new query".to_string()),
            docs: Some(4),
            ..Default::default()
        };

        apply_overrides(&mut settings, &args).unwrap();

        assert_eq!(settings.gpt_model_index, 0);
        assert_eq!(settings.frequency_penalty, -1.5);
        assert_eq!(settings.embedding_query, "new query");
        assert_eq!(settings.number_of_docs, 4);
        assert_eq!(settings.text_data, "old text");
        assert_eq!(settings.max_tokens, 500);
    }

    #[test]
    fn test_text_file_override() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("input.txt");
        fs::write(&path, "from a file\nsecond line").unwrap();

        let mut settings = Settings::default();
        let args = RunArgs {
            text_file: Some(path),
            ..Default::default()
        };
        apply_overrides(&mut settings, &args).unwrap();
        assert_eq!(settings.text_data, "from a file\nsecond line");
    }

    #[test]
    fn test_given_key_skips_prompt() {
        let key = resolve_api_key(" sk-given ", true, || panic!("should not prompt")).unwrap();
        assert_eq!(key, "sk-given");
    }

    #[test]
    fn test_interactive_prompts_for_missing_key() {
        let mut prompted = 0;
        let key = resolve_api_key("", true, || {
            prompted += 1;
            Ok("sk-typed".to_string())
        })
        .unwrap();

        assert_eq!(key, "sk-typed");
        assert_eq!(prompted, 1);
    }

    #[test]
    fn test_missing_key_fails_without_prompting() {
        let err = resolve_api_key("  ", false, || panic!("should not prompt")).unwrap_err();
        assert!(err.to_string().contains("Missing API key"));

        let err = resolve_api_key("", true, || Ok(String::new())).unwrap_err();
        assert!(err.to_string().contains("Missing API key"));
    }

    #[test]
    fn test_json_report_flattens_outcome() {
        let outcome = SummaryOutcome {
            summary: "Short.".to_string(),
            total_tokens: 120,
            total_cost: 0.00019,
            chunk_count: 3,
        };
        let report = JsonReport {
            outcome: &outcome,
            elapsed_secs: 4,
        };

        let value = serde_json::to_value(&report).unwrap();
        assert_eq!(value["summary"], "Short.");
        assert_eq!(value["total_tokens"], 120);
        assert_eq!(value["chunk_count"], 3);
        assert_eq!(value["elapsed_secs"], 4);
    }

    #[test]
    fn test_missing_text_file() {
        let mut settings = Settings::default();
        let args = RunArgs {
            text_file: Some("/nonexistent/input.txt".into()),
            ..Default::default()
        };
        let err = apply_overrides(&mut settings, &args).unwrap_err();
        assert!(err.to_string().contains("Failed to read"));
    }
}
