use anyhow::Result;
use inquire::validator::Validation;
use inquire::{CustomType, Editor, Password, PasswordDisplayMode, Select, Text};

use super::tui::{print_banner, ragsum_theme};
use crate::pipeline::{ChatModel, MAX_DOCS};
use crate::settings::{
    Settings, MAX_CHUNK_OVERLAP, MAX_CHUNK_SIZE, MAX_QUERY_CHARS, MAX_TOKENS_LIMIT,
};

/// Ask for the OpenAI key. It is used for this run only and never saved.
pub fn prompt_api_key() -> Result<String> {
    inquire::set_global_render_config(ragsum_theme());

    let key = Password::new("OpenAI API Key")
        .with_display_mode(PasswordDisplayMode::Masked)
        .without_confirmation()
        .with_help_message("Set OPENAI_API_KEY to skip this prompt.")
        .prompt()?;
    Ok(key)
}

/// Walk the user through every field, starting from `settings`.
pub fn prompt_settings(save_name: &str, mut settings: Settings) -> Result<Settings> {
    inquire::set_global_render_config(ragsum_theme());
    print_banner(save_name);

    let models: Vec<ChatModel> = ChatModel::ALL.to_vec();
    let start = settings.model().map(|m| m.index()).unwrap_or(1);
    let model = Select::new("Model", models)
        .with_starting_cursor(start)
        .with_help_message("Select the model to use.")
        .prompt()?;
    settings.set_model(model);

    settings.max_tokens = CustomType::<u32>::new("Max Tokens")
        .with_default(settings.max_tokens)
        .with_help_message("Defaults to 500.")
        .with_validator(move |v: &u32| bounded(*v, 1, MAX_TOKENS_LIMIT))
        .prompt()?;

    settings.temperature = prompt_float(
        "Temperature",
        settings.temperature,
        0.0,
        2.0,
        "Between 0 and 2. Higher values make the output more random, lower values more focused.",
    )?;
    settings.presence_penalty = prompt_float(
        "Presence Penalty",
        settings.presence_penalty,
        -2.0,
        2.0,
        "Positive values increase the model's likelihood to talk about new topics.",
    )?;
    settings.frequency_penalty = prompt_float(
        "Frequency Penalty",
        settings.frequency_penalty,
        -2.0,
        2.0,
        "Positive values decrease the model's likelihood to repeat the same line verbatim.",
    )?;

    settings.system_role_prompt = Editor::new("System Role")
        .with_predefined_text(&settings.system_role_prompt)
        .prompt()?;
    settings.user_prompt = Editor::new("User Prompt")
        .with_predefined_text(&settings.user_prompt)
        .with_help_message("{summary_data} is replaced by the retrieved text")
        .prompt()?;
    settings.text_data = Editor::new("Text to summarize")
        .with_predefined_text(&settings.text_data)
        .prompt()?;

    settings.data_chunk_size = CustomType::<usize>::new("Embedding query chunk size")
        .with_default(settings.data_chunk_size)
        .with_validator(move |v: &usize| bounded(*v, 1, MAX_CHUNK_SIZE))
        .prompt()?;
    settings.data_chunk_overlap = CustomType::<usize>::new("Embedding query chunk overlap")
        .with_default(settings.data_chunk_overlap)
        .with_validator(move |v: &usize| bounded(*v, 1, MAX_CHUNK_OVERLAP))
        .prompt()?;

    settings.embedding_query = Text::new("Query To Retrieve Embedding")
        .with_initial_value(&settings.embedding_query)
        .with_help_message("Enter the query for the embedding to retrieve.")
        .with_validator(|v: &str| -> Result<Validation, inquire::CustomUserError> {
            Ok(if v.chars().count() > MAX_QUERY_CHARS {
                Validation::Invalid(format!("at most {} characters", MAX_QUERY_CHARS).into())
            } else {
                Validation::Valid
            })
        })
        .prompt()?;

    settings.number_of_docs = CustomType::<usize>::new("Number of text chunks to retrieve")
        .with_default(settings.number_of_docs)
        .with_validator(move |v: &usize| bounded(*v, 1, MAX_DOCS))
        .prompt()?;

    Ok(settings)
}

fn prompt_float(label: &str, current: f32, min: f32, max: f32, help: &str) -> Result<f32> {
    let value = CustomType::<f32>::new(label)
        .with_default(current)
        .with_help_message(help)
        .with_validator(move |v: &f32| -> Result<Validation, inquire::CustomUserError> {
            Ok(if (min..=max).contains(v) {
                Validation::Valid
            } else {
                Validation::Invalid(format!("must be between {} and {}", min, max).into())
            })
        })
        .prompt()?;
    Ok(value)
}

fn bounded<T: PartialOrd + std::fmt::Display>(
    value: T,
    min: T,
    max: T,
) -> Result<Validation, inquire::CustomUserError> {
    Ok(if value < min || value > max {
        Validation::Invalid(format!("must be between {} and {}", min, max).into())
    } else {
        Validation::Valid
    })
}
