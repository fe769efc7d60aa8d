use once_cell::sync::Lazy;
use regex::{Captures, Regex};
use serde::{Deserialize, Serialize};

use crate::error::{RagsumError, Result};

/// Placeholder the user prompt uses for the retrieved text.
pub const SUMMARY_VARIABLE: &str = "summary_data";

static PLACEHOLDER: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\{\{|\}\}|\{([^{}]*)\}|[{}]").expect("placeholder regex is valid")
});

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: Role,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: Role::System,
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }
}

/// Render a `{name}` style template. `{{` and `}}` produce literal braces.
pub fn render_template(template: &str, vars: &[(&str, &str)]) -> Result<String> {
    let mut failure: Option<String> = None;

    let rendered = PLACEHOLDER.replace_all(template, |caps: &Captures| {
        let whole = &caps[0];
        match whole {
            "{{" => "{".to_string(),
            "}}" => "}".to_string(),
            "{" | "}" => {
                failure.get_or_insert_with(|| format!("unmatched '{}' in prompt", whole));
                String::new()
            }
            _ => {
                let name = caps.get(1).map(|m| m.as_str().trim()).unwrap_or_default();
                match vars.iter().find(|(key, _)| *key == name) {
                    Some((_, value)) => value.to_string(),
                    None => {
                        failure.get_or_insert_with(|| {
                            format!(
                                "unknown placeholder '{{{}}}' (only {{{}}} is available)",
                                name, SUMMARY_VARIABLE
                            )
                        });
                        String::new()
                    }
                }
            }
        }
    });

    match failure {
        Some(msg) => Err(RagsumError::Template(msg)),
        None => Ok(rendered.into_owned()),
    }
}

/// System message verbatim, user message rendered with the retrieved text.
pub fn build_messages(
    system_prompt: &str,
    user_template: &str,
    summary_data: &str,
) -> Result<Vec<ChatMessage>> {
    let user = render_template(user_template, &[(SUMMARY_VARIABLE, summary_data)])?;
    Ok(vec![ChatMessage::system(system_prompt), ChatMessage::user(user)])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_renders_summary_placeholder() {
        let out = render_template(
            "Summarize:\n{summary_data}\nThanks",
            &[("summary_data", "the text")],
        )
        .unwrap();
        assert_eq!(out, "Summarize:\nthe text\nThanks");
    }

    #[test]
    fn test_value_braces_are_not_reinterpreted() {
        let out = render_template("{summary_data}", &[("summary_data", "{not_a_var}")]).unwrap();
        assert_eq!(out, "{not_a_var}");
    }

    #[test]
    fn test_escaped_braces() {
        let out = render_template("{{json}} {summary_data}", &[("summary_data", "x")]).unwrap();
        assert_eq!(out, "{json} x");
    }

    #[test]
    fn test_template_without_placeholder() {
        let out = render_template("Just summarize.", &[("summary_data", "x")]).unwrap();
        assert_eq!(out, "Just summarize.");
    }

    #[test]
    fn test_unknown_placeholder_fails() {
        let err = render_template("{text}", &[("summary_data", "x")]).unwrap_err();
        assert!(matches!(err, RagsumError::Template(_)));
        assert!(err.to_string().contains("{text}"));
    }

    #[test]
    fn test_unmatched_brace_fails() {
        let err = render_template("oops { here", &[]).unwrap_err();
        assert!(matches!(err, RagsumError::Template(_)));
    }

    #[test]
    fn test_build_messages() {
        let messages = build_messages("Be brief.", "Text: {summary_data}", "abc").unwrap();
        assert_eq!(
            messages,
            vec![
                ChatMessage::system("Be brief."),
                ChatMessage::user("Text: abc"),
            ]
        );
    }

    #[test]
    fn test_role_serializes_lowercase() {
        let json = serde_json::to_value(ChatMessage::system("x")).unwrap();
        assert_eq!(json["role"], "system");
    }
}
