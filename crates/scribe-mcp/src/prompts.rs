//! Canned system prompts served over `prompts/list` and `prompts/get`.

use serde::Serialize;

/// Argument accepted by a prompt.
#[derive(Debug, Clone, Serialize)]
pub struct PromptArgument {
    pub name: &'static str,
    pub description: &'static str,
    pub required: bool,
}

/// A prompt as advertised by `prompts/list`.
#[derive(Debug, Clone, Serialize)]
pub struct PromptDefinition {
    pub name: &'static str,
    pub description: &'static str,
    pub arguments: Vec<PromptArgument>,
}

pub fn prompt_definitions() -> Vec<PromptDefinition> {
    vec![
        PromptDefinition {
            name: "system_prompt",
            description: "Default system prompt for chat completions",
            arguments: vec![PromptArgument {
                name: "role",
                description: "The role context for the assistant",
                required: false,
            }],
        },
        PromptDefinition {
            name: "code_assistant",
            description: "System prompt for code-related tasks",
            arguments: vec![PromptArgument {
                name: "language",
                description: "Programming language context",
                required: false,
            }],
        },
    ]
}

/// Render the prompt `name`, or `None` if there is no such prompt.
///
/// `arg` looks up an optional argument by name.
pub fn render<'a>(name: &str, arg: impl Fn(&str) -> Option<&'a str>) -> Option<String> {
    match name {
        "system_prompt" => {
            let role = arg("role").unwrap_or("helpful assistant");
            Some(format!(
                "You are a {role}. Please provide helpful, accurate, and detailed responses."
            ))
        }
        "code_assistant" => {
            let language = arg("language").unwrap_or("python");
            Some(format!(
                "You are a {language} programming assistant. Help with code analysis, debugging, and implementation."
            ))
        }
        _ => None,
    }
}
