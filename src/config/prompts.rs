//! Prompt templates for vidlearn.
//!
//! Prompts can be customized by placing TOML files in the custom prompts directory.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::PathBuf;

/// Collection of all prompt templates.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
#[derive(Default)]
pub struct Prompts {
    pub answer: AnswerPrompts,
    pub topic: TopicPrompts,
    /// Custom variables from config, available in all prompts.
    #[serde(skip)]
    pub variables: HashMap<String, String>,
}

/// Prompts for answering a question from a transcript.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AnswerPrompts {
    pub system: String,
    pub user: String,
}

impl Default for AnswerPrompts {
    fn default() -> Self {
        Self {
            system: "You are an educational assistant that provides clear, concise answers from video transcripts. \
Your task is to answer the user's question based on the video content provided. \
Keep your response focused, educational, and easy to understand. \
If the transcript doesn't contain information to answer the question, say so."
                .to_string(),

            user: r#"Question: {{question}}

Video transcript: {{transcript}}

Based on the video transcript, provide a **very short answer**, ideally in **2 lines or fewer**. Keep it crisp and clear."#
                .to_string(),
        }
    }
}

/// Prompts for summarizing what a video is about.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TopicPrompts {
    pub system: String,
    pub user: String,
}

impl Default for TopicPrompts {
    fn default() -> Self {
        Self {
            system: "Analyze the video transcript and provide a brief topic summary in 1-2 sentences."
                .to_string(),
            user: "Video transcript: {{transcript}}...".to_string(),
        }
    }
}

impl Prompts {
    /// Load prompts from the default location, with optional custom directory and variables.
    pub fn load(
        custom_dir: Option<&str>,
        custom_variables: Option<&HashMap<String, String>>,
    ) -> crate::error::Result<Self> {
        let mut prompts = Prompts::default();

        if let Some(vars) = custom_variables {
            prompts.variables = vars.clone();
        }

        if let Some(dir) = custom_dir {
            let custom_path = PathBuf::from(shellexpand::tilde(dir).to_string());

            let answer_path = custom_path.join("answer.toml");
            if answer_path.exists() {
                let content = std::fs::read_to_string(&answer_path)?;
                prompts.answer = toml::from_str(&content)?;
            }

            let topic_path = custom_path.join("topic.toml");
            if topic_path.exists() {
                let content = std::fs::read_to_string(&topic_path)?;
                prompts.topic = toml::from_str(&content)?;
            }
        }

        Ok(prompts)
    }

    /// Render a prompt template with the given variables.
    ///
    /// The template is scanned once; substituted values are never searched
    /// for placeholders. Unknown placeholders are left as written.
    pub fn render(template: &str, vars: &HashMap<String, String>) -> String {
        let mut result = String::with_capacity(template.len());
        let mut rest = template;

        while let Some(start) = rest.find("{{") {
            result.push_str(&rest[..start]);
            let after = &rest[start + 2..];

            let Some(end) = after.find("}}") else {
                result.push_str(&rest[start..]);
                return result;
            };

            match vars.get(&after[..end]) {
                Some(value) => {
                    result.push_str(value);
                    rest = &after[end + 2..];
                }
                None => {
                    // Not a known name; the next "{{" may still open one.
                    result.push_str("{{");
                    rest = after;
                }
            }
        }

        result.push_str(rest);
        result
    }

    /// Render a prompt template with both provided variables and custom config variables.
    /// Provided variables take precedence over custom config variables.
    pub fn render_with_custom(&self, template: &str, vars: &HashMap<String, String>) -> String {
        let mut merged = self.variables.clone();
        for (key, value) in vars {
            merged.insert(key.clone(), value.clone());
        }
        Self::render(template, &merged)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_prompts() {
        let prompts = Prompts::default();
        assert!(prompts.answer.system.contains("video transcripts"));
        assert!(prompts.answer.user.contains("{{question}}"));
        assert!(prompts.answer.user.contains("{{transcript}}"));
        assert!(prompts.answer.user.contains("2 lines or fewer"));
        assert!(!prompts.topic.system.is_empty());
    }

    #[test]
    fn test_render_template() {
        let template = "Hello {{name}}, you have {{count}} messages.";
        let mut vars = HashMap::new();
        vars.insert("name".to_string(), "Alice".to_string());
        vars.insert("count".to_string(), "5".to_string());

        let result = Prompts::render(template, &vars);
        assert_eq!(result, "Hello Alice, you have 5 messages.");
    }

    #[test]
    fn test_render_does_not_expand_inserted_values() {
        let mut vars = HashMap::new();
        vars.insert("question".to_string(), "what is {{transcript}}?".to_string());
        vars.insert("transcript".to_string(), "Torque twists things.".to_string());

        let rendered = Prompts::render("Q: {{question}} T: {{transcript}}", &vars);
        assert_eq!(rendered, "Q: what is {{transcript}}? T: Torque twists things.");
    }

    #[test]
    fn test_render_keeps_unknown_and_unclosed_placeholders() {
        let mut vars = HashMap::new();
        vars.insert("name".to_string(), "Ada".to_string());

        assert_eq!(Prompts::render("{{other}} {{name}}", &vars), "{{other}} Ada");
        assert_eq!(Prompts::render("{{ {{name}}", &vars), "{{ Ada");
        assert_eq!(Prompts::render("Hi {{name", &vars), "Hi {{name");
        assert_eq!(Prompts::render("", &vars), "");
    }

    #[test]
    fn test_call_variables_override_config_variables() {
        let mut prompts = Prompts::default();
        prompts
            .variables
            .insert("audience".to_string(), "students".to_string());
        prompts
            .variables
            .insert("question".to_string(), "ignored".to_string());

        let mut vars = HashMap::new();
        vars.insert("question".to_string(), "What is torque?".to_string());

        let rendered = prompts.render_with_custom("{{question}} for {{audience}}", &vars);
        assert_eq!(rendered, "What is torque? for students");
    }

    #[test]
    fn test_custom_dir_overrides_answer_prompts() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join("answer.toml"),
            "system = \"Answer like a pirate.\"\n",
        )
        .unwrap();

        let prompts = Prompts::load(dir.path().to_str(), None).unwrap();
        assert_eq!(prompts.answer.system, "Answer like a pirate.");
        // Unset fields fall back to defaults
        assert!(prompts.answer.user.contains("{{question}}"));
        assert_eq!(prompts.topic.system, TopicPrompts::default().system);
    }
}
