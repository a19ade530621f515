//! AI drafting assistance: context-aware prompt construction against the
//! text-generation collaborator.

use std::sync::Arc;

use serde::Deserialize;

use crate::infrastructure::ports::{LlmError, LlmPort, LlmReply, LlmRequest};

/// Context the client supplies with a generation request. Everything is
/// optional; whatever is present shapes the prompt preamble.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationContext {
    pub world_name: Option<String>,
    pub entity_type: Option<String>,
    #[serde(default)]
    pub existing_entities: Vec<EntityRef>,
    pub current_draft: Option<serde_json::Value>,
}

/// A lightweight reference to an existing entity, as sent by the client.
/// Characters and the like carry `name`; story events carry `title`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct EntityRef {
    pub name: Option<String>,
    pub title: Option<String>,
    pub description: Option<String>,
}

impl EntityRef {
    fn label(&self) -> &str {
        self.name.as_deref().or(self.title.as_deref()).unwrap_or("")
    }
}

/// Builds a context-aware prompt and forwards it to the LLM port.
pub struct GenerateContent {
    llm: Arc<dyn LlmPort>,
}

impl GenerateContent {
    pub fn new(llm: Arc<dyn LlmPort>) -> Self {
        Self { llm }
    }

    pub async fn execute(
        &self,
        prompt: &str,
        context: &GenerationContext,
    ) -> Result<LlmReply, LlmError> {
        let full_prompt = build_prompt(prompt, context);
        self.llm.generate(LlmRequest::new(full_prompt)).await
    }
}

fn build_prompt(prompt: &str, context: &GenerationContext) -> String {
    let mut full = String::new();

    if let Some(world_name) = &context.world_name {
        full.push_str(&format!(
            "You are a creative worldbuilding assistant for the fantasy world \"{world_name}\".\n\n"
        ));
    }

    if let Some(entity_type) = &context.entity_type {
        full.push_str(&format!("The user is working on: {entity_type}\n"));
    }

    if !context.existing_entities.is_empty() {
        let entity_type = context.entity_type.as_deref().unwrap_or("entities");
        full.push_str(&format!("\nExisting {entity_type} in this world:\n"));
        for entity in &context.existing_entities {
            full.push_str(&format!(
                "- {}: {}\n",
                entity.label(),
                entity.description.as_deref().unwrap_or("")
            ));
        }
        full.push('\n');
    }

    if let Some(draft) = &context.current_draft {
        full.push_str(&format!("The user's current draft:\n{draft}\n\n"));
    }

    full.push_str(prompt);
    full
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::ports::MockLlmPort;

    #[test]
    fn bare_prompt_passes_through() {
        let context = GenerationContext::default();
        assert_eq!(build_prompt("Describe a villain", &context), "Describe a villain");
    }

    #[test]
    fn world_and_entities_shape_the_preamble() {
        let context = GenerationContext {
            world_name: Some("Mythworld".into()),
            entity_type: Some("Characters".into()),
            existing_entities: vec![
                EntityRef {
                    name: Some("Elara Vane".into()),
                    description: Some("A brilliant runecrafter".into()),
                    ..Default::default()
                },
                EntityRef {
                    title: Some("The Highmere Accord".into()),
                    ..Default::default()
                },
            ],
            current_draft: None,
        };

        let prompt = build_prompt("Generate 3 unique character concepts", &context);

        assert!(prompt.starts_with(
            "You are a creative worldbuilding assistant for the fantasy world \"Mythworld\"."
        ));
        assert!(prompt.contains("The user is working on: Characters"));
        assert!(prompt.contains("Existing Characters in this world:"));
        assert!(prompt.contains("- Elara Vane: A brilliant runecrafter"));
        assert!(prompt.contains("- The Highmere Accord: "));
        assert!(prompt.ends_with("Generate 3 unique character concepts"));
    }

    #[tokio::test]
    async fn forwards_assembled_prompt_to_the_port() {
        let mut llm = MockLlmPort::new();
        llm.expect_generate()
            .withf(|req| req.prompt.contains("Mythworld") && req.prompt.ends_with("Go"))
            .times(1)
            .returning(|_| {
                Ok(LlmReply {
                    text: "A mysterious traveler with a hidden past.".into(),
                    usage: None,
                })
            });

        let generate = GenerateContent::new(Arc::new(llm));
        let context = GenerationContext {
            world_name: Some("Mythworld".into()),
            ..Default::default()
        };
        let reply = generate.execute("Go", &context).await.expect("generate");
        assert!(!reply.text.is_empty());
    }

    #[tokio::test]
    async fn upstream_failure_propagates() {
        let mut llm = MockLlmPort::new();
        llm.expect_generate()
            .returning(|_| Err(LlmError::RequestFailed("connection refused".into())));

        let generate = GenerateContent::new(Arc::new(llm));
        let result = generate
            .execute("Go", &GenerationContext::default())
            .await;
        assert!(result.is_err());
    }
}
