//! Structured patient note summaries.

use anyhow::Result;
use chainlab_llm::{ChatModel, ChatPromptTemplate, Role, StructuredOutput, variables};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Used when no note file is given.
pub const SAMPLE_NOTE: &str = "76-year-old female with hypertension and CKD stage 3. \
Presented with dizziness and BP 180/95. Started on amlodipine 5mg. Labs: creatinine \
1.6 (baseline 1.5), potassium 4.8. No chest pain or neuro deficits.";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct PatientNoteSummary {
    /// Clinical synopsis of the patient note
    pub summary: String,

    /// Key problems or concerns mentioned
    pub problems: Vec<String>,
}

pub fn summary_prompt() -> Result<ChatPromptTemplate> {
    Ok(ChatPromptTemplate::from_messages([
        (
            Role::System,
            "You are a clinician who writes concise, neutral patient note summaries.",
        ),
        (
            Role::User,
            "Summarize the patient note and list the key problems/concerns.\n\nNote:\n{note}",
        ),
    ])?)
}

pub async fn summarize_note(model: &dyn ChatModel, note: &str) -> Result<PatientNoteSummary> {
    let messages = summary_prompt()?.format_messages(&variables([("note", note)]))?;
    let summary = StructuredOutput::<PatientNoteSummary>::new()?
        .invoke(model, messages, Some(0.0))
        .await?;
    Ok(summary)
}
