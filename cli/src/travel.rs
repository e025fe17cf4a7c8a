//! Three-stage travel planning chain.
//!
//! brainstorm (creative) -> day-by-day outline -> structured `TravelPlan`.
//! Each stage only sees what the previous one produced plus the request.

use std::sync::Arc;

use anyhow::Result;
use chainlab_llm::{ChatModel, ChatPromptTemplate, ChatRequest, Role, StructuredOutput, Variables};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

/// Sampling temperature per stage.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TravelConfig {
    pub brainstorm_temperature: f32,
    pub outline_temperature: f32,
    pub final_temperature: f32,
}

impl Default for TravelConfig {
    fn default() -> Self {
        Self {
            brainstorm_temperature: 0.8,
            outline_temperature: 0.4,
            final_temperature: 0.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TravelRequest {
    pub destination: String,
    pub days: u32,
    pub style: String,
    pub constraints: String,
}

impl TravelRequest {
    fn variables(&self) -> Variables {
        chainlab_llm::variables([
            ("destination", self.destination.clone()),
            ("days", self.days.to_string()),
            ("style", self.style.clone()),
            ("constraints", self.constraints.clone()),
        ])
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct TravelPlan {
    /// One to two sentence trip summary
    pub overview: String,

    /// Day-by-day plan with key stops
    pub daily_plan: Vec<String>,

    /// Bookings to make ahead of time
    pub reservations: Vec<String>,

    /// Weather- or activity-specific items
    pub packing: Vec<String>,
}

pub struct TravelPlanner {
    model: Arc<dyn ChatModel>,
    config: TravelConfig,
    brainstorm: ChatPromptTemplate,
    outline: ChatPromptTemplate,
    finalize: ChatPromptTemplate,
}

impl TravelPlanner {
    pub fn new(model: Arc<dyn ChatModel>, config: TravelConfig) -> Result<Self> {
        let brainstorm = ChatPromptTemplate::from_messages([
            (
                Role::System,
                "You are a lively travel designer who brainstorms concise trip ideas.",
            ),
            (
                Role::User,
                "Destination: {destination}\n\
                 Days: {days}\n\
                 Travel style: {style}\n\
                 Constraints: {constraints}\n\
                 List three trip themes with a one-line rationale each.",
            ),
        ])?;

        let outline = ChatPromptTemplate::from_messages([
            (
                Role::System,
                "Turn the brainstorm into a realistic day-by-day outline.",
            ),
            (
                Role::User,
                "Traveler profile: {style}\n\
                 Draft ideas:\n{draft_plan}\n\
                 Create a numbered outline for each day with 2-3 anchor stops.",
            ),
        ])?;

        let finalize = ChatPromptTemplate::from_messages([
            (
                Role::System,
                "Convert the outline into a concise, structured plan.",
            ),
            (
                Role::User,
                "Outline:\n{outline}\n\
                 Return fields: overview (1-2 sentences), daily_plan (list), \
                 reservations (list of must-book items), packing (list).",
            ),
        ])?;

        Ok(Self {
            model,
            config,
            brainstorm,
            outline,
            finalize,
        })
    }

    pub async fn plan(&self, request: &TravelRequest) -> Result<TravelPlan> {
        info!(
            "Planning {} days in {}",
            request.days, request.destination
        );
        let mut vars = request.variables();

        let draft = self
            .stage(&self.brainstorm, &vars, self.config.brainstorm_temperature)
            .await?;
        debug!("Brainstorm:\n{draft}");
        vars.insert("draft_plan".to_string(), draft);

        let outline = self
            .stage(&self.outline, &vars, self.config.outline_temperature)
            .await?;
        debug!("Outline:\n{outline}");

        let messages = self
            .finalize
            .format_messages(&chainlab_llm::variables([("outline", outline)]))?;
        let plan = StructuredOutput::<TravelPlan>::new()?
            .invoke(
                self.model.as_ref(),
                messages,
                Some(self.config.final_temperature),
            )
            .await?;
        Ok(plan)
    }

    async fn stage(
        &self,
        prompt: &ChatPromptTemplate,
        vars: &Variables,
        temperature: f32,
    ) -> Result<String> {
        let request = ChatRequest::new(prompt.format_messages(vars)?).with_temperature(temperature);
        Ok(self.model.chat(request).await?.into_text()?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::ScriptedChat;
    use chainlab_llm::ChatResponse;
    use pretty_assertions::assert_eq;

    fn lisbon() -> TravelRequest {
        TravelRequest {
            destination: "Lisbon, Portugal".to_string(),
            days: 3,
            style: "food-loving traveler on a moderate budget who prefers to walk".to_string(),
            constraints: "Avoid long drives; keep evenings relaxed".to_string(),
        }
    }

    #[tokio::test]
    async fn test_chain_passes_each_stage_forward() {
        let model = Arc::new(ScriptedChat::new([
            ChatResponse::Text("1. Pastry crawl".to_string()),
            ChatResponse::Text("Day 1: Belem".to_string()),
            ChatResponse::Text(
                r#"{"overview": "Eat well.", "daily_plan": ["Day 1: Belem"], "reservations": [], "packing": ["walking shoes"]}"#
                    .to_string(),
            ),
        ]));
        let planner = TravelPlanner::new(model.clone(), TravelConfig::default()).unwrap();

        let plan = planner.plan(&lisbon()).await.unwrap();
        assert_eq!(plan.daily_plan, vec!["Day 1: Belem".to_string()]);
        assert_eq!(plan.packing, vec!["walking shoes".to_string()]);

        let brainstorm = model.request(0);
        assert_eq!(brainstorm.temperature, Some(0.8));
        let user = brainstorm.messages[1].content().unwrap();
        assert!(user.starts_with("Destination: Lisbon, Portugal\nDays: 3\n"));

        let outline = model.request(1);
        assert_eq!(outline.temperature, Some(0.4));
        assert!(
            outline.messages[1]
                .content()
                .unwrap()
                .contains("Draft ideas:\n1. Pastry crawl\n")
        );

        let last = model.request(2);
        assert_eq!(last.temperature, Some(0.0));
        assert!(last.response_format.is_some());
        assert!(
            last.messages[1]
                .content()
                .unwrap()
                .starts_with("Outline:\nDay 1: Belem\n")
        );
    }

    #[tokio::test]
    async fn test_tool_call_mid_chain_is_error() {
        let model = Arc::new(ScriptedChat::new([crate::testing::patient_call("c")]));
        let planner = TravelPlanner::new(model, TravelConfig::default()).unwrap();
        assert!(planner.plan(&lisbon()).await.is_err());
    }
}
