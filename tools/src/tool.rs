//! The tools a model may call.

use chainlab_llm::ToolDefinition;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use tracing::debug;

use crate::error::{Result, ToolError};

/// Every tool the assistants know about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ToolKind {
    GeneratePatient,
}

impl ToolKind {
    pub const ALL: [ToolKind; 1] = [ToolKind::GeneratePatient];

    /// Name the model uses to call the tool.
    pub fn name(self) -> &'static str {
        match self {
            Self::GeneratePatient => "generate_patient",
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            Self::GeneratePatient => {
                "Generate a patient record for a hospital systems demonstration."
            }
        }
    }

    /// JSON Schema of the arguments object.
    pub fn parameters(self) -> Value {
        match self {
            Self::GeneratePatient => json!({
                "type": "object",
                "properties": {},
                "required": []
            }),
        }
    }

    /// Check call arguments before running the tool.
    ///
    /// `null` counts as an empty object. Tools without parameters ignore
    /// whatever keys the model invents.
    pub fn check_arguments(self, arguments: &Value) -> Result<()> {
        let fields = match arguments {
            Value::Null => return Ok(()),
            Value::Object(fields) => fields,
            other => {
                return Err(ToolError::InvalidInput(format!(
                    "arguments for {self} must be an object, got {other}"
                )));
            }
        };

        match self {
            Self::GeneratePatient => {
                if !fields.is_empty() {
                    debug!("Ignoring arguments for {self}: {arguments}");
                }
                Ok(())
            }
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.name() == name)
    }

    /// Function definition sent with chat requests.
    pub fn definition(self) -> ToolDefinition {
        ToolDefinition {
            name: self.name().to_string(),
            description: self.description().to_string(),
            parameters: self.parameters(),
        }
    }
}

impl std::fmt::Display for ToolKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// A synthetic hospital patient.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PatientRecord {
    pub name: String,
    pub age: u32,
    pub condition: String,
    pub ward: String,
}

/// Always the same patient, so demo transcripts are reproducible.
pub fn generate_patient() -> PatientRecord {
    PatientRecord {
        name: "John Smith".to_string(),
        age: 67,
        condition: "Hypertension".to_string(),
        ward: "Cardiology".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn test_from_name_round_trips() {
        for kind in ToolKind::ALL {
            assert_eq!(ToolKind::from_name(kind.name()), Some(kind));
        }
        assert_eq!(ToolKind::from_name("delete_patient"), None);
    }

    #[test]
    fn test_definition_advertises_empty_object() {
        let definition = ToolKind::GeneratePatient.definition();
        assert_eq!(definition.name, "generate_patient");
        assert_eq!(
            definition.parameters,
            json!({ "type": "object", "properties": {}, "required": [] })
        );
    }

    #[test]
    fn test_parameterless_tool_ignores_invented_arguments() {
        let kind = ToolKind::GeneratePatient;
        assert!(kind.check_arguments(&Value::Null).is_ok());
        assert!(kind.check_arguments(&json!({})).is_ok());
        assert!(
            kind.check_arguments(&json!({ "patient_name": "John Smith" }))
                .is_ok()
        );
    }

    #[test]
    fn test_non_object_arguments_rejected() {
        let err = ToolKind::GeneratePatient
            .check_arguments(&json!("John Smith"))
            .unwrap_err();
        assert!(matches!(err, ToolError::InvalidInput(_)));
    }

    #[test]
    fn test_generated_patient() {
        assert_eq!(
            serde_json::to_value(generate_patient()).unwrap(),
            json!({
                "name": "John Smith",
                "age": 67,
                "condition": "Hypertension",
                "ward": "Cardiology",
            })
        );
    }
}
