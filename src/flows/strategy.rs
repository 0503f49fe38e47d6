use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use super::validate::{Checker, FieldError};
use super::{string_field, PromptFlow};

pub struct GenerateStartingStrategy;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RiskLevel {
    Low,
    Medium,
    High,
}

impl RiskLevel {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
        }
    }
}

impl fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RiskLevel {
    type Err = FieldError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "low" => Ok(Self::Low),
            "medium" => Ok(Self::Medium),
            "high" => Ok(Self::High),
            _ => Err(FieldError::new(
                "riskLevel",
                "Risk level must be one of low, medium or high.",
            )),
        }
    }
}

/// Risk level travels as free text so that an unknown value becomes a field
/// error rather than a body rejection.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct StrategyInput {
    pub car_specifications: String,
    pub track_conditions: String,
    pub risk_level: String,
}

impl StrategyInput {
    pub fn new(car_specifications: &str, track_conditions: &str, risk_level: RiskLevel) -> Self {
        Self {
            car_specifications: car_specifications.to_string(),
            track_conditions: track_conditions.to_string(),
            risk_level: risk_level.as_str().to_string(),
        }
    }

    pub fn risk_level(&self) -> Result<RiskLevel, FieldError> {
        self.risk_level.parse()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StrategyOutput {
    pub strategy: String,
}

impl PromptFlow for GenerateStartingStrategy {
    const NAME: &'static str = "generateStartingStrategy";
    const TEMPLATE: &'static str = "\
You are an expert race strategist who knows how to create the optimal race strategy based on the car specifications, track conditions, and desired risk level.

Car Specifications: {{{carSpecifications}}}
Track Conditions: {{{trackConditions}}}
Risk Level: {{{riskLevel}}}

Based on the information above, generate a race strategy that includes pit stop timing, tire choices, and fuel management. Consider the risk level when generating the strategy, where a low risk strategy should be conservative, and a high risk strategy should be aggressive.";
    const FAILURE_MESSAGE: &'static str = "Failed to generate strategy. Please try again.";

    type Input = StrategyInput;
    type Output = StrategyOutput;

    fn validate(input: &StrategyInput) -> Result<(), Vec<FieldError>> {
        let mut checker = Checker::new();
        checker
            .text(
                "carSpecifications",
                &input.car_specifications,
                "Please provide more detailed car specifications.",
            )
            .text(
                "trackConditions",
                &input.track_conditions,
                "Please provide more detailed track conditions.",
            );
        if let Err(err) = input.risk_level() {
            checker.push(err);
        }
        checker.finish()
    }

    fn bindings(input: &StrategyInput) -> Vec<(&'static str, &str)> {
        vec![
            ("carSpecifications", input.car_specifications.as_str()),
            ("trackConditions", input.track_conditions.as_str()),
            ("riskLevel", input.risk_level.as_str()),
        ]
    }

    fn output_schema() -> Value {
        json!({
            "type": "OBJECT",
            "properties": {
                "strategy": string_field(
                    "The generated race strategy, including pit stop timing, tire choices, and fuel management."
                )
            },
            "required": ["strategy"]
        })
    }

    fn default_input() -> StrategyInput {
        StrategyInput::new(
            "1.6L V6 hybrid, high-downforce package, 798kg minimum weight.",
            "Track temperature 42°C, humidity 35%, high rear tire degradation.",
            RiskLevel::Medium,
        )
    }
}
