use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use super::validate::{Checker, FieldError};
use super::{string_field, PromptFlow};

/// Race outcome prediction from history, car specifications and track conditions.
pub struct PredictRaceOutcome;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PredictionInput {
    pub historical_data: String,
    pub car_specifications: String,
    pub track_conditions: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PredictionOutput {
    pub predicted_winner: String,
    pub top_three: Vec<String>,
    pub key_factors: String,
}

impl PromptFlow for PredictRaceOutcome {
    const NAME: &'static str = "predictRaceOutcome";
    const TEMPLATE: &'static str = concat!(
        "You are an AI expert in Formula 1 racing, specializing in predicting race outcomes.\n",
        "\n",
        "  Based on the historical data, car specifications, and track conditions provided, predict the race outcome, \n",
        "  including the winner, top three finishers, and key influencing factors.\n",
        "\n",
        "  Historical Data: {{{historicalData}}}\n",
        "  Car Specifications: {{{carSpecifications}}}\n",
        "  Track Conditions: {{{trackConditions}}}\n",
        "\n",
        "  Ensure that the predictedWinner field contains the name of the predicted winner.\n",
        "  Ensure that the topThree field contains an array of the top three finishers.\n",
        "  Ensure that the keyFactors field contains the key factors that influenced the outcome.\n",
        "  ",
    );
    const FAILURE_MESSAGE: &'static str = "Failed to generate prediction. Please try again.";

    type Input = PredictionInput;
    type Output = PredictionOutput;

    fn validate(input: &PredictionInput) -> Result<(), Vec<FieldError>> {
        Checker::new()
            .text(
                "historicalData",
                &input.historical_data,
                "Please provide more detailed historical data.",
            )
            .text(
                "carSpecifications",
                &input.car_specifications,
                "Please provide more detailed car specifications.",
            )
            .text(
                "trackConditions",
                &input.track_conditions,
                "Please provide more detailed track conditions.",
            )
            .finish()
    }

    fn bindings(input: &PredictionInput) -> Vec<(&'static str, &str)> {
        vec![
            ("historicalData", input.historical_data.as_str()),
            ("carSpecifications", input.car_specifications.as_str()),
            ("trackConditions", input.track_conditions.as_str()),
        ]
    }

    fn output_schema() -> Value {
        json!({
            "type": "OBJECT",
            "properties": {
                "predictedWinner": string_field("The predicted winner of the race."),
                "topThree": {
                    "type": "ARRAY",
                    "items": { "type": "STRING" },
                    "description": "The predicted top three finishers of the race."
                },
                "keyFactors": string_field("Key factors influencing the race outcome.")
            },
            "required": ["predictedWinner", "topThree", "keyFactors"]
        })
    }

    fn default_input() -> PredictionInput {
        PredictionInput {
            historical_data: "Past 5 races at this track show a clear advantage for cars with high \
                straight-line speed. Red team has won 3 of the last 5."
                .to_string(),
            car_specifications: "Blue team has a new engine upgrade, improving power output by 3%. \
                Red team is running a lower-drag aerodynamic package."
                .to_string(),
            track_conditions: "Dry, sunny, 28°C air temp, 45°C track temp. Low probability of rain."
                .to_string(),
        }
    }
}
