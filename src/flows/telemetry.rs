use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use super::validate::{Checker, FieldError};
use super::{string_field, PromptFlow};

pub struct SummarizeRaceTelemetry;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TelemetryInput {
    /// Raw telemetry, typically CSV or JSON: speed, braking, lap times.
    pub telemetry_data: String,
    pub car_setup: String,
    pub driving_style: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TelemetryOutput {
    pub summary: String,
    pub improvement_areas: String,
    pub potential_issues: String,
}

impl PromptFlow for SummarizeRaceTelemetry {
    const NAME: &'static str = "summarizeRaceTelemetry";
    const TEMPLATE: &'static str = concat!(
        "You are an expert race engineer, skilled at analyzing race telemetry data to improve performance.\n",
        "\n",
        "  Analyze the provided race telemetry data, car setup, and driving style to identify key performance metrics, areas for improvement, and potential mechanical issues.\n",
        "\n",
        "  Telemetry Data: {{{telemetryData}}}\n",
        "  Car Setup: {{{carSetup}}}\n",
        "  Driving Style: {{{drivingStyle}}}\n",
        "\n",
        "  Provide a summary of key performance metrics, highlight areas for improvement in car setup or driving style, and identify potential mechanical issues based on the telemetry data.\n",
        "  Follow the schema and ensure that the response can be parsed by JSON.parse.\n",
        "  ",
    );
    const FAILURE_MESSAGE: &'static str = "Failed to summarize telemetry. Please try again.";

    type Input = TelemetryInput;
    type Output = TelemetryOutput;

    fn validate(input: &TelemetryInput) -> Result<(), Vec<FieldError>> {
        Checker::new()
            .text(
                "telemetryData",
                &input.telemetry_data,
                "Please provide more detailed telemetry data.",
            )
            .text(
                "carSetup",
                &input.car_setup,
                "Please describe the car setup in more detail.",
            )
            .text(
                "drivingStyle",
                &input.driving_style,
                "Please describe the driving style in more detail.",
            )
            .finish()
    }

    fn bindings(input: &TelemetryInput) -> Vec<(&'static str, &str)> {
        vec![
            ("telemetryData", input.telemetry_data.as_str()),
            ("carSetup", input.car_setup.as_str()),
            ("drivingStyle", input.driving_style.as_str()),
        ]
    }

    fn output_schema() -> Value {
        json!({
            "type": "OBJECT",
            "properties": {
                "summary": string_field(
                    "A summary of key performance metrics from the race telemetry data."
                ),
                "improvementAreas": string_field(
                    "Identified areas for improvement in car setup or driving style."
                ),
                "potentialIssues": string_field(
                    "Potential mechanical issues identified from the race telemetry data."
                )
            },
            "required": ["summary", "improvementAreas", "potentialIssues"]
        })
    }

    fn default_input() -> TelemetryInput {
        TelemetryInput {
            telemetry_data: "lap,time_s,top_speed_kph,brake_pressure_bar\n\
                1,92.41,318,112\n2,91.87,321,115\n3,92.96,316,121"
                .to_string(),
            car_setup: "Medium downforce, front wing at 6 degrees, soft rear anti-roll bar."
                .to_string(),
            driving_style: "Late braking into slow corners, early throttle application on exit."
                .to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::flows::render_prompt;

    #[test]
    fn multiline_telemetry_is_inserted_verbatim() {
        let input = SummarizeRaceTelemetry::default_input();
        let prompt = render_prompt::<SummarizeRaceTelemetry>(&input).unwrap();
        assert!(prompt.contains("Telemetry Data: lap,time_s,top_speed_kph,brake_pressure_bar\n1,92.41"));
        assert!(prompt.contains(&format!("Car Setup: {}\n", input.car_setup)));
        assert!(prompt.contains(&format!("Driving Style: {}\n", input.driving_style)));
        assert!(prompt.contains("\n  Car Setup: "));
        assert!(prompt.ends_with("parsed by JSON.parse.\n  "));
    }

    #[test]
    fn output_schema_requires_every_field() {
        let schema = SummarizeRaceTelemetry::output_schema();
        let required: Vec<_> = schema["required"]
            .as_array()
            .unwrap()
            .iter()
            .map(|v| v.as_str().unwrap())
            .collect();
        assert_eq!(required, ["summary", "improvementAreas", "potentialIssues"]);
    }
}
