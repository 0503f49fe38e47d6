use log::error;
use serde::Serialize;

use crate::bridge::CompletionBackend;
use crate::flows::{self, FieldError, FlowError, PromptFlow};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Variant {
    Destructive,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notification {
    pub variant: Variant,
    pub title: &'static str,
    pub description: &'static str,
}

/// State a flow screen holds between submissions: the form, the last result,
/// inline field errors and pending notifications.
pub struct FlowPanel<F: PromptFlow> {
    form: F::Input,
    result: Option<F::Output>,
    loading: bool,
    field_errors: Vec<FieldError>,
    notifications: Vec<Notification>,
}

impl<F: PromptFlow> FlowPanel<F> {
    /// A panel seeded with the flow's sample form values.
    pub fn new() -> Self {
        Self::with_form(F::default_input())
    }

    pub fn with_form(form: F::Input) -> Self {
        Self {
            form,
            result: None,
            loading: false,
            field_errors: Vec::new(),
            notifications: Vec::new(),
        }
    }

    pub fn form(&self) -> &F::Input {
        &self.form
    }

    pub fn form_mut(&mut self) -> &mut F::Input {
        &mut self.form
    }

    pub fn result(&self) -> Option<&F::Output> {
        self.result.as_ref()
    }

    pub fn take_result(&mut self) -> Option<F::Output> {
        self.result.take()
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn field_errors(&self) -> &[FieldError] {
        &self.field_errors
    }

    pub fn notifications(&self) -> &[Notification] {
        &self.notifications
    }

    /// Clears pending notifications once they have been shown.
    pub fn dismiss_notifications(&mut self) {
        self.notifications.clear();
    }

    /// Validates the form and, if it passes, runs the flow.
    ///
    /// An invalid form only updates the field errors; the previous result is
    /// kept and the backend is not called. Otherwise the previous result is
    /// cleared before the call, and a failure adds exactly one destructive
    /// notification.
    pub async fn submit(&mut self, backend: &dyn CompletionBackend) -> Result<(), FlowError> {
        self.field_errors.clear();
        if let Err(errors) = F::validate(&self.form) {
            self.field_errors = errors.clone();
            return Err(FlowError::InvalidInput(errors));
        }

        self.result = None;
        self.loading = true;
        let outcome = flows::run::<F>(backend, &self.form).await;
        self.loading = false;

        match outcome {
            Ok(output) => {
                self.result = Some(output);
                Ok(())
            }
            Err(err) => {
                error!("{} failed: {err}", F::NAME);
                self.notifications.push(Notification {
                    variant: Variant::Destructive,
                    title: "Error",
                    description: F::FAILURE_MESSAGE,
                });
                Err(err)
            }
        }
    }
}

impl<F: PromptFlow> Default for FlowPanel<F> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bridge::BridgeError;
    use crate::flows::testing::ScriptedBackend;
    use crate::flows::{PredictRaceOutcome, PredictionOutput};

    const GOOD_REPLY: &str =
        r#"{"predictedWinner":"Red","topThree":["Red","Blue","Green"],"keyFactors":"Top speed"}"#;

    #[tokio::test]
    async fn success_stores_result() {
        let backend = ScriptedBackend::replying(GOOD_REPLY);
        let mut panel = FlowPanel::<PredictRaceOutcome>::new();

        panel.submit(&backend).await.unwrap();

        assert_eq!(
            panel.result(),
            Some(&PredictionOutput {
                predicted_winner: "Red".to_string(),
                top_three: vec!["Red".into(), "Blue".into(), "Green".into()],
                key_factors: "Top speed".to_string(),
            })
        );
        assert!(!panel.is_loading());
        assert!(panel.notifications().is_empty());
    }

    #[tokio::test]
    async fn backend_error_clears_previous_result_and_notifies_once() {
        let backend = ScriptedBackend::new(vec![
            Ok(GOOD_REPLY.to_string()),
            Err(BridgeError::Status {
                status: 503,
                body: "overloaded".to_string(),
            }),
        ]);
        let mut panel = FlowPanel::<PredictRaceOutcome>::new();
        panel.submit(&backend).await.unwrap();
        assert!(panel.result().is_some());

        let err = panel.submit(&backend).await.unwrap_err();

        assert!(matches!(err, FlowError::Backend(_)));
        assert!(panel.result().is_none());
        assert!(!panel.is_loading());
        assert_eq!(
            panel.notifications(),
            [Notification {
                variant: Variant::Destructive,
                title: "Error",
                description: "Failed to generate prediction. Please try again.",
            }]
        );
    }

    #[tokio::test]
    async fn malformed_reply_is_a_single_failure() {
        let backend = ScriptedBackend::replying(r#"{"predictedWinner":"Red"}"#);
        let mut panel = FlowPanel::<PredictRaceOutcome>::new();

        assert!(panel.submit(&backend).await.is_err());
        assert!(panel.result().is_none());
        assert_eq!(panel.notifications().len(), 1);
    }

    #[tokio::test]
    async fn invalid_form_shows_inline_errors_and_keeps_result() {
        let backend = ScriptedBackend::replying(GOOD_REPLY);
        let mut panel = FlowPanel::<PredictRaceOutcome>::new();
        panel.submit(&backend).await.unwrap();

        panel.form_mut().track_conditions = "dry".to_string();
        let err = panel.submit(&backend).await.unwrap_err();

        assert!(matches!(err, FlowError::InvalidInput(_)));
        assert_eq!(panel.field_errors().len(), 1);
        assert_eq!(panel.field_errors()[0].field, "trackConditions");
        assert!(panel.result().is_some());
        assert!(panel.notifications().is_empty());
        assert_eq!(backend.calls(), 1);
    }

    #[test]
    fn new_panel_starts_from_sample_form() {
        let panel = FlowPanel::<PredictRaceOutcome>::new();

        assert_eq!(
            panel.form().historical_data,
            PredictRaceOutcome::default_input().historical_data
        );
        assert!(panel.result().is_none());
        assert!(!panel.is_loading());
        assert!(panel.field_errors().is_empty());
    }

    #[tokio::test]
    async fn dismissed_notifications_do_not_pile_up() {
        let backend = ScriptedBackend::new(vec![
            Err(BridgeError::EmptyReply),
            Err(BridgeError::Timeout(50)),
        ]);
        let mut panel = FlowPanel::<PredictRaceOutcome>::new();

        assert!(panel.submit(&backend).await.is_err());
        assert_eq!(panel.notifications().len(), 1);
        panel.dismiss_notifications();
        assert!(panel.notifications().is_empty());

        assert!(panel.submit(&backend).await.is_err());
        assert_eq!(panel.notifications().len(), 1);
        assert_eq!(panel.notifications()[0].variant, Variant::Destructive);
    }
}
