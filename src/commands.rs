//! State-mutating commands: confirm, post with the anti-forgery token, report,
//! then cascade reloads into the sections that depend on the result.

use serde::Deserialize;
use serde_json::Value;

use crate::charts::percent;
use crate::controller::SectionRegistry;
use crate::csrf::CookieJar;
use crate::fetcher::{decode_envelope, typed, ApiClient, FetchError};
use crate::models::{CommandResult, CommandSuccess, SectionKind};
use crate::prompt::Prompt;

pub const DEFAULT_MODEL_TYPE: &str = "logistic";
pub const DEFAULT_MODEL_NAME: &str = "New Logistic Regression Model";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    BulkPredict,
    TrainModel { model_type: String, model_name: String },
    ActivateModel { id: u64 },
}

#[derive(Deserialize)]
struct BulkPredictReply {
    total_processed: u64,
}

#[derive(Deserialize)]
struct TrainModelReply {
    accuracy: f64,
}

#[derive(Deserialize)]
struct ActivateModelReply {
    model_name: String,
}

impl Command {
    pub fn train_default() -> Self {
        Command::TrainModel {
            model_type: DEFAULT_MODEL_TYPE.to_string(),
            model_name: DEFAULT_MODEL_NAME.to_string(),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Command::BulkPredict => "bulk-predict",
            Command::TrainModel { .. } => "train-model",
            Command::ActivateModel { .. } => "activate-model",
        }
    }

    pub fn confirmation(&self) -> &'static str {
        match self {
            Command::BulkPredict => "Run predictions for all patients? This may take a few moments.",
            Command::TrainModel { .. } => "Start training a new machine learning model?",
            Command::ActivateModel { .. } => {
                "Activate this model? This will make it the active prediction model."
            }
        }
    }

    /// Sections whose data changes when this command succeeds.
    pub fn dependents(&self) -> &'static [SectionKind] {
        match self {
            Command::BulkPredict => &[SectionKind::Predictions],
            Command::TrainModel { .. } => &[SectionKind::Models],
            Command::ActivateModel { .. } => &[SectionKind::Models, SectionKind::Predictions],
        }
    }

    fn path(&self) -> String {
        match self {
            Command::BulkPredict => "/predictions/bulk-predict/".to_string(),
            Command::TrainModel { .. } => "/predictions/train-model/".to_string(),
            Command::ActivateModel { id } => format!("/predictions/activate-model/{id}/"),
        }
    }

    fn form(&self) -> Vec<(&str, &str)> {
        match self {
            Command::TrainModel {
                model_type,
                model_name,
            } => vec![
                ("model_type", model_type.as_str()),
                ("model_name", model_name.as_str()),
            ],
            Command::BulkPredict | Command::ActivateModel { .. } => Vec::new(),
        }
    }

    fn transport_context(&self) -> &'static str {
        match self {
            Command::BulkPredict => "Error running predictions",
            Command::TrainModel { .. } => "Error training model",
            Command::ActivateModel { .. } => "Error activating model",
        }
    }

    fn decode_success(&self, value: Value) -> Result<CommandSuccess, FetchError> {
        let success = match self {
            Command::BulkPredict => {
                let reply: BulkPredictReply = typed(value)?;
                CommandSuccess::Processed {
                    total_processed: reply.total_processed,
                }
            }
            Command::TrainModel { .. } => {
                let reply: TrainModelReply = typed(value)?;
                CommandSuccess::Trained {
                    accuracy: reply.accuracy,
                }
            }
            Command::ActivateModel { .. } => {
                let reply: ActivateModelReply = typed(value)?;
                CommandSuccess::Activated {
                    model_name: reply.model_name,
                }
            }
        };
        Ok(success)
    }
}

impl CommandSuccess {
    pub fn summary(&self) -> String {
        match self {
            CommandSuccess::Processed { total_processed } => {
                format!("Success! Generated {total_processed} predictions.")
            }
            CommandSuccess::Trained { accuracy } => {
                format!("Model trained successfully! Accuracy: {}", percent(*accuracy))
            }
            CommandSuccess::Activated { model_name } => {
                format!("Model {model_name} activated successfully!")
            }
        }
    }
}

pub struct CommandChannel {
    client: ApiClient,
    cookies: CookieJar,
}

impl CommandChannel {
    pub fn new(client: ApiClient, cookies: CookieJar) -> Self {
        Self { client, cookies }
    }

    pub fn cookies(&self) -> &CookieJar {
        &self.cookies
    }

    /// Returns `None` when the user declines; nothing is sent in that case.
    pub async fn execute(
        &self,
        command: &Command,
        prompt: &mut dyn Prompt,
        sections: &SectionRegistry,
    ) -> Option<CommandResult> {
        if !prompt.confirm(command.confirmation()) {
            tracing::info!(command = command.name(), "command declined");
            return None;
        }

        let result = self.dispatch(command).await;
        match &result {
            CommandResult::Success(success) => {
                prompt.notify(&success.summary());
                sections.reload(command.dependents()).await;
            }
            CommandResult::Failure { message } => prompt.notify(message),
        }
        Some(result)
    }

    /// Sends the command without confirmation or cascades.
    pub async fn dispatch(&self, command: &Command) -> CommandResult {
        let token = self.cookies.csrf_token();
        if token.is_none() {
            tracing::warn!(
                command = command.name(),
                "no anti-forgery token cookie; sending without it"
            );
        }
        tracing::info!(command = command.name(), "dispatching command");

        let outcome = match self
            .client
            .post_form(&command.path(), &command.form(), token.as_deref())
            .await
        {
            Ok(body) => decode_envelope(&body).and_then(|value| command.decode_success(value)),
            Err(err) => Err(err),
        };

        match outcome {
            Ok(success) => {
                tracing::info!(command = command.name(), ?success, "command succeeded");
                CommandResult::Success(success)
            }
            Err(FetchError::Application(message)) => {
                tracing::warn!(command = command.name(), %message, "command rejected");
                CommandResult::Failure {
                    message: format!("Error: {message}"),
                }
            }
            Err(err) => {
                tracing::error!(command = command.name(), error = %err, "command failed");
                CommandResult::Failure {
                    message: format!("{}: {err}", command.transport_context()),
                }
            }
        }
    }
}
