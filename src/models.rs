use clap::ValueEnum;
use serde::Deserialize;

use crate::fragment::Fragment;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, ValueEnum)]
pub enum SectionKind {
    Predictions,
    Analytics,
    Models,
}

impl SectionKind {
    pub const ALL: [SectionKind; 3] = [
        SectionKind::Predictions,
        SectionKind::Analytics,
        SectionKind::Models,
    ];

    pub fn endpoint(self) -> &'static str {
        match self {
            SectionKind::Predictions => "/predictions/api/dashboard-data/",
            SectionKind::Analytics => "/predictions/api/analytics/",
            SectionKind::Models => "/predictions/api/models/",
        }
    }

    /// Anchor that receives the placeholder, the error block and any server markup.
    pub fn content_anchor(self) -> &'static str {
        match self {
            SectionKind::Predictions => "predictions-content",
            SectionKind::Analytics => "analytics-content",
            SectionKind::Models => "models-content",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            SectionKind::Predictions => "predictions",
            SectionKind::Analytics => "analytics",
            SectionKind::Models => "models",
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            SectionKind::Predictions => "Predictions",
            SectionKind::Analytics => "Analytics",
            SectionKind::Models => "Models",
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub enum SectionStatus {
    #[default]
    Idle,
    Loading,
    Loaded,
    Failed(String),
}

#[derive(Debug, Clone, Default)]
pub struct SectionState {
    pub status: SectionStatus,
    pub content: Option<Fragment>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ActiveModelSummary {
    pub name: String,
    pub model_type: String,
    pub accuracy: f64,
    #[serde(default = "not_available")]
    pub version: String,
}

fn not_available() -> String {
    "N/A".to_string()
}

#[derive(Debug, Clone, Deserialize)]
pub struct PredictionStats {
    pub total_predictions: u64,
    pub high_risk_count: u64,
    pub medium_risk_count: u64,
    pub low_risk_count: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PredictionsPayload {
    pub html: String,
    pub active_model: ActiveModelSummary,
    pub stats: PredictionStats,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RiskDistribution {
    pub high: u64,
    pub medium: u64,
    pub low: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ModelMetrics {
    pub accuracy: f64,
    pub precision: f64,
    pub recall: f64,
    pub f1_score: f64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct QuickStats {
    pub avg_prediction_time: f64,
    pub success_rate: f64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AnalyticsPayload {
    pub readmission_rate: f64,
    pub avg_risk_score: f64,
    pub avg_stay: f64,
    pub total_assessed: u64,
    pub risk_distribution: RiskDistribution,
    pub model_metrics: ModelMetrics,
    pub quick_stats: QuickStats,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ModelInventorySummary {
    pub total_models: u64,
    pub active_models: u64,
    #[serde(rename = "html")]
    pub rendered_list: String,
}

#[derive(Debug, Clone)]
pub enum SectionPayload {
    Predictions(PredictionsPayload),
    Analytics(AnalyticsPayload),
    Models(ModelInventorySummary),
}

impl SectionPayload {
    pub fn kind(&self) -> SectionKind {
        match self {
            SectionPayload::Predictions(_) => SectionKind::Predictions,
            SectionPayload::Analytics(_) => SectionKind::Analytics,
            SectionPayload::Models(_) => SectionKind::Models,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum CommandSuccess {
    Processed { total_processed: u64 },
    Trained { accuracy: f64 },
    Activated { model_name: String },
}

#[derive(Debug, Clone, PartialEq)]
pub enum CommandResult {
    Success(CommandSuccess),
    Failure { message: String },
}

impl CommandResult {
    pub fn is_success(&self) -> bool {
        matches!(self, CommandResult::Success(_))
    }
}
