use chrono::Utc;

use crate::commands::{Command, CommandChannel};
use crate::controller::SectionRegistry;
use crate::csrf::CookieJar;
use crate::document::{Document, SharedDocument};
use crate::fetcher::{ApiClient, FetchError};
use crate::fragment::Action;
use crate::models::{CommandResult, SectionKind, SectionPayload, SectionStatus};
use crate::prompt::Prompt;
use crate::report;

/// The composed page: one document, its three section controllers and the
/// command channel that cascades into them.
pub struct Dashboard {
    client: ApiClient,
    document: SharedDocument,
    sections: SectionRegistry,
    commands: CommandChannel,
}

impl Dashboard {
    pub fn new(client: ApiClient, cookies: CookieJar, document: Document) -> Self {
        let document = document.shared();
        let sections = SectionRegistry::new(&client, &document);
        let commands = CommandChannel::new(client.clone(), cookies);
        Self {
            client,
            document,
            sections,
            commands,
        }
    }

    pub fn document(&self) -> &SharedDocument {
        &self.document
    }

    pub fn sections(&self) -> &SectionRegistry {
        &self.sections
    }

    /// Fires all three section loads without ordering between them.
    pub async fn init(&self) {
        tracing::info!(base_url = %self.client.base_url(), "initializing clinical dashboard");
        self.sections.load_all().await;
        tracing::info!("clinical dashboard initialized");
    }

    /// Tab activation and the page's refresh buttons all reload one section.
    pub async fn show(&self, kind: SectionKind) -> SectionStatus {
        self.sections.get(kind).load().await
    }

    pub async fn trigger(&self, action: Action) -> SectionStatus {
        self.sections.trigger(action).await
    }

    pub async fn execute(
        &self,
        command: &Command,
        prompt: &mut dyn Prompt,
    ) -> Option<CommandResult> {
        self.commands.execute(command, prompt, &self.sections).await
    }

    /// Fetches analytics directly, outside the section state machine, and
    /// formats them as a markdown report.
    pub async fn export_analytics(&self) -> Result<String, FetchError> {
        match self.client.fetch(SectionKind::Analytics).await? {
            SectionPayload::Analytics(payload) => Ok(report::build_report(&payload, Utc::now())),
            other => Err(FetchError::Parse(format!(
                "expected analytics payload, got {:?}",
                other.kind()
            ))),
        }
    }
}
