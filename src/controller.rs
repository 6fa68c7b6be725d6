use std::cell::{Cell, RefCell};

use crate::document::SharedDocument;
use crate::fetcher::ApiClient;
use crate::fragment::{Action, Fragment};
use crate::models::{SectionKind, SectionState, SectionStatus};
use crate::render;

/// Drives fetch, render and error fallback for one dashboard section.
///
/// Every call to `load` takes a fresh generation number before fetching. When
/// a newer load has started by the time a response arrives, that response is
/// dropped, so overlapping reloads always settle on the latest request.
pub struct SectionController {
    kind: SectionKind,
    client: ApiClient,
    document: SharedDocument,
    state: RefCell<SectionState>,
    generation: Cell<u64>,
}

impl SectionController {
    pub fn new(kind: SectionKind, client: ApiClient, document: SharedDocument) -> Self {
        Self {
            kind,
            client,
            document,
            state: RefCell::new(SectionState::default()),
            generation: Cell::new(0),
        }
    }

    pub fn kind(&self) -> SectionKind {
        self.kind
    }

    pub fn status(&self) -> SectionStatus {
        self.state.borrow().status.clone()
    }

    pub fn state(&self) -> SectionState {
        self.state.borrow().clone()
    }

    /// Number of loads started so far.
    pub fn generation(&self) -> u64 {
        self.generation.get()
    }

    pub async fn load(&self) -> SectionStatus {
        let token = self.generation.get() + 1;
        self.generation.set(token);
        let section = self.kind.label();
        tracing::info!(section, generation = token, "loading section");

        let placeholder = render::loading_placeholder(self.kind);
        self.show(SectionStatus::Loading, Some(placeholder));

        let result = self.client.fetch(self.kind).await;
        if self.generation.get() != token {
            tracing::debug!(
                section,
                generation = token,
                latest = self.generation.get(),
                "discarding stale section response"
            );
            return self.status();
        }

        match result {
            Ok(payload) => {
                let content = {
                    let mut document = self.document.borrow_mut();
                    let content = render::render(&mut document, &payload);
                    if content.is_none() {
                        document.replace(self.kind.content_anchor(), Fragment::text(""));
                    }
                    content
                };
                *self.state.borrow_mut() = SectionState {
                    status: SectionStatus::Loaded,
                    content,
                };
                tracing::info!(section, "section loaded");
            }
            Err(err) => {
                tracing::error!(section, error = %err, "failed to load section");
                let message = err.user_message();
                let block = render::error_block(self.kind, &message);
                self.show(SectionStatus::Failed(message), Some(block));
            }
        }

        self.status()
    }

    fn show(&self, status: SectionStatus, content: Option<Fragment>) {
        if let Some(fragment) = &content {
            self.document
                .borrow_mut()
                .replace(self.kind.content_anchor(), fragment.clone());
        }
        *self.state.borrow_mut() = SectionState { status, content };
    }
}

/// The three section controllers, created once when the page is composed and
/// handed by reference to whatever needs to reload a section.
pub struct SectionRegistry {
    predictions: SectionController,
    analytics: SectionController,
    models: SectionController,
}

impl SectionRegistry {
    pub fn new(client: &ApiClient, document: &SharedDocument) -> Self {
        let controller =
            |kind| SectionController::new(kind, client.clone(), SharedDocument::clone(document));
        Self {
            predictions: controller(SectionKind::Predictions),
            analytics: controller(SectionKind::Analytics),
            models: controller(SectionKind::Models),
        }
    }

    pub fn get(&self, kind: SectionKind) -> &SectionController {
        match kind {
            SectionKind::Predictions => &self.predictions,
            SectionKind::Analytics => &self.analytics,
            SectionKind::Models => &self.models,
        }
    }

    pub async fn load_all(&self) {
        self.reload(&SectionKind::ALL).await;
    }

    /// Reloads the listed sections concurrently, each at most once.
    pub async fn reload(&self, kinds: &[SectionKind]) {
        tokio::join!(
            self.load_if_listed(SectionKind::Predictions, kinds),
            self.load_if_listed(SectionKind::Analytics, kinds),
            self.load_if_listed(SectionKind::Models, kinds),
        );
    }

    pub async fn trigger(&self, action: Action) -> SectionStatus {
        match action {
            Action::Reload(kind) => self.get(kind).load().await,
        }
    }

    async fn load_if_listed(&self, kind: SectionKind, kinds: &[SectionKind]) {
        if kinds.contains(&kind) {
            self.get(kind).load().await;
        }
    }
}
