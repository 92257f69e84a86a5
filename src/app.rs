use std::{sync::Arc, time::Instant};

use anyhow::Result;
use reqwest::Client;
use thiserror::Error;

use crate::{
    api::{build_payload, ClassifierClient, ClientError},
    config::{AppConfig, InputLimits},
    domain::{ClassificationRequest, ClassificationResult, InputError},
    history::{AggregateStats, HistoryEntry, HistorySource, HistoryStore},
    infrastructure::directories::ResolvedPaths,
    storage::{FileStore, KeyValueStore},
};

#[derive(Debug, Error)]
pub enum ClassifyError {
    #[error(transparent)]
    Invalid(#[from] InputError),
    #[error(transparent)]
    Client(#[from] ClientError),
}

#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    Classified(HistoryEntry),
    Inconclusive,
    ServiceError(String),
}

#[derive(Debug, Clone)]
pub struct ClassificationReport {
    pub result: ClassificationResult,
    pub outcome: Outcome,
    pub processing_time_ms: u64,
}

pub struct ClassifierApp<S> {
    client: ClassifierClient,
    history: HistoryStore<S>,
    limits: InputLimits,
}

impl ClassifierApp<Arc<dyn KeyValueStore>> {
    pub fn initialize(config: &AppConfig, paths: &ResolvedPaths) -> Result<Self> {
        let http = Client::builder()
            .user_agent(format!("email-classifier-rust/{}", env!("CARGO_PKG_VERSION")))
            .build()?;
        let client = ClassifierClient::from_config(http, &config.api)?;

        let store: Arc<dyn KeyValueStore> =
            Arc::new(FileStore::new(&paths.store_path).with_quota(config.store_quota_bytes));
        let history = HistoryStore::new(store, config.history.limit, config.history.timezone);

        tracing::debug!(
            target: "app",
            endpoint = %client.endpoint(),
            store = %paths.store_path.display(),
            "classifier initialized"
        );
        Ok(Self::new(client, history, config.limits))
    }
}

impl<S: KeyValueStore> ClassifierApp<S> {
    pub fn new(client: ClassifierClient, history: HistoryStore<S>, limits: InputLimits) -> Self {
        Self {
            client,
            history,
            limits,
        }
    }

    /// Validates, submits once, records stats for every answered request
    /// and appends history only for a conclusive classification.
    pub async fn classify(
        &self,
        request: ClassificationRequest,
    ) -> Result<ClassificationReport, ClassifyError> {
        request.validate(&self.limits)?;

        let text = request.submitted_text().map(str::to_string);
        let summary_text = match (&text, &request.file) {
            (Some(text), _) => text.clone(),
            (None, Some(file)) => format!("File: {}", file.name),
            (None, None) => String::new(),
        };

        let payload = build_payload(
            text.as_deref(),
            request.file,
            request.generate_reply,
            request.detailed_analysis,
        );

        let started = Instant::now();
        let result = self.client.submit(payload).await?;
        let processing_time_ms = started.elapsed().as_millis() as u64;

        self.history.record_stats(processing_time_ms);

        let outcome = if let Some(error) = result.service_error() {
            tracing::warn!(target: "app", error, "service reported a classification error");
            Outcome::ServiceError(error.to_string())
        } else if result.is_inconclusive() {
            tracing::info!(target: "app", processing_time_ms, "classification was inconclusive");
            Outcome::Inconclusive
        } else {
            let entry = self.history.append(HistorySource {
                text: &summary_text,
                category: result.category(),
                priority: result.priority.as_deref(),
                processing_time_ms,
            });
            tracing::info!(
                target: "app",
                id = entry.id,
                category = entry.category.as_deref().unwrap_or("-"),
                processing_time_ms,
                "email classified"
            );
            Outcome::Classified(entry)
        };

        Ok(ClassificationReport {
            result,
            outcome,
            processing_time_ms,
        })
    }

    pub fn history_entries(&self) -> Vec<HistoryEntry> {
        self.history.list()
    }

    pub fn clear_history(&self) {
        self.history.clear();
        tracing::info!(target: "app", "history cleared");
    }

    pub fn stats(&self) -> AggregateStats {
        self.history.stats()
    }
}
