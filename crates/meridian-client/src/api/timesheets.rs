//! Timesheet facade: weekly sheets (header/line documents) and the task
//! lookup their lines pick from.

use serde_json::Value;

use meridian_core::validation::require_identifier;
use meridian_core::{CallArgs, ContextOverrides, DocumentKind, Endpoint};

use crate::api::DocumentsApi;
use crate::client::ApiClient;
use crate::error::ClientResult;

/// Query keys the task controller has accepted a project id under, in the
/// order they are tried.
const PROJECT_KEYS: [&str; 3] = ["ProjectUUID", "projectUuid", "ProjectId"];

pub struct TimesheetsApi<'a> {
    client: &'a ApiClient,
    context: ContextOverrides,
}

impl<'a> TimesheetsApi<'a> {
    pub(crate) fn new(client: &'a ApiClient) -> Self {
        TimesheetsApi {
            client,
            context: ContextOverrides::none(),
        }
    }

    pub fn with_context(mut self, context: ContextOverrides) -> Self {
        self.context = context;
        self
    }

    /// Timesheet headers, lines, submit and PDF.
    pub fn sheets(&self) -> DocumentsApi<'a> {
        DocumentsApi::new(self.client, DocumentKind::Timesheet).with_context(self.context.clone())
    }

    /// Tasks of `project_uuid`, trying each known query shape until one
    /// answers with tasks.
    pub async fn project_tasks(&self, project_uuid: &str) -> ClientResult<Value> {
        let project_uuid = require_identifier("projectUuid", Some(project_uuid))?;
        let candidates = PROJECT_KEYS
            .iter()
            .map(|key| vec![(key.to_string(), project_uuid.clone())])
            .collect();

        self.client
            .execute_first_non_empty(
                Endpoint::ProjectTasks,
                CallArgs::new().context(self.context.clone()),
                candidates,
            )
            .await
    }
}
