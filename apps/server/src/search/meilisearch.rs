//! Meilisearch backend
//!
//! Filter syntax: `price >= 50 AND people = "Men"`.

use super::{
    format_price, SearchBackend, SearchFilters, SearchPage, SearchQuery, FILTERABLE_FIELDS,
    PRIMARY_KEY, SEARCHABLE_FIELDS,
};
use crate::{config::BackendKind, models::ProductDocument, Result};
use async_trait::async_trait;
use catalog_search_client::{MeiliSearchRequest, MeilisearchClient};
use std::time::Duration;

pub struct MeilisearchBackend {
    client: MeilisearchClient,
    task_timeout: Duration,
    ingest_timeout: Duration,
}

impl MeilisearchBackend {
    pub fn new(client: MeilisearchClient, task_timeout: Duration, ingest_timeout: Duration) -> Self {
        Self {
            client,
            task_timeout,
            ingest_timeout,
        }
    }
}

#[async_trait]
impl SearchBackend for MeilisearchBackend {
    fn kind(&self) -> BackendKind {
        BackendKind::Meilisearch
    }

    async fn index_exists(&self, index: &str) -> Result<bool> {
        match self.client.get_index(index).await {
            Ok(_) => Ok(true),
            Err(e) if e.is_not_found() => Ok(false),
            Err(e) => Err(e.into()),
        }
    }

    async fn create_index(&self, index: &str, documents: &[ProductDocument]) -> Result<()> {
        let task = self.client.create_index(index, Some(PRIMARY_KEY)).await?;
        match self.client.wait_for_task(&task, self.task_timeout).await {
            Ok(_) => tracing::info!(index, "Meilisearch index created"),
            Err(e) if e.is_already_exists() => {
                tracing::warn!(index, "Meilisearch index was created concurrently")
            }
            Err(e) => return Err(e.into()),
        }

        let filterable = self
            .client
            .update_filterable_attributes(index, &FILTERABLE_FIELDS)
            .await?;
        let searchable = self
            .client
            .update_searchable_attributes(index, &SEARCHABLE_FIELDS)
            .await?;
        self.client
            .wait_for_task(&filterable, self.task_timeout)
            .await?;
        self.client
            .wait_for_task(&searchable, self.task_timeout)
            .await?;
        tracing::debug!(index, "Meilisearch index settings applied");

        let ingest = self
            .client
            .add_documents(index, documents, Some(PRIMARY_KEY), self.ingest_timeout)
            .await?;
        self.client
            .wait_for_task(&ingest, self.ingest_timeout)
            .await?;
        tracing::info!(index, documents = documents.len(), "Meilisearch documents indexed");

        Ok(())
    }

    async fn delete_index(&self, index: &str) -> Result<bool> {
        let task = match self.client.delete_index(index).await {
            Ok(task) => task,
            Err(e) if e.is_not_found() => return Ok(false),
            Err(e) => return Err(e.into()),
        };
        match self.client.wait_for_task(&task, self.task_timeout).await {
            Ok(_) => Ok(true),
            Err(e) if e.is_not_found() => Ok(false),
            Err(e) => Err(e.into()),
        }
    }

    fn filter_expression(&self, filters: &SearchFilters) -> Option<String> {
        let mut clauses = Vec::new();
        if let Some(min_price) = filters.min_price {
            clauses.push(format!("price >= {}", format_price(min_price)));
        }
        if let Some(people) = &filters.people {
            clauses.push(format!("people = \"{}\"", escape_string(people)));
        }
        if clauses.is_empty() {
            None
        } else {
            Some(clauses.join(" AND "))
        }
    }

    async fn search(&self, index: &str, query: &SearchQuery<'_>) -> Result<SearchPage> {
        let filter = self.filter_expression(query.filters);
        let request = MeiliSearchRequest {
            q: query.text.unwrap_or(""),
            filter: filter.as_deref(),
            limit: query.page.page_size,
            offset: query.page.offset(),
        };

        let response = self
            .client
            .search::<ProductDocument>(index, &request)
            .await?;

        Ok(SearchPage {
            total_items: response.total(),
            hits: response.hits,
        })
    }
}

fn escape_string(value: &str) -> String {
    value.replace('\\', "\\\\").replace('"', "\\\"")
}
