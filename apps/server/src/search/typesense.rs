//! Typesense backend
//!
//! Collections carry a typed schema fixed at creation. Filter syntax:
//! `price:>=50 && people:=Men`.

use super::{
    format_price, SearchBackend, SearchFilters, SearchPage, SearchQuery, PRIMARY_KEY,
    SEARCHABLE_FIELDS,
};
use crate::{config::BackendKind, models::ProductDocument, Result};
use async_trait::async_trait;
use catalog_search_client::{
    CollectionField, CollectionSchema, TypesenseClient, TypesenseSearchParams,
};
use serde::Serialize;
use std::time::Duration;

/// Typesense keys documents by `id`; mirror the product id into it so
/// repeated imports overwrite instead of duplicating.
#[derive(Serialize)]
struct TypesenseDocument<'a> {
    id: &'a str,
    #[serde(flatten)]
    product: &'a ProductDocument,
}

pub struct TypesenseBackend {
    client: TypesenseClient,
    ingest_timeout: Duration,
}

impl TypesenseBackend {
    pub fn new(client: TypesenseClient, ingest_timeout: Duration) -> Self {
        Self {
            client,
            ingest_timeout,
        }
    }
}

pub fn product_schema(name: &str) -> CollectionSchema {
    CollectionSchema {
        name: name.to_string(),
        fields: vec![
            CollectionField::new(PRIMARY_KEY, "string"),
            CollectionField::new("name", "string"),
            CollectionField::new("people", "string").facet(),
            CollectionField::new("category", "string"),
            CollectionField::new("price", "float"),
            CollectionField::new("stock_quantity", "int32"),
            CollectionField::new("manufacturer", "string"),
            CollectionField::new("description", "string"),
        ],
        default_sorting_field: Some("price".to_string()),
    }
}

#[async_trait]
impl SearchBackend for TypesenseBackend {
    fn kind(&self) -> BackendKind {
        BackendKind::Typesense
    }

    async fn index_exists(&self, index: &str) -> Result<bool> {
        match self.client.get_collection(index).await {
            Ok(_) => Ok(true),
            Err(e) if e.is_not_found() => Ok(false),
            Err(e) => Err(e.into()),
        }
    }

    async fn create_index(&self, index: &str, documents: &[ProductDocument]) -> Result<()> {
        match self.client.create_collection(&product_schema(index)).await {
            Ok(_) => tracing::info!(index, "Typesense collection created"),
            Err(e) if e.is_already_exists() => {
                tracing::warn!(index, "Typesense collection was created concurrently")
            }
            Err(e) => return Err(e.into()),
        }

        let docs: Vec<TypesenseDocument<'_>> = documents
            .iter()
            .map(|product| TypesenseDocument {
                id: &product.product_id,
                product,
            })
            .collect();
        let imported = self
            .client
            .import_documents(index, &docs, "upsert", self.ingest_timeout)
            .await?;
        tracing::info!(index, documents = imported, "Typesense documents indexed");

        Ok(())
    }

    async fn delete_index(&self, index: &str) -> Result<bool> {
        match self.client.delete_collection(index).await {
            Ok(_) => Ok(true),
            Err(e) if e.is_not_found() => Ok(false),
            Err(e) => Err(e.into()),
        }
    }

    fn filter_expression(&self, filters: &SearchFilters) -> Option<String> {
        let mut clauses = Vec::new();
        if let Some(min_price) = filters.min_price {
            clauses.push(format!("price:>={}", format_price(min_price)));
        }
        if let Some(people) = &filters.people {
            clauses.push(format!("people:={}", quote_value(people)));
        }
        if clauses.is_empty() {
            None
        } else {
            Some(clauses.join(" && "))
        }
    }

    async fn search(&self, index: &str, query: &SearchQuery<'_>) -> Result<SearchPage> {
        let filter_by = self.filter_expression(query.filters);
        let query_by = SEARCHABLE_FIELDS.join(",");
        let params = TypesenseSearchParams {
            q: query.text.unwrap_or("*"),
            query_by: &query_by,
            filter_by: filter_by.as_deref(),
            page: query.page.page,
            per_page: query.page.page_size,
        };

        let response = self
            .client
            .search::<ProductDocument>(index, &params)
            .await?;

        Ok(SearchPage {
            total_items: response.found,
            hits: response.hits.into_iter().map(|h| h.document).collect(),
        })
    }
}

/// Plain tokens are written bare; anything else is wrapped in backticks.
fn quote_value(value: &str) -> String {
    if value.chars().all(|c| c.is_alphanumeric() || c == '_' || c == '-') {
        value.to_string()
    } else {
        format!("`{}`", value.replace('`', ""))
    }
}
