use crate::models::Symbol;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tokio_util::sync::CancellationToken;

/// What the caller is asking symbols for.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(rename_all = "kebab-case")]
pub enum RequestKind {
    /// Every symbol of the current document.
    File,
    /// A project-wide symbol search.
    Project,
    /// A project-wide go-to-definition lookup.
    ProjectFind,
}

impl RequestKind {
    pub fn is_project_wide(&self) -> bool {
        matches!(self, RequestKind::Project | RequestKind::ProjectFind)
    }
}

/// The request bundle passed to both halves of the provider contract.
pub struct SymbolMeta<'a, D: ?Sized> {
    pub kind: RequestKind,
    pub document: Option<&'a D>,
    /// Search term, present for project-wide requests.
    pub query: Option<String>,
    /// Cancelled when the consumer no longer wants the answer.
    pub signal: CancellationToken,
}

impl<'a, D: ?Sized> SymbolMeta<'a, D> {
    pub fn file(document: &'a D) -> Self {
        Self {
            kind: RequestKind::File,
            document: Some(document),
            query: None,
            signal: CancellationToken::new(),
        }
    }

    pub fn project(document: Option<&'a D>, query: impl Into<String>) -> Self {
        Self {
            kind: RequestKind::Project,
            document,
            query: Some(query.into()),
            signal: CancellationToken::new(),
        }
    }

    pub fn with_signal(mut self, signal: CancellationToken) -> Self {
        self.signal = signal;
        self
    }
}

/// Contract between a symbol provider and the aggregator that picks one.
///
/// The aggregator asks every provider for a score, keeps the best exclusive
/// one, and calls `get_symbols` on it.
#[async_trait]
pub trait SymbolProvider<D: ?Sized + Sync>: Send + Sync {
    /// Human-readable provider name.
    fn name(&self) -> &str;

    fn package_name(&self) -> &str;

    /// Exclusive providers compete with each other; at most one wins a request.
    fn is_exclusive(&self) -> bool {
        false
    }

    /// `None` when the provider cannot serve the request, otherwise a
    /// confidence score in `0.0..=1.0`. Must not start gathering symbols.
    fn can_provide_symbols(&self, meta: &SymbolMeta<'_, D>) -> Option<f32>;

    /// `None` means "no symbols available right now" (cancelled, or nothing
    /// queryable); an empty list means the document has no symbols.
    async fn get_symbols(&self, meta: &SymbolMeta<'_, D>) -> Option<Vec<Symbol>>;
}
