//! The symbol provider built on tags queries.

pub mod document;
pub mod layer;

pub use document::{TsDocument, TsLayer, TsScopeResolver};
pub use layer::{CaptureSink, LanguageLayer, SymbolDocument};

use crate::config::ProviderSettings;
use crate::organizer::{CaptureOrganizer, PatternCache};
use crate::syntax::{Capture, ScopeResolver, SyntaxNode};
use async_trait::async_trait;
use serde_json::Value;
use std::sync::Arc;
use tagscope_api::{Symbol, SymbolMeta, SymbolProvider, sort_by_position};
use tokio::sync::{broadcast, watch};

pub const PROVIDER_NAME: &str = "Tree-sitter";
pub const PACKAGE_NAME: &str = "tagscope";

/// Score reported for documents with a tags query: above tag-file based
/// providers, below 1.0.
pub const PROVIDER_CONFIDENCE: f32 = 0.999;

const EVENT_CAPACITY: usize = 16;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProviderEvent {
    /// Symbols cached from this provider are stale.
    ShouldClearCache { provider: String },
}

/// Answers symbol requests for one document at a time.
#[derive(Debug)]
pub struct TreeSitterProvider {
    patterns: Arc<PatternCache>,
    settings: watch::Sender<ProviderSettings>,
    events: broadcast::Sender<ProviderEvent>,
}

impl Default for TreeSitterProvider {
    fn default() -> Self {
        Self::new(ProviderSettings::default())
    }
}

impl TreeSitterProvider {
    pub fn new(settings: ProviderSettings) -> Self {
        let (events, _) = broadcast::channel(EVENT_CAPACITY);
        Self {
            patterns: Arc::new(PatternCache::new()),
            settings: watch::Sender::new(settings),
            events,
        }
    }

    pub fn settings(&self) -> ProviderSettings {
        *self.settings.borrow()
    }

    pub fn watch_settings(&self) -> watch::Receiver<ProviderSettings> {
        self.settings.subscribe()
    }

    /// Stores new settings. A change tells listeners to drop cached
    /// symbols; nothing is recomputed here. Returns whether anything changed.
    pub fn update_settings(&self, settings: ProviderSettings) -> bool {
        let changed = self.settings.send_if_modified(|current| {
            if *current == settings {
                return false;
            }
            *current = settings;
            true
        });
        if changed {
            tracing::info!(
                "Settings changed (include references: {})",
                settings.include_references
            );
            // Nobody listening is fine.
            let _ = self.events.send(ProviderEvent::ShouldClearCache {
                provider: PROVIDER_NAME.to_string(),
            });
        }
        changed
    }

    /// Applies a JSON settings payload on top of the current settings.
    pub fn apply_settings_payload(&self, payload: &Value) -> bool {
        self.update_settings(self.settings().merged_with_payload(payload))
    }

    pub fn on_should_clear_cache(&self) -> broadcast::Receiver<ProviderEvent> {
        self.events.subscribe()
    }

    pub fn patterns(&self) -> &Arc<PatternCache> {
        &self.patterns
    }

    /// Call after swapping a tags query.
    pub fn invalidate_patterns(&self) {
        tracing::debug!("Dropping {} compiled strip patterns", self.patterns.len());
        self.patterns.clear();
    }

    pub fn destroy(&self) {
        self.invalidate_patterns();
    }

    fn organizer(&self) -> CaptureOrganizer {
        CaptureOrganizer::new(Arc::clone(&self.patterns))
            .with_references(self.settings().include_references)
    }
}

struct Organize<'o> {
    organizer: &'o CaptureOrganizer,
}

impl CaptureSink for Organize<'_> {
    type Output = Vec<Symbol>;

    fn accept<N, I, R>(self, captures: I, resolver: &mut R) -> Vec<Symbol>
    where
        N: SyntaxNode,
        I: IntoIterator<Item = Capture<N>>,
        R: ScopeResolver<N> + ?Sized,
    {
        self.organizer.process(captures, resolver)
    }
}

fn queryable_layers<D: SymbolDocument>(document: &D) -> Vec<&D::Layer> {
    document
        .language_layers()
        .into_iter()
        .filter(|layer| layer.has_tags_query())
        .collect()
}

#[async_trait]
impl<D: SymbolDocument> SymbolProvider<D> for TreeSitterProvider {
    fn name(&self) -> &str {
        PROVIDER_NAME
    }

    fn package_name(&self) -> &str {
        PACKAGE_NAME
    }

    fn is_exclusive(&self) -> bool {
        true
    }

    fn can_provide_symbols(&self, meta: &SymbolMeta<'_, D>) -> Option<f32> {
        if meta.kind.is_project_wide() {
            return None;
        }
        let document = meta.document?;
        if queryable_layers(document).is_empty() {
            return None;
        }
        Some(PROVIDER_CONFIDENCE)
    }

    async fn get_symbols(&self, meta: &SymbolMeta<'_, D>) -> Option<Vec<Symbol>> {
        let document = meta.document?;

        tokio::select! {
            biased;
            _ = meta.signal.cancelled() => {}
            _ = document.settled() => {}
        }
        if meta.signal.is_cancelled() {
            tracing::debug!("Symbol request cancelled");
            return None;
        }

        let layers = queryable_layers(document);
        if layers.is_empty() {
            return None;
        }

        let organizer = self.organizer();
        let mut symbols = Vec::new();
        for layer in layers {
            let sink = Organize {
                organizer: &organizer,
            };
            if let Some(found) = layer.query_tags(layer.extent(), sink) {
                symbols.extend(found);
            }
        }
        sort_by_position(&mut symbols);
        tracing::debug!("Collected {} symbols", symbols.len());
        Some(symbols)
    }
}
