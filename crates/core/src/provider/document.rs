//! Language layers and documents backed by tree-sitter.

use super::layer::{CaptureSink, LanguageLayer, SymbolDocument};
use crate::error::{Result, TagscopeError};
use crate::syntax::ts::range_from_ts;
use crate::syntax::{AcceptAll, ScopeResolver, TagsQuery, TsNode};
use async_trait::async_trait;
use std::fmt;
use std::sync::Arc;
use tagscope_api::Range;
use tokio::sync::watch;
use tree_sitter::{Language, Parser, Tree};

/// A scope resolver usable with any tree a layer parses.
pub type TsScopeResolver = dyn for<'t> ScopeResolver<TsNode<'t>> + Send;

type ResolverFactory = Arc<dyn Fn() -> Box<TsScopeResolver> + Send + Sync>;

fn accept_all() -> ResolverFactory {
    Arc::new(|| Box::new(AcceptAll) as Box<TsScopeResolver>)
}

/// A parsed tree plus the tags query for its language.
pub struct TsLayer {
    language: Language,
    tree: Tree,
    source: Arc<str>,
    extent: Range,
    tags: Option<Arc<TagsQuery>>,
    resolver: ResolverFactory,
}

impl TsLayer {
    /// Parses the whole of `source`.
    pub fn parse(
        language: Language,
        source: impl Into<Arc<str>>,
        tags: Option<Arc<TagsQuery>>,
    ) -> Result<Self> {
        let source = source.into();
        let tree = parse_tree(&language, &source, &[])?;
        let extent = range_from_ts(tree.root_node().range());
        Ok(Self {
            language,
            tree,
            source,
            extent,
            tags,
            resolver: accept_all(),
        })
    }

    /// Parses only `ranges` of `source`, as an embedded language would be.
    /// The extent is the smallest range covering all of them.
    pub fn parse_included(
        language: Language,
        source: impl Into<Arc<str>>,
        ranges: &[tree_sitter::Range],
        tags: Option<Arc<TagsQuery>>,
    ) -> Result<Self> {
        let source = source.into();
        let tree = parse_tree(&language, &source, ranges)?;
        let extent = ranges
            .iter()
            .map(|range| range_from_ts(*range))
            .reduce(|covered, range| covered.union(&range))
            .unwrap_or_else(|| range_from_ts(tree.root_node().range()));
        Ok(Self {
            language,
            tree,
            source,
            extent,
            tags,
            resolver: accept_all(),
        })
    }

    /// Filters captures through a resolver built by `factory`. Each tags
    /// query gets a fresh one.
    pub fn with_resolver<F>(mut self, factory: F) -> Self
    where
        F: Fn() -> Box<TsScopeResolver> + Send + Sync + 'static,
    {
        self.resolver = Arc::new(factory);
        self
    }

    pub fn language(&self) -> &Language {
        &self.language
    }

    pub fn tree(&self) -> &Tree {
        &self.tree
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn tags_query(&self) -> Option<&Arc<TagsQuery>> {
        self.tags.as_ref()
    }

    /// Swaps the tags query. Callers sharing a pattern cache with the old
    /// query should clear it.
    pub fn set_tags_query(&mut self, tags: Option<Arc<TagsQuery>>) {
        self.tags = tags;
    }
}

fn parse_tree(language: &Language, source: &str, ranges: &[tree_sitter::Range]) -> Result<Tree> {
    let mut parser = Parser::new();
    parser.set_language(language)?;
    if !ranges.is_empty() {
        parser
            .set_included_ranges(ranges)
            .map_err(|err| TagscopeError::Parsing(format!("bad included ranges: {:?}", err)))?;
    }
    parser
        .parse(source, None)
        .ok_or_else(|| TagscopeError::Parsing("parser returned no tree".to_string()))
}

impl fmt::Debug for TsLayer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TsLayer")
            .field("root", &self.tree.root_node().kind())
            .field("extent", &self.extent)
            .field("tags", &self.tags)
            .finish_non_exhaustive()
    }
}

impl LanguageLayer for TsLayer {
    fn extent(&self) -> Range {
        self.extent
    }

    fn has_tags_query(&self) -> bool {
        self.tags.is_some()
    }

    fn query_tags<S: CaptureSink>(&self, extent: Range, sink: S) -> Option<S::Output> {
        let tags = self.tags.as_ref()?;
        let captures = tags.captures(self.tree.root_node(), &self.source, extent);
        let mut resolver = (self.resolver)();
        Some(sink.accept(captures, resolver.as_mut()))
    }
}

/// A document made of one or more tree-sitter layers.
///
/// Edits happen inside a parse transaction; readers wait for it to end
/// through [`SymbolDocument::settled`].
#[derive(Debug)]
pub struct TsDocument {
    layers: Vec<TsLayer>,
    settled: watch::Sender<bool>,
}

impl TsDocument {
    pub fn new(layers: Vec<TsLayer>) -> Self {
        Self {
            layers,
            settled: watch::Sender::new(true),
        }
    }

    pub fn single(layer: TsLayer) -> Self {
        Self::new(vec![layer])
    }

    pub fn layers(&self) -> &[TsLayer] {
        &self.layers
    }

    pub fn layers_mut(&mut self) -> &mut Vec<TsLayer> {
        &mut self.layers
    }

    pub fn is_settled(&self) -> bool {
        *self.settled.borrow()
    }

    pub fn begin_transaction(&self) {
        self.settled.send_replace(false);
    }

    pub fn end_transaction(&self) {
        self.settled.send_replace(true);
    }
}

#[async_trait]
impl SymbolDocument for TsDocument {
    type Layer = TsLayer;

    async fn settled(&self) {
        let mut settled = self.settled.subscribe();
        // The sender lives as long as `self`, so this cannot fail.
        let _ = settled.wait_for(|done| *done).await;
    }

    fn language_layers(&self) -> Vec<&TsLayer> {
        self.layers.iter().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::syntax::{Capture, ScopeResolver, SyntaxNode};
    use crate::test_support::java_language;
    use std::time::Duration;
    use tagscope_api::Point;

    const QUERY: &str = r#"
        (method_declaration name: (identifier) @name) @definition.method
    "#;

    struct CountCaptures;

    impl CaptureSink for CountCaptures {
        type Output = Vec<String>;

        fn accept<N, I, R>(self, captures: I, resolver: &mut R) -> Self::Output
        where
            N: SyntaxNode,
            I: IntoIterator<Item = Capture<N>>,
            R: ScopeResolver<N> + ?Sized,
        {
            captures
                .into_iter()
                .filter(|capture| resolver.store(capture))
                .map(|capture| format!("{}:{}", capture.name, capture.node.text()))
                .collect()
        }
    }

    fn tags() -> Arc<TagsQuery> {
        Arc::new(TagsQuery::new(&java_language(), QUERY).unwrap())
    }

    #[test]
    fn test_layer_without_query_yields_nothing() {
        let layer = TsLayer::parse(java_language(), "class A {}", None).unwrap();
        assert!(!layer.has_tags_query());
        assert!(layer.query_tags(layer.extent(), CountCaptures).is_none());
    }

    #[test]
    fn test_layer_runs_query_over_extent() {
        let source = "class A {\n  void a() {}\n  void b() {}\n}\n";
        let layer = TsLayer::parse(java_language(), source, Some(tags())).unwrap();
        let everything = layer.query_tags(layer.extent(), CountCaptures).unwrap();
        assert_eq!(
            everything,
            vec![
                "definition.method:void a() {}",
                "name:a",
                "definition.method:void b() {}",
                "name:b"
            ]
        );

        let first_method = Range::new(Point::new(1, 0), Point::new(1, 20));
        let partial = layer.query_tags(first_method, CountCaptures).unwrap();
        assert_eq!(partial, vec!["definition.method:void a() {}", "name:a"]);
    }

    #[test]
    fn test_included_ranges_set_extent() {
        let source = "<% class A { void a() {} } %>\n<% class B { void b() {} } %>\n";
        let first = tree_sitter::Range {
            start_byte: 2,
            end_byte: 27,
            start_point: tree_sitter::Point::new(0, 2),
            end_point: tree_sitter::Point::new(0, 27),
        };
        let second = tree_sitter::Range {
            start_byte: 32,
            end_byte: 57,
            start_point: tree_sitter::Point::new(1, 2),
            end_point: tree_sitter::Point::new(1, 27),
        };
        let layer =
            TsLayer::parse_included(java_language(), source, &[first, second], Some(tags()))
                .unwrap();
        assert_eq!(
            layer.extent(),
            Range::new(Point::new(0, 2), Point::new(1, 27))
        );
        let captures = layer.query_tags(layer.extent(), CountCaptures).unwrap();
        assert_eq!(captures.len(), 4);
    }

    /// Drops captures from patterns marked `test.skip`.
    struct SkipMarked;

    impl<'t> ScopeResolver<TsNode<'t>> for SkipMarked {
        fn reset(&mut self) {}

        fn store(&mut self, capture: &Capture<TsNode<'t>>) -> bool {
            capture.properties.get("test.skip") != Some("true")
        }
    }

    #[tokio::test]
    async fn test_layer_resolver_filters_provider_symbols() {
        use crate::provider::TreeSitterProvider;
        use std::sync::atomic::{AtomicUsize, Ordering};
        use tagscope_api::{SymbolMeta, SymbolProvider};

        let query = r#"
            (method_declaration name: (identifier) @name) @definition.method
            ((class_declaration name: (identifier) @name) @definition.class
              (#set! test.skip "true"))
        "#;
        let tags = Arc::new(TagsQuery::new(&java_language(), query).unwrap());
        let source = "class A {\n  void a() {}\n  void b() {}\n}\n";

        let built = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&built);
        let layer = TsLayer::parse(java_language(), source, Some(tags))
            .unwrap()
            .with_resolver(move || {
                counter.fetch_add(1, Ordering::SeqCst);
                Box::new(SkipMarked) as Box<TsScopeResolver>
            });
        let document = TsDocument::single(layer);
        let provider = TreeSitterProvider::default();

        let symbols = provider
            .get_symbols(&SymbolMeta::file(&document))
            .await
            .unwrap();
        let names: Vec<_> = symbols.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, vec!["a", "b"]);

        provider
            .get_symbols(&SymbolMeta::file(&document))
            .await
            .unwrap();
        assert_eq!(built.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_settled_waits_for_transaction() {
        let layer = TsLayer::parse(java_language(), "class A {}", None).unwrap();
        let document = Arc::new(TsDocument::single(layer));
        assert!(document.is_settled());
        document.settled().await;

        document.begin_transaction();
        assert!(!document.is_settled());

        let waiter = {
            let document = Arc::clone(&document);
            tokio::spawn(async move { document.settled().await })
        };
        tokio::time::sleep(Duration::from_millis(20)).await;
        assert!(!waiter.is_finished());

        document.end_transaction();
        tokio::time::timeout(Duration::from_secs(1), waiter)
            .await
            .unwrap()
            .unwrap();
    }
}
