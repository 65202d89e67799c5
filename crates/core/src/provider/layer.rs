use crate::syntax::{Capture, ScopeResolver, SyntaxNode};
use async_trait::async_trait;
use tagscope_api::Range;

/// Consumer of the captures one layer produces.
///
/// Layers own their syntax trees, so the nodes they hand out only live for
/// the duration of the call; the sink does its work inside that window.
pub trait CaptureSink {
    type Output;

    fn accept<N, I, R>(self, captures: I, resolver: &mut R) -> Self::Output
    where
        N: SyntaxNode,
        I: IntoIterator<Item = Capture<N>>,
        R: ScopeResolver<N> + ?Sized;
}

/// One parse tree covering part of a document in one language.
pub trait LanguageLayer: Send + Sync {
    /// The span of the document this layer covers.
    fn extent(&self) -> Range;

    fn has_tags_query(&self) -> bool;

    /// Runs the layer's tags query over `extent` and feeds the captures,
    /// in document order, to `sink`. `None` without a tags query.
    fn query_tags<S: CaptureSink>(&self, extent: Range, sink: S) -> Option<S::Output>;
}

/// A document as the provider sees it.
#[async_trait]
pub trait SymbolDocument: Send + Sync {
    type Layer: LanguageLayer;

    /// Resolves once no parse transaction is in flight.
    async fn settled(&self);

    fn language_layers(&self) -> Vec<&Self::Layer>;
}
