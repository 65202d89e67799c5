//! Java support: the bundled tags query and document helpers.

pub mod queries;

use once_cell::sync::OnceCell;
use std::sync::Arc;
use tagscope_core::Result;
use tagscope_core::provider::{TsDocument, TsLayer};
use tagscope_core::syntax::TagsQuery;
use tree_sitter::Language;

static JAVA_TAGS: OnceCell<Arc<TagsQuery>> = OnceCell::new();

pub fn java_language() -> Language {
    tree_sitter_java::LANGUAGE.into()
}

/// The bundled Java tags query, compiled once.
pub fn java_tags_query() -> Result<Arc<TagsQuery>> {
    JAVA_TAGS
        .get_or_try_init(|| {
            tracing::debug!("Compiling bundled Java tags query");
            TagsQuery::new(&java_language(), queries::JAVA_TAGS_SCM).map(Arc::new)
        })
        .cloned()
}

/// Compiles a caller-supplied tags query for Java.
pub fn custom_tags_query(source: &str) -> Result<Arc<TagsQuery>> {
    TagsQuery::new(&java_language(), source).map(Arc::new)
}

/// A single-layer document for `source`, using `tags` or the bundled query.
pub fn java_document(source: &str, tags: Option<Arc<TagsQuery>>) -> Result<TsDocument> {
    let tags = match tags {
        Some(tags) => tags,
        None => java_tags_query()?,
    };
    let layer = TsLayer::parse(java_language(), source, Some(tags))?;
    Ok(TsDocument::single(layer))
}
