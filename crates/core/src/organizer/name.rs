use super::icons::icon_for_tag;
use super::pattern::PatternCache;
use crate::syntax::{Capture, CaptureProperties, NodeId, SyntaxNode};
use std::collections::HashMap;
use tagscope_api::{Point, Symbol};

/// Display names resolved so far in one organize pass, keyed by the node
/// that was named. Lets a later name build on an earlier symbol's name.
#[derive(Debug, Default)]
pub struct NameCache {
    names: HashMap<NodeId, String>,
}

impl NameCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, id: NodeId) -> Option<&str> {
        self.names.get(&id).map(String::as_str)
    }

    pub fn insert(&mut self, id: NodeId, name: String) {
        self.names.insert(id, name);
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

/// What name resolution reads from and writes to during a pass.
pub struct NameContext<'a> {
    pub patterns: &'a PatternCache,
    pub names: &'a mut NameCache,
}

/// The resolved form of one `@name` capture.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Name {
    pub name: String,
    pub short_name: String,
    pub context: Option<String>,
    /// Only set when the query asked for one with `symbol.tag`.
    pub tag: Option<String>,
    pub icon: Option<String>,
    pub position: Point,
}

impl Name {
    /// Applies the capture's `symbol.*` rules and records the result in the
    /// name cache.
    pub fn resolve<N: SyntaxNode>(capture: &Capture<N>, ctx: &mut NameContext<'_>) -> Self {
        let node = &capture.node;
        let props = &capture.properties;

        let text = node.text();
        let short_name = match props.strip.as_deref() {
            Some(pattern) => ctx.patterns.strip(pattern, &text),
            None => text.into_owned(),
        };

        let mut name = format!(
            "{}{}{}",
            props.prepend.as_deref().unwrap_or_default(),
            short_name,
            props.append.as_deref().unwrap_or_default()
        );
        if let Some(prefix) = resolve_prefix(node, props, ctx.names) {
            let joiner = props.joiner.as_deref().unwrap_or_default();
            name = format!("{}{}{}", prefix, joiner, name);
        }
        ctx.names.insert(node.id(), name.clone());

        Self {
            name,
            short_name,
            context: resolve_context(node, props),
            tag: props.tag.clone(),
            icon: props.normalized_icon(),
            position: node.range().start,
        }
    }

    /// A standalone symbol for a name that no container claimed.
    pub fn to_symbol(&self) -> Symbol {
        let icon = self.icon.clone().or_else(|| {
            self.tag
                .as_deref()
                .and_then(icon_for_tag)
                .map(str::to_string)
        });
        Symbol {
            name: self.name.clone(),
            short_name: self.short_name.clone(),
            tag: self.tag.clone(),
            icon,
            position: self.position,
            context: self.context.clone(),
        }
    }
}

/// The symbol name of another node wins over its raw text; both need the
/// descriptor to land on a node. Empty values count as absent.
fn resolve_prefix<N: SyntaxNode>(
    node: &N,
    props: &CaptureProperties,
    names: &NameCache,
) -> Option<String> {
    let symbol_prefix = props
        .prepend_symbol_for_node
        .as_ref()
        .and_then(|descriptor| descriptor.resolve(node))
        .and_then(|other| names.get(other.id()))
        .filter(|prefix| !prefix.is_empty())
        .map(str::to_string);
    if symbol_prefix.is_some() {
        return symbol_prefix;
    }

    props
        .prepend_text_for_node
        .as_ref()
        .and_then(|descriptor| descriptor.resolve(node))
        .map(|other| other.text().into_owned())
        .filter(|prefix| !prefix.is_empty())
}

fn resolve_context<N: SyntaxNode>(node: &N, props: &CaptureProperties) -> Option<String> {
    if let Some(context) = props.context.as_deref().filter(|c| !c.is_empty()) {
        return Some(context.to_string());
    }
    props
        .context_node
        .as_ref()
        .and_then(|descriptor| descriptor.resolve(node))
        .map(|other| other.text().into_owned())
        .filter(|context| !context.is_empty())
}
