use super::{NodeDescriptor, SyntaxNode};
use std::collections::BTreeMap;
use tagscope_api::Range;

/// How the organizer treats a capture, decided once from its name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CaptureKind {
    /// `definition.*`: opens a definition container.
    Definition,
    /// `reference.*`: opens a reference container.
    Reference,
    /// Exactly `name`: names the nearest container, or stands alone.
    Name,
    /// Anything else: a field of the nearest container, if any takes it.
    Other,
}

impl CaptureKind {
    pub fn classify(name: &str) -> Self {
        if name.starts_with("definition.") {
            CaptureKind::Definition
        } else if name.starts_with("reference.") {
            CaptureKind::Reference
        } else if name == "name" {
            CaptureKind::Name
        } else {
            CaptureKind::Other
        }
    }
}

/// Rule directives a query attaches to a capture with `#set!`.
///
/// The `symbol.*` keys are parsed into typed fields; node descriptors are
/// parsed here once so that a broken one is reported a single time and then
/// has no effect. Other keys are kept verbatim for the scope resolver.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CaptureProperties {
    pub strip: Option<String>,
    pub prepend: Option<String>,
    pub append: Option<String>,
    pub context: Option<String>,
    pub context_node: Option<NodeDescriptor>,
    pub prepend_symbol_for_node: Option<NodeDescriptor>,
    pub prepend_text_for_node: Option<NodeDescriptor>,
    pub joiner: Option<String>,
    pub tag: Option<String>,
    pub icon: Option<String>,
    other: BTreeMap<String, String>,
}

impl CaptureProperties {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_pairs<'a, I>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (&'a str, &'a str)>,
    {
        let mut properties = Self::default();
        for (key, value) in pairs {
            properties.set(key, value);
        }
        properties
    }

    /// Builder-style [`CaptureProperties::set`].
    pub fn with(mut self, key: &str, value: &str) -> Self {
        self.set(key, value);
        self
    }

    pub fn set(&mut self, key: &str, value: &str) {
        let value = value.to_string();
        match key {
            "symbol.strip" => self.strip = Some(value),
            "symbol.prepend" => self.prepend = Some(value),
            "symbol.append" => self.append = Some(value),
            "symbol.context" => self.context = Some(value),
            "symbol.contextNode" => self.context_node = parse_descriptor(key, &value),
            "symbol.prependSymbolForNode" => {
                self.prepend_symbol_for_node = parse_descriptor(key, &value)
            }
            "symbol.prependTextForNode" => {
                self.prepend_text_for_node = parse_descriptor(key, &value)
            }
            "symbol.joiner" => self.joiner = Some(value),
            "symbol.tag" => self.tag = Some(value),
            "symbol.icon" => self.icon = Some(value),
            _ => {
                self.other.insert(key.to_string(), value);
            }
        }
    }

    /// A property outside the `symbol.*` rule set.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.other.get(key).map(String::as_str)
    }

    /// `symbol.icon`, with the `icon-` prefix added when missing. An empty
    /// icon counts as unset.
    pub fn normalized_icon(&self) -> Option<String> {
        self.icon
            .as_deref()
            .filter(|icon| !icon.is_empty())
            .map(normalize_icon)
    }
}

fn normalize_icon(icon: &str) -> String {
    if icon.starts_with("icon-") {
        icon.to_string()
    } else {
        format!("icon-{}", icon)
    }
}

fn parse_descriptor(key: &str, value: &str) -> Option<NodeDescriptor> {
    match value.parse() {
        Ok(descriptor) => Some(descriptor),
        Err(err) => {
            tracing::warn!("Ignoring {}: {}", key, err);
            None
        }
    }
}

/// One `(name, node, properties)` triple produced by running a query.
#[derive(Debug, Clone)]
pub struct Capture<N> {
    pub name: String,
    pub node: N,
    pub properties: CaptureProperties,
}

impl<N: SyntaxNode> Capture<N> {
    pub fn new(name: impl Into<String>, node: N, properties: CaptureProperties) -> Self {
        Self {
            name: name.into(),
            node,
            properties,
        }
    }

    pub fn kind(&self) -> CaptureKind {
        CaptureKind::classify(&self.name)
    }

    pub fn range(&self) -> Range {
        self.node.range()
    }
}

/// Evaluates query predicates that the query engine leaves to its caller.
///
/// Stateful across one organize pass: reset before the first capture.
pub trait ScopeResolver<N> {
    fn reset(&mut self);

    /// Whether `capture` survives filtering.
    fn store(&mut self, capture: &Capture<N>) -> bool;
}

/// A resolver with no predicates of its own.
#[derive(Debug, Clone, Copy, Default)]
pub struct AcceptAll;

impl<N> ScopeResolver<N> for AcceptAll {
    fn reset(&mut self) {}

    fn store(&mut self, _capture: &Capture<N>) -> bool {
        true
    }
}
