use super::icons::icon_for_tag;
use super::name::{Name, NameContext};
use crate::syntax::{Capture, CaptureKind, SyntaxNode};
use std::collections::HashMap;
use tagscope_api::{Point, Range, Symbol};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ContainerKind {
    Definition,
    Reference,
}

impl ContainerKind {
    pub fn of(kind: CaptureKind) -> Option<Self> {
        match kind {
            CaptureKind::Definition => Some(ContainerKind::Definition),
            CaptureKind::Reference => Some(ContainerKind::Reference),
            CaptureKind::Name | CaptureKind::Other => None,
        }
    }
}

/// Captures that belong to one `definition.*` or `reference.*` node.
///
/// Every capture held here, including the defining one, lies inside
/// [`Container::range`].
#[derive(Debug, Clone)]
pub struct Container<N> {
    kind: ContainerKind,
    tag: String,
    icon: Option<String>,
    node: N,
    range: Range,
    fields: HashMap<String, Capture<N>>,
    name: Option<Name>,
}

impl<N: SyntaxNode> Container<N> {
    pub fn new(kind: ContainerKind, capture: Capture<N>) -> Self {
        let tag = capture
            .name
            .split_once('.')
            .map(|(_, rest)| rest.to_string())
            .unwrap_or_default();
        let icon = capture
            .properties
            .normalized_icon()
            .or_else(|| icon_for_tag(&tag).map(str::to_string));
        let node = capture.node.clone();
        let range = node.range();

        let mut fields = HashMap::new();
        fields.insert(capture.name.clone(), capture);

        Self {
            kind,
            tag,
            icon,
            node,
            range,
            fields,
            name: None,
        }
    }

    pub fn kind(&self) -> ContainerKind {
        self.kind
    }

    pub fn tag(&self) -> &str {
        &self.tag
    }

    pub fn icon(&self) -> Option<&str> {
        self.icon.as_deref()
    }

    pub fn node(&self) -> &N {
        &self.node
    }

    pub fn range(&self) -> Range {
        self.range
    }

    pub fn position(&self) -> Point {
        self.range.start
    }

    pub fn name(&self) -> Option<&Name> {
        self.name.as_ref()
    }

    pub fn has_field(&self, capture_name: &str) -> bool {
        self.fields.contains_key(capture_name)
    }

    pub fn captures(&self) -> impl Iterator<Item = &Capture<N>> {
        self.fields.values()
    }

    /// Takes ownership of `capture` if it fits; otherwise hands it back
    /// untouched so an enclosing container can try.
    ///
    /// A `name` capture is resolved as soon as it is accepted. The organizer
    /// checks `has_field` before calling this, so the duplicate warning only
    /// reaches direct callers.
    pub fn add(&mut self, capture: Capture<N>, ctx: &mut NameContext<'_>) -> Result<(), Capture<N>> {
        if self.has_field(&capture.name) {
            tracing::warn!(
                "Duplicate capture {:?} for {} at {}; keeping the first",
                capture.name,
                self.tag,
                self.position()
            );
            return Err(capture);
        }
        if !self.range.contains_range(&capture.range()) {
            return Err(capture);
        }

        if capture.kind() == CaptureKind::Name {
            self.name = Some(Name::resolve(&capture, ctx));
        }
        self.fields.insert(capture.name.clone(), capture);
        Ok(())
    }

    /// Whether this container is over by the time `range` starts.
    pub fn ends_before(&self, range: &Range) -> bool {
        self.range.ends_before(range.start)
    }

    pub fn is_valid(&self) -> bool {
        self.name.is_some()
    }

    pub fn to_symbol(&self) -> Option<Symbol> {
        let name = self.name.as_ref()?;
        Some(Symbol {
            name: name.name.clone(),
            short_name: name.short_name.clone(),
            tag: name.tag.clone().or_else(|| Some(self.tag.clone())),
            icon: name.icon.clone().or_else(|| self.icon.clone()),
            position: self.position(),
            context: name.context.clone(),
        })
    }
}
