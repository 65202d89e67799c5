//! tree-sitter backed implementation of the syntax view.

use super::{Capture, CaptureProperties, NodeId, NodeStep, SyntaxNode};
use crate::error::Result;
use std::borrow::Cow;
use std::fmt;
use tagscope_api::{Point, Range};
use tree_sitter::{Language, Node, Query, QueryCursor, QueryProperty, StreamingIterator};

pub fn point_from_ts(point: tree_sitter::Point) -> Point {
    Point::new(point.row, point.column)
}

pub fn point_to_ts(point: Point) -> tree_sitter::Point {
    tree_sitter::Point::new(point.row, point.column)
}

pub fn range_from_ts(range: tree_sitter::Range) -> Range {
    Range::new(point_from_ts(range.start_point), point_from_ts(range.end_point))
}

/// A tree-sitter node together with the text it was parsed from.
#[derive(Clone, Copy)]
pub struct TsNode<'t> {
    node: Node<'t>,
    source: &'t str,
}

impl<'t> TsNode<'t> {
    pub fn new(node: Node<'t>, source: &'t str) -> Self {
        Self { node, source }
    }

    pub fn inner(&self) -> Node<'t> {
        self.node
    }

    fn wrap(&self, node: Option<Node<'t>>) -> Option<Self> {
        node.map(|node| Self {
            node,
            source: self.source,
        })
    }
}

impl fmt::Debug for TsNode<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TsNode")
            .field("kind", &self.node.kind())
            .field("range", &self.range())
            .finish()
    }
}

impl SyntaxNode for TsNode<'_> {
    fn id(&self) -> NodeId {
        NodeId::from(self.node.id())
    }

    fn range(&self) -> Range {
        Range::new(
            point_from_ts(self.node.start_position()),
            point_from_ts(self.node.end_position()),
        )
    }

    fn kind(&self) -> &str {
        self.node.kind()
    }

    fn text(&self) -> Cow<'_, str> {
        self.source
            .get(self.node.byte_range())
            .map(Cow::Borrowed)
            .unwrap_or_default()
    }

    fn step(&self, step: &NodeStep) -> Option<Self> {
        let node = self.node;
        let next = match step {
            NodeStep::Parent => node.parent(),
            NodeStep::FirstChild => node.child(0),
            NodeStep::LastChild => node.children(&mut node.walk()).last(),
            NodeStep::FirstNamedChild => node.named_child(0),
            NodeStep::LastNamedChild => node.named_children(&mut node.walk()).last(),
            NodeStep::NextSibling => node.next_sibling(),
            NodeStep::PreviousSibling => node.prev_sibling(),
            NodeStep::NextNamedSibling => node.next_named_sibling(),
            NodeStep::PreviousNamedSibling => node.prev_named_sibling(),
            NodeStep::Field(name) => node.child_by_field_name(name.as_str()),
        };
        self.wrap(next)
    }
}

/// `#set!` directives of one query pattern.
#[derive(Debug, Default)]
struct PatternProperties {
    shared: CaptureProperties,
    /// Directives aimed at a single capture: `(#set! @name key value)`.
    targeted: Vec<(u32, String, String)>,
}

impl PatternProperties {
    fn from_settings(settings: &[QueryProperty]) -> Self {
        let mut properties = Self::default();
        for setting in settings {
            let value = setting.value.as_deref().unwrap_or_default();
            match setting.capture_id {
                Some(id) => properties
                    .targeted
                    .push((id as u32, setting.key.to_string(), value.to_string())),
                None => properties.shared.set(&setting.key, value),
            }
        }
        properties
    }

    fn for_capture(&self, capture_index: u32) -> CaptureProperties {
        let mut properties = self.shared.clone();
        for (_, key, value) in self.targeted.iter().filter(|(id, ..)| *id == capture_index) {
            properties.set(key, value);
        }
        properties
    }
}

/// A compiled tags query: `@definition.*`, `@reference.*` and `@name`
/// captures plus their `#set!` rules.
pub struct TagsQuery {
    query: Query,
    patterns: Vec<PatternProperties>,
}

impl TagsQuery {
    pub fn new(language: &Language, source: &str) -> Result<Self> {
        let query = Query::new(language, source)?;
        let patterns = (0..query.pattern_count())
            .map(|index| PatternProperties::from_settings(query.property_settings(index)))
            .collect();
        Ok(Self { query, patterns })
    }

    pub fn query(&self) -> &Query {
        &self.query
    }

    /// Runs the query over `extent` of the tree under `root`, returning the
    /// captures in document order.
    pub fn captures<'t>(
        &self,
        root: Node<'t>,
        source: &'t str,
        extent: Range,
    ) -> Vec<Capture<TsNode<'t>>> {
        let mut cursor = QueryCursor::new();
        cursor.set_point_range(point_to_ts(extent.start)..point_to_ts(extent.end));

        let names = self.query.capture_names();
        let mut result = Vec::new();
        let mut captures = cursor.captures(&self.query, root, source.as_bytes());
        while let Some((mat, capture_index)) = captures.next() {
            let capture = mat.captures[*capture_index];
            let properties = self
                .patterns
                .get(mat.pattern_index)
                .map(|pattern| pattern.for_capture(capture.index))
                .unwrap_or_default();
            result.push(Capture::new(
                names[capture.index as usize],
                TsNode::new(capture.node, source),
                properties,
            ));
        }
        result
    }
}

impl fmt::Debug for TagsQuery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TagsQuery")
            .field("patterns", &self.query.pattern_count())
            .field("captures", &self.query.capture_names())
            .finish()
    }
}
