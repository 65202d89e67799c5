use async_trait::async_trait;
use std::borrow::Cow;
use std::sync::Arc;
use tagscope_api::{Point, Range};
use tagscope_core::provider::{CaptureSink, LanguageLayer, SymbolDocument};
use tagscope_core::syntax::{
    AcceptAll, Capture, CaptureProperties, NodeId, NodeStep, SyntaxNode,
};
use tokio::sync::watch;

#[derive(Debug)]
struct NodeData {
    kind: String,
    text: String,
    range: Range,
    parent: Option<usize>,
    children: Vec<usize>,
    named: bool,
    field: Option<String>,
}

/// Builds an in-memory syntax tree node by node. Index 0 is the root.
#[derive(Debug, Default)]
pub struct MockTreeBuilder {
    nodes: Vec<NodeData>,
}

#[allow(dead_code)]
impl MockTreeBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn root(&mut self, kind: &str, text: &str, start: (usize, usize), end: (usize, usize)) -> usize {
        self.push(None, None, true, kind, text, start, end)
    }

    pub fn child(
        &mut self,
        parent: usize,
        kind: &str,
        text: &str,
        start: (usize, usize),
        end: (usize, usize),
    ) -> usize {
        self.push(Some(parent), None, true, kind, text, start, end)
    }

    pub fn field(
        &mut self,
        parent: usize,
        field: &str,
        kind: &str,
        text: &str,
        start: (usize, usize),
        end: (usize, usize),
    ) -> usize {
        self.push(Some(parent), Some(field), true, kind, text, start, end)
    }

    /// An unnamed node, such as punctuation.
    pub fn token(&mut self, parent: usize, text: &str, start: (usize, usize), end: (usize, usize)) -> usize {
        self.push(Some(parent), None, false, text, text, start, end)
    }

    #[allow(clippy::too_many_arguments)]
    fn push(
        &mut self,
        parent: Option<usize>,
        field: Option<&str>,
        named: bool,
        kind: &str,
        text: &str,
        start: (usize, usize),
        end: (usize, usize),
    ) -> usize {
        let index = self.nodes.len();
        self.nodes.push(NodeData {
            kind: kind.to_string(),
            text: text.to_string(),
            range: Range::new(Point::from(start), Point::from(end)),
            parent,
            children: Vec::new(),
            named,
            field: field.map(str::to_string),
        });
        if let Some(parent) = parent {
            self.nodes[parent].children.push(index);
        }
        index
    }

    pub fn build(self) -> MockTree {
        MockTree {
            nodes: Arc::new(self.nodes),
        }
    }
}

#[derive(Debug, Clone)]
pub struct MockTree {
    nodes: Arc<Vec<NodeData>>,
}

#[allow(dead_code)]
impl MockTree {
    pub fn node(&self, index: usize) -> MockNode {
        assert!(index < self.nodes.len(), "no node {}", index);
        MockNode {
            nodes: Arc::clone(&self.nodes),
            index,
        }
    }

    pub fn capture(&self, index: usize, name: &str, properties: &[(&str, &str)]) -> Capture<MockNode> {
        Capture::new(
            name,
            self.node(index),
            CaptureProperties::from_pairs(properties.iter().copied()),
        )
    }
}

#[derive(Clone)]
pub struct MockNode {
    nodes: Arc<Vec<NodeData>>,
    index: usize,
}

impl std::fmt::Debug for MockNode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "MockNode({}, {})", self.index, self.data().kind)
    }
}

impl MockNode {
    fn data(&self) -> &NodeData {
        &self.nodes[self.index]
    }

    fn at(&self, index: Option<usize>) -> Option<Self> {
        index.map(|index| Self {
            nodes: Arc::clone(&self.nodes),
            index,
        })
    }

    fn siblings(&self) -> &[usize] {
        match self.data().parent {
            Some(parent) => &self.nodes[parent].children,
            None => &[],
        }
    }

    fn sibling(&self, forward: bool, named_only: bool) -> Option<usize> {
        let siblings = self.siblings();
        let position = siblings.iter().position(|&index| index == self.index)?;
        let candidates: Box<dyn Iterator<Item = &usize>> = if forward {
            Box::new(siblings[position + 1..].iter())
        } else {
            Box::new(siblings[..position].iter().rev())
        };
        candidates
            .copied()
            .find(|&index| !named_only || self.nodes[index].named)
    }
}

impl SyntaxNode for MockNode {
    fn id(&self) -> NodeId {
        NodeId::new(self.index as u64)
    }

    fn range(&self) -> Range {
        self.data().range
    }

    fn kind(&self) -> &str {
        &self.data().kind
    }

    fn text(&self) -> Cow<'_, str> {
        Cow::Borrowed(&self.data().text)
    }

    fn step(&self, step: &NodeStep) -> Option<Self> {
        let data = self.data();
        let named = |index: &&usize| self.nodes[**index].named;
        let next = match step {
            NodeStep::Parent => data.parent,
            NodeStep::FirstChild => data.children.first().copied(),
            NodeStep::LastChild => data.children.last().copied(),
            NodeStep::FirstNamedChild => data.children.iter().find(named).copied(),
            NodeStep::LastNamedChild => data.children.iter().rev().find(named).copied(),
            NodeStep::NextSibling => self.sibling(true, false),
            NodeStep::PreviousSibling => self.sibling(false, false),
            NodeStep::NextNamedSibling => self.sibling(true, true),
            NodeStep::PreviousNamedSibling => self.sibling(false, true),
            NodeStep::Field(name) => data
                .children
                .iter()
                .find(|&&index| self.nodes[index].field.as_deref() == Some(name.as_str()))
                .copied(),
        };
        self.at(next)
    }
}

/// A layer whose "query" replays a fixed capture list.
#[allow(dead_code)]
#[derive(Debug)]
pub struct MockLayer {
    extent: Range,
    captures: Option<Vec<Capture<MockNode>>>,
}

#[allow(dead_code)]
impl MockLayer {
    pub fn new(tree: &MockTree, captures: Vec<Capture<MockNode>>) -> Self {
        Self {
            extent: tree.node(0).range(),
            captures: Some(captures),
        }
    }

    pub fn without_query(tree: &MockTree) -> Self {
        Self {
            extent: tree.node(0).range(),
            captures: None,
        }
    }
}

impl LanguageLayer for MockLayer {
    fn extent(&self) -> Range {
        self.extent
    }

    fn has_tags_query(&self) -> bool {
        self.captures.is_some()
    }

    fn query_tags<S: CaptureSink>(&self, extent: Range, sink: S) -> Option<S::Output> {
        let captures = self.captures.as_ref()?;
        let selected = captures.iter().filter(|capture| {
            let range = capture.range();
            range.start <= extent.end && extent.start <= range.end
        });
        Some(sink.accept(selected.cloned(), &mut AcceptAll))
    }
}

#[allow(dead_code)]
#[derive(Debug)]
pub struct MockDocument {
    layers: Vec<MockLayer>,
    settled: watch::Sender<bool>,
}

#[allow(dead_code)]
impl MockDocument {
    pub fn new(layers: Vec<MockLayer>) -> Self {
        Self {
            layers,
            settled: watch::Sender::new(true),
        }
    }

    pub fn set_settled(&self, settled: bool) {
        self.settled.send_replace(settled);
    }
}

#[async_trait]
impl SymbolDocument for MockDocument {
    type Layer = MockLayer;

    async fn settled(&self) {
        let _ = self.settled.subscribe().wait_for(|done| *done).await;
    }

    fn language_layers(&self) -> Vec<&MockLayer> {
        self.layers.iter().collect()
    }
}

/// `function quicksort() {\n  function sort() {}\n}`
///
/// Nodes: 0 program, 1 outer function, 2 `quicksort`, 3 body, 4 inner
/// function, 5 `sort`.
#[allow(dead_code)]
pub fn quicksort_tree() -> MockTree {
    let mut tree = MockTreeBuilder::new();
    let program = tree.root("program", "", (0, 0), (3, 0));
    let outer = tree.child(program, "function_declaration", "", (0, 0), (2, 1));
    tree.field(outer, "name", "identifier", "quicksort", (0, 9), (0, 18));
    let body = tree.field(outer, "body", "statement_block", "", (0, 21), (2, 1));
    let inner = tree.child(body, "function_declaration", "", (1, 2), (1, 20));
    tree.field(inner, "name", "identifier", "sort", (1, 11), (1, 15));
    tree.build()
}

/// Two functions that make three calls between them.
///
/// ```text
/// function a() { b(); }
/// function b() { c(); d(); }
/// ```
///
/// Returns the tree and its captures in document order.
#[allow(dead_code)]
pub fn calls_fixture() -> (MockTree, Vec<Capture<MockNode>>) {
    let mut tree = MockTreeBuilder::new();
    let program = tree.root("program", "", (0, 0), (2, 0));

    let a = tree.child(program, "function_declaration", "", (0, 0), (0, 21));
    let a_name = tree.field(a, "name", "identifier", "a", (0, 9), (0, 10));
    let call_b = tree.child(a, "call_expression", "b()", (0, 15), (0, 18));
    let b_callee = tree.field(call_b, "function", "identifier", "b", (0, 15), (0, 16));

    let b = tree.child(program, "function_declaration", "", (1, 0), (1, 26));
    let b_name = tree.field(b, "name", "identifier", "b", (1, 9), (1, 10));
    let call_c = tree.child(b, "call_expression", "c()", (1, 15), (1, 18));
    let c_callee = tree.field(call_c, "function", "identifier", "c", (1, 15), (1, 16));
    let call_d = tree.child(b, "call_expression", "d()", (1, 20), (1, 23));
    let d_callee = tree.field(call_d, "function", "identifier", "d", (1, 20), (1, 21));

    let tree = tree.build();
    let captures = vec![
        tree.capture(a, "definition.function", &[]),
        tree.capture(a_name, "name", &[]),
        tree.capture(call_b, "reference.call", &[]),
        tree.capture(b_callee, "name", &[]),
        tree.capture(b, "definition.function", &[]),
        tree.capture(b_name, "name", &[]),
        tree.capture(call_c, "reference.call", &[]),
        tree.capture(c_callee, "name", &[]),
        tree.capture(call_d, "reference.call", &[]),
        tree.capture(d_callee, "name", &[]),
    ];
    (tree, captures)
}
