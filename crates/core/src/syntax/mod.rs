//! The view of a syntax tree that symbol extraction works against.
//!
//! Nothing here parses source text. A tree implementation plugs in by
//! implementing [`SyntaxNode`]; [`ts`] does that for tree-sitter.

use std::borrow::Cow;
use std::fmt;
use std::str::FromStr;
use tagscope_api::Range;

pub mod capture;
pub mod descriptor;
pub mod ts;

pub use capture::{AcceptAll, Capture, CaptureKind, CaptureProperties, ScopeResolver};
pub use descriptor::{NodeDescriptor, resolve_node_descriptor};
pub use ts::{TagsQuery, TsNode};

/// Stable identity of a node within one tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(u64);

impl NodeId {
    pub const fn new(raw: u64) -> Self {
        Self(raw)
    }

    pub fn raw(&self) -> u64 {
        self.0
    }
}

impl From<usize> for NodeId {
    fn from(raw: usize) -> Self {
        Self(raw as u64)
    }
}

/// One navigation step of a node descriptor.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum NodeStep {
    Parent,
    FirstChild,
    LastChild,
    FirstNamedChild,
    LastNamedChild,
    NextSibling,
    PreviousSibling,
    NextNamedSibling,
    PreviousNamedSibling,
    /// Child by grammar field name, written `field(name)`.
    Field(String),
}

impl FromStr for NodeStep {
    type Err = String;

    fn from_str(segment: &str) -> Result<Self, Self::Err> {
        let step = match segment {
            "parent" => NodeStep::Parent,
            "firstChild" => NodeStep::FirstChild,
            "lastChild" => NodeStep::LastChild,
            "firstNamedChild" => NodeStep::FirstNamedChild,
            "lastNamedChild" => NodeStep::LastNamedChild,
            "nextSibling" => NodeStep::NextSibling,
            "previousSibling" => NodeStep::PreviousSibling,
            "nextNamedSibling" => NodeStep::NextNamedSibling,
            "previousNamedSibling" => NodeStep::PreviousNamedSibling,
            other => {
                let field = other
                    .strip_prefix("field(")
                    .and_then(|rest| rest.strip_suffix(')'))
                    .filter(|name| !name.is_empty())
                    .ok_or_else(|| format!("unknown step '{}'", other))?;
                NodeStep::Field(field.to_string())
            }
        };
        Ok(step)
    }
}

impl fmt::Display for NodeStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NodeStep::Parent => f.write_str("parent"),
            NodeStep::FirstChild => f.write_str("firstChild"),
            NodeStep::LastChild => f.write_str("lastChild"),
            NodeStep::FirstNamedChild => f.write_str("firstNamedChild"),
            NodeStep::LastNamedChild => f.write_str("lastNamedChild"),
            NodeStep::NextSibling => f.write_str("nextSibling"),
            NodeStep::PreviousSibling => f.write_str("previousSibling"),
            NodeStep::NextNamedSibling => f.write_str("nextNamedSibling"),
            NodeStep::PreviousNamedSibling => f.write_str("previousNamedSibling"),
            NodeStep::Field(name) => write!(f, "field({})", name),
        }
    }
}

/// Read-only handle to a node of a syntax tree owned by someone else.
pub trait SyntaxNode: Clone {
    fn id(&self) -> NodeId;

    fn range(&self) -> Range;

    /// Grammar type of the node, e.g. `method_declaration`.
    fn kind(&self) -> &str;

    /// Source text covered by the node.
    fn text(&self) -> Cow<'_, str>;

    /// Takes a single navigation step; `None` when there is nothing there.
    fn step(&self, step: &NodeStep) -> Option<Self>;
}
