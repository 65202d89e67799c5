use super::{NodeStep, SyntaxNode};
use crate::error::TagscopeError;
use std::fmt;
use std::str::FromStr;

/// A dotted path of navigation steps such as `parent.parent.firstNamedChild`,
/// parsed once and replayed against any node.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct NodeDescriptor {
    steps: Vec<NodeStep>,
}

impl NodeDescriptor {
    pub fn steps(&self) -> &[NodeStep] {
        &self.steps
    }

    /// Walks the steps from `node`, giving up at the first one that leads
    /// nowhere.
    pub fn resolve<N: SyntaxNode>(&self, node: &N) -> Option<N> {
        self.steps
            .iter()
            .try_fold(node.clone(), |current, step| current.step(step))
    }
}

impl FromStr for NodeDescriptor {
    type Err = TagscopeError;

    fn from_str(descriptor: &str) -> Result<Self, Self::Err> {
        let steps = descriptor
            .split('.')
            .map(|segment| segment.parse::<NodeStep>())
            .collect::<Result<Vec<_>, _>>()
            .map_err(|reason| TagscopeError::Descriptor(format!("{}: {}", descriptor, reason)))?;
        Ok(Self { steps })
    }
}

impl fmt::Display for NodeDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (index, step) in self.steps.iter().enumerate() {
            if index > 0 {
                f.write_str(".")?;
            }
            write!(f, "{}", step)?;
        }
        Ok(())
    }
}

/// Resolves a descriptor string against `node`. A descriptor that does not
/// parse resolves to nothing.
pub fn resolve_node_descriptor<N: SyntaxNode>(node: &N, descriptor: &str) -> Option<N> {
    descriptor.parse::<NodeDescriptor>().ok()?.resolve(node)
}
