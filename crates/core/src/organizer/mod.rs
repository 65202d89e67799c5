//! Turns a document-ordered capture stream into symbols.
//!
//! One forward pass keeps a stack of open containers. A container is
//! finished once a later capture starts after it ends; `name` and field
//! captures attach to the innermost open container that can hold them.

pub mod container;
pub mod icons;
pub mod name;
pub mod pattern;

pub use container::{Container, ContainerKind};
pub use icons::icon_for_tag;
pub use name::{Name, NameCache, NameContext};
pub use pattern::PatternCache;

use crate::syntax::{Capture, CaptureKind, ScopeResolver, SyntaxNode};
use std::sync::Arc;
use tagscope_api::{Range, Symbol};

/// Organizes captures into symbols.
///
/// Holds no per-pass state, so one instance can serve any number of
/// concurrent passes. The pattern cache is shared with whoever owns the
/// query and clears it when the query changes.
#[derive(Debug, Clone)]
pub struct CaptureOrganizer {
    patterns: Arc<PatternCache>,
    include_references: bool,
}

impl CaptureOrganizer {
    pub fn new(patterns: Arc<PatternCache>) -> Self {
        Self {
            patterns,
            include_references: false,
        }
    }

    pub fn with_references(mut self, include_references: bool) -> Self {
        self.include_references = include_references;
        self
    }

    pub fn includes_references(&self) -> bool {
        self.include_references
    }

    pub fn patterns(&self) -> &Arc<PatternCache> {
        &self.patterns
    }

    /// Runs one pass and returns everything it found, valid or not.
    pub fn organize<N, I, R>(&self, captures: I, resolver: &mut R) -> Organized<N>
    where
        N: SyntaxNode,
        I: IntoIterator<Item = Capture<N>>,
        R: ScopeResolver<N> + ?Sized,
    {
        resolver.reset();
        let mut pass = Pass::new(&self.patterns);
        for capture in captures {
            if !resolver.store(&capture) {
                continue;
            }
            pass.feed(capture);
        }
        resolver.reset();
        pass.finish()
    }

    /// Runs one pass and returns the symbols in emission order: definitions,
    /// then references when enabled, then names no container claimed.
    pub fn process<N, I, R>(&self, captures: I, resolver: &mut R) -> Vec<Symbol>
    where
        N: SyntaxNode,
        I: IntoIterator<Item = Capture<N>>,
        R: ScopeResolver<N> + ?Sized,
    {
        self.organize(captures, resolver)
            .into_symbols(self.include_references)
    }
}

/// Result of one organize pass, in finishing order.
#[derive(Debug)]
pub struct Organized<N> {
    definitions: Vec<Container<N>>,
    references: Vec<Container<N>>,
    standalone: Vec<Name>,
}

impl<N: SyntaxNode> Organized<N> {
    pub fn definitions(&self) -> &[Container<N>] {
        &self.definitions
    }

    pub fn references(&self) -> &[Container<N>] {
        &self.references
    }

    pub fn standalone(&self) -> &[Name] {
        &self.standalone
    }

    pub fn into_symbols(self, include_references: bool) -> Vec<Symbol> {
        let references = if include_references {
            self.references
        } else {
            Vec::new()
        };
        self.definitions
            .iter()
            .chain(references.iter())
            .filter_map(Container::to_symbol)
            .chain(self.standalone.iter().map(Name::to_symbol))
            .collect()
    }
}

/// Mutable state of a single pass. Never outlives `organize`.
struct Pass<'p, N> {
    patterns: &'p PatternCache,
    names: NameCache,
    active: Vec<Container<N>>,
    organized: Organized<N>,
}

impl<'p, N: SyntaxNode> Pass<'p, N> {
    fn new(patterns: &'p PatternCache) -> Self {
        Self {
            patterns,
            names: NameCache::new(),
            active: Vec::new(),
            organized: Organized {
                definitions: Vec::new(),
                references: Vec::new(),
                standalone: Vec::new(),
            },
        }
    }

    fn feed(&mut self, capture: Capture<N>) {
        self.prune(&capture.range());

        match capture.kind() {
            CaptureKind::Definition => {
                self.active
                    .push(Container::new(ContainerKind::Definition, capture));
            }
            CaptureKind::Reference => {
                self.active
                    .push(Container::new(ContainerKind::Reference, capture));
            }
            CaptureKind::Name => {
                if let Some(unclaimed) = self.attach(capture) {
                    let mut ctx = NameContext {
                        patterns: self.patterns,
                        names: &mut self.names,
                    };
                    let name = Name::resolve(&unclaimed, &mut ctx);
                    self.organized.standalone.push(name);
                }
            }
            CaptureKind::Other => {
                if let Some(dropped) = self.attach(capture) {
                    tracing::debug!(
                        "Dropping capture {:?} at {}: no open container holds it",
                        dropped.name,
                        dropped.range().start
                    );
                }
            }
        }
    }

    /// Offers `capture` to open containers, innermost first. Gives it back
    /// when none takes it.
    fn attach(&mut self, mut capture: Capture<N>) -> Option<Capture<N>> {
        let mut ctx = NameContext {
            patterns: self.patterns,
            names: &mut self.names,
        };
        for container in self.active.iter_mut().rev() {
            if container.has_field(&capture.name) {
                tracing::debug!(
                    "{} at {} already has {:?}; trying the enclosing container",
                    container.tag(),
                    container.position(),
                    capture.name
                );
                continue;
            }
            match container.add(capture, &mut ctx) {
                Ok(()) => return None,
                Err(rejected) => capture = rejected,
            }
        }
        Some(capture)
    }

    /// Finishes every open container that ends before `range` starts,
    /// innermost first.
    fn prune(&mut self, range: &Range) {
        let mut index = self.active.len();
        while index > 0 {
            index -= 1;
            if self.active[index].ends_before(range) {
                let container = self.active.remove(index);
                self.complete(container);
            }
        }
    }

    fn complete(&mut self, container: Container<N>) {
        match container.kind() {
            ContainerKind::Definition => self.organized.definitions.push(container),
            ContainerKind::Reference => self.organized.references.push(container),
        }
    }

    /// Whatever is still open at end of stream finishes outermost first.
    fn finish(mut self) -> Organized<N> {
        for container in std::mem::take(&mut self.active) {
            self.complete(container);
        }
        self.organized
    }
}
