use tree_sitter::{Language, Node, Parser, Tree};

pub fn java_language() -> Language {
    tree_sitter_java::LANGUAGE.into()
}

pub fn parse_java(source: &str) -> Tree {
    let mut parser = Parser::new();
    parser.set_language(&java_language()).unwrap();
    parser.parse(source, None).unwrap()
}

/// First node, in pre-order, with the given kind and text.
pub fn find_node<'t>(tree: &'t Tree, kind: &str, text: &str, source: &str) -> Node<'t> {
    let mut stack = vec![tree.root_node()];
    while let Some(node) = stack.pop() {
        if node.kind() == kind && &source[node.byte_range()] == text {
            return node;
        }
        let mut cursor = node.walk();
        let children: Vec<_> = node.children(&mut cursor).collect();
        stack.extend(children.into_iter().rev());
    }
    panic!("no {} node with text {:?}", kind, text);
}
