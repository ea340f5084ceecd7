//! TypeScript parser using Tree-sitter.

use std::path::Path;

use coreguard_core::{NodeId, NodeKind, ParseError, SourceParser, Span, SyntaxTree};
use tracing::debug;
use tree_sitter::{Language, Node, Parser};

/// Parses `.ts`/`.js` family files with the TypeScript grammar and
/// `.tsx`/`.jsx` files with the TSX grammar.
pub struct TypeScriptParser {
    typescript: Language,
    tsx: Language,
}

impl TypeScriptParser {
    /// Creates a new TypeScript parser.
    #[must_use]
    pub fn new() -> Self {
        Self {
            typescript: tree_sitter_typescript::LANGUAGE_TYPESCRIPT.into(),
            tsx: tree_sitter_typescript::LANGUAGE_TSX.into(),
        }
    }

    fn language_for(&self, path: &Path) -> Result<&Language, ParseError> {
        match path.extension().and_then(|e| e.to_str()) {
            Some("tsx" | "jsx") => Ok(&self.tsx),
            Some(ext) if self.extensions().contains(&ext) => Ok(&self.typescript),
            _ => Err(ParseError::Unsupported(path.to_path_buf())),
        }
    }
}

impl Default for TypeScriptParser {
    fn default() -> Self {
        Self::new()
    }
}

impl SourceParser for TypeScriptParser {
    fn language_id(&self) -> &'static str {
        "typescript"
    }

    fn extensions(&self) -> &'static [&'static str] {
        &["ts", "tsx", "mts", "cts", "js", "jsx", "mjs", "cjs"]
    }

    fn parse(&self, path: &Path, source: &str) -> Result<SyntaxTree, ParseError> {
        let mut parser = Parser::new();
        parser
            .set_language(self.language_for(path)?)
            .map_err(|e| ParseError::Language(e.to_string()))?;

        let tree = parser.parse(source, None).ok_or(ParseError::Aborted)?;
        let root = tree.root_node();
        if root.has_error() {
            debug!("{} has syntax errors; lowering partial tree", path.display());
        }

        Ok(lower(root, source.as_bytes()))
    }
}

/// Maps a grammar node kind onto the kind the rule engine dispatches on.
#[must_use]
pub fn lower_kind(grammar_kind: &str) -> NodeKind {
    match grammar_kind {
        "program" => NodeKind::Program,
        "function_declaration" | "generator_function_declaration" => {
            NodeKind::FunctionDeclaration
        }
        "function_expression" | "function" | "generator_function" => NodeKind::FunctionExpression,
        "arrow_function" => NodeKind::ArrowFunction,
        "method_definition" => NodeKind::MethodDefinition,
        "class_declaration" | "abstract_class_declaration" | "class" => NodeKind::Class,
        "class_body" => NodeKind::ClassBody,
        "public_field_definition" | "field_definition" => NodeKind::ClassField,
        "variable_declarator" => NodeKind::VariableDeclarator,
        "expression_statement" => NodeKind::ExpressionStatement,
        "new_expression" => NodeKind::NewExpression,
        "call_expression" => NodeKind::CallExpression,
        "member_expression" => NodeKind::MemberExpression,
        "identifier" | "property_identifier" => NodeKind::Identifier,
        _ => NodeKind::Other,
    }
}

fn span_of(node: Node<'_>) -> Span {
    let start = node.start_position();
    Span::new(
        node.start_byte(),
        node.end_byte(),
        start.row + 1,
        start.column + 1,
    )
}

/// Copies the named nodes under `root` into an arena, in pre-order.
///
/// Anonymous tokens are dropped. Field names are carried over so handlers can
/// address children by role.
fn lower(root: Node<'_>, src: &[u8]) -> SyntaxTree {
    let mut builder = SyntaxTree::builder(span_of(root));
    let mut parents = vec![NodeId::ROOT];
    let mut cursor = root.walk();

    if !cursor.goto_first_child() {
        return builder.build();
    }

    loop {
        let node = cursor.node();
        if node.is_named() {
            let parent = parents.last().copied().unwrap_or(NodeId::ROOT);
            let kind = lower_kind(node.kind());
            let id = builder.push(parent, kind, node.kind(), cursor.field_name(), span_of(node));
            if kind == NodeKind::Identifier {
                if let Ok(text) = node.utf8_text(src) {
                    builder.set_text(id, text);
                }
            }
            if cursor.goto_first_child() {
                parents.push(id);
                continue;
            }
        }

        loop {
            if cursor.goto_next_sibling() {
                break;
            }
            if !cursor.goto_parent() || parents.len() <= 1 {
                return builder.build();
            }
            parents.pop();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use coreguard_core::{classify, retaining_holder, NodeRef, ScopeClassification};

    fn parse(path: &str, src: &str) -> SyntaxTree {
        TypeScriptParser::new()
            .parse(Path::new(path), src)
            .expect("parse failed")
    }

    fn first(tree: &SyntaxTree, kind: NodeKind) -> NodeRef<'_> {
        tree.iter()
            .find(|n| n.kind() == kind)
            .expect("node not found")
    }

    #[test]
    fn lowers_program_root() {
        let tree = parse("a.ts", "const x = 1;\n");
        assert_eq!(tree.root().kind(), NodeKind::Program);
        assert_eq!(tree.root().grammar_kind(), "program");
    }

    #[test]
    fn new_expression_keeps_constructor_field() {
        let tree = parse("a.ts", "const cache = new Map();\n");
        let new_expr = first(&tree, NodeKind::NewExpression);
        let ctor = new_expr.child_by_field("constructor").unwrap();
        assert!(ctor.is_identifier("Map"));
        assert_eq!((new_expr.span().line, new_expr.span().column), (1, 15));
    }

    #[test]
    fn member_call_fields() {
        let tree = parse("a.ts", "function f() {\n  return Date.now();\n}\n");
        let call = first(&tree, NodeKind::CallExpression);
        let callee = call.child_by_field("function").unwrap();
        assert_eq!(callee.kind(), NodeKind::MemberExpression);
        assert!(callee.child_by_field("object").unwrap().is_identifier("Date"));
        assert!(callee.child_by_field("property").unwrap().is_identifier("now"));
        assert_eq!(call.span().line, 2);
        assert_eq!(classify(call), ScopeClassification::Local);
    }

    #[test]
    fn class_field_is_member_scope() {
        let tree = parse(
            "a.ts",
            "class Store {\n  private cache = new Map<string, number>();\n}\n",
        );
        let new_expr = first(&tree, NodeKind::NewExpression);
        assert_eq!(classify(new_expr), ScopeClassification::Member);
        let holder = retaining_holder(new_expr).unwrap();
        assert_eq!(holder.kind(), NodeKind::ClassField);
        assert_eq!(holder.grammar_kind(), "public_field_definition");
    }

    #[test]
    fn arrow_and_method_bodies_are_local() {
        let tree = parse(
            "a.ts",
            "const f = () => new Map();\nclass A { m() { return new Map(); } }\n",
        );
        let news: Vec<_> = tree
            .iter()
            .filter(|n| n.kind() == NodeKind::NewExpression)
            .map(classify)
            .collect();
        assert_eq!(
            news,
            vec![ScopeClassification::Local, ScopeClassification::Local]
        );
    }

    #[test]
    fn bare_statement_is_top_level() {
        let tree = parse("a.ts", "new Map();\n");
        let new_expr = first(&tree, NodeKind::NewExpression);
        assert_eq!(classify(new_expr), ScopeClassification::TopLevel);
        assert!(retaining_holder(new_expr).is_none());
    }

    #[test]
    fn tsx_files_use_tsx_grammar() {
        let tree = parse("view.tsx", "const el = <div>{Date.now()}</div>;\n");
        assert_eq!(tree.count(NodeKind::CallExpression), 1);
    }

    #[test]
    fn parent_links_are_consistent() {
        let tree = parse(
            "a.ts",
            "export class A {\n  x = 1;\n  run() { const m = new Map(); return m; }\n}\n",
        );
        for node in tree.iter() {
            for child in node.children() {
                assert_eq!(child.parent().map(NodeRef::id), Some(node.id()));
            }
        }
    }

    #[test]
    fn unsupported_extension_is_rejected() {
        let err = TypeScriptParser::new()
            .parse(Path::new("a.py"), "x = 1\n")
            .unwrap_err();
        assert!(matches!(err, ParseError::Unsupported(_)));
    }

    #[test]
    fn handles_known_extensions() {
        let parser = TypeScriptParser::new();
        assert!(parser.handles(Path::new("src/a.ts")));
        assert!(parser.handles(Path::new("src/a.mjs")));
        assert!(!parser.handles(Path::new("src/a.rs")));
    }

    #[test]
    fn lower_kind_maps_holders() {
        assert_eq!(lower_kind("field_definition"), NodeKind::ClassField);
        assert_eq!(lower_kind("variable_declarator"), NodeKind::VariableDeclarator);
        assert_eq!(lower_kind("lexical_declaration"), NodeKind::Other);
    }
}
