//! Lexical scope classification.

use crate::syntax::{NodeKind, NodeRef};

/// Where a node lives relative to enclosing functions and classes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScopeClassification {
    /// Inside a function, arrow function, or method body.
    Local,
    /// Held by a class field or a variable declarator outside any function.
    Member,
    /// Directly under the program root.
    TopLevel,
}

/// Classifies the lexical container of `node`.
///
/// The first function-shaped ancestor wins and yields
/// [`ScopeClassification::Local`]. Otherwise any class field or variable
/// declarator on the way to the root yields [`ScopeClassification::Member`],
/// and a clean walk to the root yields [`ScopeClassification::TopLevel`].
/// The root itself is `TopLevel`.
#[must_use]
pub fn classify(node: NodeRef<'_>) -> ScopeClassification {
    let mut held = false;
    for ancestor in node.ancestors() {
        let kind = ancestor.kind();
        if kind.is_function() {
            return ScopeClassification::Local;
        }
        if kind.is_binding_holder() {
            held = true;
        }
    }
    if held {
        ScopeClassification::Member
    } else {
        ScopeClassification::TopLevel
    }
}

/// Finds the nearest ancestor that retains `node` beyond a single call.
///
/// That is a class field, or a variable declarator that is not itself inside
/// a function. Returns `None` when the walk reaches the root first, as it
/// does for a bare top-level expression statement.
#[must_use]
pub fn retaining_holder(node: NodeRef<'_>) -> Option<NodeRef<'_>> {
    node.ancestors().find(|a| match a.kind() {
        NodeKind::ClassField => true,
        NodeKind::VariableDeclarator => classify(*a) != ScopeClassification::Local,
        _ => false,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::syntax::{NodeId, Span, SyntaxTree, SyntaxTreeBuilder};

    fn span() -> Span {
        Span::new(0, 1, 1, 1)
    }

    fn chain(b: &mut SyntaxTreeBuilder, kinds: &[NodeKind]) -> NodeId {
        let mut parent = NodeId::ROOT;
        for kind in kinds {
            parent = b.push(parent, *kind, "test", None, span());
        }
        parent
    }

    fn classify_chain(kinds: &[NodeKind]) -> ScopeClassification {
        let mut b = SyntaxTree::builder(span());
        let leaf = chain(&mut b, kinds);
        let tree = b.build();
        classify(tree.get(leaf).unwrap())
    }

    #[test]
    fn root_is_top_level() {
        let tree = SyntaxTree::builder(span()).build();
        assert_eq!(classify(tree.root()), ScopeClassification::TopLevel);
    }

    #[test]
    fn expression_statement_is_top_level() {
        assert_eq!(
            classify_chain(&[NodeKind::ExpressionStatement, NodeKind::NewExpression]),
            ScopeClassification::TopLevel
        );
    }

    #[test]
    fn class_field_is_member() {
        assert_eq!(
            classify_chain(&[
                NodeKind::Class,
                NodeKind::ClassBody,
                NodeKind::ClassField,
                NodeKind::NewExpression,
            ]),
            ScopeClassification::Member
        );
    }

    #[test]
    fn module_declarator_is_member() {
        assert_eq!(
            classify_chain(&[
                NodeKind::Other,
                NodeKind::VariableDeclarator,
                NodeKind::NewExpression
            ]),
            ScopeClassification::Member
        );
    }

    #[test]
    fn function_body_is_local() {
        assert_eq!(
            classify_chain(&[
                NodeKind::FunctionDeclaration,
                NodeKind::Other,
                NodeKind::VariableDeclarator,
                NodeKind::NewExpression,
            ]),
            ScopeClassification::Local
        );
    }

    #[test]
    fn nearest_function_wins_over_outer_field() {
        // class A { handler = () => { new Map() } }
        assert_eq!(
            classify_chain(&[
                NodeKind::Class,
                NodeKind::ClassBody,
                NodeKind::ClassField,
                NodeKind::ArrowFunction,
                NodeKind::NewExpression,
            ]),
            ScopeClassification::Local
        );
    }

    #[test]
    fn retaining_holder_skips_function_local_declarator() {
        let mut b = SyntaxTree::builder(span());
        let outer = chain(&mut b, &[NodeKind::Other, NodeKind::VariableDeclarator]);
        let leaf = {
            let f = b.push(outer, NodeKind::ArrowFunction, "arrow_function", None, span());
            let d = b.push(f, NodeKind::VariableDeclarator, "variable_declarator", None, span());
            b.push(d, NodeKind::NewExpression, "new_expression", None, span())
        };
        let tree = b.build();
        let holder = retaining_holder(tree.get(leaf).unwrap()).unwrap();
        assert_eq!(holder.id(), outer);
    }

    #[test]
    fn retaining_holder_none_for_bare_statement() {
        let mut b = SyntaxTree::builder(span());
        let leaf = chain(&mut b, &[NodeKind::ExpressionStatement, NodeKind::NewExpression]);
        let tree = b.build();
        assert!(retaining_holder(tree.get(leaf).unwrap()).is_none());
    }
}
