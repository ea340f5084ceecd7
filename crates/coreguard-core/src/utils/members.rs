//! Callee shape helpers.

use crate::rule::VisitFault;
use crate::syntax::{NodeKind, NodeRef};

/// Splits the callee of a call expression into `(object, property)`.
///
/// Returns `Ok(None)` when the callee is not a non-computed member access on
/// a plain identifier (`a.b.c()`, `obj[k]()`, `foo()`).
///
/// # Errors
///
/// Returns [`VisitFault::UnexpectedShape`] when `call` has no callee, or the
/// callee is a member access missing its object or property.
///
/// # Example
///
/// ```ignore
/// // For `Date.now()`
/// assert_eq!(member_call(call)?, Some(("Date", "now")));
/// ```
pub fn member_call(call: NodeRef<'_>) -> Result<Option<(&str, &str)>, VisitFault> {
    let callee = call
        .child_by_field("function")
        .ok_or_else(|| VisitFault::shape(call, "call without callee"))?;
    if callee.kind() != NodeKind::MemberExpression {
        return Ok(None);
    }

    let object = callee
        .child_by_field("object")
        .ok_or_else(|| VisitFault::shape(callee, "member access without object"))?;
    let property = callee
        .child_by_field("property")
        .ok_or_else(|| VisitFault::shape(callee, "member access without property"))?;

    if object.kind() != NodeKind::Identifier || property.kind() != NodeKind::Identifier {
        return Ok(None);
    }
    Ok(object.text().zip(property.text()))
}

/// Returns the constructor name of `new Name(...)`.
///
/// Returns `Ok(None)` for non-identifier constructors (`new ns.Map()`,
/// `new (factory())()`).
///
/// # Errors
///
/// Returns [`VisitFault::UnexpectedShape`] when the expression has no
/// constructor.
pub fn new_callee_name(new_expr: NodeRef<'_>) -> Result<Option<&str>, VisitFault> {
    let ctor = new_expr
        .child_by_field("constructor")
        .ok_or_else(|| VisitFault::shape(new_expr, "new expression without constructor"))?;
    if ctor.kind() != NodeKind::Identifier {
        return Ok(None);
    }
    Ok(ctor.text())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::syntax::{NodeId, Span, SyntaxTree};

    fn span() -> Span {
        Span::new(0, 1, 1, 1)
    }

    fn call_tree(object: &str, property: &str) -> (SyntaxTree, NodeId) {
        let mut b = SyntaxTree::builder(span());
        let call = b.push(NodeId::ROOT, NodeKind::CallExpression, "call_expression", None, span());
        let member = b.push(
            call,
            NodeKind::MemberExpression,
            "member_expression",
            Some("function"),
            span(),
        );
        let obj = b.push(member, NodeKind::Identifier, "identifier", Some("object"), span());
        b.set_text(obj, object);
        let prop = b.push(
            member,
            NodeKind::Identifier,
            "property_identifier",
            Some("property"),
            span(),
        );
        b.set_text(prop, property);
        (b.build(), call)
    }

    #[test]
    fn splits_member_callee() {
        let (tree, call) = call_tree("Date", "now");
        let node = tree.get(call).unwrap();
        assert_eq!(member_call(node).unwrap(), Some(("Date", "now")));
    }

    #[test]
    fn plain_callee_is_none() {
        let mut b = SyntaxTree::builder(span());
        let call = b.push(NodeId::ROOT, NodeKind::CallExpression, "call_expression", None, span());
        let f = b.push(call, NodeKind::Identifier, "identifier", Some("function"), span());
        b.set_text(f, "now");
        let tree = b.build();
        assert_eq!(member_call(tree.get(call).unwrap()).unwrap(), None);
    }

    #[test]
    fn missing_callee_is_a_fault() {
        let mut b = SyntaxTree::builder(span());
        let call = b.push(NodeId::ROOT, NodeKind::CallExpression, "call_expression", None, span());
        let tree = b.build();
        assert!(matches!(
            member_call(tree.get(call).unwrap()),
            Err(VisitFault::UnexpectedShape { .. })
        ));
    }

    #[test]
    fn new_callee_identifier() {
        let mut b = SyntaxTree::builder(span());
        let new_expr = b.push(NodeId::ROOT, NodeKind::NewExpression, "new_expression", None, span());
        let ctor = b.push(new_expr, NodeKind::Identifier, "identifier", Some("constructor"), span());
        b.set_text(ctor, "Map");
        let tree = b.build();
        assert_eq!(new_callee_name(tree.get(new_expr).unwrap()).unwrap(), Some("Map"));
    }
}
