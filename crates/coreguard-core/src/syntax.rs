//! Index-addressed syntax tree.
//!
//! Nodes live in a flat arena owned by [`SyntaxTree`]. Each node records the
//! [`NodeId`] of its parent, so upward walks are index-following loops rather
//! than pointer chasing. Nodes are stored in pre-order: iterating ids in
//! ascending order visits every parent before its children.

use std::fmt;

/// Index of a node inside a [`SyntaxTree`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NodeId(u32);

impl NodeId {
    /// The program root. Always the first node of a tree.
    pub const ROOT: Self = Self(0);

    /// Returns the arena index of this node.
    #[must_use]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// Node kinds the rule engine distinguishes.
///
/// Grammar kinds that no rule or the scope resolver cares about are lowered
/// to [`NodeKind::Other`]; the original grammar name is kept on the node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeKind {
    /// Root of a source file.
    Program,
    /// `function foo() {}`
    FunctionDeclaration,
    /// `const f = function () {}`
    FunctionExpression,
    /// `() => {}`
    ArrowFunction,
    /// `class A { method() {} }`
    MethodDefinition,
    /// Class declaration or class expression.
    Class,
    /// The `{ ... }` body of a class.
    ClassBody,
    /// Class field / class property declaration: `class A { cache = x; }`
    ClassField,
    /// `name = init` inside a `const`/`let`/`var` declaration.
    VariableDeclarator,
    /// A bare expression used as a statement.
    ExpressionStatement,
    /// `new Ctor(...)`
    NewExpression,
    /// `callee(...)`
    CallExpression,
    /// Non-computed member access: `object.property`
    MemberExpression,
    /// Identifier or property name.
    Identifier,
    /// Any other grammar node.
    Other,
}

impl NodeKind {
    /// Function-shaped nodes open a new local scope.
    #[must_use]
    pub fn is_function(self) -> bool {
        matches!(
            self,
            Self::FunctionDeclaration
                | Self::FunctionExpression
                | Self::ArrowFunction
                | Self::MethodDefinition
        )
    }

    /// Nodes that bind a value to a name that outlives the expression.
    #[must_use]
    pub fn is_binding_holder(self) -> bool {
        matches!(self, Self::ClassField | Self::VariableDeclarator)
    }

    /// Returns a kebab-case name for diagnostics.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Program => "program",
            Self::FunctionDeclaration => "function-declaration",
            Self::FunctionExpression => "function-expression",
            Self::ArrowFunction => "arrow-function",
            Self::MethodDefinition => "method-definition",
            Self::Class => "class",
            Self::ClassBody => "class-body",
            Self::ClassField => "class-field",
            Self::VariableDeclarator => "variable-declarator",
            Self::ExpressionStatement => "expression-statement",
            Self::NewExpression => "new-expression",
            Self::CallExpression => "call-expression",
            Self::MemberExpression => "member-expression",
            Self::Identifier => "identifier",
            Self::Other => "other",
        }
    }
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Source range of a node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Span {
    /// Byte offset of the first byte.
    pub start_byte: usize,
    /// Byte offset one past the last byte.
    pub end_byte: usize,
    /// Line number (1-indexed).
    pub line: usize,
    /// Column number (1-indexed, in bytes).
    pub column: usize,
}

impl Span {
    /// Creates a span.
    #[must_use]
    pub fn new(start_byte: usize, end_byte: usize, line: usize, column: usize) -> Self {
        Self {
            start_byte,
            end_byte,
            line,
            column,
        }
    }

    /// Length of the span in bytes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.end_byte.saturating_sub(self.start_byte)
    }

    /// Returns true for zero-width spans.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// A node stored in the arena.
#[derive(Debug, Clone)]
pub struct SyntaxNode {
    /// Engine-level kind.
    pub kind: NodeKind,
    /// Grammar kind reported by the parser (e.g. `public_field_definition`).
    pub grammar_kind: &'static str,
    /// Parent node, `None` only for the root.
    pub parent: Option<NodeId>,
    /// Field name this node occupies in its parent, if any.
    pub field: Option<&'static str>,
    /// Children in source order.
    pub children: Vec<NodeId>,
    /// Source text for leaf nodes such as identifiers.
    pub text: Option<Box<str>>,
    /// Source range.
    pub span: Span,
}

/// A parsed source file as a flat arena of nodes.
#[derive(Debug, Clone)]
pub struct SyntaxTree {
    nodes: Vec<SyntaxNode>,
}

impl SyntaxTree {
    /// Returns a builder whose root node spans `span`.
    #[must_use]
    pub fn builder(span: Span) -> SyntaxTreeBuilder {
        SyntaxTreeBuilder::new(span)
    }

    /// Returns the program root.
    #[must_use]
    pub fn root(&self) -> NodeRef<'_> {
        NodeRef {
            tree: self,
            id: NodeId::ROOT,
        }
    }

    /// Number of nodes in the arena.
    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Returns true if the arena holds only the root.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.len() <= 1
    }

    /// Looks up a node by id.
    #[must_use]
    pub fn get(&self, id: NodeId) -> Option<NodeRef<'_>> {
        (id.index() < self.nodes.len()).then_some(NodeRef { tree: self, id })
    }

    /// Iterates all nodes in pre-order.
    pub fn iter(&self) -> impl Iterator<Item = NodeRef<'_>> + '_ {
        (0..self.nodes.len()).map(move |i| NodeRef {
            tree: self,
            id: NodeId(i as u32),
        })
    }

    /// Counts nodes of the given kind.
    #[must_use]
    pub fn count(&self, kind: NodeKind) -> usize {
        self.nodes.iter().filter(|n| n.kind == kind).count()
    }

    fn raw(&self, id: NodeId) -> &SyntaxNode {
        &self.nodes[id.index()]
    }
}

/// Builds a [`SyntaxTree`] in pre-order.
///
/// Every pushed node must name an already-pushed parent, which keeps ids in
/// pre-order as long as the caller pushes depth-first.
#[derive(Debug)]
pub struct SyntaxTreeBuilder {
    nodes: Vec<SyntaxNode>,
}

impl SyntaxTreeBuilder {
    /// Creates a builder containing only the program root.
    #[must_use]
    pub fn new(span: Span) -> Self {
        Self {
            nodes: vec![SyntaxNode {
                kind: NodeKind::Program,
                grammar_kind: "program",
                parent: None,
                field: None,
                children: Vec::new(),
                text: None,
                span,
            }],
        }
    }

    /// Appends a child of `parent` and returns its id.
    pub fn push(
        &mut self,
        parent: NodeId,
        kind: NodeKind,
        grammar_kind: &'static str,
        field: Option<&'static str>,
        span: Span,
    ) -> NodeId {
        let id = NodeId(self.nodes.len() as u32);
        debug_assert!(parent.index() < self.nodes.len(), "parent must precede child");
        if let Some(p) = self.nodes.get_mut(parent.index()) {
            p.children.push(id);
        }
        self.nodes.push(SyntaxNode {
            kind,
            grammar_kind,
            parent: Some(parent),
            field,
            children: Vec::new(),
            text: None,
            span,
        });
        id
    }

    /// Attaches source text to a node.
    pub fn set_text(&mut self, id: NodeId, text: impl Into<Box<str>>) {
        if let Some(node) = self.nodes.get_mut(id.index()) {
            node.text = Some(text.into());
        }
    }

    /// Finishes the tree.
    #[must_use]
    pub fn build(self) -> SyntaxTree {
        SyntaxTree { nodes: self.nodes }
    }
}

/// A borrowed handle to one node of a tree.
#[derive(Clone, Copy)]
pub struct NodeRef<'t> {
    tree: &'t SyntaxTree,
    id: NodeId,
}

impl<'t> NodeRef<'t> {
    /// Node id.
    #[must_use]
    pub fn id(self) -> NodeId {
        self.id
    }

    /// Engine-level kind.
    #[must_use]
    pub fn kind(self) -> NodeKind {
        self.tree.raw(self.id).kind
    }

    /// Grammar kind reported by the parser.
    #[must_use]
    pub fn grammar_kind(self) -> &'static str {
        self.tree.raw(self.id).grammar_kind
    }

    /// Field name in the parent.
    #[must_use]
    pub fn field(self) -> Option<&'static str> {
        self.tree.raw(self.id).field
    }

    /// Source range.
    #[must_use]
    pub fn span(self) -> Span {
        self.tree.raw(self.id).span
    }

    /// Source text, for leaf nodes that carry it.
    #[must_use]
    pub fn text(self) -> Option<&'t str> {
        self.tree.raw(self.id).text.as_deref()
    }

    /// Parent node.
    #[must_use]
    pub fn parent(self) -> Option<NodeRef<'t>> {
        self.tree
            .raw(self.id)
            .parent
            .map(|id| NodeRef { tree: self.tree, id })
    }

    /// Children in source order.
    pub fn children(self) -> impl Iterator<Item = NodeRef<'t>> {
        let tree = self.tree;
        tree.raw(self.id)
            .children
            .iter()
            .map(move |&id| NodeRef { tree, id })
    }

    /// First child occupying the given grammar field.
    #[must_use]
    pub fn child_by_field(self, field: &str) -> Option<NodeRef<'t>> {
        self.children().find(|c| c.field() == Some(field))
    }

    /// Walks from the parent up to the root.
    #[must_use]
    pub fn ancestors(self) -> Ancestors<'t> {
        Ancestors {
            tree: self.tree,
            next: self.tree.raw(self.id).parent,
            remaining: self.tree.len(),
        }
    }

    /// Returns true if this is an identifier with exactly this text.
    #[must_use]
    pub fn is_identifier(self, name: &str) -> bool {
        self.kind() == NodeKind::Identifier && self.text() == Some(name)
    }
}

impl fmt::Debug for NodeRef<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NodeRef")
            .field("id", &self.id)
            .field("kind", &self.kind())
            .field("grammar_kind", &self.grammar_kind())
            .finish()
    }
}

/// Iterator over a node's ancestors, nearest first.
///
/// Bounded by the arena size, so a malformed parent chain cannot loop.
pub struct Ancestors<'t> {
    tree: &'t SyntaxTree,
    next: Option<NodeId>,
    remaining: usize,
}

impl<'t> Iterator for Ancestors<'t> {
    type Item = NodeRef<'t>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        let id = self.next?;
        let node = self.tree.get(id)?;
        self.remaining -= 1;
        self.next = self.tree.raw(id).parent;
        Some(node)
    }
}
