use std::fmt;

/// A 1-based line/column position attached to AST nodes.
///
/// Produced from a [`SourcePosition`](crate::SourcePosition) via
/// [`SourcePosition::to_ast_pos()`](crate::SourcePosition::to_ast_pos).
#[derive(Clone, Copy, Debug, Default, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct AstPos {
    pub line: usize,
    pub column: usize,
}

impl AstPos {
    pub fn new(line: usize, column: usize) -> Self {
        Self { line, column }
    }
}

impl fmt::Display for AstPos {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}
