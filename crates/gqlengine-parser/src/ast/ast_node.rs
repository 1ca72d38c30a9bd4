/// Trait implemented by all AST node types. Provides source
/// reconstruction methods.
///
/// All AST node types implement this trait via
/// `#[inherent] impl AstNode`, giving each node both inherent
/// methods (no trait import needed) and a trait bound for generic
/// utilities.
///
/// Output is synthetic: names, values, keywords and punctuation are
/// emitted with standard single-space formatting. It is semantically
/// equivalent to the parsed input, and printing a re-parsed printout
/// yields the same text again.
pub trait AstNode {
    /// Append this node's source representation to `sink`.
    fn append_source(&self, sink: &mut String);

    /// Return this node as a source string.
    fn to_source_string(&self) -> String {
        let mut s = String::new();
        self.append_source(&mut s);
        s
    }
}

/// Appends each item of `items` separated by `separator`.
pub(crate) fn append_joined<T: AstNode>(
    items: &[T],
    separator: &str,
    sink: &mut String,
) {
    for (idx, item) in items.iter().enumerate() {
        if idx > 0 {
            sink.push_str(separator);
        }
        item.append_source(sink);
    }
}

/// Appends a GraphQL string literal with the minimal set of escapes.
pub(crate) fn append_string_literal(value: &str, sink: &mut String) {
    sink.push('"');
    for ch in value.chars() {
        match ch {
            '"' => sink.push_str("\\\""),
            '\\' => sink.push_str("\\\\"),
            '\n' => sink.push_str("\\n"),
            '\r' => sink.push_str("\\r"),
            '\t' => sink.push_str("\\t"),
            '\u{8}' => sink.push_str("\\b"),
            '\u{c}' => sink.push_str("\\f"),
            ch if (ch as u32) < 0x20 => {
                sink.push_str(&format!("\\u{:04X}", ch as u32));
            },
            ch => sink.push(ch),
        }
    }
    sink.push('"');
}
