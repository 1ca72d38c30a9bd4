use crate::GraphQLParseErrorKind;
use crate::GraphQLSourceSpan;

/// A parse error with location information.
///
/// Parsing halts at the first lexical or syntactic error, so a failed parse
/// produces exactly one of these and no partial AST.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("{}", self.format_oneline())]
pub struct GraphQLParseError {
    /// Human-readable primary error message.
    ///
    /// Examples: "expected `:`, found `String`", "unclosed `{`"
    message: String,

    /// The primary span where the error was detected.
    /// - For "unexpected token" errors: the unexpected token's span
    /// - For "unclosed delimiter" errors: the end of input
    span: GraphQLSourceSpan,

    /// Categorized error kind for programmatic handling.
    kind: GraphQLParseErrorKind,

    /// Additional notes (e.g. "opening `{` here at 3:5").
    notes: Vec<String>,
}

impl GraphQLParseError {
    pub fn new(
        message: impl Into<String>,
        span: GraphQLSourceSpan,
        kind: GraphQLParseErrorKind,
    ) -> Self {
        Self {
            message: message.into(),
            span,
            kind,
            notes: vec![],
        }
    }

    /// Returns the human-readable error message.
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Returns the primary span where the error was detected.
    pub fn span(&self) -> &GraphQLSourceSpan {
        &self.span
    }

    /// Returns the categorized error kind.
    pub fn kind(&self) -> &GraphQLParseErrorKind {
        &self.kind
    }

    pub fn notes(&self) -> &[String] {
        &self.notes
    }

    pub fn add_note(&mut self, note: impl Into<String>) {
        self.notes.push(note.into());
    }

    /// 1-based line of the offending token.
    pub fn line(&self) -> usize {
        self.span.start_inclusive.line() + 1
    }

    /// 1-based column of the offending token.
    pub fn column(&self) -> usize {
        self.span.start_inclusive.col() + 1
    }

    /// Formats this error as a single-line summary.
    ///
    /// ```text
    /// query.graphql:5:12: error: expected `:`, found `String`
    /// ```
    pub fn format_oneline(&self) -> String {
        format!(
            "{}:{}:{}: error: {}",
            self.file_name(),
            self.line(),
            self.column(),
            self.message,
        )
    }

    /// Formats this error as a multi-line diagnostic for CLI output.
    ///
    /// ```text
    /// error: expected `:`, found `"1"`
    ///   --> query.graphql:1:17
    ///    |
    ///  1 | query { user(id "1") }
    ///    |                 ^^^
    /// ```
    pub fn format_detailed(&self, source: Option<&str>) -> String {
        let mut output = format!("error: {}\n", self.message);
        output.push_str(&format!(
            "  --> {}:{}:{}\n",
            self.file_name(),
            self.line(),
            self.column(),
        ));

        if let Some(src) = source
            && let Some(line_content) = src.lines().nth(self.span.start_inclusive.line())
        {
            let display_line_num = self.line();
            let width = display_line_num.to_string().len().max(2);
            let col_start = self.span.start_inclusive.col();
            let underline_len =
                if self.span.end_exclusive.line() == self.span.start_inclusive.line()
                    && self.span.end_exclusive.col() > col_start {
                    self.span.end_exclusive.col() - col_start
                } else {
                    1
                };
            output.push_str(&format!("{:>width$} |\n", ""));
            output.push_str(&format!("{display_line_num:>width$} | {line_content}\n"));
            output.push_str(&format!(
                "{:>width$} | {}{}\n",
                "",
                " ".repeat(col_start),
                "^".repeat(underline_len),
            ));
        }

        for note in &self.notes {
            output.push_str(&format!("   = note: {note}\n"));
        }

        output
    }

    fn file_name(&self) -> String {
        self.span
            .file_path
            .as_ref()
            .map(|p| p.display().to_string())
            .unwrap_or_else(|| "<input>".to_string())
    }
}
