use gqlengine::LocatedError;
use std::path::Path;

pub(crate) const GREEN_CHECK: &str = "\u{2705}";
pub(crate) const RED_X: &str = "\u{274c}";

/// Renders one error as `file:line:column: message`, with the response path
/// appended when the error has one.
pub(crate) fn format_located_error(file: &Path, err: &LocatedError) -> String {
    let position = err
        .locations
        .first()
        .map(|loc| format!(":{}:{}", loc.line, loc.column))
        .unwrap_or_default();
    let path = if err.path.is_empty() {
        String::new()
    } else {
        format!(" (at `{}`)", err.path_string())
    };
    format!("{}{position}: {}{path}", file.display(), err.message)
}
