use crate::SourcePosition;
use std::path::Path;
use std::path::PathBuf;

/// The half-open range `[start_inclusive, end_exclusive)` of source text a
/// token or error covers, plus the file it came from when parsing a file.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct GraphQLSourceSpan {
    pub start_inclusive: SourcePosition,
    pub end_exclusive: SourcePosition,
    pub file_path: Option<PathBuf>,
}

impl GraphQLSourceSpan {
    pub fn new(start_inclusive: SourcePosition, end_exclusive: SourcePosition) -> Self {
        Self {
            start_inclusive,
            end_exclusive,
            file_path: None,
        }
    }

    pub fn empty_at(pos: SourcePosition) -> Self {
        Self::new(pos, pos)
    }

    pub fn in_file(mut self, file_path: Option<&Path>) -> Self {
        self.file_path = file_path.map(Path::to_path_buf);
        self
    }
}
