// Plain-text corpus reader.
//
// One document per line, tokens separated by a single space, no escaping.

use std::fs;
use std::path::Path;

use tracing::debug;

use crate::error::{MixtureError, Result};

/// Read a corpus file into documents of raw tokens.
///
/// Empty tokens (from doubled spaces or blank lines) are dropped, so a blank
/// line becomes an empty document rather than a document holding "", and
/// doubled or trailing spaces never produce an empty-string word in the
/// vocabulary.
pub fn read_documents(path: &Path) -> Result<Vec<Vec<String>>> {
    let text = fs::read_to_string(path).map_err(|source| MixtureError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    let documents = parse_documents(&text);
    debug!(
        path = %path.display(),
        documents = documents.len(),
        "Read corpus file"
    );
    Ok(documents)
}

/// Split already-loaded text into documents. `str::lines` strips both `\n`
/// and `\r\n` terminators. Tokens are split on single spaces and empty
/// pieces are discarded, so `"a  b"` is `["a", "b"]`, not `["a", "", "b"]`.
pub fn parse_documents(text: &str) -> Vec<Vec<String>> {
    text.lines()
        .map(|line| {
            line.split(' ')
                .filter(|token| !token.is_empty())
                .map(str::to_string)
                .collect()
        })
        .collect()
}
