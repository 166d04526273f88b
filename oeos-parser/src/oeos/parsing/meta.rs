//! Meta block
//!
//!     A script may open with a block fenced by `---` lines. The only key read from it is `init`,
//!     whose value is the code run before the first page:
//!
//!         ---
//!         init: |
//!           score = 0
//!         ---
//!
//!     The value is either inline (`init: "x = 1"`) or, after `|`, the indented lines below the
//!     key with their common indentation removed. Other keys are skipped, and an empty init counts
//!     as none. The closing fence must start at column 0, so indented `---` lines belong to the
//!     init code.

use super::context::{join_literal, indent_width};
use crate::oeos::error::{ParseError, ParseErrorKind};
use crate::oeos::literal;

const FENCE: &str = "---";
const INIT_KEY: &str = "init:";

/// The init code and the index of the first line after the meta block.
pub(super) fn split_meta(lines: &[&str]) -> Result<(Option<String>, usize), ParseError> {
    let Some(open) = lines.iter().position(|l| !l.trim().is_empty()) else {
        return Ok((None, 0));
    };
    if lines[open].trim() != FENCE {
        return Ok((None, 0));
    }
    let close = lines[open + 1..]
        .iter()
        .position(|l| l.trim_end() == FENCE)
        .map(|offset| open + 1 + offset)
        .ok_or_else(|| {
            ParseError::new(open + 1, lines[open].trim_end(), ParseErrorKind::UnterminatedMeta)
        })?;
    Ok((read_init(&lines[open + 1..close]), close + 1))
}

fn read_init(meta: &[&str]) -> Option<String> {
    let start = meta
        .iter()
        .position(|l| l.trim_start().starts_with(INIT_KEY))?;
    let key_indent = indent_width(meta[start]);
    let inline = meta[start].trim_start()[INIT_KEY.len()..].trim();

    let init = if !inline.is_empty() && !inline.starts_with('|') {
        let value = literal::decode(inline);
        value
            .as_str()
            .map(str::to_string)
            .unwrap_or_else(|| inline.to_string())
    } else {
        let body: Vec<&str> = meta[start + 1..]
            .iter()
            .take_while(|l| l.trim().is_empty() || indent_width(l) > key_indent)
            .copied()
            .collect();
        join_literal(&body)
    };
    (!init.trim().is_empty()).then_some(init)
}
