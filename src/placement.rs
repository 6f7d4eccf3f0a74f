//! Buffer placement policy
//!
//! Decides which line of a commit-message buffer receives the suggestion.
//! Template comment lines are skipped; the message goes on the first
//! non-comment line, which must be blank.

/// Edit the buffer needs before the suggestion can be shown
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mutation {
    /// Insert one empty line so that it becomes index `at`
    InsertBlankLine { at: usize },
}

/// Where the suggestion goes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Placement {
    /// Target line index, valid after `mutation` is applied
    pub target: usize,
    pub mutation: Option<Mutation>,
}

pub fn is_comment_line(line: &str, comment_char: char) -> bool {
    line.starts_with(comment_char)
}

/// Find the target line for a suggestion
pub fn find_target_line<S: AsRef<str>>(lines: &[S], comment_char: char) -> Placement {
    let first_message_line = lines
        .iter()
        .position(|line| !is_comment_line(line.as_ref(), comment_char));

    match first_message_line {
        // Empty or all comments: open a line at the very top
        None => Placement {
            target: 0,
            mutation: Some(Mutation::InsertBlankLine { at: 0 }),
        },
        Some(index) if lines[index].as_ref().trim().is_empty() => Placement {
            target: index,
            mutation: None,
        },
        Some(index) => Placement {
            target: index,
            mutation: Some(Mutation::InsertBlankLine { at: index }),
        },
    }
}

/// Whether any non-comment line has non-blank content
pub fn has_message_content<S: AsRef<str>>(lines: &[S], comment_char: char) -> bool {
    lines.iter().any(|line| {
        let line = line.as_ref();
        !is_comment_line(line, comment_char) && !line.trim().is_empty()
    })
}

#[cfg(test)]
#[path = "placement_tests.rs"]
mod placement_tests;
