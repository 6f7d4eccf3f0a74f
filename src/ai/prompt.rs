//! Prompt template for commit message generation

/// Diffs beyond this many bytes are cut before being sent to the AI CLI
pub const MAX_DIFF_BYTES: usize = 100_000;

const TRUNCATION_MARKER: &str = "\n[diff truncated]\n";

/// Build the instruction prompt for a staged diff
///
/// The AI CLI receives this on stdin. It asks for a single conventional
/// commit message and nothing else.
pub fn build_prompt(patch: &str) -> String {
    let diff = truncate_diff(patch, MAX_DIFF_BYTES);

    let mut prompt = String::with_capacity(diff.len() + 512);
    prompt.push_str("Generate a git commit message for the following staged changes.\n\n");
    prompt.push_str("Rules:\n");
    prompt.push_str("- Use the Conventional Commits format: <type>(<optional scope>): <subject>\n");
    prompt.push_str("- Keep the subject line under 50 characters\n");
    prompt.push_str("- Write the subject in the imperative mood (\"add\", not \"added\")\n");
    prompt.push_str("- Add a body after one blank line only if the change needs explaining\n");
    prompt.push_str(
        "- Respond with the commit message only: no commentary, no Markdown, no code fences\n\n",
    );
    prompt.push_str("Diff:\n");
    prompt.push_str(&diff);
    if !diff.ends_with('\n') {
        prompt.push('\n');
    }
    prompt
}

/// Cut `patch` to at most `max_bytes`, on a char boundary, with a marker
pub fn truncate_diff(patch: &str, max_bytes: usize) -> String {
    if patch.len() <= max_bytes {
        return patch.to_string();
    }

    let mut end = max_bytes;
    while !patch.is_char_boundary(end) {
        end -= 1;
    }

    let mut truncated = patch[..end].to_string();
    truncated.push_str(TRUNCATION_MARKER);
    truncated
}

#[cfg(test)]
#[path = "prompt_tests.rs"]
mod prompt_tests;
