/// Unwrap a Markdown code fence around a model response, if there is one.
pub fn strip_code_fences(response: &str) -> String {
    let trimmed = response.trim();
    if !trimmed.starts_with("```") {
        return trimmed.to_string();
    }

    let mut lines: Vec<&str> = trimmed.lines().collect();
    // Drop the opening fence (```markdown) and the closing one if present
    lines.remove(0);
    if lines.last().is_some_and(|l| l.trim() == "```") {
        lines.pop();
    }
    lines.join("\n").trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_text_is_trimmed() {
        assert_eq!(strip_code_fences("  # Day 1\n"), "# Day 1");
    }

    #[test]
    fn fenced_markdown_is_unwrapped() {
        let raw = "```markdown\n# Day 1\nTemples\n```";
        assert_eq!(strip_code_fences(raw), "# Day 1\nTemples");
    }

    #[test]
    fn unterminated_fence_keeps_body() {
        assert_eq!(strip_code_fences("```\n# Day 1"), "# Day 1");
    }

    #[test]
    fn lone_fence_is_empty() {
        assert_eq!(strip_code_fences("```"), "");
    }
}
