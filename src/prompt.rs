// src/prompt.rs

pub const DIFF_PLACEHOLDER: &str = "{{diff}}";

pub const DEFAULT_PROMPT_TEMPLATE: &str = r#"Given the git changes below, please draft a concise commit message that accurately summarizes the modifications. Follow these guidelines:

  1. Limit your commit message to 150 words.
  2. follow conventional commits
  3. message format should be: <type>[scope]: <description>

examples:
  - fix(authentication): add password regex pattern
  - feat(storage): add new test cases

Git Changes:

{{diff}}"#;

/// Substitute the diff into the template, wrapped in a fenced block.
///
/// `{{diff}}` is the only supported variable. A template without the
/// placeholder is used as-is, silently dropping the diff.
pub fn render(template: &str, diff: &str) -> String {
    let fenced = format!("```\n{}\n```", diff);
    template.replacen(DIFF_PLACEHOLDER, &fenced, 1)
}
