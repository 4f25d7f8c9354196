//! Prompt builders for per-file review.
//!
//! Each changed hunk is shown with dual `OLD|NEW|CHANGED|TEXT` numbering so the
//! generator can reference exact lines on either side.

use crate::config::is_workflow_file;
use crate::map::numbered_content;
use crate::parser::Hunk;

/// System instruction sent with every review request.
pub const SYSTEM_PROMPT: &str = "You are an expert code reviewer with deep knowledge of software \
engineering principles, design patterns, and language-specific best practices. Analyze code to \
provide actionable, high-quality improvements that genuinely enhance the codebase. Focus on \
important issues rather than trivial style concerns.";

const CODE_FOCUS: &str = r#"
Focus on providing high-value feedback in these areas:

1. Code Quality and Best Practices:
   - SOLID principles violations
   - Design pattern application or misuse
   - Error handling and edge cases
   - Code duplication and reuse opportunities
   - Variable/function naming clarity

2. Performance Issues:
   - Algorithmic inefficiencies (time/space complexity)
   - Resource management (memory, connections, file handles)
   - Unnecessary computations or data structures
   - Database query optimizations

3. Security Concerns:
   - Input validation vulnerabilities
   - Authentication/authorization flaws
   - Data exposure risks
   - Dependency security issues
   - Secure coding practices

4. Maintainability:
   - Test coverage adequacy
   - Documentation completeness
   - Code organization and modularity
   - Future compatibility considerations

Prioritize actionable feedback that will meaningfully improve the codebase.
Limit feedback on trivial stylistic issues unless they significantly impact readability.
"#;

const WORKFLOW_FOCUS: &str = r#"
For GitHub Actions workflows, focus on:
- Security best practices (e.g., using SHA pinning for actions)
- Performance optimizations (caching, artifact handling)
- Potential race conditions or workflow design issues
- Unnecessary steps or job dependencies
- GitHub Actions specific suggestions
"#;

const RESPONSE_FORMAT: &str = r#"
Format your response as JSON:
[
  {
    "start_line": <number>,
    "end_line": <number>,
    "explanation": "<clear explanation with rationale>",
    "side": <"LEFT" or "RIGHT". LEFT for deleted lines (red), RIGHT for added lines (green) or unchanged context lines (white)>,
    "suggestion": "<suggested code (optional)>",
    "importance": <float between 0.0 and 1.0 indicating how important this suggestion is>,
    "issue_type": "<type of issue: 'bug', 'security', 'performance', 'readability', 'maintainability', 'design', 'testing'>",
    "confidence": <float between 0.0 and 1.0 indicating confidence in this suggestion>
  },
  ...
]

Provide a maximum of 5 high-quality comments, ordered by importance. Focus on substantive improvements rather than minor style issues unless specifically requested.

For the importance field, use these guidelines:
- 0.9-1.0: Critical issues (security vulnerabilities, serious bugs, data integrity problems)
- 0.7-0.9: Important issues (significant performance issues, potential bugs, maintainability concerns)
- 0.5-0.7: Moderate issues (code quality, design improvements)
- 0.0-0.5: Minor issues (style, readability, documentation)

Include the confidence level for each suggestion to indicate your certainty.

Ensure explanations are:
1. Precise and specific to the code
2. Include the reasoning behind your suggestion
3. Educational - explain the principle behind the improvement
4. Actionable - clear what needs to be changed

IMPORTANT: The "suggestion" field is used with the GitHub pull request suggestion feature.
It must contain ONLY the exact code that replaces the lines from start_line to end_line.
Do not put explanatory text, comments or descriptions in the suggestion field.
If you are not sure about the exact code, leave the suggestion empty and only provide an explanation.

CRITICAL: Keep the EXACT INDENTATION of the original code in suggestions.
Do not use placeholder values like <commit_sha> or <version> in suggestions; they cannot be applied.

IMPORTANT: The start_line and end_line fields MUST ONLY reference lines inside the patches above,
using the OLD number for LEFT comments and the NEW number for RIGHT comments.
"#;

/// Builds the user prompt for one file.
pub fn build_file_prompt(filename: &str, hunks: &[Hunk], content: &str) -> String {
    let mut s = String::new();
    s.push_str(&format!(
        "\nAnalyze the following code from {filename} and suggest specific improvements:\n"
    ));
    for (i, h) in hunks.iter().enumerate() {
        s.push_str(&format!(
            "\nPatch {} (old_start_line: {}, old_end_line: {}, new_start_line: {}, new_end_line: {}):\n```\n",
            i + 1,
            h.old_start_line(),
            h.old_end_line(),
            h.new_start_line(),
            h.new_end_line()
        ));
        s.push_str(&numbered_content(h));
        s.push_str("\n```\n");
    }

    s.push_str("\nEntire content of the file:\n```\n");
    s.push_str(content);
    s.push_str("\n```\n");

    s.push_str(if is_workflow_file(filename) {
        WORKFLOW_FOCUS
    } else {
        CODE_FOCUS
    });
    s.push_str(RESPONSE_FORMAT);
    s
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse_patch;

    #[test]
    fn prompt_lists_each_patch_with_bounds() {
        let hunks = parse_patch("@@ -1,2 +1,2 @@\n a\n-b\n+c\n@@ -10 +10,2 @@\n x\n+y");
        let p = build_file_prompt("src/lib.py", &hunks, "a\nc\n");
        assert!(p.contains("from src/lib.py"));
        assert!(p.contains(
            "Patch 1 (old_start_line: 1, old_end_line: 2, new_start_line: 1, new_end_line: 2):"
        ));
        assert!(p.contains(
            "Patch 2 (old_start_line: 10, old_end_line: 10, new_start_line: 10, new_end_line: 11):"
        ));
        assert!(p.contains("2|---|true|-b"));
        assert!(p.contains("---|11|true|+y"));
        assert!(p.contains("Code Quality and Best Practices"));
        assert!(p.ends_with(RESPONSE_FORMAT));
    }

    #[test]
    fn workflow_files_get_workflow_focus() {
        let hunks = parse_patch("@@ -1 +1 @@\n-a\n+b");
        let p = build_file_prompt(".github/workflows/ci.yml", &hunks, "b");
        assert!(p.contains("For GitHub Actions workflows"));
        assert!(!p.contains("SOLID principles"));
    }
}
