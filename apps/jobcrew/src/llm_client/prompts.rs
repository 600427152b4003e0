// Shared prompt fragments used when composing a stage call.
// Stage-specific templates live in tasks/prompts.rs.

/// System prompt template for every agent. Replace: {role}, {backstory}, {goal}
pub const AGENT_SYSTEM_TEMPLATE: &str = "You are {role}. {backstory}
Your personal goal is: {goal}

Answer in plain text. Be specific and complete; do not ask follow-up questions.";

/// Appended to every stage prompt. Replace: {expected_output}
pub const EXPECTED_OUTPUT_TEMPLATE: &str = "\n\nThis is the expected criteria for your final answer: \
{expected_output}
You MUST return the actual complete content as the final answer, not a summary.";

/// Prefix for the context block carried over from earlier stages.
pub const CONTEXT_HEADER: &str = "\n\nThis is the context you're working with (results of earlier steps):\n";

/// Prefix for evidence gathered by search and page-fetch tools.
pub const EVIDENCE_HEADER: &str = "\n\nWeb research gathered for this task (cite links where relevant):\n";

/// Fills `{name}` placeholders in a single left-to-right pass. Substituted
/// values are never rescanned, so a value containing `{other}` stays as is.
/// Braces that do not name a known placeholder are copied through.
pub fn fill_template(template: &str, values: &[(&str, &str)]) -> String {
    let extra: usize = values.iter().map(|(_, v)| v.len()).sum();
    let mut out = String::with_capacity(template.len() + extra);
    let mut rest = template;

    while let Some(open) = rest.find('{') {
        out.push_str(&rest[..open]);
        let after = &rest[open + 1..];
        let known = after.find('}').and_then(|close| {
            let name = &after[..close];
            values
                .iter()
                .find(|(key, _)| *key == name)
                .map(|(_, value)| (close, *value))
        });
        match known {
            Some((close, value)) => {
                out.push_str(value);
                rest = &after[close + 1..];
            }
            None => {
                out.push('{');
                rest = after;
            }
        }
    }
    out.push_str(rest);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fill_template_does_not_rescan_values() {
        let out = fill_template("{a} and {b}", &[("a", "{b}"), ("b", "B")]);
        assert_eq!(out, "{b} and B");
    }

    #[test]
    fn test_fill_template_keeps_unknown_braces() {
        let out = fill_template("{json: {x}} {missing", &[("x", "1")]);
        assert_eq!(out, "{json: 1} {missing");
    }

    #[test]
    fn test_separator_constants_start_with_blank_line() {
        for fragment in [EXPECTED_OUTPUT_TEMPLATE, CONTEXT_HEADER, EVIDENCE_HEADER] {
            assert!(fragment.starts_with("\n\n"), "{fragment:?}");
            assert!(!fragment.starts_with("\n\n\n"), "{fragment:?}");
        }
    }
}
