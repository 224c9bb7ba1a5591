use serde_json::Value;

/// Flatten a Jira rich-text field to plain text.
///
/// API v2 returns wiki markup as a bare string; v3 returns Atlassian Document
/// Format. Block nodes are joined with newlines, inline nodes concatenated.
pub fn to_plain_text(value: &Value) -> Option<String> {
    let text = match value {
        Value::Null => return None,
        Value::String(s) => s.clone(),
        other => {
            let mut out = String::new();
            render(other, &mut out);
            out.trim_end().to_string()
        }
    };
    if text.is_empty() {
        None
    } else {
        Some(text)
    }
}

fn render(value: &Value, out: &mut String) {
    match value {
        Value::Array(nodes) => nodes.iter().for_each(|n| render(n, out)),
        Value::Object(obj) => {
            let kind = obj.get("type").and_then(Value::as_str).unwrap_or_default();
            match kind {
                "text" => {
                    if let Some(text) = obj.get("text").and_then(Value::as_str) {
                        out.push_str(text);
                    }
                }
                "hardBreak" => out.push('\n'),
                _ => {
                    if let Some(content) = obj.get("content") {
                        render(content, out);
                    }
                    if is_block(kind) && !out.ends_with('\n') {
                        out.push('\n');
                    }
                }
            }
        }
        _ => {}
    }
}

fn is_block(kind: &str) -> bool {
    matches!(
        kind,
        "paragraph" | "heading" | "codeBlock" | "blockquote" | "listItem" | "rule"
    )
}
