use std::fmt::Debug;

/// Renders a value's structure as text for diffing
///
/// Implementations must be deterministic and must not include identity
/// information such as addresses.
pub trait StructuralDump {
    fn dump<T: Debug + ?Sized>(&self, value: &T) -> String;
}

/// Pretty `Debug` output, one field or element per line.
///
/// Entries inside every `{ ... }` block are sorted, so hash maps and sets
/// dump the same way on every run. Struct fields come out alphabetically as
/// a side effect. Sequence and tuple order is kept.
#[derive(Debug, Clone, Copy, Default)]
pub struct PrettyDebug;

impl StructuralDump for PrettyDebug {
    fn dump<T: Debug + ?Sized>(&self, value: &T) -> String {
        let rendered = format!("{:#?}", value);
        let lines: Vec<&str> = rendered.lines().collect();

        let mut out = String::with_capacity(rendered.len() + 1);
        for line in sort_entries(&lines, false) {
            out.push_str(&line);
            out.push('\n');
        }
        out
    }
}

fn indent_of(line: &str) -> usize {
    line.len() - line.trim_start().len()
}

fn is_closer(line: &str) -> bool {
    matches!(line.trim_start().chars().next(), Some('}' | ']' | ')'))
}

/// End of the entry starting at `start`: its nested lines and its closing line
fn entry_end(lines: &[&str], start: usize) -> usize {
    let depth = indent_of(lines[start]);
    let mut end = start + 1;
    while end < lines.len() {
        let indent = indent_of(lines[end]);
        if indent > depth || (indent == depth && is_closer(lines[end])) {
            end += 1;
        } else {
            break;
        }
    }
    end
}

/// Split sibling entries, normalize each, and sort them when asked
fn sort_entries(lines: &[&str], sort: bool) -> Vec<String> {
    let mut entries = Vec::new();
    let mut start = 0;
    while start < lines.len() {
        let end = entry_end(lines, start);
        entries.push(normalize_entry(&lines[start..end]));
        start = end;
    }
    if sort {
        entries.sort();
    }
    entries.into_iter().flatten().collect()
}

fn normalize_entry(lines: &[&str]) -> Vec<String> {
    if lines.len() < 3 {
        return lines.iter().map(|line| line.to_string()).collect();
    }

    let head = lines[0];
    let last = lines.len() - 1;
    let sort = head.trim_end().ends_with('{');

    let mut out = Vec::with_capacity(lines.len());
    out.push(head.to_string());
    out.extend(sort_entries(&lines[1..last], sort));
    out.push(lines[last].to_string());
    out
}
