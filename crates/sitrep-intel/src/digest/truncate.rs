use super::parse::AUTHOR_HEADER;

const POST_END_MARKER: &str = "[View post](";

/// Keep the digest header plus the first `limit` posts, cutting only at
/// post boundaries.
///
/// A post ends on its `[View post](...)` line. Author sections with no such
/// line are dropped. `limit == 0`, or a digest without author sections, is
/// returned unchanged.
#[must_use]
pub fn truncate_digest(digest: &str, limit: usize) -> String {
    let lines: Vec<&str> = digest.lines().collect();
    let section_starts: Vec<usize> = lines
        .iter()
        .enumerate()
        .filter(|(_, line)| AUTHOR_HEADER.is_match(line))
        .map(|(i, _)| i)
        .collect();

    if limit == 0 || section_starts.is_empty() {
        return digest.to_owned();
    }

    let header = lines[..section_starts[0]].join("\n");
    let mut kept: Vec<String> = Vec::new();
    let mut total = 0usize;

    for (idx, &start) in section_starts.iter().enumerate() {
        if total >= limit {
            break;
        }
        let end = section_starts.get(idx + 1).copied().unwrap_or(lines.len());
        let (section, added) = truncate_section(&lines[start..end], limit - total);
        if added > 0 {
            kept.push(section);
            total += added;
        }
    }

    tracing::info!(posts = total, limit, "truncated digest");
    format!("{header}\n\n{}", kept.join("\n\n"))
}

/// Take at most `budget` posts from one author section.
fn truncate_section(section: &[&str], budget: usize) -> (String, usize) {
    let mut parts = vec![section[0].to_owned()];
    let mut from = 1usize;
    let mut added = 0usize;

    for (i, line) in section.iter().enumerate() {
        if added >= budget {
            break;
        }
        if !line.contains(POST_END_MARKER) {
            continue;
        }
        parts.push(section[from..=i].join("\n"));
        from = i + 1;
        added += 1;
    }

    (parts.join("\n"), added)
}
