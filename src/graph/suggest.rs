use super::Graph;

pub const DEFAULT_SUGGESTION_LIMIT: usize = 5;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Suggestion {
    pub id: String,
    pub label: String,
}

fn is_word_start(text: &str, position: usize) -> bool {
    match text[..position].chars().next_back() {
        None => true,
        Some(previous) => {
            previous.is_whitespace()
                || matches!(previous, '-' | '_' | '.')
                || previous.is_ascii_alphabetic()
        }
    }
}

fn matches_at_word(text: &str, query: &str) -> bool {
    text.match_indices(query)
        .any(|(position, _)| is_word_start(text, position))
}

/// Nodes whose label or id contains `query` at a word start, after a
/// separator, or inside a word. Exact matches are left out since they are
/// already what the user typed.
pub fn suggest_nodes(graph: &Graph, query: &str, limit: usize) -> Vec<Suggestion> {
    let query = query.trim().to_lowercase();
    if query.is_empty() {
        return Vec::new();
    }

    let mut candidates = graph
        .nodes
        .iter()
        .filter_map(|(id, node)| {
            let label = node.label.clone().unwrap_or_else(|| id.clone());
            let lower_label = label.to_lowercase();
            let lower_id = id.to_lowercase();

            if lower_label == query || lower_id == query {
                return None;
            }
            if !matches_at_word(&lower_label, &query) && !matches_at_word(&lower_id, &query) {
                return None;
            }

            let starts_with = lower_label.starts_with(&query) || lower_id.starts_with(&query);
            Some((starts_with, lower_label, Suggestion {
                id: id.clone(),
                label,
            }))
        })
        .collect::<Vec<_>>();

    candidates.sort_by(|a, b| b.0.cmp(&a.0).then_with(|| a.1.cmp(&b.1)));
    candidates.truncate(limit);
    candidates
        .into_iter()
        .map(|(_, _, suggestion)| suggestion)
        .collect()
}
