//! "Did you mean" suggestions for mistyped command names.

/// Command names close to `typed`, sorted and deduplicated.
///
/// A name is close when it starts with `typed` or is within an edit
/// distance that grows with the length of `typed`.
pub fn suggest<'a, I>(typed: &str, names: I) -> Vec<String>
where
    I: IntoIterator<Item = &'a str>,
{
    if typed.is_empty() {
        return Vec::new();
    }

    let threshold = (typed.chars().count() / 3).max(1);
    let mut matches: Vec<String> = names
        .into_iter()
        .filter(|name| name.starts_with(typed) || levenshtein_distance(typed, name) <= threshold)
        .map(str::to_string)
        .collect();

    matches.sort();
    matches.dedup();
    matches
}

fn levenshtein_distance(a: &str, b: &str) -> usize {
    if a == b {
        return 0;
    }
    if a.is_empty() {
        return b.chars().count();
    }
    if b.is_empty() {
        return a.chars().count();
    }

    let b_chars = b.chars().collect::<Vec<_>>();
    let mut previous = (0..=b_chars.len()).collect::<Vec<_>>();
    let mut current = vec![0; b_chars.len() + 1];

    for (i, left) in a.chars().enumerate() {
        current[0] = i + 1;
        for (j, right) in b_chars.iter().enumerate() {
            let substitution_cost = usize::from(left != *right);
            let deletion = previous[j + 1] + 1;
            let insertion = current[j] + 1;
            let substitution = previous[j] + substitution_cost;
            current[j + 1] = deletion.min(insertion).min(substitution);
        }
        previous.clone_from_slice(&current);
    }

    previous[b_chars.len()]
}
