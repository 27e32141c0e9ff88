use regex::Regex;
use std::collections::HashSet;

lazy_static::lazy_static! {
    /// `scheme://host.tld/`, anchored at the start of the URL.
    static ref ORIGIN_PATTERN: Regex =
        Regex::new(r"^https?://[^\s]+\.\w{2,}/").expect("origin pattern compiles");
}

/// Reduce a URL to its origin prefix, or `""` when it has none.
pub fn normalize_origin(url: &str) -> String {
    ORIGIN_PATTERN
        .find(url)
        .map(|m| m.as_str().to_string())
        .unwrap_or_default()
}

/// Distinct normalized origins in first-seen order.
///
/// URLs that do not normalize still contribute a single `""` entry.
pub fn unique_origins(candidates: &[String]) -> Vec<String> {
    let mut seen = HashSet::new();
    candidates
        .iter()
        .map(|url| normalize_origin(url))
        .filter(|origin| seen.insert(origin.clone()))
        .collect()
}

/// Length in characters of the longest run shared by `a` and `b`.
pub fn longest_common_substring(a: &str, b: &str) -> usize {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();
    if a.is_empty() || b.is_empty() {
        return 0;
    }

    let mut prev = vec![0usize; b.len() + 1];
    let mut curr = vec![0usize; b.len() + 1];
    let mut best = 0;

    for ca in &a {
        for (j, cb) in b.iter().enumerate() {
            curr[j + 1] = if ca == cb { prev[j] + 1 } else { 0 };
            best = best.max(curr[j + 1]);
        }
        std::mem::swap(&mut prev, &mut curr);
    }

    best
}

/// Score every distinct origin against the lowercased entity name.
pub fn score_candidates(name: &str, candidates: &[String]) -> Vec<(String, usize)> {
    let needle = name.to_lowercase();
    unique_origins(candidates)
        .into_iter()
        .map(|origin| {
            let score = longest_common_substring(&needle, &origin);
            (origin, score)
        })
        .collect()
}

/// Pick the origin sharing the longest run with `name`.
///
/// Ties go to the origin harvested first. An empty candidate list yields `""`.
pub fn select_best_url(name: &str, candidates: &[String]) -> String {
    let mut best: Option<(String, usize)> = None;

    for (origin, score) in score_candidates(name, candidates) {
        let better = match &best {
            Some((_, best_score)) => score > *best_score,
            None => true,
        };
        if better {
            best = Some((origin, score));
        }
    }

    best.map(|(origin, _)| origin).unwrap_or_default()
}
