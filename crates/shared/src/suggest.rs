// Fuzzy name matching for autocomplete.
//
// Similarity is the Ratcliff/Obershelp ratio: twice the number of matched
// characters divided by the combined length, where matches are found by
// repeatedly taking the longest common block and recursing on both sides.

/// Returns the longest common block of `a[alo..ahi]` and `b[blo..bhi]` as
/// `(start_in_a, start_in_b, len)`, preferring the earliest block in `a`.
fn longest_block(a: &[char], b: &[char], alo: usize, ahi: usize, blo: usize, bhi: usize) -> (usize, usize, usize) {
    let width = bhi - blo;
    let mut best = (alo, blo, 0);
    let mut prev = vec![0usize; width + 1];

    for i in alo..ahi {
        let mut current = vec![0usize; width + 1];
        for j in blo..bhi {
            if a[i] == b[j] {
                let run = prev[j - blo] + 1;
                current[j - blo + 1] = run;
                if run > best.2 {
                    best = (i + 1 - run, j + 1 - run, run);
                }
            }
        }
        prev = current;
    }

    best
}

fn matched_chars(a: &[char], b: &[char]) -> usize {
    let mut total = 0;
    let mut pending = vec![(0, a.len(), 0, b.len())];

    while let Some((alo, ahi, blo, bhi)) = pending.pop() {
        if alo >= ahi || blo >= bhi {
            continue;
        }
        let (i, j, len) = longest_block(a, b, alo, ahi, blo, bhi);
        if len == 0 {
            continue;
        }
        total += len;
        pending.push((alo, i, blo, j));
        pending.push((i + len, ahi, j + len, bhi));
    }

    total
}

/// Similarity of two strings in `[0.0, 1.0]`. Two empty strings are identical.
pub fn similarity_ratio(a: &str, b: &str) -> f64 {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();
    let combined = a.len() + b.len();
    if combined == 0 {
        return 1.0;
    }
    2.0 * matched_chars(&a, &b) as f64 / combined as f64
}

/// Picks up to `limit` candidates whose similarity to `word` is at least
/// `cutoff`, best match first. Equal scores keep their input order.
///
/// The ratio is not symmetric; each candidate is scored as the first sequence.
pub fn close_matches<'a, I>(word: &str, candidates: I, limit: usize, cutoff: f64) -> Vec<&'a str>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut scored: Vec<(f64, &'a str)> = candidates
        .into_iter()
        .map(|candidate| (similarity_ratio(candidate, word), candidate))
        .filter(|(score, _)| *score >= cutoff)
        .collect();

    scored.sort_by(|a, b| b.0.partial_cmp(&a.0).unwrap_or(std::cmp::Ordering::Equal));
    scored.into_iter().take(limit).map(|(_, candidate)| candidate).collect()
}
