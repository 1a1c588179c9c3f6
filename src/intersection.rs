use std::collections::HashSet;

/// Materialize a postings set as a sequence sorted by document ID.
pub fn sorted_postings(postings: &HashSet<String>) -> Vec<&str> {
    let mut ids: Vec<&str> = postings.iter().map(String::as_str).collect();
    ids.sort_unstable();
    ids
}

/// Intersection of two sorted arrays
pub fn intersection<'a>(a: &[&'a str], b: &[&'a str]) -> Vec<&'a str> {
    let mut result = Vec::with_capacity(a.len().min(b.len()));
    let mut i = 0;
    let mut j = 0;

    while i < a.len() && j < b.len() {
        if a[i] < b[j] {
            i += 1;
        } else if a[i] > b[j] {
            j += 1;
        } else {
            result.push(a[i]);
            i += 1;
            j += 1;
        }
    }

    result
}

/// Intersect every postings set, returning the shared IDs in ascending order.
///
/// No sets yields no IDs. Stops as soon as the running result is empty.
pub fn intersect_all<'a, I>(sets: I) -> Vec<&'a str>
where
    I: IntoIterator<Item = &'a HashSet<String>>,
{
    let mut result: Option<Vec<&'a str>> = None;

    for set in sets {
        let ids = sorted_postings(set);
        let next = match result {
            None => ids,
            Some(r) => intersection(&r, &ids),
        };
        if next.is_empty() {
            return Vec::new();
        }
        result = Some(next);
    }

    result.unwrap_or_default()
}
