//! Dotted field paths and their ordering

use std::cmp::Ordering;

/// Join a prefix and a key without leaving stray dots
pub fn join(prefix: &str, key: &str) -> String {
    match (prefix.is_empty(), key.is_empty()) {
        (true, _) => key.to_string(),
        (_, true) => prefix.to_string(),
        _ => format!("{}.{}", prefix, key),
    }
}

/// Digit width for the indices of a sequence of `len` elements (at least 2)
pub fn index_width(len: usize) -> usize {
    let digits = len.saturating_sub(1).to_string().len();
    digits.max(2)
}

/// Zero-padded index segment, so lexicographic order follows numeric order
pub fn index_segment(index: usize, width: usize) -> String {
    format!("{:0width$}", index, width = width)
}

/// Whether `key` is the header itself or lives under it
pub fn matches_header(key: &str, header: &str) -> bool {
    match key.strip_prefix(header) {
        Some("") => true,
        Some(rest) => rest.starts_with('.'),
        None => false,
    }
}

/// Integer segments sort before other segments, numerically.
///
/// Integers are compared by their digits, so indices of any width order
/// correctly. Ranking them ahead of text keeps the order total.
fn compare_segment_values(a: &str, b: &str) -> Ordering {
    match (as_digits(a), as_digits(b)) {
        (Some(da), Some(db)) => da.len().cmp(&db.len()).then_with(|| da.cmp(db)),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => a.cmp(b),
    }
}

// Digits of a non-negative integer segment without leading zeros
fn as_digits(segment: &str) -> Option<&str> {
    if segment.is_empty() || !segment.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    let trimmed = segment.trim_start_matches('0');
    Some(if trimmed.is_empty() { "0" } else { trimmed })
}

// "2" and "02" compare equal by value; text breaks the tie.
fn compare_segments(a: &str, b: &str) -> Ordering {
    compare_segment_values(a, b).then_with(|| a.cmp(b))
}

/// Numeric-aware total order over whole paths, segment by segment
pub fn compare_paths(a: &str, b: &str) -> Ordering {
    let mut lhs = a.split('.');
    let mut rhs = b.split('.');
    loop {
        match (lhs.next(), rhs.next()) {
            (Some(x), Some(y)) => match compare_segments(x, y) {
                Ordering::Equal => continue,
                other => return other,
            },
            (None, Some(_)) => return Ordering::Less,
            (Some(_), None) => return Ordering::Greater,
            (None, None) => return Ordering::Equal,
        }
    }
}

/// Order of keys grouped under one header.
///
/// The header itself comes first. Otherwise the first segment after the
/// header is compared numerically when it is an integer, and whatever follows
/// it is compared as text.
pub fn compare_in_group(header: &str, a: &str, b: &str) -> Ordering {
    match (a == header, b == header) {
        (true, true) => return Ordering::Equal,
        (true, false) => return Ordering::Less,
        (false, true) => return Ordering::Greater,
        (false, false) => {}
    }

    let suffix = |key: &'_ str| -> (String, Option<String>) {
        let rest = if header.is_empty() {
            key
        } else {
            key.strip_prefix(header)
                .and_then(|r| r.strip_prefix('.'))
                .unwrap_or(key)
        };
        match rest.split_once('.') {
            Some((first, tail)) => (first.to_string(), Some(tail.to_string())),
            None => (rest.to_string(), None),
        }
    };

    let (first_a, tail_a) = suffix(a);
    let (first_b, tail_b) = suffix(b);

    compare_segment_values(&first_a, &first_b)
        .then_with(|| tail_a.cmp(&tail_b))
        .then_with(|| first_a.cmp(&first_b))
}
