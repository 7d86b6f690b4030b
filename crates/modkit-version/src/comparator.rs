//! Version comparison utilities

use std::cmp::Ordering;

/// Comparator for comparing raw version strings.
///
/// Version bodies are compared by alternating runs: maximal non-digit runs
/// compare lexicographically by byte, maximal digit runs compare
/// numerically. A missing run sorts before any present one, so `1.0` is
/// less than `1.0.5`. An optional leading `epoch:` (decimal epoch) takes
/// precedence over the body.
pub struct Comparator;

impl Comparator {
    /// Check if version1 > version2
    pub fn greater_than(version1: &str, version2: &str) -> bool {
        Self::compare(version1, version2) == Ordering::Greater
    }

    /// Check if version1 < version2
    pub fn less_than(version1: &str, version2: &str) -> bool {
        Self::compare(version1, version2) == Ordering::Less
    }

    /// Check if version1 == version2
    pub fn equal_to(version1: &str, version2: &str) -> bool {
        Self::compare(version1, version2) == Ordering::Equal
    }

    /// Compare two full version strings, epochs included.
    pub fn compare(version1: &str, version2: &str) -> Ordering {
        let (epoch1, body1) = split_epoch(version1);
        let (epoch2, body2) = split_epoch(version2);

        compare_numeric(epoch1.as_bytes(), epoch2.as_bytes())
            .then_with(|| compare_bodies(body1, body2))
    }
}

/// Split `epoch:body` into its parts; no epoch means `"0"`.
fn split_epoch(version: &str) -> (&str, &str) {
    match version.split_once(':') {
        Some((epoch, body)) if !epoch.is_empty() && epoch.bytes().all(|b| b.is_ascii_digit()) => {
            (epoch, body)
        }
        _ => ("0", version),
    }
}

/// Compare two version bodies chunk by chunk.
pub(crate) fn compare_bodies(body1: &str, body2: &str) -> Ordering {
    let mut a = body1.as_bytes();
    let mut b = body2.as_bytes();

    loop {
        if a.is_empty() && b.is_empty() {
            return Ordering::Equal;
        }

        let a_text = a.iter().position(|c| c.is_ascii_digit()).unwrap_or(a.len());
        let b_text = b.iter().position(|c| c.is_ascii_digit()).unwrap_or(b.len());
        match a[..a_text].cmp(&b[..b_text]) {
            Ordering::Equal => {}
            other => return other,
        }
        a = &a[a_text..];
        b = &b[b_text..];

        let a_num = a.iter().position(|c| !c.is_ascii_digit()).unwrap_or(a.len());
        let b_num = b.iter().position(|c| !c.is_ascii_digit()).unwrap_or(b.len());
        match compare_numeric(&a[..a_num], &b[..b_num]) {
            Ordering::Equal => {}
            other => return other,
        }
        a = &a[a_num..];
        b = &b[b_num..];
    }
}

/// Compare two digit runs numerically without parsing them into integers:
/// leading zeros are stripped, then longer means larger, then byte order.
/// An empty run counts as zero.
fn compare_numeric(a: &[u8], b: &[u8]) -> Ordering {
    let a = trim_leading_zeros(a);
    let b = trim_leading_zeros(b);
    a.len().cmp(&b.len()).then_with(|| a.cmp(b))
}

pub(crate) fn trim_leading_zeros(digits: &[u8]) -> &[u8] {
    let start = digits.iter().position(|&b| b != b'0').unwrap_or(digits.len());
    &digits[start..]
}

/// The body as its `(text run, digit run)` pairs, digit runs stripped of
/// leading zeros. Two bodies are comparison-equal exactly when their chunk
/// sequences are equal (trimming makes a zero run and an absent run the
/// same), which is what `ModVersion` bases `Eq` and `Hash` on.
pub(crate) fn body_chunks(body: &str) -> Vec<(String, String)> {
    let mut chunks = Vec::new();
    let mut rest = body.as_bytes();

    while !rest.is_empty() {
        let text_len = rest.iter().position(|c| c.is_ascii_digit()).unwrap_or(rest.len());
        let text = String::from_utf8_lossy(&rest[..text_len]).into_owned();
        rest = &rest[text_len..];

        let num_len = rest.iter().position(|c| !c.is_ascii_digit()).unwrap_or(rest.len());
        let digits = String::from_utf8_lossy(trim_leading_zeros(&rest[..num_len])).into_owned();
        rest = &rest[num_len..];

        chunks.push((text, digits));
    }

    chunks
}
