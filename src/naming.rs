//! Centralized filename ordering and label derivation.
//!
//! Images are laid out in the order a human would read their filenames:
//! embedded digit runs compare by numeric value, everything else byte-wise.
//! So `img2.png` sorts before `img10.png`, and `page-9.png` before
//! `page-10.png`, where a plain lexicographic sort would interleave them.
//!
//! Labels (the caption text under each cell) are the filename with the
//! extension stripped, unchanged otherwise.

use std::cmp::Ordering;
use std::path::Path;

/// Compare two filenames in natural (human) order.
///
/// Digit runs are compared by numeric value; non-digit bytes compare as
/// usual. Runs that differ only in zero-padding (`2` vs `002`) compare equal
/// numerically, so the padding difference is remembered and used as a final
/// tie-break — shorter run first — which keeps the ordering total.
///
/// ```
/// # use proofsheet::naming::natural_cmp;
/// # use std::cmp::Ordering;
/// assert_eq!(natural_cmp("img2.png", "img10.png"), Ordering::Less);
/// assert_eq!(natural_cmp("img1.png", "img2.png"), Ordering::Less);
/// assert_eq!(natural_cmp("a.png", "b.png"), Ordering::Less);
/// ```
pub fn natural_cmp(a: &str, b: &str) -> Ordering {
    let ab = a.as_bytes();
    let bb = b.as_bytes();
    let mut i = 0;
    let mut j = 0;
    // First zero-padding difference seen between numerically-equal runs.
    let mut padding_tiebreak = Ordering::Equal;

    while i < ab.len() && j < bb.len() {
        let ca = ab[i];
        let cb = bb[j];

        if ca.is_ascii_digit() && cb.is_ascii_digit() {
            let (run_a, next_i) = digit_run(ab, i);
            let (run_b, next_j) = digit_run(bb, j);

            match cmp_digit_runs(run_a, run_b) {
                Ordering::Equal => {
                    if padding_tiebreak == Ordering::Equal {
                        padding_tiebreak = run_a.len().cmp(&run_b.len());
                    }
                }
                ord => return ord,
            }
            i = next_i;
            j = next_j;
        } else {
            match ca.cmp(&cb) {
                Ordering::Equal => {
                    i += 1;
                    j += 1;
                }
                ord => return ord,
            }
        }
    }

    match (ab.len() - i).cmp(&(bb.len() - j)) {
        Ordering::Equal => padding_tiebreak,
        ord => ord,
    }
}

/// Extract the digit run starting at `start`; returns the run and the index
/// just past it.
fn digit_run(bytes: &[u8], start: usize) -> (&[u8], usize) {
    let mut end = start;
    while end < bytes.len() && bytes[end].is_ascii_digit() {
        end += 1;
    }
    (&bytes[start..end], end)
}

/// Compare two digit runs by numeric value without parsing into an integer,
/// so arbitrarily long runs cannot overflow.
fn cmp_digit_runs(a: &[u8], b: &[u8]) -> Ordering {
    let a = strip_leading_zeros(a);
    let b = strip_leading_zeros(b);
    // More significant digits means a larger value; equal lengths compare
    // digit-by-digit.
    a.len().cmp(&b.len()).then_with(|| a.cmp(b))
}

fn strip_leading_zeros(digits: &[u8]) -> &[u8] {
    match digits.iter().position(|&d| d != b'0') {
        Some(idx) => &digits[idx..],
        None => &digits[digits.len()..], // all zeros: value 0, empty slice
    }
}

/// Caption label for an image path: the filename with its extension stripped.
///
/// ```
/// # use proofsheet::naming::label_for;
/// # use std::path::Path;
/// assert_eq!(label_for(Path::new("shots/032-dusk.png")), "032-dusk");
/// assert_eq!(label_for(Path::new("plain")), "plain");
/// ```
pub fn label_for(path: &Path) -> String {
    path.file_stem()
        .or_else(|| path.file_name())
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sorted(mut names: Vec<&str>) -> Vec<&str> {
        names.sort_by(|a, b| natural_cmp(a, b));
        names
    }

    #[test]
    fn numeric_runs_compare_by_value() {
        assert_eq!(
            sorted(vec!["img2.png", "img10.png", "img1.png"]),
            vec!["img1.png", "img2.png", "img10.png"]
        );
    }

    #[test]
    fn plain_names_compare_bytewise() {
        assert_eq!(
            sorted(vec!["cherry.png", "apple.png", "banana.png"]),
            vec!["apple.png", "banana.png", "cherry.png"]
        );
    }

    #[test]
    fn earlier_runs_dominate_later_ones() {
        assert_eq!(
            sorted(vec!["a10b2.png", "a2b10.png"]),
            vec!["a2b10.png", "a10b2.png"]
        );
    }

    #[test]
    fn zero_padding_breaks_ties_shorter_first() {
        assert_eq!(natural_cmp("img002.png", "img2.png"), Ordering::Greater);
        assert_eq!(natural_cmp("img2.png", "img002.png"), Ordering::Less);
        // the value still dominates over padding
        assert_eq!(natural_cmp("img002.png", "img3.png"), Ordering::Less);
    }

    #[test]
    fn identical_names_are_equal() {
        assert_eq!(natural_cmp("same.png", "same.png"), Ordering::Equal);
    }

    #[test]
    fn prefix_sorts_first() {
        assert_eq!(natural_cmp("img.png", "img2.png"), Ordering::Less);
        assert_eq!(natural_cmp("img1.png", "img1a.png"), Ordering::Less);
    }

    #[test]
    fn long_runs_do_not_overflow() {
        let a = format!("x{}.png", "9".repeat(40));
        let b = format!("x{}.png", "1".repeat(41));
        assert_eq!(natural_cmp(&a, &b), Ordering::Less);
    }

    #[test]
    fn all_zero_run_is_value_zero() {
        assert_eq!(natural_cmp("a000b.png", "a0b.png"), Ordering::Greater);
        assert_eq!(natural_cmp("a00.png", "a1.png"), Ordering::Less);
    }

    #[test]
    fn label_strips_extension() {
        assert_eq!(label_for(Path::new("a2-p1/081.png")), "081");
        assert_eq!(label_for(Path::new("dusk.jpeg")), "dusk");
    }

    #[test]
    fn label_keeps_inner_dots() {
        assert_eq!(label_for(Path::new("v1.2-shot.png")), "v1.2-shot");
    }

    #[test]
    fn label_without_extension_is_whole_name() {
        assert_eq!(label_for(Path::new("noext")), "noext");
    }
}
