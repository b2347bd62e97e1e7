use std::cmp::Ordering;
use std::iter::Peekable;
use std::str::Chars;

/// Locale-style "natural" comparison of workspace names.
///
/// Letters compare case-insensitively and runs of ASCII digits compare by
/// numeric value, so `"2" < "10"` and `"a" == "A"` at the first pass.  Names
/// that are equal under those rules are ordered by their raw bytes, which
/// keeps the ordering total and deterministic.
pub fn natural_cmp(a: &str, b: &str) -> Ordering {
    let mut lhs = a.chars().peekable();
    let mut rhs = b.chars().peekable();

    loop {
        let ord = match (lhs.peek().copied(), rhs.peek().copied()) {
            (None, None) => break,
            (None, Some(_)) => return Ordering::Less,
            (Some(_), None) => return Ordering::Greater,
            (Some(x), Some(y)) if x.is_ascii_digit() && y.is_ascii_digit() => {
                compare_numbers(&take_digits(&mut lhs), &take_digits(&mut rhs))
            }
            (Some(x), Some(y)) => {
                lhs.next();
                rhs.next();
                x.to_lowercase().cmp(y.to_lowercase())
            }
        };
        if ord != Ordering::Equal {
            return ord;
        }
    }

    a.cmp(b)
}

fn take_digits(chars: &mut Peekable<Chars<'_>>) -> String {
    let mut digits = String::new();
    while let Some(c) = chars.next_if(char::is_ascii_digit) {
        digits.push(c);
    }
    digits
}

/// Compare two digit strings by value without parsing, so arbitrarily long
/// runs never overflow.
fn compare_numbers(a: &str, b: &str) -> Ordering {
    let a = a.trim_start_matches('0');
    let b = b.trim_start_matches('0');
    a.len().cmp(&b.len()).then_with(|| a.cmp(b))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sorted(names: &[&str]) -> Vec<String> {
        let mut v: Vec<String> = names.iter().map(|s| s.to_string()).collect();
        v.sort_by(|a, b| natural_cmp(a, b));
        v
    }

    #[test]
    fn numbers_before_letters_case_insensitive() {
        assert_eq!(sorted(&["b", "A", "10", "2"]), vec!["2", "10", "A", "b"]);
    }

    #[test]
    fn embedded_numbers_compare_by_value() {
        assert_eq!(sorted(&["web10", "web9", "Web1"]), vec!["Web1", "web9", "web10"]);
    }

    #[test]
    fn equal_under_folding_is_still_total() {
        assert_eq!(natural_cmp("a", "A"), "a".cmp("A"));
        assert_eq!(natural_cmp("01", "1"), "01".cmp("1"));
        assert_eq!(natural_cmp("x", "x"), Ordering::Equal);
    }

    #[test]
    fn long_digit_runs_do_not_overflow() {
        assert_eq!(
            natural_cmp("123456789012345678901234567890", "99"),
            Ordering::Greater
        );
    }

    #[test]
    fn prefix_sorts_first() {
        assert_eq!(natural_cmp("dev", "dev2"), Ordering::Less);
    }
}
