//! Checked `SITEFRONT_*` choice values and nearest-match typo hints

use std::io::Write;

/// Largest edit distance still offered as a "did you mean" hint
const MAX_HINT_DISTANCE: usize = 2;

/// Closest candidate within [`MAX_HINT_DISTANCE`] edits of `input`, ignoring ASCII case.
///
/// An exact match yields `None`: there is nothing to correct.
pub fn nearest_match<'c>(input: &str, candidates: &[&'c str]) -> Option<&'c str> {
    let input = input.trim().to_ascii_lowercase();
    candidates
        .iter()
        .map(|&candidate| (edit_distance(&input, candidate), candidate))
        .filter(|&(distance, _)| (1..=MAX_HINT_DISTANCE).contains(&distance))
        .min_by_key(|&(distance, _)| distance)
        .map(|(_, candidate)| candidate)
}

/// Insertions, deletions and substitutions needed to turn `a` into `b`
fn edit_distance(a: &str, b: &str) -> usize {
    let target: Vec<char> = b.chars().collect();
    let mut row: Vec<usize> = (0..=target.len()).collect();

    for (i, from) in a.chars().enumerate() {
        let mut diagonal = row[0];
        row[0] = i + 1;
        for (j, &to) in target.iter().enumerate() {
            let above = row[j + 1];
            row[j + 1] = (above + 1)
                .min(row[j] + 1)
                .min(diagonal + usize::from(from != to));
            diagonal = above;
        }
    }

    row[target.len()]
}

/// A `SITEFRONT_*` variable restricted to a fixed set of values
pub struct EnvChoice<'a> {
    var: &'a str,
    allowed: &'a [&'a str],
}

impl<'a> EnvChoice<'a> {
    pub fn new(var: &'a str, allowed: &'a [&'a str]) -> Self {
        Self { var, allowed }
    }

    /// Parse `raw`; an unrecognised value keeps `current` and writes a warning to `out`
    pub fn resolve<T>(
        &self,
        raw: &str,
        parse: impl Fn(&str) -> Option<T>,
        current: T,
        out: &mut impl Write,
    ) -> T {
        if let Some(value) = parse(raw) {
            return value;
        }

        let hint = nearest_match(raw, self.allowed)
            .map(|m| format!(". Did you mean '{m}'?"))
            .unwrap_or_default();
        let _ = writeln!(out, "Warning: Invalid {} value '{raw}'{hint}", self.var);
        let _ = writeln!(out, "Valid values: {}", self.allowed.join(", "));
        current
    }
}
