//! Unified diffs of tidied documents
//!
//! Line-based, three lines of context, hunk ranges written the way
//! `diff -u` writes them.

/// Context lines around each change
pub const CONTEXT: usize = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Tag {
    Keep,
    Remove,
    Add,
}

impl Tag {
    fn sign(self) -> char {
        match self {
            Tag::Keep => ' ',
            Tag::Remove => '-',
            Tag::Add => '+',
        }
    }

    fn in_old(self) -> bool {
        self != Tag::Add
    }

    fn in_new(self) -> bool {
        self != Tag::Remove
    }
}

#[derive(Debug, Clone, Copy)]
struct Line<'a> {
    tag: Tag,
    text: &'a str,
}

/// Unified diff of `original` against `formatted`, with `a/` and `b/`
/// headers naming `name`. Empty when the texts are equal.
pub fn unified_diff(original: &str, formatted: &str, name: &str) -> String {
    let old: Vec<&str> = original.split_inclusive('\n').collect();
    let new: Vec<&str> = formatted.split_inclusive('\n').collect();
    let script = edit_script(&old, &new);

    let changes: Vec<usize> = script
        .iter()
        .enumerate()
        .filter(|(_, line)| line.tag != Tag::Keep)
        .map(|(index, _)| index)
        .collect();
    let Some(&first) = changes.first() else {
        return String::new();
    };

    // Old and new line numbers at each script position
    let mut old_at = Vec::with_capacity(script.len() + 1);
    let mut new_at = Vec::with_capacity(script.len() + 1);
    let (mut old_line, mut new_line) = (0, 0);
    for line in &script {
        old_at.push(old_line);
        new_at.push(new_line);
        old_line += usize::from(line.tag.in_old());
        new_line += usize::from(line.tag.in_new());
    }
    old_at.push(old_line);
    new_at.push(new_line);

    let mut groups = Vec::new();
    let (mut group_start, mut previous) = (first, first);
    for &change in &changes[1..] {
        if change - previous - 1 > 2 * CONTEXT {
            groups.push((group_start, previous));
            group_start = change;
        }
        previous = change;
    }
    groups.push((group_start, previous));

    let mut out = format!("--- a/{}\n+++ b/{}\n", name, name);
    for (first_change, last_change) in groups {
        let lo = first_change.saturating_sub(CONTEXT);
        let hi = (last_change + CONTEXT + 1).min(script.len());
        out.push_str(&format!(
            "@@ -{} +{} @@\n",
            format_range(old_at[lo], old_at[hi] - old_at[lo]),
            format_range(new_at[lo], new_at[hi] - new_at[lo]),
        ));
        for line in &script[lo..hi] {
            out.push(line.tag.sign());
            out.push_str(line.text);
            if !line.text.ends_with('\n') {
                out.push('\n');
            }
        }
    }
    out
}

fn format_range(start: usize, len: usize) -> String {
    match len {
        0 => format!("{},0", start),
        1 => format!("{}", start + 1),
        _ => format!("{},{}", start + 1, len),
    }
}

/// Shortest edit script via longest common subsequence, after trimming the
/// common prefix and suffix
fn edit_script<'a>(old: &[&'a str], new: &[&'a str]) -> Vec<Line<'a>> {
    let prefix = old.iter().zip(new).take_while(|(a, b)| a == b).count();
    let max_suffix = old.len().min(new.len()) - prefix;
    let suffix = old
        .iter()
        .rev()
        .zip(new.iter().rev())
        .take(max_suffix)
        .take_while(|(a, b)| a == b)
        .count();

    let keep = |text: &'a str| Line {
        tag: Tag::Keep,
        text,
    };
    let mut script = Vec::with_capacity(old.len() + new.len());
    script.extend(old[..prefix].iter().copied().map(keep));
    align(
        &old[prefix..old.len() - suffix],
        &new[prefix..new.len() - suffix],
        &mut script,
    );
    script.extend(old[old.len() - suffix..].iter().copied().map(keep));
    script
}

/// Hirschberg's divide and conquer: split `old` in half, find where the
/// optimal alignment crosses `new` from one forward and one backward row of
/// LCS lengths, and recurse on both sides. Memory stays linear in the input.
fn align<'a>(old: &[&'a str], new: &[&'a str], script: &mut Vec<Line<'a>>) {
    let remove = |text: &'a str| Line {
        tag: Tag::Remove,
        text,
    };
    let add = |text: &'a str| Line { tag: Tag::Add, text };

    match old {
        [] => script.extend(new.iter().copied().map(add)),
        _ if new.is_empty() => script.extend(old.iter().copied().map(remove)),
        [only] => match new.iter().position(|text| text == only) {
            Some(at) => {
                script.extend(new[..at].iter().copied().map(add));
                script.push(Line {
                    tag: Tag::Keep,
                    text: *only,
                });
                script.extend(new[at + 1..].iter().copied().map(add));
            }
            None => {
                script.push(remove(*only));
                script.extend(new.iter().copied().map(add));
            }
        },
        _ => {
            let mid = old.len() / 2;
            let forward = lcs_lengths(&old[..mid], new);
            let old_tail: Vec<&str> = old[mid..].iter().rev().copied().collect();
            let new_reversed: Vec<&str> = new.iter().rev().copied().collect();
            let backward = lcs_lengths(&old_tail, &new_reversed);

            let mut split = 0;
            let mut best = 0;
            for (j, ahead) in forward.iter().enumerate() {
                let total = ahead + backward[new.len() - j];
                if total > best {
                    best = total;
                    split = j;
                }
            }

            align(&old[..mid], &new[..split], script);
            align(&old[mid..], &new[split..], script);
        }
    }
}

/// LCS length of `a` against every prefix of `b`, one row at a time
fn lcs_lengths(a: &[&str], b: &[&str]) -> Vec<usize> {
    let mut previous = vec![0; b.len() + 1];
    let mut current = vec![0; b.len() + 1];
    for x in a {
        for (j, y) in b.iter().enumerate() {
            current[j + 1] = if x == y {
                previous[j] + 1
            } else {
                previous[j + 1].max(current[j])
            };
        }
        std::mem::swap(&mut previous, &mut current);
    }
    previous
}
