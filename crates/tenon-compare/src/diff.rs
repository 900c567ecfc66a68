//! Line diff for multi-line text
//!
//! Produces a single unified hunk spanning both texts, with every line
//! prefixed by ` `, `-` or `+`.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Line<'a> {
    Same(&'a str),
    Removed(&'a str),
    Added(&'a str),
}

pub fn unified(x: &str, y: &str, x_label: &str, y_label: &str) -> String {
    let a: Vec<&str> = x.split('\n').collect();
    let b: Vec<&str> = y.split('\n').collect();

    let mut out = vec![
        format!("--- {}", x_label),
        format!("+++ {}", y_label),
        format!("@@ -{} +{} @@", hunk_range(a.len()), hunk_range(b.len())),
    ];
    out.extend(line_ops(&a, &b).into_iter().map(|line| match line {
        Line::Same(text) => format!(" {}", text),
        Line::Removed(text) => format!("-{}", text),
        Line::Added(text) => format!("+{}", text),
    }));
    out.join("\n")
}

fn hunk_range(len: usize) -> String {
    match len {
        0 => "0,0".to_string(),
        1 => "1".to_string(),
        n => format!("1,{}", n),
    }
}

/// Longest-common-subsequence walk; removals come before additions at a change
fn line_ops<'a>(a: &[&'a str], b: &[&'a str]) -> Vec<Line<'a>> {
    let (n, m) = (a.len(), b.len());
    let mut lcs = vec![vec![0usize; m + 1]; n + 1];
    for i in (0..n).rev() {
        for j in (0..m).rev() {
            lcs[i][j] = if a[i] == b[j] {
                lcs[i + 1][j + 1] + 1
            } else {
                lcs[i + 1][j].max(lcs[i][j + 1])
            };
        }
    }

    let mut ops = Vec::with_capacity(n + m);
    let (mut i, mut j) = (0, 0);
    while i < n && j < m {
        if a[i] == b[j] {
            ops.push(Line::Same(a[i]));
            i += 1;
            j += 1;
        } else if lcs[i + 1][j] >= lcs[i][j + 1] {
            ops.push(Line::Removed(a[i]));
            i += 1;
        } else {
            ops.push(Line::Added(b[j]));
            j += 1;
        }
    }
    ops.extend(a[i..].iter().map(|text| Line::Removed(*text)));
    ops.extend(b[j..].iter().map(|text| Line::Added(*text)));
    ops
}
