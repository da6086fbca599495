// SPDX-License-Identifier: PMPL-1.0-or-later

//! Depth-aware asset path rewriting.
//!
//! Templates reference `css/`, `img/`, `js/` and `data/` relative to their
//! own location. A generated page sits one directory deeper (under its
//! language segment), so every such reference gains exactly one more `../`.

/// Number of directory separators in a `/`-separated relative path.
pub fn depth_of(path: &str) -> usize {
    path.matches('/').count()
}

/// Rewrite `href="…dir/` and `src="…dir/` prefixes from `template_depth`
/// levels of `../` to `output_depth` levels, for every directory in
/// `asset_dirs`.
pub fn fix_paths(
    text: &str,
    template_depth: usize,
    output_depth: usize,
    asset_dirs: &[String],
) -> String {
    if template_depth == output_depth {
        return text.to_string();
    }
    let from = "../".repeat(template_depth);
    let to = "../".repeat(output_depth);

    let mut out = text.to_string();
    for dir in asset_dirs {
        for attr in ["href=\"", "src=\""] {
            out = out.replace(&format!("{attr}{from}{dir}/"), &format!("{attr}{to}{dir}/"));
        }
    }
    out
}
