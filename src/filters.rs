use once_cell::sync::Lazy;
use std::collections::HashSet;

static EXCLUDED_DIRS: Lazy<HashSet<&'static str>> = Lazy::new(|| HashSet::from([
    "node_modules", ".git", "vendor", "dist", "build", "coverage",
    ".nyc_output", "__pycache__", ".pytest_cache", "venv", ".venv",
    "env", ".next", ".nuxt", "target", "out", ".cache", ".turbo",
    ".parcel-cache", "public", "static",
]));

static EXCLUDED_FILENAMES: Lazy<HashSet<&'static str>> = Lazy::new(|| HashSet::from([
    // Dependency manifests & lock files change for non-code reasons
    "package.json", "package-lock.json", "yarn.lock", "pnpm-lock.yaml",
    "composer.lock", "Gemfile.lock", "Pipfile.lock", "poetry.lock",
    "go.sum", "Cargo.lock", "packages.lock.json", "npm-shrinkwrap.json",
    // Editor config & OS files
    ".gitignore", ".gitattributes", ".editorconfig", ".eslintrc", ".prettierrc",
    ".browserslistrc", "CHANGELOG.md", "CHANGELOG", ".DS_Store", "Thumbs.db",
]));

static EXCLUDED_EXTENSIONS: &[&str] = &[
    ".lock", ".map", ".snap",
    ".png", ".jpg", ".jpeg", ".gif", ".svg", ".ico", ".webp", ".avif",
    ".woff", ".woff2", ".ttf", ".eot", ".otf",
    ".mp4", ".mp3", ".wav", ".ogg", ".webm",
    ".pdf", ".zip", ".tar", ".gz", ".bz2", ".xz", ".7z", ".dmg", ".exe",
    ".min.js", ".min.css",
];

/// User adjustments to the built-in exclusion lists, usually from the config file.
#[derive(Debug, Default, Clone)]
pub struct FilterOverrides {
    /// Directory names to add to the built-in exclusion list.
    pub extra_exclude_dirs: Vec<String>,
    /// Built-in excluded directory names to allow back in.
    pub allow_dirs: Vec<String>,
    /// Exact filenames to add to the built-in exclusion list.
    pub extra_exclude_files: Vec<String>,
    /// File extensions to add to the built-in exclusion list.
    pub extra_exclude_extensions: Vec<String>,
}

/// Filters out files that aren't useful for hotspot analysis.
/// Security-sensitive files (.env, keys) are NOT handled here;
/// the security scanner reads the unfiltered commits.
///
/// Pure and order-preserving: only path strings are consulted.
pub fn filter_files(
    files: &[String],
    path_filter: Option<&str>,
    overrides: &FilterOverrides,
) -> Vec<String> {
    let scope = path_filter
        .map(|p| p.trim().trim_start_matches("./"))
        .filter(|p| !p.is_empty());

    let extra_exts: Vec<String> = overrides
        .extra_exclude_extensions
        .iter()
        .map(|e| e.to_lowercase())
        .collect();

    files.iter().filter(|file| {
        let f = file.as_str();

        if let Some(pf) = scope {
            let bare = pf.trim_end_matches('/');
            let prefix = format!("{bare}/");
            if !f.starts_with(&prefix) && f != bare { return false; }
        }

        let segments: Vec<&str> = f.split('/').collect();
        let filename = segments.last().copied().unwrap_or("");
        let dirs = &segments[..segments.len().saturating_sub(1)];

        let dir_excluded = |seg: &str| {
            (EXCLUDED_DIRS.contains(seg) && !overrides.allow_dirs.iter().any(|d| d == seg))
                || overrides.extra_exclude_dirs.iter().any(|d| d == seg)
        };
        if dirs.iter().any(|seg| dir_excluded(*seg)) { return false; }

        if EXCLUDED_FILENAMES.contains(filename)
            || overrides.extra_exclude_files.iter().any(|n| n == filename)
        {
            return false;
        }

        let lower = filename.to_lowercase();
        if EXCLUDED_EXTENSIONS.iter().any(|ext| lower.ends_with(ext)) { return false; }
        if extra_exts.iter().any(|ext| lower.ends_with(ext.as_str())) { return false; }

        true
    }).cloned().collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn to_strings(v: &[&str]) -> Vec<String> {
        v.iter().map(|s| s.to_string()).collect()
    }

    fn filter(files: &[&str], scope: Option<&str>) -> Vec<String> {
        filter_files(&to_strings(files), scope, &FilterOverrides::default())
    }

    #[test]
    fn test_removes_package_json_and_locks() {
        let filtered = filter(&["src/app.rs", "package.json", "yarn.lock", "Cargo.lock", "package-lock.json"], None);
        assert_eq!(filtered, vec!["src/app.rs"], "manifests and lock files must be filtered");
    }

    #[test]
    fn test_removes_dependency_and_build_dirs() {
        let filtered = filter(&["src/lib.ts", "node_modules/lodash/index.js", "web/dist/bundle.js"], None);
        assert_eq!(filtered, vec!["src/lib.ts"], "node_modules/ and dist/ at any depth must be filtered");
    }

    #[test]
    fn test_respects_path_filter() {
        let filtered = filter(&["src/app.rs", "tests/foo.rs", "lib/util.rs", "srcfoo/x.rs"], Some("src"));
        assert_eq!(filtered, vec!["src/app.rs"], "only paths under src/ survive");
    }

    #[test]
    fn test_path_filter_matches_exact_file_and_trailing_slash() {
        let files = &["src/app.rs", "src/app.rs.bak", "README.md"];
        assert_eq!(filter(files, Some("src/app.rs")), vec!["src/app.rs"]);
        assert_eq!(filter(files, Some("src/")), vec!["src/app.rs", "src/app.rs.bak"]);
    }

    #[test]
    fn test_removes_image_and_binary_extensions() {
        let filtered = filter(&["src/main.rs", "assets/logo.PNG", "docs/spec.pdf", "app.min.js", "app.js"], None);
        assert_eq!(filtered, vec!["src/main.rs", "app.js"]);
    }

    #[test]
    fn test_preserves_input_order() {
        let filtered = filter(&["z.rs", "a.rs", "m.rs"], None);
        assert_eq!(filtered, vec!["z.rs", "a.rs", "m.rs"]);
    }

    #[test]
    fn test_overrides_extend_and_relax_lists() {
        let overrides = FilterOverrides {
            extra_exclude_dirs: vec!["proto".to_string()],
            allow_dirs: vec!["dist".to_string()],
            extra_exclude_files: vec!["schema.graphql".to_string()],
            extra_exclude_extensions: vec![".D.TS".to_string()],
        };
        let files = to_strings(&[
            "proto/api.rs", "dist/real.js", "schema.graphql", "types/index.d.ts", "src/ok.ts",
        ]);
        let filtered = filter_files(&files, None, &overrides);
        assert_eq!(filtered, vec!["dist/real.js", "src/ok.ts"]);
    }
}
