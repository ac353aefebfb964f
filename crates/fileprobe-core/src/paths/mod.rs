//! Candidate path generation.
//!
//! Turns a bare hostname into the list of relative paths probed on that host:
//! flat literal lists plus cartesian expansions of the name groups in
//! [`catalog`]. Output is deterministic for a given hostname and catalog;
//! callers that want a randomized request pattern call [`shuffle`].
//! Duplicates across overlapping groups are kept.

pub mod catalog;

use rand::seq::SliceRandom;

use catalog::*;

/// The set of names the generator draws from: the built-in groups and/or
/// literal paths supplied by the caller (e.g. a wordlist file).
#[derive(Debug, Clone)]
pub struct Catalog {
    builtin: bool,
    extra: Vec<String>,
}

impl Catalog {
    /// The built-in catalog.
    pub fn builtin() -> Self {
        Self {
            builtin: true,
            extra: Vec::new(),
        }
    }

    /// A catalog made only of `paths`, without the built-in groups.
    pub fn from_literals<I, S>(paths: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            builtin: false,
            extra: paths.into_iter().map(Into::into).collect(),
        }
    }

    /// Appends literal paths after the built-in groups.
    pub fn with_extra<I, S>(mut self, paths: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.extra.extend(paths.into_iter().map(Into::into));
        self
    }
}

impl Default for Catalog {
    fn default() -> Self {
        Self::builtin()
    }
}

/// Generates the candidate paths for `hostname`, in generation order.
///
/// Every returned path is relative (no leading `/`), non-empty and free of
/// control characters. An empty hostname still yields the full catalog; the
/// hostname-derived names then degrade to bare extensions such as `.sql`.
pub fn generate(hostname: &str, catalog: &Catalog) -> Vec<String> {
    let mut out: Vec<String> = Vec::new();

    if catalog.builtin {
        out.extend(LITERALS.iter().map(|s| s.to_string()));
        out.extend(combine(&[ENV_FILES, STAGES]));
        out.extend(combine(&[CONFIG_FILES, LEFTOVER_SUFFIXES]));
        out.extend(combine(&[ARCHIVE_NAMES, ARCHIVE_EXTENSIONS]));

        let names = host_names(hostname);
        let names: Vec<&str> = names.iter().map(String::as_str).collect();
        out.extend(combine(&[names.as_slice(), HOST_EXTENSIONS]));

        out.extend(combine(&[
            COMPOSE_PREFIXES,
            COMPOSE_VARIANTS,
            STAGES,
            COMPOSE_EXTENSIONS,
        ]));
        out.extend(combine(&[BUILD_FILES, STAGES]));
    }

    out.extend(catalog.extra.iter().cloned());

    out.into_iter().filter_map(|p| normalize(&p)).collect()
}

/// Randomizes candidate order in place (one target's request pattern).
pub fn shuffle(paths: &mut [String]) {
    paths.shuffle(&mut rand::thread_rng());
}

/// Cartesian product of string groups, concatenated left to right.
///
/// `combine(&[&["a", "b"], &[".zip", ".sql"]])` yields
/// `["a.zip", "a.sql", "b.zip", "b.sql"]`.
pub fn combine(groups: &[&[&str]]) -> Vec<String> {
    if groups.is_empty() {
        return Vec::new();
    }
    groups.iter().fold(vec![String::new()], |acc, group| {
        acc.iter()
            .flat_map(|prefix| group.iter().map(move |part| format!("{prefix}{part}")))
            .collect()
    })
}

/// Names a site owner is likely to give a dump of `hostname`:
/// the host itself, the host without `www.`, its first label and an
/// underscored form. Order is stable; repeats are collapsed.
fn host_names(hostname: &str) -> Vec<String> {
    let host = hostname.trim().trim_end_matches('.').to_ascii_lowercase();
    let bare = host.strip_prefix("www.").unwrap_or(&host).to_string();
    let first_label = bare.split('.').next().unwrap_or("").to_string();
    let underscored = bare.replace('.', "_");

    let mut names: Vec<String> = Vec::with_capacity(4);
    for name in [host.clone(), bare, first_label, underscored] {
        if !names.contains(&name) {
            names.push(name);
        }
    }
    names
}

fn normalize(path: &str) -> Option<String> {
    let trimmed = path.trim().trim_start_matches('/');
    if trimmed.is_empty() || trimmed.chars().any(char::is_control) {
        return None;
    }
    Some(trimmed.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn combine_two_groups() {
        assert_eq!(
            combine(&[&["a", "b"], &[".zip", ".sql"]]),
            vec!["a.zip", "a.sql", "b.zip", "b.sql"]
        );
    }

    #[test]
    fn combine_multi_level() {
        let out = combine(&[&["docker-compose"], &["", ".override"], &["", ".prod"], &[".yml"]]);
        assert_eq!(
            out,
            vec![
                "docker-compose.yml",
                "docker-compose.prod.yml",
                "docker-compose.override.yml",
                "docker-compose.override.prod.yml",
            ]
        );
        assert!(combine(&[]).is_empty());
    }

    #[test]
    fn generate_is_deterministic() {
        let catalog = Catalog::builtin();
        assert_eq!(
            generate("example.com", &catalog),
            generate("example.com", &catalog)
        );
    }

    #[test]
    fn generated_paths_are_relative_and_clean() {
        for path in generate("www.example.com", &Catalog::builtin()) {
            assert!(!path.is_empty());
            assert!(!path.starts_with('/'), "{path}");
            assert!(!path.contains('\n') && !path.contains('\r'), "{path}");
        }
    }

    #[test]
    fn generate_covers_each_group() {
        let paths = generate("www.example.com", &Catalog::builtin());
        for expected in [
            ".git/config",
            ".env",
            ".env.prod",
            "wp-config.php.bak",
            "config.php~",
            "backup.sql",
            "www.tar.gz",
            "www.example.com.zip",
            "example.com.sql",
            "example.tar.gz",
            "example_com.sql.gz",
            "docker-compose.yml",
            "docker-compose.override.dev.yaml",
            "Dockerfile.prod",
        ] {
            assert!(paths.iter().any(|p| p == expected), "missing {expected}");
        }
    }

    #[test]
    fn empty_hostname_still_yields_catalog() {
        let paths = generate("", &Catalog::builtin());
        assert!(paths.iter().any(|p| p == ".sql"));
        assert!(paths.iter().any(|p| p == "backup.zip"));
        assert!(paths.iter().all(|p| !p.is_empty()));
    }

    #[test]
    fn literal_catalog_strips_slashes_and_drops_garbage() {
        let catalog = Catalog::from_literals(["/backup.sql", "", "bad\npath", "//.env"]);
        assert_eq!(generate("example.com", &catalog), vec!["backup.sql", ".env"]);
    }

    #[test]
    fn extra_paths_follow_builtin_groups() {
        let catalog = Catalog::builtin().with_extra(["/custom/secret.txt"]);
        let paths = generate("example.com", &catalog);
        assert_eq!(paths.last().map(String::as_str), Some("custom/secret.txt"));
    }

    #[test]
    fn shuffle_keeps_content() {
        let generated = generate("example.com", &Catalog::builtin());
        let mut shuffled = generated.clone();
        shuffle(&mut shuffled);
        let mut a = generated.clone();
        let mut b = shuffled;
        a.sort();
        b.sort();
        assert_eq!(a, b);
    }
}
