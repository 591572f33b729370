/// Checks if a host matches a glob pattern
///
/// The pattern is matched against the whole host:
/// - `*` matches any run of characters, including an empty one
/// - `?` matches exactly one character
/// - every other character matches itself
///
/// Hosts should be lowercased before matching; the comparison itself is
/// case-sensitive.
///
/// # Examples
///
/// ```
/// use semi_scrape::url::matches_glob;
///
/// assert!(matches_glob("*nvidia.*", "www.nvidia.com"));
/// assert!(matches_glob("*nvidia.*", "nvidia.cn"));
/// assert!(matches_glob("*cadence*", "community.cadence.com"));
/// assert!(!matches_glob("*nvidia.*", "nvidia"));
/// assert!(matches_glob("example.com", "example.com"));
/// ```
pub fn matches_glob(pattern: &str, candidate: &str) -> bool {
    let pattern: Vec<char> = pattern.chars().collect();
    let candidate: Vec<char> = candidate.chars().collect();

    let (mut p, mut c) = (0, 0);
    // Position of the last '*' seen, and the candidate index it was tried at
    let mut backtrack: Option<(usize, usize)> = None;

    while c < candidate.len() {
        match pattern.get(p) {
            Some('*') => {
                backtrack = Some((p, c));
                p += 1;
            }
            Some('?') => {
                p += 1;
                c += 1;
            }
            Some(&ch) if ch == candidate[c] => {
                p += 1;
                c += 1;
            }
            _ => match backtrack {
                // Let the last star swallow one more character
                Some((star, matched)) => {
                    p = star + 1;
                    c = matched + 1;
                    backtrack = Some((star, matched + 1));
                }
                None => return false,
            },
        }
    }

    pattern[p..].iter().all(|&ch| ch == '*')
}
