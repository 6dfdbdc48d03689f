//! Version comparison for package version strings.
//!
//! Versions are dotted sequences of numeric components, optionally terminated
//! by a pre-release suffix (`alpha`/`a`, `beta`/`b`, `rc`, each followed by a
//! number) or by a single trailing ASCII letter (`1.0.1h`). Pre-release
//! suffixes sort *before* the plain release (`1.02b1 < 1.02`), and within a
//! release `alpha < beta < rc`, so `compare` is not a plain lexicographic or
//! rpm-style ordering.

use std::sync::LazyLock;

use regex::Regex;

use crate::error::{Error, Result};

/// Matches a named pre-release suffix: `1.0rc2`, `2.4-beta1`, `0.9a3`.
static PRERELEASE_SUFFIX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"-?(rc|beta|b|alpha|a)(\d+)$").unwrap());

/// Matches a single trailing ASCII letter: `1.0.1h`.
static LETTER_SUFFIX: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[A-Za-z]$").unwrap());

/// A parsed version suffix: the first letter of its label and its number.
///
/// `rc1` becomes `('r', 1)`, `beta3` becomes `('b', 3)`, a bare trailing
/// letter like the `h` in `1.0.1h` becomes `('h', 0)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Suffix {
    letter: u8,
    number: u64,
}

/// Split a version string into its numeric body and an optional suffix.
fn split_suffix(version: &str) -> (&str, Option<Suffix>) {
    if let Some(caps) = PRERELEASE_SUFFIX.captures(version) {
        let whole = caps.get(0).unwrap();
        let label = caps.get(1).unwrap().as_str();
        let number = caps.get(2).unwrap().as_str().parse().unwrap_or(0);
        let suffix = Suffix {
            letter: label.as_bytes()[0],
            number,
        };
        return (&version[..whole.start()], Some(suffix));
    }

    if let Some(m) = LETTER_SUFFIX.find(version) {
        let suffix = Suffix {
            letter: version.as_bytes()[m.start()],
            number: 0,
        };
        return (&version[..m.start()], Some(suffix));
    }

    (version, None)
}

/// Split a version body on `.` into numeric components.
///
/// Components that fail to parse as numbers count as zero.
fn components(body: &str) -> Vec<u64> {
    body.split('.').map(|c| c.parse().unwrap_or(0)).collect()
}

fn sign(ordering: std::cmp::Ordering) -> i32 {
    match ordering {
        std::cmp::Ordering::Less => -1,
        std::cmp::Ordering::Equal => 0,
        std::cmp::Ordering::Greater => 1,
    }
}

/// Compare two version strings.
///
/// Returns `-1`, `0`, or `1` as `a` is older than, equal to, or newer than `b`.
///
/// # Examples
///
/// ```
/// use libpkgconfig::version::compare;
///
/// assert!(compare("1.2.3", "1.2.2") > 0);
/// assert_eq!(compare("1.2.3", "1.2.3"), 0);
/// assert!(compare("1.02b1", "1.02") < 0);
/// assert!(compare("1.0alpha1", "1.0beta1") < 0);
/// ```
pub fn compare(a: &str, b: &str) -> i32 {
    if a == b {
        return 0;
    }

    let (a_body, a_suffix) = split_suffix(a);
    let (b_body, b_suffix) = split_suffix(b);

    let a_parts = components(a_body);
    let b_parts = components(b_body);

    let shared = a_parts.len().min(b_parts.len());
    for i in 0..shared {
        let at_last = i + 1 == a_parts.len() || i + 1 == b_parts.len();
        let either_suffixed = a_suffix.is_some() || b_suffix.is_some();

        if either_suffixed && at_last && a_parts[i] == b_parts[i] {
            match (a_suffix, b_suffix) {
                (Some(sa), Some(sb)) => {
                    let by_letter = sign(sa.letter.cmp(&sb.letter));
                    if by_letter != 0 {
                        return by_letter;
                    }
                    let by_number = sign(sa.number.cmp(&sb.number));
                    if by_number != 0 {
                        return by_number;
                    }
                    // Equal suffixes: keep walking the remaining components.
                }
                // A pre-release sorts before the plain release.
                (Some(_), None) => return -1,
                (None, Some(_)) => return 1,
                (None, None) => unreachable!(),
            }
        } else if a_parts[i] != b_parts[i] {
            return sign(a_parts[i].cmp(&b_parts[i]));
        }
    }

    // A list with extra trailing components is greater.
    sign(a_parts.len().cmp(&b_parts.len()))
}

/// Check whether the tool's own version satisfies `--atleast-pkgconfig-version`.
///
/// Major and minor components are compared independently: each component of
/// the tool's version must be at least the corresponding requested component.
/// A patch component in the request is ignored.
pub fn tool_version_at_least(tool: &str, requested: &str) -> bool {
    let tool_parts = components(tool);
    let requested_parts = components(requested);

    let major = |parts: &[u64]| parts.first().copied().unwrap_or(0);
    let minor = |parts: &[u64]| parts.get(1).copied().unwrap_or(0);

    major(&tool_parts) >= major(&requested_parts) && minor(&tool_parts) >= minor(&requested_parts)
}

/// Relational operators usable in version constraints.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Comparator {
    /// Any version matches (no constraint).
    #[default]
    Any,
    /// `=`
    Equal,
    /// `!=`
    NotEqual,
    /// `<`
    LessThan,
    /// `<=`
    LessThanEqual,
    /// `>`
    GreaterThan,
    /// `>=`
    GreaterThanEqual,
}

impl Comparator {
    /// Parse a comparator from its string representation.
    pub fn from_str(s: &str) -> Result<Self> {
        match s {
            "" => Ok(Self::Any),
            "=" => Ok(Self::Equal),
            "!=" => Ok(Self::NotEqual),
            "<" => Ok(Self::LessThan),
            "<=" => Ok(Self::LessThanEqual),
            ">" => Ok(Self::GreaterThan),
            ">=" => Ok(Self::GreaterThanEqual),
            _ => Err(Error::ArgumentError {
                message: format!("unknown version comparison operator '{s}'"),
            }),
        }
    }

    /// Get the string representation of this comparator.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Any => "(any)",
            Self::Equal => "=",
            Self::NotEqual => "!=",
            Self::LessThan => "<",
            Self::LessThanEqual => "<=",
            Self::GreaterThan => ">",
            Self::GreaterThanEqual => ">=",
        }
    }

    /// Evaluate whether `actual <op> target` holds.
    pub fn eval(self, actual: &str, target: &str) -> bool {
        match self {
            Self::Any => true,
            Self::Equal => compare(actual, target) == 0,
            Self::NotEqual => compare(actual, target) != 0,
            Self::LessThan => compare(actual, target) < 0,
            Self::LessThanEqual => compare(actual, target) <= 0,
            Self::GreaterThan => compare(actual, target) > 0,
            Self::GreaterThanEqual => compare(actual, target) >= 0,
        }
    }
}

impl std::fmt::Display for Comparator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Check whether a character can begin a version operator.
pub fn is_operator_char(c: char) -> bool {
    matches!(c, '<' | '>' | '!' | '=')
}
