//! Wildcard patterns over `(language, package, class, method)` locations.
//!
//! A pattern is written as `[language:][package][[/]class][#method]`.
//! Without an explicit `/`, the class part starts at the first component
//! beginning with an uppercase letter (optionally preceded by a wildcard):
//!
//! ```text
//! java:com.acme.api.*        language + package
//! com.acme.*Service          package + class
//! com.acme/util#parse        package + lowercase class + method
//! *Test#setUp                class + method
//! ```
//!
//! Each component may carry a `*` (zero or more characters) or `+` (one or
//! more characters) at its start or end. A package component ending in `.*`
//! matches the package itself as well as all its subpackages.

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;
use std::sync::OnceLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

/// Start of the class part: an uppercase letter at the beginning of a
/// dotted component, optionally preceded by a wildcard.
#[allow(clippy::expect_used)]
fn class_start() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(^|\.)[*+]?[A-Z]").expect("class start regex"))
}

// ────────────────────────────────────────────────────────────────────
// Errors
// ────────────────────────────────────────────────────────────────────

/// Errors raised while constructing a [`Location`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PatternError {
    /// The pattern text is empty.
    #[error("pattern must not be empty")]
    Empty,

    /// A component consists of two wildcards.
    #[error("illegal wildcard combination in `{pattern}`: `**`, `*+`, `+*` and `++` are not allowed")]
    IllegalWildcard {
        /// The offending component.
        pattern: String,
    },

    /// A wildcard appears somewhere other than the start or end.
    #[error("wildcard in `{pattern}` is only allowed at the start or end")]
    MisplacedWildcard {
        /// The offending component.
        pattern: String,
    },

    /// The language prefix is not a known language.
    #[error("unknown language `{name}`, expected: java, kotlin")]
    UnknownLanguage {
        /// The unrecognized prefix.
        name: String,
    },
}

// ────────────────────────────────────────────────────────────────────
// Language
// ────────────────────────────────────────────────────────────────────

/// Source language a location may be restricted to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    /// Java sources.
    Java,
    /// Kotlin sources.
    Kotlin,
}

impl Language {
    /// Returns the lowercase tag used in patterns.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Java => "java",
            Self::Kotlin => "kotlin",
        }
    }
}

impl FromStr for Language {
    type Err = PatternError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "java" => Ok(Self::Java),
            "kotlin" => Ok(Self::Kotlin),
            _ => Err(PatternError::UnknownLanguage {
                name: s.to_string(),
            }),
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ────────────────────────────────────────────────────────────────────
// Location
// ────────────────────────────────────────────────────────────────────

/// A validated pattern triple with an optional language restriction.
///
/// Empty components match anything.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct Location {
    language: Option<Language>,
    package: String,
    class: String,
    method: String,
}

impl Location {
    /// A location matching everything.
    #[must_use]
    pub fn all() -> Self {
        Self::default()
    }

    /// Parses a pattern in `[language:][package][[/]class][#method]` form.
    ///
    /// # Errors
    ///
    /// Returns [`PatternError`] if the text is empty, a component uses
    /// wildcards illegally, or the language prefix is unknown.
    pub fn parse(pattern: &str) -> Result<Self, PatternError> {
        if pattern.is_empty() {
            return Err(PatternError::Empty);
        }
        let (language, rest) = match pattern.split_once(':') {
            Some((lang, rest)) => (Some(lang.parse::<Language>()?), rest),
            None => (None, pattern),
        };
        let (rest, method) = rest.split_once('#').unwrap_or((rest, ""));
        let (package, class) = split_package_class(rest);
        Self::new(language, package, class, method)
    }

    /// Creates a location from its parts, validating every component.
    ///
    /// # Errors
    ///
    /// Returns [`PatternError`] if a component uses wildcards illegally.
    pub fn new(
        language: Option<Language>,
        package: &str,
        class: &str,
        method: &str,
    ) -> Result<Self, PatternError> {
        check_component(package)?;
        check_component(class)?;
        check_component(method)?;
        Ok(Self {
            language,
            package: normalize_component(package),
            class: normalize_component(class),
            method: normalize_component(method),
        })
    }

    /// A location restricted to a package pattern.
    ///
    /// # Errors
    ///
    /// Returns [`PatternError`] if the pattern is invalid.
    pub fn of_package(package: &str) -> Result<Self, PatternError> {
        Self::new(None, package, "", "")
    }

    /// A location restricted to a class pattern.
    ///
    /// # Errors
    ///
    /// Returns [`PatternError`] if the pattern is invalid.
    pub fn of_class(class: &str) -> Result<Self, PatternError> {
        Self::new(None, "", class, "")
    }

    /// A location restricted to a method pattern.
    ///
    /// # Errors
    ///
    /// Returns [`PatternError`] if the pattern is invalid.
    pub fn of_method(method: &str) -> Result<Self, PatternError> {
        Self::new(None, "", "", method)
    }

    /// A location matching everything written in `language`.
    #[must_use]
    pub fn of_language(language: Language) -> Self {
        Self {
            language: Some(language),
            ..Self::default()
        }
    }

    /// Returns a copy restricted to `language`.
    #[must_use]
    pub fn with_language(&self, language: Language) -> Self {
        Self {
            language: Some(language),
            ..self.clone()
        }
    }

    /// Returns a copy with the package pattern replaced.
    ///
    /// # Errors
    ///
    /// Returns [`PatternError`] if the pattern is invalid.
    pub fn with_package(&self, package: &str) -> Result<Self, PatternError> {
        Self::new(self.language, package, &self.class, &self.method)
    }

    /// Returns a copy with the class pattern replaced.
    ///
    /// # Errors
    ///
    /// Returns [`PatternError`] if the pattern is invalid.
    pub fn with_class(&self, class: &str) -> Result<Self, PatternError> {
        Self::new(self.language, &self.package, class, &self.method)
    }

    /// Returns a copy with the method pattern replaced.
    ///
    /// # Errors
    ///
    /// Returns [`PatternError`] if the pattern is invalid.
    pub fn with_method(&self, method: &str) -> Result<Self, PatternError> {
        Self::new(self.language, &self.package, &self.class, method)
    }

    /// Returns the language restriction, if any.
    #[must_use]
    pub const fn language(&self) -> Option<Language> {
        self.language
    }

    /// Returns the package pattern.
    #[must_use]
    pub fn package(&self) -> &str {
        &self.package
    }

    /// Returns the class pattern.
    #[must_use]
    pub fn class(&self) -> &str {
        &self.class
    }

    /// Returns the method pattern.
    #[must_use]
    pub fn method(&self) -> &str {
        &self.method
    }

    /// Renders the location back into pattern syntax.
    ///
    /// The result parses to an equal location.
    #[must_use]
    pub fn pattern(&self) -> String {
        let mut out = String::new();
        if let Some(language) = self.language {
            out.push_str(language.as_str());
            out.push(':');
        }
        match (self.package.is_empty(), self.class.is_empty()) {
            (true, true) => {}
            (false, true) => {
                out.push_str(&self.package);
                // A trailing slash keeps `Com` or `a.Bc` from parsing as a class.
                if class_start().is_match(&self.package) {
                    out.push('/');
                }
            }
            (true, false) => {
                if !starts_class(&self.class) {
                    out.push('/');
                }
                out.push_str(&self.class);
            }
            (false, false) => {
                let dotted = format!("{}.{}", self.package, self.class);
                let split_here = class_start()
                    .find(&dotted)
                    .is_some_and(|m| m.start() == self.package.len());
                out.push_str(&self.package);
                out.push(if split_here { '.' } else { '/' });
                out.push_str(&self.class);
            }
        }
        if !self.method.is_empty() {
            out.push('#');
            out.push_str(&self.method);
        }
        if out.is_empty() || out.ends_with(':') {
            out.push('*');
        }
        out
    }
}

impl FromStr for Location {
    type Err = PatternError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.pattern())
    }
}

impl PartialOrd for Location {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Location {
    fn cmp(&self, other: &Self) -> Ordering {
        self.pattern().cmp(&other.pattern()).then_with(|| {
            (self.language, &self.package, &self.class, &self.method).cmp(&(
                other.language,
                &other.package,
                &other.class,
                &other.method,
            ))
        })
    }
}

impl Serialize for Location {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.pattern())
    }
}

impl<'de> Deserialize<'de> for Location {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let text = String::deserialize(deserializer)?;
        Self::parse(&text).map_err(serde::de::Error::custom)
    }
}

fn split_package_class(rest: &str) -> (&str, &str) {
    if let Some((package, class)) = rest.split_once('/') {
        return (package, class);
    }
    match class_start().captures(rest) {
        Some(caps) => {
            let (Some(whole), Some(sep)) = (caps.get(0), caps.get(1)) else {
                return (rest, "");
            };
            (&rest[..whole.start()], &rest[whole.start() + sep.len()..])
        }
        None => (rest, ""),
    }
}

/// `*` and the empty pattern both match everything; keep one spelling.
fn normalize_component(pattern: &str) -> String {
    if pattern == "*" {
        String::new()
    } else {
        pattern.to_string()
    }
}

fn starts_class(class: &str) -> bool {
    class_start().find(class).is_some_and(|m| m.start() == 0)
}

fn is_wildcard(c: char) -> bool {
    c == '*' || c == '+'
}

fn check_component(pattern: &str) -> Result<(), PatternError> {
    if matches!(pattern, "**" | "+*" | "*+" | "++") {
        return Err(PatternError::IllegalWildcard {
            pattern: pattern.to_string(),
        });
    }
    let last = pattern.chars().count().saturating_sub(1);
    let misplaced = pattern
        .chars()
        .enumerate()
        .any(|(i, c)| is_wildcard(c) && i != 0 && i != last);
    if misplaced {
        return Err(PatternError::MisplacedWildcard {
            pattern: pattern.to_string(),
        });
    }
    Ok(())
}

// ────────────────────────────────────────────────────────────────────
// Component matching
// ────────────────────────────────────────────────────────────────────

/// Wildcard at one edge of a component pattern.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Edge {
    /// No wildcard: the literal must touch the edge.
    Exact,
    /// `*`: anything, including nothing.
    ZeroOrMore,
    /// `+`: at least one character.
    OneOrMore,
}

impl Edge {
    fn of(c: Option<char>) -> Self {
        match c {
            Some('*') => Self::ZeroOrMore,
            Some('+') => Self::OneOrMore,
            _ => Self::Exact,
        }
    }

    const fn accepts(self, flush: bool) -> bool {
        match self {
            Self::Exact => flush,
            Self::ZeroOrMore => true,
            Self::OneOrMore => !flush,
        }
    }

    const fn is_wildcard(self) -> bool {
        !matches!(self, Self::Exact)
    }
}

/// Returns whether `pattern` matches everything.
#[must_use]
pub fn matches_all(pattern: &str) -> bool {
    pattern.is_empty() || pattern == "*"
}

/// Matches a single component pattern against a name.
///
/// ```
/// use dep_assert_core::matches_component;
///
/// assert!(matches_component("a.*", "a"));
/// assert!(matches_component("a.*", "a.b"));
/// assert!(!matches_component("a.*", "ab"));
/// assert!(!matches_component("+", ""));
/// ```
#[must_use]
pub fn matches_component(pattern: &str, name: &str) -> bool {
    if matches_all(pattern) {
        return true;
    }
    if pattern == "+" {
        return !name.is_empty();
    }
    if let Some(stem) = pattern.strip_suffix(".*") {
        return matches_component(stem, name) || matches_component(&format!("{stem}.+"), name);
    }

    let start = Edge::of(pattern.chars().next());
    let end = Edge::of(pattern.chars().last());
    let mut literal = pattern;
    if start.is_wildcard() {
        literal = &literal[1..];
    }
    if end.is_wildcard() {
        literal = &literal[..literal.len() - 1];
    }

    let mut from = 0;
    while from <= name.len() {
        let Some(offset) = name[from..].find(literal) else {
            return false;
        };
        let pos = from + offset;
        if start.accepts(pos == 0) && end.accepts(pos + literal.len() == name.len()) {
            return true;
        }
        from = pos + name[pos..].chars().next().map_or(1, char::len_utf8);
    }
    false
}

/// Matches a class component, falling back to the outermost enclosing
/// class of a `$`-nested name.
fn matches_class_component(pattern: &str, class: &str) -> bool {
    matches_component(pattern, class)
        || class
            .split_once('$')
            .is_some_and(|(outer, _)| matches_component(pattern, outer))
}

fn component_specificity(pattern: &str) -> u32 {
    if matches_all(pattern) {
        return 1;
    }
    let mut value = 4;
    if pattern.starts_with(is_wildcard) {
        value -= 1;
    }
    if pattern.ends_with(is_wildcard) {
        value -= 1;
    }
    value
}

// ────────────────────────────────────────────────────────────────────
// LocationMatcher
// ────────────────────────────────────────────────────────────────────

/// Evaluates a [`Location`] against concrete names.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct LocationMatcher {
    location: Location,
}

impl LocationMatcher {
    /// Creates a matcher for `location`.
    #[must_use]
    pub fn new(location: Location) -> Self {
        Self { location }
    }

    /// Parses `pattern` into a matcher.
    ///
    /// # Errors
    ///
    /// Returns [`PatternError`] if the pattern is invalid.
    pub fn parse(pattern: &str) -> Result<Self, PatternError> {
        Location::parse(pattern).map(Self::new)
    }

    /// Returns the underlying location.
    #[must_use]
    pub fn location(&self) -> &Location {
        &self.location
    }

    /// Matches a package name. Patterns naming a class or method never match.
    #[must_use]
    pub fn matches_package(&self, package: &str) -> bool {
        matches_component(&self.location.package, package)
            && matches_all(&self.location.class)
            && matches_all(&self.location.method)
    }

    /// Matches a fully qualified class name such as `com.acme.Foo$Bar`.
    #[must_use]
    pub fn matches_class(&self, qualified: &str) -> bool {
        match qualified.rsplit_once('.') {
            Some((package, class)) => self.matches_package_class(package, class),
            None => {
                matches_all(&self.location.package)
                    && matches_class_component(&self.location.class, qualified)
                    && matches_all(&self.location.method)
            }
        }
    }

    /// Matches a class given its package and simple name.
    #[must_use]
    pub fn matches_package_class(&self, package: &str, class: &str) -> bool {
        matches_component(&self.location.package, package)
            && matches_class_component(&self.location.class, class)
            && matches_all(&self.location.method)
    }

    /// Matches a method of a class.
    ///
    /// Nested class names only fall back to their outer class when the
    /// method pattern matches everything.
    #[must_use]
    pub fn matches(&self, package: &str, class: &str, method: &str) -> bool {
        let class_matches = if matches_all(&self.location.method) {
            matches_class_component(&self.location.class, class)
        } else {
            matches_component(&self.location.class, class)
        };
        matches_component(&self.location.package, package)
            && class_matches
            && matches_component(&self.location.method, method)
    }

    /// Returns whether the language restriction admits `language`.
    ///
    /// A missing language on either side always matches.
    #[must_use]
    pub fn matches_language(&self, language: Option<Language>) -> bool {
        match (self.location.language, language) {
            (Some(own), Some(other)) => own == other,
            _ => true,
        }
    }

    /// How precisely this pattern pins down a location.
    ///
    /// Each component contributes 1 when it matches everything, otherwise
    /// 4 minus one per wildcard edge.
    #[must_use]
    pub fn specificity(&self) -> u32 {
        component_specificity(&self.location.package)
            + component_specificity(&self.location.class)
            + component_specificity(&self.location.method)
    }
}

impl From<Location> for LocationMatcher {
    fn from(location: Location) -> Self {
        Self::new(location)
    }
}

impl fmt::Display for LocationMatcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.location.fmt(f)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn m(pattern: &str) -> LocationMatcher {
        LocationMatcher::parse(pattern).unwrap()
    }

    // -- parsing --

    #[test]
    fn splits_package_and_class_at_uppercase() {
        let loc = Location::parse("com.acme.*Service").unwrap();
        assert_eq!(loc.package(), "com.acme");
        assert_eq!(loc.class(), "*Service");
        assert_eq!(loc.method(), "");
    }

    #[test]
    fn explicit_slash_allows_lowercase_class() {
        let loc = Location::parse("com.acme/util#parse").unwrap();
        assert_eq!(loc.package(), "com.acme");
        assert_eq!(loc.class(), "util");
        assert_eq!(loc.method(), "parse");
    }

    #[test]
    fn class_only_patterns() {
        assert_eq!(Location::parse("Cl").unwrap().package(), "");
        assert_eq!(Location::parse("Cl").unwrap().class(), "Cl");
        assert_eq!(Location::parse("/cl").unwrap().class(), "cl");
        assert_eq!(Location::parse("#me").unwrap().method(), "me");
    }

    #[test]
    fn language_prefix_is_case_insensitive() {
        let loc = Location::parse("KOTLIN:a.b").unwrap();
        assert_eq!(loc.language(), Some(Language::Kotlin));
        assert_eq!(loc.package(), "a.b");
    }

    #[test]
    fn unknown_language_rejected() {
        assert!(matches!(
            Location::parse("cobol:a"),
            Err(PatternError::UnknownLanguage { .. })
        ));
    }

    #[test]
    fn empty_pattern_rejected() {
        assert_eq!(Location::parse(""), Err(PatternError::Empty));
    }

    #[test]
    fn illegal_wildcards_rejected() {
        for bad in ["**", "*+", "+*", "++"] {
            assert!(
                matches!(
                    Location::of_package(bad),
                    Err(PatternError::IllegalWildcard { .. })
                ),
                "{bad}"
            );
        }
        assert!(matches!(
            Location::of_package("a*b"),
            Err(PatternError::MisplacedWildcard { .. })
        ));
        assert!(matches!(
            Location::parse("a.B#x*y"),
            Err(PatternError::MisplacedWildcard { .. })
        ));
    }

    #[test]
    fn pattern_round_trips_through_text() {
        for text in [
            "a.b",
            "a*.B",
            "a.*B",
            "com.acme/util#parse",
            "java:a.*",
            "Cl",
            "/cl",
            "#me",
        ] {
            let loc = Location::parse(text).unwrap();
            assert_eq!(Location::parse(&loc.pattern()).unwrap(), loc, "{text}");
        }
        assert_eq!(Location::all().pattern(), "*");
    }

    #[test]
    fn constructed_locations_round_trip() {
        let built = [
            Location::all(),
            Location::of_package("Com").unwrap(),
            Location::of_package("a.Bc.d").unwrap(),
            Location::of_package("*").unwrap(),
            Location::of_class("cl").unwrap(),
            Location::of_class("Outer$Inner").unwrap(),
            Location::of_method("run").unwrap(),
            Location::of_language(Language::Kotlin),
            Location::new(None, "a.B", "C", "m").unwrap(),
            Location::new(Some(Language::Java), "x", "*", "*").unwrap(),
        ];
        for loc in built {
            let text = loc.pattern();
            assert_eq!(Location::parse(&text).unwrap(), loc, "{text}");

            let json = serde_json::to_string(&loc).unwrap();
            let back: Location = serde_json::from_str(&json).unwrap();
            assert_eq!(back, loc, "{json}");
        }
    }

    #[test]
    fn capitalized_package_stays_a_package() {
        let loc = Location::of_package("Com").unwrap();
        assert_eq!(loc.pattern(), "Com/");

        let matcher = LocationMatcher::parse(&loc.pattern()).unwrap();
        assert!(matcher.matches_package("Com"));
        assert!(!matcher.matches_package("org"));
    }

    #[test]
    fn star_component_equals_empty_component() {
        assert_eq!(Location::parse("*").unwrap(), Location::all());
        assert_eq!(Location::parse("java:*").unwrap(), Location::of_language(Language::Java));
        assert_eq!(
            Location::parse("a.*").unwrap().package(),
            "a.*",
            "only a bare star is normalized"
        );
    }

    // -- component matching --

    #[test]
    fn matches_all_patterns() {
        assert!(matches_component("", "x"));
        assert!(matches_component("*", ""));
        assert!(matches_component("+", "x"));
        assert!(!matches_component("+", ""));
    }

    #[test]
    fn wildcard_edges() {
        assert!(matches_component("a*", "a"));
        assert!(matches_component("a*", "ab"));
        assert!(!matches_component("a+", "a"));
        assert!(matches_component("a+", "ab"));
        assert!(matches_component("*a", "ba"));
        assert!(!matches_component("+a", "a"));
        assert!(!matches_component("a", "ab"));
        assert!(matches_component("*pa*", "xpay"));
        assert!(!matches_component("*pa*", ""));
    }

    #[test]
    fn repeated_literal_checks_every_occurrence() {
        assert!(matches_component("ab+", "abxab"));
        assert!(matches_component("+ab", "abab"));
        assert!(matches_component("*ab", "abab"));
    }

    #[test]
    fn dot_star_matches_self_and_children_only() {
        assert!(matches_component("a.*", "a"));
        assert!(matches_component("a.*", "a.b"));
        assert!(matches_component("a.*", "a.b.c"));
        assert!(!matches_component("a.*", "ab"));
    }

    // -- matcher --

    #[test]
    fn package_patterns() {
        assert!(m("a.b").matches_package("a.b"));
        assert!(!m("a.b").matches_package("a.bc"));
        assert!(m("a*").matches_package("a.b"));
        assert!(!m("a.B").matches_package("a"));
    }

    #[test]
    fn class_patterns() {
        assert!(m("a*.B").matches_package_class("a", "B"));
        assert!(m("a*.B").matches_package_class("ab", "B"));
        assert!(m("a*.B").matches_package_class("a.b", "B"));
        assert!(m("a.*B").matches_package_class("a", "B"));
        assert!(m("a.*B").matches_package_class("a", "xxxB"));
        assert!(!m("a.*B").matches_package_class("a", "Bx"));
        assert!(m("Cl").matches_class("x.y.Cl"));
        assert!(m("Cl").matches_class("Cl"));
        assert!(!m("Cl").matches_package("Cl"));
    }

    #[test]
    fn inner_classes_match_outer_pattern() {
        assert!(m("Cl").matches_class("a.Cl$Inner"));
        assert!(m("a.Cl").matches("a", "Cl$Inner", ""));
        assert!(!m("a.Cl#run").matches("a", "Cl$Inner", "run"));
    }

    #[test]
    fn method_patterns() {
        assert!(m("#me").matches("a", "B", "me"));
        assert!(!m("#me").matches("a", "B", "you"));
        assert!(!m("#me").matches_class("a.B"));
        assert!(m("a.B#*").matches_class("a.B"));
    }

    #[test]
    fn language_restriction() {
        let java = m("java:a");
        assert!(java.matches_language(Some(Language::Java)));
        assert!(!java.matches_language(Some(Language::Kotlin)));
        assert!(java.matches_language(None));
        assert!(m("a").matches_language(Some(Language::Kotlin)));
    }

    #[test]
    fn specificity_prefers_literal_patterns() {
        assert_eq!(m("*").specificity(), 3);
        assert_eq!(m("a.b").specificity(), 6);
        assert_eq!(m("a.*").specificity(), 5);
        assert_eq!(m("*a*").specificity(), 4);
        assert_eq!(m("a.B").specificity(), 9);
        assert_eq!(m("a.B#run").specificity(), 12);
        assert!(m("a.b").specificity() > m("a.*").specificity());
    }
}
