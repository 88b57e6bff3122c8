//! Fact normalization
//!
//! The single boundary between free text and canonical facts. Scene relation
//! descriptions and model claims both pass through here; everything
//! downstream compares `Fact` values only.
//!
//! A string that already is a canonical token (`PERP(OA,PA)`) is parsed as
//! such and only has its element names mapped through the identifier table.
//! Everything else goes through the rules below, first match wins:
//! 1. perpendicular wording or symbol with two line references -> `PERP`
//! 2. parallel wording or symbol with two line references -> `PARA`
//! 3. tangent wording with a line and a point reference -> `TANGENT`
//! 4. a degree measurement attached to an element -> `MEASURE`
//!
//! Claims that match none of these may still be classified as an equality or
//! a straight-line length claim for the error detectors; they never enter a
//! fact set.

use std::collections::HashSet;
use std::sync::OnceLock;

use regex::Regex;

use crate::fact::{canonical_decimal, Fact, FactSet};
use crate::index::{canonical_name, ElementKind, RefPrefix, SceneIndex};

const PERPENDICULAR_WORDS: &[&str] = &["perpendicular", "perp", "perpendicularity", "orthogonal"];
const PARALLEL_WORDS: &[&str] = &["parallel", "para"];
const TANGENT_WORDS: &[&str] = &["tangent", "tangency"];
const DEGREE_WORDS: &[&str] = &["deg", "degree", "degrees"];
const MEASURE_WORDS: &[&str] = &["measure", "measures", "measured"];
const EQUALITY_WORDS: &[&str] = &["=", "equal", "equals", "congruent"];
const LENGTH_WORDS: &[&str] = &["length", "chord", "long"];

const STOPWORDS: &[&str] = &[
    "an", "the", "is", "are", "was", "be", "been", "being", "to", "of", "and", "or", "at", "on", "in",
    "with", "by", "from", "for", "as", "so", "since", "because", "given", "thus", "therefore", "hence",
    "then", "we", "it", "its", "this", "that", "these", "those", "has", "have", "had", "which", "each",
    "other", "both", "line", "lines", "segment", "segments", "ray", "rays", "point", "points", "side",
    "sides", "m", "meet", "meets", "form", "forms", "makes", "make", "mark", "marked", "marks", "shown",
    "figure", "diagram", "not", "no", "all", "any", "can", "if", "but", "our", "via", "per", "due", "sum",
    "cm", "mm", "units", "unit", "right", "angles", "arcs", "circles", "radius", "through", "into", "one",
    "two", "let", "use", "see", "yes", "how", "why", "who", "out", "up", "do", "my", "me", "he", "us",
    "am", "go", "get", "now", "may", "say", "new", "set", "put", "own", "too", "far", "off", "lie",
    "cos", "sin", "tan", "rad", "x",
];

/// A claim after normalization
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Claim {
    /// A canonical relation or measurement
    Fact(Fact),
    /// Two elements asserted equal (sorted canonical names)
    Equality(String, String),
    /// A straight-line length asserted for an element
    Length { element: String },
    /// Nothing geometric could be recognized
    Unrecognized,
}

#[derive(Debug, Clone)]
struct ElementRef {
    name: String,
    kind: Option<ElementKind>,
    position: usize,
}

fn ident_shape_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"^(?:[a-z]{1,3}|[a-z][a-z0-9]*[_0-9][a-z0-9_]*)$").expect("valid regex")
    })
}

fn canonical_arg_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^[A-Za-z0-9_]+$").expect("valid regex"))
}

fn right_angle_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?i)right\s+angle").expect("valid regex"))
}

fn punctuation_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r#"[(),;:\[\]{}"!?/\\]"#).expect("valid regex"))
}

fn glued_unit_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(^|\s)(-?\d+(?:\.\d+)?)([A-Za-z]+)").expect("valid regex"))
}

fn stopwords() -> &'static HashSet<&'static str> {
    static SET: OnceLock<HashSet<&'static str>> = OnceLock::new();
    SET.get_or_init(|| {
        STOPWORDS
            .iter()
            .chain(PERPENDICULAR_WORDS)
            .chain(PARALLEL_WORDS)
            .chain(TANGENT_WORDS)
            .chain(DEGREE_WORDS)
            .chain(MEASURE_WORDS)
            .chain(EQUALITY_WORDS)
            .chain(LENGTH_WORDS)
            .copied()
            .collect()
    })
}

/// Map relation symbols to words and collapse whitespace. Case is kept so
/// upper-case element names can be told apart from English words.
fn fold(raw: &str) -> String {
    const REPLACEMENTS: &[(&str, &str)] = &[
        ("⊥", " perpendicular "),
        ("⟂", " perpendicular "),
        ("∥", " parallel "),
        ("||", " parallel "),
        ("//", " parallel "),
        ("∠", " angle "),
        ("⌒", " arc "),
        ("°", " deg "),
        ("º", " deg "),
        ("≅", " congruent "),
        ("≌", " congruent "),
        ("@", " at "),
        ("=", " = "),
    ];

    let mut text = right_angle_re().replace_all(raw.trim(), " perpendicular ").into_owned();
    for (from, to) in REPLACEMENTS {
        text = text.replace(from, to);
    }
    let text = punctuation_re().replace_all(&text, " ");
    let text = glued_unit_re().replace_all(&text, "$1$2 $3");
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Folded tokens, lower-cased, with whether each was written in upper case
struct Tokens {
    words: Vec<String>,
    upper: Vec<bool>,
}

impl Tokens {
    fn new(folded: &str) -> Self {
        let cased = tokenize(folded);
        Self {
            words: cased.iter().map(|t| t.to_lowercase()).collect(),
            upper: cased.iter().map(|t| is_upper_case(t)).collect(),
        }
    }

    fn as_strs(&self) -> Vec<&str> {
        self.words.iter().map(String::as_str).collect()
    }
}

fn tokenize(folded: &str) -> Vec<&str> {
    folded
        .split_whitespace()
        .map(|t| t.trim_end_matches('.').trim_matches('\''))
        .filter(|t| !t.is_empty())
        .collect()
}

fn is_number(token: &str) -> bool {
    token.chars().any(|c| c.is_ascii_digit()) && canonical_decimal(token).is_some()
}

fn contains_any(tokens: &[&str], words: &[&str]) -> bool {
    tokens.iter().any(|t| words.contains(t))
}

fn is_single_letter(token: &str) -> bool {
    token.len() == 1 && token.chars().all(|c| c.is_ascii_alphabetic())
}

fn is_upper_case(token: &str) -> bool {
    token.chars().any(char::is_alphabetic) && !token.chars().any(char::is_lowercase)
}

/// Lower-case "a" is the article unless it follows "at"
fn is_article(tokens: &[&str], upper: &[bool], i: usize) -> bool {
    tokens[i] == "a" && !upper[i] && (i == 0 || tokens[i - 1] != "at")
}

/// Normalizes raw claims into canonical facts, optionally through a scene's
/// identifier table
#[derive(Debug, Clone, Copy, Default)]
pub struct Normalizer<'a> {
    index: Option<&'a SceneIndex>,
}

impl<'a> Normalizer<'a> {
    /// Normalizer without an identifier table; references keep their own names
    pub fn new() -> Self {
        Self { index: None }
    }

    /// Normalizer that maps references through a scene's identifier table
    pub fn with_index(index: &'a SceneIndex) -> Self {
        Self { index: Some(index) }
    }

    pub fn index(&self) -> Option<&'a SceneIndex> {
        self.index
    }

    /// Canonical name for an element id
    pub fn canonical_element(&self, id: &str) -> String {
        self.index
            .and_then(|idx| idx.resolve(id))
            .map(str::to_string)
            .unwrap_or_else(|| canonical_name(id))
    }

    /// Kind of a canonical element, when the table knows it
    pub fn element_kind(&self, name: &str) -> Option<ElementKind> {
        self.index.and_then(|idx| idx.kind(name))
    }

    /// Normalize a raw string into a fact, or `None` if it encodes no
    /// recognizable relation
    pub fn normalize(&self, raw: &str) -> Option<Fact> {
        match self.classify(raw) {
            Claim::Fact(fact) => Some(fact),
            _ => None,
        }
    }

    /// Normalize many claims into a fact set; unrecognized strings are dropped
    /// and logged
    pub fn normalize_all<I, S>(&self, claims: I) -> FactSet
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut facts = FactSet::new();
        for claim in claims {
            let raw = claim.as_ref();
            match self.normalize(raw) {
                Some(fact) => {
                    facts.insert(fact);
                }
                None => tracing::debug!(claim = raw, "dropping unrecognized claim"),
            }
        }
        facts
    }

    /// Classify a raw claim
    pub fn classify(&self, raw: &str) -> Claim {
        if let Some(fact) = self.canonical_token(raw) {
            return Claim::Fact(fact);
        }

        let folded = fold(raw);
        let parsed = Tokens::new(&folded);
        let tokens = parsed.as_strs();
        let refs = self.element_refs(&tokens, &parsed.upper);

        if contains_any(&tokens, PERPENDICULAR_WORDS) {
            if let Some((a, b)) = line_pair(&refs) {
                return Claim::Fact(Fact::perpendicular(a, b));
            }
        }

        if contains_any(&tokens, PARALLEL_WORDS) {
            if let Some((a, b)) = line_pair(&refs) {
                return Claim::Fact(Fact::parallel(a, b));
            }
        }

        if contains_any(&tokens, TANGENT_WORDS) {
            if let Some((line, point)) = line_and_point(&tokens, &refs) {
                return Claim::Fact(Fact::tangent(line, point));
            }
        }

        if let Some(fact) = measurement(&tokens, &refs) {
            return Claim::Fact(fact);
        }

        let has_number = tokens.iter().any(|t| is_number(t));

        if !has_number && contains_any(&tokens, EQUALITY_WORDS) {
            let names = distinct_names(refs.iter());
            if names.len() >= 2 {
                let (a, b) = if names[0] <= names[1] {
                    (names[0], names[1])
                } else {
                    (names[1], names[0])
                };
                return Claim::Equality(a.to_string(), b.to_string());
            }
        }

        if has_number
            && (contains_any(&tokens, &["="]) || contains_any(&tokens, LENGTH_WORDS))
        {
            if let Some(r) = refs.first() {
                return Claim::Length {
                    element: r.name.clone(),
                };
            }
        }

        Claim::Unrecognized
    }

    /// A raw string that already is a fact token, with its element names
    /// mapped through the identifier table
    fn canonical_token(&self, raw: &str) -> Option<Fact> {
        let fact: Fact = raw.trim().parse().ok()?;
        if !fact.elements().iter().all(|e| canonical_arg_re().is_match(e)) {
            return None;
        }
        match fact {
            Fact::Perpendicular(a, b) => Some(Fact::perpendicular(
                &self.canonical_element(&a),
                &self.canonical_element(&b),
            )),
            Fact::Parallel(a, b) => Some(Fact::parallel(
                &self.canonical_element(&a),
                &self.canonical_element(&b),
            )),
            Fact::Tangent { line, point } => Some(Fact::tangent(
                &self.canonical_element(&line),
                &self.canonical_element(&point),
            )),
            Fact::Measure { element, value } => Fact::measure(&self.canonical_element(&element), &value),
        }
    }

    /// Whether a lower-cased token names an element. An upper-case token
    /// that is also an English word ("AT", "M") is a name when the table
    /// resolves it, or when there is no table to ask.
    fn is_reference_token(&self, token: &str, upper: bool) -> bool {
        if RefPrefix::from_word(token).is_some() {
            return false;
        }
        let resolved = self.index.map(|idx| idx.resolve(token).is_some());
        if stopwords().contains(token) {
            return upper && resolved.unwrap_or_else(|| ident_shape_re().is_match(token));
        }
        ident_shape_re().is_match(token) || resolved.unwrap_or(false)
    }

    fn plain_ref(&self, token: &str, position: usize) -> ElementRef {
        match self.index.and_then(|idx| idx.resolve(token)) {
            Some(name) => ElementRef {
                name: name.to_string(),
                kind: self.element_kind(name),
                position,
            },
            None => ElementRef {
                name: canonical_name(token),
                kind: None,
                position,
            },
        }
    }

    fn prefixed_ref(&self, prefix: RefPrefix, token: &str, position: usize) -> ElementRef {
        match self.index.and_then(|idx| idx.resolve_prefixed(prefix, token)) {
            Some(name) => ElementRef {
                name: name.to_string(),
                kind: self.element_kind(name),
                position,
            },
            None => ElementRef {
                name: canonical_name(token),
                kind: Some(prefix.implied_kind()),
                position,
            },
        }
    }

    fn element_refs(&self, tokens: &[&str], upper: &[bool]) -> Vec<ElementRef> {
        let mut refs = Vec::new();
        let mut i = 0;
        while i < tokens.len() {
            let token = tokens[i];

            if let Some(prefix) = RefPrefix::from_word(token) {
                // "angle p a b" spells out three vertices
                if prefix == RefPrefix::Angle
                    && i + 3 < tokens.len()
                    && tokens[i + 1..i + 4].iter().all(|t| is_single_letter(t))
                {
                    let joined: String = tokens[i + 1..i + 4].concat();
                    let joined_upper = upper[i + 1..i + 4].iter().all(|u| *u);
                    if self.is_reference_token(&joined, joined_upper) {
                        refs.push(self.prefixed_ref(prefix, &joined, i));
                        i += 4;
                        continue;
                    }
                }
                if let Some(next) = tokens.get(i + 1) {
                    if self.is_reference_token(next, upper[i + 1]) {
                        refs.push(self.prefixed_ref(prefix, next, i));
                        i += 2;
                        continue;
                    }
                }
                i += 1;
                continue;
            }

            if self.is_reference_token(token, upper[i]) && !is_article(tokens, upper, i) {
                refs.push(self.plain_ref(token, i));
            }
            i += 1;
        }
        refs
    }
}

/// Normalize without an identifier table
pub fn normalize_fact(raw: &str) -> Option<Fact> {
    Normalizer::new().normalize(raw)
}

fn distinct_names<'r>(refs: impl Iterator<Item = &'r ElementRef>) -> Vec<&'r str> {
    let mut names: Vec<&str> = Vec::new();
    for r in refs {
        if !names.contains(&r.name.as_str()) {
            names.push(&r.name);
        }
    }
    names
}

/// Unresolved single letters read as points, never as lines
fn is_line_like(r: &ElementRef) -> bool {
    match r.kind {
        Some(kind) => kind == ElementKind::Line,
        None => r.name.chars().count() > 1,
    }
}

fn is_point_like(r: &ElementRef) -> bool {
    matches!(r.kind, None | Some(ElementKind::Point))
}

fn line_pair(refs: &[ElementRef]) -> Option<(&str, &str)> {
    let names = distinct_names(refs.iter().filter(|r| is_line_like(r)));
    match names.as_slice() {
        [a, b, ..] => Some((*a, *b)),
        _ => None,
    }
}

fn line_and_point<'r>(tokens: &[&str], refs: &'r [ElementRef]) -> Option<(&'r str, &'r str)> {
    let line = refs.iter().find(|r| is_line_like(r))?;
    let candidates = || {
        refs.iter()
            .filter(move |r| is_point_like(r) && r.name != line.name)
    };
    let at_position = tokens
        .iter()
        .enumerate()
        .position(|(i, t)| *t == "at" && refs.iter().all(|r| r.position != i));
    let point = at_position
        .and_then(|at| candidates().find(|r| r.position > at))
        .or_else(|| candidates().last())?;
    Some((line.name.as_str(), point.name.as_str()))
}

fn measurement(tokens: &[&str], refs: &[ElementRef]) -> Option<Fact> {
    let element = refs
        .iter()
        .find(|r| matches!(r.kind, Some(ElementKind::Angle) | Some(ElementKind::Arc)))
        .or_else(|| refs.first())?;
    let angular = matches!(element.kind, Some(ElementKind::Angle) | Some(ElementKind::Arc));
    let explicit = contains_any(tokens, MEASURE_WORDS);

    let degree_value = tokens.windows(2).find_map(|pair| {
        (is_number(pair[0]) && DEGREE_WORDS.contains(&pair[1])).then_some(pair[0])
    });
    let value = match degree_value {
        Some(v) => v,
        None if angular || explicit => *tokens.iter().find(|t| is_number(t))?,
        None => return None,
    };
    Fact::measure(&element.name, value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::SceneAnnotation;

    fn tangent_index() -> SceneIndex {
        let scene = SceneAnnotation::from_json_str(
            r#"{
            "points": [{"id": "O"}, {"id": "A"}, {"id": "P"}, {"id": "B"}],
            "lines": [{"id": "OA", "p1": "O", "p2": "A"}, {"id": "PA", "p1": "P", "p2": "A"}, {"id": "AB", "p1": "A", "p2": "B"}],
            "circles": [{"id": "c1", "center": "O", "radius": 80}],
            "symbols": [{"id": "ang_PAB", "type": "angle_arc"}],
            "relations": [{"type": "sym2geo", "symbol_id": "ang_PAB", "target_ids": ["PA", "AB", "A"]}]
        }"#,
        )
        .unwrap();
        SceneIndex::from_scene(&scene)
    }

    fn index_of(json: &str) -> SceneIndex {
        SceneIndex::from_scene(&SceneAnnotation::from_json_str(json).unwrap())
    }

    /// Element names that double as English words
    fn word_named_index() -> SceneIndex {
        index_of(
            r#"{
            "points": [{"id": "O"}, {"id": "M"}, {"id": "P"}, {"id": "A"}, {"id": "T"}, {"id": "X"}],
            "lines": [
                {"id": "PM", "p1": "P", "p2": "M"},
                {"id": "AT", "p1": "A", "p2": "T"},
                {"id": "OT", "p1": "O", "p2": "T"}
            ],
            "symbols": [{"id": "tg", "type": "tangent_mark"}, {"id": "rt", "type": "perpendicular"}],
            "relations": [
                {"type": "sym2geo", "symbol_id": "tg", "target_ids": ["PM", "M"]},
                {"type": "sym2geo", "symbol_id": "rt", "target_ids": ["AT", "OT"]}
            ]
        }"#,
        )
    }

    #[test]
    fn test_perpendicular_forms() {
        let n = Normalizer::new();
        let expected = Some(Fact::perpendicular("OA", "PA"));
        assert_eq!(n.normalize("OA ⊥ PA"), expected);
        assert_eq!(n.normalize("PA ⟂ OA"), expected);
        assert_eq!(n.normalize("  line PA is perpendicular to   line OA. "), expected);
        assert_eq!(n.normalize("OA and PA form a right angle"), expected);
        assert_eq!(n.normalize("PERP(OA,PA)"), expected);
    }

    #[test]
    fn test_parallel_forms() {
        let n = Normalizer::new();
        let expected = Some(Fact::parallel("AB", "CD"));
        assert_eq!(n.normalize("AB ∥ CD"), expected);
        assert_eq!(n.normalize("CD || AB"), expected);
        assert_eq!(n.normalize("AB is parallel to CD"), expected);
    }

    #[test]
    fn test_tangent_forms() {
        let n = Normalizer::new();
        let expected = Some(Fact::tangent("PA", "A"));
        assert_eq!(n.normalize("PA tangent@ A"), expected);
        assert_eq!(n.normalize("PA is tangent to circle O at A"), expected);
        assert_eq!(n.normalize("TANGENT(PA,A)"), expected);
    }

    #[test]
    fn test_measure_forms() {
        let n = Normalizer::new();
        let expected = Fact::measure("PAB", "31");
        assert_eq!(n.normalize("∠PAB = 31°"), expected);
        assert_eq!(n.normalize("angle P A B = 31 degrees"), expected);
        assert_eq!(n.normalize("m∠PAB=31.0°"), expected);
        assert_eq!(n.normalize("PAB = 31"), None);
    }

    #[test]
    fn test_references_through_index() {
        let index = tangent_index();
        let n = Normalizer::with_index(&index);
        assert_eq!(n.normalize("AO ⊥ AP"), Some(Fact::perpendicular("OA", "PA")));
        assert_eq!(n.normalize("∠BAP = 31°"), Fact::measure("ANG_PAB", "31"));
        assert_eq!(n.normalize("angle PAB measures 31"), Fact::measure("ANG_PAB", "31"));
        assert_eq!(
            n.normalize("line AP touches circle O, tangent at A"),
            Some(Fact::tangent("PA", "A"))
        );
    }

    #[test]
    fn test_unrecognized() {
        let n = Normalizer::new();
        assert_eq!(n.normalize("triangle looks isosceles"), None);
        assert_eq!(n.normalize("right angle at A"), None);
        assert_eq!(n.normalize(""), None);
        assert_eq!(n.classify("the answer is 30"), Claim::Unrecognized);
    }

    #[test]
    fn test_equality_and_length_claims() {
        let index = tangent_index();
        let n = Normalizer::with_index(&index);
        assert_eq!(n.classify("PA = AB"), Claim::Equality("AB".to_string(), "PA".to_string()));
        assert_eq!(
            n.classify("OA is congruent to PA"),
            Claim::Equality("OA".to_string(), "PA".to_string())
        );
        assert_eq!(
            n.classify("chord AB = 5"),
            Claim::Length { element: "AB".to_string() }
        );
    }

    #[test]
    fn test_normalize_all_drops_unrecognized() {
        let n = Normalizer::new();
        let facts = n.normalize_all(["OA ⊥ PA", "PA ⊥ OA", "looks equal", "∠PAB = 31°"]);
        assert_eq!(facts.len(), 2);
    }

    #[test]
    fn test_idempotent_on_own_output() {
        let index = tangent_index();
        let n = Normalizer::with_index(&index);
        for raw in ["AO ⊥ AP", "PA tangent@ A", "∠BAP = 31°", "AB ∥ OA"] {
            let once = n.normalize(raw).unwrap();
            assert_eq!(n.normalize(&once.to_string()), Some(once));
        }
    }

    #[test]
    fn test_word_named_elements_resolve() {
        let index = word_named_index();
        let n = Normalizer::with_index(&index);
        assert_eq!(n.normalize("PM is tangent at M"), Some(Fact::tangent("PM", "M")));
        assert_eq!(n.normalize("PM tangent @ M"), Some(Fact::tangent("PM", "M")));
        assert_eq!(n.normalize("AT ⊥ OT"), Some(Fact::perpendicular("AT", "OT")));
        assert_eq!(n.normalize("line AT is perpendicular to line OT"), Some(Fact::perpendicular("AT", "OT")));
        assert_eq!(n.normalize("AT is tangent at T"), Some(Fact::tangent("AT", "T")));
        assert_eq!(n.normalize("∠X = 40°"), Fact::measure("X", "40"));
    }

    #[test]
    fn test_lower_case_words_stay_words() {
        let index = word_named_index();
        let n = Normalizer::with_index(&index);
        // "at" and "m" are not the line AT or the point M here
        assert_eq!(n.normalize("PM is tangent to the circle at m"), None);
        assert_eq!(n.normalize("m∠OTA = 30°"), Fact::measure("OTA", "30"));
    }

    #[test]
    fn test_canonical_tokens_parse_directly() {
        let index = word_named_index();
        let n = Normalizer::with_index(&index);
        for token in ["PERP(AT,OT)", "TANGENT(PM,M)", "PARA(AT,PM)", "MEASURE(X,12.5)"] {
            let fact: Fact = token.parse().unwrap();
            assert_eq!(n.normalize(token), Some(fact));
        }
        assert_eq!(n.normalize(" PERP(TA,TO) "), Some(Fact::perpendicular("AT", "OT")));
        assert_eq!(Normalizer::new().normalize("PERP(AT,OT)"), Some(Fact::perpendicular("AT", "OT")));
        assert_eq!(n.normalize("PERP(A T,OT)"), None);
    }

    #[test]
    fn test_article_is_not_point_a() {
        let n = Normalizer::new();
        assert_eq!(n.normalize("PA is a tangent line"), None);
        assert_eq!(n.normalize("PA is a tangent at B"), Some(Fact::tangent("PA", "B")));
        assert_eq!(n.normalize("pa is tangent at a"), Some(Fact::tangent("PA", "A")));
        assert_eq!(n.normalize("PA tangent@a"), Some(Fact::tangent("PA", "A")));
        assert_eq!(n.normalize("A tangent line PA touches at A"), Some(Fact::tangent("PA", "A")));
    }
}
