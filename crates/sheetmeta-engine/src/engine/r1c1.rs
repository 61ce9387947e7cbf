//! R1C1 reference extraction from formula strings.
//!
//! Finds every cell reference in a formula written in R1C1 notation and
//! resolves it against the cell the formula lives in.
//!
//! Handles:
//! - Absolute components: `R39C4` (1-based literals)
//! - Relative components: `R[-5]C[2]` (offsets from the formula cell)
//! - Current row/column: `RC`, `R[1]C`, `RC3`
//! - Sheet qualifiers: `debt!R1C1`, `'Annual CF'!RC` (with `''` escapes)
//! - Ignores references inside string literals and inside longer identifiers

use regex::Regex;
use std::sync::OnceLock;
use tracing::trace;

use super::cell_ref::CellRef;

/// One component (row or column) of an R1C1 reference.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Axis {
    /// A bare 1-based literal, e.g. the `39` in `R39C4`.
    Absolute(i64),
    /// A bracketed offset, e.g. the `-5` in `R[-5]C`.
    Relative(i64),
    /// An empty component, meaning the formula cell's own row/column.
    Current,
}

impl Axis {
    fn parse(component: &str) -> Option<Axis> {
        if component.is_empty() {
            return Some(Axis::Current);
        }
        if let Some(inner) = component.strip_prefix('[').and_then(|s| s.strip_suffix(']')) {
            return inner.parse::<i64>().ok().map(Axis::Relative);
        }
        component.parse::<i64>().ok().map(Axis::Absolute)
    }

    /// Resolve to a 0-based index given the formula cell's 0-based index.
    pub fn resolve(self, current: i64) -> Option<i64> {
        match self {
            Axis::Absolute(n) => n.checked_sub(1),
            Axis::Relative(offset) => current.checked_add(offset),
            Axis::Current => Some(current),
        }
    }
}

/// A reference token as written in the formula.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct R1C1Ref {
    /// Sheet qualifier with quotes removed; None for an unqualified reference.
    pub sheet: Option<String>,
    pub row: Axis,
    pub col: Axis,
}

/// A reference resolved to absolute 0-based coordinates.
///
/// Coordinates are signed: a relative offset may land above the first row or
/// left of the first column, and such references are kept as written.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ResolvedRef {
    /// None means "the formula's own sheet"; the caller fills it in.
    pub sheet: Option<String>,
    pub row: i64,
    pub col: i64,
}

/// Extract every R1C1 reference token from a formula, in order of appearance.
pub fn extract_references(formula: &str) -> Vec<R1C1Ref> {
    let masked = mask_string_literals(formula);
    let mut refs = Vec::new();

    for caps in reference_re().captures_iter(&masked) {
        let Some(whole) = caps.get(0) else {
            continue;
        };
        // `SOURCE` or `ARC` must not yield an `RC` reference.
        if masked[..whole.start()].chars().next_back().is_some_and(is_identifier_char) {
            continue;
        }
        if masked[whole.end()..].chars().next().is_some_and(|c| is_identifier_char(c) || c == '(') {
            continue;
        }

        let (Some(row), Some(col)) = (Axis::parse(&caps["row"]), Axis::parse(&caps["col"])) else {
            continue;
        };
        let sheet = caps.name("sheet").map(|m| unquote_sheet(m.as_str()));
        refs.push(R1C1Ref { sheet, row, col });
    }

    refs
}

/// Extract and resolve every reference in `formula`, relative to `origin`.
///
/// An origin outside the `i64` range resolves nothing.
pub fn resolve_references(formula: &str, origin: CellRef) -> Vec<ResolvedRef> {
    let (Ok(current_row), Ok(current_col)) = (i64::try_from(origin.row), i64::try_from(origin.col))
    else {
        return Vec::new();
    };

    extract_references(formula)
        .into_iter()
        .filter_map(|r| {
            let row = r.row.resolve(current_row)?;
            let col = r.col.resolve(current_col)?;
            trace!(origin = %origin, sheet = ?r.sheet, row, col, "resolved reference");
            Some(ResolvedRef { sheet: r.sheet, row, col })
        })
        .collect()
}

fn reference_re() -> &'static Regex {
    static REFERENCE_RE: OnceLock<Regex> = OnceLock::new();
    REFERENCE_RE.get_or_init(|| {
        Regex::new(
            r"(?:(?P<sheet>'(?:[^']|'')+'|\w+)!)?R(?P<row>\[-?[0-9]+\]|[0-9]*)C(?P<col>\[-?[0-9]+\]|[0-9]*)",
        )
        .expect("R1C1 reference regex must compile")
    })
}

fn is_identifier_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_' || c == '.'
}

fn unquote_sheet(raw: &str) -> String {
    match raw.strip_prefix('\'').and_then(|s| s.strip_suffix('\'')) {
        Some(inner) => inner.replace("''", "'"),
        None => raw.to_string(),
    }
}

/// Blank out the contents of `"..."` literals, keeping byte offsets intact.
fn mask_string_literals(formula: &str) -> String {
    let mut out = String::with_capacity(formula.len());
    let mut in_string = false;

    for ch in formula.chars() {
        if ch == '"' {
            // Excel escapes a quote inside a literal as `""`, which toggles
            // out and straight back in.
            in_string = !in_string;
            out.push('"');
        } else if in_string {
            for _ in 0..ch.len_utf8() {
                out.push(' ');
            }
        } else {
            out.push(ch);
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn resolved(sheet: Option<&str>, row: i64, col: i64) -> ResolvedRef {
        ResolvedRef { sheet: sheet.map(str::to_string), row, col }
    }

    #[test]
    fn test_relative_absolute_and_current_components() {
        let origin = CellRef::new(10, 5);
        assert_eq!(resolve_references("=R[-5]C", origin), vec![resolved(None, 5, 5)]);
        assert_eq!(resolve_references("=R39C4", origin), vec![resolved(None, 38, 3)]);
        assert_eq!(resolve_references("=RC", origin), vec![resolved(None, 10, 5)]);
    }

    #[test]
    fn test_finds_every_reference_in_a_formula() {
        let formula = "=-(scenarios!R39C4+scenarios!R40C4)*debt!R[-5]C*time_macro!R[7]C[-1]\
                       +'Annual CF'!RC * 'Time&Macro'!R16C-RC*R[-15]C3";
        let refs = resolve_references(formula, CellRef::new(10, 5));
        assert_eq!(
            refs,
            vec![
                resolved(Some("scenarios"), 38, 3),
                resolved(Some("scenarios"), 39, 3),
                resolved(Some("debt"), 5, 5),
                resolved(Some("time_macro"), 17, 4),
                resolved(Some("Annual CF"), 10, 5),
                resolved(Some("Time&Macro"), 15, 5),
                resolved(None, 10, 5),
                resolved(None, -5, 2),
            ]
        );
    }

    #[test]
    fn test_formula_without_references_is_empty() {
        assert!(extract_references("=1+2*3").is_empty());
        assert!(extract_references("").is_empty());
        assert!(extract_references("Revenue").is_empty());
    }

    #[test]
    fn test_ignores_identifiers_containing_rc() {
        assert!(extract_references("=SOURCE(1)").is_empty());
        assert!(extract_references("=ARC").is_empty());
        assert!(extract_references("=RCX(1)").is_empty());
        assert_eq!(extract_references("=ROUND(RC[1],2)").len(), 1);
    }

    #[test]
    fn test_ignores_references_inside_string_literals() {
        let refs = extract_references("=IF(RC[1]>0,\"R1C1\",\"a \"\"RC\"\" b\")");
        assert_eq!(
            refs,
            vec![R1C1Ref { sheet: None, row: Axis::Current, col: Axis::Relative(1) }]
        );
    }

    #[test]
    fn test_quoted_sheet_with_escaped_apostrophe() {
        let refs = extract_references("='Bob''s Plan'!R2C2");
        assert_eq!(refs[0].sheet.as_deref(), Some("Bob's Plan"));
        assert_eq!(refs[0].row, Axis::Absolute(2));
    }

    #[test]
    fn test_unparseable_offsets_are_skipped() {
        let refs = resolve_references("=R[99999999999999999999]C+R1C1", CellRef::new(0, 0));
        assert_eq!(refs, vec![resolved(None, 0, 0)]);
    }

    #[test]
    fn test_origin_beyond_i64_resolves_nothing() {
        assert!(resolve_references("=R1C1", CellRef::new(usize::MAX, 0)).is_empty());
        assert_eq!(
            resolve_references("=R1C1", CellRef::new(i64::MAX as usize, 0)),
            vec![resolved(None, 0, 0)]
        );
    }

    #[test]
    fn test_range_endpoints_are_separate_references() {
        let refs = resolve_references("=SUM(R1C1:R3C1)", CellRef::new(5, 5));
        assert_eq!(refs, vec![resolved(None, 0, 0), resolved(None, 2, 0)]);
    }
}
