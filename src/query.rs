//! Query pattern parsing and matching.
//!
//! Follows the import-path handling in
//! `semantic::resolver::{parse_import_path, is_wildcard_import}`, which
//! already distinguishes a bare qualified name from one suffixed with
//! `::*`/`::**`; this module generalizes that into a standalone pattern
//! language usable by both the delete and query-style commands.

use thiserror::Error;

/// One of the three pattern shapes a query string can take.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PatternKind {
    /// `base` — matches exactly the element with that id.
    Exact,
    /// `base::*` — matches elements whose `parent_id == base`.
    Direct,
    /// `base::**` — matches `base` itself and every descendant.
    Recursive,
}

/// A single parsed query pattern, chainable into a list (`--delete` flags
/// compose by matching if *any* link matches).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct QueryPattern {
    pub base: String,
    pub kind: PatternKind,
    next: Option<Box<QueryPattern>>,
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum QueryParseError {
    #[error("query pattern is empty")]
    Empty,
    #[error("query pattern has an empty base after stripping '{0}'")]
    EmptyBase(&'static str),
}

impl QueryPattern {
    /// Parse a single pattern string, stripping a trailing `::*` or `::**`.
    pub fn parse(raw: &str) -> Result<Self, QueryParseError> {
        if raw.is_empty() {
            return Err(QueryParseError::Empty);
        }
        let (base, kind, suffix) = if let Some(stripped) = raw.strip_suffix("::**") {
            (stripped, PatternKind::Recursive, "::**")
        } else if let Some(stripped) = raw.strip_suffix("::*") {
            (stripped, PatternKind::Direct, "::*")
        } else {
            (raw, PatternKind::Exact, "")
        };
        if base.is_empty() {
            return Err(QueryParseError::EmptyBase(suffix));
        }
        Ok(Self {
            base: base.to_string(),
            kind,
            next: None,
        })
    }

    /// Parse a chain of patterns (one `--delete`-style flag per string),
    /// composing them as a cons-list. Returns `None` for an empty slice.
    pub fn parse_chain(raws: &[&str]) -> Result<Option<Self>, QueryParseError> {
        let mut head: Option<QueryPattern> = None;
        for raw in raws.iter().rev() {
            let mut pattern = Self::parse(raw)?;
            pattern.next = head.take().map(Box::new);
            head = Some(pattern);
        }
        Ok(head)
    }

    /// Append another pattern to the tail of this chain.
    pub fn chain(mut self, next: QueryPattern) -> Self {
        match &mut self.next {
            Some(tail) => {
                let prev = std::mem::replace(tail.as_mut(), next);
                tail.next = Some(Box::new(prev));
            }
            None => self.next = Some(Box::new(next)),
        }
        self
    }

    /// Every link in the chain, head first.
    pub fn iter(&self) -> impl Iterator<Item = &QueryPattern> {
        std::iter::successors(Some(self), |p| p.next.as_deref())
    }

    /// Whether `id` matches this single pattern (not its chain tail).
    fn matches_one(&self, id: &str) -> bool {
        match self.kind {
            PatternKind::Exact => id == self.base,
            PatternKind::Direct => false, // handled at SemanticModel level (needs parent_id)
            PatternKind::Recursive => {
                id == self.base || id.strip_prefix(&self.base).is_some_and(|rest| {
                    rest.starts_with("::")
                })
            }
        }
    }

    /// Whether `id` matches this pattern or any link in its chain.
    /// `Direct` patterns can only be evaluated with parent information, so
    /// this is the id-only subset of matching; see
    /// [`crate::modifier::delete::delete`] for the full algorithm.
    pub fn matches(&self, id: &str) -> bool {
        self.iter().any(|p| p.matches_one(id))
    }
}
