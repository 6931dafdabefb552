//! An ordered table of rules where the first match wins
use crate::{
    rules::Rule,
    window::WindowDescriptor,
    Error, Result,
};
use tracing::{trace, warn};

/// The result of walking a [RuleTable] for a given window.
#[derive(Debug, Clone, Copy)]
pub enum Match<'a> {
    /// The first rule whose predicates all held
    Rule {
        /// The position of the rule within the table
        index: usize,
        /// The matched rule
        rule: &'a Rule,
    },
    /// No rule in the table matched
    NoMatch,
}

impl<'a> Match<'a> {
    /// The index of the matched rule (if there was one)
    pub fn index(&self) -> Option<usize> {
        match self {
            Self::Rule { index, .. } => Some(*index),
            Self::NoMatch => None,
        }
    }
}

/// An ordered sequence of [Rule]s.
///
/// Evaluation order is fixed: rules are tried in the order they were provided and the first rule
/// whose predicates all hold is selected. A well formed table ends in a wildcard rule so that
/// every window is matched by something.
#[derive(Debug, Default)]
pub struct RuleTable {
    rules: Vec<Rule>,
}

impl RuleTable {
    /// Create a new table without checking for a trailing catch-all rule.
    ///
    /// Windows that fall through every rule are treated as unmanaged at runtime with a
    /// diagnostic reported for each one.
    pub fn new(rules: Vec<Rule>) -> Self {
        Self { rules }
    }

    /// Create a new table, checking that the final rule matches every window.
    ///
    /// # Errors
    /// Returns [Error::EmptyRuleTable] if no rules are provided and [Error::MissingCatchAll] if
    /// the final rule is not a wildcard.
    pub fn try_new(rules: Vec<Rule>) -> Result<Self> {
        let t = Self::new(rules);
        t.check_catch_all()?;

        Ok(t)
    }

    pub(crate) fn check_catch_all(&self) -> Result<()> {
        match self.rules.last() {
            None => Err(Error::EmptyRuleTable),
            Some(r) if !r.is_wildcard() => Err(Error::MissingCatchAll {
                n_rules: self.rules.len(),
            }),
            Some(_) => Ok(()),
        }
    }

    /// Whether the final rule in this table matches every window.
    pub fn has_catch_all(&self) -> bool {
        self.check_catch_all().is_ok()
    }

    /// The number of rules in this table.
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    /// Whether this table contains no rules.
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// The rule at the given position (if there is one).
    pub fn get(&self, index: usize) -> Option<&Rule> {
        self.rules.get(index)
    }

    /// Iterate over the rules of this table in evaluation order.
    pub fn iter(&self) -> impl Iterator<Item = &Rule> {
        self.rules.iter()
    }

    /// Find the first rule matching `w`.
    ///
    /// A predicate that returns an error is treated as not matching: the error is logged, pushed
    /// onto `diagnostics` as an [Error::PredicateEvaluation] and the walk continues with the next
    /// rule.
    pub fn find_match(&self, w: &WindowDescriptor, diagnostics: &mut Vec<Error>) -> Match<'_> {
        for (index, rule) in self.rules.iter().enumerate() {
            match rule.matches(w) {
                Ok(true) => {
                    trace!(handle = %w.handle, index, name = ?rule.name, "rule matched");
                    return Match::Rule { index, rule };
                }

                Ok(false) => (),

                Err(e) => {
                    warn!(handle = %w.handle, index, name = ?rule.name, error = %e, "predicate failed: treating as no match");
                    diagnostics.push(Error::PredicateEvaluation {
                        rule: index,
                        handle: w.handle,
                        source: Box::new(e),
                    });
                }
            }
        }

        Match::NoMatch
    }
}

impl FromIterator<Rule> for RuleTable {
    fn from_iter<T: IntoIterator<Item = Rule>>(iter: T) -> Self {
        Self::new(iter.into_iter().collect())
    }
}
