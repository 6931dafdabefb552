//! Queries against window descriptors for identifying specific windows or programs.
//!
//! Every predicate a rule can carry is expressed as a [Query]: the built-in field matchers in
//! this module, arbitrary closures over a [WindowDescriptor], and [HandlePredicate]s that only
//! receive the native [Handle] so they can perform their own introspection.
use crate::{
    window::{ExtendedStyle, Handle, WindowDescriptor, WindowStyle},
    Error, Result,
};
use regex::Regex;
use std::fmt;

/// A query to be run against a [WindowDescriptor].
///
/// Queries must be free of side effects: they may be evaluated any number of times for the same
/// window as the descriptor is refreshed.
pub trait Query {
    /// Run this query against the given descriptor.
    fn run(&self, w: &WindowDescriptor) -> Result<bool>;

    /// Whether this query holds for every possible descriptor.
    ///
    /// Used to verify that a rule table ends in a catch-all rule. Returning `false` is always
    /// safe.
    fn is_wildcard(&self) -> bool {
        false
    }

    /// Convert to a trait object
    fn boxed(self) -> Box<dyn Query>
    where
        Self: Sized + 'static,
    {
        Box::new(self)
    }
}

impl fmt::Debug for Box<dyn Query> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Query")
            .field("wildcard", &self.is_wildcard())
            .finish()
    }
}

impl<F> Query for F
where
    F: Fn(&WindowDescriptor) -> Result<bool>,
{
    fn run(&self, w: &WindowDescriptor) -> Result<bool> {
        (self)(w)
    }
}

/// Combinators for building up compound queries.
pub trait QueryExt: Query {
    /// Both this query and `other` must hold. `other` is not run if this query fails.
    fn and<Q>(self, other: Q) -> AndQuery
    where
        Self: Sized + 'static,
        Q: Query + 'static,
    {
        AndQuery {
            a: Box::new(self),
            b: Box::new(other),
        }
    }

    /// Either this query or `other` must hold. `other` is not run if this query succeeds.
    fn or<Q>(self, other: Q) -> OrQuery
    where
        Self: Sized + 'static,
        Q: Query + 'static,
    {
        OrQuery {
            a: Box::new(self),
            b: Box::new(other),
        }
    }

    /// Invert the result of this query.
    fn not(self) -> NotQuery
    where
        Self: Sized + 'static,
    {
        NotQuery(Box::new(self))
    }
}

impl<Q> QueryExt for Q where Q: Query {}

/// The result of [QueryExt::and]
#[derive(Debug)]
pub struct AndQuery {
    a: Box<dyn Query>,
    b: Box<dyn Query>,
}

impl Query for AndQuery {
    fn run(&self, w: &WindowDescriptor) -> Result<bool> {
        Ok(self.a.run(w)? && self.b.run(w)?)
    }

    fn is_wildcard(&self) -> bool {
        self.a.is_wildcard() && self.b.is_wildcard()
    }
}

/// The result of [QueryExt::or]
#[derive(Debug)]
pub struct OrQuery {
    a: Box<dyn Query>,
    b: Box<dyn Query>,
}

impl Query for OrQuery {
    fn run(&self, w: &WindowDescriptor) -> Result<bool> {
        Ok(self.a.run(w)? || self.b.run(w)?)
    }

    fn is_wildcard(&self) -> bool {
        self.a.is_wildcard() || self.b.is_wildcard()
    }
}

/// The result of [QueryExt::not]
#[derive(Debug)]
pub struct NotQuery(Box<dyn Query>);

impl Query for NotQuery {
    fn run(&self, w: &WindowDescriptor) -> Result<bool> {
        Ok(!self.0.run(w)?)
    }
}

// Patterns that match any input, including the empty string and text spanning several lines.
// An anchored `^.*$` is not one of these: without `(?s)` the `.` stops at a newline.
const WILDCARD_PATTERNS: &[&str] = &["", ".*", ".*?", "^.*", ".*$", "(?s).*", "(?s)^.*$"];

fn compile(field: &'static str, pattern: &str) -> Result<Regex> {
    Regex::new(pattern).map_err(|source| Error::InvalidPattern {
        field,
        pattern: pattern.to_owned(),
        source,
    })
}

macro_rules! pattern_query {
    ($name:ident, $field:ident, $label:expr, $doc:expr) => {
        #[doc = $doc]
        ///
        /// The pattern is searched for anywhere in the field: use `^...$` to require a full match.
        #[derive(Debug, Clone)]
        pub struct $name(Regex);

        impl $name {
            /// Compile the given pattern.
            ///
            /// # Errors
            /// Returns [Error::InvalidPattern] if the pattern is not a valid regular expression.
            pub fn new(pattern: &str) -> Result<Self> {
                compile($label, pattern).map(Self)
            }

            /// The source pattern for this query.
            pub fn pattern(&self) -> &str {
                self.0.as_str()
            }
        }

        impl Query for $name {
            fn run(&self, w: &WindowDescriptor) -> Result<bool> {
                Ok(self.0.is_match(&w.$field))
            }

            fn is_wildcard(&self) -> bool {
                WILDCARD_PATTERNS.contains(&self.0.as_str())
            }
        }
    };
}

pattern_query!(
    ClassName,
    class_name,
    "class name",
    "A [Query] matching a pattern against the window class name."
);
pattern_query!(
    Title,
    title,
    "title",
    "A [Query] matching a pattern against the window display name."
);
pattern_query!(
    ProcessName,
    process_name,
    "process name",
    "A [Query] matching a pattern against the name of the owning process."
);

/// A [Query] that holds when every bit of the mask is set in the window style.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StyleContains(pub WindowStyle);

impl Query for StyleContains {
    fn run(&self, w: &WindowDescriptor) -> Result<bool> {
        Ok(w.style.contains(self.0))
    }

    fn is_wildcard(&self) -> bool {
        self.0.is_empty()
    }
}

/// A [Query] that holds when no bit of the mask is set in the window style.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StyleNotContains(pub WindowStyle);

impl Query for StyleNotContains {
    fn run(&self, w: &WindowDescriptor) -> Result<bool> {
        Ok(!w.style.intersects(self.0))
    }

    fn is_wildcard(&self) -> bool {
        self.0.is_empty()
    }
}

/// A [Query] that holds when every bit of the mask is set in the extended window style.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExStyleContains(pub ExtendedStyle);

impl Query for ExStyleContains {
    fn run(&self, w: &WindowDescriptor) -> Result<bool> {
        Ok(w.ex_style.contains(self.0))
    }

    fn is_wildcard(&self) -> bool {
        self.0.is_empty()
    }
}

/// A [Query] that holds when no bit of the mask is set in the extended window style.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExStyleNotContains(pub ExtendedStyle);

impl Query for ExStyleNotContains {
    fn run(&self, w: &WindowDescriptor) -> Result<bool> {
        Ok(!w.ex_style.intersects(self.0))
    }

    fn is_wildcard(&self) -> bool {
        self.0.is_empty()
    }
}

/// A [Query] for windows that look like top level application windows: not a tool window and
/// with no owner.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct AppWindow;

impl Query for AppWindow {
    fn run(&self, w: &WindowDescriptor) -> Result<bool> {
        Ok(w.is_app_window())
    }
}

/// A [Query] that only receives the native [Handle] of the window being evaluated.
///
/// This allows for arbitrary introspection against the window system that the descriptor does
/// not capture, such as resolving the true top level owner of a window. Handle predicates are
/// run after all other predicates of a rule and should be fast: they execute inline on the
/// event handling path.
pub struct HandlePredicate(Box<dyn Fn(Handle) -> Result<bool>>);

impl HandlePredicate {
    /// Wrap the given function as a [Query].
    pub fn new<F>(f: F) -> Self
    where
        F: Fn(Handle) -> Result<bool> + 'static,
    {
        Self(Box::new(f))
    }
}

impl fmt::Debug for HandlePredicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HandlePredicate").finish()
    }
}

impl Query for HandlePredicate {
    fn run(&self, w: &WindowDescriptor) -> Result<bool> {
        (self.0)(w.handle)
    }
}
