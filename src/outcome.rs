use std::fmt;

use crate::error::DomainError;

/// Result of a command, or of a whole run of commands
///
/// `map` and `and_then` are the std combinators; [`collect`] is the
/// non-short-circuiting counterpart used to merge independent commands.
pub type Outcome<T> = Result<T, Failures>;

/// Ordered, non-empty list of domain errors
#[derive(Debug)]
pub struct Failures {
    errors: Vec<DomainError>,
}

impl Failures {
    pub fn new(first: DomainError) -> Self {
        Self {
            errors: vec![first],
        }
    }

    /// Append every error of `other`, keeping order
    pub fn merge(&mut self, other: Failures) {
        self.errors.extend(other.errors);
    }

    pub fn errors(&self) -> &[DomainError] {
        &self.errors
    }

    pub fn len(&self) -> usize {
        self.errors.len()
    }

    /// Always `false`: a `Failures` value holds at least one error.
    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, DomainError> {
        self.errors.iter()
    }
}

impl From<DomainError> for Failures {
    fn from(error: DomainError) -> Self {
        Self::new(error)
    }
}

impl IntoIterator for Failures {
    type Item = DomainError;
    type IntoIter = std::vec::IntoIter<DomainError>;

    fn into_iter(self) -> Self::IntoIter {
        self.errors.into_iter()
    }
}

impl<'a> IntoIterator for &'a Failures {
    type Item = &'a DomainError;
    type IntoIter = std::slice::Iter<'a, DomainError>;

    fn into_iter(self) -> Self::IntoIter {
        self.errors.iter()
    }
}

impl fmt::Display for Failures {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, error) in self.errors.iter().enumerate() {
            if i > 0 {
                f.write_str("; ")?;
            }
            write!(f, "{error}")?;
        }
        Ok(())
    }
}

impl std::error::Error for Failures {}

/// Combine outcomes without stopping at the first failure
///
/// Every element is evaluated. If all succeed the values are returned in
/// order; otherwise the failures of every failing element are concatenated
/// in order.
pub fn collect<T, I>(outcomes: I) -> Outcome<Vec<T>>
where
    I: IntoIterator<Item = Outcome<T>>,
{
    let mut values = Vec::new();
    let mut failures: Option<Failures> = None;

    for outcome in outcomes {
        match outcome {
            Ok(value) => values.push(value),
            Err(errors) => match failures.as_mut() {
                Some(collected) => collected.merge(errors),
                None => failures = Some(errors),
            },
        }
    }

    match failures {
        Some(failures) => Err(failures),
        None => Ok(values),
    }
}
