//! Query predicates evaluated uniformly against store rows and cache records

use std::fmt;
use std::sync::Arc;

/// A boolean condition over entity fields.
///
/// The same predicate value filters repository reads and cache lookups, so a
/// cache-aside miss repairs exactly the set of records the store query would
/// have returned.
pub struct Predicate<E> {
    description: String,
    test: Arc<dyn Fn(&E) -> bool + Send + Sync>,
}

impl<E> Predicate<E> {
    pub fn new(
        description: impl Into<String>,
        test: impl Fn(&E) -> bool + Send + Sync + 'static,
    ) -> Self {
        Self {
            description: description.into(),
            test: Arc::new(test),
        }
    }

    /// Evaluates the predicate against a single record
    pub fn matches(&self, entity: &E) -> bool {
        (self.test)(entity)
    }

    pub fn description(&self) -> &str {
        &self.description
    }
}

impl<E> Clone for Predicate<E> {
    fn clone(&self) -> Self {
        Self {
            description: self.description.clone(),
            test: Arc::clone(&self.test),
        }
    }
}

impl<E> fmt::Debug for Predicate<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Predicate")
            .field("description", &self.description)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_matches() {
        let predicate = Predicate::new("even", |n: &i32| n % 2 == 0);

        assert!(predicate.matches(&4));
        assert!(!predicate.matches(&5));
    }

    #[test]
    fn test_clone_shares_the_test() {
        let predicate = Predicate::new("positive", |n: &i32| *n > 0);
        let cloned = predicate.clone();

        assert!(cloned.matches(&1));
        assert_eq!(cloned.description(), "positive");
    }

    #[test]
    fn test_debug_shows_description_only() {
        let predicate = Predicate::new("name equals", |_: &String| true);
        let rendered = format!("{:?}", predicate);

        assert!(rendered.contains("name equals"));
    }
}
