//! Filter/sort pipeline.
//!
//! [`View`] derives an ordered view over a borrowed entity slice: predicates
//! are conjunctive, text search is a case-insensitive substring match over
//! designated fields, and ordering is a chain of stable comparators, so
//! identical inputs always yield identical output and ties keep input
//! order.

use std::cmp::Ordering;

/// Sort direction for one link of an ordering chain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Direction {
    #[default]
    Asc,
    Desc,
}

impl Direction {
    fn apply(self, ord: Ordering) -> Ordering {
        match self {
            Self::Asc => ord,
            Self::Desc => ord.reverse(),
        }
    }
}

/// Case-insensitive exact match for category filters (gender, format, genre).
/// An absent field never matches.
pub fn category_eq(field: Option<&str>, want: &str) -> bool {
    field.is_some_and(|f| f.eq_ignore_ascii_case(want.trim()))
}

type Predicate<'a, T> = Box<dyn Fn(&T) -> bool + 'a>;
type Comparator<'a, T> = Box<dyn Fn(&T, &T) -> Ordering + 'a>;

/// A derived view over `items`. The input slice is never mutated.
pub struct View<'a, T> {
    items: &'a [T],
    predicates: Vec<Predicate<'a, T>>,
    order: Vec<(Comparator<'a, T>, Direction)>,
}

impl<'a, T> View<'a, T> {
    /// Start a view over the given collection.
    pub fn of(items: &'a [T]) -> Self {
        Self {
            items,
            predicates: Vec::new(),
            order: Vec::new(),
        }
    }

    /// Add an exact predicate. All predicates must hold (conjunctive).
    pub fn filter(mut self, pred: impl Fn(&T) -> bool + 'a) -> Self {
        self.predicates.push(Box::new(pred));
        self
    }

    /// Add a free-text query over the fields `fields` yields per item.
    /// Matching is a case-insensitive substring test; a blank query
    /// matches everything.
    pub fn search(self, query: &str, fields: impl Fn(&T) -> Vec<String> + 'a) -> Self {
        let needle = query.trim().to_lowercase();
        if needle.is_empty() {
            return self;
        }
        self.filter(move |item| {
            fields(item)
                .iter()
                .any(|f| f.to_lowercase().contains(&needle))
        })
    }

    /// Append a comparator to the ordering chain. Earlier comparators win;
    /// later ones break ties.
    pub fn order_by(mut self, cmp: impl Fn(&T, &T) -> Ordering + 'a, dir: Direction) -> Self {
        self.order.push((Box::new(cmp), dir));
        self
    }

    /// Order by a comparable key, ascending.
    pub fn order_by_key<K: Ord>(self, key: impl Fn(&T) -> K + 'a) -> Self {
        self.order_by(move |a, b| key(a).cmp(&key(b)), Direction::Asc)
    }

    fn compare(&self, a: &T, b: &T) -> Ordering {
        for (cmp, dir) in &self.order {
            let ord = dir.apply(cmp(a, b));
            if ord != Ordering::Equal {
                return ord;
            }
        }
        Ordering::Equal
    }

    /// Produce the derived ordered sequence as references into the input.
    pub fn collect(self) -> Vec<&'a T> {
        let mut out: Vec<&T> = self
            .items
            .iter()
            .filter(|item| self.predicates.iter().all(|p| p(item)))
            .collect();

        // sort_by is stable, so equal elements keep input order
        out.sort_by(|a, b| self.compare(a, b));
        out
    }

    /// Like [`View::collect`] but cloning into an owned sequence.
    pub fn collect_cloned(self) -> Vec<T>
    where
        T: Clone,
    {
        self.collect().into_iter().cloned().collect()
    }
}
