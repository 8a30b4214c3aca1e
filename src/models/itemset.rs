use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

/// A set of unique item tokens.
///
/// Members are kept sorted and deduplicated, so two itemsets built from the
/// same tokens in any order compare and hash equal. The backing slice is
/// reference counted; cloning an itemset never copies its tokens.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "Vec<String>", into = "Vec<String>")]
pub struct Itemset {
    items: Arc<[String]>,
}

impl Itemset {
    pub fn new<I, S>(items: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut items: Vec<String> = items.into_iter().map(Into::into).collect();
        items.sort_unstable();
        items.dedup();
        Self {
            items: items.into(),
        }
    }

    pub fn items(&self) -> &[String] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.items.iter().map(String::as_str)
    }

    /// Every member of `self` is also a member of `other`.
    pub fn is_subset_of(&self, other: &Itemset) -> bool {
        if self.len() > other.len() {
            return false;
        }
        // Both sides are sorted: a single merge walk is enough.
        let mut theirs = other.items.iter();
        'outer: for mine in self.items.iter() {
            for candidate in theirs.by_ref() {
                match candidate.cmp(mine) {
                    std::cmp::Ordering::Less => continue,
                    std::cmp::Ordering::Equal => continue 'outer,
                    std::cmp::Ordering::Greater => return false,
                }
            }
            return false;
        }
        true
    }

    pub fn is_proper_subset_of(&self, other: &Itemset) -> bool {
        self.len() < other.len() && self.is_subset_of(other)
    }

    /// Members of `self` that are not in `other`.
    pub fn difference(&self, other: &Itemset) -> Itemset {
        Itemset::new(
            self.items
                .iter()
                .filter(|item| other.items.binary_search(item).is_err())
                .cloned(),
        )
    }
}

impl From<Vec<String>> for Itemset {
    fn from(items: Vec<String>) -> Self {
        Self::new(items)
    }
}

impl From<Itemset> for Vec<String> {
    fn from(set: Itemset) -> Self {
        set.items.to_vec()
    }
}

impl fmt::Display for Itemset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{{}}}", self.items.join(", "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn order_does_not_matter() {
        assert_eq!(Itemset::new(["B", "A"]), Itemset::new(["A", "B"]));
        assert_eq!(Itemset::new(["A", "A", "B"]).len(), 2);
    }

    #[test]
    fn subset_checks() {
        let ab = Itemset::new(["A", "B"]);
        let abc = Itemset::new(["C", "B", "A"]);
        let ad = Itemset::new(["A", "D"]);

        assert!(ab.is_subset_of(&abc));
        assert!(ab.is_proper_subset_of(&abc));
        assert!(ab.is_subset_of(&ab));
        assert!(!ab.is_proper_subset_of(&ab));
        assert!(!ad.is_subset_of(&abc));
        assert!(!abc.is_subset_of(&ab));
    }

    #[test]
    fn difference_keeps_remaining_members() {
        let abc = Itemset::new(["A", "B", "C"]);
        let b = Itemset::new(["B"]);
        assert_eq!(abc.difference(&b), Itemset::new(["A", "C"]));
    }

    #[test]
    fn serializes_as_sorted_list() {
        let set = Itemset::new(["milk", "bread"]);
        let json = serde_json::to_string(&set).unwrap();
        assert_eq!(json, r#"["bread","milk"]"#);

        let back: Itemset = serde_json::from_str(r#"["milk","bread","milk"]"#).unwrap();
        assert_eq!(back, set);
    }

    #[test]
    fn display_uses_braces() {
        assert_eq!(Itemset::new(["B", "A"]).to_string(), "{A, B}");
    }
}
