use serde::{Deserialize, Serialize};

/// One purchase record. Items keep the order they were read in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Transaction {
    items: Vec<String>,
}

impl Transaction {
    pub(crate) fn new(items: Vec<String>) -> Self {
        Self { items }
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
}
