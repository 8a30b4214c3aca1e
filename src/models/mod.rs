pub mod compare;
pub mod frequency;
pub mod itemset;
pub mod request;
pub mod response;
pub mod rule;
pub mod transaction;
