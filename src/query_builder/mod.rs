//! # Query Builder
//!
//! Bound-parameter query construction for the paginated and filtered listings.

pub mod pagination;
pub mod question_filter;

pub use pagination::{Pagination, PaginationMeta};
pub use question_filter::QuestionFilter;
