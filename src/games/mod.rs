//! Game implementations.

pub mod cat_facts;
