//! Client code for grammly.
//!
//! This crate provides the Notion API client, the record normalization that
//! turns untyped Notion property bags into question records, and the
//! unit-based grouping the relay serves.

pub mod notion;

pub use notion::{
    NOTION_VERSION, NotionClient, NotionConfig, NotionError, Page, Question, QueryResponse, group_by_unit,
};
