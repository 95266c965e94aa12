//! HTML parsers for filelist.io browse pages.
//!
//! The site's markup is fixed and irregular, so extraction is anchored
//! pattern matching against known tokens rather than DOM traversal.

pub mod search;

pub use search::{
    RESULTS_PER_PAGE, has_next_page, is_empty_results, is_results_page, parse_result_fragment,
    split_result_fragments,
};
