//! Utility types for freeadmin.
//!
//! - [`MultiValueDict`]: an insertion-ordered map with several values per key,
//!   used for submitted form payloads.

mod multi_value_dict;

pub use multi_value_dict::MultiValueDict;
