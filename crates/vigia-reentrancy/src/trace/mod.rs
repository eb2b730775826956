mod path;
mod types;

pub use path::TracePath;
pub use types::{extract_selector, parse_transaction_traces, validate_preorder, CallTraceEvent, RawAction, RawTrace};
