pub use crate::filter::{FilterField, FilterLine, FilterLineParser, TailPolicy};
pub use crate::params::ParamLike;
pub use crate::provider::ScanDataProvider;
pub use std::str::FromStr;
