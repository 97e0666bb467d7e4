//! `mzfilter` reads the scan filter lines that Thermo acquisition software
//! embeds in every scan of a RAW file, turning text like
//! `FTMS + p NSI Full ms [400.00-1600.00]` into a structured [`FilterLine`].
//!
//! The parser lives in [`filter`]. Reading the RAW file itself is left to a
//! vendor library, which plugs in through [`provider::ScanDataProvider`].
//!
//! ```
//! use mzfilter::prelude::*;
//! use mzfilter::filter::{MassAnalyzer, ScanType};
//!
//! let line: FilterLine = "SRM ms2 503.20@cid25.00 [458.20-459.20]".parse().unwrap();
//! assert_eq!(line.scan_type(), ScanType::SRM);
//! assert_eq!(line.analyzer(), MassAnalyzer::Undefined);
//! assert_eq!(line.transition_ranges().len(), 1);
//! assert!(line.scan_mass_ranges().is_empty());
//! ```
pub mod filter;
pub mod instrument;
pub mod params;
pub mod prelude;
pub mod provider;

pub use crate::filter::{
    parse, FilterLine, FilterLineParseError, FilterLineParser, MassRange, TailPolicy,
};
pub use crate::instrument::{InstrumentInfo, InstrumentModelType};
pub use crate::params::{ControlledVocabulary, Param};
pub use crate::provider::{
    InMemoryScan, InMemoryScanProvider, PrecursorIon, ScanDataProvider, ScanDescription,
    ScanDescriptionError, SpectrumArrays,
};
