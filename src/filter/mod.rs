//! Parsing of the scan filter lines written by Thermo acquisition software.
//!
//! A filter line is a single line of whitespace separated words such as
//!
//! ```text
//! ITMS + c NSI d Full ms2 401.43@cid35.00 [100.00-810.00]
//! ```
//!
//! which reads as: ion trap analyzer, positive polarity, centroid data,
//! nanoelectrospray ionization, data dependent, full scan, MS2 of the precursor
//! at 401.43 fragmented by CID at energy 35, recording m/z 100 to 810. Every
//! field may be absent, but those present always appear in the same order.
//!
//! ```
//! use mzfilter::filter::{self, ActivationMethod};
//!
//! let line = filter::parse("ITMS + c NSI d Full ms2 401.43@cid35.00 [100.00-810.00]").unwrap();
//! assert_eq!(line.ms_level(), 2);
//! assert_eq!(line.activation_method(), ActivationMethod::CID);
//! assert_eq!(line.fragmentation_energies(), &[35.0]);
//! ```
mod line;
mod parser;
mod types;

pub use line::{FilterLine, MassRange, ScanToggles};
pub use parser::{parse, ActivationPairIssue, FilterLineParseError, FilterLineParser, TailPolicy};
pub use types::{
    AccurateMassMode, ActivationMethod, FilterField, IonizationMode, MassAnalyzer, Polarity,
    ScanDataType, ScanType, Toggle, ToggleField,
};
