//! The boundary with whatever reads scans out of a vendor raw file.
//!
//! The filter line parser never talks to a raw file itself. A reader implements
//! [`ScanDataProvider`] to hand over one filter line per scan along with the
//! spectrum arrays and the precursor information the vendor library reports
//! separately. [`ScanDescriptions`] then walks the provider in scan order and
//! pairs each parsed [`FilterLine`] with that side-channel.
use std::ops::RangeInclusive;

use log::warn;
use thiserror::Error;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::filter::{FilterLine, FilterLineParseError, FilterLineParser};
use crate::instrument::InstrumentInfo;

const PROTON: f64 = 1.00727646677;

/// The m/z and intensity arrays of a single scan
#[derive(Debug, Default, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SpectrumArrays {
    pub mz_array: Vec<f64>,
    pub intensity_array: Vec<f32>,
}

impl SpectrumArrays {
    pub fn new(mz_array: Vec<f64>, intensity_array: Vec<f32>) -> Self {
        Self {
            mz_array,
            intensity_array,
        }
    }

    pub fn len(&self) -> usize {
        self.mz_array.len().min(self.intensity_array.len())
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn iter(&self) -> impl Iterator<Item = (f64, f32)> + '_ {
        self.mz_array
            .iter()
            .copied()
            .zip(self.intensity_array.iter().copied())
    }

    /// The most intense point, as `(m/z, intensity)`
    pub fn base_peak(&self) -> Option<(f64, f32)> {
        self.iter().fold(None, |best, (mz, inten)| match best {
            Some((_, best_inten)) if best_inten >= inten => best,
            _ => Some((mz, inten)),
        })
    }

    pub fn total_ion_current(&self) -> f32 {
        self.intensity_array.iter().sum()
    }
}

/// The precursor reported by the vendor library alongside the filter line.
/// The filter line itself only records the isolation m/z, never the charge.
#[derive(Debug, Default, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct PrecursorIon {
    pub mz: f64,
    pub charge: Option<i32>,
}

impl PrecursorIon {
    pub fn new(mz: f64, charge: Option<i32>) -> Self {
        Self { mz, charge }
    }

    pub fn has_charge(&self) -> bool {
        self.charge.is_some()
    }

    /// The neutral mass of the ion, assuming a single charge when none was reported
    pub fn neutral_mass(&self) -> f64 {
        let z = self.charge.unwrap_or(1);
        (self.mz * z.abs() as f64) - z as f64 * PROTON
    }
}

/// A source of scans, usually a wrapper around a vendor file reader
pub trait ScanDataProvider {
    /// The first and last scan numbers available
    fn scan_range(&self) -> RangeInclusive<u32>;

    /// The raw filter line of a scan
    fn get_filter_line(&mut self, scan_number: u32) -> Option<String>;

    fn get_spectrum(&mut self, scan_number: u32) -> Option<SpectrumArrays>;

    /// The precursor the vendor library reports for a scan, if any
    fn get_precursor(&mut self, _scan_number: u32) -> Option<PrecursorIon> {
        None
    }

    /// The scan start time in minutes
    fn get_retention_time(&mut self, _scan_number: u32) -> Option<f64> {
        None
    }

    /// The instrument that recorded the scans, if the reader knows it
    fn instrument_info(&self) -> InstrumentInfo {
        InstrumentInfo::default()
    }

    fn len(&self) -> usize {
        let range = self.scan_range();
        if range.is_empty() {
            0
        } else {
            (range.end() - range.start()) as usize + 1
        }
    }

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Describe a single scan using `parser`. Returns `Ok(None)` when the scan
    /// number is outside of [`ScanDataProvider::scan_range`].
    fn describe_scan(
        &mut self,
        scan_number: u32,
        parser: &FilterLineParser,
    ) -> Result<Option<ScanDescription>, ScanDescriptionError> {
        if !self.scan_range().contains(&scan_number) {
            return Ok(None);
        }
        let filter = match self.get_filter_line(scan_number) {
            Some(text) => {
                parser
                    .parse(&text)
                    .map_err(|source| ScanDescriptionError::InvalidFilterLine {
                        scan_number,
                        filter_line: text.clone(),
                        source,
                    })?
            }
            None => {
                warn!("Scan {scan_number} does not have a filter line");
                FilterLine::default()
            }
        };
        Ok(Some(ScanDescription {
            scan_number,
            retention_time: self.get_retention_time(scan_number),
            precursor: self.get_precursor(scan_number),
            filter,
        }))
    }

    /// Iterate over every scan in increasing scan number order
    fn describe_scans(&mut self) -> ScanDescriptions<'_, Self>
    where
        Self: Sized,
    {
        ScanDescriptions::new(self, FilterLineParser::default())
    }

    fn describe_scans_with(&mut self, parser: FilterLineParser) -> ScanDescriptions<'_, Self>
    where
        Self: Sized,
    {
        ScanDescriptions::new(self, parser)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ScanDescriptionError {
    #[error("Failed to parse the filter line of scan {scan_number} ({filter_line:?}): {source}")]
    InvalidFilterLine {
        scan_number: u32,
        filter_line: String,
        #[source]
        source: FilterLineParseError,
    },
}

impl ScanDescriptionError {
    pub fn scan_number(&self) -> u32 {
        match self {
            Self::InvalidFilterLine { scan_number, .. } => *scan_number,
        }
    }
}

/// A scan's parsed filter line together with the provider's side-channel values
#[derive(Debug, Default, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ScanDescription {
    pub scan_number: u32,
    pub retention_time: Option<f64>,
    pub filter: FilterLine,
    pub precursor: Option<PrecursorIon>,
}

impl ScanDescription {
    pub fn ms_level(&self) -> u8 {
        self.filter.ms_level()
    }

    /// The precursor m/z, preferring the provider's value over the filter line's
    /// isolation m/z
    pub fn precursor_mz(&self) -> Option<f64> {
        self.precursor
            .map(|p| p.mz)
            .or_else(|| self.filter.precursor_mz())
    }

    pub fn precursor_charge(&self) -> Option<i32> {
        self.precursor.and_then(|p| p.charge)
    }
}

/// An iterator over the [`ScanDescription`] of each scan of a [`ScanDataProvider`]
pub struct ScanDescriptions<'a, P: ScanDataProvider> {
    provider: &'a mut P,
    parser: FilterLineParser,
    scans: RangeInclusive<u32>,
}

impl<'a, P: ScanDataProvider> ScanDescriptions<'a, P> {
    pub fn new(provider: &'a mut P, parser: FilterLineParser) -> Self {
        let scans = provider.scan_range();
        Self {
            provider,
            parser,
            scans,
        }
    }
}

impl<P: ScanDataProvider> Iterator for ScanDescriptions<'_, P> {
    type Item = Result<ScanDescription, ScanDescriptionError>;

    fn next(&mut self) -> Option<Self::Item> {
        let scan_number = self.scans.next()?;
        self.provider
            .describe_scan(scan_number, &self.parser)
            .transpose()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.scans.size_hint()
    }
}

/// A single scan held by [`InMemoryScanProvider`]
#[derive(Debug, Default, Clone, PartialEq)]
pub struct InMemoryScan {
    pub filter_line: Option<String>,
    pub retention_time: Option<f64>,
    pub precursor: Option<PrecursorIon>,
    pub arrays: SpectrumArrays,
}

impl InMemoryScan {
    pub fn new<S: Into<String>>(filter_line: S) -> Self {
        Self {
            filter_line: Some(filter_line.into()),
            ..Default::default()
        }
    }

    pub fn with_retention_time(mut self, retention_time: f64) -> Self {
        self.retention_time = Some(retention_time);
        self
    }

    pub fn with_precursor(mut self, precursor: PrecursorIon) -> Self {
        self.precursor = Some(precursor);
        self
    }

    pub fn with_arrays(mut self, arrays: SpectrumArrays) -> Self {
        self.arrays = arrays;
        self
    }
}

/// A [`ScanDataProvider`] over scans already held in memory, numbered
/// consecutively from `first_scan`.
#[derive(Debug, Clone, PartialEq)]
pub struct InMemoryScanProvider {
    first_scan: u32,
    scans: Vec<InMemoryScan>,
    instrument: InstrumentInfo,
}

impl Default for InMemoryScanProvider {
    fn default() -> Self {
        Self::new(1)
    }
}

impl InMemoryScanProvider {
    pub fn new(first_scan: u32) -> Self {
        Self {
            first_scan,
            scans: Vec::new(),
            instrument: InstrumentInfo::default(),
        }
    }

    pub fn with_instrument(mut self, instrument: InstrumentInfo) -> Self {
        self.instrument = instrument;
        self
    }

    pub fn push(&mut self, scan: InMemoryScan) -> u32 {
        self.scans.push(scan);
        self.first_scan + self.scans.len() as u32 - 1
    }

    fn get(&self, scan_number: u32) -> Option<&InMemoryScan> {
        let offset = scan_number.checked_sub(self.first_scan)?;
        self.scans.get(offset as usize)
    }
}

impl FromIterator<InMemoryScan> for InMemoryScanProvider {
    fn from_iter<T: IntoIterator<Item = InMemoryScan>>(iter: T) -> Self {
        let mut provider = Self::default();
        provider.scans.extend(iter);
        provider
    }
}

impl ScanDataProvider for InMemoryScanProvider {
    fn scan_range(&self) -> RangeInclusive<u32> {
        if self.scans.is_empty() {
            // An empty inclusive range
            return 1..=0;
        }
        self.first_scan..=(self.first_scan + self.scans.len() as u32 - 1)
    }

    fn get_filter_line(&mut self, scan_number: u32) -> Option<String> {
        self.get(scan_number).and_then(|s| s.filter_line.clone())
    }

    fn get_spectrum(&mut self, scan_number: u32) -> Option<SpectrumArrays> {
        self.get(scan_number).map(|s| s.arrays.clone())
    }

    fn get_precursor(&mut self, scan_number: u32) -> Option<PrecursorIon> {
        self.get(scan_number).and_then(|s| s.precursor)
    }

    fn get_retention_time(&mut self, scan_number: u32) -> Option<f64> {
        self.get(scan_number).and_then(|s| s.retention_time)
    }

    fn instrument_info(&self) -> InstrumentInfo {
        self.instrument.clone()
    }
}

/// Parse a batch of filter lines in order
pub fn parse_lines<S: AsRef<str>>(
    parser: &FilterLineParser,
    lines: &[S],
) -> Vec<Result<FilterLine, FilterLineParseError>> {
    lines.iter().map(|line| parser.parse(line.as_ref())).collect()
}

/// Parse a batch of filter lines across the rayon thread pool, preserving order
#[cfg(feature = "parallelism")]
pub fn par_parse_lines<S: AsRef<str> + Sync>(
    parser: &FilterLineParser,
    lines: &[S],
) -> Vec<Result<FilterLine, FilterLineParseError>> {
    use rayon::prelude::*;
    lines
        .par_iter()
        .map(|line| parser.parse(line.as_ref()))
        .collect()
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::filter::{FilterField, ScanType, TailPolicy};
    use crate::instrument::{AcquisitionSoftware, InstrumentModelType, Manufacturer};

    fn make_provider() -> InMemoryScanProvider {
        let mut provider = InMemoryScanProvider::new(1);
        provider.push(
            InMemoryScan::new("FTMS + p NSI Full ms [400.00-1600.00]")
                .with_retention_time(0.5)
                .with_arrays(SpectrumArrays::new(
                    vec![401.0, 502.5, 810.2],
                    vec![10.0, 250.0, 30.0],
                )),
        );
        provider.push(
            InMemoryScan::new("ITMS + c NSI d Full ms2 401.43@cid35.00 [100.00-810.00]")
                .with_retention_time(0.52)
                .with_precursor(PrecursorIon::new(401.4312, Some(2))),
        );
        provider.push(InMemoryScan::new(
            "ITMS + c NSI d Full ms2 502.50@hcd28.00 [140.00-1015.00]",
        ));
        provider
    }

    #[test]
    fn test_spectrum_arrays() {
        let arrays = SpectrumArrays::new(vec![100.0, 200.0, 300.0], vec![5.0, 20.0, 20.0]);
        assert_eq!(arrays.len(), 3);
        assert_eq!(arrays.base_peak(), Some((200.0, 20.0)));
        assert_eq!(arrays.total_ion_current(), 45.0);
        assert!(SpectrumArrays::default().base_peak().is_none());
    }

    #[test]
    fn test_neutral_mass() {
        let ion = PrecursorIon::new(500.0, Some(2));
        assert!((ion.neutral_mass() - 997.98544706646).abs() < 1e-6);
        let ion = PrecursorIon::new(500.0, None);
        assert!(!ion.has_charge());
        assert!((ion.neutral_mass() - 498.99272353323).abs() < 1e-6);
    }

    #[test_log::test]
    fn test_describe_scans() {
        let mut provider = make_provider();
        assert_eq!(provider.len(), 3);
        assert_eq!(provider.scan_range(), 1..=3);

        let descriptions: Vec<_> = provider
            .describe_scans()
            .collect::<Result<_, _>>()
            .unwrap();
        assert_eq!(descriptions.len(), 3);
        let numbers: Vec<_> = descriptions.iter().map(|d| d.scan_number).collect();
        assert_eq!(numbers, vec![1, 2, 3]);

        assert_eq!(descriptions[0].ms_level(), 1);
        assert_eq!(descriptions[0].retention_time, Some(0.5));
        assert!(descriptions[0].precursor_mz().is_none());

        assert_eq!(descriptions[1].precursor_mz(), Some(401.4312));
        assert_eq!(descriptions[1].precursor_charge(), Some(2));

        assert_eq!(descriptions[2].precursor_mz(), Some(502.5));
        assert_eq!(descriptions[2].precursor_charge(), None);

        let arrays = provider.get_spectrum(1).unwrap();
        assert_eq!(arrays.base_peak(), Some((502.5, 250.0)));
        assert!(provider.get_spectrum(4).is_none());
    }

    #[test_log::test]
    fn test_describe_scan_errors() {
        let mut provider: InMemoryScanProvider = [
            InMemoryScan::new("SRM ms2 503.20@cid25.00 [458.20-459.20]"),
            InMemoryScan::new("ITMS + c NSI Full ms3 401.43@cid35.00"),
            InMemoryScan::default(),
        ]
        .into_iter()
        .collect();

        let mut it = provider.describe_scans();
        let first = it.next().unwrap().unwrap();
        assert_eq!(first.filter.scan_type(), ScanType::SRM);

        let err = it.next().unwrap().unwrap_err();
        assert_eq!(err.scan_number(), 2);

        let missing = it.next().unwrap().unwrap();
        assert_eq!(missing.filter, FilterLine::default());
        assert!(it.next().is_none());

        let parser = FilterLineParser::new();
        assert!(provider.describe_scan(10, &parser).unwrap().is_none());
    }

    #[test]
    fn test_instrument_info() {
        let provider = make_provider();
        assert_eq!(provider.instrument_info(), InstrumentInfo::default());

        let provider = make_provider().with_instrument(InstrumentInfo::from_model(
            InstrumentModelType::LTQ_Orbitrap_XL,
        ));
        let info = provider.instrument_info();
        assert_eq!(info.manufacturer, Manufacturer::ThermoScientific);
        assert_eq!(info.acquisition_software, AcquisitionSoftware::Xcalibur);

        // Every analyzer in a filter line should be one the instrument has
        let mut provider = provider;
        for desc in provider.describe_scans() {
            let desc = desc.unwrap();
            let analyzer = desc.filter.analyzer();
            if analyzer.is_defined() {
                assert!(info.analyzers.contains(&analyzer), "{analyzer}");
            }
        }
    }

    #[test]
    fn test_empty_provider() {
        let mut provider = InMemoryScanProvider::new(10);
        assert!(provider.is_empty());
        assert_eq!(provider.describe_scans().count(), 0);
    }

    #[test]
    fn test_describe_scans_with_policy() {
        let mut provider: InMemoryScanProvider =
            [InMemoryScan::new("FTMS + p NSI Full ms [400.00-1600.00] leftover")]
                .into_iter()
                .collect();
        let parser = FilterLineParser::new().with_tail_policy(TailPolicy::Reject);
        let results: Vec<_> = provider.describe_scans_with(parser).collect();
        assert!(results[0].is_err());
    }

    #[test]
    fn test_parse_lines() {
        let lines = ["FTMS + p NSI Full ms [400.00-1600.00]", "ITMS + c NSI Full ms3 1@cid1"];
        let parsed = parse_lines(&FilterLineParser::default(), &lines);
        assert!(parsed[0].is_ok());
        assert!(parsed[1].is_err());
    }

    #[cfg(feature = "parallelism")]
    #[test]
    fn test_par_parse_lines() {
        let lines: Vec<String> = (0..200)
            .map(|i| format!("ITMS + c NSI d Full ms2 {}.5@cid35.00 [100.00-810.00]", 300 + i))
            .collect();
        let parser = FilterLineParser::default();
        let parsed = par_parse_lines(&parser, &lines);
        assert_eq!(parsed, parse_lines(&parser, &lines));
        assert_eq!(parsed[10].as_ref().unwrap().precursor_mz(), Some(310.5));
    }
}
