use std::fmt::{self, Display};
use std::str::FromStr;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::params::{ControlledVocabulary, Param, ParamList, Unit};

use super::parser::{parse, FilterLineParseError};
use super::types::{
    AccurateMassMode, ActivationMethod, FilterField, IonizationMode, MassAnalyzer, Polarity,
    ScanDataType, ScanType, Toggle, ToggleField,
};

/// An inclusive m/z interval read from the bracketed section of a filter line
#[derive(Debug, Default, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct MassRange {
    pub low: f64,
    pub high: f64,
}

impl MassRange {
    pub fn new(low: f64, high: f64) -> Self {
        Self { low, high }
    }

    pub fn contains(&self, mz: f64) -> bool {
        self.low <= mz && mz <= self.high
    }

    pub fn width(&self) -> f64 {
        self.high - self.low
    }
}

impl From<(f64, f64)> for MassRange {
    fn from((low, high): (f64, f64)) -> Self {
        Self::new(low, high)
    }
}

impl Display for MassRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.low, self.high)
    }
}

/// The seven on/off switches of a filter line
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ScanToggles {
    pub corona: Toggle,
    pub photoionization: Toggle,
    pub source_cid: Toggle,
    pub detector_set: Toggle,
    pub turbo_scan: Toggle,
    pub data_dependent: Toggle,
    pub wideband: Toggle,
}

impl ScanToggles {
    pub fn get(&self, field: ToggleField) -> Toggle {
        match field {
            ToggleField::Corona => self.corona,
            ToggleField::Photoionization => self.photoionization,
            ToggleField::SourceCID => self.source_cid,
            ToggleField::DetectorSet => self.detector_set,
            ToggleField::TurboScan => self.turbo_scan,
            ToggleField::DataDependent => self.data_dependent,
            ToggleField::Wideband => self.wideband,
        }
    }

    pub(crate) fn set(&mut self, field: ToggleField, value: Toggle) {
        let slot = match field {
            ToggleField::Corona => &mut self.corona,
            ToggleField::Photoionization => &mut self.photoionization,
            ToggleField::SourceCID => &mut self.source_cid,
            ToggleField::DetectorSet => &mut self.detector_set,
            ToggleField::TurboScan => &mut self.turbo_scan,
            ToggleField::DataDependent => &mut self.data_dependent,
            ToggleField::Wideband => &mut self.wideband,
        };
        *slot = value;
    }
}

/**
The acquisition parameters described by a single scan's filter line.

A [`FilterLine`] is only produced by [`parse`](super::parse) or a
[`FilterLineParser`](super::FilterLineParser) and is read-only afterwards.
Every field is optional in the source text, so each enum falls back to its
`Undefined` variant and `ms_level` to `0` when the line did not mention it.

```
use mzfilter::filter::{FilterLine, MassAnalyzer, Polarity, ScanType};

let line: FilterLine = "FTMS + p NSI Full ms [400.00-1600.00]".parse().unwrap();
assert_eq!(line.analyzer(), MassAnalyzer::FourierTransform);
assert_eq!(line.polarity(), Polarity::Positive);
assert_eq!(line.scan_type(), ScanType::Full);
assert_eq!(line.ms_level(), 1);
assert_eq!(line.scan_mass_ranges()[0].high, 1600.0);
```
*/
#[derive(Debug, Default, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct FilterLine {
    pub(crate) analyzer: MassAnalyzer,
    pub(crate) polarity: Polarity,
    pub(crate) scan_data_type: ScanDataType,
    pub(crate) ionization_mode: IonizationMode,
    pub(crate) toggles: ScanToggles,
    pub(crate) accurate_mass_mode: AccurateMassMode,
    pub(crate) scan_type: ScanType,
    pub(crate) ms_level: u8,
    pub(crate) activation_method: ActivationMethod,
    pub(crate) activation_methods: Vec<ActivationMethod>,
    pub(crate) parent_masses: Vec<f64>,
    pub(crate) fragmentation_energies: Vec<f64>,
    pub(crate) scan_mass_ranges: Vec<MassRange>,
    pub(crate) transition_ranges: Vec<MassRange>,
    pub(crate) unparsed_tail: Vec<String>,
}

impl FilterLine {
    pub fn analyzer(&self) -> MassAnalyzer {
        self.analyzer
    }

    pub fn polarity(&self) -> Polarity {
        self.polarity
    }

    pub fn scan_data_type(&self) -> ScanDataType {
        self.scan_data_type
    }

    pub fn ionization_mode(&self) -> IonizationMode {
        self.ionization_mode
    }

    pub fn toggles(&self) -> &ScanToggles {
        &self.toggles
    }

    pub fn corona(&self) -> Toggle {
        self.toggles.corona
    }

    pub fn photoionization(&self) -> Toggle {
        self.toggles.photoionization
    }

    pub fn source_cid(&self) -> Toggle {
        self.toggles.source_cid
    }

    pub fn detector_set(&self) -> Toggle {
        self.toggles.detector_set
    }

    pub fn turbo_scan(&self) -> Toggle {
        self.toggles.turbo_scan
    }

    pub fn data_dependent(&self) -> Toggle {
        self.toggles.data_dependent
    }

    pub fn wideband(&self) -> Toggle {
        self.toggles.wideband
    }

    pub fn accurate_mass_mode(&self) -> AccurateMassMode {
        self.accurate_mass_mode
    }

    pub fn scan_type(&self) -> ScanType {
        self.scan_type
    }

    /// The MS level, where `0` means the line did not state one
    pub fn ms_level(&self) -> u8 {
        self.ms_level
    }

    /// The activation method of the last fragmentation step
    pub fn activation_method(&self) -> ActivationMethod {
        self.activation_method
    }

    /// The activation method of each fragmentation step, MS2 first
    pub fn activation_methods(&self) -> &[ActivationMethod] {
        &self.activation_methods
    }

    /// The parent mass selected at each fragmentation step, MS2 first
    pub fn parent_masses(&self) -> &[f64] {
        &self.parent_masses
    }

    pub fn fragmentation_energies(&self) -> &[f64] {
        &self.fragmentation_energies
    }

    pub fn scan_mass_ranges(&self) -> &[MassRange] {
        &self.scan_mass_ranges
    }

    pub fn transition_ranges(&self) -> &[MassRange] {
        &self.transition_ranges
    }

    /// Whichever range list the line populated
    pub fn ranges(&self) -> &[MassRange] {
        if self.is_srm() {
            &self.transition_ranges
        } else {
            &self.scan_mass_ranges
        }
    }

    /// Tokens left over after the last recognized field
    pub fn unparsed_tail(&self) -> &[String] {
        &self.unparsed_tail
    }

    pub fn has_unparsed_tail(&self) -> bool {
        !self.unparsed_tail.is_empty()
    }

    pub fn is_data_dependent(&self) -> bool {
        self.toggles.data_dependent.is_on()
    }

    pub fn is_srm(&self) -> bool {
        self.scan_type == ScanType::SRM
    }

    /// The parent mass of the final fragmentation step, if any
    pub fn precursor_mz(&self) -> Option<f64> {
        self.parent_masses.last().copied()
    }

    /// Describe the recognized fields with PSI-MS terms. The original text is
    /// included as a "filter string" term.
    pub fn to_params(&self) -> ParamList {
        let mut params: ParamList = Vec::new();
        let cv = ControlledVocabulary::MS;

        params.extend(
            [
                self.analyzer.to_param(),
                self.polarity.to_param(),
                self.scan_data_type.to_param(),
                self.ionization_mode.to_param(),
                self.scan_type.to_param(),
            ]
            .into_iter()
            .flatten()
            .map(Param::from),
        );

        if self.ms_level > 0 {
            params.push(
                Param::from(cv.const_param_ident("ms level", 1000511)).with_value(self.ms_level),
            );
        }

        for (method, energy) in self
            .activation_methods
            .iter()
            .zip(self.fragmentation_energies.iter())
        {
            if let Some(p) = method.to_param() {
                params.push(p.into());
            }
            params.push(
                Param::from(cv.const_param_ident_unit(
                    "collision energy",
                    1000045,
                    Unit::Electronvolt,
                ))
                .with_value(energy),
            );
        }

        for range in self.ranges() {
            params.push(
                Param::from(cv.const_param_ident_unit(
                    "scan window lower limit",
                    1000501,
                    Unit::MZ,
                ))
                .with_value(range.low),
            );
            params.push(
                Param::from(cv.const_param_ident_unit(
                    "scan window upper limit",
                    1000500,
                    Unit::MZ,
                ))
                .with_value(range.high),
            );
        }

        params.push(Param::from(cv.const_param_ident("filter string", 1000512)).with_value(self));
        params
    }
}

impl FromStr for FilterLine {
    type Err = FilterLineParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse(s)
    }
}

/// Writes the line back out in the order the scanner reads it. A line with no
/// unparsed tail parses back into an equal [`FilterLine`].
impl Display for FilterLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut tokens: Vec<String> = Vec::new();
        tokens.extend(self.analyzer.as_token().map(String::from));
        tokens.extend(self.polarity.as_token().map(String::from));
        tokens.extend(self.scan_data_type.as_token().map(String::from));
        tokens.extend(self.ionization_mode.as_token().map(String::from));
        for field in ToggleField::ALL {
            tokens.extend(field.as_token(self.toggles.get(field)));
        }
        tokens.extend(self.accurate_mass_mode.as_token().map(String::from));
        tokens.extend(self.scan_type.as_token().map(String::from));

        match self.ms_level {
            0 => {}
            1 => tokens.push("ms".into()),
            n => tokens.push(format!("ms{n}")),
        }

        for ((mass, method), energy) in self
            .parent_masses
            .iter()
            .zip(self.activation_methods.iter())
            .zip(self.fragmentation_energies.iter())
        {
            let label = method.as_token().unwrap_or("cid");
            tokens.push(format!("{mass}@{label}{energy}"));
        }

        let ranges = self.ranges();
        if !ranges.is_empty() {
            let body: Vec<String> = ranges.iter().map(|r| r.to_string()).collect();
            tokens.push(format!("[{}]", body.join(", ")));
        }

        tokens.extend(self.unparsed_tail.iter().cloned());
        write!(f, "{}", tokens.join(" "))
    }
}
