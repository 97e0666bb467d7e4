//! The closed vocabularies of a filter line.
//!
//! Each field type knows how to recognize its own (upper-cased) token with
//! [`FilterField::classify`], which never fails: a word that does not belong to
//! the field yields the `Undefined` variant so the scanner can offer it to the
//! next field. The lookup tables mapping each value to display text and to a
//! PSI-MS term are plain `match` expressions.
#![allow(clippy::upper_case_acronyms)]
use std::fmt::Display;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::params::{ControlledVocabulary, ParamCow};

macro_rules! param {
    ($name:expr, $acc:expr) => {
        ControlledVocabulary::MS.const_param_ident($name, $acc)
    };
}

/// A single-token field of a filter line with a closed vocabulary.
pub trait FilterField: Copy + Default + PartialEq {
    /// Recognize an upper-cased token, returning the default (`Undefined`) variant
    /// when the token does not belong to this field.
    fn classify(token: &str) -> Self;

    /// The token written for this value in a filter line, if it has one
    fn as_token(&self) -> Option<&'static str>;

    fn is_defined(&self) -> bool {
        *self != Self::default()
    }
}

/// The mass analyzer that recorded the scan
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum MassAnalyzer {
    IonTrap,
    TripleQuad,
    SingleQuad,
    TimeOfFlight,
    FourierTransform,
    Sector,
    /// Quadrupole time-of-flight. Never written in a filter line, only implied by
    /// an instrument model.
    QTOF,
    #[default]
    Undefined,
}

impl FilterField for MassAnalyzer {
    fn classify(token: &str) -> Self {
        match token {
            "ITMS" => Self::IonTrap,
            "TQMS" => Self::TripleQuad,
            "SQMS" => Self::SingleQuad,
            "TOFMS" => Self::TimeOfFlight,
            "FTMS" => Self::FourierTransform,
            "SECTOR" => Self::Sector,
            _ => Self::Undefined,
        }
    }

    fn as_token(&self) -> Option<&'static str> {
        match self {
            Self::IonTrap => Some("ITMS"),
            Self::TripleQuad => Some("TQMS"),
            Self::SingleQuad => Some("SQMS"),
            Self::TimeOfFlight => Some("TOFMS"),
            Self::FourierTransform => Some("FTMS"),
            Self::Sector => Some("SECTOR"),
            Self::QTOF | Self::Undefined => None,
        }
    }
}

impl MassAnalyzer {
    pub const fn name(&self) -> &'static str {
        match self {
            Self::IonTrap => "ITMS",
            Self::TripleQuad => "TQMS",
            Self::SingleQuad => "SQMS",
            Self::TimeOfFlight => "TOFMS",
            Self::FourierTransform => "FTMS",
            Self::Sector => "SECTOR",
            Self::QTOF => "QTOF",
            Self::Undefined => "unknown",
        }
    }

    pub const fn to_param(self) -> Option<ParamCow<'static>> {
        let val = match self {
            Self::IonTrap => param!("ion trap", 1000264),
            Self::TripleQuad | Self::SingleQuad => param!("quadrupole", 1000081),
            Self::TimeOfFlight => param!("time-of-flight", 1000084),
            Self::FourierTransform => param!(
                "fourier transform ion cyclotron resonance mass spectrometer",
                1000079
            ),
            Self::Sector => param!("magnetic sector", 1000080),
            Self::QTOF | Self::Undefined => return None,
        };
        Some(val)
    }
}

/// The scan polarity
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Polarity {
    Positive,
    Negative,
    Any,
    #[default]
    Undefined,
}

impl FilterField for Polarity {
    fn classify(token: &str) -> Self {
        match token {
            "+" => Self::Positive,
            "-" => Self::Negative,
            "A" => Self::Any,
            _ => Self::Undefined,
        }
    }

    fn as_token(&self) -> Option<&'static str> {
        match self {
            Self::Positive => Some("+"),
            Self::Negative => Some("-"),
            Self::Any => Some("a"),
            Self::Undefined => None,
        }
    }
}

impl Polarity {
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Positive => "positive",
            Self::Negative => "negative",
            Self::Any => "any",
            Self::Undefined => "unknown",
        }
    }

    pub const fn to_param(self) -> Option<ParamCow<'static>> {
        match self {
            Self::Positive => Some(param!("positive scan", 1000130)),
            Self::Negative => Some(param!("negative scan", 1000129)),
            Self::Any | Self::Undefined => None,
        }
    }
}

/// Whether the scan's signal was stored as centroids or as a profile
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum ScanDataType {
    Centroid,
    Profile,
    #[default]
    Undefined,
}

impl FilterField for ScanDataType {
    fn classify(token: &str) -> Self {
        match token {
            "C" => Self::Centroid,
            "P" => Self::Profile,
            _ => Self::Undefined,
        }
    }

    fn as_token(&self) -> Option<&'static str> {
        match self {
            Self::Centroid => Some("c"),
            Self::Profile => Some("p"),
            Self::Undefined => None,
        }
    }
}

impl ScanDataType {
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Centroid => "centroid",
            Self::Profile => "profile",
            Self::Undefined => "unknown",
        }
    }

    pub const fn to_param(self) -> Option<ParamCow<'static>> {
        match self {
            Self::Centroid => Some(param!("centroid spectrum", 1000127)),
            Self::Profile => Some(param!("profile spectrum", 1000128)),
            Self::Undefined => None,
        }
    }
}

/// The ion source's ionization mode
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum IonizationMode {
    EI,
    CI,
    FAB,
    ESI,
    APCI,
    NSI,
    TSP,
    FD,
    MALDI,
    GD,
    /// Chip-based nanospray. Not part of the filter line vocabulary.
    MSChip,
    #[default]
    Undefined,
}

impl FilterField for IonizationMode {
    fn classify(token: &str) -> Self {
        match token {
            "EI" => Self::EI,
            "CI" => Self::CI,
            "FAB" => Self::FAB,
            "ESI" => Self::ESI,
            "APCI" => Self::APCI,
            "NSI" => Self::NSI,
            "TSP" => Self::TSP,
            "FD" => Self::FD,
            "MALDI" => Self::MALDI,
            "GD" => Self::GD,
            _ => Self::Undefined,
        }
    }

    fn as_token(&self) -> Option<&'static str> {
        match self {
            Self::MSChip | Self::Undefined => None,
            _ => Some(self.name()),
        }
    }
}

impl IonizationMode {
    pub const fn name(&self) -> &'static str {
        match self {
            Self::EI => "EI",
            Self::CI => "CI",
            Self::FAB => "FAB",
            Self::ESI => "ESI",
            Self::APCI => "APCI",
            Self::NSI => "NSI",
            Self::TSP => "TSP",
            Self::FD => "FD",
            Self::MALDI => "MALDI",
            Self::GD => "GD",
            Self::MSChip => "MS_CHIP",
            Self::Undefined => "unknown",
        }
    }

    pub const fn to_param(self) -> Option<ParamCow<'static>> {
        let val = match self {
            Self::EI => param!("electron ionization", 1000389),
            Self::CI => param!("chemi-ionization", 1000386),
            Self::FAB => param!("fast atom bombardment ionization", 1000074),
            Self::ESI => param!("electrospray ionization", 1000073),
            Self::APCI => param!("atmospheric pressure chemical ionization", 1000070),
            Self::NSI => param!("nanoelectrospray", 1000398),
            Self::TSP => param!("thermospray ionization", 1000069),
            Self::FD => param!("field desorption", 1000257),
            Self::MALDI => param!("matrix-assisted laser desorption ionization", 1000075),
            Self::GD => param!("glow discharge ionization", 1000259),
            Self::MSChip | Self::Undefined => return None,
        };
        Some(val)
    }
}

/// A three-state switch. A filter line either writes the switch's keyword (on),
/// writes it negated with a leading `!` (off), or omits it entirely.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Toggle {
    #[default]
    Undefined,
    Off,
    On,
}

impl Toggle {
    pub const fn is_on(&self) -> bool {
        matches!(self, Self::On)
    }

    pub const fn is_defined(&self) -> bool {
        !matches!(self, Self::Undefined)
    }
}

impl From<Toggle> for Option<bool> {
    fn from(value: Toggle) -> Self {
        match value {
            Toggle::Undefined => None,
            Toggle::Off => Some(false),
            Toggle::On => Some(true),
        }
    }
}

impl From<bool> for Toggle {
    fn from(value: bool) -> Self {
        if value {
            Self::On
        } else {
            Self::Off
        }
    }
}

/// The boolean switches of a filter line, in the order they are written.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ToggleField {
    Corona,
    Photoionization,
    SourceCID,
    DetectorSet,
    TurboScan,
    DataDependent,
    Wideband,
}

impl ToggleField {
    pub const ALL: [ToggleField; 7] = [
        Self::Corona,
        Self::Photoionization,
        Self::SourceCID,
        Self::DetectorSet,
        Self::TurboScan,
        Self::DataDependent,
        Self::Wideband,
    ];

    pub const fn keyword(&self) -> &'static str {
        match self {
            Self::Corona => "CORONA",
            Self::Photoionization => "PI",
            Self::SourceCID => "SID",
            Self::DetectorSet => "DET",
            Self::TurboScan => "T",
            Self::DataDependent => "D",
            Self::Wideband => "W",
        }
    }

    /// Recognize this switch's keyword in an upper-cased token.
    ///
    /// Source CID may also carry its energy as `SID=<n>`, which counts as on;
    /// the energy itself is not kept.
    pub fn classify(&self, token: &str) -> Toggle {
        let keyword = self.keyword();
        if let Some(negated) = token.strip_prefix('!') {
            if negated == keyword {
                return Toggle::Off;
            }
            return Toggle::Undefined;
        }
        if token == keyword {
            return Toggle::On;
        }
        match self {
            Self::SourceCID => match token.strip_prefix("SID=") {
                Some(_) => Toggle::On,
                None => Toggle::Undefined,
            },
            _ => Toggle::Undefined,
        }
    }

    /// The token written for `state`, in the lower case used by acquisition software
    pub fn as_token(&self, state: Toggle) -> Option<String> {
        let keyword = self.keyword().to_ascii_lowercase();
        match state {
            Toggle::Undefined => None,
            Toggle::On => Some(keyword),
            Toggle::Off => Some(format!("!{keyword}")),
        }
    }
}

/// Accurate mass mode, including the calibration source when active
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum AccurateMassMode {
    NotActive,
    Active,
    ActiveInternalCal,
    ActiveExternalCal,
    #[default]
    Undefined,
}

impl FilterField for AccurateMassMode {
    fn classify(token: &str) -> Self {
        match token {
            "!AM" => Self::NotActive,
            "AM" => Self::Active,
            "AMI" => Self::ActiveInternalCal,
            "AME" => Self::ActiveExternalCal,
            _ => Self::Undefined,
        }
    }

    fn as_token(&self) -> Option<&'static str> {
        match self {
            Self::NotActive => Some("!AM"),
            Self::Active => Some("AM"),
            Self::ActiveInternalCal => Some("AMI"),
            Self::ActiveExternalCal => Some("AME"),
            Self::Undefined => None,
        }
    }
}

impl AccurateMassMode {
    pub const fn is_active(&self) -> bool {
        matches!(
            self,
            Self::Active | Self::ActiveInternalCal | Self::ActiveExternalCal
        )
    }
}

/// The kind of scan performed.
///
/// Only the first seven variants appear in filter lines. The rest are the scan
/// modes of triple quadrupole and QqTOF instruments from other vendors.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum ScanType {
    Full,
    SIM,
    SRM,
    CRM,
    Zoom,
    Q1MS,
    Q3MS,
    Q1Scan,
    Q1MI,
    Q3Scan,
    Q3MI,
    MRM,
    PrecursorScan,
    ProductIonScan,
    NeutralLossScan,
    TOFMS1,
    TOFMS2,
    TOFPrecursorIonScan,
    /// Enhanced product ion
    EPI,
    /// Enhanced resolution
    ER,
    MS3,
    /// Time delayed fragmentation
    TDF,
    /// Enhanced MS
    EMS,
    /// Enhanced multi-charge
    EMC,
    #[default]
    Undefined,
}

impl FilterField for ScanType {
    fn classify(token: &str) -> Self {
        match token {
            "FULL" => Self::Full,
            "SIM" => Self::SIM,
            "SRM" => Self::SRM,
            "CRM" => Self::CRM,
            "Z" => Self::Zoom,
            "Q1MS" => Self::Q1MS,
            "Q3MS" => Self::Q3MS,
            _ => Self::Undefined,
        }
    }

    fn as_token(&self) -> Option<&'static str> {
        match self {
            Self::Full => Some("Full"),
            Self::SIM => Some("SIM"),
            Self::SRM => Some("SRM"),
            Self::CRM => Some("CRM"),
            Self::Zoom => Some("Z"),
            Self::Q1MS => Some("Q1MS"),
            Self::Q3MS => Some("Q3MS"),
            _ => None,
        }
    }
}

impl ScanType {
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Full => "FULL",
            Self::SIM => "SIM",
            Self::SRM => "SRM",
            Self::CRM => "CRM",
            Self::Zoom => "Z",
            Self::Q1MS => "Q1MS",
            Self::Q3MS => "Q3MS",
            Self::Q1Scan => "Q1 Scan",
            Self::Q1MI => "Q1 MI",
            Self::Q3Scan => "Q3 Scan",
            Self::Q3MI => "Q3 MI",
            Self::MRM => "MRM",
            Self::PrecursorScan => "Precursor Scan",
            Self::ProductIonScan => "Product Ion Scan",
            Self::NeutralLossScan => "Neutral Loss Scan",
            Self::TOFMS1 => "TOF MS1",
            Self::TOFMS2 => "TOF MS2",
            Self::TOFPrecursorIonScan => "TOF Precursor Ion Scan",
            Self::EPI => "EPI",
            Self::ER => "ER",
            Self::MS3 => "MS3",
            Self::TDF => "TDF",
            Self::EMS => "EMS",
            Self::EMC => "EMC",
            Self::Undefined => "unknown",
        }
    }

    /// Whether this scan type can be written in a filter line
    pub const fn is_filter_scan_type(&self) -> bool {
        matches!(
            self,
            Self::Full
                | Self::SIM
                | Self::SRM
                | Self::CRM
                | Self::Zoom
                | Self::Q1MS
                | Self::Q3MS
        )
    }

    pub const fn to_param(self) -> Option<ParamCow<'static>> {
        let val = match self {
            Self::Full => param!("full scan", 1000498),
            Self::SIM => param!("selected ion monitoring", 1000205),
            Self::SRM => param!("selected reaction monitoring", 1000206),
            Self::CRM => param!("consecutive reaction monitoring", 1000244),
            Self::Zoom => param!("zoom scan", 1000497),
            _ => return None,
        };
        Some(val)
    }
}

/// The technique used to fragment a selected precursor
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum ActivationMethod {
    CID,
    MPD,
    ECD,
    PQD,
    ETD,
    HCD,
    SA,
    PTR,
    #[default]
    Undefined,
}

impl FilterField for ActivationMethod {
    fn classify(token: &str) -> Self {
        match token {
            "CID" => Self::CID,
            "MPD" => Self::MPD,
            "ECD" => Self::ECD,
            "PQD" => Self::PQD,
            "ETD" => Self::ETD,
            "HCD" => Self::HCD,
            "SA" => Self::SA,
            "PTR" => Self::PTR,
            _ => Self::Undefined,
        }
    }

    fn as_token(&self) -> Option<&'static str> {
        match self {
            Self::CID => Some("cid"),
            Self::MPD => Some("mpd"),
            Self::ECD => Some("ecd"),
            Self::PQD => Some("pqd"),
            Self::ETD => Some("etd"),
            Self::HCD => Some("hcd"),
            Self::SA => Some("sa"),
            Self::PTR => Some("ptr"),
            Self::Undefined => None,
        }
    }
}

impl ActivationMethod {
    pub const fn name(&self) -> &'static str {
        match self {
            Self::CID => "CID",
            Self::MPD => "MPD",
            Self::ECD => "ECD",
            Self::PQD => "PQD",
            Self::ETD => "ETD",
            Self::HCD => "HCD",
            Self::SA => "SA",
            Self::PTR => "PTR",
            Self::Undefined => "unknown",
        }
    }

    pub const fn is_collisional(&self) -> bool {
        matches!(self, Self::CID | Self::HCD | Self::PQD | Self::SA)
    }

    pub const fn is_electronic(&self) -> bool {
        matches!(self, Self::ECD | Self::ETD)
    }

    pub const fn to_param(self) -> Option<ParamCow<'static>> {
        let val = match self {
            Self::CID => param!("collision-induced dissociation", 1000133),
            Self::MPD => param!("infrared multiphoton dissociation", 1000262),
            Self::ECD => param!("electron capture dissociation", 1000250),
            Self::PQD => param!("pulsed q dissociation", 1000599),
            Self::ETD => param!("electron transfer dissociation", 1000598),
            Self::HCD => param!("beam-type collision-induced dissociation", 1000422),
            Self::SA => param!("supplemental collision-induced dissociation", 1002679),
            Self::PTR | Self::Undefined => return None,
        };
        Some(val)
    }
}

macro_rules! display_by_name {
    ($($t:ty),+) => {$(
        impl Display for $t {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.name())
            }
        }
    )+};
}

display_by_name!(
    MassAnalyzer,
    Polarity,
    ScanDataType,
    IonizationMode,
    ScanType,
    ActivationMethod
);

#[cfg(test)]
mod test {
    use super::*;
    use crate::params::ParamLike;

    #[test]
    fn test_classifiers_are_total() {
        for token in ["", "XYZ", "+", "ITMS", "!D", "MS2", "[100-200]"] {
            // Any token must either classify or fall back to the default
            let _ = MassAnalyzer::classify(token);
            let _ = Polarity::classify(token);
            let _ = ScanDataType::classify(token);
            let _ = IonizationMode::classify(token);
            let _ = AccurateMassMode::classify(token);
            let _ = ScanType::classify(token);
            let _ = ActivationMethod::classify(token);
        }
        assert_eq!(MassAnalyzer::classify("+"), MassAnalyzer::Undefined);
        assert!(!MassAnalyzer::classify("TSQMS").is_defined());
        assert_eq!(Polarity::classify("A"), Polarity::Any);
        assert_eq!(ScanType::classify("Z"), ScanType::Zoom);
    }

    #[test]
    fn test_toggle_classify() {
        assert_eq!(ToggleField::DataDependent.classify("D"), Toggle::On);
        assert_eq!(ToggleField::DataDependent.classify("!D"), Toggle::Off);
        assert_eq!(ToggleField::DataDependent.classify("DET"), Toggle::Undefined);
        assert_eq!(ToggleField::DetectorSet.classify("!DET"), Toggle::Off);
        assert_eq!(ToggleField::SourceCID.classify("SID=35.00"), Toggle::On);
        assert_eq!(ToggleField::SourceCID.classify("!SID"), Toggle::Off);
        assert_eq!(ToggleField::Corona.classify("!SID"), Toggle::Undefined);
        assert_eq!(ToggleField::Wideband.classify("!"), Toggle::Undefined);

        assert_eq!(ToggleField::TurboScan.as_token(Toggle::Off).as_deref(), Some("!t"));
        assert_eq!(ToggleField::TurboScan.as_token(Toggle::Undefined), None);
        assert_eq!(Option::<bool>::from(Toggle::On), Some(true));
    }

    #[test]
    fn test_tokens_reclassify() {
        for analyzer in [
            MassAnalyzer::IonTrap,
            MassAnalyzer::TripleQuad,
            MassAnalyzer::SingleQuad,
            MassAnalyzer::TimeOfFlight,
            MassAnalyzer::FourierTransform,
            MassAnalyzer::Sector,
        ] {
            let token = analyzer.as_token().unwrap().to_uppercase();
            assert_eq!(MassAnalyzer::classify(&token), analyzer);
        }
        for method in [
            ActivationMethod::CID,
            ActivationMethod::MPD,
            ActivationMethod::ECD,
            ActivationMethod::PQD,
            ActivationMethod::ETD,
            ActivationMethod::HCD,
            ActivationMethod::SA,
            ActivationMethod::PTR,
        ] {
            let token = method.as_token().unwrap().to_uppercase();
            assert_eq!(ActivationMethod::classify(&token), method);
        }
    }

    #[test]
    fn test_vendor_only_values_have_no_token() {
        assert_eq!(MassAnalyzer::classify("QTOF"), MassAnalyzer::Undefined);
        assert_eq!(MassAnalyzer::QTOF.as_token(), None);
        assert_eq!(IonizationMode::classify("MS_CHIP"), IonizationMode::Undefined);
        assert_eq!(IonizationMode::MSChip.as_token(), None);
        assert_eq!(IonizationMode::MSChip.to_string(), "MS_CHIP");
        assert_eq!(ScanType::classify("MRM"), ScanType::Undefined);
        assert_eq!(ScanType::EPI.as_token(), None);
        assert!(!ScanType::EPI.is_filter_scan_type());
        assert!(ScanType::Zoom.is_filter_scan_type());
    }

    #[test]
    fn test_cv_tables() {
        let p = ActivationMethod::HCD.to_param().unwrap();
        assert_eq!(p.curie().unwrap(), "MS:1000422");
        assert_eq!(
            IonizationMode::NSI.to_param().unwrap().name(),
            "nanoelectrospray"
        );
        assert_eq!(ScanType::SRM.to_param().unwrap().accession(), Some(1000206));
        assert!(ScanType::Q1MS.to_param().is_none());
        assert!(ActivationMethod::Undefined.to_param().is_none());
        assert_eq!(Polarity::Negative.to_param().unwrap().accession, Some(1000129));
        assert_eq!(MassAnalyzer::Undefined.to_string(), "unknown");
        assert!(MassAnalyzer::QTOF.to_param().is_none());
        assert!(IonizationMode::MSChip.to_param().is_none());
        assert_eq!(ScanType::ProductIonScan.to_string(), "Product Ion Scan");
        assert!(ScanType::MRM.to_param().is_none());
        assert_eq!(ActivationMethod::ETD.to_string(), "ETD");
        assert!(ActivationMethod::ETD.is_electronic());
        assert!(ActivationMethod::SA.is_collisional());
    }
}
