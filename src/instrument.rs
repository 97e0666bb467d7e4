//! Lookup tables for the instrument that acquired a run.
//!
//! A raw file reader knows the instrument's model name and its acquisition
//! software, but not the PSI-MS terms for them. These tables supply the terms and
//! the hardware a model implies.
#![allow(clippy::upper_case_acronyms)]
use std::fmt::Display;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::filter::MassAnalyzer;
use crate::params::{ControlledVocabulary, Param, ParamCow, ParamList};

macro_rules! param {
    ($name:expr, $acc:expr) => {
        ControlledVocabulary::MS.const_param_ident($name, $acc)
    };
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Manufacturer {
    Thermo,
    ThermoScientific,
    ThermoFinnigan,
    Waters,
    AbiSciex,
    Agilent,
    #[default]
    Unknown,
}

impl Manufacturer {
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Thermo => "Thermo",
            Self::ThermoScientific => "Thermo Scientific",
            Self::ThermoFinnigan => "Thermo Finnigan",
            Self::Waters => "Waters",
            Self::AbiSciex => "ABI / SCIEX",
            Self::Agilent => "Agilent",
            Self::Unknown => "unknown",
        }
    }

    /// The generic instrument model term for this vendor
    pub const fn to_param(self) -> Option<ParamCow<'static>> {
        let val = match self {
            Self::Thermo => param!("Thermo Fisher Scientific instrument model", 1000483),
            Self::ThermoScientific => param!("Thermo Scientific instrument model", 1000494),
            Self::ThermoFinnigan => param!("Thermo Finnigan instrument model", 1000125),
            Self::Waters => param!("Waters instrument model", 1000126),
            Self::AbiSciex => param!("SCIEX instrument model", 1000121),
            Self::Agilent => param!("Agilent instrument model", 1000490),
            Self::Unknown => return None,
        };
        Some(val)
    }

    /// The vendor's acquisition software
    pub const fn acquisition_software(&self) -> AcquisitionSoftware {
        match self {
            Self::Thermo | Self::ThermoScientific | Self::ThermoFinnigan => {
                AcquisitionSoftware::Xcalibur
            }
            Self::Waters => AcquisitionSoftware::MassLynx,
            Self::AbiSciex => AcquisitionSoftware::Analyst,
            Self::Agilent => AcquisitionSoftware::MassHunter,
            Self::Unknown => AcquisitionSoftware::Unknown,
        }
    }
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum AcquisitionSoftware {
    Xcalibur,
    MassLynx,
    Analyst,
    AnalystQS,
    MassHunter,
    #[default]
    Unknown,
}

impl AcquisitionSoftware {
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Xcalibur => "Xcalibur",
            Self::MassLynx => "MassLynx",
            Self::Analyst => "Analyst",
            Self::AnalystQS => "AnalystQS",
            Self::MassHunter => "MassHunter",
            Self::Unknown => "unknown",
        }
    }

    pub const fn to_param(self) -> Option<ParamCow<'static>> {
        match self {
            Self::Xcalibur => Some(param!("Xcalibur", 1000532)),
            Self::MassLynx => Some(param!("MassLynx", 1000534)),
            Self::Analyst => Some(param!("Analyst", 1000551)),
            Self::AnalystQS | Self::MassHunter | Self::Unknown => None,
        }
    }
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum DetectorType {
    ElectronMultiplier,
    InductiveDetector,
    #[default]
    Unknown,
}

impl DetectorType {
    pub const fn name(&self) -> &'static str {
        match self {
            Self::ElectronMultiplier => "electron multiplier",
            Self::InductiveDetector => "inductive detector",
            Self::Unknown => "unknown",
        }
    }

    pub const fn to_param(self) -> Option<ParamCow<'static>> {
        match self {
            Self::ElectronMultiplier => Some(param!("electron multiplier", 1000253)),
            Self::InductiveDetector => Some(param!("inductive detector", 1000624)),
            Self::Unknown => None,
        }
    }
}

/// The axes SCIEX instruments use to address a spectrum instead of a scan number
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum ScanCoordinateType {
    Sample,
    Period,
    Experiment,
    Cycle,
    #[default]
    Undefined,
}

impl ScanCoordinateType {
    pub const ALL: [ScanCoordinateType; 4] = [
        Self::Sample,
        Self::Period,
        Self::Experiment,
        Self::Cycle,
    ];

    pub const fn name(&self) -> &'static str {
        match self {
            Self::Sample => "sample",
            Self::Period => "period",
            Self::Experiment => "experiment",
            Self::Cycle => "cycle",
            Self::Undefined => "unknown",
        }
    }
}

#[allow(non_camel_case_types)]
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum InstrumentModelType {
    LTQ,
    LTQ_XL,
    LTQ_FT,
    LTQ_FT_Ultra,
    LTQ_Orbitrap,
    LTQ_Orbitrap_Discovery,
    LTQ_Orbitrap_XL,
    LXQ,
    TSQ_Quantum_Access,
    LCQ_Advantage,
    LCQ_Classic,
    LCQ_Deca,
    LCQ_Deca_XP,
    LCQ_Deca_XP_Plus,
    LCQ_Fleet,

    Q_Tof_Micro,
    Q_Tof_Ultima,

    API_100,
    API_100_LC,
    API_150_MCA,
    API_150_EX,
    API_165,
    API_300,
    API_350,
    API_365,
    API_2000,
    API_3000,
    API_4000,
    Generic_Single_Quad,
    QTrap,
    QTrap_4000,
    API_3200,
    QTrap_3200,
    API_5000,
    ELAN_6000,
    QStar,
    API_QStar_Pulsar,
    API_QStar_Pulsar_i,
    QStar_XL_System,

    Agilent_TOF,

    #[default]
    Unknown,
}

impl InstrumentModelType {
    pub const ALL: [InstrumentModelType; 40] = [
        Self::LTQ,
        Self::LTQ_XL,
        Self::LTQ_FT,
        Self::LTQ_FT_Ultra,
        Self::LTQ_Orbitrap,
        Self::LTQ_Orbitrap_Discovery,
        Self::LTQ_Orbitrap_XL,
        Self::LXQ,
        Self::TSQ_Quantum_Access,
        Self::LCQ_Advantage,
        Self::LCQ_Classic,
        Self::LCQ_Deca,
        Self::LCQ_Deca_XP,
        Self::LCQ_Deca_XP_Plus,
        Self::LCQ_Fleet,
        Self::Q_Tof_Micro,
        Self::Q_Tof_Ultima,
        Self::API_100,
        Self::API_100_LC,
        Self::API_150_MCA,
        Self::API_150_EX,
        Self::API_165,
        Self::API_300,
        Self::API_350,
        Self::API_365,
        Self::API_2000,
        Self::API_3000,
        Self::API_4000,
        Self::Generic_Single_Quad,
        Self::QTrap,
        Self::QTrap_4000,
        Self::API_3200,
        Self::QTrap_3200,
        Self::API_5000,
        Self::ELAN_6000,
        Self::QStar,
        Self::API_QStar_Pulsar,
        Self::API_QStar_Pulsar_i,
        Self::QStar_XL_System,
        Self::Agilent_TOF,
    ];

    /// The model name as the vendor writes it
    pub const fn name(&self) -> &'static str {
        match self {
            Self::LTQ => "LTQ",
            Self::LTQ_XL => "LTQ XL",
            Self::LTQ_FT => "LTQ FT",
            Self::LTQ_FT_Ultra => "LTQ FT Ultra",
            Self::LTQ_Orbitrap => "LTQ Orbitrap",
            Self::LTQ_Orbitrap_Discovery => "LTQ Orbitrap Discovery",
            Self::LTQ_Orbitrap_XL => "LTQ Orbitrap XL",
            Self::LXQ => "LXQ",
            Self::TSQ_Quantum_Access => "TSQ Quantum Access",
            Self::LCQ_Advantage => "LCQ Advantage",
            Self::LCQ_Classic => "LCQ Classic",
            Self::LCQ_Deca => "LCQ Deca",
            Self::LCQ_Deca_XP => "LCQ Deca XP",
            Self::LCQ_Deca_XP_Plus => "LCQ Deca XP Plus",
            Self::LCQ_Fleet => "LCQ Fleet",
            Self::Q_Tof_Micro => "Q-Tof micro",
            Self::Q_Tof_Ultima => "Q-Tof Ultima",
            Self::API_100 => "API 100",
            Self::API_100_LC => "API 100 LC",
            Self::API_150_MCA => "API 150 MCA",
            Self::API_150_EX => "API 150 EX",
            Self::API_165 => "API 165",
            Self::API_300 => "API 300",
            Self::API_350 => "API 350",
            Self::API_365 => "API 365",
            Self::API_2000 => "API 2000",
            Self::API_3000 => "API 3000",
            Self::API_4000 => "API 4000",
            Self::Generic_Single_Quad => "Generic Single Quad",
            Self::QTrap => "QTrap",
            Self::QTrap_4000 => "4000 Q Trap",
            Self::API_3200 => "API 3200",
            Self::QTrap_3200 => "3200 Q Trap",
            Self::API_5000 => "API 5000",
            Self::ELAN_6000 => "ELAN 6000",
            Self::QStar => "QStar",
            Self::API_QStar_Pulsar => "API QStar Pulsar",
            Self::API_QStar_Pulsar_i => "API QStar Pulsar i",
            Self::QStar_XL_System => "QSTAR XL System",
            Self::Agilent_TOF => "Agilent TOF",
            Self::Unknown => "unknown",
        }
    }

    pub const fn manufacturer(&self) -> Manufacturer {
        match self {
            Self::LTQ
            | Self::LTQ_XL
            | Self::LTQ_FT
            | Self::LTQ_FT_Ultra
            | Self::LTQ_Orbitrap
            | Self::LTQ_Orbitrap_Discovery
            | Self::LTQ_Orbitrap_XL
            | Self::LXQ
            | Self::TSQ_Quantum_Access => Manufacturer::ThermoScientific,
            Self::LCQ_Advantage
            | Self::LCQ_Classic
            | Self::LCQ_Deca
            | Self::LCQ_Deca_XP
            | Self::LCQ_Deca_XP_Plus
            | Self::LCQ_Fleet => Manufacturer::ThermoFinnigan,
            Self::Q_Tof_Micro | Self::Q_Tof_Ultima => Manufacturer::Waters,
            Self::Agilent_TOF => Manufacturer::Agilent,
            Self::Unknown => Manufacturer::Unknown,
            _ => Manufacturer::AbiSciex,
        }
    }

    /// The model's own term, or its vendor's generic model term when it has none
    pub const fn to_param(self) -> Option<ParamCow<'static>> {
        let val = match self {
            Self::LTQ => param!("LTQ", 1000447),
            Self::LTQ_XL => param!("LTQ XL", 1000854),
            Self::LTQ_FT => param!("LTQ FT", 1000448),
            Self::LTQ_FT_Ultra => param!("LTQ FT Ultra", 1000557),
            Self::LTQ_Orbitrap => param!("LTQ Orbitrap", 1000449),
            Self::LTQ_Orbitrap_Discovery => param!("LTQ Orbitrap Discovery", 1000555),
            Self::LTQ_Orbitrap_XL => param!("LTQ Orbitrap XL", 1000556),
            Self::LXQ => param!("LXQ", 1000450),
            Self::TSQ_Quantum_Access => param!("TSQ Quantum Access", 1000644),
            Self::LCQ_Advantage => param!("LCQ Advantage", 1000167),
            Self::LCQ_Classic => param!("LCQ Classic", 1000168),
            Self::LCQ_Deca => param!("LCQ Deca", 1000554),
            Self::LCQ_Deca_XP_Plus => param!("LCQ Deca XP Plus", 1000169),
            Self::LCQ_Fleet => param!("LCQ Fleet", 1000578),
            Self::Q_Tof_Micro => param!("Q-Tof micro", 1000188),
            Self::Q_Tof_Ultima => param!("Q-Tof ultima", 1000189),
            _ => return self.manufacturer().to_param(),
        };
        Some(val)
    }

    pub fn analyzers(&self) -> Vec<MassAnalyzer> {
        match self {
            Self::LTQ
            | Self::LTQ_XL
            | Self::LXQ
            | Self::LCQ_Advantage
            | Self::LCQ_Classic
            | Self::LCQ_Deca
            | Self::LCQ_Deca_XP
            | Self::LCQ_Deca_XP_Plus
            | Self::LCQ_Fleet => vec![MassAnalyzer::IonTrap],

            // Orbitrap scans are written as FTMS in filter lines
            Self::LTQ_FT
            | Self::LTQ_FT_Ultra
            | Self::LTQ_Orbitrap
            | Self::LTQ_Orbitrap_Discovery
            | Self::LTQ_Orbitrap_XL => {
                vec![MassAnalyzer::FourierTransform, MassAnalyzer::IonTrap]
            }

            Self::TSQ_Quantum_Access
            | Self::API_300
            | Self::API_350
            | Self::API_365
            | Self::API_2000
            | Self::API_3000
            | Self::API_3200
            | Self::API_4000
            | Self::API_5000 => vec![MassAnalyzer::TripleQuad],

            Self::QTrap | Self::QTrap_3200 | Self::QTrap_4000 => {
                vec![MassAnalyzer::TripleQuad, MassAnalyzer::IonTrap]
            }

            Self::API_100
            | Self::API_100_LC
            | Self::API_150_MCA
            | Self::API_150_EX
            | Self::API_165
            | Self::Generic_Single_Quad
            | Self::ELAN_6000 => vec![MassAnalyzer::SingleQuad],

            Self::Q_Tof_Micro
            | Self::Q_Tof_Ultima
            | Self::QStar
            | Self::API_QStar_Pulsar
            | Self::API_QStar_Pulsar_i
            | Self::QStar_XL_System => vec![MassAnalyzer::QTOF],

            Self::Agilent_TOF => vec![MassAnalyzer::TimeOfFlight],

            Self::Unknown => Vec::new(),
        }
    }

    pub fn detectors(&self) -> Vec<DetectorType> {
        match self {
            Self::LTQ_FT
            | Self::LTQ_FT_Ultra
            | Self::LTQ_Orbitrap
            | Self::LTQ_Orbitrap_Discovery
            | Self::LTQ_Orbitrap_XL => {
                vec![DetectorType::InductiveDetector, DetectorType::ElectronMultiplier]
            }
            Self::Unknown => Vec::new(),
            _ => vec![DetectorType::ElectronMultiplier],
        }
    }
}

/// Look up an instrument model by its name, ignoring case and spaces
pub fn parse_instrument_model(instrument_model: &str) -> InstrumentModelType {
    let model_type = instrument_model.trim().to_uppercase();
    let model_type_no_spaces = model_type.replace(' ', "");
    for model in InstrumentModelType::ALL {
        let key = model.name().to_uppercase();
        if key == model_type || key.replace(' ', "") == model_type_no_spaces {
            log::debug!("Matched instrument model '{instrument_model}' -> {model:?}");
            return model;
        }
    }
    log::warn!(
        "Failed to infer instrument model from name string '{instrument_model}' - will use Unknown"
    );
    InstrumentModelType::Unknown
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
    Manufacturer,
    AcquisitionSoftware,
    DetectorType,
    ScanCoordinateType,
    InstrumentModelType
);

/// What a [`ScanDataProvider`](crate::provider::ScanDataProvider) knows about
/// the instrument that recorded its scans
#[derive(Debug, Default, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct InstrumentInfo {
    pub model: InstrumentModelType,
    pub manufacturer: Manufacturer,
    pub acquisition_software: AcquisitionSoftware,
    pub software_version: Option<String>,
    pub analyzers: Vec<MassAnalyzer>,
    pub detectors: Vec<DetectorType>,
}

impl InstrumentInfo {
    /// Fill in everything the model implies
    pub fn from_model(model: InstrumentModelType) -> Self {
        let manufacturer = model.manufacturer();
        Self {
            model,
            manufacturer,
            acquisition_software: manufacturer.acquisition_software(),
            software_version: None,
            analyzers: model.analyzers(),
            detectors: model.detectors(),
        }
    }

    /// Like [`InstrumentInfo::from_model`], starting from the vendor's model name
    pub fn from_model_name(name: &str) -> Self {
        Self::from_model(parse_instrument_model(name))
    }

    pub fn with_software_version<S: Into<String>>(mut self, version: S) -> Self {
        self.software_version = Some(version.into());
        self
    }

    pub fn to_params(&self) -> ParamList {
        let mut params: ParamList = Vec::new();
        params.extend(self.model.to_param().map(Param::from));
        if let Some(p) = self.acquisition_software.to_param() {
            let mut p = Param::from(p);
            if let Some(version) = self.software_version.as_deref() {
                p = p.with_value(version);
            }
            params.push(p);
        }
        params.extend(
            self.analyzers
                .iter()
                .filter_map(|a| a.to_param())
                .map(Param::from),
        );
        params.extend(
            self.detectors
                .iter()
                .filter_map(|d| d.to_param())
                .map(Param::from),
        );
        params
    }
}
