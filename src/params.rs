//! Controlled vocabulary parameters used to describe filter line fields with
//! PSI-MS ontology terms.
use std::borrow::Cow;
use std::fmt::Display;
use std::str;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

pub trait ParamLike {
    fn name(&self) -> &str;
    fn value(&self) -> &str;
    fn accession(&self) -> Option<u32>;
    fn controlled_vocabulary(&self) -> Option<ControlledVocabulary>;
    fn unit(&self) -> Unit;

    fn coerce<T: str::FromStr>(&self) -> Result<T, T::Err> {
        self.value().parse::<T>()
    }

    fn curie(&self) -> Option<String> {
        let cv = self.controlled_vocabulary()?.as_option()?;
        let acc = self.accession()?;
        Some(format!("{}:{:07}", cv.prefix(), acc))
    }
}

/// A parameter whose text may be borrowed, so that the static lookup tables
/// for filter line enums can be built without allocating.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParamCow<'a> {
    pub name: Cow<'a, str>,
    pub value: Cow<'a, str>,
    pub accession: Option<u32>,
    pub controlled_vocabulary: Option<ControlledVocabulary>,
    pub unit: Unit,
}

impl<'a> ParamCow<'a> {
    pub const fn const_new(
        name: &'a str,
        value: &'a str,
        accession: Option<u32>,
        controlled_vocabulary: Option<ControlledVocabulary>,
        unit: Unit,
    ) -> Self {
        Self {
            name: Cow::Borrowed(name),
            value: Cow::Borrowed(value),
            accession,
            controlled_vocabulary,
            unit,
        }
    }
}

impl ParamLike for ParamCow<'_> {
    fn name(&self) -> &str {
        &self.name
    }

    fn value(&self) -> &str {
        &self.value
    }

    fn accession(&self) -> Option<u32> {
        self.accession
    }

    fn controlled_vocabulary(&self) -> Option<ControlledVocabulary> {
        self.controlled_vocabulary
    }

    fn unit(&self) -> Unit {
        self.unit
    }
}

impl<'a> From<ParamCow<'a>> for Param {
    fn from(value: ParamCow<'a>) -> Self {
        Param {
            name: value.name.into_owned(),
            value: value.value.into_owned(),
            accession: value.accession,
            controlled_vocabulary: value.controlled_vocabulary,
            unit: value.unit,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Param {
    pub name: String,
    pub value: String,
    pub accession: Option<u32>,
    pub controlled_vocabulary: Option<ControlledVocabulary>,
    pub unit: Unit,
}

impl Param {
    /// Attach a value to a (usually constant) term
    pub fn with_value<V: ToString>(mut self, value: V) -> Param {
        self.value = value.to_string();
        self
    }
}

impl ParamLike for Param {
    fn name(&self) -> &str {
        &self.name
    }

    fn value(&self) -> &str {
        &self.value
    }

    fn accession(&self) -> Option<u32> {
        self.accession
    }

    fn controlled_vocabulary(&self) -> Option<ControlledVocabulary> {
        self.controlled_vocabulary
    }

    fn unit(&self) -> Unit {
        self.unit
    }
}

impl Display for Param {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.curie() {
            Some(curie) => write!(f, "{curie}|{}={}", self.name, self.value)?,
            None => write!(f, "{}={}", self.name, self.value)?,
        }
        match self.unit.for_param() {
            (_, "") => Ok(()),
            (_, unit_name) => write!(f, " {unit_name}"),
        }
    }
}

#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum ControlledVocabulary {
    MS,
    UO,
    Unknown,
}

const MS_CV: &str = "MS";
const UO_CV: &str = "UO";

impl ControlledVocabulary {
    pub const fn prefix(&self) -> &'static str {
        match self {
            Self::MS => MS_CV,
            Self::UO => UO_CV,
            Self::Unknown => "?",
        }
    }

    pub fn as_option(&self) -> Option<Self> {
        match self {
            Self::Unknown => None,
            _ => Some(*self),
        }
    }

    /// Build a value-less term from this vocabulary at compile time
    pub const fn const_param_ident(&self, name: &'static str, accession: u32) -> ParamCow<'static> {
        ParamCow::const_new(name, "", Some(accession), Some(*self), Unit::Unknown)
    }

    pub const fn const_param_ident_unit(
        &self,
        name: &'static str,
        accession: u32,
        unit: Unit,
    ) -> ParamCow<'static> {
        ParamCow::const_new(name, "", Some(accession), Some(*self), unit)
    }
}

impl Display for ControlledVocabulary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.prefix())
    }
}

pub type ParamList = Vec<Param>;

/// Units that a term's value might have
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Unit {
    MZ,
    Electronvolt,
    #[default]
    Unknown,
}

impl Unit {
    pub const fn for_param(&self) -> (&'static str, &'static str) {
        match self {
            Self::MZ => ("MS:1000040", "m/z"),
            Self::Electronvolt => ("UO:0000266", "electronvolt"),
            Self::Unknown => ("", ""),
        }
    }
}
