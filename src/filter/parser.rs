use lazy_static::lazy_static;
use log::{debug, warn};
use regex::Regex;
use thiserror::Error;

use super::line::{FilterLine, MassRange};
use super::types::{
    AccurateMassMode, ActivationMethod, FilterField, IonizationMode, MassAnalyzer, Polarity,
    ScanDataType, ScanType, Toggle, ToggleField,
};

lazy_static! {
    static ref MS_LEVEL: Regex = Regex::new(r"^MS(\d*)$").unwrap();
    static ref ACTIVATION_PAIR: Regex = Regex::new(r"^([^@]*)@(\D*)(.*)$").unwrap();
    static ref LEADING_NUMBER: Regex =
        Regex::new(r"^[+-]?(\d+\.?\d*|\.\d+)([eE][+-]?\d+)?").unwrap();
}

/// The ways a parent mass/activation token can be malformed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ActivationPairIssue {
    #[error("there is no '@' between the parent mass and the activation")]
    MissingSeparator,
    #[error("the parent mass is not a number")]
    InvalidMass,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FilterLineParseError {
    #[error(
        "MS level {ms_level} requires {expected} activation pairs, but the line ended after {found}"
    )]
    MissingActivationPairs {
        ms_level: u8,
        expected: usize,
        found: usize,
    },
    #[error("Malformed activation pair {token:?} (expected {expected} pairs): {reason}")]
    MalformedActivationPair {
        token: String,
        expected: usize,
        reason: ActivationPairIssue,
    },
    #[error("Unknown activation method {label:?} in {token:?} (expected {expected} pairs)")]
    UnknownActivation {
        token: String,
        label: String,
        expected: usize,
    },
    #[error("The mass range list ended without a closing ']' after {ranges_read} ranges")]
    UnterminatedRangeList { ranges_read: usize },
    #[error("Malformed mass range {token:?}")]
    MalformedRange { token: String },
    #[error("The mass range list is empty")]
    EmptyRangeList,
    #[error("Unparsed tokens at the end of the filter line: {0:?}")]
    UnparsedTokens(Vec<String>),
}

/// What to do with tokens left over after the last recognized field
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TailPolicy {
    /// Keep them in [`FilterLine::unparsed_tail`]
    #[default]
    Keep,
    /// Keep them and emit a warning through the `log` facade
    Warn,
    /// Fail with [`FilterLineParseError::UnparsedTokens`]
    Reject,
}

/// A word-by-word cursor over an upper-cased filter line
#[derive(Debug)]
struct TokenCursor<'a> {
    tokens: Vec<&'a str>,
    position: usize,
}

impl<'a> TokenCursor<'a> {
    fn new(line: &'a str) -> Self {
        Self {
            tokens: line.split_whitespace().collect(),
            position: 0,
        }
    }

    fn peek(&self) -> Option<&'a str> {
        self.tokens.get(self.position).copied()
    }

    fn advance(&mut self) {
        self.position += 1;
    }

    fn next_token(&mut self) -> Option<&'a str> {
        let token = self.peek();
        if token.is_some() {
            self.advance();
        }
        token
    }

    /// Classify the current token as `T`, consuming it only on a match
    fn take_field<T: FilterField>(&mut self) -> T {
        match self.peek() {
            Some(token) => {
                let value = T::classify(token);
                if value.is_defined() {
                    self.advance();
                }
                value
            }
            None => T::default(),
        }
    }

    fn take_toggle(&mut self, field: ToggleField) -> Toggle {
        match self.peek() {
            Some(token) => {
                let value = field.classify(token);
                if value.is_defined() {
                    self.advance();
                }
                value
            }
            None => Toggle::Undefined,
        }
    }

    fn skip_literal(&mut self, literal: &str) -> bool {
        if self.peek() == Some(literal) {
            self.advance();
            true
        } else {
            false
        }
    }

    fn into_rest(self) -> Vec<String> {
        self.tokens[self.position.min(self.tokens.len())..]
            .iter()
            .map(|s| s.to_string())
            .collect()
    }
}

/// Parse an `MS` or `MSn` token into its level
fn parse_ms_level(token: &str) -> Option<u8> {
    let caps = MS_LEVEL.captures(token)?;
    let digits = caps.get(1).map(|m| m.as_str()).unwrap_or_default();
    if digits.is_empty() {
        return Some(1);
    }
    match digits.parse::<u8>() {
        Ok(0) | Err(_) => None,
        Ok(n) => Some(n),
    }
}

/// A single `<mass>@<activation><energy>` token
#[derive(Debug, Clone, Copy, PartialEq)]
struct ActivationPair {
    parent_mass: f64,
    method: ActivationMethod,
    energy: f64,
}

/// Read the number at the start of `text`, ignoring whatever follows it.
///
/// Text without a leading number reads as `0.0`.
fn leading_number(text: &str) -> f64 {
    LEADING_NUMBER
        .find(text)
        .and_then(|m| m.as_str().parse().ok())
        .unwrap_or_default()
}

fn parse_activation_pair(
    token: &str,
    expected: usize,
) -> Result<ActivationPair, FilterLineParseError> {
    let malformed = |reason| FilterLineParseError::MalformedActivationPair {
        token: token.to_string(),
        expected,
        reason,
    };

    let caps = ACTIVATION_PAIR
        .captures(token)
        .ok_or_else(|| malformed(ActivationPairIssue::MissingSeparator))?;
    let mass = caps.get(1).map(|m| m.as_str()).unwrap_or_default();
    let label = caps.get(2).map(|m| m.as_str()).unwrap_or_default();
    let energy = caps.get(3).map(|m| m.as_str()).unwrap_or_default();

    if !mass.starts_with(|c: char| c.is_ascii_digit()) {
        return Err(malformed(ActivationPairIssue::InvalidMass));
    }
    let parent_mass: f64 = mass
        .parse()
        .map_err(|_| malformed(ActivationPairIssue::InvalidMass))?;

    let method = if label.is_empty() {
        ActivationMethod::CID
    } else {
        match ActivationMethod::classify(label) {
            ActivationMethod::Undefined => {
                return Err(FilterLineParseError::UnknownActivation {
                    token: token.to_string(),
                    label: label.to_string(),
                    expected,
                })
            }
            method => method,
        }
    };

    // Supplemental activation stages (`@ETD50.00@HCD25.00`) follow the energy
    // and are not kept.
    Ok(ActivationPair {
        parent_mass,
        method,
        energy: leading_number(energy),
    })
}

/// Split one `low-high` piece of the range list
fn parse_mass_range(piece: &str, token: &str) -> Result<MassRange, FilterLineParseError> {
    let malformed = || FilterLineParseError::MalformedRange {
        token: token.to_string(),
    };
    let (low, high) = piece.split_once('-').ok_or_else(malformed)?;
    let high = high.trim_end_matches(&[']', ','][..]);
    let bound = |text: &str| -> Result<f64, FilterLineParseError> {
        let text = text.trim();
        if !text.starts_with(|c: char| c.is_ascii_digit()) {
            return Err(malformed());
        }
        text.parse().map_err(|_| malformed())
    };
    Ok(MassRange::new(bound(low)?, bound(high)?))
}

/**
Parses filter lines with a configurable [`TailPolicy`].

The fields of a filter line are all optional but always appear in the same
order, so the parser makes a single greedy pass: each field looks at the current
token and consumes it only if the token belongs to its vocabulary, otherwise the
same token is offered to the next field. There is no backtracking, which means
the field order decides how an ambiguous token is read.

The parser holds no mutable state and may be shared freely between threads.

```
use mzfilter::filter::{FilterLineParser, TailPolicy};

let parser = FilterLineParser::new().with_tail_policy(TailPolicy::Reject);
assert!(parser.parse("FTMS + p NSI Full ms [400.00-1600.00]").is_ok());
assert!(parser.parse("FTMS + p NSI Full ms [400.00-1600.00] extra").is_err());
```
*/
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct FilterLineParser {
    tail_policy: TailPolicy,
}

impl FilterLineParser {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_tail_policy(mut self, tail_policy: TailPolicy) -> Self {
        self.tail_policy = tail_policy;
        self
    }

    pub fn tail_policy(&self) -> TailPolicy {
        self.tail_policy
    }

    pub fn set_tail_policy(&mut self, tail_policy: TailPolicy) {
        self.tail_policy = tail_policy;
    }

    /// Parse a single filter line. Empty input yields an all-`Undefined` record.
    pub fn parse(&self, line: &str) -> Result<FilterLine, FilterLineParseError> {
        let normalized = line.to_uppercase();
        let mut cursor = TokenCursor::new(&normalized);
        let mut filter = FilterLine::default();

        Self::scan_fields(&mut cursor, &mut filter);
        if filter.ms_level > 1 {
            Self::read_activation_pairs(&mut cursor, &mut filter)?;
        }
        Self::read_ranges(&mut cursor, &mut filter)?;

        let tail = cursor.into_rest();
        if !tail.is_empty() {
            match self.tail_policy {
                TailPolicy::Keep => {
                    debug!("Unparsed tokens in filter line {line:?}: {tail:?}");
                }
                TailPolicy::Warn => {
                    warn!("Unparsed tokens in filter line {line:?}: {tail:?}");
                }
                TailPolicy::Reject => return Err(FilterLineParseError::UnparsedTokens(tail)),
            }
        }
        filter.unparsed_tail = tail;
        Ok(filter)
    }

    fn scan_fields(cursor: &mut TokenCursor<'_>, filter: &mut FilterLine) {
        filter.analyzer = cursor.take_field::<MassAnalyzer>();
        filter.polarity = cursor.take_field::<Polarity>();
        filter.scan_data_type = cursor.take_field::<ScanDataType>();
        filter.ionization_mode = cursor.take_field::<IonizationMode>();

        for field in [
            ToggleField::Corona,
            ToggleField::Photoionization,
            ToggleField::SourceCID,
            ToggleField::DetectorSet,
            ToggleField::TurboScan,
            ToggleField::DataDependent,
        ] {
            let value = cursor.take_toggle(field);
            filter.toggles.set(field, value);
        }

        // A bare SA here is read as supplemental activation and dropped, so it never
        // reaches the activation vocabulary.
        if cursor.skip_literal("SA") {
            debug!("Skipped supplemental activation token");
        }

        let wideband = cursor.take_toggle(ToggleField::Wideband);
        filter.toggles.set(ToggleField::Wideband, wideband);

        filter.accurate_mass_mode = cursor.take_field::<AccurateMassMode>();
        filter.scan_type = cursor.take_field::<ScanType>();

        if let Some(token) = cursor.peek() {
            match parse_ms_level(token) {
                Some(level) => {
                    filter.ms_level = level;
                    cursor.advance();
                }
                None => {
                    debug!("Token {token:?} is not an MS level");
                }
            }
        }
    }

    fn read_activation_pairs(
        cursor: &mut TokenCursor<'_>,
        filter: &mut FilterLine,
    ) -> Result<(), FilterLineParseError> {
        let expected = filter.ms_level as usize - 1;
        filter.parent_masses.reserve(expected);
        filter.fragmentation_energies.reserve(expected);
        filter.activation_methods.reserve(expected);

        for found in 0..expected {
            let token = cursor
                .next_token()
                .ok_or(FilterLineParseError::MissingActivationPairs {
                    ms_level: filter.ms_level,
                    expected,
                    found,
                })?;
            let pair = parse_activation_pair(token, expected)?;
            filter.parent_masses.push(pair.parent_mass);
            filter.fragmentation_energies.push(pair.energy);
            filter.activation_methods.push(pair.method);
            filter.activation_method = pair.method;
        }
        Ok(())
    }

    fn read_ranges(
        cursor: &mut TokenCursor<'_>,
        filter: &mut FilterLine,
    ) -> Result<(), FilterLineParseError> {
        let mut token = match cursor.peek() {
            Some(token) if token.starts_with('[') => token,
            Some(token) => {
                debug!("Token {token:?} does not open a mass range list");
                return Ok(());
            }
            None => return Ok(()),
        };
        cursor.advance();

        let mut ranges = Vec::new();
        let mut body = &token[1..];
        loop {
            let (content, closed) = match body.split_once(']') {
                Some((content, _)) => (content, true),
                None => (body, false),
            };
            for piece in content.split(',').map(str::trim).filter(|p| !p.is_empty()) {
                ranges.push(parse_mass_range(piece, token)?);
            }
            if closed {
                break;
            }
            token = cursor
                .next_token()
                .ok_or(FilterLineParseError::UnterminatedRangeList {
                    ranges_read: ranges.len(),
                })?;
            body = token;
        }

        if ranges.is_empty() {
            return Err(FilterLineParseError::EmptyRangeList);
        }

        if filter.is_srm() {
            filter.transition_ranges = ranges;
        } else {
            filter.scan_mass_ranges = ranges;
        }
        Ok(())
    }
}

/// Parse a filter line with the default [`FilterLineParser`]
pub fn parse(line: &str) -> Result<FilterLine, FilterLineParseError> {
    FilterLineParser::default().parse(line)
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_ms_level_token() {
        assert_eq!(parse_ms_level("MS"), Some(1));
        assert_eq!(parse_ms_level("MS1"), Some(1));
        assert_eq!(parse_ms_level("MS3"), Some(3));
        assert_eq!(parse_ms_level("MS0"), None);
        assert_eq!(parse_ms_level("MSX"), None);
        assert_eq!(parse_ms_level("MS999"), None);
        assert_eq!(parse_ms_level("Q1MS"), None);
    }

    #[test]
    fn test_activation_pair() {
        let pair = parse_activation_pair("401.432@CID234.2", 1).unwrap();
        assert_eq!(pair.parent_mass, 401.432);
        assert_eq!(pair.method, ActivationMethod::CID);
        assert_eq!(pair.energy, 234.2);

        let pair = parse_activation_pair("401.43@35.00", 1).unwrap();
        assert_eq!(pair.method, ActivationMethod::CID);
        assert_eq!(pair.energy, 35.0);

        let pair = parse_activation_pair("800.10@ETD100.00", 1).unwrap();
        assert_eq!(pair.method, ActivationMethod::ETD);

        assert_eq!(
            parse_activation_pair("401.43CID35.00", 2),
            Err(FilterLineParseError::MalformedActivationPair {
                token: "401.43CID35.00".into(),
                expected: 2,
                reason: ActivationPairIssue::MissingSeparator,
            })
        );
        assert!(matches!(
            parse_activation_pair("X401.43@CID35.00", 1),
            Err(FilterLineParseError::MalformedActivationPair {
                reason: ActivationPairIssue::InvalidMass,
                ..
            })
        ));
        assert!(matches!(
            parse_activation_pair("401.43@FOO35.00", 1),
            Err(FilterLineParseError::UnknownActivation { label, .. }) if label == "FOO"
        ));

        // A label with no energy reads as zero energy
        let pair = parse_activation_pair("401.43@CID", 1).unwrap();
        assert_eq!(pair.method, ActivationMethod::CID);
        assert_eq!(pair.energy, 0.0);

        // Only the first stage of a supplemental activation pair is kept
        let pair = parse_activation_pair("1069.67@ETD50.00@HCD25.00", 1).unwrap();
        assert_eq!(pair.parent_mass, 1069.67);
        assert_eq!(pair.method, ActivationMethod::ETD);
        assert_eq!(pair.energy, 50.0);
    }

    #[test]
    fn test_leading_number() {
        assert_eq!(leading_number("35.00"), 35.0);
        assert_eq!(leading_number("50.00@HCD25.00"), 50.0);
        assert_eq!(leading_number("25"), 25.0);
        assert_eq!(leading_number(""), 0.0);
        assert_eq!(leading_number("@HCD"), 0.0);
    }

    #[test_log::test]
    fn test_ethcd_line() {
        let text = "FTMS + c NSI d Full ms2 1069.67@etd50.00@hcd25.00 [120.00-2150.00]";
        let line = parse(text).unwrap();
        assert_eq!(line.ms_level(), 2);
        assert_eq!(line.parent_masses(), &[1069.67]);
        assert_eq!(line.fragmentation_energies(), &[50.0]);
        assert_eq!(line.activation_method(), ActivationMethod::ETD);
        assert_eq!(line.scan_mass_ranges(), &[MassRange::new(120.0, 2150.0)]);
        assert!(!line.has_unparsed_tail());

        let line = parse("ITMS + c NSI Full ms2 401.43@cid [100.00-810.00]").unwrap();
        assert_eq!(line.fragmentation_energies(), &[0.0]);
        assert_eq!(line.activation_method(), ActivationMethod::CID);
    }

    #[test]
    fn test_mass_range_piece() {
        assert_eq!(
            parse_mass_range("342.00-2000.00]", "[342.00-2000.00]").unwrap(),
            MassRange::new(342.0, 2000.0)
        );
        assert!(parse_mass_range("342.00", "[342.00]").is_err());
        assert!(parse_mass_range("A-B", "[A-B]").is_err());
        for piece in ["100-inf", "INF-200", "100-NaN", "100-infinity]", "100--200"] {
            assert!(parse_mass_range(piece, piece).is_err(), "{piece}");
        }
    }

    #[test_log::test]
    fn test_full_ms1() {
        let line = parse("FTMS + p NSI Full ms [400.00-1600.00]").unwrap();
        assert_eq!(line.analyzer(), MassAnalyzer::FourierTransform);
        assert_eq!(line.polarity(), Polarity::Positive);
        assert_eq!(line.scan_data_type(), ScanDataType::Profile);
        assert_eq!(line.ionization_mode(), IonizationMode::NSI);
        assert_eq!(line.scan_type(), ScanType::Full);
        assert_eq!(line.ms_level(), 1);
        assert_eq!(line.scan_mass_ranges(), &[MassRange::new(400.0, 1600.0)]);
        assert!(line.transition_ranges().is_empty());
        assert!(line.parent_masses().is_empty());
        assert!(!line.has_unparsed_tail());
    }

    #[test_log::test]
    fn test_dependent_ms2() {
        let line = parse("ITMS + c NSI d Full ms2 401.43@cid35.00 [100.00-810.00]").unwrap();
        assert_eq!(line.analyzer(), MassAnalyzer::IonTrap);
        assert_eq!(line.scan_data_type(), ScanDataType::Centroid);
        assert_eq!(line.data_dependent(), Toggle::On);
        assert!(line.is_data_dependent());
        assert_eq!(line.ms_level(), 2);
        assert_eq!(line.parent_masses(), &[401.43]);
        assert_eq!(line.fragmentation_energies(), &[35.0]);
        assert_eq!(line.activation_method(), ActivationMethod::CID);
        assert_eq!(line.scan_mass_ranges(), &[MassRange::new(100.0, 810.0)]);
        assert_eq!(line.precursor_mz(), Some(401.43));
    }

    #[test]
    fn test_empty_line() {
        for text in ["", "   ", "\t\n"] {
            let line = parse(text).unwrap();
            assert_eq!(line, FilterLine::default());
        }
    }

    #[test]
    fn test_missing_activation_pair() {
        let err = parse("ITMS + c NSI Full ms3 401.43@cid35.00").unwrap_err();
        assert_eq!(
            err,
            FilterLineParseError::MissingActivationPairs {
                ms_level: 3,
                expected: 2,
                found: 1
            }
        );
    }

    #[test]
    fn test_unmatched_token_lands_in_tail() {
        let line = parse("+ TSQMS").unwrap();
        assert_eq!(line.analyzer(), MassAnalyzer::Undefined);
        assert_eq!(line.polarity(), Polarity::Positive);
        assert_eq!(line.unparsed_tail(), &["TSQMS".to_string()]);
    }

    #[test]
    fn test_srm_transitions() {
        let line = parse("SRM ms2 503.20@cid25.00 [458.20-459.20]").unwrap();
        assert_eq!(line.scan_type(), ScanType::SRM);
        assert_eq!(line.transition_ranges(), &[MassRange::new(458.2, 459.2)]);
        assert!(line.scan_mass_ranges().is_empty());
        assert_eq!(line.ranges(), line.transition_ranges());
    }

    #[test]
    fn test_bare_sa_is_consumed() {
        // The scanner drops a bare SA after the data dependent switch; it is not
        // stored anywhere and does not become the activation method.
        let line = parse("ITMS + c NSI d sa Full ms2 401.43@cid35.00 [100.00-810.00]").unwrap();
        assert_eq!(line.scan_type(), ScanType::Full);
        assert_eq!(line.activation_method(), ActivationMethod::CID);
        assert!(!line.has_unparsed_tail());

        let line = parse("SA").unwrap();
        assert_eq!(line, FilterLine::default());

        // SA written as an activation label is still recognized
        let line = parse("FTMS + c NSI d Full ms2 401.43@sa35.00 [100.00-810.00]").unwrap();
        assert_eq!(line.activation_method(), ActivationMethod::SA);
    }

    #[test]
    fn test_tail_policy() {
        let text = "FTMS + p NSI Full ms [400.00-1600.00] trailing words";
        let line = FilterLineParser::new()
            .with_tail_policy(TailPolicy::Warn)
            .parse(text)
            .unwrap();
        assert_eq!(line.unparsed_tail(), &["TRAILING".to_string(), "WORDS".to_string()]);

        let mut parser = FilterLineParser::new();
        parser.set_tail_policy(TailPolicy::Reject);
        assert_eq!(parser.tail_policy(), TailPolicy::Reject);
        assert_eq!(
            parser.parse(text),
            Err(FilterLineParseError::UnparsedTokens(vec![
                "TRAILING".into(),
                "WORDS".into()
            ]))
        );
    }

    #[test]
    fn test_range_errors() {
        assert_eq!(
            parse("FTMS + p NSI Full ms [400.00-1600.00,"),
            Err(FilterLineParseError::UnterminatedRangeList { ranges_read: 1 })
        );
        assert_eq!(
            parse("FTMS + p NSI Full ms ["),
            Err(FilterLineParseError::UnterminatedRangeList { ranges_read: 0 })
        );
        assert_eq!(
            parse("FTMS + p NSI Full ms []"),
            Err(FilterLineParseError::EmptyRangeList)
        );
        assert!(matches!(
            parse("FTMS + p NSI Full ms [400.00]"),
            Err(FilterLineParseError::MalformedRange { .. })
        ));
        assert_eq!(
            parse("FTMS + p NSI Full ms [100-inf]"),
            Err(FilterLineParseError::MalformedRange {
                token: "[100-INF]".into()
            })
        );
        assert!(matches!(
            parse("FTMS + p NSI Full ms [NAN-200]"),
            Err(FilterLineParseError::MalformedRange { .. })
        ));
    }
}
