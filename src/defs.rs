/*
 * core types
 */

use indexmap::IndexMap;
use serde_derive::Serialize;
use std::collections::BTreeSet;
use std::convert::TryFrom;
use std::fmt;
use std::ops::Range;

// one row of a source table, columns in header order
pub type Row = IndexMap<String, String>;

// mandate history columns run from 2004 up to (not including) 2016
pub const POLITICAL_YEARS: Range<u16> = 2004..2016;

// a postal code. always compared numerically, whatever the source formatting
// ("1000", " 1000", "1000.0" are all the same code)
#[derive(Debug, PartialEq, Eq, PartialOrd, Ord, Clone, Copy, Hash, Serialize)]
#[serde(transparent)]
pub struct Zipcode(pub u32);

impl Zipcode {
    pub fn parse(s: &str) -> Option<Zipcode> {
        let s = s.trim();
        if s.is_empty() {
            return None;
        }
        if let Ok(v) = s.parse::<u32>() {
            return Some(Zipcode(v));
        }
        // integral floats ("1000.0") are accepted, anything else is not a code
        match s.parse::<f64>() {
            Ok(v) if v.fract() == 0.0 && v >= 0.0 && v <= f64::from(u32::MAX) => {
                Some(Zipcode(v as u32))
            }
            _ => None,
        }
    }

    // all digits but the last
    pub fn district(self) -> u32 {
        self.0 / 10
    }
}

impl fmt::Display for Zipcode {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Lenient integer parse of a loosely typed field: optional leading
/// whitespace and sign, then the leading run of ASCII digits. Trailing
/// garbage is ignored (`"12 ans"` is 12); no digits at all is `None`.
pub fn parse_int(s: &str) -> Option<i64> {
    let s = s.trim_start();
    let (negative, digits) = match s.as_bytes().first() {
        Some(b'-') => (true, &s[1..]),
        Some(b'+') => (false, &s[1..]),
        _ => (false, s),
    };
    let end = digits
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or_else(|| digits.len());
    if end == 0 {
        return None;
    }
    let value: i64 = digits[..end].parse().ok()?;
    Some(if negative { -value } else { value })
}

// case-insensitive comparison without allocating
pub fn eq_ignore_case(a: &str, b: &str) -> bool {
    a.chars()
        .flat_map(char::to_lowercase)
        .eq(b.chars().flat_map(char::to_lowercase))
}

// "saint-josse-ten-noode" -> "Saint-Josse-Ten-Noode"
pub fn title_case(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut word_start = true;
    for c in s.chars() {
        if word_start {
            out.extend(c.to_uppercase());
        } else {
            out.extend(c.to_lowercase());
        }
        word_start = c.is_whitespace() || c == '-' || c == '\'';
    }
    out
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct City {
    pub zipcode: Option<Zipcode>,
    pub name: String,
    // province, region, ... whatever else the catalog carries
    #[serde(flatten)]
    pub attributes: IndexMap<String, String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ListInfo {
    pub sigle: String,
    // restricts the entry to one locality; None applies everywhere
    #[serde(skip_serializing_if = "Option::is_none")]
    pub zipcode: Option<Zipcode>,
    #[serde(flatten)]
    pub fields: IndexMap<String, String>,
}

impl ListInfo {
    pub fn applies_to(&self, zipcode: Option<Zipcode>) -> bool {
        match self.zipcode {
            None => true,
            Some(z) => Some(z) == zipcode,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CandidateRecord {
    pub firstname: String,
    pub lastname: String,
    pub city: String,
    pub zipcode: String,
    pub list: String,
    pub party: String,
    pub position: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cumuleo_url: Option<String>,
    pub cumuls_2017: String,
    // years (from any year-named column) holding a non-empty value
    #[serde(skip)]
    pub active_years: BTreeSet<u16>,
    // every other column, year columns included, kept verbatim
    #[serde(flatten)]
    pub extra: IndexMap<String, String>,
}

impl CandidateRecord {
    pub fn zipcode(&self) -> Option<Zipcode> {
        Zipcode::parse(&self.zipcode)
    }

    pub fn has_cumuleo(&self) -> bool {
        self.cumuleo_url.is_some()
    }

    // unparseable or negative counts contribute nothing
    pub fn cumuls(&self) -> u32 {
        parse_int(&self.cumuls_2017)
            .and_then(|v| u32::try_from(v).ok())
            .unwrap_or(0)
    }

    pub fn rank(&self) -> Option<i64> {
        parse_int(&self.position)
    }

    pub fn political_years(&self) -> u32 {
        POLITICAL_YEARS
            .filter(|year| self.active_years.contains(year))
            .count() as u32
    }

    pub fn party(&self) -> Option<&str> {
        if self.party.is_empty() {
            None
        } else {
            Some(&self.party)
        }
    }
}
