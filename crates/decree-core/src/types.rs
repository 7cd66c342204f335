//! Shared types used across the harvesting pipeline.
//!
//! `Decree` is the accumulator that flows through every stage: the page
//! reader creates it, the classifier fills the program fields and the
//! enrichment engine fills `cnpj` and `framing`.

use crate::error::CoreError;
use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Tax-incentive programs a decree can be classified under.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Program {
    /// Programa de Desenvolvimento do Estado de Pernambuco
    #[serde(rename = "PRODEPE")]
    Prodepe,
    /// Programa de Estímulo à Indústria do Estado de Pernambuco
    #[serde(rename = "PROIND")]
    Proind,
}

impl Program {
    /// Marker token identifying the program in a decree summary.
    #[must_use]
    pub fn marker(self) -> &'static str {
        match self {
            Self::Prodepe => "PRODEPE",
            Self::Proind => "PROIND",
        }
    }
}

impl fmt::Display for Program {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.marker())
    }
}

/// Kind of action a decree performs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DecreeType {
    /// Original grant (concessão)
    #[serde(rename = "C")]
    Grant,
    /// Amendment (alteração)
    #[serde(rename = "A")]
    Amendment,
    /// Extension (prorrogação)
    #[serde(rename = "P")]
    Extension,
    /// Renewal (renovação)
    #[serde(rename = "R")]
    Renewal,
    /// Transfer (transferência)
    #[serde(rename = "T")]
    Transfer,
}

impl DecreeType {
    /// Single-letter code used in exports.
    #[must_use]
    pub fn code(self) -> char {
        match self {
            Self::Grant => 'C',
            Self::Amendment => 'A',
            Self::Extension => 'P',
            Self::Renewal => 'R',
            Self::Transfer => 'T',
        }
    }
}

impl fmt::Display for DecreeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// Regulatory framing of the benefited company.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Framing {
    /// Industrial cluster or industrial activity
    I,
    /// Distribution center
    C,
    /// Wholesale import trade
    P,
}

impl fmt::Display for Framing {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let code = match self {
            Self::I => "I",
            Self::C => "C",
            Self::P => "P",
        };
        f.write_str(code)
    }
}

/// One harvested decree with its classification and enrichment fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Decree {
    /// Decree number, `-1` when the label could not be parsed
    pub number: i64,
    /// Identifier parsed from the detail link
    pub id: Option<i64>,
    /// Publication date text (`dd/mm/yyyy`, not validated)
    pub publish_date: String,
    /// Absolute URL of the decree text
    pub link: String,
    /// Free-text summary (ementa)
    pub summary: String,
    /// Program the decree belongs to, set by classification
    pub program: Option<Program>,
    /// Action performed by the decree
    #[serde(rename = "type")]
    pub decree_type: Option<DecreeType>,
    /// Numbers of the decrees this one references
    #[serde(rename = "origin_decree")]
    pub origin_decrees: Option<Vec<i64>>,
    /// Benefited company name
    pub company: Option<String>,
    /// Company tax identifier as found in the decree text
    pub cnpj: Option<String>,
    /// Regulatory framing of the company
    pub framing: Option<Framing>,
}

impl Decree {
    /// Create an unclassified decree from the fields read off a result row.
    #[must_use]
    pub fn new(
        number: i64,
        publish_date: impl Into<String>,
        link: impl Into<String>,
        summary: impl Into<String>,
        id: Option<i64>,
    ) -> Self {
        Self {
            number,
            id,
            publish_date: publish_date.into(),
            link: link.into(),
            summary: summary.into(),
            program: None,
            decree_type: None,
            origin_decrees: None,
            company: None,
            cnpj: None,
            framing: None,
        }
    }

    /// Whether the decree text must be searched for a framing category.
    ///
    /// Only original PRODEPE grants define framing; later acts inherit it.
    #[must_use]
    pub fn needs_framing(&self) -> bool {
        self.program == Some(Program::Prodepe) && self.decree_type == Some(DecreeType::Grant)
    }

    /// Origin decrees joined with `;` for tabular exports.
    #[must_use]
    pub fn origin_text(&self) -> Option<String> {
        self.origin_decrees.as_ref().map(|origins| {
            origins
                .iter()
                .map(ToString::to_string)
                .collect::<Vec<_>>()
                .join(";")
        })
    }
}

/// Inclusive publication date range used to set up a search.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    /// First day of the range
    pub start: NaiveDate,
    /// Last day of the range
    pub end: NaiveDate,
}

impl DateRange {
    /// Create a range, rejecting an end before the start.
    ///
    /// # Errors
    /// Returns error if `end` precedes `start`.
    pub fn new(start: NaiveDate, end: NaiveDate) -> Result<Self, CoreError> {
        if end < start {
            return Err(CoreError::Validation(format!(
                "date range ends ({end}) before it starts ({start})"
            )));
        }
        Ok(Self { start, end })
    }

    /// Range covering a whole calendar month.
    ///
    /// # Errors
    /// Returns error if the month is outside 1-12 or the year is not representable.
    pub fn month(month: u32, year: i32) -> Result<Self, CoreError> {
        Self::months(month, year, month, year)
    }

    /// Range from the first day of one month to the last day of another.
    ///
    /// # Errors
    /// Returns error for invalid months or an end month before the start month.
    pub fn months(
        start_month: u32,
        start_year: i32,
        end_month: u32,
        end_year: i32,
    ) -> Result<Self, CoreError> {
        let start = first_day(start_month, start_year)?;
        let end = last_day(end_month, end_year)?;
        Self::new(start, end)
    }

    /// Start date rendered as `dd/mm/yyyy`.
    #[must_use]
    pub fn start_label(&self) -> String {
        self.start.format("%d/%m/%Y").to_string()
    }

    /// End date rendered as `dd/mm/yyyy`.
    #[must_use]
    pub fn end_label(&self) -> String {
        self.end.format("%d/%m/%Y").to_string()
    }
}

impl fmt::Display for DateRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} - {}", self.start_label(), self.end_label())
    }
}

/// Expand a two-digit year to a full year.
///
/// Years up to the current two-digit year land in the 2000s, later ones in
/// the 1900s. Years of three or more digits are returned unchanged.
///
/// # Errors
/// Returns error for years that are not positive.
pub fn normalize_year(year: i32, current_year: i32) -> Result<i32, CoreError> {
    if year <= 0 {
        return Err(CoreError::Validation(format!("invalid year: {year}")));
    }
    if year >= 100 {
        return Ok(year);
    }
    if year <= current_year % 100 {
        Ok(year + 2000)
    } else {
        Ok(year + 1900)
    }
}

fn first_day(month: u32, year: i32) -> Result<NaiveDate, CoreError> {
    NaiveDate::from_ymd_opt(year, month, 1)
        .ok_or_else(|| CoreError::Validation(format!("invalid month: {month}/{year}")))
}

fn last_day(month: u32, year: i32) -> Result<NaiveDate, CoreError> {
    let first = first_day(month, year)?;
    let next = if first.month() == 12 {
        NaiveDate::from_ymd_opt(year + 1, 1, 1)
    } else {
        NaiveDate::from_ymd_opt(year, month + 1, 1)
    };
    next.and_then(|d| d.pred_opt())
        .ok_or_else(|| CoreError::Validation(format!("invalid month: {month}/{year}")))
}
