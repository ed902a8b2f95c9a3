//! # Bill Numbers
//!
//! Human-readable bill identifiers of the form `{PREFIX}-{YYYYMMDD}-{seq}`,
//! e.g. `AB-20241115-007`.
//!
//! The sequence restarts at 1 every business day and is zero-padded to at
//! least three digits. Allocation (which needs the store's daily counter)
//! lives in `annabill-db`; this module only formats and parses.

use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;

use crate::error::{CoreError, CoreResult};

const DATE_FORMAT: &str = "%Y%m%d";

/// A parsed bill number.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct BillNumber {
    prefix: String,
    date: NaiveDate,
    sequence: u32,
}

impl BillNumber {
    pub fn new(prefix: impl Into<String>, date: NaiveDate, sequence: u32) -> Self {
        Self {
            prefix: prefix.into(),
            date,
            sequence,
        }
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// The business date whose sequence this number was drawn from.
    pub fn date(&self) -> NaiveDate {
        self.date
    }

    pub fn sequence(&self) -> u32 {
        self.sequence
    }

    /// Parses `{PREFIX}-{YYYYMMDD}-{seq}`.
    ///
    /// ## Example
    /// ```rust
    /// use annabill_core::BillNumber;
    ///
    /// let number = BillNumber::parse("BP-20241115-007").unwrap();
    /// assert_eq!(number.prefix(), "BP");
    /// assert_eq!(number.sequence(), 7);
    /// ```
    pub fn parse(value: &str) -> CoreResult<Self> {
        let invalid = |reason: &str| CoreError::InvalidBillNumber {
            value: value.to_string(),
            reason: reason.to_string(),
        };

        let mut parts = value.rsplitn(3, '-');
        let (Some(seq), Some(date), Some(prefix)) = (parts.next(), parts.next(), parts.next())
        else {
            return Err(invalid("expected PREFIX-YYYYMMDD-SEQ"));
        };

        if prefix.is_empty() {
            return Err(invalid("missing prefix"));
        }
        if date.len() != 8 {
            return Err(invalid("date must be YYYYMMDD"));
        }
        let date = NaiveDate::parse_from_str(date, DATE_FORMAT)
            .map_err(|_| invalid("date must be YYYYMMDD"))?;

        if seq.len() < 3 || !seq.chars().all(|c| c.is_ascii_digit()) {
            return Err(invalid("sequence must be at least three digits"));
        }
        let sequence = seq
            .parse::<u32>()
            .map_err(|_| invalid("sequence out of range"))?;

        Ok(Self::new(prefix, date, sequence))
    }
}

impl fmt::Display for BillNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}-{}-{:03}",
            self.prefix,
            self.date.format(DATE_FORMAT),
            self.sequence
        )
    }
}

impl FromStr for BillNumber {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        BillNumber::parse(s)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
