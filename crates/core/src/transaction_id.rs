//! Transaction identifiers and the codec between their two textual forms.
//!
//! The ledger SDK renders ids in *query form*, `0.0.1234@1662631612.548883749`,
//! while the mirror REST service addresses them in *canonical form*,
//! `0.0.1234-1662631612-548883749`.

use crate::address::AccountId;
use crate::error::TransactionIdError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

const SCHEDULED_SUFFIX: &str = "?scheduled";
const MAX_NANOS: u32 = 999_999_999;

/// Rewrites a query-form id into canonical form.
///
/// Input that is not `account@seconds.nanos` is returned unchanged, so the
/// function is total and `to_canonical(to_canonical(x)) == to_canonical(x)`.
/// Malformed ids pass through silently; use [`to_canonical_strict`] to
/// reject them instead.
pub fn to_canonical(id: &str) -> String {
    if let Some((account, rest)) = id.split_once('@') {
        if !rest.contains('@') {
            if let Some((seconds, nanos)) = rest.split_once('.') {
                if !nanos.contains('.') {
                    return format!("{account}-{seconds}-{nanos}");
                }
            }
        }
    }
    id.to_string()
}

/// Parses either form and renders the canonical one, rejecting malformed input.
pub fn to_canonical_strict(id: &str) -> Result<String, TransactionIdError> {
    id.parse::<TransactionId>()
        .map(|parsed| parsed.to_canonical_string())
}

/// Seconds and nanoseconds since the Unix epoch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Timestamp {
    /// Whole seconds.
    pub seconds: i64,
    /// Nanoseconds within the second.
    pub nanos: u32,
}

impl Timestamp {
    /// Creates a timestamp.
    pub const fn new(seconds: i64, nanos: u32) -> Self {
        Self { seconds, nanos }
    }

    /// `None` when the value lies outside chrono's representable range.
    pub fn to_datetime(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp(self.seconds, self.nanos)
    }
}

/// Parses mirror-style `seconds.fraction` text, where the fraction is decimal.
impl FromStr for Timestamp {
    type Err = TransactionIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (seconds, fraction) = s.split_once('.').unwrap_or((s, ""));
        if !is_digits(seconds) || fraction.len() > 9 || !fraction.bytes().all(|b| b.is_ascii_digit()) {
            return Err(TransactionIdError::malformed(s));
        }
        let seconds = seconds
            .parse::<i64>()
            .map_err(|_| TransactionIdError::malformed(s))?;
        let nanos = if fraction.is_empty() {
            0
        } else {
            format!("{fraction:0<9}")
                .parse::<u32>()
                .map_err(|_| TransactionIdError::malformed(s))?
        };
        Ok(Self { seconds, nanos })
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{:09}", self.seconds, self.nanos)
    }
}

impl Serialize for Timestamp {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// A transaction identifier: payer account plus valid-start time.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TransactionId {
    /// Account paying for the transaction.
    pub account_id: AccountId,
    /// Start of the validity window.
    pub valid_start: Timestamp,
    /// Nonce of a child transaction, `0` for user-submitted ones.
    pub nonce: u32,
    /// Whether the id refers to a scheduled execution.
    pub scheduled: bool,
}

impl TransactionId {
    /// Creates a plain (non-scheduled, nonce 0) id.
    pub fn new(account_id: AccountId, valid_start: Timestamp) -> Self {
        Self {
            account_id,
            valid_start,
            nonce: 0,
            scheduled: false,
        }
    }

    /// `shard.realm.num-seconds-nanos`, as used by the mirror service.
    pub fn to_canonical_string(&self) -> String {
        format!(
            "{}-{}-{:09}",
            self.account_id.without_checksum(),
            self.valid_start.seconds,
            self.valid_start.nanos
        )
    }

    /// `shard.realm.num@seconds.nanos[?scheduled][/nonce]`, as rendered by the SDK.
    pub fn to_query_string(&self) -> String {
        let mut rendered = format!(
            "{}@{}.{:09}",
            self.account_id.without_checksum(),
            self.valid_start.seconds,
            self.valid_start.nanos
        );
        if self.scheduled {
            rendered.push_str(SCHEDULED_SUFFIX);
        }
        if self.nonce != 0 {
            rendered.push_str(&format!("/{}", self.nonce));
        }
        rendered
    }

    /// Valid start as a calendar timestamp.
    pub fn valid_start_datetime(&self) -> Option<DateTime<Utc>> {
        self.valid_start.to_datetime()
    }

    fn parse_query_form(input: &str, account: &str, rest: &str) -> Result<Self, TransactionIdError> {
        let (rest, nonce) = match rest.rsplit_once('/') {
            Some((head, nonce)) if is_digits(nonce) => (
                head,
                nonce
                    .parse::<u32>()
                    .map_err(|_| TransactionIdError::malformed(input))?,
            ),
            Some(_) => return Err(TransactionIdError::malformed(input)),
            None => (rest, 0),
        };
        let (rest, scheduled) = match rest.strip_suffix(SCHEDULED_SUFFIX) {
            Some(head) => (head, true),
            None => (rest, false),
        };
        let (seconds, nanos) = rest
            .split_once('.')
            .ok_or_else(|| TransactionIdError::malformed(input))?;

        Ok(Self {
            account_id: account.parse()?,
            valid_start: parse_valid_start(input, seconds, nanos)?,
            nonce,
            scheduled,
        })
    }

    fn parse_canonical_form(input: &str) -> Result<Self, TransactionIdError> {
        let mut parts = input.rsplitn(3, '-');
        let (Some(nanos), Some(seconds), Some(account)) = (parts.next(), parts.next(), parts.next())
        else {
            return Err(TransactionIdError::malformed(input));
        };

        Ok(Self::new(
            account.parse()?,
            parse_valid_start(input, seconds, nanos)?,
        ))
    }
}

fn is_digits(text: &str) -> bool {
    !text.is_empty() && text.bytes().all(|b| b.is_ascii_digit())
}

fn parse_valid_start(input: &str, seconds: &str, nanos: &str) -> Result<Timestamp, TransactionIdError> {
    if !is_digits(seconds) || !is_digits(nanos) || nanos.len() > 9 {
        return Err(TransactionIdError::malformed(input));
    }
    let seconds = seconds
        .parse::<i64>()
        .map_err(|_| TransactionIdError::malformed(input))?;
    let nanos = nanos
        .parse::<u32>()
        .ok()
        .filter(|nanos| *nanos <= MAX_NANOS)
        .ok_or_else(|| TransactionIdError::malformed(input))?;
    Ok(Timestamp::new(seconds, nanos))
}

impl FromStr for TransactionId {
    type Err = TransactionIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.split_once('@') {
            Some((account, rest)) => Self::parse_query_form(s, account, rest),
            None => Self::parse_canonical_form(s),
        }
    }
}

impl fmt::Display for TransactionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_canonical_string())
    }
}

impl Serialize for TransactionId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for TransactionId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let text = String::deserialize(deserializer)?;
        text.parse().map_err(serde::de::Error::custom)
    }
}
