//! Operating limits read from the reference document and the header prefix
//! table used to look them up.

pub mod document;
pub mod resolve;

use std::{collections::BTreeMap, fmt, str::FromStr};

use serde::Serialize;
use tracing::*;

use crate::{consts::DEFAULT_PREFIX_BINDINGS, error::LimitCheckError};

pub use document::{extract_limits_from_docx, parse_limit_table};
pub use resolve::{resolve_pressure_ceiling, resolve_temperature_range};

/// Allowed temperature window. Either side may be unbounded, never both.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TemperatureRange {
    pub low: f64,
    pub high: f64,
}

impl TemperatureRange {
    /// The range that admits everything; the identity of [`Self::intersect`].
    pub const UNBOUNDED: Self = Self {
        low: f64::NEG_INFINITY,
        high: f64::INFINITY,
    };

    pub fn new(low: f64, high: f64) -> Self {
        Self { low, high }
    }

    /// Only an upper bound, as written by a single number in the document.
    pub fn at_most(high: f64) -> Self {
        Self {
            low: f64::NEG_INFINITY,
            high,
        }
    }

    pub fn intersect(&self, other: &Self) -> Self {
        Self {
            low: self.low.max(other.low),
            high: self.high.min(other.high),
        }
    }

    pub fn contains(&self, value: f64) -> bool {
        self.low <= value && value <= self.high
    }
}

impl fmt::Display for TemperatureRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {}]", self.low, self.high)
    }
}

/// One row of the limits table.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LimitEntry {
    pub name: String,
    pub psig: i64,
    pub temperature: TemperatureRange,
}

/// How a binding picks its row of the limits table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EntrySelector {
    /// Zero-based row position across all tables.
    Index(usize),
    /// Exact (trimmed, case-insensitive) entry name.
    Name(String),
}

impl fmt::Display for EntrySelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EntrySelector::Index(idx) => write!(f, "row #{idx}"),
            EntrySelector::Name(name) => write!(f, "entry `{name}`"),
        }
    }
}

/// Declares that headers starting with `prefix` fall under one limit entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrefixBinding {
    pub prefix: String,
    pub selector: EntrySelector,
}

impl PrefixBinding {
    pub fn new(prefix: impl Into<String>, selector: EntrySelector) -> Self {
        Self {
            prefix: prefix.into(),
            selector,
        }
    }

    /// The historical table layout: flare `F-`, vessel `V-`, exchanger `E-`
    /// and air cooler `AC` read rows 0, 1, 3 and 4.
    pub fn defaults() -> Vec<Self> {
        DEFAULT_PREFIX_BINDINGS
            .iter()
            .map(|(prefix, idx)| Self::new(*prefix, EntrySelector::Index(*idx)))
            .collect()
    }

    fn select<'a>(&self, limits: &'a [LimitEntry]) -> Option<&'a LimitEntry> {
        match &self.selector {
            EntrySelector::Index(idx) => limits.get(*idx),
            EntrySelector::Name(name) => limits
                .iter()
                .find(|entry| entry.name.trim().eq_ignore_ascii_case(name.trim())),
        }
    }
}

impl FromStr for PrefixBinding {
    type Err = LimitCheckError;

    /// Parses `PREFIX=ROW` or `PREFIX=NAME`, e.g. `F-=0` or `AC=Air Cooler`.
    fn from_str(binding: &str) -> Result<Self, Self::Err> {
        let invalid = |message: &str| LimitCheckError::InvalidBinding {
            binding: binding.to_string(),
            message: message.to_string(),
        };

        let (prefix, selector) = binding
            .split_once('=')
            .ok_or_else(|| invalid("expected PREFIX=ROW or PREFIX=NAME"))?;

        if prefix.chars().count() != 2 {
            return Err(invalid("prefix must be exactly two characters"));
        }

        let selector = selector.trim();
        if selector.is_empty() {
            return Err(invalid("missing row index or entry name"));
        }

        let selector = match selector.parse::<usize>() {
            Ok(idx) => EntrySelector::Index(idx),
            Err(_) => EntrySelector::Name(selector.to_string()),
        };

        Ok(Self::new(prefix, selector))
    }
}

/// Header prefix to limit entry lookup.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct LimitMapping {
    entries: BTreeMap<String, LimitEntry>,
}

impl LimitMapping {
    /// Build the mapping from explicit bindings.
    ///
    /// Every binding must resolve; a document whose rows do not match the
    /// declared layout is rejected instead of silently checking nothing.
    pub fn from_bindings(
        limits: &[LimitEntry],
        bindings: &[PrefixBinding],
    ) -> Result<Self, LimitCheckError> {
        let mut entries = BTreeMap::new();

        for binding in bindings {
            let entry = binding
                .select(limits)
                .ok_or_else(|| LimitCheckError::MissingLimitEntry {
                    prefix: binding.prefix.clone(),
                    selector: binding.selector.to_string(),
                })?;

            debug!("prefix `{}` -> {}", binding.prefix, entry.name);
            if entries.insert(binding.prefix.clone(), entry.clone()).is_some() {
                warn!("prefix `{}` bound twice, last binding wins", binding.prefix);
            }
        }

        Ok(Self { entries })
    }

    pub fn insert(&mut self, prefix: impl Into<String>, entry: LimitEntry) {
        self.entries.insert(prefix.into(), entry);
    }

    /// The entry whose prefix matches the first two characters of `header`.
    pub fn lookup(&self, header: &str) -> Option<&LimitEntry> {
        let prefix: String = header.chars().take(2).collect();
        if prefix.chars().count() < 2 {
            return None;
        }
        self.entries.get(&prefix)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &LimitEntry)> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
