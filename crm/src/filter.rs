use std::fmt;
use std::str::FromStr;

use crate::models::UnknownLabel;

/// Restriction on one enum-valued column. `All` lets everything through.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EnumFilter<T> {
    All,
    Only(T),
}

impl<T> Default for EnumFilter<T> {
    fn default() -> Self {
        EnumFilter::All
    }
}

impl<T: PartialEq> EnumFilter<T> {
    pub fn matches(&self, value: &T) -> bool {
        match self {
            EnumFilter::All => true,
            EnumFilter::Only(wanted) => wanted == value,
        }
    }
}

impl<T> From<Option<T>> for EnumFilter<T> {
    fn from(value: Option<T>) -> Self {
        value.map_or(EnumFilter::All, EnumFilter::Only)
    }
}

impl<T: fmt::Display> fmt::Display for EnumFilter<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EnumFilter::All => f.write_str("All"),
            EnumFilter::Only(value) => value.fmt(f),
        }
    }
}

impl<T: FromStr<Err = UnknownLabel>> FromStr for EnumFilter<T> {
    type Err = UnknownLabel;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.trim().eq_ignore_ascii_case("all") {
            return Ok(EnumFilter::All);
        }
        s.parse().map(EnumFilter::Only)
    }
}

/// Case-insensitive substring match against any of `fields`. A blank search
/// matches everything.
pub fn matches_search(search: &str, fields: &[&str]) -> bool {
    let needle = search.trim().to_lowercase();
    if needle.is_empty() {
        return true;
    }
    fields
        .iter()
        .any(|field| field.to_lowercase().contains(&needle))
}
