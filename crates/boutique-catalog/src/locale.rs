//! Display locales

use crate::error::ParseError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Storefront display language
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Locale {
    /// French (storefront default)
    #[default]
    Fr,
    /// Arabic
    Ar,
    /// English
    En,
}

impl Locale {
    /// Language code
    #[inline]
    #[must_use]
    pub fn code(self) -> &'static str {
        match self {
            Self::Fr => "fr",
            Self::Ar => "ar",
            Self::En => "en",
        }
    }

    /// Pick the variant for this locale, falling back to the base text
    ///
    /// English always uses the base text.
    #[must_use]
    pub fn pick<'a>(self, base: &'a str, fr: Option<&'a str>, ar: Option<&'a str>) -> &'a str {
        let variant = match self {
            Self::Fr => fr,
            Self::Ar => ar,
            Self::En => None,
        };
        variant.filter(|s| !s.is_empty()).unwrap_or(base)
    }
}

impl fmt::Display for Locale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for Locale {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "fr" => Ok(Self::Fr),
            "ar" => Ok(Self::Ar),
            "en" => Ok(Self::En),
            _ => Err(ParseError::new("locale", s)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pick_falls_back_to_base() {
        assert_eq!(Locale::Fr.pick("Dress", Some("Robe"), None), "Robe");
        assert_eq!(Locale::Ar.pick("Dress", Some("Robe"), None), "Dress");
        assert_eq!(Locale::Ar.pick("Dress", None, Some("فستان")), "فستان");
        assert_eq!(Locale::En.pick("Dress", Some("Robe"), Some("فستان")), "Dress");
        assert_eq!(Locale::Fr.pick("Dress", Some(""), None), "Dress");
    }

    #[test]
    fn locale_parse() {
        assert_eq!("AR".parse::<Locale>().unwrap(), Locale::Ar);
        assert!("de".parse::<Locale>().is_err());
    }
}
