//! User writing settings: closed enumerations that steer the AI checker.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
#[error("unknown {setting}: {value:?}")]
pub struct ParseSettingError {
    pub setting: &'static str,
    pub value: String,
}

impl ParseSettingError {
    pub fn new(setting: &'static str, value: &str) -> Self {
        Self {
            setting,
            value: value.to_string(),
        }
    }
}

/// Declare a closed settings enum with lowercase names, `Display` and `FromStr`.
macro_rules! closed_enum {
    (
        $(#[$meta:meta])*
        $name:ident, $label:literal, default = $default:ident {
            $($variant:ident => $text:literal),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(rename_all = "lowercase")]
        pub enum $name {
            $($variant),+
        }

        impl $name {
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            pub fn as_str(&self) -> &'static str {
                match self {
                    $(Self::$variant => $text),+
                }
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::$default
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl FromStr for $name {
            type Err = ParseSettingError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                let lower = s.trim().to_ascii_lowercase();
                match lower.as_str() {
                    $($text => Ok(Self::$variant),)+
                    _ => Err(ParseSettingError::new($label, s)),
                }
            }
        }
    };
}

closed_enum! {
    /// Citation/academic style the writer follows.
    AcademicStyle, "academic style", default = None {
        None => "none",
        Mla => "mla",
        Apa => "apa",
        Chicago => "chicago",
        Harvard => "harvard",
    }
}

closed_enum! {
    /// Regional spelling conventions.
    LanguageVariant, "language variant", default = American {
        American => "american",
        British => "british",
        Canadian => "canadian",
        Australian => "australian",
    }
}

closed_enum! {
    /// How much analysis to request: speed, standard, or comprehensive.
    CheckingMode, "checking mode", default = Standard {
        Speed => "speed",
        Standard => "standard",
        Comprehensive => "comprehensive",
    }
}

closed_enum! {
    /// Register of the piece being written.
    WritingMode, "writing mode", default = Business {
        Academic => "academic",
        Business => "business",
        Casual => "casual",
        Creative => "creative",
        Technical => "technical",
    }
}

impl CheckingMode {
    /// Completion token budget requested from the model.
    pub fn token_budget(&self) -> u32 {
        match self {
            Self::Speed => 1000,
            Self::Standard => 2000,
            Self::Comprehensive => 4000,
        }
    }
}

/// Pure configuration; no invariants beyond the closed enumerations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct WritingSettings {
    pub academic_style: AcademicStyle,
    pub language_variant: LanguageVariant,
    pub checking_mode: CheckingMode,
    pub writing_mode: WritingMode,
    pub critical_errors_only: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let s = WritingSettings::default();
        assert_eq!(s.academic_style, AcademicStyle::None);
        assert_eq!(s.language_variant, LanguageVariant::American);
        assert_eq!(s.checking_mode, CheckingMode::Standard);
        assert_eq!(s.writing_mode, WritingMode::Business);
        assert!(!s.critical_errors_only);
    }

    #[test]
    fn parse_known_names() {
        assert_eq!("APA".parse::<AcademicStyle>().unwrap(), AcademicStyle::Apa);
        assert_eq!("british".parse::<LanguageVariant>().unwrap(), LanguageVariant::British);
        assert_eq!(" speed".parse::<CheckingMode>().unwrap(), CheckingMode::Speed);
        assert_eq!("Creative".parse::<WritingMode>().unwrap(), WritingMode::Creative);
    }

    #[test]
    fn parse_unknown_name_reports_setting() {
        let err = "klingon".parse::<LanguageVariant>().unwrap_err();
        assert_eq!(err.setting, "language variant");
        assert_eq!(err.to_string(), "unknown language variant: \"klingon\"");
    }

    #[test]
    fn token_budget_grows_with_mode() {
        assert!(CheckingMode::Speed.token_budget() < CheckingMode::Standard.token_budget());
        assert!(CheckingMode::Standard.token_budget() < CheckingMode::Comprehensive.token_budget());
    }

    #[test]
    fn partial_json_fills_defaults() {
        let s: WritingSettings =
            serde_json::from_str(r#"{"checking_mode": "comprehensive"}"#).unwrap();
        assert_eq!(s.checking_mode, CheckingMode::Comprehensive);
        assert_eq!(s.writing_mode, WritingMode::Business);
    }

    #[test]
    fn display_matches_parse() {
        for mode in WritingMode::ALL {
            assert_eq!(mode.to_string().parse::<WritingMode>().unwrap(), *mode);
        }
    }
}
