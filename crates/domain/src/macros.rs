//! Macro for implementing Display and FromStr for fieldless enums
//!
//! Keeps the string form used in logs and storage in one place. Parsing is
//! case-insensitive.
//!
//! # Example
//!
//! ```rust
//! use alarmclock_domain::impl_domain_enum_conversions;
//!
//! #[derive(Debug, Clone, Copy, PartialEq, Eq)]
//! pub enum Slot {
//!     Primary,
//!     Snooze,
//! }
//!
//! impl_domain_enum_conversions!(Slot {
//!     Primary => "primary",
//!     Snooze => "snooze",
//! });
//!
//! assert_eq!(Slot::Snooze.to_string(), "snooze");
//! assert_eq!("PRIMARY".parse::<Slot>(), Ok(Slot::Primary));
//! ```

/// Implements Display and FromStr for a fieldless enum
///
/// * `$enum_name` - The name of the enum type
/// * `$variant => $str` - Mapping of enum variants to their lowercase string
///   representations
#[macro_export]
macro_rules! impl_domain_enum_conversions {
    ($enum_name:ident { $($variant:ident => $str:expr),+ $(,)? }) => {
        impl std::fmt::Display for $enum_name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                match self {
                    $(Self::$variant => f.write_str($str),)+
                }
            }
        }

        impl std::str::FromStr for $enum_name {
            type Err = String;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s.to_lowercase().as_str() {
                    $($str => Ok(Self::$variant),)+
                    _ => Err(format!("Invalid {}: {}", stringify!($enum_name), s)),
                }
            }
        }
    };
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    enum Phase {
        Disarmed,
        Armed,
    }

    impl_domain_enum_conversions!(Phase {
        Disarmed => "disarmed",
        Armed => "armed",
    });

    #[test]
    fn display_is_lowercase() {
        assert_eq!(Phase::Disarmed.to_string(), "disarmed");
        assert_eq!(Phase::Armed.to_string(), "armed");
    }

    #[test]
    fn parse_ignores_case() {
        assert_eq!(Phase::from_str("ARMED").unwrap(), Phase::Armed);
        assert_eq!(Phase::from_str("DisArmed").unwrap(), Phase::Disarmed);
    }

    #[test]
    fn parse_rejects_unknown() {
        let err = Phase::from_str("fired").unwrap_err();
        assert!(err.contains("Invalid Phase: fired"));
        assert!(Phase::from_str("").is_err());
    }
}
