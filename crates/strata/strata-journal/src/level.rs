use crate::error::JournalError;
use std::fmt;
use std::str::FromStr;

/// Journal severity. Ordered so that `Debug < Info < Warning < Error`.
#[repr(u8)]
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub enum Level {
    #[default]
    Debug = 0,
    Info = 1,
    Warning = 2,
    Error = 3,
}

impl Level {
    pub fn as_str(self) -> &'static str {
        match self {
            Level::Debug => "DEBUG",
            Level::Info => "INFO",
            Level::Warning => "WARNING",
            Level::Error => "ERROR",
        }
    }

    // Inverse of `as u8`; out-of-range values clamp to Error.
    pub(crate) fn from_u8(raw: u8) -> Self {
        match raw {
            0 => Level::Debug,
            1 => Level::Info,
            2 => Level::Warning,
            _ => Level::Error,
        }
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Level {
    type Err = JournalError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "debug" => Ok(Level::Debug),
            "info" => Ok(Level::Info),
            "warn" | "warning" => Ok(Level::Warning),
            "error" => Ok(Level::Error),
            _ => Err(JournalError::UnknownLevel(s.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ordering_matches_severity() {
        assert!(Level::Debug < Level::Info);
        assert!(Level::Info < Level::Warning);
        assert!(Level::Warning < Level::Error);
    }

    #[test]
    fn parses_case_insensitively() {
        assert_eq!("INFO".parse::<Level>().unwrap(), Level::Info);
        assert_eq!("warn".parse::<Level>().unwrap(), Level::Warning);
        assert!(matches!(
            "verbose".parse::<Level>(),
            Err(JournalError::UnknownLevel(s)) if s == "verbose"
        ));
    }

    #[test]
    fn u8_round_trip() {
        for level in [Level::Debug, Level::Info, Level::Warning, Level::Error] {
            assert_eq!(Level::from_u8(level as u8), level);
        }
    }
}
