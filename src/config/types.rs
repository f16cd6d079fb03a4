use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use anyhow::Result;

/// Which request headers are exposed to rules under the `headers` target.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HeaderScope {
    /// Only the `Referer` header.
    #[default]
    Referer,
    /// Every header, one `name: value` line each.
    All,
}

impl fmt::Display for HeaderScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Referer => write!(f, "referer"),
            Self::All => write!(f, "all"),
        }
    }
}

impl FromStr for HeaderScope {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "referer" => Ok(Self::Referer),
            "all" => Ok(Self::All),
            _ => Err(anyhow::anyhow!("Invalid header scope: '{}'. Valid values: referer, all", s)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_header_scope_parse() {
        assert_eq!("Referer".parse::<HeaderScope>().unwrap(), HeaderScope::Referer);
        assert_eq!("all".parse::<HeaderScope>().unwrap(), HeaderScope::All);
        assert!("cookies".parse::<HeaderScope>().is_err());
        assert_eq!(HeaderScope::All.to_string(), "all");
    }
}
