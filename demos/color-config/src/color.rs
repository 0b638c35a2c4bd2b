use std::fmt;
use std::num::ParseIntError;
use std::str::FromStr;
use thiserror::Error;

/// An RGB color written as `r,g,b`, e.g. `255,128,0`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseColorError {
    #[error("expected 3 comma-separated components, found {0}")]
    ComponentCount(usize),

    #[error("invalid color component {component:?}")]
    Component {
        component: String,
        #[source]
        source: ParseIntError,
    },
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{},{}", self.r, self.g, self.b)
    }
}

impl FromStr for Color {
    type Err = ParseColorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parts: Vec<&str> = s.split(',').collect();
        if parts.len() != 3 {
            return Err(ParseColorError::ComponentCount(parts.len()));
        }

        let component = |part: &str| {
            part.trim()
                .parse::<u8>()
                .map_err(|source| ParseColorError::Component {
                    component: part.to_string(),
                    source,
                })
        };

        Ok(Self {
            r: component(parts[0])?,
            g: component(parts[1])?,
            b: component(parts[2])?,
        })
    }
}
