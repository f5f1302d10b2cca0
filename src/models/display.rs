use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DisplayParam {
    Temperature,
    Rain,
    Humidity,
}

/// Which readings the current-conditions card shows
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DisplayOptions {
    pub temperature: bool,
    pub rain: bool,
    pub humidity: bool,
}

impl Default for DisplayOptions {
    fn default() -> Self {
        Self {
            temperature: true,
            rain: false,
            humidity: false,
        }
    }
}

impl DisplayOptions {
    #[must_use]
    pub fn none() -> Self {
        Self {
            temperature: false,
            rain: false,
            humidity: false,
        }
    }

    #[must_use]
    pub fn all() -> Self {
        Self {
            temperature: true,
            rain: true,
            humidity: true,
        }
    }

    #[must_use]
    pub fn contains(&self, param: DisplayParam) -> bool {
        match param {
            DisplayParam::Temperature => self.temperature,
            DisplayParam::Rain => self.rain,
            DisplayParam::Humidity => self.humidity,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_shows_temperature_only() {
        let options = DisplayOptions::default();
        assert!(options.contains(DisplayParam::Temperature));
        assert!(!options.contains(DisplayParam::Rain));
        assert!(!options.contains(DisplayParam::Humidity));
    }
}
