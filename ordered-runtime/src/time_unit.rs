/// Time unit for timer intervals and start delays
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimeUnit {
    Milliseconds,
    Seconds,
    Minutes,
    Hours,
}

impl std::str::FromStr for TimeUnit {
    type Err = String;

    /// Parse TimeUnit from string representation.
    /// Only accepts full lowercase enum names: "milliseconds", "seconds", "minutes", "hours"
    /// For shorthand notations like "5s", "10m", use `parse_duration` instead.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "milliseconds" => Ok(TimeUnit::Milliseconds),
            "seconds" => Ok(TimeUnit::Seconds),
            "minutes" => Ok(TimeUnit::Minutes),
            "hours" => Ok(TimeUnit::Hours),
            _ => Err(format!("Invalid time unit: {}", s)),
        }
    }
}

impl TimeUnit {
    pub fn to_secs(&self, value: f64) -> f64 {
        match self {
            TimeUnit::Milliseconds => value / 1000.0,
            TimeUnit::Seconds => value,
            TimeUnit::Minutes => value * 60.0,
            TimeUnit::Hours => value * 3_600.0,
        }
    }

    /// Parse a duration string like "5s", "1.5m", "2h", "500ms"
    /// Returns (value, TimeUnit) if successful
    ///
    /// Strict rules:
    /// - Only lowercase suffixes are accepted: "ms", "s", "m", "h"
    /// - Format must be: <number><suffix> (e.g., "5s", "0.25s")
    /// - No spaces allowed between number and suffix
    pub fn parse_duration(s: &str) -> Option<(f64, TimeUnit)> {
        let s = s.trim();

        let split_pos = s
            .char_indices()
            .find(|(_, c)| !(c.is_ascii_digit() || *c == '.'))
            .map(|(i, _)| i)?;

        if split_pos == 0 {
            return None;
        }

        let (num_str, unit_str) = s.split_at(split_pos);
        let value = num_str.parse::<f64>().ok()?;

        let time_unit = match unit_str {
            "ms" => TimeUnit::Milliseconds,
            "s" => TimeUnit::Seconds,
            "m" => TimeUnit::Minutes,
            "h" => TimeUnit::Hours,
            _ => return None,
        };

        Some((value, time_unit))
    }

    /// Convert a resolved timer value to seconds.
    ///
    /// Shorthand durations carry their own unit; plain numbers are read in `self`.
    pub fn parse_secs(&self, value: &str) -> Option<f64> {
        if let Some((amount, unit)) = Self::parse_duration(value) {
            return Some(unit.to_secs(amount));
        }
        value.trim().parse::<f64>().ok().map(|amount| self.to_secs(amount))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shorthand_carries_its_own_unit() {
        assert_eq!(TimeUnit::parse_duration("500ms"), Some((500.0, TimeUnit::Milliseconds)));
        assert_eq!(TimeUnit::parse_duration("1.5m"), Some((1.5, TimeUnit::Minutes)));
        assert_eq!(TimeUnit::Hours.parse_secs("2s"), Some(2.0));
    }

    #[test]
    fn plain_numbers_use_the_declared_unit() {
        assert_eq!(TimeUnit::Seconds.parse_secs("2.5"), Some(2.5));
        assert_eq!(TimeUnit::Milliseconds.parse_secs("250"), Some(0.25));
        assert_eq!(TimeUnit::Seconds.parse_secs("-1"), Some(-1.0));
    }

    #[test]
    fn rejects_unknown_suffixes() {
        assert_eq!(TimeUnit::parse_duration("5S"), None);
        assert_eq!(TimeUnit::parse_duration("s"), None);
        assert_eq!(TimeUnit::Seconds.parse_secs("soon"), None);
        assert!("fortnights".parse::<TimeUnit>().is_err());
        assert_eq!("Minutes".parse::<TimeUnit>(), Ok(TimeUnit::Minutes));
    }
}
