use chrono::Duration;

#[derive(Debug, PartialEq, Eq, thiserror::Error)]
pub enum DurationParseError {
    #[error("duration must not be empty")]
    Empty,
    #[error("invalid duration '{0}': expected <number>[d|h|m|s]")]
    Invalid(String),
    #[error("duration '{0}' must be positive")]
    NotPositive(String),
}

/// Parse a lifetime like `7d`, `12h`, `30m`, `45s` or `3600` (seconds).
pub fn parse_duration(input: &str) -> Result<Duration, DurationParseError> {
    let input = input.trim();
    if input.is_empty() {
        return Err(DurationParseError::Empty);
    }

    let (digits, unit) = match input.char_indices().last() {
        Some((idx, c)) if c.is_ascii_alphabetic() => (&input[..idx], Some(c)),
        _ => (input, None),
    };

    let amount: i64 = digits
        .parse()
        .map_err(|_| DurationParseError::Invalid(input.to_string()))?;
    if amount <= 0 {
        return Err(DurationParseError::NotPositive(input.to_string()));
    }

    let duration = match unit.map(|c| c.to_ascii_lowercase()) {
        None | Some('s') => Duration::try_seconds(amount),
        Some('m') => Duration::try_minutes(amount),
        Some('h') => Duration::try_hours(amount),
        Some('d') => Duration::try_days(amount),
        Some(_) => None,
    };
    duration.ok_or_else(|| DurationParseError::Invalid(input.to_string()))
}
