use chrono::Duration;

use crate::error::SpotHintaError;

/// Length of the interval each price covers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Resolution {
    FifteenMinutes,
    #[default]
    SixtyMinutes,
}

impl Resolution {
    pub const fn minutes(&self) -> i64 {
        match self {
            Resolution::FifteenMinutes => 15,
            Resolution::SixtyMinutes => 60,
        }
    }

    pub fn duration(&self) -> Duration {
        Duration::minutes(self.minutes())
    }

    pub fn from_minutes(minutes: i64) -> Result<Self, SpotHintaError> {
        match minutes {
            15 => Ok(Resolution::FifteenMinutes),
            60 => Ok(Resolution::SixtyMinutes),
            _ => Err(SpotHintaError::UnsupportedResolution(minutes)),
        }
    }
}

impl TryFrom<Duration> for Resolution {
    type Error = SpotHintaError;

    fn try_from(duration: Duration) -> Result<Self, Self::Error> {
        let minutes = duration.num_minutes();
        // num_minutes() truncates, so 15m01s must not pass as 15m.
        if duration != Duration::minutes(minutes) {
            return Err(SpotHintaError::UnsupportedResolution(minutes));
        }
        Resolution::from_minutes(minutes)
    }
}
