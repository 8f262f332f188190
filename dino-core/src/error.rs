use core::fmt;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SimError {
    EmptyPopulation,
    InvalidAction { agent: usize, tick: u32, action: u8 },
    ObservationLength { expected: usize, actual: usize },
    InvalidConfig { field: &'static str, reason: &'static str },
    GenerationTerminated { tick: u32 },
}

impl fmt::Display for SimError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyPopulation => write!(f, "population must contain at least one policy"),
            Self::InvalidAction {
                agent,
                tick,
                action,
            } => write!(
                f,
                "policy for agent {agent} returned action {action} at tick {tick} (allowed 0..=2)"
            ),
            Self::ObservationLength { expected, actual } => write!(
                f,
                "observation length mismatch: expected {expected} values, got {actual}"
            ),
            Self::InvalidConfig { field, reason } => {
                write!(f, "invalid config field `{field}`: {reason}")
            }
            Self::GenerationTerminated { tick } => {
                write!(f, "generation already terminated at tick {tick}")
            }
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for SimError {}
