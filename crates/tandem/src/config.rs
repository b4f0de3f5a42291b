//! Command-line configuration for the stress harness.

use std::str::FromStr;

use thiserror::Error;

/// Configuration errors. All of them mean the invocation was wrong; none
/// are recoverable mid-run.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A flag was given a value that does not parse.
    #[error("invalid value for {flag}: {value}")]
    InvalidValue {
        /// The offending flag.
        flag: &'static str,
        /// The value that failed to parse.
        value: String,
    },

    /// A flag that requires a value was the last argument.
    #[error("missing value for {0}")]
    MissingValue(&'static str),

    /// The trace ring must wrap with a mask, so its size must be a power
    /// of two.
    #[error("trace capacity must be a power of two, got {0}")]
    CapacityNotPowerOfTwo(usize),

    /// Anything we do not recognize.
    #[error("unknown argument: {0}")]
    UnknownArgument(String),
}

/// One stress run's worth of knobs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunConfig {
    /// Lock/unlock iterations per participant.
    pub iterations: u64,
    /// Capacity of each participant's trace buffer.
    pub trace_capacity: usize,
    /// Maximum merged trace lines printed after a violation.
    pub dump_limit: usize,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            iterations: 10_000_000,
            trace_capacity: tandem_core::trace::DEFAULT_CAPACITY,
            dump_limit: 2 * tandem_core::trace::DEFAULT_CAPACITY,
        }
    }
}

/// Parses command-line arguments (program name already stripped).
///
/// A bare number is accepted as the iteration count, matching
/// `lock_stress 5000000`.
///
/// # Errors
///
/// Returns a [`ConfigError`] describing the first bad argument.
pub fn parse_args<I>(args: I) -> Result<RunConfig, ConfigError>
where
    I: IntoIterator<Item = String>,
{
    let args: Vec<String> = args.into_iter().collect();
    let mut config = RunConfig::default();

    let mut i = 0;
    while i < args.len() {
        match args[i].as_str() {
            "--iterations" | "-n" => {
                config.iterations = flag_value(&args, &mut i, "--iterations")?;
            }
            "--capacity" | "-c" => {
                let capacity: usize = flag_value(&args, &mut i, "--capacity")?;
                if !capacity.is_power_of_two() {
                    return Err(ConfigError::CapacityNotPowerOfTwo(capacity));
                }
                config.trace_capacity = capacity;
            }
            "--limit" | "-l" => {
                config.dump_limit = flag_value(&args, &mut i, "--limit")?;
            }
            bare => {
                config.iterations = bare
                    .parse()
                    .map_err(|_| ConfigError::UnknownArgument(bare.to_string()))?;
            }
        }
        i += 1;
    }

    Ok(config)
}

/// Consumes the value following a flag and parses it.
fn flag_value<T: FromStr>(
    args: &[String],
    i: &mut usize,
    flag: &'static str,
) -> Result<T, ConfigError> {
    *i += 1;
    let value = args.get(*i).ok_or(ConfigError::MissingValue(flag))?;
    value.parse().map_err(|_| ConfigError::InvalidValue {
        flag,
        value: value.clone(),
    })
}
