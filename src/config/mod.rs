use anyhow::{Context, Result};
use dotenv::dotenv;
use std::env;
use std::str::FromStr;
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct Config {
    pub server_port: u16,
    pub timings: Timings,
    pub max_upload_bytes: usize,
}

/// Cadences of the simulated pipeline. Tests shrink or pause these.
#[derive(Debug, Clone)]
pub struct Timings {
    pub upload_tick: Duration,
    pub upload_step: u8,
    pub processing_delay: Duration,
    pub typing_delay: Duration,
    pub memory_refresh: Duration,
}

impl Default for Timings {
    fn default() -> Self {
        Self {
            upload_tick: Duration::from_millis(200),
            upload_step: 10,
            processing_delay: Duration::from_millis(2000),
            typing_delay: Duration::from_millis(1500),
            memory_refresh: Duration::from_millis(5000),
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenv().ok();

        let timings = Timings {
            upload_tick: Duration::from_millis(var_or("UPLOAD_TICK_MS", 200)?),
            upload_step: var_or("UPLOAD_STEP", 10)?,
            processing_delay: Duration::from_millis(var_or("PROCESSING_DELAY_MS", 2000)?),
            typing_delay: Duration::from_millis(var_or("TYPING_DELAY_MS", 1500)?),
            memory_refresh: Duration::from_millis(var_or("MEMORY_REFRESH_MS", 5000)?),
        };

        if timings.upload_step == 0 || timings.upload_step > 100 {
            anyhow::bail!("UPLOAD_STEP must be between 1 and 100, got {}", timings.upload_step);
        }

        Ok(Self {
            server_port: var_or("SERVER_PORT", 8080)?,
            timings,
            max_upload_bytes: var_or("MAX_UPLOAD_BYTES", 10 * 1024 * 1024)?,
        })
    }
}

fn var_or<T>(key: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse()
            .with_context(|| format!("{} must be a valid number, got {:?}", key, raw)),
        Err(_) => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_timings_match_the_prototype() {
        let t = Timings::default();
        assert_eq!(t.upload_tick, Duration::from_millis(200));
        assert_eq!(t.upload_step, 10);
        assert_eq!(t.processing_delay, Duration::from_millis(2000));
        assert_eq!(t.typing_delay, Duration::from_millis(1500));
        assert_eq!(t.memory_refresh, Duration::from_millis(5000));
    }

    #[test]
    fn var_or_falls_back_and_rejects_garbage() {
        assert_eq!(var_or::<u16>("EXCEL_INSIGHT_UNSET_VAR", 42).unwrap(), 42);

        env::set_var("EXCEL_INSIGHT_BAD_PORT", "eighty");
        assert!(var_or::<u16>("EXCEL_INSIGHT_BAD_PORT", 8080).is_err());
        env::remove_var("EXCEL_INSIGHT_BAD_PORT");
    }
}
