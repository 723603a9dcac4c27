use std::{env, fmt, str::FromStr};

use thiserror::Error;

/// Name of the environment variable read by [`VerifierConfig::from_env`].
pub const VERIFY_ENV_VAR: &str = "SIL_VERIFY";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VerificationLevel {
    /// Block structure only.
    Fast,
    /// Block structure, per-instruction type rules and referential checks.
    Standard,
    /// Everything, including branch arguments and source snippets.
    Full,
}

impl fmt::Display for VerificationLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Fast => "fast",
            Self::Standard => "standard",
            Self::Full => "full",
        };
        f.write_str(s)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseLevelError {
    #[error("unknown verification level `{0}`, expected one of `off`, `fast`, `standard`, `full`")]
    Unknown(String),
}

impl FromStr for VerificationLevel {
    type Err = ParseLevelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "fast" => Ok(Self::Fast),
            "standard" => Ok(Self::Standard),
            "full" => Ok(Self::Full),
            _ => Err(ParseLevelError::Unknown(s.to_string())),
        }
    }
}

#[derive(Debug, Clone)]
pub struct VerifierConfig {
    pub level: VerificationLevel,
    /// A disabled verifier reports nothing.
    pub enabled: bool,
    /// `0` means unlimited.
    pub max_diagnostics: usize,
    pub check_refs: bool,
    pub check_branch_args: bool,
    pub snippets: bool,
}

impl VerifierConfig {
    pub fn for_level(level: VerificationLevel) -> Self {
        match level {
            VerificationLevel::Fast => Self {
                level,
                enabled: true,
                max_diagnostics: 200,
                check_refs: false,
                check_branch_args: false,
                snippets: false,
            },
            VerificationLevel::Standard => Self {
                level,
                enabled: true,
                max_diagnostics: 200,
                check_refs: true,
                check_branch_args: false,
                snippets: false,
            },
            VerificationLevel::Full => Self {
                level,
                enabled: true,
                max_diagnostics: 500,
                check_refs: true,
                check_branch_args: true,
                snippets: true,
            },
        }
    }

    /// Returns `true` if verification is compiled into this build: debug
    /// builds, or any build with the `verify-ir` feature.
    pub const fn build_enabled() -> bool {
        cfg!(debug_assertions) || cfg!(feature = "verify-ir")
    }

    /// Full verification, enabled only when [`Self::build_enabled`] holds.
    pub fn from_build() -> Self {
        Self {
            enabled: Self::build_enabled(),
            ..Self::for_level(VerificationLevel::Full)
        }
    }

    /// Reads the configuration from the `SIL_VERIFY` environment variable.
    /// See [`Self::from_env_value`].
    pub fn from_env() -> Result<Self, ParseLevelError> {
        let value = env::var(VERIFY_ENV_VAR).ok();
        Self::from_env_value(value.as_deref())
    }

    /// `off` disables verification and a level name selects that level. An
    /// unset value falls back to [`Self::from_build`].
    pub fn from_env_value(value: Option<&str>) -> Result<Self, ParseLevelError> {
        let Some(value) = value else {
            return Ok(Self::from_build());
        };

        if value.trim().eq_ignore_ascii_case("off") {
            return Ok(Self {
                enabled: false,
                ..Self::default()
            });
        }

        value.parse().map(Self::for_level)
    }

    pub fn should_check_types(&self) -> bool {
        !matches!(self.level, VerificationLevel::Fast)
    }

    pub fn should_check_refs(&self) -> bool {
        self.check_refs || !matches!(self.level, VerificationLevel::Fast)
    }

    pub fn should_check_branch_args(&self) -> bool {
        self.check_branch_args || matches!(self.level, VerificationLevel::Full)
    }

    pub fn should_render_snippets(&self) -> bool {
        self.snippets || matches!(self.level, VerificationLevel::Full)
    }
}

impl Default for VerifierConfig {
    fn default() -> Self {
        Self::for_level(VerificationLevel::Standard)
    }
}
