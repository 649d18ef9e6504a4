//! Run configuration: TOML file defaults overridden by command-line options.

use std::path::{Path, PathBuf};
use std::str::FromStr;

use serde::Deserialize;

use crate::apriori::MinSupport;
use crate::error::{MiningError, MiningResult};

pub const DEFAULT_MIN_SUPPORT: i64 = 5;
pub const DEFAULT_SCRIPTS_DIR: &str = "sql_scripts";

/// What a run does against the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// Execute the cleaning scripts.
    Clean,
    /// Build the itemset lattice and project the final level.
    Mine,
}

impl FromStr for Mode {
    type Err = MiningError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "1" => Ok(Mode::Clean),
            "2" => Ok(Mode::Mine),
            other => Err(MiningError::InvalidSelection { input: other.to_string() }),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct MiningConfig {
    /// Directory holding the database file.
    pub host: Option<String>,
    /// Database file name.
    pub dbname: Option<String>,
    /// Validated into a [`MinSupport`] before a run starts.
    pub min_support: i64,
    /// Extend the prefixes of a level on the rayon pool (in-memory stores only).
    pub parallel: bool,
    /// Directory with `integrity_checks.sql` and `removals.sql`.
    pub scripts_dir: PathBuf,
}

impl Default for MiningConfig {
    fn default() -> Self {
        Self {
            host: None,
            dbname: None,
            min_support: DEFAULT_MIN_SUPPORT,
            parallel: false,
            scripts_dir: PathBuf::from(DEFAULT_SCRIPTS_DIR),
        }
    }
}

impl MiningConfig {
    pub fn from_toml_str(contents: &str) -> MiningResult<Self> {
        toml::from_str(contents)
            .map_err(|e| MiningError::invalid_config(format!("malformed config: {e}")))
    }

    pub fn load(path: &Path) -> MiningResult<Self> {
        let contents = std::fs::read_to_string(path).map_err(|e| {
            MiningError::invalid_config(format!("cannot read {}: {e}", path.display()))
        })?;
        Self::from_toml_str(&contents)
    }

    pub fn min_support(&self) -> MiningResult<MinSupport> {
        MinSupport::new(self.min_support)
    }

    /// `<host>/<dbname>`, or `<dbname>` when no host is set.
    pub fn database_path(&self) -> MiningResult<PathBuf> {
        let dbname = self
            .dbname
            .as_deref()
            .filter(|name| !name.is_empty())
            .ok_or_else(|| MiningError::invalid_config("no database name given"))?;
        Ok(match self.host.as_deref() {
            Some(host) if !host.is_empty() => Path::new(host).join(dbname),
            _ => PathBuf::from(dbname),
        })
    }
}

/// Options recognized on the command line.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CliOptions {
    pub host: Option<String>,
    pub dbname: Option<String>,
    pub min_support: Option<String>,
    pub mode: Option<String>,
    pub config: Option<PathBuf>,
    pub parallel: bool,
}

impl CliOptions {
    /// Parses the arguments after the program name. `-S 3`, `-S3` and
    /// `--support=3` forms are accepted.
    pub fn parse<I, A>(args: I) -> MiningResult<Self>
    where
        I: IntoIterator<Item = A>,
        A: Into<String>,
    {
        let mut args = args.into_iter().map(|arg| -> String { arg.into() });
        let mut options = CliOptions::default();
        let mut seen_any = false;

        while let Some(arg) = args.next() {
            seen_any = true;
            let (flag, inline) = match arg.split_once('=') {
                Some((flag, value)) if arg.starts_with("--") => {
                    (flag.to_string(), Some(value.to_string()))
                }
                _ if is_attached_short_value(&arg) => {
                    let (flag, value) = arg.split_at(2);
                    (flag.to_string(), Some(value.to_string()))
                }
                _ => (arg.clone(), None),
            };

            if matches!(flag.as_str(), "-P" | "--parallel") {
                options.parallel = true;
                continue;
            }

            let slot = match flag.as_str() {
                "-H" | "--host" | "--hostname" => &mut options.host,
                "-D" | "--dbname" => &mut options.dbname,
                "-S" | "--support" => &mut options.min_support,
                "-M" | "--mode" => &mut options.mode,
                "-C" | "--config" => {
                    let value = take_value(&flag, inline, &mut args)?;
                    options.config = Some(PathBuf::from(value));
                    continue;
                }
                _ => {
                    return Err(MiningError::invalid_config(format!("unrecognized option {arg:?}")))
                }
            };
            *slot = Some(take_value(&flag, inline, &mut args)?);
        }

        if !seen_any {
            return Err(MiningError::invalid_config("no options given"));
        }
        Ok(options)
    }

    /// Layer these options over `base`.
    pub fn apply(&self, mut base: MiningConfig) -> MiningResult<MiningConfig> {
        if let Some(host) = &self.host {
            base.host = Some(host.clone());
        }
        if let Some(dbname) = &self.dbname {
            base.dbname = Some(dbname.clone());
        }
        if let Some(raw) = &self.min_support {
            base.min_support = raw.parse::<MinSupport>()?.get() as i64;
        }
        base.parallel |= self.parallel;
        Ok(base)
    }

    /// Reads the config file if one was named, then applies the options.
    pub fn resolve(&self) -> MiningResult<MiningConfig> {
        let base = match &self.config {
            Some(path) => MiningConfig::load(path)?,
            None => MiningConfig::default(),
        };
        self.apply(base)
    }
}

/// `-S3` style: a value-taking short flag with its value glued on.
fn is_attached_short_value(arg: &str) -> bool {
    let bytes = arg.as_bytes();
    bytes.len() > 2
        && bytes[0] == b'-'
        && matches!(bytes[1], b'H' | b'D' | b'S' | b'M' | b'C')
}

fn take_value(
    flag: &str,
    inline: Option<String>,
    rest: &mut impl Iterator<Item = String>,
) -> MiningResult<String> {
    inline
        .or_else(|| rest.next())
        .ok_or_else(|| MiningError::invalid_config(format!("option {flag} requires a value")))
}
