//! Site-level grading settings.
//!
//! Settings are an explicit value handed to the evaluator. They are loaded
//! in layers: built-in defaults, an optional file, then `GRADEBOOK_*`
//! environment variables.

use crate::error::{DisclosureError, Result};
use gradebook_types::RoleId;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

pub use gradebook_types::MAX_DECIMAL_POINTS;

/// Grading settings used by the disclosure evaluator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GradingConfig {
    /// Site default precision; courses may override it
    #[serde(default = "default_decimal_points")]
    pub decimal_points: u8,

    /// Role ids whose holders count as students in the gradebook
    #[serde(default)]
    pub gradebook_roles: GradebookRoles,

    /// How totals containing hidden items are shown to viewers who
    /// cannot see hidden grades
    #[serde(default)]
    pub hidden_totals: HiddenTotalPolicy,

    /// Localized marker shown when grades need recalculating
    #[serde(default = "default_error_marker")]
    pub error_marker: String,

    /// Localized decimal separator
    #[serde(default = "default_decimal_separator")]
    pub decimal_separator: String,
}

fn default_decimal_points() -> u8 {
    2
}

fn default_error_marker() -> String {
    "Error".to_string()
}

fn default_decimal_separator() -> String {
    ".".to_string()
}

impl Default for GradingConfig {
    fn default() -> Self {
        Self {
            decimal_points: default_decimal_points(),
            gradebook_roles: GradebookRoles::default(),
            hidden_totals: HiddenTotalPolicy::default(),
            error_marker: default_error_marker(),
            decimal_separator: default_decimal_separator(),
        }
    }
}

impl GradingConfig {
    /// Default settings with the given student roles
    pub fn new(gradebook_roles: impl IntoIterator<Item = RoleId>) -> Self {
        Self {
            gradebook_roles: GradebookRoles::new(gradebook_roles),
            ..Default::default()
        }
    }

    pub fn with_decimal_points(mut self, decimals: u8) -> Self {
        self.decimal_points = decimals;
        self
    }

    pub fn with_hidden_totals(mut self, policy: HiddenTotalPolicy) -> Self {
        self.hidden_totals = policy;
        self
    }

    pub fn with_error_marker(mut self, marker: impl Into<String>) -> Self {
        self.error_marker = marker.into();
        self
    }

    pub fn with_decimal_separator(mut self, separator: impl Into<String>) -> Self {
        self.decimal_separator = separator.into();
        self
    }

    /// Validate the settings
    pub fn validate(&self) -> Result<()> {
        if self.gradebook_roles.is_empty() {
            return Err(DisclosureError::NoGradebookRoles);
        }
        if self.decimal_points > MAX_DECIMAL_POINTS {
            return Err(DisclosureError::Configuration(format!(
                "decimal_points must be at most {}, got {}",
                MAX_DECIMAL_POINTS, self.decimal_points
            )));
        }
        if self.error_marker.is_empty() {
            return Err(DisclosureError::Configuration(
                "error_marker must not be empty".into(),
            ));
        }
        if self.decimal_separator.is_empty() {
            return Err(DisclosureError::Configuration(
                "decimal_separator must not be empty".into(),
            ));
        }
        Ok(())
    }

    /// Load settings from defaults, an optional file and the environment
    pub fn load(path: Option<&str>) -> Result<Self> {
        let defaults = config::Config::try_from(&GradingConfig::default())?;
        let mut builder = config::Config::builder().add_source(defaults);

        if let Some(path) = path {
            builder = builder.add_source(config::File::with_name(path).required(false));
        }

        builder = builder.add_source(
            config::Environment::with_prefix("GRADEBOOK")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        let config: GradingConfig = builder.build()?.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    /// Parse settings from TOML text over the defaults
    pub fn from_toml_str(toml: &str) -> Result<Self> {
        let config: GradingConfig = config::Config::builder()
            .add_source(config::Config::try_from(&GradingConfig::default())?)
            .add_source(config::File::from_str(toml, config::FileFormat::Toml))
            .build()?
            .try_deserialize()?;
        config.validate()?;
        Ok(config)
    }
}

/// Role ids classified as "student" for gradebook purposes.
///
/// Accepts the platform's comma-separated form (`"5,7"`), a single id or a
/// list of ids.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RolesRepr", into = "Vec<u64>")]
pub struct GradebookRoles(Vec<RoleId>);

#[derive(Deserialize)]
#[serde(untagged)]
enum RolesRepr {
    Single(u64),
    List(Vec<u64>),
    Csv(String),
}

impl TryFrom<RolesRepr> for GradebookRoles {
    type Error = String;

    fn try_from(repr: RolesRepr) -> std::result::Result<Self, Self::Error> {
        match repr {
            RolesRepr::Single(id) => Ok(Self(vec![RoleId(id)])),
            RolesRepr::List(ids) => Ok(Self::new(ids.into_iter().map(RoleId))),
            RolesRepr::Csv(csv) => csv
                .parse()
                .map_err(|e: gradebook_types::ParseIdError| e.to_string()),
        }
    }
}

impl From<GradebookRoles> for Vec<u64> {
    fn from(roles: GradebookRoles) -> Self {
        roles.0.into_iter().map(RoleId::get).collect()
    }
}

impl GradebookRoles {
    /// Deduplicates while keeping first-seen order
    pub fn new(roles: impl IntoIterator<Item = RoleId>) -> Self {
        let mut out: Vec<RoleId> = Vec::new();
        for role in roles {
            if !out.contains(&role) {
                out.push(role);
            }
        }
        Self(out)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn contains(&self, role: RoleId) -> bool {
        self.0.contains(&role)
    }

    pub fn iter(&self) -> impl Iterator<Item = RoleId> + '_ {
        self.0.iter().copied()
    }
}

impl FromStr for GradebookRoles {
    type Err = gradebook_types::ParseIdError;

    /// Empty segments are skipped, so `""` yields no roles.
    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let roles = s
            .split(',')
            .map(str::trim)
            .filter(|part| !part.is_empty())
            .map(RoleId::from_str)
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(Self::new(roles))
    }
}

/// Display of course totals that include hidden grade items.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "PolicyRepr", rename_all = "snake_case")]
pub enum HiddenTotalPolicy {
    /// Blank the total
    Hide,
    /// Recompute the total without the hidden items
    #[default]
    ShowExcludingHidden,
    /// Show the real total
    ShowReal,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum PolicyRepr {
    Code(i64),
    Name(String),
}

impl TryFrom<PolicyRepr> for HiddenTotalPolicy {
    type Error = String;

    fn try_from(repr: PolicyRepr) -> std::result::Result<Self, Self::Error> {
        match repr {
            PolicyRepr::Code(code) => HiddenTotalPolicy::from_code(code)
                .ok_or_else(|| format!("unknown hidden total setting {}", code)),
            PolicyRepr::Name(name) => name.parse(),
        }
    }
}

impl HiddenTotalPolicy {
    /// Map the platform's numeric report setting
    pub fn from_code(code: i64) -> Option<Self> {
        match code {
            0 => Some(HiddenTotalPolicy::Hide),
            1 => Some(HiddenTotalPolicy::ShowExcludingHidden),
            2 => Some(HiddenTotalPolicy::ShowReal),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            HiddenTotalPolicy::Hide => "hide",
            HiddenTotalPolicy::ShowExcludingHidden => "show_excluding_hidden",
            HiddenTotalPolicy::ShowReal => "show_real",
        }
    }
}

impl FromStr for HiddenTotalPolicy {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim() {
            "hide" => Ok(HiddenTotalPolicy::Hide),
            "show_excluding_hidden" => Ok(HiddenTotalPolicy::ShowExcludingHidden),
            "show_real" => Ok(HiddenTotalPolicy::ShowReal),
            other => other
                .parse::<i64>()
                .ok()
                .and_then(HiddenTotalPolicy::from_code)
                .ok_or_else(|| format!("unknown hidden total setting {:?}", other)),
        }
    }
}

impl fmt::Display for HiddenTotalPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
