#![deny(unsafe_code)]

use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{Result, StandardsError};

/// Placeholder substituted by a repository's base URL in stream templates.
pub const URL_PLACEHOLDER: &str = "{url}";

const JHU_BASE_URL: &str = "https://raw.githubusercontent.com/CSSEGISandData/COVID-19/master";
const DPC_BASE_URL: &str = "https://raw.githubusercontent.com/pcm-dpc/COVID-19/master";
const JHU_SERIES: &str = "{url}/csse_covid_19_data/csse_covid_19_time_series";

/// A data repository: a base URL plus named stream templates.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Repository {
    pub url: String,
    #[serde(default)]
    pub streams: BTreeMap<String, String>,
}

impl Repository {
    fn new(url: &str, streams: &[(&str, String)]) -> Self {
        Self {
            url: url.to_string(),
            streams: streams
                .iter()
                .map(|(name, template)| ((*name).to_string(), template.clone()))
                .collect(),
        }
    }

    /// Substitutes the base URL into the named stream, or into `stream`
    /// itself when it is not a registered stream name.
    pub fn resolve(&self, stream: &str) -> String {
        let template = self.streams.get(stream).map_or(stream, String::as_str);
        template.replace(URL_PLACEHOLDER, &self.url)
    }
}

/// Column layout of a wide time-series table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeSeriesLayout {
    /// Index of the first date column; earlier columns hold geography and metadata.
    pub date_start: usize,
    /// Country column name.
    pub country: String,
    /// Sub-national (province/state) column name.
    pub state: String,
}

impl TimeSeriesLayout {
    pub fn new(date_start: usize, country: &str, state: &str) -> Self {
        Self {
            date_start,
            country: country.to_string(),
            state: state.to_string(),
        }
    }
}

/// Immutable catalogue of supported repositories and wide-table layouts.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SchemaRegistry {
    #[serde(default)]
    repos: BTreeMap<String, Repository>,
    #[serde(default)]
    layouts: BTreeMap<String, TimeSeriesLayout>,
}

impl SchemaRegistry {
    /// The registry of sources this workspace knows how to normalize.
    pub fn builtin() -> Self {
        let jhu = |file: &str| format!("{JHU_SERIES}/{file}");
        let dpc = |path: &str| format!("{URL_PLACEHOLDER}/{path}");

        let mut repos = BTreeMap::new();
        repos.insert(
            "world".to_string(),
            Repository::new(
                JHU_BASE_URL,
                &[
                    ("deaths", jhu("time_series_covid19_deaths_global.csv")),
                    ("cases", jhu("time_series_covid19_confirmed_global.csv")),
                ],
            ),
        );
        repos.insert(
            "italy".to_string(),
            Repository::new(
                DPC_BASE_URL,
                &[
                    (
                        "andamento-nazionale",
                        dpc("dati-andamento-nazionale/dpc-covid19-ita-andamento-nazionale.csv"),
                    ),
                    ("regioni", dpc("dati-regioni/dpc-covid19-ita-regioni.csv")),
                    ("province", dpc("dati-province/dpc-covid19-ita-province.csv")),
                ],
            ),
        );
        repos.insert(
            "usa".to_string(),
            Repository::new(
                JHU_BASE_URL,
                &[
                    ("deaths", jhu("time_series_covid19_deaths_US.csv")),
                    ("cases", jhu("time_series_covid19_confirmed_US.csv")),
                ],
            ),
        );

        let mut layouts = BTreeMap::new();
        layouts.insert(
            "world".to_string(),
            TimeSeriesLayout::new(4, "Country/Region", "Province/State"),
        );
        layouts.insert(
            "usa".to_string(),
            TimeSeriesLayout::new(16, "Country_Region", "Province_State"),
        );

        Self { repos, layouts }
    }

    /// Parses a registry from TOML text.
    ///
    /// ```toml
    /// [repos.world]
    /// url = "https://example.org/data"
    ///
    /// [repos.world.streams]
    /// deaths = "{url}/deaths.csv"
    ///
    /// [layouts.world]
    /// date_start = 4
    /// country = "Country/Region"
    /// state = "Province/State"
    /// ```
    pub fn from_toml_str(contents: &str) -> Result<Self> {
        Self::parse(contents, "<inline>")
    }

    /// Loads a registry from a TOML file.
    pub fn load(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path).map_err(|e| StandardsError::io(path, e))?;
        let registry = Self::parse(&contents, &path.display().to_string())?;
        tracing::debug!(
            path = %path.display(),
            repos = registry.repos.len(),
            layouts = registry.layouts.len(),
            "loaded schema registry"
        );
        Ok(registry)
    }

    fn parse(contents: &str, origin: &str) -> Result<Self> {
        let registry: Self = toml::from_str(contents).map_err(|source| StandardsError::Toml {
            origin: origin.to_string(),
            source,
        })?;
        registry.check()?;
        Ok(registry)
    }

    fn check(&self) -> Result<()> {
        for (name, repo) in &self.repos {
            if repo.url.trim().is_empty() {
                return Err(StandardsError::InvalidEntry {
                    name: name.clone(),
                    message: "repository url is empty".to_string(),
                });
            }
        }
        for (kind, layout) in &self.layouts {
            if layout.country.trim().is_empty() {
                return Err(StandardsError::InvalidEntry {
                    name: kind.clone(),
                    message: "layout has no country column".to_string(),
                });
            }
        }
        Ok(())
    }

    /// Entries of `other` replace same-named entries of `self`.
    #[must_use]
    pub fn merge(mut self, other: Self) -> Self {
        self.repos.extend(other.repos);
        self.layouts.extend(other.layouts);
        self
    }

    pub fn repository(&self, name: &str) -> Result<&Repository> {
        self.repos
            .get(name)
            .ok_or_else(|| StandardsError::UnknownRepository {
                name: name.to_string(),
            })
    }

    pub fn repository_names(&self) -> impl Iterator<Item = &str> {
        self.repos.keys().map(String::as_str)
    }

    /// Resolves a stream name (or a literal URL template) of `repo` to a URL.
    pub fn resolve(&self, repo: &str, stream: &str) -> Result<String> {
        let url = self.repository(repo)?.resolve(stream);
        tracing::debug!(repo, stream, %url, "resolved stream url");
        Ok(url)
    }

    pub fn layout(&self, kind: &str) -> Result<&TimeSeriesLayout> {
        self.layouts
            .get(kind)
            .ok_or_else(|| StandardsError::UnknownLayout {
                kind: kind.to_string(),
            })
    }
}

/// Last path segment of a URL: the name a downloaded file is stored under.
pub fn file_name(url: &str) -> &str {
    url.rsplit('/').next().unwrap_or(url)
}
