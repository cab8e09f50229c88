use serde::{de::Visitor, Deserialize};
use std::{
    net::SocketAddr,
    ops::Deref,
    path::{Path, PathBuf},
};
use url::Url;

use crate::content::reading::ReadingSpeed;
use crate::metadata::SiteMeta;

#[derive(Deserialize, Debug)]
pub struct DbConfig {
    pub sqlite_file: PathBuf,
}

#[derive(Deserialize, Debug)]
pub struct NetConfig {
    pub proto_host: Url,
    pub bind: SocketAddr,
}

#[derive(Deserialize, Debug)]
pub struct ContentConfig {
    pub root: ValidPath,
    pub public: ValidPath,
}

#[derive(Deserialize, Debug)]
pub struct AdminConfig {
    pub password: String,
    #[serde(default = "AdminConfig::default_session_ttl")]
    pub session_ttl_minutes: i64,
    #[serde(default = "AdminConfig::default_sweep_interval")]
    pub sweep_interval_seconds: u64,
}

impl AdminConfig {
    fn default_session_ttl() -> i64 {
        12 * 60
    }

    fn default_sweep_interval() -> u64 {
        300
    }
}

#[derive(Deserialize, Debug)]
pub struct Config {
    pub net: NetConfig,
    pub db: DbConfig,
    pub content: ContentConfig,
    pub site: SiteMeta,
    #[serde(default)]
    pub reading: ReadingSpeed,
    pub admin: AdminConfig,
}

impl Config {
    pub fn from_toml(text: &str) -> Result<Self, toml::de::Error> {
        let mut config: Config = toml::from_str(text)?;
        config.site.base_url = config.net.proto_host.as_str().trim_end_matches('/').to_string();
        Ok(config)
    }
}

/// A path that existed when the configuration was read, stored canonicalized.
#[derive(Debug, Clone)]
pub struct ValidPath(PathBuf);

impl<'de> Deserialize<'de> for ValidPath {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        struct ValidPathVisitor;
        impl Visitor<'_> for ValidPathVisitor {
            type Value = ValidPath;

            fn expecting(&self, formatter: &mut std::fmt::Formatter) -> std::fmt::Result {
                write!(formatter, "a path to an existing file or directory")
            }

            fn visit_str<E>(self, v: &str) -> Result<Self::Value, E>
            where
                E: serde::de::Error,
            {
                Ok(ValidPath(
                    PathBuf::from(v)
                        .canonicalize()
                        .map_err(|err| E::custom(format!("{v}: {err}")))?,
                ))
            }
        }

        deserializer.deserialize_str(ValidPathVisitor)
    }
}

impl Deref for ValidPath {
    type Target = Path;

    fn deref(&self) -> &Self::Target {
        self.0.as_path()
    }
}
