//! API endpoints and URL construction.

use reqwest::Url;
use std::fmt;

use crate::error::{ConfigLakeError, Result};

/// The three read endpoints of the Config Lake API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Endpoint {
    /// `/api/config/{project_id}/{environment}`
    Config,
    /// `/api/secrets/{project_id}/{environment}`
    Secrets,
    /// `/api/all/{project_id}/{environment}`
    All,
}

impl Endpoint {
    fn segment(self) -> &'static str {
        match self {
            Endpoint::Config => "config",
            Endpoint::Secrets => "secrets",
            Endpoint::All => "all",
        }
    }

    /// Build the request URL below `base`.
    ///
    /// Any path on `base` is kept as a prefix and a trailing `/` is dropped.
    /// `environment` becomes one percent-encoded path segment.
    pub fn url(self, base: &Url, project_id: u64, environment: &str) -> Result<Url> {
        validate_target(project_id, environment)?;

        let id = project_id.to_string();
        let mut url = base.clone();
        url.set_query(None);
        url.set_fragment(None);
        {
            let mut segments = url.path_segments_mut().map_err(|_| {
                ConfigLakeError::InvalidInput(format!("API URL '{base}' cannot be a base"))
            })?;
            segments
                .pop_if_empty()
                .extend(["api", self.segment(), id.as_str(), environment]);
        }
        Ok(url)
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.segment())
    }
}

fn validate_target(project_id: u64, environment: &str) -> Result<()> {
    if project_id == 0 {
        return Err(ConfigLakeError::InvalidInput(
            "project_id must be a positive integer".to_string(),
        ));
    }
    if environment.trim().is_empty() {
        return Err(ConfigLakeError::InvalidInput(
            "environment must not be empty".to_string(),
        ));
    }
    // Dot segments would be dropped from the path rather than encoded.
    if environment == "." || environment == ".." {
        return Err(ConfigLakeError::InvalidInput(format!(
            "environment '{environment}' is not a valid name"
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    fn base(s: &str) -> Url {
        Url::parse(s).unwrap()
    }

    #[test]
    fn builds_paths_for_each_endpoint() {
        let b = base("https://config.example.com");
        assert_eq!(
            Endpoint::Config.url(&b, 1, "production").unwrap().as_str(),
            "https://config.example.com/api/config/1/production"
        );
        assert_eq!(
            Endpoint::Secrets.url(&b, 42, "dev").unwrap().as_str(),
            "https://config.example.com/api/secrets/42/dev"
        );
        assert_eq!(
            Endpoint::All.url(&b, 7, "staging").unwrap().as_str(),
            "https://config.example.com/api/all/7/staging"
        );
    }

    #[test]
    fn trailing_slash_is_ignored() {
        let b = base("http://localhost:5000/");
        assert_eq!(
            Endpoint::Config.url(&b, 1, "dev").unwrap().as_str(),
            "http://localhost:5000/api/config/1/dev"
        );
    }

    #[test]
    fn base_path_is_preserved() {
        let b = base("https://gateway.example.com/configlake/");
        assert_eq!(
            Endpoint::All.url(&b, 3, "qa").unwrap().path(),
            "/configlake/api/all/3/qa"
        );
    }

    #[test]
    fn environment_is_encoded_as_one_segment() {
        let b = base("https://config.example.com");
        let url = Endpoint::Config.url(&b, 1, "eu west/blue").unwrap();
        assert_eq!(url.path(), "/api/config/1/eu%20west%2Fblue");
    }

    #[test]
    fn rejects_invalid_targets() {
        let b = base("https://config.example.com");
        for (project_id, environment) in [(0, "dev"), (1, ""), (1, "  "), (1, ".."), (1, ".")] {
            let err = Endpoint::Config
                .url(&b, project_id, environment)
                .unwrap_err();
            assert_eq!(err.kind(), ErrorKind::InvalidInput);
        }
    }
}
