//! Client configuration.
//!
//! Facades read their settings through the [`ConfigurationProvider`] trait so callers
//! can plug in whatever source they keep credentials in. [`StaticConfigurationProvider`]
//! covers the common cases: values set in code, or read from the environment.

use crate::{Error, Result};

/// Environment variable holding the region name or short code.
pub const ENV_REGION: &str = "CORE_REGION";
/// Environment variable holding the tenancy id.
pub const ENV_TENANCY_ID: &str = "CORE_TENANCY_ID";
/// Environment variable holding the user id.
pub const ENV_USER_ID: &str = "CORE_USER_ID";
/// Environment variable holding the API key fingerprint.
pub const ENV_FINGERPRINT: &str = "CORE_FINGERPRINT";

/// A source of client settings.
pub trait ConfigurationProvider: Send + Sync {
    fn region(&self) -> Result<String>;

    fn tenancy_id(&self) -> Result<String>;

    fn user_id(&self) -> Result<String>;

    fn key_fingerprint(&self) -> Result<String>;

    /// The signing key id, `tenancy/user/fingerprint`.
    fn key_id(&self) -> Result<String> {
        Ok(format!(
            "{}/{}/{}",
            self.tenancy_id()?,
            self.user_id()?,
            self.key_fingerprint()?
        ))
    }
}

/// Checks that every setting a facade needs is present and non-empty.
pub fn validate(provider: &dyn ConfigurationProvider) -> Result<()> {
    let settings = [
        ("region", provider.region()?),
        ("tenancy id", provider.tenancy_id()?),
        ("user id", provider.user_id()?),
        ("key fingerprint", provider.key_fingerprint()?),
    ];
    for (name, value) in settings {
        if value.trim().is_empty() {
            return Err(Error::InvalidConfiguration(format!("{} is empty", name)));
        }
    }
    Ok(())
}

/// Settings held in memory.
///
/// # Examples
///
/// ```
/// use coreservices::{ConfigurationProvider, StaticConfigurationProvider};
///
/// let config = StaticConfigurationProvider::builder()
///     .region("phx")
///     .tenancy_id("ocid1.tenancy.oc1..t")
///     .user_id("ocid1.user.oc1..u")
///     .key_fingerprint("20:3b:97")
///     .build()
///     .unwrap();
///
/// assert_eq!(config.key_id().unwrap(), "ocid1.tenancy.oc1..t/ocid1.user.oc1..u/20:3b:97");
/// ```
#[derive(Debug, Clone)]
pub struct StaticConfigurationProvider {
    region: String,
    tenancy_id: String,
    user_id: String,
    key_fingerprint: String,
}

impl StaticConfigurationProvider {
    pub fn builder() -> StaticConfigurationProviderBuilder {
        StaticConfigurationProviderBuilder::default()
    }

    /// Reads `CORE_REGION`, `CORE_TENANCY_ID`, `CORE_USER_ID` and `CORE_FINGERPRINT`.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let mut builder = Self::builder();
        builder.region = lookup(ENV_REGION);
        builder.tenancy_id = lookup(ENV_TENANCY_ID);
        builder.user_id = lookup(ENV_USER_ID);
        builder.key_fingerprint = lookup(ENV_FINGERPRINT);
        builder.build()
    }
}

impl ConfigurationProvider for StaticConfigurationProvider {
    fn region(&self) -> Result<String> {
        Ok(self.region.clone())
    }

    fn tenancy_id(&self) -> Result<String> {
        Ok(self.tenancy_id.clone())
    }

    fn user_id(&self) -> Result<String> {
        Ok(self.user_id.clone())
    }

    fn key_fingerprint(&self) -> Result<String> {
        Ok(self.key_fingerprint.clone())
    }
}

/// Builder for [`StaticConfigurationProvider`].
#[derive(Debug, Default)]
pub struct StaticConfigurationProviderBuilder {
    region: Option<String>,
    tenancy_id: Option<String>,
    user_id: Option<String>,
    key_fingerprint: Option<String>,
}

impl StaticConfigurationProviderBuilder {
    pub fn region(mut self, region: impl Into<String>) -> Self {
        self.region = Some(region.into());
        self
    }

    pub fn tenancy_id(mut self, tenancy_id: impl Into<String>) -> Self {
        self.tenancy_id = Some(tenancy_id.into());
        self
    }

    pub fn user_id(mut self, user_id: impl Into<String>) -> Self {
        self.user_id = Some(user_id.into());
        self
    }

    pub fn key_fingerprint(mut self, fingerprint: impl Into<String>) -> Self {
        self.key_fingerprint = Some(fingerprint.into());
        self
    }

    /// Builds the provider.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidConfiguration`] if any setting is missing or empty.
    pub fn build(self) -> Result<StaticConfigurationProvider> {
        fn required(value: Option<String>, name: &str) -> Result<String> {
            match value {
                Some(value) if !value.trim().is_empty() => Ok(value),
                _ => Err(Error::InvalidConfiguration(format!("{} is required", name))),
            }
        }

        Ok(StaticConfigurationProvider {
            region: required(self.region, "region")?,
            tenancy_id: required(self.tenancy_id, "tenancy id")?,
            user_id: required(self.user_id, "user id")?,
            key_fingerprint: required(self.key_fingerprint, "key fingerprint")?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_builder_requires_every_setting() {
        let err = StaticConfigurationProvider::builder()
            .region("iad")
            .tenancy_id("t")
            .user_id("u")
            .build()
            .unwrap_err();
        assert!(matches!(
            err,
            Error::InvalidConfiguration(message) if message.contains("fingerprint")
        ));
    }

    #[test]
    fn test_blank_values_are_rejected() {
        let err = StaticConfigurationProvider::builder()
            .region("  ")
            .tenancy_id("t")
            .user_id("u")
            .key_fingerprint("f")
            .build()
            .unwrap_err();
        assert!(matches!(err, Error::InvalidConfiguration(_)));
    }

    #[test]
    fn test_lookup_from_environment_names() {
        let env: HashMap<&str, &str> = [
            (ENV_REGION, "us-ashburn-1"),
            (ENV_TENANCY_ID, "t"),
            (ENV_USER_ID, "u"),
            (ENV_FINGERPRINT, "f"),
        ]
        .into_iter()
        .collect();

        let config =
            StaticConfigurationProvider::from_lookup(|name| env.get(name).map(|v| v.to_string()))
                .unwrap();
        assert_eq!(config.region().unwrap(), "us-ashburn-1");
        assert_eq!(config.key_id().unwrap(), "t/u/f");
        assert!(validate(&config).is_ok());
    }
}
