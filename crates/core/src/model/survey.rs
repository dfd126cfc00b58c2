use std::fmt;

use thiserror::Error;
use url::Url;

/// Survey provider the generated wrapper embeds when nothing else is configured.
pub const DEFAULT_SURVEY_DOMAIN: &str = "typeform.com";

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum SurveyUrlError {
    #[error("survey URL cannot be empty")]
    Empty,

    #[error("survey URL is not a valid URL")]
    Malformed,

    #[error("survey URL must use https")]
    InsecureScheme,

    #[error("survey URL must point at a subdomain of {domain}")]
    ForeignHost { domain: String },

    #[error("survey URL must include a form path")]
    MissingPath,

    #[error("survey domain cannot be empty")]
    EmptyDomain,
}

/// Domain of the survey provider, used both to validate survey URLs and to
/// filter inbound cross-frame messages by origin.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SurveyDomain(String);

impl SurveyDomain {
    /// # Errors
    ///
    /// Returns `SurveyUrlError::EmptyDomain` if the trimmed domain is empty.
    pub fn new(raw: impl Into<String>) -> Result<Self, SurveyUrlError> {
        let domain = raw.into().trim().trim_start_matches('.').to_ascii_lowercase();
        if domain.is_empty() {
            return Err(SurveyUrlError::EmptyDomain);
        }
        Ok(Self(domain))
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Substring match on the sender origin, the same test the wrapper page
    /// applies to `MessageEvent.origin`.
    #[must_use]
    pub fn matches_origin(&self, origin: &str) -> bool {
        origin.contains(self.0.as_str())
    }

    fn is_subdomain_host(&self, host: &str) -> bool {
        host.len() > self.0.len()
            && host.ends_with(self.0.as_str())
            && host[..host.len() - self.0.len()].ends_with('.')
    }
}

impl Default for SurveyDomain {
    fn default() -> Self {
        Self(DEFAULT_SURVEY_DOMAIN.to_owned())
    }
}

impl fmt::Display for SurveyDomain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A validated `https://<account>.<domain>/<form>` survey address.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SurveyUrl(Url);

impl SurveyUrl {
    /// # Errors
    ///
    /// Returns `SurveyUrlError` if the URL is empty, unparsable, not https,
    /// hosted outside the provider's subdomains, or has no form path.
    pub fn parse(raw: &str, domain: &SurveyDomain) -> Result<Self, SurveyUrlError> {
        let raw = raw.trim();
        if raw.is_empty() {
            return Err(SurveyUrlError::Empty);
        }
        let url = Url::parse(raw).map_err(|_| SurveyUrlError::Malformed)?;
        if url.scheme() != "https" {
            return Err(SurveyUrlError::InsecureScheme);
        }
        let host = url.host_str().unwrap_or_default();
        if !domain.is_subdomain_host(host) {
            return Err(SurveyUrlError::ForeignHost {
                domain: domain.to_string(),
            });
        }
        if url.path().trim_start_matches('/').is_empty() {
            return Err(SurveyUrlError::MissingPath);
        }
        Ok(Self(url))
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }

    #[must_use]
    pub fn as_url(&self) -> &Url {
        &self.0
    }
}

impl fmt::Display for SurveyUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.0.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_provider_subdomain_with_form_path() {
        let domain = SurveyDomain::default();
        let url = SurveyUrl::parse(" https://acme.typeform.com/to/AbCd12 ", &domain).unwrap();
        assert_eq!(url.as_str(), "https://acme.typeform.com/to/AbCd12");
    }

    #[test]
    fn rejects_bad_urls() {
        let domain = SurveyDomain::default();
        assert_eq!(SurveyUrl::parse("", &domain), Err(SurveyUrlError::Empty));
        assert_eq!(
            SurveyUrl::parse("not a url", &domain),
            Err(SurveyUrlError::Malformed)
        );
        assert_eq!(
            SurveyUrl::parse("http://acme.typeform.com/to/x", &domain),
            Err(SurveyUrlError::InsecureScheme)
        );
        assert!(matches!(
            SurveyUrl::parse("https://typeform.com/to/x", &domain),
            Err(SurveyUrlError::ForeignHost { .. })
        ));
        assert!(matches!(
            SurveyUrl::parse("https://acme.nottypeform.com/to/x", &domain),
            Err(SurveyUrlError::ForeignHost { .. })
        ));
        assert_eq!(
            SurveyUrl::parse("https://acme.typeform.com/", &domain),
            Err(SurveyUrlError::MissingPath)
        );
    }

    #[test]
    fn origin_match_is_substring() {
        let domain = SurveyDomain::new("Typeform.com").unwrap();
        assert!(domain.matches_origin("https://acme.typeform.com"));
        assert!(!domain.matches_origin("https://evil.example.org"));
        assert_eq!(SurveyDomain::new("  "), Err(SurveyUrlError::EmptyDomain));
    }
}
