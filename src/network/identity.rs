use reqwest::header::{HeaderMap, HeaderValue, InvalidHeaderValue, ACCEPT, ACCEPT_LANGUAGE, USER_AGENT};

use crate::config::constants;

// * IdentityProfile is the static request identity sent with every GET.
pub struct IdentityProfile {
    pub user_agent: String,
    pub accept: &'static str,
    pub accept_language: &'static str,
}

impl IdentityProfile {
    // * The default desktop browser identity.
    pub fn desktop() -> Self {
        Self::with_user_agent(constants::USER_AGENT)
    }

    pub fn with_user_agent(user_agent: &str) -> Self {
        Self {
            user_agent: user_agent.to_string(),
            accept: "text/html,application/xhtml+xml,application/xml;q=0.9,*/*;q=0.8",
            accept_language: "en-US,en;q=0.9",
        }
    }

    // * Applies the configured profile to a mutable HeaderMap.
    pub fn apply_to_headers(&self, headers: &mut HeaderMap) -> Result<(), InvalidHeaderValue> {
        headers.insert(USER_AGENT, HeaderValue::from_str(&self.user_agent)?);
        headers.insert(ACCEPT, HeaderValue::from_static(self.accept));
        headers.insert(ACCEPT_LANGUAGE, HeaderValue::from_static(self.accept_language));
        Ok(())
    }
}
