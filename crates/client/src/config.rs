/// Where the API lives and which token to send.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ClientConfig {
    pub base_url: String,
    pub token: Option<String>,
}

impl ClientConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            token: None,
        }
    }

    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_trailing_slash_is_trimmed() {
        assert_eq!(ClientConfig::new("http://h:3000/").base_url, "http://h:3000");
        assert_eq!(ClientConfig::new("").base_url, "");
    }

    #[test]
    fn test_with_token() {
        let c = ClientConfig::new("http://h").with_token("abc");
        assert_eq!(c.token.as_deref(), Some("abc"));
    }
}
