/// Campaign parameters appended to a share link.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Utm {
    pub source: Option<String>,
    pub medium: Option<String>,
    pub campaign: Option<String>,
}

impl Utm {
    pub fn new(source: &str, medium: &str, campaign: &str) -> Self {
        Self {
            source: Some(source.to_string()),
            medium: Some(medium.to_string()),
            campaign: Some(campaign.to_string()),
        }
    }

    fn query(&self) -> String {
        [
            ("utm_source", &self.source),
            ("utm_medium", &self.medium),
            ("utm_campaign", &self.campaign),
        ]
        .into_iter()
        .filter_map(|(key, value)| {
            let value = value.as_deref()?.trim();
            (!value.is_empty()).then(|| format!("{key}={}", urlencoding::encode(value)))
        })
        .collect::<Vec<_>>()
        .join("&")
    }
}

/// `<base>/share/<token>`, with UTM parameters when given.
pub fn share_link(base_url: &str, token: &str, utm: Option<&Utm>) -> String {
    let mut link = format!("{}/share/{token}", base_url.trim_end_matches('/'));
    if let Some(query) = utm.map(Utm::query).filter(|q| !q.is_empty()) {
        link.push('?');
        link.push_str(&query);
    }
    link
}

/// Pull the token out of a share link. A bare token is returned as-is.
pub fn token_from_link(input: &str) -> Option<&str> {
    let input = input.trim();
    let tail = match input.rfind("/share/") {
        Some(at) => &input[at + "/share/".len()..],
        None if !input.contains('/') => input,
        None => return None,
    };
    let end = tail.find(['?', '#', '/']).unwrap_or(tail.len());
    let token = &tail[..end];
    (!token.is_empty()).then_some(token)
}

#[cfg(test)]
mod tests {
    use super::{Utm, share_link, token_from_link};
    use pretty_assertions::assert_eq;

    #[test]
    fn builds_links_with_encoded_campaign_fields() {
        let utm = Utm::new("passport", "copy link", "summer&fall");
        assert_eq!(
            share_link("https://passport.example/", "abc_-1", Some(&utm)),
            "https://passport.example/share/abc_-1?utm_source=passport&utm_medium=copy%20link&utm_campaign=summer%26fall"
        );
        assert_eq!(
            share_link("https://passport.example", "abc", None),
            "https://passport.example/share/abc"
        );
        assert_eq!(
            share_link("https://passport.example", "abc", Some(&Utm::default())),
            "https://passport.example/share/abc"
        );
    }

    #[test]
    fn extracts_tokens_from_links_and_bare_input() {
        assert_eq!(
            token_from_link("https://passport.example/share/eyJ2Ijpb?utm_source=x"),
            Some("eyJ2Ijpb")
        );
        assert_eq!(token_from_link(" eyJ2Ijpb "), Some("eyJ2Ijpb"));
        assert_eq!(token_from_link("https://passport.example/share/"), None);
        assert_eq!(token_from_link("https://passport.example/about"), None);
    }
}
