use serde::{Deserialize, Serialize};

/// Icon shown next to a social link.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SocialIcon {
    Linkedin,
    Github,
    Email,
    Whatsapp,
    Instagram,
    Twitter,
    Phone,
    #[serde(other)]
    Link,
}

impl SocialIcon {
    /// Guess the icon from a free-form platform name.
    pub fn for_platform(platform: &str) -> Self {
        let lower = platform.to_lowercase();
        if lower.contains("linkedin") {
            SocialIcon::Linkedin
        } else if lower.contains("github") {
            SocialIcon::Github
        } else if lower.contains("mail") {
            SocialIcon::Email
        } else if lower.contains("whatsapp") {
            SocialIcon::Whatsapp
        } else if lower.contains("instagram") {
            SocialIcon::Instagram
        } else if lower.contains("twitter") || lower == "x" {
            SocialIcon::Twitter
        } else if lower.contains("phone") {
            SocialIcon::Phone
        } else {
            SocialIcon::Link
        }
    }

    pub fn key(self) -> &'static str {
        match self {
            SocialIcon::Linkedin => "linkedin",
            SocialIcon::Github => "github",
            SocialIcon::Email => "email",
            SocialIcon::Whatsapp => "whatsapp",
            SocialIcon::Instagram => "instagram",
            SocialIcon::Twitter => "twitter",
            SocialIcon::Phone => "phone",
            SocialIcon::Link => "link",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn platform_names_resolve_case_insensitively() {
        assert_eq!(SocialIcon::for_platform("LinkedIn"), SocialIcon::Linkedin);
        assert_eq!(SocialIcon::for_platform("GitHub"), SocialIcon::Github);
        assert_eq!(SocialIcon::for_platform("E-mail"), SocialIcon::Email);
        assert_eq!(SocialIcon::for_platform("Gmail"), SocialIcon::Email);
        assert_eq!(SocialIcon::for_platform("WhatsApp"), SocialIcon::Whatsapp);
        assert_eq!(SocialIcon::for_platform("X"), SocialIcon::Twitter);
        assert_eq!(SocialIcon::for_platform("Mastodon"), SocialIcon::Link);
    }

    #[test]
    fn unknown_keys_deserialize_as_link() {
        let icon: SocialIcon = serde_json::from_str("\"🦀\"").unwrap();
        assert_eq!(icon, SocialIcon::Link);
        let icon: SocialIcon = serde_json::from_str("\"github\"").unwrap();
        assert_eq!(icon, SocialIcon::Github);
    }

    #[test]
    fn key_matches_serialized_form() {
        let json = serde_json::to_string(&SocialIcon::Whatsapp).unwrap();
        assert_eq!(json, format!("\"{}\"", SocialIcon::Whatsapp.key()));
    }
}
