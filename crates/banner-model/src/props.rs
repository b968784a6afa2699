//! Inputs handed to a banner view by the host application.

use serde::{Deserialize, Serialize};

/// The event being shared.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventInfo {
    pub title: String,
    /// Background image URI. Without it the banner feature is inert.
    #[serde(default)]
    pub social_banner: Option<String>,
}

/// The signed-in user's profile, when known.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    #[serde(default)]
    pub profile_picture: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
}

/// Booking details from checkout, when the banner follows a purchase.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingData {
    #[serde(default)]
    pub attendee_name: Option<String>,
}

/// Everything a banner view is opened with.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BannerProps {
    pub event: EventInfo,
    #[serde(default)]
    pub user_profile: Option<UserProfile>,
    #[serde(default)]
    pub booking_data: Option<BookingData>,
}

impl BannerProps {
    pub fn new(event: EventInfo) -> Self {
        Self {
            event,
            user_profile: None,
            booking_data: None,
        }
    }

    /// Background URI, or `None` when the view should render nothing.
    pub fn social_banner(&self) -> Option<&str> {
        non_blank(self.event.social_banner.as_deref())
    }

    pub fn profile_picture(&self) -> Option<&str> {
        non_blank(
            self.user_profile
                .as_ref()
                .and_then(|p| p.profile_picture.as_deref()),
        )
    }

    /// Name printed on the band. The booking's attendee name wins over the
    /// profile name; blank names count as absent.
    pub fn display_name(&self) -> Option<&str> {
        non_blank(
            self.booking_data
                .as_ref()
                .and_then(|b| b.attendee_name.as_deref()),
        )
        .or_else(|| non_blank(self.user_profile.as_ref().and_then(|p| p.name.as_deref())))
    }
}

/// Band caption for an attendee.
pub fn attendance_caption(name: &str) -> String {
    format!("{} is attending!", name.trim())
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn props() -> BannerProps {
        BannerProps {
            event: EventInfo {
                title: "Rust Conf".to_string(),
                social_banner: Some("https://cdn.example.com/banner.jpg".to_string()),
            },
            user_profile: Some(UserProfile {
                profile_picture: Some("https://cdn.example.com/me.png".to_string()),
                name: Some("Ada".to_string()),
            }),
            booking_data: Some(BookingData {
                attendee_name: Some("Ada Lovelace".to_string()),
            }),
        }
    }

    #[test]
    fn attendee_name_takes_precedence() {
        assert_eq!(props().display_name(), Some("Ada Lovelace"));
    }

    #[test]
    fn falls_back_to_profile_name() {
        let mut p = props();
        p.booking_data = Some(BookingData {
            attendee_name: Some("   ".to_string()),
        });
        assert_eq!(p.display_name(), Some("Ada"));

        p.user_profile = None;
        assert_eq!(p.display_name(), None);
    }

    #[test]
    fn blank_banner_is_treated_as_missing() {
        let mut p = props();
        p.event.social_banner = Some(String::new());
        assert!(p.social_banner().is_none());
    }

    #[test]
    fn host_json_uses_camel_case() {
        let json = r#"{
            "event": { "title": "Gala", "socialBanner": "data:image/png;base64,AA==" },
            "userProfile": { "profilePicture": "https://x/p.png" },
            "bookingData": { "attendeeName": "Grace" }
        }"#;
        let parsed: BannerProps = serde_json::from_str(json).unwrap();
        assert_eq!(parsed.event.title, "Gala");
        assert_eq!(parsed.profile_picture(), Some("https://x/p.png"));
        assert_eq!(parsed.display_name(), Some("Grace"));
    }

    #[test]
    fn caption_template() {
        assert_eq!(attendance_caption(" Ada "), "Ada is attending!");
    }
}
