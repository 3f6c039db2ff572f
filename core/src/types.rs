//! Domain DTOs for the PSN API.
//!
//! # Design
//! Wire names are camelCase and most fields are optional on the wire, so
//! everything except the identifying `online_id` defaults when absent. The
//! mock-server crate defines its own copies of these shapes; integration
//! tests catch schema drift between the two.

use serde::{Deserialize, Serialize};

/// Snapshot of a remote account.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "camelCase")]
pub struct Profile {
    pub online_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub np_id: Option<String>,
    #[serde(default)]
    pub avatar_urls: Vec<AvatarUrl>,
    #[serde(default)]
    pub plus: u8,
    #[serde(default)]
    pub about_me: String,
    #[serde(default)]
    pub languages_used: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub trophy_summary: Option<TrophySummary>,
    #[serde(default)]
    pub is_officially_verified: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub personal_detail: Option<PersonalDetail>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub primary_online_status: Option<String>,
    /// `"friend"`, `"requesting"`, `"requested"` or `"no"`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub friend_relation: Option<String>,
    #[serde(default)]
    pub request_message_flag: bool,
    #[serde(default)]
    pub blocking: bool,
    #[serde(default)]
    pub following: bool,
    #[serde(default)]
    pub mutual_friends_count: i64,
    #[serde(default)]
    pub follower_count: i64,
}

impl Profile {
    pub fn new(online_id: impl Into<String>) -> Self {
        Self {
            online_id: online_id.into(),
            ..Self::default()
        }
    }

    pub fn is_friend(&self) -> bool {
        self.friend_relation.as_deref() == Some("friend")
    }

    pub fn has_plus(&self) -> bool {
        self.plus != 0
    }

    /// URL of the avatar with the given size tag (`"s"`, `"m"`, `"l"`, `"xl"`).
    pub fn avatar(&self, size: &str) -> Option<&str> {
        self.avatar_urls
            .iter()
            .find(|a| a.size == size)
            .map(|a| a.avatar_url.as_str())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "camelCase")]
pub struct AvatarUrl {
    #[serde(default)]
    pub size: String,
    pub avatar_url: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "camelCase")]
pub struct TrophySummary {
    #[serde(default)]
    pub level: u32,
    #[serde(default)]
    pub progress: u32,
    #[serde(default)]
    pub earned_trophies: TrophyCounts,
}

/// Trophy counts by grade.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct TrophyCounts {
    #[serde(default)]
    pub platinum: u32,
    #[serde(default)]
    pub gold: u32,
    #[serde(default)]
    pub silver: u32,
    #[serde(default)]
    pub bronze: u32,
}

impl TrophyCounts {
    /// Sum of all grades, widened so API-supplied counts cannot overflow.
    pub fn total(&self) -> u64 {
        [self.platinum, self.gold, self.silver, self.bronze]
            .iter()
            .map(|&n| u64::from(n))
            .sum()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "camelCase")]
pub struct PersonalDetail {
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    #[serde(default)]
    pub profile_picture_urls: Vec<ProfilePictureUrl>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "camelCase")]
pub struct ProfilePictureUrl {
    #[serde(default)]
    pub size: String,
    pub profile_picture_url: String,
}

/// Paged trophy-title comparison between the acting account and a target.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "camelCase")]
pub struct CompareTrophiesResponse {
    #[serde(default)]
    pub total_results: u32,
    #[serde(default)]
    pub offset: u32,
    #[serde(default)]
    pub limit: u32,
    #[serde(default)]
    pub trophy_titles: Vec<TrophyTitle>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "camelCase")]
pub struct TrophyTitle {
    pub np_communication_id: String,
    #[serde(default)]
    pub trophy_title_name: String,
    #[serde(default)]
    pub trophy_title_detail: String,
    #[serde(default)]
    pub trophy_title_icon_url: String,
    /// The API spells this field `trophyTitlePlatfrom`.
    #[serde(default, rename = "trophyTitlePlatfrom")]
    pub trophy_title_platform: String,
    #[serde(default)]
    pub has_trophy_groups: bool,
    #[serde(default)]
    pub defined_trophies: TrophyCounts,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub compared_user: Option<TitleProgress>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub from_user: Option<TitleProgress>,
}

/// One account's progress on a trophy title.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "camelCase")]
pub struct TitleProgress {
    pub online_id: String,
    #[serde(default)]
    pub progress: u32,
    #[serde(default)]
    pub earned_trophies: TrophyCounts,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_update_date: Option<String>,
}

/// A page of a user's activity feed.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct ActivityResponse {
    #[serde(default)]
    pub feed: Vec<FeedItem>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next_page: Option<u32>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct FeedItem {
    pub story_id: String,
    #[serde(default)]
    pub story_type: String,
    #[serde(default)]
    pub caption: String,
    #[serde(default)]
    pub date: String,
    #[serde(default)]
    pub liked: bool,
    #[serde(default)]
    pub like_count: u32,
    #[serde(default)]
    pub comment_count: u32,
    /// Story-type specific payload, left untyped.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<serde_json::Value>,
    #[serde(default)]
    pub targets: Vec<serde_json::Value>,
}

/// Message content type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageKind {
    Text,
    Audio,
    Image,
}

impl MessageKind {
    /// Numeric `messageKind` used on the wire.
    pub fn wire_code(self) -> u32 {
        match self {
            MessageKind::Text => 1,
            MessageKind::Image => 3,
            MessageKind::Audio => 1011,
        }
    }
}

/// Outbound message. The receiver is assigned by `User::send_message`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    pub kind: MessageKind,
    pub body: String,
    /// Additional recipients besides the receiving user.
    pub recipients: Vec<String>,
    receiver: Option<String>,
}

impl Message {
    pub fn text(body: impl Into<String>) -> Self {
        Self::new(MessageKind::Text, body)
    }

    pub fn new(kind: MessageKind, body: impl Into<String>) -> Self {
        Self {
            kind,
            body: body.into(),
            recipients: Vec::new(),
            receiver: None,
        }
    }

    pub fn with_recipient(mut self, online_id: impl Into<String>) -> Self {
        self.recipients.push(online_id.into());
        self
    }

    pub fn receiver(&self) -> Option<&str> {
        self.receiver.as_deref()
    }

    pub(crate) fn assign_receiver(&mut self, online_id: &str) {
        self.receiver = Some(online_id.to_string());
    }

    /// Receiver first, then extra recipients, without duplicates.
    pub fn addressees(&self) -> Vec<String> {
        let mut out: Vec<String> = Vec::with_capacity(self.recipients.len() + 1);
        for id in self.receiver.iter().chain(self.recipients.iter()) {
            if !out.contains(id) {
                out.push(id.clone());
            }
        }
        out
    }
}

/// Request payload for the messaging endpoint.
#[derive(Debug, Clone, Serialize)]
pub(crate) struct SendMessageBody<'a> {
    pub to: Vec<String>,
    pub message: MessagePayload<'a>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct MessagePayload<'a> {
    pub message_kind: u32,
    pub body: &'a str,
}
