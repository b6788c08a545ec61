// Wire models for the review service.
//
// The service speaks Portuguese field names; structs here use English names
// and map each field with `#[serde(rename)]`.

pub mod achievement;
#[cfg(test)]
pub(crate) mod fixtures;
pub mod game;
pub mod live;
pub mod player;
pub mod review;
pub mod team;
pub mod user;

pub use achievement::{Achievement, UnlockedAchievement};
pub use game::{FeaturedGame, FeaturedWindow, Game, GameFilter, SearchQuery, SearchResult};
pub use live::{LiveBoxScore, LivePlayerLine, LiveTeamLine, PlayByPlayEvent};
pub use player::{GameLogEntry, Player, PlayerAward, PlayerDetails, SeasonAverages};
pub use review::{
    Comment, FeedReview, LikeReceipt, NewComment, Review, ReviewDraft, ReviewSummary, Scores,
};
pub use team::{RosterPlayer, Schedule, Team, TeamDetails, TeamSummary, TeamTitle};
pub use user::{
    AccessToken, AccountStatus, NewUser, ProfileUpdate, SocialUser, TeamRating, UploadedFile,
    User, UserLevel, UserProfile, UserStats, UserSummary, VotedPlayer,
};

/// Timestamps arrive either as naive ISO-8601 (`2024-03-01T19:30:00`) or with
/// an offset. Naive values are taken as UTC.
pub mod timestamp {
    use chrono::{DateTime, NaiveDateTime, Utc};
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn parse(raw: &str) -> Option<DateTime<Utc>> {
        if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
            return Some(dt.with_timezone(&Utc));
        }
        ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"]
            .iter()
            .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
            .map(|naive| naive.and_utc())
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        parse(&raw).ok_or_else(|| serde::de::Error::custom(format!("invalid timestamp `{raw}`")))
    }

    pub fn serialize<S>(value: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&value.to_rfc3339())
    }
}

#[cfg(test)]
mod tests {
    use super::timestamp;
    use chrono::{TimeZone, Utc};

    #[test]
    fn parses_naive_and_offset_timestamps() {
        let expected = Utc.with_ymd_and_hms(2024, 3, 1, 19, 30, 0).unwrap();
        assert_eq!(timestamp::parse("2024-03-01T19:30:00"), Some(expected));
        assert_eq!(timestamp::parse("2024-03-01T19:30:00Z"), Some(expected));
        assert_eq!(timestamp::parse("2024-03-01T16:30:00-03:00"), Some(expected));
        assert_eq!(timestamp::parse("2024-03-01 19:30:00.000"), Some(expected));
        assert_eq!(timestamp::parse("yesterday"), None);
    }
}
