// Static achievement catalog and its join against the server's unlocked set.

use chrono::{DateTime, Utc};

use crate::models::UnlockedAchievement;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CatalogEntry {
    pub id: u32,
    pub tier: u8,
    pub title: &'static str,
    pub description: &'static str,
    pub xp: u32,
}

const fn entry(
    id: u32,
    tier: u8,
    title: &'static str,
    description: &'static str,
    xp: u32,
) -> CatalogEntry {
    CatalogEntry {
        id,
        tier,
        title,
        description,
        xp,
    }
}

/// Every achievement the service can award, ordered by id.
pub const CATALOG: &[CatalogEntry] = &[
    entry(1, 1, "First Review", "Reviewed your first game.", 10),
    entry(2, 2, "Active Critic", "Reviewed 10 games.", 50),
    entry(3, 1, "Commentator", "Left your first comment on a review.", 5),
    entry(4, 1, "Social", "Started following 5 users.", 25),
    entry(5, 1, "Brave Heart", "Reviewed a game of your favourite team.", 25),
    entry(6, 2, "Overtime", "Reviewed a game decided in overtime.", 75),
    entry(7, 1, "Game of the Season", "Gave a game the top score (5.0).", 20),
    entry(8, 2, "Voice of the Crowd", "Got 10 likes on one of your reviews.", 100),
    entry(9, 3, "Opinion Maker", "Followed by 10 users.", 150),
    entry(10, 3, "Tactical Analyst", "Reviewed 25 games with attack and defense scores.", 150),
    entry(11, 1, "Historic Rivalry", "Reviewed an NBA classic.", 40),
    entry(12, 2, "Marathoner", "Reviewed 5 games in a single week.", 60),
    entry(13, 3, "Seasoned Critic", "Reached 50 game reviews.", 200),
    entry(14, 3, "Pure Gold", "One of your reviews got 50 likes.", 200),
    entry(15, 3, "Influencer", "Built a base of 25 followers.", 250),
    entry(16, 4, "Analysis Legend", "Became a reference with 100 reviews.", 400),
    entry(17, 4, "Franchise Specialist", "Reviewed 25 games of your favourite team.", 250),
    entry(18, 4, "NBA Marathoner", "Reviewed a game of each of the 30 teams.", 500),
];

pub fn lookup(id: u32) -> Option<&'static CatalogEntry> {
    CATALOG.iter().find(|e| e.id == id)
}

/// A catalog entry with its unlock state for one user.
#[derive(Debug, Clone, PartialEq)]
pub struct AchievementCard {
    pub entry: &'static CatalogEntry,
    pub unlocked_at: Option<DateTime<Utc>>,
}

impl AchievementCard {
    pub fn is_unlocked(&self) -> bool {
        self.unlocked_at.is_some()
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct AchievementBoard {
    pub cards: Vec<AchievementCard>,
    /// Unlocked ids the catalog does not know about.
    pub unknown_ids: Vec<u32>,
}

impl AchievementBoard {
    pub fn unlocked_count(&self) -> usize {
        self.cards.iter().filter(|c| c.is_unlocked()).count()
    }

    pub fn total(&self) -> usize {
        self.cards.len()
    }

    /// XP from unlocked catalog entries.
    pub fn earned_xp(&self) -> u32 {
        self.cards
            .iter()
            .filter(|c| c.is_unlocked())
            .map(|c| c.entry.xp)
            .sum()
    }
}

/// Join the catalog against the server's unlocked list. Records whose nested
/// achievement is missing are skipped.
pub fn join_catalog(unlocked: &[UnlockedAchievement]) -> AchievementBoard {
    let mut unknown_ids = Vec::new();
    for record in unlocked {
        let Some(achievement) = &record.achievement else {
            continue;
        };
        if lookup(achievement.id).is_none() && !unknown_ids.contains(&achievement.id) {
            unknown_ids.push(achievement.id);
        }
    }

    let cards = CATALOG
        .iter()
        .map(|entry| AchievementCard {
            entry,
            unlocked_at: unlocked
                .iter()
                .filter_map(|r| r.achievement.as_ref().map(|a| (a.id, r.unlocked_at)))
                .filter(|(id, _)| *id == entry.id)
                .map(|(_, at)| at)
                .min(),
        })
        .collect();

    AchievementBoard { cards, unknown_ids }
}
