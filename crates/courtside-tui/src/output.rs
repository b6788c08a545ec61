// Plain-text rendering for the one-shot commands.

use courtside_app::views::game_detail::TeamAverages;
use courtside_app::{FeedItem, ProfilePage, ReviewItem};
use courtside_core::achievements::AchievementBoard;
use courtside_core::models::{
    Comment, FeaturedGame, Game, GameLogEntry, Player, PlayerDetails, RosterPlayer, SocialUser,
    Team, TeamDetails, User,
};

const TEXT_PREVIEW: usize = 60;

pub fn score(value: f64) -> String {
    format!("{value:.1}")
}

fn optional_score(value: Option<f64>) -> String {
    value.map(score).unwrap_or_else(|| "-".to_string())
}

/// First line of `text`, cut to `max` characters.
pub fn preview(text: &str, max: usize) -> String {
    let line = text.lines().next().unwrap_or_default().trim();
    if line.chars().count() <= max {
        return line.to_string();
    }
    let cut: String = line.chars().take(max.saturating_sub(3)).collect();
    format!("{}...", cut.trim_end())
}

pub fn user_line(user: &User) -> String {
    let team = user
        .favorite_team
        .as_ref()
        .map(|t| format!(", {} fan", t.abbreviation))
        .unwrap_or_default();
    format!(
        "{} (@{}) - {}, {} XP{team}",
        user.display_name(),
        user.username,
        user.level,
        user.xp
    )
}

pub fn game_line(game: &Game) -> String {
    format!(
        "{:<28} {} {:>3} @ {} {:>3}  {:<10} {}",
        game.slug.as_deref().unwrap_or("-"),
        game.away_team.abbreviation,
        game.away_score,
        game.home_team.abbreviation,
        game.home_score,
        game.status,
        game.tip_off.format("%Y-%m-%d %H:%M")
    )
}

pub fn featured_line(game: &FeaturedGame) -> String {
    format!(
        "{:<28} {} {:>3} @ {} {:>3}  {} avg over {} reviews ({})",
        game.slug,
        game.away_team.abbreviation,
        game.away_score,
        game.home_team.abbreviation,
        game.home_score,
        score(game.average_rating),
        game.review_count,
        game.highlight
    )
}

pub fn averages_line(label: &str, averages: TeamAverages) -> String {
    format!(
        "{label}: attack {}  defense {}  combined {}",
        optional_score(averages.attack),
        optional_score(averages.defense),
        optional_score(averages.combined())
    )
}

fn like_marker(liked: bool) -> &'static str {
    if liked {
        "♥"
    } else {
        "♡"
    }
}

pub fn review_line(item: &ReviewItem) -> String {
    let review = item.review();
    let likes = item.likes();
    let text = review
        .text
        .as_deref()
        .map(|t| format!("  \"{}\"", preview(t, TEXT_PREVIEW)))
        .unwrap_or_default();
    format!(
        "#{:<5} @{:<16} {}  {} {}{text}",
        review.id,
        review.author.username,
        score(review.scores.overall),
        like_marker(likes.liked),
        likes.count
    )
}

pub fn feed_line(item: &FeedItem) -> String {
    let likes = item.like.state();
    format!(
        "#{:<5} @{:<16} {:<10} {}  {} {}  {} comments",
        item.review.id,
        item.review.author.username,
        item.review.game.matchup(),
        score(item.review.overall),
        like_marker(likes.liked),
        likes.count,
        item.review.comments
    )
}

/// Comments in thread order, replies indented under their parent.
pub fn comment_lines(comments: &[Comment]) -> Vec<String> {
    let mut lines = Vec::new();
    for top in comments.iter().filter(|c| c.reply_to.is_none()) {
        lines.push(format!("#{} @{}: {}", top.id, top.author.username, top.text));
        for reply in comments.iter().filter(|c| c.reply_to == Some(top.id)) {
            lines.push(format!(
                "    #{} @{}: {}",
                reply.id, reply.author.username, reply.text
            ));
        }
    }
    // Replies whose parent is not in the list still get shown.
    for orphan in comments.iter().filter(|c| {
        c.reply_to
            .is_some_and(|parent| !comments.iter().any(|p| p.id == parent))
    }) {
        lines.push(format!(
            "#{} @{}: {}",
            orphan.id, orphan.author.username, orphan.text
        ));
    }
    lines
}

pub fn profile_lines(page: &ProfilePage, following: Option<bool>) -> Vec<String> {
    let profile = &page.profile;
    let mut lines = vec![user_line(&profile.user)];
    if let Some(bio) = profile.user.bio.as_deref().filter(|b| !b.trim().is_empty()) {
        lines.push(preview(bio, 80));
    }
    lines.push(format!(
        "{} reviews  {} followers  {} following",
        profile.review_count, profile.follower_count, profile.following_count
    ));
    lines.push(format!(
        "average rating {} over {} reviews",
        score(page.stats.average_rating),
        page.stats.review_count
    ));
    if let Some(following) = following {
        let line = if following {
            "you follow this user"
        } else {
            "you do not follow this user"
        };
        lines.push(line.to_string());
    }
    lines
}

pub fn social_line(user: &SocialUser) -> String {
    let marker = if user.followed_by_me { " (following)" } else { "" };
    format!("@{} - {}{marker}", user.user.username, user.user.level)
}

pub fn achievement_lines(board: &AchievementBoard) -> Vec<String> {
    let mut lines = vec![format!(
        "{}/{} unlocked, {} XP",
        board.unlocked_count(),
        board.total(),
        board.earned_xp()
    )];
    for card in &board.cards {
        let state = match card.unlocked_at {
            Some(at) => format!("[x] {}", at.format("%Y-%m-%d")),
            None => "[ ]           ".to_string(),
        };
        lines.push(format!(
            "{state} T{} {:<22} {:>4} XP  {}",
            card.entry.tier, card.entry.title, card.entry.xp, card.entry.description
        ));
    }
    lines
}

pub fn team_line(team: &Team) -> String {
    format!(
        "{:<4} {:<28} {}",
        team.abbreviation,
        team.name,
        team.slug.as_deref().unwrap_or("-")
    )
}

pub fn team_lines(details: &TeamDetails) -> Vec<String> {
    let team = &details.team;
    let mut lines = vec![match team.city.as_deref() {
        Some(city) => format!("{} ({}) - {city}", team.name, team.abbreviation),
        None => format!("{} ({})", team.name, team.abbreviation),
    }];
    if !details.titles.is_empty() {
        lines.push("Titles".to_string());
        for title in &details.titles {
            lines.push(format!("  {} - {}", title.title, title.season));
        }
    }
    lines
}

fn jersey(number: Option<u32>) -> String {
    number.map(|n| format!("#{n}")).unwrap_or_else(|| "-".to_string())
}

pub fn roster_line(player: &RosterPlayer) -> String {
    format!(
        "{:>4} {:<4} {:<26} {}",
        jersey(player.jersey_number),
        player.position.as_deref().unwrap_or("-"),
        player.name,
        player.slug
    )
}

pub fn player_line(player: &Player) -> String {
    let team = player
        .team
        .as_ref()
        .map(|t| t.abbreviation.as_str())
        .unwrap_or("-");
    format!(
        "{:<26} {:<4} {:>4} {:<4} {}",
        player.name,
        team,
        jersey(player.jersey_number),
        player.position.as_deref().unwrap_or("-"),
        player.slug
    )
}

pub fn player_lines(details: &PlayerDetails) -> Vec<String> {
    let mut lines = vec![player_line(&details.player)];
    let mut bio = Vec::new();
    if let Some(age) = details.age {
        bio.push(format!("{age} years old"));
    }
    if let Some(height) = details.height_cm {
        bio.push(format!("{height} cm"));
    }
    if let Some(nationality) = &details.nationality {
        bio.push(nationality.clone());
    }
    if let Some(year) = details.draft_year {
        bio.push(format!("drafted {year}"));
    }
    if !bio.is_empty() {
        lines.push(bio.join(", "));
    }
    for award in &details.awards {
        lines.push(format!("  {} ({})", award.title, award.season));
    }
    if !details.season_stats.is_empty() {
        lines.push("Season    GP    PTS   REB   AST".to_string());
        for s in &details.season_stats {
            lines.push(format!(
                "{:<8} {:>3} {:>6.1} {:>5.1} {:>5.1}",
                s.season, s.games_played, s.points, s.rebounds, s.assists
            ));
        }
    }
    lines
}

pub fn game_log_line(entry: &GameLogEntry) -> String {
    format!(
        "{}  vs {:<4} {:>3} pts {:>3} reb {:>3} ast",
        entry.played_at.format("%Y-%m-%d"),
        entry.opponent.abbreviation,
        entry.points,
        entry.rebounds,
        entry.assists
    )
}
