// Client-side state for every page: optimistic mutations, refetch after
// writes, and one view model per page.

pub mod optimistic;
pub mod refetch;
pub mod views;

#[cfg(test)]
mod testing;

pub use optimistic::{LikeState, Optimistic, Resolution, Ticket};
pub use refetch::{write_then_refetch, Freshness, ReadModel, WriteOutcome};
pub use views::achievements::AchievementsView;
pub use views::game_detail::{GameDetailView, ReviewForm};
pub use views::games::GamesView;
pub use views::landing::{FeedTab, LandingState, LandingView};
pub use views::players::{PlayerView, PlayersView};
pub use views::profile::{FollowList, ProfileEdit, ProfilePage, ProfileView};
pub use views::reviews::{CommentThread, FeedItem, LikeCell, ReviewItem};
pub use views::search::SearchView;
pub use views::teams::{TeamView, TeamsView};
