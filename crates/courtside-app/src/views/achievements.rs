// Achievement board: the static catalog joined against what the server says
// a user has unlocked.

use std::sync::Arc;

use tracing::{info, warn};

use courtside_api::{ApiError, Backend, Session};
use courtside_core::achievements::{join_catalog, AchievementBoard};
use courtside_core::scope::ViewScope;
use courtside_core::theme::{user_theme, TeamTheme};

use crate::refetch::ReadModel;

pub struct AchievementsView {
    api: Arc<dyn Backend>,
    scope: ViewScope,
    user_id: i64,
    theme: TeamTheme,
    board: ReadModel<AchievementBoard>,
}

impl AchievementsView {
    /// Board for the logged-in user, themed with their favourite team.
    pub fn mine(api: Arc<dyn Backend>, session: &Session) -> Result<Self, ApiError> {
        let me = session.require_user("view achievements")?;
        Ok(Self {
            api,
            scope: ViewScope::new(format!("achievements:{}", me.id)),
            user_id: me.id,
            theme: user_theme(Some(&me)),
            board: ReadModel::new(),
        })
    }

    pub fn scope(&self) -> &ViewScope {
        &self.scope
    }

    pub fn user_id(&self) -> i64 {
        self.user_id
    }

    pub fn theme(&self) -> TeamTheme {
        self.theme
    }

    pub fn board(&self) -> Option<&AchievementBoard> {
        self.board.value()
    }

    pub fn model(&self) -> &ReadModel<AchievementBoard> {
        &self.board
    }

    pub async fn load(&mut self) -> Result<(), ApiError> {
        match self.scope.run(self.api.achievements(self.user_id)).await? {
            Ok(unlocked) => {
                let board = join_catalog(&unlocked);
                if !board.unknown_ids.is_empty() {
                    warn!(
                        user = self.user_id,
                        ids = ?board.unknown_ids,
                        "unlocked achievements missing from catalog"
                    );
                }
                info!(
                    user = self.user_id,
                    unlocked = board.unlocked_count(),
                    total = board.total(),
                    "achievements loaded"
                );
                self.scope.commit(|| self.board.set(board))?;
                Ok(())
            }
            Err(e) => {
                warn!(user = self.user_id, "failed to load achievements: {e}");
                let message = e.to_string();
                self.scope.commit(|| self.board.fail(message))?;
                Err(e)
            }
        }
    }

    pub fn close(&self) {
        self.scope.close();
    }
}

impl Drop for AchievementsView {
    fn drop(&mut self) {
        self.scope.close();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{from_json, session_for, unlocked, user, user_json, FakeBackend};
    use courtside_core::models::User;
    use courtside_core::theme::{team_theme, DEFAULT_THEME};
    use std::time::Duration;

    #[tokio::test]
    async fn board_marks_unlocked_entries() {
        let api = Arc::new(FakeBackend::logged_in_as(user(3)));
        api.unlocked.lock().unwrap().extend([
            unlocked(1, "2024-02-01T10:00:00"),
            unlocked(7, "2024-02-03T10:00:00"),
            unlocked(42, "2024-02-04T10:00:00"),
        ]);
        let session = session_for(&api).await;
        let mut view = AchievementsView::mine(api.clone(), &session).unwrap();

        view.load().await.unwrap();
        let board = view.board().unwrap();
        assert_eq!(board.unlocked_count(), 2);
        assert_eq!(board.unknown_ids, vec![42]);
        assert_eq!(view.theme(), DEFAULT_THEME);
        assert_eq!(api.calls(), vec!["me ", "achievements 3"]);
    }

    #[tokio::test]
    async fn theme_follows_favourite_team() {
        let me: User = from_json(user_json(3, Some("MIA")));
        let api = Arc::new(FakeBackend::logged_in_as(me));
        let session = session_for(&api).await;
        let view = AchievementsView::mine(api, &session).unwrap();
        assert_eq!(view.theme(), team_theme(Some("MIA")));
    }

    #[tokio::test]
    async fn anonymous_users_have_no_board() {
        let api = Arc::new(FakeBackend::new());
        let session = session_for(&api).await;
        let err = AchievementsView::mine(api.clone(), &session).err().unwrap();
        assert!(matches!(err, ApiError::AuthRequired { .. }));
        assert_eq!(api.count("achievements"), 0);
    }

    #[tokio::test]
    async fn failed_load_keeps_error() {
        let api = Arc::new(FakeBackend::logged_in_as(user(3)));
        api.fail("achievements");
        let session = session_for(&api).await;
        let mut view = AchievementsView::mine(api, &session).unwrap();

        assert!(view.load().await.is_err());
        assert!(view.board().is_none());
        assert!(view.model().last_error().is_some());
    }

    #[tokio::test(start_paused = true)]
    async fn closed_view_ignores_late_results() {
        let api = Arc::new(FakeBackend::logged_in_as(user(3)));
        api.unlocked.lock().unwrap().push(unlocked(1, "2024-02-01T10:00:00"));
        api.delay("achievements", Duration::from_secs(2));
        let session = session_for(&api).await;
        let mut view = AchievementsView::mine(api, &session).unwrap();
        let scope = view.scope().clone();

        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_secs(1)).await;
            scope.close();
        });
        let err = view.load().await.unwrap_err();
        assert!(matches!(err, ApiError::Cancelled));
        assert!(view.board().is_none());
    }
}
