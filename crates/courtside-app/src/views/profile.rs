// Profile page: profile + stats, follow state, follower lists, and editing
// your own profile.

use std::sync::Arc;

use tracing::{info, warn};

use courtside_api::{ApiError, Backend, Session, Upload};
use courtside_core::models::{ProfileUpdate, SocialUser, User, UserProfile, UserStats};
use courtside_core::scope::ViewScope;
use courtside_core::theme::{team_theme, TeamTheme};

use crate::refetch::{write_then_refetch, ReadModel, WriteOutcome};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FollowList {
    Followers,
    Following,
}

/// Pending edits to the logged-in user's profile.
#[derive(Debug, Clone, Default)]
pub struct ProfileEdit {
    pub update: ProfileUpdate,
    /// New picture, uploaded before the update is sent.
    pub picture: Option<Upload>,
}

#[derive(Debug, Clone)]
pub struct ProfilePage {
    pub profile: UserProfile,
    pub stats: UserStats,
}

pub struct ProfileView {
    api: Arc<dyn Backend>,
    session: Arc<Session>,
    scope: ViewScope,
    username: String,
    page: ReadModel<ProfilePage>,
    following: bool,
}

impl ProfileView {
    pub fn new(api: Arc<dyn Backend>, session: Arc<Session>, username: impl Into<String>) -> Self {
        let username = username.into();
        Self {
            scope: ViewScope::new(format!("profile:{username}")),
            api,
            session,
            username,
            page: ReadModel::new(),
            following: false,
        }
    }

    pub fn scope(&self) -> &ViewScope {
        &self.scope
    }

    pub fn page(&self) -> Option<&ProfilePage> {
        self.page.value()
    }

    pub fn model(&self) -> &ReadModel<ProfilePage> {
        &self.page
    }

    /// Whether the logged-in user follows this profile.
    pub fn is_following(&self) -> bool {
        self.following
    }

    pub fn is_own_profile(&self) -> bool {
        self.session
            .current_user()
            .is_some_and(|me| me.username == self.username)
    }

    /// Colours of the profile owner's favourite team.
    pub fn theme(&self) -> TeamTheme {
        let abbreviation = self
            .page()
            .and_then(|p| p.profile.user.favorite_team.as_ref())
            .map(|t| t.abbreviation.as_str());
        team_theme(abbreviation)
    }

    pub async fn load(&mut self) -> Result<(), ApiError> {
        let api = self.api.clone();
        let result = self.scope.run(fetch_page(api.as_ref(), &self.username)).await?;
        match result {
            Ok(page) => {
                self.scope.commit(|| self.page.set(page))?;
            }
            Err(e) => {
                warn!(user = %self.username, "failed to load profile: {e}");
                let message = e.to_string();
                self.scope.commit(|| self.page.fail(message))?;
                return Err(e);
            }
        }
        self.refresh_follow_state().await
    }

    /// Follow or unfollow, then reload the profile so counts are current.
    pub async fn toggle_follow(&mut self) -> Result<WriteOutcome<bool>, ApiError> {
        let me = self.session.require_user("follow users")?;
        let target = self
            .page()
            .map(|p| p.profile.user.id)
            .ok_or_else(|| ApiError::invalid("profile", "profile is not loaded"))?;
        if target == me.id {
            return Err(ApiError::invalid("profile", "you cannot follow yourself"));
        }

        let api = self.api.clone();
        let now_following = !self.following;
        let write = async {
            if now_following {
                api.follow(target).await?;
            } else {
                api.unfollow(target).await?;
            }
            Ok::<_, ApiError>(now_following)
        };
        let username = self.username.clone();
        let outcome = write_then_refetch(&self.scope, &mut self.page, write, || {
            fetch_page(api.as_ref(), &username)
        })
        .await?;

        self.scope.commit(|| self.following = now_following)?;
        info!(user = %self.username, following = now_following, "follow toggled");
        Ok(outcome)
    }

    /// Upload the picture if one was chosen, save the profile, and swap the
    /// session's copy of the user.
    pub async fn edit_profile(
        &mut self,
        edit: ProfileEdit,
    ) -> Result<WriteOutcome<User>, ApiError> {
        self.session.require_user("edit your profile")?;
        if !self.is_own_profile() {
            return Err(ApiError::invalid("profile", "only your own profile can be edited"));
        }

        let api = self.api.clone();
        let writer = api.clone();
        let session = self.session.clone();
        let write = async move {
            let mut update = edit.update;
            if let Some(picture) = edit.picture {
                let uploaded = writer.upload_profile_picture(picture).await?;
                update.avatar_url = Some(uploaded.file_url);
            }
            let user = writer.update_me(&update).await?;
            session.replace_user(user.clone());
            Ok::<_, ApiError>(user)
        };
        let username = self.username.clone();
        write_then_refetch(&self.scope, &mut self.page, write, || {
            fetch_page(api.as_ref(), &username)
        })
        .await
    }

    pub async fn follow_list(&self, which: FollowList) -> Result<Vec<SocialUser>, ApiError> {
        let fut = match which {
            FollowList::Followers => self.api.followers(&self.username),
            FollowList::Following => self.api.following(&self.username),
        };
        self.scope.run(fut).await?
    }

    pub fn close(&self) {
        self.scope.close();
    }

    /// Only another user's profile has a follow button; work out its state
    /// from their follower list.
    async fn refresh_follow_state(&mut self) -> Result<(), ApiError> {
        let Some(me) = self.session.current_user() else {
            return Ok(());
        };
        if me.username == self.username {
            return Ok(());
        }
        let followers = self
            .scope
            .run(self.api.followers(&self.username))
            .await??;
        let following = followers.iter().any(|f| f.user.id == me.id);
        self.scope.commit(|| self.following = following)?;
        Ok(())
    }
}

impl Drop for ProfileView {
    fn drop(&mut self) {
        self.scope.close();
    }
}

async fn fetch_page(api: &dyn Backend, username: &str) -> Result<ProfilePage, ApiError> {
    let (profile, stats) = tokio::try_join!(api.profile(username), api.user_stats(username))?;
    Ok(ProfilePage { profile, stats })
}
