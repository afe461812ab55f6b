/// Profile service - author pages and self-service account edits
use chrono::Utc;
use serde::Serialize;
use std::sync::Arc;
use validator::Validate;

use super::current_user;
use super::posts::PostService;
use crate::error::{AppError, Result};
use crate::forms::UserEditForm;
use crate::metrics;
use crate::models::{PostDetails, PublicProfile, UserChanges};
use crate::pagination::{Page, PageRequest};
use crate::repository::{BlogRepository, PostFilter};

#[derive(Debug, Serialize)]
pub struct ProfilePage {
    pub profile: PublicProfile,
    pub posts: Page<PostDetails>,
}

pub struct ProfileService {
    repo: Arc<dyn BlogRepository>,
    per_page: u32,
}

impl ProfileService {
    pub fn new(repo: Arc<dyn BlogRepository>, per_page: u32) -> Self {
        Self { repo, per_page }
    }

    /// The owner sees every post they wrote; everyone else only public ones.
    pub async fn profile(
        &self,
        username: &str,
        viewer_id: Option<i64>,
        page: Option<u32>,
    ) -> Result<ProfilePage> {
        let user = self
            .repo
            .find_user_by_username(username)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("user '{}' not found", username)))?;

        let is_owner = viewer_id == Some(user.id);
        let filter = PostFilter {
            author_id: Some(user.id),
            public_at: (!is_owner).then(Utc::now),
            ..Default::default()
        };

        let request = PageRequest::new(page, self.per_page)?;
        let posts = PostService::page_of(self.repo.as_ref(), &filter, request).await?;

        Ok(ProfilePage {
            profile: PublicProfile::from_user(&user, is_owner),
            posts,
        })
    }

    pub async fn edit(&self, user_id: i64, form: UserEditForm) -> Result<PublicProfile> {
        let user = current_user(self.repo.as_ref(), user_id).await?;
        form.validate()?;

        let updated = self
            .repo
            .update_user(
                user.id,
                UserChanges {
                    username: form.username,
                    email: form.email.unwrap_or_default(),
                    first_name: form.first_name,
                    last_name: form.last_name,
                },
            )
            .await?;

        metrics::record_write("profile", "update");
        tracing::info!(user_id = updated.id, "profile updated");

        Ok(PublicProfile::from_user(&updated, true))
    }
}
