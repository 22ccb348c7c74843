use std::sync::Arc;

use tracing::{info, instrument};
use uuid::Uuid;

use crate::dto::{CreateCommunityDto, UpdateCommunityDto};
use crate::error::{AppError, AppResult};
use crate::models::{Community, NewCommunity};
use crate::repository::CommunityRepository;
use crate::service::Claims;

pub struct CommunityUseCase {
    communities: Arc<dyn CommunityRepository>,
}

impl CommunityUseCase {
    pub fn new(communities: Arc<dyn CommunityRepository>) -> Self {
        Self { communities }
    }

    #[instrument(skip(self, dto), fields(creator = %creator.sub))]
    pub async fn create(&self, creator: &Claims, dto: CreateCommunityDto) -> AppResult<Community> {
        let community = Community::new(NewCommunity {
            name: dto.name.trim().to_string(),
            description: dto.description.trim().to_string(),
            created_by: creator.sub.clone(),
            image_url: dto.image_url,
            categories: dto.categories,
        });
        let community = self.communities.insert(&community).await?;

        info!(community_id = %community.id, "Community created");
        Ok(community)
    }

    pub async fn list(&self) -> AppResult<Vec<Community>> {
        Ok(self.communities.list().await?)
    }

    pub async fn get(&self, id: Uuid) -> AppResult<Community> {
        self.communities
            .find(id)
            .await?
            .ok_or_else(|| AppError::NotFound("Community not found".to_string()))
    }

    pub async fn update(
        &self,
        actor: &Claims,
        id: Uuid,
        changes: UpdateCommunityDto,
    ) -> AppResult<Community> {
        self.ensure_can_manage(actor, id).await?;
        self.communities
            .update(id, &changes)
            .await?
            .ok_or_else(|| AppError::NotFound("Community not found".to_string()))
    }

    #[instrument(skip(self, actor))]
    pub async fn delete(&self, actor: &Claims, id: Uuid) -> AppResult<()> {
        self.ensure_can_manage(actor, id).await?;
        if !self.communities.delete(id).await? {
            return Err(AppError::NotFound("Community not found".to_string()));
        }
        info!("Community deleted");
        Ok(())
    }

    async fn ensure_can_manage(&self, actor: &Claims, id: Uuid) -> AppResult<()> {
        let community = self.get(id).await?;
        if actor.is_admin || community.created_by == actor.sub {
            Ok(())
        } else {
            Err(AppError::Forbidden(
                "Only the creator or an admin can change this community".to_string(),
            ))
        }
    }
}
