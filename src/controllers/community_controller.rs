use std::sync::Arc;

use actix_web::{web, HttpResponse};
use uuid::Uuid;

use crate::dto::{CreateCommunityDto, MessageResponse, UpdateCommunityDto};
use crate::error::AppResult;
use crate::middleware::{AuthUser, ValidatedJson};
use crate::use_cases::CommunityUseCase;

pub struct CommunityController {
    communities: Arc<CommunityUseCase>,
}

impl CommunityController {
    pub fn new(communities: Arc<CommunityUseCase>) -> Self {
        Self { communities }
    }
}

pub async fn create(
    controller: web::Data<CommunityController>,
    caller: AuthUser,
    body: ValidatedJson<CreateCommunityDto>,
) -> AppResult<HttpResponse> {
    let community = controller
        .communities
        .create(caller.claims(), body.into_inner())
        .await?;
    Ok(HttpResponse::Created().json(community))
}

pub async fn list(controller: web::Data<CommunityController>) -> AppResult<HttpResponse> {
    Ok(HttpResponse::Ok().json(controller.communities.list().await?))
}

pub async fn get(
    controller: web::Data<CommunityController>,
    path: web::Path<Uuid>,
) -> AppResult<HttpResponse> {
    Ok(HttpResponse::Ok().json(controller.communities.get(path.into_inner()).await?))
}

pub async fn update(
    controller: web::Data<CommunityController>,
    caller: AuthUser,
    path: web::Path<Uuid>,
    body: ValidatedJson<UpdateCommunityDto>,
) -> AppResult<HttpResponse> {
    let community = controller
        .communities
        .update(caller.claims(), path.into_inner(), body.into_inner())
        .await?;
    Ok(HttpResponse::Ok().json(community))
}

pub async fn delete(
    controller: web::Data<CommunityController>,
    caller: AuthUser,
    path: web::Path<Uuid>,
) -> AppResult<HttpResponse> {
    controller
        .communities
        .delete(caller.claims(), path.into_inner())
        .await?;
    Ok(HttpResponse::Ok().json(MessageResponse::ok("Community deleted")))
}
