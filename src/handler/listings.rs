use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, Query},
    http::StatusCode,
    middleware,
    response::{IntoResponse, Response},
    routing::get,
    Extension, Json, Router,
};

use crate::{
    db::search::SearchFilters,
    dtos::listingdtos::{
        DataResponse, ListingDto, ListingInputDto, PublishDto, SearchQueryDto, SlugQueryDto,
    },
    error::HttpError,
    middleware::{auth, JWTAuthMiddeware},
    AppState,
};

pub fn listings_handler() -> Router {
    Router::new()
        .route(
            "/manage",
            get(get_manage)
                .post(create_listing)
                .put(replace_listing)
                .patch(publish_listing)
                .delete(delete_listing)
                .layer(middleware::from_fn(auth)),
        )
        .route("/detail", get(get_detail))
        .route("/lists", get(get_lists))
        .route("/search", get(search_listings))
}

fn json_body<T>(payload: Result<Json<T>, JsonRejection>) -> Result<T, HttpError> {
    payload
        .map(|Json(body)| body)
        .map_err(|e| HttpError::bad_request(e.body_text()))
}

pub async fn get_manage(
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(user): Extension<JWTAuthMiddeware>,
    Query(query): Query<SlugQueryDto>,
) -> Result<Response, HttpError> {
    let caller = user.caller();

    let response = match query.slug() {
        Some(slug) => {
            let listing = app_state.listing_service.get_own(&caller, slug).await?;
            Json(DataResponse {
                data: ListingDto::from_listing(&listing),
            })
            .into_response()
        }
        None => {
            let listings = app_state.listing_service.list_own(&caller).await?;
            Json(DataResponse {
                data: ListingDto::from_listings(&listings),
            })
            .into_response()
        }
    };

    Ok(response)
}

pub async fn create_listing(
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(user): Extension<JWTAuthMiddeware>,
    payload: Result<Json<ListingInputDto>, JsonRejection>,
) -> Result<impl IntoResponse, HttpError> {
    let body = json_body(payload)?;

    let listing = app_state
        .listing_service
        .create(&user.caller(), body)
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(DataResponse {
            data: ListingDto::from_listing(&listing),
        }),
    ))
}

pub async fn replace_listing(
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(user): Extension<JWTAuthMiddeware>,
    payload: Result<Json<ListingInputDto>, JsonRejection>,
) -> Result<impl IntoResponse, HttpError> {
    let body = json_body(payload)?;

    app_state
        .listing_service
        .replace(&user.caller(), body)
        .await?;

    Ok(StatusCode::NO_CONTENT)
}

pub async fn publish_listing(
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(user): Extension<JWTAuthMiddeware>,
    Query(query): Query<SlugQueryDto>,
    payload: Result<Json<PublishDto>, JsonRejection>,
) -> Result<impl IntoResponse, HttpError> {
    let body = json_body(payload)?;

    app_state
        .listing_service
        .set_published(&user.caller(), query.slug(), body.is_published)
        .await?;

    Ok(StatusCode::NO_CONTENT)
}

pub async fn delete_listing(
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(user): Extension<JWTAuthMiddeware>,
    Query(query): Query<SlugQueryDto>,
) -> Result<impl IntoResponse, HttpError> {
    app_state
        .listing_service
        .delete(&user.caller(), query.slug())
        .await?;

    Ok(StatusCode::NO_CONTENT)
}

pub async fn get_detail(
    Extension(app_state): Extension<Arc<AppState>>,
    Query(query): Query<SlugQueryDto>,
) -> Result<impl IntoResponse, HttpError> {
    let listing = app_state.listing_service.get_published(query.slug()).await?;

    Ok(Json(DataResponse {
        data: ListingDto::from_listing(&listing),
    }))
}

pub async fn get_lists(
    Extension(app_state): Extension<Arc<AppState>>,
) -> Result<impl IntoResponse, HttpError> {
    let listings = app_state.listing_service.list_published().await?;

    Ok(Json(DataResponse {
        data: ListingDto::from_listings(&listings),
    }))
}

pub async fn search_listings(
    Extension(app_state): Extension<Arc<AppState>>,
    Query(query): Query<SearchQueryDto>,
) -> Result<impl IntoResponse, HttpError> {
    let filters = SearchFilters::try_from(query)?;
    let listings = app_state.listing_service.search(&filters).await?;

    Ok(Json(DataResponse {
        data: ListingDto::from_listings(&listings),
    }))
}
