use std::sync::Arc;

use axum::{
    extract::rejection::JsonRejection,
    http::{header, HeaderMap, StatusCode},
    middleware,
    response::IntoResponse,
    routing::{get, post},
    Extension, Json, Router,
};
use axum_extra::extract::cookie::Cookie;
use validator::{Validate, ValidationErrors};

use crate::{
    db::db::StoreError,
    dtos::{
        listingdtos::DataResponse,
        userdtos::{FilterUserDto, LoginUserDto, RegisterUserDto, Response, UserLoginResponseDto},
    },
    error::{ErrorMessage, HttpError},
    middleware::{auth, JWTAuthMiddeware},
    service::error::field_errors,
    utils::{password, token},
    AppState,
};

const USER_EXISTS: &str = "User already exists";

pub fn auth_handler() -> Router {
    Router::new()
        .route("/register", post(register))
        .route("/login", post(login))
        .route("/me", get(get_me).layer(middleware::from_fn(auth)))
}

fn first_message(errors: &ValidationErrors) -> String {
    field_errors(errors)
        .into_values()
        .flatten()
        .next()
        .unwrap_or_else(|| "Invalid request body".to_string())
}

fn registration_failed(error: impl std::fmt::Display) -> HttpError {
    tracing::error!(error = %error, "registration failed");
    HttpError::server_error("Something went wrong when registering user")
}

pub async fn register(
    Extension(app_state): Extension<Arc<AppState>>,
    payload: Result<Json<RegisterUserDto>, JsonRejection>,
) -> Result<impl IntoResponse, HttpError> {
    let Json(mut body) = payload.map_err(|e| HttpError::bad_request(e.body_text()))?;
    body.email = body.email.trim().to_lowercase();

    body.validate()
        .map_err(|e| HttpError::bad_request(first_message(&e)))?;

    let existing_user = app_state
        .db_client
        .get_user(None, Some(&body.email))
        .await
        .map_err(registration_failed)?;

    if existing_user.is_some() {
        return Err(HttpError::bad_request(USER_EXISTS));
    }

    let hashed_password = password::hash(&body.password).map_err(|e| {
        HttpError::bad_request(e.to_string())
    })?;

    let user = app_state
        .db_client
        .save_user(&body.name, &body.email, &hashed_password, body.is_realtor)
        .await
        .map_err(|e| match e {
            StoreError::DuplicateEmail => HttpError::bad_request(USER_EXISTS),
            other => registration_failed(other),
        })?;

    tracing::info!(user = %user.id, is_realtor = user.is_realtor, "user registered");

    let message = if user.is_realtor {
        "Realtor has been created"
    } else {
        "User has been created"
    };

    Ok((
        StatusCode::CREATED,
        Json(Response {
            message: message.to_string(),
        }),
    ))
}

pub async fn login(
    Extension(app_state): Extension<Arc<AppState>>,
    payload: Result<Json<LoginUserDto>, JsonRejection>,
) -> Result<impl IntoResponse, HttpError> {
    let Json(mut body) = payload.map_err(|e| HttpError::bad_request(e.body_text()))?;
    body.email = body.email.trim().to_lowercase();

    body.validate()
        .map_err(|e| HttpError::bad_request(first_message(&e)))?;

    let result = app_state
        .db_client
        .get_user(None, Some(&body.email))
        .await
        .map_err(|e| {
            tracing::error!(error = %e, "login lookup failed");
            HttpError::server_error("Something went wrong when logging in")
        })?;

    let user = result.ok_or(HttpError::bad_request(ErrorMessage::WrongCredentials.to_string()))?;

    let password_matched = password::compare(&body.password, &user.password)
        .map_err(|_| HttpError::bad_request(ErrorMessage::WrongCredentials.to_string()))?;

    if !password_matched {
        return Err(HttpError::bad_request(ErrorMessage::WrongCredentials.to_string()));
    }

    let token = token::create_token(
        &user.id.to_string(),
        app_state.env.jwt_secret.as_bytes(),
        app_state.env.jwt_maxage,
    )
    .map_err(|e| HttpError::server_error(e.to_string()))?;

    let cookie_duration = time::Duration::minutes(app_state.env.jwt_maxage);
    let cookie = Cookie::build(("token", token.clone()))
        .path("/")
        .max_age(cookie_duration)
        .http_only(true)
        .build();

    let mut headers = HeaderMap::new();
    headers.append(
        header::SET_COOKIE,
        cookie
            .to_string()
            .parse()
            .map_err(|_| HttpError::server_error("Failed to build session cookie"))?,
    );

    let mut response = Json(UserLoginResponseDto { token }).into_response();
    response.headers_mut().extend(headers);

    Ok(response)
}

pub async fn get_me(
    Extension(user): Extension<JWTAuthMiddeware>,
) -> Result<impl IntoResponse, HttpError> {
    Ok(Json(DataResponse {
        data: FilterUserDto::filter_user(&user.user),
    }))
}
