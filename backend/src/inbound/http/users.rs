//! Users API handlers.
//!
//! ```text
//! GET    /api/users
//! GET    /api/users/{id}
//! POST   /api/users        {"name":"Ada","email":"ada@example.com","role":"admin"}
//! PUT    /api/users/{id}   {"name":"Ada","email":"ada@example.com","role":"admin"}
//! DELETE /api/users/{id}
//! ```

use actix_web::{HttpResponse, delete, get, post, put, web};
use serde::{Deserialize, Serialize};
use serde_json::json;
use utoipa::ToSchema;

use crate::domain::ports::UserSubmission;
use crate::domain::{Error, User, UserId};
use crate::inbound::http::ApiResult;
use crate::inbound::http::cache_control::no_store_header;
use crate::inbound::http::schemas::{ErrorSchema, UserSchema};
use crate::inbound::http::state::HttpState;

const USER_DELETED: &str = "User deleted successfully";

/// Path parameters for `/api/users/{id}`.
#[derive(Debug, Deserialize)]
pub struct UserPath {
    id: String,
}

/// Request body for create and update.
///
/// Fields are optional at the wire level so that an absent field is reported
/// as missing rather than as a malformed body.
#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
pub struct UserRequest {
    #[schema(example = "Ada Lovelace")]
    pub name: Option<String>,
    #[schema(example = "ada@example.com")]
    pub email: Option<String>,
    #[schema(example = "admin")]
    pub role: Option<String>,
}

impl From<UserRequest> for UserSubmission {
    fn from(value: UserRequest) -> Self {
        Self {
            name: value.name.unwrap_or_default(),
            email: value.email.unwrap_or_default(),
            role: value.role.unwrap_or_default(),
        }
    }
}

/// Confirmation body returned by `DELETE /api/users/{id}`.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct DeleteUserResponse {
    #[schema(example = "User deleted successfully")]
    pub message: String,
}

fn parse_user_id(path: UserPath) -> Result<UserId, Error> {
    path.id.parse().map_err(|_| {
        Error::invalid_request("Invalid user ID")
            .with_details(json!({ "field": "id", "code": "invalid_identifier" }))
    })
}

/// List every user in stored order.
///
/// # Examples
/// ```
/// use actix_web::{App, web};
/// use user_registry::inbound::http::users::list_users;
///
/// let app = App::new().service(web::scope("/api").service(list_users));
/// ```
#[utoipa::path(
    get,
    path = "/api/users",
    responses(
        (status = 200, description = "Users", body = [UserSchema],
            headers(("Cache-Control" = String, description = "Always `no-store`"))),
        (status = 500, description = "Store unreadable", body = ErrorSchema)
    ),
    tags = ["users"],
    operation_id = "listUsers"
)]
#[get("/users")]
pub async fn list_users(state: web::Data<HttpState>) -> ApiResult<HttpResponse> {
    let users = state.users.list_users().await?;
    Ok(HttpResponse::Ok().insert_header(no_store_header()).json(users))
}

/// Fetch one user by id.
#[utoipa::path(
    get,
    path = "/api/users/{id}",
    params(("id" = u64, Path, description = "User identifier")),
    responses(
        (status = 200, description = "User", body = UserSchema),
        (status = 400, description = "Invalid user ID", body = ErrorSchema),
        (status = 404, description = "User not found", body = ErrorSchema),
        (status = 500, description = "Store unreadable", body = ErrorSchema)
    ),
    tags = ["users"],
    operation_id = "getUser"
)]
#[get("/users/{id}")]
pub async fn get_user(
    state: web::Data<HttpState>,
    path: web::Path<UserPath>,
) -> ApiResult<web::Json<User>> {
    let id = parse_user_id(path.into_inner())?;
    let user = state.users.find_user(id).await?;
    Ok(web::Json(user))
}

/// Create a user and assign it the next identifier.
#[utoipa::path(
    post,
    path = "/api/users",
    request_body = UserRequest,
    responses(
        (status = 201, description = "Created user", body = UserSchema),
        (status = 400, description = "Missing field, bad email or duplicate email", body = ErrorSchema),
        (status = 500, description = "Store failure", body = ErrorSchema)
    ),
    tags = ["users"],
    operation_id = "createUser"
)]
#[post("/users")]
pub async fn create_user(
    state: web::Data<HttpState>,
    payload: web::Json<UserRequest>,
) -> ApiResult<HttpResponse> {
    let user = state
        .users_command
        .create_user(payload.into_inner().into())
        .await?;
    Ok(HttpResponse::Created().json(user))
}

/// Replace every field of a user except its identifier.
#[utoipa::path(
    put,
    path = "/api/users/{id}",
    params(("id" = u64, Path, description = "User identifier")),
    request_body = UserRequest,
    responses(
        (status = 200, description = "Updated user", body = UserSchema),
        (status = 400, description = "Invalid id, missing field, bad email or duplicate email", body = ErrorSchema),
        (status = 404, description = "User not found", body = ErrorSchema),
        (status = 500, description = "Store failure", body = ErrorSchema)
    ),
    tags = ["users"],
    operation_id = "updateUser"
)]
#[put("/users/{id}")]
pub async fn update_user(
    state: web::Data<HttpState>,
    path: web::Path<UserPath>,
    payload: web::Json<UserRequest>,
) -> ApiResult<web::Json<User>> {
    let id = parse_user_id(path.into_inner())?;
    let user = state
        .users_command
        .update_user(id, payload.into_inner().into())
        .await?;
    Ok(web::Json(user))
}

/// Remove a user.
#[utoipa::path(
    delete,
    path = "/api/users/{id}",
    params(("id" = u64, Path, description = "User identifier")),
    responses(
        (status = 200, description = "User removed", body = DeleteUserResponse),
        (status = 400, description = "Invalid user ID", body = ErrorSchema),
        (status = 404, description = "User not found", body = ErrorSchema),
        (status = 500, description = "Store failure", body = ErrorSchema)
    ),
    tags = ["users"],
    operation_id = "deleteUser"
)]
#[delete("/users/{id}")]
pub async fn delete_user(
    state: web::Data<HttpState>,
    path: web::Path<UserPath>,
) -> ApiResult<web::Json<DeleteUserResponse>> {
    let id = parse_user_id(path.into_inner())?;
    state.users_command.delete_user(id).await?;
    Ok(web::Json(DeleteUserResponse {
        message: USER_DELETED.to_owned(),
    }))
}
