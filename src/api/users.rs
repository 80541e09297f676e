use mongodb::options::{FindOneAndUpdateOptions, ReturnDocument};
use rocket::{futures::TryStreamExt, serde::json::Json, Route};

use crate::{
    error::{Error, Result},
    model::{
        api::{UserResponse, UserSpec, UserUpdate},
        common::UserId,
        db::{User, UserCore},
        mongodb::{id_filter, is_duplicate_key_error, Coll, Counter, USER_IDS},
    },
};

pub fn routes() -> Vec<Route> {
    routes![register_user, get_users, get_user, update_user, delete_user]
}

#[post("/users", data = "<spec>", format = "json")]
async fn register_user(
    spec: Json<UserSpec>,
    users: Coll<User>,
    counters: Coll<Counter>,
) -> Result<Json<UserResponse>> {
    let core = UserCore::try_from(spec.0)?;
    let id = Counter::next(&counters, USER_IDS).await?;
    let user = User { id, user: core };
    if let Err(err) = users.insert_one(&user, None).await {
        if is_duplicate_key_error(&err) {
            return Err(Error::InvalidInput(format!(
                "Email already registered: {}",
                user.email
            )));
        }
        return Err(err.into());
    }
    info!("Registered user {} ({})", user.id, user.email);
    Ok(Json(user.into()))
}

#[get("/users")]
async fn get_users(users: Coll<User>) -> Result<Json<Vec<UserResponse>>> {
    let all_users: Vec<User> = users.find(None, None).await?.try_collect().await?;
    Ok(Json(all_users.into_iter().map(UserResponse::from).collect()))
}

#[get("/users/<user_id>")]
async fn get_user(user_id: UserId, users: Coll<User>) -> Result<Json<UserResponse>> {
    let user = users
        .find_one(id_filter(user_id), None)
        .await?
        .ok_or(Error::UserNotFound(user_id))?;
    Ok(Json(user.into()))
}

#[patch("/users/<user_id>", data = "<update>", format = "json")]
async fn update_user(
    user_id: UserId,
    update: Json<UserUpdate>,
    users: Coll<User>,
) -> Result<Json<UserResponse>> {
    let update_doc = update.0.into_update_doc()?;
    let options: FindOneAndUpdateOptions = FindOneAndUpdateOptions::builder()
        .return_document(ReturnDocument::After)
        .build();
    let updated = match users
        .find_one_and_update(id_filter(user_id), update_doc, options)
        .await
    {
        Ok(user) => user,
        Err(err) if is_duplicate_key_error(&err) => {
            return Err(Error::InvalidInput(
                "Email already registered".to_string(),
            ));
        }
        Err(err) => return Err(err.into()),
    };
    let user = updated.ok_or(Error::UserNotFound(user_id))?;
    Ok(Json(user.into()))
}

#[delete("/users/<user_id>")]
async fn delete_user(user_id: UserId, users: Coll<User>) -> Result<()> {
    let result = users.delete_one(id_filter(user_id), None).await?;
    if result.deleted_count == 0 {
        return Err(Error::UserNotFound(user_id));
    }
    info!("Deleted user {user_id}");
    Ok(())
}
