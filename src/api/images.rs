use mongodb::{
    bson::doc,
    options::{FindOneAndUpdateOptions, ReturnDocument},
};
use rocket::{futures::TryStreamExt, serde::json::Json, Route};

use crate::{
    error::{Error, Result},
    model::{
        api::{ImageResponse, ImageSpec, ImageUpdate},
        common::{ImageId, ImageKind},
        db::{Image, ImageCore},
        mongodb::{id_filter, Coll, Counter, IMAGE_IDS},
    },
};

pub fn routes() -> Vec<Route> {
    routes![
        create_image,
        get_images,
        get_main_image,
        get_image,
        update_image,
        delete_image,
    ]
}

#[post("/images", data = "<spec>", format = "json")]
async fn create_image(
    spec: Json<ImageSpec>,
    images: Coll<Image>,
    counters: Coll<Counter>,
) -> Result<Json<ImageResponse>> {
    // Nothing is persisted unless the spec validates.
    let core = ImageCore::try_from(spec.0)?;
    let id = Counter::next(&counters, IMAGE_IDS).await?;
    let image = Image { id, image: core };
    images.insert_one(&image, None).await?;
    info!("Created {} image {}", image.kind, image.id);
    Ok(Json(image.into()))
}

#[get("/images")]
async fn get_images(images: Coll<Image>) -> Result<Json<Vec<ImageResponse>>> {
    let all_images: Vec<Image> = images.find(None, None).await?.try_collect().await?;
    Ok(Json(
        all_images.into_iter().map(ImageResponse::from).collect(),
    ))
}

/// The conventional landing-page image. Nothing prevents several images
/// from being marked `main`; this returns the first by storage order.
#[get("/images/main")]
async fn get_main_image(images: Coll<Image>) -> Result<Json<ImageResponse>> {
    let image = images
        .find_one(doc! { "type": ImageKind::Main }, None)
        .await?
        .ok_or(Error::MainImageNotFound)?;
    Ok(Json(image.into()))
}

#[get("/images/<image_id>")]
async fn get_image(image_id: ImageId, images: Coll<Image>) -> Result<Json<ImageResponse>> {
    let image = images
        .find_one(id_filter(image_id), None)
        .await?
        .ok_or(Error::ImageNotFound(image_id))?;
    Ok(Json(image.into()))
}

#[patch("/images/<image_id>", data = "<update>", format = "json")]
async fn update_image(
    image_id: ImageId,
    update: Json<ImageUpdate>,
    images: Coll<Image>,
) -> Result<Json<ImageResponse>> {
    let update_doc = update.0.into_update_doc()?;
    let options: FindOneAndUpdateOptions = FindOneAndUpdateOptions::builder()
        .return_document(ReturnDocument::After)
        .build();
    let image = images
        .find_one_and_update(id_filter(image_id), update_doc, options)
        .await?
        .ok_or(Error::ImageNotFound(image_id))?;
    Ok(Json(image.into()))
}

#[delete("/images/<image_id>")]
async fn delete_image(image_id: ImageId, images: Coll<Image>) -> Result<()> {
    let result = images.delete_one(id_filter(image_id), None).await?;
    if result.deleted_count == 0 {
        return Err(Error::ImageNotFound(image_id));
    }
    info!("Deleted image {image_id}");
    Ok(())
}

#[cfg(test)]
mod tests {
    use rocket::http::{ContentType, Status};
    use rocket::serde::json::json;

    use super::*;

    #[rocket::async_test]
    #[ignore = "requires a MongoDB replica set"]
    async fn invalid_type_persists_nothing() {
        let (client, db) = crate::client_and_db().await;

        let response = client
            .post("/images")
            .header(ContentType::JSON)
            .body(json!({"url": "https://example.com/a.png", "type": "banner"}).to_string())
            .dispatch()
            .await;
        assert_eq!(response.status(), Status::BadRequest);

        let response = client.get("/images").dispatch().await;
        let all: Vec<ImageResponse> = response.into_json().await.unwrap();
        assert!(all.is_empty());

        db.drop(None).await.unwrap();
    }

    #[rocket::async_test]
    #[ignore = "requires a MongoDB replica set"]
    async fn main_image_lookup() {
        let (client, db) = crate::client_and_db().await;

        // No main image yet.
        let response = client.get("/images/main").dispatch().await;
        assert_eq!(response.status(), Status::NotFound);

        for (url, kind) in [("https://example.com/sub.png", "sub"),
                            ("https://example.com/main.png", "main")] {
            let response = client
                .post("/images")
                .header(ContentType::JSON)
                .body(json!({"url": url, "type": kind}).to_string())
                .dispatch()
                .await;
            assert_eq!(response.status(), Status::Ok);
        }

        let response = client.get("/images/main").dispatch().await;
        assert_eq!(response.status(), Status::Ok);
        let image: ImageResponse = response.into_json().await.unwrap();
        assert_eq!(image.kind, ImageKind::Main);
        assert_eq!(image.url, "https://example.com/main.png");

        db.drop(None).await.unwrap();
    }
}
