use mongodb::{bson::doc, Client};
use rocket::{futures::TryStreamExt, serde::json::Json, Route, State};

use crate::{
    error::{Error, Result},
    model::{
        api::{AnswerSpec, AnswerView, CreatedCount},
        common::UserId,
        db::{Answer, AnswerCore, Choice, Question, User},
        mongodb::{id_filter, Coll, Counter, ANSWER_IDS},
    },
};

pub fn routes() -> Vec<Route> {
    routes![submit_answers, get_answers_by_user]
}

/// Reject malformed batches before any storage access: the batch must be
/// non-empty and every pair must carry both ids.
fn check_batch(specs: &[AnswerSpec]) -> Result<()> {
    if specs.is_empty() {
        return Err(Error::InvalidInput(
            "Expected a non-empty list of answers".to_string(),
        ));
    }
    for spec in specs {
        if spec.user_id == 0 || spec.choice_id == 0 {
            return Err(Error::InvalidInput(
                "Both 'user_id' and 'choice_id' are required".to_string(),
            ));
        }
    }
    Ok(())
}

/// Submit a batch of answers. The batch is all-or-nothing: any validation
/// failure aborts it before anything is written, and the inserts
/// themselves happen in a single transaction.
#[post("/answers", data = "<specs>", format = "json")]
async fn submit_answers(
    specs: Json<Vec<AnswerSpec>>,
    users: Coll<User>,
    choices: Coll<Choice>,
    answers: Coll<Answer>,
    counters: Coll<Counter>,
    db_client: &State<Client>,
) -> Result<Json<CreatedCount>> {
    let specs = specs.0;
    check_batch(&specs)?;

    // Validate every cross-entity reference, in input order.
    for spec in &specs {
        users
            .find_one(id_filter(spec.user_id), None)
            .await?
            .ok_or(Error::UserNotFound(spec.user_id))?;
        choices
            .find_one(id_filter(spec.choice_id), None)
            .await?
            .ok_or(Error::ChoiceNotFound(spec.choice_id))?;
    }

    let first_id = Counter::reserve(&counters, ANSWER_IDS, specs.len() as u32).await?;
    let new_answers = specs
        .iter()
        .enumerate()
        .map(|(index, spec)| Answer {
            id: first_id + index as u32,
            answer: AnswerCore::new(spec.user_id, spec.choice_id),
        })
        .collect::<Vec<_>>();

    let mut session = db_client.start_session(None).await?;
    session.start_transaction(None).await?;
    answers
        .insert_many_with_session(new_answers.iter(), None, &mut session)
        .await?;
    session.commit_transaction().await?;

    info!("Recorded {} answers", new_answers.len());
    Ok(Json(CreatedCount {
        created_count: new_answers.len(),
    }))
}

/// Everything the given user has submitted, joined to choice and question
/// context. Joins are best-effort: rows deleted since the answer was
/// recorded render as nulls rather than failing the request.
#[get("/answers/<user_id>")]
async fn get_answers_by_user(
    user_id: UserId,
    users: Coll<User>,
    answers: Coll<Answer>,
    choices: Coll<Choice>,
    questions: Coll<Question>,
) -> Result<Json<Vec<AnswerView>>> {
    users
        .find_one(id_filter(user_id), None)
        .await?
        .ok_or(Error::UserNotFound(user_id))?;

    let user_answers: Vec<Answer> = answers
        .find(doc! { "user_id": user_id as i64 }, None)
        .await?
        .try_collect()
        .await?;

    let mut views = Vec::with_capacity(user_answers.len());
    for answer in user_answers {
        let choice = choices.find_one(id_filter(answer.choice_id), None).await?;
        let question = match &choice {
            Some(choice) => {
                questions
                    .find_one(id_filter(choice.question_id), None)
                    .await?
            }
            None => None,
        };
        views.push(AnswerView {
            answer_id: answer.id,
            user_id: answer.user_id,
            choice_id: answer.choice_id,
            choice_content: choice.map(|c| c.choice.content),
            question_id: question.as_ref().map(|q| q.id),
            question_title: question.map(|q| q.question.title),
        });
    }
    Ok(Json(views))
}

#[cfg(test)]
mod tests {
    use rocket::http::{ContentType, Status};
    use rocket::serde::json::json;

    use super::*;
    use crate::model::api::QuestionResponse;

    #[test]
    fn empty_batch_is_invalid() {
        assert!(matches!(check_batch(&[]), Err(Error::InvalidInput(_))));
    }

    #[test]
    fn zero_ids_are_missing_fields() {
        let missing_choice = [AnswerSpec {
            user_id: 1,
            choice_id: 0,
        }];
        assert!(matches!(
            check_batch(&missing_choice),
            Err(Error::InvalidInput(_))
        ));

        let missing_user = [AnswerSpec {
            user_id: 0,
            choice_id: 2,
        }];
        assert!(matches!(
            check_batch(&missing_user),
            Err(Error::InvalidInput(_))
        ));
    }

    #[test]
    fn complete_batch_passes_the_cheap_checks() {
        let batch = [
            AnswerSpec {
                user_id: 1,
                choice_id: 2,
            },
            AnswerSpec {
                user_id: 1,
                choice_id: 3,
            },
        ];
        assert!(check_batch(&batch).is_ok());
    }

    /// Register a user and create a question with three choices; return
    /// (user_id, choice_ids).
    async fn seed(client: &rocket::local::asynchronous::Client) -> (u32, Vec<u32>) {
        let response = client
            .post("/users")
            .header(ContentType::JSON)
            .body(
                json!({
                    "name": "kim",
                    "age": "twenty",
                    "gender": "female",
                    "email": "kim@example.com",
                })
                .to_string(),
            )
            .dispatch()
            .await;
        assert_eq!(response.status(), Status::Ok);
        let user: crate::model::api::UserResponse = response.into_json().await.unwrap();

        let response = client
            .post("/images")
            .header(ContentType::JSON)
            .body(json!({"url": "https://example.com/q.png", "type": "sub"}).to_string())
            .dispatch()
            .await;
        let image: crate::model::api::ImageResponse = response.into_json().await.unwrap();

        let response = client
            .post("/questions")
            .header(ContentType::JSON)
            .body(
                json!({
                    "title": "Best colour?",
                    "sqe": 1,
                    "image_id": image.id,
                    "choices": [
                        {"content": "Red"},
                        {"content": "Green"},
                        {"content": "Blue"},
                    ],
                })
                .to_string(),
            )
            .dispatch()
            .await;
        let question: QuestionResponse = response.into_json().await.unwrap();

        let response = client
            .get(format!("/questions/{}/choices", question.id))
            .dispatch()
            .await;
        let choices: Vec<crate::model::api::ChoiceResponse> =
            response.into_json().await.unwrap();
        (user.id, choices.into_iter().map(|c| c.id).collect())
    }

    #[rocket::async_test]
    #[ignore = "requires a MongoDB replica set"]
    async fn valid_batch_creates_one_answer_per_pair() {
        let (client, db) = crate::client_and_db().await;
        let (user_id, choice_ids) = seed(&client).await;

        let body = choice_ids
            .iter()
            .map(|choice_id| json!({"user_id": user_id, "choice_id": choice_id}))
            .collect::<Vec<_>>();
        let response = client
            .post("/answers")
            .header(ContentType::JSON)
            .body(json!(body).to_string())
            .dispatch()
            .await;
        assert_eq!(response.status(), Status::Ok);
        let created: CreatedCount = response.into_json().await.unwrap();
        assert_eq!(created.created_count, choice_ids.len());

        // Each answer joins back to its choice and question.
        let response = client.get(format!("/answers/{user_id}")).dispatch().await;
        assert_eq!(response.status(), Status::Ok);
        let views: Vec<AnswerView> = response.into_json().await.unwrap();
        assert_eq!(views.len(), choice_ids.len());
        assert!(views
            .iter()
            .all(|v| v.question_title.as_deref() == Some("Best colour?")));

        db.drop(None).await.unwrap();
    }

    #[rocket::async_test]
    #[ignore = "requires a MongoDB replica set"]
    async fn one_bad_pair_persists_nothing() {
        let (client, db) = crate::client_and_db().await;
        let (user_id, choice_ids) = seed(&client).await;

        let response = client
            .post("/answers")
            .header(ContentType::JSON)
            .body(
                json!([
                    {"user_id": user_id, "choice_id": choice_ids[0]},
                    {"user_id": 999, "choice_id": choice_ids[0]},
                ])
                .to_string(),
            )
            .dispatch()
            .await;
        assert_eq!(response.status(), Status::NotFound);

        // Nothing from the batch was persisted.
        let response = client.get(format!("/answers/{user_id}")).dispatch().await;
        let views: Vec<AnswerView> = response.into_json().await.unwrap();
        assert!(views.is_empty());

        db.drop(None).await.unwrap();
    }

    #[rocket::async_test]
    #[ignore = "requires a MongoDB replica set"]
    async fn no_answers_is_success_not_error() {
        let (client, db) = crate::client_and_db().await;
        let (user_id, _) = seed(&client).await;

        let response = client.get(format!("/answers/{user_id}")).dispatch().await;
        assert_eq!(response.status(), Status::Ok);
        let views: Vec<AnswerView> = response.into_json().await.unwrap();
        assert!(views.is_empty());

        // A user that never existed is a 404, though.
        let response = client.get("/answers/999").dispatch().await;
        assert_eq!(response.status(), Status::NotFound);

        db.drop(None).await.unwrap();
    }

    #[rocket::async_test]
    #[ignore = "requires a MongoDB replica set"]
    async fn duplicate_submissions_are_all_persisted() {
        let (client, db) = crate::client_and_db().await;
        let (user_id, choice_ids) = seed(&client).await;

        for _ in 0..2 {
            let response = client
                .post("/answers")
                .header(ContentType::JSON)
                .body(json!([{"user_id": user_id, "choice_id": choice_ids[0]}]).to_string())
                .dispatch()
                .await;
            assert_eq!(response.status(), Status::Ok);
        }

        let response = client.get(format!("/answers/{user_id}")).dispatch().await;
        let views: Vec<AnswerView> = response.into_json().await.unwrap();
        assert_eq!(views.len(), 2);

        db.drop(None).await.unwrap();
    }

    #[rocket::async_test]
    #[ignore = "requires a MongoDB replica set"]
    async fn joins_are_best_effort_after_deletion() {
        let (client, db) = crate::client_and_db().await;
        let (user_id, choice_ids) = seed(&client).await;

        let response = client
            .post("/answers")
            .header(ContentType::JSON)
            .body(json!([{"user_id": user_id, "choice_id": choice_ids[0]}]).to_string())
            .dispatch()
            .await;
        assert_eq!(response.status(), Status::Ok);

        // Deleting the question (and so its choices) orphans the answer,
        // but fetching it still succeeds with nulled-out context.
        let response = client.delete("/questions/1").dispatch().await;
        assert_eq!(response.status(), Status::Ok);

        let response = client.get(format!("/answers/{user_id}")).dispatch().await;
        assert_eq!(response.status(), Status::Ok);
        let views: Vec<AnswerView> = response.into_json().await.unwrap();
        assert_eq!(views.len(), 1);
        assert!(views[0].choice_content.is_none());
        assert!(views[0].question_title.is_none());

        db.drop(None).await.unwrap();
    }
}
