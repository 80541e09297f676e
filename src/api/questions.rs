use mongodb::{bson::doc, Client};
use rocket::{futures::TryStreamExt, serde::json::Json, Route, State};

use crate::{
    error::{Error, Result},
    model::{
        api::{ChoiceBatch, ChoiceResponse, CreatedCount, QuestionResponse, QuestionSpec},
        common::QuestionId,
        db::{Choice, ChoiceCore, Image, Question, QuestionCore},
        mongodb::{id_filter, Coll, Counter, CHOICE_IDS, QUESTION_IDS},
    },
};

pub fn routes() -> Vec<Route> {
    routes![
        create_question,
        get_questions,
        get_question,
        delete_question,
        create_choices,
        get_choices,
    ]
}

#[post("/questions", data = "<spec>", format = "json")]
async fn create_question(
    spec: Json<QuestionSpec>,
    images: Coll<Image>,
    questions: Coll<Question>,
    choices: Coll<Choice>,
    counters: Coll<Counter>,
    db_client: &State<Client>,
) -> Result<Json<QuestionResponse>> {
    let spec = spec.0;
    if spec.title.is_empty() {
        return Err(Error::InvalidInput("'title' must not be empty".to_string()));
    }
    let image = images
        .find_one(id_filter(spec.image_id), None)
        .await?
        .ok_or(Error::ImageNotFound(spec.image_id))?;

    let question_id = Counter::next(&counters, QUESTION_IDS).await?;
    let question = Question {
        id: question_id,
        question: QuestionCore::new(spec.title, spec.sqe, spec.image_id),
    };

    // Assemble any nested choices up front; `sqe` defaults to the choice's
    // 1-based position in the request.
    let new_choices = if spec.choices.is_empty() {
        Vec::new()
    } else {
        let first_id = Counter::reserve(&counters, CHOICE_IDS, spec.choices.len() as u32).await?;
        spec.choices
            .into_iter()
            .enumerate()
            .map(|(index, choice)| Choice {
                id: first_id + index as u32,
                choice: ChoiceCore::new(
                    choice.content,
                    choice.is_active,
                    choice.sqe.unwrap_or(index as u32 + 1),
                    question_id,
                ),
            })
            .collect()
    };

    // The question and its nested choices become durable together or not
    // at all. Dropping the session without committing aborts.
    let mut session = db_client.start_session(None).await?;
    session.start_transaction(None).await?;
    questions
        .insert_one_with_session(&question, None, &mut session)
        .await?;
    if !new_choices.is_empty() {
        choices
            .insert_many_with_session(new_choices.iter(), None, &mut session)
            .await?;
    }
    session.commit_transaction().await?;

    info!(
        "Created question {question_id} with {} choices",
        new_choices.len()
    );
    Ok(Json(QuestionResponse::new(question, Some(image))))
}

#[get("/questions")]
async fn get_questions(
    questions: Coll<Question>,
    images: Coll<Image>,
) -> Result<Json<Vec<QuestionResponse>>> {
    let all_questions: Vec<Question> = questions.find(None, None).await?.try_collect().await?;
    let mut responses = Vec::with_capacity(all_questions.len());
    for question in all_questions {
        let image = images.find_one(id_filter(question.image_id), None).await?;
        responses.push(QuestionResponse::new(question, image));
    }
    Ok(Json(responses))
}

#[get("/questions/<question_id>")]
async fn get_question(
    question_id: QuestionId,
    questions: Coll<Question>,
    images: Coll<Image>,
) -> Result<Json<QuestionResponse>> {
    let question = questions
        .find_one(id_filter(question_id), None)
        .await?
        .ok_or(Error::QuestionNotFound(question_id))?;
    // Best-effort join: a deleted image renders as null.
    let image = images.find_one(id_filter(question.image_id), None).await?;
    Ok(Json(QuestionResponse::new(question, image)))
}

/// Deleting a question cascades to its choices, in the same transaction.
#[delete("/questions/<question_id>")]
async fn delete_question(
    question_id: QuestionId,
    questions: Coll<Question>,
    choices: Coll<Choice>,
    db_client: &State<Client>,
) -> Result<()> {
    let mut session = db_client.start_session(None).await?;
    session.start_transaction(None).await?;
    let result = questions
        .delete_one_with_session(id_filter(question_id), None, &mut session)
        .await?;
    if result.deleted_count == 0 {
        return Err(Error::QuestionNotFound(question_id));
    }
    let cascade = choices
        .delete_many_with_session(doc! { "question_id": question_id as i64 }, None, &mut session)
        .await?;
    session.commit_transaction().await?;

    info!(
        "Deleted question {question_id} and its {} choices",
        cascade.deleted_count
    );
    Ok(())
}

#[post("/questions/<question_id>/choices", data = "<batch>", format = "json")]
async fn create_choices(
    question_id: QuestionId,
    batch: Json<ChoiceBatch>,
    questions: Coll<Question>,
    choices: Coll<Choice>,
    counters: Coll<Counter>,
    db_client: &State<Client>,
) -> Result<Json<CreatedCount>> {
    questions
        .find_one(id_filter(question_id), None)
        .await?
        .ok_or(Error::QuestionNotFound(question_id))?;

    let contents = batch.0.choices;
    if contents.is_empty() {
        return Ok(Json(CreatedCount { created_count: 0 }));
    }

    let first_id = Counter::reserve(&counters, CHOICE_IDS, contents.len() as u32).await?;
    let rows = Choice::sequence(question_id, first_id, contents);

    let mut session = db_client.start_session(None).await?;
    session.start_transaction(None).await?;
    choices
        .insert_many_with_session(rows.iter(), None, &mut session)
        .await?;
    session.commit_transaction().await?;

    info!("Created {} choices for question {question_id}", rows.len());
    Ok(Json(CreatedCount {
        created_count: rows.len(),
    }))
}

#[get("/questions/<question_id>/choices")]
async fn get_choices(
    question_id: QuestionId,
    questions: Coll<Question>,
    choices: Coll<Choice>,
) -> Result<Json<Vec<ChoiceResponse>>> {
    questions
        .find_one(id_filter(question_id), None)
        .await?
        .ok_or(Error::QuestionNotFound(question_id))?;
    let question_choices: Vec<Choice> = choices
        .find(doc! { "question_id": question_id as i64 }, None)
        .await?
        .try_collect()
        .await?;
    Ok(Json(
        question_choices
            .into_iter()
            .map(ChoiceResponse::from)
            .collect(),
    ))
}
