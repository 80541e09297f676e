use rocket::Route;

mod answers;
mod images;
mod questions;
mod users;

pub fn routes() -> Vec<Route> {
    let mut routes = Vec::new();
    routes.extend(users::routes());
    routes.extend(images::routes());
    routes.extend(questions::routes());
    routes.extend(answers::routes());
    routes
}
