use axum::{
    body::Body,
    http::{Method, Request, StatusCode},
    Router,
};
use bookshelf::{store::SharedStore, Application};
use bookshelf_kernel::settings::{DatabaseSettings, Settings};
use serde_json::{json, Value};
use tower::ServiceExt;

const MISSING_ID: &str = "123e4567-e89b-12d3-a456-426614174000";

struct TestApp {
    router: Router,
    store: SharedStore,
}

impl TestApp {
    async fn new() -> Self {
        let settings = Settings {
            database: DatabaseSettings::in_memory(),
            ..Settings::default()
        };
        let app = Application::bootstrap(settings).await.unwrap();
        Self {
            router: app.router(),
            store: app.store(),
        }
    }

    async fn send(&self, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        let builder = Request::builder().method(method).uri(uri);
        let request = match body {
            Some(body) => builder
                .header("content-type", "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let json = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, json)
    }

    async fn create_author(&self, body: Value) -> String {
        let (status, json) = self.send(Method::POST, "/authors/create", Some(body)).await;
        assert_eq!(status, StatusCode::CREATED, "{json}");
        json["data"]["id"].as_str().unwrap().to_string()
    }

    async fn create_book(&self, body: Value) -> String {
        let (status, json) = self.send(Method::POST, "/books/create", Some(body)).await;
        assert_eq!(status, StatusCode::CREATED, "{json}");
        json["data"]["id"].as_str().unwrap().to_string()
    }

    async fn counts(&self) -> (i64, i64) {
        (
            self.store.count_authors().await.unwrap(),
            self.store.count_books().await.unwrap(),
        )
    }
}

fn bradbury() -> Value {
    json!({"name": "Ray Bradbury", "birth_date": "1920-08-22", "nationality": "American"})
}

fn names(list: &Value, field: &str) -> Vec<String> {
    list.as_array()
        .unwrap()
        .iter()
        .map(|item| item[field].as_str().unwrap().to_string())
        .collect()
}

#[tokio::test]
async fn create_author_returns_envelope_and_grows_store() {
    let app = TestApp::new().await;

    let (status, json) = app
        .send(Method::POST, "/authors/create", Some(bradbury()))
        .await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(json["message"], "Author 'Ray Bradbury' created successfully!");
    assert_eq!(json["data"]["name"], "Ray Bradbury");
    assert_eq!(json["data"]["birth_date"], "1920-08-22");
    assert_eq!(json["data"]["nationality"], "American");
    assert_eq!(app.counts().await, (1, 0));
}

#[tokio::test]
async fn duplicate_author_is_rejected_without_writing() {
    let app = TestApp::new().await;
    app.create_author(json!({
        "name": "Joanne Rowling",
        "birth_date": "1965-07-31",
        "nationality": "British"
    }))
    .await;

    let (status, json) = app
        .send(
            Method::POST,
            "/authors/create",
            Some(json!({"name": "Joanne Rowling", "birth_date": "1965-07-31"})),
        )
        .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
        json["detail"],
        "An author with this name and birth date already exists."
    );
    assert_eq!(app.counts().await, (1, 0));
}

#[tokio::test]
async fn same_name_with_other_birth_date_is_a_different_author() {
    let app = TestApp::new().await;
    app.create_author(json!({"name": "Homer"})).await;
    app.create_author(json!({"name": "Homer", "birth_date": "1830-01-01"}))
        .await;

    let (status, _) = app
        .send(Method::POST, "/authors/create", Some(json!({"name": "Homer"})))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(app.counts().await, (2, 0));
}

#[tokio::test]
async fn blank_author_name_is_rejected() {
    let app = TestApp::new().await;

    let (status, json) = app
        .send(Method::POST, "/authors/create", Some(json!({"name": "   "})))
        .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["detail"], "Name field cannot be empty.");
    assert_eq!(app.counts().await, (0, 0));
}

#[tokio::test]
async fn malformed_payload_uses_detail_body() {
    let app = TestApp::new().await;

    let (status, json) = app
        .send(
            Method::POST,
            "/authors/create",
            Some(json!({"name": "Ray", "birth_date": "22 August 1920"})),
        )
        .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(json["detail"].is_string());
    assert_eq!(app.counts().await, (0, 0));
}

#[tokio::test]
async fn authors_list_orders_and_filters() {
    let app = TestApp::new().await;
    app.create_author(json!({"name": "Borges", "birth_date": "1899-08-24"}))
        .await;
    app.create_author(json!({"name": "Austen", "birth_date": "1775-12-16"}))
        .await;
    app.create_author(json!({"name": "Austen", "birth_date": "1800-01-01"}))
        .await;

    let (status, list) = app.send(Method::GET, "/authors/", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(names(&list, "name"), vec!["Austen", "Austen", "Borges"]);
    assert_eq!(
        names(&list, "birth_date"),
        vec!["1800-01-01", "1775-12-16", "1899-08-24"]
    );

    let (_, list) = app
        .send(Method::GET, "/authors/?ordering=-name,birth_date", None)
        .await;
    assert_eq!(
        names(&list, "birth_date"),
        vec!["1899-08-24", "1775-12-16", "1800-01-01"]
    );

    let (_, list) = app
        .send(Method::GET, "/authors/?birth_date=1899-08-24", None)
        .await;
    assert_eq!(names(&list, "name"), vec!["Borges"]);

    let (_, list) = app.send(Method::GET, "/authors/?name=Austen", None).await;
    assert_eq!(list.as_array().unwrap().len(), 2);

    let (_, list) = app
        .send(Method::GET, "/authors/?name=%20Austen%20", None)
        .await;
    assert_eq!(list.as_array().unwrap().len(), 2);

    let (status, json) = app
        .send(Method::GET, "/authors/?birth_date=yesterday", None)
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(json["detail"].is_string());
}

#[tokio::test]
async fn get_author_by_id() {
    let app = TestApp::new().await;
    let id = app.create_author(bradbury()).await;

    let (status, json) = app.send(Method::GET, &format!("/authors/{id}/"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["id"], id.as_str());
    assert_eq!(json["name"], "Ray Bradbury");

    let (status, json) = app
        .send(Method::GET, &format!("/authors/{MISSING_ID}/"), None)
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(
        json["detail"],
        format!("Author with id '{MISSING_ID} not found.")
    );

    let (status, _) = app.send(Method::GET, "/authors/not-a-uuid/", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn deleting_author_cascades_to_books() {
    let app = TestApp::new().await;
    let ray = app.create_author(bradbury()).await;
    let ursula = app
        .create_author(json!({"name": "Ursula K. Le Guin", "birth_date": "1929-10-21"}))
        .await;
    app.create_book(json!({"title": "Fahrenheit 451", "author_id": ray}))
        .await;
    app.create_book(json!({"title": "The Martian Chronicles", "author_id": ray}))
        .await;
    app.create_book(json!({"title": "The Dispossessed", "author_id": ursula}))
        .await;
    assert_eq!(app.counts().await, (2, 3));

    let (status, _) = app
        .send(Method::DELETE, &format!("/authors/delete/{ray}/"), None)
        .await;

    assert_eq!(status, StatusCode::NO_CONTENT);
    assert_eq!(app.counts().await, (1, 1));
    let (_, list) = app
        .send(Method::GET, &format!("/books/?author={ray}"), None)
        .await;
    assert!(list.as_array().unwrap().is_empty());
}

#[tokio::test]
async fn deleting_unknown_author_changes_nothing() {
    let app = TestApp::new().await;
    app.create_author(bradbury()).await;

    let (status, json) = app
        .send(Method::DELETE, &format!("/authors/delete/{MISSING_ID}/"), None)
        .await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(
        json["detail"],
        format!("Author with id '{MISSING_ID} not found.")
    );
    assert_eq!(app.counts().await, (1, 0));
}

#[tokio::test]
async fn create_book_returns_envelope_with_author_name() {
    let app = TestApp::new().await;
    let author = app.create_author(bradbury()).await;

    let (status, json) = app
        .send(
            Method::POST,
            "/books/create",
            Some(json!({
                "title": "The Martian Chronicles",
                "author_id": author,
                "publication_date": "1950-05-03",
                "genre": "Science Fiction"
            })),
        )
        .await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(
        json["message"],
        "Book 'The Martian Chronicles' created successfully!"
    );
    assert_eq!(json["data"]["author_id"], author.as_str());
    assert_eq!(json["data"]["author"], "Ray Bradbury");
    assert_eq!(json["data"]["publication_date"], "1950-05-03");
    assert_eq!(app.counts().await, (1, 1));
}

#[tokio::test]
async fn unknown_author_wins_over_duplicate_title() {
    let app = TestApp::new().await;
    let author = app.create_author(bradbury()).await;
    app.create_book(json!({"title": "Fahrenheit 451", "author_id": author}))
        .await;

    let (status, json) = app
        .send(
            Method::POST,
            "/books/create",
            Some(json!({"title": "Fahrenheit 451", "author_id": MISSING_ID})),
        )
        .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["detail"], "Author with the provided ID does not exist.");
    assert_eq!(app.counts().await, (1, 1));
}

#[tokio::test]
async fn blank_title_is_rejected() {
    let app = TestApp::new().await;
    let author = app.create_author(bradbury()).await;

    let (status, json) = app
        .send(
            Method::POST,
            "/books/create",
            Some(json!({"title": "", "author_id": author})),
        )
        .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["detail"], "Title field cannot be empty.");
    assert_eq!(app.counts().await, (1, 0));
}

#[tokio::test]
async fn books_list_orders_and_filters() {
    let app = TestApp::new().await;
    let ray = app.create_author(bradbury()).await;
    let ursula = app
        .create_author(json!({"name": "Ursula K. Le Guin"}))
        .await;
    app.create_book(json!({
        "title": "The Martian Chronicles",
        "author_id": ray,
        "publication_date": "1950-05-03",
        "genre": "Science Fiction"
    }))
    .await;
    app.create_book(json!({
        "title": "Fahrenheit 451",
        "author_id": ray,
        "publication_date": "1953-10-19",
        "genre": "Dystopian"
    }))
    .await;
    app.create_book(json!({
        "title": "A Wizard of Earthsea",
        "author_id": ursula,
        "publication_date": "1968-11-01",
        "genre": "Fantasy"
    }))
    .await;
    app.create_book(json!({
        "title": "Another Fahrenheit",
        "author_id": ursula,
        "publication_date": "1953-10-19",
        "genre": "Dystopian"
    }))
    .await;

    let (status, list) = app.send(Method::GET, "/books/", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        names(&list, "title"),
        vec![
            "A Wizard of Earthsea",
            "Another Fahrenheit",
            "Fahrenheit 451",
            "The Martian Chronicles",
        ]
    );

    let (_, list) = app.send(Method::GET, "/books/?ordering=title", None).await;
    assert_eq!(
        names(&list, "title"),
        vec![
            "A Wizard of Earthsea",
            "Another Fahrenheit",
            "Fahrenheit 451",
            "The Martian Chronicles",
        ]
    );

    let (_, list) = app
        .send(Method::GET, "/books/?ordering=author,-title", None)
        .await;
    assert_eq!(
        names(&list, "title"),
        vec![
            "The Martian Chronicles",
            "Fahrenheit 451",
            "Another Fahrenheit",
            "A Wizard of Earthsea",
        ]
    );

    let (_, list) = app
        .send(Method::GET, &format!("/books/?author={ray}"), None)
        .await;
    assert_eq!(
        names(&list, "title"),
        vec!["Fahrenheit 451", "The Martian Chronicles"]
    );

    let (_, list) = app.send(Method::GET, "/books/?genre=Dystopian", None).await;
    assert_eq!(
        names(&list, "title"),
        vec!["Another Fahrenheit", "Fahrenheit 451"]
    );

    let (_, list) = app
        .send(Method::GET, "/books/?genre=%20Dystopian%20", None)
        .await;
    assert_eq!(
        names(&list, "title"),
        vec!["Another Fahrenheit", "Fahrenheit 451"]
    );

    let (_, list) = app
        .send(Method::GET, "/books/?publication_date=1968-11-01", None)
        .await;
    assert_eq!(names(&list, "title"), vec!["A Wizard of Earthsea"]);
}

#[tokio::test]
async fn get_book_by_id() {
    let app = TestApp::new().await;
    let author = app.create_author(bradbury()).await;
    let book = app
        .create_book(json!({"title": "Fahrenheit 451", "author_id": author}))
        .await;

    let (status, json) = app.send(Method::GET, &format!("/books/{book}/"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["title"], "Fahrenheit 451");
    assert_eq!(json["publication_date"], Value::Null);

    let (status, json) = app
        .send(Method::GET, &format!("/books/{MISSING_ID}/"), None)
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(json["detail"], format!("Book with ID '{MISSING_ID}' not found."));
}

#[tokio::test]
async fn put_replaces_supplied_fields() {
    let app = TestApp::new().await;
    let author = app.create_author(bradbury()).await;
    let book = app
        .create_book(json!({
            "title": "Fahrenheit 451",
            "author_id": author,
            "publication_date": "1953-10-19",
            "genre": "Dystopian"
        }))
        .await;

    let (status, json) = app
        .send(
            Method::PUT,
            &format!("/books/update/{book}/"),
            Some(json!({
                "title": "Fahrenheit 451 Updated",
                "author_id": author,
                "publication_date": "1953-10-20",
                "genre": "Science Fiction"
            })),
        )
        .await;

    assert_eq!(status, StatusCode::OK, "{json}");
    assert_eq!(
        json["message"],
        format!("Book with ID '{book}' updated successfully!")
    );
    assert_eq!(json["data"]["title"], "Fahrenheit 451 Updated");

    let (_, stored) = app.send(Method::GET, &format!("/books/{book}/"), None).await;
    assert_eq!(stored["title"], "Fahrenheit 451 Updated");
    assert_eq!(stored["publication_date"], "1953-10-20");
    assert_eq!(stored["genre"], "Science Fiction");
}

#[tokio::test]
async fn put_requires_title_and_author() {
    let app = TestApp::new().await;
    let author = app.create_author(bradbury()).await;
    let book = app
        .create_book(json!({"title": "Fahrenheit 451", "author_id": author}))
        .await;

    let (status, json) = app
        .send(
            Method::PUT,
            &format!("/books/update/{book}/"),
            Some(json!({"genre": "Dystopian"})),
        )
        .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["detail"], "Title field cannot be empty.");
}

#[tokio::test]
async fn patch_keeps_omitted_fields() {
    let app = TestApp::new().await;
    let author = app.create_author(bradbury()).await;
    let book = app
        .create_book(json!({
            "title": "Fahrenheit 451",
            "author_id": author,
            "publication_date": "1953-10-19",
            "genre": "Dystopian"
        }))
        .await;

    let (status, json) = app
        .send(
            Method::PATCH,
            &format!("/books/update/{book}/"),
            Some(json!({"genre": "Classic", "publication_date": null})),
        )
        .await;

    assert_eq!(status, StatusCode::OK, "{json}");
    assert_eq!(json["data"]["title"], "Fahrenheit 451");
    assert_eq!(json["data"]["author_id"], author.as_str());
    assert_eq!(json["data"]["genre"], "Classic");
    assert_eq!(json["data"]["publication_date"], Value::Null);
}

#[tokio::test]
async fn update_rejects_collision_with_another_book() {
    let app = TestApp::new().await;
    let author = app.create_author(bradbury()).await;
    app.create_book(json!({"title": "Fahrenheit 451", "author_id": author}))
        .await;
    let other = app
        .create_book(json!({"title": "Dandelion Wine", "author_id": author}))
        .await;

    let (status, json) = app
        .send(
            Method::PATCH,
            &format!("/books/update/{other}/"),
            Some(json!({"title": "Fahrenheit 451"})),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
        json["detail"],
        "A book with the title 'Fahrenheit 451' already exists for this author."
    );

    // Re-sending a book's own title is not a collision.
    let (status, _) = app
        .send(
            Method::PUT,
            &format!("/books/update/{other}/"),
            Some(json!({"title": "Dandelion Wine", "author_id": author, "genre": "Novel"})),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn update_to_unknown_author_is_rejected() {
    let app = TestApp::new().await;
    let author = app.create_author(bradbury()).await;
    let book = app
        .create_book(json!({"title": "Fahrenheit 451", "author_id": author}))
        .await;

    let (status, json) = app
        .send(
            Method::PATCH,
            &format!("/books/update/{book}/"),
            Some(json!({"author_id": MISSING_ID})),
        )
        .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["detail"], "Author with the provided ID does not exist.");
}

#[tokio::test]
async fn updating_unknown_book_is_not_found() {
    let app = TestApp::new().await;
    let author = app.create_author(bradbury()).await;

    let (status, json) = app
        .send(
            Method::PUT,
            &format!("/books/update/{MISSING_ID}/"),
            Some(json!({"title": "Fahrenheit 451 Updated", "author_id": author})),
        )
        .await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(json["detail"], format!("Book with ID '{MISSING_ID}' not found."));
}

#[tokio::test]
async fn delete_book_removes_only_that_book() {
    let app = TestApp::new().await;
    let author = app.create_author(bradbury()).await;
    let book = app
        .create_book(json!({"title": "Fahrenheit 451", "author_id": author}))
        .await;

    let (status, _) = app
        .send(Method::DELETE, &format!("/books/delete/{book}/"), None)
        .await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    assert_eq!(app.counts().await, (1, 0));

    let (status, json) = app
        .send(Method::DELETE, &format!("/books/delete/{MISSING_ID}/"), None)
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(json["detail"], format!("Book with ID '{MISSING_ID}' not found."));
}

#[tokio::test]
async fn bradbury_walkthrough() {
    let app = TestApp::new().await;

    let (status, json) = app
        .send(
            Method::POST,
            "/authors/create",
            Some(json!({"name": "Ray Bradbury", "birth_date": "1920-08-22"})),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    let author = json["data"]["id"].as_str().unwrap().to_string();

    let book = json!({
        "title": "Fahrenheit 451",
        "author_id": author,
        "publication_date": "1953-10-19"
    });
    let (status, _) = app
        .send(Method::POST, "/books/create", Some(book.clone()))
        .await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, json) = app.send(Method::POST, "/books/create", Some(book)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
        json["detail"],
        "A book with the title 'Fahrenheit 451' already exists for this author."
    );

    let (status, _) = app
        .send(Method::DELETE, &format!("/authors/delete/{author}/"), None)
        .await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    assert_eq!(app.counts().await, (0, 0));
}

#[tokio::test]
async fn responses_carry_request_id() {
    let app = TestApp::new().await;

    let response = app
        .router
        .clone()
        .oneshot(Request::get("/authors/").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert!(response.headers().contains_key("x-request-id"));
}

#[tokio::test]
async fn wrong_method_answers_405_with_detail() {
    let app = TestApp::new().await;

    let (status, json) = app
        .send(Method::POST, "/authors/", Some(bradbury()))
        .await;

    assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED);
    assert_eq!(json["detail"], "Method \"POST\" not allowed.");
    assert_eq!(app.counts().await, (0, 0));

    let (status, json) = app
        .send(Method::GET, "/books/delete/123e4567-e89b-12d3-a456-426614174000/", None)
        .await;
    assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED);
    assert_eq!(json["detail"], "Method \"GET\" not allowed.");
}
