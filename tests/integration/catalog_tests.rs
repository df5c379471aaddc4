//! Catalog page integration tests

use std::time::{SystemTime, UNIX_EPOCH};

use reqwest::{redirect::Policy, Client, Response, StatusCode};

const BASE_URL: &str = "http://localhost:8080/catalog";

/// Client that does not follow redirects: the redirect itself is the
/// success signal being asserted.
fn client() -> Client {
    Client::builder()
        .redirect(Policy::none())
        .build()
        .expect("Failed to build client")
}

/// Unique suffix so repeated test runs do not collide on names
fn unique(prefix: &str) -> String {
    let millis = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("clock before epoch")
        .as_nanos();
    format!("{}{}", prefix, millis)
}

fn location(response: &Response) -> String {
    response
        .headers()
        .get("location")
        .expect("No location header")
        .to_str()
        .expect("Invalid location header")
        .to_string()
}

fn id_from_url(url: &str) -> &str {
    url.rsplit('/').next().expect("Empty URL")
}

/// Create an author and return its detail URL
async fn create_author(client: &Client, first_name: &str, family_name: &str) -> String {
    let response = client
        .post(format!("{}/author/create", BASE_URL))
        .form(&[
            ("first_name", first_name),
            ("family_name", family_name),
            ("date_of_birth", "1920-01-02"),
            ("date_of_death", ""),
        ])
        .send()
        .await
        .expect("Failed to send request");

    assert!(
        response.status().is_redirection(),
        "author create should redirect, got {}",
        response.status()
    );
    location(&response)
}

/// Create a book for the given author id and return its detail URL
async fn create_book(client: &Client, title: &str, author_id: &str) -> String {
    let response = client
        .post(format!("{}/book/create", BASE_URL))
        .form(&[
            ("title", title),
            ("author", author_id),
            ("summary", "A test summary."),
            ("isbn", "9781473211896"),
        ])
        .send()
        .await
        .expect("Failed to send request");

    assert!(
        response.status().is_redirection(),
        "book create should redirect, got {}",
        response.status()
    );
    location(&response)
}

#[tokio::test]
#[ignore] // Run with: cargo test -- --ignored
async fn test_home_page_counts() {
    let client = client();

    let response = client
        .get(BASE_URL)
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), StatusCode::OK);

    let body = response.text().await.expect("Failed to read body");
    assert!(body.contains("Books:"));
    assert!(body.contains("Copies available:"));
    assert!(body.contains("Authors:"));
    assert!(body.contains("Genres:"));
}

#[tokio::test]
#[ignore]
async fn test_author_create_redirects_to_detail() {
    let client = client();
    let family_name = unique("Creatson");

    let url = create_author(&client, "Ann", &family_name).await;
    assert!(url.starts_with("/catalog/author/"));

    let response = client
        .get(format!("http://localhost:8080{}", url))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), StatusCode::OK);
    let body = response.text().await.expect("Failed to read body");
    assert!(body.contains(&family_name));
}

#[tokio::test]
#[ignore]
async fn test_author_create_validation_errors_echo_values() {
    let client = client();

    let response = client
        .post(format!("{}/author/create", BASE_URL))
        .form(&[
            ("first_name", "Jane!"),
            ("family_name", ""),
            ("date_of_birth", "not-a-date"),
            ("date_of_death", ""),
        ])
        .send()
        .await
        .expect("Failed to send request");

    // Validation failure re-renders the form, no redirect.
    assert_eq!(response.status(), StatusCode::OK);

    let body = response.text().await.expect("Failed to read body");
    assert!(body.contains("First name has non-alphanumeric characters."));
    assert!(body.contains("Family name must be specified."));
    assert!(body.contains("Invalid date of birth"));
    // The submitted first name is echoed back into the form.
    assert!(body.contains("Jane!"));
}

#[tokio::test]
#[ignore]
async fn test_genre_create_is_idempotent_by_name() {
    let client = client();
    let name = unique("Solarpunk");

    let first = client
        .post(format!("{}/genre/create", BASE_URL))
        .form(&[("name", name.as_str())])
        .send()
        .await
        .expect("Failed to send request");
    assert!(first.status().is_redirection());
    let first_url = location(&first);

    // Same name, different case: no insert, redirect to the existing genre.
    let upper = name.to_uppercase();
    let second = client
        .post(format!("{}/genre/create", BASE_URL))
        .form(&[("name", upper.as_str())])
        .send()
        .await
        .expect("Failed to send request");
    assert!(second.status().is_redirection());
    assert_eq!(location(&second), first_url);
}

#[tokio::test]
#[ignore]
async fn test_genre_concurrent_duplicate_submissions() {
    // The duplicate check and the insert are not isolated; two concurrent
    // identical submissions can both pass the check and create duplicate
    // rows. Both must still redirect — equal targets are desired but not
    // guaranteed, so only the response shape is asserted.
    let client = client();
    let name = unique("Racefiction");

    let first = client
        .post(format!("{}/genre/create", BASE_URL))
        .form(&[("name", name.as_str())])
        .send();
    let second = client
        .post(format!("{}/genre/create", BASE_URL))
        .form(&[("name", name.as_str())])
        .send();

    let (a, b) = tokio::join!(first, second);
    let a = a.expect("Failed to send request");
    let b = b.expect("Failed to send request");

    assert!(a.status().is_redirection());
    assert!(b.status().is_redirection());
}

#[tokio::test]
#[ignore]
async fn test_genre_create_validation_error() {
    let client = client();

    let response = client
        .post(format!("{}/genre/create", BASE_URL))
        .form(&[("name", "sf")])
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), StatusCode::OK);
    let body = response.text().await.expect("Failed to read body");
    assert!(body.contains("Genre name must contain at least 3 characters."));
}

#[tokio::test]
#[ignore]
async fn test_book_create_with_empty_isbn_is_not_persisted() {
    let client = client();
    let author_url = create_author(&client, "Isby", &unique("Nless")).await;
    let title = unique("Unfinished");

    let response = client
        .post(format!("{}/book/create", BASE_URL))
        .form(&[
            ("title", title.as_str()),
            ("author", id_from_url(&author_url)),
            ("summary", "A summary."),
            ("isbn", ""),
        ])
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), StatusCode::OK);
    let body = response.text().await.expect("Failed to read body");
    assert!(body.contains("ISBN must not be empty."));
    assert!(body.contains(&title), "submitted title is echoed back");

    // No record was persisted.
    let list = client
        .get(format!("{}/books", BASE_URL))
        .send()
        .await
        .expect("Failed to send request")
        .text()
        .await
        .expect("Failed to read body");
    assert!(!list.contains(&title));
}

#[tokio::test]
#[ignore]
async fn test_author_delete_blocked_while_books_exist() {
    let client = client();
    let author_url = create_author(&client, "Blocked", &unique("Author")).await;
    let author_id = id_from_url(&author_url);
    create_book(&client, &unique("Anchor"), author_id).await;

    let response = client
        .post(format!("{}/author/{}/delete", BASE_URL, author_id))
        .send()
        .await
        .expect("Failed to send request");

    // Refused: the confirmation view is re-rendered, no redirect.
    assert_eq!(response.status(), StatusCode::OK);
    let body = response.text().await.expect("Failed to read body");
    assert!(body.contains("Delete the following books"));

    // The author is still there.
    let detail = client
        .get(format!("http://localhost:8080{}", author_url))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(detail.status(), StatusCode::OK);
}

#[tokio::test]
#[ignore]
async fn test_author_delete_without_books_removes_author() {
    let client = client();
    let author_url = create_author(&client, "Gone", &unique("Soon")).await;
    let author_id = id_from_url(&author_url);

    let response = client
        .post(format!("{}/author/{}/delete", BASE_URL, author_id))
        .send()
        .await
        .expect("Failed to send request");

    assert!(response.status().is_redirection());
    assert_eq!(location(&response), "/catalog/authors");

    let detail = client
        .get(format!("http://localhost:8080{}", author_url))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(detail.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
#[ignore]
async fn test_detail_not_found_for_invalid_and_absent_ids() {
    let client = client();

    // Structurally invalid identifier: rejected before any lookup.
    let invalid = client
        .get(format!("{}/author/not-an-id", BASE_URL))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(invalid.status(), StatusCode::NOT_FOUND);

    // Well-formed but absent identifier: same outcome.
    let absent = client
        .get(format!("{}/author/2147483647", BASE_URL))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(absent.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
#[ignore]
async fn test_book_update_changes_title() {
    let client = client();
    let author_url = create_author(&client, "Upd", &unique("Ated")).await;
    let author_id = id_from_url(&author_url);
    let book_url = create_book(&client, &unique("FirstTitle"), author_id).await;
    let book_id = id_from_url(&book_url);

    let new_title = unique("SecondTitle");
    let response = client
        .post(format!("{}/book/{}/update", BASE_URL, book_id))
        .form(&[
            ("title", new_title.as_str()),
            ("author", author_id),
            ("summary", "An updated summary."),
            ("isbn", "9781473211896"),
        ])
        .send()
        .await
        .expect("Failed to send request");

    assert!(response.status().is_redirection());
    assert_eq!(location(&response), book_url);

    let body = client
        .get(format!("http://localhost:8080{}", book_url))
        .send()
        .await
        .expect("Failed to send request")
        .text()
        .await
        .expect("Failed to read body");
    assert!(body.contains(&new_title));
}

#[tokio::test]
#[ignore]
async fn test_bookinstance_create_and_detail() {
    let client = client();
    let author_url = create_author(&client, "Copy", &unique("Holder")).await;
    let book_url = create_book(&client, &unique("Copied"), id_from_url(&author_url)).await;
    let imprint = unique("Imprint");

    let response = client
        .post(format!("{}/bookinstance/create", BASE_URL))
        .form(&[
            ("book", id_from_url(&book_url)),
            ("imprint", imprint.as_str()),
            ("status", "Available"),
            ("due_back", ""),
        ])
        .send()
        .await
        .expect("Failed to send request");

    assert!(response.status().is_redirection());
    let copy_url = location(&response);
    assert!(copy_url.starts_with("/catalog/bookinstance/"));

    let body = client
        .get(format!("http://localhost:8080{}", copy_url))
        .send()
        .await
        .expect("Failed to send request")
        .text()
        .await
        .expect("Failed to read body");
    assert!(body.contains(&imprint));
    assert!(body.contains("Available"));
}

#[tokio::test]
#[ignore]
async fn test_stubbed_paths_return_placeholder() {
    let client = client();

    for path in [
        "/book/1/delete",
        "/author/1/update",
        "/genre/1/update",
        "/genre/1/delete",
        "/bookinstance/1/update",
        "/bookinstance/1/delete",
    ] {
        let response = client
            .get(format!("{}{}", BASE_URL, path))
            .send()
            .await
            .expect("Failed to send request");

        assert_eq!(response.status(), StatusCode::NOT_IMPLEMENTED, "{}", path);
        let body = response.text().await.expect("Failed to read body");
        assert!(body.contains("Not implemented"));
    }
}
