// tests/course_tests.rs

mod common;

use common::{admin_token, spawn_app, student_token};

#[tokio::test]
async fn admin_can_create_and_list_courses() {
    // Arrange
    let app = spawn_app().await;
    let client = reqwest::Client::new();
    let token = admin_token(&app, &client).await;

    // Act
    let response = client
        .post(format!("{}/api/courses", app.address))
        .header("Authorization", format!("Bearer {}", token))
        .json(&serde_json::json!({
            "title": "Rust 101",
            "description": "Intro course"
        }))
        .send()
        .await
        .expect("Failed to execute request");

    // Assert
    assert_eq!(response.status().as_u16(), 201);
    let body: serde_json::Value = response.json().await.unwrap();
    let id = body["id"].as_i64().expect("id should be numeric");

    let list: serde_json::Value = client
        .get(format!("{}/api/courses", app.address))
        .header("Authorization", format!("Bearer {}", token))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();

    let courses = list.as_array().unwrap();
    assert!(courses.iter().any(|c| c["id"].as_i64() == Some(id)));
}

#[tokio::test]
async fn student_cannot_create_course() {
    // Arrange
    let app = spawn_app().await;
    let client = reqwest::Client::new();
    let token = student_token(&client, &app.address).await;

    // Act
    let response = client
        .post(format!("{}/api/courses", app.address))
        .header("Authorization", format!("Bearer {}", token))
        .json(&serde_json::json!({ "title": "Not allowed" }))
        .send()
        .await
        .expect("Failed to execute request");

    // Assert
    assert_eq!(response.status().as_u16(), 403);
}

#[tokio::test]
async fn get_missing_course_is_404() {
    // Arrange
    let app = spawn_app().await;
    let client = reqwest::Client::new();
    let token = student_token(&client, &app.address).await;

    // Act
    let response = client
        .get(format!("{}/api/courses/9999", app.address))
        .header("Authorization", format!("Bearer {}", token))
        .send()
        .await
        .expect("Failed to execute request");

    // Assert
    assert_eq!(response.status().as_u16(), 404);
}
