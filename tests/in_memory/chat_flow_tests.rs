//! Task chat flows with realtime fan-out.

use super::helpers::{Marketplace, marketplace, provider, task_request, user};
use rstest::rstest;
use taskmarket::chat::services::{SendMessageRequest, task_channel};

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn both_parties_see_the_conversation(marketplace: Marketplace) {
    let poster = user();
    let worker = provider();
    let task = marketplace
        .state
        .tasks
        .create_task(&poster, task_request("Fit a door handle"))
        .await
        .expect("task creation should succeed");
    let mut listener = marketplace
        .hub
        .subscribe(&task_channel(task.id()))
        .expect("subscribe should succeed");

    let sent = marketplace
        .state
        .chat
        .send_message(
            &worker,
            task.id(),
            SendMessageRequest {
                receiver: poster.user_id(),
                text: "Which finish would you like?".to_owned(),
                image_uri: Some("https://img.example/finishes.jpg".to_owned()),
            },
        )
        .await
        .expect("message should be sent");

    let pushed = listener.recv().await.expect("payload should arrive");
    assert_eq!(pushed["event"], "receiveMessage");
    assert_eq!(pushed["message"]["imageUri"], "https://img.example/finishes.jpg");

    let poster_view = marketplace
        .state
        .chat
        .chat_summary(&poster)
        .await
        .expect("summary should succeed");
    let worker_view = marketplace
        .state
        .chat
        .chat_summary(&worker)
        .await
        .expect("summary should succeed");
    assert_eq!(poster_view.len(), 1);
    assert_eq!(poster_view.first().map(|summary| summary.unread_count), Some(1));
    assert_eq!(worker_view.first().map(|summary| summary.unread_count), Some(0));
    assert_eq!(
        poster_view.first().map(|summary| summary.last_message.id()),
        Some(sent.id())
    );

    let marked = marketplace
        .state
        .chat
        .mark_read(&poster, task.id())
        .await
        .expect("mark read should succeed");
    assert_eq!(marked, 1);
}
