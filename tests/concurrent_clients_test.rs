// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Concurrent client writes against one user must not lose updates.

use clientes_api::error::AppError;
use clientes_api::models::client::{Address, ClientPayload};
use clientes_api::models::validation::UserPayload;

mod common;
use common::{create_test_app, create_user};

const NUM_CONCURRENT_CLIENTS: usize = 20;

fn payload(i: usize) -> ClientPayload {
    ClientPayload {
        name: format!("Client {}", i),
        email: format!("client{}@example.com", i),
        address: Address {
            city: "City".to_string(),
            country: "Country".to_string(),
            municipality: "Municipality".to_string(),
            state: "State".to_string(),
        },
    }
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_client_creates_are_all_kept() {
    let (app, state) = create_test_app();
    let (user_id, _) = create_user(&app, "Race", "race@example.com").await;
    let owner = state.users.get(&user_id).await.expect("user should exist");

    let mut handles = vec![];
    for i in 0..NUM_CONCURRENT_CLIENTS {
        let state = state.clone();
        let owner = owner.clone();
        handles.push(tokio::spawn(async move {
            state.clients.create(&owner, payload(i)).await
        }));
    }

    for handle in handles {
        handle
            .await
            .expect("Task join failed")
            .expect("Client create failed");
    }

    let stored = state.db.get_user(&user_id).await.unwrap().unwrap();
    assert_eq!(
        stored.clientes.len(),
        NUM_CONCURRENT_CLIENTS,
        "Client count mismatch due to lost update"
    );
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_deletes_and_creates() {
    let (app, state) = create_test_app();
    let (user_id, _) = create_user(&app, "Race", "race@example.com").await;
    let owner = state.users.get(&user_id).await.unwrap();

    let mut seeded = Vec::new();
    for i in 0..NUM_CONCURRENT_CLIENTS {
        seeded.push(state.clients.create(&owner, payload(i)).await.unwrap());
    }

    let mut handles = vec![];
    for (i, client) in seeded.iter().enumerate().take(NUM_CONCURRENT_CLIENTS / 2) {
        let state_del = state.clone();
        let owner_del = owner.clone();
        let id = client.id.clone();
        handles.push(tokio::spawn(async move {
            state_del.clients.delete(&owner_del, &id).await.map(|_| ())
        }));

        let state_add = state.clone();
        let owner_add = owner.clone();
        handles.push(tokio::spawn(async move {
            state_add
                .clients
                .create(&owner_add, payload(1000 + i))
                .await
                .map(|_| ())
        }));
    }

    for handle in handles {
        handle.await.unwrap().unwrap();
    }

    let stored = state.db.get_user(&user_id).await.unwrap().unwrap();
    assert_eq!(stored.clientes.len(), NUM_CONCURRENT_CLIENTS);
    for deleted in seeded.iter().take(NUM_CONCURRENT_CLIENTS / 2) {
        assert!(stored.clientes.iter().all(|c| c.id != deleted.id));
    }
}

fn user_payload(name: &str, email: &str) -> UserPayload {
    UserPayload {
        name: Some(name.to_string()),
        email: Some(email.to_string()),
        password: Some("secret1".to_string()),
        bearer_token: None,
    }
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_creates_claim_an_email_once() {
    let (_, state) = create_test_app();

    let mut handles = vec![];
    for i in 0..8 {
        let state = state.clone();
        handles.push(tokio::spawn(async move {
            state
                .users
                .create(user_payload(&format!("User {}", i), "same@example.com"))
                .await
        }));
    }

    let mut created = 0;
    for handle in handles {
        match handle.await.expect("Task join failed") {
            Ok(_) => created += 1,
            Err(AppError::BadRequest(_)) => {}
            Err(e) => panic!("unexpected error: {e}"),
        }
    }
    assert_eq!(created, 1);

    let users = state.db.list_users().await.unwrap();
    assert_eq!(users.len(), 1);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_patches_claim_an_email_once() {
    let (app, state) = create_test_app();

    let mut ids = Vec::new();
    for i in 0..6 {
        let (id, _) = create_user(&app, "Race", &format!("race{}@example.com", i)).await;
        ids.push(id);
    }

    let mut handles = vec![];
    for id in ids {
        let state = state.clone();
        handles.push(tokio::spawn(async move {
            let patch = UserPayload {
                email: Some("taken@example.com".to_string()),
                ..Default::default()
            };
            state.users.patch(&id, patch).await
        }));
    }

    let mut patched = 0;
    for handle in handles {
        if handle.await.expect("Task join failed").is_ok() {
            patched += 1;
        }
    }
    assert_eq!(patched, 1);

    let owners = state
        .db
        .find_users_by_field("email", "taken@example.com")
        .await
        .unwrap();
    assert_eq!(owners.len(), 1);
}
