//! End-to-end tests through the application context
//!
//! Accounts, sessions and the forms/editors handed out for whoever is
//! signed in, with both access modes.

use std::sync::Arc;

use afterwish::auth::{
    LocalIdentityProvider, MemoryNotifier, MemoryUserDirectory, Notice, SessionProvider,
};
use afterwish::collection::{EditorError, PrivateCategory, SubscriptionDraft};
use afterwish::db::MemoryStore;
use afterwish::forms::FormError;
use afterwish::records::AccessMode;
use afterwish::status::OperationStatus;
use afterwish::types::{AuthError, StoreError};
use afterwish::AppContext;
use futures::StreamExt;
use serde_json::json;

fn context(mode: AccessMode) -> (AppContext, Arc<LocalIdentityProvider>, Arc<MemoryNotifier>) {
    let notifier = Arc::new(MemoryNotifier::new());
    let provider = Arc::new(LocalIdentityProvider::new(
        Arc::new(MemoryUserDirectory::new()),
        notifier.clone(),
    ));
    let ctx = AppContext::new(
        Arc::new(MemoryStore::new()),
        SessionProvider::new(provider.clone()),
        mode,
    );
    (ctx, provider, notifier)
}

// =============================================================================
// Accounts
// =============================================================================

#[tokio::test]
async fn test_sign_up_verify_and_sign_back_in() {
    let (ctx, provider, notifier) = context(AccessMode::Lenient);

    let created = ctx.session().sign_up("anna@example.nl", "geheim123").await.unwrap();
    assert_eq!(ctx.session().current(), Some(created.clone()));

    let sent = notifier.sent().await;
    let [Notice::VerifyEmail { code, .. }] = sent.as_slice() else {
        panic!("expected one verification notice, got {:?}", sent);
    };
    provider.confirm_email("anna@example.nl", code).await.unwrap();
    assert_eq!(
        provider.confirm_email("anna@example.nl", code).await,
        Err(AuthError::InvalidActionCode)
    );

    ctx.session().sign_out().await.unwrap();
    assert!(ctx.session().current().is_none());

    let again = ctx.session().sign_in("anna@example.nl", "geheim123").await.unwrap();
    assert_eq!(again.uid, created.uid);
}

#[tokio::test]
async fn test_password_reset_flow() {
    let (ctx, provider, notifier) = context(AccessMode::Lenient);
    ctx.session().sign_up("anna@example.nl", "geheim123").await.unwrap();
    ctx.session().sign_out().await.unwrap();

    ctx.session().request_password_reset("anna@example.nl").await.unwrap();
    let code = match notifier.sent().await.last() {
        Some(Notice::PasswordReset { code, .. }) => code.clone(),
        other => panic!("expected a reset notice, got {:?}", other),
    };

    assert_eq!(
        provider.complete_password_reset("anna@example.nl", &code, "kort").await,
        Err(AuthError::WeakPassword(6))
    );
    provider
        .complete_password_reset("anna@example.nl", &code, "nieuwgeheim")
        .await
        .unwrap();

    assert_eq!(
        ctx.session().sign_in("anna@example.nl", "geheim123").await,
        Err(AuthError::InvalidCredential)
    );
    ctx.session().sign_in("anna@example.nl", "nieuwgeheim").await.unwrap();
}

#[tokio::test]
async fn test_failed_sign_in_leaves_session_empty() {
    let (ctx, _, _) = context(AccessMode::Lenient);

    let err = ctx.session().sign_in("niemand@example.nl", "geheim123").await.unwrap_err();
    assert_eq!(err, AuthError::InvalidCredential);
    assert!(ctx.session().current().is_none());

    let status = ctx.session().status();
    assert!(!status.in_flight);
    assert_eq!(status.last_error.as_deref(), Some(err.to_string().as_str()));
}

#[tokio::test]
async fn test_status_channel_reports_each_attempt() {
    let (ctx, _, _) = context(AccessMode::Lenient);
    let mut status = ctx.session().subscribe_status();

    ctx.session().sign_in("anna@example.nl", "geheim123").await.unwrap_err();
    status.changed().await.unwrap();
    assert_eq!(
        *status.borrow_and_update(),
        OperationStatus {
            in_flight: false,
            last_error: Some(AuthError::InvalidCredential.to_string()),
        }
    );

    ctx.session().sign_up("anna@example.nl", "geheim123").await.unwrap();
    status.changed().await.unwrap();
    assert_eq!(*status.borrow_and_update(), OperationStatus::default());
}

#[tokio::test]
async fn test_observe_follows_sign_in_and_out() {
    let (ctx, _, _) = context(AccessMode::Lenient);
    let mut states = Box::pin(ctx.session().observe());

    assert_eq!(states.next().await, Some(None));

    let anna = ctx.session().sign_up("anna@example.nl", "geheim123").await.unwrap();
    assert_eq!(states.next().await, Some(Some(anna)));

    ctx.session().sign_out().await.unwrap();
    assert_eq!(states.next().await, Some(None));
}

// =============================================================================
// Records through the context
// =============================================================================

#[tokio::test]
async fn test_records_follow_the_signed_in_identity() {
    let (ctx, _, _) = context(AccessMode::Lenient);
    ctx.session().sign_up("anna@example.nl", "geheim123").await.unwrap();

    let mut wishes = ctx.wish_list_form();
    wishes.mount().await;
    wishes.set("overlijdensbericht", json!(false)).unwrap();
    wishes.set("doodskist", json!("karton")).unwrap();
    wishes.set("laatsteVerzorging", json!("uitvaartcentrum")).unwrap();
    wishes.set("soortUitvaart", json!("cremeren")).unwrap();
    assert!(wishes.submit().await.unwrap().is_some());

    let mut subscriptions = ctx.private_subscriptions();
    subscriptions.mount().await.unwrap();
    subscriptions
        .add(SubscriptionDraft::new(PrivateCategory::Communicatie, "Netflix", "Netflix"))
        .await
        .unwrap();

    // Someone else signs in and sees none of it
    ctx.session().sign_out().await.unwrap();
    ctx.session().sign_up("bram@example.nl", "geheim456").await.unwrap();

    let mut other_wishes = ctx.wish_list_form();
    other_wishes.mount().await;
    assert_eq!(other_wishes.value("doodskist"), Some(&json!("")));

    let mut other_subscriptions = ctx.private_subscriptions();
    other_subscriptions.mount().await.unwrap();
    assert!(other_subscriptions.entries().is_empty());

    // And the first account still has its records
    ctx.session().sign_out().await.unwrap();
    ctx.session().sign_in("anna@example.nl", "geheim123").await.unwrap();
    let mut again = ctx.wish_list_form();
    again.mount().await;
    assert_eq!(again.value("doodskist"), Some(&json!("karton")));
    let mut again_subscriptions = ctx.private_subscriptions();
    again_subscriptions.mount().await.unwrap();
    assert_eq!(again_subscriptions.entries().len(), 1);
}

#[tokio::test]
async fn test_lenient_mode_skips_calls_without_identity() {
    let ctx = AppContext::in_memory(AccessMode::Lenient);

    let mut form = ctx.practical_info_form();
    form.mount().await;
    assert!(form.last_error().is_none());
    assert_eq!(form.value("land"), Some(&json!("Nederland")));

    let mut editor = ctx.business_subscriptions();
    assert!(editor.mount().await.is_ok());
    assert!(editor.entries().is_empty());
}

#[tokio::test]
async fn test_strict_mode_refuses_calls_without_identity() {
    let ctx = AppContext::in_memory(AccessMode::Strict);

    let mut form = ctx.practical_info_form();
    form.mount().await;
    assert!(form.last_error().is_some());

    let mut editor = ctx.private_subscriptions();
    assert!(matches!(
        editor.mount().await,
        Err(EditorError::Store(StoreError::Unauthenticated))
    ));

    let mut wishes = ctx.wish_list_form();
    wishes.set("doodskist", json!("eiken")).unwrap();
    wishes.set("laatsteVerzorging", json!("thuis")).unwrap();
    wishes.set("soortUitvaart", json!("cremeren")).unwrap();
    assert!(matches!(
        wishes.submit().await,
        Err(FormError::Store(StoreError::Unauthenticated))
    ));
}
