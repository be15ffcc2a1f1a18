//! Service tests over the in-memory store
//!
//! ```bash
//! cargo test -p folio-service --test service_tests
//! ```

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use folio_common::{IdentityConfig, IdentityVerifier};
use folio_core::traits::{AdminRepository, CommentRepository};
use folio_core::{
    AdminAllowList, CommentId, DomainError, DomainEvent, EmailAddress, Identity, NewComment,
    ReactionKind, RepoResult, TargetId, UserId, WatchTopic,
};
use folio_db::MemoryStore;
use folio_markup::ArticleBody;
use folio_service::dto::CreateCommentRequest;
use folio_service::{
    AuthorizationService, CommentService, ContentService, ReactionService, ServiceContext,
    ServiceSettings, WatchEvent, WatchEvents, WatchPayload, WatchRegistry, WatchSnapshot,
};
use tokio::time::timeout;

const ADMIN_DOMAIN: &str = "studio.dev";

fn settings() -> ServiceSettings {
    ServiceSettings {
        admin_email_domain: Some(ADMIN_DOMAIN.to_string()),
        reaction_cooldown: Duration::ZERO,
        ..ServiceSettings::default()
    }
}

fn context_with(store: &MemoryStore, settings: ServiceSettings) -> ServiceContext {
    let verifier = IdentityVerifier::new(&IdentityConfig {
        secret: "service-test-secret".to_string(),
        issuer: None,
        audience: None,
        leeway_secs: 0,
    });
    ServiceContext::builder()
        .store(store.clone())
        .identity(Arc::new(verifier))
        .settings(settings)
        .build()
        .unwrap()
}

fn context(store: &MemoryStore) -> ServiceContext {
    context_with(store, settings())
}

fn identity(uid: &str, email: &str, verified: bool) -> Identity {
    Identity {
        uid: UserId::parse(uid).unwrap(),
        display_name: Some(format!("{uid} tester")),
        photo_url: None,
        email: Some(email.to_string()),
        email_verified: verified,
    }
}

fn reader() -> Identity {
    identity("reader", "reader@example.org", true)
}

fn writer() -> Identity {
    identity("writer", "writer@example.org", true)
}

fn domain_admin() -> Identity {
    identity("boss", "boss@studio.dev", true)
}

fn target(id: &str) -> TargetId {
    TargetId::parse(id).unwrap()
}

fn text(text: &str) -> CreateCommentRequest {
    CreateCommentRequest {
        text: text.to_string(),
        parent_id: None,
    }
}

fn reply(text: &str, parent_id: CommentId) -> CreateCommentRequest {
    CreateCommentRequest {
        text: text.to_string(),
        parent_id: Some(parent_id),
    }
}

// ============================================================================
// Authorization
// ============================================================================

#[tokio::test]
async fn test_admin_by_domain_and_allow_list() {
    let store = MemoryStore::new();
    let ctx = context(&store);
    let auth = AuthorizationService::new(&ctx);

    assert!(auth.is_admin(&domain_admin()).await.unwrap());
    assert!(!auth.is_admin(&reader()).await.unwrap());
    // Unverified addresses never count
    assert!(!auth
        .is_admin(&identity("spoof", "spoof@studio.dev", false))
        .await
        .unwrap());

    store
        .add(&EmailAddress::parse("reader@example.org").unwrap())
        .await
        .unwrap();
    assert!(auth.is_admin(&reader()).await.unwrap());
}

#[tokio::test]
async fn test_manage_admins() {
    let store = MemoryStore::new();
    let ctx = context(&store);
    let auth = AuthorizationService::new(&ctx);
    let boss = domain_admin();

    let added = auth.add_admin(&boss, "Reader@Example.org").await.unwrap();
    assert!(added.changed);
    assert_eq!(added.email.as_str(), "reader@example.org");

    let again = auth.add_admin(&boss, "reader@example.org").await.unwrap();
    assert!(!again.changed);

    let listed = auth.list_admins(&boss).await.unwrap();
    assert_eq!(listed.admins.len(), 1);
    assert_eq!(listed.domain_suffix.as_deref(), Some(ADMIN_DOMAIN));

    auth.remove_admin(&boss, "reader@example.org").await.unwrap();
    let err = auth
        .remove_admin(&boss, "reader@example.org")
        .await
        .unwrap_err();
    assert_eq!(err.status_code(), 404);

    let err = auth.add_admin(&boss, "not-an-email").await.unwrap_err();
    assert_eq!(err.status_code(), 400);
}

#[tokio::test]
async fn test_regular_users_cannot_manage_admins() {
    let store = MemoryStore::new();
    let ctx = context(&store);
    let auth = AuthorizationService::new(&ctx);

    let err = auth.list_admins(&reader()).await.unwrap_err();
    assert_eq!(err.status_code(), 403);
    let err = auth
        .add_admin(&reader(), "reader@example.org")
        .await
        .unwrap_err();
    assert_eq!(err.status_code(), 403);
}

#[tokio::test]
async fn test_current_user() {
    let store = MemoryStore::new();
    let ctx = context(&store);
    let auth = AuthorizationService::new(&ctx);

    let me = auth.current_user(&domain_admin()).await.unwrap();
    assert!(me.is_admin);
    assert_eq!(me.initials, "BT");

    let me = auth.current_user(&reader()).await.unwrap();
    assert!(!me.is_admin);
    assert!(me.capabilities.is_empty());
}

// ============================================================================
// Comments
// ============================================================================

#[tokio::test]
async fn test_snapshot_orders_and_windows_threads() {
    let store = MemoryStore::new();
    let ctx = context(&store);
    let comments = CommentService::new(&ctx);
    let article = target("article-1");

    let first = comments
        .create_comment(&article, &writer(), text("first"))
        .await
        .unwrap();
    comments
        .create_comment(&article, &writer(), text("second"))
        .await
        .unwrap();
    comments
        .create_comment(&article, &writer(), text("third"))
        .await
        .unwrap();
    comments
        .create_comment(&article, &reader(), reply("reply one", first.id))
        .await
        .unwrap();
    comments
        .create_comment(&article, &reader(), reply("reply two", first.id))
        .await
        .unwrap();

    // Pinning the oldest moves it to the top
    comments
        .set_pinned(first.id, &domain_admin(), true)
        .await
        .unwrap();

    let snapshot = comments
        .snapshot(&article, None, comments.window(false))
        .await
        .unwrap();
    assert_eq!(snapshot.total, 5);
    assert_eq!(snapshot.hidden, 1);
    assert_eq!(snapshot.threads.len(), 2);
    assert_eq!(snapshot.threads[0].comment.text, "first");
    assert!(snapshot.threads[0].comment.pinned);
    assert_eq!(snapshot.threads[1].comment.text, "third");

    let replies: Vec<&str> = snapshot.threads[0]
        .replies
        .iter()
        .map(|r| r.text.as_str())
        .collect();
    assert_eq!(replies, vec!["reply one", "reply two"]);

    let expanded = comments
        .snapshot(&article, None, comments.window(true))
        .await
        .unwrap();
    assert_eq!(expanded.threads.len(), 3);
    assert_eq!(expanded.hidden, 0);
    assert!(expanded.expanded);
}

#[tokio::test]
async fn test_snapshot_viewer_flags() {
    let store = MemoryStore::new();
    let ctx = context(&store);
    let comments = CommentService::new(&ctx);
    let article = target("article-1");

    comments
        .create_comment(&article, &writer(), text("hello"))
        .await
        .unwrap();

    let anonymous = comments
        .snapshot(&article, None, comments.window(false))
        .await
        .unwrap();
    assert!(!anonymous.viewer.authenticated);
    assert!(!anonymous.threads[0].comment.can_delete);

    let author = comments
        .snapshot(&article, Some(&writer()), comments.window(false))
        .await
        .unwrap();
    assert!(author.threads[0].comment.can_delete);
    assert!(!author.threads[0].comment.can_pin);

    let admin = comments
        .snapshot(&article, Some(&domain_admin()), comments.window(false))
        .await
        .unwrap();
    assert!(admin.viewer.is_admin);
    assert!(admin.threads[0].comment.can_pin);
}

#[tokio::test]
async fn test_comment_validation() {
    let store = MemoryStore::new();
    let ctx = context_with(
        &store,
        ServiceSettings {
            max_comment_length: 10,
            ..settings()
        },
    );
    let comments = CommentService::new(&ctx);
    let article = target("article-1");

    let err = comments
        .create_comment(&article, &writer(), text("   "))
        .await
        .unwrap_err();
    assert_eq!(err.error_code(), "EMPTY_COMMENT");

    let err = comments
        .create_comment(&article, &writer(), text("far too long for ten"))
        .await
        .unwrap_err();
    assert_eq!(err.error_code(), "CONTENT_TOO_LONG");
}

#[tokio::test]
async fn test_replies_are_flat_and_scoped_to_target() {
    let store = MemoryStore::new();
    let ctx = context(&store);
    let comments = CommentService::new(&ctx);
    let article = target("article-1");

    let parent = comments
        .create_comment(&article, &writer(), text("parent"))
        .await
        .unwrap();
    let child = comments
        .create_comment(&article, &reader(), reply("child", parent.id))
        .await
        .unwrap();
    assert_eq!(child.parent_id, Some(parent.id));

    let err = comments
        .create_comment(&article, &reader(), reply("grandchild", child.id))
        .await
        .unwrap_err();
    assert_eq!(err.error_code(), "NESTED_REPLY");

    let err = comments
        .create_comment(&target("article-2"), &reader(), reply("elsewhere", parent.id))
        .await
        .unwrap_err();
    assert_eq!(err.status_code(), 400);

    let err = comments
        .create_comment(&article, &reader(), reply("ghost", CommentId::generate()))
        .await
        .unwrap_err();
    assert_eq!(err.status_code(), 404);
}

#[tokio::test]
async fn test_delete_rules() {
    let store = MemoryStore::new();
    let ctx = context(&store);
    let comments = CommentService::new(&ctx);
    let article = target("article-1");

    let own = comments
        .create_comment(&article, &writer(), text("mine"))
        .await
        .unwrap();
    let other = comments
        .create_comment(&article, &reader(), text("theirs"))
        .await
        .unwrap();

    let err = comments
        .delete_comment(own.id, &writer(), false)
        .await
        .unwrap_err();
    assert_eq!(err.status_code(), 400);

    let err = comments
        .delete_comment(other.id, &writer(), true)
        .await
        .unwrap_err();
    assert_eq!(err.status_code(), 403);

    comments.delete_comment(own.id, &writer(), true).await.unwrap();
    let err = comments
        .delete_comment(own.id, &writer(), true)
        .await
        .unwrap_err();
    assert_eq!(err.status_code(), 404);

    // Admins delete anything
    comments
        .delete_comment(other.id, &domain_admin(), true)
        .await
        .unwrap();
    let snapshot = comments
        .snapshot(&article, None, comments.window(true))
        .await
        .unwrap();
    assert_eq!(snapshot.total, 0);
}

/// Admin list that is always unreachable
struct UnreachableAdmins;

#[async_trait]
impl AdminRepository for UnreachableAdmins {
    async fn load(&self) -> RepoResult<AdminAllowList> {
        Err(DomainError::DatabaseError("admin list unreachable".to_string()))
    }

    async fn add(&self, _email: &EmailAddress) -> RepoResult<bool> {
        Err(DomainError::DatabaseError("admin list unreachable".to_string()))
    }

    async fn remove(&self, _email: &EmailAddress) -> RepoResult<bool> {
        Err(DomainError::DatabaseError("admin list unreachable".to_string()))
    }
}

#[tokio::test]
async fn test_failed_policy_read_writes_nothing() {
    let store = MemoryStore::new();
    let verifier = IdentityVerifier::new(&IdentityConfig {
        secret: "service-test-secret".to_string(),
        issuer: None,
        audience: None,
        leeway_secs: 0,
    });
    let ctx = ServiceContext::builder()
        .store(store.clone())
        .admin_repo(Arc::new(UnreachableAdmins))
        .identity(Arc::new(verifier))
        .settings(settings())
        .build()
        .unwrap();
    let mut feed = ctx.feed().subscribe();
    let comments = CommentService::new(&ctx);

    let err = comments
        .create_comment(&target("article-1"), &writer(), text("retry me"))
        .await
        .unwrap_err();
    assert_eq!(err.status_code(), 500);

    // A retry after the failure must not find a duplicate
    assert_eq!(store.count().await.unwrap(), 0);
    assert!(feed.try_recv().is_err());
}

#[tokio::test]
async fn test_replies_of_deleted_parent_are_hidden() {
    let store = MemoryStore::new();
    let ctx = context(&store);
    let comments = CommentService::new(&ctx);
    let article = target("article-1");

    let parent = comments
        .create_comment(&article, &writer(), text("parent"))
        .await
        .unwrap();
    comments
        .create_comment(&article, &reader(), reply("orphan soon", parent.id))
        .await
        .unwrap();
    comments
        .delete_comment(parent.id, &writer(), true)
        .await
        .unwrap();

    let snapshot = comments
        .snapshot(&article, None, comments.window(true))
        .await
        .unwrap();
    assert!(snapshot.threads.is_empty());
    assert_eq!(snapshot.total, 0);
}

#[tokio::test]
async fn test_pin_rules() {
    let store = MemoryStore::new();
    let ctx = context(&store);
    let comments = CommentService::new(&ctx);
    let article = target("article-1");

    let parent = comments
        .create_comment(&article, &writer(), text("parent"))
        .await
        .unwrap();
    let child = comments
        .create_comment(&article, &reader(), reply("child", parent.id))
        .await
        .unwrap();

    let err = comments
        .set_pinned(parent.id, &writer(), true)
        .await
        .unwrap_err();
    assert_eq!(err.status_code(), 403);

    let err = comments
        .set_pinned(child.id, &domain_admin(), true)
        .await
        .unwrap_err();
    assert_eq!(err.error_code(), "CANNOT_PIN_REPLY");

    let pinned = comments
        .set_pinned(parent.id, &domain_admin(), true)
        .await
        .unwrap();
    assert!(pinned.pinned);
    let unpinned = comments
        .set_pinned(parent.id, &domain_admin(), false)
        .await
        .unwrap();
    assert!(!unpinned.pinned);
}

#[tokio::test]
async fn test_moderation_feed() {
    let store = MemoryStore::new();
    let ctx = context(&store);
    let comments = CommentService::new(&ctx);

    for (i, t) in ["a1", "a2", "a3"].iter().enumerate() {
        comments
            .create_comment(&target(t), &writer(), text(&format!("comment {i}")))
            .await
            .unwrap();
    }

    let feed = comments
        .moderation_feed(&domain_admin(), Some(2))
        .await
        .unwrap();
    assert_eq!(feed.total, 3);
    assert_eq!(feed.comments.len(), 2);
    assert_eq!(feed.comments[0].text, "comment 2");
    assert!(feed.comments.iter().all(|c| c.can_delete));

    let err = comments.moderation_feed(&writer(), None).await.unwrap_err();
    assert_eq!(err.status_code(), 403);
}

#[tokio::test]
async fn test_writes_publish_events() {
    let store = MemoryStore::new();
    let ctx = context(&store);
    let mut events = ctx.feed().subscribe();
    let comments = CommentService::new(&ctx);
    let article = target("article-1");

    let created = comments
        .create_comment(&article, &writer(), text("hello"))
        .await
        .unwrap();
    match events.recv().await.unwrap() {
        DomainEvent::CommentCreated(e) => {
            assert_eq!(e.comment_id, created.id);
            assert_eq!(e.target_id, article);
        }
        other => panic!("unexpected event: {other:?}"),
    }

    comments
        .delete_comment(created.id, &writer(), true)
        .await
        .unwrap();
    assert_eq!(events.recv().await.unwrap().event_type(), "COMMENT_DELETED");
}

// ============================================================================
// Reactions
// ============================================================================

#[tokio::test]
async fn test_reaction_requires_identity() {
    let store = MemoryStore::new();
    let ctx = context(&store);
    let reactions = ReactionService::new(&ctx);
    let article = target("article-1");

    let err = reactions
        .apply_reaction(&article, None, ReactionKind::Like)
        .await
        .unwrap_err();
    assert_eq!(err.status_code(), 401);

    let state = reactions.state(&article, None).await.unwrap();
    assert_eq!(state.counts.total, 0);
}

#[tokio::test]
async fn test_reaction_toggle_round_trip() {
    let store = MemoryStore::new();
    let ctx = context(&store);
    let reactions = ReactionService::new(&ctx);
    let article = target("article-1");
    let user = reader();

    let liked = reactions
        .apply_reaction(&article, Some(&user), ReactionKind::Like)
        .await
        .unwrap();
    assert!(liked.applied);
    assert_eq!(liked.state.counts.like, 1);
    assert_eq!(liked.state.viewer_choice, Some(ReactionKind::Like));

    let cleared = reactions
        .apply_reaction(&article, Some(&user), ReactionKind::Like)
        .await
        .unwrap();
    assert_eq!(cleared.state.counts.like, 0);
    assert_eq!(cleared.state.viewer_choice, None);
}

#[tokio::test]
async fn test_reaction_switch_conserves_total() {
    let store = MemoryStore::new();
    let ctx = context(&store);
    let reactions = ReactionService::new(&ctx);
    let article = target("article-1");
    let user = reader();

    reactions
        .apply_reaction(&article, Some(&user), ReactionKind::Like)
        .await
        .unwrap();
    reactions
        .apply_reaction(&article, Some(&writer()), ReactionKind::Like)
        .await
        .unwrap();
    let switched = reactions
        .apply_reaction(&article, Some(&user), ReactionKind::Heart)
        .await
        .unwrap();

    assert_eq!(switched.state.counts.like, 1);
    assert_eq!(switched.state.counts.heart, 1);
    assert_eq!(switched.state.counts.total, 2);
    assert_eq!(switched.state.viewer_choice, Some(ReactionKind::Heart));

    let seen_by_writer = reactions.state(&article, Some(&writer())).await.unwrap();
    assert_eq!(seen_by_writer.viewer_choice, Some(ReactionKind::Like));
}

#[tokio::test]
async fn test_reaction_cooldown_absorbs_repeat_clicks() {
    let store = MemoryStore::new();
    let ctx = context_with(
        &store,
        ServiceSettings {
            reaction_cooldown: Duration::from_secs(30),
            ..settings()
        },
    );
    let reactions = ReactionService::new(&ctx);
    let article = target("article-1");
    let user = reader();

    let first = reactions
        .apply_reaction(&article, Some(&user), ReactionKind::Dislike)
        .await
        .unwrap();
    assert!(first.applied);

    let repeat = reactions
        .apply_reaction(&article, Some(&user), ReactionKind::Dislike)
        .await
        .unwrap();
    assert!(!repeat.applied);
    assert_eq!(repeat.state.counts.dislike, 1);
    assert_eq!(repeat.state.viewer_choice, Some(ReactionKind::Dislike));

    // Other users are not affected
    let other = reactions
        .apply_reaction(&article, Some(&writer()), ReactionKind::Dislike)
        .await
        .unwrap();
    assert!(other.applied);
    assert_eq!(other.state.counts.dislike, 2);
}

// ============================================================================
// Content
// ============================================================================

#[tokio::test]
async fn test_render_lists_invites() {
    let store = MemoryStore::new();
    let ctx = context(&store);
    let content = ContentService::new(&ctx);

    let rendered = content.render(&ArticleBody {
        content: Some("Join us: https://discord.gg/abc123\n\n(strong)Bold(/strong)".to_string()),
        topics: None,
    });
    assert!(rendered.html.contains("<strong>Bold</strong>"));
    assert_eq!(rendered.invites.len(), 1);
    assert_eq!(rendered.invites[0].code, "abc123");

    // Lookups are disabled in this context
    let err = content.invite("abc123").await.unwrap_err();
    assert_eq!(err.status_code(), 404);
}

// ============================================================================
// Watches
// ============================================================================

async fn next_event(events: &mut WatchEvents) -> WatchEvent {
    timeout(Duration::from_secs(5), events.recv())
        .await
        .expect("watch event in time")
        .expect("watch stream open")
}

fn comments_of(event: &WatchEvent) -> &folio_service::dto::CommentsSnapshot {
    match &event.payload {
        WatchPayload::Snapshot {
            snapshot: WatchSnapshot::Comments(snapshot),
        } => snapshot,
        other => panic!("expected comments snapshot, got {other:?}"),
    }
}

#[tokio::test]
async fn test_watch_delivers_initial_and_updated_snapshots() {
    let store = MemoryStore::new();
    let ctx = context(&store);
    let article = target("article-1");
    let (mut registry, mut events) = WatchRegistry::new(ctx.clone(), None);

    let generation = registry.watch(
        "comments-main",
        WatchTopic::Comments {
            target_id: article.clone(),
        },
    );
    let initial = next_event(&mut events).await;
    assert_eq!(initial.container_id, "comments-main");
    assert_eq!(initial.generation, generation);
    assert_eq!(comments_of(&initial).total, 0);

    CommentService::new(&ctx)
        .create_comment(&article, &writer(), text("live"))
        .await
        .unwrap();
    let updated = next_event(&mut events).await;
    assert_eq!(comments_of(&updated).total, 1);
    assert_eq!(comments_of(&updated).threads[0].comment.text, "live");
}

#[tokio::test]
async fn test_rewatch_releases_previous_generation() {
    let store = MemoryStore::new();
    let ctx = context(&store);
    let comments = CommentService::new(&ctx);
    let (mut registry, mut events) = WatchRegistry::new(ctx.clone(), None);

    let first = registry.watch(
        "box",
        WatchTopic::Comments {
            target_id: target("a1"),
        },
    );
    next_event(&mut events).await;

    let second = registry.watch(
        "box",
        WatchTopic::Comments {
            target_id: target("a2"),
        },
    );
    assert!(second > first);
    assert_eq!(registry.generation("box"), Some(second));
    let initial = next_event(&mut events).await;
    assert_eq!(initial.generation, second);

    comments
        .create_comment(&target("a1"), &writer(), text("old target"))
        .await
        .unwrap();
    comments
        .create_comment(&target("a2"), &writer(), text("new target"))
        .await
        .unwrap();

    let update = next_event(&mut events).await;
    assert_eq!(update.generation, second);
    assert_eq!(comments_of(&update).target_id, target("a2"));
    assert_eq!(comments_of(&update).total, 1);
}

#[tokio::test]
async fn test_resync_reloads_every_watch() {
    let store = MemoryStore::new();
    let ctx = context(&store);
    let article = target("article-1");
    let (mut registry, mut events) = WatchRegistry::new(ctx.clone(), None);

    registry.watch(
        "comments",
        WatchTopic::Comments {
            target_id: article.clone(),
        },
    );
    registry.watch(
        "reactions",
        WatchTopic::Reactions {
            target_id: article.clone(),
        },
    );
    next_event(&mut events).await;
    next_event(&mut events).await;

    // Written behind the feed's back, as if the event had been dropped
    store
        .create(&NewComment::top_level(article.clone(), &writer(), "missed", 2000).unwrap())
        .await
        .unwrap();
    ctx.feed().request_resync();

    let mut reloaded = Vec::new();
    for _ in 0..2 {
        let event = next_event(&mut events).await;
        if event.container_id == "comments" {
            assert_eq!(comments_of(&event).total, 1);
        }
        reloaded.push(event.container_id);
    }
    reloaded.sort();
    assert_eq!(reloaded, vec!["comments", "reactions"]);
}

#[tokio::test]
async fn test_unwatch_stops_deliveries() {
    let store = MemoryStore::new();
    let ctx = context(&store);
    let article = target("article-1");
    let (mut registry, mut events) = WatchRegistry::new(ctx.clone(), None);

    registry.watch(
        "box",
        WatchTopic::Comments {
            target_id: article.clone(),
        },
    );
    next_event(&mut events).await;

    assert!(registry.unwatch("box"));
    assert!(!registry.unwatch("box"));
    assert!(registry.active().is_empty());

    CommentService::new(&ctx)
        .create_comment(&article, &writer(), text("unseen"))
        .await
        .unwrap();
    assert!(timeout(Duration::from_millis(200), events.recv())
        .await
        .is_err());
}

#[tokio::test]
async fn test_expand_and_identify_reload() {
    let store = MemoryStore::new();
    let ctx = context(&store);
    let article = target("article-1");
    let comments = CommentService::new(&ctx);
    for body in ["one", "two", "three"] {
        comments
            .create_comment(&article, &writer(), text(body))
            .await
            .unwrap();
    }

    let (mut registry, mut events) = WatchRegistry::new(ctx.clone(), None);
    registry.watch(
        "box",
        WatchTopic::Comments {
            target_id: article.clone(),
        },
    );
    let initial = next_event(&mut events).await;
    assert_eq!(comments_of(&initial).hidden, 1);
    assert!(!comments_of(&initial).viewer.authenticated);

    assert!(registry.set_expanded("box", true));
    let expanded = next_event(&mut events).await;
    assert_eq!(comments_of(&expanded).hidden, 0);
    assert_eq!(comments_of(&expanded).threads.len(), 3);

    registry.identify(Some(writer()));
    let signed_in = next_event(&mut events).await;
    assert!(comments_of(&signed_in).viewer.authenticated);
    assert!(comments_of(&signed_in).threads[0].comment.can_delete);

    assert!(!registry.set_expanded("unknown", true));
}

#[tokio::test]
async fn test_watch_reactions() {
    let store = MemoryStore::new();
    let ctx = context(&store);
    let article = target("article-1");
    let (mut registry, mut events) = WatchRegistry::new(ctx.clone(), Some(reader()));

    registry.watch(
        "reactions",
        WatchTopic::Reactions {
            target_id: article.clone(),
        },
    );
    next_event(&mut events).await;

    ReactionService::new(&ctx)
        .apply_reaction(&article, Some(&reader()), ReactionKind::Heart)
        .await
        .unwrap();

    let update = next_event(&mut events).await;
    match update.payload {
        WatchPayload::Snapshot {
            snapshot: WatchSnapshot::Reactions(state),
        } => {
            assert_eq!(state.counts.heart, 1);
            assert_eq!(state.viewer_choice, Some(ReactionKind::Heart));
        }
        other => panic!("expected reactions snapshot, got {other:?}"),
    }
}

#[tokio::test]
async fn test_failed_load_reports_only_that_container() {
    let store = MemoryStore::new();
    let ctx = context(&store);
    let (mut registry, mut events) = WatchRegistry::new(ctx.clone(), None);

    store.set_unavailable(true);
    registry.watch(
        "broken",
        WatchTopic::Comments {
            target_id: target("a1"),
        },
    );
    let failed = next_event(&mut events).await;
    assert_eq!(failed.container_id, "broken");
    match failed.payload {
        WatchPayload::Failed { code, .. } => assert_eq!(code, "DATABASE_ERROR"),
        other => panic!("expected failure, got {other:?}"),
    }

    store.set_unavailable(false);
    registry.watch(
        "healthy",
        WatchTopic::Reactions {
            target_id: target("a1"),
        },
    );
    let ok = next_event(&mut events).await;
    assert_eq!(ok.container_id, "healthy");
    assert!(matches!(ok.payload, WatchPayload::Snapshot { .. }));
}

#[tokio::test]
async fn test_watch_event_serialization() {
    let store = MemoryStore::new();
    let ctx = context(&store);
    let (mut registry, mut events) = WatchRegistry::new(ctx, None);

    registry.watch(
        "box",
        WatchTopic::Reactions {
            target_id: target("a1"),
        },
    );
    let event = next_event(&mut events).await;
    let json = serde_json::to_value(&event).unwrap();
    assert_eq!(json["type"], "snapshot");
    assert_eq!(json["container_id"], "box");
    assert_eq!(json["snapshot"]["topic"], "reactions");
    assert_eq!(json["snapshot"]["data"]["counts"]["total"], 0);
}
