mod common;

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::Notify;

use game_core::{CombatSession, ErrorKind, GameError, RewardClaim, SessionId};
use runtime::{
    CombatRuntime, InMemorySessionRepo, ProviderError, RepositoryError, RewardGrant,
    RewardProvider, RuntimeConfig, RuntimeError, SessionRepository,
};

use common::{config, oracles, runtime_with_rewards, won_session};

/// Blocks inside `grant` until released.
#[derive(Default)]
struct GatedProvider {
    entered: Notify,
    release: Notify,
}

#[async_trait]
impl RewardProvider for GatedProvider {
    async fn grant(&self, _claim: &RewardClaim) -> Result<RewardGrant, ProviderError> {
        self.entered.notify_one();
        self.release.notified().await;
        Ok(RewardGrant {
            gold: 10,
            ..RewardGrant::default()
        })
    }
}

/// Stalls on the first call, answers immediately afterwards.
#[derive(Default)]
struct SlowOnceProvider {
    calls: AtomicUsize,
}

#[async_trait]
impl RewardProvider for SlowOnceProvider {
    async fn grant(&self, claim: &RewardClaim) -> Result<RewardGrant, ProviderError> {
        if self.calls.fetch_add(1, Ordering::SeqCst) == 0 {
            tokio::time::sleep(Duration::from_secs(5)).await;
        }
        Ok(RewardGrant {
            gold: 5,
            experience: u64::from(claim.turns),
            ..RewardGrant::default()
        })
    }
}

struct OfflineProvider;

#[async_trait]
impl RewardProvider for OfflineProvider {
    async fn grant(&self, _claim: &RewardClaim) -> Result<RewardGrant, ProviderError> {
        Err(ProviderError::Unavailable("economy service offline".into()))
    }
}

#[tokio::test]
async fn a_full_session_queue_reports_conflict() {
    let provider = Arc::new(GatedProvider::default());
    let runtime = runtime_with_rewards(
        RuntimeConfig {
            session_queue_depth: 1,
            ..config()
        },
        provider.clone(),
    )
    .await;
    let handle = runtime.handle();
    let id = won_session(&handle).await;

    let completing = tokio::spawn({
        let handle = handle.clone();
        async move { handle.complete_combat(id).await }
    });
    provider.entered.notified().await;

    // Fills the single queue slot while the worker is inside the provider.
    let queued = tokio::spawn({
        let handle = handle.clone();
        async move { handle.cancel_combat(id).await }
    });
    tokio::time::sleep(Duration::from_millis(50)).await;

    let busy = handle.cancel_combat(id).await.unwrap_err();
    assert!(matches!(busy, RuntimeError::SessionBusy(session) if session == id));
    assert_eq!(busy.kind(), ErrorKind::Conflict);

    provider.release.notify_one();
    let completion = completing.await.unwrap().unwrap();
    assert_eq!(completion.gold_earned, 10);

    let cancel = queued.await.unwrap().unwrap_err();
    assert_eq!(cancel.kind(), ErrorKind::InvalidState);
}

#[tokio::test]
async fn a_provider_timeout_leaves_rewards_unclaimed() {
    let provider = Arc::new(SlowOnceProvider::default());
    let runtime = runtime_with_rewards(
        RuntimeConfig {
            provider_timeout: Duration::from_millis(50),
            ..config()
        },
        provider.clone(),
    )
    .await;
    let handle = runtime.handle();
    let id = won_session(&handle).await;
    let before = handle.session(id).unwrap();

    let err = handle.complete_combat(id).await.unwrap_err();
    assert!(matches!(err, RuntimeError::ProviderTimeout(_)));
    assert_eq!(err.kind(), ErrorKind::Internal);
    assert!(err.kind().is_retryable());
    assert_eq!(handle.session(id).unwrap(), before);

    let retried = handle.complete_combat(id).await.unwrap();
    assert_eq!(retried.gold_earned, 5);
    assert_eq!(retried.experience_earned, u64::from(before.turn_number));
    assert!(retried.session.rewards_claimed);
    assert_eq!(provider.calls.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn a_failing_provider_is_an_internal_error() {
    let runtime = runtime_with_rewards(config(), Arc::new(OfflineProvider)).await;
    let handle = runtime.handle();
    let id = won_session(&handle).await;
    let log_len = handle.combat_log(id).unwrap().len();

    let err = handle.complete_combat(id).await.unwrap_err();
    assert!(matches!(err, RuntimeError::Provider(ProviderError::Unavailable(_))));
    assert_eq!(err.kind(), ErrorKind::Internal);

    let session = handle.session(id).unwrap();
    assert!(!session.rewards_claimed);
    assert!(!session.archived);
    assert_eq!(handle.combat_log(id).unwrap().len(), log_len);
}

/// Counts grants and pays a fixed purse.
#[derive(Default)]
struct CountingProvider {
    grants: AtomicUsize,
}

#[async_trait]
impl RewardProvider for CountingProvider {
    async fn grant(&self, _claim: &RewardClaim) -> Result<RewardGrant, ProviderError> {
        self.grants.fetch_add(1, Ordering::SeqCst);
        Ok(RewardGrant {
            gold: 25,
            ..RewardGrant::default()
        })
    }
}

/// In-memory sessions whose first save of a claimed session fails.
#[derive(Default)]
struct LossyClaimStore {
    inner: InMemorySessionRepo,
    failed: AtomicUsize,
}

impl SessionRepository for LossyClaimStore {
    fn save(&self, session: &CombatSession) -> runtime::repository::Result<()> {
        if session.rewards_claimed && self.failed.fetch_add(1, Ordering::SeqCst) == 0 {
            return Err(RepositoryError::Io(std::io::Error::other("disk full")));
        }
        self.inner.save(session)
    }

    fn load(&self, id: SessionId) -> runtime::repository::Result<Option<CombatSession>> {
        self.inner.load(id)
    }

    fn exists(&self, id: SessionId) -> bool {
        self.inner.exists(id)
    }

    fn delete(&self, id: SessionId) -> runtime::repository::Result<()> {
        self.inner.delete(id)
    }

    fn list_ids(&self) -> runtime::repository::Result<Vec<SessionId>> {
        self.inner.list_ids()
    }
}

#[tokio::test]
async fn a_lost_claim_save_grants_nothing_and_can_be_retried() {
    let provider = Arc::new(CountingProvider::default());
    let runtime = CombatRuntime::builder()
        .config(config())
        .oracles(oracles())
        .session_repository(Arc::new(LossyClaimStore::default()))
        .reward_provider(provider.clone())
        .build()
        .await
        .unwrap();
    let handle = runtime.handle();
    let id = won_session(&handle).await;
    let log_len = handle.combat_log(id).unwrap().len();

    let err = handle.complete_combat(id).await.unwrap_err();
    assert!(matches!(err, RuntimeError::Repository(RepositoryError::Io(_))));
    assert_eq!(provider.grants.load(Ordering::SeqCst), 0);
    assert!(!handle.session(id).unwrap().rewards_claimed);
    assert_eq!(handle.combat_log(id).unwrap().len(), log_len);

    let completion = handle.complete_combat(id).await.unwrap();
    assert_eq!(completion.gold_earned, 25);
    assert_eq!(provider.grants.load(Ordering::SeqCst), 1);
    assert_eq!(handle.combat_log(id).unwrap().len(), log_len + 1);

    let again = handle.complete_combat(id).await.unwrap_err();
    assert_eq!(again.kind(), ErrorKind::Conflict);
    assert_eq!(provider.grants.load(Ordering::SeqCst), 1);
}
