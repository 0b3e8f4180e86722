//! Ownership ledger: the per-user index of owned posts.
//!
//! Each post records its owner; each user records the identifiers of the
//! posts it owns. The post's `owner` field is authoritative. The per-user set
//! is a convenience index that the mutation protocol keeps in step and that
//! [`OwnershipReconciler`] can rebuild when a write was lost.
//!
//! The set has set semantics: attaching an identifier twice stores it once.

use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;

use tracing::{info, warn};

use crate::domain::persistence_errors::{map_ledger_error, map_post_error, map_user_error};
use crate::domain::ports::{OwnershipLedger, PostRepository, UserRepository};
use crate::domain::{Error, PostId, UserId};

/// Identifiers of the posts one user owns.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OwnedPosts(BTreeSet<PostId>);

impl OwnedPosts {
    /// Add `post_id`. Returns `false` when it was already present.
    pub fn attach(&mut self, post_id: PostId) -> bool {
        self.0.insert(post_id)
    }

    /// Remove `post_id`. Returns `false` when it was absent.
    pub fn detach(&mut self, post_id: &PostId) -> bool {
        self.0.remove(post_id)
    }

    /// Replace `old` with `new`, guaranteeing membership of `new` afterwards.
    ///
    /// With `old == new` this re-attaches an identifier a lagging index lost.
    pub fn reconcile(&mut self, old: &PostId, new: PostId) {
        self.0.remove(old);
        self.0.insert(new);
    }

    pub fn contains(&self, post_id: &PostId) -> bool {
        self.0.contains(post_id)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &PostId> {
        self.0.iter()
    }
}

impl FromIterator<PostId> for OwnedPosts {
    fn from_iter<T: IntoIterator<Item = PostId>>(iter: T) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl<'a> IntoIterator for &'a OwnedPosts {
    type Item = &'a PostId;
    type IntoIter = std::collections::btree_set::Iter<'a, PostId>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

/// Outcome of a repair pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReconcileReport {
    /// Users whose index was inspected.
    pub users_scanned: usize,
    /// Users whose index differed from the post collection and was repaired.
    pub users_repaired: usize,
    /// Identifiers added to an index.
    pub entries_attached: usize,
    /// Identifiers removed from an index.
    pub entries_detached: usize,
}

/// Rebuilds every user's owned-post index from the posts' owner fields.
#[derive(Clone)]
pub struct OwnershipReconciler<U, P, L> {
    users: Arc<U>,
    posts: Arc<P>,
    ledger: Arc<L>,
}

impl<U, P, L> OwnershipReconciler<U, P, L> {
    pub fn new(users: Arc<U>, posts: Arc<P>, ledger: Arc<L>) -> Self {
        Self {
            users,
            posts,
            ledger,
        }
    }
}

impl<U, P, L> OwnershipReconciler<U, P, L>
where
    U: UserRepository,
    P: PostRepository,
    L: OwnershipLedger,
{
    /// Compare each user's index with the authoritative owner fields and
    /// repair the ones that diverge.
    ///
    /// Repairs go through `attach` and `detach` for the differing entries
    /// only, so an index write that a live server lands during the pass is
    /// never overwritten. Users are read before posts: a post created after
    /// the user snapshot is absent from both and left untouched. A post
    /// deleted after the post snapshot may be re-attached; the next pass
    /// clears it.
    ///
    /// Posts whose owner no longer exists are logged and left alone.
    pub async fn run(&self) -> Result<ReconcileReport, Error> {
        let users = self.users.list().await.map_err(map_user_error)?;
        let posts = self.posts.list().await.map_err(map_post_error)?;

        let mut expected: BTreeMap<UserId, OwnedPosts> = BTreeMap::new();
        for post in &posts {
            expected
                .entry(post.owner().clone())
                .or_default()
                .attach(post.id());
        }

        let mut report = ReconcileReport::default();
        for user in &users {
            report.users_scanned += 1;
            let wanted = expected.remove(user.id()).unwrap_or_default();
            if &wanted == user.posts() {
                continue;
            }
            let indexed = user.posts();
            let missing: Vec<&PostId> = wanted.iter().filter(|id| !indexed.contains(id)).collect();
            let stale: Vec<&PostId> = indexed.iter().filter(|id| !wanted.contains(id)).collect();
            warn!(
                user_id = %user.id(),
                missing = missing.len(),
                stale = stale.len(),
                "owned-post index diverged; repairing"
            );
            for post_id in missing {
                self.ledger
                    .attach(user.id(), post_id)
                    .await
                    .map_err(map_ledger_error)?;
                report.entries_attached += 1;
            }
            for post_id in stale {
                self.ledger
                    .detach(user.id(), post_id)
                    .await
                    .map_err(map_ledger_error)?;
                report.entries_detached += 1;
            }
            report.users_repaired += 1;
        }

        for (owner, orphaned) in expected {
            warn!(
                user_id = %owner,
                posts = orphaned.len(),
                "posts reference an unknown owner"
            );
        }

        info!(
            users_scanned = report.users_scanned,
            users_repaired = report.users_repaired,
            entries_attached = report.entries_attached,
            entries_detached = report.entries_detached,
            "ownership reconciliation finished"
        );
        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;
    use crate::domain::ports::{
        MockOwnershipLedger, MockPostRepository, MockUserRepository, UserPersistenceError,
    };
    use crate::domain::{PasswordHash, Post, PostDraft, User, Username};
    use rstest::rstest;

    fn user(name: &str, posts: OwnedPosts) -> User {
        User::new(
            UserId::random(),
            Username::new(name).expect("username"),
            name,
            PasswordHash::new("hash").expect("hash"),
        )
        .with_posts(posts)
    }

    fn post(owner: &UserId) -> Post {
        let draft = PostDraft::try_new(Some("t"), None, Some("u"), None).expect("draft");
        Post::from_draft(PostId::random(), owner.clone(), draft)
    }

    #[rstest]
    fn attach_has_set_semantics() {
        let mut owned = OwnedPosts::default();
        let id = PostId::random();
        assert!(owned.attach(id));
        assert!(!owned.attach(id));
        assert_eq!(owned.len(), 1);
    }

    #[rstest]
    fn detach_is_a_no_op_when_absent() {
        let mut owned = OwnedPosts::default();
        assert!(!owned.detach(&PostId::random()));
        assert!(owned.is_empty());
    }

    #[rstest]
    fn reconcile_with_same_id_restores_membership() {
        let mut owned = OwnedPosts::default();
        let id = PostId::random();
        owned.reconcile(&id, id);
        assert!(owned.contains(&id));
        owned.reconcile(&id, id);
        assert_eq!(owned.len(), 1);
    }

    #[rstest]
    fn reconcile_swaps_identifiers() {
        let old = PostId::random();
        let new = PostId::random();
        let mut owned: OwnedPosts = [old].into_iter().collect();
        owned.reconcile(&old, new);
        assert!(!owned.contains(&old));
        assert!(owned.contains(&new));
    }

    #[tokio::test]
    async fn reconciler_rewrites_only_divergent_indexes() {
        let lagging = user("lagging", OwnedPosts::default());
        let lagging_post = post(lagging.id());
        let consistent_post_owner = UserId::random();
        let consistent_post = post(&consistent_post_owner);
        let consistent = User::new(
            consistent_post_owner.clone(),
            Username::new("steady").expect("username"),
            "steady",
            PasswordHash::new("hash").expect("hash"),
        )
        .with_posts([consistent_post.id()].into_iter().collect());

        let lagging_id = lagging.id().clone();
        let expected_post = lagging_post.id();

        let mut users = MockUserRepository::new();
        users
            .expect_list()
            .times(1)
            .return_once(move || Ok(vec![lagging, consistent]));
        let mut posts = MockPostRepository::new();
        posts
            .expect_list()
            .times(1)
            .return_once(move || Ok(vec![lagging_post, consistent_post]));
        let mut ledger = MockOwnershipLedger::new();
        ledger
            .expect_attach()
            .withf(move |user_id, post_id| user_id == &lagging_id && post_id == &expected_post)
            .times(1)
            .return_once(|_, _| Ok(()));
        ledger.expect_detach().never();

        let reconciler = OwnershipReconciler::new(Arc::new(users), Arc::new(posts), Arc::new(ledger));
        let report = reconciler.run().await.expect("reconcile succeeds");

        assert_eq!(
            report,
            ReconcileReport {
                users_scanned: 2,
                users_repaired: 1,
                entries_attached: 1,
                entries_detached: 0,
            }
        );
    }

    #[tokio::test]
    async fn reconciler_clears_stale_entries() {
        let stale_post = PostId::random();
        let stale = user("stale", [stale_post].into_iter().collect());
        let stale_id = stale.id().clone();

        let mut users = MockUserRepository::new();
        users.expect_list().return_once(move || Ok(vec![stale]));
        let mut posts = MockPostRepository::new();
        posts.expect_list().return_once(|| Ok(Vec::new()));
        let mut ledger = MockOwnershipLedger::new();
        ledger
            .expect_detach()
            .withf(move |user_id, post_id| user_id == &stale_id && post_id == &stale_post)
            .times(1)
            .return_once(|_, _| Ok(()));
        ledger.expect_attach().never();

        let reconciler = OwnershipReconciler::new(Arc::new(users), Arc::new(posts), Arc::new(ledger));
        let report = reconciler.run().await.expect("reconcile succeeds");
        assert_eq!(report.users_repaired, 1);
        assert_eq!(report.entries_detached, 1);
    }

    #[tokio::test]
    async fn reconciler_keeps_index_entries_written_during_the_pass() {
        use crate::outbound::InMemoryStore;

        let store = Arc::new(InMemoryStore::new());
        let owner = user("root", OwnedPosts::default());
        UserRepository::insert(&*store, &owner)
            .await
            .expect("insert user");
        let owner_id = owner.id().clone();

        let lagging_post = post(&owner_id);
        PostRepository::insert(&*store, &lagging_post)
            .await
            .expect("insert post");
        let concurrent_post = PostId::random();

        // Snapshot the users as the pass sees them, then let a live request
        // attach a fresh post before the repair is applied.
        let snapshot = vec![owner];
        let mut users = MockUserRepository::new();
        users.expect_list().return_once(move || Ok(snapshot));
        let mut posts = MockPostRepository::new();
        let lagging = lagging_post.clone();
        posts.expect_list().return_once(move || Ok(vec![lagging]));
        store
            .attach(&owner_id, &concurrent_post)
            .await
            .expect("concurrent attach");

        let reconciler = OwnershipReconciler::new(Arc::new(users), Arc::new(posts), Arc::clone(&store));
        let report = reconciler.run().await.expect("reconcile succeeds");
        assert_eq!(report.entries_attached, 1);
        assert_eq!(report.entries_detached, 0);

        let stored = UserRepository::find_by_id(&*store, &owner_id)
            .await
            .expect("find")
            .expect("present");
        assert!(stored.posts().contains(&lagging_post.id()));
        assert!(stored.posts().contains(&concurrent_post));
    }

    #[tokio::test]
    async fn reconciler_surfaces_store_outages() {
        let mut users = MockUserRepository::new();
        users
            .expect_list()
            .return_once(|| Err(UserPersistenceError::connection("refused")));
        let reconciler = OwnershipReconciler::new(
            Arc::new(users),
            Arc::new(MockPostRepository::new()),
            Arc::new(MockOwnershipLedger::new()),
        );

        let err = reconciler.run().await.expect_err("outage");
        assert_eq!(err.code(), crate::domain::ErrorCode::ServiceUnavailable);
    }
}
