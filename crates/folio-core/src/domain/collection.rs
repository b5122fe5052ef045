//! The persisted aggregate: every post plus the id counter.

use std::collections::HashSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::post::{NewPost, Post, PostChanges, PostId};
use crate::error::StoreError;

/// Full snapshot of the store as written to disk.
///
/// `last_id` is the highest id ever handed out. It is kept explicitly so that
/// deleting the newest post never lets its id be assigned again.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Collection {
    #[serde(rename = "lastId")]
    last_id: u64,
    #[serde(alias = "blogs")]
    posts: Vec<Post>,
}

/// Result of an in-place edit.
#[derive(Debug, Clone)]
pub struct Updated {
    pub post: Post,
    /// Previous banner, when the edit swapped it for a different one.
    pub replaced_banner: Option<String>,
}

impl Collection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Empty collection whose next post gets `last_id + 1`.
    pub fn starting_after(last_id: u64) -> Self {
        Self {
            last_id,
            posts: Vec::new(),
        }
    }

    /// Highest id this snapshot has seen, whether or not the counter agrees.
    pub fn high_water_mark(&self) -> u64 {
        let max_id = self.posts.iter().map(|p| p.id.get()).max().unwrap_or(0);
        self.last_id.max(max_id)
    }

    pub fn last_id(&self) -> u64 {
        self.last_id
    }

    pub fn posts(&self) -> &[Post] {
        &self.posts
    }

    pub fn into_posts(self) -> Vec<Post> {
        self.posts
    }

    pub fn len(&self) -> usize {
        self.posts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.posts.is_empty()
    }

    /// Append a new post under the next id.
    pub fn insert(&mut self, new: NewPost, now: DateTime<Utc>) -> Result<Post, StoreError> {
        new.validate()?;

        let next = self
            .last_id
            .checked_add(1)
            .ok_or_else(|| StoreError::Persistence("post id counter exhausted".to_string()))?;
        let id = PostId::new(next)?;

        let post = Post {
            id,
            title: new.title,
            description: new.description,
            banner: new.banner,
            updated_at: now,
        };
        self.posts.push(post.clone());
        self.last_id = next;

        Ok(post)
    }

    pub fn get(&self, id: PostId) -> Result<&Post, StoreError> {
        self.posts
            .iter()
            .find(|p| p.id == id)
            .ok_or(StoreError::NotFound { id })
    }

    pub fn update(
        &mut self,
        id: PostId,
        changes: PostChanges,
        now: DateTime<Utc>,
    ) -> Result<Updated, StoreError> {
        let post = self
            .posts
            .iter_mut()
            .find(|p| p.id == id)
            .ok_or(StoreError::NotFound { id })?;

        let replaced_banner = post.apply(changes, now);

        Ok(Updated {
            post: post.clone(),
            replaced_banner,
        })
    }

    /// Remove a post, keeping the order of the rest. The counter is untouched.
    pub fn remove(&mut self, id: PostId) -> Result<Post, StoreError> {
        let index = self
            .posts
            .iter()
            .position(|p| p.id == id)
            .ok_or(StoreError::NotFound { id })?;

        Ok(self.posts.remove(index))
    }

    /// Newest first by modification time, ties broken by higher id.
    pub fn recent(&self, limit: usize) -> Vec<Post> {
        let mut posts = self.posts.clone();
        posts.sort_by(|a, b| {
            b.updated_at
                .cmp(&a.updated_at)
                .then_with(|| b.id.cmp(&a.id))
        });
        posts.truncate(limit);
        posts
    }

    /// Check a freshly loaded snapshot.
    ///
    /// Duplicate ids make the snapshot unusable. A counter that lags behind
    /// the highest id is raised to it; returns `true` when that happened.
    pub fn repair(&mut self) -> Result<bool, String> {
        let mut seen = HashSet::with_capacity(self.posts.len());
        for post in &self.posts {
            if post.id.get() == 0 {
                return Err("post id 0 is not a valid id".to_string());
            }
            if !seen.insert(post.id) {
                return Err(format!("duplicate post id {}", post.id));
            }
        }

        let mark = self.high_water_mark();
        if self.last_id < mark {
            self.last_id = mark;
            return Ok(true);
        }
        Ok(false)
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeDelta;

    use super::*;

    fn id(raw: u64) -> PostId {
        PostId::new(raw).unwrap()
    }

    #[test]
    fn test_insert_assigns_sequential_ids() {
        let mut collection = Collection::new();
        let now = Utc::now();

        let first = collection
            .insert(NewPost::new("Hello", "World", "img1.png"), now)
            .unwrap();
        let second = collection
            .insert(NewPost::new("Second", "X", "img2.png"), now)
            .unwrap();

        assert_eq!(first.id, id(1));
        assert_eq!(second.id, id(2));
        assert_eq!(collection.last_id(), 2);
    }

    #[test]
    fn test_insert_rejects_blank_title() {
        let mut collection = Collection::new();
        let err = collection
            .insert(NewPost::new("", "body", ""), Utc::now())
            .unwrap_err();

        assert!(matches!(err, StoreError::InvalidArgument(_)));
        assert_eq!(collection.last_id(), 0);
        assert!(collection.is_empty());
    }

    #[test]
    fn test_ids_not_reused_after_removing_newest() {
        let mut collection = Collection::new();
        let now = Utc::now();
        collection.insert(NewPost::new("a", "", ""), now).unwrap();
        collection.insert(NewPost::new("b", "", ""), now).unwrap();

        collection.remove(id(2)).unwrap();
        let next = collection.insert(NewPost::new("c", "", ""), now).unwrap();

        assert_eq!(next.id, id(3));
    }

    #[test]
    fn test_remove_preserves_order() {
        let mut collection = Collection::new();
        let now = Utc::now();
        for title in ["a", "b", "c", "d"] {
            collection.insert(NewPost::new(title, "", ""), now).unwrap();
        }

        collection.remove(id(2)).unwrap();

        let titles: Vec<_> = collection.posts().iter().map(|p| p.title.as_str()).collect();
        assert_eq!(titles, ["a", "c", "d"]);
        assert!(matches!(
            collection.remove(id(2)),
            Err(StoreError::NotFound { .. })
        ));
    }

    #[test]
    fn test_update_keeps_banner_when_none() {
        let mut collection = Collection::new();
        let created_at = Utc::now();
        collection
            .insert(NewPost::new("Hello", "World", "img1.png"), created_at)
            .unwrap();

        let updated = collection
            .update(id(1), PostChanges::new("Hi", "", None), created_at)
            .unwrap();

        assert_eq!(updated.post.title, "Hi");
        assert_eq!(updated.post.description, "");
        assert_eq!(updated.post.banner, "img1.png");
        assert!(updated.post.updated_at > created_at);
        assert!(updated.replaced_banner.is_none());
    }

    #[test]
    fn test_update_reports_replaced_banner() {
        let mut collection = Collection::new();
        let now = Utc::now();
        collection
            .insert(NewPost::new("Hello", "World", "old.png"), now)
            .unwrap();

        let same = collection
            .update(id(1), PostChanges::new("Hello", "World", Some("old.png".into())), now)
            .unwrap();
        assert!(same.replaced_banner.is_none());

        let swapped = collection
            .update(id(1), PostChanges::new("Hello", "World", Some("new.png".into())), now)
            .unwrap();
        assert_eq!(swapped.post.banner, "new.png");
        assert_eq!(swapped.replaced_banner.as_deref(), Some("old.png"));
    }

    #[test]
    fn test_update_missing_post() {
        let mut collection = Collection::new();
        let err = collection
            .update(id(9), PostChanges::new("x", "y", None), Utc::now())
            .unwrap_err();
        assert!(matches!(err, StoreError::NotFound { id } if id.get() == 9));
    }

    #[test]
    fn test_recent_sorts_newest_first() {
        let mut collection = Collection::new();
        let base = Utc::now();
        collection
            .insert(NewPost::new("old", "", ""), base - TimeDelta::days(2))
            .unwrap();
        collection
            .insert(NewPost::new("newest", "", ""), base)
            .unwrap();
        collection
            .insert(NewPost::new("middle", "", ""), base - TimeDelta::days(1))
            .unwrap();

        let recent = collection.recent(2);
        let titles: Vec<_> = recent.iter().map(|p| p.title.as_str()).collect();
        assert_eq!(titles, ["newest", "middle"]);

        // stored order is untouched
        assert_eq!(collection.posts()[0].title, "old");
    }

    #[test]
    fn test_repair_raises_lagging_counter() {
        let mut collection: Collection = serde_json::from_str(
            r#"{"lastId":1,"posts":[{"id":4,"title":"t","description":"","banner":"","date":"2024-01-01T00:00:00Z"}]}"#,
        )
        .unwrap();

        assert!(collection.repair().unwrap());
        assert_eq!(collection.last_id(), 4);
        assert!(!collection.repair().unwrap());
    }

    #[test]
    fn test_repair_rejects_duplicate_ids() {
        let mut collection: Collection = serde_json::from_str(
            r#"{"lastId":2,"posts":[
                {"id":2,"title":"a","description":"","banner":"","date":"2024-01-01T00:00:00Z"},
                {"id":2,"title":"b","description":"","banner":"","date":"2024-01-01T00:00:00Z"}]}"#,
        )
        .unwrap();

        assert!(collection.repair().is_err());
        assert_eq!(collection.high_water_mark(), 2);

        let fresh = Collection::starting_after(collection.high_water_mark());
        assert!(fresh.is_empty());
        assert_eq!(fresh.last_id(), 2);

        let mut zero: Collection = serde_json::from_str(
            r#"{"lastId":0,"posts":[{"id":0,"title":"z","description":"","banner":"","date":"2024-01-01T00:00:00Z"}]}"#,
        )
        .unwrap();
        assert!(zero.repair().is_err());
    }

    #[test]
    fn test_reads_legacy_blogs_key() {
        let collection: Collection = serde_json::from_str(
            r#"{"lastId":3,"blogs":[{"id":3,"title":"t","description":"d","banner":"b.png","date":"2024-05-01T10:00:00.000Z"}]}"#,
        )
        .unwrap();

        assert_eq!(collection.len(), 1);
        assert_eq!(collection.posts()[0].banner, "b.png");

        let written = serde_json::to_value(&collection).unwrap();
        assert!(written.get("posts").is_some());
        assert!(written.get("blogs").is_none());
        assert_eq!(written["lastId"], 3);
    }
}
