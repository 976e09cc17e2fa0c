//! Share-code minting and unauthenticated share resolution.
//!
//! A share code is a stable 16-hex-character handle on a single item.
//! Resolution enforces the privacy gate: the item and every ancestor must
//! be public, unless the viewer is the owner.

use std::sync::Arc;

use tracing::info;

use glasscloud_auth::token::random_hex;
use glasscloud_core::config::auth::AuthConfig;
use glasscloud_core::error::{AppError, ErrorKind};
use glasscloud_core::result::AppResult;
use glasscloud_database::repositories::item::ItemRepository;
use glasscloud_database::repositories::user::UserRepository;
use glasscloud_entity::item::Item;

use crate::context::RequestContext;
use crate::tree;

/// Bound on mint retries before giving up on a unique code.
const MAX_SHARE_CODE_ATTEMPTS: usize = 50;

/// A share target resolved for an anonymous (or owning) viewer.
#[derive(Debug, Clone)]
pub struct ResolvedShare {
    /// The item the code points at.
    pub item: Item,
    /// Username of the item's owner, for display.
    pub owner_username: String,
}

/// Mints share codes and gates public access to shared subtrees.
#[derive(Debug, Clone)]
pub struct ShareService {
    item_repo: Arc<ItemRepository>,
    user_repo: Arc<UserRepository>,
    config: AuthConfig,
}

impl ShareService {
    /// Creates a new share service.
    pub fn new(
        item_repo: Arc<ItemRepository>,
        user_repo: Arc<UserRepository>,
        config: AuthConfig,
    ) -> Self {
        Self {
            item_repo,
            user_repo,
            config,
        }
    }

    /// Return the item's share code, minting one on first use.
    ///
    /// Codes are stable: sharing twice returns the same code. Minting
    /// retries on collision, both against the pre-check and against the
    /// unique index losing a race.
    pub async fn share(&self, ctx: &RequestContext, item_id: i64) -> AppResult<Item> {
        let item = self.find_owned(ctx, item_id).await?;

        if item.share_code.is_some() {
            return Ok(item);
        }

        for _ in 0..MAX_SHARE_CODE_ATTEMPTS {
            let code = random_hex(self.config.share_code_bytes);
            if self.item_repo.share_code_exists(&code).await? {
                continue;
            }
            match self.item_repo.set_share_code(item.id, &code).await {
                Ok(updated) => {
                    info!(user_id = ctx.user_id, item_id, "Share code minted");
                    return Ok(updated);
                }
                Err(e) if e.kind == ErrorKind::Conflict => continue,
                Err(e) => return Err(e),
            }
        }

        Err(AppError::internal("Could not allocate a unique share code"))
    }

    /// Resolve a share code for a viewer.
    ///
    /// Unknown codes are `NotFound`. If the target or any ancestor is
    /// private the share is `Forbidden` — except for the owner, who always
    /// sees their own items.
    pub async fn resolve(&self, code: &str, viewer_id: Option<i64>) -> AppResult<ResolvedShare> {
        let item = self
            .item_repo
            .find_by_share_code(code)
            .await?
            .ok_or_else(|| AppError::not_found("Share not found"))?;

        self.check_visibility(&item, viewer_id).await?;

        let owner = self
            .user_repo
            .find_by_id(item.owner_id)
            .await?
            .ok_or_else(|| AppError::internal("Share owner missing"))?;

        Ok(ResolvedShare {
            item,
            owner_username: owner.username,
        })
    }

    /// List a folder within a shared subtree.
    ///
    /// `item_id` of `None` targets the shared item itself; otherwise it
    /// must name a folder inside the shared subtree. Private children are
    /// hidden from everyone but the owner.
    pub async fn browse(
        &self,
        code: &str,
        item_id: Option<i64>,
        viewer_id: Option<i64>,
    ) -> AppResult<(Item, Vec<Item>)> {
        let share = self.resolve(code, viewer_id).await?;
        let target = self.resolve_target(&share.item, item_id, viewer_id).await?;

        if !target.is_folder() {
            return Err(AppError::validation("Not a folder"));
        }

        let is_owner = viewer_id == Some(target.owner_id);
        let mut children = self.item_repo.list_children_of(target.id).await?;
        if !is_owner {
            children.retain(|c| !c.is_private);
        }

        Ok((target, children))
    }

    /// Resolve the item to download through a share code.
    ///
    /// `item_id` of `None` downloads the shared item itself; otherwise it
    /// must name an item inside the shared subtree.
    pub async fn download_target(
        &self,
        code: &str,
        item_id: Option<i64>,
        viewer_id: Option<i64>,
    ) -> AppResult<Item> {
        let share = self.resolve(code, viewer_id).await?;
        self.resolve_target(&share.item, item_id, viewer_id).await
    }

    /// Resolve `item_id` against a shared root, enforcing subtree
    /// containment and the privacy gate for non-owners.
    async fn resolve_target(
        &self,
        root: &Item,
        item_id: Option<i64>,
        viewer_id: Option<i64>,
    ) -> AppResult<Item> {
        let Some(item_id) = item_id else {
            return Ok(root.clone());
        };
        if item_id == root.id {
            return Ok(root.clone());
        }

        let target = self
            .item_repo
            .find_by_id(item_id)
            .await?
            .ok_or_else(|| AppError::not_found("Item not found"))?;

        // An item outside the shared subtree is invisible through this
        // code, even if it has its own share.
        if !tree::is_within_subtree(&self.item_repo, &target, root.id).await? {
            return Err(AppError::not_found("Item not found"));
        }

        self.check_visibility(&target, viewer_id).await?;
        Ok(target)
    }

    async fn check_visibility(&self, item: &Item, viewer_id: Option<i64>) -> AppResult<()> {
        if viewer_id == Some(item.owner_id) {
            return Ok(());
        }
        if tree::path_is_private(&self.item_repo, item).await? {
            return Err(AppError::forbidden("This item is private"));
        }
        Ok(())
    }

    async fn find_owned(&self, ctx: &RequestContext, id: i64) -> AppResult<Item> {
        let item = self
            .item_repo
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::not_found("Item not found"))?;

        if item.owner_id != ctx.user_id {
            return Err(AppError::forbidden("You do not own this item"));
        }
        Ok(item)
    }
}
