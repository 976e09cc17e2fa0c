//! Work-list tree traversal helpers shared by item, share, and download
//! services.
//!
//! Ancestor privacy checks and subtree collection are explicit iterative
//! walks so that arbitrarily deep (or corrupted, cyclic) trees cannot
//! exhaust the stack.

use glasscloud_core::error::AppError;
use glasscloud_core::result::AppResult;
use glasscloud_database::repositories::item::ItemRepository;
use glasscloud_entity::item::Item;

/// Hard bound on ancestor-walk length. A healthy tree never gets close;
/// hitting it means a parent cycle in the data.
const MAX_TREE_DEPTH: usize = 256;

/// Collect every descendant of `root` (excluding `root` itself) with a
/// breadth-first work-list over folder ids.
pub(crate) async fn collect_descendants(
    repo: &ItemRepository,
    root: &Item,
) -> AppResult<Vec<Item>> {
    let mut descendants = Vec::new();

    if !root.is_folder() {
        return Ok(descendants);
    }

    let mut worklist = vec![root.id];
    while let Some(folder_id) = worklist.pop() {
        for child in repo.list_children_of(folder_id).await? {
            if child.is_folder() {
                worklist.push(child.id);
            }
            descendants.push(child);
        }
    }

    Ok(descendants)
}

/// Walk the parent chain from `item` to the root, returning each ancestor
/// in order (closest first). `item` itself is not included.
pub(crate) async fn ancestors(repo: &ItemRepository, item: &Item) -> AppResult<Vec<Item>> {
    let mut chain = Vec::new();
    let mut current_parent = item.parent_id;

    while let Some(parent_id) = current_parent {
        if chain.len() >= MAX_TREE_DEPTH {
            return Err(AppError::internal("Item tree too deep or cyclic"));
        }
        let parent = repo
            .find_by_id(parent_id)
            .await?
            .ok_or_else(|| AppError::internal("Dangling parent reference"))?;
        current_parent = parent.parent_id;
        chain.push(parent);
    }

    Ok(chain)
}

/// Whether `item` or any of its ancestors is marked private.
pub(crate) async fn path_is_private(repo: &ItemRepository, item: &Item) -> AppResult<bool> {
    if item.is_private {
        return Ok(true);
    }
    for ancestor in ancestors(repo, item).await? {
        if ancestor.is_private {
            return Ok(true);
        }
    }
    Ok(false)
}

/// Whether `item` lies inside the subtree rooted at `root_id` (an item is
/// considered inside its own subtree).
pub(crate) async fn is_within_subtree(
    repo: &ItemRepository,
    item: &Item,
    root_id: i64,
) -> AppResult<bool> {
    if item.id == root_id {
        return Ok(true);
    }
    for ancestor in ancestors(repo, item).await? {
        if ancestor.id == root_id {
            return Ok(true);
        }
    }
    Ok(false)
}
