//! Folder tree building and breadcrumb trails.

use std::collections::HashMap;
use std::sync::Arc;

use adrive_core::result::AppResult;
use adrive_core::types::FolderId;
use adrive_database::repositories::{FileRepository, FolderRepository};
use adrive_entity::folder::{Breadcrumb, Folder, FolderNode, FolderTree};

use crate::context::RequestContext;
use crate::folder::path::PathResolver;

/// Builds folder trees and breadcrumb trails.
#[derive(Debug, Clone)]
pub struct TreeService {
    /// Folder repository.
    folder_repo: Arc<FolderRepository>,
    /// File repository.
    file_repo: Arc<FileRepository>,
    /// Path resolver.
    resolver: PathResolver,
}

impl TreeService {
    /// Creates a new tree service.
    pub fn new(
        folder_repo: Arc<FolderRepository>,
        file_repo: Arc<FileRepository>,
        resolver: PathResolver,
    ) -> Self {
        Self {
            folder_repo,
            file_repo,
            resolver,
        }
    }

    /// Builds the caller's complete folder tree.
    pub async fn get_tree(&self, ctx: &RequestContext) -> AppResult<FolderTree> {
        let folders = self.folder_repo.find_all(ctx.user_id).await?;
        if folders.is_empty() {
            return Ok(FolderTree::empty());
        }

        let file_counts: HashMap<FolderId, u64> = self
            .file_repo
            .count_by_folder(ctx.user_id)
            .await?
            .into_iter()
            .map(|(id, count)| (id, u64::try_from(count).unwrap_or(0)))
            .collect();

        let mut by_parent: HashMap<Option<FolderId>, Vec<&Folder>> = HashMap::new();
        for folder in &folders {
            by_parent.entry(folder.parent_id).or_default().push(folder);
        }

        let roots = by_parent
            .get(&None)
            .map(|top| {
                top.iter()
                    .map(|f| build_node(f, &by_parent, &file_counts))
                    .collect()
            })
            .unwrap_or_default();

        Ok(FolderTree {
            roots,
            total_folders: folders.len() as u64,
        })
    }

    /// Gets the breadcrumb trail from the top-level ancestor down to the folder.
    pub async fn get_breadcrumbs(
        &self,
        ctx: &RequestContext,
        folder_id: FolderId,
    ) -> AppResult<Vec<Breadcrumb>> {
        let folder = self.resolver.owned_folder(ctx.user_id, folder_id).await?;
        let chain = self.folder_repo.find_ancestors(folder.id).await?;
        Ok(chain
            .into_iter()
            .map(|f| Breadcrumb {
                id: f.id,
                name: f.name,
            })
            .collect())
    }
}

/// Builds a node and its subtree from folders grouped by parent.
fn build_node(
    folder: &Folder,
    by_parent: &HashMap<Option<FolderId>, Vec<&Folder>>,
    file_counts: &HashMap<FolderId, u64>,
) -> FolderNode {
    let children: Vec<FolderNode> = by_parent
        .get(&Some(folder.id))
        .map(|kids| {
            kids.iter()
                .map(|child| build_node(child, by_parent, file_counts))
                .collect()
        })
        .unwrap_or_default();

    FolderNode {
        id: folder.id,
        name: folder.name.clone(),
        path: folder.path.clone(),
        depth: folder.depth(),
        child_count: children.len() as u64,
        file_count: file_counts.get(&folder.id).copied().unwrap_or(0),
        children,
    }
}
