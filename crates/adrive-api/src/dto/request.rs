//! Request DTOs with validation.

use serde::{Deserialize, Serialize};
use validator::Validate;

use adrive_core::error::AppError;
use adrive_core::types::{FileId, FolderId};
use adrive_entity::favorite::ItemType;
use adrive_service::{BulkAction, BulkRequest, CreateFolderRequest as SvcCreateFolder};

/// Create folder request.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateFolderRequest {
    /// Folder name.
    #[validate(length(min = 1, max = 255, message = "Folder name is required"))]
    pub name: String,
    /// Parent folder ID; absent or `0` for the top level.
    pub parent_id: Option<FolderId>,
    /// Icon type.
    #[validate(length(max = 50))]
    pub icon_type: Option<String>,
    /// Icon color.
    #[validate(length(max = 50))]
    pub icon_color: Option<String>,
}

impl From<CreateFolderRequest> for SvcCreateFolder {
    fn from(req: CreateFolderRequest) -> Self {
        Self {
            name: req.name,
            parent_id: req.parent_id,
            icon_type: req.icon_type,
            icon_color: req.icon_color,
        }
    }
}

/// Rename request for files and folders.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct RenameRequest {
    /// New name.
    #[validate(length(min = 1, max = 255, message = "Name is required"))]
    pub name: String,
}

/// Move request for files and folders.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct MoveRequest {
    /// Target folder ID; absent or `0` for the top level.
    #[serde(default, alias = "parent_id")]
    pub target_folder_id: Option<FolderId>,
}

/// Identifies a file or folder for favorites.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct FavoriteItemRequest {
    /// `file` or `folder`.
    #[validate(length(min = 1, message = "item_type is required"))]
    pub item_type: String,
    /// Item ID.
    #[validate(range(min = 1, message = "item_id must be positive"))]
    pub item_id: i64,
}

impl FavoriteItemRequest {
    /// Parses the item type.
    pub fn item_type(&self) -> Result<ItemType, AppError> {
        self.item_type.parse()
    }
}

/// Bulk operation request.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct BulkOperationRequest {
    /// `delete`, `move` or `download`.
    #[validate(length(min = 1, message = "Action is required"))]
    pub action: String,
    /// Selected files.
    #[serde(default)]
    pub file_ids: Vec<FileId>,
    /// Selected folders.
    #[serde(default)]
    pub folder_ids: Vec<FolderId>,
    /// Move target; `0` means the top level.
    #[serde(default, alias = "target_id")]
    pub target_folder_id: Option<FolderId>,
}

impl TryFrom<BulkOperationRequest> for BulkRequest {
    type Error = AppError;

    fn try_from(req: BulkOperationRequest) -> Result<Self, Self::Error> {
        Ok(Self {
            action: req.action.parse::<BulkAction>()?,
            file_ids: req.file_ids,
            folder_ids: req.folder_ids,
            target_folder_id: req.target_folder_id,
        })
    }
}
