//! Notification fetch and purge.

use std::sync::Arc;

use tracing::info;

use chirp_core::result::AppResult;
use chirp_database::NotificationStore;
use chirp_entity::notification::NotificationView;

use crate::context::RequestContext;

/// Reads and clears the caller's notifications.
#[derive(Clone)]
pub struct NotificationService {
    notifications: Arc<dyn NotificationStore>,
}

impl std::fmt::Debug for NotificationService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NotificationService").finish_non_exhaustive()
    }
}

impl NotificationService {
    pub fn new(notifications: Arc<dyn NotificationStore>) -> Self {
        Self { notifications }
    }

    /// List the caller's notifications, then mark them all read.
    ///
    /// The returned list is the state before marking.
    pub async fn fetch(&self, ctx: &RequestContext) -> AppResult<Vec<NotificationView>> {
        let list = self.notifications.list_for_recipient(ctx.user_id()).await?;
        self.notifications.mark_all_read(ctx.user_id()).await?;
        Ok(list)
    }

    /// Permanently remove all of the caller's notifications.
    pub async fn delete_all(&self, ctx: &RequestContext) -> AppResult<u64> {
        let removed = self
            .notifications
            .delete_for_recipient(ctx.user_id())
            .await?;
        info!(user_id = %ctx.user_id(), removed, "Notifications deleted");
        Ok(removed)
    }
}
