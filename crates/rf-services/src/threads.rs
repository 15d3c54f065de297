use std::sync::Arc;

use rf_core::{AddThread, AddedThread, Result, ThreadRepo};
use serde_json::Value;

pub struct AddThreadUseCase {
    threads: Arc<dyn ThreadRepo>,
}

impl AddThreadUseCase {
    pub fn new(threads: Arc<dyn ThreadRepo>) -> Self {
        Self { threads }
    }

    pub async fn execute(&self, payload: &Value) -> Result<AddedThread> {
        let new_thread = AddThread::try_from(payload)?;
        let added = self.threads.add_thread(&new_thread).await?;
        log::info!("thread {} created by {}", added.id, added.owner);
        Ok(added)
    }
}
