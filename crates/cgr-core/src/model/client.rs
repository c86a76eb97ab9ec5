use async_trait::async_trait;

use crate::Result;

use super::types::*;

/// Model client interface used by the relay.
///
/// We prefer a callback-based streaming interface over `Stream<Item=...>` to
/// keep dependencies light and allow provider implementations to drive their
/// own read loops. `on_progress` is invoked zero or more times with partial
/// snapshots before the call resolves with the final completion.
#[async_trait]
pub trait ChatModel: Send + Sync {
    async fn send_message(
        &self,
        req: CompletionRequest,
        on_progress: &mut (dyn FnMut(CompletionChunk) -> Result<()> + Send),
    ) -> Result<Completion>;
}
