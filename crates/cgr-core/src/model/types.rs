/// Normalized request for a single completion turn.
#[derive(Clone, Debug)]
pub struct CompletionRequest {
    pub text: String,
    pub conversation_id: Option<String>,
    pub parent_message_id: Option<String>,
}

/// Partial snapshot streamed while a reply is being generated.
///
/// `text` is cumulative (the full reply so far), not a delta.
#[derive(Clone, Debug)]
pub struct CompletionChunk {
    pub text: String,
}

/// Final reply returned once the backend resolves.
#[derive(Clone, Debug)]
pub struct Completion {
    pub text: String,
    pub conversation_id: Option<String>,
    /// Backend-assigned id of this reply; becomes the next turn's parent.
    pub id: String,
}
