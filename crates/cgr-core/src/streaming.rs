//! Throttled edit sink for the placeholder reply.
//!
//! Partial completion snapshots are rendered by repeatedly editing one
//! message. Edits are throttled on the leading edge of a fixed window;
//! the true final text must arrive through the un-throttled `finalize`
//! path, since the throttle never flushes what it coalesced.

use std::time::Duration;

use tokio::time::Instant;

use tracing::warn;

use crate::{
    domain::MessageRef,
    messaging::{port::MessagingPort, types::TextFormat},
};

/// Leading-edge throttle over a fixed window.
///
/// `offer` is a pure decision: the first snapshot of an idle period fires
/// immediately; snapshots inside the window are coalesced into the pending
/// slot (most recent wins) and fire nothing. There is no trailing flush.
#[derive(Clone, Debug)]
pub struct EditThrottle {
    window: Duration,
    last_fired: Option<Instant>,
    pending: Option<String>,
}

impl EditThrottle {
    pub fn new(window: Duration) -> Self {
        Self {
            window,
            last_fired: None,
            pending: None,
        }
    }

    /// Record `snapshot` and decide whether an edit should fire now, and
    /// with which text.
    pub fn offer(&mut self, snapshot: &str, now: Instant) -> Option<String> {
        match self.last_fired {
            Some(fired) if now.duration_since(fired) < self.window => {
                self.pending = Some(snapshot.to_string());
                None
            }
            _ => {
                self.last_fired = Some(now);
                self.pending = None;
                Some(snapshot.to_string())
            }
        }
    }

    /// The most recent coalesced snapshot, if any. The throttle itself never
    /// delivers it; callers route the final text through `EditSink::finalize`.
    pub fn pending(&self) -> Option<&str> {
        self.pending.as_deref()
    }
}

/// Lifecycle of the displayed message within one relay operation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SinkPhase {
    Placeholder,
    PartiallyUpdated,
    Finalized,
}

/// Wraps the "edit displayed message" operation for one placeholder reply.
///
/// Edit failures are swallowed per attempt: the previous message reference
/// is kept so later edits still target the right message, and one failed
/// edit never fails the surrounding relay operation.
pub struct EditSink {
    msg: MessageRef,
    displayed: String,
    phase: SinkPhase,
    throttle: EditThrottle,
}

impl EditSink {
    pub fn new(msg: MessageRef, placeholder_text: &str, window: Duration) -> Self {
        Self {
            msg,
            displayed: placeholder_text.to_string(),
            phase: SinkPhase::Placeholder,
            throttle: EditThrottle::new(window),
        }
    }

    pub fn message(&self) -> MessageRef {
        self.msg
    }

    pub fn phase(&self) -> SinkPhase {
        self.phase
    }

    /// Throttled path for partial snapshots. Returns whether an edit attempt
    /// fired (callers use this to re-signal typing activity).
    pub async fn push(&mut self, api: &dyn MessagingPort, text: &str) -> bool {
        self.push_at(api, text, Instant::now()).await
    }

    pub async fn push_at(&mut self, api: &dyn MessagingPort, text: &str, now: Instant) -> bool {
        if self.phase == SinkPhase::Finalized {
            return false;
        }
        let Some(display) = self.throttle.offer(text, now) else {
            return false;
        };
        if self.apply_edit(api, &display, TextFormat::Plain).await {
            self.phase = SinkPhase::PartiallyUpdated;
        }
        true
    }

    /// Un-throttled final edit. The sink is terminal afterwards regardless of
    /// whether the platform call succeeded.
    pub async fn finalize(&mut self, api: &dyn MessagingPort, text: &str) {
        self.apply_edit(api, text, TextFormat::Markdown).await;
        self.phase = SinkPhase::Finalized;
    }

    /// Returns true when the display actually changed. Skips the platform
    /// call entirely for empty text or text identical to what is shown.
    async fn apply_edit(&mut self, api: &dyn MessagingPort, text: &str, format: TextFormat) -> bool {
        if text.trim().is_empty() || text == self.displayed {
            return false;
        }
        match api.edit_text(self.msg, text, format).await {
            Ok(new_ref) => {
                self.msg = new_ref;
                self.displayed = text.to_string();
                true
            }
            Err(e) => {
                warn!("edit message failed: {e}");
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{ChatId, MessageId};
    use crate::messaging::types::ChatAction;
    use crate::Result;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::Mutex;

    const WINDOW: Duration = Duration::from_millis(4000);

    #[derive(Default)]
    struct FakeMessenger {
        edits: Mutex<Vec<(MessageRef, String, TextFormat)>>,
        fail_edits: AtomicBool,
    }

    impl FakeMessenger {
        fn edited_texts(&self) -> Vec<String> {
            self.edits
                .lock()
                .unwrap()
                .iter()
                .map(|(_, t, _)| t.clone())
                .collect()
        }
    }

    #[async_trait]
    impl MessagingPort for FakeMessenger {
        async fn send_text(
            &self,
            chat_id: ChatId,
            _text: &str,
            _reply_to: Option<MessageId>,
        ) -> Result<MessageRef> {
            Ok(MessageRef {
                chat_id,
                message_id: MessageId(1),
            })
        }

        async fn edit_text(
            &self,
            msg: MessageRef,
            text: &str,
            format: TextFormat,
        ) -> Result<MessageRef> {
            if self.fail_edits.load(Ordering::SeqCst) {
                return Err(crate::Error::Transport("edit rejected".to_string()));
            }
            self.edits
                .lock()
                .unwrap()
                .push((msg, text.to_string(), format));
            Ok(msg)
        }

        async fn send_chat_action(&self, _chat_id: ChatId, _action: ChatAction) -> Result<()> {
            Ok(())
        }
    }

    fn msg_ref() -> MessageRef {
        MessageRef {
            chat_id: ChatId(1),
            message_id: MessageId(10),
        }
    }

    #[test]
    fn throttle_fires_leading_edge_and_coalesces() {
        let mut th = EditThrottle::new(WINDOW);
        let t0 = Instant::now();

        // S1 at t=0 fires immediately.
        assert_eq!(th.offer("S1", t0), Some("S1".to_string()));
        // S2 at t=1000 and S3 at t=3900 coalesce; S3 wins the pending slot.
        assert_eq!(th.offer("S2", t0 + Duration::from_millis(1000)), None);
        assert_eq!(th.offer("S3", t0 + Duration::from_millis(3900)), None);
        assert_eq!(th.pending(), Some("S3"));
        // Past the window a new snapshot fires again.
        assert_eq!(
            th.offer("S5", t0 + Duration::from_millis(4200)),
            Some("S5".to_string())
        );
        assert_eq!(th.pending(), None);
    }

    #[tokio::test]
    async fn coalesced_snapshots_are_never_displayed() {
        let api = FakeMessenger::default();
        let mut sink = EditSink::new(msg_ref(), "🤔", WINDOW);
        let t0 = Instant::now();

        assert!(sink.push_at(&api, "S1", t0).await);
        assert!(!sink.push_at(&api, "S2", t0 + Duration::from_millis(1000)).await);
        assert!(!sink.push_at(&api, "S3", t0 + Duration::from_millis(3900)).await);
        sink.finalize(&api, "S4").await;

        assert_eq!(sink.phase(), SinkPhase::Finalized);
        assert_eq!(api.edited_texts(), vec!["S1".to_string(), "S4".to_string()]);
    }

    #[tokio::test]
    async fn identical_or_empty_text_is_a_noop() {
        let api = FakeMessenger::default();
        let mut sink = EditSink::new(msg_ref(), "🤔", Duration::from_millis(0));

        assert!(sink.push_at(&api, "hello", Instant::now()).await);
        // Same text: the attempt fires (throttle slot consumed) but no
        // platform call is made and the phase is unchanged.
        sink.push_at(&api, "hello", Instant::now()).await;
        sink.push_at(&api, "   ", Instant::now()).await;
        // Editing back to the placeholder text is also suppressed.
        let before = api.edited_texts().len();
        assert_eq!(before, 1);

        sink.finalize(&api, "hello").await;
        assert_eq!(api.edited_texts().len(), 1, "finalize with shown text is free");
    }

    #[tokio::test]
    async fn failed_edit_keeps_reference_and_display_state() {
        let api = FakeMessenger::default();
        let mut sink = EditSink::new(msg_ref(), "🤔", Duration::from_millis(0));

        api.fail_edits.store(true, Ordering::SeqCst);
        assert!(sink.push_at(&api, "partial", Instant::now()).await);
        assert_eq!(sink.phase(), SinkPhase::Placeholder);
        assert_eq!(sink.message(), msg_ref());

        // Recovery: the same text goes through once the platform accepts
        // edits again, because the failed attempt never updated `displayed`.
        api.fail_edits.store(false, Ordering::SeqCst);
        sink.finalize(&api, "partial").await;
        assert_eq!(api.edited_texts(), vec!["partial".to_string()]);
    }

    #[tokio::test]
    async fn finalized_sink_ignores_late_snapshots() {
        let api = FakeMessenger::default();
        let mut sink = EditSink::new(msg_ref(), "🤔", Duration::from_millis(0));

        sink.finalize(&api, "done").await;
        assert!(!sink.push_at(&api, "late", Instant::now()).await);
        assert_eq!(api.edited_texts(), vec!["done".to_string()]);
    }

    #[tokio::test]
    async fn partial_edits_are_plain_and_final_is_markdown() {
        let api = FakeMessenger::default();
        let mut sink = EditSink::new(msg_ref(), "🤔", WINDOW);
        let t0 = Instant::now();

        sink.push_at(&api, "part", t0).await;
        sink.finalize(&api, "**done**").await;

        let edits = api.edits.lock().unwrap();
        assert_eq!(edits[0].2, TextFormat::Plain);
        assert_eq!(edits[1].2, TextFormat::Markdown);
    }
}
