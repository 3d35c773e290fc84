use serde::Serialize;
use tokio::sync::broadcast;
use tokio_stream::wrappers::BroadcastStream;

/// Severity of a transient notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ToastLevel {
    Success,
    Info,
    Error,
}

/// A transient, user-visible notification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Toast {
    pub level: ToastLevel,
    pub message: String,
}

impl Toast {
    /// Success toast.
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            level: ToastLevel::Success,
            message: message.into(),
        }
    }

    /// Informational toast.
    pub fn info(message: impl Into<String>) -> Self {
        Self {
            level: ToastLevel::Info,
            message: message.into(),
        }
    }

    /// Error toast.
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            level: ToastLevel::Error,
            message: message.into(),
        }
    }
}

/// Broadcast hub fanning toasts out to whatever renders them.
pub struct NotificationHub {
    sender: broadcast::Sender<Toast>,
}

impl NotificationHub {
    /// Construct a new hub backed by a Tokio broadcast channel with the given capacity.
    pub fn new(capacity: usize) -> Self {
        let (sender, _receiver) = broadcast::channel(capacity.max(1));
        Self { sender }
    }

    /// Register a new subscriber that will receive subsequent toasts.
    pub fn subscribe(&self) -> broadcast::Receiver<Toast> {
        self.sender.subscribe()
    }

    /// Subscribe as a [`futures::Stream`]; lagged receivers yield an error item.
    pub fn stream(&self) -> BroadcastStream<Toast> {
        BroadcastStream::new(self.subscribe())
    }

    /// Send a toast to all current subscribers, ignoring delivery errors.
    pub fn push(&self, toast: Toast) {
        let _ = self.sender.send(toast);
    }
}

#[cfg(test)]
mod tests {
    use futures::StreamExt;

    use super::*;

    #[tokio::test]
    async fn subscribers_receive_toasts_in_order() {
        let hub = NotificationHub::new(4);
        let mut stream = hub.stream();

        hub.push(Toast::success("saved"));
        hub.push(Toast::error("failed"));

        assert_eq!(stream.next().await.unwrap().unwrap(), Toast::success("saved"));
        assert_eq!(stream.next().await.unwrap().unwrap(), Toast::error("failed"));
    }

    #[test]
    fn pushing_without_subscribers_is_fine() {
        let hub = NotificationHub::new(0);
        hub.push(Toast::info("nobody listens"));
    }
}
