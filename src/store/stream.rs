//! Subscriber side of the store's state broadcast.

use crate::core::State;
use tokio::sync::mpsc;
use tokio_stream::wrappers::UnboundedReceiverStream;

/// Ordered stream of published states: the state current at subscription
/// time, then every later one.
///
/// The stream ends once the store is closed and all buffered states have
/// been read.
#[derive(Debug)]
pub struct StateStream<S: State> {
    receiver: mpsc::UnboundedReceiver<S>,
}

impl<S: State> StateStream<S> {
    pub(crate) fn new(receiver: mpsc::UnboundedReceiver<S>) -> Self {
        Self { receiver }
    }

    /// Wait for the next published state.
    pub async fn next(&mut self) -> Option<S> {
        self.receiver.recv().await
    }

    /// Take the next buffered state without waiting.
    pub fn try_next(&mut self) -> Option<S> {
        self.receiver.try_recv().ok()
    }

    /// Drain every state buffered so far.
    pub fn drain(&mut self) -> Vec<S> {
        std::iter::from_fn(|| self.try_next()).collect()
    }

    /// Convert into a `tokio_stream::Stream` for use with stream combinators.
    pub fn into_stream(self) -> UnboundedReceiverStream<S> {
        UnboundedReceiverStream::new(self.receiver)
    }
}

#[cfg(test)]
mod tests {
    use crate::action::{Action, Transition};
    use crate::core::{State, StateKind};
    use crate::store::Store;
    use tokio_stream::StreamExt;

    const TICK: StateKind = StateKind::new("Tick");

    #[derive(Clone, PartialEq, Debug)]
    struct Tick(u8);

    impl State for Tick {
        fn kind(&self) -> StateKind {
            TICK
        }
    }

    #[tokio::test]
    async fn stream_ends_after_close() {
        let store = Store::new(Tick(0));
        let stream = store.subscribe().unwrap().into_stream();
        let tick = Action::new(
            "Tick",
            vec![Transition::new(TICK, TICK, |t: &Tick| Tick(t.0 + 1))],
        )
        .unwrap();

        store.apply(&tick).unwrap();
        store.apply(&tick).unwrap();
        store.close();

        let seen: Vec<u8> = stream.map(|t| t.0).collect().await;
        assert_eq!(seen, vec![0, 1, 2]);
    }

    #[test]
    fn try_next_does_not_wait() {
        let store = Store::new(Tick(7));
        let mut stream = store.subscribe().unwrap();

        assert_eq!(stream.try_next(), Some(Tick(7)));
        assert_eq!(stream.try_next(), None);
    }
}
