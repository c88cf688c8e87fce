//! Queues between the engine and the presentation.
//!
//! `async_std::channel` has no zero-capacity mode, so a capacity of 0 is built
//! on top of it here: every item travels with a receipt, and `send` only
//! returns once the receiving side has taken the item.

use async_std::channel::{self, Receiver, Sender};
#[cfg(test)]
use async_std::channel::{TryRecvError, TrySendError};
use thiserror::Error;

/// The other end of the queue is gone.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
#[error("queue closed")]
pub struct Closed;

struct Parcel<T> {
    item: T,
    receipt: Option<Sender<()>>,
}

impl<T> Parcel<T> {
    fn open(self) -> T {
        if let Some(receipt) = self.receipt {
            let _ = receipt.try_send(());
        }
        self.item
    }
}

pub struct Handoff<T> {
    items: Sender<Parcel<T>>,
    rendezvous: bool,
}

pub struct Pickup<T> {
    items: Receiver<Parcel<T>>,
}

/// A queue holding `capacity` items. With a capacity of 0 every send waits
/// for the matching receive.
pub fn bounded<T>(capacity: usize) -> (Handoff<T>, Pickup<T>) {
    let (sender, receiver) = channel::bounded(capacity.max(1));
    (
        Handoff {
            items: sender,
            rendezvous: capacity == 0,
        },
        Pickup { items: receiver },
    )
}

impl<T> Handoff<T> {
    pub async fn send(&self, item: T) -> Result<(), Closed> {
        if !self.rendezvous {
            let parcel = Parcel {
                item,
                receipt: None,
            };
            return self.items.send(parcel).await.map_err(|_| Closed);
        }

        let (receipt, signed) = channel::bounded(1);
        let parcel = Parcel {
            item,
            receipt: Some(receipt),
        };
        self.items.send(parcel).await.map_err(|_| Closed)?;
        // A dropped receipt means the parcel was thrown away unopened.
        signed.recv().await.map_err(|_| Closed)
    }

    #[cfg(test)]
    pub fn try_send(&self, item: T) -> Result<(), TrySendError<T>> {
        let parcel = Parcel {
            item,
            receipt: None,
        };
        self.items.try_send(parcel).map_err(|err| match err {
            TrySendError::Full(parcel) => TrySendError::Full(parcel.item),
            TrySendError::Closed(parcel) => TrySendError::Closed(parcel.item),
        })
    }

    #[cfg(test)]
    pub fn close(&self) {
        self.items.close();
    }

    #[cfg(test)]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    #[cfg(test)]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

impl<T> Pickup<T> {
    pub async fn recv(&self) -> Result<T, Closed> {
        self.items.recv().await.map(Parcel::open).map_err(|_| Closed)
    }

    #[cfg(test)]
    pub fn try_recv(&self) -> Result<T, TryRecvError> {
        self.items.try_recv().map(Parcel::open)
    }
}

impl<T> Drop for Pickup<T> {
    fn drop(&mut self) {
        self.items.close();
        // Unblocks senders still waiting on a receipt.
        while self.items.try_recv().is_ok() {}
    }
}
