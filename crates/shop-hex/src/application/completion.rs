use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;

use crate::application::order_service::{ORDER_COMPLETED_STREAM, ORDER_NAMESPACE};
use shop_types::domain::order::{Order, OrderStatus};
use shop_types::ports::store::{KeyValueStore, StoreError};

/// Unit of work for the deferred completion step.
#[derive(Debug)]
pub struct CompletionJob {
    pub order_id: String,
}

/// Sender half handed to the order service. Enqueueing never blocks.
#[derive(Clone)]
pub struct CompletionQueue {
    tx: mpsc::UnboundedSender<CompletionJob>,
}

impl CompletionQueue {
    pub fn enqueue(&self, order_id: String) {
        let job = CompletionJob {
            order_id: order_id.clone(),
        };
        if self.tx.send(job).is_err() {
            tracing::error!(order_id, "completion worker is gone; order will stay pending");
        }
    }
}

/// Consumer half: settles each enqueued order after the fixed delay.
pub struct CompletionWorker<S: KeyValueStore> {
    store: Arc<S>,
    settlement_delay: Duration,
    rx: mpsc::UnboundedReceiver<CompletionJob>,
}

pub fn channel<S: KeyValueStore>(
    store: Arc<S>,
    settlement_delay: Duration,
) -> (CompletionQueue, CompletionWorker<S>) {
    let (tx, rx) = mpsc::unbounded_channel();
    (
        CompletionQueue { tx },
        CompletionWorker {
            store,
            settlement_delay,
            rx,
        },
    )
}

impl<S: KeyValueStore> CompletionWorker<S> {
    /// Runs until every queue handle is dropped. Each job settles in its own
    /// task; completions of different orders are independent and unordered.
    pub async fn run(mut self) {
        while let Some(job) = self.rx.recv().await {
            let store = Arc::clone(&self.store);
            let delay = self.settlement_delay;
            tokio::spawn(settle(store, job, delay));
        }
    }
}

async fn settle<S: KeyValueStore>(store: Arc<S>, job: CompletionJob, delay: Duration) {
    // Simulated settlement latency; the order stays visible as pending until
    // it elapses.
    tokio::time::sleep(delay).await;

    match complete(store.as_ref(), &job.order_id).await {
        Ok(true) => tracing::info!(order_id = %job.order_id, "order completed"),
        Ok(false) => tracing::warn!(order_id = %job.order_id, "order vanished before settlement"),
        Err(err) => {
            tracing::error!(order_id = %job.order_id, error = %err, "order completion failed");
            mark_failed(store.as_ref(), &job.order_id).await;
        }
    }
}

async fn complete<S: KeyValueStore>(store: &S, order_id: &str) -> Result<bool, StoreError> {
    let Some(mut order) = store.get::<Order>(order_id, ORDER_NAMESPACE).await? else {
        return Ok(false);
    };
    order.update_status(OrderStatus::Completed);
    store.save(&order, ORDER_NAMESPACE).await?;

    // The completed write stands even when the event cannot be published.
    if let Err(err) = store.publish(ORDER_COMPLETED_STREAM, &order).await {
        tracing::error!(order_id, error = %err, "failed to publish completion event");
    }
    Ok(true)
}

/// Best-effort recovery after a failed completion. When even this write
/// fails the order stays pending; the logs are the only trace of it.
async fn mark_failed<S: KeyValueStore>(store: &S, order_id: &str) {
    let mut order = match store.get::<Order>(order_id, ORDER_NAMESPACE).await {
        Ok(Some(order)) => order,
        Ok(None) => {
            tracing::warn!(order_id, "order vanished while marking it failed");
            return;
        }
        Err(err) => {
            tracing::error!(order_id, error = %err, "could not re-fetch order; it may stay pending");
            return;
        }
    };
    order.update_status(OrderStatus::Failed);
    if let Err(err) = store.save(&order, ORDER_NAMESPACE).await {
        tracing::error!(order_id, error = %err, "could not mark order failed; it may stay pending");
    }
}
