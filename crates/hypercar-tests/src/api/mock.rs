//! Mock API implementation directly using the `hypercar-counter` crate

use std::sync::Arc;

use eyre::{eyre, Result};
use hypercar_core::{QueueCounts, RawRequest, Request, RequestHandler, RequestKind};
use tokio::sync::oneshot;
use tokio::task::{self, JoinHandle};
use tracing::trace;
use uuid::Uuid;

use super::{Api, RequestMsg, Response};

pub struct MockCounter {
    counter: Arc<hypercar_counter::Counter>,
    join_handles: Vec<JoinHandle<()>>,
}

struct MockRawRequest {
    kind: RequestKind,
    response_channel: oneshot::Sender<Response>,
}

impl MockRawRequest {
    fn send(self, response: Response) {
        // the test may have stopped waiting for the answer
        let _ = self.response_channel.send(response);
    }
}

pub async fn start(threads: u16) -> Result<(MockCounter, Api)> {
    let counter = Arc::new(task::spawn_blocking(hypercar_counter::launch).await?);

    let it = (0..threads).map(|_| {
        let (sender, receiver) = flume::bounded::<RequestMsg>(65536);
        let counter = counter.clone();
        let handle = task::spawn_blocking(move || {
            let counter = &*counter;
            for msg in receiver.into_iter() {
                trace!(id = %msg.id, kind = ?msg.kind, "mock request");
                let raw = Box::new(MockRawRequest {
                    kind: msg.kind,
                    response_channel: msg.response_channel,
                });
                counter.handle(Request::from_raw(msg.kind, msg.id, raw))
            }
        });
        (sender, handle)
    });
    let (senders, join_handles) = it.unzip();

    let mock_counter = MockCounter {
        counter,
        join_handles,
    };
    Ok((mock_counter, Api::new(senders)))
}

impl MockCounter {
    pub async fn shutdown(self) -> Result<()> {
        for handle in self.join_handles {
            handle.await?;
        }
        let counter = Arc::into_inner(self.counter)
            .ok_or_else(|| eyre!("counter is still shared after all threads finished"))?;
        task::spawn_blocking(move || counter.shutdown()).await?;
        Ok(())
    }
}

impl RawRequest for MockRawRequest {
    fn url(&self) -> &str {
        use hypercar_core::ServiceType::*;
        use RequestKind::*;
        match self.kind {
            Welcome => "/welcome",
            Menu => "/menu",
            GetTicket(ChangeOil) => "/get_ticket/change_oil",
            GetTicket(InflateTires) => "/get_ticket/inflate_tires",
            GetTicket(Diagnostic) => "/get_ticket/diagnostic",
            ProcessingStatus | CallNext => "/processing",
            NextTicket => "/next",
            Debug => "/api/debug",
        }
    }

    fn method(&self) -> hypercar_core::RequestMethod {
        use hypercar_core::RequestMethod::*;
        match self.kind {
            RequestKind::CallNext => Post,
            _ => Get,
        }
    }

    fn respond_with_err(self: Box<Self>, err: String, _id: Uuid) {
        self.send(Response::Error(err))
    }

    fn respond_with_string(self: Box<Self>, s: String, _id: Uuid) {
        self.send(Response::Text(s))
    }

    fn respond_with_ticket(self: Box<Self>, number: u32, wait_minutes: u32, _id: Uuid) {
        self.send(Response::Ticket {
            number,
            wait_minutes,
        })
    }

    fn respond_with_queue_status(self: Box<Self>, counts: QueueCounts, _id: Uuid) {
        self.send(Response::QueueStatus(counts))
    }

    fn respond_with_next(self: Box<Self>, ticket: Option<u32>, _id: Uuid) {
        self.send(Response::Next(ticket))
    }
}
