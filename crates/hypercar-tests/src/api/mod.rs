use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use eyre::{eyre, Result};
use flume::Sender;
use hypercar_core::{QueueCounts, RequestKind, ServiceType};
use thiserror::Error;
use tokio::sync::oneshot;
use uuid::Uuid;

pub mod mock;

#[derive(Debug, Error)]
pub enum ApiError {
    /// The counter refused the request with the given message
    #[error("Error: {0}")]
    Rejected(String),
    /// The counter answered with something the request does not allow
    #[error("{kind:?} must not be answered by {response}")]
    Unexpected { kind: RequestKind, response: String },
}

pub type ApiResult<T> = std::result::Result<T, ApiError>;

#[derive(Debug)]
enum Response {
    Text(String),
    Ticket { number: u32, wait_minutes: u32 },
    QueueStatus(QueueCounts),
    Next(Option<u32>),
    Error(String),
}

impl Response {
    fn unexpected(self, kind: RequestKind) -> ApiError {
        match self {
            Response::Error(msg) => ApiError::Rejected(msg),
            resp => ApiError::Unexpected {
                kind,
                response: format!("{resp:?}"),
            },
        }
    }
}

struct RequestMsg {
    kind: RequestKind,
    id: Uuid,
    response_channel: oneshot::Sender<Response>,
}

/// A ticket handed out by the counter
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct IssuedTicket {
    /// Ticket number, the first ticket gets 1
    pub number: u32,
    /// Estimated wait in minutes at the time the ticket was issued
    pub wait_minutes: u32,
}

pub struct Api {
    /// One channel per counter thread
    channels: Arc<Vec<Sender<RequestMsg>>>,
    /// Index of the channel the next clone uses
    next_index: Arc<AtomicUsize>,

    my_channel: Sender<RequestMsg>,
}

impl Api {
    fn new(channels: Vec<Sender<RequestMsg>>) -> Self {
        let my_channel = channels[0].clone();
        Self {
            channels: Arc::new(channels),
            next_index: Arc::new(AtomicUsize::new(1)),
            my_channel,
        }
    }
}

impl Clone for Api {
    fn clone(&self) -> Self {
        // spread clones over the counter threads
        let index = self.next_index.fetch_add(1, Ordering::Relaxed) % self.channels.len();
        Self {
            channels: self.channels.clone(),
            next_index: self.next_index.clone(),
            my_channel: self.channels[index].clone(),
        }
    }
}

impl Api {
    async fn make_request(&self, kind: RequestKind) -> Result<Response> {
        let (sender, receiver) = oneshot::channel();
        let msg = RequestMsg {
            kind,
            id: Uuid::new_v4(),
            response_channel: sender,
        };
        self.my_channel
            .send_async(msg)
            .await
            .map_err(|_| eyre!("counter thread is gone"))?;
        Ok(receiver.await?)
    }

    async fn text(&self, kind: RequestKind) -> Result<ApiResult<String>> {
        Ok(match self.make_request(kind).await? {
            Response::Text(s) => Ok(s),
            resp => Err(resp.unexpected(kind)),
        })
    }

    async fn next(&self, kind: RequestKind) -> Result<ApiResult<Option<u32>>> {
        Ok(match self.make_request(kind).await? {
            Response::Next(ticket) => Ok(ticket),
            resp => Err(resp.unexpected(kind)),
        })
    }

    pub async fn welcome(&self) -> Result<ApiResult<String>> {
        self.text(RequestKind::Welcome).await
    }

    pub async fn menu(&self) -> Result<ApiResult<String>> {
        self.text(RequestKind::Menu).await
    }

    pub async fn debug(&self) -> Result<ApiResult<String>> {
        self.text(RequestKind::Debug).await
    }

    pub async fn get_ticket(&self, service_type: ServiceType) -> Result<ApiResult<IssuedTicket>> {
        let kind = RequestKind::GetTicket(service_type);
        Ok(match self.make_request(kind).await? {
            Response::Ticket {
                number,
                wait_minutes,
            } => Ok(IssuedTicket {
                number,
                wait_minutes,
            }),
            resp => Err(resp.unexpected(kind)),
        })
    }

    pub async fn processing_status(&self) -> Result<ApiResult<QueueCounts>> {
        let kind = RequestKind::ProcessingStatus;
        Ok(match self.make_request(kind).await? {
            Response::QueueStatus(counts) => Ok(counts),
            resp => Err(resp.unexpected(kind)),
        })
    }

    /// Ask the counter to process the next ticket
    pub async fn call_next(&self) -> Result<ApiResult<Option<u32>>> {
        self.next(RequestKind::CallNext).await
    }

    /// Ticket currently being processed
    pub async fn next_ticket(&self) -> Result<ApiResult<Option<u32>>> {
        self.next(RequestKind::NextTicket).await
    }
}
