use eyre::Result;

mod api;
pub use api::{Api, ApiError, ApiResult, IssuedTicket};
pub use hypercar_core::{QueueCounts, ServiceType};

pub struct TestCtxBuilder {
    /// Count of counter threads
    pub counter_threads: u16,
}

impl Default for TestCtxBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl TestCtxBuilder {
    /// Create a new test context builder
    ///
    /// The number of counter threads defaults to `HYPERCAR_TEST_THREADS`, or 2
    /// if the variable is not set.
    pub fn new() -> Self {
        let counter_threads = std::env::var("HYPERCAR_TEST_THREADS")
            .ok()
            .and_then(|v| v.parse().ok())
            .filter(|&n| n != 0)
            .unwrap_or(2);
        TestCtxBuilder { counter_threads }
    }

    /// Set the number of counter threads to use
    pub fn with_counter_threads(mut self, threads: u16) -> Self {
        assert_ne!(threads, 0);
        self.counter_threads = threads;
        self
    }

    /// Build the test context
    pub async fn build(self) -> Result<TestCtx> {
        let (counter, api) = api::mock::start(self.counter_threads).await?;

        Ok(TestCtx {
            api,
            counter,
            counter_threads: self.counter_threads,
            drop_bomb: DropBomb,
        })
    }
}

/// Test context
pub struct TestCtx {
    /// API allowing to interact with the service counter
    pub api: Api,
    counter: api::mock::MockCounter,
    /// Number of counter threads
    pub counter_threads: u16,

    drop_bomb: DropBomb,
}

impl TestCtx {
    /// Shut the counter down and finish the test
    pub async fn finish(self) -> Result<()> {
        std::mem::forget(self.drop_bomb);
        drop(self.api);
        self.counter.shutdown().await
    }
}

struct DropBomb;

impl Drop for DropBomb {
    fn drop(&mut self) {
        eprintln!("@TestAuthor: You should call `ctx.finish().await` to shut the counter down");
    }
}
