//! Server implementation

#![warn(missing_docs)]

mod config;
mod http;

use std::thread;

use eyre::{eyre, Result, WrapErr};
use hypercar_core::RequestHandler;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use config::Config;

fn http_loop<H: RequestHandler>(server: &tiny_http::Server, handler: &H) {
    loop {
        match server.recv() {
            Ok(rq) => {
                if let Some(rq) = http::parse(rq) {
                    handler.handle(rq);
                }
            }
            Err(e) => {
                error!("HTTP receive failed: {e}");
                return;
            }
        }
    }
}

/// Serve `server` with `threads` scoped counter threads until they all stop
///
/// `builder` configures the thread with the given index. If a thread cannot be
/// started, the loops already running are unblocked so that the scope can end,
/// and the spawn error is returned.
fn run_counter_threads<H: RequestHandler + Sync>(
    server: &tiny_http::Server,
    handler: &H,
    threads: usize,
    builder: impl Fn(usize) -> thread::Builder,
) -> Result<()> {
    thread::scope(|s| {
        for i in 0..threads {
            if let Err(e) = builder(i).spawn_scoped(s, move || http_loop(server, handler)) {
                error!(started = i, "could not spawn counter thread: {e}");
                // every call wakes exactly one blocked `recv`
                for _ in 0..i {
                    server.unblock();
                }
                return Err(e).wrap_err("could not spawn counter thread");
            }
        }
        Ok(())
    })
}

fn run(config: Config) -> Result<()> {
    let server = tiny_http::Server::http((config.host.as_str(), config.port))
        .map_err(|e| eyre!("could not listen on {}:{}: {e}", config.host, config.port))?;
    info!(
        host = %config.host,
        port = config.port,
        threads = config.counter_threads,
        "hypercar service listening"
    );

    let counter = hypercar_counter::launch();

    let served = run_counter_threads(&server, &counter, config.counter_threads as usize, |i| {
        thread::Builder::new().name(format!("counter_{i}"))
    });

    counter.shutdown();
    served
}

fn main() {
    let config = match Config::from_args() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: {e:#}");
            std::process::exit(1);
        }
    };

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config.log_filter.as_str()));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    if let Err(e) = run(config) {
        error!("{e:#}");
        std::process::exit(1);
    }
}

#[cfg(test)]
mod tests {
    use hypercar_core::Request;

    use super::*;

    struct Unreachable;

    impl RequestHandler for Unreachable {
        fn handle(&self, rq: Request) {
            panic!("no request expected, got {rq:?}");
        }

        fn shutdown(self) {}
    }

    #[test]
    #[ntest::timeout(10_000)]
    fn unblocked_loop_returns() {
        let server = tiny_http::Server::http("127.0.0.1:0").unwrap();
        server.unblock();
        http_loop(&server, &Unreachable);
    }

    // a stack this large cannot be mapped, so the third spawn fails
    #[cfg(all(target_os = "linux", target_pointer_width = "64"))]
    #[test]
    #[ntest::timeout(10_000)]
    fn failed_spawn_stops_running_threads() {
        let server = tiny_http::Server::http("127.0.0.1:0").unwrap();
        let result = run_counter_threads(&server, &Unreachable, 4, |i| {
            let builder = thread::Builder::new().name(format!("counter_{i}"));
            if i == 2 {
                builder.stack_size(1 << 60)
            } else {
                builder
            }
        });
        let err = result.unwrap_err();
        assert!(format!("{err:#}").contains("could not spawn counter thread"));
    }
}
