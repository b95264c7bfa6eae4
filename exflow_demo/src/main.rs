//! # Resource-cascade demo
//!
//! Three nested frames acquire a memory buffer, a file handle, and a
//! socket, with failures injected either by a coin flip (as the original
//! scenario did) or deterministically via `--fail-at`. Each frame owns
//! its handlers and releases its resource in its finalizer, whatever the
//! exit path.
//!
//! Run with `RUST_LOG=exflow=trace,exflow_demo=info` to watch the frame
//! lifecycle.

use std::fs::File;
use std::io::Write;
use std::net::TcpStream;
use std::process::ExitCode;

use clap::{Parser, ValueEnum};
use rand::Rng;
use tracing::{error, info, warn};

use exflow::prelude::*;

/// Stage at which a failure is injected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Stage {
    /// Fail the buffer allocation.
    Buffer,
    /// Raise before the file handle is acquired.
    File,
    /// Raise before the socket is opened.
    Socket,
}

#[derive(Debug, Parser)]
#[command(name = "exflow_demo", about = "Nested resource-cascade demo")]
struct Args {
    /// Inject the failure deterministically at this stage.
    #[arg(long, value_enum)]
    fail_at: Option<Stage>,

    /// Probability of a random raise before each acquisition when no
    /// stage is forced.
    #[arg(long, default_value_t = 0.2)]
    bomb_odds: f64,

    /// Address for the socket stage.
    #[arg(long, default_value = "127.0.0.1:7878")]
    connect: String,
}

impl Args {
    /// Coin flip for one stage, or the forced answer.
    fn bomb(&self, stage: Stage) -> bool {
        match self.fail_at {
            Some(forced) => forced == stage,
            None => rand::thread_rng().gen_bool(self.bomb_odds),
        }
    }
}

fn cascade(args: &Args) -> Status {
    throws(&[Kind::OutOfMemory, Kind::Unrecoverable, Kind::NullRef], || {
        let buffer = if args.bomb(Stage::Buffer) {
            None
        } else {
            info!("allocating memory buffer");
            Some(vec![0u8; 256 * 1024])
        };
        scope(maybe(buffer, Kind::OutOfMemory))
            .named("buffer")
            .body(|buf| {
                let file_input = if args.bomb(Stage::File) {
                    Err(Kind::Unrecoverable)
                } else {
                    info!("opening scratch file");
                    check_io(File::create(std::env::temp_dir().join("exflow-demo.dat")))
                };
                scope(file_input)
                    .named("file")
                    .body(|file| {
                        check_io(file.write_all(&buf[..16]))?;
                        let sock_input = if args.bomb(Stage::Socket) {
                            Err(Kind::Unrecoverable)
                        } else {
                            info!(addr = %args.connect, "opening socket");
                            check_io(TcpStream::connect(&args.connect))
                        };
                        scope(sock_input)
                            .named("socket")
                            .body(|_sock| Ok(()))
                            .catch(Kind::Unrecoverable, |kind| {
                                warn!("random raise before the socket opened");
                                rethrow(kind)
                            })
                            .catch_any(|kind| {
                                error!(%kind, "socket open failed");
                                Ok(())
                            })
                            .finally(|sock| {
                                if sock.is_some() {
                                    info!("socket closed");
                                }
                            })
                    })
                    .catch(Kind::Unrecoverable, |kind| {
                        warn!("random raise before the file opened");
                        rethrow(kind)
                    })
                    .catch_any(|kind| {
                        error!(%kind, "file open failed");
                        Ok(())
                    })
                    .finally(|file| {
                        if file.is_some() {
                            info!("file handle closed");
                        }
                    })
            })
            .catch_any(|kind| {
                error!(%kind, "cascade aborted");
                Ok(())
            })
            .finally(|buf| {
                if buf.is_some() {
                    info!("memory buffer freed");
                }
            })
    })
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_target(false)
        .init();

    let args = Args::parse();
    let status = cascade(&args);
    info!(code = status_code(&status), "cascade finished");

    match status {
        Ok(()) => ExitCode::SUCCESS,
        Err(_) => ExitCode::FAILURE,
    }
}
