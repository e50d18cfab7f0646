use anyhow::bail;
use clap::Parser;
use std::path::PathBuf;

/// Runtime configuration for the `routeguide-tonic-server` binary.
///
/// All values are parsed from CLI arguments or environment variables (a
/// `.env` file is loaded first), with defaults suitable for local use.
#[derive(Parser, Debug, Clone)]
#[command(
    name = "routeguide-tonic-server",
    version,
    about = "A gRPC service answering geospatial queries over a fixed feature set"
)]
pub struct CliArgs {
    /// Address to listen on (TCP or Unix socket path; use --uds for Unix
    /// socket).
    ///
    /// Example: "0.0.0.0:50051" or "/tmp/routeguide.sock"
    ///
    /// Environment variable: `SERVER_ADDR`
    #[arg(long, env = "SERVER_ADDR", default_value_t = String::from("0.0.0.0:50051"))]
    pub server_addr: String,

    /// Listen on a Unix socket instead of TCP. If set, `SERVER_ADDR` must be a
    /// file path.
    #[arg(short, long, default_value_t = false)]
    pub uds: bool,

    /// Capacity of the response channel between a streaming call's coordinator
    /// task and the gRPC stream.
    ///
    /// Bounds how many responses may be queued before the coordinator waits for
    /// the client to catch up.
    ///
    /// Environment variable: `STREAM_BUFFER_SIZE`
    #[arg(long, env = "STREAM_BUFFER_SIZE", default_value_t = 128)]
    pub stream_buffer_size: usize,

    /// JSON feature database to serve instead of the built-in feature set.
    ///
    /// The file holds an array of `{"location": {"latitude": i32,
    /// "longitude": i32}, "name": "..."}` objects, in store order.
    ///
    /// Environment variable: `FEATURES_PATH`
    #[arg(long, env = "FEATURES_PATH")]
    pub features_path: Option<PathBuf>,

    /// Seconds to wait for in-flight calls to finish on shutdown before they
    /// are cancelled.
    ///
    /// Environment variable: `SHUTDOWN_TIMEOUT`
    #[arg(long, env = "SHUTDOWN_TIMEOUT", default_value_t = 3)]
    pub shutdown_timeout: u64,
}

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub server_addr: String,
    pub uds: bool,
    pub stream_buffer_size: usize,
    pub features_path: Option<PathBuf>,
    pub shutdown_timeout: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            server_addr: String::from("0.0.0.0:50051"),
            uds: false,
            stream_buffer_size: 128,
            features_path: None,
            shutdown_timeout: 3,
        }
    }
}

impl TryFrom<CliArgs> for ServerConfig {
    type Error = anyhow::Error;

    fn try_from(args: CliArgs) -> Result<Self, Self::Error> {
        if args.stream_buffer_size == 0 {
            bail!("STREAM_BUFFER_SIZE must be greater than 0");
        }

        if args.server_addr.trim().is_empty() {
            bail!("SERVER_ADDR must not be empty");
        }

        Ok(Self {
            server_addr: args.server_addr,
            uds: args.uds,
            stream_buffer_size: args.stream_buffer_size,
            features_path: args.features_path,
            shutdown_timeout: args.shutdown_timeout,
        })
    }
}
