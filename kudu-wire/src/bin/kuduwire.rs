use std::io;

use clap::{Parser, Subcommand};
use color_eyre::{Result, eyre::{eyre, OptionExt, WrapErr}};
use tracing::{debug, Level};
use tracing_subscriber::{EnvFilter, filter::LevelFilter};

use kudu_wire::{registry, ByteStream, JsonValue};


#[derive(Parser, Debug)]
#[command(
    name="kuduwire",
    version=kudu_wire::config::VERSION,
    about="Utility to convert Antelope values between their JSON and hex representations",
    arg_required_else_help(true),
)]
struct Cli {
    /// Turn verbose level
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Do not print any logging messages.
    ///
    /// Normal output of the command is still available on stdout.
    #[arg(short, long)]
    quiet: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}


#[derive(Subcommand, Debug)]
enum Commands {
    /// Convert a JSON value to its hex representation
    ToHex {
        /// the typename of the value to convert (case-insensitive)
        typename: String,

        /// a JSON representation of the value to convert
        json: String,
    },

    /// Decode hex data as a JSON value
    FromHex {
        /// the typename of the value to decode (case-insensitive)
        typename: String,

        /// an hex representation of the value we want to decode
        hex: String,
    },

    /// List the names of all the supported types
    ListTypes,
}


fn init_tracing(verbose_level: u8) {
    // use an env filter with default level of WARN, we don't want to pollute stderr
    let env_filter = EnvFilter::builder()
        .with_default_directive(LevelFilter::WARN.into())
        .from_env_lossy();

    let tracing = tracing_subscriber::fmt()
        .with_writer(io::stderr)
        .with_env_filter(env_filter);

    // flags given on the command-line override those from the environment
    match verbose_level {
        0 => tracing.init(),
        1 => tracing.with_max_level(Level::INFO).init(),
        2 => tracing.with_max_level(Level::DEBUG).init(),
        _ => tracing.with_max_level(Level::TRACE).init(),
    };
}

pub fn main() -> Result<()> {
    color_eyre::install()?;

    let cli = Cli::parse();

    if !cli.quiet {
        init_tracing(cli.verbose);
    }

    let cmd = cli.command.ok_or_eyre("No command given. You need to specify at least one")?;
    debug!("{:?}", cmd);

    match cmd {
        Commands::ToHex { typename, json } => {
            let kind = registry::lookup(&typename)?;

            let v: JsonValue = json.parse()
                .wrap_err_with(|| format!("Could not parse JSON value: {json}"))?;
            let value = kind.from_json(&v)?;

            let mut ds = ByteStream::new();
            value.encode(&mut ds);

            println!("{}", ds.hex_data());
        }

        Commands::FromHex { typename, hex } => {
            let kind = registry::lookup(&typename)?;

            // create a byte stream from the given hex representation
            let mut bin = ByteStream::from_hex(&hex)?;

            // perform the hex->json conversion
            let value = kind.decode(&mut bin)?;

            if !bin.leftover().is_empty() {
                return Err(eyre!("Trailing input, {} bytes haven't been consumed. Decoded object: {:?}",
                                 bin.leftover().len(), &value));
            }

            println!("{}", value.to_json());
        }

        Commands::ListTypes => {
            for name in registry::type_names() {
                println!("{name}");
            }
        }
    }

    Ok(())
}
