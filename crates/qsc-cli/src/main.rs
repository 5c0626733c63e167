//! qsc - encode, decode, and validate OSC messages from the command line
//!
//! The textual side of every subcommand is the QSC form produced and
//! consumed by qsc-core, so anything this tool prints can be fed back in.

use std::fmt::Write as _;
use std::io::{Read as _, Write as _};
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use colored::Colorize;
use qsc_core::{address, Message, OscValue};
use tracing::debug;
use tracing_subscriber::EnvFilter;

/// QSC - OSC message encoder, decoder, and validator
#[derive(Parser)]
#[command(name = "qsc")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, global = true, default_value = "warn")]
    log_level: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Encode a QSC command line into an OSC packet
    Encode {
        /// The command, e.g. '/cue/1/fire "go now" 42'
        #[arg(required = true)]
        command: Vec<String>,

        /// Write raw packet bytes to stdout instead of hex
        #[arg(long)]
        raw: bool,

        /// Print the parsed message as JSON instead of hex
        #[arg(long, conflicts_with = "raw")]
        json: bool,
    },

    /// Decode an OSC packet and print its QSC form
    Decode {
        /// Packet bytes as hex; whitespace is ignored
        hex: Option<String>,

        /// Read raw packet bytes from a file, or '-' for stdin
        #[arg(short, long, conflicts_with = "hex")]
        file: Option<PathBuf>,

        /// Print the decoded message as JSON instead of QSC text
        #[arg(long)]
        json: bool,
    },

    /// Check an address or method against OSC syntax rules
    Check {
        /// The address to check
        address: String,

        /// Apply the stricter concrete-method rules
        #[arg(short, long)]
        method: bool,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&cli.log_level)),
        )
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Encode { command, raw, json } => encode(&command.join(" "), raw, json),
        Commands::Decode { hex, file, json } => decode(hex.as_deref(), file.as_deref(), json),
        Commands::Check { address, method } => check(&address, method),
    }
}

fn encode(line: &str, raw: bool, json: bool) -> Result<()> {
    let message = Message::from_qsc(line).context("failed to parse command")?;
    let packet = message.packet_data().context("failed to encode message")?;
    debug!(
        address = message.address_pattern(),
        tags = message.type_tag_string(),
        bytes = packet.len(),
        "encoded"
    );

    if raw {
        std::io::stdout()
            .write_all(&packet)
            .context("failed to write packet")?;
    } else if json {
        println!("{}", serde_json::to_string_pretty(&message_json(&message))?);
    } else {
        println!("{}", to_hex(&packet));
    }
    Ok(())
}

fn decode(hex: Option<&str>, file: Option<&Path>, json: bool) -> Result<()> {
    let bytes = match (hex, file) {
        (Some(hex), None) => from_hex(hex)?,
        (None, Some(path)) if path == Path::new("-") => {
            let mut buf = Vec::new();
            std::io::stdin()
                .read_to_end(&mut buf)
                .context("failed to read stdin")?;
            buf
        }
        (None, Some(path)) => {
            std::fs::read(path).with_context(|| format!("failed to read {}", path.display()))?
        }
        _ => bail!("pass packet bytes as hex, or use --file"),
    };

    let message = Message::decode(&bytes).context("failed to decode packet")?;
    if json {
        println!("{}", serde_json::to_string_pretty(&message_json(&message))?);
    } else {
        println!("{}", message.to_qsc());
    }
    Ok(())
}

fn check(address: &str, method: bool) -> Result<()> {
    let (legal, kind) = if method {
        (address::legal_method(address), "method")
    } else {
        (address::legal_address(address), "address")
    };

    if legal {
        println!("{} is a legal {}", address.bold(), kind.green());
        Ok(())
    } else {
        println!("{} is {} a legal {}", address.bold(), "not".red(), kind);
        std::process::exit(1);
    }
}

fn message_json(message: &Message) -> serde_json::Value {
    serde_json::json!({
        "address": message.address_pattern(),
        "typeTags": message.type_tag_string(),
        "arguments": message
            .arguments()
            .iter()
            .map(argument_json)
            .collect::<Vec<_>>(),
    })
}

fn argument_json(argument: &OscValue) -> serde_json::Value {
    use serde_json::json;

    match argument {
        OscValue::String(s) => json!({ "string": s }),
        OscValue::Blob(b) => json!({ "blob": to_hex(b) }),
        OscValue::Int32(i) => json!({ "int32": i }),
        OscValue::Float32(f) => json!({ "float32": f }),
        OscValue::Float64(d) => json!({ "float64": d }),
        OscValue::True => json!({ "bool": true }),
        OscValue::False => json!({ "bool": false }),
        OscValue::Impulse => json!("impulse"),
        OscValue::Nil => json!(null),
    }
}

/// Hex dump with a space between 4-byte words, so the OSC alignment shows
fn to_hex(bytes: &[u8]) -> String {
    let mut out = String::with_capacity(bytes.len() * 2 + bytes.len() / 4);
    for (i, byte) in bytes.iter().enumerate() {
        if i > 0 && i % 4 == 0 {
            out.push(' ');
        }
        let _ = write!(out, "{byte:02x}");
    }
    out
}

fn from_hex(hex: &str) -> Result<Vec<u8>> {
    let digits: String = hex.chars().filter(|c| !c.is_whitespace()).collect();
    if !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
        bail!("input is not hex");
    }
    if digits.len() % 2 != 0 {
        bail!("odd number of hex digits");
    }
    Ok(digits
        .as_bytes()
        .chunks(2)
        .map(|pair| {
            let hi = (pair[0] as char).to_digit(16).unwrap_or(0);
            let lo = (pair[1] as char).to_digit(16).unwrap_or(0);
            (hi << 4 | lo) as u8
        })
        .collect())
}
