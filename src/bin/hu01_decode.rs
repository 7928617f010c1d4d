use std::fs::File;
use std::io::{self, Read, Write};
use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use hu01::Hu01Decoder;
use log::{error, info};

#[derive(Parser)]
#[command(name = "hu01-decode", version, about = "Decode HU01-compressed DeltaSync email bodies")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Decompress an HU01 stream to plaintext
    Decode {
        /// Input file, or `-` for stdin
        input: PathBuf,
        /// Output file, or `-` for stdout
        #[arg(short, long, default_value = "-")]
        output: PathBuf,
        /// Feed the decoder this many bytes at a time, instead of all at
        /// once (useful for exercising the streaming API by hand)
        #[arg(long, default_value = "65536")]
        chunk_size: usize,
    },
    /// Decompress and report only the resulting byte count
    Info {
        input: PathBuf,
    },
}

fn main() -> ExitCode {
    env_logger::init();
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Decode { input, output, chunk_size } => run_decode(&input, &output, chunk_size),
        Commands::Info { input } => run_info(&input),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!("{err}");
            eprintln!("hu01-decode: {err}");
            ExitCode::FAILURE
        }
    }
}

fn run_decode(input: &PathBuf, output: &PathBuf, chunk_size: usize) -> Result<(), String> {
    let compressed = read_all(input)?;
    let plaintext = decode_all(&compressed, chunk_size)?;

    if output.as_os_str() == "-" {
        io::stdout().write_all(&plaintext).map_err(|e| e.to_string())?;
    } else {
        let mut f = File::create(output).map_err(|e| format!("creating {}: {e}", output.display()))?;
        f.write_all(&plaintext).map_err(|e| e.to_string())?;
    }
    info!("decoded {} bytes -> {} bytes", compressed.len(), plaintext.len());
    Ok(())
}

fn run_info(input: &PathBuf) -> Result<(), String> {
    let compressed = read_all(input)?;
    let plaintext = decode_all(&compressed, 65536)?;
    println!("compressed:   {} bytes", compressed.len());
    println!("decompressed: {} bytes", plaintext.len());
    let preview_len = plaintext.len().min(16);
    println!("first {preview_len} bytes: {}", hex::encode(&plaintext[..preview_len]));
    Ok(())
}

fn decode_all(compressed: &[u8], chunk_size: usize) -> Result<Vec<u8>, String> {
    let mut decoder = Hu01Decoder::new();
    let mut out = Vec::new();
    for chunk in compressed.chunks(chunk_size.max(1)) {
        decoder.add_input(chunk);
        out.extend(decoder.decompress().map_err(|e| e.to_string())?);
    }
    if !decoder.finished() {
        return Err("input ended before the declared plaintext size was reached".to_string());
    }
    Ok(out)
}

fn read_all(path: &PathBuf) -> Result<Vec<u8>, String> {
    let mut buf = Vec::new();
    if path.as_os_str() == "-" {
        io::stdin().read_to_end(&mut buf).map_err(|e| e.to_string())?;
    } else {
        File::open(path)
            .map_err(|e| format!("opening {}: {e}", path.display()))?
            .read_to_end(&mut buf)
            .map_err(|e| e.to_string())?;
    }
    Ok(buf)
}
