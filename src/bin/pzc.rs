/// pzc – compress a file with adaptive Huffman coding, optionally protected
/// by Reed-Solomon parity.
///
///   pzc in.txt out.pzc            → compress
///   pzc -r 16 in.txt out.pzc      → compress, then add 16 parity bytes per block
///   pzc -d out.pzc in.txt         → decompress
///   pzc -d -r 16 out.pzc in.txt   → repair, then decompress
use std::env;
use std::fs;
use std::io::{BufReader, BufWriter, Write};
use std::process::{self, ExitCode};

use pzcodec::adaptive::{self, AdaptiveOptions};
use pzcodec::codec::ReedSolomonCodec;
use pzcodec::codec::CHUNK_BLOCK_LEN;

fn usage() {
    eprintln!("pzc - adaptive Huffman compression with Reed-Solomon protection");
    eprintln!();
    eprintln!("Usage: pzc [OPTIONS] INPUT OUTPUT");
    eprintln!();
    eprintln!("Options:");
    eprintln!("  -d, --decompress   Decompress mode");
    eprintln!("  -r, --parity N     Reed-Solomon parity bytes per 255-byte block (1-254)");
    eprintln!("  -q, --quiet        Suppress warnings");
    eprintln!("  -v, --verbose      Verbose output");
    eprintln!("  -h, --help         Show this help");
    eprintln!();
    eprintln!("Files protected with -r must be decompressed with the same -r.");
}

#[derive(Debug)]
struct Opts {
    decompress: bool,
    verbose: bool,
    quiet: bool,
    parity: Option<usize>,
    files: Vec<String>,
}

fn parse_args() -> Opts {
    let args: Vec<String> = env::args().skip(1).collect();
    let mut opts = Opts {
        decompress: false,
        verbose: false,
        quiet: false,
        parity: None,
        files: Vec::new(),
    };

    let mut i = 0;
    while i < args.len() {
        let arg = &args[i];
        match arg.as_str() {
            "-d" | "--decompress" => opts.decompress = true,
            "-v" | "--verbose" => opts.verbose = true,
            "-q" | "--quiet" => opts.quiet = true,
            "-h" | "--help" => {
                usage();
                process::exit(0);
            }
            "-r" | "--parity" => {
                i += 1;
                if i >= args.len() {
                    eprintln!("pzc: missing argument for -r");
                    process::exit(1);
                }
                opts.parity = match args[i].parse::<usize>() {
                    Ok(n) if n > 0 && n < CHUNK_BLOCK_LEN => Some(n),
                    _ => {
                        eprintln!("pzc: invalid parity length '{}'", args[i]);
                        process::exit(1);
                    }
                };
            }
            // Combined short flags like -dv
            s if s.starts_with('-') && !s.starts_with("--") && s.len() > 2 => {
                for ch in s[1..].chars() {
                    match ch {
                        'd' => opts.decompress = true,
                        'v' => opts.verbose = true,
                        'q' => opts.quiet = true,
                        _ => {
                            eprintln!("pzc: unknown flag '-{ch}'");
                            process::exit(1);
                        }
                    }
                }
            }
            _ => opts.files.push(arg.clone()),
        }
        i += 1;
    }

    opts
}

fn ratio(part: u64, whole: u64) -> f64 {
    if whole > 0 {
        (part as f64 / whole as f64) * 100.0
    } else {
        0.0
    }
}

fn process_compress(opts: &Opts, input: &str, output: &str) -> Result<(), String> {
    let options = AdaptiveOptions::default();
    let in_file = fs::File::open(input).map_err(|e| format!("{input}: {e}"))?;
    let in_size = in_file.metadata().map(|m| m.len()).unwrap_or(0);
    let reader = BufReader::new(in_file);
    let out_file = fs::File::create(output).map_err(|e| format!("{output}: {e}"))?;
    let mut writer = BufWriter::new(out_file);

    let (compressed_size, out_size) = match opts.parity {
        None => {
            let n = adaptive::compress(reader, &mut writer, &options)
                .map_err(|e| format!("{input}: {e}"))?;
            (n, n)
        }
        Some(ec) => {
            let mut compressed = Vec::new();
            adaptive::compress(reader, &mut compressed, &options)
                .map_err(|e| format!("{input}: {e}"))?;
            let protected = ReedSolomonCodec::new()
                .encode_chunked(&compressed, ec)
                .map_err(|e| format!("{input}: {e}"))?;
            writer
                .write_all(&protected)
                .map_err(|e| format!("{output}: {e}"))?;
            (compressed.len() as u64, protected.len() as u64)
        }
    };
    writer.flush().map_err(|e| format!("{output}: {e}"))?;

    if compressed_size > in_size && !opts.quiet {
        eprintln!("pzc: warning: {input}: compressed output is larger than input");
    }
    if opts.verbose {
        eprintln!(
            "{input}: {:.1}% ({in_size} → {compressed_size} bytes)",
            ratio(compressed_size, in_size)
        );
        if let Some(ec) = opts.parity {
            eprintln!("{input}: {out_size} bytes with {ec} parity bytes per block");
        }
    }
    Ok(())
}

fn process_decompress(opts: &Opts, input: &str, output: &str) -> Result<(), String> {
    let options = AdaptiveOptions::default();
    let out_file = fs::File::create(output).map_err(|e| format!("{output}: {e}"))?;
    let mut writer = BufWriter::new(out_file);

    let (in_size, out_size) = match opts.parity {
        None => {
            let in_file = fs::File::open(input).map_err(|e| format!("{input}: {e}"))?;
            let in_size = in_file.metadata().map(|m| m.len()).unwrap_or(0);
            let n = adaptive::decompress(BufReader::new(in_file), &mut writer, &options)
                .map_err(|e| format!("{input}: {e}"))?;
            (in_size, n)
        }
        Some(ec) => {
            let protected = fs::read(input).map_err(|e| format!("{input}: {e}"))?;
            let compressed = ReedSolomonCodec::new()
                .decode_chunked(&protected, ec)
                .map_err(|e| format!("{input}: {e}"))?;
            let n = adaptive::decompress(&compressed[..], &mut writer, &options)
                .map_err(|e| format!("{input}: {e}"))?;
            (protected.len() as u64, n)
        }
    };
    writer.flush().map_err(|e| format!("{output}: {e}"))?;

    if opts.verbose {
        eprintln!("{input}: {in_size} → {out_size} bytes");
    }
    Ok(())
}

fn run() -> Result<(), ()> {
    let opts = parse_args();
    let [input, output] = opts.files.as_slice() else {
        usage();
        return Err(());
    };

    let result = if opts.decompress {
        process_decompress(&opts, input, output)
    } else {
        process_compress(&opts, input, output)
    };

    result.map_err(|e| eprintln!("pzc: {e}"))
}

fn main() -> ExitCode {
    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(()) => ExitCode::FAILURE,
    }
}
