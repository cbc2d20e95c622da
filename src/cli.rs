// Command-line front-end.
//
// gzip-style interface over the codec: input files are text with one
// decimal u64 per line, compressed files carry the `.ncrlite` extension.
// Compressing FILE produces FILE.ncrlite and removes FILE (unless told
// otherwise); decompressing inverts that.

use std::fs::File;
use std::io::{self, BufRead, BufReader, BufWriter, IsTerminal, Read, Write};
use std::path::{Path, PathBuf};
use std::process;

use clap::Parser;

use crate::{compress, compress_sorted, Decompressor};

const EXTENSION: &str = "ncrlite";

/// Compress sets of 64-bit integers, one decimal value per line.
#[derive(Parser, Debug)]
#[command(name = "ncrlite", version, about = "compress sets of 64-bit integers")]
struct Cli {
    /// Decompress instead of compressing.
    #[arg(short, long)]
    decompress: bool,

    /// Print information about a compressed file.
    #[arg(short, long)]
    info: bool,

    /// Keep (don't delete) the input file.
    #[arg(short, long)]
    keep: bool,

    /// Write to stdout; implies --keep.
    #[arg(short = 'c', long = "stdout")]
    to_stdout: bool,

    /// Overwrite the output file if it already exists.
    #[arg(short, long)]
    force: bool,

    /// Print stats as JSON on stderr.
    #[arg(long)]
    json: bool,

    /// Input file; `-` or absent reads stdin and writes stdout.
    input: Option<PathBuf>,
}

/// Entry point for the binary: parse arguments, dispatch, exit.
pub fn run() -> ! {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn"))
        .format_timestamp(None)
        .format_target(false)
        .init();

    let cli = Cli::parse();
    process::exit(do_run(&cli));
}

fn do_run(cli: &Cli) -> i32 {
    // --info without --decompress reads the stream but discards the data.
    let reads_compressed = cli.decompress || cli.info;
    let discard_output = cli.info && !cli.decompress;

    let in_path: Option<PathBuf> = cli.input.clone().filter(|p| p.as_os_str() != "-");

    // Where output goes; None means stdout.
    let out_path: Option<PathBuf> = match &in_path {
        None => None,
        Some(_) if cli.to_stdout || discard_output => None,
        Some(p) if reads_compressed => Some(decompressed_path(p)),
        Some(p) => Some(appended_path(p, &format!(".{EXTENSION}"))),
    };

    if out_path.is_none() && !reads_compressed && io::stdout().is_terminal() {
        eprintln!("ncrlite: not writing compressed data to a terminal");
        return 13;
    }

    let mut input: Box<dyn BufRead> = match &in_path {
        Some(p) => match File::open(p) {
            Ok(f) => Box::new(BufReader::new(f)),
            Err(e) => {
                eprintln!("ncrlite: {}: {e}", p.display());
                return 3;
            }
        },
        None => Box::new(BufReader::new(io::stdin())),
    };

    let mut created: Option<PathBuf> = None;
    let mut output: Box<dyn Write> = if discard_output {
        Box::new(io::sink())
    } else {
        match &out_path {
            Some(p) => {
                if p.exists() && !cli.force {
                    eprintln!(
                        "ncrlite: {}: already exists (use --force to overwrite)",
                        p.display()
                    );
                    return 11;
                }
                match File::create(p) {
                    Ok(f) => {
                        created = Some(p.clone());
                        Box::new(BufWriter::new(f))
                    }
                    Err(e) => {
                        eprintln!("ncrlite: {}: create: {e}", p.display());
                        return 4;
                    }
                }
            }
            None => Box::new(BufWriter::new(io::stdout())),
        }
    };

    let in_name = in_path
        .as_ref()
        .map(|p| p.display().to_string())
        .unwrap_or_else(|| "-".into());

    let code = if reads_compressed {
        cmd_decompress(&mut input, &mut output, &in_name, cli.info, cli.json)
    } else {
        cmd_compress(&mut input, &mut output, &in_name, cli.json)
    };
    drop(input);
    drop(output);

    if code != 0 {
        // Don't leave partial output around.
        if let Some(p) = created {
            let _ = std::fs::remove_file(&p);
        }
        return code;
    }

    // Successful file-to-file conversion removes the input, as gzip does.
    if !(cli.keep || cli.to_stdout || cli.info) {
        if let (Some(p), Some(_)) = (&in_path, &out_path) {
            if let Err(e) = std::fs::remove_file(p) {
                eprintln!("ncrlite: {}: unlink: {e}", p.display());
                return 2;
            }
        }
    }

    0
}

// FILE.ncrlite -> FILE; anything else gets ".out" appended.
fn decompressed_path(p: &Path) -> PathBuf {
    match p.extension() {
        Some(ext) if ext == EXTENSION => p.with_extension(""),
        _ => {
            let out = appended_path(p, ".out");
            eprintln!(
                "ncrlite: {}: unknown extension, writing to {}",
                p.display(),
                out.display()
            );
            out
        }
    }
}

fn appended_path(p: &Path, suffix: &str) -> PathBuf {
    let mut s = p.as_os_str().to_os_string();
    s.push(suffix);
    PathBuf::from(s)
}

// ---------------------------------------------------------------------------
// Compress
// ---------------------------------------------------------------------------

fn cmd_compress(
    input: &mut dyn BufRead,
    output: &mut dyn Write,
    in_name: &str,
    json: bool,
) -> i32 {
    let mut values: Vec<u64> = Vec::new();
    let mut sorted = true;
    let mut prev = 0u64;
    let mut lineno = 0u64;
    let mut line = String::new();

    loop {
        line.clear();
        match input.read_line(&mut line) {
            Ok(0) => break,
            Ok(_) => {}
            Err(e) => {
                eprintln!("ncrlite: {in_name}: {e}");
                return 5;
            }
        }
        lineno += 1;

        let cur: u64 = match line.trim().parse() {
            Ok(v) => v,
            Err(e) => {
                eprintln!("ncrlite: {in_name}:{lineno}: {e}");
                return 5;
            }
        };
        if !values.is_empty() {
            if cur == prev {
                eprintln!("ncrlite: {in_name}:{lineno}: duplicate value {cur}");
                return 6;
            }
            if cur < prev {
                sorted = false;
            }
        }
        values.push(cur);
        prev = cur;
    }

    let mut counter = CountingWriter {
        inner: &mut *output,
        written: 0,
    };
    let result = if sorted {
        compress_sorted(&mut counter, &values)
    } else {
        log::warn!("{in_name}: input unsorted");
        compress(&mut counter, &values)
    };
    let written = counter.written;

    if let Err(e) = result {
        eprintln!("ncrlite: {in_name}: {e}");
        return 7;
    }
    if let Err(e) = output.flush() {
        eprintln!("ncrlite: write: {e}");
        return 7;
    }

    if json {
        let stats = serde_json::json!({
            "command": "compress",
            "values": values.len(),
            "compressed_bytes": written,
        });
        eprintln!("{}", serde_json::to_string_pretty(&stats).unwrap());
    }

    0
}

struct CountingWriter<W: Write> {
    inner: W,
    written: u64,
}

impl<W: Write> Write for CountingWriter<W> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let n = self.inner.write(buf)?;
        self.written += n as u64;
        Ok(n)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.inner.flush()
    }
}

// ---------------------------------------------------------------------------
// Decompress / info
// ---------------------------------------------------------------------------

fn cmd_decompress(
    input: &mut dyn BufRead,
    output: &mut dyn Write,
    in_name: &str,
    info: bool,
    json: bool,
) -> i32 {
    let reader = ByRef(input);
    let built = if info {
        Decompressor::with_logging(reader, Box::new(io::stdout()))
    } else {
        Decompressor::new(reader)
    };
    let mut d = match built {
        Ok(d) => d,
        Err(e) => {
            eprintln!("ncrlite: {in_name}: {e}");
            return 8;
        }
    };

    let k = d.remaining();
    let mut chunk = [0u64; 512];
    let mut last = 0u64;

    while d.remaining() > 0 {
        let n = chunk.len().min(d.remaining() as usize);
        if let Err(e) = d.read(&mut chunk[..n]) {
            eprintln!("ncrlite: {in_name}: {e}");
            return 9;
        }
        for &v in &chunk[..n] {
            if let Err(e) = writeln!(output, "{v}") {
                eprintln!("ncrlite: write: {e}");
                return 10;
            }
        }
        last = chunk[n - 1];
    }

    if let Err(e) = output.flush() {
        eprintln!("ncrlite: write: {e}");
        return 10;
    }

    if info {
        let n_max = if k == 0 { 0 } else { last.saturating_add(1) };
        let shannon = lg_choose(n_max, k) / 8.0;

        println!("Maximum value    (N)  {n_max}");
        println!("Number of values (k)  {k}");
        println!("Theoretical best avg  {shannon:.1}B");
        if shannon > 0.0 {
            println!(
                "Overhead              {:.1}%",
                100.0 * (d.bytes_read() as f64 / shannon - 1.0)
            );
        }
    }

    if json {
        let stats = serde_json::json!({
            "command": "decompress",
            "values": k,
            "compressed_bytes": d.bytes_read(),
        });
        eprintln!("{}", serde_json::to_string_pretty(&stats).unwrap());
    }

    0
}

// &mut dyn BufRead is not Read by value; this adapter is.
struct ByRef<'a>(&'a mut dyn BufRead);

impl Read for ByRef<'_> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        self.0.read(buf)
    }
}

// Stirling's approximation of log2(n!).
fn lg_factorial(n: u64) -> f64 {
    if n == 0 {
        return 0.0;
    }
    let n = n as f64;
    (2.0 * std::f64::consts::PI * n).log2() / 2.0 + n * n.log2() - n * std::f64::consts::E.log2()
}

// log2 of (n choose k), the information content of a k-subset.
fn lg_choose(n: u64, k: u64) -> f64 {
    if k == 0 || k >= n {
        return 0.0;
    }
    lg_factorial(n) - lg_factorial(k) - lg_factorial(n - k)
}
