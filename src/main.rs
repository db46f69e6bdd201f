use clap::{Parser, Subcommand, ValueEnum};
use memprim::bench::{BenchProgram, Testbench, render_trace};
use memprim::fifo::CircularBuffer;
use memprim::parse::ParseError;
use memprim::store::{
    Endian, MAX_HEX_IMAGE_WORDS, MemConfig, Rom, SimStore, load_binary_image,
    load_hex_image,
};
use memprim::word::WordWidth;
use std::fs::{self, File};
use std::io;
use std::path::{Path, PathBuf};

//===========================================================================//

#[derive(Parser)]
#[clap(author, about, long_about = None, version)]
struct Cli {
    /// Increases logging verbosity; may be given more than once.
    #[clap(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,
    #[clap(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Runs a bench script against a simulated FIFO.
    Fifo {
        /// The bench script to run.
        script: PathBuf,
        /// The number of words the buffer can hold.
        #[clap(long, default_value_t = 16)]
        capacity: usize,
        /// The width of each word, in bits.
        #[clap(long, default_value_t = 8)]
        width: u32,
        /// Prints a table of the inputs and outputs of every cycle.
        #[clap(long)]
        trace: bool,
    },
    /// Loads an image into a simulated ROM and reads it back.
    Rom {
        /// The image file to load.
        image: PathBuf,
        /// The width of each word, in bits.
        #[clap(long, default_value_t = 8)]
        width: u32,
        /// The number of words in the ROM (defaults to the image length).
        #[clap(long)]
        capacity: Option<usize>,
        /// The format of the image file.
        #[clap(long, value_enum, default_value_t = ImageFormat::Hex)]
        format: ImageFormat,
        /// Addresses to read (all cells are dumped if none are given).
        #[clap(long = "addr", value_parser = parse_addr)]
        addrs: Vec<u32>,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum ImageFormat {
    /// Whitespace-separated hex words, with optional `@addr` directives.
    Hex,
    /// Raw binary, least significant byte first.
    BinLe,
    /// Raw binary, most significant byte first.
    BinBe,
}

fn parse_addr(arg: &str) -> Result<u32, String> {
    let result = match arg.strip_prefix("0x") {
        Some(hex) => u32::from_str_radix(hex, 16),
        None => arg.parse::<u32>(),
    };
    result.map_err(|error| format!("invalid address {arg:?}: {error}"))
}

//===========================================================================//

fn main() -> io::Result<()> {
    let cli = Cli::parse();
    let level = match cli.verbose {
        0 => log::LevelFilter::Warn,
        1 => log::LevelFilter::Info,
        2 => log::LevelFilter::Debug,
        _ => log::LevelFilter::Trace,
    };
    env_logger::Builder::new().filter_level(level).parse_default_env().init();
    let success = match cli.command {
        Command::Fifo { script, capacity, width, trace } => {
            run_fifo(&script, capacity, width, trace)?
        }
        Command::Rom { image, width, capacity, format, addrs } => {
            run_rom(&image, width, capacity, format, &addrs)?
        }
    };
    if !success {
        std::process::exit(1);
    }
    Ok(())
}

fn run_fifo(
    path: &Path,
    capacity: usize,
    bits: u32,
    trace: bool,
) -> io::Result<bool> {
    let config = MemConfig::new(capacity, bits).map_err(invalid_input)?;
    let source = fs::read_to_string(path)?;
    let program = match BenchProgram::parse_source(&source, config) {
        Ok(program) => program,
        Err(errors) => {
            report_parse_errors(path, &source, &errors);
            return Ok(false);
        }
    };
    let report = Testbench::new(CircularBuffer::new(config)).run(&program);
    if trace {
        print!("{}", render_trace(&report.trace, config.width()));
    }
    for failure in report.failures.iter() {
        let (line, column) = failure.span.line_column(&source);
        eprintln!("{}:{line}:{column}: {}", path.display(), failure.message);
    }
    if report.passed() {
        println!(
            "{}: {} cycles, all checks passed",
            path.display(),
            report.trace.len()
        );
    }
    Ok(report.passed())
}

fn run_rom(
    path: &Path,
    bits: u32,
    capacity: Option<usize>,
    format: ImageFormat,
    addrs: &[u32],
) -> io::Result<bool> {
    let width = WordWidth::new(bits).map_err(invalid_input)?;
    let init = match format {
        ImageFormat::Hex => {
            let source = fs::read_to_string(path)?;
            let limit = capacity.unwrap_or(MAX_HEX_IMAGE_WORDS);
            match load_hex_image(&source, width, limit) {
                Ok(words) => words,
                Err(errors) => {
                    report_parse_errors(path, &source, &errors);
                    return Ok(false);
                }
            }
        }
        ImageFormat::BinLe => {
            let file = io::BufReader::new(File::open(path)?);
            load_binary_image(file, width, Endian::Little)?
        }
        ImageFormat::BinBe => {
            let file = io::BufReader::new(File::open(path)?);
            load_binary_image(file, width, Endian::Big)?
        }
    };
    let capacity = capacity.unwrap_or(init.len());
    let config = MemConfig::with_width(capacity, width).map_err(invalid_input)?;
    let rom = Rom::new(config, &init).map_err(invalid_input)?;
    log::info!("loaded {} words into a {}", init.len(), rom.description());
    let digits = width.hex_digits();
    if addrs.is_empty() {
        for (row, words) in rom.contents().chunks(8).enumerate() {
            let words: Vec<String> =
                words.iter().map(|word| format!("{word:0digits$x}")).collect();
            println!("{:08x}: {}", row * 8, words.join(" "));
        }
    } else {
        for &addr in addrs {
            println!("{addr:08x}: {:0digits$x}", rom.read(addr));
        }
    }
    Ok(true)
}

fn report_parse_errors(path: &Path, source: &str, errors: &[ParseError]) {
    let path = path.display();
    for error in errors {
        let (line, column) = error.span.line_column(source);
        eprintln!("{path}:{line}:{column}: error: {}", error.message);
        for label in error.labels.iter() {
            let (line, column) = label.span.line_column(source);
            eprintln!("{path}:{line}:{column}: note: {}", label.message);
        }
    }
}

fn invalid_input(error: memprim::error::ConfigError) -> io::Error {
    io::Error::new(io::ErrorKind::InvalidInput, error)
}

//===========================================================================//
