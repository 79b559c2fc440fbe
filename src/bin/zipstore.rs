//! zipstore CLI
//!
//! Loads delimited text into a record store, builds its index and answers
//! key lookups.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing_subscriber::{fmt, EnvFilter};
use zipstore::{Config, DataStore, SizeFormat};

/// zipstore CLI
#[derive(Parser, Debug)]
#[command(name = "zipstore")]
#[command(about = "Flat-file record store with a primary key index")]
#[command(version)]
struct Args {
    /// Data directory
    #[arg(short, long, default_value = "./zipstore_data")]
    data_dir: PathBuf,

    /// Header length format (ASCII or binary)
    #[arg(short, long, default_value = "ASCII")]
    format: String,

    /// Index sidecar file name
    #[arg(short, long, default_value = "KeyIndex.txt")]
    index_file: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Load a delimited text file (first line = field names)
    Load {
        /// Source text file
        source: PathBuf,
    },

    /// Scan the record store and write the index sidecar
    Index,

    /// Print the start offset of a key's record
    Lookup {
        /// The key to look up
        key: String,
    },

    /// Print the record stored under a key
    Get {
        /// The key to read
        key: String,
    },

    /// Print the header block description
    Header,
}

fn main() -> ExitCode {
    // Initialize tracing/logging
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,zipstore=debug"));

    fmt().with_env_filter(filter).with_target(true).init();

    let args = Args::parse();

    match run(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("{}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(args: Args) -> zipstore::Result<()> {
    let size_format: SizeFormat = args.format.parse()?;

    let config = Config::builder()
        .data_dir(args.data_dir)
        .size_format(size_format)
        .index_file_name(args.index_file)
        .build();

    let mut store = DataStore::open(config)?;

    match args.command {
        Commands::Load { source } => {
            let header = store.load_file(&source)?;
            println!(
                "loaded {} records with {} fields",
                header.record_count(),
                header.fields_per_record()
            );
        }
        Commands::Index => {
            let entries = store.build_index()?.len();
            store.persist_index()?;
            println!("indexed {} keys", entries);
        }
        Commands::Lookup { key } => {
            store.load_index()?;
            match store.lookup(&key)? {
                Some(offset) => println!("{} {}", key, offset),
                None => println!("{} not found", key),
            }
        }
        Commands::Get { key } => {
            store.load_index()?;
            match store.get(&key)? {
                Some(payload) => println!("{}", String::from_utf8_lossy(&payload)),
                None => println!("{} not found", key),
            }
        }
        Commands::Header => {
            let header = store.read_header()?;
            println!("file name:        {}", header.file_name());
            println!("version:          {}", header.version());
            println!("size format:      {}", header.size_format());
            println!("header size:      {}", header.header_size());
            println!("fields:           {}", header.field_names().join(","));
            println!("fields/record:    {}", header.fields_per_record());
            match header.declared_record_count() {
                Some(count) => println!("record count:     {}", count),
                None => println!("record count:     unreadable"),
            }
            println!("scanned tokens:   {}", header.record_count());
        }
    }

    Ok(())
}
