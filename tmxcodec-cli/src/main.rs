use clap::{Parser, Subcommand};
use std::{fs::File, io::Write};
use tmxcodec::{Tmx, traits::Parser as TmxParser, write_csv};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    #[command(subcommand)]
    commands: Commands,
}

/// Supported subcommands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Convert a TMX file to CSV, one column per language.
    Convert {
        /// The TMX file to process
        #[arg(short, long)]
        input: String,
        /// The CSV file to write the results to
        #[arg(short, long)]
        output: String,
    },

    /// View the translation units in a TMX file.
    View {
        /// The TMX file to view
        #[arg(short, long)]
        input: String,

        /// Optional language code to filter variants by
        #[arg(short, long)]
        lang: Option<String>,
    },

    /// Dump the parsed object model as JSON.
    Debug {
        /// The TMX file to dump
        #[arg(short, long)]
        input: String,

        /// Write to a file instead of stdout
        #[arg(short, long)]
        output: Option<String>,
    },

    /// Parse and re-serialize in memory, reporting the first violation.
    Check {
        /// The TMX file to check
        #[arg(short, long)]
        input: String,
    },
}

fn main() {
    let args = Args::parse();

    match args.commands {
        Commands::Convert { input, output } => {
            let tmx = read_tmx(&input);
            if let Err(e) = write_csv(&tmx, &output) {
                eprintln!("Error writing {}: {}", output, e);
                std::process::exit(1);
            }
        }
        Commands::View { input, lang } => {
            let tmx = read_tmx(&input);
            print_view(&tmx, lang.as_deref());
        }
        Commands::Debug { input, output } => {
            let tmx = read_tmx(&input);
            let json = match serde_json::to_string_pretty(&tmx) {
                Ok(json) => json,
                Err(e) => {
                    eprintln!("Error serializing to JSON: {}", e);
                    std::process::exit(1);
                }
            };
            match output {
                Some(path) => {
                    if let Err(e) =
                        File::create(&path).and_then(|mut f| f.write_all(json.as_bytes()))
                    {
                        eprintln!("Error writing to {}: {}", path, e);
                        std::process::exit(1);
                    }
                }
                None => println!("{}", json),
            }
        }
        Commands::Check { input } => {
            let tmx = read_tmx(&input);
            if let Err(e) = tmx.to_xml_string() {
                eprintln!("Invalid: {}", e);
                std::process::exit(1);
            }
            let tuvs: usize = tmx.iter().map(|tu| tu.tuvs.len()).sum();
            println!(
                "OK: {} translation unit(s), {} variant(s), language(s): {}",
                tmx.tus.len(),
                tuvs,
                tmxcodec::export::languages(&tmx).join(", ")
            );
        }
    }
}

fn read_tmx(input: &str) -> Tmx {
    match Tmx::read_from(input) {
        Ok(tmx) => tmx,
        Err(e) => {
            eprintln!("Error reading {}: {}", input, e);
            std::process::exit(1);
        }
    }
}

/// Print a human-readable listing of the translation units.
fn print_view(tmx: &Tmx, lang_filter: Option<&str>) {
    println!(
        "Source language: {} ({} unit(s))",
        tmx.header.srclang,
        tmx.tus.len()
    );
    for (index, tu) in tmx.iter().enumerate() {
        match &tu.tuid {
            Some(tuid) => println!("\n[{}] {}", index + 1, tuid),
            None => println!("\n[{}]", index + 1),
        }
        for note in &tu.notes {
            println!("  // {}", note.text);
        }
        for tuv in &tu.tuvs {
            if let Some(filter) = lang_filter {
                if tuv.lang != filter {
                    continue;
                }
            }
            println!("  {}: {}", tuv.lang, tuv.plain_text());
        }
    }
}
