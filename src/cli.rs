use chapterize::config::DEFAULT_CONFIG_PATH;
use clap::Parser;
use std::path::PathBuf;

/// Extract readable text and a chapter outline from e-books and documents
#[derive(Parser, Debug)]
#[command(name = "chapterize", version, about)]
pub struct Cli {
    /// Documents to import (txt, rtf, docx, epub, pdf, html, htm, fb2, odt)
    #[arg(required_unless_present = "formats")]
    pub inputs: Vec<PathBuf>,

    /// Directory for the extracted `.txt` and `.chapters.json` files.
    /// Defaults to the current directory.
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Configuration file for classifier patterns and log level
    #[arg(short, long, default_value = DEFAULT_CONFIG_PATH)]
    pub config: PathBuf,

    /// Print metadata and the chapter outline instead of writing files
    #[arg(long, default_value_t = false)]
    pub info: bool,

    /// List the supported file extensions and exit
    #[arg(long, default_value_t = false)]
    pub formats: bool,
}
