use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug, Clone)]
#[command(
    name = "htmlfuse",
    about = "Htmlfuse - bundle a multi-file static web report into one self-contained HTML file",
    version
)]
pub struct Args {
    /// Report directory containing index.html, app.js and styles.css
    #[arg(short, long, default_value = ".")]
    pub directory: String,

    /// Path of the combined single-file report to write
    #[arg(short, long, default_value = "complete.html")]
    pub output: PathBuf,

    /// Fake-server helper script copied into the report directory
    #[arg(long, default_value = "sinon-9.2.4.js")]
    pub helper: PathBuf,

    /// Write a JSON summary of the run to this file
    #[arg(short, long)]
    pub stats: Option<PathBuf>,

    /// Enable verbose logging of all operations
    #[arg(short, long)]
    pub verbose: bool,

    /// Hide progress bars and use quiet output
    #[arg(short, long)]
    pub quiet: bool,
}
