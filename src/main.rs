use clap::Parser;
use console::style;
use env_logger::Env;
use htmlfuse::cli::Args;
use htmlfuse::utils::format_file_size;
use htmlfuse::ReportCombiner;

fn display_banner() {
    println!();
    println!("    \x1b[38;5;51m╦ ╦ ╔╦╗ ╔╦╗ ╦    ╔═╗ ╦ ╦ ╔═╗ ╔═╗\x1b[0m");
    println!("    \x1b[38;5;45m╠═╣  ║  ║║║ ║    ╠╣  ║ ║ ╚═╗ ║╣ \x1b[0m");
    println!("    \x1b[38;5;39m╩ ╩  ╩  ╩ ╩ ╩═╝  ╚   ╚═╝ ╚═╝ ╚═╝\x1b[0m");
    println!();
    println!("        \x1b[3;38;5;147m\"One report, one file\"\x1b[0m");
    println!();
}

fn main() {
    let args = Args::parse();

    // Initialize logging based on verbosity and quiet flags
    let log_level = if args.quiet {
        "error"
    } else if args.verbose {
        "debug"
    } else {
        "info"
    };

    env_logger::Builder::from_env(Env::default().default_filter_or(log_level))
        .format_timestamp_millis()
        .init();

    if !args.quiet {
        display_banner();
    }

    log::info!("Htmlfuse starting with args: {:?}", args);

    let combiner = match ReportCombiner::new(args) {
        Ok(combiner) => combiner,
        Err(e) => {
            log::error!("{}", e);
            std::process::exit(1);
        }
    };

    let report = match combiner.run() {
        Ok(report) => report,
        Err(e) => {
            log::error!("{}", e);
            std::process::exit(1);
        }
    };

    let info = &report.info;
    println!(
        "    {} {} {}",
        style("▶").green(),
        style("Report combined successfully").bold(),
        style("✓").green()
    );
    println!("    ├─ Assets bundled: {}", info.assets_bundled);
    println!("    ├─ Assets skipped: {}", info.assets_skipped);
    println!(
        "    ├─ Data processed: {}",
        format_file_size(info.total_asset_bytes)
    );
    println!("    ├─ Duration: {:.2}s", info.duration_seconds);
    println!(
        "    └─ Output: {} ({})",
        info.output_file,
        format_file_size(info.output_size_bytes)
    );
    println!();
}
