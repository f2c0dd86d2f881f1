//! Pipeline orchestration: scan the report tree, emit the mock server,
//! patch the shell, inline everything, write the single-file result.

use crate::cli::Args;
use crate::errors::{FuseError, FuseResult};
use crate::inliner::HtmlInliner;
use crate::models::{AssetRecord, CombineInfo, CombineReport};
use crate::scanner::AssetScanner;
use crate::server::ServerGenerator;
use crate::utils::{format_file_size, timestamp_now};
use std::path::Path;
use std::time::Instant;

pub struct ReportCombiner {
    args: Args,
    server: ServerGenerator,
    inliner: HtmlInliner,
}

impl ReportCombiner {
    pub fn new(args: Args) -> FuseResult<Self> {
        Ok(Self {
            server: ServerGenerator::new(),
            inliner: HtmlInliner::new()?,
            args,
        })
    }

    /// Run the whole pipeline once and return the run summary.
    pub fn run(&self) -> FuseResult<CombineReport> {
        let start = Instant::now();
        let started_at = timestamp_now();

        let root = Path::new(&self.args.directory);
        log::info!("Combining report in {:?}", root);
        if !root.is_dir() {
            return Err(FuseError::InvalidPath(root.display().to_string()));
        }

        let scanner = AssetScanner::new(root, self.args.quiet);
        scanner.verify_required_files()?;
        let outcome = scanner.collect_assets()?;

        self.server.write(root, &outcome.assets)?;
        let helper_name = self.server.copy_helper(&self.args.helper, root)?;

        let shell = self.inliner.patch_shell(root, &helper_name)?;
        let combined = self.inliner.inline(root, &shell)?;
        let output_size = self.inliner.write_output(&self.args.output, &combined)?;
        log::info!(
            "Saved combined report to {:?} ({})",
            self.args.output,
            format_file_size(output_size)
        );

        let report = CombineReport {
            info: CombineInfo {
                started_at,
                duration_seconds: start.elapsed().as_secs_f64(),
                source_directory: self.args.directory.clone(),
                output_file: self.args.output.display().to_string(),
                assets_bundled: outcome.assets.len() as u64,
                assets_skipped: outcome.skipped,
                total_asset_bytes: outcome.bytes_read,
                output_size_bytes: output_size,
            },
            assets: outcome.assets.iter().map(AssetRecord::from).collect(),
        };

        self.write_stats(&report)?;
        Ok(report)
    }

    fn write_stats(&self, report: &CombineReport) -> FuseResult<()> {
        if let Some(stats_path) = &self.args.stats {
            log::info!("Writing run summary to {:?}", stats_path);
            let json = serde_json::to_string_pretty(report)?;
            std::fs::write(stats_path, json).map_err(|e| FuseError::io(e, stats_path.clone()))?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::path::PathBuf;
    use tempfile::TempDir;

    const INDEX_HTML: &str = concat!(
        "<html><head>",
        "<link rel=\"stylesheet\" href=\"styles.css\">",
        "</head><body>",
        "<script src=\"app.js\"></script>",
        "</body></html>",
    );

    fn write_file(root: &Path, rel: &str, contents: &str) {
        let path = root.join(rel);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(path, contents).unwrap();
    }

    fn build_report_dir() -> TempDir {
        let dir = TempDir::new().unwrap();
        write_file(dir.path(), "index.html", INDEX_HTML);
        write_file(dir.path(), "app.js", "console.log(\"app\");");
        write_file(dir.path(), "styles.css", "body { margin: 0; }");
        write_file(dir.path(), "data/result.json", "{\"passed\": 10}");
        dir
    }

    fn build_helper() -> (TempDir, PathBuf) {
        let dir = TempDir::new().unwrap();
        let helper = dir.path().join("sinon-9.2.4.js");
        fs::write(&helper, "var sinon = { fakeServer: {} };").unwrap();
        (dir, helper)
    }

    fn args_for(report: &TempDir, helper: &Path, output: &Path) -> Args {
        Args {
            directory: report.path().to_string_lossy().to_string(),
            output: output.to_path_buf(),
            helper: helper.to_path_buf(),
            stats: None,
            verbose: false,
            quiet: true,
        }
    }

    #[test]
    fn test_end_to_end_combine() {
        let report_dir = build_report_dir();
        let (_helper_dir, helper) = build_helper();
        let out_dir = TempDir::new().unwrap();
        let output = out_dir.path().join("complete.html");

        let combiner = ReportCombiner::new(args_for(&report_dir, &helper, &output)).unwrap();
        let report = combiner.run().unwrap();

        assert_eq!(report.info.assets_bundled, 1);
        assert_eq!(report.info.assets_skipped, 0);
        assert_eq!(report.assets[0].url, "data/result.json");

        let combined = fs::read_to_string(&output).unwrap();
        assert!(combined.contains("var server_data"));
        assert!(combined.contains("\"data/result.json\""));
        assert!(combined.contains("<script>console.log(\"app\");</script>"));
        assert!(combined.contains("<style>body { margin: 0; }</style>"));
        assert!(combined.contains("var sinon = { fakeServer: {} };"));
        assert!(!combined.contains("<script src="));
        assert!(!combined.contains("rel=\"stylesheet\""));

        // Build artifacts stay behind in the report directory
        assert!(report_dir.path().join("server.js").exists());
        assert!(report_dir.path().join("sinon-9.2.4.js").exists());
    }

    #[test]
    fn test_missing_required_file_aborts_without_output() {
        let report_dir = TempDir::new().unwrap();
        write_file(report_dir.path(), "index.html", INDEX_HTML);
        write_file(report_dir.path(), "app.js", "console.log(\"app\");");
        let (_helper_dir, helper) = build_helper();
        let out_dir = TempDir::new().unwrap();
        let output = out_dir.path().join("complete.html");

        let combiner = ReportCombiner::new(args_for(&report_dir, &helper, &output)).unwrap();
        let err = combiner.run().unwrap_err();

        assert!(matches!(err, FuseError::MissingRequiredFile { .. }));
        assert!(!output.exists());
        assert!(!report_dir.path().join("server.js").exists());
    }

    #[test]
    fn test_unsupported_extension_still_succeeds() {
        let report_dir = build_report_dir();
        write_file(report_dir.path(), "data/notes.xyz", "scratch");
        let (_helper_dir, helper) = build_helper();
        let out_dir = TempDir::new().unwrap();
        let output = out_dir.path().join("complete.html");

        let combiner = ReportCombiner::new(args_for(&report_dir, &helper, &output)).unwrap();
        let report = combiner.run().unwrap();

        assert_eq!(report.info.assets_skipped, 1);
        let combined = fs::read_to_string(&output).unwrap();
        assert!(!combined.contains("notes.xyz"));
    }

    #[test]
    fn test_invalid_directory_fails_fast() {
        let (_helper_dir, helper) = build_helper();
        let out_dir = TempDir::new().unwrap();
        let output = out_dir.path().join("complete.html");

        let args = Args {
            directory: "definitely/not/a/report".to_string(),
            output,
            helper,
            stats: None,
            verbose: false,
            quiet: true,
        };
        let err = ReportCombiner::new(args).unwrap().run().unwrap_err();
        assert!(matches!(err, FuseError::InvalidPath(_)));
    }

    #[test]
    fn test_missing_helper_aborts() {
        let report_dir = build_report_dir();
        let out_dir = TempDir::new().unwrap();
        let output = out_dir.path().join("complete.html");
        let helper = Path::new("no/such/helper.js");

        let combiner = ReportCombiner::new(args_for(&report_dir, helper, &output)).unwrap();
        let err = combiner.run().unwrap_err();
        assert!(matches!(err, FuseError::Io { .. }));
        assert!(!output.exists());
    }

    #[test]
    fn test_stats_json_written() {
        let report_dir = build_report_dir();
        let (_helper_dir, helper) = build_helper();
        let out_dir = TempDir::new().unwrap();
        let output = out_dir.path().join("complete.html");
        let stats = out_dir.path().join("stats.json");

        let mut args = args_for(&report_dir, &helper, &output);
        args.stats = Some(stats.clone());

        let combiner = ReportCombiner::new(args).unwrap();
        let report = combiner.run().unwrap();

        let parsed: CombineReport =
            serde_json::from_str(&fs::read_to_string(&stats).unwrap()).unwrap();
        assert_eq!(parsed.info.assets_bundled, report.info.assets_bundled);
        assert_eq!(parsed.assets.len(), 1);
    }

    #[test]
    fn test_second_run_is_stable() {
        let report_dir = build_report_dir();
        let (_helper_dir, helper) = build_helper();
        let out_dir = TempDir::new().unwrap();
        let output = out_dir.path().join("complete.html");

        let combiner = ReportCombiner::new(args_for(&report_dir, &helper, &output)).unwrap();
        combiner.run().unwrap();
        let first = fs::read_to_string(&output).unwrap();

        combiner.run().unwrap();
        let second = fs::read_to_string(&output).unwrap();

        assert_eq!(second.matches("var server = sinon.fakeServer.create();").count(), 1);
        assert_eq!(first, second);
    }
}
