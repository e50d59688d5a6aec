use super::{parse, read_file, read_stdin, CheckArgs, STDIN_LABEL};
use crate::config::Config;
use crate::files::{collect_html_files, is_stdin};
use crate::report::{CheckReport, Finding};
use anyhow::Result;
use samewindow_dom::HtmlSource;
use samewindow_normalizer::new_window_anchors;

/// Exit status when at least one `_blank` anchor was found
pub const FINDINGS_EXIT_CODE: i32 = 1;

pub fn run_check(args: CheckArgs, config: &Config) -> Result<i32> {
    let mut report = CheckReport::default();

    if is_stdin(&args.paths) {
        let doc = parse(read_stdin()?, STDIN_LABEL)?;
        record(&mut report, STDIN_LABEL, &doc);
    } else {
        for path in collect_html_files(&args.paths, &config.scan)? {
            let label = path.display().to_string();
            let doc = parse(read_file(&path)?, &label)?;
            record(&mut report, &label, &doc);
        }
    }

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print!("{}", report.render_lines());
    }
    log::info!(
        "{} files, {} anchors, {} open a new window",
        report.files_scanned,
        report.anchors_scanned,
        report.findings.len()
    );

    Ok(if report.is_clean() {
        0
    } else {
        FINDINGS_EXIT_CODE
    })
}

fn record(report: &mut CheckReport, label: &str, doc: &HtmlSource) {
    report.files_scanned += 1;
    report.anchors_scanned += doc.anchor_count();
    for anchor in new_window_anchors(doc) {
        let (Some(line), Some(markup)) = (doc.anchor_line(anchor), doc.anchor_markup(anchor))
        else {
            continue;
        };
        report.findings.push(Finding {
            path: label.to_string(),
            line,
            markup: markup.to_string(),
        });
    }
}
