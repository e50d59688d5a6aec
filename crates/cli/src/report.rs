use samewindow_normalizer::NormalizeStats;
use serde::Serialize;

#[derive(Debug, Clone, Serialize)]
pub struct FileReport {
    pub path: String,
    #[serde(flatten)]
    pub stats: NormalizeStats,
    /// False when nothing needed rewriting and the file was left untouched
    pub written: bool,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct RewriteReport {
    pub files: Vec<FileReport>,
    pub total: NormalizeStats,
}

impl RewriteReport {
    pub fn push(&mut self, file: FileReport) {
        self.total += file.stats;
        self.files.push(file);
    }

    pub fn files_written(&self) -> usize {
        self.files.iter().filter(|file| file.written).count()
    }

    pub fn render_summary(&self) -> String {
        format!(
            "{} files scanned, {} changed, {} of {} links rewritten",
            self.files.len(),
            self.files_written(),
            self.total.rewritten,
            self.total.scanned
        )
    }
}

/// One anchor that still opens a new window
#[derive(Debug, Clone, Serialize)]
pub struct Finding {
    pub path: String,
    pub line: usize,
    pub markup: String,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct CheckReport {
    pub files_scanned: usize,
    pub anchors_scanned: usize,
    pub findings: Vec<Finding>,
}

impl CheckReport {
    pub fn is_clean(&self) -> bool {
        self.findings.is_empty()
    }

    pub fn render_lines(&self) -> String {
        let mut out = String::new();
        for finding in &self.findings {
            out.push_str(&format!(
                "{}:{}: {}\n",
                finding.path,
                finding.line,
                one_line(&finding.markup)
            ));
        }
        out
    }
}

fn one_line(markup: &str) -> String {
    markup.split_whitespace().collect::<Vec<_>>().join(" ")
}
